use crate::backup::dump::MysqldumpConfig;
use crate::backup::mail::address::Addresses;
use crate::backup::mail::smtp::SmtpConfig;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use crate::backup::validate::{validate_dir_exist, validate_utc_offset};
use bon::Builder;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use validator::Validate;

static DEFAULT_UTC_OFFSET: &str = "+08:00";
static DEFAULT_SUBJECT_LABEL: &str = "数据库备份文件";

#[derive(Clone, Serialize, Deserialize, Debug, Validate, Builder, Getters)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct BackupConfig {
    /// Where the dump and the archive are written. Defaults to the
    /// directory holding the configuration file.
    #[serde(default)]
    #[validate(custom(function = validate_dir_exist))]
    #[builder(into)]
    work_dir: PathBuf,
    /// Offset used to decide which day "today" is
    #[serde(default = "default_utc_offset")]
    #[validate(custom(function = validate_utc_offset))]
    #[builder(default = default_utc_offset(), into)]
    utc_offset: String,
    #[serde(default = "default_subject_label")]
    #[builder(default = default_subject_label(), into)]
    subject_label: String,
    #[validate(nested)]
    mysqldump: MysqldumpConfig,
    #[validate(nested)]
    smtp: SmtpConfig,
    #[validate(nested)]
    recipients: Addresses,
}

fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}

fn default_subject_label() -> String {
    DEFAULT_SUBJECT_LABEL.to_string()
}

impl BackupConfig {
    /// Reads and validates a YAML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = File::open(path)
            .map_err(Error::from)
            .with_msg(format!("Open config failed: {:?}", path))
            .and_then(|f| {
                serde_yml::from_reader::<_, BackupConfig>(f)
                    .map_err(Error::from)
                    .with_msg(format!("Parse YAML config failed: {:?}", path))
            })?;

        if config.work_dir.as_os_str().is_empty() {
            config.work_dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf();
        }

        config
            .validate()
            .map_err(Error::from)
            .with_msg(format!("Config validation failed: {:?}", path))?;

        Ok(config)
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        Ok(self.utc_offset.parse::<FixedOffset>()?)
    }

    pub fn date_at(&self, now: DateTime<Utc>) -> Result<NaiveDate> {
        Ok(now.with_timezone(&self.offset()?).date_naive())
    }

    pub fn today(&self) -> Result<NaiveDate> {
        self.date_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    static CONFIG_YAML: &str = r#"
mysqldump:
  program: /usr/bin/mysqldump
  databases: db1 db2
  ignore_table_data:
    - db1.wp_commentmeta
    - db1.wp_PluginManager
smtp:
  host: smtp.example.com
  port: 465
  username: backup@example.com
  password: secret
  from: backup@example.com
  from_name: Backup
recipients:
  to: a@example.com
  cc: [b@example.com, c@example.com]
"#;

    fn write_config(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join("backup.yml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackupConfig::load(write_config(dir.path(), CONFIG_YAML)).unwrap();

        assert_eq!(config.work_dir(), dir.path());
        assert_eq!(config.utc_offset(), DEFAULT_UTC_OFFSET);
        assert_eq!(config.subject_label(), DEFAULT_SUBJECT_LABEL);
        assert_eq!(config.mysqldump().databases(), "db1 db2");
        assert_eq!(config.mysqldump().ignore_table_data().len(), 2);
        assert_eq!(config.recipients().resolve().cc.len(), 2);
    }

    #[test]
    fn test_load_explicit_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "work_dir: {}\nutc_offset: \"-05:00\"\nsubject_label: nightly\n{}",
            work_dir.path().display(),
            CONFIG_YAML
        );
        let config = BackupConfig::load(write_config(dir.path(), &yaml)).unwrap();

        assert_eq!(config.work_dir(), work_dir.path());
        assert_eq!(config.utc_offset(), "-05:00");
        assert_eq!(config.subject_label(), "nightly");
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!("retry: 3\n{}", CONFIG_YAML);
        let err = BackupConfig::load(write_config(dir.path(), &yaml)).unwrap_err();
        assert!(err.to_string().contains("Parse YAML config failed"));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!("utc_offset: Asia/Shanghai\n{}", CONFIG_YAML);
        let err = BackupConfig::load(write_config(dir.path(), &yaml)).unwrap_err();
        assert!(err.to_string().contains("Config validation failed"));

        let yaml = CONFIG_YAML.replace("databases: db1 db2", "databases: \"  \"");
        let err = BackupConfig::load(write_config(dir.path(), &yaml)).unwrap_err();
        assert!(err.to_string().contains("Config validation failed"));

        let yaml = CONFIG_YAML.replace("  to: a@example.com\n", "  to: []\n");
        let err = BackupConfig::load(write_config(dir.path(), &yaml)).unwrap_err();
        assert!(err.to_string().contains("Config validation failed"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BackupConfig::load(dir.path().join("missing.yml")).unwrap_err();
        assert!(err.to_string().contains("Open config failed"));
    }

    #[test]
    fn test_serialized_config_hides_password() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackupConfig::load(write_config(dir.path(), CONFIG_YAML)).unwrap();

        let serialized = serde_json::to_string(&config).unwrap();
        assert!(!serialized.contains("secret"));
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn test_load_example_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("backup.example.yml");
        let config = BackupConfig::load(path).unwrap();

        let recipients = config.recipients().resolve();
        assert_eq!(recipients.to.len(), 1);
        assert_eq!(recipients.cc.len(), 1);
        assert_eq!(recipients.bcc.len(), 1);
        assert_eq!(config.mysqldump().extra_args().len(), 2);
        assert_eq!(config.smtp().port(), &465);
    }

    #[test]
    fn test_date_at_uses_offset() {
        let dir = tempfile::tempdir().unwrap();
        let config = BackupConfig::load(write_config(dir.path(), CONFIG_YAML)).unwrap();

        // 2024-01-01 20:00 UTC is already 2024-01-02 in +08:00
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap();
        assert_eq!(
            config.date_at(now).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }
}
