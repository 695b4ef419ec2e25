//! Dump file naming and the dump / archive / cleanup invocations.

use crate::backup::process::ExternalCommand;
use crate::backup::validate::validate_database_list;
use bon::Builder;
use chrono::NaiveDate;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

static DATE_STAMP_FORMAT: &str = "%Y%m%d";
static SQL_FILE_EXT: &str = "sql";
static ARCHIVE_FILE_EXT: &str = "tar.gz";
static TAR_PROGRAM: &str = "tar";
static RM_PROGRAM: &str = "rm";

/// How to invoke `mysqldump` (or a compatible tool)
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, Getters)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct MysqldumpConfig {
    #[serde(default = "default_program")]
    #[builder(default = default_program(), into)]
    program: PathBuf,
    /// Space separated, as given to `-B`
    #[validate(custom(function = validate_database_list))]
    #[builder(into)]
    databases: String,
    /// Fully qualified `db.table` names whose rows are left out
    #[serde(default)]
    #[builder(default, into)]
    ignore_table_data: Vec<String>,
    /// Passed before every other option, e.g. `--defaults-file=...`
    #[serde(default)]
    #[builder(default, into)]
    extra_args: Vec<String>,
}

fn default_program() -> PathBuf {
    PathBuf::from("mysqldump")
}

pub fn date_stamp(date: NaiveDate) -> String {
    date.format(DATE_STAMP_FORMAT).to_string()
}

/// `db1 db2` backed up on 2024-01-02 becomes `db1_db2-20240102`.
pub fn base_name<S: AsRef<str>>(databases: S, date_stamp: S) -> String {
    format!("{}-{}", databases.as_ref().replace(' ', "_"), date_stamp.as_ref())
}

/// Everything derived from [`MysqldumpConfig`] for a single run
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct DumpRequest {
    program: PathBuf,
    base_name: String,
    args: Vec<String>,
}

impl DumpRequest {
    pub fn new(config: &MysqldumpConfig, date: NaiveDate) -> Self {
        let mut args = config.extra_args.clone();
        args.push("-c".to_string());
        args.push("-B".to_string());
        args.extend(config.databases.split_whitespace().map(str::to_string));
        args.extend(
            config
                .ignore_table_data
                .iter()
                .map(|table| format!("--ignore-table-data={table}")),
        );

        Self {
            program: config.program.clone(),
            base_name: base_name(config.databases.as_str(), date_stamp(date).as_str()),
            args,
        }
    }

    pub fn sql_file_name(&self) -> String {
        format!("{}.{}", self.base_name, SQL_FILE_EXT)
    }

    pub fn archive_file_name(&self) -> String {
        format!("{}.{}", self.base_name, ARCHIVE_FILE_EXT)
    }

    pub fn dump_command(&self, work_dir: &Path) -> ExternalCommand {
        ExternalCommand::builder()
            .program(self.program.clone())
            .args(self.args.clone())
            .current_dir(work_dir)
            .stdout_file(self.sql_file_name())
            .build()
    }

    pub fn archive_command(&self, work_dir: &Path) -> ExternalCommand {
        ExternalCommand::builder()
            .program(TAR_PROGRAM)
            .args(vec![
                "zcf".to_string(),
                self.archive_file_name(),
                self.sql_file_name(),
            ])
            .current_dir(work_dir)
            .build()
    }

    pub fn cleanup_command(&self, work_dir: &Path) -> ExternalCommand {
        ExternalCommand::builder()
            .program(RM_PROGRAM)
            .args(vec!["-f".to_string(), self.sql_file_name()])
            .current_dir(work_dir)
            .build()
    }
}
