//! Validation functions for configuration values.

use chrono::FixedOffset;
use sanitize_filename::{is_sanitized, sanitize};
use validator::ValidationError;

use std::path::Path;

pub fn validate_valid_archive_base_name<S: AsRef<str>>(name: S) -> Result<(), ValidationError> {
    if !is_sanitized(name.as_ref()) {
        return Err(ValidationError::new("InvalidArchiveBaseName").with_message(
            format!(
                "Invalid file name, try sanitizing like {:?}",
                sanitize(name)
            )
            .into(),
        ));
    }

    Ok(())
}

/// The database list doubles as the archive base name, so it has to be a
/// usable file name once spaces become underscores.
pub fn validate_database_list<S: AsRef<str>>(databases: S) -> Result<(), ValidationError> {
    let databases = databases.as_ref();
    if databases.split_whitespace().next().is_none() {
        return Err(ValidationError::new("EmptyDatabaseList")
            .with_message("at least one database is required".into()));
    }

    validate_valid_archive_base_name(databases.replace(' ', "_"))
}

pub fn validate_utc_offset<S: AsRef<str>>(offset: S) -> Result<(), ValidationError> {
    let offset = offset.as_ref();
    offset.parse::<FixedOffset>().map(|_| ()).map_err(|e| {
        ValidationError::new("InvalidUtcOffset")
            .with_message(format!("Invalid utc offset {offset:?}: {e}").into())
    })
}

pub fn validate_dir_exist<P: AsRef<Path>>(dir: P) -> Result<(), ValidationError> {
    let dir = dir.as_ref();
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ValidationError::new("InvalidDirectory")
                .with_message(format!("{:?} is not a directory", dir).into()));
        }
    } else {
        return Err(ValidationError::new("InvalidDirectory")
            .with_message(format!("{:?} not found", dir).into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_database_list() {
        assert!(validate_database_list("db1").is_ok());
        assert!(validate_database_list("db1 db2").is_ok());
        assert!(validate_database_list("").is_err());
        assert!(validate_database_list("   ").is_err());
        assert!(validate_database_list("db1/../etc").is_err());
    }

    #[test]
    fn test_validate_utc_offset() {
        assert!(validate_utc_offset("+08:00").is_ok());
        assert!(validate_utc_offset("-05:30").is_ok());
        assert!(validate_utc_offset("Asia/Shanghai").is_err());
    }

    #[test]
    fn test_validate_dir_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_dir_exist(dir.path()).is_ok());
        assert!(validate_dir_exist(dir.path().join("missing")).is_err());

        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        assert!(validate_dir_exist(&file).is_err());
    }
}
