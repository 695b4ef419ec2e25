//! # mysql-mail-backup
//!
//! Dumps MySQL databases with `mysqldump`, packs the dump into a
//! `.tar.gz`, mails the archive to a list of recipients and removes it
//! again. One run per invocation; schedule it with cron or a systemd timer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mysql_mail_backup::backup::backup_config::BackupConfig;
//! use mysql_mail_backup::backup::job::BackupJob;
//! use mysql_mail_backup::backup::process::SystemCommandRunner;
//!
//! let config = BackupConfig::load("backup.yml")?;
//! let archive = BackupJob::new(&config, &SystemCommandRunner, config.smtp()).run()?;
//! println!("sent {:?}", archive);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
