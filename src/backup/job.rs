//! The backup run: dump, archive, mail, clean up.

use crate::backup::backup_config::BackupConfig;
use crate::backup::dump::{date_stamp, DumpRequest};
use crate::backup::mail::message::MailMessage;
use crate::backup::mail::Mailer;
use crate::backup::process::CommandRunner;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::{chain_result, Result};
use crate::backup::result_error::WithMsg;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

static BODY_PREFIX: &str = "备份数据库：";

pub fn subject<S: AsRef<str>>(date: NaiveDate, label: S) -> String {
    format!("[{}]-{}", date_stamp(date), label.as_ref())
}

pub fn body<S: AsRef<str>>(databases: S) -> String {
    format!("{}{}", BODY_PREFIX, databases.as_ref())
}

pub struct BackupJob<'a, R: CommandRunner, M: Mailer> {
    config: &'a BackupConfig,
    runner: &'a R,
    mailer: &'a M,
}

impl<'a, R: CommandRunner, M: Mailer> BackupJob<'a, R, M> {
    pub fn new(config: &'a BackupConfig, runner: &'a R, mailer: &'a M) -> Self {
        Self {
            config,
            runner,
            mailer,
        }
    }

    /// Backs up today's databases. Returns the path of the archive that was
    /// mailed; it no longer exists on disk.
    pub fn run(&self) -> Result<PathBuf> {
        self.run_on(self.config.today()?)
    }

    pub fn run_on(&self, date: NaiveDate) -> Result<PathBuf> {
        let mysqldump = self.config.mysqldump();
        let work_dir = self.config.work_dir();
        let request = DumpRequest::new(mysqldump, date);

        info!("Dumping and compressing {:?}", mysqldump.databases());
        self.runner.exec(&request.dump_command(work_dir))?;
        self.runner.exec(&request.archive_command(work_dir))?;
        self.runner.exec(&request.cleanup_command(work_dir))?;
        let archive = work_dir.join(request.archive_file_name());

        let message = MailMessage::builder()
            .subject(subject(date, self.config.subject_label()))
            .body(body(mysqldump.databases()))
            .recipients(self.config.recipients())
            .attachments(vec![archive.clone()])
            .build();

        info!("Sending email {:?}", message.subject());
        let sent = self.mailer.send(&message);
        chain_result(sent, remove_archive(&archive))?;

        info!("Backup succeeded: {:?}", archive);
        Ok(archive)
    }
}

fn remove_archive(archive: &Path) -> Result<()> {
    info!("Removing {:?}", archive);
    std::fs::remove_file(archive)
        .map_err(Error::from)
        .with_msg(format!("Failed to remove archive {:?}", archive))
}
