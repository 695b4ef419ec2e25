use clap::Parser;
use mysql_mail_backup::backup::backup_config::BackupConfig;
use mysql_mail_backup::backup::job::BackupJob;
use mysql_mail_backup::backup::process::SystemCommandRunner;
use mysql_mail_backup::backup::result_error::error::Error;
use mysql_mail_backup::backup::result_error::result::Result;
use mysql_mail_backup::backup::result_error::WithMsg;
use std::path::PathBuf;
use std::process::exit;
use tracing::error;

static DEFAULT_CONFIG_FILE: &str = "backup.yml";

/// Dump MySQL databases, mail the archive, then delete it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Location of config file [default: backup.yml next to the executable]
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn default_config_path() -> Result<PathBuf> {
    std::env::current_exe()
        .map(|exe| exe.with_file_name(DEFAULT_CONFIG_FILE))
        .map_err(Error::from)
        .with_msg("Cannot locate the executable to find the default config")
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let res = args
        .config
        .map(Ok)
        .unwrap_or_else(default_config_path)
        .and_then(BackupConfig::load)
        .and_then(|config| BackupJob::new(&config, &SystemCommandRunner, config.smtp()).run());

    let code = match res {
        Ok(_) => 0,
        Err(e) => {
            error!("failed, reason: {e}");
            1
        }
    };

    println!();
    println!();
    exit(code);
}
