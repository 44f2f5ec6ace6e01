//! `taskdeck` entry point.
//!
//! # Responsibility
//! - Resolve configuration, start file logging, and run the interactive
//!   session on stdin/stdout.
//! - Act as the single catch-all for unrecoverable errors.

use log::{error, info};
use std::error::Error;
use std::io;
use std::process::ExitCode;
use taskdeck_core::{init_logging, AppConfig, JsonFileTaskStore, Session};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={}", err);
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::resolve()?;

    // The task list stays usable without a log file.
    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = JsonFileTaskStore::new(&config.tasks_file);
    let stdin = io::stdin();
    let mut session = Session::start(store, stdin.lock(), io::stdout())?;
    session.run()?;

    info!("event=app_exit module=cli status=ok");
    Ok(())
}
