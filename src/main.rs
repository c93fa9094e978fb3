use args::{parse_args, Args};
use envhook::{
    command::GitRunner,
    config::{Config, ConfigError},
    environments::Environments,
    start::{start, StartError},
    triggers::{
        http::HttpTrigger, once::OnceTrigger, schedule::ScheduleTrigger, signal::SignalTrigger,
        Trigger,
    },
};
use log::{debug, info};
use logger::init_logger;
use std::{process, time::Duration};
use thiserror::Error;

mod args;
mod logger;

/// A custom error for the errors that stop the program before it starts.
#[derive(Debug, Error)]
pub enum MainError {
    #[error("You have to pass the remote URL and the base directory.")]
    MissingArguments,
    #[error("Cannot parse the git command {0:?}.")]
    InvalidGitCommand(String),
    #[error("Invalid configuration: {0}.")]
    Misconfigured(#[from] ConfigError),
    #[error("Cannot set up the logger.")]
    FailedLogger(#[from] log::SetLoggerError),
    #[error(transparent)]
    FailedStart(#[from] StartError),
}

fn main_inner(args: Args) -> Result<(), MainError> {
    init_logger(&args)?;

    let (Some(remote_url), Some(base_dir)) = (args.remote_url, args.base_dir) else {
        return Err(MainError::MissingArguments);
    };
    let config = Config::new(remote_url, base_dir);
    config.validate()?;

    let runner = GitRunner::parse(&args.git).ok_or(MainError::InvalidGitCommand(args.git))?;
    debug!("Running git as {runner:?}.");

    // Setup triggers.
    let mut triggers: Vec<Box<dyn Trigger>> = vec![Box::new(SignalTrigger)];
    if args.once {
        triggers.push(Box::new(OnceTrigger));
    } else {
        let duration: Duration = args.delay.into();
        if !duration.is_zero() {
            triggers.push(Box::new(ScheduleTrigger::new(duration)));
        }
        triggers.push(Box::new(HttpTrigger::new(args.http)));
    }

    info!(
        "Syncing the branches of {} to {}.",
        config.remote_url(),
        config.base_dir().display()
    );
    let environments = Environments::new(config, runner);

    start(triggers, &environments)?;

    Ok(())
}

fn main() {
    let args = parse_args();
    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(err) = main_inner(args) {
        eprintln!("{err}");
        process::exit(1);
    }
}
