use super::{Job, Trigger, TriggerError};
use log::{info, warn};
use std::sync::mpsc::Sender;

/// Shells report a process killed by a signal with this plus the signal number.
const SIGNAL_EXIT_BASE: i32 = 128;

/// Stops the dispatcher on SIGINT, SIGTERM or SIGQUIT.
///
/// The first signal stops gracefully: the running job finishes, nothing new starts.
/// A second signal exits right away with `128 + signal`.
#[derive(Debug, Default)]
pub struct SignalTrigger;

/// Follow the incoming signals. Returns the exit code if the process has to stop immediately.
fn follow_signals<I>(tx: &Sender<Option<Job>>, signals: I) -> Option<i32>
where
    I: IntoIterator<Item = i32>,
{
    let mut signals = signals.into_iter();

    let first = signals.next()?;
    info!("Got signal {first}, stopping after the running job.");
    if tx.send(None).is_err() {
        warn!("The dispatcher has already stopped.");
    }

    let second = signals.next()?;
    info!("Got signal {second} while stopping, exiting now.");
    Some(SIGNAL_EXIT_BASE + second)
}

impl Trigger for SignalTrigger {
    #[cfg(unix)]
    fn listen(&self, tx: Sender<Option<Job>>) -> Result<(), TriggerError> {
        use signal_hook::{consts::TERM_SIGNALS, iterator::Signals};

        let mut signals = Signals::new(TERM_SIGNALS).map_err(|err| {
            TriggerError::Misconfigured(format!("cannot register signal handlers, {err}"))
        })?;
        if let Some(code) = follow_signals(&tx, signals.forever()) {
            std::process::exit(code);
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn listen(&self, _tx: Sender<Option<Job>>) -> Result<(), TriggerError> {
        log::debug!("Signal handlers are not supported on non-unix systems.");

        Ok(())
    }
}
