use crate::{event::PushEvent, outcome::Outcome};
use mockall::automock;
use std::sync::mpsc::{SendError, Sender};
use thiserror::Error;

/// A trigger that runs on an HTTP request.
pub mod http;
/// A trigger that sweeps once and then exits.
pub mod once;
/// A trigger that sweeps periodically.
pub mod schedule;
/// A trigger that terminates the program on a signal.
pub mod signal;

/// The work a trigger asks the dispatcher to do.
#[derive(Debug)]
pub enum Job {
    /// Reconcile every branch with the remote.
    Sweep,
    /// Handle a push event and send the outcome back on the reply channel.
    Push {
        event: PushEvent,
        reply: Sender<Outcome>,
    },
}

/// A custom error for describing the error cases for triggers
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Cannot initialize trigger, because it has a misconfiguration.
    #[error("not configured correctly: {0}")]
    Misconfigured(String),
    /// Cannot send trigger with Sender. This usually because the receiver is dropped.
    #[error("cannot send jobs, receiver hang up")]
    ReceiverHangup(#[from] SendError<Option<Job>>),
    /// Running the trigger failed.
    #[error("{0}")]
    FailedTrigger(String),
}

/// A trigger is a long running background process, which sends jobs to the dispatcher.
///
/// Sending `None` stops the dispatcher.
///
/// Triggers may include:
///   - schedules ([schedule::ScheduleTrigger])
///   - HTTP servers ([http::HttpTrigger])
///   - etc.
#[automock]
pub trait Trigger: Sync + Send {
    /// Start the trigger process.
    fn listen(&self, tx: Sender<Option<Job>>) -> Result<(), TriggerError>;
}
