use super::{Job, Trigger, TriggerError};
use std::sync::mpsc::Sender;

/// A trigger that sweeps once and then exits.
///
/// Useful to run from a cronjob instead of a long running process.
pub struct OnceTrigger;

impl Trigger for OnceTrigger {
    /// Starts a trigger that sweeps once and terminates after.
    fn listen(&self, tx: Sender<Option<Job>>) -> Result<(), TriggerError> {
        tx.send(Some(Job::Sweep))?;
        tx.send(None)?;
        Ok(())
    }
}
