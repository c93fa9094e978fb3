use crate::{
    command::CommandRunner,
    environments::Environments,
    triggers::{Job, Trigger, TriggerError},
};
use log::{debug, error, warn};
use std::{
    sync::mpsc::{self, Receiver},
    thread,
};
use thiserror::Error;

/// A custom error implementation for the start function
#[derive(Debug, Error)]
pub enum StartError {
    #[error("You have to define at least one trigger.")]
    NoTriggers,
    #[error("Trigger failed: {0}.")]
    MisconfiguredTrigger(#[from] TriggerError),
}

/// Drain the sweeps waiting in the channel, the sweep about to run covers all of them.
///
/// Returns the first message that is not a sweep, if one is already waiting.
fn skip_queued_sweeps(rx: &Receiver<Option<Job>>) -> Option<Option<Job>> {
    let mut skipped = 0;
    let next = loop {
        match rx.try_recv() {
            Ok(Some(Job::Sweep)) => skipped += 1,
            Ok(message) => break Some(message),
            Err(_) => break None,
        }
    };
    if skipped > 0 {
        debug!("Skipped {skipped} queued sweeps.");
    }

    next
}

/// The main program loop, that executes the jobs of the triggers until one of them stops it.
///
/// Every trigger runs on its own thread, but the jobs are executed one at a time on
/// the current one: a sweep and a push event never touch the same checkout at once.
/// Sweeps that pile up behind a running job are merged into one.
pub fn start<R: CommandRunner>(
    triggers: Vec<Box<dyn Trigger>>,
    environments: &Environments<R>,
) -> Result<(), StartError> {
    let (tx, rx) = mpsc::channel::<Option<Job>>();

    if triggers.is_empty() {
        return Err(StartError::NoTriggers);
    }

    for trigger in triggers {
        let tx = tx.clone();
        thread::spawn(move || {
            let result = trigger.listen(tx);
            if let Err(err) = result {
                error!("Trigger failed: {err}.");
            }
        });
    }

    debug!("Waiting on triggers.");
    let mut pending: Option<Option<Job>> = None;
    loop {
        let message = match pending.take() {
            Some(message) => message,
            None => match rx.recv() {
                Ok(message) => message,
                Err(_) => break,
            },
        };

        match message {
            Some(Job::Sweep) => {
                pending = skip_queued_sweeps(&rx);
                environments.sweep();
            }
            Some(Job::Push { event, reply }) => {
                let outcome = environments.handle(&event);
                if reply.send(outcome).is_err() {
                    warn!("Cannot send the outcome, the request was dropped.");
                }
            }
            None => break,
        }
    }

    debug!("Finished running.");

    Ok(())
}
