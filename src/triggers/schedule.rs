use super::{Job, Trigger, TriggerError};
use duration_string::DurationString;
use log::{debug, info};
use std::{
    sync::mpsc::{SendError, Sender},
    thread::sleep,
    time::{Duration, Instant},
};
use thiserror::Error;

/// A trigger that sweeps periodically.
///
/// This is running in an infinite loop, the first sweep starts immediately.
pub struct ScheduleTrigger {
    duration: Duration,
    timeout: Option<Duration>,
}

/// Custom error describing the error cases for the ScheduleTrigger.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Cannot send trigger with Sender. This usually because the receiver is dropped.
    #[error("cannot send jobs, receiver hang up")]
    ReceiverHangup(#[from] SendError<Option<Job>>),
}

impl From<ScheduleError> for TriggerError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::ReceiverHangup(s) => TriggerError::ReceiverHangup(s),
        }
    }
}

impl ScheduleTrigger {
    /// Creates a new ScheduleTrigger with duration.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            timeout: None,
        }
    }

    /// Creates a new ScheduleTrigger with duration and timeout.
    #[cfg(test)]
    pub(crate) fn new_with_timeout(duration: Duration, timeout: Duration) -> Self {
        Self {
            duration,
            timeout: Some(timeout),
        }
    }

    /// Runs one step in the scheduled time process. Returns true, if it should continue,
    /// returns false in case of an error or a timeout. One step should take exactly the duration.
    /// In case of an error it terminates or if it will reach the final timeout it will
    /// wait until the end of the timeout and returns with false.
    pub fn step(
        &self,
        tx: &Sender<Option<Job>>,
        final_timeout: Option<Instant>,
    ) -> Result<bool, ScheduleError> {
        let next_check = Instant::now() + self.duration;
        debug!("Scheduling a sweep.");
        tx.send(Some(Job::Sweep))?;

        if let Some(final_timeout) = final_timeout {
            if next_check > final_timeout {
                let until_final_timeout = final_timeout.saturating_duration_since(Instant::now());
                sleep(until_final_timeout);
                return Ok(false);
            }
        }

        // Sweeps queued behind a slow one are merged by the dispatcher
        let until_next_check = next_check.saturating_duration_since(Instant::now());
        sleep(until_next_check);
        Ok(true)
    }
}

impl Trigger for ScheduleTrigger {
    /// Starts a scheduled trigger on a new thread, starting the steps in a loop.
    /// Every step sends a sweep and then waits the given duration. In case of an error,
    /// it terminates or if it will reach the final timeout it will wait until
    /// the end of the timeout and return.
    fn listen(&self, tx: Sender<Option<Job>>) -> Result<(), TriggerError> {
        let final_timeout = self.timeout.map(|t| Instant::now() + t);
        info!(
            "Starting schedule in every {}.",
            DurationString::new(self.duration)
        );

        loop {
            let should_continue = self.step(&tx, final_timeout)?;
            if !should_continue {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, sync::mpsc, time::Instant};

    #[test]
    fn it_should_be_created_from_duration() {
        let trigger = ScheduleTrigger::new(Duration::from_millis(100));
        assert_eq!(Duration::from_millis(100), trigger.duration);
        assert_eq!(None, trigger.timeout);
    }

    #[test]
    fn it_should_be_created_from_duration_and_timeout() {
        let trigger = ScheduleTrigger::new_with_timeout(
            Duration::from_millis(100),
            Duration::from_millis(200),
        );
        assert_eq!(Duration::from_millis(100), trigger.duration);
        assert_eq!(Some(Duration::from_millis(200)), trigger.timeout);
    }

    #[test]
    fn it_should_sweep_every_100_ms() -> Result<(), Box<dyn Error>> {
        let trigger = ScheduleTrigger::new(Duration::from_millis(100));
        let (tx, rx) = mpsc::channel::<Option<Job>>();

        for _ in 0..5 {
            let start = Instant::now();

            let should_continue = trigger.step(&tx, None)?;
            assert!(should_continue);

            // It should be close to the timings
            let msg = rx.recv()?;
            assert!(matches!(msg, Some(Job::Sweep)), "{msg:?} should be a sweep");
            let diff = start.elapsed();
            assert!(diff >= Duration::from_millis(95));
            assert!(diff <= Duration::from_millis(150));
        }

        Ok(())
    }

    #[test]
    fn it_should_not_continue_after_the_timeout() -> Result<(), Box<dyn Error>> {
        let trigger = ScheduleTrigger::new(Duration::from_millis(100));
        let (tx, _rx) = mpsc::channel::<Option<Job>>();

        let final_timeout = Instant::now() + Duration::from_millis(350);
        for i in 0..5 {
            let should_continue = trigger.step(&tx, Some(final_timeout))?;

            // First three should pass, last two fail
            if i < 3 {
                assert!(should_continue)
            } else {
                assert!(!should_continue)
            };
        }

        Ok(())
    }

    #[test]
    fn it_should_stop_listening_at_the_timeout() -> Result<(), Box<dyn Error>> {
        let trigger = ScheduleTrigger::new_with_timeout(
            Duration::from_millis(100),
            Duration::from_millis(250),
        );
        let (tx, rx) = mpsc::channel::<Option<Job>>();

        trigger.listen(tx)?;

        let sweeps = rx.iter().filter(|msg| matches!(msg, Some(Job::Sweep))).count();
        assert_eq!(3, sweeps);

        Ok(())
    }

    #[test]
    fn it_should_not_trigger_on_a_send_error() {
        let trigger = ScheduleTrigger::new(Duration::from_millis(100));
        let (tx, rx) = mpsc::channel::<Option<Job>>();

        // Close receiving end, to create a send error
        drop(rx);

        let final_timeout = Instant::now() + Duration::from_millis(350);
        let result = trigger.step(&tx, Some(final_timeout));

        // It should fail, because of ReceiverHangup
        assert!(
            matches!(result, Err(ScheduleError::ReceiverHangup(_))),
            "{result:?} should be ReceiverHangup"
        );
    }
}
