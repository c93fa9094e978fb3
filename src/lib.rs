//! Keep a directory of environments in sync with the branches of a git remote.
//!
//! ## How it works
//!
//! Every branch of the configured remote is mirrored as one checkout under a
//! base directory (`<base_dir>/<branch>`). **Triggers** (a webhook listener,
//! a periodic schedule, ...) produce **jobs**, which are executed one at a time
//! by the dispatcher against the [environments](environments::Environments):
//! a push event refreshes or removes a single branch, a sweep compares the
//! local directories with the remote branch list and reconciles all of them.
//!
//! ```ignore
//! +---------+       +------------+       +--------------+       +-----+
//! | trigger | ----> | dispatcher | ----> | environments | ----> | git |
//! +---------+       +------------+       +--------------+       +-----+
//! ```
//!

/// Running git commands in a working directory.
pub mod command;
/// The immutable configuration shared by every component.
pub mod config;
/// Reconciling, removing and sweeping branch checkouts.
pub mod environments;
/// The push event received from the webhook and its validation.
pub mod event;
/// The result of a single operation, as reported to the caller.
pub mod outcome;
/// Listing the branches of the remote repository.
pub mod remote;
/// The main program loop, that executes the jobs sent by the triggers.
pub mod start;
/// Mapping branches to directories under the base directory.
pub mod store;
/// A trigger is a long running background process, which sends jobs to the dispatcher
/// (e.g. [on a schedule](triggers::schedule::ScheduleTrigger), [on HTTP request](triggers::http::HttpTrigger)
/// or [once](triggers::once::OnceTrigger)).
pub mod triggers;

#[cfg(test)]
pub(crate) mod test_utils;
