use super::Environments;
use crate::{
    command::{CommandError, CommandRunner},
    remote::list_remote_branches,
    store::StoreError,
};
use log::{debug, error, info};
use std::collections::BTreeSet;
use thiserror::Error;

/// A custom error describing why a sweep could not start.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The local branches cannot be listed.
    #[error("cannot list local branches, {0}")]
    LocalListing(#[from] StoreError),
    /// The remote branches cannot be listed, so nothing can be considered stale.
    #[error("cannot list remote branches, {0}")]
    RemoteListing(#[from] CommandError),
}

impl<R: CommandRunner> Environments<R> {
    fn sweep_inner(&self) -> Result<(), SweepError> {
        let local = self.store.list_local_branches()?;
        let remote = list_remote_branches(
            &self.runner,
            self.config.remote_url(),
            self.store.base_dir(),
        )?;

        let remote_set: BTreeSet<&str> = remote.iter().map(String::as_str).collect();
        let stale: Vec<&String> = local
            .iter()
            .filter(|branch| !remote_set.contains(branch.as_str()))
            .collect();
        debug!(
            "Found {} local, {} remote and {} stale branches.",
            local.len(),
            remote.len(),
            stale.len()
        );

        // Every removal finishes before the first reconciliation
        for branch in stale {
            self.remove(branch);
        }
        for branch in &remote {
            self.reconcile(branch);
        }

        Ok(())
    }

    /// Remove the checkouts of branches that are gone from the remote and reconcile
    /// every remote branch.
    ///
    /// A sweep never fails as a whole: the outcome of every branch is logged, and if
    /// the branches cannot be listed the sweep stops until the next one.
    pub fn sweep(&self) {
        info!("Attempting to refresh everything.");

        if let Err(err) = self.sweep_inner() {
            error!("Sweep stopped: {err}.");
        }
    }
}
