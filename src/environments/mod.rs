use crate::{
    command::CommandRunner,
    config::Config,
    event::{PushEvent, Route},
    outcome::Outcome,
    store::BranchStore,
};
use log::{debug, warn};

/// Refreshing the checkout of one branch.
mod reconcile;
/// Removing the checkout of one branch.
mod remove;
/// Reconciling every branch against the remote.
mod sweep;

pub use sweep::SweepError;

/// The checkouts under the base directory, one for every branch of the remote.
///
/// Every operation runs synchronously and reports an [Outcome] instead of failing,
/// so a broken branch never stops the others from being refreshed.
pub struct Environments<R> {
    config: Config,
    store: BranchStore,
    runner: R,
}

impl<R: CommandRunner> Environments<R> {
    pub fn new(config: Config, runner: R) -> Self {
        let store = BranchStore::new(config.base_dir());
        Environments {
            config,
            store,
            runner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &BranchStore {
        &self.store
    }

    /// Validate a push event and refresh or remove the branch it names.
    pub fn handle(&self, event: &PushEvent) -> Outcome {
        debug!(
            "Received {} event on {:?} ({:?} -> {:?}).",
            event.object_kind.as_deref().unwrap_or("unknown"),
            event.reference,
            event.before,
            event.after
        );

        match event.route(self.config.remote_url()) {
            Ok(Route::Reconcile(branch)) => self.reconcile(&branch),
            Ok(Route::Remove(branch)) => self.remove(&branch),
            Err(err) => {
                warn!("Rejected event: {err}.");
                Outcome::bad_request(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command::MockCommandRunner,
        event::{Repository, DELETED_REVISION},
        outcome::Status,
        test_utils::{cleanup_directory, create_base_dir},
    };
    use mockall::Sequence;
    use std::{error::Error, fs};

    const REMOTE_URL: &str = "git@example/repo";

    fn push_event(object_kind: &str, reference: &str, after: &str) -> PushEvent {
        PushEvent {
            object_kind: Some(String::from(object_kind)),
            repository: Some(Repository {
                url: Some(String::from(REMOTE_URL)),
            }),
            reference: Some(String::from(reference)),
            before: None,
            after: Some(String::from(after)),
        }
    }

    #[test]
    fn it_should_reject_merge_requests_without_side_effects() -> Result<(), Box<dyn Error>> {
        let base_dir = create_base_dir(&["main"])?;
        // No expectations: any command would fail the test
        let runner = MockCommandRunner::new();
        let environments = Environments::new(Config::new(REMOTE_URL, &base_dir), runner);

        let outcome = environments.handle(&push_event(
            "merge_request",
            "refs/heads/main",
            DELETED_REVISION,
        ));

        assert_eq!(Status::BadRequest, outcome.status());
        assert_eq!("Missing or unsupported object_kind", outcome.message());
        assert!(environments.store().exists("main"));

        cleanup_directory(&base_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_remove_deleted_branches_even_if_checked_out() -> Result<(), Box<dyn Error>> {
        let base_dir = create_base_dir(&["main"])?;
        fs::create_dir(format!("{base_dir}/main/.git"))?;
        fs::write(format!("{base_dir}/main/.git/HEAD"), "ref: refs/heads/main")?;
        let runner = MockCommandRunner::new();
        let environments = Environments::new(Config::new(REMOTE_URL, &base_dir), runner);

        let outcome =
            environments.handle(&push_event("push", "refs/heads/main", DELETED_REVISION));

        assert!(outcome.is_success(), "{outcome:?} should be a success");
        assert_eq!("Removed branch main from environment", outcome.message());
        assert!(!environments.store().exists("main"));

        cleanup_directory(&base_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_reconcile_pushed_branches() -> Result<(), Box<dyn Error>> {
        let base_dir = create_base_dir(&[])?;
        let mut runner = MockCommandRunner::new();
        let mut seq = Sequence::new();
        for subcommand in ["clone", "checkout", "pull", "submodule"] {
            runner
                .expect_run()
                .withf(move |task| task.subcommand() == Some(subcommand))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }
        let environments = Environments::new(Config::new(REMOTE_URL, &base_dir), runner);

        let outcome = environments.handle(&push_event(
            "push",
            "refs/heads/feature-x",
            "da1560886d4f094c3e6c9ef40349f7d38b5d27d7",
        ));

        assert!(outcome.is_success(), "{outcome:?} should be a success");
        assert!(outcome.message().contains("feature-x"));

        cleanup_directory(&base_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_reject_other_repositories() {
        let runner = MockCommandRunner::new();
        let environments =
            Environments::new(Config::new("git@example/other", "/srv/envs"), runner);

        let outcome = environments.handle(&push_event("push", "refs/heads/main", "abc123"));

        assert_eq!(400, outcome.status_code());
        assert_eq!("Repository missing or not configured", outcome.message());
    }
}
