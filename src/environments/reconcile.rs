use super::Environments;
use crate::{
    command::{CommandError, CommandRunner, Task},
    outcome::Outcome,
};
use log::{debug, error, info};

impl<R: CommandRunner> Environments<R> {
    /// The steps that bring the checkout of the branch up to date.
    ///
    /// A missing checkout is cloned first into the base directory. The branch is
    /// checked out before pulling, so the pull always lands on the right branch.
    /// The `--` separators keep git from reading the remote or the branch as options.
    pub fn tasks(&self, branch: &str) -> Vec<Task> {
        let code_dir = self.store.path_for(branch);

        let mut tasks = vec![];
        if !code_dir.exists() {
            tasks.push(Task::new(
                ["clone", "--", self.config.remote_url(), branch],
                self.store.base_dir(),
            ));
        }
        tasks.push(Task::new(["checkout", branch, "--"], &code_dir));
        tasks.push(Task::new(["pull"], &code_dir));
        tasks.push(Task::new(
            ["submodule", "update", "--init", "--recursive"],
            &code_dir,
        ));

        tasks
    }

    fn reconcile_inner(&self, branch: &str) -> Result<(), CommandError> {
        for task in self.tasks(branch) {
            self.runner.run(&task)?;
        }

        Ok(())
    }

    /// Clone (if needed), checkout, pull and update the submodules of the branch.
    ///
    /// The first failing step stops the reconciliation; whatever it left on disk stays.
    pub fn reconcile(&self, branch: &str) -> Outcome {
        debug!("Refreshing branch {branch}.");

        match self.reconcile_inner(branch) {
            Ok(()) => {
                let message = format!("Refreshed branch {branch}");
                info!("{message}.");
                Outcome::success(message)
            }
            Err(err) => {
                error!("{err}.");
                Outcome::server_error(err.to_string())
            }
        }
    }
}
