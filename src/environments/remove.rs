use super::Environments;
use crate::{command::CommandRunner, outcome::Outcome};
use log::{debug, error, info, warn};

impl<R: CommandRunner> Environments<R> {
    /// Delete the checkout of the branch, then verify that it is gone.
    ///
    /// Removing a branch that has no checkout succeeds.
    pub fn remove(&self, branch: &str) -> Outcome {
        debug!("Removing branch {branch}.");

        if let Err(err) = self.store.delete(branch) {
            warn!(
                "Deleting {} failed: {err}.",
                self.store.path_for(branch).display()
            );
        }

        if self.store.exists(branch) {
            let message = format!("Failed to remove branch {branch} from path");
            error!("{message}.");
            Outcome::server_error(message)
        } else {
            let message = format!("Removed branch {branch} from environment");
            info!("{message}.");
            Outcome::success(message)
        }
    }
}
