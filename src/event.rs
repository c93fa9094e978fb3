use serde::Deserialize;
use thiserror::Error;

/// The revision sent as `after` when a branch was deleted.
pub const DELETED_REVISION: &str = "0000000000000000000000000000000000000000";

const PUSH_KIND: &str = "push";

/// A push event, as sent by the webhook of the git host.
///
/// Every field is optional: missing fields are reported by [PushEvent::route]
/// in a fixed order, not while decoding. Unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PushEvent {
    pub object_kind: Option<String>,
    pub repository: Option<Repository>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub url: Option<String>,
}

/// What a valid push event asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// The branch was updated or created, refresh its checkout.
    Reconcile(String),
    /// The branch was deleted, remove its checkout.
    Remove(String),
}

/// A custom error describing why an event is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Missing or unsupported object_kind")]
    UnsupportedObjectKind,
    #[error("Repository missing or not configured")]
    UnknownRepository,
    #[error("missing or invalid ref")]
    InvalidRef,
}

/// Check if a name can be used as a branch directory and as a git argument.
///
/// Dot segments would leave the base directory, and a leading dash would be
/// read by git as an option.
pub fn is_branch_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.starts_with('-')
}

/// Take the branch name from the segment after the last slash of a ref.
pub fn branch_from_ref(reference: &str) -> Option<&str> {
    let (_, branch) = reference.rsplit_once('/')?;
    is_branch_name(branch).then_some(branch)
}

impl PushEvent {
    /// Validate the event against the configured remote and decide what to do.
    pub fn route(&self, remote_url: &str) -> Result<Route, EventError> {
        if self.object_kind.as_deref() != Some(PUSH_KIND) {
            return Err(EventError::UnsupportedObjectKind);
        }

        let url = self
            .repository
            .as_ref()
            .and_then(|repository| repository.url.as_deref());
        if url != Some(remote_url) {
            return Err(EventError::UnknownRepository);
        }

        let branch = self
            .reference
            .as_deref()
            .and_then(branch_from_ref)
            .ok_or(EventError::InvalidRef)?;

        if self.after.as_deref() == Some(DELETED_REVISION) {
            Ok(Route::Remove(String::from(branch)))
        } else {
            Ok(Route::Reconcile(String::from(branch)))
        }
    }
}
