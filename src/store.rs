use log::{trace, warn};
use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// A custom error describing the error cases of the branch directories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The base directory cannot be listed.
    #[error("cannot list {0}: {1}")]
    CannotList(String, io::Error),
}

/// Maps branch names to their checkouts under the base directory.
///
/// The filesystem is the only source of truth: a branch is present locally
/// if and only if its directory exists.
#[derive(Clone, Debug)]
pub struct BranchStore {
    base_dir: PathBuf,
}

impl BranchStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        BranchStore {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, branch: &str) -> PathBuf {
        self.base_dir.join(branch)
    }

    pub fn exists(&self, branch: &str) -> bool {
        self.path_for(branch).exists()
    }

    /// List the branches that have a directory under the base directory.
    ///
    /// Plain files are not branches, and names that are not valid UTF-8 are skipped.
    pub fn list_local_branches(&self) -> Result<BTreeSet<String>, StoreError> {
        let list_error =
            |err: io::Error| StoreError::CannotList(self.base_dir.display().to_string(), err);

        let mut branches = BTreeSet::new();
        for entry in fs::read_dir(&self.base_dir).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            if !entry.path().is_dir() {
                trace!("Skipping {}, it is not a directory.", entry.path().display());
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => {
                    branches.insert(name);
                }
                Err(name) => {
                    warn!(
                        "Skipping {}, it is not a valid branch name.",
                        name.to_string_lossy()
                    );
                }
            }
        }

        Ok(branches)
    }

    /// Recursively delete the directory of the branch. A missing directory is not an error.
    pub fn delete(&self, branch: &str) -> io::Result<()> {
        match fs::remove_dir_all(self.path_for(branch)) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{cleanup_directory, create_base_dir};
    use std::error::Error;

    #[test]
    fn it_should_join_the_branch_to_the_base_dir() {
        let store = BranchStore::new("/srv/envs");

        assert_eq!(PathBuf::from("/srv/envs/main"), store.path_for("main"));
    }

    #[test]
    fn it_should_check_if_the_branch_exists() -> Result<(), Box<dyn Error>> {
        let base_dir = create_base_dir(&["main"])?;
        let store = BranchStore::new(&base_dir);

        assert!(store.exists("main"));
        assert!(!store.exists("feature"));

        cleanup_directory(&base_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_list_only_directories() -> Result<(), Box<dyn Error>> {
        let base_dir = create_base_dir(&["main", "feature"])?;
        fs::write(format!("{base_dir}/README"), "not a branch")?;
        let store = BranchStore::new(&base_dir);

        let branches = store.list_local_branches()?;
        assert_eq!(
            BTreeSet::from([String::from("feature"), String::from("main")]),
            branches
        );

        cleanup_directory(&base_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_fail_listing_a_missing_base_dir() {
        let store = BranchStore::new("/path/to/nowhere");

        let result = store.list_local_branches();
        assert!(
            matches!(result, Err(StoreError::CannotList(_, _))),
            "{result:?} should be CannotList"
        );
    }

    #[test]
    fn it_should_delete_a_directory_recursively() -> Result<(), Box<dyn Error>> {
        let base_dir = create_base_dir(&["main"])?;
        fs::create_dir_all(format!("{base_dir}/main/nested/deep"))?;
        fs::write(format!("{base_dir}/main/nested/deep/file"), "1")?;
        let store = BranchStore::new(&base_dir);

        store.delete("main")?;
        assert!(!store.exists("main"));

        cleanup_directory(&base_dir)?;

        Ok(())
    }

    #[test]
    fn it_should_delete_a_missing_directory() -> Result<(), Box<dyn Error>> {
        let base_dir = create_base_dir(&[])?;
        let store = BranchStore::new(&base_dir);

        store.delete("main")?;

        cleanup_directory(&base_dir)?;

        Ok(())
    }
}
