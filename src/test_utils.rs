use duct::cmd;
use rand::distributions::{Alphanumeric, DistString};
use std::{error::Error, fs, path::Path};

pub fn get_random_id() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), 16)
}

/// Create an empty base directory with a directory for every branch.
pub fn create_base_dir(branches: &[&str]) -> Result<String, Box<dyn Error>> {
    let id = get_random_id();
    let base_dir = format!("test_directories/{id}");

    fs::create_dir_all(&base_dir)?;
    for branch in branches {
        fs::create_dir(format!("{base_dir}/{branch}"))?;
    }

    Ok(base_dir)
}

/// Create a bare repository with a commit on each branch, returning its absolute path.
pub fn create_remote(branches: &[&str]) -> Result<String, Box<dyn Error>> {
    let id = get_random_id();
    let remote = format!("test_directories/{id}-remote");
    let work = format!("test_directories/{id}-work");

    fs::create_dir_all(&remote)?;
    cmd!("git", "init", "--bare").dir(&remote).read()?;
    let remote = fs::canonicalize(&remote)?.to_string_lossy().to_string();

    cmd!("git", "clone", &remote, &work).read()?;
    for branch in branches {
        fs::write(format!("{work}/{branch}"), branch)?;
        cmd!("git", "add", "-A").dir(&work).read()?;
        cmd!(
            "git",
            "-c",
            "user.name=test",
            "-c",
            "user.email=test@example.com",
            "commit",
            format!("-m{branch}")
        )
        .dir(&work)
        .read()?;
        cmd!("git", "push", "origin", format!("HEAD:refs/heads/{branch}"))
            .dir(&work)
            .read()?;
    }
    if let Some(first) = branches.first() {
        cmd!("git", "symbolic-ref", "HEAD", format!("refs/heads/{first}"))
            .dir(&remote)
            .read()?;
    }
    fs::remove_dir_all(&work)?;

    Ok(remote)
}

/// Delete a branch from the remote repository.
pub fn delete_remote_branch(remote: &str, branch: &str) -> Result<(), Box<dyn Error>> {
    cmd!("git", "branch", "-D", branch).dir(remote).read()?;

    Ok(())
}

pub fn cleanup_directory(path: &str) -> Result<(), Box<dyn Error>> {
    if Path::new(path).exists() {
        fs::remove_dir_all(path)?;
    }

    Ok(())
}
