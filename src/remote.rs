use crate::{
    command::{CommandError, CommandRunner, Task},
    event::is_branch_name,
};
use log::{debug, warn};
use std::path::Path;

/// List the branches of the remote with `git ls-remote --heads`.
///
/// The order of the remote is kept, duplicates are only returned once.
pub fn list_remote_branches<R>(
    runner: &R,
    remote_url: &str,
    directory: &Path,
) -> Result<Vec<String>, CommandError>
where
    R: CommandRunner + ?Sized,
{
    let task = Task::new(["ls-remote", "--heads", remote_url], directory);
    let output = runner.read(&task)?;

    let branches = parse_heads(&output);
    debug!("Found {} branches on {remote_url}.", branches.len());

    Ok(branches)
}

/// Parse the output of `git ls-remote --heads`, lines of `<sha>\trefs/heads/<name>`,
/// keeping the segment after the last slash. Names git would read as options are skipped.
pub fn parse_heads(output: &str) -> Vec<String> {
    let mut branches: Vec<String> = vec![];
    for line in output.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match line.rsplit_once('/') {
            Some((_, name)) if is_branch_name(name) => {
                if !branches.iter().any(|branch| branch == name) {
                    branches.push(String::from(name));
                }
            }
            _ => warn!("Cannot parse branch from {line:?}, skipping."),
        }
    }

    branches
}
