//! Git helper utilities for integration tests.
//!
//! Provides functions to create bare repos, commit files, create branches,
//! and push to remotes -- all using the `git` CLI for offline testing.

use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

static STAGING_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Initialize a bare git repository at the given path.
pub fn init_bare_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    let status = Command::new("git")
        .args(["init", "--bare", "-b", "main"])
        .current_dir(path)
        .output()
        .expect("failed to init bare repo");
    assert!(
        status.status.success(),
        "git init --bare failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
}

/// Initialize a non-bare git repository with user config.
pub fn init_repo(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "-b", "main"]);
    configure_identity(path);
}

/// Create a file, stage, and commit it. Returns the commit hash.
pub fn commit_file(repo_path: &Path, filename: &str, content: &str, message: &str) -> String {
    fs::write(repo_path.join(filename), content).unwrap();
    git(repo_path, &["add", filename]);
    git(repo_path, &["commit", "-m", message]);
    get_head_sha(repo_path)
}

/// Commit a file directly to `branch` of a bare remote, through a throwaway
/// clone. Returns the new commit hash.
pub fn commit_to_remote(bare: &Path, branch: &str, filename: &str, content: &str) -> String {
    let n = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    let parent = bare.parent().unwrap();
    let staging = parent.join(format!("staging-push-{}", n));
    let url = file_url(bare);
    clone_repo(&url, &staging);
    checkout(&staging, branch);
    let sha = commit_file(&staging, filename, content, &format!("Update {}", filename));
    git(&staging, &["push", "origin", branch]);
    fs::remove_dir_all(&staging).unwrap();
    sha
}

/// Checkout an existing branch.
pub fn checkout(repo_path: &Path, branch_name: &str) {
    git(repo_path, &["checkout", branch_name]);
}

/// Push with set-upstream.
pub fn push_upstream(repo_path: &Path, remote: &str, branch: &str) {
    git(repo_path, &["push", "-u", remote, branch]);
}

/// Add a remote to a repository.
pub fn add_remote(repo_path: &Path, name: &str, url: &str) {
    git(repo_path, &["remote", "add", name, url]);
}

/// Point an existing remote at another URL.
pub fn set_remote_url(repo_path: &Path, name: &str, url: &str) {
    git(repo_path, &["remote", "set-url", name, url]);
}

/// Get the URL of a remote.
pub fn remote_url(repo_path: &Path, name: &str) -> String {
    git_output(repo_path, &["remote", "get-url", name])
}

/// Fetch a remote.
pub fn fetch(repo_path: &Path, remote: &str) {
    git(repo_path, &["fetch", remote]);
}

/// Create a branch in a bare repository from an existing one.
pub fn branch_in_bare(bare: &Path, new_branch: &str, from: &str) {
    git(bare, &["branch", new_branch, from]);
}

/// Force-delete a local branch.
pub fn delete_branch(repo_path: &Path, branch_name: &str) {
    git(repo_path, &["branch", "-D", branch_name]);
}

/// Get the current branch name (empty when detached).
pub fn current_branch(repo_path: &Path) -> String {
    git_output(repo_path, &["branch", "--show-current"])
}

/// Detach HEAD at the current commit.
pub fn detach_head(repo_path: &Path) {
    git(repo_path, &["checkout", "--detach"]);
}

/// Get HEAD sha.
pub fn get_head_sha(repo_path: &Path) -> String {
    git_output(repo_path, &["rev-parse", "HEAD"])
}

/// Get the sha of any revision.
pub fn rev_parse(repo_path: &Path, rev: &str) -> String {
    git_output(repo_path, &["rev-parse", rev])
}

/// Number of commits reachable from HEAD.
pub fn commit_count(repo_path: &Path) -> usize {
    git_output(repo_path, &["rev-list", "--count", "HEAD"])
        .parse()
        .unwrap()
}

/// Check if a local branch exists.
pub fn branch_exists(repo_path: &Path, branch_name: &str) -> bool {
    Command::new("git")
        .args([
            "rev-parse",
            "--verify",
            &format!("refs/heads/{}", branch_name),
        ])
        .current_dir(repo_path)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Clone a repository from a URL (typically file://).
pub fn clone_repo(url: &str, dest: &Path) {
    let status = Command::new("git")
        .args(["clone", url, dest.to_str().unwrap()])
        .output()
        .expect("failed to clone repo");
    assert!(
        status.status.success(),
        "git clone failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
    // Configure git identity (CI runners may not have global config)
    configure_identity(dest);
}

/// Clone a repository as a bare repo, e.g. to play the role of a fork.
pub fn clone_bare(url: &str, dest: &Path) {
    let status = Command::new("git")
        .args(["clone", "--bare", url, dest.to_str().unwrap()])
        .output()
        .expect("failed to clone bare repo");
    assert!(
        status.status.success(),
        "git clone --bare failed: {}",
        String::from_utf8_lossy(&status.stderr)
    );
}

/// The file:// URL for a local repository path.
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

fn configure_identity(path: &Path) {
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test User"]);
}

/// Run a git command, panic on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Run a git command and return trimmed stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
