//! Integration tests for error translation against a real repository.
//!
//! Every failing engine call must surface a typed error carrying the
//! failure class, the originating failure domain, and a message.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use grapple::{ErrorClass, ErrorCode, ObjectKind, Repository};

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A repository with one commit.
fn committed_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init", "-q"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["config", "user.name", "Test User"]);
    std::fs::write(dir.path().join("file.txt"), "content\n").unwrap();
    run_git(dir.path(), &["add", "file.txt"]);
    run_git(dir.path(), &["commit", "-q", "-m", "one"]);
    let repo = Repository::open(dir.path()).unwrap();
    (dir, repo)
}

#[test]
fn open_missing_repository_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = Repository::open(dir.path()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(!err.message().is_empty());
}

#[test]
fn missing_reference_is_not_found_in_reference_domain() {
    let (_dir, repo) = committed_repo();
    let err = repo.find_reference("refs/heads/does-not-exist").unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.class(), ErrorClass::Reference);
    assert!(!err.message().is_empty());
}

#[test]
fn unborn_head_is_typed() {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init", "-q"]);
    let repo = Repository::open(dir.path()).unwrap();

    assert!(repo.is_empty().unwrap());
    let err = repo.head().unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnbornBranch);
}

#[test]
fn invalid_refname_is_invalid_spec() {
    let (_dir, repo) = committed_repo();
    let head = repo.head().unwrap().target().unwrap();
    let err = repo
        .reference("not a valid name", head, false, "nope")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidSpec);
}

#[test]
fn second_failure_replaces_first() {
    let (_dir, repo) = committed_repo();
    let head = repo.head().unwrap().target().unwrap();

    let first = repo.find_reference("refs/heads/missing").unwrap_err();
    assert_eq!(first.code(), ErrorCode::NotFound);

    let second = repo
        .reference("also not valid", head, false, "nope")
        .unwrap_err();
    // The second failure reflects the second call, never a stale slot.
    assert_eq!(second.code(), ErrorCode::InvalidSpec);
    assert_ne!(second.message(), first.message());
}

#[test]
fn wrong_kind_downcast_is_invalid() {
    let (_dir, repo) = committed_repo();
    let object = repo.revparse_single("HEAD").unwrap();
    assert_eq!(object.kind(), Some(ObjectKind::Commit));

    let err = object.into_blob().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Invalid);
    assert_eq!(err.class(), ErrorClass::Invalid);
    assert_eq!(err.message(), "object is not a blob");
}

#[test]
fn revparse_garbage_is_typed() {
    let (_dir, repo) = committed_repo();
    let err = repo.revparse_single("does-not-exist").unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(!err.message().is_empty());
}

#[test]
fn missing_object_lookup_is_not_found() {
    let (_dir, repo) = committed_repo();
    let absent =
        grapple::Oid::from_hex("0123456789abcdef0123456789abcdef01234567").unwrap();
    let err = repo.find_commit(absent).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.class(), ErrorClass::Odb);
}
