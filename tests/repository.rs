//! Integration tests for repository lifecycle, lookups, and objects.
//!
//! These tests use real git repositories created via tempfile to verify
//! the bindings against actual engine behavior.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use grapple::{Engine, ObjectKind, Oid, Repository, RepositoryState, Signature, StrArray};

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-q", "-m", "Initial commit"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn repo(&self) -> Repository {
        Repository::open(self.path()).expect("failed to open test repo")
    }

    /// Get HEAD's id using git directly.
    fn head_oid_raw(&self) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(self.path())
            .output()
            .expect("git rev-parse failed");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

// =============================================================================
// Opening and lifecycle
// =============================================================================

#[test]
fn open_valid_repository() {
    let fixture = TestRepo::new();
    assert!(Repository::open(fixture.path()).is_ok());
}

#[test]
fn discover_from_subdirectory() {
    let fixture = TestRepo::new();
    let subdir = fixture.path().join("sub");
    std::fs::create_dir(&subdir).unwrap();

    let repo = Repository::discover(&subdir).unwrap();
    assert!(!repo.is_bare());
    assert!(repo.workdir().is_some());
}

#[test]
fn init_plain_and_bare() {
    let dir = TempDir::new().unwrap();
    let plain = Repository::init(&dir.path().join("plain")).unwrap();
    assert!(!plain.is_bare());
    assert!(plain.is_empty().unwrap());

    let bare = Repository::init_bare(&dir.path().join("bare.git")).unwrap();
    assert!(bare.is_bare());
    assert!(bare.workdir().is_none());
}

#[test]
fn engine_version_reports() {
    let (major, _, _) = Engine::version().unwrap();
    assert!(major >= 1);
}

#[test]
fn state_is_clean() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    assert_eq!(repo.state(), RepositoryState::Clean);
    assert!(!repo.state().is_in_progress());
}

// =============================================================================
// HEAD and references
// =============================================================================

#[test]
fn head_matches_git() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();

    let head = repo.head().unwrap();
    assert!(head.is_branch());
    let target = head.target().unwrap();
    assert_eq!(target.to_string(), fixture.head_oid_raw());
    assert!(!repo.is_empty().unwrap());
    assert!(!repo.head_detached().unwrap());
}

#[test]
fn refname_to_id_resolves_head() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let id = repo.refname_to_id("HEAD").unwrap();
    assert_eq!(id.to_string(), fixture.head_oid_raw());
}

#[test]
fn symbolic_head_resolves() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();

    let head = repo.find_reference("HEAD").unwrap();
    assert_eq!(head.kind(), grapple::ReferenceKind::Symbolic);
    assert!(head.symbolic_target().unwrap().starts_with("refs/heads/"));

    let resolved = head.resolve().unwrap();
    assert_eq!(resolved.kind(), grapple::ReferenceKind::Direct);
    assert!(resolved.target().is_some());
}

#[test]
fn create_and_delete_reference() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let head_id = repo.head().unwrap().target().unwrap();

    let created = repo
        .reference("refs/tags/mark", head_id, false, "create mark")
        .unwrap();
    assert!(created.is_tag());
    assert_eq!(created.target(), Some(head_id));

    let names = repo.reference_names().unwrap();
    assert!(names.to_vec().iter().any(|n| n == "refs/tags/mark"));

    let mut again = repo.find_reference("refs/tags/mark").unwrap();
    again.delete().unwrap();
    assert!(repo.find_reference("refs/tags/mark").is_err());
}

#[test]
fn peel_reference_to_commit() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let head = repo.head().unwrap();
    let peeled = head.peel(ObjectKind::Commit).unwrap();
    assert_eq!(peeled.kind(), Some(ObjectKind::Commit));
    assert_eq!(peeled.id(), head.target().unwrap());
}

// =============================================================================
// Objects
// =============================================================================

#[test]
fn commit_fields() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let head_id = repo.head().unwrap().target().unwrap();

    let commit = repo.find_commit(head_id).unwrap();
    assert_eq!(commit.id(), head_id);
    assert_eq!(commit.summary(), Some("Initial commit"));
    assert!(commit.message().unwrap().starts_with("Initial commit"));
    assert_eq!(commit.parent_count(), 0);
    assert!(commit.parent_id(0).is_none());

    let author = commit.author();
    assert_eq!(author.name(), Some("Test User"));
    assert_eq!(author.email(), Some("test@example.com"));
    assert!(commit.time().seconds() > 0);
}

#[test]
fn tree_and_blob_content() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let head_id = repo.head().unwrap().target().unwrap();
    let commit = repo.find_commit(head_id).unwrap();

    let tree = commit.tree().unwrap();
    assert_eq!(tree.id(), commit.tree_id());
    assert_eq!(tree.len(), 1);

    let entry = tree.get_name("README.md").unwrap();
    assert_eq!(entry.kind(), Some(ObjectKind::Blob));
    assert_eq!(entry.name(), Some("README.md"));

    let blob = repo.find_blob(entry.id()).unwrap();
    assert_eq!(blob.content(), b"# Test Repo\n");
    assert_eq!(blob.size(), 12);
    assert!(!blob.is_binary());
}

#[test]
fn tree_entry_lookups_agree() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let tree = repo
        .find_commit(repo.head().unwrap().target().unwrap())
        .unwrap()
        .tree()
        .unwrap();

    let by_index = tree.get(0).unwrap();
    let by_name = tree.get_name("README.md").unwrap();
    let by_path = tree.get_path("README.md").unwrap();
    assert_eq!(by_index.id(), by_name.id());
    assert_eq!(by_name.id(), by_path.id());

    let owned = by_name.to_owned().unwrap();
    assert_eq!(owned.id(), by_name.id());

    let object = by_name.to_object(&repo).unwrap();
    assert_eq!(object.kind(), Some(ObjectKind::Blob));
}

#[test]
fn revparse_and_downcasts() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();

    let object = repo.revparse_single("HEAD").unwrap();
    assert_eq!(object.kind(), Some(ObjectKind::Commit));
    let short = object.short_id().unwrap();
    assert!(short.len() >= 4);
    assert!(!short.contains_nul());
    assert!(fixture.head_oid_raw().starts_with(short.to_str().unwrap()));

    let commit = object.into_commit().unwrap();
    assert_eq!(commit.summary(), Some("Initial commit"));
}

#[test]
fn annotated_tag_round_trip() {
    let fixture = TestRepo::new();
    run_git(fixture.path(), &["tag", "-a", "v1", "-m", "release one"]);
    let repo = fixture.repo();

    let names = repo.tag_names().unwrap();
    assert_eq!(names.to_vec(), vec!["v1"]);

    let tag = repo.revparse_single("v1").unwrap().into_tag().unwrap();
    assert_eq!(tag.name(), Some("v1"));
    assert!(tag.message().unwrap().contains("release one"));
    assert_eq!(
        tag.target_id().to_string(),
        fixture.head_oid_raw()
    );
    assert_eq!(tag.target().unwrap().kind(), Some(ObjectKind::Commit));
    assert!(tag.tagger().is_some());
}

#[test]
fn find_object_with_kind_filter() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let head_id = repo.head().unwrap().target().unwrap();

    let any = repo.find_object(head_id, None).unwrap();
    assert_eq!(any.kind(), Some(ObjectKind::Commit));

    let typed = repo.find_object(head_id, Some(ObjectKind::Commit)).unwrap();
    assert_eq!(typed.id(), head_id);

    assert!(repo.find_object(head_id, Some(ObjectKind::Blob)).is_err());
}

// =============================================================================
// Writing: index, trees, commits
// =============================================================================

#[test]
fn stage_and_commit_through_index() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let old_head = repo.head().unwrap().target().unwrap();
    let parent = repo.find_commit(old_head).unwrap();

    std::fs::write(fixture.path().join("notes.txt"), "remember\n").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("notes.txt")).unwrap();
    index.write().unwrap();
    assert_eq!(index.len(), 2);

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    assert!(tree.get_name("notes.txt").is_some());

    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let new_id = repo
        .commit(Some("HEAD"), &sig, &sig, "add notes", &tree, &[&parent])
        .unwrap();

    assert_eq!(repo.refname_to_id("HEAD").unwrap(), new_id);
    let new_commit = repo.find_commit(new_id).unwrap();
    assert_eq!(new_commit.parent_count(), 1);
    assert_eq!(new_commit.parent(0).unwrap().id(), old_head);
    assert_eq!(new_commit.summary(), Some("add notes"));
}

#[test]
fn stage_with_pathspec_array() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();

    std::fs::write(fixture.path().join("a.txt"), "a\n").unwrap();
    std::fs::write(fixture.path().join("b.log"), "b\n").unwrap();

    let mut index = repo.index().unwrap();
    let spec = StrArray::from_strings(vec!["*.txt"]).unwrap();
    index.add_all(&spec).unwrap();
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    assert!(tree.get_name("a.txt").is_some());
    assert!(tree.get_name("b.log").is_none());
}

#[test]
fn default_signature_uses_repo_config() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let sig = repo.signature().unwrap();
    assert_eq!(sig.name(), Some("Test User"));
    assert_eq!(sig.email(), Some("test@example.com"));
}

// =============================================================================
// Ancestry
// =============================================================================

#[test]
fn merge_base_and_descendants() {
    let fixture = TestRepo::new();
    let repo = fixture.repo();
    let first = repo.head().unwrap().target().unwrap();

    std::fs::write(fixture.path().join("second.txt"), "2\n").unwrap();
    run_git(fixture.path(), &["add", "second.txt"]);
    run_git(fixture.path(), &["commit", "-q", "-m", "second"]);
    let second = Oid::from_hex(&fixture.head_oid_raw()).unwrap();

    assert_eq!(repo.merge_base(first, second).unwrap(), first);
    assert!(repo.graph_descendant_of(second, first).unwrap());
    assert!(!repo.graph_descendant_of(first, second).unwrap());
}
