// tests/system_git_test.rs
//
// Exercises the SystemGit backend against real temporary git repositories.
// Repositories are set up with git2 and commits run unsigned, since the
// test environment has no signing key.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::Repository;
use serial_test::serial;
use tempfile::TempDir;

use shipit::vcs::{SystemGit, Vcs};

// Helper function to setup a temporary git repo with an initial commit
fn setup_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
        // Override any global signing setup; these tests run unsigned.
        config
            .set_bool("commit.gpgsign", false)
            .expect("Could not set commit.gpgsign");
        config
            .set_bool("tag.gpgSign", false)
            .expect("Could not set tag.gpgSign");
    }

    fs::write(
        temp_dir.path().join("Cargo.toml"),
        "[package]\nname = \"demo\"\nversion = \"1.2.3\"\n",
    )
    .expect("Could not write manifest");
    fs::write(
        temp_dir.path().join("CHANGELOG.md"),
        "# Changelog\n\n## Unreleased\n- fixed bug X\n",
    )
    .expect("Could not write changelog");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("Cargo.toml"))
        .expect("Could not add manifest");
    index
        .add_path(Path::new("CHANGELOG.md"))
        .expect("Could not add changelog");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get signature");
    repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("Could not create initial commit");

    temp_dir
}

fn rewrite_release_files(root: &Path) {
    fs::write(
        root.join("Cargo.toml"),
        "[package]\nname = \"demo\"\nversion = \"1.2.4\"\n",
    )
    .expect("Could not rewrite manifest");
    fs::write(
        root.join("CHANGELOG.md"),
        "# Changelog\n\n## Unreleased\n\n## [1.2.4] - 2023-02-01\n- fixed bug X\n",
    )
    .expect("Could not rewrite changelog");
}

fn blob_text(repo: &Repository, tree: &git2::Tree<'_>, name: &str) -> String {
    let entry = tree.get_name(name).expect("entry missing from tree");
    let blob = repo
        .find_blob(entry.id())
        .expect("Could not look up blob");
    String::from_utf8(blob.content().to_vec()).expect("blob is not utf-8")
}

#[test]
fn test_commit_restricted_to_listed_files() {
    let temp_dir = setup_test_repo();
    let root = temp_dir.path();
    rewrite_release_files(root);

    // Stage an unrelated file; it must not end up in the release commit.
    fs::write(root.join("unrelated.txt"), "scratch\n").expect("Could not write unrelated file");
    let repo = Repository::open(root).expect("Could not open repo");
    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("unrelated.txt"))
        .expect("Could not stage unrelated file");
    index.write().expect("Could not write index");

    let git = SystemGit::unsigned(root);
    git.commit_files(
        "chore: release version 1.2.4\n\n- fixed bug X\n",
        &["CHANGELOG.md", "Cargo.toml"],
    )
    .expect("commit should succeed");

    let repo = Repository::open(root).expect("Could not open repo");
    let head = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .expect("Could not read HEAD commit");
    assert!(head
        .message()
        .expect("commit has no message")
        .starts_with("chore: release version 1.2.4"));

    let tree = head.tree().expect("Could not read commit tree");
    assert!(blob_text(&repo, &tree, "Cargo.toml").contains("version = \"1.2.4\""));
    assert!(blob_text(&repo, &tree, "CHANGELOG.md").contains("## [1.2.4] - 2023-02-01"));
    assert!(tree.get_name("unrelated.txt").is_none());

    // The unrelated file stays staged for a later commit.
    let status = repo
        .status_file(Path::new("unrelated.txt"))
        .expect("Could not get status");
    assert!(status.contains(git2::Status::INDEX_NEW));
}

#[test]
fn test_tag_annotation_contains_summary_and_body() {
    let temp_dir = setup_test_repo();
    let root = temp_dir.path();
    rewrite_release_files(root);

    let git = SystemGit::unsigned(root);
    git.commit_files(
        "chore: release version 1.2.4\n\n- fixed bug X\n",
        &["CHANGELOG.md", "Cargo.toml"],
    )
    .expect("commit should succeed");
    git.tag_annotated("v1.2.4", "v1.2.4", "- fixed bug X\n")
        .expect("tag should succeed");

    let repo = Repository::open(root).expect("Could not open repo");
    let tag = repo
        .find_reference("refs/tags/v1.2.4")
        .expect("tag reference missing")
        .peel_to_tag()
        .expect("tag is not annotated");
    let message = tag.message().expect("tag has no message");
    assert!(message.starts_with("v1.2.4"));
    assert!(message.contains("- fixed bug X"));
}

#[test]
fn test_tagging_twice_with_same_name_fails() {
    let temp_dir = setup_test_repo();
    let git = SystemGit::unsigned(temp_dir.path());

    git.tag_annotated("v1.2.4", "v1.2.4", "").expect("first tag should succeed");
    let result = git.tag_annotated("v1.2.4", "v1.2.4", "");
    assert!(result.is_err(), "tagging the same name twice should fail");
}

#[test]
fn test_push_with_tags_updates_remote() {
    let temp_dir = setup_test_repo();
    let root = temp_dir.path();

    let remote_dir = TempDir::new().expect("Could not create temp dir");
    Repository::init_bare(remote_dir.path()).expect("Could not init bare repo");
    {
        let repo = Repository::open(root).expect("Could not open repo");
        repo.remote(
            "origin",
            remote_dir.path().to_str().expect("remote path is not utf-8"),
        )
        .expect("Could not add remote");
    }

    // Set the upstream once so later pushes know where to go.
    let status = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["push", "-q", "-u", "origin", "HEAD"])
        .status()
        .expect("Failed to execute git push");
    assert!(status.success(), "initial push should succeed");

    rewrite_release_files(root);
    let git = SystemGit::unsigned(root);
    git.commit_files(
        "chore: release version 1.2.4\n\n- fixed bug X\n",
        &["CHANGELOG.md", "Cargo.toml"],
    )
    .expect("commit should succeed");
    git.tag_annotated("v1.2.4", "v1.2.4", "- fixed bug X\n")
        .expect("tag should succeed");
    git.push_with_tags().expect("push should succeed");

    let remote = Repository::open_bare(remote_dir.path()).expect("Could not open bare repo");
    assert!(remote.find_reference("refs/tags/v1.2.4").is_ok());
}

#[test]
fn test_discover_rejects_plain_directory() {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let result = SystemGit::discover(temp_dir.path());
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_discover_from_current_directory() {
    let temp_dir = setup_test_repo();
    let subdir = temp_dir.path().join("src");
    fs::create_dir(&subdir).expect("Could not create subdir");

    let original_dir = env::current_dir().expect("Could not get current dir");
    env::set_current_dir(&subdir).expect("Could not change to subdir");

    let discovered = SystemGit::discover(".");
    env::set_current_dir(original_dir).expect("Could not restore current dir");

    let git = discovered.expect("discover should succeed inside a work tree");
    assert_eq!(
        git.work_tree()
            .canonicalize()
            .expect("Could not canonicalize work tree"),
        temp_dir
            .path()
            .canonicalize()
            .expect("Could not canonicalize temp dir")
    );
    assert!(git.current_branch().is_ok());
}
