use std::fs;

use tempfile::tempdir;

use super::*;

fn fixture() -> (tempfile::TempDir, PathBuf) {
    let temp = tempdir().expect("create temp dir");
    let root = temp.path().join("octo_repo");
    fs::create_dir_all(root.join("src")).expect("create src");
    fs::create_dir_all(root.join(".git")).expect("create .git");
    fs::write(root.join("README.md"), "readme").expect("write readme");
    fs::write(root.join("src/lib.rs"), "pub fn f() {}").expect("write lib");
    fs::write(root.join(".git/config"), "[core]").expect("write git config");

    let sibling = temp.path().join("octo_repo-other");
    fs::create_dir_all(&sibling).expect("create sibling");
    fs::write(sibling.join("secret.txt"), "secret").expect("write secret");
    (temp, root)
}

#[test]
fn resolves_nested_file_inside_root() {
    let (_temp, root) = fixture();
    let p = resolve(&root, "src/lib.rs").expect("resolve");
    assert!(p.ends_with("src/lib.rs"));
    assert!(p.starts_with(root.canonicalize().expect("canonical root")));

    let p = resolve(&root, "./src/../README.md").expect("resolve dotted path");
    assert!(p.ends_with("README.md"));
}

#[test]
fn parent_traversal_is_rejected() {
    let (_temp, root) = fixture();
    for bad in ["../../etc/passwd", "../octo_repo-other/secret.txt", "src/../../x"] {
        let err = resolve(&root, bad).expect_err("traversal must fail");
        assert!(
            matches!(err, SnapshotError::PathEscape { .. }),
            "{bad}: {err:?}"
        );
    }
}

#[test]
fn absolute_paths_are_rejected() {
    let (_temp, root) = fixture();
    let err = resolve(&root, "/etc/passwd").expect_err("absolute must fail");
    assert!(matches!(err, SnapshotError::PathEscape { .. }));
}

#[test]
fn vcs_metadata_is_not_a_valid_target() {
    let (_temp, root) = fixture();
    let err = resolve(&root, ".git/config").expect_err("git metadata must fail");
    assert!(matches!(err, SnapshotError::PathEscape { .. }));
}

#[test]
fn missing_file_and_directory_have_distinct_errors() {
    let (_temp, root) = fixture();
    assert!(matches!(
        resolve(&root, "src/missing.rs"),
        Err(SnapshotError::FileNotFound { .. })
    ));
    assert!(matches!(
        resolve(&root, "README.md/inner"),
        Err(SnapshotError::FileNotFound { .. })
    ));
    assert!(matches!(
        resolve(&root, "src"),
        Err(SnapshotError::NotAFile { .. })
    ));
    assert!(matches!(
        resolve(&root, ""),
        Err(SnapshotError::NotAFile { .. })
    ));
}

#[cfg(unix)]
#[test]
fn symlinks_leaving_the_root_are_rejected() {
    let (temp, root) = fixture();
    std::os::unix::fs::symlink(
        temp.path().join("octo_repo-other/secret.txt"),
        root.join("escape.txt"),
    )
    .expect("create escaping symlink");
    std::os::unix::fs::symlink(root.join(".git/config"), root.join("cfg"))
        .expect("create symlink into .git");
    std::os::unix::fs::symlink(root.join("README.md"), root.join("readme-link"))
        .expect("create internal symlink");

    assert!(matches!(
        resolve(&root, "escape.txt"),
        Err(SnapshotError::PathEscape { .. })
    ));
    assert!(matches!(
        resolve(&root, "cfg"),
        Err(SnapshotError::PathEscape { .. })
    ));
    let p = resolve(&root, "readme-link").expect("internal symlink resolves");
    assert!(p.ends_with("README.md"));
}
