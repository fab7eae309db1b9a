use std::fs;

use tempfile::tempdir;

use super::*;

#[test]
fn walk_lists_regular_files_and_skips_git() {
    let temp = tempdir().expect("create temp dir");
    let root = temp.path();
    fs::create_dir_all(root.join("src/nested")).expect("create dirs");
    fs::create_dir_all(root.join(".git/objects")).expect("create .git");
    fs::create_dir_all(root.join("empty")).expect("create empty dir");
    fs::write(root.join("README.md"), "hello").expect("write");
    fs::write(root.join(".gitignore"), "target\n").expect("write");
    fs::write(root.join("src/nested/mod.rs"), "").expect("write");
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").expect("write");
    fs::write(root.join(".git/objects/pack"), "x").expect("write");

    let files = walk_files(root).expect("walk");
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec![".gitignore", "README.md", "src/nested/mod.rs"]);

    let readme = files
        .iter()
        .find(|f| f.path == "README.md")
        .expect("readme listed");
    assert_eq!(readme.size, 5);
}

#[cfg(unix)]
#[test]
fn walk_does_not_follow_symlinks() {
    let temp = tempdir().expect("create temp dir");
    let outside = temp.path().join("outside");
    let root = temp.path().join("snap");
    fs::create_dir_all(&outside).expect("create outside");
    fs::create_dir_all(&root).expect("create root");
    fs::write(outside.join("secret.txt"), "secret").expect("write");
    fs::write(root.join("a.txt"), "a").expect("write");
    std::os::unix::fs::symlink(&outside, root.join("link")).expect("symlink");

    let files = walk_files(&root).expect("walk");
    assert_eq!(files, vec![FileRecord::file("a.txt".to_string(), 1)]);
}
