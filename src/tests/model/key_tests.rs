use super::*;

#[test]
fn dir_name_joins_owner_and_repo() {
    let key = SnapshotKey::new("octo", "hello-world").expect("valid key");
    assert_eq!(key.dir_name(), "octo_hello-world");
    assert_eq!(key.to_string(), "octo/hello-world");
}

#[test]
fn empty_parts_are_missing_params() {
    assert!(matches!(
        SnapshotKey::new("", "repo"),
        Err(SnapshotError::MissingParam("owner"))
    ));
    assert!(matches!(
        SnapshotKey::new("owner", ""),
        Err(SnapshotError::MissingParam("repo"))
    ));
}

#[test]
fn separators_and_dot_prefixes_are_rejected() {
    for (owner, repo) in [
        ("..", "repo"),
        ("owner", "../etc"),
        ("a/b", "repo"),
        (".staging", "repo"),
        (".trash", "x"),
        ("owner", "re po"),
    ] {
        let err = SnapshotKey::new(owner, repo).expect_err("key should be rejected");
        assert!(
            matches!(err, SnapshotError::InvalidKey(_)),
            "unexpected error for {owner}/{repo}: {err:?}"
        );
    }
}

#[test]
fn dotted_names_inside_are_allowed() {
    let key = SnapshotKey::new("rust-lang", "rust.vim").expect("valid key");
    assert_eq!(key.dir_name(), "rust-lang_rust.vim");
}

#[test]
fn repo_names_may_start_with_a_dot() {
    let key = SnapshotKey::new("octo", ".github").expect("valid key");
    assert_eq!(key.dir_name(), "octo_.github");
    assert_eq!(key.to_string(), "octo/.github");
}

#[test]
fn batch_entry_omits_absent_error() {
    let ok = BatchEntry::ok("a.txt".to_string(), "hi".to_string(), false);
    let v = serde_json::to_value(&ok).expect("serialize entry");
    assert_eq!(
        v,
        serde_json::json!({"path": "a.txt", "content": "hi", "truncated": false})
    );

    let failed = BatchEntry::failed(
        "b.txt".to_string(),
        &SnapshotError::FileNotFound {
            path: "b.txt".to_string(),
        },
    );
    let v = serde_json::to_value(&failed).expect("serialize entry");
    assert_eq!(v["content"], "");
    assert_eq!(v["error"], "file not found: b.txt");
}

#[test]
fn file_record_serializes_type_tag() {
    let rec = FileRecord::file("src/lib.rs".to_string(), 42);
    let v = serde_json::to_value(&rec).expect("serialize record");
    assert_eq!(
        v,
        serde_json::json!({"path": "src/lib.rs", "type": "file", "size": 42})
    );
}
