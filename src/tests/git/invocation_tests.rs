use super::*;

#[test]
fn token_is_embedded_as_userinfo_for_https() {
    let url = FetchUrl::new("https://github.com/octo/repo.git", Some("s3cret")).expect("url");
    assert_eq!(url.as_str(), "https://s3cret@github.com/octo/repo.git");
    assert_eq!(url.redacted(), "https://***@github.com/octo/repo.git");
}

#[test]
fn url_without_token_is_passed_through() {
    let url = FetchUrl::new("https://github.com/octo/repo.git", None).expect("url");
    assert_eq!(url.as_str(), "https://github.com/octo/repo.git");

    let blank = FetchUrl::new("https://github.com/octo/repo.git", Some("  ")).expect("url");
    assert_eq!(blank.as_str(), "https://github.com/octo/repo.git");
}

#[test]
fn token_is_ignored_for_file_remotes() {
    let url = FetchUrl::new("file:///srv/git/repo", Some("s3cret")).expect("url");
    assert_eq!(url.as_str(), "file:///srv/git/repo");
}

#[test]
fn option_like_urls_are_rejected() {
    let err = FetchUrl::new("--upload-pack=touch /tmp/x", None).expect_err("reject option");
    assert!(matches!(err, SnapshotError::InvalidKey(_)));
    assert!(matches!(
        FetchUrl::new("   ", None),
        Err(SnapshotError::MissingParam("repo_url"))
    ));
}

#[test]
fn shallow_clone_builds_explicit_argv() {
    let url = FetchUrl::new("https://example.com/r.git", Some("tok")).expect("url");
    let cmd = GitCommand::shallow_clone("git", &url, Path::new("/data/.staging/o_r-1"));
    let args: Vec<String> = cmd
        .args()
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        vec![
            "clone",
            "--depth",
            "1",
            "--quiet",
            "--",
            "https://tok@example.com/r.git",
            "/data/.staging/o_r-1",
        ]
    );
    assert!(!cmd.display_redacted().contains("tok@"));
    assert_eq!(
        cmd.redact("fatal: could not read from https://tok@example.com/r.git"),
        "fatal: could not read from https://***@example.com/r.git"
    );
}

#[test]
fn percent_encoded_tokens_are_redacted_too() {
    let url = FetchUrl::new("https://example.com/r.git", Some("a b")).expect("url");
    assert!(url.as_str().contains("a%20b@"));
    assert!(!url.redacted().contains("a%20b"));
}

#[tokio::test]
async fn failing_git_reports_stderr() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let missing = dir.path().join("does-not-exist");
    let url = FetchUrl::new(&format!("file://{}", missing.display()), None).expect("url");
    let cmd = GitCommand::shallow_clone("git", &url, &dir.path().join("out"));

    let out = cmd.run(Duration::from_secs(60)).await.expect("git runs");
    assert!(!out.success);
    assert!(!out.stderr.is_empty());
}

#[tokio::test]
async fn missing_program_is_unexpected() {
    let cmd = GitCommand::new("/nonexistent/git-binary").arg("--version");
    let err = cmd
        .run(Duration::from_secs(5))
        .await
        .expect_err("spawn should fail");
    assert!(matches!(err, SnapshotError::Unexpected(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn slow_process_hits_timeout() {
    let cmd = GitCommand::new("sleep").arg("5");
    let err = cmd
        .run(Duration::from_millis(200))
        .await
        .expect_err("should time out");
    assert!(matches!(err, SnapshotError::CloneTimeout { .. }));
}
