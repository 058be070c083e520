use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("fedi-backfill").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backfill a user's Mastodon posts"));
}

#[test]
fn test_cli_run_help() {
    let mut cmd = Command::cargo_bin("fedi-backfill").unwrap();
    cmd.arg("run").arg("--help").assert().success().stdout(predicate::str::contains("--output"));
}

#[test]
fn test_cli_template_prints_declaration() {
    let mut cmd = Command::cargo_bin("fedi-backfill").unwrap();
    cmd.arg("template")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("PREPARE backfill_statuses AS INSERT INTO statuses"))
        .stdout(predicate::str::contains("ON CONFLICT DO NOTHING;"));
}

#[test]
fn test_cli_run_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{"accounts": [], "target_instance": "t.example", "source_instances": ["s.example"]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("fedi-backfill").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("accounts must not be empty"));
    assert!(!dir.path().join("commands.sql").exists());
}

#[test]
fn test_cli_missing_credentials_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        format!(
            r#"{{"accounts": ["alice"], "target_instance": "t.example",
                "source_instances": ["s.example"], "credentials_dir": {:?}}}"#,
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("fedi-backfill").unwrap();
    cmd.arg("dump")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("s.example_clientcred.secret"));
}

fn status_json(id: &str, parent: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "uri": format!("https://source.example/users/alice/statuses/{id}"),
        "url": format!("https://source.example/@alice/{id}"),
        "content": format!("<p>status {id}</p>"),
        "spoiler_text": "",
        "language": "en",
        "sensitive": false,
        "visibility": "public",
        "created_at": "2023-11-14T22:13:20.000Z",
        "edited_at": null,
        "in_reply_to_id": parent,
        "in_reply_to_account_id": parent.map(|_| "7"),
        "reblog": null,
        "account": { "id": "7", "username": "alice", "acct": "alice@target.example" },
        "media_attachments": []
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_run_writes_script_for_anchored_posts() {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/lookup"))
        .and(query_param("acct", "alice@target.example"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "7",
            "username": "alice",
            "acct": "alice@target.example"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/accounts/7/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            status_json("1", None),
            status_json("2", Some("1")),
            status_json("3", Some("999"))
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/statuses/999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let host = fedi_backfill_remote::host_of(&server.uri()).to_owned();
    std::fs::write(dir.path().join(format!("{host}_clientcred.secret")), "tok-1\n").unwrap();
    let output = dir.path().join("commands.sql");
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        serde_json::json!({
            "accounts": ["alice"],
            "target_instance": "target.example",
            "source_instances": [server.uri()],
            "credentials_dir": dir.path(),
            "output": &output,
        })
        .to_string(),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("fedi-backfill").unwrap();
    cmd.arg("run")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("retained: 2, dropped: 1"))
        .stdout(predicate::str::contains("Wrote 2 statement(s)"));

    let script = std::fs::read_to_string(&output).unwrap();
    let expected = format!(
        "{}\n\
         EXECUTE backfill_statuses (1, 'https://source.example/users/alice/statuses/1', \
         '<p>status 1</p>', 1700000000, 1700000000, null, null, 'https://source.example/@alice/1', \
         false, 0, '', false, 'en', null, true, 7, null, null, null, null, null, false, null);\n\
         EXECUTE backfill_statuses (2, 'https://source.example/users/alice/statuses/2', \
         '<p>status 2</p>', 1700000000, 1700000000, 1, null, 'https://source.example/@alice/2', \
         false, 0, '', true, 'en', null, true, 7, null, 7, null, null, null, false, null);\n",
        fedi_backfill_export::template_declaration()
    );
    assert_eq!(script, expected);
}
