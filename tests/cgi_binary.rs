//! End-to-end tests for the CGI binary.
//!
//! Each test runs `git-connector-cgi` with a request on stdin and checks
//! the CGI envelope on stdout. HOME and XDG_CONFIG_HOME point at an empty
//! temp dir so no user settings are picked up.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn cgi(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("git-connector-cgi").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("xdg"))
        .env_remove("GIT_CONNECTOR_CONFIG")
        .env_remove("GIT_CONNECTOR_SKIP_TLS_VERIFY")
        .env_remove("GIT_CONNECTOR_ADDITIONAL_CERTS_PATH")
        .env_remove("GIT_CONNECTOR_LOG_LEVEL")
        .env_remove("GIT_CONNECTOR_LOG_FORMAT")
        .env_remove("CONTENT_LENGTH")
        .env_remove("RUST_LOG");
    cmd
}

fn anonymous_request(repo: &str) -> String {
    json!({
        "connector_type": "Github",
        "connector_operation": "validate",
        "connector_params": {
            "auth_type": "Http",
            "repo": repo,
            "http_auth": { "auth_method": "Anonymous" }
        }
    })
    .to_string()
}

/// Split a CGI response into its status line and JSON body.
fn parse_envelope(stdout: &[u8]) -> (String, Value) {
    let text = String::from_utf8(stdout.to_vec()).unwrap();
    let (headers, body) = text.split_once("\r\n\r\n").unwrap();
    let status = headers.lines().next().unwrap().to_string();
    assert!(headers.contains("Content-Type: application/json"));
    (status, serde_json::from_str(body.trim()).unwrap())
}

/// Create a repository with one commit to serve as a local remote.
fn local_remote() -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = git2::Repository::init(dir.path()).unwrap();
    let sig = git2::Signature::now("Test", "test@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();
    dir
}

mod request_tests {
    use super::*;

    #[test]
    fn anonymous_listing_succeeds() {
        let home = TempDir::new().unwrap();
        let remote = local_remote();
        let request = anonymous_request(remote.path().to_str().unwrap());

        let output = cgi(&home).write_stdin(request).output().unwrap();

        assert!(output.status.success());
        let (status, body) = parse_envelope(&output.stdout);
        assert_eq!(status, "Status: 200 OK");
        assert_eq!(
            body,
            json!({ "status": "SUCCESS", "errors": [], "error_summary": "" })
        );
    }

    #[test]
    fn empty_repo_is_bad_request() {
        let home = TempDir::new().unwrap();

        let output = cgi(&home)
            .write_stdin(anonymous_request(""))
            .output()
            .unwrap();

        let (status, body) = parse_envelope(&output.stdout);
        assert_eq!(status, "Status: 400 Bad Request");
        assert_eq!(body["status"], "FAILURE");
        assert_eq!(body["errors"][0]["message"], "Validation repository URL is missing");
        assert_eq!(body["errors"][0]["code"], 400);
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let home = TempDir::new().unwrap();

        let output = cgi(&home).write_stdin("{\"connector_type\":").output().unwrap();

        let (status, body) = parse_envelope(&output.stdout);
        assert_eq!(status, "Status: 400 Bad Request");
        assert_eq!(body["error_summary"], "Failed to decode request body");
    }

    #[test]
    fn content_length_bounds_request() {
        let home = TempDir::new().unwrap();
        let remote = local_remote();
        let request = anonymous_request(remote.path().to_str().unwrap());
        let length = request.len();

        let output = cgi(&home)
            .env("CONTENT_LENGTH", length.to_string())
            .write_stdin(format!("{}garbage after body", request))
            .output()
            .unwrap();

        let (status, _) = parse_envelope(&output.stdout);
        assert_eq!(status, "Status: 200 OK");
    }

    #[test]
    fn ssh_without_key_is_reported_before_listing() {
        let home = TempDir::new().unwrap();
        let request = json!({
            "connector_type": "Github",
            "connector_operation": "validate",
            "connector_params": {
                "auth_type": "Ssh",
                "repo": "git@github.com:o/r.git",
                "ssh_auth": {
                    "auth_mechanism": "SSH_KEY",
                    "ssh_key_auth_method": "KeyReference",
                    "username": "git",
                    "ssh_key": ""
                }
            }
        });

        let output = cgi(&home).write_stdin(request.to_string()).output().unwrap();

        let (status, body) = parse_envelope(&output.stdout);
        assert_eq!(status, "Status: 200 OK");
        assert_eq!(body["errors"][0]["message"], "SSH Auth private key is missing");
        assert_eq!(
            body["error_summary"],
            "Failed validating repository access: SSH Auth private key is missing"
        );
    }
}

mod process_tests {
    use super::*;

    #[test]
    fn logs_go_to_stderr_only() {
        let home = TempDir::new().unwrap();

        let output = cgi(&home)
            .arg("--log-level")
            .arg("debug")
            .arg("--log-format")
            .arg("json")
            .write_stdin(anonymous_request(""))
            .output()
            .unwrap();

        let stdout = String::from_utf8(output.stdout.clone()).unwrap();
        assert!(stdout.starts_with("Status: 400"));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Validation repository URL is missing"));
    }

    #[test]
    fn missing_config_file_is_internal_error() {
        let home = TempDir::new().unwrap();

        cgi(&home)
            .arg("--config")
            .arg(home.path().join("absent.toml"))
            .write_stdin(anonymous_request("https://example/repo.git"))
            .assert()
            .failure()
            .stdout(predicate::str::starts_with("Status: 500 Internal Server Error"))
            .stdout(predicate::str::contains("\"status\":\"FAILURE\""));
    }

    #[test]
    fn invalid_config_value_is_internal_error() {
        let home = TempDir::new().unwrap();
        let path = home.path().join("config.toml");
        std::fs::write(&path, "[log]\nlevel = \"chatty\"\n").unwrap();

        cgi(&home)
            .env("GIT_CONNECTOR_CONFIG", &path)
            .write_stdin(anonymous_request("https://example/repo.git"))
            .assert()
            .failure()
            .stdout(predicate::str::contains("invalid log level"));
    }

    #[test]
    fn stray_argument_still_answers_with_envelope() {
        let home = TempDir::new().unwrap();

        let output = cgi(&home)
            .arg("searchterm")
            .write_stdin(anonymous_request("https://example/repo.git"))
            .output()
            .unwrap();

        assert!(!output.status.success());
        let (status, body) = parse_envelope(&output.stdout);
        assert_eq!(status, "Status: 500 Internal Server Error");
        assert_eq!(body["status"], "FAILURE");
        assert_eq!(body["error_summary"], "Failed to parse connector arguments");
        assert!(body["errors"][0]["reason"]
            .as_str()
            .unwrap()
            .contains("searchterm"));
    }

    #[test]
    fn numeric_skip_tls_verify_env_is_accepted() {
        let home = TempDir::new().unwrap();

        for value in ["1", "0"] {
            let output = cgi(&home)
                .env("GIT_CONNECTOR_SKIP_TLS_VERIFY", value)
                .write_stdin(anonymous_request(""))
                .output()
                .unwrap();

            let (status, body) = parse_envelope(&output.stdout);
            assert_eq!(status, "Status: 400 Bad Request", "value {}", value);
            assert_eq!(body["error_summary"], "Validation repository URL is missing");
        }
    }

    #[test]
    fn unparsable_skip_tls_verify_env_answers_with_envelope() {
        let home = TempDir::new().unwrap();

        let output = cgi(&home)
            .env("GIT_CONNECTOR_SKIP_TLS_VERIFY", "sometimes")
            .write_stdin(anonymous_request("https://example/repo.git"))
            .output()
            .unwrap();

        assert!(!output.status.success());
        let (status, _) = parse_envelope(&output.stdout);
        assert_eq!(status, "Status: 500 Internal Server Error");
    }

    #[test]
    fn help_lists_settings_flags() {
        let home = TempDir::new().unwrap();

        cgi(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--skip-tls-verify"))
            .stdout(predicate::str::contains("--additional-certs-path"));
    }
}
