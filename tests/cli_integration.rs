//! Binary integration tests.
//!
//! Runs the `gator` executable against a temporary config file and database.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

use gator::Config;

struct Gator {
    dir: TempDir,
}

impl Gator {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("gatorconfig.toml")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gator"))
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .env_remove("GATOR_DATABASE_URL")
            .env_remove("GATOR_LOG")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "gator {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("gator.db")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_unknown_command_exit_code() {
    let gator = Gator::new();

    let output = gator.run(&["nope"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("gator: unknown command: nope"));
    assert!(!gator.db_path().exists());
}

#[test]
fn test_missing_argument_exit_code() {
    let gator = Gator::new();

    let output = gator.run(&["login"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid arguments"));
}

#[test]
fn test_register_persists_session() {
    let gator = Gator::new();

    let out = gator.stdout(&["register", "alice"]);
    assert!(out.contains("alice"));
    assert!(gator.db_path().exists());

    let config = Config::load(gator.config_path()).unwrap();
    assert_eq!(config.session.current_user_name.as_deref(), Some("alice"));

    assert_eq!(gator.stdout(&["users"]), "* alice (current)\n");
}

#[test]
fn test_not_logged_in() {
    let gator = Gator::new();

    let output = gator.run(&["following"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not logged in"));
}

#[test]
fn test_feed_flow_across_invocations() {
    let gator = Gator::new();

    gator.stdout(&["register", "alice"]);
    gator.stdout(&["addfeed", "Blog", "http://x/feed"]);
    gator.stdout(&["register", "bob"]);
    gator.stdout(&["follow", "http://x/feed"]);

    let duplicate = gator.run(&["follow", "http://x/feed"]);
    assert_eq!(duplicate.status.code(), Some(1));
    assert!(stderr(&duplicate).contains("bob already follows Blog"));

    assert_eq!(gator.stdout(&["following"]), "* Blog\n");
    assert_eq!(
        gator.stdout(&["feeds"]),
        "* Blog (http://x/feed) added by alice\n"
    );

    gator.stdout(&["reset"]);
    assert_eq!(gator.stdout(&["users"]), "");
}

#[test]
fn test_keeps_existing_config() {
    let gator = Gator::new();
    std::fs::write(
        gator.config_path(),
        "[fetch]\nuser_agent = \"custom-agent\"\n",
    )
    .unwrap();

    gator.stdout(&["register", "alice"]);

    let config = Config::load(gator.config_path()).unwrap();
    assert_eq!(config.fetch.user_agent, "custom-agent");
    assert_eq!(config.session.current_user_name.as_deref(), Some("alice"));
}

#[test]
fn test_agg_malformed_url_is_usage_error() {
    let gator = Gator::new();

    let output = gator.run(&["agg", "not a url"]);

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("invalid arguments"));
    assert!(!err.contains("fetch error"));
}
