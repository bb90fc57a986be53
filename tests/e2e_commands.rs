//! E2E command tests for gator.
//!
//! Drives every verb through the registry.

mod common;

use common::{TestApp, TOM_AND_JERRY_RSS};
use gator::rss::FeedRepository;
use gator::GatorError;

/// Unknown verbs are an explicit error.
#[tokio::test]
async fn test_unknown_command() {
    let mut app = TestApp::new().await;

    let result = app.run("unknown", &[]).await;

    assert!(matches!(result, Err(GatorError::UnknownCommand(ref n)) if n == "unknown"));
    assert_eq!(result.unwrap_err().exit_code(), 2);
}

/// Registering twice keeps the first identity.
#[tokio::test]
async fn test_register_duplicate() {
    let mut app = TestApp::new().await;

    app.ok("register", &["alice"]).await;
    let result = app.run("register", &["alice"]).await;
    assert!(matches!(result, Err(GatorError::DuplicateIdentity(ref n)) if n == "alice"));

    let users = app.ok("users", &[]).await;
    assert_eq!(users, "* alice (current)\n");
}

/// Login switches the current user; unknown users are rejected.
#[tokio::test]
async fn test_login_flow() {
    let mut app = TestApp::new().await;

    app.ok("register", &["alice"]).await;
    app.ok("register", &["bob"]).await;
    assert_eq!(app.current_user(), Some("bob"));

    assert_eq!(app.ok("login", &["alice"]).await, "Logged in as alice\n");
    assert_eq!(app.current_user(), Some("alice"));
    assert_eq!(app.ok("users", &[]).await, "* alice (current)\n* bob\n");

    let result = app.run("login", &["carol"]).await;
    assert!(matches!(result, Err(GatorError::NotFound(_))));
    assert_eq!(app.current_user(), Some("alice"));
}

/// Missing positional arguments are usage errors.
#[tokio::test]
async fn test_missing_arguments() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;

    for (verb, args) in [
        ("register", vec![]),
        ("login", vec![]),
        ("addfeed", vec!["Blog"]),
        ("follow", vec![]),
        ("unfollow", vec![]),
    ] {
        let result = app.run(verb, &args).await;
        match result {
            Err(e @ GatorError::InvalidArguments(_)) => assert_eq!(e.exit_code(), 2),
            other => panic!("{verb}: expected InvalidArguments, got {other:?}"),
        }
    }
}

/// Extra arguments are ignored.
#[tokio::test]
async fn test_extra_arguments_ignored() {
    let mut app = TestApp::new().await;

    app.ok("register", &["alice", "extra", "args"]).await;
    assert_eq!(app.ok("users", &["ignored"]).await, "* alice (current)\n");
}

/// A feed URL can only be registered once, whoever adds it.
#[tokio::test]
async fn test_addfeed_duplicate_url() {
    let mut app = TestApp::new().await;

    app.ok("register", &["alice"]).await;
    app.ok("addfeed", &["Blog", "http://x/feed"]).await;

    app.ok("register", &["bob"]).await;
    let result = app.run("addfeed", &["Other", "http://x/feed"]).await;
    assert!(matches!(result, Err(GatorError::DuplicateFeedUrl(ref u)) if u == "http://x/feed"));

    let feeds = app.ok("feeds", &[]).await;
    assert_eq!(feeds, "* Blog (http://x/feed) added by alice\n");
}

/// addfeed records the owner and auto-follows.
#[tokio::test]
async fn test_addfeed_round_trip() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;

    app.ok("addfeed", &["Blog", "http://x/feed"]).await;

    let feed = FeedRepository::new(app.db.pool())
        .get_by_url("http://x/feed")
        .await
        .unwrap();
    let alice = gator::UserRepository::new(app.db.pool())
        .get("alice")
        .await
        .unwrap();
    assert_eq!(feed.name, "Blog");
    assert_eq!(feed.user_id, alice.id);

    assert_eq!(app.ok("following", &[]).await, "* Blog\n");
}

/// Following twice fails and the feed is listed once.
#[tokio::test]
async fn test_follow_twice() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;
    app.ok("addfeed", &["Blog", "http://x/feed"]).await;
    app.ok("register", &["bob"]).await;

    assert_eq!(
        app.ok("follow", &["http://x/feed"]).await,
        "bob now follows Blog\n"
    );
    let result = app.run("follow", &["http://x/feed"]).await;
    match result {
        Err(GatorError::DuplicateFollow { user, feed }) => {
            assert_eq!(user, "bob");
            assert_eq!(feed, "Blog");
        }
        other => panic!("expected DuplicateFollow, got {other:?}"),
    }

    assert_eq!(app.ok("following", &[]).await, "* Blog\n");
}

/// The creator already follows a feed they added.
#[tokio::test]
async fn test_creator_cannot_follow_again() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;
    app.ok("addfeed", &["Blog", "http://x/feed"]).await;

    let result = app.run("follow", &["http://x/feed"]).await;
    assert!(matches!(result, Err(GatorError::DuplicateFollow { .. })));
}

/// following only shows the current user's follows, in follow order.
#[tokio::test]
async fn test_following_per_user() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;
    app.ok("addfeed", &["First", "http://a/feed"]).await;
    app.ok("addfeed", &["Second", "http://b/feed"]).await;

    app.ok("register", &["bob"]).await;
    assert_eq!(app.ok("following", &[]).await, "");
    app.ok("follow", &["http://b/feed"]).await;
    assert_eq!(app.ok("following", &[]).await, "* Second\n");

    app.ok("login", &["alice"]).await;
    assert_eq!(app.ok("following", &[]).await, "* First\n* Second\n");
}

/// unfollow removes the edge once.
#[tokio::test]
async fn test_unfollow() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;
    app.ok("addfeed", &["Blog", "http://x/feed"]).await;

    assert_eq!(
        app.ok("unfollow", &["http://x/feed"]).await,
        "alice unfollowed Blog\n"
    );
    assert_eq!(app.ok("following", &[]).await, "");

    let result = app.run("unfollow", &["http://x/feed"]).await;
    assert!(matches!(result, Err(GatorError::NotFound(_))));

    app.ok("follow", &["http://x/feed"]).await;
    assert_eq!(app.ok("following", &[]).await, "* Blog\n");
}

/// reset wipes users, feeds and follows.
#[tokio::test]
async fn test_reset() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;
    app.ok("addfeed", &["Blog", "http://x/feed"]).await;

    assert_eq!(app.ok("reset", &[]).await, "Deleted 1 users\n");

    assert_eq!(app.ok("users", &[]).await, "");
    assert_eq!(app.ok("feeds", &[]).await, "");
    assert!(app.current_user().is_none());

    app.ok("register", &["alice"]).await;
    app.ok("addfeed", &["Blog", "http://x/feed"]).await;
}

/// agg prints the decoded document.
#[tokio::test]
async fn test_agg_prints_decoded_feed() {
    let mut app = TestApp::new().await;
    let url = app.fetch.default_url.clone();
    app.source = std::mem::take(&mut app.source).with_document(&url, TOM_AND_JERRY_RSS);

    let out = app.ok("agg", &[]).await;

    assert!(out.starts_with("Title: Tom & Jerry\n"));
    assert!(out.contains("Description: Cat & mouse\n"));
    assert!(out.contains("Item Title: Episode 1\n"));
    assert!(out.contains("Item Description: <b>Chase</b>\n"));
    assert_eq!(app.source.requests(), vec![url]);
}

/// agg accepts an explicit URL and needs no login.
#[tokio::test]
async fn test_agg_explicit_url() {
    let mut app = TestApp::new().await;
    app.source = std::mem::take(&mut app.source)
        .with_document("https://other.example/rss", TOM_AND_JERRY_RSS);

    app.ok("agg", &["https://other.example/rss"]).await;

    assert_eq!(app.source.requests(), vec!["https://other.example/rss"]);
}

/// A malformed agg URL is bad input, like a malformed addfeed URL.
#[tokio::test]
async fn test_agg_malformed_url() {
    let mut app = TestApp::new().await;
    app.ok("register", &["alice"]).await;

    let agg = app.run("agg", &["not a url"]).await;
    assert!(matches!(agg, Err(GatorError::InvalidArguments(_))));

    let addfeed = app.run("addfeed", &["Blog", "not a url"]).await;
    assert!(matches!(addfeed, Err(GatorError::InvalidArguments(_))));

    assert!(app.source.requests().is_empty());
}

/// Fetch and parse failures surface as distinct errors.
#[tokio::test]
async fn test_agg_errors() {
    let mut app = TestApp::new().await;
    app.source = std::mem::take(&mut app.source).with_document("https://bad.example/rss", "nope");

    let fetch = app.run("agg", &["https://down.example/rss"]).await;
    assert!(matches!(fetch, Err(GatorError::Fetch(_))));

    let parse = app.run("agg", &["https://bad.example/rss"]).await;
    assert!(matches!(parse, Err(GatorError::Parse(_))));
}
