//! Command-line parsing for the `gator` binary.

use std::path::PathBuf;

use clap::Parser;

const VERBS_HELP: &str = "\
Commands:
  register <name>        Create a user and log in as it
  login <name>           Log in as an existing user
  reset                  Delete all users, feeds and follows
  users                  List users
  addfeed <name> <url>   Add a feed and follow it (login required)
  feeds                  List all feeds
  follow <url>           Follow an existing feed (login required)
  following              List followed feeds (login required)
  unfollow <url>         Stop following a feed (login required)
  agg [url]              Fetch a feed and print it";

/// Top-level CLI parser for the `gator` binary.
#[derive(Debug, Parser)]
#[command(
    name = "gator",
    version,
    about = "Gator - command-line RSS feed aggregator",
    after_help = VERBS_HELP
)]
pub struct Cli {
    /// Config file (defaults to ~/.gatorconfig.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run
    pub verb: String,

    /// Command arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
