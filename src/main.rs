use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;

use gator::cli::Cli;
use gator::{
    CommandContext, CommandRegistry, Config, Database, FileSession, GatorError, HttpFeedFetcher,
    Result,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("gator: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    let mut config = Config::load_or_default(&config_path)?;
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = gator::logging::init(&config.logging, cli.verbose) {
        eprintln!("gator: failed to initialize file logging: {e}");
        let level = if cli.verbose {
            "debug"
        } else {
            config.logging.level.as_str()
        };
        gator::logging::init_console_only(level);
    }
    debug!(config = %config_path.display(), verb = %cli.verb, "starting");

    let registry = CommandRegistry::with_default_commands();
    if !registry.contains(&cli.verb) {
        return Err(GatorError::UnknownCommand(cli.verb));
    }

    let db = Database::open(&database_url(&config, &config_path)).await?;
    let mut session = FileSession::open(&config_path)?;
    let fetcher = HttpFeedFetcher::new(&config.fetch)?;
    let mut stdout = std::io::stdout().lock();

    let mut ctx = CommandContext::new(&db, &mut session, &fetcher, &config.fetch, &mut stdout);
    registry.dispatch(&mut ctx, &cli.verb, &cli.args).await
}

/// Resolve the database URL; a relative SQLite path is taken relative to the
/// config file's directory so the store does not depend on the working
/// directory.
fn database_url(config: &Config, config_path: &Path) -> String {
    let url = &config.database.url;
    let Some(path) = url.strip_prefix("sqlite://") else {
        return url.clone();
    };
    if path.is_empty() || path.starts_with('/') || path.starts_with(':') {
        return url.clone();
    }

    let base = config_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    format!("sqlite://{}", base.join(path).display())
}
