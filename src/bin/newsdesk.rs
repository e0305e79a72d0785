//! CLI binary for the news desk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use newsdesk::backend::generate::ContentGenerator;
use newsdesk::backend::news::NewsSource;
use newsdesk::newsdesk_search::{
    suggest::suggest_with_limit, Article, ArticleId, JsonFileStore, RecentSearches,
};
use newsdesk::{
    desk_dirs, logging, AuthClient, BackendClient, DeskConfig, GenerationService, NewsService,
    Platform, SessionProvider, SessionStore,
};
use tracing::info;

/// Password for `login`, read from the environment so it never hits shell history.
const PASSWORD_ENV: &str = "NEWSDESK_PASSWORD";

/// Newsdesk: search AI news and draft social posts.
#[derive(Parser)]
#[command(name = "newsdesk", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search a saved article batch (JSON array) and remember the term.
    Search {
        /// Article file written by `refresh --out`.
        file: PathBuf,
        /// Search term.
        term: String,
    },
    /// Show suggestions for a partial term.
    Suggest {
        /// Partial input; empty shows the default list.
        #[arg(default_value = "")]
        partial: String,
    },
    /// List recent searches.
    Recent,
    /// Fetch fresh articles from the aggregator.
    Refresh {
        /// Write the de-duplicated articles to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Draft a post for one article.
    Generate {
        /// Article file written by `refresh --out`.
        file: PathBuf,
        /// Article id.
        id: String,
        /// instagram, linkedin, x, facebook or threads.
        platform: Platform,
        /// Directory to export the draft into.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Sign in (password from NEWSDESK_PASSWORD).
    Login {
        /// Account email.
        email: String,
    },
    /// Sign out and forget the stored session.
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => DeskConfig::from_file(path)?,
        None => DeskConfig::load_or_default(&DeskConfig::default_config_path())?,
    };
    config.apply_env_overrides();
    config.validate()?;

    let _log_guard = logging::init(&config.logging, &desk_dirs::logs_dir());
    let session = SessionStore::persisted(desk_dirs::data_dir().join("session.json"));

    match cli.command {
        Command::Search { file, term } => run_search(&config, &file, &term),
        Command::Suggest { partial } => {
            let recent = load_recent(&config);
            for line in suggest_with_limit(&partial, recent.entries(), config.search.suggestion_limit) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Recent => {
            for term in load_recent(&config).entries() {
                println!("{term}");
            }
            Ok(())
        }
        Command::Refresh { out } => run_refresh(&config, session, out.as_deref()).await,
        Command::Generate {
            file,
            id,
            platform,
            export,
        } => run_generate(&config, session, &file, &id, platform, export).await,
        Command::Login { email } => {
            let password = std::env::var(PASSWORD_ENV)
                .with_context(|| format!("set {PASSWORD_ENV} to sign in"))?;
            let auth = AuthClient::new(&config.backend, session)?;
            let signed_in = auth.sign_in(&email, &password).await?;
            println!("signed in as {}", signed_in.user.email.as_deref().unwrap_or(&signed_in.user.id));
            Ok(())
        }
        Command::Logout => {
            let auth = AuthClient::new(&config.backend, session)?;
            auth.sign_out().await?;
            println!("signed out");
            Ok(())
        }
    }
}

fn load_recent(config: &DeskConfig) -> RecentSearches {
    let store = JsonFileStore::in_dir(&config.storage.recent_dir());
    RecentSearches::load(Box::new(store), &config.search)
}

fn read_articles(file: &Path) -> anyhow::Result<Vec<Article>> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not an article list", file.display()))
}

fn run_search(config: &DeskConfig, file: &Path, term: &str) -> anyhow::Result<()> {
    let articles = read_articles(file)?;
    let mut recent = load_recent(config);
    let outcome = newsdesk::newsdesk_search::engine::execute(&articles, term, &config.search);
    recent.record(term);

    for article in &outcome.articles {
        println!("{}\t{}\t{}", article.id, article.source, article.title);
    }
    info!(count = outcome.count, elapsed_us = outcome.elapsed.as_micros() as u64, "search done");
    Ok(())
}

async fn run_refresh(config: &DeskConfig, session: SessionStore, out: Option<&Path>) -> anyhow::Result<()> {
    let client = BackendClient::new(&config.backend, Arc::new(session))?;
    let batch = NewsService::new(client).refresh().await?;

    let stats = &batch.stats;
    println!(
        "{} articles ({} unique) from {} APIs, {} premium sources",
        stats.total,
        stats.unique,
        stats.working_apis.len(),
        stats.premium_sources
    );
    for (api, count) in &stats.api_results {
        println!("  {api}: {count}");
    }

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&batch.articles)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        println!("saved to {}", path.display());
    }
    Ok(())
}

async fn run_generate(
    config: &DeskConfig,
    session: SessionStore,
    file: &Path,
    id: &str,
    platform: Platform,
    export: Option<PathBuf>,
) -> anyhow::Result<()> {
    if session.current().is_none() {
        info!("not signed in, drafting with the anonymous key");
    }
    let articles = read_articles(file)?;
    let id = ArticleId::new(id);
    let article = articles.iter().find(|a| a.id == id);

    let client = BackendClient::new(&config.backend, Arc::new(session))?;
    let post = GenerationService::new(client).generate(&id, platform, article).await?;

    for segment in post.thread_segments() {
        let marker = if segment.is_valid() { "" } else { " (too long)" };
        println!("[{}]{marker} {}", segment.position, segment.text);
    }
    if post.is_over_limit() {
        println!("warning: {} of {} characters", post.char_count(), post.char_limit());
    }

    let dir = export.unwrap_or_else(desk_dirs::exports_dir);
    let path = post.save_to(&dir)?;
    println!("exported to {}", path.display());
    Ok(())
}
