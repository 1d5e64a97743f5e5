use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use super::output::render_tree_text;
use crate::api::{ApiError, DEFAULT_CARDS_LIMIT, ReqwestTransport, Transport, TrelloClient, Validation};
use crate::auth::{ConsoleBrowser, DEFAULT_AUTH_TIMEOUT, acquire};
use crate::links::SystemOpener;
use crate::logging::{LoggingDestination, current_log_path, init_logging};
use crate::models::Credentials;
use crate::models::credentials::mask_secret;
use crate::results::ResultTree;
use crate::session::Session;
use crate::store::{PersistedState, SortPreference, load_state, save_state};
use crate::tui::{App, ExitReason, run_interactive};
use crate::utils::{api_base_url, format_path_with_tilde, log_dir_for, resolve_settings_path};

#[derive(Parser)]
#[command(name = "trello-radar")]
#[command(version)]
#[command(about = "Search your Trello cards and browse them grouped by board and list", long_about = None)]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for browser authorization before giving up
    #[arg(long, global = true, value_name = "SECS", default_value_t = DEFAULT_AUTH_TIMEOUT.as_secs())]
    pub auth_timeout: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a search and print the grouped results
    Search {
        /// Trello search query (defaults to the most recent one)
        query: Option<String>,
        /// Grouping order, e.g. "board list", "list", "none"
        #[arg(long, value_name = "TOKEN")]
        sort: Option<String>,
        /// Maximum number of cards to fetch
        #[arg(long, default_value_t = DEFAULT_CARDS_LIMIT)]
        limit: u32,
    },
    /// Authorize with Trello and store the credentials
    Auth {
        /// API key to store without going through the browser
        #[arg(long, requires = "token")]
        key: Option<String>,
        /// Token to store together with --key
        #[arg(long, requires = "key")]
        token: Option<String>,
        /// Keep the stored API key and only request a new token
        #[arg(long, conflicts_with_all = ["key", "token"])]
        token_only: bool,
    },
    /// Show or clear the search history
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Show where settings and logs live and what is stored
    Config,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings_path = resolve_settings_path(cli.config.as_deref())?;

    let destination = match cli.command {
        None => LoggingDestination::FileOnly,
        Some(_) => LoggingDestination::FileAndStderr,
    };
    if let Err(e) = init_logging(&log_dir_for(&settings_path), destination) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let mut state = load_state(&settings_path)?;
    let timeout = Duration::from_secs(cli.auth_timeout);

    match cli.command {
        None => run_tui(&mut state, &settings_path, timeout),
        Some(Commands::Search { query, sort, limit }) => {
            run_search(&mut state, &settings_path, timeout, query, sort.as_deref(), limit)
        }
        Some(Commands::Auth { key, token, token_only }) => {
            run_auth(&mut state, &settings_path, timeout, key.zip(token), token_only)
        }
        Some(Commands::History { clear }) => run_history(&mut state, &settings_path, clear),
        Some(Commands::Config) => {
            show_config(&state, &settings_path);
            Ok(())
        }
    }
}

fn run_tui(state: &mut PersistedState, path: &Path, timeout: Duration) -> Result<()> {
    let mut rejected = false;
    loop {
        let client = ensure_client(state, path, timeout, rejected)?;
        let session = Session::new(state.history.clone());
        let mut app = App::new(client, session, state.sort, Box::new(SystemOpener));

        let outcome = run_interactive(&mut app, state.geometry.as_ref())?;
        let (session, sort, _) = app.into_parts();
        state.history = session.history;
        state.sort = sort;
        state.geometry = outcome.geometry;
        save_state(path, state)?;

        match outcome.reason {
            ExitReason::Quit => return Ok(()),
            ExitReason::Reauthenticate => {
                eprintln!("Trello rejected the stored credentials. Please authorize again.");
                rejected = true;
            }
        }
    }
}

fn run_search(
    state: &mut PersistedState,
    path: &Path,
    timeout: Duration,
    query: Option<String>,
    sort: Option<&str>,
    limit: u32,
) -> Result<()> {
    let sort = match sort {
        Some(token) => SortPreference::from_token(token)
            .ok_or_else(|| anyhow!("Unknown sort order '{}'", token))?,
        None => state.sort,
    };
    let client = ensure_client(state, path, timeout, false)?;
    let query = query.unwrap_or_else(|| state.history.latest().to_string());

    let mut session = Session::new(state.history.clone());
    let result = session.search(&client, &query, limit);
    state.history = session.history;
    save_state(path, state)?;

    let cards = match result {
        Ok(cards) => cards,
        Err(ApiError::Auth(_)) => {
            bail!("Trello rejected the stored credentials; run `trello-radar auth` to authorize again")
        }
        Err(e) => return Err(e).with_context(|| format!("Search for '{}' failed", query)),
    };

    let tree = ResultTree::build(cards, sort);
    print!("{}", render_tree_text(&tree, Local::now().date_naive()));
    Ok(())
}

fn run_auth(
    state: &mut PersistedState,
    path: &Path,
    timeout: Duration,
    given: Option<(String, String)>,
    token_only: bool,
) -> Result<()> {
    let credentials = match given {
        Some((key, token)) => {
            let credentials = Credentials::new(key.trim(), token.trim());
            if !credentials.is_complete() {
                bail!("Both --key and --token must be non-empty");
            }
            credentials
        }
        None if token_only => {
            let key = state
                .credentials
                .as_ref()
                .and_then(plausible_key)
                .context("No valid API key stored; run `trello-radar auth` without --token-only")?;
            acquire_credentials(Some(&key), timeout)?
        }
        None => acquire_credentials(None, timeout)?,
    };

    let masked = mask_secret(&credentials.api_key);
    store_credentials(state, path, credentials)?;
    println!("Credentials saved to {} (API key {})", format_path_with_tilde(path), masked);
    Ok(())
}

fn run_history(state: &mut PersistedState, path: &Path, clear: bool) -> Result<()> {
    if clear {
        state.history.clear();
        save_state(path, state)?;
        println!("Search history cleared");
        return Ok(());
    }
    for entry in state.history.entries() {
        println!("{}", entry);
    }
    Ok(())
}

fn show_config(state: &PersistedState, path: &Path) {
    let credentials = state.credentials.clone().unwrap_or_default();

    println!("TrelloRadar Configuration");
    println!("=========================");
    println!("Settings file: {}", format_path_with_tilde(path));
    match current_log_path() {
        Some(log) => println!("Log file: {}", format_path_with_tilde(log)),
        None => println!("Log file: (disabled)"),
    }
    println!("API: {}", api_base_url());
    println!();
    println!("API key: {}", mask_secret(&credentials.api_key));
    println!("Token: {}", mask_secret(&credentials.token));
    println!("Sort: {}", state.sort.label());
    println!("History entries: {}", state.history.len());
    if let Some(g) = &state.geometry {
        println!("Window: {}x{} at ({}, {})", g.width, g.height, g.x, g.y);
    }
}

/// Build a client with working credentials, authorizing first when needed.
///
/// `rejected` marks a retry after Trello refused a search with the stored pair.
/// Authorization errors (including a timeout) propagate, so a failed attempt
/// is never followed by another one in the same process.
fn ensure_client(
    state: &mut PersistedState,
    path: &Path,
    timeout: Duration,
    rejected: bool,
) -> Result<TrelloClient<ReqwestTransport>> {
    let transport = ReqwestTransport::new(api_base_url())?;
    let mut client = TrelloClient::new(transport, state.credentials.clone().unwrap_or_default());

    let known_key = match check_credentials(&client, rejected)? {
        CredentialCheck::Ready => return Ok(client),
        CredentialCheck::RenewToken(key) => Some(key),
        CredentialCheck::Reauthorize => None,
    };

    let credentials = acquire_credentials(known_key.as_deref(), timeout)?;
    client.set_credentials(credentials.clone());
    store_credentials(state, path, credentials)?;
    Ok(client)
}

/// What has to happen before the client's credentials can be used
#[derive(Debug, PartialEq, Eq)]
enum CredentialCheck {
    Ready,
    /// Keep this key and request a new token
    RenewToken(String),
    /// Full login for both key and token
    Reauthorize,
}

/// Decide what the client's credentials need before a search.
///
/// A stored key without a token goes straight to the token step. Anything
/// complete is checked against `members/me` first.
fn check_credentials<T: Transport>(client: &TrelloClient<T>, rejected: bool) -> Result<CredentialCheck> {
    let credentials = client.credentials();
    if credentials.api_key.is_empty() {
        return Ok(CredentialCheck::Reauthorize);
    }
    if credentials.token.is_empty() {
        return Ok(CredentialCheck::RenewToken(credentials.api_key.clone()));
    }

    match client.validate_credentials().context("Failed to reach Trello")? {
        // members/me accepts what the search refused
        Validation::Valid if rejected => {
            bail!("Trello refused the search but still accepts the stored credentials")
        }
        Validation::Valid => Ok(CredentialCheck::Ready),
        Validation::InvalidToken => Ok(CredentialCheck::RenewToken(credentials.api_key.clone())),
        Validation::InvalidKey => Ok(CredentialCheck::Reauthorize),
    }
}

fn plausible_key(credentials: &Credentials) -> Option<String> {
    credentials.has_plausible_key().then(|| credentials.api_key.clone())
}

fn acquire_credentials(known_key: Option<&str>, timeout: Duration) -> Result<Credentials> {
    match known_key {
        Some(_) => eprintln!("Requesting a new Trello token in your browser..."),
        None => eprintln!("Log in to Trello in your browser to authorize TrelloRadar..."),
    }
    let credentials = acquire(ConsoleBrowser::stdio(), known_key, timeout)
        .context("Failed to authorize with Trello")?;
    info!("Authorization completed");
    Ok(credentials)
}

fn store_credentials(state: &mut PersistedState, path: &Path, credentials: Credentials) -> Result<()> {
    state.credentials = Some(credentials);
    save_state(path, state).inspect_err(|e| warn!(error = %e, "Failed to store credentials"))
}
