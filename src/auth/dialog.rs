use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::browser::Browser;
use super::flow::AuthFlow;
use crate::models::Credentials;

/// How long the user gets to finish authorizing before giving up
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization was cancelled")]
    Cancelled,
    #[error("authorization flow did not complete within {0:?}")]
    TimedOut(Duration),
    #[error("authorization browser failed: {0}")]
    Browser(String),
}

/// Run the interactive authorization flow and block until it finishes.
///
/// The flow runs on its own thread so the browser can block on page loads;
/// this call waits for it at most `timeout`. With `known_key` only a new
/// token is requested.
///
/// On timeout the worker thread is left behind, not stopped. A browser
/// blocked on input (such as [`ConsoleBrowser`](super::ConsoleBrowser) reading
/// stdin) keeps that input until the process exits, so callers must not start
/// another flow over the same input after [`AuthError::TimedOut`].
pub fn acquire<B>(
    mut browser: B,
    known_key: Option<&str>,
    timeout: Duration,
) -> Result<Credentials, AuthError>
where
    B: Browser + 'static,
{
    let mut flow = AuthFlow::new(known_key);
    info!(state = flow.state.label(), "Starting authorization flow");

    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("trello-auth".to_string())
        .spawn(move || {
            let outcome = drive(&mut browser, &mut flow);
            // The receiver is gone if the caller already timed out
            let _ = sender.send(outcome);
        })
        .map_err(|e| AuthError::Browser(format!("failed to start authorization thread: {}", e)))?;

    match receiver.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => {
            warn!(?timeout, "Authorization flow timed out");
            Err(AuthError::TimedOut(timeout))
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(AuthError::Browser("authorization thread exited unexpectedly".to_string()))
        }
    }
}

fn drive(browser: &mut dyn Browser, flow: &mut AuthFlow) -> Result<Credentials, AuthError> {
    let browser_error = |e: anyhow::Error| AuthError::Browser(format!("{:#}", e));

    browser.navigate(&flow.start_url()).map_err(browser_error)?;
    loop {
        let Some(page) = browser.next_page().map_err(browser_error)? else {
            info!("Authorization browser closed by user");
            return Err(AuthError::Cancelled);
        };

        match flow.observe(&page) {
            Some(url) => {
                info!(state = flow.state.label(), "Authorization advanced");
                browser.navigate(&url).map_err(browser_error)?;
            }
            None => debug!(location = %page.location, state = flow.state.label(), "Page not ready"),
        }

        if let Some(credentials) = flow.credentials() {
            info!("Authorization completed");
            return Ok(credentials.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::browser::ScriptedBrowser;
    use crate::auth::flow::{API_KEY_URL, LOGIN_REDIRECT_URL, LOGIN_URL, PageLoad, token_url};
    use crate::auth::scrape::tests::{KEY_PAGE, LOGIN_PAGE, TOKEN_PAGE};

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_acquire_from_scratch() {
        let browser = ScriptedBrowser::new([
            PageLoad::new(LOGIN_URL, LOGIN_PAGE),
            PageLoad::new(LOGIN_REDIRECT_URL, ""),
            PageLoad::new(API_KEY_URL, "<h1>Loading</h1>"),
            PageLoad::new(API_KEY_URL, KEY_PAGE),
            PageLoad::new(token_url(KEY), TOKEN_PAGE),
        ]);
        let log = browser.navigations();

        let credentials = acquire(browser, None, Duration::from_secs(5)).unwrap();

        assert_eq!(credentials.api_key, KEY);
        assert!(credentials.is_complete());
        assert_eq!(
            *log.lock().unwrap(),
            vec![LOGIN_URL.to_string(), API_KEY_URL.to_string(), token_url(KEY)]
        );
    }

    #[test]
    fn test_acquire_token_only() {
        let browser = ScriptedBrowser::new([PageLoad::new(token_url(KEY), TOKEN_PAGE)]);
        let log = browser.navigations();

        let credentials = acquire(browser, Some(KEY), Duration::from_secs(5)).unwrap();

        assert_eq!(credentials.api_key, KEY);
        assert_eq!(*log.lock().unwrap(), vec![token_url(KEY)]);
    }

    #[test]
    fn test_closing_browser_cancels() {
        let browser = ScriptedBrowser::new([PageLoad::new(LOGIN_URL, LOGIN_PAGE)]);
        let result = acquire(browser, None, Duration::from_secs(5));
        assert!(matches!(result, Err(AuthError::Cancelled)));
    }

    #[test]
    fn test_stalled_flow_times_out() {
        let browser = ScriptedBrowser::new([PageLoad::new(LOGIN_URL, LOGIN_PAGE)]).stall_when_done();

        let result = acquire(browser, None, Duration::from_millis(50));

        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::TimedOut(_)));
        assert!(err.to_string().contains("did not complete"));
    }
}
