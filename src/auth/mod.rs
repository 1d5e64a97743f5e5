//! Interactive acquisition of a Trello API key and token.
//!
//! The flow visits up to three pages:
//!
//! 1. the login page, until the browser lands on `https://trello.com/`
//!    (skipped when an API key is already known)
//! 2. the developer key page, until its heading and `#key` field show up
//! 3. the token grant page, until the grant confirmation and `<pre>` token
//!    show up
//!
//! [`flow`] holds the pure state machine, [`scrape`] the page inspection,
//! [`browser`] the page sources and [`dialog`] the blocking entry point.

pub mod browser;
pub mod dialog;
pub mod flow;
pub mod scrape;

pub use browser::{Browser, ConsoleBrowser, ScriptedBrowser};
pub use dialog::{AuthError, DEFAULT_AUTH_TIMEOUT, acquire};
pub use flow::{AuthFlow, AuthState, PageLoad, Step, token_url, transition};
