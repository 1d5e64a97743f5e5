//! Opening card pages in the user's default browser

use anyhow::{Context, Result, bail};

/// Trait for launching URLs (allows recording in tests)
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs with the desktop's default handler
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&mut self, url: &str) -> Result<()> {
        ensure_web_url(url)?;
        open::that(url).with_context(|| format!("Failed to open {}", url))
    }
}

/// Only web links are handed to the OS; anything else could launch a local program
pub fn ensure_web_url(url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        bail!("Refusing to open non-web link: {}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_urls_allowed() {
        assert!(ensure_web_url("https://trello.com/c/abc").is_ok());
        assert!(ensure_web_url("http://localhost:8080/c/abc").is_ok());
    }

    #[test]
    fn test_other_schemes_rejected() {
        for url in ["file:///etc/passwd", "javascript:alert(1)", "", "trello.com/c/abc"] {
            assert!(ensure_web_url(url).is_err(), "{}", url);
        }
    }

    #[test]
    fn test_system_opener_rejects_before_launch() {
        assert!(SystemOpener.open("file:///tmp/x").is_err());
    }
}
