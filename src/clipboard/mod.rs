use anyhow::{Context, Result};
use arboard::Clipboard;

/// Card URLs are short; anything longer than this is not a URL we produced
const MAX_URL_LEN: usize = 2048;

/// Trait for clipboard operations (allows mocking in tests)
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("Card has no URL");
    }
    if url.len() > MAX_URL_LEN {
        anyhow::bail!("URL too long for clipboard ({} bytes, max {})", url.len(), MAX_URL_LEN);
    }
    if url.contains(char::is_control) {
        anyhow::bail!("URL contains control characters");
    }
    Ok(())
}

fn copy_with_provider(url: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_url(url)?;
    provider.set_text(url.trim())
}

/// Copy a card URL to the system clipboard.
///
/// Fails on headless systems without a clipboard, or when the URL is empty,
/// oversized or contains control characters.
pub fn copy_url_to_clipboard(url: &str) -> Result<()> {
    // Validate before touching the clipboard so CI gets the useful error
    validate_url(url)?;
    let mut clipboard = SystemClipboard::new()?;
    copy_with_provider(url, &mut clipboard)
}
