//! Extraction of the API key and token from Trello's authorization pages.
//!
//! Both lookups answer "found" or "not found". A page that is still loading,
//! shows a login prompt, or changed its layout simply yields `None`.

use scraper::{ElementRef, Html, Selector};

/// Heading text on the developer key page once it has loaded
pub const API_KEY_MARKER: &str = "Developer API Keys";

/// Paragraph text on the token page after access was granted. The app name
/// sits in a child element and is not part of the paragraph's own text.
pub const TOKEN_MARKER: &str = "You have granted  access to your Trello information.";

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

/// Text nodes directly inside `element`, without descending into children
fn own_text(element: ElementRef<'_>) -> String {
    element.children().filter_map(|node| node.value().as_text()).map(|t| &**t).collect()
}

/// API key from the `input#key` field, if the page is the key page
pub fn find_api_key(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let heading = select_first(&document, "h1")?;
    let heading_text: String = heading.text().collect();
    if !heading_text.contains(API_KEY_MARKER) {
        return None;
    }

    let key = select_first(&document, "input#key")?.value().attr("value")?.trim();
    if key.is_empty() { None } else { Some(key.to_string()) }
}

/// Token from the first `pre` block, if the page confirms the grant
pub fn find_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let paragraph = select_first(&document, "p")?;
    if !own_text(paragraph).contains(TOKEN_MARKER) {
        return None;
    }

    let token: String = select_first(&document, "pre")?.text().collect();
    let token = token.trim();
    if token.is_empty() { None } else { Some(token.to_string()) }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const KEY_PAGE: &str = r#"<html><body>
        <div class="layout"><h1>Developer API Keys</h1>
        <p>Key:</p><input type="text" id="key" value="0123456789abcdef0123456789abcdef" readonly>
        </div></body></html>"#;

    pub(crate) const TOKEN_PAGE: &str = r#"<html><body>
        <p>You have granted <strong>TrelloRadar</strong> access to your Trello information.</p>
        <p>To complete the process, please give this token:</p>
        <pre>
            f00dfeedf00dfeedf00dfeedf00dfeedf00dfeedf00dfeedf00dfeedf00dfeed
        </pre></body></html>"#;

    pub(crate) const LOGIN_PAGE: &str =
        r#"<html><body><h1>Log in to Trello</h1><input id="user"></body></html>"#;

    #[test]
    fn test_find_api_key() {
        assert_eq!(find_api_key(KEY_PAGE).as_deref(), Some("0123456789abcdef0123456789abcdef"));
    }

    #[test]
    fn test_api_key_requires_marker() {
        let html = r#"<h1>Something else</h1><input id="key" value="abc">"#;
        assert_eq!(find_api_key(html), None);
    }

    #[test]
    fn test_api_key_missing_field() {
        let html = "<h1>Developer API Keys</h1><p>loading…</p>";
        assert_eq!(find_api_key(html), None);
    }

    #[test]
    fn test_api_key_empty_value() {
        let html = r#"<h1>Developer API Keys</h1><input id="key" value="  ">"#;
        assert_eq!(find_api_key(html), None);
    }

    #[test]
    fn test_find_token() {
        assert_eq!(
            find_token(TOKEN_PAGE).as_deref(),
            Some("f00dfeedf00dfeedf00dfeedf00dfeedf00dfeedf00dfeedf00dfeedf00dfeed")
        );
    }

    #[test]
    fn test_token_requires_grant_marker() {
        let html = "<p>Allow TrelloRadar to use your account?</p><pre>nope</pre>";
        assert_eq!(find_token(html), None);
    }

    #[test]
    fn test_token_missing_pre() {
        let html = "<p>You have granted <b>X</b> access to your Trello information.</p>";
        assert_eq!(find_token(html), None);
    }

    #[test]
    fn test_garbage_input_is_not_found() {
        for html in ["", "<<<>>>", "plain text", LOGIN_PAGE] {
            assert_eq!(find_api_key(html), None);
            assert_eq!(find_token(html), None);
        }
    }
}
