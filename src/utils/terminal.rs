//! Sanitizing remote text before it reaches the terminal
//!
//! Card, board, list and label names come from the Trello API and are shown
//! verbatim in the tree. Escape sequences inside them could move the cursor,
//! recolour the screen or set the window title, so they are stripped first.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Strips ANSI CSI sequences (`ESC [ ... letter`), OSC sequences
/// (`ESC ] ... BEL` or `ESC ] ... ESC \`) and other control characters.
///
/// Newlines and tabs are replaced by spaces since every name is rendered on a
/// single row.
///
/// # Examples
///
/// ```
/// use trello_radar::utils::terminal::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mFix\x1b[0m\nbug"), "Fix bug");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        match ch {
            '\n' | '\r' | '\t' => result.push(' '),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}
