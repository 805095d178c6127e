//! Tokens and their owned text.

use lexgen_ir::codepoint::is_printable_ascii;
use lexgen_ir::{Codepoint, TokenId, TokenTable};

/// One scanned token. Text is present only for capturing token kinds and
/// is owned exclusively by the token until released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: TokenId,
    text: Option<Vec<Codepoint>>,
}

impl Token {
    /// A token without captured text.
    pub fn new(id: TokenId) -> Self {
        Self { id, text: None }
    }

    /// A token carrying its matched characters.
    pub fn with_text(id: TokenId, text: Vec<Codepoint>) -> Self {
        Self {
            id,
            text: Some(text),
        }
    }

    /// The terminal token every exhausted scanner keeps producing.
    pub fn end_of_stream() -> Self {
        Self::new(TokenId::END_OF_STREAM)
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.id == TokenId::END_OF_STREAM
    }

    pub fn is_invalid_character(&self) -> bool {
        self.id == TokenId::INVALID_CHARACTER
    }

    /// Captured characters, if the token kind retains them and the token
    /// has not been released.
    pub fn text(&self) -> Option<&[Codepoint]> {
        self.text.as_deref()
    }

    /// Release the owned text. Idempotent: releasing an already-released
    /// token is a no-op.
    pub fn release(&mut self) {
        self.text = None;
    }

    /// Render the token for diagnostics: `Token(Name)` or
    /// `Token(Name, '<text>')`. Ids outside the table render an explicit
    /// invalid marker instead of indexing out of bounds.
    pub fn describe(&self, table: &TokenTable) -> String {
        let name = match table.name(self.id) {
            Some(name) => name,
            None => return "Token(<invalid id>)".to_string(),
        };
        match &self.text {
            Some(text) => format!("Token({}, '{}')", name, escape_text(text)),
            None => format!("Token({})", name),
        }
    }
}

/// Printable ASCII verbatim, everything else as a `\x..` escape.
fn escape_text(text: &[Codepoint]) -> String {
    let mut out = String::with_capacity(text.len());
    for &c in text {
        if is_printable_ascii(c) {
            out.push(c as u8 as char);
        } else {
            out.push_str(&format!("\\x{:02x}", c));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TokenTable {
        TokenTable::from_grammar_names(&["ident", "plus"]).unwrap()
    }

    #[test]
    fn describe_without_text() {
        let token = Token::new(TokenId::grammar(1));
        assert_eq!(token.describe(&table()), "Token(plus)");
    }

    #[test]
    fn describe_with_text() {
        let text = vec!['a' as Codepoint, 'b' as Codepoint];
        let token = Token::with_text(TokenId::grammar(0), text);
        assert_eq!(token.describe(&table()), "Token(ident, 'ab')");
    }

    #[test]
    fn describe_escapes_non_printable() {
        let token = Token::with_text(TokenId::INVALID_CHARACTER, vec![0x07, 0x20AC]);
        assert_eq!(
            token.describe(&table()),
            "Token(InvalidCharacter, '\\x07\\x20ac')"
        );
    }

    #[test]
    fn describe_out_of_range_id() {
        let token = Token::new(TokenId(99));
        assert_eq!(token.describe(&table()), "Token(<invalid id>)");
    }

    #[test]
    fn release_is_idempotent() {
        let mut token = Token::with_text(TokenId::grammar(0), vec!['x' as Codepoint]);
        token.release();
        assert_eq!(token.text(), None);
        token.release();
        assert_eq!(token.text(), None);
        // Describing a released token falls back to the bare form
        assert_eq!(token.describe(&table()), "Token(ident)");
    }
}
