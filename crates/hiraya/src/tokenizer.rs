//! An eager tokenizer for Hiraya source files.
//!
//! The whole buffer is scanned before anything is handed to the parser. The
//! tokenizer is total: characters it does not understand become
//! [`TokenKind::Unknown`] tokens instead of errors, and it is up to the parser
//! to reject them.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

const KEYWORDS: [&str; 4] = ["bagay", "teksto", "bilang", "ipakita"];

/// Single characters that form an operator token on their own.
const SINGLE_CHAR_OPERATORS: &str = "=+-;";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Operator,
    String,
    Number,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == text
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == text
    }
}

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

#[tracing::instrument(level = "trace", skip_all)]
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut chars = source.chars().peekable();
    let mut tokens = vec![];

    while let Some(c) = chars.next() {
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            continue;
        } else if c == '"' {
            let mut string = String::new();
            let mut terminated = false;
            for c in chars.by_ref() {
                if c == '"' {
                    terminated = true;
                    break;
                }
                string.push(c);
            }
            if !terminated {
                warn!(literal = %string, "Unterminated string literal runs to end of input");
            }
            tokens.push(Token::new(TokenKind::String, string));
        } else if c.is_ascii_digit() {
            let mut number = String::from(c);
            while let Some(&next) = chars.peek() {
                if !next.is_ascii_digit() {
                    break;
                }
                number.push(next);
                chars.next();
            }
            tokens.push(Token::new(TokenKind::Number, number));
        } else if c.is_ascii_alphabetic() || c == '_' {
            let mut word = String::from(c);
            while let Some(&next) = chars.peek() {
                if !(next.is_ascii_alphanumeric() || next == '_') {
                    break;
                }
                word.push(next);
                chars.next();
            }
            let kind = if is_keyword(&word) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, word));
        // Must come before single-character operators, because '-' is one.
        } else if c == '-' && chars.peek() == Some(&'>') {
            chars.next();
            tokens.push(Token::new(TokenKind::Operator, "->"));
        } else if SINGLE_CHAR_OPERATORS.contains(c) {
            tokens.push(Token::new(TokenKind::Operator, c));
        } else {
            tokens.push(Token::new(TokenKind::Unknown, c));
        }
    }

    trace!(count = tokens.len(), "Tokenized source");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n  \n").is_empty());
    }

    #[test]
    fn string_literal_keeps_contents_verbatim() {
        assert_eq!(
            tokenize("\"Hello, World!\""),
            vec![Token::new(TokenKind::String, "Hello, World!")]
        );
        assert_eq!(
            tokenize(r#""a\nb""#),
            vec![Token::new(TokenKind::String, r"a\nb")]
        );
    }

    #[test]
    fn unterminated_string_absorbs_remainder() {
        assert_eq!(
            tokenize("\"abc bagay = 1"),
            vec![Token::new(TokenKind::String, "abc bagay = 1")]
        );
    }

    #[test]
    fn number_is_a_maximal_digit_run() {
        assert_eq!(tokenize("12345"), vec![Token::new(TokenKind::Number, "12345")]);
        assert_eq!(
            tokenize("3.5"),
            vec![
                Token::new(TokenKind::Number, "3"),
                Token::new(TokenKind::Unknown, "."),
                Token::new(TokenKind::Number, "5"),
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(tokenize("bagay"), vec![Token::new(TokenKind::Keyword, "bagay")]);
        assert_eq!(
            tokenize("myVariable"),
            vec![Token::new(TokenKind::Identifier, "myVariable")]
        );
        assert_eq!(
            kinds("teksto bilang ipakita _tmp1 bagay2"),
            vec![
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(
            tokenize("  \n\tbagay  \t teksto"),
            vec![
                Token::new(TokenKind::Keyword, "bagay"),
                Token::new(TokenKind::Keyword, "teksto"),
            ]
        );
    }

    #[test]
    fn crlf_line_endings_match_lf() {
        let crlf = tokenize("bagay x -> bilang = 1;\r\nipakita x;\r\n");
        let lf = tokenize("bagay x -> bilang = 1;\nipakita x;\n");
        assert_eq!(crlf, lf);
        assert!(crlf.iter().all(|t| t.kind != TokenKind::Unknown));
    }

    #[test]
    fn unknown_character_advances_one_position() {
        assert_eq!(tokenize("@"), vec![Token::new(TokenKind::Unknown, "@")]);
        assert_eq!(
            kinds("@@x"),
            vec![TokenKind::Unknown, TokenKind::Unknown, TokenKind::Identifier]
        );
    }

    #[test]
    fn arrow_is_one_operator() {
        assert_eq!(tokenize("->"), vec![Token::new(TokenKind::Operator, "->")]);
        assert_eq!(
            tokenize("- >"),
            vec![
                Token::new(TokenKind::Operator, "-"),
                Token::new(TokenKind::Unknown, ">"),
            ]
        );
    }

    #[test]
    fn mixed_tokens() {
        assert_eq!(
            tokenize("\"Hello\" 123 ->"),
            vec![
                Token::new(TokenKind::String, "Hello"),
                Token::new(TokenKind::Number, "123"),
                Token::new(TokenKind::Operator, "->"),
            ]
        );
    }

    #[test]
    fn declaration_tokens() {
        insta::assert_json_snapshot!(tokenize("bagay x -> bilang = 2 + 3;"), @r###"
        [
          {
            "kind": "Keyword",
            "text": "bagay"
          },
          {
            "kind": "Identifier",
            "text": "x"
          },
          {
            "kind": "Operator",
            "text": "->"
          },
          {
            "kind": "Keyword",
            "text": "bilang"
          },
          {
            "kind": "Operator",
            "text": "="
          },
          {
            "kind": "Number",
            "text": "2"
          },
          {
            "kind": "Operator",
            "text": "+"
          },
          {
            "kind": "Number",
            "text": "3"
          },
          {
            "kind": "Operator",
            "text": ";"
          }
        ]
        "###);
    }
}
