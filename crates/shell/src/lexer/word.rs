// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Word accumulation: the `otherwise` branch of the lexer's top-level loop
//! (§4.2 step 6), plus the quote and substitution sub-modes it dispatches
//! into. A single `WORD` token can mix literal runs with single-quoted,
//! double-quoted, and `$`-substitution parts — none of those characters are
//! word boundaries, only openers for a nested accumulation mode.

use super::Lexer;
use crate::ast::{Word, WordPart};
use crate::error::LexError;
use crate::span::Span;

/// Characters that end a word when seen outside quotes. Quote and
/// substitution openers (`'`, `"`, `$`) are deliberately excluded — they
/// switch mode rather than end the word.
pub(crate) fn is_word_boundary(ch: char) -> bool {
    matches!(ch, '>' | '<' | '|' | '(' | ')' | ';' | '&' | '!') || ch.is_whitespace()
}

pub(super) fn lex_word(lexer: &mut Lexer, start: usize) -> Result<Word, LexError> {
    let mut parts = Vec::new();
    let mut literal = String::new();

    loop {
        match lexer.peek() {
            None => break,
            Some(ch) if is_word_boundary(ch) => break,
            Some('\\') => {
                literal.push(lexer.advance().expect("peeked"));
                if let Some(escaped) = lexer.advance() {
                    literal.push(escaped);
                }
                // A trailing backslash with nothing after it is recorded as
                // a lone backslash; §4.4 drops it silently during expansion.
            }
            Some('\'') => {
                flush_literal(&mut parts, &mut literal);
                lexer.advance();
                let content = lex_single_quoted(lexer, start)?;
                parts.push(WordPart::SQuoted(content));
            }
            Some('"') => {
                flush_literal(&mut parts, &mut literal);
                lexer.advance();
                lex_double_quoted(lexer, start, &mut parts)?;
            }
            Some('$') => {
                flush_literal(&mut parts, &mut literal);
                lexer.advance();
                lex_substitution(lexer, &mut parts);
            }
            Some(ch) => {
                literal.push(ch);
                lexer.advance();
            }
        }
    }

    flush_literal(&mut parts, &mut literal);

    Ok(Word {
        parts,
        span: Span::new(start, lexer.pos()),
    })
}

fn flush_literal(parts: &mut Vec<WordPart>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(WordPart::Literal(std::mem::take(literal)));
    }
}

fn lex_single_quoted(lexer: &mut Lexer, word_start: usize) -> Result<String, LexError> {
    let mut s = String::new();
    loop {
        match lexer.advance() {
            Some('\'') => return Ok(s),
            Some(ch) => s.push(ch),
            None => {
                return Err(LexError::UnterminatedSingleQuote {
                    span: Span::new(word_start, lexer.pos()),
                })
            }
        }
    }
}

fn lex_double_quoted(
    lexer: &mut Lexer,
    word_start: usize,
    parts: &mut Vec<WordPart>,
) -> Result<(), LexError> {
    let mut current = String::new();
    loop {
        match lexer.peek() {
            None => {
                return Err(LexError::UnterminatedDoubleQuote {
                    span: Span::new(word_start, lexer.pos()),
                })
            }
            Some('"') => {
                lexer.advance();
                if !current.is_empty() {
                    parts.push(WordPart::DQuoted(std::mem::take(&mut current)));
                }
                return Ok(());
            }
            Some('\\') => {
                current.push(lexer.advance().expect("peeked"));
                if let Some(escaped) = lexer.advance() {
                    current.push(escaped);
                }
            }
            Some('$') => {
                if !current.is_empty() {
                    parts.push(WordPart::DQuoted(std::mem::take(&mut current)));
                }
                lexer.advance();
                lex_substitution(lexer, parts);
            }
            Some(ch) => {
                current.push(ch);
                lexer.advance();
            }
        }
    }
}

/// Called with the `$` already consumed.
fn lex_substitution(lexer: &mut Lexer, parts: &mut Vec<WordPart>) {
    match lexer.peek() {
        Some('?') => {
            lexer.advance();
            parts.push(WordPart::VarSub("?".to_string()));
        }
        Some('#') => {
            lexer.advance();
            parts.push(WordPart::VarSub("#".to_string()));
        }
        Some('{') => {
            lexer.advance();
            let mut content = String::new();
            loop {
                match lexer.peek() {
                    Some('}') => {
                        lexer.advance();
                        break;
                    }
                    Some(ch) => {
                        content.push(ch);
                        lexer.advance();
                    }
                    None => break,
                }
            }
            parts.push(WordPart::BracedSub(content));
        }
        _ => {
            // An identifier, a run of digits, or nothing at all (an empty
            // name, which is valid and expands to nothing — §4.2/§4.4).
            let mut name = String::new();
            while let Some(ch) = lexer.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    name.push(ch);
                    lexer.advance();
                } else {
                    break;
                }
            }
            parts.push(WordPart::VarSub(name));
        }
    }
}

#[cfg(test)]
#[path = "word_tests.rs"]
mod tests;
