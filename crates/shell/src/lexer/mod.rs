// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-pass tokenizer (§4.2).
//!
//! The lexer never backtracks across tokens except for the one documented
//! case in §4.2 step 3 and §9's open question: a leading run of decimal
//! digits that turns out not to be attached to a redirection operator. That
//! case is handled with a single saved `backtrack_position` in
//! [`Lexer::next_token`].

mod word;

use crate::ast::RedirectKind;
use crate::error::LexError;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub(crate) use word::is_word_boundary;

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the entire buffer, stopping at the first `Eof` or `Error`
    /// token (lexer totality: every input terminates in a finite number of
    /// steps with one of those as its final token).
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let stop = matches!(tok.kind, TokenKind::Eof | TokenKind::Error(_));
            tokens.push(tok);
            if stop {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(ahead)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_non_newline_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Emits the single next token, advancing the cursor past it.
    pub fn next_token(&mut self) -> Token {
        self.skip_non_newline_whitespace();

        let start = self.pos;

        if self.at_end() {
            return Token::new(TokenKind::Eof, Span::empty(start));
        }

        let ch = self.peek().expect("checked not at_end");

        if ch == '\n' {
            return self.lex_line_break(start);
        }

        if ch.is_ascii_digit() {
            if let Some(tok) = self.try_lex_leading_number(start) {
                return tok;
            }
            // Falls through to word lexing below; position was reset by
            // try_lex_leading_number to `start`.
        }

        match ch {
            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            ';' => self.single(TokenKind::Semicolon, start),
            '!' => self.single(TokenKind::Not, start),
            '|' => self.lex_pipe(start),
            '&' => self.lex_amp(start),
            '>' => self.lex_gt(start, None),
            '<' => self.lex_lt(start, None),
            _ => self.lex_word_token(start),
        }
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token {
        self.advance();
        Token::new(kind, Span::new(start, self.pos))
    }

    fn lex_line_break(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::LineBreak, Span::new(start, self.pos))
    }

    fn lex_pipe(&mut self, start: usize) -> Token {
        self.advance();
        if self.peek() == Some('|') {
            self.advance();
            Token::new(TokenKind::Or, Span::new(start, self.pos))
        } else {
            Token::new(TokenKind::Pipe, Span::new(start, self.pos))
        }
    }

    fn lex_amp(&mut self, start: usize) -> Token {
        self.advance();
        match self.peek() {
            Some('&') => {
                self.advance();
                Token::new(TokenKind::And, Span::new(start, self.pos))
            }
            Some('>') => {
                self.advance();
                let append = self.peek() == Some('>');
                if append {
                    self.advance();
                }
                let kind = if append {
                    RedirectKind::AppendOutErr
                } else {
                    RedirectKind::OutErr
                };
                self.redirect_token(kind, None, None, start)
            }
            _ => Token::new(TokenKind::Amp, Span::new(start, self.pos)),
        }
    }

    /// `>`, `>>`, `>&N` with an optional leading fd number already consumed
    /// by the caller.
    fn lex_gt(&mut self, start: usize, left_fd: Option<u32>) -> Token {
        self.advance();
        if self.peek() == Some('>') {
            self.advance();
            return self.redirect_token(RedirectKind::AppendOut, left_fd, None, start);
        }
        if self.peek() == Some('&') {
            let save = self.pos;
            self.advance();
            if let Some(n) = self.try_consume_digits() {
                return self.redirect_token(RedirectKind::DupOut, left_fd, Some(n), start);
            }
            // "&" not followed by digits: not a valid ">&N" form per grammar;
            // treat the ">" as a plain Out and leave "&" for the next token.
            self.pos = save;
        }
        self.redirect_token(RedirectKind::Out, left_fd, None, start)
    }

    fn lex_lt(&mut self, start: usize, left_fd: Option<u32>) -> Token {
        self.advance();
        if self.peek() == Some('>') {
            self.advance();
            return self.redirect_token(RedirectKind::InOut, left_fd, None, start);
        }
        self.redirect_token(RedirectKind::In, left_fd, None, start)
    }

    fn redirect_token(
        &mut self,
        kind: RedirectKind,
        left_fd: Option<u32>,
        right_fd: Option<u32>,
        start: usize,
    ) -> Token {
        Token::new(
            TokenKind::Redirect(crate::token::RedirectToken {
                kind,
                left_fd,
                right_fd,
            }),
            Span::new(start, self.pos),
        )
    }

    fn try_consume_digits(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.pos == start {
            return None;
        }
        self.input[start..self.pos].parse::<u32>().ok()
    }

    /// §4.2 step 3: a leading decimal integer followed by a redirection
    /// operator becomes that redirection's `left_fd`. Otherwise the cursor
    /// is reset to `start` and `None` is returned so the caller falls
    /// through to ordinary word lexing, which re-consumes the digits as a
    /// literal prefix.
    fn try_lex_leading_number(&mut self, start: usize) -> Option<Token> {
        let n = self.try_consume_digits()?;
        match self.peek() {
            Some('>') => Some(self.lex_gt(start, Some(n))),
            Some('<') => Some(self.lex_lt(start, Some(n))),
            Some(next) if !is_word_boundary(next) => {
                // e.g. "123abc" or "123'x'" — not a redirection; the digits
                // are the start of a larger word.
                self.pos = start;
                None
            }
            _ => {
                // Digit run terminated at a real boundary with no
                // redirection operator: a standalone NUMBER token.
                let text = self.input[start..self.pos].to_string();
                let span = Span::new(start, self.pos);
                Some(Token::new(
                    TokenKind::Number(crate::ast::Word::from_literal(text, span)),
                    span,
                ))
            }
        }
    }

    fn lex_word_token(&mut self, start: usize) -> Token {
        match word::lex_word(self, start) {
            Ok(word) => {
                let span = word.span;
                Token::new(TokenKind::Word(word), span)
            }
            Err(e) => Token::new(TokenKind::Error(e.to_string()), e.span()),
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn input(&self) -> &'a str {
        self.input
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
