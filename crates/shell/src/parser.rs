// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser (C3, §4.3).
//!
//! One token of lookahead, no backtracking — every production either
//! commits after consuming a token or fails outright. The grammar:
//!
//! ```text
//! program   := (terminator* stmt)* terminator*
//! stmt      := or_expr [AMP]
//! or_expr   := and_expr (OR and_expr)*
//! and_expr  := not_expr (AND not_expr)*
//! not_expr  := NOT not_expr | pipeline
//! pipeline  := terminal (PIPE terminal)*
//! terminal  := subshell | command
//! subshell  := LPAREN (terminator* stmt)* terminator* RPAREN
//! command   := (WORD | NUMBER | redirect)*
//! redirect  := REDIRECT [WORD | NUMBER]
//! terminator := SEMICOLON | LINE_BREAK
//! ```
//!
//! A lone run of terminators (a blank line, a stray `;`) is accepted and
//! contributes no statement — it is not the same as an `EmptyCommand`
//! error, which is reserved for a genuine operand position (a pipeline or
//! AND-OR stage) that had nothing in it.

use crate::ast::{Command, Expr, ExprKind, Program, Redirection, Statement, Word};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub fn parse(input: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::tokenize(input);
    Parser::new(tokens).parse_program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(!tokens.is_empty());
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn prev_span_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].span.end
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    fn check_error_token(&self) -> Result<(), ParseError> {
        if let TokenKind::Error(msg) = self.peek().clone() {
            return Err(ParseError::UnexpectedToken {
                found: msg,
                expected: "valid token".to_string(),
                span: self.peek_span(),
            });
        }
        Ok(())
    }

    fn skip_terminators(&mut self) {
        while matches!(self.peek(), TokenKind::Semicolon | TokenKind::LineBreak) {
            self.advance();
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        loop {
            self.skip_terminators();
            if self.at_eof() || matches!(self.peek(), TokenKind::RParen) {
                break;
            }
            self.check_error_token()?;
            statements.push(self.parse_statement()?);
            if !self.at_eof()
                && !matches!(
                    self.peek(),
                    TokenKind::RParen | TokenKind::Semicolon | TokenKind::LineBreak
                )
            {
                return Err(ParseError::unexpected(
                    self.peek(),
                    "';', newline, or end of input",
                    self.peek_span(),
                ));
            }
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.peek_span().start;
        let mut expr = self.parse_or()?;
        if matches!(self.peek(), TokenKind::Amp) {
            self.advance();
            expr.background = true;
        }
        expr.span = Span::new(start, self.prev_span_end());
        Ok(Statement { expr })
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), TokenKind::Or) {
            let start = left.span.start;
            self.advance();
            self.skip_terminators();
            let right = self.parse_and()?;
            let span = Span::new(start, right.span.end);
            left = Expr {
                kind: ExprKind::Or {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                background: false,
                span,
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while matches!(self.peek(), TokenKind::And) {
            let start = left.span.start;
            self.advance();
            self.skip_terminators();
            let right = self.parse_not()?;
            let span = Span::new(start, right.span.end);
            left = Expr {
                kind: ExprKind::And {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                background: false,
                span,
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek(), TokenKind::Not) {
            let start = self.peek_span().start;
            self.advance();
            let child = self.parse_not()?;
            let span = Span::new(start, child.span.end);
            return Ok(Expr {
                kind: ExprKind::Not {
                    child: Box::new(child),
                },
                background: false,
                span,
            });
        }
        self.parse_pipeline()
    }

    fn parse_pipeline(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_terminal()?;
        while matches!(self.peek(), TokenKind::Pipe) {
            let start = left.span.start;
            self.advance();
            self.skip_terminators();
            let right = self.parse_terminal()?;
            let span = Span::new(start, right.span.end);
            left = Expr {
                kind: ExprKind::Pipeline {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                background: false,
                span,
            };
        }
        Ok(left)
    }

    fn parse_terminal(&mut self) -> Result<Expr, ParseError> {
        self.check_error_token()?;
        if matches!(self.peek(), TokenKind::LParen) {
            self.parse_subshell()
        } else {
            self.parse_command()
        }
    }

    fn parse_subshell(&mut self) -> Result<Expr, ParseError> {
        let start = self.peek_span().start;
        self.advance();

        let mut statements = Vec::new();
        loop {
            self.skip_terminators();
            if matches!(self.peek(), TokenKind::RParen) {
                break;
            }
            if self.at_eof() {
                return Err(ParseError::UnexpectedEof {
                    expected: "')'".to_string(),
                    span: self.peek_span(),
                });
            }
            self.check_error_token()?;
            statements.push(self.parse_statement()?);
            if !matches!(
                self.peek(),
                TokenKind::RParen | TokenKind::Semicolon | TokenKind::LineBreak
            ) {
                return Err(ParseError::unexpected(
                    self.peek(),
                    "';', newline, or ')'",
                    self.peek_span(),
                ));
            }
        }
        self.advance();
        let end = self.prev_span_end();
        Ok(Expr {
            kind: ExprKind::Subshell(Program { statements }),
            background: false,
            span: Span::new(start, end),
        })
    }

    fn parse_command(&mut self) -> Result<Expr, ParseError> {
        let start = self.peek_span().start;
        let mut name: Option<Word> = None;
        let mut args = Vec::new();
        let mut redirs = Vec::new();

        loop {
            match self.peek().clone() {
                TokenKind::Word(w) | TokenKind::Number(w) => {
                    self.advance();
                    match &mut name {
                        None => name = Some(w),
                        Some(_) => args.push(w),
                    }
                }
                TokenKind::Redirect(rt) => {
                    let redir_start = self.peek_span().start;
                    self.advance();
                    let filename = if rt.right_fd.is_none() {
                        match self.peek().clone() {
                            TokenKind::Word(w) | TokenKind::Number(w) => {
                                self.advance();
                                Some(w)
                            }
                            _ => {
                                return Err(ParseError::unexpected(
                                    self.peek(),
                                    "filename",
                                    self.peek_span(),
                                ))
                            }
                        }
                    } else {
                        None
                    };
                    redirs.push(Redirection {
                        kind: rt.kind,
                        left_fd: rt.left_fd,
                        right_fd: rt.right_fd,
                        filename,
                        span: Span::new(redir_start, self.prev_span_end()),
                    });
                }
                TokenKind::Error(msg) => {
                    return Err(ParseError::UnexpectedToken {
                        found: msg,
                        expected: "valid token".to_string(),
                        span: self.peek_span(),
                    })
                }
                _ => break,
            }
        }

        let span = Span::new(start, self.prev_span_end().max(start));

        let cmd = Command {
            name: name.unwrap_or_else(Word::empty),
            args,
            redirs,
            span,
        };

        if cmd.is_empty() && cmd.redirs.is_empty() {
            return Err(ParseError::EmptyCommand { span });
        }

        Ok(Expr {
            kind: ExprKind::Command(cmd),
            background: false,
            span,
        })
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
