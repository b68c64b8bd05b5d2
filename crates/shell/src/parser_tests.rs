// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse_ok(input: &str) -> Program {
    parse(input).unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"))
}

#[test]
fn single_command_with_args() {
    let program = parse_ok("echo hello world");
    assert_eq!(program.statements.len(), 1);
    match &program.statements[0].expr.kind {
        ExprKind::Command(cmd) => assert_eq!(cmd.args.len(), 2),
        other => panic!("expected command, got {other:?}"),
    }
}

#[test]
fn and_or_precedence_is_left_associative() {
    let program = parse_ok("a && b || c");
    match &program.statements[0].expr.kind {
        ExprKind::Or { left, .. } => {
            assert!(matches!(left.kind, ExprKind::And { .. }));
        }
        other => panic!("expected or at top, got {other:?}"),
    }
}

#[test]
fn pipeline_flattens_to_three_commands() {
    let program = parse_ok("a | b | c");
    let flat = program.statements[0]
        .expr
        .flatten_pipeline()
        .expect("pure command pipeline");
    assert_eq!(flat.len(), 3);
}

#[test]
fn not_binds_tighter_than_and() {
    let program = parse_ok("! a && b");
    match &program.statements[0].expr.kind {
        ExprKind::And { left, .. } => assert!(matches!(left.kind, ExprKind::Not { .. })),
        other => panic!("expected and at top, got {other:?}"),
    }
}

#[test]
fn trailing_ampersand_sets_background() {
    let program = parse_ok("sleep 1 &");
    assert!(program.statements[0].expr.background);
}

#[test]
fn subshell_wraps_nested_program() {
    let program = parse_ok("(a; b)");
    match &program.statements[0].expr.kind {
        ExprKind::Subshell(inner) => assert_eq!(inner.statements.len(), 2),
        other => panic!("expected subshell, got {other:?}"),
    }
}

#[test]
fn redirect_attaches_filename_word() {
    let program = parse_ok("cmd > out.txt");
    match &program.statements[0].expr.kind {
        ExprKind::Command(cmd) => {
            assert_eq!(cmd.redirs.len(), 1);
            assert!(cmd.redirs[0].filename.is_some());
        }
        other => panic!("expected command, got {other:?}"),
    }
}

#[test]
fn redirection_only_command_is_valid() {
    let program = parse_ok("> out.txt");
    match &program.statements[0].expr.kind {
        ExprKind::Command(cmd) => assert!(cmd.name.is_empty() && !cmd.redirs.is_empty()),
        other => panic!("expected command, got {other:?}"),
    }
}

#[test]
fn blank_input_parses_to_empty_program() {
    let program = parse_ok("   \n\n  ");
    assert!(program.statements.is_empty());
}

#[test]
fn lone_semicolon_parses_to_empty_program() {
    let program = parse_ok(";;;");
    assert!(program.statements.is_empty());
}

#[test]
fn dangling_pipe_is_empty_command_error() {
    let err = parse("a |").expect_err("trailing pipe with no rhs");
    assert!(matches!(err, ParseError::EmptyCommand { .. }));
}

#[test]
fn unterminated_quote_surfaces_as_lex_error() {
    let err = parse("echo 'abc").expect_err("unterminated quote");
    assert!(matches!(err, ParseError::Lex(_)));
}
