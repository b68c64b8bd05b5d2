// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The word expander (C4, §4.4).
//!
//! Converts a parsed [`Word`] into its final byte string using the shell's
//! environment, positional parameters, and tilde/backslash rules.
//! Deliberately does not perform word splitting or globbing — see the
//! crate-level notes on non-goals.

use crate::ast::{Word, WordPart};
use crate::vm::Vm;

/// Expand every component of `word` in order and concatenate the results.
pub fn expand_word(vm: &Vm, word: &Word) -> String {
    let mut out = String::new();
    for (i, part) in word.parts.iter().enumerate() {
        match part {
            WordPart::SQuoted(s) => out.push_str(s),
            WordPart::Literal(s) => {
                if i == 0 && s.starts_with('~') {
                    let (prefix, remainder) = split_tilde(vm, s);
                    out.push_str(&prefix);
                    out.push_str(&unescape_literal(remainder));
                } else {
                    out.push_str(&unescape_literal(s));
                }
            }
            WordPart::DQuoted(s) => out.push_str(&unescape_dquoted(s)),
            WordPart::VarSub(name) => out.push_str(&expand_var(vm, name)),
            // Reserved; always expand empty (§4.4).
            WordPart::BracedSub(_) | WordPart::CmdSub(_) => {}
        }
    }
    out
}

/// `~`, `~/x`, `~+`, `~-`, `~<user>` per §4.4. `s` starts with `~`; returns
/// the expanded prefix and the unconsumed remainder of `s` (still raw,
/// pending backslash processing by the caller).
fn split_tilde<'a>(vm: &Vm, s: &'a str) -> (String, &'a str) {
    let rest = &s[1..];
    let (name, remainder) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    let expansion = if name.is_empty() {
        vm.home_dir().unwrap_or_default()
    } else if name == "+" {
        vm.pwd.to_string_lossy().into_owned()
    } else if name == "-" {
        vm.old_pwd.to_string_lossy().into_owned()
    } else {
        match lookup_user_home(name) {
            Some(home) => home,
            // User not found: leave the "~..." prefix unchanged.
            None => return (format!("~{name}"), remainder),
        }
    };

    (expansion, remainder)
}

fn lookup_user_home(name: &str) -> Option<String> {
    let user = nix::unistd::User::from_name(name).ok().flatten()?;
    Some(user.dir.to_string_lossy().into_owned())
}

/// `Literal`: `\x` produces `x` for any `x`; a trailing backslash at
/// end-of-string is dropped silently.
fn unescape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// `DQuoted`: `\x` is literal `\x` unless `x ∈ {", \, $, backtick}`, in
/// which case it produces `x`.
fn unescape_dquoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(n) if matches!(n, '"' | '\\' | '$' | '`') => {
                out.push(n);
                chars.next();
            }
            Some(n) => {
                out.push('\\');
                out.push(n);
                chars.next();
            }
            None => out.push('\\'),
        }
    }
    out
}

fn expand_var(vm: &Vm, name: &str) -> String {
    match name {
        "?" => vm.last_exit_code.to_string(),
        "#" => vm.positional.len().to_string(),
        _ if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) => {
            let idx: usize = name.parse().unwrap_or(0);
            if idx == 0 {
                vm.script_name.clone()
            } else {
                vm.positional.get(idx - 1).cloned().unwrap_or_default()
            }
        }
        _ => std::env::var(name).unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
