// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The executor (C5, §4.5).
//!
//! Walks a parsed [`Program`] statement by statement, materialising each
//! [`Command`] into a [`RawCommand`] (name resolved against `PATH`, words
//! expanded, redirections realised) and handing simple commands and
//! pipelines to the job manager. `&&`, `||`, `!`, and `(...)` are evaluated
//! directly here since they never need a forked process of their own,
//! except when the whole statement is backgrounded.

use std::ffi::CString;

use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, AccessFlags, ForkResult};

use crate::ast::{Command, Expr, ExprKind, Program};
use crate::builtins;
use crate::expand;
use crate::job::{self, RawCommand, RawRedirection};
use crate::vm::Vm;

pub fn execute_program(vm: &mut Vm, program: &Program) -> i32 {
    let mut code = 0;
    for stmt in &program.statements {
        code = execute_top_level(vm, &stmt.expr);
        vm.last_exit_code = code;
        job::do_job_notification(vm);
        if vm.exit_requested {
            break;
        }
    }
    code
}

fn execute_top_level(vm: &mut Vm, expr: &Expr) -> i32 {
    if expr.background {
        execute_background(vm, expr)
    } else {
        execute_expr(vm, expr)
    }
}

/// Backgrounding a bare command or pipeline goes through the job manager so
/// `jobs`/`fg` can see it. Backgrounding a compound expression (`a && b &`)
/// has no slot in the job manager's simple-command `Process` model, so it
/// degrades to fire-and-forget (documented simplification, see DESIGN.md).
fn execute_background(vm: &mut Vm, expr: &Expr) -> i32 {
    match &expr.kind {
        ExprKind::Command(cmd) if !cmd.is_empty() => {
            let raw = materialize_command(vm, cmd);
            let text = raw.argv.join(" ");
            job::launch_job(vm, vec![raw], true, text)
        }
        ExprKind::Pipeline { .. } => execute_pipeline(vm, expr, true),
        _ => execute_compound_background(vm, expr),
    }
}

fn execute_compound_background(vm: &mut Vm, expr: &Expr) -> i32 {
    // SAFETY: single-threaded shell; the child either completes the nested
    // expression and exits, or has already done so by the time this returns.
    match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            let code = execute_expr(vm, expr);
            std::process::exit(code);
        }
        Ok(ForkResult::Parent { child }) => {
            eprintln!("[bg] {child}");
            0
        }
        Err(_) => {
            eprintln!("cash: fork: could not fork background job");
            1
        }
    }
}

fn execute_expr(vm: &mut Vm, expr: &Expr) -> i32 {
    match &expr.kind {
        ExprKind::Command(cmd) => execute_command(vm, cmd),
        ExprKind::Pipeline { .. } => execute_pipeline(vm, expr, false),
        ExprKind::And { left, right } => {
            let l = execute_expr(vm, left);
            if l == 0 {
                execute_expr(vm, right)
            } else {
                l
            }
        }
        ExprKind::Or { left, right } => {
            let l = execute_expr(vm, left);
            if l != 0 {
                execute_expr(vm, right)
            } else {
                l
            }
        }
        ExprKind::Not { child } => i32::from(execute_expr(vm, child) != 0),
        ExprKind::Subshell(program) => execute_subshell(vm, program, false),
    }
}

fn execute_command(vm: &mut Vm, cmd: &Command) -> i32 {
    // The grammar requires a command to have at least one word or
    // redirection, so this is unreachable in practice; kept as the
    // documented no-op fallback (§4.5).
    if cmd.is_empty() && cmd.redirs.is_empty() {
        return vm.last_exit_code;
    }
    let raw = materialize_command(vm, cmd);
    if let Some(builtin) = builtins::lookup(&raw.name) {
        return builtins::run(vm, builtin, &raw);
    }
    let text = raw.argv.join(" ");
    job::launch_job(vm, vec![raw], false, text)
}

fn execute_pipeline(vm: &mut Vm, expr: &Expr, background: bool) -> i32 {
    match expr.flatten_pipeline() {
        Some(commands) if !commands.is_empty() => {
            let raws: Vec<RawCommand> = commands
                .iter()
                .map(|c| materialize_command(vm, c))
                .collect();
            let text = raws
                .iter()
                .map(|r| r.argv.join(" "))
                .collect::<Vec<_>>()
                .join(" | ");
            job::launch_job(vm, raws, background, text)
        }
        _ => {
            // The grammar allows a subshell as a pipeline stage; the job
            // manager's Process model (ported from a simple-command-only
            // original) has no slot for one.
            eprintln!("cash: subshells are not supported as pipeline stages");
            1
        }
    }
}

fn execute_subshell(vm: &mut Vm, program: &Program, background: bool) -> i32 {
    // SAFETY: see execute_compound_background.
    match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            let code = execute_program(vm, program);
            std::process::exit(code);
        }
        Ok(ForkResult::Parent { child }) => {
            if background {
                eprintln!("[bg] {child}");
                0
            } else {
                match waitpid(child, None) {
                    Ok(WaitStatus::Exited(_, code)) => code,
                    Ok(WaitStatus::Signaled(_, sig, _)) => 128 + sig as i32,
                    _ => 1,
                }
            }
        }
        Err(_) => {
            eprintln!("cash: fork: could not fork subshell");
            1
        }
    }
}

/// Expands every word, resolves the executable against `PATH`, and applies
/// the `ls --color=auto` cosmetic rule (§4.5).
fn materialize_command(vm: &Vm, cmd: &Command) -> RawCommand {
    let name = expand::expand_word(vm, &cmd.name);
    let mut argv = Vec::with_capacity(cmd.args.len() + 1);
    argv.push(name.clone());
    for arg in &cmd.args {
        argv.push(expand::expand_word(vm, arg));
    }
    // An empty name with only redirections substitutes /bin/true (§4.5) —
    // the command exists solely to carry the redirection's side effect.
    if name.is_empty() && !cmd.redirs.is_empty() {
        argv = vec!["/bin/true".to_string()];
    }
    apply_ls_color_rule(&name, &mut argv);

    let resolved = resolve_executable(argv[0].as_str()).unwrap_or_else(|| argv[0].clone());

    let redirs = cmd
        .redirs
        .iter()
        .map(|r| {
            let filename = r.filename.as_ref().map(|w| expand::expand_word(vm, w));
            RawRedirection::from_ast(r, filename)
        })
        .collect();

    RawCommand {
        name: resolved,
        argv,
        redirs,
    }
}

/// `ls` invoked with no `--color...` argument of its own gets `--color=auto`
/// appended, matching the cosmetic convenience most interactive shells wire
/// up via an alias (§4.5).
fn apply_ls_color_rule(name: &str, argv: &mut Vec<String>) {
    if name == "ls" && !argv.iter().any(|a| a.starts_with("--color")) {
        argv.push("--color=auto".to_string());
    }
}

fn is_executable(path: &str) -> bool {
    nix::unistd::access(path, AccessFlags::X_OK).is_ok()
}

/// Resolves a bare command name against `PATH`, or checks a path containing
/// a `/` directly. Returns `None` if nothing executable is found, in which
/// case the original name is left for `execve` to fail on with `ENOENT`.
fn resolve_executable(name: &str) -> Option<String> {
    if name.contains('/') {
        return is_executable(name).then(|| name.to_string());
    }
    let path_var = std::env::var("PATH").unwrap_or_default();
    for dir in path_var.split(':') {
        let candidate = if dir.is_empty() {
            format!("./{name}")
        } else {
            format!("{dir}/{name}")
        };
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Replaces the current process image. Only returns on failure — success
/// never returns here at all (§4.6).
pub fn exec_replace(raw: &RawCommand) -> nix::Error {
    let path = match CString::new(raw.name.as_str()) {
        Ok(p) => p,
        Err(_) => return nix::Error::EINVAL,
    };
    let argv: Result<Vec<CString>, _> =
        raw.argv.iter().map(|a| CString::new(a.as_str())).collect();
    let argv = match argv {
        Ok(v) => v,
        Err(_) => return nix::Error::EINVAL,
    };
    let env: Vec<CString> = std::env::vars()
        .filter_map(|(k, v)| CString::new(format!("{k}={v}")).ok())
        .collect();

    match nix::unistd::execve(&path, &argv, &env) {
        Ok(_) => nix::Error::UnknownErrno,
        Err(e) => e,
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
