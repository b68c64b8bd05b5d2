// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cash`: a small interactive Unix shell.
//!
//! Three invocation modes: `-c COMMAND` runs one command string and exits,
//! `cash SCRIPT [ARGS...]` runs a script file, and bare `cash` starts an
//! interactive read-eval-print loop over `rustyline`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cash_shell::{run_source, InvocationMode, Vm};

#[derive(Debug, Parser)]
#[command(name = "cash", version, about = "A small interactive Unix shell")]
struct Cli {
    /// Run COMMAND instead of reading from a script or a terminal.
    #[arg(short = 'c', value_name = "COMMAND")]
    command: Option<String>,

    /// Script file to run. Omit to start an interactive shell.
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Positional parameters ($1, $2, ...) for -c or SCRIPT.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

/// Carries a process exit code out of `main`'s fallible paths instead of
/// calling `std::process::exit` directly from deep inside `run`.
struct ExitError {
    code: i32,
    message: Option<String>,
}

impl ExitError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => exit_code(code),
        Err(e) => {
            if let Some(msg) = e.message {
                eprintln!("cash: {msg}");
            }
            exit_code(e.code)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}

fn run(cli: Cli) -> Result<i32, ExitError> {
    if let Some(command) = cli.command {
        tracing::debug!("running -c command string");
        let mut vm = Vm::new(InvocationMode::Command, "cash".to_string(), cli.args);
        return Ok(run_source(&mut vm, &command));
    }

    if let Some(script) = cli.script {
        tracing::debug!(script = %script.display(), "running script");
        let source = std::fs::read_to_string(&script)
            .map_err(|e| ExitError::new(1, format!("{}: {e}", script.display())))?;
        let mut vm = Vm::new(
            InvocationMode::Script,
            script.display().to_string(),
            cli.args,
        );
        return Ok(run_source(&mut vm, &source));
    }

    if !nix::unistd::isatty(0).unwrap_or(false) {
        tracing::debug!("stdin is not a tty, reading it as a script");
        use std::io::Read;
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| ExitError::new(1, format!("stdin: {e}")))?;
        let mut vm = Vm::new(InvocationMode::Script, "cash".to_string(), cli.args);
        return Ok(run_source(&mut vm, &source));
    }

    run_interactive()
}

fn run_interactive() -> Result<i32, ExitError> {
    let mut vm = Vm::new(InvocationMode::Interactive, "cash".to_string(), Vec::new());
    let mut editor = DefaultEditor::new()
        .map_err(|e| ExitError::new(1, format!("could not start line editor: {e}")))?;

    loop {
        if vm.exit_requested {
            return Ok(vm.exit_code_on_request);
        }

        match editor.readline(&vm.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                run_source(&mut vm, &line);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(vm.last_exit_code),
            Err(e) => return Err(ExitError::new(1, format!("readline error: {e}"))),
        }
    }
}
