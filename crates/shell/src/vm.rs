// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide shell state (C7, §4.7).
//!
//! One [`Vm`] is constructed per shell process and threaded by mutable
//! reference through the parser, expander, executor, and job manager. It
//! owns the job list, the current/previous working directory, the last
//! exit code, the positional parameters, and whatever terminal state the
//! shell must save and restore around foreground job transfers.

use std::path::{Path, PathBuf};

use nix::sys::termios::Termios;
use nix::unistd::{getpid, isatty, Pid, Uid};

use crate::job::JobList;

/// How the shell was invoked — drives `$0`'s value and whether job control
/// and line editing are engaged at all (§4.7, §9 open question on `$0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    Interactive,
    Command,
    Script,
}

pub struct Vm {
    pub prompt: String,
    pub pwd: PathBuf,
    pub old_pwd: PathBuf,
    pub uid: Uid,
    pub exit_requested: bool,
    pub exit_code_on_request: i32,
    pub last_exit_code: i32,
    pub shell_pgid: Pid,
    pub saved_shell_terminal_state: Option<Termios>,
    pub is_interactive: bool,
    pub jobs: JobList,
    pub positional: Vec<String>,
    pub script_name: String,
    home_dir: Option<String>,
}

impl Vm {
    /// Builds shell state for a freshly-started process. `script_name` is
    /// `$0`'s value, resolved once at startup; per the open question this
    /// project left for the original author, we report the value the CLI
    /// layer passes in — the invoking shell path for `-i`/`-c`, or the
    /// script path for a script invocation — never the executable's own
    /// path, since that is rarely what scripts expect from `$0`.
    pub fn new(mode: InvocationMode, script_name: String, positional: Vec<String>) -> Self {
        let pwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        let is_interactive = mode == InvocationMode::Interactive && isatty(0).unwrap_or(false);
        std::env::set_var("PWD", &pwd);
        std::env::set_var("OLDPWD", &pwd);

        let mut vm = Self {
            prompt: String::new(),
            old_pwd: pwd.clone(),
            pwd,
            uid: Uid::current(),
            exit_requested: false,
            exit_code_on_request: 0,
            last_exit_code: 0,
            shell_pgid: getpid(),
            saved_shell_terminal_state: None,
            is_interactive,
            jobs: JobList::default(),
            positional,
            script_name,
            home_dir: dirs::home_dir().map(|p| p.to_string_lossy().into_owned()),
        };
        vm.rebuild_prompt();
        vm
    }

    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new(InvocationMode::Script, "cash".to_string(), Vec::new())
    }

    pub fn home_dir(&self) -> Option<String> {
        self.home_dir.clone()
    }

    /// `cd` without an explicit target goes here; keeps `old_pwd` honest for
    /// `~-` expansion (§4.4, §4.5). Updates `PWD`/`OLDPWD` and the prompt to
    /// match, per §4.5's "Update OLDPWD and PWD env vars and the prompt".
    pub fn change_dir(&mut self, target: &Path) -> std::io::Result<()> {
        let resolved = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.pwd.join(target)
        };
        std::env::set_current_dir(&resolved)?;
        let new_pwd = std::env::current_dir()?;
        self.old_pwd = std::mem::replace(&mut self.pwd, new_pwd);
        std::env::set_var("OLDPWD", &self.old_pwd);
        std::env::set_var("PWD", &self.pwd);
        self.rebuild_prompt();
        Ok(())
    }

    /// Rebuilds `prompt` from the current user and `pwd`, grounded on the
    /// original's `make_new_prompt` (`username:cwd$ `), minus its ANSI color
    /// codes — styling beyond the `ls --color=auto` rule is out of scope.
    fn rebuild_prompt(&mut self) {
        let username = nix::unistd::User::from_uid(self.uid)
            .ok()
            .flatten()
            .map(|u| u.name)
            .unwrap_or_else(|| "cash".to_string());
        self.prompt = format!("{}:{}$ ", username, self.pwd.display());
    }

    pub fn request_exit(&mut self, code: i32) {
        self.exit_requested = true;
        self.exit_code_on_request = code;
    }
}

#[cfg(test)]
#[path = "vm_tests.rs"]
mod tests;
