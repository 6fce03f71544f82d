use std::path::PathBuf;

use crate::{
    exec::Supervisor, log::dev_info, parser::CommandDescriptor, system::chdir,
    system::wait::WaitStatus,
};

const HOME_SHORTHAND: &str = "~";

/// The commands the interpreter runs itself instead of spawning a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Builtin {
    Exit,
    Cd,
    Status,
}

impl Builtin {
    pub(super) fn lookup(command: &CommandDescriptor) -> Option<Self> {
        match command.program() {
            "exit" => Some(Builtin::Exit),
            "cd" => Some(Builtin::Cd),
            "status" => Some(Builtin::Status),
            _ => None,
        }
    }
}

/// End the interpreter's background work; the caller then leaves the read loop.
pub(super) fn exit(supervisor: &Supervisor) {
    if !supervisor.registry().is_empty() {
        dev_info!(
            "terminating {} background process(es)",
            supervisor.registry().len()
        );
    }
    supervisor.terminate_all();
}

/// Where `cd` goes: `$HOME` without an argument or with `~`, the argument otherwise.
fn cd_target(command: &CommandDescriptor, home: Option<PathBuf>) -> Option<PathBuf> {
    match command.argv.get(1).map(String::as_str) {
        None | Some(HOME_SHORTHAND) => home,
        Some(dir) => Some(PathBuf::from(dir)),
    }
}

pub(super) fn cd(command: &CommandDescriptor) {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let Some(target) = cd_target(command, home) else {
        println_ignore_io_error!("cd: HOME not set");
        return;
    };

    if let Err(err) = chdir(&target) {
        println_ignore_io_error!("cd: {}: {err}", target.display());
    }
}

pub(super) fn status(last: WaitStatus) {
    println_ignore_io_error!("{last}");
}
