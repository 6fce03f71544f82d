mod child;
mod io_util;
mod registry;

use std::io::{self, Write};

use crate::{
    common::Error,
    log::{dev_info, dev_warn},
    parser::CommandDescriptor,
    system::{
        fork,
        interface::ProcessId,
        kill,
        signal::{consts::SIGTERM, SignalSet},
        wait::{Wait, WaitError, WaitOptions, WaitStatus},
        ForkResult,
    },
};

pub use registry::ChildRegistry;

use self::io_util::was_interrupted;

/// What the interpreter got back from running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran to completion.
    Foreground(WaitStatus),
    /// The command was detached and is tracked until it is reaped.
    Background(ProcessId),
}

/// Creates, waits for and reaps the processes of non-built-in commands.
#[derive(Debug, Default)]
pub struct Supervisor {
    registry: ChildRegistry,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ChildRegistry {
        &self.registry
    }

    /// Run `command` in a new process.
    ///
    /// Only a failure to create the process or to wait for it is reported as an error; a
    /// command that cannot be started shows up as its exit status.
    pub fn execute(&mut self, command: &CommandDescriptor) -> Result<Outcome, Error> {
        // Anything still buffered would otherwise be written twice.
        io::stdout().flush().ok();

        // Block all the signals until the child has its own dispositions, so it never runs the
        // interpreter's handlers.
        let original_set = match SignalSet::full().and_then(|set| set.block()) {
            Ok(original_set) => Some(original_set),
            Err(err) => {
                dev_warn!("cannot block signals: {err}");
                None
            }
        };

        // SAFETY: the interpreter is single threaded, so the child may allocate before `exec`.
        #[allow(unused_unsafe)]
        let forked = match unsafe { fork() } {
            Ok(ForkResult::Child) => child::exec(command, original_set.as_ref()),
            Ok(ForkResult::Parent(pid)) => Ok(pid),
            Err(err) => Err(err),
        };

        if let Some(set) = original_set {
            if let Err(err) = set.set_mask() {
                dev_warn!("cannot restore signal mask: {err}");
            }
        }

        let pid = forked.map_err(|err| {
            dev_warn!("unable to fork command process: {err}");
            Error::Fork(err)
        })?;

        dev_info!(
            "spawned {} as {pid} ({})",
            command.program(),
            if command.background {
                "background"
            } else {
                "foreground"
            }
        );

        if command.background {
            self.detach(pid);
            Ok(Outcome::Background(pid))
        } else {
            self.wait_foreground(pid).map(Outcome::Foreground)
        }
    }

    fn detach(&mut self, pid: ProcessId) {
        // The child has just started, so this almost never collects anything.
        let early = pid.wait(WaitOptions::new().no_hang());

        println_ignore_io_error!("Background pid is {pid}");

        match early {
            Ok((_, status)) => report_done(pid, status),
            Err(_) => {
                self.registry.insert(pid);
            }
        }
    }

    fn wait_foreground(&self, pid: ProcessId) -> Result<WaitStatus, Error> {
        let status = loop {
            match pid.wait(WaitOptions::new()) {
                Ok((_, status)) => break status,
                Err(WaitError::Io(err)) if was_interrupted(&err) => {}
                Err(WaitError::Io(err)) => return Err(Error::Wait(pid, err)),
                // Only returned for non-blocking waits.
                Err(WaitError::NotReady) => {}
            }
        };

        dev_info!("{pid} finished: {status:?}");

        if status.was_signaled() {
            println_ignore_io_error!("{status}");
        }

        Ok(status)
    }

    /// Collect every child that has finished, without blocking, and report it.
    ///
    /// Calling this when nothing has finished prints nothing and leaves the registry as is.
    pub fn reap_finished(&mut self) {
        loop {
            match ProcessId::any().wait(WaitOptions::new().no_hang()) {
                Ok((pid, status)) => {
                    if !self.registry.remove(pid) {
                        dev_info!("reaped untracked child {pid}");
                    }
                    report_done(pid, status);
                }
                Err(WaitError::NotReady) => break,
                Err(err) if err.is_no_child() => break,
                Err(WaitError::Io(err)) if was_interrupted(&err) => {}
                Err(WaitError::Io(err)) => {
                    dev_warn!("cannot reap children: {err}");
                    break;
                }
            }
        }
    }

    /// Ask every tracked background process to terminate. Does not wait for them.
    pub fn terminate_all(&self) {
        for pid in self.registry.iter() {
            if let Err(err) = kill(pid, SIGTERM) {
                dev_info!("cannot terminate {pid}: {err}");
            }
        }
    }
}

fn report_done(pid: ProcessId, status: WaitStatus) {
    println_ignore_io_error!("background pid {pid} is done: {status}");
}
