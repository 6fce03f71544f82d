#![forbid(unsafe_code)]
use std::io::{self, BufRead};

use crate::common::Error;
use crate::exec::{Outcome, Supervisor};
use crate::log::{dev_info, user_error, user_warn};
use crate::mode;
use crate::parser::{expand_pid, CommandDescriptor};
use crate::system::{getpid, interface::ProcessId, wait::WaitStatus};

use builtin::Builtin;

mod builtin;

const PROMPT: &str = ": ";

/// What one line of input asked the interpreter to do next.
enum Flow {
    Continue,
    Exit,
}

struct Shell {
    pid: ProcessId,
    supervisor: Supervisor,
    last_status: WaitStatus,
}

impl Shell {
    fn new() -> Self {
        Self {
            pid: getpid(),
            supervisor: Supervisor::new(),
            last_status: WaitStatus::success(),
        }
    }

    fn run_line(&mut self, line: &str) -> Result<Flow, Error> {
        let line = expand_pid(line, self.pid);
        let Some(command) = CommandDescriptor::parse(&line, mode::current()) else {
            return Ok(Flow::Continue);
        };

        match Builtin::lookup(&command) {
            Some(Builtin::Exit) => {
                builtin::exit(&self.supervisor);
                return Ok(Flow::Exit);
            }
            Some(Builtin::Cd) => builtin::cd(&command),
            Some(Builtin::Status) => builtin::status(self.last_status),
            None => {
                if let Outcome::Foreground(status) = self.supervisor.execute(&command)? {
                    self.last_status = status;
                }
                self.supervisor.reap_finished();
            }
        }

        Ok(Flow::Continue)
    }

    fn read_loop(&mut self, input: impl BufRead) -> Result<(), Error> {
        let mut lines = input.lines();
        loop {
            print_ignore_io_error!("{PROMPT}");

            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) if err.kind() == io::ErrorKind::Interrupted => continue,
                Some(Err(err)) if err.kind() == io::ErrorKind::InvalidData => {
                    user_warn!("ignoring line: {err}");
                    continue;
                }
                Some(Err(err)) => return Err(err.into()),
                None => {
                    dev_info!("end of input");
                    builtin::exit(&self.supervisor);
                    return Ok(());
                }
            };

            if let Flow::Exit = self.run_line(&line)? {
                return Ok(());
            }
        }
    }
}

fn shell_process() -> Result<(), Error> {
    crate::log::ShellLogger::new("smallsh: ").into_global_logger();

    dev_info!("development logs are enabled");

    mode::install()?;

    Shell::new().read_loop(io::stdin().lock())
}

pub fn main() {
    match shell_process() {
        Ok(()) => (),
        Err(error) => {
            user_error!("{error}");
            std::process::exit(1);
        }
    }
}
