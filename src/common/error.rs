use crate::system::interface::ProcessId;
use std::fmt;

/// Errors that end the interpreter. Failures local to a spawned child never become an
/// [`Error`]; they are reported through the child's exit status instead.
#[derive(Debug)]
pub enum Error {
    Fork(std::io::Error),
    Wait(ProcessId, std::io::Error),
    Signal(&'static str, std::io::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fork(e) => write!(f, "cannot create process: {e}"),
            Error::Wait(pid, e) => write!(f, "cannot wait for process {pid}: {e}"),
            Error::Signal(name, e) => write!(f, "cannot set disposition for {name}: {e}"),
            Error::Io(e) => write!(f, "cannot read input: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
