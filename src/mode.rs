//! Foreground-only mode, toggled by the suspend keystroke.
//!
//! The interpreter ignores `SIGINT` for its whole life and catches `SIGTSTP`. Each `SIGTSTP`
//! flips a single atomic flag and writes a pre-formatted notice straight to the stdout file
//! descriptor. Nothing else happens in signal context: no allocation, no locks, no logging.
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    common::Error,
    cutils::{errno, set_errno},
    log::dev_info,
    system::signal::{consts::*, SignalHandler, SignalHandlerBehavior, SignalNumber},
};

static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

const ENTER_NOTICE: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n: ";
const EXIT_NOTICE: &[u8] = b"\nExiting foreground-only mode\n: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    BackgroundAllowed,
    ForegroundOnly,
}

impl Mode {
    pub fn allows_background(self) -> bool {
        self == Mode::BackgroundAllowed
    }

    fn from_flag(foreground_only: bool) -> Self {
        if foreground_only {
            Mode::ForegroundOnly
        } else {
            Mode::BackgroundAllowed
        }
    }

    fn notice(self) -> &'static [u8] {
        match self {
            Mode::ForegroundOnly => ENTER_NOTICE,
            Mode::BackgroundAllowed => EXIT_NOTICE,
        }
    }
}

/// The mode in effect right now.
pub fn current() -> Mode {
    Mode::from_flag(FOREGROUND_ONLY.load(Ordering::SeqCst))
}

/// Flip the mode and return the new one.
pub(crate) fn toggle() -> Mode {
    Mode::from_flag(!FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst))
}

extern "C" fn on_suspend(_signal: SignalNumber) {
    let saved = errno();
    let notice = toggle().notice();
    // SAFETY: `write` is async-signal-safe and `notice` is a static buffer.
    unsafe { libc::write(libc::STDOUT_FILENO, notice.as_ptr().cast(), notice.len()) };
    set_errno(saved);
}

/// Install the interpreter's own dispositions. They stay in place for the life of the process.
pub fn install() -> Result<(), Error> {
    SignalHandler::register(SIGINT, SignalHandlerBehavior::Ignore)
        .map_err(|err| Error::Signal("SIGINT", err))?
        .forget();
    SignalHandler::register(SIGTSTP, SignalHandlerBehavior::Call(on_suspend))
        .map_err(|err| Error::Signal("SIGTSTP", err))?
        .forget();

    dev_info!("signal dispositions installed, mode is {:?}", current());
    Ok(())
}
