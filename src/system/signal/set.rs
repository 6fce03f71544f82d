use crate::cutils::cerr;

use super::{handler::SignalHandlerBehavior, SignalNumber};

use std::{io, mem::MaybeUninit};

/// An installed or installable disposition for one signal.
#[repr(transparent)]
pub(super) struct SignalAction {
    raw: libc::sigaction,
}

impl SignalAction {
    pub(super) fn new(behavior: SignalHandlerBehavior) -> io::Result<Self> {
        let (handler, mask) = match behavior {
            SignalHandlerBehavior::Default => (libc::SIG_DFL, SignalSet::empty()?),
            SignalHandlerBehavior::Ignore => (libc::SIG_IGN, SignalSet::empty()?),
            // The catching function must never be re-entered.
            SignalHandlerBehavior::Call(function) => {
                (function as libc::sighandler_t, SignalSet::full()?)
            }
        };

        // SAFETY: `sigaction` is a plain C struct, all zeroes is a valid value for it.
        let mut raw: libc::sigaction = unsafe { std::mem::zeroed() };
        raw.sa_sigaction = handler;
        raw.sa_mask = mask.raw;
        // Terminal reads and child waits resume once the handler returns.
        raw.sa_flags = libc::SA_RESTART;

        Ok(Self { raw })
    }

    /// Install this action for `signal`, returning the one it replaced.
    pub(super) fn register(&self, signal: SignalNumber) -> io::Result<Self> {
        let mut replaced = MaybeUninit::<Self>::zeroed();

        cerr(unsafe { libc::sigaction(signal, &self.raw, replaced.as_mut_ptr().cast()) })?;

        Ok(unsafe { replaced.assume_init() })
    }
}

/// A set of signals, used as the blocked mask of the calling thread.
#[repr(transparent)]
pub(crate) struct SignalSet {
    raw: libc::sigset_t,
}

impl SignalSet {
    fn filled_by(
        init: unsafe extern "C" fn(*mut libc::sigset_t) -> libc::c_int,
    ) -> io::Result<Self> {
        let mut set = MaybeUninit::<Self>::zeroed();

        cerr(unsafe { init(set.as_mut_ptr().cast()) })?;

        Ok(unsafe { set.assume_init() })
    }

    pub(crate) fn empty() -> io::Result<Self> {
        Self::filled_by(libc::sigemptyset)
    }

    pub(crate) fn full() -> io::Result<Self> {
        Self::filled_by(libc::sigfillset)
    }

    fn change_mask(&self, how: libc::c_int) -> io::Result<Self> {
        let mut previous = MaybeUninit::<Self>::zeroed();

        cerr(unsafe { libc::sigprocmask(how, &self.raw, previous.as_mut_ptr().cast()) })?;

        Ok(unsafe { previous.assume_init() })
    }

    /// Add these signals to the blocked mask. Returns the mask as it was before.
    pub(crate) fn block(&self) -> io::Result<Self> {
        self.change_mask(libc::SIG_BLOCK)
    }

    /// Replace the blocked mask with exactly this set. Returns the mask as it was before.
    pub(crate) fn set_mask(&self) -> io::Result<Self> {
        self.change_mask(libc::SIG_SETMASK)
    }
}

#[cfg(test)]
mod tests {
    use super::SignalSet;
    use crate::system::signal::consts::SIGTSTP;

    fn is_blocked(signal: libc::c_int) -> bool {
        let current = SignalSet::empty().unwrap().block().unwrap();
        unsafe { libc::sigismember(&current.raw, signal) == 1 }
    }

    #[test]
    fn block_and_restore_mask() {
        // The mask is per thread, so this does not disturb other tests.
        let previous = SignalSet::full().unwrap().block().unwrap();
        assert!(is_blocked(SIGTSTP));

        previous.set_mask().unwrap();
        assert!(!is_blocked(SIGTSTP));
    }
}
