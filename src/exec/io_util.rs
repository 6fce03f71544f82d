use std::io;

/// A wait that failed with `EINTR` can simply be issued again.
pub(super) fn was_interrupted(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Interrupted
}
