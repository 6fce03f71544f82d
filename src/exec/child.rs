//! Everything that runs between process creation and program image replacement.
//!
//! Any failure here is local to the child: it is printed on stdout and turned into exit
//! status 1, which the interpreter later observes through its wait.
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, Write},
    mem::ManuallyDrop,
    os::{
        fd::{FromRawFd, RawFd},
        unix::{fs::OpenOptionsExt, process::CommandExt},
    },
    path::Path,
    process::Command,
};

use crate::{
    log::{dev_info, dev_warn, user_error},
    parser::CommandDescriptor,
    system::{
        _exit, dup2,
        signal::{consts::*, SignalHandler, SignalHandlerBehavior, SignalNumber, SignalSet},
    },
};

const NULL_DEVICE: &str = "/dev/null";
const OUTPUT_MODE: u32 = 0o644;
const FAILURE: libc::c_int = 1;

#[derive(Clone, Copy)]
enum Stream {
    Input,
    Output,
}

impl Stream {
    fn fd(self) -> RawFd {
        match self {
            Stream::Input => libc::STDIN_FILENO,
            Stream::Output => libc::STDOUT_FILENO,
        }
    }

    fn direction(self) -> &'static str {
        match self {
            Stream::Input => "input",
            Stream::Output => "output",
        }
    }

    // `std` opens files close-on-exec, so only the duplicate installed by `dup2` reaches the
    // new program.
    fn open(self, path: &Path) -> io::Result<File> {
        match self {
            Stream::Input => File::open(path),
            Stream::Output => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(OUTPUT_MODE)
                .open(path),
        }
    }

    /// Pick what the stream gets bound to: an explicit path wins, background jobs fall back to
    /// the null device and foreground jobs keep the inherited stream.
    fn target<'a>(self, command: &'a CommandDescriptor) -> Option<&'a Path> {
        let explicit = match self {
            Stream::Input => command.input.as_deref(),
            Stream::Output => command.output.as_deref(),
        };

        explicit.or_else(|| command.background.then(|| Path::new(NULL_DEVICE)))
    }

    fn redirect(self, command: &CommandDescriptor) {
        let Some(path) = self.target(command) else {
            return;
        };

        let file = match self.open(path) {
            Ok(file) => file,
            Err(err) => {
                dev_info!("cannot open {}: {err}", path.display());
                report(format_args!(
                    "cannot open {} for {}",
                    path.display(),
                    self.direction()
                ));
                _exit(FAILURE);
            }
        };

        if let Err(err) = dup2(&file, self.fd()) {
            user_error!("dup2: {err}");
            _exit(FAILURE);
        }
    }
}

/// Write a line straight to the standard output descriptor.
///
/// The process may have been forked while another thread held the lock of `std::io::stdout`,
/// so that handle is off limits here.
fn report(message: fmt::Arguments<'_>) {
    // SAFETY: the descriptor is only borrowed; `ManuallyDrop` keeps it open.
    let mut stdout = ManuallyDrop::new(unsafe { File::from_raw_fd(libc::STDOUT_FILENO) });
    let _ = writeln!(stdout, "{message}");
}

fn set_disposition(signal: SignalNumber, behavior: SignalHandlerBehavior) {
    match SignalHandler::register(signal, behavior) {
        Ok(handler) => handler.forget(),
        Err(err) => dev_warn!("cannot set disposition in child: {err}"),
    }
}

/// Configure the freshly created process for `command` and replace its image.
///
/// `original_set` is the signal mask to restore once the dispositions are in place.
pub(super) fn exec(command: &CommandDescriptor, original_set: Option<&SignalSet>) -> ! {
    Stream::Input.redirect(command);
    Stream::Output.redirect(command);

    // The suspend keystroke only ever toggles the interpreter's mode.
    set_disposition(SIGTSTP, SignalHandlerBehavior::Ignore);
    if !command.background {
        set_disposition(SIGINT, SignalHandlerBehavior::Default);
    }

    if let Some(set) = original_set {
        if let Err(err) = set.set_mask() {
            dev_warn!("cannot restore signal mask: {err}");
        }
    }

    let err = Command::new(command.program())
        .args(command.arguments())
        .exec();

    dev_warn!("failed to execute {}: {err}", command.program());
    report(format_args!(
        "{}: no such file or directory",
        command.program()
    ));
    _exit(FAILURE)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{Stream, NULL_DEVICE};
    use crate::{mode::Mode, parser::CommandDescriptor};

    fn parse(line: &str) -> CommandDescriptor {
        CommandDescriptor::parse(line, Mode::BackgroundAllowed).unwrap()
    }

    #[test]
    fn foreground_keeps_inherited_streams() {
        let cmd = parse("cat");
        assert_eq!(Stream::Input.target(&cmd), None);
        assert_eq!(Stream::Output.target(&cmd), None);
    }

    #[test]
    fn background_defaults_to_null_device() {
        let cmd = parse("cat &");
        assert_eq!(Stream::Input.target(&cmd), Some(Path::new(NULL_DEVICE)));
        assert_eq!(Stream::Output.target(&cmd), Some(Path::new(NULL_DEVICE)));
    }

    #[test]
    fn explicit_paths_win() {
        let cmd = parse("sort < in > out &");
        assert_eq!(Stream::Input.target(&cmd), Some(Path::new("in")));
        assert_eq!(Stream::Output.target(&cmd), Some(Path::new("out")));

        let cmd = parse("sort > out &");
        assert_eq!(Stream::Input.target(&cmd), Some(Path::new(NULL_DEVICE)));
        assert_eq!(Stream::Output.target(&cmd), Some(Path::new("out")));
    }

    #[test]
    fn foreground_only_mode_keeps_terminal() {
        let cmd = CommandDescriptor::parse("cat &", Mode::ForegroundOnly).unwrap();
        assert_eq!(Stream::Input.target(&cmd), None);
    }
}
