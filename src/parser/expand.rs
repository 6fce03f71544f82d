use crate::system::interface::ProcessId;

const PID_MARKER: &str = "$$";

/// Replace every `$$`, scanning left to right without overlap, with the given process ID.
pub fn expand_pid(line: &str, pid: ProcessId) -> String {
    if !line.contains(PID_MARKER) {
        return line.to_string();
    }

    line.replace(PID_MARKER, &pid.to_string())
}

#[cfg(test)]
mod tests {
    use super::expand_pid;
    use crate::system::interface::ProcessId;

    #[test]
    fn replaces_every_marker() {
        let pid = ProcessId::new(1234);
        assert_eq!(expand_pid("echo $$", pid), "echo 1234");
        assert_eq!(expand_pid("touch f$$.$$", pid), "touch f1234.1234");
        assert_eq!(expand_pid("ls", pid), "ls");
    }

    #[test]
    fn odd_dollars_are_left_over() {
        let pid = ProcessId::new(7);
        assert_eq!(expand_pid("$$$", pid), "7$");
        assert_eq!(expand_pid("$$$$", pid), "77");
        assert_eq!(expand_pid("$ $", pid), "$ $");
    }
}
