use std::{ffi::OsStr, path::PathBuf};

use super::{CommandDescriptor, Token};
use crate::mode::Mode::{self, *};
use pretty_assertions::assert_eq;

fn parse(line: &str) -> Option<CommandDescriptor> {
    CommandDescriptor::parse(line, BackgroundAllowed)
}

fn path(s: &str) -> Option<PathBuf> {
    Some(PathBuf::from(s))
}

#[test]
fn plain_command() {
    let cmd = parse("ls -l -a").unwrap();
    assert_eq!(
        cmd,
        CommandDescriptor {
            argv: vec!["ls".into(), "-l".into(), "-a".into()],
            input: None,
            output: None,
            background: false,
        }
    );
    assert_eq!(cmd.program(), "ls");
    assert_eq!(
        cmd.arguments().collect::<Vec<_>>(),
        [OsStr::new("-l"), OsStr::new("-a")]
    );
}

#[test]
fn both_redirections() {
    let cmd = parse("wc < junk > junk2").unwrap();
    assert_eq!(cmd.argv, ["wc"]);
    assert_eq!(cmd.input, path("junk"));
    assert_eq!(cmd.output, path("junk2"));
    assert!(!cmd.background);
}

#[test]
fn argv_stops_at_first_reserved_token() {
    let cmd = parse("echo a > out b c").unwrap();
    assert_eq!(cmd.argv, ["echo", "a"]);
    assert_eq!(cmd.output, path("out"));
}

/// Given `ls > a > b`, only `a` is honored
#[test]
fn first_output_redirection_wins() {
    let cmd = parse("ls > a > b").unwrap();
    assert_eq!(cmd.output, path("a"));

    let cmd = parse("cat < x < y").unwrap();
    assert_eq!(cmd.input, path("x"));
}

#[test]
fn dangling_redirection_is_ignored() {
    let cmd = parse("cat <").unwrap();
    assert_eq!(cmd.argv, ["cat"]);
    assert_eq!(cmd.input, None);

    let cmd = parse("ls > a >").unwrap();
    assert_eq!(cmd.output, path("a"));
}

#[test]
fn background_anywhere() {
    assert!(parse("sleep 5 &").unwrap().background);
    assert!(parse("sleep 5 & > out").unwrap().background);
    assert!(parse("sort < in & > out").unwrap().background);
    assert!(!parse("sleep 5&").unwrap().background);
}

#[test]
fn foreground_only_ignores_ampersand() {
    for line in ["sleep 5 &", "ls > out &", "cat & < in"] {
        let allowed = CommandDescriptor::parse(line, BackgroundAllowed).unwrap();
        let denied = CommandDescriptor::parse(line, ForegroundOnly).unwrap();
        assert!(allowed.background, "{line}");
        assert!(!denied.background, "{line}");
        assert_eq!(allowed.argv, denied.argv);
        assert_eq!(allowed.input, denied.input);
        assert_eq!(allowed.output, denied.output);
    }
}

#[test]
fn no_command() {
    for mode in [BackgroundAllowed, ForegroundOnly] {
        for line in ["", "   ", "# comment", "  # indented comment", "&", "> out", "< in ls"] {
            assert_eq!(CommandDescriptor::parse(line, mode), None, "{line:?}");
        }
    }
}

#[test]
fn build_from_tokens() {
    let tokens = [
        Token::Word("sort"),
        Token::RedirectInput,
        Token::Word("data"),
        Token::Background,
    ];
    let cmd = CommandDescriptor::build(&tokens, Mode::BackgroundAllowed).unwrap();
    assert_eq!(cmd.argv, ["sort"]);
    assert_eq!(cmd.input, path("data"));
    assert!(cmd.background);

    assert_eq!(CommandDescriptor::build(&[], Mode::BackgroundAllowed), None);
}
