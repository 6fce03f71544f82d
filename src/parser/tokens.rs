/// A whitespace-delimited piece of an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    /// `<`
    RedirectInput,
    /// `>`
    RedirectOutput,
    /// `&`
    Background,
}

impl<'a> Token<'a> {
    const COMMENT: char = '#';

    fn classify(text: &'a str) -> Self {
        match text {
            "<" => Token::RedirectInput,
            ">" => Token::RedirectOutput,
            "&" => Token::Background,
            word => Token::Word(word),
        }
    }

    pub fn as_str(&self) -> &'a str {
        match *self {
            Token::Word(word) => word,
            Token::RedirectInput => "<",
            Token::RedirectOutput => ">",
            Token::Background => "&",
        }
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self, Token::Word(_))
    }
}

/// Returns `true` if the first non-whitespace character of the line starts a comment.
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(Token::COMMENT)
}

/// Split a line on runs of whitespace. Blank and comment lines yield no tokens.
///
/// There is no quoting or escaping: a token boundary is whitespace and nothing else.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    if is_comment(line) {
        return Vec::new();
    }

    line.split_whitespace().map(Token::classify).collect()
}

#[cfg(test)]
mod tests {
    use super::{is_comment, tokenize, Token::*};
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(
            tokenize("  wc\t<  junk >junk2   "),
            vec![Word("wc"), RedirectInput, Word("junk"), Word(">junk2")]
        );
    }

    #[test]
    fn reserved_tokens_must_stand_alone() {
        assert_eq!(
            tokenize("sleep 5& & a&b"),
            vec![Word("sleep"), Word("5&"), Background, Word("a&b")]
        );
        assert!(Background.is_reserved());
        assert!(!Word("&&").is_reserved());
        assert_eq!(RedirectOutput.as_str(), ">");
    }

    #[test]
    fn blank_and_comment_lines_yield_nothing() {
        for line in ["", "   ", "\t \t", "#", "# ls -l", "   #echo hi", "\t#"] {
            assert!(tokenize(line).is_empty(), "{line:?}");
        }
    }

    #[test]
    fn hash_inside_a_line_is_a_word() {
        assert!(!is_comment("echo #not a comment"));
        assert_eq!(
            tokenize("echo a#b"),
            vec![Word("echo"), Word("a#b")]
        );
    }
}
