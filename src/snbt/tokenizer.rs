//! The SNBT token table.
//!
//! A single ordered regex alternation, built once, scans the input:
//! quoted strings first, then bare word runs, array openers before the
//! plain list bracket, structural punctuation, and a catch-all invalid
//! token. Whitespace around every token is consumed by the table itself.
//! A word run is classified as a number only when the entire run matches
//! the numeric pattern, which is equivalent to the usual
//! "not-followed-by-an-identifier-character" rule because number
//! characters are a subset of word characters.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    QuotedString,
    Number,
    String,
    Compound,
    CloseCompound,
    ByteArray,
    IntArray,
    LongArray,
    List,
    CloseBracket,
    Colon,
    Comma,
    Invalid,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub value: &'a str,
    /// Character span of the surrounding match, trailing whitespace
    /// included; consecutive token spans tile the input.
    pub span: (usize, usize),
}

fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(concat!(
            r#"\s*(?P<quoted>"(?:\\.|[^\\])*?"|'(?:\\.|[^\\])*?')\s*"#,
            r"|\s*(?P<word>[a-zA-Z0-9._+-]+)\s*",
            r"|\s*(?P<compound>\{)\s*",
            r"|\s*(?P<close_compound>\})\s*",
            r"|\s*(?P<byte_array>\[B;)\s*",
            r"|\s*(?P<int_array>\[I;)\s*",
            r"|\s*(?P<long_array>\[L;)\s*",
            r"|\s*(?P<list>\[)\s*",
            r"|\s*(?P<close_bracket>\])\s*",
            r"|\s*(?P<colon>:)\s*",
            r"|\s*(?P<comma>,)\s*",
            r"|\s*(?P<invalid>.)\s*",
        ))
        .expect("token table must compile")
    })
}

fn number_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"^[+-]?(?:[0-9]*\.[0-9]+|[0-9]+\.[0-9]*|[1-9][0-9]*|0)(?:[eE][+-]?[0-9]+)?[bslfdBSLFD]?$",
        )
        .expect("number pattern must compile")
    })
}

/// Match and yield all the tokens of the input string.
pub(crate) fn tokenize(input: &str) -> impl Iterator<Item = Token<'_>> {
    token_regex().captures_iter(input).map(|captures| {
        let all = captures.get(0).expect("regex match has a whole-match group");
        let span = (all.start(), all.end());

        let groups = [
            ("quoted", TokenKind::QuotedString),
            ("word", TokenKind::String),
            ("compound", TokenKind::Compound),
            ("close_compound", TokenKind::CloseCompound),
            ("byte_array", TokenKind::ByteArray),
            ("int_array", TokenKind::IntArray),
            ("long_array", TokenKind::LongArray),
            ("list", TokenKind::List),
            ("close_bracket", TokenKind::CloseBracket),
            ("colon", TokenKind::Colon),
            ("comma", TokenKind::Comma),
            ("invalid", TokenKind::Invalid),
        ];

        for (name, kind) in groups {
            if let Some(group) = captures.name(name) {
                let value = group.as_str();
                let kind = if kind == TokenKind::String && number_regex().is_match(value) {
                    TokenKind::Number
                } else {
                    kind
                };
                return Token { kind, value, span };
            }
        }
        // The alternation always captures exactly one named group.
        unreachable!("token match without a capturing group")
    })
}
