//! Line-oriented codec for environment files.
//!
//! [`parse`] turns raw file text into a [`Store`]. [`serialize`] does the
//! reverse, but as a merge against the original text rather than a dump of
//! the map: comments, blank lines, malformed lines and ordering written by a
//! human are carried over, settings that are still present are rewritten in
//! place, settings that were removed lose their line, and keys the file never
//! had are appended at the end.
//!
//! # Format
//!
//! ```text
//! KEY=value
//! KEY2="quoted value"          # optional trailing comment
//! KEY3='single quoted'
//! # a full-line comment
//! MALFORMED LINE WITHOUT EQUALS SIGN
//! ```
//!
//! The first `=` separates key from value and the first `#` not preceded by
//! a backslash starts a comment. `\#` stands for a literal `#`. Inside double
//! quotes `\\`, `\n` and `\r` also stand for a backslash, a line feed and a
//! carriage return, so a value with line breaks stays on one line.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::Store;

/// Separator between a key and its value.
pub const KV_SEPARATOR: char = '=';

/// Character that starts a trailing comment.
pub const COMMENT_DECLARATOR: char = '#';

const ESCAPE: char = '\\';
const ESCAPED_COMMENT: &str = "\\#";

/// Quoting applied to a value in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Written bare.
    #[default]
    None,
    /// Wrapped in `"`.
    Double,
    /// Wrapped in `'`.
    Single,
}

impl QuoteStyle {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            _ => None,
        }
    }

    fn as_char(self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Double => Some('"'),
            Self::Single => Some('\''),
        }
    }
}

/// One line of raw file text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    /// Blank, comment-only or malformed; never a setting.
    Verbatim(&'a str),
    /// `KEY=VALUE [# comment]`.
    Setting(SettingLine<'a>),
}

/// A line that carries a setting.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SettingLine<'a> {
    raw: &'a str,
    /// Trimmed, upper-cased key.
    key: String,
    /// Value with quotes stripped and escapes resolved.
    value: String,
    quote: QuoteStyle,
    /// Text after the comment declarator, if any.
    comment: Option<&'a str>,
}

/// Parse raw file text into a [`Store`].
///
/// Later occurrences of a key overwrite earlier ones.
///
/// # Example
///
/// ```
/// let store = envfile::codec::parse("name = \"demo\" # app name\nport=8080\n");
/// assert_eq!(store.get("NAME"), Some("demo"));
/// assert_eq!(store.get("PORT"), Some("8080"));
/// ```
pub fn parse(raw: &str) -> Store {
    let text = normalize_newlines(raw);
    let mut store = Store::new();

    for line in split_lines(&text) {
        match parse_line(line) {
            Line::Setting(setting) => {
                trace!(key = %setting.key, "parsed setting");
                store.set(setting.key, setting.value);
            }
            Line::Verbatim(_) => {}
        }
    }

    store
}

/// Serialize `store` by merging it into `original`, the file's current text.
///
/// The returned text replaces the file contents entirely. Every emitted line
/// ends with `\n`.
///
/// # Example
///
/// ```
/// use envfile::codec;
///
/// let original = "# settings\nPORT=8080 # http\nOLD=1\n";
/// let mut store = codec::parse(original);
/// store.set("PORT", "9090");
/// store.remove("OLD");
/// store.set("NEW", "x");
///
/// assert_eq!(
///     codec::serialize(&store, original),
///     "# settings\nPORT=9090 # http\n\nNEW=x\n"
/// );
/// ```
pub fn serialize(store: &Store, original: &str) -> String {
    let text = normalize_newlines(original);
    let mut pending = store.clone();
    let mut out = String::with_capacity(text.len());
    let mut dropped = 0usize;

    for line in split_lines(&text) {
        let setting = match parse_line(line) {
            Line::Verbatim(raw) => {
                out.push_str(raw);
                out.push('\n');
                continue;
            }
            Line::Setting(setting) => setting,
        };

        let Some(value) = pending.remove(&setting.key) else {
            trace!(key = %setting.key, "dropping line of removed key");
            dropped += 1;
            continue;
        };

        if value == setting.value {
            out.push_str(setting.raw);
        } else {
            out.push_str(&setting.key);
            out.push(KV_SEPARATOR);
            out.push_str(&render_value(&value, setting.quote));
            if let Some(comment) = setting.comment {
                out.push(' ');
                out.push(COMMENT_DECLARATOR);
                out.push_str(comment);
            }
        }
        out.push('\n');
    }

    let appended = pending.len();
    if !pending.is_empty() {
        out.push('\n');
        for (key, value) in pending.iter() {
            out.push_str(key);
            out.push(KV_SEPARATOR);
            out.push_str(&render_value(value, QuoteStyle::None));
            out.push('\n');
        }
    }

    debug!(
        settings = store.len(),
        dropped, appended, "serialized environment file"
    );
    out
}

/// Convert `\r\n` line endings, then any stray `\r`, to `\n`.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split normalised text into lines. A final newline does not start an
/// extra empty line, and empty text has no lines at all.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    (!text.is_empty()).then(|| body.split('\n')).into_iter().flatten()
}

/// Byte offset of the first comment declarator not preceded by an escape.
fn find_comment(line: &str) -> Option<usize> {
    line.match_indices(COMMENT_DECLARATOR)
        .map(|(i, _)| i)
        .find(|&i| !line[..i].ends_with(ESCAPE))
}

fn parse_line(raw: &str) -> Line<'_> {
    let (body, comment) = match find_comment(raw) {
        Some(i) => (&raw[..i], Some(&raw[i + COMMENT_DECLARATOR.len_utf8()..])),
        None => (raw, None),
    };

    let Some((key, value)) = body.split_once(KV_SEPARATOR) else {
        return Line::Verbatim(raw);
    };

    let (value, quote) = extract_value(value);
    Line::Setting(SettingLine {
        raw,
        key: key.trim().to_uppercase(),
        value,
        quote,
        comment,
    })
}

/// Trim, strip one layer of matching quotes and resolve escapes.
fn extract_value(text: &str) -> (String, QuoteStyle) {
    let trimmed = text.trim();
    match strip_quotes(trimmed) {
        Some((inner, QuoteStyle::Double)) => (unescape_double_quoted(inner), QuoteStyle::Double),
        Some((inner, quote)) => (inner.replace(ESCAPED_COMMENT, "#"), quote),
        None => (trimmed.replace(ESCAPED_COMMENT, "#"), QuoteStyle::None),
    }
}

/// Resolve `\\`, `\n`, `\r` and `\#`. Any other backslash is kept as is.
fn unescape_double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(escaped @ (ESCAPE | COMMENT_DECLARATOR)) => out.push(escaped),
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }
    out
}

fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ESCAPE => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            COMMENT_DECLARATOR => out.push_str(ESCAPED_COMMENT),
            other => out.push(other),
        }
    }
    out
}

fn strip_quotes(text: &str) -> Option<(&str, QuoteStyle)> {
    let first = text.chars().next()?;
    let quote = QuoteStyle::from_char(first)?;
    if text.len() < 2 || !text.ends_with(first) {
        return None;
    }
    let inner = &text[first.len_utf8()..text.len() - first.len_utf8()];
    Some((inner, quote))
}

/// Render a value so that parsing it back yields the same string.
///
/// Bare values that would be altered by a re-parse (surrounding whitespace,
/// or text that itself looks quoted) are double-quoted instead. Values with
/// a line break are always double-quoted, whatever the line used before.
fn render_value(value: &str, quote: QuoteStyle) -> String {
    let quote = match quote {
        _ if has_line_break(value) => QuoteStyle::Double,
        QuoteStyle::None if needs_quoting(value) => QuoteStyle::Double,
        other => other,
    };
    let escaped = match quote {
        QuoteStyle::Double => escape_double_quoted(value),
        QuoteStyle::None | QuoteStyle::Single => value.replace(COMMENT_DECLARATOR, ESCAPED_COMMENT),
    };
    match quote.as_char() {
        Some(q) => format!("{q}{escaped}{q}"),
        None => escaped,
    }
}

fn needs_quoting(value: &str) -> bool {
    value.trim() != value || strip_quotes(value).is_some()
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}
