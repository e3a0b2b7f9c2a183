//! XML tag names for verification table columns.

use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

/// `head(arg)` with nothing after the closing parenthesis.
static FUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)\((.+)\)$").unwrap());

/// Derive an XML element name from an arbitrary field name.
///
/// `probability(yes)` is first rewritten to `probability_yes`. A name may start
/// with `_` or a letter and continue with letters, decimal digits, `_`, `-` or
/// `.`; every other character is escaped as `_xHHHH_` (a space is always
/// `_x0020_`). The result is a legal XML name for non-empty input.
/// Deterministic but not injective.
pub fn sanitize(name: &str) -> String {
    let rewritten;
    let name = match FUNCTION.captures(name) {
        Some(caps) => {
            rewritten = format!("{}_{}", &caps[1], &caps[2]);
            rewritten.as_str()
        }
        None => name,
    };

    let mut result = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        let valid = if i == 0 {
            is_start_char(c)
        } else {
            is_continuation_char(c)
        };
        if valid {
            result.push(c);
        } else if c == ' ' {
            result.push_str("_x0020_");
        } else {
            let _ = write!(result, "_x{:04x}_", u32::from(c));
        }
    }
    result
}

/// General category `L*`.
static LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{L}$").unwrap());

/// General categories `L*` and `Nd`.
static LETTER_OR_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{L}\p{Nd}]$").unwrap());

fn is_start_char(c: char) -> bool {
    c == '_' || (is_xml_name_start_char(c) && LETTER.is_match(c.encode_utf8(&mut [0; 4])))
}

fn is_continuation_char(c: char) -> bool {
    matches!(c, '-' | '.' | '_')
        || (is_xml_name_char(c) && LETTER_OR_DIGIT.is_match(c.encode_utf8(&mut [0; 4])))
}

/// `NameStartChar` production of XML 1.0 (fifth edition).
pub(crate) fn is_xml_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// `NameChar` production of XML 1.0 (fifth edition).
pub(crate) fn is_xml_name_char(c: char) -> bool {
    is_xml_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}
