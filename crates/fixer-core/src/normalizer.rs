//! Normalizer: rewrites quasi-JSON into strict JSON text.
//!
//! The upstream publisher writes records as a flat run of `key: value` pairs
//! with keys unquoted, values quoted inconsistently (single, double or not at
//! all) and numbers sometimes quoted. Three ordered passes repair that shape:
//!
//! 1. [`quote_keys`]: `key: ` / `'key': ` → `"key": `
//! 2. [`quote_values`]: `: value` → `: "value"` when the value is a single
//!    token of identifier/URL/ARN/timestamp characters
//! 3. [`unquote_numbers`]: `: "1.0",` → `: 1.0,`
//!
//! Each pass runs over the whole text and feeds the next. None of them can
//! fail; text the passes cannot repair is left for the decoder to reject.
//!
//! # Known limitations
//!
//! - Key quoting is not anchored to object boundaries, so `word: ` inside an
//!   already-quoted string value is rewritten too.
//! - A numeric value with no trailing comma (the last field of an object)
//!   stays quoted.
//! - Bare `true`, `false` and `null` are quoted as strings.

use regex::{Captures, Regex};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

fn key_re() -> &'static Regex {
    static KEY_RE: OnceLock<Regex> = OnceLock::new();
    KEY_RE.get_or_init(|| {
        Regex::new(r#"(['"])?([A-Za-z0-9_]+)(['"])?:\s"#).expect("valid key regex")
    })
}

fn value_re() -> &'static Regex {
    static VALUE_RE: OnceLock<Regex> = OnceLock::new();
    VALUE_RE.get_or_init(|| {
        Regex::new(r#": (['"])?([A-Za-z0-9_/.\-:?&=+]+)(['"])?"#).expect("valid value regex")
    })
}

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r#": (["']?)([0-9.]+)(["']?),"#).expect("valid number regex")
    })
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Run all three passes in order.
pub fn normalize(raw: &str) -> String {
    let keyed = quote_keys(raw);
    let valued = quote_values(&keyed);
    unquote_numbers(&valued)
}

/// Pass 1: double-quote every identifier that is followed by `:` and one
/// whitespace character.
///
/// Existing single or double quotes around the identifier are replaced. The
/// whitespace character (which may be a line break) becomes a single space.
pub fn quote_keys(text: &str) -> String {
    key_re()
        .replace_all(text, |caps: &Captures| format!("\"{}\": ", &caps[2]))
        .into_owned()
}

/// Pass 2: double-quote every value made only of identifier, URL, ARN and
/// timestamp characters (`A-Z a-z 0-9 _ / . - : ? & = +`).
///
/// The rewrite applies only when the match is the whole value: quotes must
/// come in pairs (`abc"` is left alone just like `"abc`), and the match must
/// be followed (after spaces or tabs) by `,`, `}`, `]`, a line break or the
/// end of the text. Free text such as `hello world` or `"a, b"` is left as
/// it is.
pub fn quote_values(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut last = 0;

    for caps in value_re().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let opened = caps.get(1).is_some();
        let closed = caps.get(3).is_some();

        if opened != closed {
            continue;
        }
        if !ends_value(&text[whole.end()..]) {
            continue;
        }

        out.push_str(&text[last..whole.start()]);
        out.push_str(": \"");
        out.push_str(&caps[2]);
        out.push('"');
        last = whole.end();
    }

    out.push_str(&text[last..]);
    out
}

/// Pass 3: strip the quotes from a `[0-9.]+` value followed by a comma.
///
/// Quotes are removed only when they are balanced and the digits form a JSON
/// number literal; `"1.2.3"` and `"007"` stay strings.
pub fn unquote_numbers(text: &str) -> String {
    number_re()
        .replace_all(text, |caps: &Captures| {
            let balanced = caps[1].is_empty() == caps[3].is_empty();
            if balanced && is_number_literal(&caps[2]) {
                format!(": {},", &caps[2])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ends_value(rest: &str) -> bool {
    matches!(
        rest.trim_start_matches([' ', '\t']).chars().next(),
        None | Some(',' | '}' | ']' | '\n' | '\r')
    )
}

/// Digits with at most one interior dot and no leading zero.
fn is_number_literal(run: &str) -> bool {
    let (int, frac) = match run.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (run, None),
    };
    let int_ok = !int.is_empty() && (int == "0" || !int.starts_with('0'));
    let frac_ok = frac.map_or(true, |f| !f.is_empty() && !f.contains('.'));
    int_ok && frac_ok
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
