//! Per-field normalization rules.
//!
//! Each rule is an ordered list of independent attempt strategies, tried in
//! declared order until one succeeds. The ordering is the contract: a later
//! strategy must never shadow an earlier one.

use crate::constants::{NOT_AVAILABLE, age};

/// True for a token consisting solely of ASCII uppercase letters.
fn is_upper_alpha(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_uppercase())
}

/// Standalone 3-letter country code, scanning tokens right to left.
/// Cells read like "eng ENG" or "Lionel Messi ARG"; the code is almost
/// always the last qualifying token.
fn standalone_country_code(text: &str) -> Option<String> {
    text.split_whitespace()
        .rev()
        .find(|t| t.len() == 3 && is_upper_alpha(t))
        .map(|t| t.to_string())
}

/// 2-4 letter uppercase code taken from an embedded link label.
fn linked_country_code(link_label: Option<&str>) -> Option<String> {
    let label = link_label?.trim();
    if (2..=4).contains(&label.len()) && is_upper_alpha(label) {
        Some(label.to_string())
    } else {
        None
    }
}

/// Last whitespace-delimited token, if it qualifies as a 2-4 letter code.
fn trailing_country_code(text: &str) -> Option<String> {
    let last = text.split_whitespace().next_back()?;
    if (2..=4).contains(&last.len()) && is_upper_alpha(last) {
        Some(last.to_string())
    } else {
        None
    }
}

/// Resolve a nationality cell to a country code, or `"N/a"`.
pub fn nationality_code(text: &str, link_label: Option<&str>) -> String {
    standalone_country_code(text)
        .or_else(|| linked_country_code(link_label))
        .or_else(|| trailing_country_code(text))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn is_literal_age(value: i64) -> bool {
    value > age::MIN_EXCLUSIVE && value < age::MAX_EXCLUSIVE
}

fn is_birth_year(value: i64, current_year: i32) -> bool {
    value > age::MIN_BIRTH_YEAR_EXCLUSIVE && value <= i64::from(current_year)
}

fn parse_digits(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// (a) Hyphenated age-plus-days form, e.g. "25-100": the leading segment is
/// the age itself when it lands in the plausible range.
fn literal_age_prefix(text: &str, _current_year: i32) -> Option<String> {
    if !text.contains('-') {
        return None;
    }
    let first = text.split('-').next()?;
    parse_digits(first)
        .filter(|v| is_literal_age(*v))
        .map(|v| v.to_string())
}

/// (b) Full birth date "YYYY-MM-DD".
fn birth_date_year(text: &str, current_year: i32) -> Option<String> {
    let parts: Vec<&str> = text.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 4 {
        return None;
    }
    parse_digits(parts[0])
        .filter(|v| is_birth_year(*v, current_year))
        .map(|v| (i64::from(current_year) - v).to_string())
}

/// (c) Any plausible 4-digit year inside the cell's digit runs,
/// e.g. "May 5, 1998" -> digits "51998" -> window "1998".
fn digit_run_year(text: &str, current_year: i32) -> Option<String> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    for start in 0..=digits.len() - 4 {
        if let Some(year) = parse_digits(&digits[start..start + 4])
            && is_birth_year(year, current_year)
        {
            return Some((i64::from(current_year) - year).to_string());
        }
    }
    None
}

/// (d) "Month Day, YYYY" form: the token after the last comma.
fn trailing_year_after_comma(text: &str, current_year: i32) -> Option<String> {
    if !text.contains(',') {
        return None;
    }
    let candidate = text.rsplit(',').next()?.trim();
    if candidate.len() != 4 {
        return None;
    }
    parse_digits(candidate)
        .filter(|v| is_birth_year(*v, current_year))
        .map(|v| (i64::from(current_year) - v).to_string())
}

/// (e) Bare 4-digit birth year.
fn bare_birth_year(text: &str, current_year: i32) -> Option<String> {
    if text.len() != 4 {
        return None;
    }
    parse_digits(text)
        .filter(|v| is_birth_year(*v, current_year))
        .map(|v| (i64::from(current_year) - v).to_string())
}

/// (f) Bare integer that is already an age.
fn bare_age(text: &str, _current_year: i32) -> Option<String> {
    parse_digits(text)
        .filter(|v| is_literal_age(*v))
        .map(|v| v.to_string())
}

type AgeAttempt = fn(&str, i32) -> Option<String>;

/// Precedence order for age derivation. An earlier strategy that succeeds
/// wins outright.
const AGE_ATTEMPTS: [AgeAttempt; 6] = [
    literal_age_prefix,
    birth_date_year,
    digit_run_year,
    trailing_year_after_comma,
    bare_birth_year,
    bare_age,
];

/// Derive an integer age from an age or birth-year cell.
///
/// Returns `None` when no strategy succeeds; the caller decides whether to
/// keep the raw text or fall back to `"N/a"`.
pub fn derive_age(text: &str, current_year: i32) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || text == NOT_AVAILABLE {
        return None;
    }
    AGE_ATTEMPTS
        .iter()
        .find_map(|attempt| attempt(text, current_year))
}

/// Keep only the first of multiple comma-separated positions.
pub fn first_position(text: &str) -> String {
    let text = text.trim();
    let first = match text.split_once(',') {
        Some((head, _)) => head.trim(),
        None => text,
    };
    if first.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        first.to_string()
    }
}

/// Prefer an embedded link label over the cell's full text.
pub fn link_label_or_text(text: &str, link_label: Option<&str>) -> String {
    if let Some(label) = link_label {
        let label = label.trim();
        if !label.is_empty() {
            return label.to_string();
        }
    }
    let text = text.trim();
    if text.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    }
}

/// Trimmed cell text, with empty cells mapped to `"N/a"`.
pub fn text_or_not_available(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    }
}
