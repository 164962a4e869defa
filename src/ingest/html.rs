//! Minimal HTML slice scanning for the statistics pages.
//!
//! The pages are machine-generated and regular enough that a handful of
//! case-insensitive substring scans beat a DOM parser: locate the table
//! (by id, by class, or inside an HTML comment), walk its rows, and reduce
//! every `data-stat` cell to text plus an optional link label.

use std::collections::HashSet;

use crate::extractor::{RawCell, RawRow, RowClass};

/// Marker class shared by every statistics table on the site
const STATS_TABLE_CLASS: &str = "stats_table";

/// Header keys that never carry player statistics
const NON_STAT_HEADER_KEYS: [&str; 3] = ["ranker", "matches", "match_report"];

fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Value of an attribute inside an opening tag, or `None` when absent.
fn get_attr(tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(tag);
    let needle = format!("{}=", to_lower(name));
    let mut from = 0;
    while let Some(pos) = lc[from..].find(&needle) {
        let abs = from + pos;
        let at_boundary = abs == 0 || lc.as_bytes()[abs - 1].is_ascii_whitespace();
        if !at_boundary {
            from = abs + needle.len();
            continue;
        }
        let rest = &tag[abs + needle.len()..];
        let value = match rest.chars().next() {
            Some('"') => rest[1..].split('"').next().unwrap_or(""),
            Some('\'') => rest[1..].split('\'').next().unwrap_or(""),
            _ => rest
                .split(|c: char| c.is_ascii_whitespace() || c == '>')
                .next()
                .unwrap_or(""),
        };
        return Some(value.to_string());
    }
    None
}

fn class_contains(tag: &str, class: &str) -> bool {
    get_attr(tag, "class")
        .map(|v| v.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Position of the next occurrence of `<name` that is a real tag boundary
/// (`<th` must not match `<thead`).
fn find_tag(lc: &str, name: &str, from: usize) -> Option<usize> {
    let needle = format!("<{name}");
    let mut cursor = from;
    while let Some(pos) = lc.get(cursor..)?.find(&needle) {
        let abs = cursor + pos;
        let after = abs + needle.len();
        match lc.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(abs),
            None => return None,
            _ => cursor = after,
        }
    }
    None
}

/// One element block: the opening tag's contents and the inner HTML.
/// Close-tag matching is non-nesting, which holds for every tag scanned
/// here (`table`, `thead`, `tbody`, `tr`, `th`, `td`, `a`).
fn next_block<'a>(fragment: &'a str, lc: &str, name: &str, from: usize) -> Option<(usize, &'a str, &'a str)> {
    let start = find_tag(lc, name, from)?;
    let open_end = fragment[start..].find('>')? + start;
    let tag = &fragment[start + 1..open_end];
    let close = format!("</{name}");
    let inner_start = open_end + 1;
    let close_start = lc[inner_start..].find(&close)? + inner_start;
    let block_end = fragment[close_start..]
        .find('>')
        .map(|p| close_start + p + 1)
        .unwrap_or(close_start);
    Some((block_end, tag, &fragment[inner_start..close_start]))
}

/// All top-level HTML comment bodies in the fragment.
fn comments(fragment: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(open) = fragment[cursor..].find("<!--") {
        let start = cursor + open + 4;
        match fragment[start..].find("-->") {
            Some(close) => {
                out.push(&fragment[start..start + close]);
                cursor = start + close + 3;
            }
            None => break,
        }
    }
    out
}

/// First table in the fragment whose opening tag satisfies the predicate.
/// Returns the table's inner HTML.
fn table_by<'a>(fragment: &'a str, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
    let lc = to_lower(fragment);
    let mut from = 0;
    while let Some((end, tag, inner)) = next_block(fragment, &lc, "table", from) {
        if pred(tag) {
            return Some(inner);
        }
        from = end;
    }
    None
}

/// Locate a statistics table, trying in order: the declared id, the shared
/// `stats_table` class, then the same two lookups inside HTML comments
/// (the site ships some tables commented out for lazy rendering).
pub fn locate_table<'a>(html: &'a str, table_id: &str) -> Option<&'a str> {
    if !table_id.is_empty()
        && let Some(table) = table_by(html, |tag| {
            get_attr(tag, "id").as_deref() == Some(table_id)
        })
    {
        return Some(table);
    }
    if let Some(table) = table_by(html, |tag| class_contains(tag, STATS_TABLE_CLASS)) {
        return Some(table);
    }
    for comment in comments(html) {
        if !table_id.is_empty()
            && let Some(table) = table_by(comment, |tag| {
                get_attr(tag, "id").as_deref() == Some(table_id)
            })
        {
            return Some(table);
        }
        if let Some(table) = table_by(comment, |tag| class_contains(tag, STATS_TABLE_CLASS)) {
            return Some(table);
        }
    }
    None
}

/// Decode the handful of entities the pages actually use.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
}

/// Drop tags, decode entities and collapse whitespace runs.
fn flatten_text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    let decoded = decode_entities(&out);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Label of the first hyperlink in the fragment, if one exists and has
/// visible text.
fn first_link_label(fragment: &str) -> Option<String> {
    let lc = to_lower(fragment);
    let (_, _, inner) = next_block(fragment, &lc, "a", 0)?;
    let label = flatten_text(inner);
    if label.is_empty() { None } else { Some(label) }
}

fn row_class(tag: &str) -> RowClass {
    match get_attr(tag, "class") {
        Some(classes) => {
            let mut class = RowClass::Normal;
            for c in classes.split_whitespace() {
                class = match c {
                    "thead" => RowClass::HeaderSeparator,
                    "partial_table" => RowClass::Partial,
                    "spacer" => RowClass::Spacer,
                    _ => continue,
                };
                break;
            }
            class
        }
        None => RowClass::Normal,
    }
}

/// Cells of one row: every `th`/`td` with a `data-stat` attribute, in
/// document order.
fn row_cells(row_html: &str) -> Vec<RawCell> {
    let lc = to_lower(row_html);
    let mut cells = Vec::new();
    let mut cursor = 0;
    loop {
        let th = find_tag(&lc, "th", cursor);
        let td = find_tag(&lc, "td", cursor);
        let name = match (th, td) {
            (Some(a), Some(b)) => {
                if a < b {
                    "th"
                } else {
                    "td"
                }
            }
            (Some(_), None) => "th",
            (None, Some(_)) => "td",
            (None, None) => break,
        };
        let Some((end, tag, inner)) = next_block(row_html, &lc, name, cursor) else {
            break;
        };
        cursor = end;
        let Some(key) = get_attr(tag, "data-stat") else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        cells.push(RawCell {
            key,
            text: flatten_text(inner),
            link_label: first_link_label(inner),
        });
    }
    cells
}

/// True for a header row found outside `thead` (a `th` with `scope="col"`).
fn is_column_header_row(row_html: &str) -> bool {
    let lc = to_lower(row_html);
    let mut from = 0;
    while let Some((end, tag, _)) = next_block(row_html, &lc, "th", from) {
        if get_attr(tag, "scope").as_deref() == Some("col") {
            return true;
        }
        from = end;
    }
    false
}

/// Reduce a located table to raw rows.
///
/// Rows come from `tbody` when present; otherwise every `tr` that carries
/// keyed cells and is not a column-header row is taken directly from the
/// table.
pub fn parse_rows(table_html: &str) -> Vec<RawRow> {
    let lc = to_lower(table_html);
    let (scope, scope_lc, direct) = match next_block(table_html, &lc, "tbody", 0) {
        Some((_, _, inner)) => (inner, to_lower(inner), false),
        None => (table_html, lc.clone(), true),
    };

    let mut rows = Vec::new();
    let mut from = 0;
    while let Some((end, tag, inner)) = next_block(scope, &scope_lc, "tr", from) {
        from = end;
        let cells = row_cells(inner);
        if direct && (cells.is_empty() || is_column_header_row(inner)) {
            continue;
        }
        rows.push(RawRow::with_class(row_class(tag), cells));
    }
    rows
}

/// Field-keys declared by the table's header, minus the purely structural
/// ones. Used to bound extraction when no explicit schema is supplied.
pub fn header_keys(table_html: &str) -> HashSet<String> {
    let lc = to_lower(table_html);
    let mut keys = HashSet::new();
    let Some((_, _, thead)) = next_block(table_html, &lc, "thead", 0) else {
        return keys;
    };
    // Only the last header row carries the per-column keys; earlier rows
    // group columns into categories
    let thead_lc = to_lower(thead);
    let mut last_row = None;
    let mut from = 0;
    while let Some((end, _, inner)) = next_block(thead, &thead_lc, "tr", from) {
        last_row = Some(inner);
        from = end;
    }
    let Some(row) = last_row else {
        return keys;
    };
    for cell in row_cells(row) {
        if !NON_STAT_HEADER_KEYS.contains(&cell.key.as_str()) {
            keys.insert(cell.key);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_TABLE: &str = r#"
        <html><body>
        <table id="stats_standard" class="stats_table">
        <thead>
          <tr><th data-stat="header_group" colspan="3">Performance</th></tr>
          <tr>
            <th data-stat="ranker">Rk</th>
            <th data-stat="player">Player</th>
            <th data-stat="goals">Gls</th>
            <th data-stat="matches">Matches</th>
          </tr>
        </thead>
        <tbody>
          <tr>
            <th data-stat="ranker">1</th>
            <td data-stat="player"><a href="/p/1">A. Smith</a></td>
            <td data-stat="team"><a href="/t/1">X FC</a></td>
            <td data-stat="goals">5</td>
          </tr>
          <tr class="thead">
            <td data-stat="player">Player</td>
          </tr>
          <tr class="spacer partial_table"><td></td></tr>
        </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn test_locate_table_by_id() {
        let table = locate_table(SIMPLE_TABLE, "stats_standard").unwrap();
        assert!(table.contains("A. Smith"));
    }

    #[test]
    fn test_locate_table_by_class_when_id_unknown() {
        let table = locate_table(SIMPLE_TABLE, "stats_unknown").unwrap();
        assert!(table.contains("A. Smith"));
    }

    #[test]
    fn test_locate_table_inside_comment() {
        let html = format!(
            "<html><body><div><!-- {} --></div></body></html>",
            r#"<table id="stats_shooting"><tbody><tr><td data-stat="player">B. Jones</td></tr></tbody></table>"#
        );
        let table = locate_table(&html, "stats_shooting").unwrap();
        assert!(table.contains("B. Jones"));
    }

    #[test]
    fn test_locate_table_missing() {
        assert!(locate_table("<html><body><p>nothing here</p></body></html>", "stats_x").is_none());
    }

    #[test]
    fn test_parse_rows_classes_and_cells() {
        let table = locate_table(SIMPLE_TABLE, "stats_standard").unwrap();
        let rows = parse_rows(table);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].class, RowClass::Normal);
        assert_eq!(rows[0].cell_text("player"), Some("A. Smith"));
        assert_eq!(rows[0].cell_text("goals"), Some("5"));
        let team = rows[0].cell("team").unwrap();
        assert_eq!(team.link_label.as_deref(), Some("X FC"));

        assert_eq!(rows[1].class, RowClass::HeaderSeparator);
        // First qualifying class wins
        assert_eq!(rows[2].class, RowClass::Spacer);
    }

    #[test]
    fn test_parse_rows_without_tbody() {
        let html = r#"<table>
            <tr><th scope="col" data-stat="player">Player</th></tr>
            <tr><td data-stat="player">C. Direct</td></tr>
            <tr><td>no key</td></tr>
        </table>"#;
        let rows = parse_rows(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cell_text("player"), Some("C. Direct"));
    }

    #[test]
    fn test_header_keys_skip_structural_columns() {
        let table = locate_table(SIMPLE_TABLE, "stats_standard").unwrap();
        let keys = header_keys(table);
        assert!(keys.contains("player"));
        assert!(keys.contains("goals"));
        assert!(!keys.contains("ranker"));
        assert!(!keys.contains("matches"));
        // Category grouping row is ignored
        assert!(!keys.contains("header_group"));
    }

    #[test]
    fn test_flatten_text_decodes_and_collapses() {
        assert_eq!(
            flatten_text("<span>eng</span> <a href='/x'>ENG</a>"),
            "eng ENG"
        );
        assert_eq!(flatten_text("Tom&nbsp;&amp;&nbsp;Jerry"), "Tom & Jerry");
        assert_eq!(flatten_text("  <b>  5  </b> "), "5");
    }

    #[test]
    fn test_get_attr_quoting_styles() {
        assert_eq!(get_attr(r#"td data-stat="goals""#, "data-stat").as_deref(), Some("goals"));
        assert_eq!(get_attr("td data-stat='goals'", "data-stat").as_deref(), Some("goals"));
        assert_eq!(get_attr("td data-stat=goals", "data-stat").as_deref(), Some("goals"));
        assert_eq!(get_attr("td class=\"a b\"", "data-stat"), None);
    }

    #[test]
    fn test_first_link_label() {
        assert_eq!(
            first_link_label(r#"<a href="/t/1">X FC</a>"#).as_deref(),
            Some("X FC")
        );
        assert_eq!(first_link_label(r#"<a href="/t/1"></a>"#), None);
        assert_eq!(first_link_label("plain text"), None);
    }
}
