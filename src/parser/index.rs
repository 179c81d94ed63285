//! Entity index page parsing
//!
//! Index pages list one entity (group, lecturer, room) per table row, with a
//! link to that entity's schedule page in the second marked cell.

use scraper::Html;
use std::collections::BTreeMap;

use super::selectors::{DATA_TABLE, ENTITY_CELL, ENTITY_LINK, ROW};
use crate::utils::error::ParseError;
use crate::utils::{normalize_whitespace, resolve_link};

/// Extract `entity name -> absolute URL` from an index page
///
/// Rows without marked cells (headers, decoration) are skipped. A name that
/// repeats keeps the last link seen.
///
/// # Errors
///
/// Returns `ParseError::MissingLandmark` when the page has no data table.
pub fn parse_index(html: &str, base: &str) -> Result<BTreeMap<String, String>, ParseError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&DATA_TABLE)
        .next()
        .ok_or(ParseError::MissingLandmark("table.inf"))?;

    let mut entries = BTreeMap::new();
    for row in table.select(&ROW) {
        let Some(cell) = row.select(&ENTITY_CELL).nth(1) else {
            continue;
        };
        let Some(link) = cell.select(&ENTITY_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let name = normalize_whitespace(&link.text().collect::<String>());
        if name.is_empty() {
            continue;
        }

        match resolve_link(base, href) {
            Ok(url) => {
                entries.insert(name, url);
            }
            Err(e) => tracing::warn!(name = %name, href, error = %e, "Skipping unresolvable link"),
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://94.72.18.202:8083/";

    #[test]
    fn test_parse_index_rows() {
        let html = r#"
            <table class="inf">
                <tr><td class="hd">№</td><td class="hd">Группа</td></tr>
                <tr><td class="ur">1</td><td class="ur"><a class="z0" href="cg1.htm">ИСс24-1</a></td></tr>
                <tr><td class="ur">2</td><td class="ur"><a class="z0" href="cg2.htm"> ИСс24-2 </a></td></tr>
            </table>
        "#;

        let entries = parse_index(html, BASE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["ИСс24-1"], "http://94.72.18.202:8083/cg1.htm");
        assert_eq!(entries["ИСс24-2"], "http://94.72.18.202:8083/cg2.htm");
    }

    #[test]
    fn test_repeated_name_last_wins() {
        let html = r#"
            <table class="inf">
                <tr><td class="ur">1</td><td class="ur"><a class="z0" href="cp1.htm">Иванова И.И.</a></td></tr>
                <tr><td class="ur">2</td><td class="ur"><a class="z0" href="cp9.htm">Иванова И.И.</a></td></tr>
            </table>
        "#;

        let entries = parse_index(html, BASE).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["Иванова И.И."], "http://94.72.18.202:8083/cp9.htm");
    }

    #[test]
    fn test_rows_without_marker_skipped() {
        let html = r#"
            <table class="inf">
                <tr><td>decor</td><td><a class="z0" href="x.htm">x</a></td></tr>
                <tr><td class="ur">only one marked cell</td></tr>
                <tr><td class="ur">1</td><td class="ur">no link</td></tr>
            </table>
        "#;

        assert!(parse_index(html, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_missing_table() {
        let result = parse_index("<html><body>maintenance</body></html>", BASE);
        assert_eq!(result, Err(ParseError::MissingLandmark("table.inf")));
    }
}
