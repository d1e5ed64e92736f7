//! Anchor-driven extraction of tables from scraped reference pages.
//!
//! Reference pages are edited by hand and their markup drifts. Tables are
//! therefore located by the labels in their header row rather than by
//! position, and a page without a matching table simply yields no rows.

use crate::consts;
use scraper::{ElementRef, Html, Node};

/// The text of one cell, split into lines at `<br>` and block boundaries.
pub type Cell = Vec<String>;

/// Cells of one body row, in the order the columns were requested.
pub type AnchoredRow = Vec<Cell>;

/// Collect the body rows of every table whose header row satisfies all of
/// `columns`.
///
/// Each entry of `columns` is a group of interchangeable labels (for
/// example `&["Name", "Rune", "Gem"]`); labels compare case-insensitively
/// with whitespace collapsed and a trailing colon ignored.
pub fn anchored_rows(document: &Html, columns: &[&[&str]]) -> Vec<AnchoredRow> {
    let mut rows = Vec::new();
    for table in document.select(&consts::TABLE_SELECTOR) {
        let mut table_rows = own_rows(table);
        let Some(header) = table_rows.next() else {
            continue;
        };
        let labels: Vec<String> = cells(header).map(|cell| normalize(&cell_lines(cell).join(" "))).collect();
        let Some(positions) = locate(&labels, columns) else {
            continue;
        };
        for row in table_rows {
            let row_cells: Vec<Cell> = cells(row).map(cell_lines).collect();
            if row_cells.iter().all(Vec::is_empty) {
                continue;
            }
            rows.push(
                positions
                    .iter()
                    .map(|&position| row_cells.get(position).cloned().unwrap_or_default())
                    .collect(),
            );
        }
    }
    rows
}

/// Whole-document text with whitespace collapsed.
pub fn document_text(document: &Html) -> String {
    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    consts::WHITESPACE_REGEX.replace_all(&text, " ").trim().to_string()
}

fn locate(labels: &[String], columns: &[&[&str]]) -> Option<Vec<usize>> {
    columns
        .iter()
        .map(|aliases| {
            labels
                .iter()
                .position(|label| aliases.iter().any(|alias| normalize(alias) == *label))
        })
        .collect()
}

/// Rows belonging to `table` itself, not to tables nested inside it.
fn own_rows(table: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    let table_id = table.id();
    table.select(&consts::ROW_SELECTOR).filter(move |row| {
        row.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| ancestor.value().name() == "table")
            .is_some_and(|owner| owner.id() == table_id)
    })
}

fn cells(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| matches!(child.value().name(), "td" | "th"))
}

fn cell_lines(cell: ElementRef<'_>) -> Cell {
    let mut lines = vec![String::new()];
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => {
                if let Some(line) = lines.last_mut() {
                    line.push_str(text);
                }
            },
            Node::Element(element) if matches!(element.name(), "br" | "p" | "div" | "li") => {
                lines.push(String::new());
            },
            _ => {},
        }
    }
    lines
        .into_iter()
        .map(|line| consts::WHITESPACE_REGEX.replace_all(&line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn normalize(label: &str) -> String {
    let collapsed = consts::WHITESPACE_REGEX.replace_all(label, " ");
    collapsed.trim().trim_end_matches(':').trim().to_lowercase()
}
