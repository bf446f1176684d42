//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;

use crate::domain::Row;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One-line row summary: `label [id] level=N` plus state markers.
pub fn describe(row: &Row) -> String {
    let mut markers = Vec::new();
    if row.expanded {
        markers.push("expanded".to_string());
    }
    if !row.kind.is_empty() {
        markers.push(format!("kind={}", row.kind));
    }
    match row.parent.as_ref() {
        Some(p) => markers.push(format!("parent={}", p)),
        None => markers.push("root".to_string()),
    }
    format!("{} level={} ({})", row, row.level, markers.iter().join(", "))
}

/// Print rows one per line, or a dimmed note when there are none
pub fn rows(rows: &[&Row]) {
    if rows.is_empty() {
        println!("{}", "(none)".dimmed());
        return;
    }
    for row in rows {
        println!("  {}", describe(row));
    }
}

/// Comma separated ids, e.g. for removal summaries
pub fn ids<'a>(rows: impl IntoIterator<Item = &'a Row>) -> String {
    rows.into_iter().map(|r| &r.id).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemDto, ItemId, TreeStore};

    #[test]
    fn given_child_row_when_describing_then_lists_parent_and_level() {
        let store = TreeStore::new(vec![
            ItemDto::new(ItemId::Num(1), None, "A"),
            ItemDto::new(ItemId::Num(2), Some(ItemId::Num(1)), "B"),
        ])
        .unwrap();

        let text = describe(store.get_item(&ItemId::Num(2)).unwrap());

        assert_eq!(text, "B [2] level=1 (parent=1)");
        assert_eq!(ids(store.iter()), "1, 2");
    }
}
