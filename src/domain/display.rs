//! Text rendering of the row hierarchy via `termtree`.

use std::collections::HashSet;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{ItemId, Row, TreeStore};

/// Label used for the synthetic node holding all top-level rows.
pub const FOREST_ROOT: &str = ".";

impl TreeStore {
    /// Renders every top-level row and its subtree below a `.` root.
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree(&self, show_levels: bool) -> Tree<String> {
        let mut seen = HashSet::new();
        let leaves: Vec<_> = self
            .to_row_data()
            .into_iter()
            .map(|row| self.build_tree(row, show_levels, &mut seen))
            .collect();
        Tree::new(FOREST_ROOT.to_string()).with_leaves(leaves)
    }

    fn build_tree<'a>(
        &'a self,
        row: &'a Row,
        show_levels: bool,
        seen: &mut HashSet<&'a ItemId>,
    ) -> Tree<String> {
        seen.insert(&row.id);
        let mut tree = Tree::new(node_text(row, show_levels));
        for child in self.get_children(Some(&row.id)) {
            if !seen.contains(&child.id) {
                tree.push(self.build_tree(child, show_levels, seen));
            }
        }
        tree
    }
}

fn node_text(row: &Row, show_levels: bool) -> String {
    let mut text = row.to_string();
    if show_levels {
        text.push_str(&format!(" (level {})", row.level));
    }
    if !row.kind.is_empty() {
        text.push_str(&format!(" <{}>", row.kind));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemDto;

    #[test]
    fn given_forest_when_rendering_then_nests_children_under_dot() {
        let store = TreeStore::new(vec![
            ItemDto::new(ItemId::Num(1), None, "A"),
            ItemDto::new(ItemId::Num(2), Some(ItemId::Num(1)), "B"),
            ItemDto::new(ItemId::Num(3), None, "C"),
        ])
        .unwrap();

        let rendered = store.to_tree(false).to_string();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], ".");
        assert!(lines[1].ends_with("A [1]"));
        assert!(lines[2].ends_with("B [2]"));
        assert!(lines[2].starts_with("│"));
        assert!(lines[3].ends_with("C [3]"));
    }

    #[test]
    fn given_levels_flag_when_rendering_then_annotates_levels() {
        let store = TreeStore::new(vec![
            ItemDto::new(ItemId::Num(1), None, "A"),
            ItemDto::new(ItemId::Num(2), Some(ItemId::Num(1)), "B"),
        ])
        .unwrap();

        let rendered = store.to_tree(true).to_string();

        assert!(rendered.contains("B [2] (level 1)"));
    }

    #[test]
    fn given_empty_store_when_rendering_then_only_root() {
        let rendered = TreeStore::default().to_tree(false).to_string();
        assert_eq!(rendered.trim_end(), FOREST_ROOT);
    }
}
