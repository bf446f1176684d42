//! CLI argument definitions using clap

use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::ItemId;

/// Inspect hierarchical row sets: levels, children, ancestors and subtree removal
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Items file (TOML with [[items]] tables)
    #[arg(
        short,
        long,
        global = true,
        env = "TREESTORE_ITEMS_FILE",
        value_hint = ValueHint::FilePath
    )]
    pub file: Option<PathBuf>,

    /// Recompute descendant levels when a row is moved
    #[arg(long, global = true)]
    pub cascade: bool,

    /// Annotate tree output with levels
    #[arg(long, global = true)]
    pub levels: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the hierarchy as a tree
    Tree,

    /// List top-level rows
    Rows,

    /// List all rows in insertion order
    List,

    /// Show one row
    Item {
        /// Row id (integers are numeric ids)
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// List direct children of a row
    Children {
        /// Parent row id
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// List the whole subtree below a row (pre-order)
    Descendants {
        /// Row id
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// List ancestors, nearest first
    Parents {
        /// Row id
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// Show the tree after removing a row and its subtree (file is not changed)
    Remove {
        /// Row id
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// Show the tree after reparenting a row (file is not changed)
    Move {
        /// Row id
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
        /// New parent id; omit to make it top-level
        #[arg(short, long, value_parser = parse_item_id)]
        parent: Option<ItemId>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print effective settings as TOML
    Show,
    /// Print a commented settings template
    Template,
}

/// Integers become numeric ids, everything else a string id.
///
/// clap's default parser for `ItemId` would go through `From<String>` and
/// always yield `ItemId::Str`.
pub fn parse_item_id(value: &str) -> Result<ItemId, Infallible> {
    ItemId::from_str(value)
}
