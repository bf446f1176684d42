//! Domain entities: item identifiers, input DTOs and stored rows

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a row.
///
/// Numbers and strings are distinct keys: `Num(1)` and `Str("1")` never
/// compare equal and never collide in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Num(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Num(n) => write!(f, "{}", n),
            ItemId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Num(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Str(s)
    }
}

/// Command-line form: integers become `Num`, anything else `Str`.
impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(ItemId::Num)
            .unwrap_or_else(|_| ItemId::Str(s.to_string())))
    }
}

/// Raw item as supplied by the host: identity, parent reference and label.
///
/// `parent = None` marks a top-level item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: ItemId,
    #[serde(default)]
    pub parent: Option<ItemId>,
    pub label: String,
}

impl ItemDto {
    pub fn new(id: impl Into<ItemId>, parent: Option<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent,
            label: label.into(),
        }
    }
}

/// Stored node: the DTO fields plus store-managed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: ItemId,
    pub parent: Option<ItemId>,
    pub label: String,
    /// Grid expand/collapse flag, survives updates
    pub expanded: bool,
    /// Depth below the nearest ancestor without a registered parent
    pub level: usize,
    /// Opaque classification owned by the grid, survives updates
    pub kind: String,
}

impl Row {
    pub(crate) fn from_dto(dto: ItemDto, level: usize) -> Self {
        Self {
            id: dto.id,
            parent: dto.parent,
            label: dto.label,
            expanded: false,
            level,
            kind: String::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label, self.id)
    }
}
