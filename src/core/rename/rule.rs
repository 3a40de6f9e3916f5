use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Kind of a renameable item. The rule's scope toggles refer to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Object,
    Collection,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Object => "object",
            ItemKind::Collection => "collection",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "object" => Some(ItemKind::Object),
            "collection" => Some(ItemKind::Collection),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A find/replace request for one rename batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    /// Interpret `pattern` as a regular expression instead of a literal substring.
    pub use_regex: bool,
    /// Text or regex to search for. Must not be empty.
    pub pattern: String,
    /// Replacement text. In regex mode, `$1` / `${name}` reference capture groups.
    pub replacement: String,
    pub include_objects: bool,
    pub include_collections: bool,
    /// Report what would change without touching any item.
    pub dry_run: bool,
}

impl RenameRule {
    /// Literal rule covering both kinds, applied for real.
    pub fn literal(pattern: &str, replacement: &str) -> Self {
        Self {
            use_regex: false,
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            include_objects: true,
            include_collections: true,
            dry_run: false,
        }
    }

    /// Regex rule covering both kinds, applied for real.
    pub fn regex(pattern: &str, replacement: &str) -> Self {
        Self {
            use_regex: true,
            ..Self::literal(pattern, replacement)
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn scope(mut self, include_objects: bool, include_collections: bool) -> Self {
        self.include_objects = include_objects;
        self.include_collections = include_collections;
        self
    }

    pub fn includes(&self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::Object => self.include_objects,
            ItemKind::Collection => self.include_collections,
        }
    }
}

/// Check the rule before any item is processed.
///
/// The pattern is checked first, so a rule that is empty in both respects
/// reports `rename.empty_pattern`.
pub fn validate(rule: &RenameRule) -> Result<()> {
    if rule.pattern.is_empty() {
        return Err(Error::rename_empty_pattern());
    }

    if !rule.include_objects && !rule.include_collections {
        return Err(Error::rename_empty_scope());
    }

    Ok(())
}
