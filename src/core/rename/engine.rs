//! Substitution engine: computes new names and optionally applies them.
//!
//! A batch runs in three steps:
//! 1. Validate the rule and compile the pattern (no item is touched on failure)
//! 2. Compute the proposed name of every in-scope item, in input order
//! 3. Rename changed items unless the rule is a dry run
//!
//! The engine keeps no state between calls.

use regex::Regex;
use serde::Serialize;

use super::item::Renameable;
use super::rule::{validate, ItemKind, RenameRule};
use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Result for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOutcome {
    pub kind: ItemKind,
    pub original_name: String,
    pub proposed_name: String,
    /// `proposed_name != original_name`.
    pub changed: bool,
}

impl RenameOutcome {
    fn new(kind: ItemKind, original_name: String, proposed_name: String) -> Self {
        let changed = proposed_name != original_name;
        Self {
            kind,
            original_name,
            proposed_name,
            changed,
        }
    }

    /// One console line for this item.
    pub fn describe(&self) -> String {
        if self.changed {
            format!("'{}' --> '{}'", self.original_name, self.proposed_name)
        } else {
            format!("'{}' is not affected", self.original_name)
        }
    }
}

/// Aggregate result of a batch. Outcomes keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameSummary {
    pub dry_run: bool,
    pub objects_changed: usize,
    pub collections_changed: usize,
    pub outcomes: Vec<RenameOutcome>,
}

impl RenameSummary {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: RenameOutcome) {
        if outcome.changed {
            match outcome.kind {
                ItemKind::Object => self.objects_changed += 1,
                ItemKind::Collection => self.collections_changed += 1,
            }
        }
        self.outcomes.push(outcome);
    }

    pub fn changed_count(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Object => self.objects_changed,
            ItemKind::Collection => self.collections_changed,
        }
    }

    pub fn total_changed(&self) -> usize {
        self.objects_changed + self.collections_changed
    }

    /// Fold another batch into this one, e.g. when the host runs one batch per kind.
    pub fn merge(&mut self, other: RenameSummary) {
        self.dry_run |= other.dry_run;
        for outcome in other.outcomes {
            self.record(outcome);
        }
    }

    pub fn message(&self) -> String {
        let verb = if self.dry_run {
            "Would rename"
        } else {
            "Renamed"
        };
        format!(
            "{} {} object(s) and {} collection(s)",
            verb, self.objects_changed, self.collections_changed
        )
    }
}

// ============================================================================
// Matching
// ============================================================================

/// A rule's pattern, compiled once per batch.
enum Matcher<'r> {
    Literal(&'r str),
    Regex(Regex),
}

impl<'r> Matcher<'r> {
    fn compile(rule: &'r RenameRule) -> Result<Self> {
        if !rule.use_regex {
            return Ok(Matcher::Literal(&rule.pattern));
        }

        Regex::new(&rule.pattern)
            .map(Matcher::Regex)
            .map_err(|e| Error::rename_invalid_pattern(&rule.pattern, e.to_string()))
    }

    /// Substitute every non-overlapping match, scanning left to right.
    fn replace_all(&self, name: &str, replacement: &str) -> String {
        match self {
            Matcher::Literal(pattern) => name.replace(*pattern, replacement),
            Matcher::Regex(re) => re.replace_all(name, replacement).into_owned(),
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Compute the name `name` would get under `rule`.
///
/// Matching is case-sensitive in both modes. Regex mode fails with
/// `rename.invalid_pattern` when the pattern does not compile.
pub fn compute_replacement(name: &str, rule: &RenameRule) -> Result<String> {
    let matcher = Matcher::compile(rule)?;
    Ok(matcher.replace_all(name, &rule.replacement))
}

/// Run a rename batch over kind-tagged items.
///
/// Items whose kind is outside the rule's scope are skipped and not reported.
/// The batch is not transactional: an error part-way leaves earlier renames in place.
pub fn apply<'a, R, I>(items: I, rule: &RenameRule) -> Result<RenameSummary>
where
    I: IntoIterator<Item = (ItemKind, &'a mut R)>,
    R: Renameable + ?Sized + 'a,
{
    validate(rule)?;
    let matcher = Matcher::compile(rule)?;

    let mut summary = RenameSummary::new(rule.dry_run);

    for (kind, item) in items {
        if !rule.includes(kind) {
            continue;
        }

        let original = item.name().to_string();
        let proposed = matcher.replace_all(&original, &rule.replacement);
        let outcome = RenameOutcome::new(kind, original, proposed);

        if outcome.changed && !rule.dry_run {
            item.set_name(outcome.proposed_name.clone());
        }

        summary.record(outcome);
    }

    Ok(summary)
}

/// Run a rename batch over items the host has already partitioned by kind.
pub fn apply_to_kind<'a, R, I>(items: I, kind: ItemKind, rule: &RenameRule) -> Result<RenameSummary>
where
    I: IntoIterator<Item = &'a mut R>,
    R: Renameable + ?Sized + 'a,
{
    apply(items.into_iter().map(|item| (kind, item)), rule)
}
