//! The reference table: plan-local refs to remote ids.
//!
//! This is the substrate every other component reads and writes. The table
//! is append-only and lives for exactly one run: the object creator fills
//! it, then the connection creator, the layout engine, and the flow
//! resolver read it. Lookups for unknown refs return `None` rather than
//! failing; callers decide how to degrade.

use indexmap::IndexMap;

/// Append-only mapping from plan-local refs to remote entity ids.
///
/// Insertion order is preserved so the `ref_to_id_mapping` in the run
/// summary reads in creation order.
#[derive(Debug, Clone, Default)]
pub struct RefTable {
    entries: IndexMap<String, String>,
}

impl RefTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-seeded with refs the caller already knows about,
    /// e.g. objects created by an earlier run.
    pub fn seeded(existing: &IndexMap<String, String>) -> Self {
        Self {
            entries: existing.clone(),
        }
    }

    /// Register a `ref -> remote id` pair.
    ///
    /// Plan validation rejects duplicate refs up front, so in practice this
    /// never overwrites; a seeded ref recreated by the plan takes the new
    /// id.
    pub fn insert(&mut self, ref_name: impl Into<String>, remote_id: impl Into<String>) {
        self.entries.insert(ref_name.into(), remote_id.into());
    }

    /// Look up the remote id for a ref. `None` signals an unresolved
    /// reference and is always non-fatal.
    pub fn resolve(&self, ref_name: &str) -> Option<&str> {
        self.entries.get(ref_name).map(String::as_str)
    }

    /// Whether a ref is known to the table.
    pub fn contains(&self, ref_name: &str) -> bool {
        self.entries.contains_key(ref_name)
    }

    /// Number of registered refs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The full mapping, in insertion order, for the run summary.
    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_unknown_ref_is_none() {
        let table = RefTable::new();
        assert_eq!(table.resolve("missing"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_and_resolve() {
        let mut table = RefTable::new();
        table.insert("api", "m-1");
        table.insert("db", "m-2");

        assert_eq!(table.resolve("api"), Some("m-1"));
        assert_eq!(table.resolve("db"), Some("m-2"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_seeded_table_keeps_existing_refs() {
        let mut existing = IndexMap::new();
        existing.insert("legacy".to_string(), "m-0".to_string());

        let mut table = RefTable::seeded(&existing);
        table.insert("api", "m-1");

        assert_eq!(table.resolve("legacy"), Some("m-0"));
        assert_eq!(table.resolve("api"), Some("m-1"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut table = RefTable::new();
        table.insert("c", "3");
        table.insert("a", "1");
        table.insert("b", "2");

        let keys: Vec<&String> = table.as_map().keys().collect();
        assert_eq!(keys, ["c", "a", "b"]);
    }
}
