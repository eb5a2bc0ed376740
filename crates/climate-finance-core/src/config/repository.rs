//! Pluggable persistence for the flat key→value configuration table.
//!
//! The store never talks to a backend directly; it goes through this trait so
//! risk and forecast logic can be tested against a fixed in-memory table.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::ClimateFinanceError;
use crate::ClimateFinanceResult;

/// A flat key→string-value table. Writes are bulk insert-or-replace.
///
/// One `set_many` call must be atomic: no reader may observe a half-applied
/// batch. Categories never share keys, so per-call atomicity is all the
/// cross-category independence the store needs.
pub trait ConfigRepository: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// All entries whose key starts with `prefix`, in key order.
    fn get_prefixed(&self, prefix: &str) -> BTreeMap<String, String>;

    /// Insert-or-replace every entry in one atomic batch.
    fn set_many(&self, entries: Vec<(String, String)>) -> ClimateFinanceResult<()>;

    /// Remove every entry whose key starts with `prefix`.
    fn remove_prefixed(&self, prefix: &str) -> ClimateFinanceResult<()>;

    /// Atomically remove everything under `prefix` and insert `entries` in
    /// the same batch. Used for bulk category replacement.
    fn replace_prefixed(
        &self,
        prefix: &str,
        entries: Vec<(String, String)>,
    ) -> ClimateFinanceResult<()>;
}

/// In-memory backend. The default for tests and the CLI; production deploys
/// substitute a remote table behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryConfigRepository {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigRepository for InMemoryConfigRepository {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn get_prefixed(&self, prefix: &str) -> BTreeMap<String, String> {
        match self.entries.read() {
            Ok(map) => map
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Err(_) => BTreeMap::new(),
        }
    }

    fn set_many(&self, entries: Vec<(String, String)>) -> ClimateFinanceResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| ClimateFinanceError::Storage("configuration lock poisoned".into()))?;
        for (k, v) in entries {
            map.insert(k, v);
        }
        Ok(())
    }

    fn remove_prefixed(&self, prefix: &str) -> ClimateFinanceResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| ClimateFinanceError::Storage("configuration lock poisoned".into()))?;
        map.retain(|k, _| !k.starts_with(prefix));
        Ok(())
    }

    fn replace_prefixed(
        &self,
        prefix: &str,
        entries: Vec<(String, String)>,
    ) -> ClimateFinanceResult<()> {
        let mut map = self
            .entries
            .write()
            .map_err(|_| ClimateFinanceError::Storage("configuration lock poisoned".into()))?;
        map.retain(|k, _| !k.starts_with(prefix));
        for (k, v) in entries {
            map.insert(k, v);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_many_then_get() {
        let repo = InMemoryConfigRepository::new();
        repo.set_many(vec![
            ("a_one".into(), "1".into()),
            ("a_two".into(), "2".into()),
            ("b_one".into(), "3".into()),
        ])
        .unwrap();
        assert_eq!(repo.get("a_one").as_deref(), Some("1"));
        assert_eq!(repo.get("missing"), None);
    }

    #[test]
    fn test_get_prefixed_is_exact_prefix_match() {
        let repo = InMemoryConfigRepository::new();
        repo.set_many(vec![
            ("a_one".into(), "1".into()),
            ("a_two".into(), "2".into()),
            ("ab_three".into(), "3".into()),
            ("b_one".into(), "4".into()),
        ])
        .unwrap();
        let got = repo.get_prefixed("a_");
        assert_eq!(got.len(), 2);
        assert!(got.contains_key("a_one") && got.contains_key("a_two"));
    }

    #[test]
    fn test_set_many_replaces_existing() {
        let repo = InMemoryConfigRepository::new();
        repo.set_many(vec![("k".into(), "old".into())]).unwrap();
        repo.set_many(vec![("k".into(), "new".into())]).unwrap();
        assert_eq!(repo.get("k").as_deref(), Some("new"));
    }

    #[test]
    fn test_replace_prefixed_swaps_whole_category() {
        let repo = InMemoryConfigRepository::new();
        repo.set_many(vec![
            ("credit_rating_aaa_spread_bps".into(), "50".into()),
            ("credit_rating_d_spread_bps".into(), "5000".into()),
            ("risk_weight_x".into(), "0.35".into()),
        ])
        .unwrap();
        repo.replace_prefixed(
            "credit_rating_",
            vec![("credit_rating_bb_spread_bps".into(), "400".into())],
        )
        .unwrap();
        assert_eq!(repo.get("credit_rating_aaa_spread_bps"), None);
        assert_eq!(repo.get("credit_rating_bb_spread_bps").as_deref(), Some("400"));
        assert_eq!(repo.get("risk_weight_x").as_deref(), Some("0.35"));
    }

    #[test]
    fn test_remove_prefixed() {
        let repo = InMemoryConfigRepository::new();
        repo.set_many(vec![
            ("risk_weight_x".into(), "1".into()),
            ("credit_rating_aaa_spread_bps".into(), "50".into()),
            ("unrelated".into(), "keep".into()),
        ])
        .unwrap();
        repo.remove_prefixed("risk_").unwrap();
        repo.remove_prefixed("credit_rating_").unwrap();
        assert_eq!(repo.get("risk_weight_x"), None);
        assert_eq!(repo.get("credit_rating_aaa_spread_bps"), None);
        assert_eq!(repo.get("unrelated").as_deref(), Some("keep"));
    }
}
