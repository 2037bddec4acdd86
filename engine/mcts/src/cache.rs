//! Memoisation of oracle outputs by canonical position key.
//!
//! The cache is not authoritative state: searching with it on or off yields
//! the same tree, only the number of oracle calls differs.

use std::collections::HashMap;
use std::hash::Hash;

use crate::evaluator::EvalResult;

/// Oracle-output cache keyed by `Rules::Key`.
#[derive(Debug)]
pub struct EvalCache<K> {
    entries: HashMap<K, EvalResult>,
    enabled: bool,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq> EvalCache<K> {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: HashMap::new(),
            enabled,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached result for `key`, or compute it with `evaluate`.
    ///
    /// When the cache is disabled every call computes and nothing is stored.
    /// Errors from `evaluate` are returned and never cached.
    pub fn get_or_evaluate<F, Err>(&mut self, key: K, evaluate: F) -> Result<EvalResult, Err>
    where
        F: FnOnce() -> Result<EvalResult, Err>,
    {
        if !self.enabled {
            self.misses += 1;
            return evaluate();
        }

        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(hit.clone());
        }

        self.misses += 1;
        let result = evaluate()?;
        self.entries.insert(key, result.clone());
        Ok(result)
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the cache off also drops its entries.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.entries.clear();
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvaluatorError;

    fn result(value: f32) -> Result<EvalResult, EvaluatorError> {
        Ok(EvalResult {
            policy: vec![0.5, 0.5],
            value,
        })
    }

    #[test]
    fn test_hit_after_miss() {
        let mut cache = EvalCache::new(true);
        let mut calls = 0;

        for _ in 0..3 {
            let r = cache
                .get_or_evaluate("a", || {
                    calls += 1;
                    result(0.7)
                })
                .unwrap();
            assert!((r.value - 0.7).abs() < 1e-6);
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_disabled_cache_always_evaluates() {
        let mut cache = EvalCache::new(false);
        let mut calls = 0;

        for _ in 0..3 {
            cache
                .get_or_evaluate(1u64, || {
                    calls += 1;
                    result(0.1)
                })
                .unwrap();
        }

        assert_eq!(calls, 3);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = EvalCache::new(true);
        let err = cache.get_or_evaluate(1u64, || {
            Err(EvaluatorError::EvaluationFailed("boom".to_string()))
        });
        assert!(err.is_err());
        assert!(cache.is_empty());

        let ok = cache.get_or_evaluate(1u64, || result(0.3)).unwrap();
        assert!((ok.value - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_disabling_drops_entries() {
        let mut cache = EvalCache::new(true);
        cache.get_or_evaluate(1u64, || result(0.3)).unwrap();
        assert!(cache.is_enabled());

        cache.set_enabled(false);
        assert!(!cache.is_enabled());
        assert!(cache.is_empty());

        cache.set_enabled(true);
        let mut calls = 0;
        cache
            .get_or_evaluate(1u64, || {
                calls += 1;
                result(0.3)
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_clear() {
        let mut cache = EvalCache::new(true);
        cache.get_or_evaluate(1u64, || result(0.3)).unwrap();
        cache.get_or_evaluate(2u64, || result(0.4)).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
