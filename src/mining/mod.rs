//! The association-rule pipeline: C1 ([`crate::transaction`]) feeds C2
//! ([`apriori`]/[`fpgrowth`]) feeds C3 ([`rules`]), orchestrated by
//! [`AssociationRuleMiner`]'s lifecycle (§6 of the design doc).

pub mod apriori;
pub mod fpgrowth;
pub mod rules;
pub mod stats;

use crate::errors::{MiningError, Result};
use crate::lifecycle::AlgorithmState;
use crate::transaction::{InputFormat, TransactionalStore};
use crate::types::AssociationRule;
use serde::{Deserialize, Serialize};

/// Which C2 backend to use. `Eclat` is reserved (unimplemented), mirroring
/// the teacher's own `MiningFailed("... not yet implemented")` branch for
/// algorithms beyond the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MiningAlgorithm {
    Apriori,
    FpGrowth,
    Eclat,
}

/// Typed option set for the association-rule miner (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Minimum support threshold, `(0.0, 1.0]`.
    pub min_support: f64,
    /// Minimum confidence threshold, `(0.0, 1.0]`.
    pub min_confidence: f64,
    pub algorithm: MiningAlgorithm,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.1,
            min_confidence: 0.7,
            algorithm: MiningAlgorithm::Apriori,
        }
    }
}

/// Lifecycle-driven association-rule miner: `load_data -> execute -> reset`.
pub struct AssociationRuleMiner {
    config: MiningConfig,
    state: AlgorithmState,
    store: Option<TransactionalStore>,
    rules: Vec<AssociationRule>,
    stats: stats::MiningStats,
}

impl AssociationRuleMiner {
    pub fn new(config: MiningConfig) -> Self {
        Self {
            config,
            state: AlgorithmState::OptionsRegistered,
            store: None,
            rules: Vec::new(),
            stats: stats::MiningStats::default(),
        }
    }

    /// Load transactions from already-tokenized rows. Fails with
    /// [`MiningError::EmptyInput`] if zero transactions result.
    pub fn load_data<R, T>(&mut self, rows: R, format: InputFormat) -> Result<()>
    where
        R: IntoIterator<Item = T>,
        T: IntoIterator<Item = String>,
    {
        let store = TransactionalStore::from_rows(rows, format)?;
        self.stats.transactions_processed = store.num_transactions();
        log::debug!(
            "association rule miner: loaded {} transactions, {} items",
            store.num_transactions(),
            store.num_items()
        );
        self.store = Some(store);
        self.state = AlgorithmState::Loaded;
        Ok(())
    }

    pub fn transaction_count(&self) -> usize {
        self.store.as_ref().map_or(0, TransactionalStore::num_transactions)
    }

    pub fn store(&self) -> Option<&TransactionalStore> {
        self.store.as_ref()
    }

    /// Mine frequent itemsets, then derive rules from each. `should_stop` is
    /// polled once per frequent itemset; on a cooperative stop, no rule is
    /// committed and the instance stays in the `Loaded` state. Returns the
    /// elapsed wall-clock time in milliseconds.
    pub fn execute(&mut self, should_stop: &dyn Fn() -> bool) -> Result<u64> {
        self.state.require(AlgorithmState::Loaded, "execute")?;
        let store = self
            .store
            .as_ref()
            .expect("Loaded state implies a store is present");
        let start = std::time::Instant::now();

        let frequent_itemsets = match self.config.algorithm {
            MiningAlgorithm::Apriori => {
                apriori::find_frequent_itemsets(store, self.config.min_support)?
            }
            MiningAlgorithm::FpGrowth => {
                fpgrowth::find_frequent_itemsets(store, self.config.min_support)?
            }
            MiningAlgorithm::Eclat => {
                return Err(MiningError::InvalidConfig(
                    "Eclat backend is not yet implemented".to_string(),
                ))
            }
        };
        self.stats.frequent_itemsets_count = frequent_itemsets.len();
        log::debug!(
            "association rule miner: {} frequent itemsets",
            frequent_itemsets.len()
        );

        let mut rules = Vec::new();
        for itemset in &frequent_itemsets {
            if should_stop() {
                log::debug!("association rule miner: execute cancelled");
                return Err(MiningError::Cancelled);
            }
            rules::generate_rules(store, itemset, self.config.min_confidence, &mut rules)?;
        }

        self.stats.rules_generated = rules.len();
        self.rules = rules;
        self.state = AlgorithmState::Executed;

        Ok(start.elapsed().as_millis() as u64)
    }

    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    pub fn stats(&self) -> &stats::MiningStats {
        &self.stats
    }

    /// Return to the `Loaded` state, clearing the rule collection, so the
    /// same data can be re-executed with different options.
    pub fn reset(&mut self) -> Result<()> {
        self.state.require(AlgorithmState::Executed, "reset")?;
        self.rules.clear();
        self.stats.rules_generated = 0;
        self.stats.frequent_itemsets_count = 0;
        self.state = AlgorithmState::Loaded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_stop() -> bool {
        false
    }

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_seed_scenario_empty_transactions() {
        let mut miner = AssociationRuleMiner::new(MiningConfig::default());
        let empty: Vec<Vec<String>> = Vec::new();
        let err = miner.load_data(empty, InputFormat::Tabular).unwrap_err();
        assert!(matches!(err, MiningError::EmptyInput(_)));
    }

    #[test]
    fn test_execute_before_load_is_state_error() {
        let mut miner = AssociationRuleMiner::new(MiningConfig::default());
        let err = miner.execute(&never_stop).unwrap_err();
        assert!(matches!(err, MiningError::StateError(_)));
    }

    #[test]
    fn test_seed_scenario_trivial_ar_end_to_end() {
        let config = MiningConfig {
            min_support: 0.5,
            min_confidence: 0.9,
            algorithm: MiningAlgorithm::Apriori,
        };
        let mut miner = AssociationRuleMiner::new(config);
        miner
            .load_data(rows(&[&["1", "2"], &["1", "2"], &["1", "3"]]), InputFormat::Tabular)
            .unwrap();
        miner.execute(&never_stop).unwrap();

        let store = miner.store().unwrap();
        let i1 = store.item_id("1").unwrap();
        let i2 = store.item_id("2").unwrap();

        assert_eq!(miner.rules().len(), 1);
        assert_eq!(miner.rules()[0].lhs, vec![i2]);
        assert_eq!(miner.rules()[0].rhs, vec![i1]);
    }

    #[test]
    fn test_reset_allows_re_execution() {
        let config = MiningConfig {
            min_support: 0.5,
            min_confidence: 0.5,
            algorithm: MiningAlgorithm::Apriori,
        };
        let mut miner = AssociationRuleMiner::new(config);
        miner
            .load_data(rows(&[&["A", "B"], &["A", "B"], &["A", "C"]]), InputFormat::Tabular)
            .unwrap();
        miner.execute(&never_stop).unwrap();
        assert!(!miner.rules().is_empty());

        miner.reset().unwrap();
        assert!(miner.rules().is_empty());

        miner.execute(&never_stop).unwrap();
        assert!(!miner.rules().is_empty());
    }

    #[test]
    fn test_cancellation_leaves_no_partial_rules() {
        let config = MiningConfig {
            min_support: 0.1,
            min_confidence: 0.1,
            algorithm: MiningAlgorithm::Apriori,
        };
        let mut miner = AssociationRuleMiner::new(config);
        miner
            .load_data(rows(&[&["A", "B"], &["A", "C"], &["A", "D"]]), InputFormat::Tabular)
            .unwrap();

        let err = miner.execute(&|| true).unwrap_err();
        assert!(matches!(err, MiningError::Cancelled));
        assert!(miner.rules().is_empty());

        // Instance is still in the Loaded state: execute can be retried.
        miner.execute(&never_stop).unwrap();
        assert!(!miner.rules().is_empty());
    }

    #[test]
    fn test_fpgrowth_backend_selectable() {
        let config = MiningConfig {
            min_support: 0.5,
            min_confidence: 0.9,
            algorithm: MiningAlgorithm::FpGrowth,
        };
        let mut miner = AssociationRuleMiner::new(config);
        miner
            .load_data(rows(&[&["1", "2"], &["1", "2"], &["1", "3"]]), InputFormat::Tabular)
            .unwrap();
        miner.execute(&never_stop).unwrap();
        assert_eq!(miner.rules().len(), 1);
    }
}
