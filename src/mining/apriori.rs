//! Frequent-itemset mining via the classic Apriori level-wise join (C2,
//! default backend). Adapted from the teacher's `mining/apriori.rs`, reworked
//! over dense `ItemId`s driven by [`TransactionalStore::contains`].

use crate::errors::{MiningError, Result};
use crate::transaction::{ItemId, TransactionalStore};
use crate::types::{FrequentItemset, Itemset};

/// Find all itemsets whose support is `>= min_support`.
///
/// Fails with [`MiningError::InvalidThreshold`] if `min_support` is outside
/// `(0.0, 1.0]`.
pub fn find_frequent_itemsets(
    store: &TransactionalStore,
    min_support: f64,
) -> Result<Vec<FrequentItemset>> {
    if !(min_support > 0.0 && min_support <= 1.0) {
        return Err(MiningError::InvalidThreshold(format!(
            "min_support must be in (0, 1], got {min_support}"
        )));
    }

    let mut frequent_itemsets = Vec::new();
    let mut current_level: Vec<Itemset> = store.all_items().into_iter().map(|id| vec![id]).collect();

    while !current_level.is_empty() {
        let frequent_k: Vec<(Itemset, f64)> = current_level
            .into_iter()
            .filter_map(|itemset| {
                let support = store.support(&itemset);
                (support >= min_support).then_some((itemset, support))
            })
            .collect();

        if frequent_k.is_empty() {
            break;
        }

        for (itemset, support) in &frequent_k {
            frequent_itemsets.push(FrequentItemset {
                items: itemset.clone(),
                support: *support,
            });
        }

        current_level = generate_candidates(&frequent_k);
    }

    log::debug!("apriori: {} frequent itemsets", frequent_itemsets.len());
    Ok(frequent_itemsets)
}

/// Generate (k+1)-itemsets from k-itemsets sharing their first k-1 items.
fn generate_candidates(frequent_k: &[(Itemset, f64)]) -> Vec<Itemset> {
    let mut candidates = Vec::new();

    for i in 0..frequent_k.len() {
        for j in (i + 1)..frequent_k.len() {
            let (set1, _) = &frequent_k[i];
            let (set2, _) = &frequent_k[j];

            if can_join(set1, set2) {
                let mut new_set = set1.clone();
                if let Some(&last_item) = set2.last() {
                    if !new_set.contains(&last_item) {
                        new_set.push(last_item);
                        new_set.sort_unstable();
                        candidates.push(new_set);
                    }
                }
            }
        }
    }

    candidates.sort();
    candidates.dedup();
    candidates
}

/// Whether two same-size, sorted itemsets share their first k-1 items and
/// differ in their last.
fn can_join(set1: &[ItemId], set2: &[ItemId]) -> bool {
    if set1.len() != set2.len() || set1.is_empty() {
        return false;
    }
    for i in 0..set1.len() - 1 {
        if set1[i] != set2[i] {
            return false;
        }
    }
    set1[set1.len() - 1] != set2[set2.len() - 1]
}
