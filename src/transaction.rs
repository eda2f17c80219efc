//! The transactional store (C1): dense item ids, ordered transactions, and
//! exact support counting.

use crate::errors::{MiningError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A dense, stable item identifier assigned in first-seen order.
pub type ItemId = u32;

/// How input rows encode transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    /// Each row is already one transaction: a list of item labels.
    Tabular,
    /// Each row is a `(transaction_label, item_label)` pair; rows sharing
    /// the same transaction label are grouped into one transaction.
    Singular,
}

/// An ordered, ascending, duplicate-free set of item ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transaction {
    pub items: Vec<ItemId>,
}

impl Transaction {
    fn from_unsorted(mut items: Vec<ItemId>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    /// Whether this transaction contains every id in `itemset`.
    ///
    /// `itemset` is assumed sorted ascending, same invariant as `items`.
    pub fn contains_all(&self, itemset: &[ItemId]) -> bool {
        if itemset.len() > self.items.len() {
            return false;
        }
        let mut it = self.items.iter();
        for needle in itemset {
            loop {
                match it.next() {
                    Some(have) if have == needle => break,
                    Some(have) if have < needle => continue,
                    _ => return false,
                }
            }
        }
        true
    }
}

/// In-memory view of transactions over dense item ids, built once from an
/// external row iterator (actual tabular/CSV ingestion is out of scope).
#[derive(Debug, Clone)]
pub struct TransactionalStore {
    transactions: Vec<Transaction>,
    label_to_id: HashMap<String, ItemId>,
    id_to_label: Vec<String>,
}

impl TransactionalStore {
    /// Build a store from already-tokenized rows.
    ///
    /// Fails with [`MiningError::EmptyInput`] if zero transactions result.
    pub fn from_rows<R, T>(rows: R, format: InputFormat) -> Result<Self>
    where
        R: IntoIterator<Item = T>,
        T: IntoIterator<Item = String>,
    {
        let mut label_to_id: HashMap<String, ItemId> = HashMap::new();
        let mut id_to_label: Vec<String> = Vec::new();
        let mut intern = |label: String, label_to_id: &mut HashMap<String, ItemId>| -> ItemId {
            if let Some(id) = label_to_id.get(&label) {
                *id
            } else {
                let id = id_to_label.len() as ItemId;
                id_to_label.push(label.clone());
                label_to_id.insert(label, id);
                id
            }
        };

        let transactions = match format {
            InputFormat::Tabular => {
                let mut out = Vec::new();
                for row in rows {
                    let items: Vec<ItemId> = row
                        .into_iter()
                        .map(|label| intern(label, &mut label_to_id))
                        .collect();
                    if !items.is_empty() {
                        out.push(Transaction::from_unsorted(items));
                    }
                }
                out
            }
            InputFormat::Singular => {
                let mut order: Vec<String> = Vec::new();
                let mut grouped: HashMap<String, Vec<ItemId>> = HashMap::new();
                for row in rows {
                    let tokens: Vec<String> = row.into_iter().collect();
                    if tokens.len() != 2 {
                        return Err(MiningError::InvalidConfig(format!(
                            "singular-format row must have exactly 2 tokens, got {}",
                            tokens.len()
                        )));
                    }
                    let mut tokens = tokens.into_iter();
                    let tx_label = tokens.next().unwrap();
                    let item_label = tokens.next().unwrap();
                    let item_id = intern(item_label, &mut label_to_id);
                    grouped
                        .entry(tx_label.clone())
                        .or_insert_with(|| {
                            order.push(tx_label.clone());
                            Vec::new()
                        })
                        .push(item_id);
                }
                order
                    .into_iter()
                    .map(|label| Transaction::from_unsorted(grouped.remove(&label).unwrap()))
                    .collect()
            }
        };

        if transactions.is_empty() {
            return Err(MiningError::EmptyInput(
                "no transactions produced from input rows".to_string(),
            ));
        }

        Ok(Self {
            transactions,
            label_to_id,
            id_to_label,
        })
    }

    pub fn num_transactions(&self) -> usize {
        self.transactions.len()
    }

    pub fn num_items(&self) -> usize {
        self.id_to_label.len()
    }

    /// Deterministic, ingestion-order iteration over transactions.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Exact count of transactions containing every id in `itemset`.
    ///
    /// `itemset` must be sorted ascending (the invariant every `Itemset` in
    /// this crate upholds).
    pub fn contains(&self, itemset: &[ItemId]) -> usize {
        self.transactions
            .iter()
            .filter(|tx| tx.contains_all(itemset))
            .count()
    }

    /// Support (in `[0, 1]`) of an itemset.
    pub fn support(&self, itemset: &[ItemId]) -> f64 {
        self.contains(itemset) as f64 / self.num_transactions() as f64
    }

    pub fn item_label(&self, id: ItemId) -> &str {
        &self.id_to_label[id as usize]
    }

    pub fn item_id(&self, label: &str) -> Option<ItemId> {
        self.label_to_id.get(label).copied()
    }

    /// All item ids known to the store, ascending.
    pub fn all_items(&self) -> Vec<ItemId> {
        (0..self.id_to_label.len() as ItemId).collect()
    }
}
