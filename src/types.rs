//! Result types shared by the association-rule pipeline (§3 of the design
//! doc): itemsets, frequent itemsets, and association rules.

use crate::transaction::{ItemId, TransactionalStore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered, ascending, duplicate-free set of item ids.
pub type Itemset = Vec<ItemId>;

/// A frequent itemset together with its support in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemset {
    pub items: Itemset,
    pub support: f64,
}

/// Association rule `lhs => rhs`, both disjoint and non-empty, with
/// `confidence = support(lhs ∪ rhs) / support(lhs)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub lhs: Itemset,
    pub rhs: Itemset,
    pub confidence: f64,
    pub support: f64,
}

impl AssociationRule {
    /// Render as `"{lhs items} => {rhs items} (conf=...)"` with ids resolved
    /// to their textual labels.
    pub fn render(&self, store: &TransactionalStore) -> String {
        let lhs = self
            .lhs
            .iter()
            .map(|&id| store.item_label(id))
            .collect::<Vec<_>>()
            .join(", ");
        let rhs = self
            .rhs
            .iter()
            .map(|&id| store.item_label(id))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{lhs}}} => {{{rhs}}} (conf={:.4})", self.confidence)
    }
}

impl fmt::Display for AssociationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} => {:?} (conf={:.4})",
            self.lhs, self.rhs, self.confidence
        )
    }
}
