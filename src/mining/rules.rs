//! The rule lattice (C3): level-wise RHS expansion over a per-frequent-itemset
//! arena of rule nodes.
//!
//! Grounded directly on `ARAlgorithm::GenerateRulesFrom` /
//! `GenerateRuleLevel` / `MergeRules` in
//! `examples/original_source/src/algorithms/ARAlgorithm.cpp` — the teacher
//! crate has no counterpart (its `mining/mod.rs` instead brute-forces every
//! `2^n` subset of the itemset, which this replaces).

use crate::errors::{MiningError, Result};
use crate::transaction::{ItemId, TransactionalStore};
use crate::types::{AssociationRule, FrequentItemset, Itemset};

/// A node in the per-itemset rule tree. The root (index 0) is a sentinel
/// carrying no rule of its own; its children are the level-1 rules.
struct RuleNode {
    rule: AssociationRule,
    children: Vec<usize>,
}

/// Region-owned arena for one frequent itemset's rule tree. Dropped at the
/// end of [`generate_rules`]; nothing here outlives one call.
struct RuleArena {
    nodes: Vec<RuleNode>,
}

impl RuleArena {
    fn new() -> Self {
        let sentinel = RuleNode {
            rule: AssociationRule {
                lhs: Vec::new(),
                rhs: Vec::new(),
                confidence: 0.0,
                support: 0.0,
            },
            children: Vec::new(),
        };
        Self {
            nodes: vec![sentinel],
        }
    }

    const ROOT: usize = 0;

    fn push_child(&mut self, parent: usize, rule: AssociationRule) -> usize {
        let id = self.nodes.len();
        self.nodes.push(RuleNode {
            rule,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }
}

/// Sorted set difference: `whole \ remove`, both ascending and duplicate-free.
fn set_difference(whole: &[ItemId], remove: &[ItemId]) -> Itemset {
    let mut result = Vec::with_capacity(whole.len().saturating_sub(remove.len()));
    let mut r = remove.iter().peekable();
    for &item in whole {
        while let Some(&&next) = r.peek() {
            if next < item {
                r.next();
            } else {
                break;
            }
        }
        if r.peek() == Some(&&item) {
            r.next();
        } else {
            result.push(item);
        }
    }
    result
}

/// Produce every association rule `lhs => rhs` with `lhs ∪ rhs = itemset`,
/// `lhs, rhs` disjoint and non-empty, and confidence `>= min_confidence`.
/// Appends each emitted rule to `out` (insertion order, not otherwise
/// meaningful to callers).
///
/// Fails with [`MiningError::InvalidThreshold`] if `min_confidence` is
/// outside `(0.0, 1.0]`.
pub fn generate_rules(
    store: &TransactionalStore,
    itemset: &FrequentItemset,
    min_confidence: f64,
    out: &mut Vec<AssociationRule>,
) -> Result<()> {
    if !(min_confidence > 0.0 && min_confidence <= 1.0) {
        return Err(MiningError::InvalidThreshold(format!(
            "min_confidence must be in (0, 1], got {min_confidence}"
        )));
    }

    if itemset.items.len() < 2 {
        return Ok(());
    }

    let mut arena = RuleArena::new();

    for &x in &itemset.items {
        let rhs = vec![x];
        let lhs = set_difference(&itemset.items, &rhs);
        let lhs_support = store.support(&lhs);
        let confidence = itemset.support / lhs_support;
        if confidence >= min_confidence {
            let rule = AssociationRule {
                lhs,
                rhs,
                confidence,
                support: itemset.support,
            };
            out.push(rule.clone());
            arena.push_child(RuleArena::ROOT, rule);
        }
    }

    if arena.nodes[RuleArena::ROOT].children.is_empty() {
        return Ok(());
    }

    let mut level_number = 2usize;
    while generate_rule_level(&mut arena, itemset, store, min_confidence, level_number, out) {
        level_number += 1;
    }

    Ok(())
}

/// One full depth-first pass over `arena`: at every node whose rule's RHS has
/// size `level_number - 2`, merge its children pairwise. Returns whether any
/// rule was installed this pass.
fn generate_rule_level(
    arena: &mut RuleArena,
    itemset: &FrequentItemset,
    store: &TransactionalStore,
    min_confidence: f64,
    level_number: usize,
    out: &mut Vec<AssociationRule>,
) -> bool {
    let mut generated_any = false;
    let mut stack = vec![RuleArena::ROOT];

    while let Some(node_id) = stack.pop() {
        if arena.nodes[node_id].rule.rhs.len() == level_number - 2 {
            if merge_rules(arena, itemset, store, min_confidence, node_id, out) {
                generated_any = true;
            }
        } else {
            // Push leftmost child last so it is popped (visited) first.
            let children = arena.nodes[node_id].children.clone();
            for &child in children.iter().rev() {
                stack.push(child);
            }
        }
    }

    generated_any
}

/// Merge every ordered pair `(a, b)` of `node`'s immediate children
/// (`a` before `b` in sibling order), installing a new rule as a child of
/// `a` when its confidence clears the threshold.
fn merge_rules(
    arena: &mut RuleArena,
    itemset: &FrequentItemset,
    store: &TransactionalStore,
    min_confidence: f64,
    node_id: usize,
    out: &mut Vec<AssociationRule>,
) -> bool {
    let children = arena.nodes[node_id].children.clone();
    let mut produced = false;

    if children.len() < 2 {
        return false;
    }

    for i in 0..children.len() - 1 {
        for j in (i + 1)..children.len() {
            let a_id = children[i];
            let b_id = children[j];

            let mut rhs = arena.nodes[a_id].rule.rhs.clone();
            let b_last = *arena.nodes[b_id].rule.rhs.last().expect("rhs non-empty");
            rhs.push(b_last);

            if rhs.len() == itemset.items.len() {
                // lhs would be empty.
                continue;
            }

            let lhs = set_difference(&itemset.items, &rhs);
            let lhs_support = store.support(&lhs);
            let confidence = itemset.support / lhs_support;

            if confidence >= min_confidence {
                let rule = AssociationRule {
                    lhs,
                    rhs,
                    confidence,
                    support: itemset.support,
                };
                out.push(rule.clone());
                arena.push_child(a_id, rule);
                produced = true;
            }
        }
    }

    produced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::InputFormat;

    fn store_from(rows: &[&[&str]]) -> TransactionalStore {
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        TransactionalStore::from_rows(rows, InputFormat::Tabular).unwrap()
    }

    #[test]
    fn test_set_difference() {
        assert_eq!(set_difference(&[1, 2, 3], &[2]), vec![1, 3]);
        assert_eq!(set_difference(&[1, 2, 3], &[1, 2, 3]), Vec::<ItemId>::new());
        assert_eq!(set_difference(&[1, 2, 3], &[]), vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_threshold() {
        let store = store_from(&[&["1", "2"], &["1", "2"]]);
        let itemset = FrequentItemset {
            items: vec![0, 1],
            support: 1.0,
        };
        let mut out = Vec::new();
        assert!(matches!(
            generate_rules(&store, &itemset, 0.0, &mut out),
            Err(MiningError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_seed_scenario_trivial_ar() {
        // Transactions [{1,2},{1,2},{1,3}], minsup=0.5, minconf=0.9.
        // Frequent {1,2} with support ~0.67. Expected rules: exactly {2}=>{1}.
        let store = store_from(&[&["1", "2"], &["1", "2"], &["1", "3"]]);
        let i1 = store.item_id("1").unwrap();
        let i2 = store.item_id("2").unwrap();
        let mut items = vec![i1, i2];
        items.sort();
        let itemset = FrequentItemset {
            items,
            support: 2.0 / 3.0,
        };

        let mut out = Vec::new();
        generate_rules(&store, &itemset, 0.9, &mut out).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].rhs, vec![i1]);
        assert_eq!(out[0].lhs, vec![i2]);
        assert!((out[0].confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rule_uniqueness_and_soundness_on_4_itemset() {
        // A 4-item frequent set over a dense dataset so all 2-splits qualify.
        let store = store_from(&[
            &["A", "B", "C", "D"],
            &["A", "B", "C", "D"],
            &["A", "B", "C", "D"],
            &["A", "B", "C"],
        ]);
        let ids: Vec<ItemId> = ["A", "B", "C", "D"]
            .iter()
            .map(|l| store.item_id(l).unwrap())
            .collect();
        let mut items = ids.clone();
        items.sort();
        let support = store.support(&items);
        let itemset = FrequentItemset { items, support };

        let mut out = Vec::new();
        generate_rules(&store, &itemset, 0.5, &mut out).unwrap();

        // Uniqueness: no two rules share (lhs, rhs).
        let mut seen = std::collections::HashSet::new();
        for rule in &out {
            assert!(seen.insert((rule.lhs.clone(), rule.rhs.clone())));
        }

        // Soundness.
        for rule in &out {
            let mut union: Itemset = rule.lhs.iter().chain(rule.rhs.iter()).copied().collect();
            union.sort_unstable();
            assert_eq!(union, itemset.items);
            assert!(!rule.lhs.is_empty());
            assert!(!rule.rhs.is_empty());
            let lhs_support = store.support(&rule.lhs);
            let expected_conf = itemset.support / lhs_support;
            assert!((expected_conf - rule.confidence).abs() < 1e-9);
            assert!(rule.confidence >= 0.5);
        }

        // Completeness: brute-force every non-trivial LHS/RHS split of the
        // 4-item set (2^4 - 2 candidate LHS masks) and check the rule set
        // produced by the lattice matches exactly.
        let n = itemset.items.len();
        let mut expected: std::collections::HashSet<(Itemset, Itemset)> =
            std::collections::HashSet::new();
        for mask in 1..(1u32 << n) - 1 {
            let lhs: Itemset = (0..n)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(|bit| itemset.items[bit])
                .collect();
            let rhs: Itemset = (0..n)
                .filter(|bit| mask & (1 << bit) == 0)
                .map(|bit| itemset.items[bit])
                .collect();
            let lhs_support = store.support(&lhs);
            let confidence = itemset.support / lhs_support;
            if confidence >= 0.5 {
                expected.insert((lhs, rhs));
            }
        }

        let actual: std::collections::HashSet<(Itemset, Itemset)> = out
            .iter()
            .map(|r| (r.lhs.clone(), r.rhs.clone()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_singleton_itemset_yields_no_rules() {
        let store = store_from(&[&["1"], &["1"]]);
        let itemset = FrequentItemset {
            items: vec![0],
            support: 1.0,
        };
        let mut out = Vec::new();
        generate_rules(&store, &itemset, 0.5, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
