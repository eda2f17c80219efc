//! Frequent-itemset mining via FP-Growth (C2, alternate backend selectable
//! through [`crate::mining::MiningAlgorithm::FpGrowth`]). Adapted from the
//! teacher's `mining/fpgrowth.rs`, reworked over dense `ItemId`s.

use crate::errors::{MiningError, Result};
use crate::transaction::{ItemId, TransactionalStore};
use crate::types::{FrequentItemset, Itemset};
use std::collections::HashMap;

pub fn find_frequent_itemsets(
    store: &TransactionalStore,
    min_support: f64,
) -> Result<Vec<FrequentItemset>> {
    if !(min_support > 0.0 && min_support <= 1.0) {
        return Err(MiningError::InvalidThreshold(format!(
            "min_support must be in (0, 1], got {min_support}"
        )));
    }

    let total = store.num_transactions() as f64;
    let min_support_count = (min_support * total).ceil() as usize;

    let mut item_counts: HashMap<ItemId, usize> = HashMap::new();
    for tx in store.transactions() {
        for &item in &tx.items {
            *item_counts.entry(item).or_insert(0) += 1;
        }
    }

    let mut frequent_items: Vec<(ItemId, usize)> = item_counts
        .into_iter()
        .filter(|(_, count)| *count >= min_support_count)
        .collect();
    frequent_items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let freq_order: HashMap<ItemId, usize> = frequent_items
        .iter()
        .enumerate()
        .map(|(idx, (item, _))| (*item, idx))
        .collect();

    let mut fp_tree = FpTree::new();
    for tx in store.transactions() {
        let mut ordered_items: Vec<ItemId> = tx
            .items
            .iter()
            .copied()
            .filter(|item| freq_order.contains_key(item))
            .collect();
        ordered_items.sort_by_key(|item| freq_order[item]);
        if !ordered_items.is_empty() {
            fp_tree.insert_transaction(&ordered_items);
        }
    }

    let mut frequent_itemsets = Vec::new();
    for &(item, count) in &frequent_items {
        frequent_itemsets.push(FrequentItemset {
            items: vec![item],
            support: count as f64 / total,
        });
    }

    for &(item, _) in frequent_items.iter().rev() {
        let conditional_patterns = fp_tree.conditional_pattern_base(item);
        if conditional_patterns.is_empty() {
            continue;
        }

        let mut cond_tree = FpTree::new();
        for (pattern, count) in &conditional_patterns {
            for _ in 0..*count {
                cond_tree.insert_transaction(pattern);
            }
        }

        let cond_patterns = mine_conditional_tree(&cond_tree, vec![item], min_support_count);
        for (itemset, count) in cond_patterns {
            frequent_itemsets.push(FrequentItemset {
                items: itemset,
                support: count as f64 / total,
            });
        }
    }

    log::debug!("fp-growth: {} frequent itemsets", frequent_itemsets.len());
    Ok(frequent_itemsets)
}

fn mine_conditional_tree(
    tree: &FpTree,
    base_pattern: Itemset,
    min_support_count: usize,
) -> Vec<(Itemset, usize)> {
    let mut patterns = Vec::new();

    let mut frequent_items: Vec<(ItemId, usize)> = tree
        .item_counts()
        .into_iter()
        .filter(|(_, count)| *count >= min_support_count)
        .collect();
    frequent_items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    for (item, count) in &frequent_items {
        let mut new_pattern = base_pattern.clone();
        new_pattern.push(*item);
        new_pattern.sort_unstable();

        patterns.push((new_pattern.clone(), *count));

        let cond_patterns = tree.conditional_pattern_base(*item);
        if !cond_patterns.is_empty() {
            let mut cond_tree = FpTree::new();
            for (pattern, pattern_count) in &cond_patterns {
                for _ in 0..*pattern_count {
                    cond_tree.insert_transaction(pattern);
                }
            }
            let nested = mine_conditional_tree(&cond_tree, new_pattern, min_support_count);
            patterns.extend(nested);
        }
    }

    patterns
}

#[derive(Debug, Clone)]
struct FpNode {
    item: Option<ItemId>,
    count: usize,
    children: HashMap<ItemId, FpNode>,
}

impl FpNode {
    fn new(item: Option<ItemId>) -> Self {
        Self {
            item,
            count: 0,
            children: HashMap::new(),
        }
    }
}

#[derive(Debug)]
struct FpTree {
    root: FpNode,
}

impl FpTree {
    fn new() -> Self {
        Self {
            root: FpNode::new(None),
        }
    }

    fn insert_transaction(&mut self, items: &[ItemId]) {
        let mut current = &mut self.root;
        for &item in items {
            let node = current.children.entry(item).or_insert_with(|| FpNode::new(Some(item)));
            node.count += 1;
            current = current.children.get_mut(&item).unwrap();
        }
    }

    /// Returns `(prefix_path, count)` pairs for every path ending in `item`.
    fn conditional_pattern_base(&self, item: ItemId) -> Vec<(Itemset, usize)> {
        let mut patterns = Vec::new();
        let mut current_path = Vec::new();
        Self::collect_paths_for_item(&self.root, item, &mut current_path, &mut patterns);
        patterns
    }

    fn collect_paths_for_item(
        node: &FpNode,
        target_item: ItemId,
        current_path: &mut Itemset,
        patterns: &mut Vec<(Itemset, usize)>,
    ) {
        if let Some(child) = node.children.get(&target_item) {
            if !current_path.is_empty() {
                patterns.push((current_path.clone(), child.count));
            }
        }
        for (&item, child) in &node.children {
            current_path.push(item);
            Self::collect_paths_for_item(child, target_item, current_path, patterns);
            current_path.pop();
        }
    }

    fn item_counts(&self) -> HashMap<ItemId, usize> {
        let mut counts = HashMap::new();
        Self::count_items_recursive(&self.root, &mut counts);
        counts
    }

    fn count_items_recursive(node: &FpNode, counts: &mut HashMap<ItemId, usize>) {
        if let Some(item) = node.item {
            *counts.entry(item).or_insert(0) += node.count;
        }
        for child in node.children.values() {
            Self::count_items_recursive(child, counts);
        }
    }
}
