//! # tablecheck-rules
//!
//! Association-rule mining and denial-constraint verification over
//! in-memory relations.
//!
//! ## Quick start: association rules
//!
//! ```rust
//! use tablecheck_rules::mining::{AssociationRuleMiner, MiningConfig};
//! use tablecheck_rules::transaction::InputFormat;
//!
//! let transactions = vec![
//!     vec!["Laptop".to_string(), "Mouse".to_string()],
//!     vec!["Laptop".to_string(), "Mouse".to_string()],
//!     vec!["Laptop".to_string(), "Keyboard".to_string()],
//! ];
//!
//! let mut miner = AssociationRuleMiner::new(MiningConfig {
//!     min_support: 0.5,
//!     min_confidence: 0.9,
//!     ..MiningConfig::default()
//! });
//! miner.load_data(transactions, InputFormat::Tabular).unwrap();
//! miner.execute(&|| false).unwrap();
//! for rule in miner.rules() {
//!     println!("{}", rule.render(miner.store().unwrap()));
//! }
//! ```
//!
//! ## Quick start: denial constraints
//!
//! ```rust
//! use tablecheck_rules::column::ColumnType;
//! use tablecheck_rules::dc::{DcConfig, DcVerification};
//!
//! let rows = vec![
//!     vec!["1".to_string(), "a".to_string()],
//!     vec!["2".to_string(), "b".to_string()],
//! ];
//! let schema = vec![
//!     ("Id".to_string(), ColumnType::Int),
//!     ("Name".to_string(), ColumnType::Str),
//! ];
//!
//! let mut verifier = DcVerification::new(DcConfig {
//!     denial_constraint: "!(t.Id == s.Id)".to_string(),
//! });
//! verifier.load_data(rows, schema).unwrap();
//! verifier.execute(&|| false).unwrap();
//! assert_eq!(verifier.dc_holds(), Some(true));
//! ```

pub mod column;
pub mod errors;
pub mod lifecycle;
pub mod transaction;
pub mod types;

pub mod mining;

pub mod dc;

pub use errors::{MiningError, Result};
pub use mining::{AssociationRuleMiner, MiningAlgorithm, MiningConfig};
pub use transaction::{InputFormat, TransactionalStore};
pub use types::{AssociationRule, FrequentItemset, Itemset};
