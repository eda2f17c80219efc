//! Shared algorithm lifecycle state machine.
//!
//! Both `AssociationRuleMiner` and `DcVerification` move through the same
//! states: `Created -> OptionsRegistered -> Loaded -> Executed`, with
//! `reset()` returning to `Loaded`. A config struct is required at
//! construction in this crate, so `Created` and `OptionsRegistered` collapse
//! into one observable state (`new()` always returns `OptionsRegistered`).

use crate::errors::{MiningError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmState {
    OptionsRegistered,
    Loaded,
    Executed,
}

impl AlgorithmState {
    pub fn require(self, expected: AlgorithmState, call: &str) -> Result<()> {
        if self == expected {
            Ok(())
        } else {
            Err(MiningError::StateError(format!(
                "{call} requires state {expected:?}, instance is in {self:?}"
            )))
        }
    }
}
