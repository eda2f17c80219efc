//! The denial-constraint pipeline: C4 ([`crate::column`]) feeds C5
//! ([`model`]/[`parser`]) feeds C6 ([`verifier`]), orchestrated by
//! [`DcVerification`]'s lifecycle — the same `Loaded -> Executed` shape as
//! [`crate::mining::AssociationRuleMiner`], grounded on
//! `algos::DCVerification` in
//! `examples/original_source/src/core/algorithms/dc/dc_verification.{h,cpp}`.

pub mod model;
pub mod parser;
pub mod verifier;

use crate::column::{ColumnType, TypedRelation};
use crate::errors::Result;
use crate::lifecycle::AlgorithmState;
use model::DenialConstraint;
use serde::{Deserialize, Serialize};

/// Typed option set for the denial-constraint verifier (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcConfig {
    /// The constraint string, e.g. `"!(t.Col0 == s.Col0 and t.Col1 == s.Col1)"`.
    pub denial_constraint: String,
}

/// Lifecycle-driven denial-constraint verifier: `load_data -> execute`.
pub struct DcVerification {
    config: DcConfig,
    state: AlgorithmState,
    schema: Vec<(String, ColumnType)>,
    relation: Option<TypedRelation>,
    dc: Option<DenialConstraint>,
    holds: Option<bool>,
}

impl DcVerification {
    pub fn new(config: DcConfig) -> Self {
        Self {
            config,
            state: AlgorithmState::OptionsRegistered,
            schema: Vec::new(),
            relation: None,
            dc: None,
            holds: None,
        }
    }

    /// Load the relation to be checked, from pre-tokenized rows and an
    /// explicit schema (tabular ingestion is out of scope for this crate).
    pub fn load_data<R, T>(&mut self, rows: R, schema: Vec<(String, ColumnType)>) -> Result<()>
    where
        R: IntoIterator<Item = T>,
        T: IntoIterator<Item = String>,
    {
        let relation = TypedRelation::from_rows(rows, &schema)?;
        log::debug!(
            "dc verification: loaded {} rows, {} columns",
            relation.num_rows(),
            relation.num_columns()
        );
        self.schema = schema;
        self.relation = Some(relation);
        self.state = AlgorithmState::Loaded;
        Ok(())
    }

    /// Parse the configured denial constraint and verify it against the
    /// loaded relation. `should_stop` is polled once per row by the
    /// verifier; on a cooperative stop, no verdict is committed and the
    /// instance stays in the `Loaded` state. Returns the elapsed
    /// wall-clock time in milliseconds; the verdict is read back with
    /// [`DcVerification::dc_holds`].
    pub fn execute(&mut self, should_stop: &dyn Fn() -> bool) -> Result<u64> {
        self.state.require(AlgorithmState::Loaded, "execute")?;
        let relation = self
            .relation
            .as_ref()
            .expect("Loaded state implies a relation is present");
        if relation.num_rows() == 0 {
            return Err(crate::errors::MiningError::EmptyInput(
                "relation has no rows".to_string(),
            ));
        }
        let start = std::time::Instant::now();

        let dc = parser::parse(&self.config.denial_constraint, &self.schema)?;
        let holds = verifier::verify(&dc, relation, should_stop)?;
        log::debug!("dc verification: holds={holds}");

        self.dc = Some(dc);
        self.holds = Some(holds);
        self.state = AlgorithmState::Executed;

        Ok(start.elapsed().as_millis() as u64)
    }

    /// The verification verdict. Only meaningful after [`execute`].
    ///
    /// [`execute`]: DcVerification::execute
    pub fn dc_holds(&self) -> Option<bool> {
        self.holds
    }

    pub fn relation(&self) -> Option<&TypedRelation> {
        self.relation.as_ref()
    }

    /// Return to the `Loaded` state, so the same relation can be checked
    /// against a different constraint.
    pub fn reset(&mut self) -> Result<()> {
        self.state.require(AlgorithmState::Executed, "reset")?;
        self.dc = None;
        self.holds = None;
        self.state = AlgorithmState::Loaded;
        Ok(())
    }

    pub fn set_denial_constraint(&mut self, denial_constraint: String) {
        self.config.denial_constraint = denial_constraint;
    }
}
