//! # Lifecycle State Machine
//!
//! ```text
//! MATERIAL_CERTIFIED → IN_PRODUCTION → AWAITING_QA → CERTIFIED
//!                                                  ↘ REJECTED
//! ```
//!
//! `MATERIAL_CERTIFIED` and `IN_PRODUCTION` are also reachable by the two
//! create operations, which are guarded by non-existence instead.
//! `MATERIAL_CERTIFIED` is the initial stage and no update re-enters it,
//! whatever the policy.
//!
//! Under [`SequencePolicy::Permissive`] update operations only require the
//! asset to exist. Under [`SequencePolicy::Strict`] they must follow a
//! declared edge.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::entities::LifecycleStage;
use crate::errors::ProvenanceError;

/// `finalTestResult` that certifies an asset.
pub const FIT_FOR_USE: &str = "CERTIFIED_FIT_FOR_USE";

/// Declared lifecycle edges.
pub const DECLARED_TRANSITIONS: [(LifecycleStage, LifecycleStage); 4] = [
    (LifecycleStage::MaterialCertified, LifecycleStage::InProduction),
    (LifecycleStage::InProduction, LifecycleStage::AwaitingQa),
    (LifecycleStage::AwaitingQa, LifecycleStage::Certified),
    (LifecycleStage::AwaitingQa, LifecycleStage::Rejected),
];

/// How strictly update operations follow the declared sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencePolicy {
    /// Existence is the only precondition.
    #[default]
    Permissive,
    /// Only declared edges; terminal stages accept nothing.
    Strict,
}

impl FromStr for SequencePolicy {
    type Err = ProvenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" => Ok(SequencePolicy::Permissive),
            "strict" => Ok(SequencePolicy::Strict),
            other => Err(ProvenanceError::InvalidArgument(format!(
                "unknown sequence policy {:?}",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: LifecycleStage,
    pub to: LifecycleStage,
}

impl Transition {
    pub fn new(from: LifecycleStage, to: LifecycleStage) -> Self {
        Self { from, to }
    }

    pub fn is_declared(&self) -> bool {
        DECLARED_TRANSITIONS.contains(&(self.from, self.to))
    }
}

#[derive(Clone, Debug, Default)]
pub struct LifecycleStateMachine {
    policy: SequencePolicy,
}

impl LifecycleStateMachine {
    pub fn new(policy: SequencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SequencePolicy {
        self.policy
    }

    /// Check an update-type transition of an existing asset.
    pub fn check(&self, transition: Transition) -> Result<(), ProvenanceError> {
        if transition.to == LifecycleStage::MaterialCertified {
            return Err(ProvenanceError::InvalidTransition {
                from: transition.from,
                to: transition.to,
            });
        }
        match self.policy {
            SequencePolicy::Permissive => Ok(()),
            SequencePolicy::Strict if transition.is_declared() => Ok(()),
            SequencePolicy::Strict => Err(ProvenanceError::InvalidTransition {
                from: transition.from,
                to: transition.to,
            }),
        }
    }

    /// Stages reachable from `from` under the declared sequence.
    pub fn successors(from: LifecycleStage) -> impl Iterator<Item = LifecycleStage> {
        DECLARED_TRANSITIONS
            .into_iter()
            .filter(move |(f, _)| *f == from)
            .map(|(_, to)| to)
    }
}
