//! Contract configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::domain::{ContentHash, Evidence, OnChainPayload, SequencePolicy, FIT_FOR_USE};
use crate::errors::ProvenanceError;

/// Where evidence is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStrategy {
    /// Evidence argument is a hex digest stored as `offChainDataHash`.
    #[default]
    Lightweight,
    /// Evidence argument is the content itself, embedded base64 as
    /// `onChainDataPayload`.
    Naive,
}

impl PayloadStrategy {
    /// Interpret an evidence argument. Empty means no evidence.
    pub fn evidence_from_arg(&self, arg: &str) -> Result<Evidence, ProvenanceError> {
        if arg.is_empty() {
            return Ok(Evidence::None);
        }
        match self {
            PayloadStrategy::Lightweight => Ok(Evidence::OffChain(ContentHash::from_str(arg)?)),
            PayloadStrategy::Naive => Ok(Evidence::OnChain(OnChainPayload::new(arg.as_bytes()))),
        }
    }

    /// Reject evidence of the other strategy's shape. Absent evidence is
    /// always accepted.
    pub fn check_evidence(&self, evidence: &Evidence) -> Result<(), ProvenanceError> {
        match (self, evidence) {
            (_, Evidence::None)
            | (PayloadStrategy::Lightweight, Evidence::OffChain(_))
            | (PayloadStrategy::Naive, Evidence::OnChain(_)) => Ok(()),
            (strategy, _) => Err(ProvenanceError::InvalidArgument(format!(
                "evidence does not match the {:?} payload strategy",
                strategy
            ))),
        }
    }
}

impl FromStr for PayloadStrategy {
    type Err = ProvenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lightweight" => Ok(PayloadStrategy::Lightweight),
            "naive" => Ok(PayloadStrategy::Naive),
            other => Err(ProvenanceError::InvalidArgument(format!(
                "unknown payload strategy {:?}",
                other
            ))),
        }
    }
}

/// Contract behaviour switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub sequence_policy: SequencePolicy,
    pub payload_strategy: PayloadStrategy,
    /// `finalTestResult` value that certifies an asset
    pub fit_for_use_result: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            sequence_policy: SequencePolicy::Permissive,
            payload_strategy: PayloadStrategy::Lightweight,
            fit_for_use_result: FIT_FOR_USE.to_string(),
        }
    }
}

impl ContractConfig {
    /// Overlay environment variables on the defaults.
    ///
    /// - `PC_SEQUENCE_POLICY`: `permissive` or `strict`
    /// - `PC_PAYLOAD_STRATEGY`: `lightweight` or `naive`
    /// - `PC_FIT_FOR_USE_RESULT`
    pub fn from_env() -> Result<Self, ProvenanceError> {
        let mut config = Self::default();
        if let Ok(v) = env::var("PC_SEQUENCE_POLICY") {
            config.sequence_policy = v.parse()?;
        }
        if let Ok(v) = env::var("PC_PAYLOAD_STRATEGY") {
            config.payload_strategy = v.parse()?;
        }
        if let Ok(v) = env::var("PC_FIT_FOR_USE_RESULT") {
            config.fit_for_use_result = v;
        }
        Ok(config)
    }

    pub fn strict() -> Self {
        Self {
            sequence_policy: SequencePolicy::Strict,
            ..Self::default()
        }
    }

    pub fn naive() -> Self {
        Self {
            payload_strategy: PayloadStrategy::Naive,
            ..Self::default()
        }
    }
}
