pub mod entities;
pub mod event_store;
pub mod keys;
pub mod lifecycle;
pub mod registry;
pub mod value_objects;

pub use entities::{Asset, EventDetails, HistoryResult, LifecycleStage, ProvenanceEvent};
pub use event_store::EventStore;
pub use keys::{asset_key, event_key};
pub use lifecycle::{LifecycleStateMachine, SequencePolicy, Transition, FIT_FOR_USE};
pub use registry::AssetRegistry;
pub use value_objects::{ContentHash, Evidence, OnChainPayload};
