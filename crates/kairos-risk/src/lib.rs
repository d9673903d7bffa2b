//! # kairos-risk
//!
//! Session risk tracking. Levels are derived on demand from the append-only
//! event log held by an [`IRiskEventStore`](kairos_core::traits::IRiskEventStore):
//! each event decays one level per decay window, the current level is the
//! maximum over decayed events, and CRITICAL holds until an explicit lower
//! assessment releases it to decay from there.

pub mod decay;
mod machine;
mod memory_store;

pub use machine::RiskStateMachine;
pub use memory_store::InMemoryRiskStore;
