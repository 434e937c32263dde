//! Application layer (form state, query orchestration, client-side services).
//!
//! Built on domain types and the storage traits from `infra`; nothing here
//! depends on a concrete UI or network client.

pub mod form;
pub mod pinned;
pub mod query;
