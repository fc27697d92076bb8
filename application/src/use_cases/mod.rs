//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assistant_session;
pub mod orchestrator;
pub mod stream_pacer;

#[cfg(test)]
pub(crate) mod test_support;
