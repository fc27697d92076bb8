//! Core domain concepts shared across all subdomains.
//!
//! - [`backend::BackendId`]: the closed set of LLM backends (Claude, GPT, Gemini)
//! - [`error::DomainError`]: domain-level errors

pub mod backend;
pub mod error;
