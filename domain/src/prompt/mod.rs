//! Prompt domain
//!
//! Persona definitions and the built-in instruction texts.

mod persona;

pub use persona::{Persona, PersonaTemplate};
