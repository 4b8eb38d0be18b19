//! Schema translation between the canonical (OpenAI) shape and each backend.
//!
//! All translation functions are pure (no I/O); the wall-clock time needed
//! for Anthropic responses is passed in by the caller.

pub mod anthropic_types;
pub mod openai_types;
pub mod request;
pub mod response;
