//! Family portrait generator
//!
//! Merges several photos of people into one composited family portrait by
//! sending them, together with a text or image background, to Gemini's image
//! generation model.

pub mod ai;
pub mod app;
pub mod encoder;
pub mod error;
pub mod models;
pub mod preview;
pub mod prompts;
pub mod session;

pub use error::{Error, Result};
