//! Style resolution engine.

mod cascade;
mod engine;

pub use cascade::{CascadeKey, CascadeOrigin};
pub use engine::StyleEngine;
