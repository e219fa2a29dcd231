//! Order-item bindings for the view actor.

pub mod entity;
pub mod error;

pub use error::*;
