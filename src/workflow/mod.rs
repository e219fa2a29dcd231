//! The order-item status workflow as the supplier sees it: which actions a
//! status offers, and what input each action needs.

mod actions;
mod input;

pub use actions::*;
pub use input::*;
