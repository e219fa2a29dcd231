//! Public clients over the actor system.

mod order_item_client;

pub use order_item_client::*;
