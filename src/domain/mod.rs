pub mod order_item;
pub mod query;
pub mod requests;

pub use order_item::*;
pub use query::*;
pub use requests::*;
