//! System orchestration, startup, and shutdown logic.

pub mod order_desk;
pub mod tracing;

pub use order_desk::*;
pub use self::tracing::*;
