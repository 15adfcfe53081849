//! Swap form session and simulated execution
//!
//! Features:
//! - Form session over the live quote book
//! - Validation into a submittable order
//! - Simulated confirmation with a fixed delay (no settlement)

pub mod builder;
pub mod simulator;
pub mod session;

pub use builder::SwapOrder;
pub use simulator::{SwapReceipt, SwapSimulator};
pub use session::{Side, SwapSession};
