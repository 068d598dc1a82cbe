/// Session access gate for the free reading tier
///
/// This module provides functionality to:
/// - Hold the reader's session as an explicit shared value
/// - Compute the remaining free-tier budget
/// - Run the once-per-second reading tick process
/// - Report the blocked state and the upsell redirect

pub mod budget;
pub mod enforcement;
pub mod session;
pub mod tracker;

pub use budget::{DAILY_FREE_LIMIT_SECONDS, Remaining};
pub use enforcement::UpsellEnforcer;
pub use session::{SharedSession, UserSession};
pub use tracker::{AccessGate, GateEvent, GateObserver, TickHandle};
