//! Change notifications: what observers are told after the store changes.
//!
//! Notifications are signals, not payloads. An observer that receives one
//! re-reads whatever it was showing.

pub mod bus;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{ChangeBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryChangeBus};
pub use notification::ChangeNotification;
