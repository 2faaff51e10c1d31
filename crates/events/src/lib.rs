//! WishDrop event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope, with constructors for
//!   every event the platform emits.
//! - [`event_types`]: the event names.

pub mod bus;
pub mod event_types;

pub use bus::{EventBus, PlatformEvent};
