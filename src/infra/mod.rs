//! Infrastructure adapters for stores and notification channels.

pub mod notify;
pub mod store;

pub use notify::{LogNotifier, RecordingNotifier};
pub use store::{InMemoryStore, PostgresStore};
