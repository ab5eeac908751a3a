//! behsanj-store
//!
//! Persistence facade for survey records and settings. Every operation talks
//! to the REST backend first and falls back to a local JSON mirror when the
//! network is down; offline mutations are queued in an explicit outbox and
//! replayed once connectivity returns.

pub mod error;
pub mod mirror;
pub mod outbox;
pub mod rest;
pub mod store;

pub use error::StoreError;
pub use mirror::Mirror;
pub use outbox::{Outbox, PendingOp};
pub use rest::RestClient;
pub use store::FeedbackStore;
