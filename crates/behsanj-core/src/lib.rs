//! behsanj-core
//!
//! Pure domain types for the hospital satisfaction-survey system, plus the
//! Persian calendar utilities everything else leans on. No network
//! dependency — this is the shared vocabulary of the Behsanj system.

pub mod error;
pub mod jalali;
pub mod models;
pub mod session;
