//! behsanj-form
//!
//! The 5-step survey wizard: step navigation with validation-driven
//! back-jumps, the staff smart-draft flow, national-id autofill, audio take
//! bookkeeping, and the ambient recording session. Pure state machine; the
//! embedding UI owns rendering and audio capture.

pub mod recording;
pub mod wizard;

pub use recording::RecordingSession;
pub use wizard::{DraftChoice, Field, SaveIntent, SurveyWizard, ValidationFailed};
