//! Questions about the triage application.
//!
//! Each question combines the engine's probes. All of them degrade to a
//! fallback answer rather than failing.

mod dashboard;
mod patient;

pub use dashboard::TheDashboard;
pub use patient::ThePatient;
