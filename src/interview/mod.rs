//! Voice-driven interview: speak each question, listen for the caregiver's
//! answer, record it, then narrate the summary.

pub mod conductor;
pub mod console;
pub mod scripted;
pub mod voice;

pub use conductor::*;
pub use console::ConsoleVoice;
pub use scripted::ScriptedVoice;
pub use voice::*;
