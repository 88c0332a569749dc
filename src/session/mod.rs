//! Interview session: the synchronous state machine and the async handle
//! that runs summary generation for it.

pub mod handle;
pub mod machine;
pub mod types;

pub use handle::SessionHandle;
pub use machine::AssessmentSession;
pub use types::*;
