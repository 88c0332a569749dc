//! Summary proxy API.
//!
//! Holds the chat-completion key server-side so interview clients can run
//! in server-mediated mode without ever seeing it. Routes live under `/api/`.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::summary_api_router;
pub use server::{start_summary_server, SummaryServer};
pub use types::ApiContext;
