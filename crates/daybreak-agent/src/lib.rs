//! daybreak-agent: typed client for the upstream AI agent API.
//!
//! The client is constructed explicitly (base URL + mode) and passed to
//! whatever owns the flow; there is no global instance. Mock mode serves the
//! fixture payloads without touching the network, and the `get_*` wrappers
//! fall back to the same fixtures when a live data fetch fails. Chat is the
//! exception: its failures surface to the caller so the transcript can show
//! an error turn.

mod client;
mod error;
mod fixtures;
mod preload;

pub use client::{AgentClient, AgentMode, DEFAULT_LOCATION, DEFAULT_SYMBOLS};
pub use error::{AgentError, AgentResult};
pub use fixtures::{
    mock_briefing, mock_calendar, mock_commute_options, mock_financial, mock_shuttle_schedule,
    mock_todos, mock_weather,
};
pub use preload::{preload_dashboard, DashboardPreload, Preloaded};
