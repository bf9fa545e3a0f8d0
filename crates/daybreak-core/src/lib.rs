//! daybreak-core: shared library for the morning dashboard.
//!
//! Holds the widget snapshot types (the upstream agent's wire format), the
//! conversation session machine that backs the chat panel, the slash-command
//! table, and gateway configuration. The gateway binary and the agent client
//! both build on this crate so the wire types exist exactly once.

mod commands;
mod config;
mod conversation;
mod widgets;

pub use commands::{dispatch, help_text, CommandAction, Dispatch, SlashCommand, SLASH_COMMANDS};
pub use config::{env_bool, CoreConfig};
pub use conversation::{
    ChatSession, ConversationTurn, OutgoingChat, Role, Submission, CHAT_ERROR_NOTICE,
    SESSION_CLEARED_NOTICE,
};
pub use widgets::{
    BriefingData, CalendarData, CalendarDay, CalendarEvent, ChatReply, CommuteDirection,
    CommuteOptions, CommuteOptionsData, DrivingOption, FinancialData, InstrumentQuote,
    MarketSummary, ShuttleDeparture, ShuttleSchedule, ShuttleScheduleData, TodoData, TodoItem,
    TodoList, TrainDeparture, TransitOption, WeatherData, WeatherReport,
};
