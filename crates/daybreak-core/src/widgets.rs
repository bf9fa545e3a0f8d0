//! Wire types for the upstream agent's tool endpoints.
//!
//! Every tool endpoint wraps its payload in `{ tool, data, timestamp }`; the
//! dashboard treats the payloads as opaque snapshots and only checks
//! presence/absence. Field names mirror the upstream API exactly.

use serde::{Deserialize, Serialize};

/// `GET /tools/weather` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherData {
    pub tool: String,
    pub data: WeatherReport,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub current_temp: f64,
    pub condition: String,
    pub temp_hi: f64,
    pub temp_lo: f64,
    /// Chance of precipitation, percent.
    pub precip_chance: u8,
    pub summary: String,
}

/// `POST /tools/financial` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialData {
    pub tool: String,
    pub data: MarketSummary,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub summary: String,
    pub total_items: u32,
    /// "up" | "down" | "mixed" as reported upstream.
    pub market_status: String,
    pub data: Vec<InstrumentQuote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
    /// "stocks" | "crypto".
    pub data_type: String,
}

/// `GET /tools/calendar` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarData {
    pub tool: String,
    pub data: CalendarDay,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub events: Vec<CalendarEvent>,
    pub total_events: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub time: String,
    pub color: String,
}

/// `GET /tools/todos` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoData {
    pub tool: String,
    pub data: TodoList,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoList {
    pub items: Vec<TodoItem>,
    pub total_pending: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: String,
}

/// Which way the commute widget is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommuteDirection {
    ToWork,
    FromWork,
}

impl CommuteDirection {
    /// Query-parameter value the upstream API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToWork => "to_work",
            Self::FromWork => "from_work",
        }
    }

    /// Shuttle (origin, destination) stop ids for this direction.
    pub fn shuttle_route(&self) -> (&'static str, &'static str) {
        match self {
            Self::ToWork => ("mountain_view_caltrain", "linkedin_transit_center"),
            Self::FromWork => ("linkedin_transit_center", "mountain_view_caltrain"),
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::ToWork => Self::FromWork,
            Self::FromWork => Self::ToWork,
        }
    }
}

/// `GET /tools/commute` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuteOptionsData {
    pub tool: String,
    pub data: CommuteOptions,
    pub timestamp: String,
}

/// Driving and transit are both optional: the upstream agent may return either
/// or both depending on what it could compute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommuteOptions {
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub driving: Option<DrivingOption>,
    #[serde(default)]
    pub transit: Option<TransitOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrivingOption {
    pub duration_minutes: u32,
    pub distance_miles: f64,
    pub estimated_fuel_gallons: f64,
    pub route_summary: String,
    pub traffic_status: String,
    pub departure_time: String,
    pub arrival_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitOption {
    pub total_duration_minutes: u32,
    pub caltrain_duration_minutes: u32,
    pub shuttle_duration_minutes: u32,
    pub walking_duration_minutes: u32,
    pub transfer_time_minutes: u32,
    #[serde(default)]
    pub next_departures: Vec<TrainDeparture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainDeparture {
    pub train_number: String,
    pub departure_time: String,
    pub arrival_time: String,
    #[serde(default)]
    pub delay_minutes: u32,
}

/// `GET /tools/shuttle` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuttleScheduleData {
    pub tool: String,
    pub data: ShuttleSchedule,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuttleSchedule {
    pub duration_minutes: u32,
    pub frequency_minutes: u32,
    pub service_hours: String,
    #[serde(default)]
    pub next_departures: Vec<ShuttleDeparture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuttleDeparture {
    pub departure_time: String,
}

/// `GET /briefing` response (no tool envelope upstream).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefingData {
    pub briefing: String,
    pub timestamp: String,
}

/// Successful reply from the upstream `POST /chat` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub session_id: String,
    pub new_session: bool,
    pub timestamp: String,
}
