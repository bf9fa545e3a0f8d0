//! Typed client for the upstream agent API.
//!
//! `fetch_*` methods hit the wire and return `AgentResult`; `get_*` wrappers
//! substitute the matching fixture when a data fetch fails, so the view layer
//! never observes a transport error directly. Chat deliberately has no
//! fixture fallback in live mode: a failed send must surface as an error turn
//! in the transcript, not as fabricated assistant text.

use crate::error::{AgentError, AgentResult};
use crate::fixtures;
use daybreak_core::{
    BriefingData, CalendarData, ChatReply, CommuteDirection, CommuteOptionsData, CoreConfig,
    FinancialData, OutgoingChat, ShuttleScheduleData, TodoData, WeatherData,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

const ENV_AGENT_URL: &str = "DAYBREAK_AGENT_URL";
const ENV_AGENT_MODE: &str = "DAYBREAK_AGENT_MODE";
const DEFAULT_AGENT_URL: &str = "http://localhost:8001";

/// Default dashboard inputs when the caller has no preference.
pub const DEFAULT_LOCATION: &str = "San Francisco";
pub const DEFAULT_SYMBOLS: &[&str] = &["MSFT", "BTC", "ETH", "NVDA"];

/// Mode for upstream calls: live HTTP, or fixtures only (no network).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AgentMode {
    Mock,
    #[default]
    Live,
}

impl AgentMode {
    fn from_env() -> Self {
        match std::env::var(ENV_AGENT_MODE).as_deref() {
            Ok("mock") => AgentMode::Mock,
            _ => AgentMode::Live,
        }
    }

    /// Parse a config label ("mock"/"live"). Anything unrecognized is live.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("mock") {
            AgentMode::Mock
        } else {
            AgentMode::Live
        }
    }
}

/// Client for the upstream agent API. Construct one and pass it to whatever
/// owns the flow; configuration comes in here, not from hidden globals.
pub struct AgentClient {
    base_url: String,
    mode: AgentMode,
    client: reqwest::Client,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>, mode: AgentMode) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            mode,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            config.agent_base_url.clone(),
            AgentMode::from_label(&config.agent_mode),
        )
    }

    /// Base URL from `DAYBREAK_AGENT_URL` (localhost default), mode from
    /// `DAYBREAK_AGENT_MODE`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(ENV_AGENT_URL).unwrap_or_else(|_| DEFAULT_AGENT_URL.to_string());
        Self::new(base_url, AgentMode::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> AgentResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Status { status, body });
        }
        Ok(response.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AgentResult<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AgentResult<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    // ------------------------------------------------------------------
    // Raw fetchers: one upstream attempt, no fallback, no retry.
    // ------------------------------------------------------------------

    pub async fn fetch_weather(&self, location: &str) -> AgentResult<WeatherData> {
        if self.mode == AgentMode::Mock {
            return Ok(fixtures::mock_weather());
        }
        self.get_json("/tools/weather", &[("location", location), ("when", "today")])
            .await
    }

    pub async fn fetch_financial(&self, symbols: &[&str]) -> AgentResult<FinancialData> {
        if self.mode == AgentMode::Mock {
            return Ok(fixtures::mock_financial());
        }
        self.post_json(
            "/tools/financial",
            &serde_json::json!({ "symbols": symbols, "data_type": "mixed" }),
        )
        .await
    }

    pub async fn fetch_calendar(&self, date: Option<&str>) -> AgentResult<CalendarData> {
        if self.mode == AgentMode::Mock {
            return Ok(fixtures::mock_calendar());
        }
        let query: Vec<(&str, &str)> = date.map(|d| ("date", d)).into_iter().collect();
        self.get_json("/tools/calendar", &query).await
    }

    pub async fn fetch_todos(&self) -> AgentResult<TodoData> {
        if self.mode == AgentMode::Mock {
            return Ok(fixtures::mock_todos());
        }
        self.get_json("/tools/todos", &[]).await
    }

    pub async fn fetch_commute_options(
        &self,
        direction: CommuteDirection,
    ) -> AgentResult<CommuteOptionsData> {
        if self.mode == AgentMode::Mock {
            return Ok(fixtures::mock_commute_options(direction));
        }
        self.get_json("/tools/commute", &[("direction", direction.as_str())])
            .await
    }

    pub async fn fetch_shuttle_schedule(
        &self,
        origin: &str,
        destination: &str,
    ) -> AgentResult<ShuttleScheduleData> {
        if self.mode == AgentMode::Mock {
            return Ok(fixtures::mock_shuttle_schedule());
        }
        self.get_json(
            "/tools/shuttle",
            &[("origin", origin), ("destination", destination)],
        )
        .await
    }

    pub async fn fetch_briefing(&self) -> AgentResult<BriefingData> {
        if self.mode == AgentMode::Mock {
            return Ok(fixtures::mock_briefing());
        }
        self.get_json("/briefing", &[("type", "smart")]).await
    }

    // ------------------------------------------------------------------
    // Fallback wrappers for the view layer: fixture on failure.
    // ------------------------------------------------------------------

    pub async fn get_weather(&self, location: &str) -> WeatherData {
        self.fetch_weather(location).await.unwrap_or_else(|e| {
            warn!(target: "daybreak::agent", error = %e, "weather fetch failed; serving fixture");
            fixtures::mock_weather()
        })
    }

    pub async fn get_financial(&self, symbols: &[&str]) -> FinancialData {
        self.fetch_financial(symbols).await.unwrap_or_else(|e| {
            warn!(target: "daybreak::agent", error = %e, "financial fetch failed; serving fixture");
            fixtures::mock_financial()
        })
    }

    pub async fn get_calendar(&self, date: Option<&str>) -> CalendarData {
        self.fetch_calendar(date).await.unwrap_or_else(|e| {
            warn!(target: "daybreak::agent", error = %e, "calendar fetch failed; serving fixture");
            fixtures::mock_calendar()
        })
    }

    pub async fn get_todos(&self) -> TodoData {
        self.fetch_todos().await.unwrap_or_else(|e| {
            warn!(target: "daybreak::agent", error = %e, "todos fetch failed; serving fixture");
            fixtures::mock_todos()
        })
    }

    pub async fn get_briefing(&self) -> BriefingData {
        self.fetch_briefing().await.unwrap_or_else(|e| {
            warn!(target: "daybreak::agent", error = %e, "briefing fetch failed; serving fixture");
            fixtures::mock_briefing()
        })
    }

    // ------------------------------------------------------------------
    // Chat: single attempt, failures propagate.
    // ------------------------------------------------------------------

    /// One upstream `POST /chat`. The session id rides in the body when the
    /// caller holds one; the reply's session fields ride back untouched.
    pub async fn send_chat(&self, outgoing: &OutgoingChat) -> AgentResult<ChatReply> {
        if self.mode == AgentMode::Mock {
            return Ok(mock_chat(outgoing));
        }
        self.post_json("/chat", outgoing).await
    }
}

/// Deterministic offline reply so mock mode still carries a conversation.
fn mock_chat(outgoing: &OutgoingChat) -> ChatReply {
    let new_session = outgoing.session_id.is_none();
    ChatReply {
        response: format!(
            "[mock agent] I heard: \"{}\". Start the real agent backend for live answers.",
            outgoing.message
        ),
        session_id: outgoing
            .session_id
            .clone()
            .unwrap_or_else(|| "mock-session".to_string()),
        new_session,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_mode_serves_fixtures_without_network() {
        let client = AgentClient::new("http://127.0.0.1:1", AgentMode::Mock);
        let weather = client.fetch_weather(DEFAULT_LOCATION).await.unwrap();
        assert_eq!(weather.tool, "weather");
        let todos = client.fetch_todos().await.unwrap();
        assert_eq!(todos.data.total_pending, 4);
    }

    #[tokio::test]
    async fn live_data_fetch_falls_back_to_fixture() {
        // Nothing listens on port 1; the live call fails fast and the wrapper
        // substitutes the fixture.
        let client = AgentClient::new("http://127.0.0.1:1", AgentMode::Live);
        let weather = client.get_weather(DEFAULT_LOCATION).await;
        assert_eq!(weather.data.location, "San Francisco");
    }

    #[tokio::test]
    async fn live_chat_failure_propagates() {
        let client = AgentClient::new("http://127.0.0.1:1", AgentMode::Live);
        let outgoing = OutgoingChat {
            message: "hello".to_string(),
            session_id: None,
        };
        assert!(client.send_chat(&outgoing).await.is_err());
    }

    #[tokio::test]
    async fn mock_chat_keeps_an_existing_session() {
        let client = AgentClient::new(DEFAULT_AGENT_URL, AgentMode::Mock);
        let outgoing = OutgoingChat {
            message: "hello".to_string(),
            session_id: Some("abc123".to_string()),
        };
        let reply = client.send_chat(&outgoing).await.unwrap();
        assert_eq!(reply.session_id, "abc123");
        assert!(!reply.new_session);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = AgentClient::new("http://localhost:8001///", AgentMode::Mock);
        assert_eq!(client.base_url(), "http://localhost:8001");
    }
}
