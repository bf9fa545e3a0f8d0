//! Server-side preload: fetch the four dashboard sources in one pass.
//!
//! Sources fail independently. One failing source never blocks the others;
//! its error string lands next to the missing payload so that widget alone
//! can render a failed state.

use crate::client::{AgentClient, DEFAULT_LOCATION, DEFAULT_SYMBOLS};
use crate::error::AgentResult;
use daybreak_core::{CalendarData, FinancialData, TodoData, WeatherData};
use serde::Serialize;
use tracing::warn;

/// One preloaded source: the payload, or the error string for its widget.
#[derive(Debug, Clone, Serialize)]
pub struct Preloaded<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Preloaded<T> {
    fn from_result(source: &str, result: AgentResult<T>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(e) => {
                warn!(target: "daybreak::preload", source, error = %e, "preload source failed");
                Self {
                    data: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Everything the dashboard needs for first render.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPreload {
    pub weather: Preloaded<WeatherData>,
    pub financial: Preloaded<FinancialData>,
    pub calendar: Preloaded<CalendarData>,
    pub todos: Preloaded<TodoData>,
    pub generated_at: String,
}

/// Fetch all four sources concurrently with per-source error isolation.
pub async fn preload_dashboard(client: &AgentClient) -> DashboardPreload {
    let (weather, financial, calendar, todos) = tokio::join!(
        client.fetch_weather(DEFAULT_LOCATION),
        client.fetch_financial(DEFAULT_SYMBOLS),
        client.fetch_calendar(None),
        client.fetch_todos(),
    );
    DashboardPreload {
        weather: Preloaded::from_result("weather", weather),
        financial: Preloaded::from_result("financial", financial),
        calendar: Preloaded::from_result("calendar", calendar),
        todos: Preloaded::from_result("todos", todos),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AgentMode;
    use crate::fixtures;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn one_failing_source_leaves_the_rest_intact() {
        let upstream = Router::new()
            .route(
                "/tools/weather",
                get(|| async { Json(fixtures::mock_weather()) }),
            )
            .route(
                "/tools/financial",
                post(|| async { Json(fixtures::mock_financial()) }),
            )
            .route(
                "/tools/calendar",
                get(|| async { Json(fixtures::mock_calendar()) }),
            )
            .route(
                "/tools/todos",
                get(|| async {
                    (
                        axum::http::StatusCode::SERVICE_UNAVAILABLE,
                        "todos backend down",
                    )
                }),
            );
        let base = spawn_upstream(upstream).await;
        let client = AgentClient::new(base, AgentMode::Live);

        let preload = preload_dashboard(&client).await;
        assert!(preload.weather.data.is_some());
        assert!(preload.weather.error.is_none());
        assert!(preload.financial.data.is_some());
        assert!(preload.calendar.data.is_some());
        assert!(preload.todos.data.is_none());
        let todo_error = preload.todos.error.as_deref().unwrap();
        assert!(todo_error.contains("503"));
        assert!(!todo_error.contains("todos backend down"));
    }

    #[tokio::test]
    async fn mock_mode_preloads_every_source() {
        let client = AgentClient::new("http://127.0.0.1:1", AgentMode::Mock);
        let preload = preload_dashboard(&client).await;
        assert!(preload.weather.data.is_some());
        assert!(preload.financial.data.is_some());
        assert!(preload.calendar.data.is_some());
        assert!(preload.todos.data.is_some());
        assert!(preload.todos.error.is_none());
    }
}
