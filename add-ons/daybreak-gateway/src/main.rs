//! Axum gateway for the Daybreak morning dashboard.
//!
//! Serves the v1 proxy API: `POST /api/v1/chat` forwards one message to the
//! upstream agent (server-to-server, so a browser UI never fights CORS or
//! holds agent credentials), `GET /api/v1/dashboard` preloads the widget
//! snapshots for first render, and `GET /api/v1/health` reports liveness.
//! `--dashboard` runs the terminal dashboard instead of the server (requires
//! the `tui-dashboard` feature).

#[cfg(feature = "tui-dashboard")]
mod tui;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use daybreak_agent::{preload_dashboard, AgentClient, DashboardPreload};
use daybreak_core::{env_bool, CoreConfig, OutgoingChat, CHAT_ERROR_NOTICE};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// API contract version, relayed in bodies and the `API-Version` header.
const API_VERSION: &str = "v1";
const SERVICE_NAME: &str = "daybreak-gateway-api";
/// Every v1 response carries this header, success and failure alike.
const API_VERSION_HEADER: [(&str, &str); 1] = [("API-Version", API_VERSION)];

#[derive(Clone)]
struct AppState {
    config: Arc<CoreConfig>,
    agent: Arc<AgentClient>,
}

type ApiResponse = (StatusCode, [(&'static str, &'static str); 1], Json<Value>);

/// GET /api – service catalog (versions and endpoints).
async fn api_index(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": format!("{} Gateway API", state.config.app_name),
        "description": "Proxy API for the Daybreak morning dashboard",
        "versions": {
            "v1": {
                "endpoints": {
                    "GET /api/v1/health": "Health check endpoint",
                    "GET /api/v1/dashboard": "Server-side dashboard preload",
                    "POST /api/v1/chat": "Chat proxy to the AI agent",
                },
                "status": "stable",
                "baseUrl": "/api/v1",
            },
        },
        "current_version": API_VERSION,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/v1/health – liveness check.
async fn health() -> ApiResponse {
    (
        StatusCode::OK,
        API_VERSION_HEADER,
        Json(json!({
            "status": "ok",
            "version": API_VERSION,
            "timestamp": Utc::now().to_rfc3339(),
            "service": SERVICE_NAME,
            "endpoints": {
                "POST /api/v1/chat": "Chat with the AI assistant",
                "GET /api/v1/health": "Health check",
                "GET /api/v1/dashboard": "Server-side dashboard preload",
            },
        })),
    )
}

/// GET /api/v1/dashboard – preload all widget sources with per-source error
/// isolation; one failing source never blocks the rest.
async fn dashboard(
    State(state): State<AppState>,
) -> (
    StatusCode,
    [(&'static str, &'static str); 1],
    Json<DashboardPreload>,
) {
    let preload = preload_dashboard(state.agent.as_ref()).await;
    (StatusCode::OK, API_VERSION_HEADER, Json(preload))
}

#[derive(Debug, Deserialize)]
struct ChatProxyRequest {
    #[serde(default)]
    message: String,
    #[serde(default)]
    session_id: Option<String>,
}

/// POST /api/v1/chat – proxy one message to the upstream agent.
///
/// Stateless across calls: the session id rides in from the client, goes
/// upstream, and the reply's session fields ride back untouched. One upstream
/// attempt, no retry; failures collapse to a fixed user-facing envelope.
async fn chat(State(state): State<AppState>, Json(req): Json<ChatProxyRequest>) -> ApiResponse {
    let message = req.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            API_VERSION_HEADER,
            Json(json!({ "error": "Message is required" })),
        );
    }

    let correlation_id = uuid::Uuid::new_v4();
    tracing::info!(
        target: "daybreak::chat",
        %correlation_id,
        chars = message.len(),
        has_session = req.session_id.is_some(),
        "proxying chat message"
    );

    let outgoing = OutgoingChat {
        message: message.to_string(),
        session_id: req.session_id.filter(|s| !s.trim().is_empty()),
    };

    match state.agent.send_chat(&outgoing).await {
        Ok(reply) => (
            StatusCode::OK,
            API_VERSION_HEADER,
            Json(json!({
                "success": true,
                "response": reply.response,
                "session_id": reply.session_id,
                "new_session": reply.new_session,
                "timestamp": reply.timestamp,
                "version": API_VERSION,
            })),
        ),
        Err(e) => {
            // Upstream detail stays in the log; the caller gets the fixed text.
            tracing::error!(
                target: "daybreak::chat",
                %correlation_id,
                error = %e.detail(),
                "upstream chat call failed"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                API_VERSION_HEADER,
                Json(json!({
                    "error": CHAT_ERROR_NOTICE,
                    "timestamp": Utc::now().to_rfc3339(),
                    "version": API_VERSION,
                })),
            )
        }
    }
}

fn build_app(state: AppState) -> Router {
    // CORS: a browser UI on another local port must be able to reach the
    // proxy; credentials never leave the gateway.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api", get(api_index))
        .route("/api/v1/health", get(health))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/chat", post(chat))
        .with_state(state)
        .layer(cors)
}

#[tokio::main]
async fn main() {
    // Load .env first: the agent URL and toggles live there in dev setups.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!(
            "[daybreak-gateway] .env not loaded: {} (using system environment)",
            e
        );
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match CoreConfig::load() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Config load failed: {}", e);
            std::process::exit(1);
        }
    };

    if config.debug || env_bool("DAYBREAK_DEBUG", false) {
        tracing::info!("🔗 Agent API URL: {}", config.agent_base_url);
        tracing::info!("🌍 Agent mode: {}", config.agent_mode);
    }

    let agent = Arc::new(AgentClient::from_config(&config));

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--dashboard") {
        #[cfg(feature = "tui-dashboard")]
        {
            let handle = tokio::runtime::Handle::current();
            let tui_config = Arc::clone(&config);
            let tui_agent = Arc::clone(&agent);
            let result =
                tokio::task::spawn_blocking(move || tui::run_dashboard(tui_config, tui_agent, handle))
                    .await;
            match result {
                Ok(Ok(())) => return,
                Ok(Err(e)) => {
                    tracing::error!("Dashboard error: {}", e);
                    std::process::exit(1);
                }
                Err(e) => {
                    tracing::error!("Dashboard task failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        #[cfg(not(feature = "tui-dashboard"))]
        {
            eprintln!("The terminal dashboard requires the 'tui-dashboard' feature. Rebuild with: cargo build --features tui-dashboard");
            std::process::exit(1);
        }
    }

    let state = AppState {
        config: Arc::clone(&config),
        agent,
    };
    let app = build_app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Port {} unavailable: {}", config.port, e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "🌅 {} listening on http://{} (agent: {})",
        config.app_name,
        addr,
        config.agent_base_url
    );
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use daybreak_agent::AgentMode;
    use std::sync::Mutex;
    use tower::ServiceExt;

    fn test_state(base_url: &str, mode: AgentMode) -> AppState {
        let config = CoreConfig {
            app_name: "Daybreak Test".to_string(),
            port: 8080,
            agent_base_url: base_url.to_string(),
            agent_mode: match mode {
                AgentMode::Mock => "mock".to_string(),
                AgentMode::Live => "live".to_string(),
            },
            user_name: "Kevin".to_string(),
            debug: false,
        };
        AppState {
            config: Arc::new(config),
            agent: Arc::new(AgentClient::new(base_url, mode)),
        }
    }

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_chat(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/chat")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok_with_api_version_header() {
        let app = build_app(test_state("http://127.0.0.1:1", AgentMode::Mock));
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("API-Version").unwrap(), "v1");
        let json = body_json(res).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], "v1");
        assert_eq!(json["service"], SERVICE_NAME);
        assert!(json["endpoints"].is_object());
    }

    #[tokio::test]
    async fn api_index_lists_v1() {
        let app = build_app(test_state("http://127.0.0.1:1", AgentMode::Mock));
        let req = Request::builder()
            .method("GET")
            .uri("/api")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["current_version"], "v1");
        assert!(json["versions"]["v1"]["endpoints"].is_object());
    }

    #[tokio::test]
    async fn blank_message_is_rejected_before_any_upstream_call() {
        let hits = Arc::new(Mutex::new(0u32));
        let hits_probe = Arc::clone(&hits);
        let upstream = Router::new().route(
            "/chat",
            post(move |Json(_): Json<Value>| {
                let hits = Arc::clone(&hits_probe);
                async move {
                    *hits.lock().unwrap() += 1;
                    Json(json!({
                        "response": "should never happen",
                        "session_id": "x",
                        "new_session": true,
                        "timestamp": "2025-06-01T07:00:00Z",
                    }))
                }
            }),
        );
        let base = spawn_upstream(upstream).await;
        let app = build_app(test_state(&base, AgentMode::Live));

        let res = app
            .oneshot(post_chat(json!({ "message": "   " })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers().get("API-Version").unwrap(), "v1");
        let json = body_json(res).await;
        assert_eq!(json, json!({ "error": "Message is required" }));
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn chat_relays_upstream_reply_and_forwards_session() {
        let seen = Arc::new(Mutex::new(Vec::<Value>::new()));
        let seen_probe = Arc::clone(&seen);
        let upstream = Router::new().route(
            "/chat",
            post(move |Json(body): Json<Value>| {
                let seen = Arc::clone(&seen_probe);
                async move {
                    seen.lock().unwrap().push(body);
                    Json(json!({
                        "response": "Here's your briefing.",
                        "session_id": "abc123",
                        "new_session": true,
                        "timestamp": "2025-06-01T07:00:00Z",
                    }))
                }
            }),
        );
        let base = spawn_upstream(upstream).await;
        let app = build_app(test_state(&base, AgentMode::Live));

        // First turn: no session id anywhere in the outgoing body.
        let res = app
            .clone()
            .oneshot(post_chat(json!({ "message": "/summary" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["response"], "Here's your briefing.");
        assert_eq!(json["session_id"], "abc123");
        assert_eq!(json["new_session"], true);
        assert_eq!(json["version"], "v1");

        // Second turn: the caller round-trips the adopted session id.
        let res = app
            .oneshot(post_chat(
                json!({ "message": "  hello  ", "session_id": "abc123" }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let forwarded = seen.lock().unwrap().clone();
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[0], json!({ "message": "/summary" }));
        assert_eq!(
            forwarded[1],
            json!({ "message": "hello", "session_id": "abc123" })
        );
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_fixed_error_envelope() {
        let upstream = Router::new().route(
            "/chat",
            post(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "upstream agent exploded spectacularly",
                )
            }),
        );
        let base = spawn_upstream(upstream).await;
        let app = build_app(test_state(&base, AgentMode::Live));

        let res = app
            .oneshot(post_chat(json!({ "message": "hello" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.headers().get("API-Version").unwrap(), "v1");
        let json = body_json(res).await;
        assert_eq!(json["error"], CHAT_ERROR_NOTICE);
        assert_eq!(json["version"], "v1");
        assert!(json["timestamp"].is_string());
        assert!(!json.to_string().contains("exploded"));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_fixed_error_envelope() {
        // Nothing listens on port 1.
        let app = build_app(test_state("http://127.0.0.1:1", AgentMode::Live));
        let res = app
            .oneshot(post_chat(json!({ "message": "hello" })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(res).await;
        assert_eq!(json["error"], CHAT_ERROR_NOTICE);
    }

    #[tokio::test]
    async fn dashboard_preload_returns_every_source_in_mock_mode() {
        let app = build_app(test_state("http://127.0.0.1:1", AgentMode::Mock));
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/dashboard")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("API-Version").unwrap(), "v1");
        let json = body_json(res).await;
        for source in ["weather", "financial", "calendar", "todos"] {
            assert!(json[source]["data"].is_object(), "{} missing", source);
            assert!(json[source]["error"].is_null());
        }
        assert!(json["generated_at"].is_string());
    }
}
