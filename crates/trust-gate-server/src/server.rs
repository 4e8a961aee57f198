// crates/trust-gate-server/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: axum routes for agent, trust, and access-code authorization.
// Purpose: Render engine decisions as JSON with stable status codes.
// Dependencies: trust-gate-core, trust-gate-config, trust-gate-providers, axum
// ============================================================================

//! ## Overview
//! The server owns one [`DecisionEngine`] and answers:
//! - `GET /agent-authorised`
//! - `GET /authorised/{identifier}`
//! - `POST /authorise-access-code`
//! - `GET /health`
//!
//! Decisions render as `200` (allowed or denied with a redirect URL), `401`
//! with the login URL when the caller has no session, or `500` with a
//! failure label. Every response carries `x-server-correlation-id`.
//! Security posture: request headers and bodies are untrusted; the caller
//! credential is only forwarded to the auth provider.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde::Serialize;
use tokio::net::TcpListener;
use trust_gate_config::RedirectConfig;
use trust_gate_config::TrustGateConfig;
use trust_gate_core::AccessCodeAuthoriser;
use trust_gate_core::AccessQuery;
use trust_gate_core::AuthorizationOutcome;
use trust_gate_core::CallerCredentials;
use trust_gate_core::Decision;
use trust_gate_core::DecisionEngine;
use trust_gate_core::DecisionTrace;
use trust_gate_core::FailureKind;
use trust_gate_core::TrustIdentifier;
use trust_gate_providers::HttpAuthProvider;
use trust_gate_providers::HttpEnrolmentRegistry;

use crate::audit::AccessCodeAuditEvent;
use crate::audit::AuditSink;
use crate::audit::DecisionAuditEvent;
use crate::audit::sink_from_config;
use crate::correlation::CorrelationIdGenerator;
use crate::correlation::RequestCorrelation;
use crate::correlation::SERVER_CORRELATION_HEADER;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix for server-issued correlation ids.
const SERVER_CORRELATION_PREFIX: &str = "tg";

// ============================================================================
// SECTION: Server
// ============================================================================

/// Trust Gate HTTP server.
pub struct TrustGateServer {
    /// Validated configuration.
    config: TrustGateConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl TrustGateServer {
    /// Builds a server with HTTP providers and the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when validation or provider setup fails.
    pub fn from_config(config: TrustGateConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let auth = HttpAuthProvider::from_config(&config.auth_provider)
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let registry = HttpEnrolmentRegistry::from_config(&config.enrolment_store)
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let audit = sink_from_config(&config.server.audit)
            .map_err(|err| ServerError::Init(format!("audit sink: {err}")))?;
        let state = Arc::new(ServerState {
            engine: DecisionEngine::new(Arc::new(auth), Arc::new(registry)),
            access_codes: AccessCodeAuthoriser::new(config.access_codes.codes.clone()),
            redirects: config.redirects.clone(),
            audit,
            correlation: CorrelationIdGenerator::new(SERVER_CORRELATION_PREFIX),
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Builds the axum router.
    fn router(&self) -> Router {
        Router::new()
            .route("/agent-authorised", get(agent_authorised))
            .route("/authorised/{identifier}", get(trust_authorised))
            .route("/authorise-access-code", post(authorise_access_code))
            .route("/health", get(health))
            .layer(DefaultBodyLimit::max(self.config.server.max_body_bytes))
            .with_state(Arc::clone(&self.state))
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the server fails.
    pub async fn serve_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

// ============================================================================
// SECTION: Handler State
// ============================================================================

/// State shared by all handlers.
struct ServerState {
    /// Decision engine.
    engine: DecisionEngine,
    /// Access-code allow-list.
    access_codes: AccessCodeAuthoriser,
    /// Redirect URLs.
    redirects: RedirectConfig,
    /// Audit destination.
    audit: Arc<dyn AuditSink>,
    /// Server correlation id source.
    correlation: CorrelationIdGenerator,
}

impl ServerState {
    /// Extracts caller credentials and correlation ids from request headers.
    fn begin(&self, headers: &HeaderMap) -> (CallerCredentials, RequestCorrelation) {
        let correlation = RequestCorrelation::from_headers(headers, &self.correlation);
        let authorization =
            headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(str::to_string);
        let credentials = CallerCredentials::new(authorization)
            .with_correlation_id(correlation.client_id.clone());
        (credentials, correlation)
    }

    /// Audits and renders a decision.
    fn finish_decision(
        &self,
        endpoint: &'static str,
        correlation: &RequestCorrelation,
        decision: Decision,
    ) -> Response {
        let Decision {
            outcome,
            trace,
        } = decision;
        let event = DecisionAuditEvent::new(endpoint, correlation, &outcome, trace);
        self.audit.record_decision(&event);
        let response = render_outcome(&outcome, &self.redirects);
        with_server_correlation(response, &correlation.server_id)
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /agent-authorised`.
async fn agent_authorised(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    let (credentials, correlation) = state.begin(&headers);
    let decision = state.engine.decide(&credentials, &AccessQuery::AgentIdentity).await;
    state.finish_decision("agent_authorised", &correlation, decision)
}

/// `GET /authorised/{identifier}`.
async fn trust_authorised(
    State(state): State<Arc<ServerState>>,
    Path(identifier): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (credentials, correlation) = state.begin(&headers);
    let decision = match TrustIdentifier::parse(&identifier) {
        Ok(identifier) => {
            state.engine.decide(&credentials, &AccessQuery::Trust(identifier)).await
        }
        Err(err) => Decision {
            outcome: AuthorizationOutcome::Failed(FailureKind::BadRequest),
            trace: DecisionTrace {
                detail: Some(err.to_string()),
                ..DecisionTrace::default()
            },
        },
    };
    state.finish_decision("authorised", &correlation, decision)
}

/// `POST /authorise-access-code`.
async fn authorise_access_code(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (credentials, correlation) = state.begin(&headers);
    let (result, detail) = match state.engine.resolve(&credentials).await {
        Err(err) => (Err(err.failure_kind()), Some(err.to_string())),
        Ok(_) => match state.access_codes.authorise_body(&body) {
            Ok(authorised) => (Ok(authorised), None),
            Err(err) => (Err(FailureKind::BadRequest), Some(err.to_string())),
        },
    };
    state.audit.record_access_code(&AccessCodeAuditEvent::new(&correlation, result, detail));
    let response = match result {
        Ok(authorised) => (
            StatusCode::OK,
            Json(DecisionBody {
                authorised,
                arn: None,
                redirect_url: None,
            }),
        )
            .into_response(),
        Err(kind) => render_failure(kind, &state.redirects),
    };
    with_server_correlation(response, &correlation.server_id)
}

/// `GET /health`.
async fn health(State(state): State<Arc<ServerState>>) -> Response {
    let response = (
        StatusCode::OK,
        Json(HealthBody {
            status: "ok",
        }),
    )
        .into_response();
    with_server_correlation(response, &state.correlation.issue())
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Decision response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecisionBody<'a> {
    /// Whether the caller may proceed.
    authorised: bool,
    /// Agent reference number for agent identity queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    arn: Option<&'a str>,
    /// Remediation URL for denials and login.
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_url: Option<&'a str>,
}

/// Failure response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Failure label.
    error: &'static str,
}

/// Health response body.
#[derive(Debug, Serialize)]
struct HealthBody {
    /// Always `ok`.
    status: &'static str,
}

/// Renders an outcome as status and JSON body.
fn render_outcome(outcome: &AuthorizationOutcome, redirects: &RedirectConfig) -> Response {
    let body = match outcome {
        AuthorizationOutcome::Allowed => DecisionBody {
            authorised: true,
            arn: None,
            redirect_url: None,
        },
        AuthorizationOutcome::AgentAllowed(arn) => DecisionBody {
            authorised: true,
            arn: Some(arn.as_str()),
            redirect_url: None,
        },
        AuthorizationOutcome::Denied(target) => DecisionBody {
            authorised: false,
            arn: None,
            redirect_url: Some(redirects.url_for(*target)),
        },
        AuthorizationOutcome::Failed(kind) => return render_failure(*kind, redirects),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Renders a failure: login redirect for missing sessions, `500` otherwise.
fn render_failure(kind: FailureKind, redirects: &RedirectConfig) -> Response {
    match kind {
        FailureKind::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            Json(DecisionBody {
                authorised: false,
                arn: None,
                redirect_url: Some(redirects.login_url()),
            }),
        )
            .into_response(),
        FailureKind::IdentityIncomplete | FailureKind::UpstreamError | FailureKind::BadRequest => {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: kind.label(),
                }),
            )
                .into_response()
        }
    }
}

/// Attaches the server correlation id header.
fn with_server_correlation(mut response: Response, server_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(server_id) {
        response.headers_mut().insert(SERVER_CORRELATION_HEADER, value);
    }
    response
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
