use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Role, Session, UserId},
};

/// HTTP header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header carrying the id of the authenticated user
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the role of the authenticated user
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Per-request context handed to handlers through request extensions
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub session: Option<Session>,
}

impl RequestContext {
    /// Returns the session or fails with `Unauthorized`
    pub fn require_session(&self) -> AppResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("missing session".to_string()))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

/// Resolves the session from user id and role headers
///
/// Returns `None` when either header is absent or malformed.
fn resolve_session(headers: &HeaderMap) -> Option<Session> {
    let user_id = header_str(headers, USER_ID_HEADER)?;
    let role = header_str(headers, USER_ROLE_HEADER)?;

    match (user_id.parse::<UserId>(), role.parse::<Role>()) {
        (Ok(user_id), Ok(role)) => Some(Session::new(user_id, role)),
        _ => {
            tracing::warn!(user_id, role, "Ignoring malformed session headers");
            None
        }
    }
}

/// Middleware that builds the [`RequestContext`] once per request.
///
/// Reuses an incoming `x-request-id` when it is a valid UUID and echoes the
/// request ID on the response.
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let request_id = header_str(request.headers(), REQUEST_ID_HEADER)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let session = resolve_session(request.headers());

    request.extensions_mut().insert(RequestContext {
        request_id,
        session,
    });

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Creates the HTTP tracing span, tagged with request and user ids
pub fn make_span_with_request_context(request: &Request<Body>) -> tracing::Span {
    let context = request.extensions().get::<RequestContext>();
    let request_id = context
        .map(|c| c.request_id.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let user_id = context.and_then(|c| c.session.as_ref()).map(|s| s.user_id);

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
        user_id = user_id,
    )
}
