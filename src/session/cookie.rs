use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "movie_match_session";

/// Session identifier stored in request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix safe to put in logs
    pub fn tag(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signs and verifies session cookie values
#[derive(Clone)]
pub struct SessionCookies {
    /// HMAC state already keyed with the secret
    key: HmacSha256,
    max_age_secs: u64,
}

impl SessionCookies {
    pub fn new(secret: &str, max_age_secs: u64) -> Self {
        Self {
            key: HmacSha256::new_from_slice(secret.as_bytes())
                .expect("HMAC accepts keys of any length"),
            max_age_secs,
        }
    }

    fn mac(&self, id: &str) -> HmacSha256 {
        let mut mac = self.key.clone();
        mac.update(id.as_bytes());
        mac
    }

    /// Cookie value `{id}.{hex hmac-sha256(id)}`
    pub fn encode(&self, id: &SessionId) -> String {
        let tag = self.mac(id.as_str()).finalize().into_bytes();
        format!("{}.{}", id.as_str(), hex::encode(tag))
    }

    /// Returns the session id if the value is well formed and correctly signed
    pub fn decode(&self, value: &str) -> Option<SessionId> {
        let (id, signature) = value.rsplit_once('.')?;
        let id = Uuid::parse_str(id).ok()?.to_string();
        let signature = hex::decode(signature).ok()?;
        // Constant-time comparison
        self.mac(&id).verify_slice(&signature).ok()?;
        Some(SessionId(id))
    }

    /// Full `Set-Cookie` header value
    pub fn set_cookie_header(&self, id: &SessionId) -> String {
        format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.encode(id),
            self.max_age_secs
        )
    }

    /// Finds and verifies the session cookie among the request's cookie headers
    fn session_from(&self, request: &Request) -> Option<SessionId> {
        request
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == SESSION_COOKIE)
            .find_map(|(_, value)| self.decode(value))
    }
}

/// Middleware that resolves the caller's session and refreshes its cookie.
///
/// A missing, malformed, or wrongly signed cookie starts a new session. The
/// cookie is re-issued on every response so the session lifetime slides with
/// activity.
pub async fn session_middleware(
    State(cookies): State<SessionCookies>,
    mut request: Request,
    next: Next,
) -> Response {
    let session_id = cookies.session_from(&request).unwrap_or_default();

    request.extensions_mut().insert(session_id.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&cookies.set_cookie_header(&session_id)) {
        response
            .headers_mut()
            .append(header::SET_COOKIE, header_value);
    }

    response
}

/// Creates a tracing span tagged with the caller's session
pub fn make_span_with_session(request: &Request<Body>) -> tracing::Span {
    let session = request
        .extensions()
        .get::<SessionId>()
        .map(|id| id.tag().to_string())
        .unwrap_or_else(|| "none".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        session = %session,
    )
}
