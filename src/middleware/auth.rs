use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::HeaderMap;
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpResponse};

/// Header carrying the shared secret on `/v1` requests.
pub const PASSWORD_HEADER: &str = "Password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny,
}

/// Decides whether a request may proceed, looking only at its headers.
pub trait AuthPolicy: Send + Sync + 'static {
    fn authorize(&self, headers: &HeaderMap) -> AuthDecision;
}

/// Allows requests whose `Password` header equals a fixed secret.
pub struct SharedSecretPolicy {
    secret: String,
}

impl SharedSecretPolicy {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl AuthPolicy for SharedSecretPolicy {
    fn authorize(&self, headers: &HeaderMap) -> AuthDecision {
        match headers.get(PASSWORD_HEADER).map(|v| v.as_bytes()) {
            Some(given) if given == self.secret.as_bytes() => AuthDecision::Allow,
            _ => AuthDecision::Deny,
        }
    }
}

/// Rejects requests with 403 unless the registered [`AuthPolicy`] allows them.
/// A missing policy denies everything.
pub async fn require_auth<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let decision = match req.app_data::<web::Data<dyn AuthPolicy>>() {
        Some(policy) => policy.authorize(req.headers()),
        None => {
            log::error!("no auth policy registered; denying {}", req.path());
            AuthDecision::Deny
        }
    };

    if decision == AuthDecision::Deny {
        log::warn!("denied {} {}", req.method(), req.path());
        let resp = HttpResponse::Forbidden().json(serde_json::json!({ "error": "Forbidden" }));
        return Ok(req.into_response(resp).map_into_right_body());
    }

    Ok(next.call(req).await?.map_into_left_body())
}
