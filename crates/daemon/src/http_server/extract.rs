use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use http::header::{AUTHORIZATION, USER_AGENT};
use http::request::Parts;
use http::HeaderMap;

use crate::access::Accountability;
use crate::shares::RequestContext;
use crate::ServiceState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Accountability of the caller, resolved from its bearer token.
/// Missing or unknown tokens resolve to anonymous rather than rejecting.
#[derive(Debug, Clone)]
pub struct Caller(pub Accountability);

#[async_trait]
impl FromRequestParts<ServiceState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Caller(state.accountability(bearer_token(&parts.headers))))
    }
}

/// Where a request came from, for the session record
#[derive(Debug, Clone)]
pub struct Provenance(pub RequestContext);

#[async_trait]
impl<S> FromRequestParts<S> for Provenance
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Provenance(request_context(&parts.headers, peer)))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim())
}

fn request_context(headers: &HeaderMap, peer: Option<SocketAddr>) -> RequestContext {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    RequestContext {
        ip: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}
