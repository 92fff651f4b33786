//! Request forwarding to the upstream origin.
//!
//! # Responsibilities
//! - Rewrite the inbound URI onto the configured origin
//! - Buffer non-GET/HEAD request bodies before sending
//! - Override the `host` header with the upstream hostname
//! - Relay the upstream status, filtered headers, and body verbatim
//! - Convert every failure into one synthesized error reply
//!
//! # Design Decisions
//! - The outbound client never follows redirects; 3xx responses relay to
//!   the caller unchanged, `Location` included
//! - Exactly one upstream attempt per inbound request, bounded by a
//!   deadline
//! - Hop-by-hop response headers are dropped; relaying them across the
//!   proxy boundary would corrupt framing on the client leg

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::uri::{Authority, Scheme};
use axum::http::{header, HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::http::response::error_reply;

/// The upstream origin could not be turned into a relay target.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("upstream origin {0:?} is not a valid URI")]
    InvalidOrigin(String),

    #[error("upstream origin {0:?} is missing a scheme")]
    MissingScheme(String),

    #[error("upstream origin {0:?} is missing a host")]
    MissingHost(String),
}

/// A single relay attempt failed.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to read inbound request body: {0}")]
    InboundBody(#[source] axum::Error),

    #[error("failed to assemble target URI: {0}")]
    Target(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] hyper_util::client::legacy::Error),

    #[error("failed to read upstream response body: {0}")]
    UpstreamBody(#[source] axum::Error),

    #[error("upstream did not respond within {0:?}")]
    DeadlineExceeded(Duration),
}

impl ForwardError {
    /// Status code of the synthesized reply for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::InboundBody(_) => StatusCode::BAD_REQUEST,
            ForwardError::Target(_) | ForwardError::Upstream(_) | ForwardError::UpstreamBody(_) => {
                StatusCode::BAD_GATEWAY
            }
            ForwardError::DeadlineExceeded(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Convert this failure into the reply sent to the caller.
    pub fn into_reply(self) -> Response<Body> {
        let message = match &self {
            ForwardError::InboundBody(_) => "The request body could not be read.",
            ForwardError::DeadlineExceeded(_) => {
                "The upstream server did not respond in time. Please try again later."
            }
            _ => {
                "The upstream server is unavailable. Please try again later or contact the service operator."
            }
        };
        error_reply(self.status(), message)
    }
}

/// Forwards inbound requests to the configured upstream origin.
///
/// Holds no per-request state; one instance is shared across all requests.
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
    upstream_timeout: Duration,
}

impl Forwarder {
    /// Build a forwarder for the given upstream, parsing the origin once.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, TargetError> {
        let origin: Uri = upstream
            .origin
            .parse()
            .map_err(|_| TargetError::InvalidOrigin(upstream.origin.clone()))?;
        let scheme = origin
            .scheme()
            .cloned()
            .ok_or_else(|| TargetError::MissingScheme(upstream.origin.clone()))?;
        let authority = origin
            .authority()
            .cloned()
            .ok_or_else(|| TargetError::MissingHost(upstream.origin.clone()))?;

        // The original's host override carries the hostname only, never the port.
        let host_header = HeaderValue::from_str(authority.host())
            .map_err(|_| TargetError::InvalidOrigin(upstream.origin.clone()))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            scheme,
            authority,
            host_header,
            upstream_timeout: Duration::from_secs(timeouts.upstream_secs),
        })
    }

    /// Relay one inbound request and return the reply.
    ///
    /// Either the full upstream response comes back, or the error describes
    /// which leg failed; there are no partial relays.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();
        let target = self.target_uri(&parts.uri)?;

        let outbound_body = if parts.method == Method::GET || parts.method == Method::HEAD {
            Body::empty()
        } else {
            let bytes = to_bytes(body, usize::MAX)
                .await
                .map_err(ForwardError::InboundBody)?;
            Body::from(bytes)
        };

        let mut outbound = Request::new(outbound_body);
        *outbound.method_mut() = parts.method;
        *outbound.uri_mut() = target;

        let mut headers = std::mem::take(&mut parts.headers);
        headers.insert(header::HOST, self.host_header.clone());
        // Framing is recomputed from the buffered outbound body; a relayed
        // content-length would not survive the GET/HEAD body drop.
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::TRANSFER_ENCODING);
        *outbound.headers_mut() = headers;

        let exchange = async {
            let response = self
                .client
                .request(outbound)
                .await
                .map_err(ForwardError::Upstream)?;
            let (head, body) = response.into_parts();
            let bytes = to_bytes(Body::new(body), usize::MAX)
                .await
                .map_err(ForwardError::UpstreamBody)?;
            Ok::<_, ForwardError>((head, bytes))
        };
        let (head, bytes) = tokio::time::timeout(self.upstream_timeout, exchange)
            .await
            .map_err(|_| ForwardError::DeadlineExceeded(self.upstream_timeout))??;

        let mut reply = Response::new(Body::from(bytes));
        *reply.status_mut() = head.status;
        for (name, value) in head.headers.iter() {
            if !is_hop_by_hop(name) {
                // append keeps duplicate header names intact (set-cookie)
                reply.headers_mut().append(name.clone(), value.clone());
            }
        }

        Ok(reply)
    }

    /// Target URI: configured scheme + authority, inbound path + query.
    fn target_uri(&self, inbound: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = inbound
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// Headers scoped to a single transport hop, never relayed.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    [
        header::CONTENT_ENCODING,
        header::CONTENT_LENGTH,
        header::TRANSFER_ENCODING,
        header::CONNECTION,
    ]
    .contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_forwarder() -> Forwarder {
        Forwarder::new(
            &UpstreamConfig {
                origin: "http://upstream.internal:9000".to_string(),
            },
            &TimeoutConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_target_uri_appends_path_and_query() {
        let forwarder = test_forwarder();
        let inbound: Uri = "http://relay.local/foo?x=1".parse().unwrap();

        let target = forwarder.target_uri(&inbound).unwrap();

        assert_eq!(target.to_string(), "http://upstream.internal:9000/foo?x=1");
    }

    #[test]
    fn test_target_uri_keeps_bare_path() {
        let forwarder = test_forwarder();
        let inbound: Uri = "/submit".parse().unwrap();

        let target = forwarder.target_uri(&inbound).unwrap();

        assert_eq!(target.to_string(), "http://upstream.internal:9000/submit");
    }

    #[test]
    fn test_host_header_omits_port() {
        assert_eq!(test_forwarder().host_header, "upstream.internal");
    }

    #[test]
    fn test_hop_by_hop_filter_normalizes_case() {
        let content_length = HeaderName::from_bytes(b"Content-Length").unwrap();
        let custom = HeaderName::from_bytes(b"X-Forwarded-For").unwrap();

        assert!(is_hop_by_hop(&content_length));
        assert!(!is_hop_by_hop(&custom));
    }

    #[test]
    fn test_rejects_origin_without_scheme() {
        let result = Forwarder::new(
            &UpstreamConfig {
                origin: "/not/an/origin".to_string(),
            },
            &TimeoutConfig::default(),
        );

        assert!(matches!(result, Err(TargetError::MissingScheme(_))));
    }
}
