//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Identifier used when neither a user nor an address is known
pub const ANONYMOUS_IDENTIFIER: &str = "anonymous";

/// Who sent a request, as far as headers tell
///
/// Recorded on audit-log rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip: extract_client_ip(headers).map(|ip| ip.to_string()),
            user_agent: extract_user_agent(headers),
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively. An empty token counts as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Extract client IP address from proxy headers
///
/// First hop of `X-Forwarded-For`, then `X-Real-IP`.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
}

pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Key a caller for rate limiting
///
/// Authenticated users are keyed by id, everyone else by address.
pub fn rate_limit_identifier(user_id: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(id) = user_id {
        return format!("user:{id}");
    }
    match extract_client_ip(headers) {
        Some(ip) => format!("ip:{ip}"),
        None => ANONYMOUS_IDENTIFIER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
        assert_eq!(extract_bearer_token(&headers), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn test_extract_client_ip_xff() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("192.168.1.1, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.9.9.9"));

        let ip = extract_client_ip(&headers);
        assert_eq!(ip, Some("192.168.1.1".parse().unwrap()));
    }

    #[test]
    fn test_extract_client_ip_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.9.9.9"));

        assert_eq!(extract_client_ip(&headers), Some("10.9.9.9".parse().unwrap()));
    }

    #[test]
    fn test_rate_limit_identifier() {
        let mut headers = HeaderMap::new();
        assert_eq!(rate_limit_identifier(None, &headers), ANONYMOUS_IDENTIFIER);

        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.7"));
        assert_eq!(rate_limit_identifier(None, &headers), "ip:203.0.113.7");
        assert_eq!(rate_limit_identifier(Some("u-1"), &headers), "user:u-1");
    }

    #[test]
    fn test_client_info_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.2"));

        let info = ClientInfo::from_headers(&headers);
        assert_eq!(info.ip.as_deref(), Some("198.51.100.2"));
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
    }
}
