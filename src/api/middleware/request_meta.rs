//! Request metadata extractor for audit logging

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Client metadata attached to audit entries. Extraction never fails;
/// every field is best effort.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };

        // Behind a proxy the client address is the first entry of
        // x-forwarded-for.
        let ip_address = header("x-forwarded-for")
            .map(|value| value.split(',').next().unwrap_or("").trim().to_string())
            .filter(|ip| !ip.is_empty());

        Ok(RequestMeta {
            ip_address,
            user_agent: header("user-agent"),
            request_id: header("x-request-id"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequest;
    use axum::http::Request;

    async fn extract(request: Request<axum::body::Body>) -> RequestMeta {
        RequestMeta::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_forwarded_for_takes_first_hop() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .header("user-agent", "curl/8.0")
            .body(axum::body::Body::empty())
            .unwrap();

        let meta = extract(request).await;

        assert_eq!(meta.ip_address, Some("203.0.113.9".to_string()));
        assert_eq!(meta.user_agent, Some("curl/8.0".to_string()));
    }

    #[tokio::test]
    async fn test_missing_headers() {
        let request = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        let meta = extract(request).await;

        assert_eq!(meta.ip_address, None);
        assert_eq!(meta.user_agent, None);
        assert_eq!(meta.request_id, None);
    }
}
