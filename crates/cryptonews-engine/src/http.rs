//! HTTP refinement provider.

use async_trait::async_trait;
use tracing::debug;

use crate::refine::{RefineError, Refinement, RefinementRequest, Refiner};

/// Posts refinement requests as JSON to an external endpoint.
///
/// The endpoint answers with a [`Refinement`] object; every field is optional.
pub struct HttpRefiner {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRefiner {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Refiner for HttpRefiner {
    fn name(&self) -> &str {
        "http"
    }

    /// A remote provider cannot promise repeatable output.
    fn supports_determinism(&self) -> bool {
        false
    }

    async fn refine(&self, request: &RefinementRequest) -> Result<Refinement, RefineError> {
        debug!(
            url = %self.endpoint,
            prompt_version = %request.prompt_version,
            "requesting refinement"
        );
        let resp = self.client.post(&self.endpoint).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RefineError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_trimmed() {
        let r = HttpRefiner::new("http://localhost:9000/refine/".into());
        assert_eq!(r.endpoint(), "http://localhost:9000/refine");
    }

    #[test]
    fn http_refiner_is_not_deterministic() {
        let r = HttpRefiner::new("http://localhost:9000".into());
        assert!(!r.supports_determinism());
        assert_eq!(r.name(), "http");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        use cryptonews_core::EventType;

        use crate::candidates::CandidateEvent;

        // Port 9 (discard) is closed on loopback in test environments.
        let r = HttpRefiner::new("http://127.0.0.1:9".into());
        let primary = CandidateEvent::new(EventType::Unknown, 0.4, 0.2);
        let req = RefinementRequest::new("text", &primary, &[], &[], false);
        assert!(r.refine(&req).await.is_err());
    }
}
