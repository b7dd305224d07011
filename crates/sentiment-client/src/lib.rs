//! Sentiment client for the external text-analysis service.
//!
//! This crate provides:
//! - The `SentimentAnalyzer` seam the mood scorer depends on
//! - A gRPC implementation (`GrpcSentimentClient`) for the
//!   `sentiment.SentimentAnalyzer/AnalyzeSentiment` unary call
//! - Response validation (scores outside [-1, 1] are clamped, NaN is rejected)
//!
//! Callers treat every `SentimentError` as "no sentiment available".

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, error, info};

/// Wire messages for the sentiment service
pub mod sentiment {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct AnalyzeSentimentRequest {
        #[prost(string, tag = "1")]
        pub text: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct AnalyzeSentimentResponse {
        /// -1.0 (negative) to 1.0 (positive)
        #[prost(float, tag = "1")]
        pub score: f32,
        /// Overall emotional strength, >= 0
        #[prost(float, tag = "2")]
        pub magnitude: f32,
    }
}

use sentiment::{AnalyzeSentimentRequest, AnalyzeSentimentResponse};

const ANALYZE_PATH: &str = "/sentiment.SentimentAnalyzer/AnalyzeSentiment";

/// Default deadline for connect and for each call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors that can occur when talking to the sentiment service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentimentError {
    #[error("Failed to connect to sentiment service: {0}")]
    Connection(String),

    #[error("Sentiment request failed: {0}")]
    Request(String),

    #[error("Invalid response from sentiment service: {0}")]
    InvalidResponse(String),
}

/// Sentiment of a piece of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    /// -1.0 to 1.0
    pub score: f32,
    pub magnitude: f32,
}

impl Sentiment {
    /// Build a sentiment, clamping `score` to [-1, 1] and `magnitude` to >= 0
    pub fn new(score: f32, magnitude: f32) -> Self {
        Self {
            score: score.clamp(-1.0, 1.0),
            magnitude: magnitude.max(0.0),
        }
    }
}

/// Text sentiment analysis
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Sentiment, SentimentError>;
}

/// gRPC client for the sentiment service.
///
/// Cheap to share: each call clones the underlying channel.
#[derive(Clone)]
pub struct GrpcSentimentClient {
    channel: Channel,
    service_addr: String,
}

impl GrpcSentimentClient {
    /// Connect to the sentiment service.
    ///
    /// # Arguments
    /// * `addr` - Address of the gRPC service (e.g., "http://localhost:50052")
    pub async fn connect(addr: impl Into<String>) -> Result<Self, SentimentError> {
        Self::connect_with_timeout(addr, DEFAULT_TIMEOUT).await
    }

    /// Connect with an explicit connect/request deadline
    pub async fn connect_with_timeout(
        addr: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SentimentError> {
        let addr = addr.into();
        info!("Connecting to sentiment service at {}", addr);

        let channel = Self::endpoint(&addr, timeout)?
            .connect()
            .await
            .map_err(|e| {
                error!("Sentiment service unreachable at {}: {}", addr, e);
                SentimentError::Connection(e.to_string())
            })?;

        Ok(Self {
            channel,
            service_addr: addr,
        })
    }

    /// Build a client without dialing; the connection is made on first use
    pub fn connect_lazy(addr: impl Into<String>) -> Result<Self, SentimentError> {
        let addr = addr.into();
        let channel = Self::endpoint(&addr, DEFAULT_TIMEOUT)?.connect_lazy();
        Ok(Self {
            channel,
            service_addr: addr,
        })
    }

    fn endpoint(addr: &str, timeout: Duration) -> Result<Endpoint, SentimentError> {
        Ok(Endpoint::from_shared(addr.to_string())
            .map_err(|e| SentimentError::Connection(format!("invalid address {}: {}", addr, e)))?
            .connect_timeout(timeout)
            .timeout(timeout))
    }

    /// Get the address of the sentiment service this client targets.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}

#[async_trait]
impl SentimentAnalyzer for GrpcSentimentClient {
    async fn analyze(&self, text: &str) -> Result<Sentiment, SentimentError> {
        debug!("Analyzing sentiment of {} chars", text.len());

        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        grpc.ready()
            .await
            .map_err(|e| SentimentError::Connection(e.to_string()))?;

        let request = tonic::Request::new(AnalyzeSentimentRequest {
            text: text.to_string(),
        });
        let codec: tonic::codec::ProstCodec<AnalyzeSentimentRequest, AnalyzeSentimentResponse> =
            tonic::codec::ProstCodec::default();

        let response = grpc
            .unary(request, PathAndQuery::from_static(ANALYZE_PATH), codec)
            .await
            .map_err(|status| {
                error!("gRPC error while analyzing sentiment: {}", status);
                SentimentError::Request(status.to_string())
            })?;

        validate_response(response.into_inner())
    }
}

/// Reject non-finite values, clamp the rest into range
pub fn validate_response(response: AnalyzeSentimentResponse) -> Result<Sentiment, SentimentError> {
    if !response.score.is_finite() || !response.magnitude.is_finite() {
        return Err(SentimentError::InvalidResponse(format!(
            "non-finite sentiment (score {}, magnitude {})",
            response.score, response.magnitude
        )));
    }
    Ok(Sentiment::new(response.score, response.magnitude))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_sentiment_clamps() {
        let s = Sentiment::new(3.5, -1.0);
        assert_eq!(s.score, 1.0);
        assert_eq!(s.magnitude, 0.0);

        let s = Sentiment::new(-7.0, 2.0);
        assert_eq!(s.score, -1.0);
        assert_eq!(s.magnitude, 2.0);
    }

    #[test]
    fn test_validate_response() {
        let ok = validate_response(AnalyzeSentimentResponse {
            score: 0.4,
            magnitude: 1.2,
        })
        .unwrap();
        assert_eq!(ok, Sentiment::new(0.4, 1.2));

        let bad = validate_response(AnalyzeSentimentResponse {
            score: f32::NAN,
            magnitude: 0.0,
        });
        assert!(matches!(bad, Err(SentimentError::InvalidResponse(_))));
    }

    #[test]
    fn test_request_wire_format() {
        let request = AnalyzeSentimentRequest {
            text: "great vibes".to_string(),
        };
        let bytes = request.encode_to_vec();
        let decoded = AnalyzeSentimentRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.text, "great vibes");
    }

    #[test]
    fn test_invalid_address() {
        let result = GrpcSentimentClient::connect_lazy("not a uri");
        assert!(matches!(result, Err(SentimentError::Connection(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let result =
            GrpcSentimentClient::connect_with_timeout("http://127.0.0.1:1", Duration::from_millis(200))
                .await;
        assert!(matches!(result, Err(SentimentError::Connection(_))));
    }
}
