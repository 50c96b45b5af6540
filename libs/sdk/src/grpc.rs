//! gRPC client for a remote `EventService`.

use async_trait::async_trait;
use eventapi_events::PushEventRequest;
use eventapi_proto::event::v1::{self as pb, PushEventResponse};
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Response, Status};
use tracing::debug;

use crate::config::GrpcClientConfig;
use crate::error::SdkError;
use crate::namespace::Namespace;
use crate::service::EventService;

/// Pushes events to a remote service over gRPC.
///
/// Cheap to clone; clones share the underlying channel.
#[derive(Debug, Clone)]
pub struct GrpcEventServiceClient {
    inner: tonic::client::Grpc<Channel>,
    namespace: Namespace,
}

impl GrpcEventServiceClient {
    pub fn new(channel: Channel, namespace: Namespace) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
            namespace,
        }
    }

    /// Connects eagerly to the configured endpoint.
    pub async fn connect(config: &GrpcClientConfig) -> Result<Self, SdkError> {
        let channel = Self::endpoint(config)?.connect().await?;
        Ok(Self::new(channel, config.namespace))
    }

    /// Builds a client whose channel connects on first use.
    pub fn connect_lazy(config: &GrpcClientConfig) -> Result<Self, SdkError> {
        let channel = Self::endpoint(config)?.connect_lazy();
        Ok(Self::new(channel, config.namespace))
    }

    fn endpoint(config: &GrpcClientConfig) -> Result<Endpoint, SdkError> {
        Ok(Channel::from_shared(config.url.clone())
            .map_err(|e| SdkError::Transport(format!("invalid url {}: {e}", config.url)))?
            .timeout(config.timeout))
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }
}

#[async_trait]
impl EventService for GrpcEventServiceClient {
    async fn push_event(
        &self,
        request: Request<PushEventRequest>,
    ) -> Result<Response<PushEventResponse>, Status> {
        let mut inner = self.inner.clone();
        inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("service was not ready: {e}")))?;

        debug!(
            event.id = %request.get_ref().event.id(),
            service = self.namespace.service_name(),
            "pushing event over gRPC"
        );

        let path = PathAndQuery::from_static(self.namespace.push_event_path());
        let codec = ProstCodec::<pb::PushEventRequest, pb::PushEventResponse>::default();
        inner
            .unary(request.map(pb::PushEventRequest::from), path, codec)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use eventapi_events::Event;

    use super::*;

    #[test]
    fn test_invalid_url_is_transport_error() {
        let config = GrpcClientConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        let err = GrpcEventServiceClient::connect_lazy(&config).unwrap_err();
        assert!(matches!(err, SdkError::Transport(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_fails() {
        let config = GrpcClientConfig {
            url: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(1),
            namespace: Namespace::Connect,
        };
        let client = GrpcEventServiceClient::connect_lazy(&config).unwrap();
        assert_eq!(client.namespace(), Namespace::Connect);

        let result = client
            .push_event(Request::new(PushEventRequest::new(Event::new())))
            .await;
        assert!(result.is_err());
    }
}
