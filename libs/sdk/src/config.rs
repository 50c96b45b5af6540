//! Adapter configuration (env-driven).

use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::SdkError;
use crate::namespace::Namespace;

pub const ENV_PUBSUB_PROJECT: &str = "EVENTAPI_PUBSUB_PROJECT";
pub const ENV_PUBSUB_TOPIC: &str = "EVENTAPI_PUBSUB_TOPIC";
pub const ENV_GRPC_URL: &str = "EVENTAPI_GRPC_URL";
pub const ENV_GRPC_TIMEOUT_SECS: &str = "EVENTAPI_GRPC_TIMEOUT_SECS";
pub const ENV_NAMESPACE: &str = "EVENTAPI_NAMESPACE";

/// Where a [`crate::PubsubServiceClient`] publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PubsubServiceClientConfig {
    /// Cloud project that owns the topic.
    pub project: String,

    /// Topic id within the project.
    pub topic: String,
}

impl PubsubServiceClientConfig {
    pub fn new(project: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            topic: topic.into(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            project: lookup(ENV_PUBSUB_PROJECT).unwrap_or_default(),
            topic: lookup(ENV_PUBSUB_TOPIC).unwrap_or_default(),
        };
        config
            .validate()
            .with_context(|| format!("Set {ENV_PUBSUB_PROJECT} and {ENV_PUBSUB_TOPIC}."))?;
        Ok(config)
    }

    /// Project is checked before topic.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.project.is_empty() {
            return Err(SdkError::MissingConfiguration("project"));
        }
        if self.topic.is_empty() {
            return Err(SdkError::MissingConfiguration("topic"));
        }
        Ok(())
    }

    /// Fully-qualified topic name, `projects/{project}/topics/{topic}`.
    pub fn topic_path(&self) -> String {
        format!("projects/{}/topics/{}", self.project, self.topic)
    }
}

/// Settings for a [`crate::GrpcEventServiceClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpcClientConfig {
    /// Base URL of the event service (example: http://localhost:50051).
    pub url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Package the remote service is published under.
    pub namespace: Namespace,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:50051".to_string(),
            timeout: Duration::from_secs(30),
            namespace: Namespace::default(),
        }
    }
}

impl GrpcClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let url = lookup(ENV_GRPC_URL).unwrap_or(defaults.url);

        let timeout_secs: u64 = lookup(ENV_GRPC_TIMEOUT_SECS)
            .map(|v| v.parse())
            .transpose()
            .with_context(|| format!("{ENV_GRPC_TIMEOUT_SECS} must be an integer (seconds)."))?
            .unwrap_or(defaults.timeout.as_secs());

        let namespace = lookup(ENV_NAMESPACE)
            .map(|v| v.parse::<Namespace>())
            .transpose()
            .with_context(|| format!("{ENV_NAMESPACE} must be `cloud` or `connect`."))?
            .unwrap_or(defaults.namespace);

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            namespace,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_pubsub_config_from_lookup() {
        let config = PubsubServiceClientConfig::from_lookup(lookup(&[
            (ENV_PUBSUB_PROJECT, "acme"),
            (ENV_PUBSUB_TOPIC, "orders"),
        ]))
        .unwrap();
        assert_eq!(config, PubsubServiceClientConfig::new("acme", "orders"));
        assert_eq!(config.topic_path(), "projects/acme/topics/orders");
    }

    #[test]
    fn test_pubsub_config_requires_project_first() {
        let err = PubsubServiceClientConfig::default().validate().unwrap_err();
        assert!(matches!(err, SdkError::MissingConfiguration("project")));

        let err = PubsubServiceClientConfig::new("acme", "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, SdkError::MissingConfiguration("topic")));

        assert!(PubsubServiceClientConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_grpc_config_defaults() {
        let config = GrpcClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GrpcClientConfig::default());
    }

    #[test]
    fn test_grpc_config_overrides() {
        let config = GrpcClientConfig::from_lookup(lookup(&[
            (ENV_GRPC_URL, "http://events:8080"),
            (ENV_GRPC_TIMEOUT_SECS, "5"),
            (ENV_NAMESPACE, "connect"),
        ]))
        .unwrap();
        assert_eq!(config.url, "http://events:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.namespace, Namespace::Connect);
    }

    #[test]
    fn test_grpc_config_rejects_bad_values() {
        assert!(GrpcClientConfig::from_lookup(lookup(&[(ENV_GRPC_TIMEOUT_SECS, "soon")])).is_err());
        assert!(GrpcClientConfig::from_lookup(lookup(&[(ENV_NAMESPACE, "grpc")])).is_err());
    }
}
