// Copyright (c) Starcoin, Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory JSON-RPC provider for tests.
//!
//! Responses are registered per `(method, params)` pair with
//! [`EthMockProvider::add_response`]; an unregistered call fails the same
//! way a dead transport would, which the failure-path tests rely on.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::providers::{JsonRpcClient, JsonRpcError, ProviderError, RpcError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error(transparent)]
    JsonRpcError(#[from] JsonRpcError),

    #[error("no mocked response registered for {0}")]
    EmptyResponses(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl RpcError for MockError {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        match self {
            MockError::JsonRpcError(e) => Some(e),
            _ => None,
        }
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        match self {
            MockError::SerdeJson(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MockError> for ProviderError {
    fn from(src: MockError) -> Self {
        ProviderError::JsonRpcClientError(Box::new(src))
    }
}

#[derive(Clone, Debug, Default)]
pub struct EthMockProvider {
    responses: Arc<Mutex<HashMap<(String, String), Value>>>,
}

#[async_trait]
impl JsonRpcClient for EthMockProvider {
    type Error = MockError;

    async fn request<T: Serialize + Send + Sync, R: DeserializeOwned>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, MockError> {
        let params = serde_json::to_string(&params)?;
        let value = self
            .responses
            .lock()
            .unwrap()
            .get(&(method.to_owned(), params))
            .cloned()
            .ok_or_else(|| MockError::EmptyResponses(method.to_owned()))?;
        Ok(serde_json::from_value(value)?)
    }
}

impl EthMockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the response for a `(method, params)` pair.
    /// Register `serde_json::Value::Null` to simulate a null RPC body.
    pub fn add_response<T: Serialize + Send + Sync, K: Borrow<V>, V: Serialize>(
        &self,
        method: &str,
        params: T,
        data: K,
    ) -> Result<(), serde_json::Error> {
        let params = serde_json::to_string(&params)?;
        let value = serde_json::to_value(data.borrow())?;
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_owned(), params), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::providers::Provider;

    #[tokio::test]
    async fn test_registered_response_is_returned() {
        let mock_provider = EthMockProvider::new();
        mock_provider.add_response("eth_foo", (), 42u64).unwrap();

        let value: u64 = mock_provider.request("eth_foo", ()).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_unregistered_call_errors() {
        let mock_provider = EthMockProvider::new();
        let error = mock_provider
            .request::<_, u64>("eth_foo", ())
            .await
            .unwrap_err();
        assert!(matches!(error, MockError::EmptyResponses(_)));
    }

    #[tokio::test]
    async fn test_null_response_deserializes_to_none() {
        let mock_provider = EthMockProvider::new();
        mock_provider
            .add_response("eth_foo", (), Value::Null)
            .unwrap();

        let value: Option<u64> = mock_provider.request("eth_foo", ()).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_works_behind_provider() {
        let mock_provider = EthMockProvider::new();
        mock_provider.add_response("eth_foo", (), 7u64).unwrap();
        let provider = Provider::new(mock_provider);

        let value: u64 = provider.request("eth_foo", ()).await.unwrap();
        assert_eq!(value, 7);
    }
}
