//! HTTP経由の自然言語クエリサービス
//!
//! `POST {endpoint}` に `{ query, data, target }` を送り、`{ filtered: [...] }` を受け取る。

use super::{Interpreter, QueryRequest};
use crate::config::Config;
use crate::error::{AlchemistError, Result};
use async_trait::async_trait;
use data_alchemist_common::parse_query_response;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("data-alchemist/", env!("CARGO_PKG_VERSION"));

pub struct HttpInterpreter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpInterpreter {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// 設定（環境変数を含む）から作成
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.endpoint()?,
            config.api_key(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Interpreter for HttpInterpreter {
    async fn interpret(&self, request: &QueryRequest) -> Result<Vec<Value>> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "query service responded");

        if !status.is_success() {
            tracing::warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "query service returned an error status"
            );
            return Err(AlchemistError::QueryFailed {
                status: status.as_u16(),
                body,
            });
        }

        parse_query_response(&body).map_err(|e| AlchemistError::ApiParse(e.to_string()))
    }
}
