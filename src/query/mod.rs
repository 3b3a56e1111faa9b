//! 自然言語クエリアダプタ
//!
//! 問い合わせ文・対象テーブルの全レコード・テーブル種別を外部サービスへ送り、
//! 返ってきた `filtered` をそのまま新しい表示対象にする。
//! 文の解釈は外部サービスに任せ、こちらでは再解釈しない。
//!
//! 解釈部分は [`Interpreter`] トレイトで差し替え可能（本番はHTTP、テストはフェイク）。

pub mod http;

pub use http::HttpInterpreter;

use crate::error::Result;
use async_trait::async_trait;
use data_alchemist_common::{Records, TableKind};
use serde::Serialize;
use serde_json::Value;

/// サービスへのリクエスト（ワイヤ形式）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub data: Vec<Value>,
    pub target: TableKind,
}

impl QueryRequest {
    /// 問い合わせ文が空白のみなら None
    pub fn new(text: &str, records: &Records) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            query: text.to_string(),
            data: records.to_json()?,
            target: records.kind(),
        }))
    }
}

/// 問い合わせ文の解釈（外部サービス）
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// フィルタ済みレコード（JSONオブジェクト）を返す
    async fn interpret(&self, request: &QueryRequest) -> Result<Vec<Value>>;
}

/// 発行済みクエリの識別子（テーブル種別＋通し番号）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket {
    pub kind: TableKind,
    pub sequence: u64,
}

/// 発行済み・未解決のクエリ
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub ticket: QueryTicket,
    pub text: String,
    pub records: Records,
}

/// 解決済みクエリ
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub ticket: QueryTicket,
    pub filtered: Records,
}

pub struct QueryAdapter<I> {
    interpreter: I,
}

impl<I: Interpreter> QueryAdapter<I> {
    pub fn new(interpreter: I) -> Self {
        Self { interpreter }
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    /// 問い合わせを実行してフィルタ済みレコードを返す
    ///
    /// 空白のみの問い合わせはリクエストを送らず `Ok(None)`。
    pub async fn query(&self, text: &str, records: &Records) -> Result<Option<Records>> {
        match QueryRequest::new(text, records)? {
            Some(request) => self.send(&request).await.map(Some),
            None => {
                tracing::debug!(kind = %records.kind(), "blank query ignored");
                Ok(None)
            }
        }
    }

    /// 発行済みクエリを解決
    pub async fn resolve(&self, pending: PendingQuery) -> Result<QueryOutcome> {
        let ticket = pending.ticket;
        let request = QueryRequest {
            query: pending.text,
            data: pending.records.to_json()?,
            target: ticket.kind,
        };

        let filtered = self.send(&request).await?;
        Ok(QueryOutcome { ticket, filtered })
    }

    async fn send(&self, request: &QueryRequest) -> Result<Records> {
        tracing::info!(
            kind = %request.target,
            rows = request.data.len(),
            query = %request.query,
            "sending natural-language query"
        );

        let values = self.interpreter.interpret(request).await.map_err(|e| {
            tracing::warn!(kind = %request.target, error = %e, "natural-language query failed");
            e
        })?;

        let filtered = Records::from_json(request.target, values)?;
        tracing::info!(kind = %request.target, rows = filtered.len(), "query answered");
        Ok(filtered)
    }
}
