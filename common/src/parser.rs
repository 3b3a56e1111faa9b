//! 自然言語クエリサービスのレスポンスパーサー
//!
//! サービスは `{ "filtered": [...] }` を返す。AIの出力をそのまま中継する
//! 実装ではコードブロックや前置きの文章が付くことがあるため、
//! JSON部分を抽出してからパースする。

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// レスポンス本文からJSONオブジェクト部分を取り出す
///
/// コードフェンス（```json または ```）の中身を優先し、
/// なければ最初の `{` から最後の `}` までを返す。
///
/// # Examples
/// ```
/// use data_alchemist_common::extract_json;
///
/// let response = "Result: {\"filtered\": []}";
/// assert_eq!(extract_json(response).unwrap(), "{\"filtered\": []}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(fenced) = fenced_block(response) {
        return Ok(fenced);
    }

    match (response.find('{'), response.rfind('}')) {
        (Some(open), Some(close)) if open < close => Ok(&response[open..=close]),
        _ => Err(Error::Parse("JSONが見つかりません".into())),
    }
}

/// フェンス内の本文（言語タグは読み飛ばす）
fn fenced_block(response: &str) -> Option<&str> {
    const FENCE: &str = "```";

    let after_open = &response[response.find(FENCE)? + FENCE.len()..];
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_open[body_start..];
    let inner = body[..body.find(FENCE)?].trim();

    inner.starts_with('{').then_some(inner)
}

#[derive(Deserialize)]
struct QueryReply {
    filtered: Vec<Value>,
}

/// クエリサービスのレスポンスから `filtered` のレコード配列を取り出す
pub fn parse_query_response(response: &str) -> Result<Vec<Value>> {
    let body = response.trim();
    let reply: QueryReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(_) => serde_json::from_str(extract_json(body)?.trim())
            .map_err(|e| Error::Parse(format!("filtered の取得に失敗: {}", e)))?,
    };
    Ok(reply.filtered)
}
