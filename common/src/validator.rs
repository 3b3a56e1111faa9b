//! 顧客データのバリデーション
//!
//! 行ごとに独立してチェックし、問題のある行だけを
//! `行番号(0始まり) → メッセージ一覧` の疎なマップで返す。
//! バリデーションは助言的で、行の削除や修正は行わない。

use crate::types::Client;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

/// 1行に対する指摘
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientIssue {
    MissingClientId,
    DuplicateClientId,
    MissingClientName,
    InvalidPriority,
    MalformedRequestedTaskIds,
    InvalidAttributesJson,
}

impl ClientIssue {
    pub fn message(&self) -> &'static str {
        match self {
            ClientIssue::MissingClientId => "Missing ClientID",
            ClientIssue::DuplicateClientId => "Duplicate ClientID",
            ClientIssue::MissingClientName => "Missing ClientName",
            ClientIssue::InvalidPriority => "Invalid Priority (1-5)",
            ClientIssue::MalformedRequestedTaskIds => "Malformed RequestedTaskIDs",
            ClientIssue::InvalidAttributesJson => "Invalid JSON in AttributesJSON",
        }
    }
}

impl std::fmt::Display for ClientIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for ClientIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

/// 行番号 → 指摘一覧（問題のない行は含まない）
pub type ValidationErrors = BTreeMap<usize, Vec<ClientIssue>>;

const PRIORITY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// 顧客一覧を検証
pub fn validate_clients(clients: &[Client]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for (index, client) in clients.iter().enumerate() {
        let mut issues = Vec::new();

        // 重複判定は入力そのままの値で比較する
        if client.client_id.trim().is_empty() {
            issues.push(ClientIssue::MissingClientId);
        } else if !seen_ids.insert(client.client_id.as_str()) {
            issues.push(ClientIssue::DuplicateClientId);
        }

        if client.client_name.trim().is_empty() {
            issues.push(ClientIssue::MissingClientName);
        }

        if !is_valid_priority(&client.priority_level) {
            issues.push(ClientIssue::InvalidPriority);
        }

        if let Some(ids) = client.requested_task_ids.as_deref() {
            if is_malformed_id_list(ids) {
                issues.push(ClientIssue::MalformedRequestedTaskIds);
            }
        }

        if let Some(json) = client.attributes_json.as_deref() {
            if !json.trim().is_empty()
                && serde_json::from_str::<serde_json::Value>(json).is_err()
            {
                issues.push(ClientIssue::InvalidAttributesJson);
            }
        }

        if !issues.is_empty() {
            errors.insert(index, issues);
        }
    }

    errors
}

fn is_valid_priority(value: &str) -> bool {
    value
        .trim()
        .parse::<i64>()
        .map(|p| PRIORITY_RANGE.contains(&p))
        .unwrap_or(false)
}

/// 空文字は未指定扱い。空白のみ・空要素を含む場合は不正
fn is_malformed_id_list(value: &str) -> bool {
    !value.is_empty() && value.split(',').any(|id| id.trim().is_empty())
}

/// 表示用サマリー（"Row 2: Missing ClientID, Invalid Priority (1-5)"、行番号は1始まり）
pub fn summarize(errors: &ValidationErrors) -> Vec<String> {
    errors
        .iter()
        .map(|(index, issues)| {
            let messages: Vec<&str> = issues.iter().map(|i| i.message()).collect();
            format!("Row {}: {}", index + 1, messages.join(", "))
        })
        .collect()
}
