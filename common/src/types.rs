//! レコードの型定義
//!
//! アップロードされる3種類の表データ:
//! - Client: 顧客（バリデーション対象）
//! - Worker: 作業者
//! - Task: タスク
//!
//! ワイヤ上は全フィールドが文字列。数値としての解釈はバリデーション・
//! スコアリング時にだけ行い、解釈結果は保持しない。

use crate::error::{Error, Result};
use crate::schema::TableRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// パーサーが返す1行分の生データ（ヘッダー名 → セル文字列、列順を保持）
pub type RawRow = IndexMap<String, String>;

/// 表の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Clients,
    Workers,
    Tasks,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [TableKind::Clients, TableKind::Workers, TableKind::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Clients => "clients",
            TableKind::Workers => "workers",
            TableKind::Tasks => "tasks",
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            TableKind::Clients => "Clients",
            TableKind::Workers => "Workers",
            TableKind::Tasks => "Tasks",
        }
    }

    /// ルールに使えるフィールド名（スキーマ順）
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            TableKind::Clients => Client::fields(),
            TableKind::Workers => Worker::fields(),
            TableKind::Tasks => Task::fields(),
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clients" | "client" => Ok(TableKind::Clients),
            "workers" | "worker" => Ok(TableKind::Workers),
            "tasks" | "task" => Ok(TableKind::Tasks),
            _ => Err(format!("Unknown table: {}. Use clients, workers, or tasks", s)),
        }
    }
}

/// 顧客
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ClientID", default, deserialize_with = "lenient::string")]
    pub client_id: String,

    #[serde(rename = "ClientName", default, deserialize_with = "lenient::string")]
    pub client_name: String,

    /// "1"〜"5"
    #[serde(rename = "PriorityLevel", default, deserialize_with = "lenient::string")]
    pub priority_level: String,

    /// 例: "T001,T002"
    #[serde(
        rename = "RequestedTaskIDs",
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub requested_task_ids: Option<String>,

    /// 例: '{"region":"north"}'
    #[serde(
        rename = "AttributesJSON",
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub attributes_json: Option<String>,
}

/// 作業者
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "WorkerID", default, deserialize_with = "lenient::string")]
    pub worker_id: String,

    #[serde(rename = "WorkerName", default, deserialize_with = "lenient::string")]
    pub worker_name: String,

    /// カンマ区切り 例: "Plumbing,Painting"
    #[serde(rename = "Skills", default, deserialize_with = "lenient::string")]
    pub skills: String,

    #[serde(rename = "AvailableSlots", default, deserialize_with = "lenient::string")]
    pub available_slots: String,

    #[serde(rename = "MaxLoadPerPhase", default, deserialize_with = "lenient::string")]
    pub max_load_per_phase: String,
}

/// タスク
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "TaskID", default, deserialize_with = "lenient::string")]
    pub task_id: String,

    #[serde(rename = "TaskName", default, deserialize_with = "lenient::string")]
    pub task_name: String,

    #[serde(rename = "Category", default, deserialize_with = "lenient::string")]
    pub category: String,

    #[serde(rename = "Duration", default, deserialize_with = "lenient::string")]
    pub duration: String,

    /// カンマ区切り 例: "Welding,Carpentry"
    #[serde(rename = "RequiredSkills", default, deserialize_with = "lenient::string")]
    pub required_skills: String,

    /// カンマ区切りの数値 例: "1,2,3"
    #[serde(rename = "PreferredPhases", default, deserialize_with = "lenient::string")]
    pub preferred_phases: String,

    #[serde(rename = "MaxConcurrent", default, deserialize_with = "lenient::string")]
    pub max_concurrent: String,
}

/// 種類ごとのレコード集合
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Clients(Vec<Client>),
    Workers(Vec<Worker>),
    Tasks(Vec<Task>),
}

impl Records {
    pub fn kind(&self) -> TableKind {
        match self {
            Records::Clients(_) => TableKind::Clients,
            Records::Workers(_) => TableKind::Workers,
            Records::Tasks(_) => TableKind::Tasks,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Clients(r) => r.len(),
            Records::Workers(r) => r.len(),
            Records::Tasks(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// パーサーの生データから型付きレコードへ変換
    pub fn from_rows(kind: TableKind, rows: Vec<RawRow>) -> Result<Self> {
        let values = rows
            .into_iter()
            .map(|row| {
                Value::Object(
                    row.into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                )
            })
            .collect();
        Self::from_json(kind, values)
    }

    /// JSON値の配列から型付きレコードへ変換
    pub fn from_json(kind: TableKind, values: Vec<Value>) -> Result<Self> {
        Ok(match kind {
            TableKind::Clients => Records::Clients(decode(values)?),
            TableKind::Workers => Records::Workers(decode(values)?),
            TableKind::Tasks => Records::Tasks(decode(values)?),
        })
    }

    /// ワイヤ形式（JSONオブジェクトの配列）へ変換
    pub fn to_json(&self) -> Result<Vec<Value>> {
        match self {
            Records::Clients(r) => encode(r),
            Records::Workers(r) => encode(r),
            Records::Tasks(r) => encode(r),
        }
    }
}

fn decode<R: TableRecord>(values: Vec<Value>) -> Result<Vec<R>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|e| Error::Decode {
                kind: R::KIND,
                message: format!("row {}: {}", index + 1, e),
            })
        })
        .collect()
}

fn encode<R: TableRecord>(records: &[R]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|r| serde_json::to_value(r).map_err(Error::from))
        .collect()
}

/// 外部ソース（AIサービス等）の値を文字列として受け入れるデシリアライザ
///
/// 数値・真偽値は文字列化、nullは未設定扱い、スカラー配列はカンマ連結。
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn stringify(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(stringify)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            object @ Value::Object(_) => Some(object.to_string()),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .and_then(stringify)
            .unwrap_or_default())
    }

    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?.and_then(stringify))
    }
}
