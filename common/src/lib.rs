//! Data Alchemist Common Library
//!
//! レコードスキーマ・バリデーション・ルールスコアリング（I/Oを持たない純粋な処理）

pub mod error;
pub mod parser;
pub mod rules;
pub mod schema;
pub mod scoring;
pub mod types;
pub mod validator;

pub use error::{Error, Result};
pub use parser::{extract_json, parse_query_response};
pub use rules::{Operator, Rule, RuleSet};
pub use schema::{FieldAccessors, TableRecord};
pub use scoring::{record_score, score, Scored};
pub use types::{Client, RawRow, Records, TableKind, Task, Worker};
pub use validator::{summarize, validate_clients, ClientIssue, ValidationErrors};
