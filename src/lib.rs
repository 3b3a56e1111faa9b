//! data-alchemist
//!
//! 顧客・作業者・タスクの表データを読み込み、検証・ルールスコアリング・
//! 自然言語クエリで絞り込み、CSV/Excelへ書き出す。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod query;
pub mod session;

pub use error::{AlchemistError, Result};
pub use query::{HttpInterpreter, Interpreter, QueryAdapter, QueryRequest};
pub use session::{Session, Table, View};
