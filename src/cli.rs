use clap::{Parser, Subcommand};
use data_alchemist_common::{Rule, TableKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "data-alchemist")]
#[command(about = "表データ（顧客・作業者・タスク）の検証・ルールスコアリング・自然言語フィルタ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 顧客ファイルを検証してエラー行を表示
    Validate {
        /// 顧客ファイル (csv/xlsx)
        #[arg(required = true)]
        input: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// ルールでスコアリングして絞り込む
    Score {
        /// 入力ファイル (csv/xlsx)
        #[arg(required = true)]
        input: PathBuf,

        /// 表の種類 (clients/workers/tasks)
        #[arg(short, long, default_value = "clients")]
        kind: TableKind,

        /// ルール（Field:op:value[:weight]、複数指定可）
        #[arg(short, long = "rule", required = true)]
        rules: Vec<Rule>,

        /// 出力ファイル (.csv/.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 自然言語で絞り込む（外部サービス）
    Query {
        /// 入力ファイル (csv/xlsx)
        #[arg(required = true)]
        input: PathBuf,

        /// 問い合わせ文 例: "workers skilled in Plumbing"
        #[arg(required = true)]
        text: String,

        /// 表の種類 (clients/workers/tasks)
        #[arg(short, long, default_value = "clients")]
        kind: TableKind,

        /// クエリサービスのURL（設定より優先）
        #[arg(long)]
        endpoint: Option<String>,

        /// 出力ファイル (.csv/.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// ルールに使えるフィールドを表示
    Fields {
        /// 表の種類 (clients/workers/tasks)
        #[arg(short, long, default_value = "clients")]
        kind: TableKind,
    },

    /// 設定を表示/編集
    Config {
        /// クエリサービスのURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// ルールの事前チェック結果
#[derive(Debug, Clone, PartialEq)]
pub enum RuleCheck {
    /// 追加できる（警告があれば表示する）
    Accepted { warnings: Vec<String> },
    /// 不完全なため追加しない
    Rejected(String),
}

/// `score` に渡されたルールを確認
pub fn check_rule(kind: TableKind, rule: &Rule) -> RuleCheck {
    if !rule.is_complete() {
        return RuleCheck::Rejected(format!(
            "{} は無効なルールのため無視します（フィールド・値が必要、重みは0より大きい数）",
            rule
        ));
    }

    let mut warnings = Vec::new();
    if !kind.fields().contains(&rule.field.as_str()) {
        warnings.push(format!(
            "{} に {} フィールドはありません（スコア0）",
            kind.label(),
            rule.field
        ));
    }
    RuleCheck::Accepted { warnings }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(format!("Unknown format: {}. Use csv or xlsx", s)),
        }
    }
}
