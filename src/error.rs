use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlchemistError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("クエリサービスのURLが設定されていません。`data-alchemist config --set-endpoint URL` で設定してください")]
    MissingEndpoint,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("unsupported file type: {0}（対応形式: csv, xlsx, xlsm, xls, ods）")]
    UnsupportedFileType(String),

    #[error("CSV読み込みエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("クエリ失敗 (HTTP {status}): {body}")]
    QueryFailed { status: u16, body: String },

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("クエリレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] data_alchemist_common::Error),
}

pub type Result<T> = std::result::Result<T, AlchemistError>;
