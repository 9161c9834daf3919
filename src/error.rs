use thiserror::Error;

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum PrescAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`presc-ai config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("AI CLI呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("AIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("薬剤辞書が不正: {0}")]
    InvalidDictionary(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("CSV読み込みエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PrescAiError>;
