use serde::{Deserialize, Serialize};

/// 処方箋画像1枚の抽出結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub file_name: String,

    #[serde(default)]
    pub file_path: String,

    /// 画像から読み取った生テキスト
    #[serde(default)]
    pub ocr_text: String,

    /// 抽出された薬剤名（改行区切りリストのパース結果）
    #[serde(default)]
    pub names: Vec<String>,
}
