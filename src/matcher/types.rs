use serde::{Deserialize, Serialize};

/// 照合結果
///
/// 抽出名1件につき必ず1件生成される。`matched` が `Some` のとき
/// その値は辞書のエントリそのものであり、棄却時はスコアを0に落とす。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub extracted: String,

    #[serde(default)]
    pub matched: Option<String>,

    #[serde(default)]
    pub score: u8,
}
