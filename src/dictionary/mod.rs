//! 薬剤辞書モジュール
//!
//! CSVの `Drug Name` 列から正規の薬剤名リストを読み込む。
//! 行の順序は維持し、重複もそのまま保持する（照合は先頭優先のため）。

use crate::error::{PrescAiError, Result};
use std::path::Path;

const DRUG_NAME_COLUMN: &str = "Drug Name";

/// 薬剤辞書CSVを読み込む
///
/// ヘッダ行の `Drug Name` 列を探し、各行の値をトリムして返す。
/// 空欄はスキップする。
pub fn load_dictionary(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(PrescAiError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == DRUG_NAME_COLUMN)
        .ok_or_else(|| {
            PrescAiError::InvalidDictionary(format!(
                "ヘッダに『{}』列がありません: {}",
                DRUG_NAME_COLUMN,
                path.display()
            ))
        })?;

    let mut medicines = Vec::new();

    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(column) {
            let value = value.trim();
            if !value.is_empty() {
                medicines.push(value.to_string());
            }
        }
    }

    Ok(medicines)
}
