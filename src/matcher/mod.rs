//! 薬剤名あいまい照合モジュール
//!
//! 抽出された薬剤名を薬剤辞書の正規名に対応付ける。
//! 類似度はトークンソート比率（トークンを整列してから
//! 正規化レーベンシュタイン距離を0〜100に換算）で計算する。

mod types;

pub use types::MatchResult;

use strsim::normalized_levenshtein;

/// デフォルトの照合閾値
pub const DEFAULT_THRESHOLD: u8 = 80;

/// トークンソート比率（0〜100）
///
/// 小文字化して空白区切りトークンを整列し、連結した文字列同士の
/// 正規化レーベンシュタイン類似度を整数スコアに丸める。
/// 語順の違いはスコアに影響しない。
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let ratio = normalized_levenshtein(&token_sort_key(a), &token_sort_key(b));
    (ratio * 100.0).round() as u8
}

fn token_sort_key(s: &str) -> String {
    let mut tokens: Vec<String> = s
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// 抽出名リストを辞書と照合する
///
/// 各抽出名に対して辞書全エントリのスコアを計算し、最高スコアの
/// エントリを選ぶ。同点は辞書の先頭側を優先する。最高スコアが
/// `threshold` 未満なら該当なし（スコア0）として返す。
///
/// 純粋関数であり、入力順どおりに抽出名1件につき結果を1件返す。
/// 辞書が空の場合は全件該当なしになる。
pub fn match_names(
    candidates: &[String],
    reference: &[String],
    threshold: u8,
) -> Vec<MatchResult> {
    candidates
        .iter()
        .map(|name| {
            let mut best: Option<(&String, u8)> = None;

            for entry in reference {
                let score = token_sort_ratio(name, entry);
                // 同点は先に現れたエントリを維持
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((entry, score));
                }
            }

            match best {
                Some((entry, score)) if score >= threshold => MatchResult {
                    extracted: name.clone(),
                    matched: Some(entry.clone()),
                    score,
                },
                _ => MatchResult {
                    extracted: name.clone(),
                    matched: None,
                    score: 0,
                },
            }
        })
        .collect()
}
