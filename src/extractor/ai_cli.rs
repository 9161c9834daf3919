//! AI CLI連携モジュール
//!
//! 2段階読解処理:
//! - Step1 (Vision): 処方箋画像から手書きテキストを転記
//! - Step2 (Text): 転記テキストから薬剤名リストを抽出
//!
//! どちらもAI CLI（claude/codex/gemini）のサブプロセス呼び出し。

use crate::ai_provider::AiProvider;
use crate::error::{PrescAiError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// Step1プロンプト生成（画像転記用）
pub fn build_ocr_prompt(image_path: &Path) -> String {
    format!(
        r#"次の画像ファイルを読み込んでください: {}

あなたは手書き処方箋の読解専門家です。画像に書かれているテキストを、手書き文字も含めてできる限り正確にそのまま転記してください。

## 注意
- 見えるテキストだけを転記し、推測で補完しない
- 判読不能な箇所は [判読不能] と記載
- 転記したテキストのみ出力。説明文は不要"#,
        image_path.display()
    )
}

/// Step2プロンプト生成（薬剤名抽出用）
pub fn build_extract_prompt(ocr_text: &str) -> String {
    format!(
        r#"あなたは手書き処方箋の読解専門家です。以下のOCRテキストから薬剤名のみを抽出してください。

## 注意
- 薬剤名を1行に1つ、改行区切りで出力
- 用量・用法・コメントは含めない
- 薬剤名が見つからない場合は何も出力しない
- リスト記号や番号は付けない

OCRテキスト:

{}"#,
        ocr_text
    )
}

/// AI CLIを実行してレスポンス文字列を取得
pub async fn run_ai_cli(
    provider: AiProvider,
    prompt: &str,
    timeout_seconds: u64,
    verbose: bool,
) -> Result<String> {
    // 改行をスペースに置換してcmd経由でも渡せる形にする
    let flat_prompt = prompt.replace('\n', " ").replace('"', "\\\"");

    if verbose {
        println!("  [{}] プロンプト長: {} chars", provider, flat_prompt.len());
    }

    let mut command = build_command(provider, &flat_prompt);

    let output = timeout(Duration::from_secs(timeout_seconds), command.output())
        .await
        .map_err(|_| {
            PrescAiError::ApiCall(format!(
                "{} CLIがタイムアウトしました（{}秒）",
                provider, timeout_seconds
            ))
        })?
        .map_err(|e| PrescAiError::ApiCall(format!("{} CLI実行エラー: {}", provider, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrescAiError::ApiCall(format!(
            "{} CLI failed (code {:?}): {}",
            provider.command_name(),
            output.status.code(),
            stderr
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();

    if verbose {
        let preview: String = response.chars().take(500).collect();
        println!("  レスポンス: {}", preview);
    }

    Ok(response)
}

fn build_command(provider: AiProvider, prompt: &str) -> Command {
    #[cfg(windows)]
    {
        let mut command = Command::new("cmd");
        command.args(["/c", provider.command_name()]);
        for arg in provider_args(provider, prompt) {
            command.arg(arg);
        }
        command
    }

    #[cfg(not(windows))]
    {
        let mut command = Command::new(provider.command_name());
        for arg in provider_args(provider, prompt) {
            command.arg(arg);
        }
        command
    }
}

fn provider_args(provider: AiProvider, prompt: &str) -> Vec<String> {
    match provider {
        AiProvider::Claude => vec![
            "-p".to_string(),
            prompt.to_string(),
            "--output-format".to_string(),
            "text".to_string(),
        ],
        AiProvider::Codex => vec!["exec".to_string(), prompt.to_string()],
        AiProvider::Gemini => vec!["-p".to_string(), prompt.to_string()],
    }
}

/// Step2レスポンスを薬剤名リストにパース
///
/// 改行で分割し、リスト記号・番号・コードフェンスを除去してトリム。
/// 空行は捨てる。AIが指示を無視して付けた装飾に耐えるための処理。
pub fn parse_name_list(response: &str) -> Vec<String> {
    lazy_static! {
        static ref BULLET_RE: Regex = Regex::new(r"^(?:[-*・]|\d+[.)、])\s*").unwrap();
    }

    response
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(|line| BULLET_RE.replace(line, "").trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
