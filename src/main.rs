use clap::Parser;
use presc_ai_rust::{cli, config, dictionary, error, extractor, matcher, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use matcher::MatchResult;
use std::path::{Path, PathBuf};

/// 画像1枚分の照合レポート
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct MatchReport {
    file_name: String,
    results: Vec<MatchResult>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Run { input, dictionary: dict_path, threshold, output, use_cache } => {
            println!("💊 presc-ai - 処方箋読解・薬剤照合\n");

            // 1. 画像スキャン
            println!("[1/4] 処方箋画像をスキャン中...");
            let images = scanner::scan_input(&input)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(error::PrescAiError::NoImagesFound(
                    input.display().to_string()
                ));
            }

            // 2. AI読解
            println!("[2/4] AI読解中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let extractions = if use_cache {
                let folder = cache_folder(&input);
                extractor::extract_images_with_cache(&images, &folder, cli.ai_provider, &config, cli.verbose).await?
            } else {
                extractor::extract_images(&images, cli.ai_provider, &config, cli.verbose).await?
            };
            println!("✔ 読解完了\n");

            // 3. 薬剤辞書読み込み
            println!("[3/4] 薬剤辞書を読み込み中...");
            let medicines = dictionary::load_dictionary(&dict_path)?;
            println!("✔ {}件の薬剤名を読み込み\n", medicines.len());

            // 4. 辞書照合
            println!("[4/4] 辞書照合中...");
            let threshold = threshold.unwrap_or(config.default_threshold);
            let reports = build_reports(&extractions, &medicines, threshold);
            println!("✔ 照合完了 (閾値: {})\n", threshold);

            for report in &reports {
                print_report(report);
            }

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&reports)?;
                std::fs::write(&output, json)?;
                println!("\n✔ 照合結果を保存: {}", output.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Extract { input, output, use_cache } => {
            println!("💊 presc-ai - 薬剤名抽出\n");

            // 1. 画像スキャン
            println!("[1/2] 処方箋画像をスキャン中...");
            let images = scanner::scan_input(&input)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(error::PrescAiError::NoImagesFound(
                    input.display().to_string()
                ));
            }

            // 2. AI読解
            println!("[2/2] AI読解中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let extractions = if use_cache {
                let folder = cache_folder(&input);
                extractor::extract_images_with_cache(&images, &folder, cli.ai_provider, &config, cli.verbose).await?
            } else {
                extractor::extract_images(&images, cli.ai_provider, &config, cli.verbose).await?
            };
            println!("✔ 読解完了\n");

            for extraction in &extractions {
                println!("📄 {} ({}件)", extraction.file_name, extraction.names.len());
                for name in &extraction.names {
                    println!("  - {}", name);
                }
            }

            let output = output.unwrap_or_else(|| PathBuf::from("extraction.json"));
            let json = serde_json::to_string_pretty(&extractions)?;
            std::fs::write(&output, json)?;
            println!("\n✔ 抽出結果を保存: {}", output.display());

            println!("\n✅ 完了");
        }

        Commands::Match { input, dictionary: dict_path, threshold, output } => {
            println!("💊 presc-ai - 辞書照合\n");

            // 1. 抽出結果読み込み
            println!("[1/3] 抽出結果を読み込み中...");
            let content = std::fs::read_to_string(&input)?;
            let extractions: Vec<extractor::Extraction> = serde_json::from_str(&content)?;
            println!("✔ {}枚分の抽出結果\n", extractions.len());

            // 2. 薬剤辞書読み込み
            println!("[2/3] 薬剤辞書を読み込み中...");
            let medicines = dictionary::load_dictionary(&dict_path)?;
            println!("✔ {}件の薬剤名を読み込み\n", medicines.len());

            // 3. 辞書照合
            println!("[3/3] 辞書照合中...");
            let threshold = threshold.unwrap_or(config.default_threshold);
            let reports = build_reports(&extractions, &medicines, threshold);
            println!("✔ 照合完了 (閾値: {})\n", threshold);

            for report in &reports {
                print_report(report);
            }

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&reports)?;
                std::fs::write(&output, json)?;
                println!("\n✔ 照合結果を保存: {}", output.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  照合閾値: {}", config.default_threshold);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = extractor::CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = extractor::CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match extractor::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// 抽出結果ごとに辞書照合してレポートを作る
fn build_reports(
    extractions: &[extractor::Extraction],
    medicines: &[String],
    threshold: u8,
) -> Vec<MatchReport> {
    extractions
        .iter()
        .map(|extraction| MatchReport {
            file_name: extraction.file_name.clone(),
            results: matcher::match_names(&extraction.names, medicines, threshold),
        })
        .collect()
}

fn print_report(report: &MatchReport) {
    let matched = report.results.iter().filter(|r| r.matched.is_some()).count();
    println!("📄 {} (一致 {}/{}件)", report.file_name, matched, report.results.len());

    for result in &report.results {
        match &result.matched {
            Some(name) => println!("  『{}』 → 『{}』 (スコア: {})", result.extracted, name, result.score),
            None => println!("  『{}』 → 該当なし", result.extracted),
        }
    }
}

/// キャッシュの置き場所（入力がファイルなら親フォルダ）
fn cache_folder(input: &Path) -> PathBuf {
    if input.is_file() {
        input.parent().unwrap_or(Path::new(".")).to_path_buf()
    } else {
        input.to_path_buf()
    }
}
