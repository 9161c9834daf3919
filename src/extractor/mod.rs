//! 処方箋読解モジュール
//!
//! 2段階のAI CLI呼び出しで画像から薬剤名の候補リストを得る:
//! - Step1 (Vision): 画像の手書きテキストを転記
//! - Step2 (Text): 転記テキストから薬剤名を改行区切りで抽出

mod ai_cli;
pub mod cache;
mod types;

pub use cache::CacheFile;
pub use types::Extraction;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::Result;
use crate::scanner::{self, ImageInfo};
use ai_cli::{build_extract_prompt, build_ocr_prompt, parse_name_list, run_ai_cli};
use std::path::Path;

/// 画像リストを順に読解する
pub async fn extract_images(
    images: &[ImageInfo],
    provider: AiProvider,
    config: &Config,
    verbose: bool,
) -> Result<Vec<Extraction>> {
    let mut results = Vec::new();

    for (idx, image) in images.iter().enumerate() {
        if verbose {
            println!("  画像 {}/{}: {}", idx + 1, images.len(), image.file_name);
        }
        results.push(extract_single(image, provider, config, verbose).await?);
    }

    Ok(results)
}

/// キャッシュを使って画像リストを読解する
///
/// キャッシュ済みの画像はAI呼び出しをスキップし、新規に読解した
/// 分はキャッシュへ追記して保存する。結果はファイル名順で返す。
pub async fn extract_images_with_cache(
    images: &[ImageInfo],
    folder: &Path,
    provider: AiProvider,
    config: &Config,
    verbose: bool,
) -> Result<Vec<Extraction>> {
    let mut cache = CacheFile::load(folder);
    let (mut results, uncached) = cache::filter_cached_images(images, &cache);

    if verbose {
        println!(
            "  キャッシュヒット: {}件 / 未読解: {}件",
            results.len(),
            uncached.len()
        );
    }

    for (image, hash) in &uncached {
        let extraction = extract_single(image, provider, config, verbose).await?;

        if !hash.is_empty() {
            let file_size = std::fs::metadata(&image.path).map(|m| m.len()).unwrap_or(0);
            cache.insert(
                hash.clone(),
                image.file_name.clone(),
                file_size,
                extraction.clone(),
            );
        }

        results.push(extraction);
    }

    cache.save(folder)?;

    // キャッシュ併用時も順序を安定させる
    results.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(results)
}

async fn extract_single(
    image: &ImageInfo,
    provider: AiProvider,
    config: &Config,
    verbose: bool,
) -> Result<Extraction> {
    // AI呼び出しの前に画像の読み込み可否を検証
    scanner::validate_image(&image.path)?;

    let abs_path = std::fs::canonicalize(&image.path).unwrap_or_else(|_| image.path.clone());

    // Step1: 画像転記
    let ocr_prompt = build_ocr_prompt(&abs_path);
    let ocr_text = run_ai_cli(provider, &ocr_prompt, config.timeout_seconds, verbose)
        .await?
        .trim()
        .to_string();

    // Step2: 薬剤名抽出
    let extract_prompt = build_extract_prompt(&ocr_text);
    let response = run_ai_cli(provider, &extract_prompt, config.timeout_seconds, verbose).await?;
    let names = parse_name_list(&response);

    Ok(Extraction {
        file_name: image.file_name.clone(),
        file_path: image.path.display().to_string(),
        ocr_text,
        names,
    })
}
