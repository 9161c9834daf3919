use crate::error::{PrescAiError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// 処方箋画像を収集する
///
/// 入力がファイルならそのまま1件、フォルダなら直下の画像を
/// ファイル名順で返す。
pub fn scan_input(input: &Path) -> Result<Vec<ImageInfo>> {
    if input.is_file() {
        return Ok(vec![image_info(input)]);
    }

    if !input.exists() {
        return Err(PrescAiError::FolderNotFound(input.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(input)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy();
            if IMAGE_EXTENSIONS.iter().any(|&e| e == ext_str) {
                images.push(image_info(path));
            }
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

/// 画像が読み込めるか検証する
///
/// AI呼び出しの前に不正な画像で早期に失敗させる。
pub fn validate_image(path: &Path) -> Result<()> {
    image::open(path)
        .map_err(|e| PrescAiError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

fn image_info(path: &Path) -> ImageInfo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    ImageInfo {
        path: path.to_path_buf(),
        file_name,
    }
}

/// Check if a file extension is a supported image format
#[cfg(test)]
fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}
