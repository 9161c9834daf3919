//! キャッシュ機能テスト
//!
//! 抽出結果キャッシュの動作を検証

use presc_ai_rust::extractor::cache::{compute_file_hash, filter_cached_images, CacheFile};
use presc_ai_rust::extractor::Extraction;
use presc_ai_rust::scanner::ImageInfo;
use tempfile::tempdir;

/// 空のキャッシュファイル
#[test]
fn test_cache_file_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache = CacheFile::load(dir.path());

    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
}

/// キャッシュの保存と読み込み
#[test]
fn test_cache_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");

    // キャッシュを作成して保存
    let mut cache = CacheFile::load(dir.path());
    let result = Extraction {
        file_name: "rx.jpg".to_string(),
        ocr_text: "Tab Paracetamol 500mg".to_string(),
        names: vec!["Paracetamol".to_string()],
        ..Default::default()
    };

    cache.insert(
        "abc123".to_string(),
        "rx.jpg".to_string(),
        1024,
        result.clone(),
    );

    cache.save(dir.path()).expect("キャッシュ保存失敗");

    // 再読み込み
    let loaded = CacheFile::load(dir.path());
    assert_eq!(loaded.len(), 1);

    let cached = loaded.get("abc123").expect("キャッシュが見つからない");
    assert_eq!(cached.file_name, "rx.jpg");
    assert_eq!(cached.names, vec!["Paracetamol"]);
}

/// キャッシュヒット判定
#[test]
fn test_cache_hit() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    let result = Extraction {
        file_name: "cached.jpg".to_string(),
        names: vec!["Ibuprofen".to_string()],
        ..Default::default()
    };

    let hash = "e3b0c44298fc1c149afbf4c8996fb924";
    cache.insert(hash.to_string(), "cached.jpg".to_string(), 2048, result);

    // キャッシュにある → ヒット
    assert!(cache.get(hash).is_some());

    // キャッシュにない → ミス
    assert!(cache.get("nonexistent_hash").is_none());
}

/// キャッシュの複数エントリ
#[test]
fn test_cache_multiple_entries() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());

    for i in 1..=5 {
        let result = Extraction {
            file_name: format!("rx_{}.jpg", i),
            names: vec![format!("Medicine{}", i)],
            ..Default::default()
        };

        cache.insert(
            format!("hash_{}", i),
            format!("rx_{}.jpg", i),
            1000 * i as u64,
            result,
        );
    }

    assert_eq!(cache.len(), 5);

    // 各エントリを検証
    for i in 1..=5 {
        let cached = cache.get(&format!("hash_{}", i)).expect("キャッシュが見つからない");
        assert_eq!(cached.file_name, format!("rx_{}.jpg", i));
    }
}

/// filter_cached_imagesのテスト
#[test]
fn test_filter_cached_images() {
    let dir = tempdir().expect("Failed to create temp dir");

    // テスト用の画像ファイルを作成
    let img1_path = dir.path().join("rx1.jpg");
    let img2_path = dir.path().join("rx2.jpg");
    std::fs::write(&img1_path, b"fake image 1").unwrap();
    std::fs::write(&img2_path, b"fake image 2").unwrap();

    let images = vec![
        ImageInfo {
            file_name: "rx1.jpg".to_string(),
            path: img1_path.clone(),
        },
        ImageInfo {
            file_name: "rx2.jpg".to_string(),
            path: img2_path.clone(),
        },
    ];

    // 空のキャッシュ → 全て未キャッシュ
    let cache = CacheFile::load(dir.path());
    let (cached, uncached) = filter_cached_images(&images, &cache);

    assert!(cached.is_empty());
    assert_eq!(uncached.len(), 2);

    // 1枚目をキャッシュに入れると振り分けが変わる
    let mut cache = cache;
    let hash1 = compute_file_hash(&img1_path).unwrap();
    cache.insert(
        hash1,
        "rx1.jpg".to_string(),
        12,
        Extraction {
            file_name: "rx1.jpg".to_string(),
            ..Default::default()
        },
    );

    let (cached, uncached) = filter_cached_images(&images, &cache);
    assert_eq!(cached.len(), 1);
    assert_eq!(uncached.len(), 1);
    assert_eq!(cached[0].file_name, "rx1.jpg");
    assert_eq!(uncached[0].0.file_name, "rx2.jpg");
}

/// キャッシュの上書き
#[test]
fn test_cache_overwrite() {
    let dir = tempdir().expect("Failed to create temp dir");

    let mut cache = CacheFile::load(dir.path());
    let hash = "same_hash";

    // 最初のエントリ
    let result1 = Extraction {
        file_name: "rx.jpg".to_string(),
        names: vec!["最初の薬剤".to_string()],
        ..Default::default()
    };
    cache.insert(hash.to_string(), "rx.jpg".to_string(), 1000, result1);

    // 上書き
    let result2 = Extraction {
        file_name: "rx.jpg".to_string(),
        names: vec!["更新後の薬剤".to_string()],
        ..Default::default()
    };
    cache.insert(hash.to_string(), "rx.jpg".to_string(), 1000, result2);

    // 最新の値が取得される
    let cached = cache.get(hash).expect("キャッシュが見つからない");
    assert_eq!(cached.names, vec!["更新後の薬剤"]);
    assert_eq!(cache.len(), 1); // エントリ数は変わらない
}

/// キャッシュファイルが破損している場合
#[test]
fn test_cache_corrupted_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let cache_path = CacheFile::cache_path(dir.path());

    // 不正なJSONを書き込む
    std::fs::write(&cache_path, "{ invalid json }").unwrap();

    // 破損したキャッシュは空として扱われる
    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

/// キャッシュの削除
#[test]
fn test_cache_clear() {
    let dir = tempdir().expect("Failed to create temp dir");

    // キャッシュなし → false
    assert!(!CacheFile::clear(dir.path()).unwrap());

    // キャッシュを作ってから削除 → true
    let cache = CacheFile::load(dir.path());
    cache.save(dir.path()).unwrap();
    assert!(CacheFile::clear(dir.path()).unwrap());
    assert!(!CacheFile::cache_path(dir.path()).exists());
}

/// キャッシュのバージョン互換性
#[test]
fn test_cache_version_compatibility() {
    let dir = tempdir().expect("Failed to create temp dir");

    // 現在のバージョンでキャッシュを作成
    let mut cache = CacheFile::load(dir.path());
    let result = Extraction {
        file_name: "version_test.jpg".to_string(),
        ..Default::default()
    };
    cache.insert("hash".to_string(), "version_test.jpg".to_string(), 100, result);
    cache.save(dir.path()).expect("保存失敗");

    // 再読み込みでバージョンが正しく処理される
    let loaded = CacheFile::load(dir.path());
    assert_eq!(loaded.len(), 1);
}
