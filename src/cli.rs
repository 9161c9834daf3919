use crate::ai_provider::AiProvider;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "presc-ai")]
#[command(about = "手書き処方箋AI読解・薬剤名照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (claude/codex/gemini)
    #[arg(long, default_value = "claude", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 処方箋画像の読解から薬剤辞書照合まで一括実行
    Run {
        /// 処方箋画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        input: PathBuf,

        /// 薬剤辞書CSVファイル（`Drug Name` 列を参照）
        #[arg(short, long, required = true)]
        dictionary: PathBuf,

        /// 照合スコアの閾値 0-100（省略時は設定値、既定80）
        #[arg(short, long)]
        threshold: Option<u8>,

        /// 照合結果のJSON出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// キャッシュを使用（再読解をスキップ）
        #[arg(long)]
        use_cache: bool,
    },

    /// 処方箋画像から薬剤名を抽出してJSONを出力
    Extract {
        /// 処方箋画像ファイルまたはフォルダのパス
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（デフォルト: extraction.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// キャッシュを使用（再読解をスキップ）
        #[arg(long)]
        use_cache: bool,
    },

    /// 抽出結果JSONを薬剤辞書と照合
    Match {
        /// 抽出結果JSONファイル（extractの出力）
        #[arg(required = true)]
        input: PathBuf,

        /// 薬剤辞書CSVファイル（`Drug Name` 列を参照）
        #[arg(short, long, required = true)]
        dictionary: PathBuf,

        /// 照合スコアの閾値 0-100（省略時は設定値、既定80）
        #[arg(short, long)]
        threshold: Option<u8>,

        /// 照合結果のJSON出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
