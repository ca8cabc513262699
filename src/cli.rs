use crate::export::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-extract")]
#[command(about = "画像からAIで表データを抽出し、CSV/Excelに出力するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データ保存先（省略時はOSのデータディレクトリ）
    #[arg(long, global = true, env = "IMAGE_EXTRACT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 設定を表示/編集
    Config {
        /// Gemini APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 保存済みAPIキーを削除
        #[arg(long)]
        clear_api_key: bool,

        /// 指示プロンプトを設定
        #[arg(long, conflicts_with = "prompt_file")]
        set_prompt: Option<String>,

        /// 指示プロンプトをファイルから設定
        #[arg(long)]
        prompt_file: Option<PathBuf>,

        /// 指示プロンプトを既定に戻す
        #[arg(long)]
        reset_prompt: bool,

        /// モデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 指示プロンプト全文を表示
        #[arg(long)]
        show_prompt: bool,
    },

    /// 選択画像のプレビュー情報を表示
    Scan {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 画像を1枚ずつAI解析して抽出結果に追加
    Extract {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 抽出結果を表で表示
    List,

    /// 行を削除（複数指定時は確認あり）
    Delete {
        /// 削除する行のID
        #[arg(required = true)]
        ids: Vec<i64>,

        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// 抽出結果をすべて削除（確認あり）
    Clear {
        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },

    /// 抽出結果をファイルに出力
    Export {
        /// 出力形式 (csv/xlsx)
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ（デフォルト: ./extracted_data.<ext>）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from(["image-extract", "extract", "a.png", "scans", "-r"]).unwrap();
        match cli.command {
            Commands::Extract { paths, recursive } => {
                assert_eq!(paths, vec![PathBuf::from("a.png"), PathBuf::from("scans")]);
                assert!(recursive);
            }
            _ => panic!("extractとして解釈されていない"),
        }
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::try_parse_from(["image-extract", "export", "--format", "excel"]).unwrap();
        match cli.command {
            Commands::Export { format, output } => {
                assert_eq!(format, ExportFormat::Xlsx);
                assert!(output.is_none());
            }
            _ => panic!("exportとして解釈されていない"),
        }
    }

    #[test]
    fn test_parse_delete_ids() {
        let cli = Cli::try_parse_from(["image-extract", "delete", "10", "11", "--yes"]).unwrap();
        match cli.command {
            Commands::Delete { ids, yes } => {
                assert_eq!(ids, vec![10, 11]);
                assert!(yes);
            }
            _ => panic!("deleteとして解釈されていない"),
        }
    }
}
