use clap::Parser;
use dialoguer::Confirm;
use image_extract_rust::{app, cli, error, export, extractor, logging, progress, scanner, storage, view};
use app::App;
use cli::{Cli, Commands};
use error::{ImageExtractError, Result};
use export::ExportOutcome;
use storage::Storage;

fn confirm(prompt: &str) -> bool {
    match Confirm::new().with_prompt(prompt).default(false).interact() {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!("確認入力に失敗: {}", e);
            false
        }
    }
}

fn print_config(app: &App) {
    let config = app.config();
    println!("設定:");
    println!("  保存先: {}", app.storage().root().display());
    println!("  モデル: {}", config.model);
    println!(
        "  APIキー: {}{}",
        config.masked_api_key(),
        if config.api_key_from_env { " (環境変数)" } else { "" }
    );
    println!(
        "  指示プロンプト: {} ({}文字)",
        if config.is_default_prompt() { "既定" } else { "カスタム" },
        config.prompt.chars().count()
    );
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => Storage::default_root()?,
    };
    let mut app = App::init(Storage::open(data_dir))?;

    for warning in app.load_warnings() {
        println!("⚠ {}", warning);
    }

    match cli.command {
        Commands::Config {
            set_api_key,
            clear_api_key,
            set_prompt,
            prompt_file,
            reset_prompt,
            set_model,
            show,
            show_prompt,
        } => {
            let mut changed = false;

            if let Some(key) = set_api_key {
                app.set_api_key(&key)?;
                println!("✔ APIキーを設定しました");
                changed = true;
            }

            if clear_api_key {
                app.clear_api_key()?;
                println!("✔ APIキーを削除しました");
                changed = true;
            }

            if let Some(prompt) = set_prompt {
                app.set_prompt(&prompt)?;
                println!("✔ 指示プロンプトを設定しました");
                changed = true;
            }

            if let Some(path) = prompt_file {
                let prompt = std::fs::read_to_string(&path)
                    .map_err(|_| ImageExtractError::FileNotFound(path.display().to_string()))?;
                app.set_prompt(&prompt)?;
                println!("✔ 指示プロンプトを設定しました: {}", path.display());
                changed = true;
            }

            if reset_prompt {
                app.reset_prompt()?;
                println!("✔ 指示プロンプトを既定に戻しました");
                changed = true;
            }

            if let Some(model) = set_model {
                app.set_model(&model)?;
                println!("✔ モデルを設定しました: {}", app.config().model);
                changed = true;
            }

            if show || (!changed && !show_prompt) {
                print_config(&app);
            }

            if show_prompt {
                println!("{}", app.config().prompt);
            }
        }

        Commands::Scan { paths, recursive } => {
            let images = scanner::collect_images(&paths, recursive)?;
            if images.is_empty() {
                return Err(ImageExtractError::NoImagesFound(
                    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "),
                ));
            }

            println!("選択画像: {}枚\n", images.len());
            for (i, image) in images.iter().enumerate() {
                let info = scanner::preview(image)?;
                let dimensions = info
                    .dimensions
                    .map(|(w, h)| format!("{}x{}", w, h))
                    .unwrap_or_else(|| "不明".to_string());
                println!(
                    "  {:>3}) {} [{}] {} bytes, {}{}",
                    i + 1,
                    info.file_name,
                    info.mime_type,
                    info.size_bytes,
                    dimensions,
                    info.date.map(|d| format!(", 撮影: {}", d)).unwrap_or_default()
                );
            }
        }

        Commands::Extract { paths, recursive } => {
            println!("📸 image-extract - 画像解析\n");

            // 1. 画像の受け付け
            println!("[1/2] 画像を確認中...");
            let images = scanner::collect_images(&paths, recursive)?;
            println!("✔ {}枚の画像を選択\n", images.len());
            app.select_files(images);

            // 2. 1枚ずつAI解析
            println!("[2/2] AI解析中... (モデル: {})", app.config().model);
            let client = extractor::GeminiClient::new(&app.config().api_base, &app.config().model)?;
            let mut reporter = progress::ProgressReporter::new(cli.verbose);
            let report = app.process_batch(&client, &mut reporter).await?;

            println!(
                "✔ {}件を追加（失敗 {}件）",
                report.succeeded(),
                report.failed()
            );
            for error in report.errors() {
                println!("  ✖ {}", error);
            }

            println!("\n✅ 抽出結果: 合計{}件", app.records().len());
        }

        Commands::List => {
            println!("{}", view::render_table(app.records(), None));
            if !app.records().is_empty() {
                println!("\n{}行 / {}項目", app.records().len(), app.columns().len());
            }
        }

        Commands::Delete { ids, yes } => {
            if let [id] = ids.as_slice() {
                let id = *id;
                if app.delete_row(id) {
                    println!("✔ ID {} を削除しました", id);
                } else {
                    println!("⚠ ID {} は存在しません", id);
                }
            } else {
                for id in &ids {
                    if !app.set_selected(*id, true) {
                        println!("⚠ ID {} は存在しません", id);
                    }
                }

                if !yes && !app.selection().is_empty() {
                    println!("{}\n", view::render_table(app.records(), Some(app.selection())));
                }

                let removed = app.delete_selected(|count| {
                    yes || confirm(&format!("選択した{}行を削除しますか？", count))
                });
                if removed > 0 {
                    println!("✔ {}行を削除しました", removed);
                } else if !app.selection().is_empty() {
                    println!("キャンセルしました");
                }
            }
        }

        Commands::Clear { yes } => {
            if app.records().is_empty() {
                println!("削除するデータがありません");
            } else {
                let removed = app.clear_all(|count| {
                    yes || confirm(&format!(
                        "抽出結果{}件をすべて削除しますか？この操作は元に戻せません",
                        count
                    ))
                });
                if removed > 0 {
                    println!("✔ {}件を削除しました", removed);
                } else {
                    println!("キャンセルしました");
                }
            }
        }

        Commands::Export { format, output } => match app.export(format, output.as_deref())? {
            ExportOutcome::NoData => println!("出力するデータがありません"),
            ExportOutcome::Written { path, rows } => {
                println!("✔ {}行を出力: {} ({})", rows, path.display(), format.mime_type());
            }
        },
    }

    Ok(())
}
