use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// 診断ログの初期化（標準エラー出力）
///
/// `RUST_LOG` が設定されていればそれを優先する。
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,image_extract_rust=debug,image_extract=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 二重初期化（テスト等）は無視
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(verbose).with_writer(std::io::stderr))
        .try_init();
}
