use clap::Parser;
use order_etl::config::toml_config::TomlConfig;
use order_etl::core::ConfigProvider;
use order_etl::core::selectors::{BUYER_ADDRESS_SELECTOR, ORDER_ID_SELECTOR, PHONE_SELECTOR};
use order_etl::utils::error::{EtlError, ErrorSeverity};
use order_etl::utils::{logger, validation::Validate};
use order_etl::{EtlEngine, LocalStorage, ManifestPipeline, PageKind};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Order extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "order-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the page kind from config (detail or list)
    #[arg(long)]
    page_kind: Option<PageKind>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based order extraction");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(kind) = args.page_kind {
        config.source.page_kind = Some(kind);
        tracing::info!("🔧 Page kind overridden to: {}", kind);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let pipeline = match ManifestPipeline::new(LocalStorage::default(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(e),
    };
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Extraction completed successfully!");
            println!("✅ Extraction completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: EtlError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline.name);
    if let Some(version) = &config.pipeline.version {
        println!("  Version: {}", version);
    }
    println!("  Inputs: {}", config.input_paths().join(", "));
    println!("  Page kind: {}", config.page_kind());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📄 Page Sources:");
    for input in config.input_paths() {
        let path = std::path::Path::new(input);
        let kind = if path.is_dir() {
            "directory"
        } else if path.is_file() {
            "file"
        } else {
            "missing"
        };
        println!("  {} ({})", input, kind);
    }
    println!("  Extensions: {}", config.input_extensions().join(", "));

    println!();
    println!("🎯 Selectors:");
    match config.page_kind() {
        PageKind::Detail => {
            println!("  Order id: {}", ORDER_ID_SELECTOR.css());
            println!("  Phone: {}", PHONE_SELECTOR.css());
            println!("  Address: {} (direct child spans)", BUYER_ADDRESS_SELECTOR.css());
        }
        PageKind::List => {
            println!("  Address: {} (every match, flattened)", BUYER_ADDRESS_SELECTOR.css());
        }
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compress_output() {
        println!("  Compression: {} (ZIP)", config.archive_name());
    }
    if let Some(sheet) = config.address_sheet() {
        println!("  Address sheet: {}", sheet);
    }

    let overrides = config.manifest_overrides();
    if !overrides.is_empty() {
        println!();
        println!("🔄 Manifest Defaults:");
        for (label, value) in &overrides {
            println!("  {} = {}", label, value);
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
