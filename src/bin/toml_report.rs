use anyhow::Context;
use clap::Parser;
use sales_insight::core::ConfigProvider;
use sales_insight::utils::{logger, validation::Validate};
use sales_insight::{EtlEngine, LocalStorage, SalesPipeline, TomlConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Sales analysis driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sales-report.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override analysis.top_n from config
    #[arg(long)]
    top_n: Option<usize>,

    /// Override analysis.horizon_days from config
    #[arg(long)]
    days: Option<u32>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 先載入設定檔，日誌等級可能由 [monitoring] log_level 決定
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(args.verbose, config.log_level());

    tracing::info!("🚀 Starting TOML-based sales report");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 套用命令列覆蓋設定
    if let Some(top_n) = args.top_n {
        config.analysis.top_n = Some(top_n);
        tracing::info!("🔧 top_n overridden to: {}", top_n);
    }
    if let Some(days) = args.days {
        config.analysis.horizon_days = Some(days);
        tracing::info!("🔧 horizon_days overridden to: {}", days);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    // 相對路徑以設定檔所在目錄為基準
    let base_dir = Path::new(&args.config)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config, &base_dir)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = LocalStorage::new(base_dir.clone());
    let sink = LocalStorage::new(base_dir.join(config.output_path()));
    let pipeline = SalesPipeline::new(source, sink, config);

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Sales report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Sales report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  Top N: {}", config.top_n());
    println!(
        "  Inventory: {} units over {} days",
        config.initial_inventory(),
        config.horizon_days()
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig, base_dir: &Path) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let input = base_dir.join(config.input_path());
    let metadata = std::fs::metadata(&input)
        .with_context(|| format!("input file '{}' is not readable", input.display()))?;
    println!("📥 Input:");
    println!("  Path: {}", input.display());
    println!("  Size: {} bytes", metadata.len());

    println!();
    println!("🏷️ Discount Tiers:");
    let tiers = config.discount_tiers();
    if tiers.is_empty() {
        println!("  (none - discounted revenue equals list revenue)");
    }
    for tier in tiers {
        println!("  Qty >= {}: x{:.2}", tier.min_qty, tier.multiplier);
    }

    println!();
    println!("📦 Simulation Scenarios:");
    for scenario in config.scenarios() {
        println!("  {}: {} units/day", scenario.name, scenario.daily_units);
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    println!("  Charts: {}", config.charts_enabled());
    if let Some(archive) = config.archive_name() {
        println!("  Archive: {} (ZIP)", archive);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
