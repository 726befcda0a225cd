use clap::Parser;
use trip_map::config::USAGE;
use trip_map::core::ConfigProvider;
use trip_map::utils::{logger, validation::Validate};
use trip_map::{CliConfig, ImageStorage, PlotEngine, PlotError};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    println!(
        "Input: {}, mode: {}, limit: {}",
        config.file, config.mode, config.limit
    );
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 合併 TOML 並驗證配置
    let run_config = match config.resolve() {
        Ok(run_config) => run_config,
        Err(e) => terminate(e),
    };
    if let Err(e) = run_config.validate() {
        terminate(e);
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = ImageStorage::new(run_config.output_dir().to_string());
    let engine = PlotEngine::new_with_monitoring(run_config, storage, config.monitor);

    match engine.run() {
        Ok(report) => {
            tracing::info!(
                "✅ Plotted {} of {} rows",
                report.summary.rows_plotted,
                report.summary.rows_examined
            );
            println!("\nGenerated: {}", report.output_path);
        }
        Err(e) => terminate(e),
    }
}

/// Prints the usage line and the error, then exits with a status derived
/// from the error's severity.
fn terminate(e: PlotError) -> ! {
    tracing::error!(
        "❌ Plot failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    eprintln!("\n{}", USAGE);
    eprintln!("Error: {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code().max(1));
}
