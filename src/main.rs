use clap::Parser;
use compose_lint::core::report::{self, OutputFormat};
use compose_lint::utils::{logger, validation::Validate};
use compose_lint::{source_for, Checker, CliConfig, ComposeManifest, LintConfig, LintSettings};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.log_json);

    tracing::info!("Starting compose-lint");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let report = match run_checks(&config, settings).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(
                "❌ Lint run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // Already validated, parse cannot fail here
    let format: OutputFormat = config.output.parse()?;
    let rendered = report::format_report(&report, format, !config.no_header)?;
    print!("{}", rendered);

    std::process::exit(report.exit_code(config.strict));
}

fn load_settings(config: &CliConfig) -> compose_lint::Result<LintSettings> {
    let settings = match &config.config {
        Some(path) => {
            tracing::info!("Loading lint settings from: {}", path);
            LintConfig::from_file(path)?.into_settings()
        }
        None => LintSettings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

async fn run_checks(
    config: &CliConfig,
    settings: LintSettings,
) -> compose_lint::Result<compose_lint::CheckReport> {
    let source = source_for(&config.manifest, Duration::from_secs(config.timeout_seconds))?;
    tracing::info!("Loading manifest from: {}", source.origin());

    let content = source.fetch().await?;
    let manifest = ComposeManifest::from_yaml_str(&content)?;
    tracing::debug!("Parsed {} services", manifest.services.len());

    Ok(Checker::new(settings).run(&manifest))
}
