// ==========================================
// Price list generator - command line entry
// ==========================================
// Subcommands:
//   generate <config.json>          run the pipeline for a saved configuration
//   refresh <token> <payload.json>  replace the dataset from a JSON payload
// ==========================================

use pricelist_gen::config::{GenerationConfig, SitePaths};
use pricelist_gen::engine::PriceListGenerator;
use pricelist_gen::importer::{DatasetRefresher, REFRESH_TOKEN_ENV_VAR};
use pricelist_gen::logging;
use std::env;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", pricelist_gen::APP_NAME, pricelist_gen::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("generate") => run_generate(&args[1..]),
        Some("refresh") => run_refresh(&args[1..]),
        _ => {
            usage();
            ExitCode::from(2)
        }
    }
}

fn run_generate(args: &[String]) -> ExitCode {
    let Some(config_path) = args.first() else {
        usage();
        return ExitCode::from(2);
    };
    let config = match GenerationConfig::load(Path::new(config_path)) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(path = %config_path, error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let paths = SitePaths::resolve_default();
    tracing::info!(dataset = %paths.dataset_path.display(), "using dataset");

    match PriceListGenerator::from_site(paths).generate(&config) {
        Ok(result) => {
            tracing::info!(
                pdf = %result.pdf_path.display(),
                spreadsheet = %result.spreadsheet_path.display(),
                rows = result.row_count,
                elapsed_ms = result.elapsed_time.as_millis(),
                "generation succeeded"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run_refresh(args: &[String]) -> ExitCode {
    let [token, payload_path] = args else {
        usage();
        return ExitCode::from(2);
    };
    let expected = match env::var(REFRESH_TOKEN_ENV_VAR) {
        Ok(value) if !value.is_empty() => value,
        _ => {
            tracing::error!("{REFRESH_TOKEN_ENV_VAR} is not set, refusing refresh");
            return ExitCode::FAILURE;
        }
    };
    let payload = match std::fs::read_to_string(payload_path) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::error!(path = %payload_path, error = %err, "failed to read payload");
            return ExitCode::FAILURE;
        }
    };

    let paths = SitePaths::resolve_default();
    let refresher = DatasetRefresher::new(expected, paths.dataset_path.clone());
    match refresher.refresh(token, &payload) {
        Ok(rows) => {
            tracing::info!(rows, dataset = %paths.dataset_path.display(), "dataset replaced");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "dataset refresh rejected");
            ExitCode::FAILURE
        }
    }
}

fn usage() {
    eprintln!("Usage:");
    eprintln!("  pricelist-gen generate <config.json>");
    eprintln!("  pricelist-gen refresh <token> <payload.json>");
}
