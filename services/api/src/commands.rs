use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use triangle_origin::config::AppConfig;
use triangle_origin::error::AppError;
use triangle_origin::workflows::origin::{
    normalize, AnalysisReport, EngineConfig, QualificationRequest, QualificationService,
};
use triangle_origin::workflows::reference::{InMemoryReferenceStore, ReferenceImporter};

use crate::infra::InMemoryAnalysisRepository;

#[derive(Args, Debug)]
pub(crate) struct QualifyArgs {
    /// JSON file holding the product request
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// CSV rate table; falls back to ORIGIN_RATE_TABLE
    #[arg(long)]
    pub(crate) rates: Option<PathBuf>,
    /// Reference lookup deadline in milliseconds
    #[arg(long)]
    pub(crate) timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// JSON file holding one record or an array of records
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Debug, Serialize)]
struct QualifyOutput {
    generated_at: DateTime<Utc>,
    report: AnalysisReport,
}

pub(crate) async fn run_qualify(args: QualifyArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let request: QualificationRequest = read_json(&args.request)?;

    let rates = args.rates.or_else(|| config.origin.rate_table_path.clone());
    let store = match rates {
        Some(path) => ReferenceImporter::from_path(path)?,
        None => InMemoryReferenceStore::new(),
    };
    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(config.origin.lookup_timeout);

    let report = qualify(store, config.origin.engine_config(), timeout, &request).await?;

    print_json(&QualifyOutput {
        generated_at: Utc::now(),
        report,
    })
}

pub(crate) fn run_normalize(args: NormalizeArgs) -> Result<(), AppError> {
    let records: Value = read_json(&args.input)?;
    print_json(&normalize(records))
}

/// One-off analysis through the same service the HTTP endpoints use; nothing is stored.
async fn qualify(
    store: InMemoryReferenceStore,
    engine_config: EngineConfig,
    timeout: Duration,
    request: &QualificationRequest,
) -> Result<AnalysisReport, AppError> {
    let service = QualificationService::with_timeout(
        Arc::new(store),
        Arc::new(InMemoryAnalysisRepository::default()),
        engine_config,
        timeout,
    );
    Ok(service.analyze(request).await?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
