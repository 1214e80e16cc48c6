pub mod analysis;
pub mod commands;
pub mod error;
pub mod models;

pub use commands::analyze::{
    analyze_site, analyze_snapshot, recent_history, run_benchmark, run_benchmark_async, run_site_analysis,
};
pub use commands::provider::{DirectoryProvider, MemoryProvider, SnapshotProvider};
pub use commands::settings::AnalysisSettings;
pub use error::{AnalysisError, RetrievalError};
pub use models::benchmark::{BenchmarkResult, Recommendation, SiteAnalysis};
pub use models::snapshot::SiteSnapshot;
pub use models::visual::BrandFlags;

use env_logger::Env;

/// Install the `env_logger` backend (`RUST_LOG`, default `info`).
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}
