//! Shrink detectors, store and region risk scoring, and the candidate
//! pipelines that rank risky products and stores.

pub mod analysis;
pub mod camera;
pub mod candidate_pipeline;
pub mod components;
pub mod config;
pub mod detectors;
pub mod filter;
pub mod hydrator;
pub mod pipelines;
pub mod query_hydrator;
pub mod region;
pub mod scorer;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod store_risk;
pub mod types;
pub mod util;

pub use analysis::{analyze_store, StoreAnalysis};
pub use candidate_pipeline::{CandidatePipeline, PipelineResult};
pub use config::{load_cash_codes, load_risk_config, ConfigError, RiskConfig};
pub use pipelines::region_digest::RegionDigestPipeline;
pub use pipelines::risky_products::RiskyProductsPipeline;
pub use types::{AnalysisQuery, ProductCandidate, RiskLevel, StoreCandidate};
