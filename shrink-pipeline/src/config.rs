//! Risk scoring configuration.
//!
//! Weights are read from a `weights.json` file. Every section falls back to
//! its built-in default when missing, so a file only needs the values that
//! differ.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shrink_ledger::cancellations::clean_code;
use thiserror::Error;

use crate::types::RiskLevel;

/// Locations searched when no explicit config path is given.
const SEARCH_PATHS: [&str; 2] = ["weights.json", "config/weights.json"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A threshold and the points awarded when a value is strictly above it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBand {
    pub threshold: f64,
    pub points: u32,
}

const fn band(threshold: f64, points: u32) -> RiskBand {
    RiskBand { threshold, points }
}

/// Ordered bands of one signal. The first band the value exceeds wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    pub high: RiskBand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<RiskBand>,
    pub low: RiskBand,
}

/// Which band of a [`RiskBands`] a value fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandHit {
    High,
    Medium,
    Low,
}

impl RiskBands {
    /// Band hit and points for `value`, or `None` when no band is exceeded.
    pub fn evaluate(&self, value: f64) -> Option<(BandHit, u32)> {
        if value > self.high.threshold {
            return Some((BandHit::High, self.high.points));
        }
        if let Some(medium) = self.medium {
            if value > medium.threshold {
                return Some((BandHit::Medium, medium.points));
            }
        }
        if value > self.low.threshold {
            return Some((BandHit::Low, self.low.points));
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Total loss as a percentage of sales.
    #[serde(rename = "toplam_oran", default = "default_total_ratio")]
    pub total_ratio: RiskBands,
    /// Count of high-price lines with a shortage.
    #[serde(rename = "ic_hirsizlik", default = "default_internal_theft")]
    pub internal_theft: RiskBands,
    /// Net cigarette shortage in units.
    #[serde(rename = "sigara", default = "default_cigarette")]
    pub cigarette: RiskBands,
    #[serde(rename = "kronik", default = "default_chronic")]
    pub chronic: RiskBands,
    #[serde(rename = "fire_manipulasyon", default = "default_fire_manipulation")]
    pub fire_manipulation: RiskBands,
    /// Net surplus units on cash-register products.
    #[serde(rename = "kasa_10tl", default = "default_cash_register")]
    pub cash_register: RiskBands,
}

fn default_total_ratio() -> RiskBands {
    RiskBands { high: band(2.0, 40), medium: Some(band(1.5, 25)), low: band(1.0, 15) }
}

fn default_internal_theft() -> RiskBands {
    RiskBands { high: band(50.0, 30), medium: Some(band(30.0, 20)), low: band(15.0, 10) }
}

fn default_cigarette() -> RiskBands {
    RiskBands { high: band(5.0, 35), medium: None, low: band(0.0, 20) }
}

fn default_chronic() -> RiskBands {
    RiskBands { high: band(100.0, 15), medium: None, low: band(50.0, 10) }
}

fn default_fire_manipulation() -> RiskBands {
    RiskBands { high: band(10.0, 20), medium: None, low: band(5.0, 10) }
}

fn default_cash_register() -> RiskBands {
    RiskBands { high: band(20.0, 15), medium: None, low: band(10.0, 10) }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            total_ratio: default_total_ratio(),
            internal_theft: default_internal_theft(),
            cigarette: default_cigarette(),
            chronic: default_chronic(),
            fire_manipulation: default_fire_manipulation(),
            cash_register: default_cash_register(),
        }
    }
}

/// Minimum scores of each severity level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    #[serde(rename = "kritik", default = "default_critical")]
    pub critical: u32,
    #[serde(rename = "riskli", default = "default_risky")]
    pub risky: u32,
    #[serde(rename = "dikkat", default = "default_attention")]
    pub attention: u32,
}

fn default_critical() -> u32 {
    60
}

fn default_risky() -> u32 {
    40
}

fn default_attention() -> u32 {
    20
}

impl Default for RiskLevels {
    fn default() -> Self {
        Self {
            critical: default_critical(),
            risky: default_risky(),
            attention: default_attention(),
        }
    }
}

impl RiskLevels {
    pub fn classify(&self, score: u32) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.risky {
            RiskLevel::Risky
        } else if score >= self.attention {
            RiskLevel::Attention
        } else {
            RiskLevel::Clean
        }
    }
}

fn default_max_score() -> u32 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub risk_weights: RiskWeights,
    #[serde(default)]
    pub risk_levels: RiskLevels,
    #[serde(default = "default_max_score")]
    pub max_risk_score: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_weights: RiskWeights::default(),
            risk_levels: RiskLevels::default(),
            max_risk_score: default_max_score(),
        }
    }
}

impl RiskConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load the risk configuration.
///
/// An explicit path must load. Without one, the search paths are tried in
/// order and the built-in defaults are used when none yields a valid file.
pub fn load_risk_config(explicit: Option<&Path>) -> ConfigResult<RiskConfig> {
    if let Some(path) = explicit {
        let config = RiskConfig::from_file(path)?;
        log::info!("Risk weights loaded from {}", path.display());
        return Ok(config);
    }

    for candidate in SEARCH_PATHS.iter().map(Path::new).filter(|p| p.is_file()) {
        match RiskConfig::from_file(candidate) {
            Ok(config) => {
                log::info!("Risk weights loaded from {}", candidate.display());
                return Ok(config);
            }
            Err(err) => log::warn!("Ignoring risk weights file: {}", err),
        }
    }

    log::info!("Using built-in risk weights");
    Ok(RiskConfig::default())
}

/// Load the cash-register product codes.
///
/// Accepts a JSON array of codes (strings or numbers) or plain text with one
/// code per line. Blank lines and `#` comments are skipped.
pub fn load_cash_codes(path: &Path) -> ConfigResult<HashSet<String>> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let codes = parse_cash_codes(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} cash-register codes from {}", codes.len(), path.display());
    Ok(codes)
}

fn parse_cash_codes(text: &str) -> Result<HashSet<String>, serde_json::Error> {
    if text.trim_start().starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(text)?;
        return Ok(values
            .iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(clean_code(s)),
                serde_json::Value::Number(n) => Some(clean_code(&n.to_string())),
                _ => None,
            })
            .filter(|c| !c.is_empty())
            .collect());
    }
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(clean_code)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_weights_file() {
        let config = RiskConfig::default();
        let w = &config.risk_weights;
        assert_eq!(w.total_ratio.high, band(2.0, 40));
        assert_eq!(w.total_ratio.medium, Some(band(1.5, 25)));
        assert_eq!(w.internal_theft.low, band(15.0, 10));
        assert_eq!(w.cigarette.low, band(0.0, 20));
        assert_eq!(w.cash_register.high, band(20.0, 15));
        assert_eq!(config.risk_levels.critical, 60);
        assert_eq!(config.max_risk_score, 100);
    }

    #[test]
    fn missing_sections_fall_back() {
        let json = r#"{
            "risk_weights": { "sigara": { "high": {"threshold": 10, "points": 50},
                                          "low":  {"threshold": 2,  "points": 5} } },
            "max_risk_score": 90
        }"#;
        let config: RiskConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.risk_weights.cigarette.high, band(10.0, 50));
        assert_eq!(config.risk_weights.chronic, default_chronic());
        assert_eq!(config.risk_levels, RiskLevels::default());
        assert_eq!(config.max_risk_score, 90);
    }

    #[test]
    fn bands_are_strict_and_ordered() {
        let bands = default_total_ratio();
        assert_eq!(bands.evaluate(2.0), Some((BandHit::Medium, 25)));
        assert_eq!(bands.evaluate(2.01), Some((BandHit::High, 40)));
        assert_eq!(bands.evaluate(1.2), Some((BandHit::Low, 15)));
        assert_eq!(bands.evaluate(1.0), None);

        let cigarette = default_cigarette();
        assert_eq!(cigarette.evaluate(0.0), None);
        assert_eq!(cigarette.evaluate(1.0), Some((BandHit::Low, 20)));
    }

    #[test]
    fn levels_classify_scores() {
        let levels = RiskLevels::default();
        assert_eq!(levels.classify(60), RiskLevel::Critical);
        assert_eq!(levels.classify(59), RiskLevel::Risky);
        assert_eq!(levels.classify(20), RiskLevel::Attention);
        assert_eq!(levels.classify(19), RiskLevel::Clean);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_risk_config(Some(Path::new("/nonexistent/weights.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn cash_codes_from_json_or_lines() {
        let codes = parse_cash_codes(r#"["1001", 2002, "3003.0", null]"#).unwrap();
        assert_eq!(codes.len(), 3);
        assert!(codes.contains("2002"));
        assert!(codes.contains("3003"));

        let codes = parse_cash_codes("# till products\n1001\n\n 2002 \n").unwrap();
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("2002"));

        assert!(parse_cash_codes("[1, 2").is_err());
    }
}
