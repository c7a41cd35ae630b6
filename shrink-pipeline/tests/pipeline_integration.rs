use std::collections::HashSet;

use chrono::NaiveDate;
use shrink_ledger::{CancellationRecord, LedgerRow, Scope};
use shrink_pipeline::candidate_pipeline::CandidatePipeline;
use shrink_pipeline::components::missing_code_filter::MissingCodeFilter;
use shrink_pipeline::components::risk_score_selector::RiskScoreSelector;
use shrink_pipeline::components::top_risk_selector::TopRiskSelector;
use shrink_pipeline::config::RiskConfig;
use shrink_pipeline::detectors::FamilyVerdict;
use shrink_pipeline::filter::Filter;
use shrink_pipeline::region::{aggregate_by_group, GroupBy};
use shrink_pipeline::selector::Selector;
use shrink_pipeline::types::*;
use shrink_pipeline::{analyze_store, RegionDigestPipeline, RiskyProductsPipeline};

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn row(store: &str, manager: &str, period: &str, code: &str, name: &str) -> LedgerRow {
    LedgerRow {
        store_code: store.into(),
        store_name: format!("STORE {store}"),
        sales_manager: manager.into(),
        period: period.into(),
        product_code: code.into(),
        product_name: name.into(),
        inventory_date: NaiveDate::from_ymd_opt(2025, 3, 20),
        inventory_start_date: NaiveDate::from_ymd_opt(2025, 2, 18),
        ..Default::default()
    }
}

/// Store 1001 in 202503 carries one of each pattern.
fn store_1001() -> Vec<LedgerRow> {
    vec![
        // Internal theft: shortage matches cancelled lines exactly.
        LedgerRow {
            product_group: "KOZMETIK".into(),
            unit_price: 150.0,
            diff_qty: -3.0,
            cancelled_qty: 3.0,
            diff_amount: -450.0,
            sales_amount: 10_000.0,
            ..row("1001", "AYSE", "202503", "A", "DEO SPREY 150 ML NIVEA")
        },
        // Chronic shortage.
        LedgerRow {
            product_group: "GIDA".into(),
            unit_price: 80.0,
            diff_qty: -10.0,
            prior_diff_qty: -5.0,
            diff_amount: -800.0,
            prior_diff_amount: -400.0,
            ..row("1001", "AYSE", "202503", "B", "ZEYTIN YAGI 1 LT KOMILI")
        },
        // A family whose diffs cancel out.
        LedgerRow {
            product_group: "ICECEK".into(),
            diff_qty: -2.0,
            diff_amount: -150.0,
            ..row("1001", "AYSE", "202503", "C", "COLA ZERO 330 ML PEPSI")
        },
        LedgerRow {
            product_group: "ICECEK".into(),
            diff_qty: 2.0,
            diff_amount: 150.0,
            ..row("1001", "AYSE", "202503", "D", "COLA ZERO LIMON 330 ML PEPSI")
        },
        // No product code.
        LedgerRow {
            diff_qty: -9.0,
            diff_amount: -900.0,
            ..row("1001", "AYSE", "202503", "", "UNKNOWN")
        },
        // Cigarette shortage.
        LedgerRow {
            product_group: "SIGARA".into(),
            unit_price: 90.0,
            diff_qty: -6.0,
            diff_amount: -600.0,
            ..row("1001", "AYSE", "202503", "F", "SIGARA UZUN")
        },
    ]
}

fn region_rows() -> Vec<LedgerRow> {
    let mut rows = store_1001();
    rows.push(LedgerRow {
        diff_qty: -1.0,
        diff_amount: -50.0,
        sales_amount: 10_000.0,
        ..row("1002", "AYSE", "202503", "G", "EKMEK")
    });
    rows.push(LedgerRow {
        diff_qty: -2.0,
        diff_amount: -100.0,
        sales_amount: 5_000.0,
        ..row("2001", "MEHMET", "202503", "H", "PEYNIR")
    });
    // An older count that must not leak into the latest period.
    rows.push(LedgerRow {
        diff_qty: -100.0,
        diff_amount: -99_000.0,
        sales_amount: 1_000.0,
        ..row("1002", "AYSE", "202502", "G", "EKMEK")
    });
    rows
}

fn product(code: &str, points: Option<i32>) -> ProductCandidate {
    ProductCandidate {
        product_code: code.into(),
        risk_points: points,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Component tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_code_filter_drops_blank_codes() {
    let query = AnalysisQuery::default();
    let result = MissingCodeFilter
        .filter(&query, vec![product("A", None), product("  ", None), product("", None)])
        .await
        .unwrap();
    assert_eq!(result.kept.len(), 1);
    assert_eq!(result.removed.len(), 2);
}

#[test]
fn top_risk_selector_keeps_positive_scores_in_order() {
    let selector = TopRiskSelector { k: 2 };
    let selected = selector.select(
        &AnalysisQuery::default(),
        vec![
            product("low", Some(10)),
            product("none", Some(0)),
            product("high", Some(65)),
            product("tie", Some(10)),
            product("negative", Some(-10)),
        ],
    );
    let codes: Vec<&str> = selected.iter().map(|c| c.product_code.as_str()).collect();
    assert_eq!(codes, vec!["high", "low"]);
}

#[test]
fn risk_score_selector_without_top_keeps_all() {
    let store = |code: &str, score: u32| StoreCandidate {
        store_code: code.into(),
        risk_score: Some(score),
        ..Default::default()
    };
    let selected = RiskScoreSelector::default().select(
        &AnalysisQuery::default(),
        vec![store("a", 10), store("b", 70), store("c", 40)],
    );
    let codes: Vec<&str> = selected.iter().map(|c| c.store_code.as_str()).collect();
    assert_eq!(codes, vec!["b", "c", "a"]);
}

// ---------------------------------------------------------------------------
// Risky products pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn risky_products_end_to_end() {
    let pipeline = RiskyProductsPipeline::new(store_1001());
    let result = pipeline
        .execute(AnalysisQuery::new("test-risky", Scope::default()))
        .await;

    assert_eq!(result.retrieved_candidates.len(), 6);
    assert_eq!(result.filtered_candidates.len(), 1);

    let codes: Vec<&str> = result
        .selected_candidates
        .iter()
        .map(|c| c.product_code.as_str())
        .collect();
    assert_eq!(codes, vec!["A", "B", "F", "C"]);

    let top = &result.selected_candidates[0];
    assert!(top.internal_theft);
    assert_eq!(top.risk_points, Some(50));
    assert_eq!(top.risk_reasons, vec!["internal theft"]);

    let chronic = &result.selected_candidates[1];
    assert!(chronic.chronic);
    assert_eq!(chronic.risk_points, Some(45));
    assert_eq!(chronic.risk_reasons, vec!["chronic", "shortage -800"]);
}

#[tokio::test]
async fn family_members_are_ranked_on_their_own_shortage() {
    let pipeline = RiskyProductsPipeline::new(store_1001());
    let result = pipeline.execute(AnalysisQuery::default()).await;

    let member = result
        .selected_candidates
        .iter()
        .find(|c| c.product_code == "C")
        .expect("family member with a -150 shortage is ranked");
    assert_eq!(member.risk_points, Some(10));
    assert!(member.risk_reasons.is_empty());

    // the surplus side of the family earns nothing
    assert!(result.selected_candidates.iter().all(|c| c.product_code != "D"));
}

// ---------------------------------------------------------------------------
// Region digest pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn region_digest_defaults_to_latest_period() {
    let pipeline = RegionDigestPipeline::new(region_rows(), HashSet::new(), RiskConfig::default(), None);
    let result = pipeline
        .execute(AnalysisQuery::new("test-region", Scope::default()))
        .await;

    assert_eq!(result.query.scope.periods, vec!["202503".to_string()]);

    let ranked: Vec<(&str, Option<u32>)> = result
        .selected_candidates
        .iter()
        .map(|s| (s.store_code.as_str(), s.risk_score))
        .collect();
    // 1001: total 27.5% (40) + cigarette 6 (35); 2001: total 2% (25).
    assert_eq!(ranked, vec![("1001", Some(75)), ("2001", Some(25)), ("1002", Some(0))]);

    let worst = &result.selected_candidates[0];
    assert_eq!(worst.risk_level, Some(RiskLevel::Critical));
    assert_eq!(worst.risk_reasons, vec!["Total %27.5", "CIGARETTE 6"]);
    assert_eq!(worst.days, 30);
    assert_eq!(worst.internal_theft_count, 1);

    let quiet = &result.selected_candidates[2];
    assert!((quiet.total_pct - 0.5).abs() < 0.01);
}

#[tokio::test]
async fn region_digest_respects_top_and_manager() {
    let top_one = RegionDigestPipeline::new(region_rows(), HashSet::new(), RiskConfig::default(), Some(1));
    let result = top_one.execute(AnalysisQuery::default()).await;
    assert_eq!(result.selected_candidates.len(), 1);
    assert_eq!(result.selected_candidates[0].store_code, "1001");

    let scoped = RegionDigestPipeline::new(region_rows(), HashSet::new(), RiskConfig::default(), None);
    let scope = Scope {
        sales_manager: Some("MEHMET".into()),
        ..Default::default()
    };
    let result = scoped.execute(AnalysisQuery::new("mehmet", scope)).await;
    assert_eq!(result.selected_candidates.len(), 1);
    assert_eq!(result.selected_candidates[0].store_code, "2001");
}

#[tokio::test]
async fn region_digest_with_no_matching_rows_is_empty() {
    let pipeline = RegionDigestPipeline::new(region_rows(), HashSet::new(), RiskConfig::default(), None);
    let scope = Scope {
        sales_manager: Some("NOBODY".into()),
        ..Default::default()
    };
    let result = pipeline.execute(AnalysisQuery::new("empty", scope)).await;
    assert!(result.retrieved_candidates.is_empty());
    assert!(result.selected_candidates.is_empty());
}

#[tokio::test]
async fn region_groups_by_sales_manager() {
    let pipeline = RegionDigestPipeline::new(region_rows(), HashSet::new(), RiskConfig::default(), None);
    let result = pipeline.execute(AnalysisQuery::default()).await;
    let groups = aggregate_by_group(&result.selected_candidates, GroupBy::SalesManager);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].manager, "AYSE");
    assert_eq!(groups[0].store_count, 2);
    assert!((groups[0].mean_risk_score - 37.5).abs() < 0.01);
    assert_eq!(groups[1].manager, "MEHMET");
}

// ---------------------------------------------------------------------------
// Store analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_analysis_bundles_every_report() {
    let cancellations = vec![CancellationRecord {
        store_code: "1001".into(),
        product_code: "A".into(),
        date: NaiveDate::from_ymd_opt(2025, 3, 18),
        time: "14:02:11".into(),
        till_no: "2".into(),
        ..Default::default()
    }];
    let analysis = analyze_store(&store_1001(), &RiskConfig::default(), &HashSet::new(), &cancellations).await;

    assert_eq!(analysis.store_code, "1001");
    assert_eq!(analysis.store_name, "STORE 1001");

    // 30 open ratio + 25 internal + 25 cigarette
    assert_eq!(analysis.risk.score, 80);
    assert_eq!(analysis.risk.level, RiskLevel::Critical);
    assert_eq!(analysis.metrics.risk_score, Some(75));

    assert_eq!(analysis.internal_theft.len(), 1);
    assert_eq!(
        analysis.internal_theft[0].camera_check.as_deref(),
        Some("CHECK CAMERA 18.03.2025 14:02:11 K2")
    );
    assert_eq!(analysis.chronic_shortage.len(), 1);
    assert!((analysis.cigarette.as_ref().unwrap().shortage_units() - 6.0).abs() < 0.01);
    assert!(analysis
        .families
        .iter()
        .any(|f| f.verdict == FamilyVerdict::CodeMixUp));
    assert_eq!(analysis.risky_products.len(), 4);
    assert_eq!(analysis.cash_register.problem_count, 0);
    assert!(!analysis.summary.group_stats.is_empty());
}

#[tokio::test]
async fn store_analysis_without_cancellations_has_no_camera_hint() {
    let analysis = analyze_store(&store_1001(), &RiskConfig::default(), &HashSet::new(), &[]).await;
    assert!(analysis.internal_theft[0].camera_check.is_none());
}
