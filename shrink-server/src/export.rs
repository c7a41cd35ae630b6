//! CSV export, one file per report sheet.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use shrink_pipeline::detectors::CigaretteShortage;

use crate::report::{RegionReport, StoreReport};

/// Rows written per detail sheet.
const MAX_DETAIL_ROWS: usize = 100;

/// Serialize flat records under their field names. Empty sheets are skipped.
fn write_sheet<T: Serialize>(dir: &Path, name: &str, records: &[T]) -> anyhow::Result<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }
    let path = dir.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    for record in records.iter().take(MAX_DETAIL_ROWS) {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(Some(path))
}

/// Write string rows under an explicit header.
fn write_table(
    dir: &Path,
    name: &str,
    header: &[&str],
    rows: impl IntoIterator<Item = Vec<String>>,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(path)
}

fn summary_rows(comments: &[String], groups: &[shrink_pipeline::region::ProductGroupStat]) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = comments
        .iter()
        .map(|c| vec!["comment".to_string(), c.clone(), String::new(), String::new(), String::new(), String::new()])
        .collect();
    rows.extend(groups.iter().map(|g| {
        vec![
            "group".to_string(),
            g.product_group.clone(),
            format!("{:.2}", g.total_diff),
            format!("{:.2}", g.total_fire),
            format!("{:.2}", g.total_sales),
            g.shortage_count.to_string(),
        ]
    }));
    rows
}

const SUMMARY_HEADER: [&str; 6] = ["kind", "text", "total_diff", "total_fire", "total_sales", "shortage_count"];

fn cigarette_rows(shortage: &CigaretteShortage) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = shortage
        .lines
        .iter()
        .take(MAX_DETAIL_ROWS)
        .map(|l| {
            vec![
                l.product_code.clone(),
                l.product_name.clone(),
                l.diff_qty.to_string(),
                l.partial_qty.to_string(),
                l.prior_diff_qty.to_string(),
                l.product_total.to_string(),
            ]
        })
        .collect();
    rows.push(vec![
        String::new(),
        "TOTAL".to_string(),
        shortage.total_diff.to_string(),
        shortage.total_partial.to_string(),
        shortage.total_prior.to_string(),
        shortage.net_total.to_string(),
    ]);
    rows
}

pub fn export_store(report: &StoreReport, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let a = &report.analysis;
    let mut written = vec![write_table(
        dir,
        "summary",
        &SUMMARY_HEADER,
        summary_rows(&a.summary.comments, &a.summary.group_stats),
    )?];

    written.push(write_table(
        dir,
        "top_risky",
        &["product_code", "product_name", "product_group", "diff_qty", "diff_amount", "fire_amount", "risk_points", "risk_reasons"],
        a.risky_products.iter().map(|p| {
            vec![
                p.product_code.clone(),
                p.product_name.clone(),
                p.product_group.clone(),
                p.diff_qty.to_string(),
                p.diff_amount.to_string(),
                p.fire_amount.to_string(),
                p.risk_points.unwrap_or(0).to_string(),
                p.risk_reasons.join(" | "),
            ]
        }),
    )?);

    written.extend(write_sheet(dir, "chronic", &a.chronic_shortage)?);
    written.extend(write_sheet(dir, "chronic_fire", &a.chronic_fire)?);
    if let Some(shortage) = &a.cigarette {
        written.push(write_table(
            dir,
            "cigarette",
            &["product_code", "product_name", "diff_qty", "partial_qty", "prior_diff_qty", "product_total"],
            cigarette_rows(shortage),
        )?);
    }
    written.extend(write_sheet(dir, "internal_theft", &a.internal_theft)?);
    if !a.families.is_empty() {
        written.push(write_table(
            dir,
            "families",
            &["product_group", "first_words", "brand", "member_count", "total_diff", "total_partial", "total_prior", "family_total", "verdict", "risk", "summary"],
            a.families.iter().take(MAX_DETAIL_ROWS).map(|f| {
                vec![
                    f.product_group.clone(),
                    f.first_words.clone(),
                    f.brand.clone(),
                    f.member_count.to_string(),
                    f.total_diff.to_string(),
                    f.total_partial.to_string(),
                    f.total_prior.to_string(),
                    f.family_total.to_string(),
                    f.verdict.to_string(),
                    f.risk.to_string(),
                    f.summary.clone(),
                ]
            }),
        )?);
    }
    written.extend(write_sheet(dir, "fire_manipulation", &a.fire_manipulation)?);
    written.extend(write_sheet(dir, "external_theft", &a.external_theft)?);
    written.extend(write_sheet(dir, "cash_register", &a.cash_register.lines)?);

    log::info!("Exported {} sheets to {}", written.len(), dir.display());
    Ok(written)
}

pub fn export_region(report: &RegionReport, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = vec![write_table(
        dir,
        "summary",
        &SUMMARY_HEADER,
        summary_rows(&report.summary.comments, &report.summary.group_stats),
    )?];

    written.push(write_table(
        dir,
        "stores",
        &[
            "store_code", "store_name", "sales_manager", "region_manager", "sales", "diff", "fire", "total_loss",
            "diff_pct", "fire_pct", "total_pct", "days", "internal_theft", "chronic", "chronic_fire", "cigarette",
            "fire_manipulation", "cash_qty", "cash_amount", "risk_score", "risk_level", "risk_reasons",
        ],
        report.stores.iter().map(|s| {
            vec![
                s.store_code.clone(),
                s.store_name.clone(),
                s.sales_manager.clone(),
                s.region_manager.clone(),
                format!("{:.2}", s.sales),
                format!("{:.2}", s.diff),
                format!("{:.2}", s.fire),
                format!("{:.2}", s.total_loss),
                format!("{:.2}", s.diff_pct),
                format!("{:.2}", s.fire_pct),
                format!("{:.2}", s.total_pct),
                s.days.to_string(),
                s.internal_theft_count.to_string(),
                s.chronic_count.to_string(),
                s.chronic_fire_count.to_string(),
                format!("{:.0}", s.cigarette_shortage),
                s.fire_manipulation_count.to_string(),
                format!("{:.0}", s.cash_qty),
                format!("{:.2}", s.cash_amount),
                s.risk_score.unwrap_or(0).to_string(),
                s.risk_level.map(|l| l.to_string()).unwrap_or_default(),
                s.risk_reasons.join(" | "),
            ]
        }),
    )?);

    written.extend(write_sheet(dir, "by_group", &report.groups)?);

    log::info!("Exported {} sheets to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shrink_pipeline::detectors::CigaretteLine;

    #[test]
    fn cigarette_sheet_ends_with_totals() {
        let shortage = CigaretteShortage {
            lines: vec![CigaretteLine {
                product_code: "S1".into(),
                product_name: "MARLBORO".into(),
                diff_qty: -4.0,
                partial_qty: 1.0,
                prior_diff_qty: -1.0,
                product_total: -4.0,
            }],
            total_diff: -4.0,
            total_partial: 1.0,
            total_prior: -1.0,
            net_total: -4.0,
        };
        let rows = cigarette_rows(&shortage);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "TOTAL");
        assert_eq!(rows[1][5], "-4");
    }

    #[test]
    fn detail_sheets_are_capped() {
        #[derive(Serialize)]
        struct Line {
            code: usize,
        }
        let dir = std::env::temp_dir().join(format!("shrink-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let lines: Vec<Line> = (0..150).map(|code| Line { code }).collect();

        let path = write_sheet(&dir, "lines", &lines).unwrap().unwrap();
        let text = fs::read_to_string(&path).unwrap();
        // header plus the capped rows
        assert_eq!(text.lines().count(), MAX_DETAIL_ROWS + 1);

        assert!(write_sheet::<Line>(&dir, "empty", &[]).unwrap().is_none());
        fs::remove_dir_all(&dir).unwrap();
    }
}
