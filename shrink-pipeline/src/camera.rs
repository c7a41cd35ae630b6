//! Camera-check hints for internal theft findings.
//!
//! Points the reviewer at the till footage worth pulling: recent cancelled
//! lines on the product itself, or on another high-price product of the same
//! group when the product has none.

use chrono::{Duration, Local, NaiveDate};
use shrink_ledger::{CancellationIndex, CancellationRecord, LedgerRow};

use crate::detectors::internal_theft::MIN_UNIT_PRICE;
use crate::detectors::InternalTheft;

/// How far back from the inventory date cancellations are considered.
const CAMERA_WINDOW_DAYS: i64 = 15;
/// Cancellations listed per hint.
const MAX_LISTED: usize = 3;
const ALT_NAME_CHARS: usize = 30;

/// Format the newest cancellations of `code` on or after `since`, if any.
fn recent_cancellations(index: &CancellationIndex, code: &str, since: NaiveDate) -> Option<String> {
    let mut recent: Vec<(&CancellationRecord, NaiveDate)> = index
        .get(code)
        .iter()
        .filter_map(|r| r.date.filter(|d| *d >= since).map(|d| (r, d)))
        .collect();
    if recent.is_empty() {
        return None;
    }
    recent.sort_by(|a, b| b.1.cmp(&a.1));

    let listed: Vec<String> = recent
        .iter()
        .take(MAX_LISTED)
        .map(|(record, date)| {
            let till = if record.till_no.is_empty() || record.till_no == "nan" {
                String::new()
            } else {
                format!("K{}", record.till_no)
            };
            format!("{} {} {}", date.format("%d.%m.%Y"), record.time, till)
                .trim()
                .to_string()
        })
        .collect();
    Some(format!("CHECK CAMERA {}", listed.join(" | ")))
}

/// High-price product codes of a group, in row order, without repeats.
fn group_codes<'a>(rows: &'a [LedgerRow], group: &str) -> Vec<&'a str> {
    let mut codes: Vec<&str> = Vec::new();
    for row in rows
        .iter()
        .filter(|r| r.product_group == group && r.unit_price >= MIN_UNIT_PRICE)
    {
        if !codes.contains(&row.product_code.as_str()) {
            codes.push(&row.product_code);
        }
    }
    codes
}

/// Fill `camera_check` on every internal theft finding.
///
/// `rows` are the store's rows; the inventory date is taken from the first
/// one, falling back to today.
pub fn enrich_with_camera(
    findings: &mut [InternalTheft],
    rows: &[LedgerRow],
    store_code: &str,
    cancellations: &[CancellationRecord],
) {
    if findings.is_empty() {
        return;
    }
    let inventory_date = rows
        .first()
        .and_then(|r| r.inventory_date)
        .unwrap_or_else(|| Local::now().date_naive());
    let since = inventory_date - Duration::days(CAMERA_WINDOW_DAYS);

    let mut wanted: Vec<&str> = findings.iter().map(|f| f.product_code.as_str()).collect();
    for finding in findings.iter().filter(|f| !f.product_group.is_empty()) {
        wanted.extend(group_codes(rows, &finding.product_group));
    }
    let index = CancellationIndex::for_store(cancellations, store_code, wanted);

    let mut hinted = 0usize;
    for finding in findings.iter_mut() {
        let hint = recent_cancellations(&index, &finding.product_code, since)
            .or_else(|| {
                if finding.product_group.is_empty() {
                    return None;
                }
                group_codes(rows, &finding.product_group)
                    .into_iter()
                    .filter(|code| *code != finding.product_code)
                    .find_map(|code| {
                        let detail = recent_cancellations(&index, code, since)?;
                        let name = rows
                            .iter()
                            .find(|r| r.product_code == code && !r.product_name.is_empty())
                            .map(|r| r.product_name.chars().take(ALT_NAME_CHARS).collect())
                            .unwrap_or_else(|| code.to_string());
                        Some(format!("CATEGORY: {} -> {}", name, detail))
                    })
            });

        if hint.is_some() {
            hinted += 1;
        }
        finding.camera_check = Some(hint.unwrap_or_else(|| {
            if finding.product_group.is_empty() {
                "No cancellation record".to_string()
            } else {
                format!("No 100+ TL cancellations in {}", finding.product_group)
            }
        }));
    }

    log::info!(
        "Camera hints: {}/{} internal theft findings matched cancellations since {}",
        hinted,
        findings.len(),
        since
    );
}
