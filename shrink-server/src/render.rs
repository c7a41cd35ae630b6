//! Formatted text digests.

use shrink_pipeline::util::format_thousands;

use crate::report::{RegionReport, StoreReport};

const RULE_WIDTH: usize = 64;

/// `1.234 TL`
pub fn format_tl(amount: f64) -> String {
    format!("{} TL", format_thousands(amount))
}

/// `%1.5`
pub fn format_pct(value: f64) -> String {
    format!("%{:.1}", value)
}

fn banner(title: &str) {
    println!();
    println!("  \u{2554}{}\u{2557}", "\u{2550}".repeat(RULE_WIDTH));
    println!("  \u{2551}{:^width$}\u{2551}", title, width = RULE_WIDTH);
    println!("  \u{255a}{}\u{255d}", "\u{2550}".repeat(RULE_WIDTH));
    println!();
}

fn section(title: &str, count: usize) {
    println!();
    println!("  {} ({})", title, count);
    println!("  {:\u{2500}<width$}", "", width = RULE_WIDTH);
}

fn truncate(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

pub fn print_store(report: &StoreReport) {
    let a = &report.analysis;
    banner(&format!("SHRINK SENTINEL \u{00b7} Store {} {}", a.store_code, a.store_name));

    let m = &a.metrics;
    println!(
        "  Periods: {}  \u{00b7}  {} rows  \u{00b7}  {} days",
        if report.periods.is_empty() { "-".to_string() } else { report.periods.join(", ") },
        report.rows_analyzed,
        m.days
    );
    println!(
        "  Sales {}  \u{00b7}  Diff {} ({})  \u{00b7}  Fire {} ({})",
        format_tl(m.sales),
        format_tl(m.diff),
        format_pct(m.diff_pct),
        format_tl(m.fire),
        format_pct(m.fire_pct)
    );
    println!(
        "  Total loss {} ({})  \u{00b7}  daily diff {}  \u{00b7}  daily fire {}",
        format_tl(m.total_loss),
        format_pct(m.total_pct),
        format_tl(m.daily_diff),
        format_tl(m.daily_fire)
    );
    println!();
    println!(
        "  Risk {} / 100  {}  (open ratio {})",
        a.risk.score,
        a.risk.level,
        format_pct(a.risk.open_ratio)
    );
    for reason in &a.risk.reasons {
        println!("    - {}", reason);
    }

    if !a.summary.comments.is_empty() {
        section("Summary", a.summary.comments.len());
        for comment in &a.summary.comments {
            println!("  \u{2022} {}", comment);
        }
    }

    if !a.risky_products.is_empty() {
        section("Top risky products", a.risky_products.len());
        for (i, p) in a.risky_products.iter().enumerate() {
            println!(
                "  {:>2}. {:12} {:30} {:>12}  {:>3} pts  {}",
                i + 1,
                p.product_code,
                truncate(&p.product_name, 30),
                format_tl(p.diff_amount),
                p.risk_points.unwrap_or(0),
                p.risk_reasons.join(" | ")
            );
        }
    }

    if !a.internal_theft.is_empty() {
        section("Internal theft", a.internal_theft.len());
        for f in &a.internal_theft {
            println!(
                "  {:12} {:30} total {:>6.0}  cancelled {:>4.0}  {:14} {}",
                f.product_code,
                truncate(&f.product_name, 30),
                f.total_qty,
                f.cancelled_qty,
                f.match_label,
                f.risk
            );
            if let Some(hint) = &f.camera_check {
                println!("               {}", hint);
            }
        }
    }

    if !a.chronic_shortage.is_empty() {
        section("Chronic shortage", a.chronic_shortage.len());
        for f in &a.chronic_shortage {
            println!(
                "  {:12} {:30} now {:>6.0}  prior {:>6.0}  {:>12}",
                f.product_code,
                truncate(&f.product_name, 30),
                f.diff_qty,
                f.prior_diff_qty,
                format_tl(f.total_amount)
            );
        }
    }

    if let Some(c) = &a.cigarette {
        section("Cigarette shortage", c.lines.len());
        for line in &c.lines {
            println!(
                "  {:12} {:30} {:>6.0}",
                line.product_code,
                truncate(&line.product_name, 30),
                line.product_total
            );
        }
        println!("  Net {:.0} units", c.net_total);
    }

    if !a.families.is_empty() {
        section("Product families", a.families.len());
        for f in &a.families {
            println!("  {:20} {:>4.0}  {}  {}", f.first_words, f.family_total, f.verdict, f.summary);
        }
    }

    let minor = [
        ("Chronic fire", a.chronic_fire.len()),
        ("Fire manipulation", a.fire_manipulation.len()),
        ("External theft", a.external_theft.len()),
        ("Cash-register lines", a.cash_register.problem_count),
    ];
    println!();
    println!(
        "  {}",
        minor
            .iter()
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect::<Vec<_>>()
            .join("  \u{00b7}  ")
    );
    println!();
    println!("  \u{23f1}  Analysis ran in {}ms", report.analysis_ms);
    println!();
}

pub fn print_region(report: &RegionReport) {
    let title = match &report.manager {
        Some(manager) => format!("SHRINK SENTINEL \u{00b7} Region digest \u{00b7} {}", manager),
        None => "SHRINK SENTINEL \u{00b7} Region digest".to_string(),
    };
    banner(&title);

    let t = &report.totals;
    println!(
        "  Periods: {}  \u{00b7}  {} stores  \u{00b7}  {} critical",
        if report.periods.is_empty() { "-".to_string() } else { report.periods.join(", ") },
        t.store_count,
        t.critical_stores
    );
    println!(
        "  Sales {}  \u{00b7}  Diff {}  \u{00b7}  Fire {}  \u{00b7}  Total {} ({})",
        format_tl(t.sales),
        format_tl(t.diff),
        format_tl(t.fire),
        format_tl(t.total_loss),
        format_pct(t.total_pct)
    );

    if report.stores.is_empty() {
        println!();
        println!("  No stores in scope.");
    } else {
        section("Stores by risk", report.stores.len());
        for (i, s) in report.stores.iter().enumerate() {
            let level = s.risk_level.map(|l| l.to_string()).unwrap_or_default();
            println!(
                "  {:>3}. {:8} {:24} {:>12} {:>7}  {:>3}  {}",
                i + 1,
                s.store_code,
                truncate(&s.store_name, 24),
                format_tl(s.total_loss),
                format_pct(s.total_pct),
                s.risk_score.unwrap_or(0),
                level
            );
            if !s.risk_reasons.is_empty() {
                println!("        {}", s.risk_reasons.join(" | "));
            }
        }
    }

    if !report.groups.is_empty() {
        section("By manager", report.groups.len());
        for g in &report.groups {
            println!(
                "  {:24} {:>3} stores  {:>12} {:>7}  mean score {:.1}",
                truncate(&g.manager, 24),
                g.store_count,
                format_tl(g.total_loss),
                format_pct(g.total_pct),
                g.mean_risk_score
            );
        }
    }

    if !report.summary.comments.is_empty() {
        section("Summary", report.summary.comments.len());
        for comment in &report.summary.comments {
            println!("  \u{2022} {}", comment);
        }
    }

    println!();
    println!("  \u{23f1}  Pipeline ran in {}ms", report.pipeline_ms);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_and_ratios() {
        assert_eq!(format_tl(-1234.4), "-1.234 TL");
        assert_eq!(format_tl(12.0), "12 TL");
        assert_eq!(format_pct(1.46), "%1.5");
    }
}
