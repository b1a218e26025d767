//! Plain-text rendering for terminals and log scrapes.

use std::fmt::Write;

use rust_decimal::Decimal;

use backoffice_accounting::TrailLine;
use backoffice_infra::{AccountReconciliation, RunReport};

fn status(r: &AccountReconciliation, tolerance: Decimal) -> &'static str {
    if r.reconciliation.is_balanced() {
        "ok"
    } else if r.reconciliation.within(tolerance) {
        "near"
    } else {
        "DRIFT"
    }
}

pub fn account(r: &AccountReconciliation, tolerance: Decimal) -> String {
    let rec = &r.reconciliation;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}) {}", r.account_name, r.account_kind.as_str(), rec.account_id);
    let _ = writeln!(out, "  movements   {}", rec.movement_count);
    let _ = writeln!(out, "  expected    {}", rec.expected_balance);
    let _ = writeln!(out, "  stored      {}", rec.stored_balance);
    let _ = writeln!(out, "  difference  {}  [{}]", rec.difference, status(r, tolerance));
    out
}

pub fn trail(lines: &[TrailLine]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20}  {:<7}  {:>14}  {:>14}  DESCRIPTION",
        "OCCURRED", "KIND", "EFFECT", "BALANCE"
    );
    for line in lines {
        let _ = writeln!(
            out,
            "{:<20}  {:<7}  {:>14}  {:>14}  {}",
            line.movement.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            line.movement.kind.as_str(),
            line.effect,
            line.running_balance,
            line.movement.description.as_deref().unwrap_or("")
        );
    }
    out
}

pub fn report(report: &RunReport, tolerance: Decimal) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6}  {:<28}  {:>14}  {:>14}  {:>14}",
        "STATUS", "ACCOUNT", "EXPECTED", "STORED", "DIFFERENCE"
    );

    for r in &report.results {
        let rec = &r.reconciliation;
        let _ = writeln!(
            out,
            "{:<6}  {:<28}  {:>14}  {:>14}  {:>14}",
            status(r, tolerance),
            r.account_name,
            rec.expected_balance,
            rec.stored_balance,
            rec.difference
        );
    }
    for f in &report.failures {
        let _ = writeln!(out, "{:<6}  {:<28}  {}", "FAILED", f.account_name, f.error);
    }

    let drifted = report.discrepancies(tolerance).count();
    let _ = writeln!(
        out,
        "{} accounts: {} within tolerance, {} drifted, {} failed, {} skipped",
        report.results.len() + report.failures.len(),
        report.results.len() - drifted,
        drifted,
        report.failures.len(),
        report.skipped
    );
    out
}
