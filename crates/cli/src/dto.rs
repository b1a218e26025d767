//! JSON shapes of the reconciliation report.

use rust_decimal::Decimal;
use serde_json::{Value, json};

use backoffice_accounting::TrailLine;
use backoffice_infra::{AccountFailure, AccountReconciliation, RunReport};

pub fn reconciliation_to_json(r: &AccountReconciliation, tolerance: Decimal) -> Value {
    let rec = &r.reconciliation;
    json!({
        "account_id": rec.account_id,
        "account_name": r.account_name,
        "account_kind": r.account_kind.as_str(),
        "active": r.active,
        "expected_balance": rec.expected_balance,
        "stored_balance": rec.stored_balance,
        "difference": rec.difference,
        "movement_count": rec.movement_count,
        "within_tolerance": rec.within(tolerance),
    })
}

pub fn failure_to_json(f: &AccountFailure) -> Value {
    json!({
        "account_id": f.account_id,
        "account_name": f.account_name,
        "error": f.error.to_string(),
    })
}

pub fn trail_line_to_json(line: &TrailLine) -> Value {
    json!({
        "movement_id": line.movement.id,
        "occurred_at": line.movement.occurred_at,
        "kind": line.movement.kind.as_str(),
        "amount": line.movement.amount,
        "effect": line.effect,
        "running_balance": line.running_balance,
        "description": line.movement.description,
    })
}

pub fn report_to_json(report: &RunReport, tolerance: Decimal) -> Value {
    json!({
        "tolerance": tolerance,
        "clean": report.is_clean(tolerance),
        "skipped": report.skipped,
        "results": report
            .results
            .iter()
            .map(|r| reconciliation_to_json(r, tolerance))
            .collect::<Vec<_>>(),
        "failures": report.failures.iter().map(failure_to_json).collect::<Vec<_>>(),
    })
}
