//! Balance reconciliation: recompute an account's balance from its movement
//! history and compare it with the stored running balance.
//!
//! Everything here is a pure function over already-fetched data. Fetching the
//! account and its movements is the caller's job.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{AccountId, DomainError, DomainResult};

use crate::account::Account;
use crate::movement::Movement;

/// Outcome of reconciling one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub account_id: AccountId,
    /// `opening_balance + incomes - expenses`.
    pub expected_balance: Decimal,
    /// The running balance the business layer stored on the account.
    pub stored_balance: Decimal,
    /// `stored_balance - expected_balance`.
    pub difference: Decimal,
    pub movement_count: usize,
}

impl Reconciliation {
    /// Exact decimal equality between stored and expected balance.
    pub fn is_balanced(&self) -> bool {
        self.difference.is_zero()
    }

    /// `|difference| <= |tolerance|`.
    pub fn within(&self, tolerance: Decimal) -> bool {
        self.difference.abs() <= tolerance.abs()
    }
}

/// One line of an account's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailLine {
    pub movement: Movement,
    /// Signed effect of the movement on the balance.
    pub effect: Decimal,
    /// Balance right after this movement.
    pub running_balance: Decimal,
}

/// Reconcile `account` against its complete movement history.
///
/// `account` is `None` when the caller's lookup found nothing; that is
/// rejected as [`DomainError::InvalidInput`], as are negative amounts and
/// movements that belong to another account.
pub fn reconcile(
    account: Option<&Account>,
    movements: &[Movement],
) -> DomainResult<Reconciliation> {
    let account = require_account(account)?;
    validate_movements(account, movements)?;

    let expected_balance = movements
        .iter()
        .try_fold(account.opening_balance, |balance, m| apply(balance, m))?;

    let difference = account
        .current_balance
        .checked_sub(expected_balance)
        .ok_or_else(|| DomainError::invalid_input("balance difference exceeds decimal range"))?;

    Ok(Reconciliation {
        account_id: account.id,
        expected_balance,
        stored_balance: account.current_balance,
        difference,
        movement_count: movements.len(),
    })
}

/// Running-balance view of the movements, oldest first.
///
/// Ties on `occurred_at` keep the order they were given in. The last line's
/// running balance equals the `expected_balance` of [`reconcile`].
pub fn audit_trail(
    account: Option<&Account>,
    movements: &[Movement],
) -> DomainResult<Vec<TrailLine>> {
    let account = require_account(account)?;
    validate_movements(account, movements)?;

    let mut ordered = movements.to_vec();
    ordered.sort_by_key(|m| m.occurred_at);

    let mut balance = account.opening_balance;
    let mut lines = Vec::with_capacity(ordered.len());
    for movement in ordered {
        balance = apply(balance, &movement)?;
        lines.push(TrailLine {
            effect: movement.signed_amount(),
            running_balance: balance,
            movement,
        });
    }

    Ok(lines)
}

fn require_account(account: Option<&Account>) -> DomainResult<&Account> {
    account.ok_or_else(|| DomainError::invalid_input("account is required"))
}

fn validate_movements(account: &Account, movements: &[Movement]) -> DomainResult<()> {
    for m in movements {
        if m.amount.is_sign_negative() && !m.amount.is_zero() {
            return Err(DomainError::invalid_input(format!(
                "movement {} has negative amount {}",
                m.id, m.amount
            )));
        }
        if m.account_id != account.id {
            return Err(DomainError::invalid_input(format!(
                "movement {} belongs to account {}, not {}",
                m.id, m.account_id, account.id
            )));
        }
    }
    Ok(())
}

fn apply(balance: Decimal, movement: &Movement) -> DomainResult<Decimal> {
    balance
        .checked_add(movement.signed_amount())
        .ok_or_else(|| DomainError::invalid_input("balance exceeds decimal range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountKind;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn test_time(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn test_account(opening: Decimal, current: Decimal) -> Account {
        Account::new(
            AccountId::new(),
            "Caja principal",
            AccountKind::CashRegister,
            opening,
            current,
        )
    }

    #[test]
    fn scenario_income_and_expense_with_drift() {
        let account = test_account(dec!(1000), dec!(9500));
        let movements = vec![
            Movement::income(account.id, dec!(8000), test_time(0)),
            Movement::expense(account.id, dec!(500), test_time(1)),
        ];

        let r = reconcile(Some(&account), &movements).unwrap();
        assert_eq!(r.expected_balance, dec!(8500));
        assert_eq!(r.stored_balance, dec!(9500));
        assert_eq!(r.difference, dec!(1000));
        assert_eq!(r.movement_count, 2);
        assert!(!r.is_balanced());
    }

    #[test]
    fn scenario_empty_account_is_balanced() {
        let account = test_account(dec!(0), dec!(0));
        let r = reconcile(Some(&account), &[]).unwrap();
        assert_eq!(r.expected_balance, dec!(0));
        assert_eq!(r.difference, dec!(0));
        assert!(r.is_balanced());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let account = test_account(dec!(0), dec!(0));
        let movements = vec![Movement::income(account.id, dec!(-5), test_time(0))];

        let err = reconcile(Some(&account), &movements).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.contains("negative")));
    }

    #[test]
    fn missing_account_is_rejected() {
        let err = reconcile(None, &[]).unwrap_err();
        assert_eq!(err, DomainError::invalid_input("account is required"));
    }

    #[test]
    fn foreign_movement_is_rejected() {
        let account = test_account(dec!(0), dec!(0));
        let movements = vec![Movement::income(AccountId::new(), dec!(10), test_time(0))];

        let err = reconcile(Some(&account), &movements).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.contains("belongs to")));
    }

    #[test]
    fn negative_zero_amount_is_accepted() {
        let account = test_account(dec!(10), dec!(10));
        let movements = vec![Movement::expense(account.id, -dec!(0), test_time(0))];

        let r = reconcile(Some(&account), &movements).unwrap();
        assert!(r.is_balanced());
    }

    #[test]
    fn decimal_cents_do_not_drift() {
        let account = test_account(dec!(0), dec!(0.30));
        let movements = vec![
            Movement::income(account.id, dec!(0.10), test_time(0)),
            Movement::income(account.id, dec!(0.20), test_time(1)),
        ];

        let r = reconcile(Some(&account), &movements).unwrap();
        assert!(r.is_balanced());
    }

    #[test]
    fn tolerance_is_symmetric() {
        let account = test_account(dec!(100), dec!(99.99));
        let r = reconcile(Some(&account), &[]).unwrap();
        assert_eq!(r.difference, dec!(-0.01));
        assert!(r.within(dec!(0.01)));
        assert!(!r.within(dec!(0.005)));
        assert!(!r.within(Decimal::ZERO));
    }

    #[test]
    fn trail_is_ordered_by_time_and_ends_at_expected() {
        let account = test_account(dec!(1000), dec!(9500));
        let late =
            Movement::expense(account.id, dec!(500), test_time(10)).with_description("cambio");
        let early =
            Movement::income(account.id, dec!(8000), test_time(0)).with_description("cobro");
        let movements = vec![late.clone(), early.clone()];

        let trail = audit_trail(Some(&account), &movements).unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].movement, early);
        assert_eq!(trail[0].effect, dec!(8000));
        assert_eq!(trail[0].running_balance, dec!(9000));
        assert_eq!(trail[1].movement, late);
        assert_eq!(trail[1].effect, dec!(-500));
        assert_eq!(trail[1].running_balance, dec!(8500));

        let r = reconcile(Some(&account), &movements).unwrap();
        assert_eq!(trail.last().unwrap().running_balance, r.expected_balance);
    }

    #[test]
    fn trail_rejects_the_same_input_as_reconcile() {
        let account = test_account(dec!(0), dec!(0));

        let err = audit_trail(None, &[]).unwrap_err();
        assert_eq!(err, DomainError::invalid_input("account is required"));

        let negative = vec![Movement::expense(account.id, dec!(-5), test_time(0))];
        let err = audit_trail(Some(&account), &negative).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.contains("negative")));

        let foreign = vec![Movement::income(AccountId::new(), dec!(10), test_time(0))];
        let err = audit_trail(Some(&account), &foreign).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(msg) if msg.contains("belongs to")));
    }

    #[test]
    fn trail_keeps_input_order_on_timestamp_ties() {
        let account = test_account(dec!(0), dec!(0));
        let a = Movement::income(account.id, dec!(1), test_time(0));
        let b = Movement::expense(account.id, dec!(1), test_time(0));

        let trail = audit_trail(Some(&account), &[a.clone(), b.clone()]).unwrap();
        assert_eq!(trail[0].movement, a);
        assert_eq!(trail[1].movement, b);
    }

    fn movement_strategy() -> impl Strategy<Value = (bool, i64)> {
        (any::<bool>(), 0i64..100_000_000i64)
    }

    fn build(account: &Account, specs: &[(bool, i64)]) -> Vec<Movement> {
        specs
            .iter()
            .enumerate()
            .map(|(i, (is_income, cents))| {
                let amount = Decimal::new(*cents, 2);
                if *is_income {
                    Movement::income(account.id, amount, test_time(i as i64))
                } else {
                    Movement::expense(account.id, amount, test_time(i as i64))
                }
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: with no movements the expected balance is the opening balance.
        #[test]
        fn no_movements_yields_opening_balance(opening in -1_000_000_00i64..1_000_000_00i64,
                                               stored in -1_000_000_00i64..1_000_000_00i64) {
            let account = test_account(Decimal::new(opening, 2), Decimal::new(stored, 2));
            let r = reconcile(Some(&account), &[]).unwrap();
            prop_assert_eq!(r.expected_balance, account.opening_balance);
            prop_assert_eq!(r.difference, account.current_balance - account.opening_balance);
        }

        /// Property: reordering movements never changes the expected balance.
        #[test]
        fn reordering_does_not_change_expected(
            specs in prop::collection::vec(movement_strategy(), 0..40),
            seed in any::<u64>(),
        ) {
            let account = test_account(dec!(250.75), dec!(0));
            let movements = build(&account, &specs);

            let mut shuffled = movements.clone();
            shuffled.reverse();
            if !shuffled.is_empty() {
                let len = shuffled.len();
                shuffled.rotate_left((seed as usize) % len);
            }

            let a = reconcile(Some(&account), &movements).unwrap();
            let b = reconcile(Some(&account), &shuffled).unwrap();
            prop_assert_eq!(a.expected_balance, b.expected_balance);
        }

        /// Property: reconciling twice yields identical results.
        #[test]
        fn reconcile_is_idempotent(specs in prop::collection::vec(movement_strategy(), 0..40)) {
            let account = test_account(dec!(10), dec!(20));
            let movements = build(&account, &specs);
            let first = reconcile(Some(&account), &movements).unwrap();
            let second = reconcile(Some(&account), &movements).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: a zero-amount movement of either kind is neutral.
        #[test]
        fn zero_amount_is_neutral(specs in prop::collection::vec(movement_strategy(), 0..20),
                                  is_income in any::<bool>()) {
            let account = test_account(dec!(0), dec!(0));
            let movements = build(&account, &specs);
            let mut with_zero = movements.clone();
            with_zero.extend(build(&account, &[(is_income, 0)]));

            let base = reconcile(Some(&account), &movements).unwrap();
            let extended = reconcile(Some(&account), &with_zero).unwrap();
            prop_assert_eq!(base.expected_balance, extended.expected_balance);
        }
    }
}
