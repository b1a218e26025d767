use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{AccountId, DomainError, Entity, MovementId};

/// Direction of a movement relative to its account's balance.
///
/// Parsed case-insensitively: the business layer has written `income`,
/// `Income` and `INCOME` over the years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MovementKind {
    Income,
    Expense,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Income => "income",
            MovementKind::Expense => "expense",
        }
    }
}

impl FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("income") {
            Ok(MovementKind::Income)
        } else if s.eq_ignore_ascii_case("expense") {
            Ok(MovementKind::Expense)
        } else {
            Err(DomainError::invalid_input(format!(
                "unknown movement kind '{s}' (expected income or expense)"
            )))
        }
    }
}

impl TryFrom<String> for MovementKind {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single posted transaction affecting one account's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub account_id: AccountId,
    pub kind: MovementKind,
    /// Non-negative; the direction comes from `kind`.
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Movement {
    pub fn new(
        account_id: AccountId,
        kind: MovementKind,
        amount: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MovementId::new(),
            account_id,
            kind,
            amount,
            occurred_at,
            description: None,
        }
    }

    pub fn income(account_id: AccountId, amount: Decimal, occurred_at: DateTime<Utc>) -> Self {
        Self::new(account_id, MovementKind::Income, amount, occurred_at)
    }

    pub fn expense(account_id: AccountId, amount: Decimal, occurred_at: DateTime<Utc>) -> Self {
        Self::new(account_id, MovementKind::Expense, amount, occurred_at)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Effect on the account balance: `+amount` for income, `-amount` for expense.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            MovementKind::Income => self.amount,
            MovementKind::Expense => -self.amount,
        }
    }
}

impl Entity for Movement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
