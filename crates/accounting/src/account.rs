use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{AccountId, Entity};

/// What kind of balance-bearing entity an account is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// A physical cash register ("caja").
    CashRegister,
    BankAccount,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::CashRegister => "cash_register",
            AccountKind::BankAccount => "bank_account",
        }
    }
}

/// A balance-bearing account as persisted by the business layer.
///
/// `current_balance` is the running balance the business layer maintains on
/// every posting; reconciliation checks it against the movement history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub kind: AccountKind,
    pub opening_balance: Decimal,
    pub current_balance: Decimal,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl Account {
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        kind: AccountKind,
        opening_balance: Decimal,
        current_balance: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            opening_balance,
            current_balance,
            active: true,
        }
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
