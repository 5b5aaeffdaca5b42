use crate::core::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A recommended transfer: `debtor` pays `creditor` the given `amount`.
///
/// Payments are never persisted; they are recomputed from the current
/// balances whenever a group summary is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub debtor: MemberId,
    pub creditor: MemberId,
    pub amount: Decimal,
}

impl Payment {
    pub fn new(debtor: MemberId, creditor: MemberId, amount: Decimal) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {}", self.debtor, self.creditor, self.amount)
    }
}
