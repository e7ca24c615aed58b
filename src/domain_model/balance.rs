use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Customer balance in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Credit,
    Debit,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("balance change from {old} to {new} does not fit in i64")]
    Overflow { old: i64, new: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub delta: i64,
    pub kind: AdjustmentKind,
}

impl BalanceAdjustment {
    /// Signed change that takes `old` to `new`. A higher balance is a credit.
    pub fn between(old: Balance, new: Balance) -> Result<Self, BalanceError> {
        let delta = new.0.checked_sub(old.0).ok_or(BalanceError::Overflow {
            old: old.0,
            new: new.0,
        })?;
        let kind = match delta {
            d if d > 0 => AdjustmentKind::Credit,
            d if d < 0 => AdjustmentKind::Debit,
            _ => AdjustmentKind::Unchanged,
        };
        Ok(Self { delta, kind })
    }

    pub fn amount(&self) -> u64 {
        self.delta.unsigned_abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raising_balance_is_a_credit() {
        let adj = BalanceAdjustment::between(Balance(1_000), Balance(1_250)).unwrap();
        assert_eq!(adj.delta, 250);
        assert_eq!(adj.kind, AdjustmentKind::Credit);
    }

    #[test]
    fn lowering_balance_is_a_debit() {
        let adj = BalanceAdjustment::between(Balance(500), Balance(-200)).unwrap();
        assert_eq!(adj.delta, -700);
        assert_eq!(adj.kind, AdjustmentKind::Debit);
        assert_eq!(adj.amount(), 700);
    }

    #[test]
    fn same_balance_is_unchanged() {
        let adj = BalanceAdjustment::between(Balance(42), Balance(42)).unwrap();
        assert_eq!(adj.kind, AdjustmentKind::Unchanged);
        assert_eq!(adj.amount(), 0);
    }

    #[test]
    fn serializes_kind_lowercase() {
        let adj = BalanceAdjustment::between(Balance(0), Balance(10)).unwrap();
        let json = serde_json::to_value(adj).unwrap();
        assert_eq!(json["kind"], "credit");
        assert_eq!(json["delta"], 10);
    }

    #[test]
    fn extreme_balances_overflow_instead_of_wrapping() {
        assert_eq!(
            BalanceAdjustment::between(Balance(i64::MIN), Balance(i64::MAX)),
            Err(BalanceError::Overflow {
                old: i64::MIN,
                new: i64::MAX,
            })
        );
        assert!(BalanceAdjustment::between(Balance(1), Balance(i64::MIN)).is_err());
    }

    #[test]
    fn largest_representable_change_is_accepted() {
        let adj = BalanceAdjustment::between(Balance(0), Balance(i64::MIN)).unwrap();
        assert_eq!(adj.kind, AdjustmentKind::Debit);
        assert_eq!(adj.amount(), 1 << 63);

        let adj = BalanceAdjustment::between(Balance(-1), Balance(i64::MAX - 1)).unwrap();
        assert_eq!(adj.delta, i64::MAX);
        assert!(BalanceAdjustment::between(Balance(-1), Balance(i64::MAX)).is_err());
    }
}
