//! Price brackets offered by the budget question.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BudgetBracket {
    UpTo50,
    From51To150,
    From151To300,
    From301To500,
    Above500,
}

impl BudgetBracket {
    pub const ALL: [BudgetBracket; 5] = [
        Self::UpTo50,
        Self::From51To150,
        Self::From151To300,
        Self::From301To500,
        Self::Above500,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::UpTo50 => "Até R$ 50",
            Self::From51To150 => "R$ 51 - R$ 150",
            Self::From151To300 => "R$ 151 - R$ 300",
            Self::From301To500 => "R$ 301 - R$ 500",
            Self::Above500 => "Acima de R$ 500",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|bracket| bracket.label() == label)
    }

    pub fn min(self) -> Decimal {
        match self {
            Self::UpTo50 => Decimal::ZERO,
            Self::From51To150 => Decimal::from(51),
            Self::From151To300 => Decimal::from(151),
            Self::From301To500 => Decimal::from(301),
            Self::Above500 => Decimal::from(501),
        }
    }

    /// `None` for the open-ended top bracket.
    pub fn max(self) -> Option<Decimal> {
        match self {
            Self::UpTo50 => Some(Decimal::from(50)),
            Self::From51To150 => Some(Decimal::from(150)),
            Self::From151To300 => Some(Decimal::from(300)),
            Self::From301To500 => Some(Decimal::from(500)),
            Self::Above500 => None,
        }
    }

    /// Closed range check on both ends.
    pub fn contains(self, price: Decimal) -> bool {
        price >= self.min() && self.max().map_or(true, |max| price <= max)
    }

    /// The first bracket whose upper bound is at least `price`. Prices in the
    /// gaps between brackets (50.50, 150.01, ...) land in the next bracket up,
    /// and anything above 500 lands in the open-ended one.
    pub fn classify(price: Decimal) -> Self {
        Self::ALL
            .into_iter()
            .find(|bracket| bracket.max().map_or(true, |max| price <= max))
            .unwrap_or(Self::Above500)
    }
}

/// Unknown labels match every price.
pub fn price_matches_label(price: Decimal, label: &str) -> bool {
    BudgetBracket::from_label(label).map_or(true, |bracket| bracket.contains(price))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{price_matches_label, BudgetBracket};

    #[test]
    fn classify_uses_inclusive_upper_bounds() {
        assert_eq!(BudgetBracket::classify(Decimal::ZERO), BudgetBracket::UpTo50);
        assert_eq!(BudgetBracket::classify(Decimal::from(50)), BudgetBracket::UpTo50);
        assert_eq!(BudgetBracket::classify(Decimal::from(51)), BudgetBracket::From51To150);
        assert_eq!(BudgetBracket::classify(Decimal::new(8990, 2)), BudgetBracket::From51To150);
        assert_eq!(BudgetBracket::classify(Decimal::from(300)), BudgetBracket::From151To300);
        assert_eq!(BudgetBracket::classify(Decimal::from(500)), BudgetBracket::From301To500);
        assert_eq!(BudgetBracket::classify(Decimal::from(12_000)), BudgetBracket::Above500);
    }

    #[test]
    fn gap_prices_round_up_to_next_bracket() {
        assert_eq!(BudgetBracket::classify(Decimal::new(5050, 2)), BudgetBracket::From51To150);
        assert_eq!(BudgetBracket::classify(Decimal::new(50_050, 2)), BudgetBracket::Above500);
    }

    #[test]
    fn label_matching_is_closed_on_both_ends() {
        assert!(price_matches_label(Decimal::from(51), "R$ 51 - R$ 150"));
        assert!(price_matches_label(Decimal::from(150), "R$ 51 - R$ 150"));
        assert!(!price_matches_label(Decimal::new(15_001, 2), "R$ 51 - R$ 150"));
        assert!(!price_matches_label(Decimal::from(50), "R$ 51 - R$ 150"));
        assert!(price_matches_label(Decimal::from(9_999), "Acima de R$ 500"));
    }

    #[test]
    fn unknown_label_always_matches() {
        assert!(price_matches_label(Decimal::from(10_000), "qualquer valor"));
        assert!(price_matches_label(Decimal::ZERO, ""));
    }

    #[test]
    fn labels_round_trip() {
        for bracket in BudgetBracket::ALL {
            assert_eq!(BudgetBracket::from_label(bracket.label()), Some(bracket));
        }
    }
}
