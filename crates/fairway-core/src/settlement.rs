use serde::{Deserialize, Serialize};

use crate::format::format_currency;

/// One party's net result. Positive amounts are collected, negative are paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub party: String,
    pub amount: f64,
}

/// Money owed at the end of a game, with the sentence shown to players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub balances: Vec<Balance>,
    pub summary: String,
}

pub const ALL_SQUARE: &str = "All square - no money changes hands";
pub const NO_POINTS: &str = "No points awarded yet";

impl Settlement {
    /// Two-party settlement. `amount` is what party one is owed by party two.
    pub fn head_to_head(party1: &str, party2: &str, amount: f64) -> Self {
        let summary = if amount > 0.0 {
            format!("{party2} owes {party1} {}", format_currency(amount))
        } else if amount < 0.0 {
            format!("{party1} owes {party2} {}", format_currency(amount))
        } else {
            ALL_SQUARE.to_string()
        };
        Self {
            balances: vec![
                Balance {
                    party: party1.to_string(),
                    amount,
                },
                Balance {
                    party: party2.to_string(),
                    amount: -amount,
                },
            ],
            summary,
        }
    }

    /// Many-party settlement listing who collects and who pays.
    ///
    /// Parties with a zero balance are left out of the sentence but kept in
    /// `balances`. `empty` is the sentence used when nobody is up or down.
    pub fn collect_and_pay(balances: Vec<Balance>, empty: &str) -> Self {
        let parts: Vec<String> = balances
            .iter()
            .filter_map(|b| {
                if b.amount > 0.0 {
                    Some(format!("{} collects {}", b.party, format_currency(b.amount)))
                } else if b.amount < 0.0 {
                    Some(format!("{} pays {}", b.party, format_currency(b.amount)))
                } else {
                    None
                }
            })
            .collect();
        let summary = if parts.is_empty() {
            empty.to_string()
        } else {
            parts.join(", ")
        };
        Self { balances, summary }
    }

    pub fn amount_for(&self, party: &str) -> Option<f64> {
        self.balances
            .iter()
            .find(|b| b.party == party)
            .map(|b| b.amount)
    }

    /// Sum of every balance; zero for a closed settlement.
    pub fn net(&self) -> f64 {
        self.balances.iter().map(|b| b.amount).sum()
    }
}
