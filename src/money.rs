use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits with an optional two-digit fraction: "10", "10.00". Not "10.5".
static RATE_INPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d{2})?$").unwrap());

/// An amount of currency in whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub fn from_cents(cents: u64) -> Self {
        Money { cents }
    }

    pub fn cents(self) -> u64 {
        self.cents
    }

    /// Parses a rate typed by the user. Anything outside the strict
    /// decimal-currency pattern is rejected.
    pub fn parse_rate(input: &str) -> Option<Money> {
        if !RATE_INPUT.is_match(input) {
            return None;
        }
        let (whole, frac) = match input.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (input, "00"),
        };
        let whole: u64 = whole.parse().ok()?;
        let frac: u64 = frac.parse().ok()?;
        whole.checked_mul(100)?.checked_add(frac).map(Money::from_cents)
    }

    /// Reads the persisted `"$ N.NN"` form. Empty or unreadable amounts are zero.
    pub fn parse_display(text: &str) -> Money {
        let amount = text.trim().trim_start_matches('$').trim();
        match amount.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => {
                Money::from_cents((value * 100.0).round() as u64)
            }
            _ => Money::ZERO,
        }
    }

    /// This rate, treated as per hour, over `elapsed_secs` seconds.
    pub fn prorate(self, elapsed_secs: f64) -> Money {
        let cents = self.cents as f64 * elapsed_secs.max(0.0) / 3600.0;
        Money::from_cents(cents.round() as u64)
    }

    /// The bare `N.NN` form, which `parse_rate` accepts back.
    pub fn to_input(self) -> String {
        format!("{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$ {}.{:02}", self.cents / 100, self.cents % 100)
    }
}
