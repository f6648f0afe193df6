//! Currency conversion over a USD-based rate table.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_CURRENCY, RATE_JITTER};
use crate::error::{CalcError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const fn currency(code: &'static str, name: &'static str, symbol: &'static str) -> Currency {
    Currency { code, name, symbol }
}

pub static CURRENCIES: [Currency; 20] = [
    currency("USD", "US Dollar", "$"),
    currency("EUR", "Euro", "€"),
    currency("GBP", "British Pound", "£"),
    currency("JPY", "Japanese Yen", "¥"),
    currency("AUD", "Australian Dollar", "A$"),
    currency("CAD", "Canadian Dollar", "C$"),
    currency("CHF", "Swiss Franc", "CHF"),
    currency("CNY", "Chinese Yuan", "¥"),
    currency("SEK", "Swedish Krona", "kr"),
    currency("NZD", "New Zealand Dollar", "NZ$"),
    currency("MXN", "Mexican Peso", "$"),
    currency("SGD", "Singapore Dollar", "S$"),
    currency("HKD", "Hong Kong Dollar", "HK$"),
    currency("NOK", "Norwegian Krone", "kr"),
    currency("TRY", "Turkish Lira", "₺"),
    currency("RUB", "Russian Ruble", "₽"),
    currency("INR", "Indian Rupee", "₹"),
    currency("BRL", "Brazilian Real", "R$"),
    currency("ZAR", "South African Rand", "R"),
    currency("KRW", "South Korean Won", "₩"),
];

/// Units of each currency per one USD.
const MOCK_RATES: [(&str, f64); 20] = [
    ("USD", 1.0),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("JPY", 110.0),
    ("AUD", 1.35),
    ("CAD", 1.25),
    ("CHF", 0.92),
    ("CNY", 6.45),
    ("SEK", 8.75),
    ("NZD", 1.42),
    ("MXN", 20.5),
    ("SGD", 1.35),
    ("HKD", 7.8),
    ("NOK", 8.5),
    ("TRY", 8.2),
    ("RUB", 73.5),
    ("INR", 74.2),
    ("BRL", 5.2),
    ("ZAR", 14.8),
    ("KRW", 1180.0),
];

pub fn find_currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::mock()
    }
}

impl RateTable {
    /// The fixed demonstration rates.
    pub fn mock() -> Self {
        Self {
            base: BASE_CURRENCY.to_string(),
            rates: MOCK_RATES
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
        }
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .get(&code.trim().to_ascii_uppercase())
            .copied()
            .filter(|r| *r > 0.0)
    }

    /// `amount / rate(from) * rate(to)`. Both codes must be in the table,
    /// even when they are the same.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        let from_rate = self
            .rate(from)
            .ok_or_else(|| CalcError::UnsupportedCurrency(from.to_string()))?;
        let to_rate = self
            .rate(to)
            .ok_or_else(|| CalcError::UnsupportedCurrency(to.to_string()))?;

        if from.trim().eq_ignore_ascii_case(to.trim()) {
            return Ok(amount);
        }
        Ok(amount / from_rate * to_rate)
    }
}

/// Convert against the fixed mock rates.
pub fn convert_currency(amount: f64, from: &str, to: &str) -> Result<f64> {
    RateTable::mock().convert(amount, from, to)
}

/// Stand-in for a live rate service: the mock rates with up to ±5 %
/// random variation each.
pub fn mock_fetch<R: Rng + ?Sized>(rng: &mut R) -> RateTable {
    let mut table = RateTable::mock();
    for rate in table.rates.values_mut() {
        let variation = (rng.random::<f64>() - 0.5) * RATE_JITTER;
        *rate *= 1.0 + variation;
    }
    table
}

/// Identifies one rate request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RateTicket(u64);

/// Holds the current rate table and arbitrates overlapping fetches.
///
/// Each fetch takes a ticket. A completed response is applied only if its
/// ticket is newer than the one that produced the current rates, so a slow
/// response can never overwrite fresher data.
#[derive(Clone, Debug)]
pub struct RateFeed {
    rates: RateTable,
    issued: u64,
    applied: Option<RateTicket>,
    updated_at: Option<u64>,
}

impl Default for RateFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RateFeed {
    pub fn new() -> Self {
        Self {
            rates: RateTable::mock(),
            issued: 0,
            applied: None,
            updated_at: None,
        }
    }

    pub fn begin_fetch(&mut self) -> RateTicket {
        self.issued += 1;
        RateTicket(self.issued)
    }

    /// Offer a response. Returns whether it was applied.
    pub fn complete(&mut self, ticket: RateTicket, rates: RateTable, now_millis: u64) -> bool {
        if self.applied.is_some_and(|current| ticket <= current) {
            return false;
        }
        self.rates = rates;
        self.applied = Some(ticket);
        self.updated_at = Some(now_millis);
        true
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Unix milliseconds of the last applied response.
    pub fn updated_at(&self) -> Option<u64> {
        self.updated_at
    }

    /// Whether a fetch has been issued that has not been superseded by an
    /// applied response.
    pub fn is_loading(&self) -> bool {
        self.applied.map_or(self.issued > 0, |t| t.0 < self.issued)
    }
}
