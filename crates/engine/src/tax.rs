//! Sales tax on package purchases.
//!
//! Sign convention used everywhere in the engine:
//!
//! - `absorb_tax = true`: the client pays the package price and the business
//!   pays the tax. `net_after_tax == amount`, `tax_charged_to_client == false`
//!   and the order `total` is `amount`.
//! - `absorb_tax = false`: the tax is loaded on top of the price.
//!   `net_after_tax == amount + tax`, `tax_charged_to_client == true` and the
//!   order `total` is `amount + tax`.
//!
//! In both cases `net_after_tax` is exactly what the client is charged and the
//! commission split is computed on the pre-tax `amount`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, money::BPS_SCALE};

/// Jurisdiction code (e.g. a US state) to tax rate in basis points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    rates_bps: HashMap<String, i64>,
}

impl TaxTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rate(mut self, jurisdiction: &str, rate_bps: i64) -> Self {
        self.insert(jurisdiction, rate_bps);
        self
    }

    /// Rates are clamped to `0..=100%`.
    pub fn insert(&mut self, jurisdiction: &str, rate_bps: i64) {
        self.rates_bps.insert(
            normalize_jurisdiction(jurisdiction),
            rate_bps.clamp(0, BPS_SCALE),
        );
    }

    /// Rate for a jurisdiction, `0` when missing or unknown.
    #[must_use]
    pub fn rate_bps(&self, jurisdiction: Option<&str>) -> i64 {
        jurisdiction
            .map(normalize_jurisdiction)
            .and_then(|code| self.rates_bps.get(&code).copied())
            .unwrap_or(0)
    }

    /// Computes the tax breakdown for `amount`.
    pub fn compute_tax(
        &self,
        amount: MoneyCents,
        jurisdiction: Option<&str>,
        absorb_tax: bool,
    ) -> ResultEngine<TaxBreakdown> {
        compute_tax(amount, self.rate_bps(jurisdiction), absorb_tax)
    }
}

fn normalize_jurisdiction(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub gross_amount: MoneyCents,
    pub tax_rate_bps: i64,
    pub tax_amount: MoneyCents,
    pub net_after_tax: MoneyCents,
    pub tax_charged_to_client: bool,
}

/// Tax breakdown at an explicit rate. See the module docs for the sign
/// convention. Fails with `InvalidAmount` when the loaded total does not fit.
pub fn compute_tax(
    amount: MoneyCents,
    tax_rate_bps: i64,
    absorb_tax: bool,
) -> ResultEngine<TaxBreakdown> {
    let tax_rate_bps = tax_rate_bps.clamp(0, BPS_SCALE);
    let tax_amount = amount.portion_half_up(tax_rate_bps);
    let net_after_tax = if absorb_tax {
        amount
    } else {
        amount
            .checked_add(tax_amount)
            .ok_or_else(|| EngineError::InvalidAmount("order total with tax too large".to_string()))?
    };
    Ok(TaxBreakdown {
        gross_amount: amount,
        tax_rate_bps,
        tax_amount,
        net_after_tax,
        tax_charged_to_client: !absorb_tax,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TaxTable {
        TaxTable::new().with_rate("ca", 800).with_rate("OR", 0)
    }

    #[test]
    fn absorbed_tax_keeps_net_equal_to_amount() {
        let table = table();
        for jurisdiction in [Some("CA"), Some("OR"), Some("ZZ"), None] {
            for cents in [0, 1, 333, 50_000] {
                let breakdown = table.compute_tax(MoneyCents::new(cents), jurisdiction, true).unwrap();
                assert_eq!(breakdown.net_after_tax.cents(), cents);
                assert!(!breakdown.tax_charged_to_client);
            }
        }
    }

    #[test]
    fn absorbed_tax_is_still_reported() {
        let breakdown = table().compute_tax(MoneyCents::new(50_000), Some("CA"), true).unwrap();
        assert_eq!(breakdown.tax_amount.cents(), 4_000);
        assert_eq!(breakdown.tax_rate_bps, 800);
        assert_eq!(breakdown.net_after_tax.cents(), 50_000);
    }

    #[test]
    fn charged_tax_loads_the_total() {
        let breakdown = table().compute_tax(MoneyCents::new(50_000), Some(" ca "), false).unwrap();
        assert!(breakdown.tax_charged_to_client);
        assert_eq!(breakdown.tax_amount.cents(), 4_000);
        assert_eq!(breakdown.net_after_tax.cents(), 54_000);
    }

    #[test]
    fn unknown_jurisdiction_has_no_tax() {
        let breakdown = table().compute_tax(MoneyCents::new(50_000), Some("TX"), false).unwrap();
        assert_eq!(breakdown.tax_amount, MoneyCents::ZERO);
        assert_eq!(breakdown.net_after_tax.cents(), 50_000);
    }

    #[test]
    fn loaded_total_overflow_is_an_error() {
        let near_max = MoneyCents::new(i64::MAX - 100);
        let err = table().compute_tax(near_max, Some("CA"), false).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));

        // Absorbed tax never loads the total.
        let breakdown = table().compute_tax(near_max, Some("CA"), true).unwrap();
        assert_eq!(breakdown.net_after_tax, near_max);
    }

    #[test]
    fn rates_are_capped_at_one_hundred_percent() {
        let table = TaxTable::new().with_rate("XX", 50_000).with_rate("YY", -5);
        assert_eq!(table.rate_bps(Some("XX")), BPS_SCALE);
        assert_eq!(table.rate_bps(Some("YY")), 0);
    }
}
