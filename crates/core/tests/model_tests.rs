use chrono::{TimeZone, Utc};
use folio_tracker_core::errors::CoreError;
use folio_tracker_core::models::exchange_rate::{ExchangeRate, DEFAULT_USD_JPY_RATE};
use folio_tracker_core::models::holding::{AssetType, Country, Holding};
use folio_tracker_core::models::ledger::{CashFlow, CashFlowKind};
use folio_tracker_core::models::quote::{PriceQuote, QuoteBook};
use folio_tracker_core::models::settings::{RateRefreshSettings, Settings};
use folio_tracker_core::models::valuation::{CountryAggregate, Valuation};
use folio_tracker_core::money::{format_currency, round_to_integer, round_to_tenth, Rounding};
use std::time::Duration;

fn ts() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 6, 0, 0).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  Rounding
// ═══════════════════════════════════════════════════════════════════

mod rounding {
    use super::*;

    #[test]
    fn tenth_rounds_half_away_from_zero() {
        assert_eq!(round_to_tenth(0.25), 0.3);
        assert_eq!(round_to_tenth(-0.25), -0.3);
        assert_eq!(round_to_tenth(12.34), 12.3);
        assert_eq!(round_to_tenth(12.36), 12.4);
    }

    #[test]
    fn integer_rounds_half_away_from_zero() {
        assert_eq!(round_to_integer(0.5), 1.0);
        assert_eq!(round_to_integer(2.5), 3.0);
        assert_eq!(round_to_integer(-2.5), -3.0);
        assert_eq!(round_to_integer(1234.4), 1234.0);
    }

    #[test]
    fn tenth_is_idempotent() {
        for x in [0.0, 1.04, 1234.56, -7.77, 521_622.14, 0.1 + 0.2, 1e9 + 0.35] {
            let once = round_to_tenth(x);
            assert_eq!(round_to_tenth(once), once, "not idempotent for {x}");
        }
    }

    #[test]
    fn integer_is_idempotent() {
        for x in [0.4, 2.5, -3.5, 99_999.9] {
            let once = round_to_integer(x);
            assert_eq!(round_to_integer(once), once);
        }
    }

    #[test]
    fn default_rounding_is_tenth() {
        assert_eq!(Rounding::default(), Rounding::Tenth);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Currency formatting
// ═══════════════════════════════════════════════════════════════════

mod formatting {
    use super::*;

    #[test]
    fn jpy_has_no_fraction_digits() {
        assert_eq!(format_currency(1234.0, "JPY"), "¥1,234");
        assert_eq!(format_currency(1234.5, "JPY"), "¥1,235");
        assert_eq!(format_currency(0.0, "JPY"), "¥0");
    }

    #[test]
    fn jpy_large_amount_is_grouped() {
        assert_eq!(format_currency(1_500_000.0, "JPY"), "¥1,500,000");
    }

    #[test]
    fn usd_eur_gbp_have_two_fraction_digits() {
        assert_eq!(format_currency(1234.567, "USD"), "$1,234.57");
        assert_eq!(format_currency(0.5, "EUR"), "€0.50");
        assert_eq!(format_currency(99.0, "GBP"), "£99.00");
    }

    #[test]
    fn code_is_case_insensitive() {
        assert_eq!(format_currency(10.0, "usd"), "$10.00");
        assert_eq!(format_currency(10.0, " jpy "), "¥10");
    }

    #[test]
    fn unknown_code_falls_back_to_code_prefix() {
        assert_eq!(format_currency(1234.5, "CHF"), "CHF 1,234.50");
    }

    #[test]
    fn negative_sign_precedes_symbol() {
        assert_eq!(format_currency(-500.0, "JPY"), "-¥500");
        assert_eq!(format_currency(-1.5, "USD"), "-$1.50");
        assert_eq!(format_currency(-12.5, "CHF"), "CHF -12.50");
    }

    #[test]
    fn negative_amount_rounding_to_zero_has_no_sign() {
        assert_eq!(format_currency(-0.004, "USD"), "$0.00");
        assert_eq!(format_currency(-0.2, "JPY"), "¥0");
    }

    #[test]
    fn non_finite_amounts_are_not_shown_as_zero() {
        assert_eq!(format_currency(f64::NAN, "JPY"), "¥NaN");
        assert_eq!(format_currency(f64::INFINITY, "USD"), "$∞");
        assert_eq!(format_currency(f64::NEG_INFINITY, "CHF"), "CHF -∞");
    }

    #[test]
    fn amounts_beyond_u64_keep_every_digit() {
        assert_eq!(
            format_currency(1e20, "JPY"),
            "¥100,000,000,000,000,000,000"
        );
        assert_eq!(
            format_currency(1e18, "USD"),
            "$1,000,000,000,000,000,000.00"
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holding
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn new_uppercases_and_trims_symbol() {
        let h = Holding::new("  aapl ", Country::US, AssetType::Equity);
        assert_eq!(h.symbol, "AAPL");
        assert_eq!(h.id, None);
    }

    #[test]
    fn convenience_constructors() {
        let jp = Holding::japan_equity("7203");
        assert_eq!(jp.country, Country::Japan);
        assert_eq!(jp.asset_type, AssetType::Equity);

        let us = Holding::us_equity("VTI");
        assert_eq!(us.country, Country::US);

        let fund = Holding::fund("EMAXIS-SLIM", Country::US);
        assert_eq!(fund.asset_type, AssetType::Fund);
        assert_eq!(fund.country, Country::US);
    }

    #[test]
    fn builder_sets_id_and_name() {
        let h = Holding::japan_equity("7203").with_id(7).with_name("Toyota");
        assert_eq!(h.id, Some(7));
        assert_eq!(h.name, "Toyota");
    }

    #[test]
    fn display_enums() {
        assert_eq!(Country::Japan.to_string(), "Japan");
        assert_eq!(Country::US.to_string(), "US");
        assert_eq!(AssetType::Equity.to_string(), "Equity");
        assert_eq!(AssetType::Fund.to_string(), "Fund");
    }

    #[test]
    fn deserializes_without_name() {
        let json = r#"{"id":3,"symbol":"VOO","country":"US","asset_type":"Equity"}"#;
        let h: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(h.id, Some(3));
        assert_eq!(h.name, "");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Quotes and rates
// ═══════════════════════════════════════════════════════════════════

mod quotes {
    use super::*;

    #[test]
    fn quote_currency_is_uppercased() {
        let q = PriceQuote::new(200.0, "usd", ts());
        assert_eq!(q.currency, "USD");
        assert!(q.is_usd());
    }

    #[test]
    fn quote_book_lookup_is_case_insensitive() {
        let mut book = QuoteBook::new();
        book.insert("aapl", PriceQuote::new(200.0, "USD", ts()));
        assert!(book.get("AAPL").is_some());
        assert!(book.get("aapl").is_some());
        assert!(book.get("MSFT").is_none());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn quote_book_from_iterator() {
        let book: QuoteBook = vec![
            ("7203".to_string(), PriceQuote::new(3000.0, "JPY", ts())),
            ("VTI".to_string(), PriceQuote::new(250.0, "USD", ts())),
        ]
        .into_iter()
        .collect();
        assert_eq!(book.len(), 2);
        assert!(!book.is_empty());
    }

    #[test]
    fn fallback_rate_is_150() {
        let rate = ExchangeRate::fallback(ts());
        assert_eq!(rate.rate, 150.0);
        assert_eq!(DEFAULT_USD_JPY_RATE, 150.0);
        assert_eq!(rate.last_updated, ts());
    }

    #[test]
    fn rate_validity() {
        assert!(ExchangeRate::new(149.3, ts()).is_valid());
        assert!(!ExchangeRate::new(0.0, ts()).is_valid());
        assert!(!ExchangeRate::new(-1.0, ts()).is_valid());
        assert!(!ExchangeRate::new(f64::NAN, ts()).is_valid());
        assert!(!ExchangeRate::new(f64::INFINITY, ts()).is_valid());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Valuation models
// ═══════════════════════════════════════════════════════════════════

mod valuation_models {
    use super::*;

    #[test]
    fn unpriced_is_distinct_from_zero() {
        let zero = Valuation::priced(0.0);
        let none = Valuation::unpriced();
        assert_ne!(zero, none);
        assert!(zero.is_priced());
        assert!(!none.is_priced());
        assert_eq!(none.value_or_zero(), 0.0);
        assert_eq!(zero.currency, "JPY");
        assert_eq!(none.currency, "JPY");
    }

    #[test]
    fn aggregate_total_for_country() {
        let agg = CountryAggregate::new(100.0, 200.0, 300.0);
        assert_eq!(agg.total_for(Country::Japan), 100.0);
        assert_eq!(agg.total_for(Country::US), 200.0);
    }

    #[test]
    fn cash_flow_signed_amount() {
        let d = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(CashFlow::deposit(1000.0, d).signed_amount(), 1000.0);
        assert_eq!(CashFlow::withdrawal(400.0, d).signed_amount(), -400.0);
        assert_eq!(CashFlowKind::Withdrawal.to_string(), "Withdrawal");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.display_currency, "JPY");
        assert_eq!(s.current_portfolio_id, None);
        assert!(s.rate_refresh.auto_update_on_load);
        assert_eq!(s.rate_refresh.refresh_interval(), Duration::from_secs(600));
        assert_eq!(s.rate_refresh.just_updated_window(), Duration::from_secs(3));
        assert_eq!(s.rate_refresh.default_rate, 150.0);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let s = Settings::from_json(r#"{"rate_refresh":{"refresh_interval_secs":60}}"#).unwrap();
        assert_eq!(s.rate_refresh.refresh_interval_secs, 60);
        assert!(s.rate_refresh.auto_update_on_load);
        assert_eq!(s.display_currency, "JPY");
    }

    #[test]
    fn from_json_empty_object_is_default() {
        let s = Settings::from_json("{}").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn from_json_rejects_zero_interval() {
        let err = Settings::from_json(r#"{"rate_refresh":{"refresh_interval_secs":0}}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn from_json_rejects_non_positive_default_rate() {
        let err = Settings::from_json(r#"{"rate_refresh":{"default_rate":0}}"#).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn from_json_rejects_malformed_json() {
        let err = Settings::from_json("{").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn json_roundtrip_keeps_portfolio_scope() {
        let mut s = Settings::default();
        s.current_portfolio_id = Some(2);
        s.rate_refresh = RateRefreshSettings {
            auto_update_on_load: false,
            ..RateRefreshSettings::default()
        };
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
