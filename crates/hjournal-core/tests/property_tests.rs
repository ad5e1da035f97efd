//! Property-based tests for hjournal-core.
//!
//! These tests verify invariants hold for arbitrary inputs using proptest.
//!
//! Run with: cargo test -p hjournal-core --test `property_tests`

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use hjournal_core::{Amount, Date, Journal, Tag};

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_decimal() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_commodity() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("$".to_string())),
        Just(Some("€".to_string())),
        Just(Some("CAD".to_string())),
        Just(Some("green apples".to_string())),
    ]
}

fn arb_amount() -> impl Strategy<Value = Amount> {
    (arb_decimal(), arb_commodity()).prop_map(|(number, commodity)| Amount { number, commodity })
}

// ============================================================================
// Date properties
// ============================================================================

proptest! {
    #[test]
    fn date_new_agrees_with_chrono(year in 1i32..20000, month in 0u32..14, day in 0u32..33) {
        let ours = Date::new(year, month, day);
        let chrono = NaiveDate::from_ymd_opt(year, month, day);
        prop_assert_eq!(ours.is_some(), chrono.is_some());
        if let (Some(ours), Some(chrono)) = (ours, chrono) {
            prop_assert_eq!(ours.to_naive_date(), Some(chrono));
        }
    }

    #[test]
    fn valid_dates_have_valid_month_day(year in 1900i32..2100, month in 1u32..13, day in 1u32..32) {
        if Date::new(year, month, day).is_some() {
            prop_assert!(Date::is_valid_month_day(month, day));
        }
    }

    #[test]
    fn date_display_is_sortable(a in (1900i32..2100, 1u32..13, 1u32..29), b in (1900i32..2100, 1u32..13, 1u32..29)) {
        let da = Date::new(a.0, a.1, a.2).unwrap();
        let db = Date::new(b.0, b.1, b.2).unwrap();
        prop_assert_eq!(da.cmp(&db), da.to_string().cmp(&db.to_string()));
    }
}

// ============================================================================
// Amount properties
// ============================================================================

proptest! {
    #[test]
    fn amount_display_contains_number(amount in arb_amount()) {
        let text = amount.to_string();
        let number = amount.number.to_string();
        prop_assert!(text.contains(&number));
    }

    #[test]
    fn amount_serde_roundtrip(amount in arb_amount()) {
        let json = serde_json::to_string(&amount).unwrap();
        let back: Amount = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, amount);
    }

    #[test]
    fn tag_serde_roundtrip(name in "[a-z]{1,8}", value in proptest::option::of("[a-z ]{0,8}")) {
        let tag = Tag { name, value };
        let json = serde_json::to_string(&tag).unwrap();
        let back: Tag = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, tag);
    }
}

#[test]
fn empty_journal_serializes_all_categories() {
    let json = serde_json::to_value(Journal::new()).unwrap();
    for key in ["transactions", "accounts", "prices", "commodities"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}
