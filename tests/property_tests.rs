//! Property-based tests for the pure helpers behind tools, locations,
//! moving parts, RMAs and users.

use proptest::prelude::*;
use rust_decimal::Decimal;

use pcd_manager::entities::{
    json_list,
    location::resolve_display_name,
    moving_part::format_path,
    rma_labor_entry::{self, total_labor_cost},
    tool::{ChecklistItem, ToolStatus},
    user::{join_name, normalize_email, split_name},
};

fn chain_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(1i32..100_000, 0..12)
}

fn cents_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn labor_entry(hours: Decimal, price_per_hour: Decimal) -> rma_labor_entry::Model {
    rma_labor_entry::Model {
        id: 0,
        rma_id: 1,
        description: None,
        technician: None,
        hours,
        labor_date: None,
        price_per_hour,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn status_follows_completed_count(completed in 0usize..40) {
        let status = ToolStatus::from_completed_count(completed);
        let expected = match completed {
            0 => ToolStatus::NotStarted,
            n if n >= ChecklistItem::COUNTED => ToolStatus::Completed,
            _ => ToolStatus::InProgress,
        };
        prop_assert_eq!(status, expected);
    }

    #[test]
    fn chains_survive_storage(chain in chain_strategy()) {
        let stored = json_list::encode(&chain);
        prop_assert_eq!(stored.is_none(), chain.is_empty());
        let decoded: Vec<i32> = json_list::decode(stored.as_deref());
        prop_assert_eq!(decoded, chain);
    }

    #[test]
    fn chain_membership_matches_decoding(chain in chain_strategy(), probe in 1i32..100_000) {
        let stored = json_list::encode(&chain);
        prop_assert_eq!(
            json_list::chain_contains(stored.as_deref(), probe),
            chain.contains(&probe)
        );
    }

    #[test]
    fn malformed_lists_decode_empty(garbage in "[a-z{}:]{1,20}") {
        let decoded: Vec<i32> = json_list::decode(Some(&garbage));
        prop_assert!(decoded.is_empty());
    }

    #[test]
    fn stored_display_name_wins(
        stored in "[A-Za-z][A-Za-z0-9 ]{0,20}",
        state in "[A-Z][a-z]{2,10}",
        fab in prop::option::of("[0-9]{1,3}"),
    ) {
        prop_assert_eq!(resolve_display_name(Some(&stored), &state, fab.as_deref()), stored);
    }

    #[test]
    fn generated_display_name_mentions_the_fab(state in "[A-Z][a-z]{2,10}", fab in "[0-9]{1,3}") {
        let name = resolve_display_name(None, &state, Some(&fab));
        let suffix = format!(" F{}", fab);
        prop_assert!(name.ends_with(&suffix));
    }

    #[test]
    fn labor_total_is_the_sum_of_extended_costs(
        rows in prop::collection::vec((cents_strategy(), cents_strategy()), 0..10),
    ) {
        let entries: Vec<_> = rows
            .iter()
            .map(|(hours, price)| labor_entry(*hours, *price))
            .collect();
        let expected: Decimal = rows.iter().map(|(hours, price)| hours * price).sum();
        prop_assert_eq!(total_labor_cost(&entries), expected);
    }

    #[test]
    fn split_then_join_restores_the_name(first in "[A-Z][a-z]{1,10}", last in "[A-Z][a-z]{1,10}") {
        let full = format!("{} {}", first, last);
        let (split_first, split_last) = split_name(&full);
        prop_assert_eq!(&split_first, &first);
        prop_assert_eq!(&split_last, &last);
        prop_assert_eq!(join_name(&split_first, &split_last), full);
    }

    #[test]
    fn email_normalization_is_idempotent(email in "[ ]{0,2}[A-Za-z0-9.]{1,12}@[A-Za-z]{2,8}\\.(com|org|io)[ ]{0,2}") {
        let once = normalize_email(&email);
        prop_assert_eq!(normalize_email(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn path_has_one_segment_per_hop(names in prop::collection::vec("[A-Z]{2}[0-9]{3}", 0..8)) {
        let path = format_path(Some("SRC"), &names);
        prop_assert_eq!(path.split(" → ").count(), names.len() + 1);
        prop_assert!(path.starts_with("SRC"));
    }
}
