//! Property tests for the query engine over generated contact snapshots.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use waitlist_common::query::{bucket_count, filter, paginate, sort, total_pages};
use waitlist_common::{Contact, SortField, SortOrder};

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

fn arb_contact() -> impl Strategy<Value = Contact> {
    (
        prop::option::of("[a-zA-Z0-9]{1,8}@[a-z]{1,5}\\.(com|org|io)"),
        // Up to ~60 days either side of the anchor, or no timestamp at all.
        prop::option::of(-60 * 24 * 3600i64..60 * 24 * 3600i64),
        prop::option::of("[a-z0-9]{4}"),
    )
        .prop_map(|(email, offset, id)| Contact {
            id,
            email,
            created_at: offset.map(|secs| (anchor() + Duration::seconds(secs)).to_rfc3339()),
        })
}

fn arb_contacts() -> impl Strategy<Value = Vec<Contact>> {
    prop::collection::vec(arb_contact(), 0..40)
}

fn arb_field() -> impl Strategy<Value = SortField> {
    prop_oneof![Just(SortField::Email), Just(SortField::CreatedAt)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        max_global_rejects: 16384,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_filter_keeps_only_matches(contacts in arb_contacts(), search in "[a-zA-Z.@]{0,3}") {
        let needle = search.to_lowercase();
        for c in filter(contacts, &search) {
            let email = c.email.unwrap_or_default().to_lowercase();
            prop_assert!(email.contains(&needle));
        }
    }

    #[test]
    fn prop_empty_filter_is_identity(contacts in arb_contacts()) {
        prop_assert_eq!(filter(contacts.clone(), ""), contacts);
    }

    #[test]
    fn prop_desc_is_reversed_asc_without_ties(contacts in arb_contacts(), field in arb_field()) {
        let mut keys: Vec<&str> = contacts.iter().map(|c| field.key(c)).collect();
        keys.sort_unstable();
        keys.dedup();
        prop_assume!(keys.len() == contacts.len());

        let mut asc = contacts.clone();
        sort(&mut asc, field, SortOrder::Asc);
        let mut desc = contacts;
        sort(&mut desc, field, SortOrder::Desc);

        asc.reverse();
        prop_assert_eq!(asc, desc);
    }

    #[test]
    fn prop_page_length_and_reassembly(contacts in arb_contacts(), limit in 1usize..12, page in 1usize..20) {
        let expected = limit.min(contacts.len().saturating_sub((page - 1) * limit));
        prop_assert_eq!(paginate(&contacts, page, limit).len(), expected);

        let rebuilt: Vec<Contact> = (1..=total_pages(contacts.len(), limit))
            .flat_map(|p| paginate(&contacts, p, limit).to_vec())
            .collect();
        prop_assert_eq!(rebuilt, contacts);
    }

    #[test]
    fn prop_buckets_are_nested(contacts in arb_contacts(), shift in -48 * 3600i64..48 * 3600i64) {
        let stats = bucket_count(&contacts, anchor() + Duration::seconds(shift));
        prop_assert!(stats.today <= stats.this_week);
        prop_assert!(stats.this_week <= stats.this_month);
        prop_assert!(stats.this_month <= stats.total);
        prop_assert_eq!(stats.total, contacts.len());
    }
}
