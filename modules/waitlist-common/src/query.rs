//! In-memory query engine over a contact snapshot.
//!
//! Pure functions: no I/O, no failure modes. Callers fetch the snapshot,
//! run filter → sort → paginate (or bucket_count), and throw the result away
//! after responding.

use chrono::{DateTime, Duration, Months, NaiveTime, SecondsFormat, Utc};

use crate::types::{
    Contact, ContactPage, ContactView, ListQuery, Pagination, SortField, SortOrder, WaitlistStats,
};

/// Keep contacts whose email contains `search`, ignoring case.
/// An empty search keeps everything in its original order.
pub fn filter(contacts: Vec<Contact>, search: &str) -> Vec<Contact> {
    if search.is_empty() {
        return contacts;
    }
    let needle = search.to_lowercase();
    contacts
        .into_iter()
        .filter(|c| {
            c.email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Stable string sort on one field. Missing values sort as "".
pub fn sort(contacts: &mut [Contact], field: SortField, order: SortOrder) {
    match order {
        SortOrder::Asc => contacts.sort_by(|a, b| field.key(a).cmp(field.key(b))),
        SortOrder::Desc => contacts.sort_by(|a, b| field.key(b).cmp(field.key(a))),
    }
}

/// The 1-indexed page `[(page-1)*limit, page*limit)`. Out-of-range pages are
/// empty; page 0 is treated as page 1.
pub fn paginate<T>(items: &[T], page: usize, limit: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(limit);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}

pub fn total_pages(total: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

/// Parse an upstream timestamp. Resend has emitted both RFC 3339 and
/// Postgres-style `2023-10-06 23:47:56.678292+00`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Count contacts created since UTC midnight, in the last 7 days and in the
/// last calendar month. Contacts without a readable `created_at` only count
/// toward `total`.
pub fn bucket_count(contacts: &[Contact], now: DateTime<Utc>) -> WaitlistStats {
    let today_start = now
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();
    let week_start = now - Duration::days(7);
    let month_start = now
        .checked_sub_months(Months::new(1))
        .unwrap_or(week_start);

    let mut stats = WaitlistStats {
        total: contacts.len(),
        ..WaitlistStats::default()
    };

    for created in contacts
        .iter()
        .filter_map(|c| c.created_at.as_deref().and_then(parse_timestamp))
    {
        if created >= today_start {
            stats.today += 1;
        }
        if created >= week_start {
            stats.this_week += 1;
        }
        if created >= month_start {
            stats.this_month += 1;
        }
    }

    stats
}

/// Map a contact to its display shape. `now` fills a missing `created_at`.
pub fn to_view(contact: Contact, now: DateTime<Utc>) -> ContactView {
    ContactView {
        email: contact.email.unwrap_or_default(),
        created_at: contact
            .created_at
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        id: contact.id.unwrap_or_default(),
    }
}

/// filter → sort → paginate → display mapping.
pub fn run_list_query(contacts: Vec<Contact>, query: &ListQuery, now: DateTime<Utc>) -> ContactPage {
    let mut matched = filter(contacts, &query.search);
    sort(&mut matched, query.sort_by, query.sort_order);

    let total = matched.len();
    let pagination = Pagination {
        page: query.page,
        limit: query.limit,
        total,
        total_pages: total_pages(total, query.limit),
    };

    let data = paginate(&matched, query.page, query.limit)
        .iter()
        .cloned()
        .map(|c| to_view(c, now))
        .collect();

    ContactPage { data, pagination }
}
