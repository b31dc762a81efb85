use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::delivery::Delivery;

pub const PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    EarningsDesc,
    EarningsAsc,
    DistanceDesc,
    DistanceAsc,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortKey::DateDesc),
            "date-asc" => Ok(SortKey::DateAsc),
            "earnings-desc" => Ok(SortKey::EarningsDesc),
            "earnings-asc" => Ok(SortKey::EarningsAsc),
            "distance-desc" => Ok(SortKey::DistanceDesc),
            "distance-asc" => Ok(SortKey::DistanceAsc),
            other => Err(AppError::Validation(format!("unknown sort key: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    /// 1-indexed; 0 is read as 1.
    pub page: u32,
    /// Calendar day of completion, in `offset` local time.
    pub date: Option<NaiveDate>,
    pub search_term: Option<String>,
    pub sort: SortKey,
    pub offset: FixedOffset,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            date: None,
            search_term: None,
            sort: SortKey::default(),
            offset: Utc.fix(),
        }
    }
}

impl HistoryQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub items: Vec<Delivery>,
    pub page: u32,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Filters, sorts and paginates `records`.
///
/// Sorting is stable, so ties keep the order `records` came in. A page past
/// the end yields no items rather than an error.
pub fn query_history(records: Vec<Delivery>, query: &HistoryQuery) -> HistoryPage {
    let term = query
        .search_term
        .as_deref()
        .filter(|term| !term.trim().is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<Delivery> = records
        .into_iter()
        .filter(|delivery| match query.date {
            Some(date) => completed_on(delivery, date, query.offset),
            None => true,
        })
        .filter(|delivery| match &term {
            Some(term) => matches_term(delivery, term),
            None => true,
        })
        .collect();

    filtered.sort_by(|a, b| compare(a, b, query.sort));

    let total_count = filtered.len();
    let page = query.page.max(1);
    let start = (page as usize - 1).saturating_mul(PAGE_SIZE);
    let items = filtered.into_iter().skip(start).take(PAGE_SIZE).collect();

    HistoryPage {
        items,
        page,
        total_pages: total_count.div_ceil(PAGE_SIZE),
        total_count,
    }
}

fn completed_on(delivery: &Delivery, date: NaiveDate, offset: FixedOffset) -> bool {
    delivery
        .completed_at
        .is_some_and(|at| at.with_timezone(&offset).date_naive() == date)
}

fn matches_term(delivery: &Delivery, term: &str) -> bool {
    delivery.restaurant.name.to_lowercase().contains(term)
        || delivery.id.to_lowercase().contains(term)
}

fn compare(a: &Delivery, b: &Delivery, sort: SortKey) -> Ordering {
    match sort {
        SortKey::DateDesc => by_completion(a, b, true),
        SortKey::DateAsc => by_completion(a, b, false),
        SortKey::EarningsDesc => b.earnings.total_cmp(&a.earnings),
        SortKey::EarningsAsc => a.earnings.total_cmp(&b.earnings),
        SortKey::DistanceDesc => b.distance.total_cmp(&a.distance),
        SortKey::DistanceAsc => a.distance.total_cmp(&b.distance),
    }
}

// Records without a completion time go last in either direction.
fn by_completion(a: &Delivery, b: &Delivery, newest_first: bool) -> Ordering {
    match (a.completed_at, b.completed_at) {
        (Some(x), Some(y)) if newest_first => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate, Utc};

    use super::{query_history, HistoryQuery, SortKey};
    use crate::models::delivery::Delivery;
    use crate::store::seed::SeedData;

    fn history() -> Vec<Delivery> {
        SeedData::generate(Utc::now()).history
    }

    fn ids(items: &[Delivery]) -> Vec<&str> {
        items.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn twelve_records_make_three_pages() {
        let first = query_history(history(), &HistoryQuery::page(1));
        assert_eq!(first.total_count, 12);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 5);

        let third = query_history(history(), &HistoryQuery::page(3));
        assert_eq!(third.items.len(), 2);

        let fourth = query_history(history(), &HistoryQuery::page(4));
        assert!(fourth.items.is_empty());
        assert_eq!(fourth.total_pages, 3);
    }

    #[test]
    fn page_zero_reads_as_first_page() {
        let zero = query_history(history(), &HistoryQuery::page(0));
        let one = query_history(history(), &HistoryQuery::page(1));
        assert_eq!(zero, one);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let query = HistoryQuery::page(2)
            .with_search("a")
            .with_sort(SortKey::DistanceDesc);
        let a = query_history(history(), &query);
        let b = query_history(history(), &query);
        assert_eq!(a, b);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let page = query_history(history(), &HistoryQuery::page(1));
        assert_eq!(page.items[0].id, "D-1012");

        let oldest = query_history(history(), &HistoryQuery::page(1).with_sort(SortKey::DateAsc));
        assert_eq!(oldest.items[0].id, "D-1001");
    }

    #[test]
    fn earnings_desc_is_non_increasing_across_all_pages() {
        let mut earnings = Vec::new();
        for page in 1..=3 {
            let result = query_history(
                history(),
                &HistoryQuery::page(page).with_sort(SortKey::EarningsDesc),
            );
            earnings.extend(result.items.iter().map(|d| d.earnings));
        }
        assert_eq!(earnings.len(), 12);
        assert!(earnings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn distance_asc_is_non_decreasing() {
        let result = query_history(
            history(),
            &HistoryQuery::page(1).with_sort(SortKey::DistanceAsc),
        );
        assert!(result.items.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(result.items[0].id, "D-1012");
    }

    #[test]
    fn ties_keep_collection_order() {
        // D-1002 and D-1008 share both earnings and distance.
        for sort in [SortKey::EarningsAsc, SortKey::EarningsDesc, SortKey::DistanceAsc] {
            let mut all = Vec::new();
            for page in 1..=3 {
                all.extend(query_history(history(), &HistoryQuery::page(page).with_sort(sort)).items);
            }
            let first = all.iter().position(|d| d.id == "D-1002").unwrap();
            let second = all.iter().position(|d| d.id == "D-1008").unwrap();
            assert_eq!(second, first + 1, "{sort:?}");
        }
    }

    #[test]
    fn search_matches_restaurant_name_case_insensitively() {
        let result = query_history(history(), &HistoryQuery::page(1).with_search("PIZ"));
        assert_eq!(result.total_count, 3);
        for delivery in &result.items {
            let name = delivery.restaurant.name.to_lowercase();
            assert!(name.contains("piz") || delivery.id.to_lowercase().contains("piz"));
        }
    }

    #[test]
    fn search_matches_identifier() {
        let result = query_history(history(), &HistoryQuery::page(1).with_search("d-1010"));
        assert_eq!(ids(&result.items), vec!["D-1010"]);
    }

    #[test]
    fn search_without_matches_is_empty() {
        let result = query_history(history(), &HistoryQuery::page(1).with_search("zzz-nothing"));
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn blank_search_is_ignored() {
        let result = query_history(history(), &HistoryQuery::page(1).with_search("  "));
        assert_eq!(result.total_count, 12);
    }

    #[test]
    fn date_filter_uses_completion_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let result = query_history(
            history(),
            &HistoryQuery::page(1).with_date(day).with_sort(SortKey::DateAsc),
        );
        assert_eq!(ids(&result.items), vec!["D-1001", "D-1002"]);
    }

    #[test]
    fn date_filter_respects_local_offset() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        let utc = query_history(history(), &HistoryQuery::page(1).with_date(day));
        assert_eq!(ids(&utc.items), vec!["D-1012"]);

        // 21:00 UTC on the 10th is already the 11th at +05:00.
        let plus_five = FixedOffset::east_opt(5 * 3600).unwrap();
        let local = query_history(
            history(),
            &HistoryQuery::page(1)
                .with_date(day)
                .with_offset(plus_five)
                .with_sort(SortKey::DateAsc),
        );
        assert_eq!(ids(&local.items), vec!["D-1011", "D-1012"]);
    }

    #[test]
    fn open_deliveries_never_match_a_date() {
        let scheduled = SeedData::generate(Utc::now()).scheduled;
        let today = Utc::now().date_naive();
        let result = query_history(scheduled, &HistoryQuery::page(1).with_date(today));
        assert!(result.items.iter().all(|d| d.completed_at.is_some()));
    }

    #[test]
    fn sort_key_parses_wire_names() {
        assert_eq!("earnings-asc".parse::<SortKey>().unwrap(), SortKey::EarningsAsc);
        assert!("price-asc".parse::<SortKey>().is_err());
    }
}
