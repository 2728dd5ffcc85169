use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::text::clean_text;
use crate::types::EventCandidate;

// Unicode word boundaries: a year glued to letters or CJK text is not a token
static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20[0-9]{2})\b").unwrap());

/// Four-digit years 2000-2099 mentioned in `text` as standalone words.
///
/// "2025-10-01" and "2025/10/3" yield 2025. "2025年", "Term2025" and
/// "20250101" yield nothing, and such events are kept by [`mentions_year`].
pub fn year_tokens(text: &str) -> Vec<i32> {
    YEAR_TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Keeps events whose date text names `target_year`, or names no year at all
pub fn mentions_year(event: &EventCandidate, target_year: i32) -> bool {
    let mut years = year_tokens(event.period.as_deref().unwrap_or(""));
    years.extend(year_tokens(event.date_info.as_deref().unwrap_or("")));
    years.is_empty() || years.contains(&target_year)
}

/// Period, then date info, then title, then empty
pub fn sort_key(event: &EventCandidate) -> String {
    let text = event
        .period
        .as_deref()
        .or(event.date_info.as_deref())
        .or(event.title.as_deref())
        .unwrap_or("");
    clean_text(text)
}

/// Applies the year filter and sorts by [`sort_key`]. The sort is stable,
/// so equal keys keep their merge order.
pub fn filter_and_sort(events: Vec<EventCandidate>, target_year: i32) -> Vec<EventCandidate> {
    let mut kept: Vec<EventCandidate> = events
        .into_iter()
        .filter(|e| mentions_year(e, target_year))
        .collect();
    kept.sort_by_cached_key(sort_key);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    fn dated(title: &str, period: Option<&str>, date_info: Option<&str>) -> EventCandidate {
        let mut e = EventCandidate::new(Source::NycuInfonews);
        e.title = Some(title.to_string());
        e.period = period.map(str::to_string);
        e.date_info = date_info.map(str::to_string);
        e
    }

    #[test]
    fn test_year_tokens() {
        assert_eq!(year_tokens("2024-12-30 ~ 2025-01-05"), vec![2024, 2025]);
        assert_eq!(year_tokens("2025年10月"), Vec::<i32>::new());
        assert_eq!(year_tokens("Term2025 review"), Vec::<i32>::new());
        assert_eq!(year_tokens("時間：2025/10/3 19:00"), vec![2025]);
        assert_eq!(year_tokens("1999 and 2100 and 20250101"), Vec::<i32>::new());
        assert_eq!(year_tokens(""), Vec::<i32>::new());
    }

    #[test]
    fn test_no_year_is_always_kept() {
        let e = dated("A", Some("no year mentioned"), None);
        for year in [2000, 2024, 2025, 2099] {
            assert!(mentions_year(&e, year));
        }
    }

    #[test]
    fn test_year_glued_to_cjk_text_does_not_drop_event() {
        let e = dated("講座", Some("2024年12月 講座"), None);
        assert!(mentions_year(&e, 2025));
    }

    #[test]
    fn test_exact_year_match() {
        let e = dated("A", None, Some("2024 Conference"));
        assert!(!mentions_year(&e, 2025));
        assert!(mentions_year(&e, 2024));
    }

    #[test]
    fn test_year_in_either_field_counts() {
        let e = dated("A", Some("2024-12-01"), Some("2025 續辦"));
        assert!(mentions_year(&e, 2025));
        assert!(mentions_year(&e, 2024));
        assert!(!mentions_year(&e, 2023));
    }

    #[test]
    fn test_sort_key_fallbacks() {
        assert_eq!(sort_key(&dated("T", Some(" 2025-01-01 "), Some("x"))), "2025-01-01");
        assert_eq!(sort_key(&dated("T", None, Some("時間：10/3"))), "時間：10/3");
        assert_eq!(sort_key(&dated("  Title  ", None, None)), "Title");
        assert_eq!(sort_key(&EventCandidate::new(Source::Nthu)), "");
    }

    #[test]
    fn test_filter_and_sort_orders_and_is_stable() {
        let events = vec![
            dated("late", Some("2025-09-01"), None),
            dated("old", Some("2024-01-01"), None),
            dated("first-tie", Some("2025-03-01"), None),
            dated("second-tie", Some("2025-03-01"), None),
            dated("undated", None, None),
        ];
        let result = filter_and_sort(events, 2025);
        let titles: Vec<_> = result.iter().map(|e| e.title.as_deref().unwrap()).collect();
        assert_eq!(titles, vec!["first-tie", "second-tie", "late", "undated"]);
    }
}
