//! Natural-language date range parsing.
//!
//! Converts relative phrases ("last week", "yesterday", "past 3 months")
//! into concrete inclusive ranges with a confidence and description, and
//! extracts/strips a date phrase out of a larger query for the entity
//! extraction pipeline.
//!
//! Every parser takes an explicit reference instant so results are a pure
//! function of their inputs; `*_now` wrappers exist for interactive callers.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

// ── Phrase patterns ─────────────────────────────────────────────────────

static RE_TODAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(today|now)(\s|$)").unwrap());

static RE_YESTERDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(yesterday|yday)(\s|$)").unwrap());

static RE_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(tomorrow|tmrw?)(\s|$)").unwrap());

static RE_LAST_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(last|prev(ious)?) week(\s|$)").unwrap());

static RE_LAST_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(last|prev(ious)?) month(\s|$)").unwrap());

static RE_LAST_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(last|prev(ious)?) year(\s|$)").unwrap());

static RE_THIS_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)this week(\s|$)").unwrap());

static RE_THIS_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)this month(\s|$)").unwrap());

static RE_THIS_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)this year(\s|$)").unwrap());

static RE_LAST_N_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(last|past|previous)\s+(\d+)\s+days?").unwrap());

static RE_LAST_N_WEEKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(last|past|previous)\s+(\d+)\s+weeks?").unwrap());

static RE_LAST_N_MONTHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(last|past|previous)\s+(\d+)\s+months?").unwrap());

/// Date phrases recognized inside a larger query, tried in order; the first
/// phrase that both matches and parses is stripped from the query.
static EXTRACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(yesterday|yday)\b",
        r"(?i)\b(today|now)\b",
        r"(?i)\b(tomorrow|tmrw?)\b",
        r"(?i)\b(last|past|previous)\s+week\b",
        r"(?i)\bthis\s+week\b",
        r"(?i)\b(last|past|previous)\s+month\b",
        r"(?i)\bthis\s+month\b",
        r"(?i)\b(last|past|previous)\s+year\b",
        r"(?i)\bthis\s+year\b",
        r"(?i)\b(last|past|previous)\s+\d+\s+days?\b",
        r"(?i)\b(last|past|previous)\s+\d+\s+weeks?\b",
        r"(?i)\b(last|past|previous)\s+\d+\s+months?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static END_OF_DAY: LazyLock<NaiveTime> =
    LazyLock::new(|| NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());

// ── Types ───────────────────────────────────────────────────────────────

/// An inclusive date range resolved from a relative phrase.
///
/// `end >= start` always holds; both sit on inclusive day boundaries
/// (00:00:00.000 / 23:59:59.999).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub confidence: f32,
    pub description: String,
}

/// A single resolved date (the start of the matched range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDate {
    pub date: NaiveDateTime,
    pub confidence: f32,
    pub description: String,
}

// ── Parsing ─────────────────────────────────────────────────────────────

/// Parse a relative date phrase into a concrete range.
///
/// Parsers run in a fixed order; the first hit wins. Named-unit phrases
/// ("last week") carry confidence 1.0; counted-N phrases ("past 3 months")
/// carry 0.95.
pub fn parse_natural_date_range(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    let q = query.to_lowercase();
    let q = q.trim();

    let parsers: [fn(&str, NaiveDateTime) -> Option<DateRange>; 9] = [
        parse_relative_day,
        parse_relative_week,
        parse_relative_month,
        parse_relative_year,
        parse_last_n_days,
        parse_last_n_weeks,
        parse_last_n_months,
        parse_this_time_unit,
        parse_today,
    ];

    parsers.iter().find_map(|parser| parser(q, reference))
}

/// [`parse_natural_date_range`] against the current local time.
pub fn parse_natural_date_range_now(query: &str) -> Option<DateRange> {
    parse_natural_date_range(query, Local::now().naive_local())
}

/// Parse a single date expression; resolves to the start of the range.
pub fn parse_natural_date(query: &str, reference: NaiveDateTime) -> Option<ParsedDate> {
    parse_natural_date_range(query, reference).map(|range| ParsedDate {
        date: range.start,
        confidence: range.confidence,
        description: range.description,
    })
}

fn parse_today(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    RE_TODAY
        .is_match(query)
        .then(|| day_range(reference.date(), "Today"))
}

fn parse_relative_day(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    if RE_YESTERDAY.is_match(query) {
        return Some(day_range(reference.date() - Duration::days(1), "Yesterday"));
    }
    if RE_TOMORROW.is_match(query) {
        return Some(day_range(reference.date() + Duration::days(1), "Tomorrow"));
    }
    None
}

fn parse_relative_week(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    // "this week" is handled by parse_this_time_unit.
    if !RE_LAST_WEEK.is_match(query) {
        return None;
    }
    let week_start = start_of_week(reference.date()) - Duration::days(7);
    Some(DateRange {
        start: start_of_day(week_start),
        end: end_of_day(week_start + Duration::days(6)),
        confidence: 1.0,
        description: "Last week".to_string(),
    })
}

fn parse_relative_month(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    if !RE_LAST_MONTH.is_match(query) {
        return None;
    }
    let last_month = months_back(reference.date(), 1);
    Some(DateRange {
        start: start_of_day(start_of_month(last_month)),
        end: end_of_day(end_of_month(last_month)),
        confidence: 1.0,
        description: "Last month".to_string(),
    })
}

fn parse_relative_year(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    if !RE_LAST_YEAR.is_match(query) {
        return None;
    }
    let year = reference.date().year() - 1;
    Some(DateRange {
        start: start_of_day(start_of_year(year, reference.date())),
        end: end_of_day(end_of_year(year, reference.date())),
        confidence: 1.0,
        description: "Last year".to_string(),
    })
}

fn parse_last_n_days(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    let n = counted_unit(&RE_LAST_N_DAYS, query)?;
    Some(DateRange {
        start: start_of_day(reference.date() - Duration::days(n - 1)),
        end: end_of_day(reference.date()),
        confidence: 0.95,
        description: format!("Last {n} day{}", plural(n)),
    })
}

fn parse_last_n_weeks(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    let n = counted_unit(&RE_LAST_N_WEEKS, query)?;
    Some(DateRange {
        start: start_of_day(reference.date() - Duration::days(n * 7 - 1)),
        end: end_of_day(reference.date()),
        confidence: 0.95,
        description: format!("Last {n} week{}", plural(n)),
    })
}

fn parse_last_n_months(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    let n = counted_unit(&RE_LAST_N_MONTHS, query)?;
    let start_month = months_back(reference.date(), (n - 1) as u32);
    Some(DateRange {
        start: start_of_day(start_of_month(start_month)),
        end: end_of_day(reference.date()),
        confidence: 0.95,
        description: format!("Last {n} month{}", plural(n)),
    })
}

fn parse_this_time_unit(query: &str, reference: NaiveDateTime) -> Option<DateRange> {
    let date = reference.date();

    if RE_THIS_WEEK.is_match(query) {
        let start = start_of_week(date);
        return Some(DateRange {
            start: start_of_day(start),
            end: end_of_day(start + Duration::days(6)),
            confidence: 1.0,
            description: "This week".to_string(),
        });
    }
    if RE_THIS_MONTH.is_match(query) {
        return Some(DateRange {
            start: start_of_day(start_of_month(date)),
            end: end_of_day(end_of_month(date)),
            confidence: 1.0,
            description: "This month".to_string(),
        });
    }
    if RE_THIS_YEAR.is_match(query) {
        return Some(DateRange {
            start: start_of_day(start_of_year(date.year(), date)),
            end: end_of_day(end_of_year(date.year(), date)),
            confidence: 1.0,
            description: "This year".to_string(),
        });
    }
    None
}

/// Pull the counted `N` out of a "last/past/previous N units" phrase.
fn counted_unit(re: &Regex, query: &str) -> Option<i64> {
    let captures = re.captures(query)?;
    let n: i64 = captures.get(2)?.as_str().parse().ok()?;
    (n > 0).then_some(n)
}

// ── Query extraction ────────────────────────────────────────────────────

/// Find a date phrase inside a larger query, parse it, and strip it.
///
/// Returns the residual query (whitespace-collapsed) and the parsed range.
/// Patterns are tried in a fixed order; the first that matches and parses
/// wins. A phrase that matches but fails to parse (e.g. "past week", which
/// the week parser does not accept) leaves the query untouched.
pub fn extract_date_from_query(
    query: &str,
    reference: NaiveDateTime,
) -> (String, Option<DateRange>) {
    let lower = query.to_lowercase();

    for pattern in EXTRACTION_PATTERNS.iter() {
        if let Some(found) = pattern.find(&lower) {
            if let Some(range) = parse_natural_date_range(found.as_str(), reference) {
                let clean = pattern.replace(query, "");
                return (squash(&clean), Some(range));
            }
        }
    }

    (squash(query), None)
}

/// [`extract_date_from_query`] against the current local time.
pub fn extract_date_from_query_now(query: &str) -> (String, Option<DateRange>) {
    extract_date_from_query(query, Local::now().naive_local())
}

/// Whether an instant falls within a range, inclusive on both ends.
pub fn is_date_in_range(instant: NaiveDateTime, range: &DateRange) -> bool {
    instant >= range.start && instant <= range.end
}

/// Human text for a range: its description when present, otherwise the
/// formatted endpoints.
pub fn format_date_range(range: &DateRange) -> String {
    if !range.description.is_empty() {
        return range.description.clone();
    }
    let start = range.start.date().format("%b %-d, %Y").to_string();
    let end = range.end.date().format("%b %-d, %Y").to_string();
    if start == end {
        start
    } else {
        format!("{start} - {end}")
    }
}

// ── Day/week/month arithmetic ───────────────────────────────────────────

fn day_range(date: NaiveDate, description: &str) -> DateRange {
    DateRange {
        start: start_of_day(date),
        end: end_of_day(date),
        confidence: 1.0,
        description: description.to_string(),
    }
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(*END_OF_DAY)
}

/// Sunday-anchored start of the week containing `date`.
fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(date)
}

fn start_of_year(year: i32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(fallback)
}

fn end_of_year(year: i32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(fallback)
}

/// `n` calendar months before `date`, day-of-month clamped.
fn months_back(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(n)).unwrap_or(date)
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
