use grid_sim::{round2, DemoRng};
use time::{Date, Duration};

/// One bucket of the earnings chart: a display label and the accumulated
/// revenue for that period.
#[derive(Debug, Clone, PartialEq)]
pub struct EarningsBucket {
    pub label: String,
    pub earnings: f64,
}

/// Reporting span for the earnings chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarningsRange {
    SevenDays,
    ThirtyDays,
    OneYear,
    Custom,
}

impl EarningsRange {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "7d" => Some(Self::SevenDays),
            "30d" => Some(Self::ThirtyDays),
            "1y" => Some(Self::OneYear),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Custom spans are capped at one year of daily buckets.
pub const MAX_CUSTOM_DAYS: i64 = 365;

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Seed buckets shown before any range has been selected (Mon-Sun demo
/// week from the original dashboard).
pub fn seed_week() -> Vec<EarningsBucket> {
    let values = [
        ("Mon", 1.2),
        ("Tue", 2.5),
        ("Wed", 1.8),
        ("Thu", 3.0),
        ("Fri", 2.2),
        ("Sat", 4.1),
        ("Sun", 1.5),
    ];
    values
        .into_iter()
        .map(|(label, earnings)| EarningsBucket {
            label: label.to_string(),
            earnings,
        })
        .collect()
}

/// Regenerates the bucket set for a reporting range with fresh demo
/// values. A custom range without two valid dates yields an empty set (the
/// caller keeps the previous buckets in that case).
pub fn generate_buckets(
    range: EarningsRange,
    start: Option<Date>,
    end: Option<Date>,
    today: Date,
    rng: &mut DemoRng,
) -> Vec<EarningsBucket> {
    match range {
        EarningsRange::SevenDays => trailing_days(today, 7, 0.8, 4.5, rng),
        EarningsRange::ThirtyDays => trailing_days(today, 30, 0.6, 5.5, rng),
        EarningsRange::OneYear => MONTHS_SHORT
            .iter()
            .map(|label| EarningsBucket {
                label: (*label).to_string(),
                earnings: round2(rng.in_range(30.0, 140.0)),
            })
            .collect(),
        EarningsRange::Custom => {
            let (Some(start), Some(end)) = (start, end) else {
                return Vec::new();
            };
            let (start, end) = if start <= end { (start, end) } else { (end, start) };
            let days = ((end - start).whole_days() + 1).clamp(1, MAX_CUSTOM_DAYS);

            (0..days)
                .filter_map(|offset| start.checked_add(Duration::days(offset)))
                .map(|date| EarningsBucket {
                    label: day_label(date),
                    earnings: round2(rng.in_range(0.5, 6.0)),
                })
                .collect()
        }
    }
}

/// Adds committed revenue to the most recent bucket.
pub fn add_to_last(buckets: &mut [EarningsBucket], revenue: f64) {
    if let Some(last) = buckets.last_mut() {
        last.earnings = round2(last.earnings + revenue);
    }
}

fn trailing_days(today: Date, days: i64, min: f64, max: f64, rng: &mut DemoRng) -> Vec<EarningsBucket> {
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub(Duration::days(back)))
        .map(|date| EarningsBucket {
            label: day_label(date),
            earnings: round2(rng.in_range(min, max)),
        })
        .collect()
}

fn day_label(date: Date) -> String {
    format!("{:02}-{:02}", u8::from(date.month()), date.day())
}

#[cfg(test)]
mod tests {
    use grid_sim::DemoRng;
    use time::macros::date;

    use super::{add_to_last, generate_buckets, seed_week, EarningsRange, MAX_CUSTOM_DAYS};

    const TODAY: time::Date = date!(2023 - 11 - 15);

    #[test]
    fn seed_week_spans_monday_to_sunday() {
        let buckets = seed_week();

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Mon");
        assert_eq!(buckets[6].label, "Sun");
        assert_eq!(buckets[3].earnings, 3.0);
    }

    #[test]
    fn seven_day_range_ends_today_with_month_day_labels() {
        let mut rng = DemoRng::new(1);

        let buckets = generate_buckets(EarningsRange::SevenDays, None, None, TODAY, &mut rng);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "11-09");
        assert_eq!(buckets[6].label, "11-15");
        for bucket in &buckets {
            assert!((0.8..=4.5).contains(&bucket.earnings));
        }
    }

    #[test]
    fn thirty_day_range_has_thirty_daily_buckets() {
        let mut rng = DemoRng::new(2);

        let buckets = generate_buckets(EarningsRange::ThirtyDays, None, None, TODAY, &mut rng);

        assert_eq!(buckets.len(), 30);
        assert_eq!(buckets[29].label, "11-15");
    }

    #[test]
    fn one_year_range_uses_month_labels() {
        let mut rng = DemoRng::new(3);

        let buckets = generate_buckets(EarningsRange::OneYear, None, None, TODAY, &mut rng);

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "Jan");
        assert_eq!(buckets[11].label, "Dec");
        for bucket in &buckets {
            assert!((30.0..=140.0).contains(&bucket.earnings));
        }
    }

    #[test]
    fn custom_range_is_inclusive_and_swaps_inverted_dates() {
        let mut rng = DemoRng::new(4);

        let buckets = generate_buckets(
            EarningsRange::Custom,
            Some(date!(2023 - 11 - 12)),
            Some(date!(2023 - 11 - 10)),
            TODAY,
            &mut rng,
        );

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].label, "11-10");
        assert_eq!(buckets[2].label, "11-12");
    }

    #[test]
    fn custom_range_is_capped_at_a_year() {
        let mut rng = DemoRng::new(5);

        let buckets = generate_buckets(
            EarningsRange::Custom,
            Some(date!(2020 - 01 - 01)),
            Some(date!(2023 - 11 - 15)),
            TODAY,
            &mut rng,
        );

        assert_eq!(buckets.len(), MAX_CUSTOM_DAYS as usize);
    }

    #[test]
    fn custom_range_without_dates_is_empty() {
        let mut rng = DemoRng::new(6);

        let buckets = generate_buckets(
            EarningsRange::Custom,
            Some(date!(2023 - 11 - 10)),
            None,
            TODAY,
            &mut rng,
        );

        assert!(buckets.is_empty());
    }

    #[test]
    fn revenue_lands_in_the_most_recent_bucket() {
        let mut buckets = seed_week();

        add_to_last(&mut buckets, 0.46);

        assert_eq!(buckets[6].earnings, 1.96);
        assert_eq!(buckets[5].earnings, 4.1);
    }

    #[test]
    fn adding_revenue_to_no_buckets_is_a_no_op() {
        let mut buckets = Vec::new();

        add_to_last(&mut buckets, 1.0);

        assert!(buckets.is_empty());
    }

    #[test]
    fn range_parsing_matches_selector_values() {
        assert_eq!(EarningsRange::parse("7d"), Some(EarningsRange::SevenDays));
        assert_eq!(EarningsRange::parse("1y"), Some(EarningsRange::OneYear));
        assert_eq!(EarningsRange::parse("all"), None);
    }
}
