//! Budget normalization, destination cost adjustment and category allocation.

use crate::domain::suggestion::{BudgetBreakdown, BudgetCategory};

/// Baseline used whenever the budget string yields no usable numbers.
/// Malformed input never blocks the pipeline.
pub const FALLBACK_BUDGET: i64 = 75_000;

const BUDGET_CATEGORIES: &[(&str, u8)] = &[
    ("accommodation", 35),
    ("food", 25),
    ("transportation", 25),
    ("activities", 12),
    ("miscellaneous", 3),
];

const METRO_DESTINATIONS: &[&str] =
    &["mumbai", "delhi", "bangalore", "chennai", "kolkata", "hyderabad", "pune"];
const HILL_DESTINATIONS: &[&str] =
    &["manali", "shimla", "ooty", "darjeeling", "munnar", "mussoorie"];
const COASTAL_DESTINATIONS: &[&str] = &["goa", "kerala", "pondicherry", "andaman", "varkala"];

/// Parses a free-form budget range into a single baseline value.
///
/// A closed range `"₹a - ₹b"` yields `round((a + b) / 2)`; an open range
/// `"₹a+"` yields `a`; anything else yields the fallback. Currency glyphs
/// and thousands separators (both western and Indian grouping) are ignored.
pub fn normalize_budget(raw: &str) -> i64 {
    let groups = digit_groups(raw);
    let Some(&first) = groups.first() else {
        return FALLBACK_BUDGET;
    };

    if raw.contains('+') {
        return first;
    }

    match groups.get(1) {
        // Summed in f64 so that absurd but parseable bounds cannot overflow.
        Some(&second) => ((first as f64 + second as f64) / 2.0).round() as i64,
        None => FALLBACK_BUDGET,
    }
}

fn digit_groups(raw: &str) -> Vec<i64> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if ch == ','
            && !current.is_empty()
            && matches!(chars.peek(), Some(next) if next.is_ascii_digit())
        {
            // thousands separator inside a group, keep accumulating
        } else if !current.is_empty() {
            if let Ok(value) = current.parse() {
                groups.push(value);
            }
            current.clear();
        }
    }

    if !current.is_empty() {
        if let Ok(value) = current.parse() {
            groups.push(value);
        }
    }

    groups
}

/// Destination-specific cost multiplier, keyed by recognizing destination-name
/// substrings. Every group currently maps to 1.0; the seam stays in place so
/// regional pricing can diverge without touching downstream call sites, which
/// all express price hints as `base_unit_price * multiplier`.
pub fn cost_multiplier(destination: &str) -> f64 {
    let normalized = destination.to_lowercase();

    if METRO_DESTINATIONS.iter().any(|name| normalized.contains(name)) {
        1.0
    } else if HILL_DESTINATIONS.iter().any(|name| normalized.contains(name)) {
        1.0
    } else if COASTAL_DESTINATIONS.iter().any(|name| normalized.contains(name)) {
        1.0
    } else {
        1.0
    }
}

pub fn adjusted_budget(baseline: i64, multiplier: f64) -> i64 {
    (baseline as f64 * multiplier).round() as i64
}

/// Splits the adjusted budget across the five fixed categories. Amounts are
/// rounded independently and may not sum exactly to the total; the
/// percentages always sum to 100.
pub fn allocate(total: i64, multiplier: f64) -> BudgetBreakdown {
    let categories = BUDGET_CATEGORIES
        .iter()
        .map(|&(name, percentage)| BudgetCategory {
            name: name.to_string(),
            amount: (total as f64 * f64::from(percentage) / 100.0).round() as i64,
            percentage,
            tips: category_tips(name, multiplier),
        })
        .collect();

    BudgetBreakdown { categories }
}

fn scaled(base: i64, multiplier: f64) -> i64 {
    (base as f64 * multiplier).round() as i64
}

fn category_tips(name: &str, multiplier: f64) -> Vec<String> {
    match name {
        "accommodation" => vec![
            format!(
                "Budget hotels run ₹{}-₹{} per night; mid-range around ₹{}",
                scaled(1_200, multiplier),
                scaled(2_500, multiplier),
                scaled(4_500, multiplier)
            ),
            "Book refundable rates; festival weeks sell out early".to_string(),
        ],
        "food" => vec![
            format!(
                "Local thalis cost about ₹{}-₹{}; street food much less",
                scaled(150, multiplier),
                scaled(350, multiplier)
            ),
            "Lunch menus at sit-down restaurants beat dinner prices".to_string(),
        ],
        "transportation" => vec![
            format!(
                "Expect ₹{}-₹{} per day for autos and metro combined",
                scaled(200, multiplier),
                scaled(600, multiplier)
            ),
            "Prepaid taxi counters avoid airport overcharging".to_string(),
        ],
        "activities" => vec![
            format!(
                "Monument entry fees average ₹{}-₹{} per person",
                scaled(50, multiplier),
                scaled(600, multiplier)
            ),
            "Combination tickets cover several sites at a discount".to_string(),
        ],
        _ => vec![
            "Keep a small cash reserve for tips and small purchases".to_string(),
            "Pharmacies and SIM top-ups are cheapest away from tourist strips".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::{adjusted_budget, allocate, cost_multiplier, normalize_budget, FALLBACK_BUDGET};

    #[test]
    fn closed_range_returns_midpoint() {
        assert_eq!(normalize_budget("₹50,000 - ₹1,00,000"), 75_000);
        assert_eq!(normalize_budget("₹20,000 - ₹50,000"), 35_000);
    }

    #[test]
    fn midpoint_rounds_half_up() {
        assert_eq!(normalize_budget("₹100 - ₹101"), 101);
    }

    #[test]
    fn open_range_returns_minimum() {
        assert_eq!(normalize_budget("₹5,00,000+"), 500_000);
        assert_eq!(normalize_budget("₹75000+"), 75_000);
    }

    #[test]
    fn unparsable_budget_falls_back() {
        assert_eq!(normalize_budget("free"), FALLBACK_BUDGET);
        assert_eq!(normalize_budget(""), FALLBACK_BUDGET);
        assert_eq!(normalize_budget("₹ - ₹"), FALLBACK_BUDGET);
    }

    #[test]
    fn bare_single_number_is_neither_range_shape_and_falls_back() {
        assert_eq!(normalize_budget("₹60,000"), FALLBACK_BUDGET);
        assert_eq!(normalize_budget("75000"), FALLBACK_BUDGET);
    }

    #[test]
    fn extreme_bounds_do_not_overflow_the_midpoint() {
        let raw = format!("₹{} - ₹{}", i64::MAX, i64::MAX);
        assert_eq!(normalize_budget(&raw), i64::MAX);
    }

    #[test]
    fn indian_digit_grouping_parses_as_one_number() {
        assert_eq!(normalize_budget("₹1,00,000 - ₹3,00,000"), 200_000);
    }

    #[test]
    fn multiplier_is_currently_identity_for_all_groups() {
        for destination in ["Mumbai", "Manali", "Goa", "Somewhere Unknown"] {
            assert_eq!(cost_multiplier(destination), 1.0);
        }
        assert_eq!(adjusted_budget(75_000, cost_multiplier("Mumbai")), 75_000);
    }

    #[test]
    fn allocation_percentages_sum_to_100() {
        let breakdown = allocate(75_000, 1.0);
        assert_eq!(breakdown.percentage_total(), 100);
        assert_eq!(breakdown.categories.len(), 5);
    }

    #[test]
    fn allocation_amounts_follow_fixed_percentages() {
        let breakdown = allocate(75_000, 1.0);
        assert_eq!(breakdown.category("accommodation").map(|c| c.amount), Some(26_250));
        assert_eq!(breakdown.category("food").map(|c| c.amount), Some(18_750));
        assert_eq!(breakdown.category("transportation").map(|c| c.amount), Some(18_750));
        assert_eq!(breakdown.category("activities").map(|c| c.amount), Some(9_000));
        assert_eq!(breakdown.category("miscellaneous").map(|c| c.amount), Some(2_250));
    }

    #[test]
    fn every_category_carries_at_least_two_tips() {
        let breakdown = allocate(10_000, 1.0);
        for category in &breakdown.categories {
            assert!(category.tips.len() >= 2, "category {} lacks tips", category.name);
        }
    }
}
