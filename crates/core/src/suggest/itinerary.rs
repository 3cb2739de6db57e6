//! Day-by-day itinerary composition.

use chrono::{Duration, NaiveDate};

use crate::domain::suggestion::{ItineraryDay, SeasonalProfile, WeatherKind};
use crate::suggest::weather::WeatherReport;

pub const DOMESTIC_TRIP_CAP_DAYS: u32 = 14;
pub const INTERNATIONAL_TRIP_CAP_DAYS: u32 = 60;

const MAX_ACTIVITIES_PER_DAY: usize = 4;
const MAX_LIVE_WEATHER_TIPS: usize = 3;
const MAX_SEASONAL_WEATHER_TIPS: usize = 2;

pub struct ItineraryInputs<'a> {
    pub destination: &'a str,
    pub total_budget: i64,
    pub requested_days: u32,
    pub international: bool,
    pub preferences: &'a [String],
    pub start_date: Option<NaiveDate>,
    pub seasonal: Option<&'a SeasonalProfile>,
    pub weather: Option<&'a WeatherReport>,
    pub attractions: &'a [String],
    pub restaurants: &'a [String],
}

pub fn duration_cap(international: bool) -> u32 {
    if international {
        INTERNATIONAL_TRIP_CAP_DAYS
    } else {
        DOMESTIC_TRIP_CAP_DAYS
    }
}

pub fn capped_days(requested_days: u32, international: bool) -> u32 {
    requested_days.max(1).min(duration_cap(international))
}

/// Human-readable caption for the record, noting if capping occurred.
pub fn duration_caption(requested_days: u32, international: bool) -> String {
    let days = capped_days(requested_days, international);
    if days < requested_days {
        format!("{days}-day itinerary (capped from {requested_days} requested days)")
    } else {
        format!("{days}-day itinerary")
    }
}

/// Builds one `ItineraryDay` per capped trip day, 1-based and contiguous.
/// The per-day cost is an equal split of the total budget, deliberately not
/// weighted by what each day contains.
pub fn compose(inputs: &ItineraryInputs<'_>) -> Vec<ItineraryDay> {
    let day_count = capped_days(inputs.requested_days, inputs.international);
    let per_day_cost = (inputs.total_budget as f64 / f64::from(day_count)).round() as i64;

    (1..=day_count)
        .map(|day| {
            let date = inputs
                .start_date
                .and_then(|start| start.checked_add_signed(Duration::days(i64::from(day) - 1)));
            ItineraryDay {
                day,
                date,
                weekday: date.map(|value| value.format("%A").to_string()),
                locations: day_locations(inputs, day),
                activities: day_activities(inputs, day),
                estimated_cost: per_day_cost,
                weather_tips: day_weather_tips(inputs),
                description: day_description(inputs, day),
            }
        })
        .collect()
}

/// Attractions are consumed two per day in ranked order; once the curated
/// list runs out, generic placeholders referencing the destination and day
/// number take over.
fn day_locations(inputs: &ItineraryInputs<'_>, day: u32) -> Vec<String> {
    let start = 2 * (day as usize - 1);
    if start < inputs.attractions.len() {
        let end = (start + 2).min(inputs.attractions.len());
        return inputs.attractions[start..end].to_vec();
    }

    vec![
        format!("{} city highlights, day {day}", inputs.destination),
        format!("Hidden corners of {}, day {day}", inputs.destination),
    ]
}

fn is_rainy(inputs: &ItineraryInputs<'_>) -> bool {
    if let Some(weather) = inputs.weather {
        return weather.is_rainy();
    }
    inputs.seasonal.map(|seasonal| seasonal.weather == WeatherKind::Rainy).unwrap_or(false)
}

fn day_activities(inputs: &ItineraryInputs<'_>, day: u32) -> Vec<String> {
    let mut activities = preferred_activities(inputs, day)
        .unwrap_or_else(|| themed_template(inputs.destination, day));

    if let Some(festival) = inputs.seasonal.and_then(|seasonal| seasonal.festivals.first()) {
        activities.push(format!("Join the {festival} celebrations"));
    }

    activities.truncate(MAX_ACTIVITIES_PER_DAY);
    activities
}

/// A matching preference tag replaces the themed template wholesale. Rainy
/// weather overrides even an explicit adventure preference with indoor plans.
fn preferred_activities(inputs: &ItineraryInputs<'_>, day: u32) -> Option<Vec<String>> {
    let has = |tag: &str| inputs.preferences.iter().any(|pref| pref.eq_ignore_ascii_case(tag));

    if has("food") {
        return Some(food_activities(inputs, day));
    }

    if has("adventure") {
        if is_rainy(inputs) {
            return Some(vec![
                "Indoor climbing or games arcade session".to_string(),
                "Museum and gallery circuit".to_string(),
                "Covered market exploration".to_string(),
            ]);
        }
        if let Some(seasonal) = inputs.seasonal {
            return Some(
                seasonal
                    .recommended_activities
                    .iter()
                    .map(|activity| format!("Guided {activity}"))
                    .collect(),
            );
        }
        return None;
    }

    if has("culture") {
        return Some(vec![
            "Classical dance or music performance".to_string(),
            "Temple and old quarter walk".to_string(),
            "Artisan workshop visit".to_string(),
        ]);
    }

    None
}

fn food_activities(inputs: &ItineraryInputs<'_>, day: u32) -> Vec<String> {
    let pick = |offset: u32| -> Option<&String> {
        if inputs.restaurants.is_empty() {
            return None;
        }
        let index = ((day - 1) * 2 + offset) as usize % inputs.restaurants.len();
        inputs.restaurants.get(index)
    };

    match (pick(0), pick(1)) {
        (Some(first), Some(second)) => vec![
            format!("Breakfast tasting at {first}"),
            "Regional thali lunch in the old quarter".to_string(),
            format!("Dinner at {second}"),
        ],
        _ => vec![
            "Street food breakfast crawl".to_string(),
            "Regional thali lunch in the old quarter".to_string(),
            "Evening food market tour".to_string(),
        ],
    }
}

/// Fixed five-slot thematic template (orientation, heritage, nature, food
/// and shopping, leisure), clamped at the last slot for longer trips.
fn themed_template(destination: &str, day: u32) -> Vec<String> {
    match day.min(5) {
        1 => vec![
            "Check in and freshen up".to_string(),
            format!("Orientation walk through central {destination}"),
            "Street food tasting near the hotel".to_string(),
        ],
        2 => vec![
            format!("Guided heritage tour of {destination}"),
            "Visit the main fort or palace complex".to_string(),
            "Evening light-and-sound show".to_string(),
        ],
        3 => vec![
            "Morning nature trail or cycle tour".to_string(),
            "Picnic lunch outdoors".to_string(),
            "Adventure activity session".to_string(),
        ],
        4 => vec![
            "Local market crawl".to_string(),
            "Cooking demo or guided food walk".to_string(),
            "Souvenir shopping".to_string(),
        ],
        _ => vec![
            "Slow morning at a neighbourhood cafe".to_string(),
            "Spa or lakeside leisure time".to_string(),
            "Farewell dinner".to_string(),
        ],
    }
}

fn day_weather_tips(inputs: &ItineraryInputs<'_>) -> Vec<String> {
    if let Some(weather) = inputs.weather {
        if !weather.tips.is_empty() {
            return weather.tips.iter().take(MAX_LIVE_WEATHER_TIPS).cloned().collect();
        }
    }

    inputs
        .seasonal
        .map(|seasonal| seasonal.tips.iter().take(MAX_SEASONAL_WEATHER_TIPS).cloned().collect())
        .unwrap_or_default()
}

fn day_description(inputs: &ItineraryInputs<'_>, day: u32) -> String {
    let destination = inputs.destination;
    let mut description = match day.min(5) {
        1 => format!("Ease into {destination} with a relaxed first day around its best-known sights."),
        2 => format!("Dive into the history and heritage that shaped {destination}."),
        3 => format!("Get outdoors and see the wilder side of {destination}."),
        4 => format!("Eat and shop your way through the markets of {destination}."),
        _ => format!("Wind down with an unhurried day in {destination}."),
    };

    if let Some(preference) = inputs.preferences.first() {
        description.push_str(&format!(" Tailored for {preference} lovers."));
    }

    if let Some(seasonal) = inputs.seasonal {
        description
            .push_str(&format!(" Expect {} {} weather.", seasonal.weather, seasonal.season));
        if let Some(festival) = seasonal.festivals.first() {
            description.push_str(&format!(" {festival} festivities are on during your stay."));
        }
    }

    description
}
