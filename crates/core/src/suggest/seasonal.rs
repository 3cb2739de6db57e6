//! Season, festival and seasonal-tip resolution from the trip's start month.

use crate::domain::suggestion::{Season, SeasonalProfile, WeatherKind};

#[derive(Debug, Clone, Copy)]
struct SeasonSeed {
    season: Season,
    months: &'static [u32],
    weather: WeatherKind,
    activities: &'static [&'static str],
}

/// Declared in resolution order: the first entry whose month list contains
/// the trip's start month wins. Summer and monsoon overlap on July/August;
/// with this ordering those months resolve to summer and monsoon effectively
/// covers September. The ordering is part of the contract and pinned by test.
const SEASONS: &[SeasonSeed] = &[
    SeasonSeed {
        season: Season::Spring,
        months: &[3, 4, 5],
        weather: WeatherKind::Pleasant,
        activities: &["garden walks", "heritage tours", "open-air markets"],
    },
    SeasonSeed {
        season: Season::Summer,
        months: &[6, 7, 8],
        weather: WeatherKind::Hot,
        activities: &["early morning treks", "museum visits", "lake boating"],
    },
    SeasonSeed {
        season: Season::Monsoon,
        months: &[7, 8, 9],
        weather: WeatherKind::Rainy,
        activities: &["waterfall visits", "tea estate tours", "indoor cultural shows"],
    },
    SeasonSeed {
        season: Season::Autumn,
        months: &[10, 11],
        weather: WeatherKind::Cool,
        activities: &["festival hopping", "city walking tours", "street food trails"],
    },
    SeasonSeed {
        season: Season::Winter,
        months: &[12, 1, 2],
        weather: WeatherKind::Cold,
        activities: &["desert safaris", "wildlife sanctuaries", "hot spring visits"],
    },
];

/// Calendar month (1-12) to festival names, independent of season.
const FESTIVALS: &[(u32, &[&str])] = &[
    (1, &["Makar Sankranti", "Pongal"]),
    (2, &["Maha Shivaratri"]),
    (3, &["Holi"]),
    (4, &["Baisakhi"]),
    (7, &["Rath Yatra"]),
    (8, &["Raksha Bandhan", "Janmashtami", "Independence Day"]),
    (9, &["Ganesh Chaturthi", "Onam"]),
    (10, &["Navratri", "Dussehra"]),
    (11, &["Diwali", "Guru Nanak Jayanti"]),
    (12, &["Christmas"]),
];

/// Resolves the full seasonal profile for a calendar month. Pure: identical
/// month input always produces the identical profile. Returns `None` only
/// for out-of-range months.
pub fn seasonal_profile(month: u32) -> Option<SeasonalProfile> {
    let seed = SEASONS.iter().find(|seed| seed.months.contains(&month))?;

    Some(SeasonalProfile {
        season: seed.season,
        weather: seed.weather,
        recommended_activities: seed
            .activities
            .iter()
            .map(|activity| (*activity).to_string())
            .collect(),
        festivals: festivals_for_month(month),
        tips: season_tips(seed.season),
    })
}

pub fn festivals_for_month(month: u32) -> Vec<String> {
    FESTIVALS
        .iter()
        .find(|(festival_month, _)| *festival_month == month)
        .map(|(_, names)| names.iter().map(|name| (*name).to_string()).collect())
        .unwrap_or_default()
}

fn season_tips(season: Season) -> Vec<String> {
    let tips: &[&str] = match season {
        Season::Spring => &[
            "Carry light layers for cool mornings",
            "Pollen counts run high in gardens and parks",
        ],
        Season::Summer => &[
            "Plan outdoor sightseeing before 11am",
            "Carry water and electrolytes through the afternoon",
        ],
        Season::Monsoon => &[
            "Pack a raincoat and waterproof footwear",
            "Check road conditions before hill excursions",
        ],
        Season::Autumn => &[
            "Evenings turn cool; carry a light jacket",
            "Festival season crowds peak around major temples",
        ],
        Season::Winter => &[
            "Carry warm layers for early mornings",
            "Fog can delay trains and early flights",
        ],
    };

    tips.iter().map(|tip| (*tip).to_string()).collect()
}
