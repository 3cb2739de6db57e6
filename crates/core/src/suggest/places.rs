//! Curated place lookup with generic synthesized fallbacks.

pub const MAX_PLACES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceCategory {
    Attractions,
    Restaurants,
    Museums,
}

impl PlaceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attractions => "attractions",
            Self::Restaurants => "restaurants",
            Self::Museums => "museums",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CitySeed {
    name: &'static str,
    attractions: &'static [&'static str],
    restaurants: &'static [&'static str],
    museums: &'static [&'static str],
}

// Entries are pre-ranked by popularity; declared order is returned as-is.
const CITY_SEEDS: &[CitySeed] = &[
    CitySeed {
        name: "mumbai",
        attractions: &[
            "Gateway of India",
            "Marine Drive",
            "Elephanta Caves",
            "Chhatrapati Shivaji Maharaj Terminus",
            "Juhu Beach",
            "Haji Ali Dargah",
            "Sanjay Gandhi National Park",
            "Colaba Causeway",
            "Siddhivinayak Temple",
            "Bandra-Worli Sea Link",
        ],
        restaurants: &[
            "Leopold Cafe",
            "Trishna",
            "Britannia & Co.",
            "Cafe Madras",
            "Bademiya",
            "Swati Snacks",
            "The Table",
            "Gajalee",
        ],
        museums: &[
            "Chhatrapati Shivaji Maharaj Vastu Sangrahalaya",
            "Dr. Bhau Daji Lad Museum",
            "Nehru Science Centre",
        ],
    },
    CitySeed {
        name: "delhi",
        attractions: &[
            "India Gate",
            "Red Fort",
            "Qutub Minar",
            "Humayun's Tomb",
            "Lotus Temple",
            "Jama Masjid",
            "Akshardham Temple",
            "Chandni Chowk",
            "Lodhi Gardens",
            "Hauz Khas Village",
        ],
        restaurants: &[
            "Karim's",
            "Bukhara",
            "Indian Accent",
            "Saravana Bhavan",
            "Moti Mahal",
            "Paranthe Wali Gali",
            "Sagar Ratna",
        ],
        museums: &["National Museum", "National Rail Museum", "Crafts Museum"],
    },
    CitySeed {
        name: "goa",
        attractions: &[
            "Baga Beach",
            "Basilica of Bom Jesus",
            "Fort Aguada",
            "Dudhsagar Falls",
            "Anjuna Flea Market",
            "Palolem Beach",
            "Chapora Fort",
            "Se Cathedral",
            "Calangute Beach",
            "Divar Island",
        ],
        restaurants: &[
            "Britto's",
            "Gunpowder",
            "Fisherman's Wharf",
            "Vinayak Family Restaurant",
            "Pousada by the Beach",
            "Mum's Kitchen",
        ],
        museums: &["Goa State Museum", "Museum of Christian Art"],
    },
    CitySeed {
        name: "jaipur",
        attractions: &[
            "Amber Fort",
            "Hawa Mahal",
            "City Palace",
            "Jantar Mantar",
            "Nahargarh Fort",
            "Jal Mahal",
            "Albert Hall Museum",
            "Jaigarh Fort",
            "Birla Mandir",
            "Johari Bazaar",
        ],
        restaurants: &[
            "Laxmi Misthan Bhandar",
            "Chokhi Dhani",
            "Suvarna Mahal",
            "Peacock Rooftop Restaurant",
            "Rawat Kachori",
            "Handi Restaurant",
        ],
        museums: &["Albert Hall Museum", "Anokhi Museum of Hand Printing"],
    },
    CitySeed {
        name: "agra",
        attractions: &[
            "Taj Mahal",
            "Agra Fort",
            "Fatehpur Sikri",
            "Mehtab Bagh",
            "Itmad-ud-Daulah",
            "Akbar's Tomb",
            "Kinari Bazaar",
        ],
        restaurants: &["Pind Balluchi", "Esphahan", "Dasaprakash", "Joney's Place", "Shankara Vegis"],
        museums: &[],
    },
    CitySeed {
        name: "kerala",
        attractions: &[
            "Alleppey Backwaters",
            "Munnar Tea Gardens",
            "Fort Kochi",
            "Periyar Wildlife Sanctuary",
            "Varkala Cliff",
            "Athirappilly Falls",
            "Kovalam Beach",
            "Mattancherry Palace",
            "Kumarakom Bird Sanctuary",
        ],
        restaurants: &["Dhe Puttu", "Paragon", "Kashi Art Cafe", "Grand Pavilion", "Fusion Bay"],
        museums: &[],
    },
    CitySeed {
        name: "manali",
        attractions: &[
            "Solang Valley",
            "Rohtang Pass",
            "Hadimba Temple",
            "Old Manali",
            "Jogini Falls",
            "Vashisht Hot Springs",
            "Mall Road",
            "Naggar Castle",
        ],
        restaurants: &[
            "Johnson's Cafe",
            "Cafe 1947",
            "Casa Bella Vista",
            "Drifters' Inn",
            "Renaissance Manali",
        ],
        museums: &[],
    },
    CitySeed {
        name: "udaipur",
        attractions: &[
            "City Palace Udaipur",
            "Lake Pichola",
            "Jag Mandir",
            "Sajjangarh Monsoon Palace",
            "Fateh Sagar Lake",
            "Jagdish Temple",
            "Saheliyon ki Bari",
            "Bagore ki Haveli",
        ],
        restaurants: &["Ambrai", "Upre", "Millets of Mewar", "Tribute Restaurant", "Natraj Dining Hall"],
        museums: &[],
    },
];

const GENERIC_ATTRACTION_NOUNS: &[&str] =
    &["Fort", "City Palace", "Central Market", "Lakefront Promenade", "Old Town Quarter"];
const GENERIC_RESTAURANT_NOUNS: &[&str] =
    &["Spice House", "Heritage Kitchen", "Riverside Cafe", "Night Food Bazaar"];
const GENERIC_MUSEUM_NOUNS: &[&str] = &["Heritage Museum", "Folk Art Gallery", "History Centre"];

/// Resolves a destination to a ranked place list for one category. Curated
/// entries win; unknown destinations (or known ones with an empty category)
/// get synthesized `"<Destination> <Noun>"` names. At most [`MAX_PLACES`]
/// entries are returned, in declared order.
pub fn resolve_places(destination: &str, category: PlaceCategory) -> Vec<String> {
    let normalized = destination.trim().to_lowercase();

    let curated = CITY_SEEDS
        .iter()
        .find(|seed| normalized == seed.name || normalized.contains(seed.name))
        .map(|seed| match category {
            PlaceCategory::Attractions => seed.attractions,
            PlaceCategory::Restaurants => seed.restaurants,
            PlaceCategory::Museums => seed.museums,
        })
        .filter(|entries| !entries.is_empty());

    match curated {
        Some(entries) => {
            entries.iter().take(MAX_PLACES).map(|entry| (*entry).to_string()).collect()
        }
        None => generic_places(destination.trim(), category),
    }
}

fn generic_places(destination: &str, category: PlaceCategory) -> Vec<String> {
    let nouns = match category {
        PlaceCategory::Attractions => GENERIC_ATTRACTION_NOUNS,
        PlaceCategory::Restaurants => GENERIC_RESTAURANT_NOUNS,
        PlaceCategory::Museums => GENERIC_MUSEUM_NOUNS,
    };

    nouns.iter().take(MAX_PLACES).map(|noun| format!("{destination} {noun}")).collect()
}

/// Prompt handed to the optional text-generation enrichment. Its output is
/// discarded; the call exists purely as best-effort signal collection and
/// must never block or alter the returned list.
pub fn enrichment_prompt(destination: &str, category: PlaceCategory) -> String {
    format!(
        "List the most popular {} in {} for a first-time visitor, one per line.",
        category.as_str(),
        destination
    )
}

/// Baseline destination tips appended after the seasonal tips in the final
/// record's local-tips list.
pub fn destination_tips(destination: &str) -> Vec<String> {
    vec![
        "Keep digital and paper copies of ID proofs".to_string(),
        format!("Use prepaid taxis or ride apps when arriving in {destination}"),
        "Carry small denominations for local markets".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::{enrichment_prompt, resolve_places, PlaceCategory, MAX_PLACES};

    #[test]
    fn curated_city_returns_ranked_entries() {
        let attractions = resolve_places("Mumbai", PlaceCategory::Attractions);
        assert_eq!(attractions.first().map(String::as_str), Some("Gateway of India"));
        assert!(attractions.len() <= MAX_PLACES);
    }

    #[test]
    fn lookup_is_case_insensitive_and_substring_tolerant() {
        let direct = resolve_places("mumbai", PlaceCategory::Restaurants);
        let embedded = resolve_places("Mumbai, Maharashtra", PlaceCategory::Restaurants);
        assert_eq!(direct, embedded);
        assert!(direct.contains(&"Leopold Cafe".to_string()));
    }

    #[test]
    fn unknown_destination_synthesizes_generic_names() {
        let places = resolve_places("Springfield", PlaceCategory::Attractions);
        assert!(places.iter().all(|place| place.starts_with("Springfield ")));
        assert!(places.contains(&"Springfield Fort".to_string()));
    }

    #[test]
    fn empty_curated_category_falls_back_to_generic() {
        let museums = resolve_places("Manali", PlaceCategory::Museums);
        assert!(museums.iter().all(|place| place.starts_with("Manali ")));
    }

    #[test]
    fn never_more_than_the_cap() {
        for category in
            [PlaceCategory::Attractions, PlaceCategory::Restaurants, PlaceCategory::Museums]
        {
            assert!(resolve_places("Delhi", category).len() <= MAX_PLACES);
        }
    }

    #[test]
    fn enrichment_prompt_names_destination_and_category() {
        let prompt = enrichment_prompt("Jaipur", PlaceCategory::Attractions);
        assert!(prompt.contains("Jaipur"));
        assert!(prompt.contains("attractions"));
    }
}
