use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::trip::TripId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Monsoon,
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Monsoon => "monsoon",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Pleasant,
    Hot,
    Rainy,
    Cool,
    Cold,
}

impl WeatherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pleasant => "pleasant",
            Self::Hot => "hot",
            Self::Rainy => "rainy",
            Self::Cool => "cool",
            Self::Cold => "cold",
        }
    }
}

impl std::fmt::Display for WeatherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Season, weather and festival metadata derived from the trip's start month.
/// Pure function of the month; recomputed identically for identical input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub season: Season,
    pub weather: WeatherKind,
    pub recommended_activities: Vec<String>,
    pub festivals: Vec<String>,
    pub tips: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub name: String,
    /// Whole currency units, `round(total * percentage / 100)`.
    pub amount: i64,
    pub percentage: u8,
    pub tips: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub categories: Vec<BudgetCategory>,
}

impl BudgetBreakdown {
    pub fn percentage_total(&self) -> u32 {
        self.categories.iter().map(|category| u32::from(category.percentage)).sum()
    }

    pub fn category(&self, name: &str) -> Option<&BudgetCategory> {
        self.categories.iter().find(|category| category.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    /// 1-based, contiguous, no gaps.
    pub day: u32,
    pub date: Option<NaiveDate>,
    pub weekday: Option<String>,
    pub locations: Vec<String>,
    pub activities: Vec<String>,
    /// Equal split of the total budget across all days.
    pub estimated_cost: i64,
    pub weather_tips: Vec<String>,
    pub description: String,
}

/// The persisted generation result. At most one record exists per trip id;
/// later requests return this record verbatim instead of recomputing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub id: SuggestionId,
    pub trip_id: TripId,
    pub destination: String,
    pub total_budget: i64,
    pub budget_breakdown: BudgetBreakdown,
    pub itinerary: Vec<ItineraryDay>,
    pub local_tips: Vec<String>,
    pub seasonal: Option<SeasonalProfile>,
    pub duration_caption: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::{BudgetBreakdown, BudgetCategory};

    #[test]
    fn percentage_total_sums_all_categories() {
        let breakdown = BudgetBreakdown {
            categories: vec![
                BudgetCategory {
                    name: "accommodation".to_string(),
                    amount: 35,
                    percentage: 35,
                    tips: vec![],
                },
                BudgetCategory { name: "food".to_string(), amount: 65, percentage: 65, tips: vec![] },
            ],
        };

        assert_eq!(breakdown.percentage_total(), 100);
        assert_eq!(breakdown.category("food").map(|c| c.amount), Some(65));
        assert!(breakdown.category("transport").is_none());
    }
}
