use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripId(pub String);

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A planned journey as stored by the trip store. Immutable for the duration
/// of one suggestion generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub destination: String,
    /// Free-form budget range, e.g. "₹50,000 - ₹1,00,000" or "₹5,00,000+".
    pub budget_range: String,
    pub travelers: u32,
    pub duration_days: u32,
    pub preferences: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub international: bool,
    pub created_at: DateTime<Utc>,
}
