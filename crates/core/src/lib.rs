pub mod config;
pub mod domain;
pub mod errors;
pub mod suggest;

pub use domain::suggestion::{
    BudgetBreakdown, BudgetCategory, ItineraryDay, Season, SeasonalProfile, SuggestionId,
    SuggestionRecord, WeatherKind,
};
pub use domain::trip::{Trip, TripId};
pub use errors::{StoreError, SuggestError};
pub use suggest::engine::{
    ForecastProvider, SuggestionEngine, SuggestionStore, TextEnricher, TripStore, UpstreamError,
};
pub use suggest::weather::{Forecast, WeatherReport};
