//! The trip budget and itinerary suggestion pipeline.
//!
//! Evaluated synchronously per request: budget normalization, destination
//! cost adjustment, seasonal resolution, place lookup, best-effort weather
//! annotation, budget allocation, itinerary composition, and finally the
//! idempotent assembly of one persisted `SuggestionRecord` per trip.

pub mod budget;
pub mod engine;
pub mod itinerary;
pub mod places;
pub mod seasonal;
pub mod weather;

pub use engine::{
    ForecastProvider, SuggestionEngine, SuggestionStore, TextEnricher, TripStore, UpstreamError,
};
