//! Suggestion assembly: compute once per trip, persist, and serve the cached
//! record thereafter.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::suggestion::{SuggestionId, SuggestionRecord};
use crate::domain::trip::{Trip, TripId};
use crate::errors::{StoreError, SuggestError};
use crate::suggest::weather::{annotate, Forecast, WeatherReport};
use crate::suggest::{budget, itinerary, places, seasonal};

/// Failure of an optional upstream service. Never escapes the pipeline; the
/// engine degrades to seasonal fallbacks instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream request failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait TripStore: Send + Sync {
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, StoreError>;
}

#[async_trait]
pub trait SuggestionStore: Send + Sync {
    async fn find_by_trip(&self, trip_id: &TripId) -> Result<Option<SuggestionRecord>, StoreError>;

    /// Inserts the record only if no record exists for its trip id yet.
    /// A concurrent winner surfaces as [`StoreError::Conflict`].
    async fn insert_if_absent(&self, record: &SuggestionRecord) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn three_day_forecast(&self, destination: &str) -> Result<Forecast, UpstreamError>;
}

#[async_trait]
pub trait TextEnricher: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

/// Orchestrates the suggestion pipeline over injected ports. Weather and
/// text enrichment are optional; their absence or failure never changes the
/// outcome beyond falling back to seasonal data.
pub struct SuggestionEngine {
    trips: Arc<dyn TripStore>,
    suggestions: Arc<dyn SuggestionStore>,
    forecasts: Option<Arc<dyn ForecastProvider>>,
    enricher: Option<Arc<dyn TextEnricher>>,
}

impl SuggestionEngine {
    pub fn new(trips: Arc<dyn TripStore>, suggestions: Arc<dyn SuggestionStore>) -> Self {
        Self { trips, suggestions, forecasts: None, enricher: None }
    }

    pub fn with_forecasts(mut self, forecasts: Arc<dyn ForecastProvider>) -> Self {
        self.forecasts = Some(forecasts);
        self
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn TextEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Returns the suggestion for a trip, computing and persisting it on
    /// first request. Exactly one record ever exists per trip id: a lost
    /// insert race is resolved by re-reading the winner's record.
    pub async fn get_or_create(&self, trip_id: &TripId) -> Result<SuggestionRecord, SuggestError> {
        let trip = self
            .trips
            .find_by_id(trip_id)
            .await
            .map_err(|error| SuggestError::Persistence(error.to_string()))?
            .ok_or_else(|| SuggestError::TripNotFound(trip_id.clone()))?;

        if let Some(existing) = self
            .suggestions
            .find_by_trip(trip_id)
            .await
            .map_err(|error| SuggestError::Persistence(error.to_string()))?
        {
            return Ok(existing);
        }

        let record = self.compute(&trip).await;

        match self.suggestions.insert_if_absent(&record).await {
            Ok(()) => Ok(record),
            Err(StoreError::Conflict) => self
                .suggestions
                .find_by_trip(trip_id)
                .await
                .map_err(|error| SuggestError::Persistence(error.to_string()))?
                .ok_or_else(|| {
                    SuggestError::Persistence(format!(
                        "suggestion for trip `{trip_id}` vanished after insert conflict"
                    ))
                }),
            Err(error) => Err(SuggestError::Persistence(error.to_string())),
        }
    }

    async fn compute(&self, trip: &Trip) -> SuggestionRecord {
        let baseline = budget::normalize_budget(&trip.budget_range);
        let multiplier = budget::cost_multiplier(&trip.destination);
        let total_budget = budget::adjusted_budget(baseline, multiplier);

        let seasonal = trip.start_date.and_then(|date| seasonal::seasonal_profile(date.month()));

        let attractions = places::resolve_places(&trip.destination, places::PlaceCategory::Attractions);
        let restaurants = places::resolve_places(&trip.destination, places::PlaceCategory::Restaurants);

        // Fire-and-forget: enrichment output is discarded and failures are
        // ignored. The awaited call bounds it to the request lifetime.
        if let Some(enricher) = &self.enricher {
            let prompt =
                places::enrichment_prompt(&trip.destination, places::PlaceCategory::Attractions);
            let _ = enricher.generate(&prompt).await;
        }

        let weather = self.fetch_weather(&trip.destination).await;

        let budget_breakdown = budget::allocate(total_budget, multiplier);

        let days = itinerary::compose(&itinerary::ItineraryInputs {
            destination: &trip.destination,
            total_budget,
            requested_days: trip.duration_days,
            international: trip.international,
            preferences: &trip.preferences,
            start_date: trip.start_date,
            seasonal: seasonal.as_ref(),
            weather: weather.as_ref(),
            attractions: &attractions,
            restaurants: &restaurants,
        });

        let mut local_tips =
            seasonal.as_ref().map(|profile| profile.tips.clone()).unwrap_or_default();
        local_tips.extend(places::destination_tips(&trip.destination));

        SuggestionRecord {
            id: SuggestionId(format!("SUG-{}", Uuid::new_v4().simple())),
            trip_id: trip.id.clone(),
            destination: trip.destination.clone(),
            total_budget,
            budget_breakdown,
            itinerary: days,
            local_tips,
            seasonal,
            duration_caption: itinerary::duration_caption(trip.duration_days, trip.international),
            created_at: Utc::now(),
        }
    }

    async fn fetch_weather(&self, destination: &str) -> Option<WeatherReport> {
        let provider = self.forecasts.as_ref()?;
        match provider.three_day_forecast(destination).await {
            Ok(forecast) => Some(annotate(&forecast)),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use crate::domain::suggestion::{SuggestionId, SuggestionRecord};
    use crate::domain::trip::{Trip, TripId};
    use crate::errors::{StoreError, SuggestError};
    use crate::suggest::weather::Forecast;

    use super::{ForecastProvider, SuggestionEngine, SuggestionStore, TripStore, UpstreamError};

    struct StubTripStore {
        trips: HashMap<String, Trip>,
    }

    #[async_trait]
    impl TripStore for StubTripStore {
        async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, StoreError> {
            Ok(self.trips.get(&id.0).cloned())
        }
    }

    #[derive(Default)]
    struct StubSuggestionStore {
        records: Mutex<HashMap<String, SuggestionRecord>>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl SuggestionStore for StubSuggestionStore {
        async fn find_by_trip(
            &self,
            trip_id: &TripId,
        ) -> Result<Option<SuggestionRecord>, StoreError> {
            Ok(self.records.lock().unwrap().get(&trip_id.0).cloned())
        }

        async fn insert_if_absent(&self, record: &SuggestionRecord) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            if records.contains_key(&record.trip_id.0) {
                return Err(StoreError::Conflict);
            }
            records.insert(record.trip_id.0.clone(), record.clone());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Rejects every insert as if another writer committed between the
    /// existence check and the write, installing that writer's record so a
    /// re-read can observe it.
    #[derive(Default)]
    struct OutracedSuggestionStore {
        winner: Mutex<Option<SuggestionRecord>>,
    }

    #[async_trait]
    impl SuggestionStore for OutracedSuggestionStore {
        async fn find_by_trip(
            &self,
            _trip_id: &TripId,
        ) -> Result<Option<SuggestionRecord>, StoreError> {
            Ok(self.winner.lock().unwrap().clone())
        }

        async fn insert_if_absent(&self, record: &SuggestionRecord) -> Result<(), StoreError> {
            let mut winner = self.winner.lock().unwrap();
            if winner.is_none() {
                let mut committed = record.clone();
                committed.id = SuggestionId("SUG-WINNER".to_string());
                *winner = Some(committed);
            }
            Err(StoreError::Conflict)
        }
    }

    struct FixedForecast(Forecast);

    #[async_trait]
    impl ForecastProvider for FixedForecast {
        async fn three_day_forecast(&self, _destination: &str) -> Result<Forecast, UpstreamError> {
            Ok(self.0.clone())
        }
    }

    struct FailingForecast;

    #[async_trait]
    impl ForecastProvider for FailingForecast {
        async fn three_day_forecast(&self, _destination: &str) -> Result<Forecast, UpstreamError> {
            Err(UpstreamError::Timeout)
        }
    }

    fn mumbai_trip() -> Trip {
        Trip {
            id: TripId("TRIP-MUMBAI-5D".to_string()),
            destination: "Mumbai".to_string(),
            budget_range: "₹50,000 - ₹1,00,000".to_string(),
            travelers: 2,
            duration_days: 5,
            preferences: vec!["food".to_string()],
            start_date: NaiveDate::from_ymd_opt(2026, 11, 10),
            international: false,
            created_at: Utc::now(),
        }
    }

    fn engine_with(trip: Trip) -> (SuggestionEngine, Arc<StubSuggestionStore>) {
        let trips = Arc::new(StubTripStore {
            trips: HashMap::from([(trip.id.0.clone(), trip)]),
        });
        let suggestions = Arc::new(StubSuggestionStore::default());
        let suggestion_store: Arc<dyn SuggestionStore> = suggestions.clone();
        (SuggestionEngine::new(trips, suggestion_store), suggestions)
    }

    #[tokio::test]
    async fn first_call_computes_the_full_record() {
        let (engine, _store) = engine_with(mumbai_trip());
        let record = engine.get_or_create(&TripId("TRIP-MUMBAI-5D".to_string())).await.unwrap();

        assert_eq!(record.total_budget, 75_000);
        assert_eq!(
            record.budget_breakdown.category("accommodation").map(|c| c.amount),
            Some(26_250)
        );
        assert_eq!(record.itinerary.len(), 5);
        assert_eq!(record.itinerary[0].locations[0], "Gateway of India");
        assert_eq!(record.duration_caption, "5-day itinerary");
        assert!(record.seasonal.as_ref().is_some_and(|s| s.festivals.contains(&"Diwali".into())));
        assert!(!record.local_tips.is_empty());
    }

    #[tokio::test]
    async fn repeated_calls_return_the_cached_record_without_rewriting() {
        let (engine, store) = engine_with(mumbai_trip());
        let trip_id = TripId("TRIP-MUMBAI-5D".to_string());

        let first = engine.get_or_create(&trip_id).await.unwrap();
        let second = engine.get_or_create(&trip_id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_first_calls_agree_on_one_record() {
        let (engine, store) = engine_with(mumbai_trip());
        let engine = Arc::new(engine);
        let trip_id = TripId("TRIP-MUMBAI-5D".to_string());

        let (left, right) = tokio::join!(
            engine.get_or_create(&trip_id),
            engine.get_or_create(&trip_id)
        );

        let left = left.unwrap();
        let right = right.unwrap();
        assert_eq!(left, right);
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lost_insert_race_returns_the_winning_record() {
        let trip = mumbai_trip();
        let trips = Arc::new(StubTripStore {
            trips: HashMap::from([(trip.id.0.clone(), trip)]),
        });
        let suggestions: Arc<dyn SuggestionStore> =
            Arc::new(OutracedSuggestionStore::default());
        let engine = SuggestionEngine::new(trips, suggestions);

        let record = engine.get_or_create(&TripId("TRIP-MUMBAI-5D".to_string())).await.unwrap();

        assert_eq!(record.id, SuggestionId("SUG-WINNER".to_string()));
        assert_eq!(record.trip_id, TripId("TRIP-MUMBAI-5D".to_string()));
    }

    #[tokio::test]
    async fn unknown_trip_is_the_only_not_found_path() {
        let (engine, _store) = engine_with(mumbai_trip());
        let error = engine.get_or_create(&TripId("TRIP-NOPE".to_string())).await.unwrap_err();
        assert_eq!(error, SuggestError::TripNotFound(TripId("TRIP-NOPE".to_string())));
    }

    #[tokio::test]
    async fn forecast_failure_degrades_to_seasonal_tips() {
        let (engine, _store) = engine_with(mumbai_trip());
        let engine = engine.with_forecasts(Arc::new(FailingForecast));

        let record = engine.get_or_create(&TripId("TRIP-MUMBAI-5D".to_string())).await.unwrap();
        // November seasonal tips back-fill the per-day weather tips.
        assert!(!record.itinerary[0].weather_tips.is_empty());
    }

    #[tokio::test]
    async fn live_forecast_drives_the_weather_tips() {
        let (engine, _store) = engine_with(mumbai_trip());
        let engine = engine.with_forecasts(Arc::new(FixedForecast(Forecast {
            condition: "Heavy rain".to_string(),
            temperature_c: 27.0,
            humidity: 90,
        })));

        let record = engine.get_or_create(&TripId("TRIP-MUMBAI-5D".to_string())).await.unwrap();
        assert!(record.itinerary[0]
            .weather_tips
            .iter()
            .any(|tip| tip.contains("umbrella")));
    }

    #[tokio::test]
    async fn long_domestic_trip_is_capped_in_the_record() {
        let mut trip = mumbai_trip();
        trip.id = TripId("TRIP-MUMBAI-20D".to_string());
        trip.duration_days = 20;
        let (engine, _store) = engine_with(trip);

        let record = engine.get_or_create(&TripId("TRIP-MUMBAI-20D".to_string())).await.unwrap();
        assert_eq!(record.itinerary.len(), 14);
        assert!(record.duration_caption.contains("capped from 20"));
    }
}
