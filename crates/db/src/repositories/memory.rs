//! In-memory store implementations for tests and local wiring without a
//! database file.

use std::collections::HashMap;
use std::sync::Mutex;

use tripweaver_core::{StoreError, SuggestionRecord, SuggestionStore, Trip, TripId, TripStore};

#[derive(Default)]
pub struct InMemoryTripStore {
    trips: Mutex<HashMap<String, Trip>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trips(trips: impl IntoIterator<Item = Trip>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.trips.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            for trip in trips {
                guard.insert(trip.id.0.clone(), trip);
            }
        }
        store
    }

    pub fn insert(&self, trip: Trip) {
        self.trips
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(trip.id.0.clone(), trip);
    }
}

#[async_trait::async_trait]
impl TripStore for InMemoryTripStore {
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, StoreError> {
        Ok(self
            .trips
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id.0)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemorySuggestionStore {
    records: Mutex<HashMap<String, SuggestionRecord>>,
}

impl InMemorySuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SuggestionStore for InMemorySuggestionStore {
    async fn find_by_trip(&self, trip_id: &TripId) -> Result<Option<SuggestionRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&trip_id.0)
            .cloned())
    }

    async fn insert_if_absent(&self, record: &SuggestionRecord) -> Result<(), StoreError> {
        let mut records =
            self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if records.contains_key(&record.trip_id.0) {
            return Err(StoreError::Conflict);
        }
        records.insert(record.trip_id.0.clone(), record.clone());
        Ok(())
    }
}
