//! Sound Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{IngestTrackerPort, SoundStorePort, StoreError};
use crate::application::queries::sound_queries::*;

/// LookupSound Handler - 纯本地查询
pub struct LookupSoundHandler {
    store: Arc<dyn SoundStorePort>,
}

impl LookupSoundHandler {
    pub fn new(store: Arc<dyn SoundStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: LookupSoundQuery) -> Result<LookupSoundResponse, ApplicationError> {
        let record = match self.store.get(query.sound_id).await {
            Ok(record) => Some(record),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        Ok(LookupSoundResponse {
            sound_id: query.sound_id,
            record,
        })
    }
}

/// GetIngestStatus Handler
pub struct GetIngestStatusHandler {
    tracker: Arc<dyn IngestTrackerPort>,
    store: Arc<dyn SoundStorePort>,
}

impl GetIngestStatusHandler {
    pub fn new(tracker: Arc<dyn IngestTrackerPort>, store: Arc<dyn SoundStorePort>) -> Self {
        Self { tracker, store }
    }

    pub async fn handle(
        &self,
        query: GetIngestStatusQuery,
    ) -> Result<GetIngestStatusResponse, ApplicationError> {
        let job = self
            .tracker
            .get(query.sound_id)
            .ok_or(ApplicationError::JobNotFound(query.sound_id))?;
        let stored = self.store.contains(query.sound_id).await;

        Ok(GetIngestStatusResponse { job, stored })
    }
}

/// ListSounds Handler
pub struct ListSoundsHandler {
    store: Arc<dyn SoundStorePort>,
}

impl ListSoundsHandler {
    pub fn new(store: Arc<dyn SoundStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, _query: ListSoundsQuery) -> Result<ListSoundsResponse, ApplicationError> {
        let mut records = self.store.list().await?;
        records.sort_by_key(|r| r.created_at());
        let stats = self.store.stats().await;

        Ok(ListSoundsResponse { records, stats })
    }
}
