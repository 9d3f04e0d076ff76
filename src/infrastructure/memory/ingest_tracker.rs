//! In-Memory Ingest Tracker Implementation

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{IngestTrackerPort, TrackerError};
use crate::domain::ingest::{IngestJob, IngestJobError};
use crate::domain::sound::SoundId;

/// 内存导入任务追踪器
pub struct InMemoryIngestTracker {
    /// sound_id -> IngestJob
    jobs: DashMap<SoundId, IngestJob>,
}

impl InMemoryIngestTracker {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryIngestTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestTrackerPort for InMemoryIngestTracker {
    fn track(&self, job: IngestJob) {
        let sound_id = job.sound_id();
        let state = job.state();
        if self.jobs.insert(sound_id, job).is_some() {
            tracing::debug!(sound_id = %sound_id, "Ingest job replaced");
        }
        tracing::debug!(sound_id = %sound_id, state = %state, "Ingest job tracked");
    }

    fn track_if_absent(&self, job: IngestJob) -> bool {
        let sound_id = job.sound_id();
        match self.jobs.entry(sound_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                tracing::debug!(sound_id = %sound_id, state = %job.state(), "Ingest job tracked");
                entry.insert(job);
                true
            }
        }
    }

    fn get(&self, id: SoundId) -> Option<IngestJob> {
        self.jobs.get(&id).map(|j| j.clone())
    }

    fn transition(
        &self,
        id: SoundId,
        f: &mut dyn FnMut(&mut IngestJob) -> Result<(), IngestJobError>,
    ) -> Result<IngestJob, TrackerError> {
        let mut job = self.jobs.get_mut(&id).ok_or(TrackerError::NotFound(id))?;

        let old_state = job.state();
        f(job.value_mut())?;

        tracing::debug!(
            sound_id = %id,
            old_state = %old_state,
            new_state = %job.state(),
            "Ingest job state changed"
        );
        Ok(job.clone())
    }

    fn list(&self) -> Vec<IngestJob> {
        self.jobs.iter().map(|j| j.value().clone()).collect()
    }

    fn prune_finished(&self, older_than_secs: u64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(older_than_secs as i64);
        let before = self.jobs.len();
        self.jobs
            .retain(|_, job| !(job.state().is_terminal() && job.updated_at() < cutoff));
        let pruned = before.saturating_sub(self.jobs.len());

        if pruned > 0 {
            tracing::debug!(pruned = pruned, "Finished ingest jobs pruned");
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingest::{IngestSourceKind, IngestState};

    #[test]
    fn test_job_lifecycle() {
        let tracker = InMemoryIngestTracker::new();
        let id = SoundId::new();

        tracker.track(IngestJob::started(id, IngestSourceKind::Url));
        assert_eq!(tracker.get(id).unwrap().state(), IngestState::Fetching);

        let job = tracker.transition(id, &mut |job| job.complete()).unwrap();
        assert_eq!(job.state(), IngestState::Stored);
        assert_eq!(tracker.get(id).unwrap().state(), IngestState::Stored);
    }

    #[test]
    fn test_track_if_absent_keeps_existing_job() {
        let tracker = InMemoryIngestTracker::new();
        let id = SoundId::new();

        assert!(tracker.track_if_absent(IngestJob::awaiting_upload(id)));
        tracker.transition(id, &mut |job| job.begin_fetch()).unwrap();

        assert!(!tracker.track_if_absent(IngestJob::awaiting_upload(id)));
        assert_eq!(tracker.get(id).unwrap().state(), IngestState::Fetching);
    }

    #[test]
    fn test_transition_errors() {
        let tracker = InMemoryIngestTracker::new();
        let id = SoundId::new();

        let result = tracker.transition(id, &mut |job| job.complete());
        assert!(matches!(result, Err(TrackerError::NotFound(_))));

        tracker.track(IngestJob::awaiting_upload(id));
        let result = tracker.transition(id, &mut |job| job.complete());
        assert!(matches!(result, Err(TrackerError::InvalidTransition(_))));
        // 失败的迁移不改变状态
        assert_eq!(tracker.get(id).unwrap().state(), IngestState::AwaitingUpload);
    }

    #[test]
    fn test_prune_finished_keeps_running_jobs() {
        let tracker = InMemoryIngestTracker::new();
        let done = SoundId::new();
        let running = SoundId::new();

        tracker.track(IngestJob::started(done, IngestSourceKind::Url));
        tracker.transition(done, &mut |job| job.complete()).unwrap();
        tracker.track(IngestJob::started(running, IngestSourceKind::Url));

        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert_eq!(tracker.prune_finished(1), 1);
        assert!(tracker.get(done).is_none());
        assert!(tracker.get(running).is_some());
        assert_eq!(tracker.list().len(), 1);
    }
}
