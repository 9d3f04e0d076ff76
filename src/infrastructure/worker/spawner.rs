//! Tokio Task Spawner
//!
//! 实现 TaskSpawnerPort trait，基于 tokio_util 的 TaskTracker

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio_util::task::TaskTracker;

use crate::application::ports::TaskSpawnerPort;

/// 后台任务提交器
#[derive(Default)]
pub struct TokioTaskSpawner {
    tracker: TaskTracker,
}

impl TokioTaskSpawner {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl TaskSpawnerPort for TokioTaskSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.tracker.spawn(task);
    }

    fn active(&self) -> usize {
        self.tracker.len()
    }

    async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        tracing::debug!("All background tasks finished");
    }
}
