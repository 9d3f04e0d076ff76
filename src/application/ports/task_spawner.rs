//! Task Spawner Port - 后台任务提交

use async_trait::async_trait;
use futures_util::future::BoxFuture;

/// Task Spawner Port
///
/// 导入流水线通过它提交后台任务，控制线程立即返回
#[async_trait]
pub trait TaskSpawnerPort: Send + Sync {
    fn spawn(&self, task: BoxFuture<'static, ()>);

    /// 当前未完成的任务数
    fn active(&self) -> usize;

    /// 停止接收新任务并等待已提交的任务全部结束
    async fn wait_idle(&self);
}
