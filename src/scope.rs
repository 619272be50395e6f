//! Async work tied to a mounted screen.
//!
//! Each screen owns a `MountScope`. Work spawned through it races a shutdown
//! signal, and dropping the scope (the screen unmounting) cancels whatever is
//! still pending, so no completion ever lands on a discarded screen.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Identifies one mounted screen instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(Uuid);

impl ScreenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct MountScope {
    id: ScreenId,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl MountScope {
    pub fn new() -> Self {
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            id: ScreenId::new(),
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    /// Spawn work that is dropped unfinished if the scope shuts down first
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handles.retain(|h| !h.is_finished());

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = shutdown_rx.wait_for(|stopped| *stopped) => {}
                _ = fut => {}
            }
        });
        self.handles.push(handle);
    }

    pub fn shutdown(&mut self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Default for MountScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MountScope {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_spawned_work_completes() {
        let mut scope = MountScope::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        scope.spawn(async move {
            let _ = tx.send(7);
        });

        assert_eq!(rx.recv().await, Some(7));
    }

    #[tokio::test]
    async fn test_drop_cancels_pending_work() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();
        {
            let mut scope = MountScope::new();
            scope.spawn(async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                let _ = tx.send(1);
            });
        }

        // Sender went away with the aborted task, nothing was delivered
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_screen_ids_are_unique() {
        assert_ne!(MountScope::new().id(), MountScope::new().id());
    }
}
