use std::time::Duration;

use futures::future::join_all;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// In-flight requests get this long after SIGTERM before listeners close
const SIGTERM_DRAIN: Duration = Duration::from_secs(10);
/// Tasks still running this long after shutdown are abandoned
const JOIN_DEADLINE: Duration = Duration::from_secs(30);

/// Keeps the daemon's tasks and lets callers stop them.
///
/// Dropping the handle leaves the service running.
pub struct ShutdownHandle {
    trigger: watch::Sender<()>,
    watcher: JoinHandle<()>,
    tasks: Vec<JoinHandle<()>>,
}

impl ShutdownHandle {
    /// Install signal handlers; tasks spawned with [`ShutdownHandle::spawn`]
    /// should watch the returned receiver.
    pub(crate) fn install() -> std::io::Result<(Self, watch::Receiver<()>)> {
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;

        let (trigger, listeners) = watch::channel(());
        let broadcast = trigger.clone();
        let mut requested = listeners.clone();

        let watcher = tokio::spawn(async move {
            tokio::select! {
                _ = interrupt.recv() => tracing::debug!("SIGINT, stopping now"),
                _ = terminate.recv() => {
                    tracing::debug!("SIGTERM, draining for {:?}", SIGTERM_DRAIN);
                    tokio::time::sleep(SIGTERM_DRAIN).await;
                }
                _ = requested.changed() => tracing::debug!("shutdown requested"),
            }
            let _ = broadcast.send(());
        });

        let handle = Self {
            trigger,
            watcher,
            tasks: Vec::new(),
        };
        Ok((handle, listeners))
    }

    pub(crate) fn track(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    /// Ask every task to stop, as if a signal had arrived
    pub fn shutdown(&self) {
        let _ = self.trigger.send(());
    }

    /// Resolve once shutdown was triggered and the tasks have finished
    pub async fn wait(self) {
        let _ = self.watcher.await;

        if tokio::time::timeout(JOIN_DEADLINE, join_all(self.tasks))
            .await
            .is_err()
        {
            tracing::error!(
                "tasks still running {}s after shutdown, exiting",
                JOIN_DEADLINE.as_secs()
            );
            std::process::exit(4);
        }
    }
}
