use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scanner_logging::{scanner_debug, scanner_trace};
use tokio_util::sync::CancellationToken;

use crate::types::EngineCommand;
use crate::{Backend, EngineEvent, RequestSeq, SourceCollection, TimerToken};

/// Runs backend requests and timers on a tokio runtime owned by a worker
/// thread. Every command becomes an independent task; results come back as
/// `EngineEvent`s in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn Backend>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("scanner-engine")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("scanner-engine-commands".to_string())
            .spawn(move || {
                let mut timers: HashMap<TimerToken, CancellationToken> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::ArmTimer { token, after } => {
                            timers.retain(|_, cancel| !cancel.is_cancelled());
                            let cancel = CancellationToken::new();
                            if let Some(previous) = timers.insert(token, cancel.clone()) {
                                previous.cancel();
                            }
                            runtime.spawn(run_timer(token, after, cancel, event_tx.clone()));
                        }
                        EngineCommand::DisarmTimer { token } => {
                            if let Some(cancel) = timers.remove(&token) {
                                cancel.cancel();
                            }
                        }
                        request => {
                            let backend = backend.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                let event = handle_request(backend.as_ref(), request).await;
                                if let Some(event) = event {
                                    let _ = event_tx.send(event);
                                }
                            });
                        }
                    }
                }
                scanner_debug!("engine command channel closed; shutting down");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn upload(&self, seq: RequestSeq, path: impl Into<PathBuf>) {
        self.send(EngineCommand::Upload {
            seq,
            path: path.into(),
        });
    }

    pub fn search(&self, seq: RequestSeq, query: impl Into<String>) {
        self.send(EngineCommand::Search {
            seq,
            query: query.into(),
        });
    }

    pub fn list_sources(&self, collection: SourceCollection, seq: RequestSeq) {
        self.send(EngineCommand::ListSources { collection, seq });
    }

    /// Emits `EngineEvent::TimerFired { token }` after `after` unless disarmed.
    /// Re-arming a token replaces its previous timer.
    pub fn arm_timer(&self, token: TimerToken, after: Duration) {
        self.send(EngineCommand::ArmTimer { token, after });
    }

    pub fn disarm_timer(&self, token: TimerToken) {
        self.send(EngineCommand::DisarmTimer { token });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_request(backend: &dyn Backend, command: EngineCommand) -> Option<EngineEvent> {
    let event = match command {
        EngineCommand::Upload { seq, path } => EngineEvent::UploadCompleted {
            seq,
            result: backend.upload_csv(&path).await,
        },
        EngineCommand::Search { seq, query } => EngineEvent::SearchCompleted {
            seq,
            result: backend.search_media(&query).await,
        },
        EngineCommand::ListSources { collection, seq } => EngineEvent::SourcesLoaded {
            collection,
            seq,
            result: backend.list_sources(collection).await,
        },
        EngineCommand::ArmTimer { .. } | EngineCommand::DisarmTimer { .. } => return None,
    };
    Some(event)
}

async fn run_timer(
    token: TimerToken,
    after: Duration,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    if tokio::time::timeout(after, cancel.cancelled()).await.is_err() {
        scanner_trace!("timer {} fired after {:?}", token, after);
        let _ = event_tx.send(EngineEvent::TimerFired { token });
        // Mark as spent so the next arm can prune it.
        cancel.cancel();
    }
}
