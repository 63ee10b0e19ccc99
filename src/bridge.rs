use crate::config::Settings;
use crate::error::AppError;
use crate::imap::{archiver, Credentials};
use crate::store::{ClusterId, ClusterStore};
use crate::sync;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{error, info};

#[derive(Debug)]
pub enum UiCommand {
    StartSync {
        creds: Credentials,
        folder: String,
        limit: u32,
    },
    LoadDemo,
    ArchiveCluster {
        creds: Credentials,
        folder: String,
        cluster_id: ClusterId,
        uids: Vec<u32>,
    },
}

#[derive(Debug)]
pub enum BackgroundEvent {
    SyncProgress {
        progress: f32,
        status: String,
    },
    SyncComplete {
        store: ClusterStore,
        folder_total: usize,
    },
    SyncError(String),
    ArchiveComplete {
        cluster_id: ClusterId,
        archived: usize,
    },
    /// The server moved only `moved_uids` before the archive failed.
    ArchivePartial {
        moved_uids: Vec<u32>,
        message: String,
    },
    ArchiveError(String),
}

#[derive(Debug)]
pub struct BridgeChannels {
    pub cmd_tx: tokio_mpsc::UnboundedSender<UiCommand>,
    pub event_rx: std_mpsc::Receiver<BackgroundEvent>,
}

pub fn setup_bridge(ctx: egui::Context, settings: Arc<Settings>) -> BridgeChannels {
    let (cmd_tx, cmd_rx) = tokio_mpsc::unbounded_channel::<UiCommand>();
    let (event_tx, event_rx) = std_mpsc::channel::<BackgroundEvent>();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(background_loop(cmd_rx, event_tx, ctx, settings));
    });

    BridgeChannels { cmd_tx, event_rx }
}

/// Sends events to the UI thread and wakes it up.
#[derive(Clone)]
struct EventSink {
    tx: std_mpsc::Sender<BackgroundEvent>,
    ctx: egui::Context,
}

impl EventSink {
    fn send(&self, evt: BackgroundEvent) {
        if let Err(e) = self.tx.send(evt) {
            tracing::warn!("Failed to send event to UI: {}", e);
        }
        self.ctx.request_repaint();
    }
}

async fn background_loop(
    mut cmd_rx: tokio_mpsc::UnboundedReceiver<UiCommand>,
    event_tx: std_mpsc::Sender<BackgroundEvent>,
    ctx: egui::Context,
    settings: Arc<Settings>,
) {
    let sink = EventSink { tx: event_tx, ctx };

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            UiCommand::StartSync {
                creds,
                folder,
                limit,
            } => {
                let sink = sink.clone();
                let settings = settings.clone();
                tokio::spawn(async move {
                    handle_sync(creds, folder, limit, settings, sink).await;
                });
            }
            UiCommand::LoadDemo => handle_demo(&settings, &sink),
            UiCommand::ArchiveCluster {
                creds,
                folder,
                cluster_id,
                uids,
            } => {
                let sink = sink.clone();
                tokio::spawn(async move {
                    handle_archive(creds, folder, cluster_id, uids, sink).await;
                });
            }
        }
    }
}

async fn handle_sync(
    creds: Credentials,
    folder: String,
    limit: u32,
    settings: Arc<Settings>,
    sink: EventSink,
) {
    let progress_cb = {
        let sink = sink.clone();
        move |progress: f32, status: String| {
            sink.send(BackgroundEvent::SyncProgress { progress, status });
        }
    };

    let result = sync::run_sync(
        &creds,
        &folder,
        limit,
        settings.snippet_len,
        &settings.templates,
        progress_cb,
    )
    .await;

    match result {
        Ok(outcome) => {
            info!(
                "Synced {} of {} emails from {}",
                outcome.fetched, outcome.folder_total, folder
            );
            sink.send(BackgroundEvent::SyncComplete {
                store: outcome.store,
                folder_total: outcome.folder_total,
            });
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            sink.send(BackgroundEvent::SyncError(e.to_string()));
        }
    }
}

fn handle_demo(settings: &Settings, sink: &EventSink) {
    let messages = sync::demo_messages();
    match sync::categorize(&messages, &settings.templates) {
        Ok(store) => sink.send(BackgroundEvent::SyncComplete {
            store,
            folder_total: messages.len(),
        }),
        Err(e) => sink.send(BackgroundEvent::SyncError(e.to_string())),
    }
}

async fn handle_archive(
    creds: Credentials,
    folder: String,
    cluster_id: ClusterId,
    uids: Vec<u32>,
    sink: EventSink,
) {
    match archiver::archive_messages(&creds, &folder, &uids).await {
        Ok(archived) => {
            info!("Archived {} emails from cluster {}", archived, cluster_id);
            sink.send(BackgroundEvent::ArchiveComplete {
                cluster_id,
                archived,
            });
        }
        Err(AppError::PartialArchive { moved, reason }) => {
            error!(
                "Archived only {} of {} emails from cluster {}: {}",
                moved,
                uids.len(),
                cluster_id,
                reason
            );
            sink.send(BackgroundEvent::ArchivePartial {
                moved_uids: moved_prefix(&uids, moved).to_vec(),
                message: format!(
                    "Archived {} of {} emails before failing: {}",
                    moved,
                    uids.len(),
                    reason
                ),
            });
        }
        Err(e) => {
            error!("Failed to archive cluster {}: {}", cluster_id, e);
            sink.send(BackgroundEvent::ArchiveError(format!(
                "Failed to archive cluster: {e}"
            )));
        }
    }
}

/// UIDs covered by the first `moved` moves, in the order they were sent.
fn moved_prefix(uids: &[u32], moved: usize) -> &[u32] {
    &uids[..moved.min(uids.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moved_prefix_is_clamped() {
        assert_eq!(moved_prefix(&[5, 6, 7], 2), &[5, 6]);
        assert_eq!(moved_prefix(&[5, 6, 7], 10), &[5, 6, 7]);
        assert!(moved_prefix(&[], 3).is_empty());
    }
}
