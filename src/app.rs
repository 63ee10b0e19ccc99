use crate::bridge::{BackgroundEvent, UiCommand};
use crate::config::Settings;
use crate::state::{AppPhase, AppState};
use crate::ui::{dashboard, sidebar};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug)]
pub struct InboxClustersApp {
    state: AppState,
    cmd_tx: UnboundedSender<UiCommand>,
    event_rx: std::sync::mpsc::Receiver<BackgroundEvent>,
}

impl InboxClustersApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let state = AppState::new(settings.folder.clone(), settings.fetch_limit);
        let bridge = crate::bridge::setup_bridge(cc.egui_ctx.clone(), Arc::new(settings));
        Self {
            state,
            cmd_tx: bridge.cmd_tx,
            event_rx: bridge.event_rx,
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                BackgroundEvent::SyncProgress { progress, status } => {
                    self.state.sync_progress = progress;
                    self.state.sync_status = status;
                }
                BackgroundEvent::SyncComplete {
                    store,
                    folder_total,
                } => {
                    self.state.store = Some(store);
                    self.state.folder_total = folder_total;
                    self.state.phase = AppPhase::Synced;
                    self.state.sync_progress = 1.0;
                    self.state.sync_status = "Complete".to_string();
                }
                BackgroundEvent::SyncError(msg) => {
                    self.state.error_message = Some(msg);
                    self.state.phase = AppPhase::Idle;
                }
                BackgroundEvent::ArchiveComplete {
                    cluster_id,
                    archived,
                } => {
                    self.state.finish_archive(cluster_id, archived);
                }
                BackgroundEvent::ArchivePartial {
                    moved_uids,
                    message,
                } => {
                    self.state.finish_partial_archive(&moved_uids, message);
                }
                BackgroundEvent::ArchiveError(msg) => {
                    self.state.error_message = Some(msg);
                    self.state.archiving = None;
                    self.state.phase = AppPhase::Synced;
                }
            }
            ctx.request_repaint();
        }
    }
}

impl eframe::App for InboxClustersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    sidebar::draw_sidebar(ui, &mut self.state, &self.cmd_tx);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                dashboard::draw_dashboard(ui, &mut self.state);
            });
        });

        dashboard::draw_archive_confirmation(ctx, &mut self.state, &self.cmd_tx);
    }
}
