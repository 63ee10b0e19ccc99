use crate::bridge::UiCommand;
use crate::state::{AppPhase, AppState};
use crate::store::{ClusterId, ClusterRecord, ClusterStore};
use crate::ui::donut;
use egui::Ui;
use tokio::sync::mpsc::UnboundedSender;

const PREVIEW_LEN: usize = 3;

pub fn draw_dashboard(ui: &mut Ui, state: &mut AppState) {
    if let Some(err) = &state.error_message {
        ui.colored_label(egui::Color32::RED, format!("Error: {err}"));
        ui.add_space(4.0);
    }
    if let Some(notice) = &state.last_notice {
        ui.colored_label(egui::Color32::LIGHT_GREEN, notice);
        ui.add_space(4.0);
    }

    match state.phase {
        AppPhase::Syncing => {
            ui.heading("Syncing...");
            ui.add(egui::ProgressBar::new(state.sync_progress).text(&state.sync_status));
            ui.add_space(8.0);
        }
        AppPhase::Archiving => {
            ui.heading("Archiving...");
            ui.add(egui::ProgressBar::new(0.5).animate(true));
            ui.add_space(8.0);
        }
        _ => {}
    }

    let Some(store) = &state.store else {
        if state.phase == AppPhase::Idle {
            ui.centered_and_justified(|ui| {
                ui.label("Enter credentials and click Sync & Cluster, or load the demo inbox.");
            });
        }
        return;
    };

    ui.horizontal(|ui| {
        let frame = egui::Frame::default()
            .inner_margin(8.0)
            .corner_radius(4.0)
            .fill(ui.visuals().faint_bg_color);

        let stats = store.stats();
        for (label, value) in [
            ("Active Emails", stats.active_emails),
            ("Clusters", stats.cluster_count),
            ("Total in Folder", state.folder_total),
        ] {
            frame.show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(label);
                    ui.heading(value.to_string());
                });
            });
        }
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    let busy = state.busy();
    let mut archive_request = None;

    ui.columns(2, |columns| {
        columns[0].heading("Inbox Composition");
        columns[0].add_space(4.0);
        donut::draw_donut(&mut columns[0], store);

        columns[1].heading("Clusters");
        columns[1].add_space(4.0);
        for cluster in store.clusters() {
            if draw_cluster_card(&mut columns[1], store, cluster, busy) {
                archive_request = Some(cluster.id);
            }
            columns[1].add_space(6.0);
        }
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    draw_message_table(ui, store);

    if archive_request.is_some() {
        state.confirm_archive = archive_request;
    }
}

/// Returns true when the archive button was clicked.
fn draw_cluster_card(
    ui: &mut Ui,
    store: &ClusterStore,
    cluster: &ClusterRecord,
    busy: bool,
) -> bool {
    let active = store.active_count(cluster.id);
    let mut clicked = false;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.colored_label(donut::tag_color(&cluster.color), "●");
            ui.strong(&cluster.name);
            ui.label(format!("({active}/{})", cluster.email_count));
        });
        ui.weak(&cluster.description);

        for message in store.preview(cluster.id, PREVIEW_LEN) {
            ui.label(format!(
                "{} - {}",
                message.subject_or_default(),
                message.sender_or_default()
            ));
        }

        clicked = ui
            .add_enabled(!busy && active > 0, egui::Button::new("Archive all"))
            .clicked();
    });

    clicked
}

fn draw_message_table(ui: &mut Ui, store: &ClusterStore) {
    ui.collapsing("All Messages", |ui| {
        egui_extras::TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(egui_extras::Column::remainder().at_least(200.0))
            .column(egui_extras::Column::initial(180.0))
            .column(egui_extras::Column::initial(160.0))
            .column(egui_extras::Column::initial(50.0))
            .header(20.0, |mut header| {
                for title in ["Subject", "Sender", "Cluster", "Score"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                let messages = store.messages();
                body.rows(18.0, messages.len(), |mut row| {
                    let Some(stored) = messages.get(row.index()) else {
                        return;
                    };
                    row.col(|ui| {
                        if stored.archived {
                            ui.weak(stored.message.subject_or_default());
                        } else {
                            ui.label(stored.message.subject_or_default());
                        }
                    });
                    row.col(|ui| {
                        ui.label(stored.message.sender_or_default());
                    });
                    row.col(|ui| {
                        ui.label(store.cluster_name(stored.cluster_id));
                    });
                    row.col(|ui| {
                        ui.label(stored.score.to_string());
                    });
                });
            });
    });
}

pub fn draw_archive_confirmation(
    ctx: &egui::Context,
    state: &mut AppState,
    cmd_tx: &UnboundedSender<UiCommand>,
) {
    let Some(cluster_id) = state.confirm_archive else {
        return;
    };
    let Some(store) = &state.store else {
        state.confirm_archive = None;
        return;
    };

    let name = store.cluster_name(cluster_id).to_string();
    let uids = store.pending_uids(cluster_id);
    let mut decision = None;

    egui::Window::new("Archive cluster?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "Archive {} emails in \"{}\"? They leave {} but stay searchable.",
                uids.len(),
                name,
                state.synced_folder()
            ));
            ui.horizontal(|ui| {
                if ui.button("Archive").clicked() {
                    decision = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    decision = Some(false);
                }
            });
        });

    match decision {
        Some(true) => {
            state.confirm_archive = None;
            start_archive(state, cmd_tx, cluster_id, uids);
        }
        Some(false) => state.confirm_archive = None,
        None => {}
    }
}

fn start_archive(
    state: &mut AppState,
    cmd_tx: &UnboundedSender<UiCommand>,
    cluster_id: ClusterId,
    uids: Vec<u32>,
) {
    if let Some(cmd) = state.begin_archive(cluster_id, uids) {
        let _ = cmd_tx.send(cmd);
    }
}
