use crate::bridge::UiCommand;
use crate::state::{AppState, DataSource};
use egui::Ui;
use tokio::sync::mpsc::UnboundedSender;

pub fn draw_sidebar(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    let busy = state.busy();

    ui.heading("Mailbox");
    ui.add_space(4.0);

    ui.label("Email");
    ui.add_enabled(!busy, egui::TextEdit::singleline(&mut state.email).hint_text("you@gmail.com"));

    ui.add_space(4.0);
    ui.label("App Password");
    ui.add_enabled(
        !busy,
        egui::TextEdit::singleline(&mut state.password)
            .password(true)
            .hint_text("app password"),
    );

    ui.add_space(4.0);
    ui.label("Folder");
    ui.add_enabled(!busy, egui::TextEdit::singleline(&mut state.folder).hint_text("INBOX"));

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.label("Recent emails to cluster");
    ui.add_enabled(!busy, egui::Slider::new(&mut state.fetch_limit, 1..=2000));

    ui.add_space(8.0);

    if ui
        .add_enabled(state.can_sync(), egui::Button::new("Sync & Cluster"))
        .clicked()
    {
        state.begin_sync(DataSource::Mailbox);
        let _ = cmd_tx.send(UiCommand::StartSync {
            creds: state.credentials(),
            folder: state.folder.clone(),
            limit: state.fetch_limit,
        });
    }

    ui.add_space(4.0);

    if ui
        .add_enabled(!busy, egui::Button::new("Load Demo"))
        .on_hover_text("Cluster a sample inbox without connecting")
        .clicked()
    {
        state.begin_sync(DataSource::Demo);
        let _ = cmd_tx.send(UiCommand::LoadDemo);
    }

    if let Some(store) = &state.store {
        ui.add_space(8.0);
        ui.separator();
        ui.add_space(4.0);

        let stats = store.stats();
        ui.label(format!("Active emails: {}", stats.active_emails));
        ui.label(format!("Clusters: {}", stats.cluster_count));
        if state.source == DataSource::Demo {
            ui.weak("Demo data: archiving stays local");
        }
    }
}
