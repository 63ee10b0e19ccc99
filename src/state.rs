use crate::bridge::UiCommand;
use crate::imap::Credentials;
use crate::store::{ClusterId, ClusterStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    Idle,
    Syncing,
    Synced,
    Archiving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Mailbox,
    Demo,
}

/// Account and folder the loaded store was fetched from. Stored UIDs are
/// only valid there, whatever the sidebar fields say afterwards.
#[derive(Debug, Clone)]
pub struct SyncedMailbox {
    pub creds: Credentials,
    pub folder: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    // Credentials
    pub email: String,
    pub password: String,
    pub folder: String,

    pub fetch_limit: u32,

    pub phase: AppPhase,
    pub source: DataSource,

    pub sync_progress: f32,
    pub sync_status: String,

    // Results
    pub store: Option<ClusterStore>,
    pub synced: Option<SyncedMailbox>,
    pub folder_total: usize,
    pub confirm_archive: Option<ClusterId>,
    pub archiving: Option<ClusterId>,
    pub last_notice: Option<String>,

    pub error_message: Option<String>,
}

impl AppState {
    pub fn new(folder: String, fetch_limit: u32) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            folder,
            fetch_limit,
            phase: AppPhase::Idle,
            source: DataSource::Mailbox,
            sync_progress: 0.0,
            sync_status: String::new(),
            store: None,
            synced: None,
            folder_total: 0,
            confirm_archive: None,
            archiving: None,
            last_notice: None,
            error_message: None,
        }
    }

    pub fn busy(&self) -> bool {
        matches!(self.phase, AppPhase::Syncing | AppPhase::Archiving)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    pub fn can_sync(&self) -> bool {
        !self.busy() && self.email.contains('@') && !self.password.is_empty()
    }

    /// Resets result state before a new sync or demo load.
    pub fn begin_sync(&mut self, source: DataSource) {
        self.phase = AppPhase::Syncing;
        self.source = source;
        self.sync_progress = 0.0;
        self.sync_status = "Starting...".to_string();
        self.error_message = None;
        self.last_notice = None;
        self.confirm_archive = None;
        self.store = None;
        self.synced = match source {
            DataSource::Mailbox => Some(SyncedMailbox {
                creds: self.credentials(),
                folder: self.folder.clone(),
            }),
            DataSource::Demo => None,
        };
    }

    /// Folder name shown to the user for the loaded store.
    pub fn synced_folder(&self) -> &str {
        self.synced.as_ref().map_or("the demo inbox", |m| m.folder.as_str())
    }

    /// Starts archiving `uids` of a cluster. Demo data is archived locally
    /// and yields no command; mailbox data yields a command aimed at the
    /// mailbox the store was synced from.
    pub fn begin_archive(&mut self, cluster_id: ClusterId, uids: Vec<u32>) -> Option<UiCommand> {
        self.error_message = None;
        self.last_notice = None;

        let Some(mailbox) = self.synced.clone() else {
            self.finish_archive(cluster_id, uids.len());
            return None;
        };

        self.phase = AppPhase::Archiving;
        self.archiving = Some(cluster_id);
        Some(UiCommand::ArchiveCluster {
            creds: mailbox.creds,
            folder: mailbox.folder,
            cluster_id,
            uids,
        })
    }

    /// Applies a finished archive to the local store.
    pub fn finish_archive(&mut self, cluster_id: ClusterId, archived: usize) {
        if let Some(store) = self.store.as_mut() {
            store.mark_archived(cluster_id);
            self.last_notice = Some(format!(
                "Archived {} emails from {}",
                archived,
                store.cluster_name(cluster_id)
            ));
        }
        self.archiving = None;
        self.phase = AppPhase::Synced;
    }

    /// Applies an archive that stopped part-way: only `moved_uids` left the
    /// server folder.
    pub fn finish_partial_archive(&mut self, moved_uids: &[u32], message: String) {
        if let Some(store) = self.store.as_mut() {
            store.mark_uids_archived(moved_uids);
        }
        self.error_message = Some(message);
        self.archiving = None;
        self.phase = AppPhase::Synced;
    }
}
