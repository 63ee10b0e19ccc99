use crate::cluster::Assignment;
use crate::message::Message;

pub type ClusterId = usize;

/// Category metadata recorded once per sync for every cluster that received
/// at least one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRecord {
    pub id: ClusterId,
    pub name: String,
    pub description: String,
    pub color: String,
    pub email_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub message: Message,
    pub cluster_id: ClusterId,
    pub score: u32,
    pub archived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub active_emails: usize,
    pub cluster_count: usize,
}

/// In-memory result of one sync. A new sync replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct ClusterStore {
    clusters: Vec<ClusterRecord>,
    messages: Vec<StoredMessage>,
}

impl ClusterStore {
    pub fn from_assignment(assignment: &Assignment<'_>) -> Self {
        let mut clusters = Vec::new();
        let mut messages = Vec::with_capacity(assignment.len());

        for (id, group) in assignment.non_empty().enumerate() {
            clusters.push(ClusterRecord {
                id,
                name: group.template.name.clone(),
                description: group.template.description.clone(),
                color: group.template.color.clone(),
                email_count: group.len(),
            });
            messages.extend(group.members.iter().map(|p| StoredMessage {
                message: p.message.clone(),
                cluster_id: id,
                score: p.score,
                archived: false,
            }));
        }

        Self { clusters, messages }
    }

    pub fn clusters(&self) -> &[ClusterRecord] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&ClusterRecord> {
        self.clusters.get(id)
    }

    pub fn messages(&self) -> &[StoredMessage] {
        &self.messages
    }

    fn active_in(&self, id: ClusterId) -> impl Iterator<Item = &StoredMessage> {
        self.messages
            .iter()
            .filter(move |m| m.cluster_id == id && !m.archived)
    }

    /// First `n` unarchived messages of a cluster.
    pub fn preview(&self, id: ClusterId, n: usize) -> Vec<&Message> {
        self.active_in(id).take(n).map(|m| &m.message).collect()
    }

    pub fn active_count(&self, id: ClusterId) -> usize {
        self.active_in(id).count()
    }

    /// UIDs still waiting to be archived in a cluster.
    pub fn pending_uids(&self, id: ClusterId) -> Vec<u32> {
        self.active_in(id).map(|m| m.message.uid).collect()
    }

    /// Marks every message of the cluster archived and returns how many
    /// changed state.
    pub fn mark_archived(&mut self, id: ClusterId) -> usize {
        let mut changed = 0;
        for m in self
            .messages
            .iter_mut()
            .filter(|m| m.cluster_id == id && !m.archived)
        {
            m.archived = true;
            changed += 1;
        }
        changed
    }

    /// Marks the given UIDs archived, whatever cluster they sit in. Returns
    /// how many changed state.
    pub fn mark_uids_archived(&mut self, uids: &[u32]) -> usize {
        let mut changed = 0;
        for m in self
            .messages
            .iter_mut()
            .filter(|m| !m.archived && uids.contains(&m.message.uid))
        {
            m.archived = true;
            changed += 1;
        }
        changed
    }

    pub fn stats(&self) -> Stats {
        Stats {
            active_emails: self.messages.iter().filter(|m| !m.archived).count(),
            cluster_count: self.clusters.len(),
        }
    }

    pub fn cluster_name(&self, id: ClusterId) -> &str {
        self.cluster(id).map_or("", |c| c.name.as_str())
    }
}
