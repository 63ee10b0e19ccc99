//! Sync pipeline: fetch recent mail, categorize it, build a fresh store.

use crate::cluster::{classify, TemplateSet};
use crate::error::AppError;
use crate::imap::{fetcher, Credentials};
use crate::message::Message;
use crate::store::ClusterStore;

#[derive(Debug)]
pub struct SyncOutcome {
    pub store: ClusterStore,
    pub fetched: usize,
    pub folder_total: usize,
}

/// Categorizes an already-fetched batch. This is the synchronous stage of
/// the pipeline and the only one the demo mode runs.
pub fn categorize(messages: &[Message], templates: &TemplateSet) -> Result<ClusterStore, AppError> {
    let assignment = classify(messages, templates.as_slice())?;
    for group in assignment.non_empty() {
        tracing::info!(cluster = group.name(), count = group.len(), "Cluster built");
    }
    Ok(ClusterStore::from_assignment(&assignment))
}

pub async fn run_sync<F>(
    creds: &Credentials,
    folder: &str,
    limit: u32,
    snippet_len: usize,
    templates: &TemplateSet,
    progress_cb: F,
) -> Result<SyncOutcome, AppError>
where
    F: Fn(f32, String) + Send + Sync + Clone + 'static,
{
    progress_cb(0.0, "Fetching message IDs...".to_string());
    let (uids, folder_total) = fetcher::fetch_recent_uids(creds, folder, limit).await?;

    progress_cb(
        0.05,
        format!("Found {} emails, fetching {}...", folder_total, uids.len()),
    );
    let messages =
        fetcher::fetch_messages(creds, folder, uids, snippet_len, progress_cb.clone()).await;

    progress_cb(0.95, format!("Categorizing {} emails...", messages.len()));
    let store = categorize(&messages, templates)?;

    tracing::info!(
        fetched = messages.len(),
        clusters = store.clusters().len(),
        "Sync complete"
    );
    Ok(SyncOutcome {
        store,
        fetched: messages.len(),
        folder_total,
    })
}

/// Fixed sample inbox for trying the app without an account.
pub fn demo_messages() -> Vec<Message> {
    vec![
        Message::new(
            11,
            "Q4 Planning Meeting Tomorrow",
            "manager@company.com",
            "Please prepare your quarterly reports...",
        ),
        Message::new(
            10,
            "RE: Project Update",
            "team@company.com",
            "Thanks for the update on the new feature...",
        ),
        Message::new(
            9,
            "Sprint Review Notes",
            "scrum@company.com",
            "Action items from today's sprint review...",
        ),
        Message::new(
            8,
            "TechCrunch Daily: AI Breakthrough",
            "newsletters@techcrunch.com",
            "Today's top tech stories including...",
        ),
        Message::new(
            7,
            "Morning Brew: Market Updates",
            "crew@morningbrew.com",
            "Stock futures are up this morning...",
        ),
        Message::new(
            6,
            "Your Credit Card Statement is Ready",
            "statements@bank.com",
            "Your December statement is now available...",
        ),
        Message::new(
            5,
            "Payment Confirmation - $89.99",
            "billing@service.com",
            "Thank you for your payment of $89.99...",
        ),
        Message::new(
            4,
            "John shared a photo with you",
            "notifications@instagram.com",
            "John posted a new photo from vacation...",
        ),
        Message::new(
            3,
            "You have 3 new connections",
            "invitations@linkedin.com",
            "Connect with professionals in your network...",
        ),
        Message::new(
            2,
            "Your Amazon order has shipped",
            "shipment-tracking@amazon.com",
            "Your order #123-4567890 has been shipped...",
        ),
        Message::new(
            1,
            "Flash Sale: 50% Off Everything",
            "deals@retailer.com",
            "Limited time offer - save big on your favorites...",
        ),
    ]
}
