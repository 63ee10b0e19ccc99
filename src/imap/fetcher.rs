use crate::error::AppError;
use crate::message::Message;
use futures::StreamExt;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use tokio::sync::Mutex;

use super::{connect_imap, logout, uid_set, Credentials};

static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^From:[ \t]*(.*)$").unwrap());
static SUBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^Subject:[ \t]*(.*)$").unwrap());

const MAX_CONCURRENT: usize = 10;
const FETCH_QUERY: &str = "(UID BODY.PEEK[HEADER.FIELDS (FROM SUBJECT)] BODY.PEEK[TEXT]<0.1024>)";

fn header_value(re: &Regex, headers: &str) -> Option<String> {
    re.captures(headers)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pulls sender and subject out of a raw header block. Folded
/// continuation lines are joined first.
pub(crate) fn parse_headers(raw: &[u8]) -> (Option<String>, Option<String>) {
    let text = String::from_utf8_lossy(raw).replace("\r\n ", " ").replace("\r\n\t", " ");
    (
        header_value(&FROM_RE, &text),
        header_value(&SUBJECT_RE, &text),
    )
}

/// Whitespace-collapsed prefix of a message body, at most `max_chars` long.
pub(crate) fn make_snippet(raw: &[u8], max_chars: usize) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let snippet: String = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect();
    (!snippet.is_empty()).then_some(snippet)
}

/// Newest `limit` UIDs of the selected folder, newest first.
pub(crate) fn newest_uids(mut uids: Vec<u32>, limit: usize) -> Vec<u32> {
    uids.sort_unstable_by(|a, b| b.cmp(a));
    uids.truncate(limit);
    uids
}

pub async fn fetch_recent_uids(
    creds: &Credentials,
    folder: &str,
    limit: u32,
) -> Result<(Vec<u32>, usize), AppError> {
    let mut session = connect_imap(creds, folder).await?;
    let uids = session.uid_search("ALL").await?;
    logout(session, "fetching UIDs").await;

    let all: Vec<u32> = uids.into_iter().collect();
    let total = all.len();
    Ok((newest_uids(all, limit as usize), total))
}

async fn fetch_batch(
    creds: &Credentials,
    folder: &str,
    uid_batch: &[u32],
    snippet_len: usize,
) -> Result<Vec<Message>, AppError> {
    if uid_batch.is_empty() {
        return Ok(Vec::new());
    }

    let mut session = connect_imap(creds, folder).await?;
    let fetches: Vec<_> = session
        .uid_fetch(uid_set(uid_batch), FETCH_QUERY)
        .await?
        .collect()
        .await;

    let mut messages = Vec::with_capacity(fetches.len());
    for fetch_result in fetches {
        match fetch_result {
            Ok(fetch) => {
                let Some(uid) = fetch.uid else {
                    tracing::warn!("Fetch response without UID, skipping");
                    continue;
                };
                let (sender, subject) = fetch.header().map(parse_headers).unwrap_or_default();
                let snippet = fetch.text().and_then(|t| make_snippet(t, snippet_len));
                messages.push(Message {
                    uid,
                    subject,
                    sender,
                    snippet,
                });
            }
            Err(e) => {
                tracing::warn!("Fetch error in batch: {}", e);
            }
        }
    }

    logout(session, "fetch batch").await;
    Ok(messages)
}

/// Fetches the given UIDs in parallel batches and returns them newest first.
/// A failing batch is logged and skipped.
pub async fn fetch_messages<F>(
    creds: &Credentials,
    folder: &str,
    uids: Vec<u32>,
    snippet_len: usize,
    progress_cb: F,
) -> Vec<Message>
where
    F: Fn(f32, String) + Send + Sync + 'static,
{
    let total = uids.len();
    if total == 0 {
        return Vec::new();
    }

    let chunk_size = total.div_ceil(MAX_CONCURRENT).max(1);
    let chunks: Vec<Vec<u32>> = uids.chunks(chunk_size).map(<[u32]>::to_vec).collect();
    let num_chunks = chunks.len();

    let collected: Arc<Mutex<Vec<Message>>> = Arc::new(Mutex::new(Vec::with_capacity(total)));
    let completed = Arc::new(AtomicUsize::new(0));
    let progress_cb = Arc::new(progress_cb);
    let creds = Arc::new(creds.clone());
    let folder: Arc<str> = Arc::from(folder);

    let mut handles = Vec::new();
    for chunk in chunks {
        let creds = creds.clone();
        let folder = folder.clone();
        let collected = collected.clone();
        let completed = completed.clone();
        let cb = progress_cb.clone();

        handles.push(tokio::spawn(async move {
            match fetch_batch(&creds, &folder, &chunk, snippet_len).await {
                Ok(batch) => collected.lock().await.extend(batch),
                Err(e) => tracing::error!("Batch fetch error: {}", e),
            }

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            let progress = 0.05 + 0.85 * (done as f32 / num_chunks as f32);
            cb(progress, format!("Fetched batch {done}/{num_chunks}"));
        }));
    }

    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!("Fetch task panicked: {}", e);
        }
    }

    let mut messages = std::mem::take(&mut *collected.lock().await);
    messages.sort_unstable_by(|a, b| b.uid.cmp(&a.uid));
    messages
}
