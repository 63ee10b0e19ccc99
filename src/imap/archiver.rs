use crate::error::AppError;

use super::{connect_imap, logout, uid_set, Credentials};

const CHUNK_SIZE: usize = 1000;

/// Moves `uids` from `folder` into the provider's archive folder and returns
/// how many were moved. Chunks go in order, so when a later chunk fails the
/// error is [`AppError::PartialArchive`] and the first `moved` UIDs are gone
/// from `folder`.
pub async fn archive_messages(
    creds: &Credentials,
    folder: &str,
    uids: &[u32],
) -> Result<usize, AppError> {
    if uids.is_empty() {
        return Ok(0);
    }

    let provider = creds.provider();
    if folder.eq_ignore_ascii_case(provider.archive_folder) {
        return Err(AppError::Imap(format!(
            "{folder} is already the archive folder"
        )));
    }

    let mut session = connect_imap(creds, folder).await?;
    let mut moved = 0;
    for chunk in uids.chunks(CHUNK_SIZE) {
        let result = session.uid_mv(uid_set(chunk), provider.archive_folder).await;
        if let Err(e) = result {
            tracing::warn!(moved, total = uids.len(), "Archive interrupted: {}", e);
            logout(session, "failed archive").await;
            return Err(interrupted(moved, e.into()));
        }
        moved += chunk.len();
        tracing::debug!(count = chunk.len(), to = provider.archive_folder, "Moved chunk");
    }

    logout(session, "archiving").await;
    Ok(moved)
}

fn interrupted(moved: usize, err: AppError) -> AppError {
    if moved == 0 {
        err
    } else {
        AppError::PartialArchive {
            moved,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_before_any_move_keeps_original_error() {
        let err = interrupted(0, AppError::Imap("NO [TRYCREATE]".to_string()));
        assert!(matches!(err, AppError::Imap(_)));
    }

    #[test]
    fn failure_after_moves_reports_count() {
        let err = interrupted(2000, AppError::Connection("reset".to_string()));
        match err {
            AppError::PartialArchive { moved, reason } => {
                assert_eq!(moved, 2000);
                assert!(reason.contains("reset"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_uid_list_does_not_connect() {
        let creds = Credentials {
            email: "me@gmail.com".to_string(),
            password: String::new(),
        };
        assert_eq!(archive_messages(&creds, "INBOX", &[]).await.unwrap(), 0);
    }
}
