pub mod archiver;
pub mod fetcher;
pub mod provider;

use crate::error::AppError;
use provider::ImapProvider;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

pub type ImapSession =
    async_imap::Session<async_native_tls::TlsStream<async_std::net::TcpStream>>;

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn provider(&self) -> ImapProvider {
        ImapProvider::from_email(&self.email)
    }
}

/// Opens a TLS session, logs in and selects `folder`.
pub async fn connect_imap(creds: &Credentials, folder: &str) -> Result<ImapSession, AppError> {
    let provider = creds.provider();
    let tls = async_native_tls::TlsConnector::new();
    let tcp = async_std::future::timeout(
        CONNECT_TIMEOUT,
        async_std::net::TcpStream::connect((provider.host, provider.port)),
    )
    .await
    .map_err(|_| AppError::Connection("TCP connect timed out after 30s".to_string()))?
    .map_err(|e| AppError::Connection(e.to_string()))?;

    let tls_stream = tls.connect(provider.host, tcp).await?;

    let client = async_imap::Client::new(tls_stream);
    let mut session = client
        .login(&creds.email, &creds.password)
        .await
        .map_err(|(e, _)| AppError::Auth(e.to_string()))?;

    session.select(folder).await?;
    tracing::debug!(host = provider.host, folder, "IMAP session ready");

    Ok(session)
}

pub(crate) async fn logout(mut session: ImapSession, context: &str) {
    if let Err(e) = session.logout().await {
        tracing::warn!("Failed to logout after {}: {}", context, e);
    }
}

/// Renders UIDs as an IMAP sequence set, e.g. `4,7,9`.
pub(crate) fn uid_set(uids: &[u32]) -> String {
    uids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_set_joins_with_commas() {
        assert_eq!(uid_set(&[4, 7, 9]), "4,7,9");
        assert_eq!(uid_set(&[]), "");
    }

    #[test]
    fn debug_hides_password() {
        let creds = Credentials {
            email: "me@gmail.com".to_string(),
            password: "hunter2".to_string(),
        };
        let shown = format!("{creds:?}");
        assert!(shown.contains("me@gmail.com"));
        assert!(!shown.contains("hunter2"));
    }
}
