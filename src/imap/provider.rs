#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapProvider {
    pub host: &'static str,
    pub port: u16,
    /// Where archived mail goes. Moving out of INBOX into this folder is the
    /// IMAP equivalent of dropping the inbox label.
    pub archive_folder: &'static str,
}

impl ImapProvider {
    pub fn from_email(email: &str) -> Self {
        let domain = email.rsplit('@').next().unwrap_or("").to_lowercase();

        if domain.contains("outlook") || domain.contains("hotmail") || domain.contains("live.com")
        {
            Self {
                host: "imap-mail.outlook.com",
                port: 993,
                archive_folder: "Archive",
            }
        } else if domain.contains("yahoo") {
            Self {
                host: "imap.mail.yahoo.com",
                port: 993,
                archive_folder: "Archive",
            }
        } else if domain.contains("icloud") || domain.contains("me.com") || domain.contains("mac.com") {
            Self {
                host: "imap.mail.me.com",
                port: 993,
                archive_folder: "Archive",
            }
        } else {
            // Gmail keeps every message in All Mail; leaving INBOX is archiving.
            Self {
                host: "imap.gmail.com",
                port: 993,
                archive_folder: "[Gmail]/All Mail",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_providers() {
        assert_eq!(ImapProvider::from_email("a@hotmail.com").host, "imap-mail.outlook.com");
        assert_eq!(ImapProvider::from_email("a@yahoo.co.uk").host, "imap.mail.yahoo.com");
        assert_eq!(ImapProvider::from_email("a@icloud.com").host, "imap.mail.me.com");
    }

    #[test]
    fn unknown_domain_defaults_to_gmail() {
        let provider = ImapProvider::from_email("someone@example.org");
        assert_eq!(provider.host, "imap.gmail.com");
        assert_eq!(provider.archive_folder, "[Gmail]/All Mail");
    }
}
