/// One fetched mail message, reduced to the fields the categorizer reads.
///
/// Text fields are `None` when the server returned no such header or body.
/// They are never errors: an absent field simply contributes nothing to a
/// cluster score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub uid: u32,
    pub subject: Option<String>,
    pub sender: Option<String>,
    pub snippet: Option<String>,
}

impl Message {
    pub fn new(
        uid: u32,
        subject: impl Into<String>,
        sender: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            uid,
            subject: Some(subject.into()),
            sender: Some(sender.into()),
            snippet: Some(snippet.into()),
        }
    }

    pub fn subject_or_default(&self) -> &str {
        self.subject.as_deref().unwrap_or("No Subject")
    }

    pub fn sender_or_default(&self) -> &str {
        self.sender.as_deref().unwrap_or("Unknown Sender")
    }
}
