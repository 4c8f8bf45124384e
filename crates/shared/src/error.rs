use thiserror::Error;

/// Everything that can end a search before results are rendered.
///
/// `Display` is the message body; [`SearchError::inline_message`] is what the
/// page shows in its error area.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Please fill in all required fields (Credentials, Dates).")]
    MissingFields,
    #[error("Start date cannot be after end date.")]
    DateOrder,
    #[error("AOI Mode selected, but no Area of Interest has been drawn.")]
    MissingAoi,
    #[error("{0}")]
    Transport(String),
    /// Body was not JSON on a 2xx response.
    #[error("Received an invalid response format from the server.")]
    InvalidFormat,
    /// Body was not JSON on a non-2xx response.
    #[error("Server error: {status} - {detail}")]
    ServerUnparsable { status: u16, detail: String },
    #[error("{0}")]
    Server(String),
}

impl SearchError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SearchError::MissingFields | SearchError::DateOrder | SearchError::MissingAoi
        )
    }

    /// Message for the inline error area.
    pub fn inline_message(&self) -> String {
        if self.is_validation() {
            self.to_string()
        } else {
            format!("Search failed: {}", self)
        }
    }
}
