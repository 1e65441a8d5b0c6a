//! Notice data structures.

use serde::{Deserialize, Serialize};

/// A notice scraped from a detail page.
///
/// Two notices are the same record only if every field matches, attachment
/// included. An edited body therefore shows up as a new notice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Notice {
    /// Notice title, verbatim
    pub title: String,

    /// Publication time as printed on the page, surrounding whitespace removed
    pub time: String,

    /// Body text, verbatim
    pub text: String,

    /// Attachment URL and its content digest, absent when the notice has none
    #[serde(flatten)]
    pub attachment: Option<Attachment>,
}

/// An attachment linked from a notice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Attachment {
    /// Resolved attachment URL
    #[serde(rename = "attachment")]
    pub url: String,

    /// Hex-encoded SHA-256 of the attachment bytes
    #[serde(rename = "attachment_digest")]
    pub digest: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, time: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time: time.into(),
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, url: impl Into<String>, digest: impl Into<String>) -> Self {
        self.attachment = Some(Attachment {
            url: url.into(),
            digest: digest.into(),
        });
        self
    }

    pub fn attachment_url(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.url.as_str())
    }

    pub fn attachment_digest(&self) -> Option<&str> {
        self.attachment.as_ref().map(|a| a.digest.as_str())
    }
}

/// A row of a listing page pointing at one notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeRow {
    /// Absolute URL of the notice detail page
    pub detail_url: String,

    /// Whether the listing marks this notice as carrying an attachment
    pub has_attachment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_notice_has_no_attachment_keys() {
        let notice = Notice::new("Holiday", "1 Jan 2024", "Campus closed");
        let json = serde_json::to_value(&notice).unwrap();

        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        assert!(json.get("attachment").is_none());
        assert!(json.get("attachment_digest").is_none());
    }

    #[test]
    fn test_attachment_fields_are_flattened() {
        let notice = Notice::new("Fees", "2 Jan 2024", "See file")
            .with_attachment("http://example.com/acad_ug/fees.pdf", "abc123");
        let json = serde_json::to_value(&notice).unwrap();

        assert_eq!(json["attachment"], "http://example.com/acad_ug/fees.pdf");
        assert_eq!(json["attachment_digest"], "abc123");

        let back: Notice = serde_json::from_value(json).unwrap();
        assert_eq!(back, notice);
    }

    #[test]
    fn test_missing_attachment_deserializes_to_none() {
        let json = r#"{"title":"A","time":"t","text":"body"}"#;
        let notice: Notice = serde_json::from_str(json).unwrap();
        assert!(notice.attachment.is_none());
        assert_eq!(notice.attachment_url(), None);
        assert_eq!(notice.attachment_digest(), None);
    }

    #[test]
    fn test_equality_covers_every_field() {
        let a = Notice::new("Title", "time", "text");
        let edited = Notice::new("Title", "time", "text (revised)");
        let with_file = a.clone().with_attachment("http://x/f.pdf", "00");

        assert_ne!(a, edited);
        assert_ne!(a, with_file);
        assert_eq!(a, a.clone());
    }
}
