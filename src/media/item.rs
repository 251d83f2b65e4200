//! Media link representation.

/// Type of media content, by MIME family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Unknown,
}

impl MediaType {
    /// Classify a MIME type such as `image/png`.
    pub fn from_mime(mimetype: &str) -> Self {
        let mimetype = mimetype.trim().to_ascii_lowercase();
        if mimetype.starts_with("image/") {
            MediaType::Image
        } else if mimetype.starts_with("video/") {
            MediaType::Video
        } else if mimetype.starts_with("audio/") {
            MediaType::Audio
        } else {
            MediaType::Unknown
        }
    }

    /// Markdown snippet embedding `locator` for this media type.
    pub fn embed(&self, locator: &str, alt: &str) -> String {
        match self {
            MediaType::Image => format!("![{}]({})", alt, locator),
            MediaType::Video => format!("<video src=\"{}\" controls></video>", locator),
            MediaType::Audio => format!("<audio src=\"{}\" controls></audio>", locator),
            MediaType::Unknown => format!("[{}]({})", alt, locator),
        }
    }
}

/// Markup through which a media link was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSyntax {
    /// `![alt](url "title")`
    MarkdownImage,
    /// `<img src="url">`
    HtmlImage,
    /// `<video src="url"></video>`
    HtmlVideo,
    /// `<audio src="url"></audio>`
    HtmlAudio,
}

/// One media link found in a note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    /// The link as written in the note.
    pub url: String,

    /// File name under `attachments/`, unique within the note.
    pub file_name: String,

    pub syntax: LinkSyntax,
}
