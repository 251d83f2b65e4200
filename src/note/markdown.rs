//! Markdown rendering of a note.
//!
//! The body is assembled from the note text and its attachments, media links
//! are lifted into references pointing at `./attachments/`, and a YAML front
//! matter block with the note's metadata is prepended. No network access
//! happens here.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::fs::naming::sanitize_path_component;
use crate::media::{LinkedText, MediaReference, MediaType};
use crate::note::types::NoteRecord;

/// Longest title taken from the first line of the body, in characters.
const MAX_LINE_TITLE_CHARS: usize = 50;

/// Title used when a note has nothing better.
const FALLBACK_TITLE: &str = "note";

/// Front-matter keys never copied from the note content.
const OMITTED_KEYS: [&str; 2] = ["content", "attachments"];

/// A note ready to be written as Markdown.
#[derive(Debug, Clone)]
pub struct TransformedNote {
    /// Sanitized human-readable title.
    pub title: String,
    front_matter: String,
    body: LinkedText,
}

impl TransformedNote {
    /// Markdown with every link pointing at its provisional file name.
    pub fn markdown(&self) -> String {
        format!("{}{}", self.front_matter, self.body.render())
    }

    /// Markdown with link `i` pointing at `file_names[i]`.
    pub fn markdown_with(&self, file_names: &[String]) -> String {
        let body = self.body.render_with(|index| {
            file_names
                .get(index)
                .map(String::as_str)
                .unwrap_or(self.body.references()[index].file_name.as_str())
        });
        format!("{}{}", self.front_matter, body)
    }

    /// Media links to fetch, in emission order.
    pub fn media_links(&self) -> Vec<String> {
        self.body.urls()
    }

    pub fn references(&self) -> &[MediaReference] {
        self.body.references()
    }

    /// Name of the Markdown file inside the note folder.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.title)
    }
}

/// Transform a note into Markdown and its media worklist.
pub fn transform_note(note: &NoteRecord) -> Result<TransformedNote> {
    let body = compose_body(note);
    let title = derive_title(note, &body);
    let front_matter = front_matter(note)?;

    Ok(TransformedNote {
        title,
        front_matter,
        body: LinkedText::extract(&body),
    })
}

/// Note text with a title heading and one embed per attachment.
pub fn compose_body(note: &NoteRecord) -> String {
    let content = note.content();
    let mut body = content
        .and_then(|c| c.content.clone())
        .unwrap_or_default();

    if let Some(title) = content.and_then(|c| c.title.as_deref()).filter(|t| !t.is_empty()) {
        body = format!("# {}\n\n{}", title, body);
    }

    for attachment in content
        .and_then(|c| c.attachments.as_deref())
        .unwrap_or_default()
    {
        let Some(locator) = attachment.locator() else {
            tracing::debug!("Skipping attachment without locator in note {}", note.file_stem());
            continue;
        };

        let media_type = MediaType::from_mime(attachment.mime_type.as_deref().unwrap_or(""));
        body.push_str("\n\n");
        body.push_str(&media_type.embed(locator, attachment.alt.as_deref().unwrap_or("")));
    }

    body
}

/// Title for file and folder names: title, slug, first body line, `"note"`.
pub fn derive_title(note: &NoteRecord, body: &str) -> String {
    let content = note.content();
    let explicit = content
        .and_then(|c| c.title.as_deref())
        .filter(|t| !t.is_empty())
        .or_else(|| content.and_then(|c| c.slug.as_deref()).filter(|s| !s.is_empty()))
        .map(str::to_string);

    let title = explicit
        .or_else(|| first_line_title(body))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    sanitize_path_component(&title)
}

fn first_line_title(body: &str) -> Option<String> {
    body.lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(MAX_LINE_TITLE_CHARS).collect())
}

/// `---`-delimited YAML block of the note identity and its content fields,
/// minus the body and attachments.
pub fn front_matter(note: &NoteRecord) -> Result<String> {
    let mut fields = Map::new();
    fields.insert("characterId".to_string(), Value::from(note.character_id));
    fields.insert("noteId".to_string(), Value::from(note.note_id));
    fields.insert("createdAt".to_string(), Value::from(note.created_at.clone()));

    for (key, value) in note.raw_content().into_iter().flatten() {
        if !OMITTED_KEYS.contains(&key.as_str()) {
            fields.insert(key.clone(), value.clone());
        }
    }

    let yaml = serde_yaml::to_string(&fields)?;
    Ok(format!("---\n{}---\n\n", yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::note::types::{Attachment, NoteContent};

    fn note_with(content: NoteContent) -> NoteRecord {
        NoteRecord::new(
            10,
            3,
            "2023-05-01T12:00:00.000Z",
            Some(json!({ "content": content })),
        )
    }

    #[test]
    fn test_compose_body_with_title_and_attachments() {
        let note = note_with(NoteContent {
            title: Some("Trip".into()),
            content: Some("Day one.".into()),
            attachments: Some(vec![
                Attachment {
                    address: Some("ipfs://cover".into()),
                    alt: Some("cover".into()),
                    mime_type: Some("image/png".into()),
                    ..Default::default()
                },
                Attachment {
                    content: Some("https://v/clip.mp4".into()),
                    mime_type: Some("video/mp4".into()),
                    ..Default::default()
                },
                Attachment {
                    address: Some("https://d/notes.pdf".into()),
                    ..Default::default()
                },
                Attachment::default(),
            ]),
            ..Default::default()
        });

        assert_eq!(
            compose_body(&note),
            "# Trip\n\nDay one.\n\n![cover](ipfs://cover)\n\n\
             <video src=\"https://v/clip.mp4\" controls></video>\n\n[](https://d/notes.pdf)"
        );
    }

    #[test]
    fn test_title_fallbacks() {
        let titled = note_with(NoteContent {
            title: Some("a/b: c?".into()),
            ..Default::default()
        });
        assert_eq!(derive_title(&titled, ""), "a_b_ c_");

        let slugged = note_with(NoteContent {
            slug: Some("my-slug".into()),
            content: Some("body".into()),
            ..Default::default()
        });
        assert_eq!(derive_title(&slugged, "body"), "my-slug");

        let body_only = note_with(NoteContent::default());
        assert_eq!(derive_title(&body_only, "\n\n## Heading here  \nrest"), "Heading here");

        let long = "x".repeat(80);
        assert_eq!(derive_title(&body_only, &long).chars().count(), 50);

        assert_eq!(derive_title(&body_only, "  \n#\n"), "note");
    }

    #[test]
    fn test_front_matter_omits_body_and_attachments() {
        let note = note_with(NoteContent {
            title: Some("Hello".into()),
            content: Some("secret body".into()),
            tags: Some(vec!["post".into()]),
            attachments: Some(vec![Attachment::default()]),
            ..Default::default()
        });

        let fm = front_matter(&note).unwrap();
        assert!(fm.starts_with("---\ncharacterId: 10\nnoteId: 3\n"));
        assert!(fm.ends_with("---\n\n"));
        assert!(fm.contains("title: Hello"));
        assert!(fm.contains("- post"));
        assert!(!fm.contains("secret body"));
        assert!(!fm.contains("attachments"));
    }

    #[test]
    fn test_front_matter_keeps_stored_values() {
        let note = NoteRecord::new(
            10,
            4,
            "2023-05-01",
            Some(json!({
                "content": {
                    "date_published": 1700000000,
                    "tags": "solo",
                    "title": "Loose",
                    "content": "text"
                }
            })),
        );

        let fm = front_matter(&note).unwrap();
        assert!(fm.contains("date_published: 1700000000\ntags: solo\ntitle: Loose\n"));
        assert!(!fm.contains("text"));
        assert_eq!(derive_title(&note, "text"), "Loose");
    }

    #[test]
    fn test_front_matter_without_metadata() {
        let note = NoteRecord::new(1, 2, "now", None);
        assert_eq!(
            front_matter(&note).unwrap(),
            "---\ncharacterId: 1\nnoteId: 2\ncreatedAt: now\n---\n\n"
        );
    }

    #[test]
    fn test_transform_note_rewrites_links() {
        let note = note_with(NoteContent {
            content: Some(r#"![alt](https://host/path/img.png "the title")"#.into()),
            ..Default::default()
        });

        let transformed = transform_note(&note).unwrap();
        let markdown = transformed.markdown();

        assert!(markdown.contains("./attachments/the_title"));
        assert!(!markdown.contains("https://host/path/img.png"));
        assert_eq!(transformed.media_links(), vec!["https://host/path/img.png".to_string()]);
        assert_eq!(transformed.title, "![alt](https___host_path_img.png _the title_)");
    }

    #[test]
    fn test_markdown_with_corrected_names() {
        let note = note_with(NoteContent {
            title: Some("Pics".into()),
            content: Some("![](ipfs://bafyone)".into()),
            ..Default::default()
        });

        let transformed = transform_note(&note).unwrap();
        let markdown = transformed.markdown_with(&["bafyone.png".to_string()]);

        assert!(markdown.ends_with("# Pics\n\n![](./attachments/bafyone.png)"));
        assert_eq!(transformed.file_name(), "Pics.md");
    }
}
