//! Attachment downloading for one note.

use std::collections::HashSet;

use futures::stream::{self, StreamExt};

use crate::client::MediaSource;
use crate::fs::naming::unique_name;
use crate::media::corrected_file_name;
use crate::note::TransformedNote;

/// A downloaded attachment ready to be stored under `attachments/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAttachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Result of fetching a note's media.
#[derive(Debug, Clone, Default)]
pub struct AttachmentOutcome {
    /// Markdown with links patched to the names the files were saved under.
    pub markdown: String,
    pub saved: Vec<SavedAttachment>,
    /// Links that could not be retrieved, in emission order.
    pub failed: Vec<String>,
}

/// Fetch every media link of `note` through `source`.
///
/// At most `concurrency` requests run at once. A failing link never aborts
/// the batch: it is recorded in `failed` and its Markdown link keeps the
/// provisional path. With `skip` set nothing is fetched and every link fails.
pub async fn fetch_attachments(
    source: &dyn MediaSource,
    note: &TransformedNote,
    skip: bool,
    concurrency: usize,
) -> AttachmentOutcome {
    let references = note.references();

    if skip {
        return AttachmentOutcome {
            markdown: note.markdown(),
            saved: Vec::new(),
            failed: note.media_links(),
        };
    }

    let results: Vec<_> = stream::iter(references.iter().map(|r| source.fetch(&r.url)))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let provisional: HashSet<&str> = references.iter().map(|r| r.file_name.as_str()).collect();
    let mut names: Vec<String> = Vec::with_capacity(references.len());
    let mut saved_names: HashSet<String> = HashSet::new();
    let mut outcome = AttachmentOutcome::default();

    for (reference, result) in references.iter().zip(results) {
        match result {
            Ok(media) => {
                let candidate =
                    corrected_file_name(&reference.file_name, media.content_type.as_deref());
                let file_name = unique_name(&candidate, |name| {
                    saved_names.contains(name)
                        || (name != reference.file_name && provisional.contains(name))
                });

                tracing::debug!(
                    "Fetched {:?} link {} ({} bytes) as {}",
                    reference.syntax,
                    reference.url,
                    media.bytes.len(),
                    file_name
                );

                saved_names.insert(file_name.clone());
                outcome.saved.push(SavedAttachment {
                    file_name: file_name.clone(),
                    bytes: media.bytes,
                });
                names.push(file_name);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch attachment {}: {}", reference.url, e);
                outcome.failed.push(reference.url.clone());
                names.push(reference.file_name.clone());
            }
        }
    }

    outcome.markdown = note.markdown_with(&names);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::client::FetchedMedia;
    use crate::error::{Error, Result};
    use crate::note::{transform_note, NoteRecord};

    /// Serves canned responses and counts requests.
    struct FakeSource {
        responses: HashMap<String, Option<&'static str>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(responses: &[(&str, Option<&'static str>)]) -> Self {
            Self {
                responses: responses
                    .iter()
                    .map(|(url, ct)| (url.to_string(), *ct))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MediaSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<FetchedMedia> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(url) {
                Some(content_type) => Ok(FetchedMedia {
                    bytes: url.as_bytes().to_vec(),
                    content_type: content_type.map(str::to_string),
                }),
                None => Err(Error::attachment(url, "HTTP 404")),
            }
        }
    }

    fn note(body: &str) -> TransformedNote {
        let metadata = serde_json::json!({ "content": { "content": body } });
        transform_note(&NoteRecord::new(1, 1, "t", Some(metadata))).unwrap()
    }

    #[tokio::test]
    async fn test_skip_marks_everything_failed_without_fetching() {
        let source = FakeSource::new(&[("https://a/x.png", Some("image/png"))]);
        let note = note("![](https://a/x.png) ![](https://b/y.png)");

        let outcome = fetch_attachments(&source, &note, true, 4).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(outcome.saved.is_empty());
        assert_eq!(outcome.failed, vec!["https://a/x.png", "https://b/y.png"]);
        assert_eq!(outcome.markdown, note.markdown());
    }

    #[tokio::test]
    async fn test_partial_failure_and_extension_correction() {
        let source = FakeSource::new(&[("ipfs://bafyimage", Some("image/webp"))]);
        let note = note("![](ipfs://bafyimage)\n<img src=\"https://gone/pic.png\">");

        let outcome = fetch_attachments(&source, &note, false, 2).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.saved.len(), 1);
        assert_eq!(outcome.saved[0].file_name, "bafyimage.webp");
        assert_eq!(outcome.saved[0].bytes, b"ipfs://bafyimage".to_vec());
        assert_eq!(outcome.failed, vec!["https://gone/pic.png"]);
        assert!(outcome.markdown.contains("![](./attachments/bafyimage.webp)"));
        assert!(outcome.markdown.contains("<img src=\"./attachments/pic.png\">"));
    }

    #[tokio::test]
    async fn test_corrected_names_do_not_collide() {
        let source = FakeSource::new(&[
            ("https://a/photo.png", Some("image/jpeg")),
            ("https://b/photo.gif", Some("image/jpeg")),
        ]);
        let note = note("![](https://a/photo.png) ![](https://b/photo.gif)");

        let outcome = fetch_attachments(&source, &note, false, 1).await;

        let names: Vec<_> = outcome.saved.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["photo.jpg", "photo_2.jpg"]);
        assert!(outcome
            .markdown
            .ends_with("![](./attachments/photo.jpg) ![](./attachments/photo_2.jpg)"));
    }

    #[tokio::test]
    async fn test_no_links_is_noop() {
        let source = FakeSource::new(&[]);
        let note = note("just text");

        let outcome = fetch_attachments(&source, &note, false, 4).await;

        assert!(outcome.saved.is_empty());
        assert!(outcome.failed.is_empty());
        assert!(outcome.markdown.ends_with("just text"));
    }
}
