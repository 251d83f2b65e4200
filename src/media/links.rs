//! Media link extraction and rewriting.
//!
//! A note body is split into literal text and link slots. Each slot refers to
//! a [`MediaReference`] by index, so the body can be rendered with the
//! provisional file names and rendered again once downloads have settled on
//! their final names, without searching the text for previously written paths.

use std::sync::LazyLock;

use regex::Regex;

use crate::fs::naming::unique_name;
use crate::media::item::{LinkSyntax, MediaReference};
use crate::media::parser::derive_file_name;

/// Folder holding a note's downloaded media, relative to its Markdown file.
pub const ATTACHMENTS_DIR: &str = "attachments";

// $1 alt, $2 url, $4 title without quotes
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[(.*?)\]\((\S*?)\s*("(.*?)")?\)"#).expect("markdown image pattern is valid")
});
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img .*?src="(.*?)"(.*?)>"#).expect("img pattern is valid")
});
static HTML_VIDEO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<video .*?src="(.*?)"(.*?)></video>"#).expect("video pattern is valid")
});
static HTML_AUDIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<audio .*?src="(.*?)"(.*?)></audio>"#).expect("audio pattern is valid")
});

impl LinkSyntax {
    fn pattern(&self) -> &'static Regex {
        match self {
            LinkSyntax::MarkdownImage => &MARKDOWN_IMAGE,
            LinkSyntax::HtmlImage => &HTML_IMAGE,
            LinkSyntax::HtmlVideo => &HTML_VIDEO,
            LinkSyntax::HtmlAudio => &HTML_AUDIO,
        }
    }

    fn url_group(&self) -> usize {
        match self {
            LinkSyntax::MarkdownImage => 2,
            _ => 1,
        }
    }

    fn title_group(&self) -> Option<usize> {
        match self {
            LinkSyntax::MarkdownImage => Some(4),
            _ => None,
        }
    }
}

/// Scan order; references are numbered in this order.
const PASSES: [LinkSyntax; 4] = [
    LinkSyntax::MarkdownImage,
    LinkSyntax::HtmlImage,
    LinkSyntax::HtmlVideo,
    LinkSyntax::HtmlAudio,
];

/// Relative path of an attachment as written into the Markdown.
pub fn attachment_path(file_name: &str) -> String {
    format!("./{}/{}", ATTACHMENTS_DIR, file_name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Link(usize),
}

/// A body whose media links have been lifted out into references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedText {
    segments: Vec<Segment>,
    references: Vec<MediaReference>,
}

impl LinkedText {
    /// Find every media link in `body`.
    pub fn extract(body: &str) -> Self {
        let mut segments = vec![Segment::Text(body.to_string())];
        let mut references = Vec::new();

        for syntax in PASSES {
            segments = rewrite_pass(segments, syntax, &mut references);
        }

        Self {
            segments,
            references,
        }
    }

    /// References in emission order.
    pub fn references(&self) -> &[MediaReference] {
        &self.references
    }

    /// Original URLs in emission order.
    pub fn urls(&self) -> Vec<String> {
        self.references.iter().map(|r| r.url.clone()).collect()
    }

    /// Render with each link pointing at its provisional file name.
    pub fn render(&self) -> String {
        self.render_with(|index| self.references[index].file_name.as_str())
    }

    /// Render with the file name chosen by `name_of(reference_index)`.
    pub fn render_with<'a>(&'a self, name_of: impl Fn(usize) -> &'a str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Link(index) => out.push_str(&attachment_path(name_of(*index))),
            }
        }
        out
    }
}

fn rewrite_pass(
    segments: Vec<Segment>,
    syntax: LinkSyntax,
    references: &mut Vec<MediaReference>,
) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let text = match segment {
            Segment::Text(text) => text,
            link => {
                out.push(link);
                continue;
            }
        };

        let mut last = 0;
        for caps in syntax.pattern().captures_iter(&text) {
            let Some(url) = caps
                .get(syntax.url_group())
                .filter(|m| !m.as_str().is_empty())
            else {
                continue;
            };
            let title = syntax
                .title_group()
                .and_then(|group| caps.get(group))
                .map(|m| m.as_str());

            let file_name = unique_name(&derive_file_name(title, url.as_str()), |name| {
                references.iter().any(|r| r.file_name == name)
            });

            push_text(&mut out, &text[last..url.start()]);
            out.push(Segment::Link(references.len()));
            references.push(MediaReference {
                url: url.as_str().to_string(),
                file_name,
                syntax,
            });
            last = url.end();
        }
        push_text(&mut out, &text[last..]);
    }

    out
}

fn push_text(out: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        out.push(Segment::Text(text.to_string()));
    }
}
