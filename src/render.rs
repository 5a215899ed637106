//! Listing presentation. Pure transforms of a catalog snapshot; no I/O.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::FileEntry;
use crate::mime;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Body of `GET /api/files`.
#[derive(Debug, Serialize)]
pub struct FileListing<'a> {
    pub files: &'a [FileEntry],
}

impl<'a> FileListing<'a> {
    pub fn new(files: &'a [FileEntry]) -> Self {
        Self { files }
    }
}

/// Aggregates shown in the summary panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingStats {
    pub file_count: usize,
    pub total_bytes: u64,
    pub category_count: usize,
}

impl ListingStats {
    pub fn from_entries(entries: &[FileEntry]) -> Self {
        let categories: BTreeSet<&str> = entries
            .iter()
            .map(|e| mime::category(&e.mime_type))
            .collect();

        Self {
            file_count: entries.len(),
            total_bytes: entries.iter().map(|e| e.size_bytes).sum(),
            category_count: categories.len(),
        }
    }
}

/// Card icon, picked from the MIME type with an extension fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Markup,
    Stylesheet,
    Script,
    Text,
    Image,
    Document,
}

impl FileIcon {
    pub fn for_entry(entry: &FileEntry) -> Self {
        let ext = std::path::Path::new(&entry.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let mime = entry.mime_type.as_str();

        if mime == "text/html" || matches!(ext.as_str(), "html" | "htm" | "xhtml") {
            FileIcon::Markup
        } else if mime == "text/css" || ext == "css" {
            FileIcon::Stylesheet
        } else if mime.contains("javascript") || matches!(ext.as_str(), "js" | "mjs" | "ts") {
            FileIcon::Script
        } else if mime.starts_with("text/") {
            FileIcon::Text
        } else if mime.starts_with("image/") {
            FileIcon::Image
        } else {
            FileIcon::Document
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            FileIcon::Markup => "🌐",
            FileIcon::Stylesheet => "🎨",
            FileIcon::Script => "⚙️",
            FileIcon::Text => "📝",
            FileIcon::Image => "🖼️",
            FileIcon::Document => "📄",
        }
    }
}

/// Human-readable size: bytes below 1 KiB, one-decimal KB below 1 MiB, MB above.
pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Escape HTML entities
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub const EMPTY_MESSAGE: &str = "No files to show yet.";

/// HTML listing page built from a catalog snapshot.
#[derive(Debug)]
pub struct ListingPage<'a> {
    title: String,
    entries: &'a [FileEntry],
}

impl<'a> ListingPage<'a> {
    pub fn new(entries: &'a [FileEntry]) -> Self {
        Self {
            title: "Files".to_string(),
            entries,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(4096 + self.entries.len() * 512);

        html.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main class=\"container\">\n\
             <h1>{}</h1>\n",
            html_escape(&self.title),
            STYLE,
            html_escape(&self.title),
        ));

        self.write_stats(&mut html);

        if self.entries.is_empty() {
            html.push_str(&format!("<p class=\"empty\">{}</p>\n", EMPTY_MESSAGE));
        } else {
            html.push_str("<section class=\"grid\">\n");
            for entry in self.entries {
                Self::write_card(&mut html, entry);
            }
            html.push_str("</section>\n");
        }

        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn write_stats(&self, html: &mut String) {
        let stats = ListingStats::from_entries(self.entries);
        html.push_str(&format!(
            "<section class=\"stats\">\n\
             <div class=\"stat\"><span class=\"value\">{}</span><span class=\"label\">Files</span></div>\n\
             <div class=\"stat\"><span class=\"value\">{}</span><span class=\"label\">Total size</span></div>\n\
             <div class=\"stat\"><span class=\"value\">{}</span><span class=\"label\">Types</span></div>\n\
             </section>\n",
            stats.file_count,
            format_size(stats.total_bytes),
            stats.category_count,
        ));
    }

    fn write_card(html: &mut String, entry: &FileEntry) {
        let name = html_escape(&entry.name);
        html.push_str(&format!(
            "<article class=\"card\">\n\
             <div class=\"icon\">{}</div>\n\
             <div class=\"name\" title=\"{}\">{}</div>\n\
             <div class=\"meta\">{} &middot; {}</div>\n\
             <a class=\"download\" href=\"{}\" download=\"{}\">Download</a>\n\
             </article>\n",
            FileIcon::for_entry(entry).glyph(),
            name,
            name,
            html_escape(&entry.mime_type),
            format_size(entry.size_bytes),
            html_escape(&entry.public_path),
            name,
        ));
    }
}

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.5;
    background: #f4f5f7;
    color: #1f2933;
}
.container { max-width: 1100px; margin: 0 auto; padding: 32px 20px; }
h1 { font-size: 2em; margin-bottom: 24px; }
.stats { display: flex; gap: 16px; margin-bottom: 28px; flex-wrap: wrap; }
.stat {
    flex: 1 1 160px;
    background: #fff;
    border-radius: 12px;
    padding: 16px 20px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.08);
}
.stat .value { display: block; font-size: 1.6em; font-weight: 700; }
.stat .label { color: #6b7280; font-size: 0.9em; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; }
.card {
    background: #fff;
    border-radius: 12px;
    padding: 18px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.08);
    display: flex;
    flex-direction: column;
    gap: 6px;
}
.card .icon { font-size: 2em; }
.card .name { font-weight: 600; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
.card .meta { color: #6b7280; font-size: 0.85em; }
.download {
    margin-top: 8px;
    align-self: flex-start;
    background: #2563eb;
    color: #fff;
    padding: 6px 14px;
    border-radius: 8px;
    text-decoration: none;
    font-size: 0.9em;
}
.download:hover { background: #1d4ed8; }
.empty { text-align: center; color: #6b7280; padding: 48px 0; font-size: 1.1em; }
"#;
