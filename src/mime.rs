//! Extension to content-type lookup.
//!
//! The lookup is a plain function pointer so callers can swap in their own
//! table (tests do) without touching any filesystem code.

use std::path::Path;

/// Generic binary type used when the extension is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a file extension (without the dot) to a MIME type, if known.
pub type MimeLookup = fn(&str) -> Option<&'static str>;

/// Default lookup backed by the `mime_guess` extension table.
pub fn guess_extension(ext: &str) -> Option<&'static str> {
    mime_guess::from_ext(ext).first_raw()
}

/// MIME type for a file name, falling back to [`OCTET_STREAM`].
pub fn for_name(name: &str, lookup: MimeLookup) -> &'static str {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(lookup)
        .unwrap_or(OCTET_STREAM)
}

/// Top-level part of a MIME type, e.g. `image` for `image/png`.
pub fn category(mime: &str) -> &str {
    mime.split_once('/').map_or(mime, |(top, _)| top)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_txt(ext: &str) -> Option<&'static str> {
        (ext == "txt").then_some("text/x-custom")
    }

    #[test]
    fn test_default_lookup() {
        assert_eq!(for_name("a.txt", guess_extension), "text/plain");
        assert_eq!(for_name("b.html", guess_extension), "text/html");
        assert_eq!(for_name("style.css", guess_extension), "text/css");
        assert_eq!(for_name("photo.png", guess_extension), "image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(for_name("data.zzqqx", guess_extension), OCTET_STREAM);
        assert_eq!(for_name("Makefile", guess_extension), OCTET_STREAM);
    }

    #[test]
    fn test_injected_lookup() {
        assert_eq!(for_name("notes.txt", only_txt), "text/x-custom");
        assert_eq!(for_name("page.html", only_txt), OCTET_STREAM);
    }

    #[test]
    fn test_category() {
        assert_eq!(category("image/png"), "image");
        assert_eq!(category("application/octet-stream"), "application");
        assert_eq!(category("weird"), "weird");
    }
}
