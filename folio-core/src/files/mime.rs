use std::path::Path;

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub trait MimeTypeGuesser: Send + Sync {
    fn guess(&self, filename: &str) -> String;
}

/// Guesses from the file extension only; unknown extensions fall back to
/// `application/octet-stream`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtensionMimeTypeGuesser;

impl MimeTypeGuesser for ExtensionMimeTypeGuesser {
    fn guess(&self, filename: &str) -> String {
        let extension = Path::new(filename)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        let mime = match extension.as_deref() {
            Some("txt") => "text/plain",
            Some("md") => "text/markdown",
            Some("csv") => "text/csv",
            Some("html") | Some("htm") => "text/html",
            Some("css") => "text/css",
            Some("js") => "application/javascript",
            Some("json") => "application/json",
            Some("xml") => "application/xml",
            Some("pdf") => "application/pdf",
            Some("zip") => "application/zip",
            Some("gz") => "application/gzip",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("xls") => "application/vnd.ms-excel",
            Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Some("odt") => "application/vnd.oasis.opendocument.text",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("svg") => "image/svg+xml",
            Some("webp") => "image/webp",
            Some("mp3") => "audio/mpeg",
            Some("ogg") => "audio/ogg",
            Some("mp4") => "video/mp4",
            Some("webm") => "video/webm",
            _ => DEFAULT_MIME_TYPE,
        };

        mime.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_by_extension_case_insensitively() {
        let guesser = ExtensionMimeTypeGuesser;
        assert_eq!(guesser.guess("photo.JPG"), "image/jpeg");
        assert_eq!(guesser.guess("notes.txt"), "text/plain");
        assert_eq!(guesser.guess("archive.tar.gz"), "application/gzip");
        assert_eq!(guesser.guess("README"), DEFAULT_MIME_TYPE);
    }
}
