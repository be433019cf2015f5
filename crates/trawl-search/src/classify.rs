//! Attachment classification.
//!
//! The declared content type wins; the filename extension is only consulted
//! when the content type says nothing about images or videos.

use trawl_shared::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use trawl_shared::{Attachment, AttachmentKind};

/// Classify an attachment as image, video or plain file.
pub fn classify(attachment: &Attachment) -> AttachmentKind {
    let content_type = attachment.content_type.as_deref().unwrap_or("");
    if content_type.starts_with("image/") {
        return AttachmentKind::Image;
    }
    if content_type.starts_with("video/") {
        return AttachmentKind::Video;
    }

    match attachment.extension() {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => AttachmentKind::Image,
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => AttachmentKind::Video,
        _ => AttachmentKind::File,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(filename: &str, content_type: Option<&str>) -> Attachment {
        Attachment {
            id: "a1".into(),
            filename: filename.into(),
            size: Some(10),
            url: None,
            proxy_url: None,
            content_type: content_type.map(str::to_string),
            width: None,
            height: None,
        }
    }

    #[test]
    fn test_content_type_takes_precedence() {
        assert_eq!(
            classify(&attachment("report.pdf", Some("image/png"))),
            AttachmentKind::Image
        );
        assert_eq!(
            classify(&attachment("cat.png", Some("video/mp4"))),
            AttachmentKind::Video
        );
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(classify(&attachment("cat.JPEG", None)), AttachmentKind::Image);
        assert_eq!(classify(&attachment("clip.webm", None)), AttachmentKind::Video);
        assert_eq!(
            classify(&attachment("clip.mov", Some("application/octet-stream"))),
            AttachmentKind::Video
        );
    }

    #[test]
    fn test_default_is_file() {
        assert_eq!(
            classify(&attachment("report.pdf", Some("application/pdf"))),
            AttachmentKind::File
        );
        assert_eq!(classify(&attachment("notes", None)), AttachmentKind::File);
        // "image" without the slash is not an image content type
        assert_eq!(classify(&attachment("x.bin", Some("imagery"))), AttachmentKind::File);
    }
}
