use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::path::Path;

fn mime_for_filename(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

/// Embeds raw upload bytes into a `data:<mime>;base64,...` URI so the
/// provider receives the image inline instead of via a separate upload.
/// Unknown or missing extensions fall back to image/jpeg.
pub fn file_bytes_to_data_uri(file_bytes: &[u8], filename: Option<&str>) -> String {
    let mime = filename
        .and_then(mime_for_filename)
        .unwrap_or("image/jpeg");
    format!("data:{mime};base64,{}", BASE64.encode(file_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[test]
    fn test_data_uri_round_trips_bytes() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        let uri = file_bytes_to_data_uri(&bytes, Some("photo.jpg"));
        let prefix = "data:image/jpeg;base64,";
        assert!(uri.starts_with(prefix));
        let decoded = BASE64.decode(&uri[prefix.len()..]).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_png_extension_maps_to_png_mime() {
        let uri = file_bytes_to_data_uri(b"fake", Some("x.png"));
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_uppercase_extension_is_recognized() {
        let uri = file_bytes_to_data_uri(b"fake", Some("SCAN.JPEG"));
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_missing_filename_defaults_to_jpeg() {
        let uri = file_bytes_to_data_uri(b"fake", None);
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_unknown_extension_defaults_to_jpeg() {
        let uri = file_bytes_to_data_uri(b"fake", Some("upload.bin"));
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_empty_bytes() {
        assert_eq!(
            file_bytes_to_data_uri(b"", Some("x.png")),
            "data:image/png;base64,"
        );
    }
}
