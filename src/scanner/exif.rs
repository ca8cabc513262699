use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIFの撮影日時（DateTimeOriginal → DateTime の順）
pub fn extract_date(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader).ok()?;

    [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .into_iter()
        .find_map(|tag| exif.get_field(tag, exif::In::PRIMARY))
        .map(|field| field.display_value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date_missing_file() {
        assert_eq!(extract_date(Path::new("/nonexistent/photo.jpg")), None);
    }

    #[test]
    fn test_extract_date_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"not a jpeg").unwrap();
        assert_eq!(extract_date(&path), None);
    }
}
