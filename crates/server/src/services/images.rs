//! Product image storage.
//!
//! Uploaded images land on disk under the configured upload directory; the
//! product row stores only the relative web path, which `ServeDir` serves
//! back at `/uploads`.

use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while storing an uploaded image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The upload is not an image.
    #[error("only image files are allowed")]
    NotAnImage,

    /// Writing the file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store an uploaded product image and return its relative web path.
///
/// Only `image/*` content types are accepted. The stored filename is random;
/// the original name contributes nothing but its extension.
///
/// # Errors
///
/// Returns `ImageError::NotAnImage` for any non-image content type.
/// Returns `ImageError::Io` if the file cannot be written.
pub async fn save_product_image(
    upload_dir: &Path,
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<String, ImageError> {
    let is_image = content_type.is_some_and(|ct| ct.starts_with("image/"));
    if !is_image {
        return Err(ImageError::NotAnImage);
    }

    let ext = file_extension(file_name);
    let stored_name = format!("{}{ext}", Uuid::new_v4());

    let dir = upload_dir.join("products");
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&stored_name), data).await?;

    Ok(format!("/uploads/products/{stored_name}"))
}

/// Extension (with leading dot) of the original filename, or empty.
fn file_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map_or_else(String::new, |ext| format!(".{ext}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Some("photo.png")), ".png");
        assert_eq!(file_extension(Some("archive.tar.gz")), ".gz");
        assert_eq!(file_extension(Some("no-extension")), "");
        assert_eq!(file_extension(None), "");
    }

    #[tokio::test]
    async fn test_rejects_non_image_content_type() {
        let result = save_product_image(
            Path::new("uploads"),
            Some("evil.exe"),
            Some("application/octet-stream"),
            b"MZ",
        )
        .await;

        assert!(matches!(result, Err(ImageError::NotAnImage)));
    }

    #[tokio::test]
    async fn test_rejects_missing_content_type() {
        let result = save_product_image(Path::new("uploads"), Some("photo.png"), None, b"").await;

        assert!(matches!(result, Err(ImageError::NotAnImage)));
    }

    #[tokio::test]
    async fn test_saves_image_and_returns_web_path() {
        let dir = std::env::temp_dir().join(format!("cartwheel-test-{}", Uuid::new_v4()));

        let path = save_product_image(&dir, Some("photo.png"), Some("image/png"), b"\x89PNG")
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/products/"));
        assert!(path.ends_with(".png"));

        let stored = dir
            .join("products")
            .join(path.rsplit('/').next().unwrap());
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"\x89PNG");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
