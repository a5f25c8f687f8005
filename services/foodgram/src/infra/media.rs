//! Media storage for base64 data-URL image uploads.

use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::error::FoodgramError;

/// Filesystem store rooted at the configured media directory. Stored paths
/// are relative to the root so the serving URL prefix stays a deploy concern.
#[derive(Clone)]
pub struct MediaStore {
    pub root: String,
}

pub const AVATAR_DIR: &str = "users/avatars";
pub const RECIPE_IMAGE_DIR: &str = "recipes/images";

struct DecodedImage {
    bytes: Vec<u8>,
    extension: &'static str,
}

fn decode_data_url(field: &'static str, data_url: &str) -> Result<DecodedImage, FoodgramError> {
    let invalid = |message: &str| FoodgramError::Validation {
        field,
        message: message.to_owned(),
    };

    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| invalid("must be a base64 data URL"))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| invalid("must be base64-encoded"))?;
    let extension = match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => return Err(invalid("unsupported image type")),
    };
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| invalid("invalid base64 payload"))?;
    if bytes.is_empty() {
        return Err(invalid("empty image payload"));
    }
    Ok(DecodedImage { bytes, extension })
}

impl MediaStore {
    /// Decode `data_url` and persist it under `dir`, returning the stored
    /// path relative to the media root.
    pub async fn store_image(
        &self,
        field: &'static str,
        dir: &str,
        data_url: &str,
    ) -> Result<String, FoodgramError> {
        let image = decode_data_url(field, data_url)?;
        let relative = format!("{dir}/{}.{}", Uuid::new_v4(), image.extension);
        let absolute = format!("{}/{relative}", self.root);

        let parent = format!("{}/{dir}", self.root);
        tokio::fs::create_dir_all(&parent)
            .await
            .with_context(|| format!("create media dir {parent}"))?;
        tokio::fs::write(&absolute, &image.bytes)
            .await
            .with_context(|| format!("write media file {absolute}"))?;
        Ok(relative)
    }

    /// Best-effort removal of a stored file whose request later failed, so
    /// rejected uploads do not accumulate on disk.
    pub async fn discard(&self, relative: &str) {
        let absolute = format!("{}/{relative}", self.root);
        if let Err(err) = tokio::fs::remove_file(&absolute).await {
            tracing::warn!(error = %err, path = %absolute, "failed to discard media file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn should_decode_png_data_url() {
        let url = format!("data:image/png;base64,{PNG_B64}");
        let image = decode_data_url("image", &url).unwrap();
        assert_eq!(image.extension, "png");
        assert!(!image.bytes.is_empty());
    }

    #[test]
    fn should_reject_plain_string() {
        let result = decode_data_url("image", "not a data url");
        assert!(matches!(
            result,
            Err(FoodgramError::Validation { field: "image", .. })
        ));
    }

    #[test]
    fn should_reject_unsupported_mime() {
        let url = format!("data:image/gif;base64,{PNG_B64}");
        assert!(decode_data_url("image", &url).is_err());
    }

    #[test]
    fn should_reject_invalid_base64() {
        let result = decode_data_url("avatar", "data:image/png;base64,@@@@");
        assert!(matches!(
            result,
            Err(FoodgramError::Validation {
                field: "avatar",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn should_store_image_under_dir() {
        let root = std::env::temp_dir().join(format!("media-{}", Uuid::new_v4()));
        let store = MediaStore {
            root: root.to_string_lossy().into_owned(),
        };
        let url = format!("data:image/png;base64,{PNG_B64}");
        let path = store.store_image("image", RECIPE_IMAGE_DIR, &url).await.unwrap();
        assert!(path.starts_with("recipes/images/"));
        assert!(path.ends_with(".png"));
        assert!(root.join(&path).exists());
        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn should_discard_stored_image() {
        let root = std::env::temp_dir().join(format!("media-{}", Uuid::new_v4()));
        let store = MediaStore {
            root: root.to_string_lossy().into_owned(),
        };
        let url = format!("data:image/png;base64,{PNG_B64}");
        let path = store.store_image("image", RECIPE_IMAGE_DIR, &url).await.unwrap();
        assert!(root.join(&path).exists());
        store.discard(&path).await;
        assert!(!root.join(&path).exists());
        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
