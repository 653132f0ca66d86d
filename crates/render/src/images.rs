//! Image file <-> payload conversion.

use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::{engine::general_purpose, Engine as _};

use atelier_core::generation::GenerationOutput;
use atelier_core::types::ImageRef;

/// Read an image file into a `data:` URL.
pub async fn load_data_url(path: &Path) -> anyhow::Result<ImageRef> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading image {}", path.display()))?;
    anyhow::ensure!(!bytes.is_empty(), "image {} is empty", path.display());

    let mime_type = detect_mime_type(&bytes)
        .or_else(|| mime_from_extension(path))
        .unwrap_or("image/png");
    let encoded = general_purpose::STANDARD.encode(&bytes);
    Ok(ImageRef::new(format!("data:{mime_type};base64,{encoded}")))
}

/// Decode the generated image and write it next to `output`, with the
/// extension matching its mime type. Returns the written path.
pub async fn write_output(output: &GenerationOutput, target: &Path) -> anyhow::Result<PathBuf> {
    let payload = output
        .image
        .split_once(";base64,")
        .map(|(_, data)| data)
        .unwrap_or(&output.image);
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .context("decoding generated image")?;

    let path = target.with_extension(extension_for(&output.mime_type));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn detect_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn png_file_becomes_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.bin");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let image = load_data_url(&path).await.unwrap();
        assert!(image.as_str().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn unknown_bytes_fall_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.JPG");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let image = load_data_url(&path).await.unwrap();
        assert!(image.as_str().starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        std::fs::write(&path, b"").unwrap();
        assert!(load_data_url(&path).await.is_err());
    }

    #[tokio::test]
    async fn output_is_decoded_with_matching_extension() {
        let dir = tempfile::tempdir().unwrap();
        let output = GenerationOutput {
            image: format!("data:image/webp;base64,{}", general_purpose::STANDARD.encode(b"webp!")),
            mime_type: "image/webp".into(),
            credits_used: 1,
            credits_remaining: None,
        };

        let path = write_output(&output, &dir.path().join("out").join("render"))
            .await
            .unwrap();
        assert_eq!(path.extension().unwrap(), "webp");
        assert_eq!(std::fs::read(path).unwrap(), b"webp!");
    }
}
