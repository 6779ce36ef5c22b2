use base64::{engine::general_purpose::STANDARD, Engine};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("empty image payload")]
    Empty,
    #[error("invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// An uploaded image after base64 decoding.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    /// Cleaned payload without data-URL prefix, padded.
    pub base64: String,
}

impl DecodedImage {
    pub fn file_name(&self) -> String {
        let ext = match self.mime_type {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            _ => "jpg",
        };
        format!("upload.{}", ext)
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Accepts bare base64 or a `data:<mime>;base64,` URL. Missing padding is repaired.
pub fn decode_base64_image(raw: &str) -> Result<DecodedImage, MediaError> {
    let payload = match raw.split_once(',') {
        Some((_, rest)) => rest,
        None => raw,
    };
    let mut payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if payload.is_empty() {
        return Err(MediaError::Empty);
    }

    let rem = payload.len() % 4;
    if rem != 0 {
        payload.push_str(&"=".repeat(4 - rem));
    }

    let bytes = STANDARD.decode(&payload)?;
    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }

    let mime_type = image::guess_format(&bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("image/jpeg");

    Ok(DecodedImage {
        bytes,
        mime_type,
        base64: payload,
    })
}
