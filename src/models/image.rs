use crate::error::{MedscanError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    /// Sniff the format from magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => Ok(ImageFormat::Jpeg),
            Ok(image::ImageFormat::Png) => Ok(ImageFormat::Png),
            Ok(other) => Err(MedscanError::DecodeError(format!(
                "Unsupported image format: {:?}",
                other
            ))),
            Err(e) => Err(MedscanError::DecodeError(e.to_string())),
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

/// Where a source image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    Upload,
    Camera,
    Example,
}

impl ImageOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageOrigin::Upload => "upload",
            ImageOrigin::Camera => "camera",
            ImageOrigin::Example => "example",
        }
    }
}

impl std::str::FromStr for ImageOrigin {
    type Err = MedscanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "upload" => Ok(ImageOrigin::Upload),
            "camera" => Ok(ImageOrigin::Camera),
            "example" => Ok(ImageOrigin::Example),
            other => Err(MedscanError::ConfigError(format!(
                "Unknown image origin: {}",
                other
            ))),
        }
    }
}

/// Raw image bytes exactly as the user supplied them.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub origin: ImageOrigin,
}

impl SourceImage {
    pub fn new(bytes: Vec<u8>, format: ImageFormat, origin: ImageOrigin) -> Self {
        Self {
            bytes,
            format,
            origin,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>, origin: ImageOrigin) -> Result<Self> {
        let format = ImageFormat::from_bytes(&bytes)?;
        Ok(Self::new(bytes, format, origin))
    }

    pub fn from_path(path: impl AsRef<Path>, origin: ImageOrigin) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes, origin)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Resized PNG preview. Only ever shown to the user.
#[derive(Debug, Clone)]
pub struct DisplayImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DisplayImage {
    pub fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sniffing() {
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        let jpeg_magic = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0];
        assert_eq!(ImageFormat::from_bytes(&png_magic).unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::from_bytes(&jpeg_magic).unwrap(), ImageFormat::Jpeg);
        assert!(ImageFormat::from_bytes(b"hello").is_err());
    }

    #[test]
    fn test_extension_and_mime() {
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(ImageFormat::from_extension("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_origin_parsing() {
        assert_eq!("Camera".parse::<ImageOrigin>().unwrap(), ImageOrigin::Camera);
        assert!("scanner".parse::<ImageOrigin>().is_err());
    }
}
