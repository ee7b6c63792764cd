use crate::{
    config::MAX_IMAGE_WIDTH,
    error::{MedscanError, Result},
    models::{DisplayImage, ImageFormat, SourceImage},
};
use image::{imageops::FilterType, DynamicImage, ImageError, ImageReader};
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Tallest preview we are willing to allocate.
pub const MAX_PREVIEW_HEIGHT: u32 = 8192;

/// Produces bounded-width PNG previews of label photos.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    max_width: u32,
}

impl Default for ImageNormalizer {
    fn default() -> Self {
        Self {
            max_width: MAX_IMAGE_WIDTH,
        }
    }
}

impl ImageNormalizer {
    pub fn new(max_width: u32) -> Self {
        Self { max_width }
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn preview(&self, image: &SourceImage) -> Result<DisplayImage> {
        resize_for_display(image, self.max_width)
    }

    /// Fully decodes the image so nothing unreadable is ever uploaded.
    pub fn validate(&self, image: &SourceImage) -> Result<(u32, u32)> {
        let actual = ImageFormat::from_bytes(&image.bytes)?;
        if actual != image.format {
            return Err(MedscanError::DecodeError(format!(
                "image is tagged {} but encoded as {}",
                image.format.extension(),
                actual.extension()
            )));
        }

        let decoded = decode(&image.bytes)?;
        check_source_dimensions(decoded.width(), decoded.height())?;
        Ok((decoded.width(), decoded.height()))
    }
}

pub fn resize_for_display(image: &SourceImage, max_width: u32) -> Result<DisplayImage> {
    let decoded = decode(&image.bytes)?;
    resize_decoded(decoded, max_width)
}

/// Resizes from a stream, leaving it rewound to where it started.
pub fn resize_reader_for_display<R: Read + Seek>(
    reader: &mut R,
    max_width: u32,
) -> Result<DisplayImage> {
    let start = reader.stream_position()?;
    let mut bytes = Vec::new();
    let read = reader.read_to_end(&mut bytes);
    reader.seek(SeekFrom::Start(start))?;
    read?;

    resize_decoded(decode(&bytes)?, max_width)
}

pub fn resize_path_for_display(path: impl AsRef<Path>, max_width: u32) -> Result<DisplayImage> {
    let file = std::fs::File::open(path.as_ref())?;
    let decoded = ImageReader::new(BufReader::new(file))
        .with_guessed_format()?
        .decode()
        .map_err(decode_error)?;
    resize_decoded(decoded, max_width)
}

/// Height that keeps the source aspect ratio at `target_width`, never below 1.
pub fn proportional_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = (target_width as f64 * height as f64 / width as f64).round();
    (scaled as u32).max(1)
}

// In-memory bytes cannot fail with real I/O, so every failure is a decode failure.
fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MedscanError::DecodeError(e.to_string()))?
        .decode()
        .map_err(decode_error)
}

fn decode_error(err: ImageError) -> MedscanError {
    MedscanError::DecodeError(err.to_string())
}

fn check_source_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(MedscanError::InvalidDimension(format!(
            "source image is {}x{}",
            width, height
        )));
    }
    Ok(())
}

fn resize_decoded(decoded: DynamicImage, max_width: u32) -> Result<DisplayImage> {
    if max_width == 0 {
        return Err(MedscanError::InvalidDimension(
            "max width must be greater than zero".into(),
        ));
    }
    check_source_dimensions(decoded.width(), decoded.height())?;

    let target_height = proportional_height(decoded.width(), decoded.height(), max_width);
    if target_height > MAX_PREVIEW_HEIGHT {
        return Err(MedscanError::InvalidDimension(format!(
            "{}x{} source needs a {}px tall preview, limit is {}px",
            decoded.width(),
            decoded.height(),
            target_height,
            MAX_PREVIEW_HEIGHT
        )));
    }
    log::debug!(
        "Resizing {}x{} to {}x{}",
        decoded.width(),
        decoded.height(),
        max_width,
        target_height
    );

    let resized = decoded.resize_exact(max_width, target_height, FilterType::Lanczos3);

    let mut bytes = Vec::new();
    resized.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;

    Ok(DisplayImage {
        bytes,
        width: resized.width(),
        height: resized.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageOrigin;
    use image::{GenericImageView, Rgb, RgbImage};

    fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn test_jpeg_label_becomes_png_preview() {
        let source = SourceImage::from_bytes(
            encoded(1200, 800, image::ImageFormat::Jpeg),
            ImageOrigin::Upload,
        )
        .unwrap();
        assert_eq!(source.format, ImageFormat::Jpeg);

        let preview = resize_for_display(&source, 300).unwrap();
        assert_eq!((preview.width, preview.height), (300, 200));
        assert_eq!(
            image::guess_format(&preview.bytes).unwrap(),
            image::ImageFormat::Png
        );

        let decoded = image::load_from_memory(&preview.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (300, 200));
    }

    #[test]
    fn test_height_is_rounded() {
        assert_eq!(proportional_height(1200, 800, 300), 200);
        assert_eq!(proportional_height(3, 2, 100), 67);
        assert_eq!(proportional_height(1000, 1, 10), 1);
        assert_eq!(proportional_height(7, 10, 300), 429);
    }

    #[test]
    fn test_upscales_small_images() {
        let source =
            SourceImage::from_bytes(encoded(40, 30, image::ImageFormat::Png), ImageOrigin::Camera)
                .unwrap();
        let preview = ImageNormalizer::default().preview(&source).unwrap();
        assert_eq!((preview.width, preview.height), (300, 225));
    }

    #[test]
    fn test_reader_is_rewound() {
        let bytes = encoded(64, 32, image::ImageFormat::Png);
        let mut cursor = Cursor::new(bytes.clone());

        let preview = resize_reader_for_display(&mut cursor, 32).unwrap();
        assert_eq!((preview.width, preview.height), (32, 16));

        let mut again = Vec::new();
        cursor.read_to_end(&mut again).unwrap();
        assert_eq!(again, bytes);
    }

    #[test]
    fn test_reader_rewinds_to_entry_position() {
        let mut stream = b"HDR".to_vec();
        stream.extend(encoded(10, 10, image::ImageFormat::Png));
        let mut cursor = Cursor::new(stream);
        cursor.seek(SeekFrom::Start(3)).unwrap();

        resize_reader_for_display(&mut cursor, 5).unwrap();
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_example_path_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.jpg");
        std::fs::write(&path, encoded(600, 900, image::ImageFormat::Jpeg)).unwrap();

        let preview = resize_path_for_display(&path, 300).unwrap();
        assert_eq!((preview.width, preview.height), (300, 450));
        assert!(path.exists());
    }

    #[test]
    fn test_rejects_garbage() {
        let source = SourceImage::new(b"plain text".to_vec(), ImageFormat::Jpeg, ImageOrigin::Upload);
        let err = resize_for_display(&source, 300).unwrap_err();
        assert!(matches!(err, MedscanError::DecodeError(_)));
        assert!(ImageNormalizer::default().validate(&source).is_err());
    }

    #[test]
    fn test_truncated_body_is_decode_error() {
        let mut bytes = encoded(200, 200, image::ImageFormat::Png);
        bytes.truncate(60);
        let source = SourceImage::from_bytes(bytes, ImageOrigin::Upload).unwrap();

        let err = resize_for_display(&source, 300).unwrap_err();
        assert!(matches!(err, MedscanError::DecodeError(_)));
        let err = ImageNormalizer::default().validate(&source).unwrap_err();
        assert!(matches!(err, MedscanError::DecodeError(_)));
    }

    #[test]
    fn test_validate_rejects_mismatched_format_tag() {
        let source = SourceImage::new(
            encoded(4, 4, image::ImageFormat::Png),
            ImageFormat::Jpeg,
            ImageOrigin::Upload,
        );
        let err = ImageNormalizer::default().validate(&source).unwrap_err();
        assert!(matches!(err, MedscanError::DecodeError(_)));
    }

    #[test]
    fn test_tall_thin_source_is_refused() {
        let source =
            SourceImage::from_bytes(encoded(1, 4000, image::ImageFormat::Png), ImageOrigin::Upload)
                .unwrap();
        let err = resize_for_display(&source, 300).unwrap_err();
        assert!(matches!(err, MedscanError::InvalidDimension(_)));
    }

    #[test]
    fn test_rejects_zero_width() {
        let source =
            SourceImage::from_bytes(encoded(8, 8, image::ImageFormat::Png), ImageOrigin::Upload)
                .unwrap();
        let err = resize_for_display(&source, 0).unwrap_err();
        assert!(matches!(err, MedscanError::InvalidDimension(_)));
    }

    #[test]
    fn test_validate_reads_dimensions() {
        let source =
            SourceImage::from_bytes(encoded(120, 45, image::ImageFormat::Jpeg), ImageOrigin::Example)
                .unwrap();
        assert_eq!(ImageNormalizer::new(60).validate(&source).unwrap(), (120, 45));
    }
}
