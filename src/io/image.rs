//! Image decoding with orientation correction, and lossy export

use crate::io::error::{MosaicError, Result, file_system};
use image::codecs::jpeg::JpegEncoder;
use image::error::{DecodingError, ImageFormatHint};
use image::metadata::Orientation;
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageError, ImageReader,
    RgbImage,
};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Decode an image and rotate it upright according to its EXIF orientation
///
/// A missing or unreadable orientation tag leaves the image as stored. HEIC files go
/// through libheif, which applies the container's rotation itself.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_oriented(path: &Path) -> Result<DynamicImage> {
    if is_heic(path) {
        return load_heic(path);
    }

    let image_load = |source| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(file_system(path, "open image"))?;
    let mut decoder = reader.into_decoder().map_err(image_load)?;

    let orientation = decoder.orientation().unwrap_or_else(|error| {
        warn!(path = %path.display(), %error, "Could not read image orientation");
        Orientation::NoTransforms
    });

    let image = DynamicImage::from_decoder(decoder).map_err(image_load)?;
    Ok(correct_orientation(image, orientation))
}

/// Whether the path carries a `.heic` extension, ignoring case
pub fn is_heic(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("heic"))
}

/// Decode the primary image of a HEIC container to RGB
///
/// # Errors
///
/// Returns an error if the file is missing or libheif cannot decode it
pub fn load_heic(path: &Path) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(MosaicError::FileSystem {
            path: path.to_path_buf(),
            operation: "open image",
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    let heic_error = |reason: String| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source: ImageError::Decoding(DecodingError::new(
            ImageFormatHint::Name("HEIC".to_owned()),
            reason,
        )),
    };

    let context = HeifContext::read_from_file(&path.to_string_lossy())
        .map_err(|error| heic_error(error.to_string()))?;
    let handle = context
        .primary_image_handle()
        .map_err(|error| heic_error(error.to_string()))?;
    let decoded = LibHeif::new()
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|error| heic_error(error.to_string()))?;

    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| heic_error("no interleaved RGB plane".to_owned()))?;
    let rgb = pack_rows(plane.data, plane.stride, plane.width, plane.height)
        .ok_or_else(|| heic_error("RGB plane shorter than its dimensions".to_owned()))?;
    Ok(DynamicImage::ImageRgb8(rgb))
}

/// Copy a strided RGB plane into a tightly packed image
///
/// Returns `None` if `data` holds fewer rows than `height` or a row is shorter than
/// `width` pixels.
pub fn pack_rows(data: &[u8], stride: usize, width: u32, height: u32) -> Option<RgbImage> {
    let row_bytes = width as usize * 3;
    if stride < row_bytes {
        return None;
    }

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(data.get(start..start + row_bytes)?);
    }
    RgbImage::from_raw(width, height, pixels)
}

/// Apply the rotation part of an EXIF orientation
///
/// Codes 3, 6 and 8 rotate by 180, 90 and 270 degrees clockwise; mirrored codes are
/// left untouched.
pub fn correct_orientation(image: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Rotate90 => image.rotate90(),
        Orientation::Rotate180 => image.rotate180(),
        Orientation::Rotate270 => image.rotate270(),
        _ => image,
    }
}

/// Write an RGB image as JPEG
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoding fails
pub fn encode_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file = File::create(path).map_err(file_system(path, "create file"))?;
    let mut writer = BufWriter::new(file);

    JpegEncoder::new_with_quality(&mut writer, quality)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|source| MosaicError::ImageExport {
            path: path.to_path_buf(),
            source,
        })
}

/// Write an RGB image as lossy WebP
///
/// # Errors
///
/// Returns an error if encoding or writing fails
pub fn encode_webp(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let encoded = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height())
        .encode_simple(false, f32::from(quality))
        .map_err(|error| MosaicError::Encoding {
            format: "WebP",
            path: path.to_path_buf(),
            reason: format!("{error:?}"),
        })?;

    std::fs::write(path, &*encoded).map_err(file_system(path, "write file"))
}

/// Paths written by [`export_mosaic`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExportedMosaic {
    /// JPEG output
    pub jpeg: PathBuf,
    /// WebP output, same stem
    pub webp: PathBuf,
}

/// Write the mosaic as `<stem>.jpg` and `<stem>.webp` at one quality setting
///
/// Alpha is dropped; both files share the stem.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or either encoding fails
pub fn export_mosaic(
    mosaic: &DynamicImage,
    output_dir: &Path,
    stem: &str,
    quality: u8,
) -> Result<ExportedMosaic> {
    std::fs::create_dir_all(output_dir)
        .map_err(file_system(output_dir, "create output directory"))?;

    let rgb = mosaic.to_rgb8();
    let exported = ExportedMosaic {
        jpeg: output_dir.join(format!("{stem}.jpg")),
        webp: output_dir.join(format!("{stem}.webp")),
    };

    encode_jpeg(&rgb, &exported.jpeg, quality)?;
    encode_webp(&rgb, &exported.webp, quality)?;
    Ok(exported)
}
