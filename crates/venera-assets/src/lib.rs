//! Startup image loading.
//!
//! The frame loop must never start with a texture missing, so all required
//! images are decoded up front and any failure aborts startup. Decoded pixels
//! are handed to the render host as tightly packed RGBA bytes.

use std::path::{Path, PathBuf};

use venera_config::AssetConfig;

/// Errors decoding a startup image.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The file could not be read.
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but could not be decoded.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A decoded 2-D image, tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Load and decode one image to RGBA8.
pub fn load_rgba(path: &Path) -> Result<DecodedImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Loaded {} ({width}x{height})", path.display());
    Ok(DecodedImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Every image the scenes need before the loop may enter its running state.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    /// Grayscale bump map wrapped onto the globe.
    pub globe_bump: DecodedImage,
    /// Sky dome texture for the terrain scene.
    pub sky: DecodedImage,
    /// Detail texture blended at low elevations.
    pub terrain_low: DecodedImage,
    /// Detail texture blended at high elevations.
    pub terrain_high: DecodedImage,
}

impl AssetBundle {
    /// Load all required images, failing on the first error.
    pub fn load(config: &AssetConfig) -> Result<Self, AssetError> {
        Ok(Self {
            globe_bump: load_rgba(&config.globe_bump)?,
            sky: load_rgba(&config.sky)?,
            terrain_low: load_rgba(&config.terrain_low)?,
            terrain_high: load_rgba(&config.terrain_high)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A valid 2x2 red PNG, produced with the `image` crate.
    fn write_test_png(path: &Path) {
        let mut img = image::RgbaImage::new(2, 2);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgba([200, 10, 10, 255]);
        }
        img.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    #[test]
    fn test_load_decodes_to_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        write_test_png(&path);

        let img = load_rgba(&path).unwrap();
        assert_eq!((img.width, img.height), (2, 2));
        assert_eq!(img.rgba.len(), 2 * 2 * 4);
        assert_eq!(&img.rgba[0..4], &[200, 10, 10, 255]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_rgba(Path::new("/nonexistent/venus.jpg")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn test_garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn test_bundle_fails_when_any_image_missing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("ok.png");
        write_test_png(&good);

        let config = AssetConfig {
            globe_bump: good.clone(),
            sky: good.clone(),
            terrain_low: dir.path().join("absent.png"),
            terrain_high: good,
        };
        assert!(AssetBundle::load(&config).is_err());
    }

    #[test]
    fn test_bundle_loads_all_four() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        write_test_png(&path);

        let config = AssetConfig {
            globe_bump: path.clone(),
            sky: path.clone(),
            terrain_low: path.clone(),
            terrain_high: path,
        };
        let bundle = AssetBundle::load(&config).unwrap();
        assert_eq!(bundle.globe_bump.width, 2);
        assert_eq!(bundle.terrain_high.height, 2);
    }
}
