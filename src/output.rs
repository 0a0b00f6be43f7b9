//! PNG output and file path generation

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::palette::Palette;
use crate::texture::Texture;

/// Transparent color used for masked and empty pixels
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convert a texture to an RGBA image through `palette`.
///
/// When `transparent_mask` is set, pixels equal to the texture's mask color
/// are written fully transparent. An empty texture becomes a 1x1
/// transparent image.
pub fn texture_to_image(texture: &Texture, palette: &Palette, transparent_mask: bool) -> RgbaImage {
    if texture.is_empty() {
        return RgbaImage::from_pixel(1, 1, TRANSPARENT);
    }

    let width = texture.width() as u32;
    let height = texture.height() as u32;
    let mut image = RgbaImage::new(width, height);

    // Walk the column-major data in storage order
    for (x, column) in texture.data().chunks_exact(height as usize).enumerate() {
        for (y, &index) in column.iter().enumerate() {
            let color = if transparent_mask && index == texture.mask_color {
                TRANSPARENT
            } else {
                palette.rgba(index)
            };
            image.put_pixel(x as u32, y as u32, color);
        }
    }
    image
}

/// Save an RGBA image to a PNG file.
///
/// # Arguments
///
/// * `image` - The image to save
/// * `path` - The output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(OutputError)` on failure
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This keeps texel edges crisp.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

/// Generate the output path for a decoded texture.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{out_dir}/{name}.png` |
/// | `-o dir/` or an existing directory | `dir/{name}.png` |
/// | `-o file.png` | `file.png` |
///
/// Names are lowercased so `STARTAN3` and `startan3` land on the same file.
pub fn generate_output_path(out_dir: &Path, name: &str, output_arg: Option<&Path>) -> PathBuf {
    let file_name = format!("{}.png", name.to_ascii_lowercase());
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(file_name)
            } else {
                output.to_path_buf()
            }
        }
        None => out_dir.join(file_name),
    }
}
