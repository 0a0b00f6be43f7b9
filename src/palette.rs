//! 256-color palettes for exporting decoded textures
//!
//! Only index lookup is done here: each palette index maps to the RGB
//! triplet stored for it.

use image::Rgba;
use thiserror::Error;

/// Bytes in one PLAYPAL-style palette: 256 RGB triplets.
pub const PALETTE_BYTES: usize = 256 * 3;

/// Error building a palette from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette needs at least 768 bytes, got {0}")]
    TooShort(usize),
}

/// A table of 256 opaque colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; 256],
}

impl Palette {
    /// Index `i` maps to gray level `i`.
    pub fn grayscale() -> Self {
        let mut colors = [[0u8; 3]; 256];
        for (i, color) in colors.iter_mut().enumerate() {
            *color = [i as u8; 3];
        }
        Self { colors }
    }

    /// Read the first palette of a PLAYPAL-style resource. Extra bytes
    /// (further palettes for damage/pickup tints) are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PaletteError> {
        if data.len() < PALETTE_BYTES {
            return Err(PaletteError::TooShort(data.len()));
        }
        let mut colors = [[0u8; 3]; 256];
        for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
            color.copy_from_slice(rgb);
        }
        Ok(Self { colors })
    }

    #[inline]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.colors[index as usize]
    }

    #[inline]
    pub fn rgba(&self, index: u8) -> Rgba<u8> {
        let [r, g, b] = self.rgb(index);
        Rgba([r, g, b, 255])
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}
