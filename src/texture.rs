//! Indexed-pixel texture canvas
//!
//! A `Texture` is the shared target every loader writes into. Pixels are
//! palette indices stored column-major: successive bytes advance through `y`
//! for a fixed `x`, so pixel `(x, y)` lives at `x * height + y`.

/// 16.16 fixed-point value used for texture scale factors.
pub type Fixed = i32;

/// Number of fractional bits in a [`Fixed`] value.
pub const FRAC_BITS: u32 = 16;

/// Fixed-point 1.0.
pub const FRAC_UNIT: Fixed = 1 << FRAC_BITS;

/// Largest width a texture may have; wider sources are clamped.
pub const MAX_TEXTURE_WIDTH: u16 = 2048;

/// Largest height a texture may have; taller sources are clamped.
pub const MAX_TEXTURE_HEIGHT: u16 = 2048;

/// A 2-D palette-indexed image ready for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u16,
    height: u16,
    width_bits: u32,
    height_bits: u32,
    width_mask: u32,
    height_mask: u32,
    /// Horizontal display offset (patch left offset)
    pub offset_x: i16,
    /// Vertical display offset (patch top offset)
    pub offset_y: i16,
    /// Horizontal scale, 16.16 fixed point
    pub scale_x: Fixed,
    /// Vertical scale, 16.16 fixed point
    pub scale_y: Fixed,
    /// Palette index treated as transparent
    pub mask_color: u8,
    data: Vec<u8>,
}

impl Texture {
    /// Bytes of header metadata accounted for by [`Texture::calculate_size`].
    pub const HEADER_SIZE: usize = std::mem::size_of::<Texture>();

    /// Total bytes needed to hold a texture of the given dimensions, header
    /// included. Dimensions are clamped the same way [`Texture::init`] clamps them.
    pub fn calculate_size(width: u16, height: u16) -> usize {
        let width = width.min(MAX_TEXTURE_WIDTH) as usize;
        let height = height.min(MAX_TEXTURE_HEIGHT) as usize;
        Self::HEADER_SIZE + width * height
    }

    /// Allocate an uninitialised (0x0) texture whose pixel storage can hold a
    /// texture of `size` bytes as reported by a loader's `size()`.
    pub fn allocate(size: usize) -> Self {
        let capacity = size.saturating_sub(Self::HEADER_SIZE);
        Self {
            data: Vec::with_capacity(capacity),
            ..Self::empty()
        }
    }

    /// A 0x0 texture with default attributes.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            width_bits: 0,
            height_bits: 0,
            width_mask: 0,
            height_mask: 0,
            offset_x: 0,
            offset_y: 0,
            scale_x: FRAC_UNIT,
            scale_y: FRAC_UNIT,
            mask_color: 0,
            data: Vec::new(),
        }
    }

    /// Reset this texture to `width` x `height`, clamped to the maximum
    /// dimensions, with default attributes and every pixel set to the mask
    /// color. A zero dimension leaves the pixel buffer empty.
    pub fn init(&mut self, width: u16, height: u16) {
        let width = width.min(MAX_TEXTURE_WIDTH);
        let height = height.min(MAX_TEXTURE_HEIGHT);

        self.width = width;
        self.height = height;
        self.width_bits = log2(width);
        self.height_bits = log2(height);
        self.width_mask = (1 << self.width_bits) - 1;
        self.height_mask = (1 << self.height_bits) - 1;
        self.offset_x = 0;
        self.offset_y = 0;
        self.scale_x = FRAC_UNIT;
        self.scale_y = FRAC_UNIT;
        self.mask_color = 0;

        self.data.clear();
        if width > 0 && height > 0 {
            self.data
                .resize(width as usize * height as usize, self.mask_color);
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// floor(log2(width)), used for wrap-around addressing.
    pub fn width_bits(&self) -> u32 {
        self.width_bits
    }

    pub fn height_bits(&self) -> u32 {
        self.height_bits
    }

    pub fn width_mask(&self) -> u32 {
        self.width_mask
    }

    pub fn height_mask(&self) -> u32 {
        self.height_mask
    }

    /// True when the texture has no visual representation.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Column-major pixel indices.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One column of pixels, top to bottom.
    pub fn column(&self, x: u16) -> Option<&[u8]> {
        if x >= self.width {
            return None;
        }
        let start = x as usize * self.height as usize;
        self.data.get(start..start + self.height as usize)
    }

    /// Pixel index at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(x as usize * self.height as usize + y as usize)
            .copied()
    }
}

impl Default for Texture {
    fn default() -> Self {
        Self::empty()
    }
}

fn log2(value: u16) -> u32 {
    if value == 0 {
        0
    } else {
        15 - value.leading_zeros()
    }
}
