//! Texture loaders
//!
//! Each loader is bound to one resource (or one composite definition) and
//! knows two things: how many bytes the decoded texture needs ([`TextureLoader::size`])
//! and how to fill a texture from the raw resource bytes ([`TextureLoader::load`]).
//!
//! Loading never fails. Missing or corrupt input degrades to an empty or
//! partially drawn texture, and what was skipped is returned as warnings.
//!
//! # Examples
//!
//! ```
//! use lumptex::loader::{FlatLoader, TextureLoader};
//! use lumptex::resource::MemoryAccessor;
//!
//! let mut lumps = MemoryAccessor::new();
//! let id = lumps.insert("FLOOR4_8", vec![7u8; 64 * 64]);
//!
//! let (texture, warnings) = FlatLoader::new(&lumps, id).decode();
//! assert_eq!((texture.width(), texture.height()), (64, 64));
//! assert_eq!(texture.pixel(10, 20), Some(7));
//! assert!(warnings.is_empty());
//! ```

use crate::composite::CompositeTextureDefinition;
use crate::patch::{draw_patch, validate_patch, PatchHeader};
use crate::resource::{fetch, RawResourceAccessor, ResourceId};
use crate::texture::{Texture, FRAC_BITS};
use crate::translation::{copy_translated, TranslationTable};
use crate::transpose::transpose;
use crate::warning::Warning;

/// Width of a fullscreen raw image.
pub const RAW_WIDTH: u16 = 320;

/// Height of a fullscreen raw image.
pub const RAW_HEIGHT: u16 = 200;

/// The {size, load} capability shared by every loader.
pub trait TextureLoader {
    /// Bytes the caller must allocate for the decoded texture, header included.
    fn size(&self) -> usize;

    /// Fill `texture` from the resource. `texture` is reinitialised to the
    /// decoded dimensions; a zero dimension leaves it empty.
    fn load(&self, texture: &mut Texture) -> Vec<Warning>;

    /// Allocate a texture of `size()` bytes and load into it.
    fn decode(&self) -> (Texture, Vec<Warning>) {
        let mut texture = Texture::allocate(self.size());
        let warnings = self.load(&mut texture);
        (texture, warnings)
    }
}

/// Load a row-major raw buffer of known dimensions and transpose it.
fn load_row_major(
    texture: &mut Texture,
    accessor: &dyn RawResourceAccessor,
    id: ResourceId,
    width: u16,
    height: u16,
    translation: Option<&TranslationTable>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    texture.init(width, height);
    if texture.is_empty() {
        return warnings;
    }

    let width = texture.width() as usize;
    let height = texture.height() as usize;
    let expected = width * height;

    let mut raw = fetch(accessor, id);
    if raw.len() < expected {
        warnings.push(Warning::new(format!(
            "resource {} has {} bytes, expected {}; padding with mask color",
            id,
            raw.len(),
            expected
        )));
    }
    raw.resize(expected, texture.mask_color);

    transpose(texture.data_mut(), &raw, width, height, translation);
    warnings
}

/// A headerless row-major image whose dimensions are known up front.
#[derive(Clone, Copy)]
pub struct RowMajorLoader<'a> {
    accessor: &'a dyn RawResourceAccessor,
    id: ResourceId,
    width: u16,
    height: u16,
    translation: Option<&'a TranslationTable>,
}

impl<'a> RowMajorLoader<'a> {
    pub fn new(accessor: &'a dyn RawResourceAccessor, id: ResourceId, width: u16, height: u16) -> Self {
        Self {
            accessor,
            id,
            width,
            height,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: &'a TranslationTable) -> Self {
        self.translation = Some(translation);
        self
    }
}

impl TextureLoader for RowMajorLoader<'_> {
    fn size(&self) -> usize {
        Texture::calculate_size(self.width, self.height)
    }

    fn load(&self, texture: &mut Texture) -> Vec<Warning> {
        load_row_major(
            texture,
            self.accessor,
            self.id,
            self.width,
            self.height,
            self.translation,
        )
    }
}

/// Side length of a flat inferred from its byte length, or 0 for an empty resource.
///
/// Heretic's 64x65 and Hexen's 64x128 scrolling flats decode as 64x64; the
/// excess rows are ignored. Unrecognised lengths fall back to the truncated
/// square root.
pub fn flat_dimension(length: usize) -> u16 {
    match length {
        4096 => 64,
        16384 => 128,
        65536 => 256,
        64 => 8,
        256 => 16,
        1024 => 32,
        4160 => 64,
        8192 => 64,
        0 => 0,
        n => (n as f64).sqrt() as u16,
    }
}

/// A headerless square flat whose size is inferred from its length.
#[derive(Clone, Copy)]
pub struct FlatLoader<'a> {
    accessor: &'a dyn RawResourceAccessor,
    id: ResourceId,
    translation: Option<&'a TranslationTable>,
}

impl<'a> FlatLoader<'a> {
    pub fn new(accessor: &'a dyn RawResourceAccessor, id: ResourceId) -> Self {
        Self {
            accessor,
            id,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: &'a TranslationTable) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Width and height of the decoded flat.
    pub fn dimensions(&self) -> (u16, u16) {
        let side = flat_dimension(self.accessor.resource_size(self.id));
        (side, side)
    }
}

impl TextureLoader for FlatLoader<'_> {
    fn size(&self) -> usize {
        let (width, height) = self.dimensions();
        Texture::calculate_size(width, height)
    }

    fn load(&self, texture: &mut Texture) -> Vec<Warning> {
        let (width, height) = self.dimensions();
        if width == 0 {
            texture.init(0, 0);
            return vec![Warning::new(format!("flat {} is empty", self.id))];
        }
        load_row_major(texture, self.accessor, self.id, width, height, self.translation)
    }
}

/// A 320x200 fullscreen image already in the texture's native layout.
#[derive(Clone, Copy)]
pub struct RawLoader<'a> {
    accessor: &'a dyn RawResourceAccessor,
    id: ResourceId,
    translation: Option<&'a TranslationTable>,
}

impl<'a> RawLoader<'a> {
    pub fn new(accessor: &'a dyn RawResourceAccessor, id: ResourceId) -> Self {
        Self {
            accessor,
            id,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: &'a TranslationTable) -> Self {
        self.translation = Some(translation);
        self
    }

    /// 320x200 when the resource is exactly that many bytes, otherwise 0x0.
    pub fn dimensions(&self) -> (u16, u16) {
        if self.accessor.resource_size(self.id) == RAW_WIDTH as usize * RAW_HEIGHT as usize {
            (RAW_WIDTH, RAW_HEIGHT)
        } else {
            (0, 0)
        }
    }
}

impl TextureLoader for RawLoader<'_> {
    fn size(&self) -> usize {
        let (width, height) = self.dimensions();
        Texture::calculate_size(width, height)
    }

    fn load(&self, texture: &mut Texture) -> Vec<Warning> {
        let (width, height) = self.dimensions();
        texture.init(width, height);
        if texture.is_empty() {
            return vec![Warning::new(format!(
                "raw image {} is {} bytes, expected {}",
                self.id,
                self.accessor.resource_size(self.id),
                RAW_WIDTH as usize * RAW_HEIGHT as usize
            ))];
        }

        let raw = fetch(self.accessor, self.id);
        let dest = texture.data_mut();
        let n = raw.len().min(dest.len());
        copy_translated(&mut dest[..n], &raw[..n], self.translation);
        Vec::new()
    }
}

/// A single column-oriented patch resource.
#[derive(Clone, Copy)]
pub struct PatchLoader<'a> {
    accessor: &'a dyn RawResourceAccessor,
    id: ResourceId,
    translation: Option<&'a TranslationTable>,
}

impl<'a> PatchLoader<'a> {
    pub fn new(accessor: &'a dyn RawResourceAccessor, id: ResourceId) -> Self {
        Self {
            accessor,
            id,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: &'a TranslationTable) -> Self {
        self.translation = Some(translation);
        self
    }
}

impl TextureLoader for PatchLoader<'_> {
    /// Sized from the 4-byte width/height prefix alone.
    fn size(&self) -> usize {
        let mut prefix = [0u8; 4];
        let wanted = self.accessor.resource_size(self.id).min(prefix.len());
        let copied = self.accessor.load_resource(self.id, &mut prefix[..wanted]);
        let (width, height) = PatchHeader::dimensions(&prefix[..copied]);
        Texture::calculate_size(width, height)
    }

    fn load(&self, texture: &mut Texture) -> Vec<Warning> {
        let data = fetch(self.accessor, self.id);

        if !validate_patch(&data) {
            let (width, height) = PatchHeader::dimensions(&data);
            texture.init(width, height);
            return vec![Warning::new(format!(
                "patch {} is invalid, leaving it blank",
                self.id
            ))];
        }

        let Some(header) = PatchHeader::parse(&data) else {
            texture.init(0, 0);
            return Vec::new();
        };
        texture.init(header.width as u16, header.height as u16);
        texture.offset_x = header.left_offset;
        texture.offset_y = header.top_offset;

        draw_patch(texture, &data, 0, 0, self.translation)
            .into_iter()
            .map(|w| Warning::new(format!("patch {}: {}", self.id, w.message)))
            .collect()
    }
}

/// A texture assembled from patches placed on a shared canvas.
#[derive(Clone, Copy)]
pub struct CompositeLoader<'a> {
    accessor: &'a dyn RawResourceAccessor,
    definition: &'a CompositeTextureDefinition,
    translation: Option<&'a TranslationTable>,
}

impl<'a> CompositeLoader<'a> {
    pub fn new(accessor: &'a dyn RawResourceAccessor, definition: &'a CompositeTextureDefinition) -> Self {
        Self {
            accessor,
            definition,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: &'a TranslationTable) -> Self {
        self.translation = Some(translation);
        self
    }
}

impl TextureLoader for CompositeLoader<'_> {
    fn size(&self) -> usize {
        Texture::calculate_size(self.definition.width, self.definition.height)
    }

    fn load(&self, texture: &mut Texture) -> Vec<Warning> {
        let def = self.definition;
        let mut warnings = Vec::new();

        texture.init(def.width, def.height);
        // Declared scales are in eighths
        if def.scale_x > 0 {
            texture.scale_x = (def.scale_x as i32) << (FRAC_BITS - 3);
        }
        if def.scale_y > 0 {
            texture.scale_y = (def.scale_y as i32) << (FRAC_BITS - 3);
        }
        if texture.is_empty() {
            return warnings;
        }

        // Placements must be applied in order: later patches overwrite earlier ones.
        for (index, placement) in def.patches.iter().enumerate() {
            let Some(id) = placement.resource else {
                continue;
            };

            let data = fetch(self.accessor, id);
            if !validate_patch(&data) {
                warnings.push(Warning::new(format!(
                    "placement {} (patch {}) is invalid, skipping",
                    index, id
                )));
                continue;
            }

            let drawn = draw_patch(
                texture,
                &data,
                placement.origin_x,
                placement.origin_y,
                self.translation,
            );
            warnings.extend(drawn.into_iter().map(|w| {
                Warning::new(format!("placement {} (patch {}): {}", index, id, w.message))
            }));
        }

        warnings
    }
}

/// Any of the loader variants, for callers that pick the format at runtime.
#[derive(Clone, Copy)]
pub enum Loader<'a> {
    RowMajor(RowMajorLoader<'a>),
    Flat(FlatLoader<'a>),
    Raw(RawLoader<'a>),
    Patch(PatchLoader<'a>),
    Composite(CompositeLoader<'a>),
}

impl<'a> Loader<'a> {
    /// Attach a translation table to whichever loader this is.
    pub fn with_translation(self, translation: &'a TranslationTable) -> Self {
        match self {
            Loader::RowMajor(l) => Loader::RowMajor(l.with_translation(translation)),
            Loader::Flat(l) => Loader::Flat(l.with_translation(translation)),
            Loader::Raw(l) => Loader::Raw(l.with_translation(translation)),
            Loader::Patch(l) => Loader::Patch(l.with_translation(translation)),
            Loader::Composite(l) => Loader::Composite(l.with_translation(translation)),
        }
    }
}

impl TextureLoader for Loader<'_> {
    fn size(&self) -> usize {
        match self {
            Loader::RowMajor(l) => l.size(),
            Loader::Flat(l) => l.size(),
            Loader::Raw(l) => l.size(),
            Loader::Patch(l) => l.size(),
            Loader::Composite(l) => l.size(),
        }
    }

    fn load(&self, texture: &mut Texture) -> Vec<Warning> {
        match self {
            Loader::RowMajor(l) => l.load(texture),
            Loader::Flat(l) => l.load(texture),
            Loader::Raw(l) => l.load(texture),
            Loader::Patch(l) => l.load(texture),
            Loader::Composite(l) => l.load(texture),
        }
    }
}

impl<'a> From<RowMajorLoader<'a>> for Loader<'a> {
    fn from(l: RowMajorLoader<'a>) -> Self {
        Loader::RowMajor(l)
    }
}

impl<'a> From<FlatLoader<'a>> for Loader<'a> {
    fn from(l: FlatLoader<'a>) -> Self {
        Loader::Flat(l)
    }
}

impl<'a> From<RawLoader<'a>> for Loader<'a> {
    fn from(l: RawLoader<'a>) -> Self {
        Loader::Raw(l)
    }
}

impl<'a> From<PatchLoader<'a>> for Loader<'a> {
    fn from(l: PatchLoader<'a>) -> Self {
        Loader::Patch(l)
    }
}

impl<'a> From<CompositeLoader<'a>> for Loader<'a> {
    fn from(l: CompositeLoader<'a>) -> Self {
        Loader::Composite(l)
    }
}
