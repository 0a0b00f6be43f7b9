//! Column-oriented patch images
//!
//! A patch is an 8-byte little-endian header (width, height, left offset,
//! top offset), a table of `width` 32-bit column offsets, and for each column
//! a run of posts:
//!
//! ```text
//! topdelta:u8 length:u8 pad:u8 pixels[length] pad:u8   ... 0xFF
//! ```
//!
//! [`validate_patch`] checks the offset table before anything is drawn, and
//! [`draw_patch`] composites posts into a [`Texture`] with clipping.

use serde::Serialize;

use crate::texture::Texture;
use crate::translation::{copy_translated, TranslationTable};
use crate::warning::Warning;

/// Size of the fixed patch header.
pub const PATCH_HEADER_SIZE: usize = 8;

/// Top-delta value that terminates a column.
pub const POST_TERMINATOR: u8 = 0xFF;

/// Bytes of post overhead: topdelta, length, and the two pad bytes.
const POST_OVERHEAD: usize = 4;

/// The fixed header at the start of every patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatchHeader {
    pub width: i16,
    pub height: i16,
    pub left_offset: i16,
    pub top_offset: i16,
}

impl PatchHeader {
    /// Parse the header, or `None` if fewer than 8 bytes are available.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < PATCH_HEADER_SIZE {
            return None;
        }
        Some(Self {
            width: read_i16(data, 0),
            height: read_i16(data, 2),
            left_offset: read_i16(data, 4),
            top_offset: read_i16(data, 6),
        })
    }

    /// Read only the width/height prefix. Negative values clamp to zero.
    pub fn dimensions(data: &[u8]) -> (u16, u16) {
        if data.len() < 4 {
            return (0, 0);
        }
        (
            read_i16(data, 0).max(0) as u16,
            read_i16(data, 2).max(0) as u16,
        )
    }
}

#[inline]
fn read_i16(data: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([data[at], data[at + 1]])
}

#[inline]
fn read_i32(data: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Offset of column `column`, read from the table following the header.
fn column_offset(data: &[u8], column: usize) -> Option<i32> {
    let at = PATCH_HEADER_SIZE + column * 4;
    (at + 4 <= data.len()).then(|| read_i32(data, at))
}

/// Returns true if `data` is a structurally valid patch.
///
/// The header must declare a positive width and height, the column table
/// must fit in the buffer, and every column offset must point past the table
/// and inside the buffer. One bad offset rejects the whole patch.
pub fn validate_patch(data: &[u8]) -> bool {
    if data.len() <= PATCH_HEADER_SIZE {
        return false;
    }
    let width = read_i16(data, 0);
    let height = read_i16(data, 2);
    if width <= 0 || height <= 0 {
        return false;
    }

    let table_end = PATCH_HEADER_SIZE + 4 * width as usize;
    if data.len() < table_end {
        return false;
    }

    let min_offset = table_end as i64;
    let max_offset = data.len() as i64 - 1;
    (0..width as usize).all(|column| {
        let offset = read_i32(data, PATCH_HEADER_SIZE + column * 4) as i64;
        offset >= min_offset && offset <= max_offset
    })
}

/// Draw a validated patch into `texture` with its top-left corner at
/// `(x_origin, y_origin)`, clipped to the texture bounds.
///
/// A truncated post stream stops decoding of that column only; every other
/// column is still drawn. Each stopped column is reported as a warning.
pub fn draw_patch(
    texture: &mut Texture,
    data: &[u8],
    x_origin: i32,
    y_origin: i32,
    translation: Option<&TranslationTable>,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    let Some(header) = PatchHeader::parse(data) else {
        return warnings;
    };
    let patch_width = header.width as i64;
    if patch_width <= 0 || header.height <= 0 {
        return warnings;
    }

    let tex_width = texture.width() as i64;
    let tex_height = texture.height() as usize;
    if tex_width == 0 || tex_height == 0 {
        return warnings;
    }

    // Clip bounds are computed in i64 so any i32 origin clips instead of overflowing
    let x_origin = x_origin as i64;
    let x1 = x_origin.max(0);
    let x2 = (x_origin + patch_width - 1).min(tex_width - 1);

    for x in x1..=x2 {
        let column = (x - x_origin) as usize;
        let offset = match column_offset(data, column) {
            Some(offset) if offset >= 0 && (offset as usize) < data.len() => offset as usize,
            _ => {
                warnings.push(Warning::new(format!(
                    "column {} has an out-of-range offset, skipping",
                    column
                )));
                continue;
            }
        };

        let start = x as usize * tex_height;
        let dest_column = &mut texture.data_mut()[start..start + tex_height];
        if let Err(at) = draw_column(dest_column, data, offset, y_origin, translation) {
            warnings.push(Warning::new(format!(
                "column {} is truncated at byte {}, skipping remaining posts",
                column, at
            )));
        }
    }

    warnings
}

/// Draw the posts starting at `offset` into one destination column.
/// Returns the byte position of a truncated post on failure.
fn draw_column(
    dest: &mut [u8],
    data: &[u8],
    offset: usize,
    y_origin: i32,
    translation: Option<&TranslationTable>,
) -> Result<(), usize> {
    let height = dest.len() as i64;
    let y_origin = y_origin as i64;
    let mut pos = offset;
    let mut abs_top = 0i64;

    loop {
        let Some(&top_delta) = data.get(pos) else {
            return Err(pos);
        };
        if top_delta == POST_TERMINATOR {
            return Ok(());
        }
        let Some(&length) = data.get(pos + 1) else {
            return Err(pos);
        };
        let length = length as usize;
        if pos + POST_OVERHEAD + length > data.len() {
            return Err(pos);
        }

        // DeePsea tall patches: a top delta that does not move past the
        // running offset is relative to it.
        let top_delta = top_delta as i64;
        if top_delta <= abs_top {
            abs_top += top_delta;
        } else {
            abs_top = top_delta;
        }

        let top = y_origin + abs_top;
        let y1 = top.max(0);
        let y2 = (top + length as i64 - 1).min(height - 1);
        if y1 <= y2 {
            let count = (y2 - y1 + 1) as usize;
            let skip = (y1 - top) as usize;
            let source = &data[pos + 3 + skip..pos + 3 + skip + count];
            copy_translated(&mut dest[y1 as usize..=y2 as usize], source, translation);
        }

        pos += length + POST_OVERHEAD;
    }
}

/// Summary of a patch resource, used by `inspect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchInfo {
    pub size: usize,
    pub header: Option<PatchHeader>,
    pub valid: bool,
    pub posts: usize,
    pub truncated_columns: usize,
}

impl PatchInfo {
    pub fn from_bytes(data: &[u8]) -> Self {
        let header = PatchHeader::parse(data);
        let valid = validate_patch(data);
        let mut posts = 0;
        let mut truncated_columns = 0;

        if let (true, Some(header)) = (valid, header) {
            for column in 0..header.width as usize {
                let Some(offset) = column_offset(data, column) else {
                    break;
                };
                match count_posts(data, offset as usize) {
                    Ok(n) => posts += n,
                    Err(n) => {
                        posts += n;
                        truncated_columns += 1;
                    }
                }
            }
        }

        Self {
            size: data.len(),
            header,
            valid,
            posts,
            truncated_columns,
        }
    }
}

/// Count complete posts in a column; `Err` carries the count before truncation.
fn count_posts(data: &[u8], mut pos: usize) -> Result<usize, usize> {
    let mut count = 0;
    loop {
        match data.get(pos) {
            Some(&POST_TERMINATOR) => return Ok(count),
            Some(_) => {}
            None => return Err(count),
        }
        let Some(&length) = data.get(pos + 1) else {
            return Err(count);
        };
        if pos + POST_OVERHEAD + length as usize > data.len() {
            return Err(count);
        }
        count += 1;
        pos += length as usize + POST_OVERHEAD;
    }
}
