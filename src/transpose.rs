//! Row-major to column-major conversion

use crate::translation::TranslationTable;

/// Convert a row-major `source` (row stride `width`) into column-major `dest`
/// (column stride `height`), mapping each byte through `translation`.
///
/// Both buffers must hold exactly `width * height` bytes.
pub fn transpose(
    dest: &mut [u8],
    source: &[u8],
    width: usize,
    height: usize,
    translation: Option<&TranslationTable>,
) {
    debug_assert_eq!(dest.len(), width * height);
    debug_assert_eq!(source.len(), width * height);

    for (x, dest_column) in dest.chunks_exact_mut(height.max(1)).take(width).enumerate() {
        let source_column = source[x..].iter().step_by(width);
        match translation {
            Some(table) => {
                for (d, &s) in dest_column.iter_mut().zip(source_column) {
                    *d = table.get(s);
                }
            }
            None => {
                for (d, &s) in dest_column.iter_mut().zip(source_column) {
                    *d = s;
                }
            }
        }
    }
}
