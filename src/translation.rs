//! Palette index translation tables
//!
//! A translation table remaps every palette index (old -> new) while a
//! texture is decoded, e.g. to recolor a sprite. Loaders only borrow a table.

use thiserror::Error;

/// Error building a translation table from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("translation table must be 256 bytes, got {0}")]
    InvalidLength(usize),
}

/// A 256-entry palette index lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTable([u8; 256]);

impl TranslationTable {
    /// The table that maps every index to itself.
    pub fn identity() -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        Self(table)
    }

    /// Build a table from exactly 256 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TranslationError> {
        let table: [u8; 256] = bytes
            .try_into()
            .map_err(|_| TranslationError::InvalidLength(bytes.len()))?;
        Ok(Self(table))
    }

    /// Remap a contiguous range of indices onto another range, the way
    /// player color ramps are built.
    pub fn with_range(mut self, from: std::ops::RangeInclusive<u8>, to_start: u8) -> Self {
        for (i, index) in from.enumerate() {
            self.0[index as usize] = to_start.wrapping_add(i as u8);
        }
        self
    }

    #[inline]
    pub fn get(&self, index: u8) -> u8 {
        self.0[index as usize]
    }

    pub fn as_bytes(&self) -> &[u8; 256] {
        &self.0
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::identity()
    }
}

/// Copy `source` into `dest`, mapping each byte through `translation` when present.
#[inline]
pub(crate) fn copy_translated(dest: &mut [u8], source: &[u8], translation: Option<&TranslationTable>) {
    match translation {
        Some(table) => {
            for (d, &s) in dest.iter_mut().zip(source) {
                *d = table.get(s);
            }
        }
        None => dest.copy_from_slice(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let table = TranslationTable::identity();
        assert_eq!(table.get(0), 0);
        assert_eq!(table.get(200), 200);
        assert_eq!(table.get(255), 255);
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        assert_eq!(
            TranslationTable::from_bytes(&[0; 10]),
            Err(TranslationError::InvalidLength(10))
        );
    }

    #[test]
    fn test_with_range() {
        let table = TranslationTable::identity().with_range(112..=127, 96);
        assert_eq!(table.get(112), 96);
        assert_eq!(table.get(127), 111);
        assert_eq!(table.get(128), 128);
    }

    #[test]
    fn test_copy_translated() {
        let table = TranslationTable::identity().with_range(1..=1, 50);
        let mut dest = [0u8; 3];
        copy_translated(&mut dest, &[1, 2, 1], Some(&table));
        assert_eq!(dest, [50, 2, 50]);
        copy_translated(&mut dest, &[4, 5, 6], None);
        assert_eq!(dest, [4, 5, 6]);
    }
}
