//! Shared fixtures for integration tests

#![allow(dead_code)]

/// One post: (top delta, pixels)
pub type Post = (u8, Vec<u8>);

/// Encode a patch with the given columns of posts.
pub fn build_patch(height: i16, columns: &[Vec<Post>]) -> Vec<u8> {
    let width = columns.len();
    let mut data = Vec::new();
    data.extend_from_slice(&(width as i16).to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&0i16.to_le_bytes());
    data.extend_from_slice(&0i16.to_le_bytes());
    data.resize(8 + 4 * width, 0);

    for (i, posts) in columns.iter().enumerate() {
        let offset = data.len() as i32;
        data[8 + i * 4..12 + i * 4].copy_from_slice(&offset.to_le_bytes());
        for (top, pixels) in posts {
            data.push(*top);
            data.push(pixels.len() as u8);
            data.push(0);
            data.extend_from_slice(pixels);
            data.push(0);
        }
        data.push(0xFF);
    }
    data
}

/// A `width` x `height` patch whose every column is one full-height post of `fill`.
pub fn solid_patch(width: usize, height: u8, fill: u8) -> Vec<u8> {
    let columns: Vec<Vec<Post>> = (0..width)
        .map(|_| vec![(0, vec![fill; height as usize])])
        .collect();
    build_patch(height as i16, &columns)
}

/// A patch whose column `x` is one full-height post of value `x + 1`.
pub fn striped_patch(width: usize, height: u8) -> Vec<u8> {
    let columns: Vec<Vec<Post>> = (0..width)
        .map(|x| vec![(0, vec![x as u8 + 1; height as usize])])
        .collect();
    build_patch(height as i16, &columns)
}
