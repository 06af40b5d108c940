//! Presentation helpers: turn swapped-out color buffers into displayable
//! or saveable pixels.

use std::path::Path;

/// Convert packed `0x00RRGGBB` pixels to RGBA8 bytes; the high byte is
/// ignored and alpha is always 255.
pub fn to_rgba8(pixels: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * 4);
    for &p in pixels {
        out.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8, 255]);
    }
    out
}

/// Build an RGB image from a color buffer, `None` if the sizes disagree
pub fn to_image(pixels: &[u32], width: usize, height: usize) -> Option<image::RgbImage> {
    let rgb: Vec<u8> = pixels
        .iter()
        .flat_map(|&p| [(p >> 16) as u8, (p >> 8) as u8, p as u8])
        .collect();
    image::RgbImage::from_raw(width as u32, height as u32, rgb)
}

/// Save a color buffer as an image, format picked from the extension
pub fn save_png<P: AsRef<Path>>(path: P, pixels: &[u32], width: usize, height: usize) -> Result<(), String> {
    let path = path.as_ref();
    let img = to_image(pixels, width, height)
        .ok_or_else(|| format!("{} pixels do not make a {}x{} image", pixels.len(), width, height))?;
    img.save(path)
        .map_err(|e| format!("Failed to save {}: {}", path.display(), e))?;
    log::info!("Saved {}", path.display());
    Ok(())
}
