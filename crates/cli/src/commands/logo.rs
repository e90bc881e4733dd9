//! Loading-screen logo filter.
//!
//! The store logo sits on a near-black background; the loading screen
//! needs it floating on transparency. One pass over the pixels: anything
//! with all three color channels under the threshold becomes fully
//! transparent, everything else fully opaque (discarding any partial
//! transparency the source had). Color channels are never touched.

use std::path::Path;

use image::RgbaImage;

/// Channel threshold below which a pixel counts as background.
pub const NEAR_BLACK_THRESHOLD: u8 = 35;

/// Errors from the logo command.
#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Rewrite near-black pixels as fully transparent, in place.
pub fn strip_near_black(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let background =
            r < NEAR_BLACK_THRESHOLD && g < NEAR_BLACK_THRESHOLD && b < NEAR_BLACK_THRESHOLD;
        pixel.0[3] = if background { 0 } else { 255 };
    }
}

/// Read `input`, strip the background, write `output`.
///
/// # Errors
///
/// Returns [`LogoError`] if decoding or encoding fails.
pub fn run(input: &Path, output: &Path) -> Result<(), LogoError> {
    let mut image = image::open(input)?.to_rgba8();

    strip_near_black(&mut image);
    image.save(output)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        "transparent loading logo created"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgba;

    fn image_of(pixels: &[[u8; 4]]) -> RgbaImage {
        let mut image = RgbaImage::new(pixels.len() as u32, 1);
        for (x, raw) in pixels.iter().enumerate() {
            image.put_pixel(x as u32, 0, Rgba(*raw));
        }
        image
    }

    #[test]
    fn near_black_pixels_become_transparent() {
        let mut image = image_of(&[[10, 5, 20, 255]]);
        strip_near_black(&mut image);
        assert_eq!(image.get_pixel(0, 0).0, [10, 5, 20, 0]);
    }

    #[test]
    fn other_pixels_become_fully_opaque() {
        // Pre-existing partial transparency is discarded.
        let mut image = image_of(&[[200, 50, 10, 128]]);
        strip_near_black(&mut image);
        assert_eq!(image.get_pixel(0, 0).0, [200, 50, 10, 255]);
    }

    #[test]
    fn all_channels_must_be_under_the_threshold() {
        // One channel at the threshold keeps the pixel opaque.
        let mut image = image_of(&[[34, 34, 34, 0], [35, 34, 34, 0]]);
        strip_near_black(&mut image);
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        assert_eq!(image.get_pixel(1, 0).0[3], 255);
    }

    #[test]
    fn color_channels_are_untouched() {
        let mut image = image_of(&[[10, 5, 20, 255], [200, 50, 10, 255]]);
        strip_near_black(&mut image);
        assert_eq!(image.get_pixel(0, 0).0, [10, 5, 20, 0]);
        assert_eq!(image.get_pixel(1, 0).0, [200, 50, 10, 255]);
    }
}
