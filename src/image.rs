/**
 * Render a question's image in the terminal with ANSI true-color blocks.
 */
use std::io;
use std::path::Path;

use image::GenericImageView;
use termimage::ops::{image_resized_size, resize_image, write_ansi_truecolor};


// Used when the terminal size cannot be determined, e.g. when output is piped.
const FALLBACK_SIZE: (usize, usize) = (80, 24);


/// Draw the image at `path` to `writer`, scaled to fit the terminal. Returns `false`
/// without writing anything if the file is missing or cannot be decoded.
pub fn render<W: io::Write>(writer: &mut W, path: &Path) -> bool {
    if !path.is_file() {
        log::debug!("no image at {}", path.display());
        return false;
    }

    // termimage's own loader panics on undecodable files, so decode here.
    let image = match image::open(path) {
        Ok(image) => image,
        Err(e) => {
            log::warn!("could not load image {} ({})", path.display(), e);
            return false;
        }
    };

    let (w, h) = term_size::dimensions().unwrap_or(FALLBACK_SIZE);
    let size = image_resized_size(image.dimensions(), (w as u32, h as u32), true);
    let resized = resize_image(&image, size);
    write_ansi_truecolor(writer, &resized);
    true
}
