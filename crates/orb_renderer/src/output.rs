//! 8-bit RGB image buffer and file output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::RenderResult;

/// Row-major RGB8 image, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Write as plain-text PPM: a `P3` header, then one `r g b` triple per
    /// line, top row first.
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for [r, g, b] in &self.pixels {
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        writer.flush()
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| Rgb(self.get(x, y)))
    }

    /// Save to `path`. `.ppm` files use the plain-text writer, anything else
    /// is encoded by the `image` crate based on the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            self.write_ppm(BufWriter::new(File::create(path)?))?;
        } else {
            self.to_rgb_image().save(path)?;
        }

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, [255, 0, 0]);
        image.set(1, 0, [0, 255, 0]);
        image.set(0, 1, [0, 0, 255]);
        image.set(1, 1, [10, 20, 30]);
        image
    }

    #[test]
    fn test_new_is_black() {
        let image = ImageBuffer::new(3, 2);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.get(2, 1), [0, 0, 0]);
    }

    #[test]
    fn test_index_does_not_wrap_in_u32() {
        // The last row starts past u32::MAX
        let image = ImageBuffer {
            width: 70_000,
            height: 61_360,
            pixels: Vec::new(),
        };
        assert_eq!(image.index(5, 0), 5);
        assert_eq!(image.index(0, 61_359), 61_359 * 70_000);
    }

    #[test]
    fn test_write_ppm() {
        let mut bytes = Vec::new();
        checker().write_ppm(&mut bytes).unwrap();

        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "P3\n2 2\n255\n255 0 0\n0 255 0\n0 0 255\n10 20 30\n");
    }

    #[test]
    fn test_to_rgb_image() {
        let rgb = checker().to_rgb_image();
        assert_eq!(rgb.dimensions(), (2, 2));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([0, 255, 0]));
        assert_eq!(rgb.get_pixel(1, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_save_ppm_and_png() {
        let dir = std::env::temp_dir().join(format!("orb_output_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let ppm = dir.join("checker.ppm");
        checker().save(&ppm).unwrap();
        let text = std::fs::read_to_string(&ppm).unwrap();
        assert!(text.starts_with("P3\n2 2\n255\n"));

        let png = dir.join("checker.png");
        checker().save(&png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded, checker().to_rgb_image());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_unknown_extension_fails() {
        let path = std::env::temp_dir().join("orb_output_test.notanimage");
        assert!(checker().save(&path).is_err());
    }
}
