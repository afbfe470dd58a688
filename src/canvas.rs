use std::io;
use std::io::Write;
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer: one linear-light
/// color per screen coordinate. Colors stay unclamped in memory; clamping
/// (and scaling to a byte per channel) happens on the way out to an image
/// file.
///
/// PPM and PNG output are supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new canvas with specified width and height, all black.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Saves a canvas to a PPM file.
    ///
    /// Lines in the PPM file are clamped to 70 columns. If some color
    /// exceeds the 70 column mark on a line, it is moved to the next line.
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = File::create(path)?;

        // PPM header: magic, dimensions, maximum channel value
        writeln!(&mut out, "P3")?;
        writeln!(&mut out, "{} {}", self.width, self.height)?;
        writeln!(&mut out, "255")?;

        let mut col = 1;
        for pixel in self.pixels.iter() {
            let (r, g, b) = Self::quantize(pixel);
            let r_str = r.to_string();
            let g_str = g.to_string();
            let b_str = b.to_string();

            // Check if any color surpasses the 70 column marker
            if col + r_str.len() > 70 {
                write!(&mut out, "\n{} {} {}", r_str, g_str, b_str)?;
                col = r_str.len() + g_str.len() + b_str.len() + 3;
            } else if col + r_str.len() + g_str.len() > 70 {
                write!(&mut out, " {}\n{} {}", r_str, g_str, b_str)?;
                col = g_str.len() + b_str.len() + 2;
            } else if col + r_str.len() + g_str.len() + b_str.len() > 70 {
                write!(&mut out, " {} {}\n{}", r_str, g_str, b_str)?;
                col = b_str.len() + 1;
            // Otherwise, write colors as normal
            } else {
                if col != 1 {
                    write!(&mut out, " ")?;
                    col += 1;
                }

                write!(&mut out, "{} {} {}", r_str, g_str, b_str)?;
                col += r_str.len() + g_str.len() + b_str.len() + 2;
            }
        }

        write!(&mut out, "\n")?;

        Ok(())
    }

    /// Saves a canvas to a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        let mut out = image::RgbImage::new(self.width as u32, self.height as u32);

        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let color = self.pixels[(y as usize * self.width) + x as usize];
            let (r, g, b) = Self::quantize(&color);
            *pixel = image::Rgb([r as u8, g as u8, b as u8]);
        }

        out.save(path)
    }

    /// Clamps a linear color into one byte per channel.
    fn quantize(pixel: &Color) -> (usize, usize, usize) {
        let r = (pixel.r * 255.0).clamp(0.0, 255.0).ceil() as usize;
        let g = (pixel.g * 255.0).clamp(0.0, 255.0).ceil() as usize;
        let b = (pixel.b * 255.0).clamp(0.0, 255.0).ceil() as usize;

        (r, g, b)
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column.
    /// Rows and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use prism_tracer::color::Color;
    /// # use prism_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// Returns `None` if the location is out of bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

/* Tests */

#[test]
fn new_canvas_is_black() {
    let canvas = Canvas::new(4, 4);

    assert_eq!(canvas.read_pixel(0, 0).unwrap(), Color::black());
    assert_eq!(canvas.read_pixel(3, 3).unwrap(), Color::black());
}

#[test]
fn write_and_read_pixel() {
    let red = Color::red();
    let mut canvas = Canvas::new(8, 8);

    canvas.write_pixel(2, 3, &red);
    assert_eq!(canvas.read_pixel(2, 3).unwrap(), red);
}

#[test]
fn out_of_bounds_writes_ignored() {
    let mut canvas = Canvas::new(2, 2);
    let before = canvas.clone();

    canvas.write_pixel(2, 0, &Color::white());
    canvas.write_pixel(0, 2, &Color::white());

    assert_eq!(canvas, before);
    assert_eq!(canvas.read_pixel(2, 0), None);
}

#[test]
fn ppm_header_and_clamping() {
    let mut canvas = Canvas::new(2, 1);
    // out-of-range components clamp at the file boundary
    canvas.write_pixel(0, 0, &Color::rgb(2.0, 0.0, -1.0));

    let path = std::env::temp_dir().join("prism_tracer_canvas_test.ppm");
    canvas.save_ppm(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("P3\n2 1\n255\n"));
    assert!(text.contains("255 0 0"));

    std::fs::remove_file(&path).unwrap();
}
