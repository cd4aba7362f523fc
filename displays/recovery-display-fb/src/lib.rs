//! In-memory framebuffer renderer
//!
//! Two RGBA8888 pages: all drawing goes to the back page, [`Renderer::flip`]
//! copies it to the front page. Surfaces are registered by name up front
//! and looked up with [`Renderer::load_surface`].
//!
//! Used by the simulator binary and by tests; a device port swaps it for
//! a renderer over the kernel framebuffer.

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::{Rgb888, RgbColor},
    prelude::{DrawTarget, OriginDimensions, Pixel, Point, Size},
    text::{Baseline, Text},
    Drawable,
};
use recovery_display::{Color, Rect, RenderError, Renderer, SurfaceId};

/// Bytes per RGBA8888 pixel
const BYTES_PER_PIXEL: usize = 4;

/// Named RGBA8888 picture
#[derive(Debug, Clone, Default)]
struct Surface {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Double-buffered RGBA8888 framebuffer
#[derive(Debug, Clone)]
pub struct FbRenderer {
    width: u32,
    height: u32,
    back: Vec<u8>,
    front: Vec<u8>,
    surfaces: Vec<Surface>,
    flips: u32,
}

impl FbRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            back: vec![0; len],
            front: vec![0; len],
            surfaces: Vec::new(),
            flips: 0,
        }
    }

    /// Register a named RGBA8888 surface
    ///
    /// Re-registering a name replaces its pixels and keeps its handle.
    pub fn register_surface(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<SurfaceId, RenderError> {
        if pixels.len() != width as usize * height as usize * BYTES_PER_PIXEL {
            return Err(RenderError::InvalidSurface);
        }
        let surface = Surface {
            name: name.to_owned(),
            width,
            height,
            pixels,
        };

        if let Some(index) = self.surfaces.iter().position(|s| s.name == name) {
            self.surfaces[index] = surface;
            return Ok(SurfaceId(index as u16));
        }
        let id = u16::try_from(self.surfaces.len()).map_err(|_| RenderError::TooManySurfaces)?;
        self.surfaces.push(surface);
        Ok(SurfaceId(id))
    }

    /// Register a surface filled with one color
    pub fn register_solid(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        color: Color,
    ) -> Result<SurfaceId, RenderError> {
        let pixels = [color.r, color.g, color.b, color.a].repeat(width as usize * height as usize);
        self.register_surface(name, width, height, pixels)
    }

    /// Pixel of the back page
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.offset(x as i32, y as i32).map(|i| {
            let p = &self.back[i..i + BYTES_PER_PIXEL];
            Color::rgba(p[0], p[1], p[2], p[3])
        })
    }

    /// The visible page
    pub fn front(&self) -> &[u8] {
        &self.front
    }

    /// Number of flips so far
    pub fn flips(&self) -> u32 {
        self.flips
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    fn blend(&mut self, x: i32, y: i32, color: Color) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        let alpha = color.a as u32;
        let pixel = &mut self.back[i..i + BYTES_PER_PIXEL];
        for (channel, value) in pixel.iter_mut().zip([color.r, color.g, color.b]) {
            *channel = ((value as u32 * alpha + *channel as u32 * (255 - alpha)) / 255) as u8;
        }
        pixel[3] = 255;
    }
}

impl Renderer for FbRenderer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill(&mut self, rect: Rect, color: Color) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.w as i32).min(self.width as i32);
        let y1 = (rect.y + rect.h as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn blit(&mut self, surface: SurfaceId, src: Rect, x: i32, y: i32) {
        let index = surface.0 as usize;
        if index >= self.surfaces.len() {
            return;
        }
        // Move the surface out to borrow the back page mutably
        let picture = std::mem::take(&mut self.surfaces[index]);

        let sx0 = src.x.max(0);
        let sy0 = src.y.max(0);
        let sx1 = (src.x + src.w as i32).min(picture.width as i32);
        let sy1 = (src.y + src.h as i32).min(picture.height as i32);
        for sy in sy0..sy1 {
            for sx in sx0..sx1 {
                let i = (sy as usize * picture.width as usize + sx as usize) * BYTES_PER_PIXEL;
                let p = &picture.pixels[i..i + BYTES_PER_PIXEL];
                self.blend(x + sx - src.x, y + sy - src.y, Color::rgba(p[0], p[1], p[2], p[3]));
            }
        }

        self.surfaces[index] = picture;
    }

    fn text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let style = MonoTextStyle::new(&FONT_10X20, Rgb888::new(color.r, color.g, color.b));
        let mut canvas = Canvas { fb: self, alpha: color.a };
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut canvas);
    }

    fn flip(&mut self) {
        self.front.copy_from_slice(&self.back);
        self.flips += 1;
    }

    fn surface_size(&self, surface: SurfaceId) -> (u32, u32) {
        self.surfaces
            .get(surface.0 as usize)
            .map_or((0, 0), |s| (s.width, s.height))
    }

    fn framebuffer(&self) -> &[u8] {
        &self.back
    }

    fn bits_per_pixel(&self) -> u32 {
        (BYTES_PER_PIXEL * 8) as u32
    }

    fn load_surface(&mut self, name: &str) -> Result<SurfaceId, RenderError> {
        self.surfaces
            .iter()
            .position(|s| s.name == name)
            .map(|index| SurfaceId(index as u16))
            .ok_or(RenderError::MissingSurface)
    }
}

/// `DrawTarget` view of the back page for text rasterization
struct Canvas<'a> {
    fb: &'a mut FbRenderer,
    alpha: u8,
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.fb.width, self.fb.height)
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let color = Color::rgba(color.r(), color.g(), color.b(), self.alpha);
            self.fb.blend(point.x, point.y, color);
        }
        Ok(())
    }
}
