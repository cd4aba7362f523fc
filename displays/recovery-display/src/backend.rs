//! Renderer trait
//!
//! Defines the interface the UI draws through.

/// Renderer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// No surface resource with that name
    MissingSurface,
    /// Surface resource exists but could not be decoded
    InvalidSurface,
    /// Surface table full
    TooManySurfaces,
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Menu and console text
    pub const TEXT: Color = Color::rgba(200, 200, 200, 255);
    /// Selected menu row text
    pub const HIGHLIGHT: Color = Color::rgba(255, 0, 0, 255);
    /// Dimming layer behind the text overlay
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 160);
}

/// Rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns true if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Handle to a loaded surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SurfaceId(pub u16);

/// Framebuffer renderer
///
/// Drawing goes to an off-screen buffer; [`Renderer::flip`] makes it
/// visible. Coordinates outside the screen are clipped.
pub trait Renderer {
    /// Screen width in pixels
    fn width(&self) -> u32;

    /// Screen height in pixels
    fn height(&self) -> u32;

    /// Fill a rectangle, blending by the color's alpha
    fn fill(&mut self, rect: Rect, color: Color);

    /// Copy the `src` region of a surface to (`x`, `y`)
    fn blit(&mut self, surface: SurfaceId, src: Rect, x: i32, y: i32);

    /// Draw one line of text with its top-left corner at (`x`, `y`)
    fn text(&mut self, x: i32, y: i32, text: &str, color: Color);

    /// Make the drawing buffer visible
    fn flip(&mut self);

    /// Size of a surface; (0, 0) for unknown handles
    fn surface_size(&self, surface: SurfaceId) -> (u32, u32);

    /// Raw pixels of the drawing buffer
    fn framebuffer(&self) -> &[u8];

    /// Bits per pixel of [`Renderer::framebuffer`]
    fn bits_per_pixel(&self) -> u32;

    /// Look up a named surface resource
    fn load_surface(&mut self, name: &str) -> Result<SurfaceId, RenderError>;
}
