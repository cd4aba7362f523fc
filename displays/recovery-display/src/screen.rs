//! Screen composition
//!
//! Paints the UI state onto a [`Renderer`]. Callers flip the renderer
//! once they are done drawing.
//!
//! Full redraw order:
//! 1. black fill and the centered background icon
//! 2. progress bar
//! 3. with the text overlay shown: dimming layer, menu, console lines

use recovery_core::console::TextLog;
use recovery_core::menu::{Control, Menu, MenuGeometry};
use recovery_core::progress::{Progress, ProgressMode, INDETERMINATE_FRAMES};

use crate::assets::{Background, IconSet, MenuIcon};
use crate::backend::{Color, Rect, Renderer, SurfaceId};

/// Fallback colors when artwork is missing
const BAR_EMPTY: Color = Color::rgba(60, 60, 60, 255);
const BAR_FILL: Color = Color::rgba(40, 140, 220, 255);
const BUTTON: Color = Color::rgba(50, 50, 50, 255);
const BUTTON_SELECTED: Color = Color::rgba(90, 30, 30, 255);

/// Fallback progress bar height
const BAR_HEIGHT: u32 = 16;

/// Everything a full redraw needs
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub background: Background,
    pub progress: &'a Progress,
    pub show_text: bool,
    pub menu: Option<&'a Menu>,
    pub log: &'a TextLog,
}

/// Draws scenes with a loaded icon set
#[derive(Debug, Clone)]
pub struct Compositor {
    icons: IconSet,
    /// Console line height in pixels
    line_height: i32,
}

impl Compositor {
    pub fn new(icons: IconSet, line_height: i32) -> Self {
        Self {
            icons,
            line_height: line_height.max(1),
        }
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    /// Progress bar size: the empty bar art, or half the screen wide
    pub fn bar_size<R: Renderer + ?Sized>(&self, renderer: &R) -> (u32, u32) {
        match self.icons.progress_empty() {
            Some(id) => renderer.surface_size(id),
            None => (renderer.width() / 2, BAR_HEIGHT),
        }
    }

    /// Top-left corner of the progress bar
    pub fn bar_origin<R: Renderer + ?Sized>(&self, renderer: &R) -> (i32, i32) {
        let (bar_width, bar_height) = self.bar_size(renderer);
        let icon_height = self
            .icons
            .background(Background::Installing)
            .map_or(0, |id| renderer.surface_size(id).1);

        let width = renderer.width() as i32;
        let height = renderer.height() as i32;
        (
            (width - bar_width as i32) / 2,
            (3 * height + icon_height as i32 - 2 * bar_height as i32) / 4,
        )
    }

    /// Repaint everything
    pub fn draw_screen<R: Renderer + ?Sized>(&self, renderer: &mut R, scene: &Scene<'_>) {
        self.draw_background(renderer, scene.background);
        self.draw_progress(renderer, scene.progress);

        if !scene.show_text {
            return;
        }

        let full = Rect::new(0, 0, renderer.width(), renderer.height());
        renderer.fill(full, Color::OVERLAY);

        let (top, bottom) = match scene.menu {
            Some(menu) => {
                let top = self.draw_menu(renderer, menu);
                (top, menu.geometry().height - menu.geometry().strip_height)
            }
            None => (0, renderer.height() as i32),
        };
        self.draw_log(renderer, scene.log, top, bottom);
    }

    /// Black screen with the background icon centered
    pub fn draw_background<R: Renderer + ?Sized>(&self, renderer: &mut R, background: Background) {
        let full = Rect::new(0, 0, renderer.width(), renderer.height());
        renderer.fill(full, Color::BLACK);

        if let Some(id) = self.icons.background(background) {
            let (w, h) = renderer.surface_size(id);
            let x = (renderer.width() as i32 - w as i32) / 2;
            let y = (renderer.height() as i32 - h as i32) / 2;
            renderer.blit(id, Rect::new(0, 0, w, h), x, y);
        }
    }

    /// Paint the progress bar region only
    pub fn draw_progress<R: Renderer + ?Sized>(&self, renderer: &mut R, progress: &Progress) {
        let (bar_width, bar_height) = self.bar_size(renderer);
        let (x, y) = self.bar_origin(renderer);

        match progress.mode() {
            ProgressMode::None => {}
            ProgressMode::Determinate => {
                let fill = progress.fill_width(bar_width).min(bar_width);
                let rest = bar_width - fill;
                match self.icons.progress_fill() {
                    Some(id) if fill > 0 => renderer.blit(id, Rect::new(0, 0, fill, bar_height), x, y),
                    None if fill > 0 => renderer.fill(Rect::new(x, y, fill, bar_height), BAR_FILL),
                    _ => {}
                }
                let rest_x = x + fill as i32;
                match self.icons.progress_empty() {
                    Some(id) if rest > 0 => {
                        renderer.blit(id, Rect::new(fill as i32, 0, rest, bar_height), rest_x, y)
                    }
                    None if rest > 0 => renderer.fill(Rect::new(rest_x, y, rest, bar_height), BAR_EMPTY),
                    _ => {}
                }
            }
            ProgressMode::Indeterminate => match self.icons.indeterminate(progress.frame()) {
                Some(id) => blit_whole(renderer, id, x, y),
                None => {
                    // A block sliding across the empty bar
                    let block = bar_width / INDETERMINATE_FRAMES as u32;
                    let offset = (progress.frame() as u32 * block) as i32;
                    renderer.fill(Rect::new(x, y, bar_width, bar_height), BAR_EMPTY);
                    renderer.fill(Rect::new(x + offset, y, block, bar_height), BAR_FILL);
                }
            },
        }
    }

    /// Draw a menu; returns the first free y below it
    fn draw_menu<R: Renderer + ?Sized>(&self, renderer: &mut R, menu: &Menu) -> i32 {
        let geometry = menu.geometry();

        for control in Control::ALL {
            self.draw_control(renderer, geometry, control, menu.pressed_control() == Some(control));
        }

        let headers = menu.headers();
        if !headers.is_empty() {
            if let Some(id) = self.icons.menu_icon(MenuIcon::TitleBackdrop) {
                blit_whole(renderer, id, 0, 0);
            }
        }
        for (i, header) in headers.iter().enumerate() {
            renderer.text(0, i as i32 * geometry.char_height, header, Color::TEXT);
        }

        let start = menu.window_start();
        let page_rows = menu.page_rows();
        for (index, row) in menu.rows().iter().skip(start).take(page_rows).enumerate() {
            let selected = start + index == menu.selection();
            let left = geometry.column_of(index) % 2 == 0;
            let icon = match (left, selected) {
                (true, false) => MenuIcon::ButtonLeft,
                (true, true) => MenuIcon::ButtonLeftSelected,
                (false, false) => MenuIcon::ButtonRight,
                (false, true) => MenuIcon::ButtonRightSelected,
            };
            let (x, y) = geometry.button_origin(index, headers.len());
            let fallback = if selected { BUTTON_SELECTED } else { BUTTON };
            self.draw_button(renderer, geometry, icon, fallback, x, y);

            let color = if selected { Color::HIGHLIGHT } else { Color::TEXT };
            let text_x = x + geometry.char_width;
            let middle = y + geometry.button_height / 2;
            match &row.continuation {
                Some(rest) => {
                    renderer.text(text_x, middle - geometry.char_height, &row.text, color);
                    renderer.text(text_x, middle, rest, color);
                }
                None => renderer.text(text_x, middle - geometry.char_height / 2, &row.text, color),
            }
        }

        if menu.has_more_below() {
            let left = geometry.column_of(page_rows) % 2 == 0;
            let icon = if left {
                MenuIcon::ButtonLeftLowerHalf
            } else {
                MenuIcon::ButtonRightLowerHalf
            };
            let (x, y) = geometry.button_origin(page_rows, headers.len());
            if let Some(id) = self.icons.menu_icon(icon) {
                blit_whole(renderer, id, x, y);
            }
        }

        if menu.has_more_above() {
            if let Some(id) = self.icons.menu_icon(MenuIcon::ButtonRightHalf) {
                let x = renderer.width() as i32 - renderer.surface_size(id).0 as i32;
                blit_whole(renderer, id, x, geometry.header_offset(headers.len()));
            }
        }

        let top = geometry.header_offset(headers.len());
        if page_rows == 0 {
            top
        } else {
            top + (page_rows as i32 - 1) * geometry.row_height + geometry.button_height
        }
    }

    fn draw_control<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        geometry: &MenuGeometry,
        control: Control,
        pressed: bool,
    ) {
        let icon = match (control, pressed) {
            (Control::Back, false) => MenuIcon::Back,
            (Control::Down, false) => MenuIcon::Down,
            (Control::Up, false) => MenuIcon::Up,
            (Control::Select, false) => MenuIcon::Select,
            (Control::Back, true) => MenuIcon::BackPressed,
            (Control::Down, true) => MenuIcon::DownPressed,
            (Control::Up, true) => MenuIcon::UpPressed,
            (Control::Select, true) => MenuIcon::SelectPressed,
        };
        let (cx, cy) = geometry.control_center(control);

        match self.icons.menu_icon(icon) {
            Some(id) => {
                let (w, h) = renderer.surface_size(id);
                renderer.blit(id, Rect::new(0, 0, w, h), cx - w as i32 / 2, cy - h as i32 / 2);
            }
            None => {
                let label = match control {
                    Control::Back => "Back",
                    Control::Down => "Down",
                    Control::Up => "Up",
                    Control::Select => "Select",
                };
                let x = cx - label.len() as i32 * geometry.char_width / 2;
                let color = if pressed { Color::HIGHLIGHT } else { Color::TEXT };
                renderer.text(x, cy - geometry.char_height / 2, label, color);
            }
        }
    }

    fn draw_button<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        geometry: &MenuGeometry,
        icon: MenuIcon,
        fallback: Color,
        x: i32,
        y: i32,
    ) {
        match self.icons.menu_icon(icon) {
            Some(id) => blit_whole(renderer, id, x, y),
            None => {
                let width = (geometry.width / geometry.columns).max(0) as u32;
                let height = geometry.button_height.max(0) as u32;
                renderer.fill(Rect::new(x, y, width, height), fallback);
            }
        }
    }

    /// Draw the newest console lines that fit between `top` and `bottom`
    fn draw_log<R: Renderer + ?Sized>(&self, renderer: &mut R, log: &TextLog, top: i32, bottom: i32) {
        let fit = ((bottom - top).max(0) / self.line_height) as usize;
        let skip = log.rows().saturating_sub(fit);

        for (i, line) in log.lines().skip(skip).enumerate() {
            if !line.is_empty() {
                renderer.text(0, top + i as i32 * self.line_height, line, Color::TEXT);
            }
        }
    }
}

fn blit_whole<R: Renderer + ?Sized>(renderer: &mut R, id: SurfaceId, x: i32, y: i32) {
    let (w, h) = renderer.surface_size(id);
    renderer.blit(id, Rect::new(0, 0, w, h), x, y);
}
