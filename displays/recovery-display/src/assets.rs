//! Named surfaces
//!
//! Every picture the UI draws is a named surface resource looked up once
//! at initialization. A missing resource leaves its slot empty.

use heapless::Vec;

use crate::backend::{Renderer, SurfaceId};

/// Background icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Background {
    #[default]
    None,
    Installing,
    Error,
    Clockwork,
    FirmwareInstalling,
    FirmwareError,
}

impl Background {
    fn slot(self) -> Option<usize> {
        match self {
            Background::None => None,
            Background::Installing => Some(0),
            Background::Error => Some(1),
            Background::Clockwork => Some(2),
            Background::FirmwareInstalling => Some(3),
            Background::FirmwareError => Some(4),
        }
    }
}

/// Menu artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuIcon {
    Back,
    Down,
    Up,
    Select,
    BackPressed,
    DownPressed,
    UpPressed,
    SelectPressed,
    ButtonLeft,
    ButtonLeftSelected,
    ButtonRight,
    ButtonRightSelected,
    /// Hint that a left item follows below the page
    ButtonLeftLowerHalf,
    /// Hint that a right item follows below the page
    ButtonRightLowerHalf,
    /// Hint that items precede the page
    ButtonRightHalf,
    TitleBackdrop,
}

const BACKGROUND_NAMES: [&str; 5] = [
    "icon_installing",
    "icon_error",
    "icon_clockwork",
    "icon_firmware_install",
    "icon_firmware_error",
];

const MENU_ICON_NAMES: [&str; 16] = [
    "icon_back",
    "icon_down",
    "icon_up",
    "icon_select",
    "icon_backM",
    "icon_downM",
    "icon_upM",
    "icon_selectM",
    "button_L",
    "button_L_sel",
    "button_R",
    "button_R_sel",
    "button_L_Lowhalf",
    "button_R_Lowhalf",
    "button_R_half",
    "menu_title_bgk",
];

const INDETERMINATE_NAMES: [&str; 6] = [
    "indeterminate1",
    "indeterminate2",
    "indeterminate3",
    "indeterminate4",
    "indeterminate5",
    "indeterminate6",
];

const PROGRESS_EMPTY: &str = "progress_empty";
const PROGRESS_FILL: &str = "progress_fill";

/// Total number of named surfaces
pub const SURFACE_COUNT: usize =
    BACKGROUND_NAMES.len() + MENU_ICON_NAMES.len() + INDETERMINATE_NAMES.len() + 2;

/// Names of surfaces that failed to load
pub type MissingSurfaces = Vec<&'static str, SURFACE_COUNT>;

/// Loaded surface handles
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    backgrounds: [Option<SurfaceId>; 5],
    menu: [Option<SurfaceId>; 16],
    indeterminate: [Option<SurfaceId>; 6],
    progress_empty: Option<SurfaceId>,
    progress_fill: Option<SurfaceId>,
}

impl IconSet {
    /// An icon set with every slot empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up every named surface
    ///
    /// Returns the icon set and the names that could not be loaded.
    pub fn load<R: Renderer + ?Sized>(renderer: &mut R) -> (Self, MissingSurfaces) {
        let mut missing = MissingSurfaces::new();
        let mut load = |name: &'static str| match renderer.load_surface(name) {
            Ok(id) => Some(id),
            Err(_) => {
                let _ = missing.push(name);
                None
            }
        };

        let icons = Self {
            backgrounds: BACKGROUND_NAMES.map(&mut load),
            menu: MENU_ICON_NAMES.map(&mut load),
            indeterminate: INDETERMINATE_NAMES.map(&mut load),
            progress_empty: load(PROGRESS_EMPTY),
            progress_fill: load(PROGRESS_FILL),
        };
        (icons, missing)
    }

    pub fn background(&self, background: Background) -> Option<SurfaceId> {
        background.slot().and_then(|slot| self.backgrounds[slot])
    }

    pub fn menu_icon(&self, icon: MenuIcon) -> Option<SurfaceId> {
        self.menu[icon as usize]
    }

    /// Indeterminate animation frame, wrapping past the last one
    pub fn indeterminate(&self, frame: u8) -> Option<SurfaceId> {
        self.indeterminate[frame as usize % INDETERMINATE_NAMES.len()]
    }

    pub fn progress_empty(&self) -> Option<SurfaceId> {
        self.progress_empty
    }

    pub fn progress_fill(&self) -> Option<SurfaceId> {
        self.progress_fill
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Color, Rect, RenderError};

    /// Renderer that knows a fixed list of surface names
    struct Catalog {
        names: &'static [&'static str],
    }

    impl Renderer for Catalog {
        fn width(&self) -> u32 {
            0
        }
        fn height(&self) -> u32 {
            0
        }
        fn fill(&mut self, _: Rect, _: Color) {}
        fn blit(&mut self, _: SurfaceId, _: Rect, _: i32, _: i32) {}
        fn text(&mut self, _: i32, _: i32, _: &str, _: Color) {}
        fn flip(&mut self) {}
        fn surface_size(&self, _: SurfaceId) -> (u32, u32) {
            (0, 0)
        }
        fn framebuffer(&self) -> &[u8] {
            &[]
        }
        fn bits_per_pixel(&self) -> u32 {
            32
        }
        fn load_surface(&mut self, name: &str) -> Result<SurfaceId, RenderError> {
            self.names
                .iter()
                .position(|&known| known == name)
                .map(|index| SurfaceId(index as u16))
                .ok_or(RenderError::MissingSurface)
        }
    }

    #[test]
    fn test_missing_surfaces_reported() {
        let mut renderer = Catalog {
            names: &["icon_error", "button_R_sel", "indeterminate3", "progress_fill"],
        };
        let (icons, missing) = IconSet::load(&mut renderer);

        assert_eq!(missing.len(), SURFACE_COUNT - 4);
        assert!(missing.contains(&"icon_installing"));
        assert!(!missing.contains(&"icon_error"));

        assert_eq!(icons.background(Background::Error), Some(SurfaceId(0)));
        assert_eq!(icons.background(Background::Installing), None);
        assert_eq!(icons.background(Background::None), None);
        assert_eq!(icons.menu_icon(MenuIcon::ButtonRightSelected), Some(SurfaceId(1)));
        assert_eq!(icons.indeterminate(2), Some(SurfaceId(2)));
        assert_eq!(icons.indeterminate(8), Some(SurfaceId(2)));
        assert_eq!(icons.progress_fill(), Some(SurfaceId(3)));
        assert_eq!(icons.progress_empty(), None);
    }

    #[test]
    fn test_menu_icon_names_line_up() {
        assert_eq!(MENU_ICON_NAMES[MenuIcon::SelectPressed as usize], "icon_selectM");
        assert_eq!(MENU_ICON_NAMES[MenuIcon::ButtonRightHalf as usize], "button_R_half");
        assert_eq!(MENU_ICON_NAMES[MenuIcon::TitleBackdrop as usize], "menu_title_bgk");
    }
}
