//! Core types for spark-folio.
//!
//! These types flow between the section registry, the active-section
//! resolver, the scroll controller and whatever host renders the page.

use std::borrow::Borrow;
use std::fmt;

// =============================================================================
// Section Identity
// =============================================================================

/// Identifier of a page section ("home", "about", "works", ...).
///
/// Unique among currently registered sections and stable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Vertical extent of a section, relative to the top of the viewport.
///
/// Negative `top` means the section starts above the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionBounds {
    pub top: f32,
    pub height: f32,
}

impl SectionBounds {
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Size of the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The central horizontal band of the viewport used as the visibility
/// threshold.
///
/// Margins are insets expressed as fractions of the viewport height:
/// the default band starts 20% below the top edge and ends 60% above the
/// bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBand {
    pub top_inset: f32,
    pub bottom_inset: f32,
}

impl Default for ViewportBand {
    fn default() -> Self {
        Self {
            top_inset: 0.2,
            bottom_inset: 0.6,
        }
    }
}

impl ViewportBand {
    /// Build a band from percentage insets (`20.0` = 20%).
    pub fn from_percent(top: f32, bottom: f32) -> Self {
        Self {
            top_inset: top / 100.0,
            bottom_inset: bottom / 100.0,
        }
    }

    /// Band edges `(top, bottom)` in viewport coordinates.
    pub fn edges(&self, viewport: Viewport) -> (f32, f32) {
        let top = viewport.height * self.top_inset;
        let bottom = viewport.height * (1.0 - self.bottom_inset);
        (top, bottom)
    }

    /// Whether a section currently intersects the band.
    pub fn intersects(&self, bounds: SectionBounds, viewport: Viewport) -> bool {
        let (band_top, band_bottom) = self.edges(viewport);
        if band_bottom <= band_top {
            return false;
        }
        bounds.top < band_bottom && bounds.bottom() > band_top
    }
}

// =============================================================================
// Events
// =============================================================================

/// One observation from the viewport visibility source.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent {
    pub id: SectionId,
    pub satisfying: bool,
}

impl VisibilityEvent {
    pub fn new(id: impl Into<SectionId>, satisfying: bool) -> Self {
        Self {
            id: id.into(),
            satisfying,
        }
    }

    pub fn entered(id: impl Into<SectionId>) -> Self {
        Self::new(id, true)
    }

    pub fn left(id: impl Into<SectionId>) -> Self {
        Self::new(id, false)
    }
}

/// How the host should move to a scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

// =============================================================================
// Navigation Items
// =============================================================================

/// A navigation link pointing at a home-page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
}

/// Navigation links, in page order.
pub const NAV_ITEMS: [NavItem; 5] = [
    NavItem { id: "home", label: "Home" },
    NavItem { id: "about", label: "About" },
    NavItem { id: "works", label: "Works" },
    NavItem { id: "experience", label: "Experience" },
    NavItem { id: "contact", label: "Contact" },
];

/// Look up a nav item by section id.
pub fn nav_item(id: &str) -> Option<&'static NavItem> {
    NAV_ITEMS.iter().find(|item| item.id == id)
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Special value: r=-1 means "terminal default" (let terminal pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const SLATE: Self = Self::rgb(148, 163, 184);
    pub const SKY: Self = Self::rgb(14, 165, 233);
    pub const EMERALD: Self = Self::rgb(16, 185, 129);
    pub const ROSE: Self = Self::rgb(244, 63, 94);

    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes for rendered spans.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}
