//! Coarse inline style state toggled by the dialog core
//!
//! Only the handful of properties the overlay layer drives are modelled here.
//! Everything else about how an outer, frame or body element looks belongs to
//! the external stylesheet keyed by the structural class names.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout participation of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    /// No inline value; the stylesheet decides
    #[default]
    Unset,
    /// Shown as a block
    Block,
    /// Removed from layout
    None,
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Display::Unset => write!(f, "unset"),
            Display::Block => write!(f, "block"),
            Display::None => write!(f, "none"),
        }
    }
}

/// RGBA color used for the backdrop tint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `0.0..=1.0`
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() {
            write!(f, "transparent")
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// 2D transform: a percentage translation followed by a uniform scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transform {
    /// Horizontal translation in percent of the element width
    pub translate_x: f32,
    /// Vertical translation in percent of the element height
    pub translate_y: f32,
    pub scale: f32,
}

impl Transform {
    pub const fn translate(translate_x: f32, translate_y: f32) -> Self {
        Self {
            translate_x,
            translate_y,
            scale: 1.0,
        }
    }

    /// Translation that centers an absolutely positioned frame, scaled
    pub const fn centered(scale: f32) -> Self {
        Self {
            translate_x: -50.0,
            translate_y: -50.0,
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::translate(0.0, 0.0)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({}%, {}%)", self.translate_x, self.translate_y)?;
        if self.scale != 1.0 {
            write!(f, " scale({})", self.scale)?;
        }
        Ok(())
    }
}

/// Inline style of an element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub display: Display,
    pub z_index: Option<i32>,
    pub opacity: Option<f32>,
    pub transform: Option<Transform>,
    pub background: Option<Rgba>,
}

impl Style {
    /// Merge a patch into this style; absent fields are left untouched
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(display) = patch.display {
            self.display = display;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = Some(z_index);
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = Some(opacity);
        }
        if let Some(transform) = patch.transform {
            self.transform = Some(transform);
        }
        if let Some(background) = patch.background {
            self.background = Some(background);
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.display != Display::Unset {
            parts.push(format!("display: {}", self.display));
        }
        if let Some(z) = self.z_index {
            parts.push(format!("z-index: {}", z));
        }
        if let Some(opacity) = self.opacity {
            parts.push(format!("opacity: {:.1}", opacity));
        }
        if let Some(transform) = self.transform {
            parts.push(format!("transform: {}", transform));
        }
        if let Some(background) = self.background {
            parts.push(format!("background-color: {}", background));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Partial style used by deferred transitions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StylePatch {
    pub display: Option<Display>,
    pub z_index: Option<i32>,
    pub opacity: Option<f32>,
    pub transform: Option<Transform>,
    pub background: Option<Rgba>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn background(mut self, background: Rgba) -> Self {
        self.background = Some(background);
        self
    }
}
