//! Display-list output consumed by the display engine.
//!
//! The style core does not rasterize anything; paint routines emit
//! `DisplayCommand`s and the embedding display engine draws them.

use super::color::Color;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// This rect shrunk by per-side insets.
    pub fn inset(&self, top: f32, right: f32, bottom: f32, left: f32) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    SolidRect {
        rect: Rect,
        color: Color,
    },
    /// A stroked box edge; widths are top/right/bottom/left.
    Border {
        rect: Rect,
        widths: [f32; 4],
        color: Color,
    },
    /// Marker or generated text drawn at a baseline position.
    Text {
        text: String,
        x: f32,
        y: f32,
        size_pt: f32,
        color: Color,
    },
    /// A tiled or positioned image; actual pixels come from the image
    /// loader keyed by URL.
    Image {
        rect: Rect,
        url: String,
        tile_x: bool,
        tile_y: bool,
    },
}

pub type DisplayList = Vec<DisplayCommand>;
