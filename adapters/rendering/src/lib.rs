#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Signal Grid adapters.

mod mapper;
mod scene;

use anyhow::Result as AnyResult;
use glam::Vec2;
use signal_grid_core::{CellCoord, ElementKind, Rgb};
use std::{error::Error, fmt, time::Duration};

pub use mapper::CoordMapper;
pub use scene::{
    BandPresentation, CellPresentation, GridPresentation, PathPresentation, Scene,
    SignalPresentation,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red(), rgb.green(), rgb.blue())
    }
}

/// Colors shared by every adapter.
pub mod palette {
    use super::Color;

    /// Fill of the output lane band.
    pub const OUTPUT_BAND: Color = Color::from_rgb_u8(255, 70, 70).with_alpha(0.1);
    /// Fill of the input lane band.
    pub const INPUT_BAND: Color = Color::from_rgb_u8(90, 160, 255).with_alpha(0.1);
    /// Grid line stroke.
    pub const GRID_LINE: Color = Color::new(1.0, 1.0, 1.0, 0.15);
    /// Badge behind pause elements.
    pub const PAUSE_FILL: Color = Color::from_rgb_u8(0x3f, 0x7c, 0xff);
    /// Badge behind convert and sync elements.
    pub const BLOCK_FILL: Color = Color::from_rgb_u8(0xff, 0xd5, 0x4f);
    /// Preview path stroke.
    pub const PATH: Color = Color::from_rgb_u8(160, 160, 170).with_alpha(0.5);
    /// Frame clear color.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0x11, 0x11, 0x11);
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in canvas units.
    pub cursor_canvas_space: Option<Vec2>,
    /// Whether the adapter detected a click on this frame.
    pub click: bool,
    /// Element dropped at the cursor on this frame.
    pub dropped_element: Option<ElementKind>,
}

impl FrameInput {
    /// Grid cell under the cursor, if any.
    #[must_use]
    pub fn cursor_cell(&self, mapper: &CoordMapper) -> Option<CellCoord> {
        self.cursor_canvas_space.and_then(|point| mapper.cell_at(point))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Signal Grid scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and replaces the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive, finite side length.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
    /// Margins must be finite and not negative.
    InvalidMargin {
        /// Provided margin that failed validation.
        margin: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell size must be positive (received {cell_size})")
            }
            Self::InvalidMargin { margin } => {
                write!(f, "margin must not be negative (received {margin})")
            }
        }
    }
}

impl Error for RenderingError {}
