#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Ball Drop adapters.

use anyhow::Result as AnyResult;
use ball_drop_core::{BoardSizing, Cell, CellCoord, CellSnapshot, TokenColor};
use glam::Vec2;
use std::{error::Error, fmt};

/// Extra radius of the halo drawn behind selected tokens, in pixels.
pub const SELECTION_HALO_GROWTH: f32 = 2.0;

/// Token fills of the classic board, in palette order.
pub const STANDARD_TOKEN_HEX: [&str; 5] = ["#d73033", "#f98500", "#420ed2", "#df19ae", "#27e046"];

/// Selection halo of the classic board.
pub const STANDARD_SELECTION_HEX: &str = "#f7f758";

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

    /// Parses an opaque color written as `#rrggbb`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidHexColor`] for anything other than a
    /// leading `#` followed by six hexadecimal digits.
    pub fn from_hex(value: &str) -> Result<Self, RenderingError> {
        let invalid = || RenderingError::InvalidHexColor {
            value: value.to_owned(),
        };
        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::from_rgb_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Colors used to draw a board.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    tokens: Vec<Color>,
    selection: Color,
    hole_outline: Color,
}

impl Palette {
    /// The five token colors and the yellow selection halo of the classic board.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            tokens: vec![
                Color::from_rgb_u8(0xd7, 0x30, 0x33),
                Color::from_rgb_u8(0xf9, 0x85, 0x00),
                Color::from_rgb_u8(0x42, 0x0e, 0xd2),
                Color::from_rgb_u8(0xdf, 0x19, 0xae),
                Color::from_rgb_u8(0x27, 0xe0, 0x46),
            ],
            selection: Color::from_rgb_u8(0xf7, 0xf7, 0x58),
            hole_outline: Color::from_rgb_u8(0x9e, 0x9e, 0x9e),
        }
    }

    /// Builds a palette from `#rrggbb` strings.
    ///
    /// # Errors
    ///
    /// Fails when `tokens` is empty or any entry is not a valid color.
    pub fn from_hex(tokens: &[&str], selection: &str) -> Result<Self, RenderingError> {
        if tokens.is_empty() {
            return Err(RenderingError::EmptyPalette);
        }
        let tokens = tokens
            .iter()
            .map(|value| Color::from_hex(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tokens,
            selection: Color::from_hex(selection)?,
            hole_outline: Self::standard().hole_outline,
        })
    }

    /// Number of distinct token colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Fill for the provided token color, cycling when the board has more
    /// colors than the palette.
    #[must_use]
    pub fn token(&self, color: TokenColor) -> Color {
        let index = color.get() as usize % self.tokens.len().max(1);
        self.tokens
            .get(index)
            .copied()
            .unwrap_or(self.hole_outline)
    }

    /// Palette slot holding `fill`, if any.
    #[must_use]
    pub fn position(&self, fill: Color) -> Option<usize> {
        self.tokens.iter().position(|candidate| *candidate == fill)
    }

    /// Halo color drawn behind selected tokens.
    #[must_use]
    pub const fn selection(&self) -> Color {
        self.selection
    }

    /// Outline color of empty cells.
    #[must_use]
    pub const fn hole_outline(&self) -> Color {
        self.hole_outline
    }
}

/// How a single cell is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellStyle {
    /// A filled circle, optionally backed by a selection halo.
    Token {
        /// Fill of the circle.
        fill: Color,
        /// Halo drawn behind selected tokens.
        halo: Option<Halo>,
    },
    /// An unfilled circle marking a hole awaiting refill.
    Hole {
        /// Stroke color of the circle.
        outline: Color,
    },
}

/// Larger circle drawn behind a selected token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Halo {
    /// Radius of the halo in pixels.
    pub radius: f32,
    /// Fill of the halo.
    pub color: Color,
}

/// Circle drawn for one cell of the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Cell being drawn.
    pub cell: CellCoord,
    /// Circle center in canvas pixels.
    pub center: Vec2,
    /// Circle radius in canvas pixels.
    pub radius: f32,
    /// Fill or outline of the circle.
    pub style: CellStyle,
}

/// Scene description covering every cell on the board.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Geometry the cell positions were computed from.
    pub sizing: BoardSizing,
    /// Cells in row-major order.
    pub cells: Vec<CellPresentation>,
}

impl Scene {
    /// Lays out a scene from cell snapshots.
    #[must_use]
    pub fn new<I>(sizing: BoardSizing, cells: I, palette: &Palette) -> Self
    where
        I: IntoIterator<Item = CellSnapshot>,
    {
        let radius = sizing.token_radius();
        let cells = cells
            .into_iter()
            .map(|snapshot| {
                let coord = snapshot.coord();
                let anchor = sizing.grid_to_pixel(coord);
                let style = match snapshot.cell {
                    Cell::Token(token) => CellStyle::Token {
                        fill: palette.token(token.color),
                        halo: token.selected.then(|| Halo {
                            radius: radius + SELECTION_HALO_GROWTH,
                            color: palette.selection(),
                        }),
                    },
                    Cell::Empty => CellStyle::Hole {
                        outline: palette.hole_outline(),
                    },
                };
                CellPresentation {
                    cell: coord,
                    center: Vec2::new(anchor.x, anchor.y),
                    radius,
                    style,
                }
            })
            .collect();

        Self { sizing, cells }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
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

/// Rendering backend capable of presenting Ball Drop scenes.
pub trait RenderingBackend {
    /// Draws a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A palette needs at least one token color.
    EmptyPalette,
    /// A color string was not of the form `#rrggbb`.
    InvalidHexColor {
        /// Text that failed to parse.
        value: String,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPalette => write!(f, "palette must contain at least one token color"),
            Self::InvalidHexColor { value } => {
                write!(f, "expected a color of the form #rrggbb (received {value:?})")
            }
        }
    }
}

impl Error for RenderingError {}
