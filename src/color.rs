//! Color related types and functions.

use rand::Rng;

/// Lowest channel value picked by [`Color::random_bright`].
///
/// Keeps randomly colored faces visible against the black background.
pub const MIN_BRIGHT_CHANNEL: u8 = 100;

/// 8-bit per channel RGB color.
///
/// This is the pixel type of [`FrameBuffer`](crate::raster::FrameBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Picks a random color with every channel uniformly sampled from `[100, 255]`.
    pub fn random_bright(rng: &mut impl Rng) -> Self {
        let range = MIN_BRIGHT_CHANNEL..=u8::MAX;
        Self {
            r: rng.gen_range(range.clone()),
            g: rng.gen_range(range.clone()),
            b: rng.gen_range(range),
        }
    }

    /// Packs the color as `0x00RRGGBB`.
    ///
    /// This is the layout most framebuffer blitters (minifb, softbuffer) expect.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Closest xterm 256 color palette entry.
    pub fn to_ansi256(self) -> u8 {
        let rgb = colorsys::Rgb::from([self.r, self.g, self.b]);
        colorsys::Ansi256::from(rgb).code()
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(feature = "crossterm")]
pub struct CrosstermConvParams {
    pub colors: CrosstermColorMode,
}

/// How colors get written to the terminal.
///
/// Not every terminal speaks 24-bit color, 256 color mode is the safe fallback.
#[cfg(feature = "crossterm")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrosstermColorMode {
    Col256,
    Rgb,
}

#[cfg(feature = "crossterm")]
impl CrosstermColorMode {
    /// Guess the mode from `COLORTERM`.
    pub fn detect() -> Self {
        match std::env::var("COLORTERM").as_deref() {
            Ok("truecolor") | Ok("24bit") => Self::Rgb,
            _ => Self::Col256,
        }
    }
}

#[cfg(feature = "crossterm")]
impl Color {
    pub fn to_crossterm(self, params: &CrosstermConvParams) -> crossterm::style::Color {
        use crossterm::style::Color as Term;

        match params.colors {
            CrosstermColorMode::Col256 => Term::AnsiValue(self.to_ansi256()),
            CrosstermColorMode::Rgb => Term::Rgb {
                r: self.r,
                g: self.g,
                b: self.b,
            },
        }
    }
}
