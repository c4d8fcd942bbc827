//! sRGB colors with hex and CSS-name parsing.

use std::fmt;

/// Named colors accepted by [`Color::from_css`].
const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("lime", 0x00ff00),
    ("green", 0x008000),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("cyan", 0x00ffff),
    ("aqua", 0x00ffff),
    ("magenta", 0xff00ff),
    ("fuchsia", 0xff00ff),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("pink", 0xffc0cb),
    ("hotpink", 0xff69b4),
    ("deeppink", 0xff1493),
    ("navy", 0x000080),
    ("teal", 0x008080),
];

/// Error returned when a color string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized color '{0}'")]
pub struct ParseColorError(pub String);

/// Flat RGB color, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// Pure black.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Pure white.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Build a color from float channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// Pack into `0xRRGGBB`.
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Parse `#rrggbb`, `#rgb`, `0xrrggbb` or a CSS color name (case-insensitive).
    pub fn from_css(value: &str) -> Result<Self, ParseColorError> {
        let trimmed = value.trim();
        let lowered = trimmed.to_ascii_lowercase();

        if let Some(digits) = lowered
            .strip_prefix('#')
            .or_else(|| lowered.strip_prefix("0x"))
        {
            return parse_hex_digits(digits).ok_or_else(|| ParseColorError(value.to_string()));
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, hex)| Color::from_hex(*hex))
            .ok_or_else(|| ParseColorError(value.to_string()))
    }

    /// Replace this color in place from a CSS string.
    pub fn set_str(&mut self, value: &str) -> Result<(), ParseColorError> {
        *self = Color::from_css(value)?;
        Ok(())
    }

    /// RGBA array with opaque alpha, channels as stored (sRGB encoded).
    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }

    /// RGBA array with the sRGB transfer function removed.
    ///
    /// Shader outputs are linear and get re-encoded when written to an sRGB
    /// surface, so this is what must be uploaded for the window to show
    /// [`Color::to_hex`] exactly.
    pub fn to_linear_rgba(self) -> [f32; 4] {
        [srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b), 1.0]
    }
}

fn srgb_to_linear(channel: f32) -> f32 {
    let c = channel.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_css(s)
    }
}

fn parse_hex_digits(digits: &str) -> Option<Color> {
    match digits.len() {
        6 => u32::from_str_radix(digits, 16).ok().map(Color::from_hex),
        3 => {
            let short = u32::from_str_radix(digits, 16).ok()?;
            let expand = |nibble: u32| (nibble << 4) | nibble;
            let r = expand((short >> 8) & 0xf);
            let g = expand((short >> 4) & 0xf);
            let b = expand(short & 0xf);
            Some(Color::from_hex((r << 16) | (g << 8) | b))
        }
        _ => None,
    }
}
