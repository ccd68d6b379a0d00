use std::collections::HashMap;
use std::str::FromStr;

use time::OffsetDateTime;

use crate::sampler::Rgb;

use super::error::PaletteError;

/// Highest palette field value that still names a default palette.
pub const MAX_DEFAULT_PALETTE_ID: u8 = 100;

/// Largest supported symbol width, in bits.
pub const MAX_SYMBOL_BITS: u32 = 16;

/// 256-bit custom palette identifier, rendered as lowercase hex.
///
/// # Examples
/// ```
/// use chromaframe_core::palette::CustomPaletteId;
///
/// let id: CustomPaletteId = "AB".repeat(32).parse().unwrap();
/// assert_eq!(id.to_string(), "ab".repeat(32));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomPaletteId([u8; 32]);

impl CustomPaletteId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Last byte, the position a default palette ID occupies on the wire.
    pub fn trailing_byte(&self) -> u8 {
        self.0[31]
    }
}

impl std::fmt::Display for CustomPaletteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for CustomPaletteId {
    type Err = PaletteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || PaletteError::InvalidCustomId {
            value: value.to_string(),
        };
        if value.len() != 64 {
            return Err(invalid());
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }
}

/// Palette identifier as carried by the initializer's palette field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaletteId {
    /// Built-in palette, `0..=MAX_DEFAULT_PALETTE_ID`.
    Default(u8),
    /// Registered custom palette.
    Custom(CustomPaletteId),
}

impl PaletteId {
    pub fn is_custom(&self) -> bool {
        matches!(self, PaletteId::Custom(_))
    }
}

impl std::fmt::Display for PaletteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteId::Default(id) => write!(f, "{id}"),
            PaletteId::Custom(id) => write!(f, "{id}"),
        }
    }
}

/// Descriptive data that travels with a custom palette the first time a
/// stream announces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteMetadata {
    pub name: String,
    pub description: String,
    pub created: OffsetDateTime,
    pub colors: Vec<Rgb>,
}

/// Immutable color alphabet.
///
/// The index of a color in `colors` is its symbol value; symbols are
/// `bit_width` bits wide.
///
/// # Examples
/// ```
/// use chromaframe_core::{Rgb, palette::{Palette, PaletteId}};
///
/// let palette = Palette::new(
///     PaletteId::Default(0),
///     "mono",
///     vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)],
/// )
/// .unwrap();
/// assert_eq!(palette.bit_width(), 1);
/// assert_eq!(palette.nearest_symbol(&Rgb::new(200, 210, 190)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    id: PaletteId,
    name: String,
    description: Option<String>,
    created: Option<OffsetDateTime>,
    colors: Vec<Rgb>,
    symbols: HashMap<Rgb, u16>,
    bit_width: u8,
}

impl Palette {
    pub fn new(
        id: PaletteId,
        name: impl Into<String>,
        colors: Vec<Rgb>,
    ) -> Result<Self, PaletteError> {
        if let PaletteId::Default(raw) = id {
            if raw > MAX_DEFAULT_PALETTE_ID {
                return Err(PaletteError::DefaultIdOutOfRange {
                    id: raw,
                    max: MAX_DEFAULT_PALETTE_ID,
                });
            }
        }
        let count = colors.len();
        if count < 2 || !count.is_power_of_two() || count.trailing_zeros() > MAX_SYMBOL_BITS {
            return Err(PaletteError::InvalidColorCount { count });
        }
        let mut symbols = HashMap::with_capacity(count);
        for (symbol, color) in colors.iter().enumerate() {
            if symbols.insert(*color, symbol as u16).is_some() {
                return Err(PaletteError::DuplicateColor { color: *color });
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            description: None,
            created: None,
            bit_width: count.trailing_zeros() as u8,
            colors,
            symbols,
        })
    }

    pub fn from_metadata(
        id: CustomPaletteId,
        metadata: &PaletteMetadata,
    ) -> Result<Self, PaletteError> {
        let mut palette = Self::new(
            PaletteId::Custom(id),
            metadata.name.clone(),
            metadata.colors.clone(),
        )?;
        palette.description = Some(metadata.description.clone());
        palette.created = Some(metadata.created);
        Ok(palette)
    }

    pub fn id(&self) -> PaletteId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created(&self) -> Option<OffsetDateTime> {
        self.created
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    pub fn symbol_for(&self, color: &Rgb) -> Option<u16> {
        self.symbols.get(color).copied()
    }

    pub fn color_for(&self, symbol: u16) -> Option<Rgb> {
        self.colors.get(usize::from(symbol)).copied()
    }

    /// Symbol of the closest palette color; the lowest symbol wins ties.
    pub fn nearest_symbol(&self, color: &Rgb) -> u16 {
        if let Some(symbol) = self.symbol_for(color) {
            return symbol;
        }
        let mut best = (u32::MAX, 0u16);
        for (symbol, candidate) in self.colors.iter().enumerate() {
            let distance = candidate.distance_squared(color);
            if distance < best.0 {
                best = (distance, symbol as u16);
            }
        }
        best.1
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomPaletteId, Palette, PaletteId, PaletteMetadata};
    use crate::palette::error::PaletteError;
    use crate::sampler::Rgb;
    use time::OffsetDateTime;

    fn four_colors() -> Vec<Rgb> {
        vec![
            Rgb::new(0, 0, 0),
            Rgb::new(255, 0, 0),
            Rgb::new(0, 255, 0),
            Rgb::new(0, 0, 255),
        ]
    }

    #[test]
    fn rejects_non_power_of_two() {
        let mut colors = four_colors();
        colors.pop();
        let err = Palette::new(PaletteId::Default(1), "three", colors).unwrap_err();
        assert_eq!(err, PaletteError::InvalidColorCount { count: 3 });
    }

    #[test]
    fn rejects_duplicate_colors() {
        let mut colors = four_colors();
        colors[3] = colors[1];
        let err = Palette::new(PaletteId::Default(1), "dup", colors).unwrap_err();
        assert!(matches!(err, PaletteError::DuplicateColor { .. }));
    }

    #[test]
    fn rejects_default_id_above_threshold() {
        let err = Palette::new(PaletteId::Default(101), "high", four_colors()).unwrap_err();
        assert!(matches!(err, PaletteError::DefaultIdOutOfRange { id: 101, .. }));
    }

    #[test]
    fn symbol_mapping_is_bidirectional() {
        let palette = Palette::new(PaletteId::Default(1), "four", four_colors()).unwrap();
        assert_eq!(palette.bit_width(), 2);
        for symbol in 0..4u16 {
            let color = palette.color_for(symbol).unwrap();
            assert_eq!(palette.symbol_for(&color), Some(symbol));
        }
        assert_eq!(palette.color_for(4), None);
    }

    #[test]
    fn nearest_symbol_tolerates_noise() {
        let palette = Palette::new(PaletteId::Default(1), "four", four_colors()).unwrap();
        assert_eq!(palette.nearest_symbol(&Rgb::new(20, 230, 12)), 2);
        assert_eq!(palette.nearest_symbol(&Rgb::new(200, 30, 40)), 1);
    }

    #[test]
    fn custom_id_parse_rejects_bad_input() {
        assert!("zz".repeat(32).parse::<CustomPaletteId>().is_err());
        assert!("ab".repeat(31).parse::<CustomPaletteId>().is_err());
    }

    #[test]
    fn from_metadata_keeps_description_and_timestamp() {
        let created = OffsetDateTime::from_unix_timestamp(1_600_000_000).unwrap();
        let metadata = PaletteMetadata {
            name: "sunset".to_string(),
            description: "warm tones".to_string(),
            created,
            colors: four_colors(),
        };
        let id = CustomPaletteId::from_bytes([0xee; 32]);
        let palette = Palette::from_metadata(id, &metadata).unwrap();
        assert_eq!(palette.id(), PaletteId::Custom(id));
        assert_eq!(palette.description(), Some("warm tones"));
        assert_eq!(palette.created(), Some(created));
    }
}
