use std::collections::BTreeMap;
use std::sync::Arc;

use crate::sampler::Rgb;

use super::error::PaletteError;
use super::types::{Palette, PaletteId};

const CHANNEL_LEVELS: [u8; 4] = [0, 85, 170, 255];

/// Read-only table of default palettes, keyed by their small integer ID.
///
/// Build it once at startup and pass it by reference into decoding; nothing
/// in the decode path mutates it.
///
/// # Examples
/// ```
/// use chromaframe_core::DefaultPalettes;
///
/// let defaults = DefaultPalettes::builtin();
/// assert_eq!(defaults.get(0).unwrap().bit_width(), 1);
/// assert!(defaults.get(37).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultPalettes {
    palettes: BTreeMap<u8, Arc<Palette>>,
}

impl DefaultPalettes {
    /// The built-in table: IDs 0 to 3 with 2, 4, 8 and 64 colors.
    pub fn builtin() -> Self {
        Self::try_builtin().expect("built-in palette table is valid")
    }

    /// Builds the built-in table, surfacing any palette construction error.
    pub fn try_builtin() -> Result<Self, PaletteError> {
        let entries = [
            (0, "Two color", two_color()),
            (1, "Four color", four_color()),
            (2, "Eight color", eight_color()),
            (3, "Sixty-four color", sixty_four_color()),
        ];
        let palettes = entries
            .into_iter()
            .map(|(id, name, colors)| Palette::new(PaletteId::Default(id), name, colors))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_palettes(palettes)
    }

    /// Table holding exactly the given palettes; each must carry a default ID.
    pub fn from_palettes<I: IntoIterator<Item = Palette>>(
        palettes: I,
    ) -> Result<Self, PaletteError> {
        let mut table = BTreeMap::new();
        for palette in palettes {
            match palette.id() {
                PaletteId::Default(id) => {
                    table.insert(id, Arc::new(palette));
                }
                other => return Err(PaletteError::NotDefault { id: other }),
            }
        }
        Ok(Self { palettes: table })
    }

    pub fn get(&self, id: u8) -> Option<Arc<Palette>> {
        self.palettes.get(&id).cloned()
    }

    pub fn contains(&self, id: u8) -> bool {
        self.palettes.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.palettes.keys().copied()
    }
}

fn two_color() -> Vec<Rgb> {
    vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]
}

fn four_color() -> Vec<Rgb> {
    vec![
        Rgb::new(0, 0, 0),
        Rgb::new(255, 0, 0),
        Rgb::new(0, 255, 0),
        Rgb::new(0, 0, 255),
    ]
}

fn eight_color() -> Vec<Rgb> {
    (0u8..8)
        .map(|i| {
            let level = |bit: u8| if i & bit != 0 { 255 } else { 0 };
            Rgb::new(level(4), level(2), level(1))
        })
        .collect()
}

fn sixty_four_color() -> Vec<Rgb> {
    (0usize..64)
        .map(|i| {
            Rgb::new(
                CHANNEL_LEVELS[(i >> 4) & 3],
                CHANNEL_LEVELS[(i >> 2) & 3],
                CHANNEL_LEVELS[i & 3],
            )
        })
        .collect()
}
