use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::PaletteError;
use super::types::{CustomPaletteId, Palette, PaletteId, PaletteMetadata};

/// Read access to the custom palettes a reader has learned.
pub trait CustomPaletteLookup {
    fn lookup(&self, id: &CustomPaletteId) -> Option<Arc<Palette>>;
}

/// First-time registration of a custom palette announced by a stream.
///
/// Decoding never registers palettes on its own: callers that want unseen
/// palettes learned from stream metadata supply an implementation. Returning
/// `None` leaves the palette unknown.
pub trait UnknownPaletteRegistrar {
    fn register_unknown_custom_palette(
        &self,
        id: &CustomPaletteId,
        metadata: &PaletteMetadata,
    ) -> Option<Arc<Palette>>;
}

/// In-memory custom palette registry.
///
/// # Examples
/// ```
/// use chromaframe_core::Rgb;
/// use chromaframe_core::palette::{
///     CustomPaletteId, CustomPaletteLookup, CustomPalettes, Palette, PaletteId,
/// };
///
/// let id = CustomPaletteId::from_bytes([0xab; 32]);
/// let palette = Palette::new(
///     PaletteId::Custom(id),
///     "pair",
///     vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)],
/// )
/// .unwrap();
///
/// let mut registry = CustomPalettes::new();
/// registry.insert(palette).unwrap();
/// assert!(registry.lookup(&id).is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CustomPalettes {
    palettes: BTreeMap<CustomPaletteId, Arc<Palette>>,
}

impl CustomPalettes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a palette; only custom IDs are accepted.
    pub fn insert(&mut self, palette: Palette) -> Result<Arc<Palette>, PaletteError> {
        let id = match palette.id() {
            PaletteId::Custom(id) => id,
            other => return Err(PaletteError::NotCustom { id: other }),
        };
        let palette = Arc::new(palette);
        self.palettes.insert(id, Arc::clone(&palette));
        Ok(palette)
    }

    pub fn ids(&self) -> impl Iterator<Item = &CustomPaletteId> + '_ {
        self.palettes.keys()
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }
}

impl CustomPaletteLookup for CustomPalettes {
    fn lookup(&self, id: &CustomPaletteId) -> Option<Arc<Palette>> {
        self.palettes.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::{CustomPaletteLookup, CustomPalettes};
    use crate::palette::error::PaletteError;
    use crate::palette::types::{CustomPaletteId, Palette, PaletteId};
    use crate::sampler::Rgb;

    fn pair(id: PaletteId) -> Palette {
        Palette::new(id, "pair", vec![Rgb::new(0, 0, 0), Rgb::new(9, 9, 9)]).unwrap()
    }

    #[test]
    fn insert_rejects_default_ids() {
        let mut registry = CustomPalettes::new();
        let err = registry.insert(pair(PaletteId::Default(4))).unwrap_err();
        assert!(matches!(err, PaletteError::NotCustom { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_misses_unknown_ids() {
        let mut registry = CustomPalettes::new();
        let known = CustomPaletteId::from_bytes([7; 32]);
        registry.insert(pair(PaletteId::Custom(known))).unwrap();
        assert!(registry.lookup(&known).is_some());
        assert!(registry.lookup(&CustomPaletteId::from_bytes([8; 32])).is_none());
        assert_eq!(registry.len(), 1);
    }
}
