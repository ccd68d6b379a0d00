use std::sync::Arc;

use super::builtin::DefaultPalettes;
use super::error::PaletteError;
use super::registry::{CustomPaletteLookup, UnknownPaletteRegistrar};
use super::types::{Palette, PaletteId, PaletteMetadata};

/// Palette announced in stream-level metadata, optionally with the data
/// needed to learn it.
#[derive(Debug, Clone, Copy)]
pub struct StreamPaletteRequest<'a> {
    pub id: PaletteId,
    pub metadata: Option<&'a PaletteMetadata>,
}

/// Resolve the palette named by a header's palette field.
///
/// Default IDs come from the default table and custom IDs from the custom
/// registry. An ID missing from either is reported as unknown; nothing is
/// synthesized.
///
/// # Examples
/// ```
/// use chromaframe_core::DefaultPalettes;
/// use chromaframe_core::palette::{CustomPalettes, PaletteId, resolve_header_palette};
///
/// let defaults = DefaultPalettes::builtin();
/// let custom = CustomPalettes::new();
/// assert!(resolve_header_palette(&PaletteId::Default(1), &custom, &defaults).is_ok());
/// assert!(resolve_header_palette(&PaletteId::Default(37), &custom, &defaults).is_err());
/// ```
pub fn resolve_header_palette<C: CustomPaletteLookup + ?Sized>(
    id: &PaletteId,
    custom: &C,
    defaults: &DefaultPalettes,
) -> Result<Arc<Palette>, PaletteError> {
    let resolved = match id {
        PaletteId::Default(raw) => defaults.get(*raw),
        PaletteId::Custom(custom_id) => custom.lookup(custom_id),
    };
    match resolved {
        Some(palette) => {
            tracing::debug!(palette = %id, name = palette.name(), "palette resolved");
            Ok(palette)
        }
        None => {
            if id.is_custom() {
                tracing::warn!(palette = %id, "custom palette is not registered with this reader");
            } else {
                tracing::warn!(palette = %id, "default palette is unknown to this reader version");
            }
            Err(PaletteError::UnknownPalette { id: *id })
        }
    }
}

/// Resolve a stream palette, consulting `registrar` for custom palettes the
/// reader has never seen.
///
/// Unknown custom palettes stay unknown unless both metadata and a registrar
/// are supplied and the registrar returns a palette.
pub fn resolve_stream_palette<C: CustomPaletteLookup + ?Sized>(
    request: &StreamPaletteRequest<'_>,
    custom: &C,
    defaults: &DefaultPalettes,
    registrar: Option<&dyn UnknownPaletteRegistrar>,
) -> Result<Arc<Palette>, PaletteError> {
    let custom_id = match request.id {
        PaletteId::Default(_) => return resolve_header_palette(&request.id, custom, defaults),
        PaletteId::Custom(custom_id) => custom_id,
    };
    if let Some(palette) = custom.lookup(&custom_id) {
        return Ok(palette);
    }

    let registered = match (registrar, request.metadata) {
        (Some(registrar), Some(metadata)) => {
            registrar.register_unknown_custom_palette(&custom_id, metadata)
        }
        _ => None,
    };
    match registered {
        Some(palette) => {
            tracing::debug!(
                palette = %request.id,
                name = palette.name(),
                "custom palette registered"
            );
            Ok(palette)
        }
        None => {
            tracing::warn!(
                palette = %request.id,
                has_metadata = request.metadata.is_some(),
                has_registrar = registrar.is_some(),
                "custom stream palette could not be registered"
            );
            Err(PaletteError::UnknownPalette { id: request.id })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use time::OffsetDateTime;

    use super::{StreamPaletteRequest, resolve_header_palette, resolve_stream_palette};
    use crate::palette::builtin::DefaultPalettes;
    use crate::palette::error::PaletteError;
    use crate::palette::registry::{CustomPalettes, UnknownPaletteRegistrar};
    use crate::palette::types::{CustomPaletteId, Palette, PaletteId, PaletteMetadata};
    use crate::sampler::Rgb;

    struct CountingRegistrar {
        calls: Cell<usize>,
        accept: bool,
    }

    impl UnknownPaletteRegistrar for CountingRegistrar {
        fn register_unknown_custom_palette(
            &self,
            id: &CustomPaletteId,
            metadata: &PaletteMetadata,
        ) -> Option<Arc<Palette>> {
            self.calls.set(self.calls.get() + 1);
            if !self.accept {
                return None;
            }
            Palette::from_metadata(*id, metadata).ok().map(Arc::new)
        }
    }

    fn metadata() -> PaletteMetadata {
        PaletteMetadata {
            name: "ocean".to_string(),
            description: "blues".to_string(),
            created: OffsetDateTime::UNIX_EPOCH,
            colors: vec![Rgb::new(0, 0, 64), Rgb::new(0, 0, 192)],
        }
    }

    fn unseen() -> PaletteId {
        PaletteId::Custom(CustomPaletteId::from_bytes([0xc8; 32]))
    }

    #[test]
    fn header_default_hits_table() {
        let defaults = DefaultPalettes::builtin();
        let palette =
            resolve_header_palette(&PaletteId::Default(0), &CustomPalettes::new(), &defaults)
                .unwrap();
        assert_eq!(palette.id(), PaletteId::Default(0));
    }

    #[test]
    fn header_default_missing_is_unknown() {
        let err = resolve_header_palette(
            &PaletteId::Default(37),
            &CustomPalettes::new(),
            &DefaultPalettes::builtin(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PaletteError::UnknownPalette {
                id: PaletteId::Default(37)
            }
        );
    }

    #[test]
    fn header_custom_missing_is_unknown() {
        let err =
            resolve_header_palette(&unseen(), &CustomPalettes::new(), &DefaultPalettes::builtin())
                .unwrap_err();
        assert_eq!(err, PaletteError::UnknownPalette { id: unseen() });
    }

    #[test]
    fn stream_custom_without_registrar_is_unknown() {
        let meta = metadata();
        let request = StreamPaletteRequest {
            id: unseen(),
            metadata: Some(&meta),
        };
        let err = resolve_stream_palette(
            &request,
            &CustomPalettes::new(),
            &DefaultPalettes::builtin(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PaletteError::UnknownPalette { .. }));
    }

    #[test]
    fn stream_custom_without_metadata_skips_registrar() {
        let registrar = CountingRegistrar {
            calls: Cell::new(0),
            accept: true,
        };
        let request = StreamPaletteRequest {
            id: unseen(),
            metadata: None,
        };
        let result = resolve_stream_palette(
            &request,
            &CustomPalettes::new(),
            &DefaultPalettes::builtin(),
            Some(&registrar),
        );
        assert!(result.is_err());
        assert_eq!(registrar.calls.get(), 0);
    }

    #[test]
    fn stream_custom_registrar_supplies_palette() {
        let registrar = CountingRegistrar {
            calls: Cell::new(0),
            accept: true,
        };
        let meta = metadata();
        let request = StreamPaletteRequest {
            id: unseen(),
            metadata: Some(&meta),
        };
        let palette = resolve_stream_palette(
            &request,
            &CustomPalettes::new(),
            &DefaultPalettes::builtin(),
            Some(&registrar),
        )
        .unwrap();
        assert_eq!(palette.name(), "ocean");
        assert_eq!(registrar.calls.get(), 1);
    }

    #[test]
    fn stream_custom_registrar_refusal_is_unknown() {
        let registrar = CountingRegistrar {
            calls: Cell::new(0),
            accept: false,
        };
        let meta = metadata();
        let request = StreamPaletteRequest {
            id: unseen(),
            metadata: Some(&meta),
        };
        let err = resolve_stream_palette(
            &request,
            &CustomPalettes::new(),
            &DefaultPalettes::builtin(),
            Some(&registrar),
        )
        .unwrap_err();
        assert_eq!(err, PaletteError::UnknownPalette { id: unseen() });
        assert_eq!(registrar.calls.get(), 1);
    }

    #[test]
    fn stream_known_custom_skips_registrar() {
        let registrar = CountingRegistrar {
            calls: Cell::new(0),
            accept: true,
        };
        let PaletteId::Custom(custom_id) = unseen() else {
            unreachable!()
        };
        let mut registry = CustomPalettes::new();
        registry
            .insert(Palette::from_metadata(custom_id, &metadata()).unwrap())
            .unwrap();
        let request = StreamPaletteRequest {
            id: unseen(),
            metadata: None,
        };
        let palette = resolve_stream_palette(
            &request,
            &registry,
            &DefaultPalettes::builtin(),
            Some(&registrar),
        )
        .unwrap();
        assert_eq!(palette.name(), "ocean");
        assert_eq!(registrar.calls.get(), 0);
    }

    #[test]
    fn stream_default_matches_header_path() {
        let request = StreamPaletteRequest {
            id: PaletteId::Default(3),
            metadata: None,
        };
        let palette = resolve_stream_palette(
            &request,
            &CustomPalettes::new(),
            &DefaultPalettes::builtin(),
            None,
        )
        .unwrap();
        assert_eq!(palette.bit_width(), 6);
    }
}
