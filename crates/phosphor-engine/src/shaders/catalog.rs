//! Built-in shader variants, in menu order.

use super::compose;

/// Display names of the built-in variants.
///
/// These are user-facing strings and part of the document format: a saved
/// document references its variant by this exact name.
pub mod names {
    pub const PASSTHROUGH: &str = "Passthrough";
    pub const SHADOW_MASK_V02: &str = "Shadow Mask CRT v0.2";
    pub const SHADOW_MASK_V011: &str = "Shadow Mask CRT v0.11";
    pub const SHADOW_MASK_HEX_PURE: &str = "Shadow Mask CRT v0.3.1 (Pure True)";
    pub const SHADOW_MASK_HEX_BLEND: &str = "Shadow Mask CRT v0.3.2";
    pub const SCANLINE: &str = "Scanline CRT v0.1";
}

/// One renderable shader variant: a display name, its composed fragment
/// source and whether it advances with wall-clock time.
#[derive(Debug, Clone)]
pub struct ShaderVariant {
    pub name: &'static str,
    pub fragment: String,
    pub animated: bool,
}

/// Ordered collection of the variants the engine can render.
///
/// Index 0 is always [`names::PASSTHROUGH`], the fallback the pipeline
/// drops to when a requested variant is missing.
#[derive(Debug, Clone)]
pub struct ShaderCatalog {
    variants: Vec<ShaderVariant>,
}

impl ShaderCatalog {
    pub fn builtin() -> Self {
        let variants = vec![
            ShaderVariant {
                name: names::PASSTHROUGH,
                fragment: compose::passthrough_fragment(),
                animated: false,
            },
            ShaderVariant {
                name: names::SHADOW_MASK_V02,
                fragment: compose::mask_rect_mean_fragment(),
                animated: false,
            },
            ShaderVariant {
                name: names::SHADOW_MASK_V011,
                fragment: compose::mask_rect_point_fragment(),
                animated: false,
            },
            ShaderVariant {
                name: names::SHADOW_MASK_HEX_PURE,
                fragment: compose::mask_hex_pure_fragment(),
                animated: false,
            },
            ShaderVariant {
                name: names::SHADOW_MASK_HEX_BLEND,
                fragment: compose::mask_hex_blend_fragment(),
                animated: false,
            },
            ShaderVariant {
                name: names::SCANLINE,
                fragment: compose::scanline_fragment(),
                animated: true,
            },
        ];
        Self { variants }
    }

    /// Exact-name lookup; names are case-sensitive.
    pub fn get(&self, name: &str) -> Option<&ShaderVariant> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|variant| variant.name == name)
    }

    pub fn by_index(&self, index: usize) -> Option<&ShaderVariant> {
        self.variants.get(index)
    }

    pub fn fallback(&self) -> &ShaderVariant {
        &self.variants[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderVariant> {
        self.variants.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.variants.iter().map(|variant| variant.name).collect()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── catalog shape ──

    #[test]
    fn builtin_catalog_lists_the_six_variants_in_menu_order() {
        let catalog = ShaderCatalog::builtin();
        assert_eq!(
            catalog.names(),
            vec![
                names::PASSTHROUGH,
                names::SHADOW_MASK_V02,
                names::SHADOW_MASK_V011,
                names::SHADOW_MASK_HEX_PURE,
                names::SHADOW_MASK_HEX_BLEND,
                names::SCANLINE,
            ]
        );
        assert_eq!(catalog.fallback().name, names::PASSTHROUGH);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let catalog = ShaderCatalog::builtin();
        assert!(catalog.get(names::SHADOW_MASK_V02).is_some());
        assert!(catalog.get("shadow mask crt v0.2").is_none());
        assert!(catalog.get("").is_none());
        assert_eq!(catalog.index_of(names::SCANLINE), Some(5));
        assert_eq!(catalog.index_of("missing"), None);
    }

    #[test]
    fn only_the_scanline_variant_is_animated() {
        let catalog = ShaderCatalog::builtin();
        for variant in catalog.iter() {
            assert_eq!(variant.animated, variant.name == names::SCANLINE);
        }
    }

    // ── WGSL validity ──

    fn validate(source: &str) {
        let module = naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|err| panic!("parse failed: {}", err.emit_to_string(source)));
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .expect("validation failed");
    }

    #[test]
    fn vertex_stage_is_valid_wgsl() {
        validate(super::super::compose::VERTEX_WGSL);
    }

    #[test]
    fn every_fragment_variant_is_valid_wgsl() {
        let catalog = ShaderCatalog::builtin();
        for variant in catalog.iter() {
            let module = naga::front::wgsl::parse_str(&variant.fragment).unwrap_or_else(|err| {
                panic!("{}: parse failed: {}", variant.name, err.emit_to_string(&variant.fragment))
            });
            naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::default(),
            )
            .validate(&module)
            .unwrap_or_else(|err| panic!("{}: validation failed: {err:?}", variant.name));
        }
    }
}
