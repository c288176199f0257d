//! Extension → import strategy table.

use std::collections::HashMap;
use std::sync::LazyLock;

use meshglb_core::types::{Capability, ImportOperation};

use crate::models::FormatFamily;

/// How one format family is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatStrategy {
    /// Family handled by this strategy.
    pub family: FormatFamily,
    /// Lowercase extensions without the dot.
    pub extensions: &'static [&'static str],
    /// Add-ons enabled (best effort) before importing.
    pub capabilities: &'static [Capability],
    /// Import operations, tried in order until one succeeds.
    pub attempts: &'static [ImportOperation],
}

// ---------------------------------------------------------------------------
// Strategy table macro
// ---------------------------------------------------------------------------

macro_rules! define_strategies {
    ($(
        $name:ident => $family:ident {
            extensions: [$($ext:literal),* $(,)?],
            capabilities: [$($cap:expr),* $(,)?],
            attempts: [$($op:ident),* $(,)?] $(,)?
        }
    ),* $(,)?) => {
        $(
            #[doc = concat!("Import strategy for the `", stringify!($family), "` family.")]
            pub static $name: FormatStrategy = FormatStrategy {
                family: FormatFamily::$family,
                extensions: &[$($ext),*],
                capabilities: &[$($cap),*],
                attempts: &[$(ImportOperation::$op),*],
            };
        )*

        /// Every strategy, in table order.
        pub static STRATEGIES: [&FormatStrategy; [$(stringify!($name)),*].len()] = [$(&$name),*];

        static EXTENSION_MAP: LazyLock<HashMap<&'static str, &'static FormatStrategy>> =
            LazyLock::new(|| {
                let mut map = HashMap::new();
                $(
                    for ext in $name.extensions {
                        map.insert(*ext, &$name);
                    }
                )*
                map
            });
    };
}

define_strategies! {
    OBJ_STRATEGY => Obj {
        extensions: ["obj"],
        capabilities: [Capability::OBJ_IMPORTER],
        attempts: [ObjLegacy, ObjModern],
    },
    PLY_STRATEGY => Ply {
        extensions: ["ply"],
        capabilities: [Capability::PLY_IMPORTER],
        attempts: [PlyLegacy, PlyModern],
    },
    USD_STRATEGY => Usd {
        extensions: ["usd", "usda", "usdz"],
        capabilities: [],
        attempts: [UsdModern, UsdLegacy],
    },
}

/// Strategy registered for a lowercase extension without the dot.
pub fn lookup(extension: &str) -> Option<&'static FormatStrategy> {
    EXTENSION_MAP.get(extension).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_are_disjoint() {
        let total: usize = STRATEGIES.iter().map(|s| s.extensions.len()).sum();
        assert_eq!(EXTENSION_MAP.len(), total);
    }

    #[test]
    fn test_attempt_order() {
        assert_eq!(
            OBJ_STRATEGY.attempts,
            &[ImportOperation::ObjLegacy, ImportOperation::ObjModern]
        );
        assert_eq!(
            PLY_STRATEGY.attempts,
            &[ImportOperation::PlyLegacy, ImportOperation::PlyModern]
        );
        assert_eq!(
            USD_STRATEGY.attempts,
            &[ImportOperation::UsdModern, ImportOperation::UsdLegacy]
        );
        assert!(USD_STRATEGY.capabilities.is_empty());
    }

    #[test]
    fn test_lookup_is_lowercase_only() {
        assert_eq!(lookup("usdz").map(|s| s.family), Some(FormatFamily::Usd));
        assert!(lookup("USDZ").is_none());
    }
}
