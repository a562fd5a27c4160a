//! Built-in listeners, one per concrete variant of each entity kind.

/// Implement [`Listener`](crate::registry::Listener) for a unit struct with
/// a fixed discriminator. `since Feature` takes the minimum version from the
/// feature table; without it the variant exists in every version.
macro_rules! impl_listener {
    (
        $name:ident,
        $kind_ty:ident :: $kind:ident,
        $id_ty:ty = $id:expr,
        $type_name:literal
        $(, since $feature:ident)?
    ) => {
        impl $crate::registry::Listener for $name {
            type Id = $id_ty;
            type Kind = $kind_ty;

            fn kind(&self) -> $kind_ty {
                $kind_ty::$kind
            }

            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn id(&self, _version: ::jdr_types::JdrVersion) -> $id_ty {
                $id
            }

            $(
                fn min_version(&self) -> ::jdr_types::JdrVersion {
                    ::jdr_types::Feature::$feature.min_version()
                }
            )?
        }
    };
}

pub mod bitmap;
pub(crate) mod config;
pub mod flowframe;
pub mod grid;
pub mod group;
pub mod paint;
pub mod path;
pub mod pattern;
pub mod segment;
pub mod style;
pub mod text;
