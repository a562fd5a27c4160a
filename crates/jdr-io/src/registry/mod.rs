//! Typed listener registries.
//!
//! Each entity kind (paints, segments, path styles, grids, objects) has a
//! registry of listeners, one per concrete variant. Saving dispatches on
//! the value's variant; loading dispatches on the discriminator read from
//! the stream, looked up per version in a table built at registration.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use jdr_types::JdrVersion;
use tracing::debug;

use crate::error::{JdrError, JdrResult};
use crate::handle::{FormatReader, FormatWriter};
use crate::tag::FieldTag;

pub mod grid;
pub mod object;
pub mod paint;
pub mod segment;
pub mod style;

pub use grid::GridListener;
pub use object::ObjectListener;
pub use paint::PaintListener;
pub use segment::SegmentListener;
pub use style::PathStyleListener;

/// Common surface of every variant listener.
pub trait Listener: Send + Sync {
    /// Discriminator type written before the payload.
    type Id: Copy + Eq + Hash + fmt::Display + fmt::Debug;
    /// The variant handled by this listener.
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;

    /// Human-readable variant name used in warnings and errors.
    fn type_name(&self) -> &'static str;

    /// Discriminator at `version`.
    fn id(&self, version: JdrVersion) -> Self::Id;

    /// First version that can contain this variant.
    fn min_version(&self) -> JdrVersion {
        JdrVersion::V1_0
    }
}

/// Result of asking a listener whether a value can be written as-is.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection<T> {
    /// The value is representable at the target version.
    Native,
    /// The nearest representable value; saving it loses information.
    Projected(T),
}

/// Ordered listeners for one entity kind.
pub struct Registry<L: ?Sized + Listener> {
    listeners: Vec<Box<L>>,
    by_id: HashMap<(JdrVersion, L::Id), usize>,
    by_kind: HashMap<L::Kind, usize>,
}

impl<L: ?Sized + Listener> Registry<L> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            by_id: HashMap::new(),
            by_kind: HashMap::new(),
        }
    }

    /// Add a listener. Earlier listeners win when discriminators collide.
    pub fn register(&mut self, listener: Box<L>) {
        let index = self.listeners.len();
        for version in JdrVersion::ALL {
            self.by_id
                .entry((version, listener.id(version)))
                .or_insert(index);
        }
        self.by_kind.entry(listener.kind()).or_insert(index);
        self.listeners.push(listener);
    }

    pub fn for_id(&self, version: JdrVersion, id: L::Id) -> Option<&L> {
        self.by_id
            .get(&(version, id))
            .map(|&i| self.listeners[i].as_ref())
    }

    pub fn for_kind(&self, kind: L::Kind) -> Option<&L> {
        self.by_kind.get(&kind).map(|&i| self.listeners[i].as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &L> {
        self.listeners.iter().map(|l| l.as_ref())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Pairs of listeners sharing a discriminator at some version.
    pub fn conflicts(&self) -> Vec<(JdrVersion, L::Id, &'static str, &'static str)> {
        let mut found = Vec::new();
        for version in JdrVersion::ALL {
            let mut seen: HashMap<L::Id, &'static str> = HashMap::new();
            for listener in self.iter() {
                let id = listener.id(version);
                if let Some(first) = seen.insert(id, listener.type_name()) {
                    found.push((version, id, first, listener.type_name()));
                }
            }
        }
        found
    }

    pub(crate) fn listener_for(&self, kind: L::Kind) -> JdrResult<&L> {
        self.for_kind(kind)
            .ok_or_else(|| JdrError::NoListener(format!("{kind:?}")))
    }

    /// Find the listener for a discriminator read from `inp`.
    pub(crate) fn resolve(&self, inp: &dyn FormatReader, id: L::Id, tag: FieldTag) -> JdrResult<&L> {
        let version = inp.version();
        let listener = self
            .for_id(version, id)
            .ok_or_else(|| inp.invalid_value(tag, id.to_string()))?;
        if version < listener.min_version() {
            return Err(JdrError::UnsupportedVersion {
                type_name: listener.type_name(),
                version,
            });
        }
        Ok(listener)
    }

    /// Publish the lossy-downgrade warning for `from` being saved as `to`.
    pub(crate) fn warn_projection(&self, out: &dyn FormatWriter, from: &L, to: L::Kind) {
        let version = out.version();
        let target = self.for_kind(to).map_or("?", |l| l.type_name());
        let text = out
            .canvas()
            .message("io.unsupported", &[&from.type_name(), &version, &target]);
        debug!(from = from.type_name(), to = target, %version, "projecting value");
        out.warning(text);
    }
}

impl<L: ?Sized + Listener> Default for Registry<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// The five registries used by the codecs.
pub struct Registries {
    pub paints: Registry<dyn PaintListener>,
    pub segments: Registry<dyn SegmentListener>,
    pub styles: Registry<dyn PathStyleListener>,
    pub grids: Registry<dyn GridListener>,
    pub objects: Registry<dyn ObjectListener>,
}

impl Registries {
    /// Registries populated with every built-in listener.
    pub fn new() -> Self {
        Self {
            paints: paint::standard(),
            segments: segment::standard(),
            styles: style::standard(),
            grids: grid::standard(),
            objects: object::standard(),
        }
    }

    /// The shared built-in registries, populated on first use.
    pub fn standard() -> Arc<Registries> {
        static STANDARD: OnceLock<Arc<Registries>> = OnceLock::new();
        Arc::clone(STANDARD.get_or_init(|| Arc::new(Registries::new())))
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}
