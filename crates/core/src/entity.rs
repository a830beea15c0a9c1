//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Catalog listings are entities: their stock changes over a run while their
/// identity stays fixed.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
