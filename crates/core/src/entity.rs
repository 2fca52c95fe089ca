//! Entity trait: records that keep their identity while their fields change.

/// A domain object identified by an immutable, client-assigned key.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` denotes the same record, regardless of its field values.
    fn is_same_record(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
