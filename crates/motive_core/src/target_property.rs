//! Animatable properties of an element

use serde::{Deserialize, Serialize};

/// Kind of value a property carries
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Color,
    Transform,
    Filter,
    ScrollOffset,
    Size,
    Boolean,
}

/// An animatable attribute of an element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetProperty {
    Transform,
    Opacity,
    Filter,
    ScrollOffset,
    BackgroundColor,
    Bounds,
    Visibility,
}

impl TargetProperty {
    pub const ALL: [TargetProperty; 7] = [
        TargetProperty::Transform,
        TargetProperty::Opacity,
        TargetProperty::Filter,
        TargetProperty::ScrollOffset,
        TargetProperty::BackgroundColor,
        TargetProperty::Bounds,
        TargetProperty::Visibility,
    ];

    /// Position in [`TargetProperty::ALL`], also the bit index in [`TargetProperties`]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            TargetProperty::Transform => "transform",
            TargetProperty::Opacity => "opacity",
            TargetProperty::Filter => "filter",
            TargetProperty::ScrollOffset => "scroll_offset",
            TargetProperty::BackgroundColor => "background_color",
            TargetProperty::Bounds => "bounds",
            TargetProperty::Visibility => "visibility",
        }
    }

    /// The value kind a curve for this property must produce
    pub const fn value_kind(self) -> ValueKind {
        match self {
            TargetProperty::Transform => ValueKind::Transform,
            TargetProperty::Opacity => ValueKind::Float,
            TargetProperty::Filter => ValueKind::Filter,
            TargetProperty::ScrollOffset => ValueKind::ScrollOffset,
            TargetProperty::BackgroundColor => ValueKind::Color,
            TargetProperty::Bounds => ValueKind::Size,
            TargetProperty::Visibility => ValueKind::Boolean,
        }
    }
}

impl std::fmt::Display for TargetProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of target properties
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TargetProperties(u32);

impl TargetProperties {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        TargetProperty::ALL.iter().copied().collect()
    }

    pub fn insert(&mut self, property: TargetProperty) {
        self.0 |= 1 << property.index();
    }

    pub fn remove(&mut self, property: TargetProperty) {
        self.0 &= !(1 << property.index());
    }

    pub fn contains(&self, property: TargetProperty) -> bool {
        self.0 & (1 << property.index()) != 0
    }

    pub fn union(self, other: TargetProperties) -> TargetProperties {
        Self(self.0 | other.0)
    }

    /// Properties in exactly one of the two sets
    pub fn symmetric_difference(self, other: TargetProperties) -> TargetProperties {
        Self(self.0 ^ other.0)
    }

    pub fn intersects(&self, other: TargetProperties) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = TargetProperty> + '_ {
        TargetProperty::ALL
            .iter()
            .copied()
            .filter(move |p| self.contains(*p))
    }
}

impl FromIterator<TargetProperty> for TargetProperties {
    fn from_iter<I: IntoIterator<Item = TargetProperty>>(iter: I) -> Self {
        let mut set = TargetProperties::empty();
        for property in iter {
            set.insert(property);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, property) in TargetProperty::ALL.iter().enumerate() {
            assert_eq!(property.index(), i);
        }
    }

    #[test]
    fn test_set_operations() {
        let mut set = TargetProperties::empty();
        assert!(set.is_empty());

        set.insert(TargetProperty::Opacity);
        set.insert(TargetProperty::Filter);
        assert!(set.contains(TargetProperty::Opacity));
        assert!(!set.contains(TargetProperty::Transform));

        set.remove(TargetProperty::Opacity);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![TargetProperty::Filter]);

        let other: TargetProperties = [TargetProperty::Transform].into_iter().collect();
        assert!(!set.intersects(other));
        assert!(set.union(other).contains(TargetProperty::Transform));
        assert_eq!(TargetProperties::all().iter().count(), 7);
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(TargetProperty::Opacity.value_kind(), ValueKind::Float);
        assert_eq!(TargetProperty::Bounds.value_kind(), ValueKind::Size);
        assert_eq!(TargetProperty::ScrollOffset.to_string(), "scroll_offset");
    }
}
