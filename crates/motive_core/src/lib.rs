//! Motive Core Types
//!
//! The value vocabulary shared by the animation engine and its embedders:
//!
//! - **Geometry**: sizes, scroll offsets, colors and 4x4 matrices
//! - **Transform / Filter lists**: operation lists that know how to blend
//! - **Target properties**: the animatable attributes of an element
//! - **Identifiers**: element, animation, group, player and timeline ids,
//!   plus the [`IdProvider`] that hands them out
//!
//! # Example
//!
//! ```rust
//! use motive_core::{IdProvider, TargetProperty, TargetProperties};
//!
//! let mut ids = IdProvider::new();
//! let first = ids.next_animation_id();
//! let second = ids.next_animation_id();
//! assert_ne!(first, second);
//!
//! let mut occupied = TargetProperties::empty();
//! occupied.insert(TargetProperty::Opacity);
//! assert!(occupied.contains(TargetProperty::Opacity));
//! assert!(!occupied.contains(TargetProperty::Transform));
//! ```

pub mod filter;
pub mod geometry;
pub mod ids;
pub mod target_property;
pub mod transform;

pub use filter::{FilterOperation, FilterOperations};
pub use geometry::{Color, Mat4, ScrollOffset, Size};
pub use ids::{AnimationId, ElementId, GroupId, IdProvider, PlayerId, TimelineId};
pub use target_property::{TargetProperties, TargetProperty, ValueKind};
pub use transform::{TransformOperation, TransformOperations};
