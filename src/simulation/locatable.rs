//! Trait for entities that have a position in the world.
//!
//! Spatial grids are rebuilt from any slice of [`Locatable`] entities. Entities
//! that are logically gone (dead agents, eaten food) report themselves as
//! inactive and are left out of the rebuilt grid.

use super::geometric_utils::Vec2;

/// Trait for entities with a position.
///
/// Any type that implements this trait:
/// - Has a position in 2D space
/// - Can be excluded from spatial queries while awaiting removal
pub trait Locatable {
    /// Returns the entity's position.
    fn pos(&self) -> Vec2;

    /// Whether the entity should be indexed. Defaults to `true`.
    fn is_active(&self) -> bool {
        true
    }
}
