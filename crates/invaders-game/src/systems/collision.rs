use crate::entity::Entity;

/// Strict AABB overlap of two active entities. Touching edges do not collide.
#[inline]
pub fn collides(a: &Entity, b: &Entity) -> bool {
    a.active && b.active && a.bounds().overlaps(b.bounds())
}
