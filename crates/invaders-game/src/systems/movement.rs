use invaders_engine::coords::Rect;

use crate::entity::Entity;

/// Advances `entity` by `velocity × dt`, then clamps it inside `bounds` if given.
///
/// Inactive entities are left untouched.
pub fn integrate(entity: &mut Entity, dt: f32, bounds: Option<Rect>) {
    if !entity.active {
        return;
    }

    entity.pos += entity.velocity * dt;

    if let Some(b) = bounds {
        let max = b.max();
        if entity.pos.x < b.origin.x {
            entity.pos.x = b.origin.x;
        }
        if entity.pos.y < b.origin.y {
            entity.pos.y = b.origin.y;
        }
        if entity.pos.x + entity.size.x > max.x {
            entity.pos.x = max.x - entity.size.x;
        }
        if entity.pos.y + entity.size.y > max.y {
            entity.pos.y = max.y - entity.size.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invaders_engine::coords::Vec2;

    fn moving(x: f32, y: f32, vx: f32, vy: f32) -> Entity {
        let mut e = Entity::new(x, y, 10.0, 10.0);
        e.velocity = Vec2::new(vx, vy);
        e
    }

    // ── integration ───────────────────────────────────────────────────────

    #[test]
    fn zero_velocity_keeps_position() {
        let mut e = moving(5.0, 6.0, 0.0, 0.0);
        integrate(&mut e, 0.5, None);
        assert_eq!(e.pos, Vec2::new(5.0, 6.0));
    }

    #[test]
    fn position_advances_by_velocity_times_dt() {
        let mut e = moving(0.0, 0.0, 100.0, -40.0);
        integrate(&mut e, 0.25, None);
        assert_eq!(e.pos, Vec2::new(25.0, -10.0));
    }

    #[test]
    fn inactive_entities_do_not_move() {
        let mut e = moving(0.0, 0.0, 100.0, 100.0);
        e.active = false;
        integrate(&mut e, 1.0, None);
        assert_eq!(e.pos, Vec2::zero());
    }

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn clamps_to_left_and_top() {
        let bounds = Rect::new(20.0, 30.0, 200.0, 100.0);
        let mut e = moving(25.0, 35.0, -100.0, -100.0);
        integrate(&mut e, 1.0, Some(bounds));
        assert_eq!(e.pos, Vec2::new(20.0, 30.0));
    }

    #[test]
    fn clamps_to_right_and_bottom() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let mut e = moving(80.0, 30.0, 100.0, 100.0);
        integrate(&mut e, 1.0, Some(bounds));
        assert_eq!(e.pos, Vec2::new(90.0, 40.0));
    }
}
