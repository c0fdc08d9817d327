use invaders_engine::coords::{ColorRgba, Rect, Vec2};

pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const INVADER_SIZE: Vec2 = Vec2::new(24.0, 24.0);
pub const PROJECTILE_SIZE: Vec2 = Vec2::new(4.0, 10.0);

/// Vertical speed of player shots (upwards).
pub const PLAYER_SHOT_SPEED: f32 = -500.0;
/// Vertical speed of enemy shots (downwards).
pub const ENEMY_SHOT_SPEED: f32 = 200.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Owner {
    Player,
    Enemy,
}

/// Kind discriminator plus kind-specific state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EntityKind {
    Generic,
    /// `cooldown`: seconds until the next shot is allowed.
    Player { cooldown: f32 },
    Invader { rank: u8 },
    Projectile { owner: Owner },
}

/// Positioned, sized, moving thing on the play field.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Top-left corner.
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    pub active: bool,
    pub color: ColorRgba,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            velocity: Vec2::zero(),
            active: true,
            color: ColorRgba::white(),
            kind: EntityKind::Generic,
        }
    }

    pub fn player(x: f32, y: f32) -> Self {
        Self {
            color: ColorRgba::new(0.0, 1.0, 0.0, 1.0),
            kind: EntityKind::Player { cooldown: 0.0 },
            ..Self::new(x, y, PLAYER_SIZE.x, PLAYER_SIZE.y)
        }
    }

    /// Rank 1 is magenta, rank 2 cyan, anything else light grey.
    pub fn invader(x: f32, y: f32, rank: u8) -> Self {
        let color = match rank {
            1 => ColorRgba::new(1.0, 0.0, 1.0, 1.0),
            2 => ColorRgba::new(0.0, 1.0, 1.0, 1.0),
            _ => ColorRgba::new(0.8, 0.8, 0.8, 1.0),
        };
        Self {
            color,
            kind: EntityKind::Invader { rank },
            ..Self::new(x, y, INVADER_SIZE.x, INVADER_SIZE.y)
        }
    }

    pub fn projectile(x: f32, y: f32, owner: Owner) -> Self {
        let (vy, color) = match owner {
            Owner::Player => (PLAYER_SHOT_SPEED, ColorRgba::new(0.0, 1.0, 0.0, 1.0)),
            Owner::Enemy => (ENEMY_SHOT_SPEED, ColorRgba::new(1.0, 0.0, 0.0, 1.0)),
        };
        Self {
            velocity: Vec2::new(0.0, vy),
            color,
            kind: EntityKind::Projectile { owner },
            ..Self::new(x, y, PROJECTILE_SIZE.x, PROJECTILE_SIZE.y)
        }
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    pub fn cooldown(&self) -> Option<f32> {
        match self.kind {
            EntityKind::Player { cooldown } => Some(cooldown),
            _ => None,
        }
    }

    pub fn cooldown_mut(&mut self) -> Option<&mut f32> {
        match &mut self.kind {
            EntityKind::Player { cooldown } => Some(cooldown),
            _ => None,
        }
    }

    pub fn rank(&self) -> Option<u8> {
        match self.kind {
            EntityKind::Invader { rank } => Some(rank),
            _ => None,
        }
    }

    pub fn owner(&self) -> Option<Owner> {
        match self.kind {
            EntityKind::Projectile { owner } => Some(owner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_entity_starts_active_and_still() {
        let e = Entity::new(1.0, 2.0, 3.0, 4.0);
        assert!(e.active);
        assert_eq!(e.velocity, Vec2::zero());
        assert_eq!(e.kind, EntityKind::Generic);
        assert_eq!(e.bounds(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn kinds_carry_their_sizes_and_fields() {
        let p = Entity::player(0.0, 0.0);
        assert_eq!(p.size, PLAYER_SIZE);
        assert_eq!(p.cooldown(), Some(0.0));

        let i = Entity::invader(0.0, 0.0, 2);
        assert_eq!(i.size, INVADER_SIZE);
        assert_eq!(i.rank(), Some(2));
        assert_eq!(i.color, ColorRgba::new(0.0, 1.0, 1.0, 1.0));
        assert_eq!(i.cooldown(), None);
    }

    #[test]
    fn projectile_owner_sets_direction_and_tint() {
        let mine = Entity::projectile(0.0, 0.0, Owner::Player);
        assert_eq!(mine.velocity.y, -500.0);
        assert_eq!(mine.owner(), Some(Owner::Player));

        let theirs = Entity::projectile(0.0, 0.0, Owner::Enemy);
        assert_eq!(theirs.velocity.y, 200.0);
        assert_eq!(theirs.color, ColorRgba::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn cooldown_is_writable_on_players_only() {
        let mut p = Entity::player(0.0, 0.0);
        if let Some(c) = p.cooldown_mut() {
            *c = 0.5;
        }
        assert_eq!(p.cooldown(), Some(0.5));
        let mut inv = Entity::invader(0.0, 0.0, 1);
        assert!(inv.cooldown_mut().is_none());
    }
}
