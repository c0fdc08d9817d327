use invaders_engine::coords::Vec2;
use rand::Rng;

/// Screen shake and hit-stop timers.
///
/// Both timers count down every frame, including frames where gameplay is frozen.
#[derive(Debug, Default, Clone)]
pub struct ArcadeSystems {
    shake_time: f32,
    shake_magnitude: f32,
    hit_stop_time: f32,
}

impl ArcadeSystems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32) {
        if self.shake_time > 0.0 {
            self.shake_time -= dt;
        }
        if self.hit_stop_time > 0.0 {
            self.hit_stop_time -= dt;
        }
    }

    /// Starts a shake, replacing any shake in progress.
    pub fn trigger_shake(&mut self, magnitude: f32, duration: f32) {
        self.shake_magnitude = magnitude;
        self.shake_time = duration;
    }

    /// Freezes gameplay for `duration` seconds, replacing any freeze in progress.
    pub fn trigger_hit_stop(&mut self, duration: f32) {
        self.hit_stop_time = duration;
    }

    /// Fresh random offset within ±magnitude while shaking, else zero.
    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset_with(&mut rand::thread_rng())
    }

    pub fn shake_offset_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if !self.is_shaking() || self.shake_magnitude <= 0.0 {
            return Vec2::zero();
        }
        let m = self.shake_magnitude;
        Vec2::new(rng.gen_range(-m..=m), rng.gen_range(-m..=m))
    }

    #[inline]
    pub fn is_shaking(&self) -> bool {
        self.shake_time > 0.0
    }

    #[inline]
    pub fn is_hit_stop_active(&self) -> bool {
        self.hit_stop_time > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // ── shake ─────────────────────────────────────────────────────────────

    #[test]
    fn idle_shake_is_zero() {
        assert_eq!(ArcadeSystems::new().shake_offset(), Vec2::zero());
    }

    #[test]
    fn shake_offset_is_bounded_by_magnitude() {
        let mut arcade = ArcadeSystems::new();
        arcade.trigger_shake(5.0, 0.2);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let o = arcade.shake_offset_with(&mut rng);
            assert!(o.x.abs() <= 5.0 && o.y.abs() <= 5.0);
        }
    }

    #[test]
    fn shake_expires_after_duration() {
        let mut arcade = ArcadeSystems::new();
        arcade.trigger_shake(10.0, 0.5);
        arcade.update(0.3);
        assert!(arcade.is_shaking());
        arcade.update(0.3);
        assert!(!arcade.is_shaking());
        assert_eq!(arcade.shake_offset(), Vec2::zero());
    }

    #[test]
    fn retrigger_overwrites_running_shake() {
        let mut arcade = ArcadeSystems::new();
        arcade.trigger_shake(10.0, 0.5);
        arcade.trigger_shake(5.0, 0.2);
        arcade.update(0.25);
        assert!(!arcade.is_shaking());
    }

    // ── hit-stop ──────────────────────────────────────────────────────────

    #[test]
    fn hit_stop_counts_down() {
        let mut arcade = ArcadeSystems::new();
        arcade.trigger_hit_stop(0.1);
        assert!(arcade.is_hit_stop_active());
        arcade.update(0.05);
        assert!(arcade.is_hit_stop_active());
        arcade.update(0.06);
        assert!(!arcade.is_hit_stop_active());
    }
}
