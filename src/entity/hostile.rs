use crate::engine::input::InputState;
use crate::engine::{Point, Renderer};

const ENEMY_SIZE: f64 = 15.0;
const ENEMY_COLOR: &str = "#e72015";
const FRIENDLY_COLOR: &str = "#20e715";
const CORPSE_SIZE: f64 = 15.0;
const CORPSE_COLOR: &str = "#777777";

/// Ticks a corpse takes to rot away completely.
pub const DECAY_TICKS: u32 = 120;

/// Hostile placeholder: sits on its spawn point and gets drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    position: Point,
}

impl Enemy {
    pub fn new(position: Point) -> Self {
        Enemy { position }
    }

    pub fn advance(&mut self, _input: &InputState) {
        // TODO: step toward the player once entities can see each other
        // during a tick.
    }

    pub fn render(&self, renderer: &Renderer) {
        renderer.draw_circle(self.position.x, self.position.y, ENEMY_SIZE, Some(ENEMY_COLOR));
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// A summoned ally. Placeholder like [`Enemy`], only the color differs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriendlyEnemy {
    position: Point,
}

impl FriendlyEnemy {
    pub fn new(position: Point) -> Self {
        FriendlyEnemy { position }
    }

    pub fn advance(&mut self, _input: &InputState) {
        // TODO: patrol around the player and engage enemies.
    }

    pub fn render(&self, renderer: &Renderer) {
        renderer.draw_circle(
            self.position.x,
            self.position.y,
            ENEMY_SIZE,
            Some(FRIENDLY_COLOR),
        );
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// What is left after an enemy dies: a square that rots away over
/// [`DECAY_TICKS`] ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadEnemy {
    position: Point,
    decay: u32,
}

impl DeadEnemy {
    pub fn new(position: Point) -> Self {
        DeadEnemy {
            position,
            decay: DECAY_TICKS,
        }
    }

    pub fn advance(&mut self, _input: &InputState) {
        if self.decay > 0 {
            self.decay -= 1;
        }
        // TODO: leave the registry at zero decay; inside an active summon
        // ring the corpse becomes a FriendlyEnemy instead. Both need
        // registry-level replacement.
    }

    /// Side of the rendered square, shrinking linearly with the decay
    /// counter until it reaches zero.
    pub fn side(&self) -> f64 {
        CORPSE_SIZE / DECAY_TICKS as f64 * self.decay as f64
    }

    pub fn render(&self, renderer: &Renderer) {
        renderer.draw_square(self.position.x, self.position.y, self.side(), Some(CORPSE_COLOR));
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn decay(&self) -> u32 {
        self.decay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpse_square_shrinks_linearly() {
        let mut corpse = DeadEnemy::new(Point { x: 10.0, y: 10.0 });
        let input = InputState::new();

        assert_eq!(corpse.side(), CORPSE_SIZE);

        for _ in 0..DECAY_TICKS / 2 {
            corpse.advance(&input);
        }
        assert_eq!(corpse.side(), CORPSE_SIZE / 2.0);

        for _ in 0..DECAY_TICKS / 2 {
            corpse.advance(&input);
        }
        assert_eq!(corpse.side(), 0.0);
    }

    #[test]
    fn fully_decayed_corpse_stays_at_zero() {
        let mut corpse = DeadEnemy::new(Point::default());
        let input = InputState::new();

        for _ in 0..DECAY_TICKS + 10 {
            corpse.advance(&input);
        }
        assert_eq!(corpse.decay(), 0);
        assert_eq!(corpse.side(), 0.0);
    }

    #[test]
    fn placeholders_hold_their_spawn_point() {
        let mut enemy = Enemy::new(Point { x: 50.0, y: 30.0 });
        let mut friendly = FriendlyEnemy::new(Point { x: 90.0, y: 120.0 });
        let input = InputState::new();

        for _ in 0..10 {
            enemy.advance(&input);
            friendly.advance(&input);
        }

        assert_eq!(enemy.position(), Point { x: 50.0, y: 30.0 });
        assert_eq!(friendly.position(), Point { x: 90.0, y: 120.0 });
    }
}
