// One sum type over every unit in the arena, with a single dispatch
// point per operation. Variants own their state payloads; the registry
// (a Vec in insertion order) owns the variants.

mod hostile;
mod player;

pub use hostile::{DeadEnemy, Enemy, FriendlyEnemy, DECAY_TICKS};
pub use player::{ChargedAction, Player, Usage};

use crate::engine::input::InputState;
use crate::engine::{Point, Renderer};

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Player(Player),
    Enemy(Enemy),
    FriendlyEnemy(FriendlyEnemy),
    DeadEnemy(DeadEnemy),
}

impl Entity {
    /// Advance one tick (1/60 s, fixed step). Mutates only the entity's
    /// own state.
    pub fn advance(&mut self, input: &InputState) {
        match self {
            Entity::Player(player) => player.advance(input),
            Entity::Enemy(enemy) => enemy.advance(input),
            Entity::FriendlyEnemy(friendly) => friendly.advance(input),
            Entity::DeadEnemy(corpse) => corpse.advance(input),
        }
    }

    /// Draw the current state; no side effects beyond the surface.
    pub fn render(&self, renderer: &Renderer) {
        match self {
            Entity::Player(player) => player.render(renderer),
            Entity::Enemy(enemy) => enemy.render(renderer),
            Entity::FriendlyEnemy(friendly) => friendly.render(renderer),
            Entity::DeadEnemy(corpse) => corpse.render(renderer),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Entity::Player(player) => player.position(),
            Entity::Enemy(enemy) => enemy.position(),
            Entity::FriendlyEnemy(friendly) => friendly.position(),
            Entity::DeadEnemy(corpse) => corpse.position(),
        }
    }
}

impl From<Player> for Entity {
    fn from(player: Player) -> Self {
        Entity::Player(player)
    }
}

impl From<Enemy> for Entity {
    fn from(enemy: Enemy) -> Self {
        Entity::Enemy(enemy)
    }
}

impl From<FriendlyEnemy> for Entity {
    fn from(friendly: FriendlyEnemy) -> Self {
        Entity::FriendlyEnemy(friendly)
    }
}

impl From<DeadEnemy> for Entity {
    fn from(corpse: DeadEnemy) -> Self {
        Entity::DeadEnemy(corpse)
    }
}
