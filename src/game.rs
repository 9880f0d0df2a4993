use crate::browser;
use crate::engine::input::InputState;
use crate::engine::{Game, Point, Renderer};
use crate::entity::{DeadEnemy, Enemy, Entity, FriendlyEnemy, Player};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Initial arena layout, fetched as JSON at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scene {
    pub player: SpawnPoint,
    #[serde(default)]
    pub enemies: Vec<SpawnPoint>,
    #[serde(default)]
    pub friendlies: Vec<SpawnPoint>,
    #[serde(default)]
    pub corpses: Vec<SpawnPoint>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SpawnPoint {
    pub x: f64,
    pub y: f64,
}

impl From<SpawnPoint> for Point {
    fn from(spawn: SpawnPoint) -> Self {
        Point {
            x: spawn.x,
            y: spawn.y,
        }
    }
}

impl Scene {
    /// The placeholder room from the prototype; used when scene.json is
    /// missing or malformed.
    fn fallback() -> Self {
        Scene {
            player: SpawnPoint { x: 50.0, y: 60.0 },
            enemies: vec![
                SpawnPoint { x: 50.0, y: 30.0 },
                SpawnPoint { x: 30.0, y: 90.0 },
                SpawnPoint { x: 120.0, y: 30.0 },
            ],
            friendlies: Vec::new(),
            corpses: Vec::new(),
        }
    }
}

/// The entity registry. Insertion order is update order and draw order
/// (painter's algorithm): later entities draw over earlier ones.
pub struct Arena {
    entities: Vec<Entity>,
}

impl Arena {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut entities: Vec<Entity> = Vec::new();
        entities.push(Player::new(scene.player.into()).into());
        entities.extend(
            scene
                .enemies
                .iter()
                .map(|spawn| Enemy::new((*spawn).into()).into()),
        );
        entities.extend(
            scene
                .friendlies
                .iter()
                .map(|spawn| FriendlyEnemy::new((*spawn).into()).into()),
        );
        entities.extend(
            scene
                .corpses
                .iter()
                .map(|spawn| DeadEnemy::new((*spawn).into()).into()),
        );
        Arena { entities }
    }

    /// Every entity advances exactly once per tick, in registry order.
    pub fn update(&mut self, input: &InputState) {
        for entity in &mut self.entities {
            entity.advance(input);
        }
    }

    /// Every entity renders exactly once per frame, in registry order.
    pub fn draw(&self, renderer: &Renderer) {
        for entity in &self.entities {
            entity.render(renderer);
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

pub enum SummonerArena {
    /// Waiting for the scene description to arrive.
    Loading,
    Loaded(Arena),
}

impl SummonerArena {
    const SCENE_PATH: &'static str = "scene.json";

    pub fn new() -> Self {
        SummonerArena::Loading
    }

    async fn load_scene() -> Result<Scene> {
        browser::fetch_json::<Scene>(Self::SCENE_PATH)
            .await
            .with_context(|| format!("Failed to load scene from : {}", Self::SCENE_PATH))
    }
}

impl Default for SummonerArena {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Game for SummonerArena {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            SummonerArena::Loading => {
                let scene = match Self::load_scene().await {
                    Ok(scene) => scene,
                    Err(err) => {
                        log!("{:#?}; falling back to the built-in scene", err);
                        Scene::fallback()
                    }
                };
                let arena = Arena::from_scene(&scene);
                log!("arena ready : {} entities", arena.entities().len());
                Ok(Box::new(SummonerArena::Loaded(arena)))
            }
            SummonerArena::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, input: &InputState) {
        if let SummonerArena::Loaded(arena) = self {
            arena.update(input);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        renderer.clear();
        if let SummonerArena::Loaded(arena) = self {
            arena.draw(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::InputEvent;
    use crate::entity::DECAY_TICKS;

    #[test]
    fn fallback_scene_spawns_in_insertion_order() {
        let arena = Arena::from_scene(&Scene::fallback());
        let entities = arena.entities();

        assert_eq!(entities.len(), 4);
        assert!(matches!(entities[0], Entity::Player(_)));
        assert!(matches!(entities[1], Entity::Enemy(_)));
        assert!(matches!(entities[2], Entity::Enemy(_)));
        assert!(matches!(entities[3], Entity::Enemy(_)));

        let positions: Vec<Point> = entities.iter().map(Entity::position).collect();
        assert_eq!(
            positions,
            vec![
                Point { x: 50.0, y: 60.0 },
                Point { x: 50.0, y: 30.0 },
                Point { x: 30.0, y: 90.0 },
                Point { x: 120.0, y: 30.0 },
            ]
        );
    }

    #[test]
    fn scene_lists_deserialize_with_defaults() {
        let scene: Scene = serde_json::from_str(r#"{ "player": { "x": 1.0, "y": 2.0 } }"#)
            .expect("scene with only a player should parse");
        assert!(scene.enemies.is_empty());
        assert!(scene.friendlies.is_empty());
        assert!(scene.corpses.is_empty());
    }

    #[test]
    fn every_entity_advances_exactly_once_per_tick() {
        let mut scene = Scene::fallback();
        scene.corpses.push(SpawnPoint { x: 140.0, y: 80.0 });
        let mut arena = Arena::from_scene(&scene);

        let input = InputState::new();
        arena.update(&input);

        // the corpse's decay counter is the observable tick count
        match arena.entities().last() {
            Some(Entity::DeadEnemy(corpse)) => assert_eq!(corpse.decay(), DECAY_TICKS - 1),
            other => panic!("expected a corpse at the end of the registry, got {:?}", other),
        }
    }

    #[test]
    fn only_the_player_reacts_to_movement_keys() {
        let mut arena = Arena::from_scene(&Scene::fallback());
        let mut input = InputState::new();
        input.apply(InputEvent::KeyDown("w".into()));

        arena.update(&input);

        let positions: Vec<Point> = arena.entities().iter().map(Entity::position).collect();
        assert_eq!(positions[0], Point { x: 50.0, y: 56.0 });
        assert_eq!(positions[1], Point { x: 50.0, y: 30.0 });
        assert_eq!(positions[2], Point { x: 30.0, y: 90.0 });
        assert_eq!(positions[3], Point { x: 120.0, y: 30.0 });
    }
}
