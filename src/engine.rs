use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::constants::*;
use crate::controls::Controls;
use crate::entities::{Asteroid, Enemy, Explosion, Laser, Ship, StarField};
use crate::error::{GameError, GameResult};
use crate::player::PlayerStats;
use crate::rendering::GameGrid;
use crate::types::Vector3;

/// Side effects the engine asks the controller to carry out.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    LaserFired,
    EnemySpawned,
    /// An enemy reached the ship; the screen should flash.
    PlayerHit,
    AsteroidDestroyed { position: Vector3 },
    LevelUp { level: u32 },
}

pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    pub ship: Ship,
    pub camera: Camera,
    pub star_field: StarField,
    pub asteroids: Vec<Asteroid>,
    pub enemies: Vec<Enemy>,
    pub lasers: Vec<Laser>,
    pub explosions: Vec<Explosion>,
    elapsed_frames: u64,
    initialized: bool,
    events: Vec<EngineEvent>,
}

impl GameEngine {
    pub fn new(config: &GameConfig, rng: StdRng) -> Self {
        GameEngine {
            config: config.clone(),
            rng,
            ship: Ship::default(),
            camera: Camera::default(),
            star_field: StarField { stars: Vec::new(), rotation: Vector3::ZERO },
            asteroids: Vec::new(),
            enemies: Vec::new(),
            lasers: Vec::new(),
            explosions: Vec::new(),
            elapsed_frames: 0,
            initialized: false,
            events: Vec::new(),
        }
    }

    /// Builds the scene for a view of `width` x `height` cells.
    pub fn init(&mut self, width: u16, height: u16) -> GameResult<()> {
        info!("Initialising game engine...");
        if width < MIN_TERMINAL_WIDTH || height < MIN_TERMINAL_HEIGHT {
            return Err(GameError::TerminalTooSmall {
                width,
                height,
                min_width: MIN_TERMINAL_WIDTH,
                min_height: MIN_TERMINAL_HEIGHT,
            });
        }

        self.camera = Camera::default();
        self.ship = Ship::default();
        info!("Camera and player ship created");

        self.star_field = StarField::new(self.config.star_count, &mut self.rng);
        info!("Star field created ({} stars)", self.star_field.stars.len());

        self.asteroids = (0..self.config.initial_asteroids).map(|_| Asteroid::new(&mut self.rng)).collect();
        info!("Asteroids created ({})", self.asteroids.len());

        self.initialized = true;
        info!("Game engine ready");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies this frame's intents to the ship, fires if asked, moves the
    /// camera and mirrors the ship pose into `stats`.
    pub fn update_player(&mut self, controls: &mut Controls, stats: &mut PlayerStats) {
        if !self.initialized {
            return;
        }

        if controls.thrust {
            self.ship.thrust(self.config.player_speed);
        }
        if controls.brake {
            self.ship.brake(self.config.player_speed);
        }
        if controls.left {
            self.ship.rotate(self.config.player_rotation_speed);
        }
        if controls.right {
            self.ship.rotate(-self.config.player_rotation_speed);
        }
        if controls.shoot {
            self.shoot();
            controls.shoot = false;
        }

        self.camera.follow(self.ship.position);

        stats.position = self.ship.position;
        stats.rotation = self.ship.rotation();
    }

    pub fn shoot(&mut self) {
        let forward = self.ship.forward();
        let muzzle = self.ship.position.add(forward.scale(LASER_MUZZLE_OFFSET));
        let velocity = forward.scale(self.config.laser_speed);
        self.lasers.push(Laser::new(muzzle, velocity, self.config.laser_life));
        self.events.push(EngineEvent::LaserFired);
        debug!("Laser fired ({} in flight)", self.lasers.len());
    }

    /// Advances the world by one frame.
    pub fn update(&mut self) {
        if !self.initialized {
            return;
        }
        self.elapsed_frames += 1;

        self.update_asteroids();
        self.update_lasers();

        if self.roll(self.config.enemy_spawn_rate) {
            self.spawn_enemy();
        }
        self.update_enemies();

        if self.roll(self.config.asteroid_spawn_rate) {
            self.asteroids.push(Asteroid::new(&mut self.rng));
        }

        self.star_field.update();

        self.explosions.retain_mut(|explosion| {
            explosion.update();
            !explosion.is_faded()
        });
    }

    fn roll(&mut self, probability: f64) -> bool {
        self.rng.gen_range(0.0..1.0) < probability
    }

    fn update_asteroids(&mut self) {
        let reset_distance = self.config.asteroid_reset_distance;
        for asteroid in &mut self.asteroids {
            asteroid.update(&mut self.rng, reset_distance);
        }
    }

    fn update_lasers(&mut self) {
        self.lasers.retain_mut(|laser| {
            laser.update();
            !laser.is_spent()
        });
    }

    fn spawn_enemy(&mut self) {
        self.enemies.push(Enemy::near(self.ship.position, &mut self.rng));
        self.events.push(EngineEvent::EnemySpawned);
        debug!("Enemy spawned ({} active)", self.enemies.len());
    }

    fn update_enemies(&mut self) {
        let player = self.ship.position;
        let step = self.config.enemy_step;
        let hit_radius = self.config.enemy_hit_radius;
        let events = &mut self.events;
        self.enemies.retain_mut(|enemy| {
            enemy.update(player, step);
            let distance = enemy.position.distance_to(player);
            if distance < hit_radius {
                info!("Enemy collided with the player");
                events.push(EngineEvent::PlayerHit);
                return false;
            }
            distance <= ENEMY_DESPAWN_DISTANCE
        });
    }

    /// Laser-vs-asteroid pass. Each laser destroys at most the first asteroid
    /// in reach, scanning newest to oldest; both are removed and the player is
    /// rewarded.
    pub fn handle_collisions(&mut self, stats: &mut PlayerStats) {
        let hit_radius = self.config.laser_hit_radius;
        let mut i = self.lasers.len();
        while i > 0 {
            i -= 1;
            let laser_position = self.lasers[i].position;
            let Some(j) = self
                .asteroids
                .iter()
                .rposition(|asteroid| asteroid.position.distance_to(laser_position) < hit_radius)
            else {
                continue;
            };

            let asteroid = self.asteroids.remove(j);
            self.lasers.remove(i);
            self.explosions.push(Explosion::new(asteroid.position));
            self.events.push(EngineEvent::AsteroidDestroyed { position: asteroid.position });

            stats.add_credits(ASTEROID_CREDIT_REWARD);
            if let Some(level) = stats.add_experience(ASTEROID_EXPERIENCE_REWARD) {
                self.events.push(EngineEvent::LevelUp { level });
            }
        }
    }

    /// Draws the scene back to front: stars, asteroids, enemies, effects, ship.
    pub fn render(&self, grid: &mut GameGrid) {
        if !self.initialized {
            return;
        }
        self.star_field.draw(grid, &self.camera);
        for asteroid in &self.asteroids {
            asteroid.draw(grid, &self.camera);
        }
        for enemy in &self.enemies {
            enemy.draw(grid, &self.camera);
        }
        for laser in &self.lasers {
            laser.draw(grid, &self.camera);
        }
        for explosion in &self.explosions {
            explosion.draw(grid, &self.camera);
        }
        self.ship.draw(grid, &self.camera);
    }
}
