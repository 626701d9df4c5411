use std::f64::consts::{FRAC_PI_4, PI};

use rand::Rng;

use crate::camera::Camera;
use crate::constants::*;
use crate::rendering::GameGrid;
use crate::types::Vector3;

/// Uniform sample in `[-spread / 2, spread / 2)`.
fn centered(rng: &mut impl Rng, spread: f64) -> f64 {
    (rng.gen_range(0.0..1.0) - 0.5) * spread
}

// --- Player ship ---
pub struct Ship {
    pub position: Vector3,
    pub yaw: f64, // Radians; 0 faces -Z
}

impl Default for Ship {
    fn default() -> Self {
        Ship { position: Vector3::ZERO, yaw: 0.0 }
    }
}

impl Ship {
    pub fn forward(&self) -> Vector3 {
        Vector3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn thrust(&mut self, speed: f64) {
        self.position = self.position.add(self.forward().scale(speed));
    }

    pub fn brake(&mut self, speed: f64) {
        self.position = self.position.sub(self.forward().scale(speed * PLAYER_BRAKE_FACTOR));
    }

    pub fn rotate(&mut self, amount: f64) {
        self.yaw += amount;
    }

    pub fn rotation(&self) -> Vector3 {
        Vector3::new(0.0, self.yaw, 0.0)
    }

    pub fn draw(&self, grid: &mut GameGrid, camera: &Camera) {
        let Some(p) = camera.project(self.position, grid.width, grid.height) else {
            return;
        };
        grid.plot(p.x - 1, p.y, '/');
        grid.plot(p.x, p.y, Ship::heading_char(self.yaw));
        grid.plot(p.x + 1, p.y, '\\');
    }

    /// Nose glyph for the heading, seen from the chase camera.
    pub fn heading_char(yaw: f64) -> char {
        // Octants measured from -Z, positive yaw turns left.
        let a = yaw.rem_euclid(2.0 * PI);
        if a < FRAC_PI_4 || a >= 7.0 * FRAC_PI_4 {
            '^'
        } else if a < 3.0 * FRAC_PI_4 {
            '<'
        } else if a < 5.0 * FRAC_PI_4 {
            'v'
        } else {
            '>'
        }
    }
}

// --- Asteroids ---
pub struct Asteroid {
    pub position: Vector3,
    pub rotation: Vector3,
    pub velocity: Vector3,
    pub rotation_velocity: Vector3,
    pub size: f64,
}

impl Asteroid {
    pub fn new(rng: &mut impl Rng) -> Self {
        let size = ASTEROID_MIN_SIZE + rng.gen_range(0.0..1.0) * ASTEROID_SIZE_SPREAD;
        let position = Asteroid::spawn_position(rng, 0.0);
        let rotation = Vector3::new(rng.gen_range(0.0..PI), rng.gen_range(0.0..PI), rng.gen_range(0.0..PI));
        let velocity = Vector3::new(
            centered(rng, ASTEROID_DRIFT),
            centered(rng, ASTEROID_DRIFT),
            centered(rng, ASTEROID_DRIFT),
        );
        let rotation_velocity = Vector3::new(
            centered(rng, ASTEROID_DRIFT),
            centered(rng, ASTEROID_DRIFT),
            centered(rng, ASTEROID_DRIFT),
        );
        Asteroid { position, rotation, velocity, rotation_velocity, size }
    }

    /// Random point in the spawn cube, shifted along Z.
    pub fn spawn_position(rng: &mut impl Rng, z_shift: f64) -> Vector3 {
        Vector3::new(
            centered(rng, SPAWN_CUBE_SIZE),
            centered(rng, SPAWN_CUBE_SIZE),
            centered(rng, SPAWN_CUBE_SIZE) + z_shift,
        )
    }

    /// Drifts and spins; teleports back into the field once past `reset_distance`.
    pub fn update(&mut self, rng: &mut impl Rng, reset_distance: f64) {
        self.rotation = self.rotation.add(self.rotation_velocity);
        self.position = self.position.add(self.velocity);
        if self.position.length() > reset_distance {
            self.position = Asteroid::spawn_position(rng, ASTEROID_RESET_Z_SHIFT);
        }
    }

    pub fn draw(&self, grid: &mut GameGrid, camera: &Camera) {
        let Some(p) = camera.project(self.position, grid.width, grid.height) else {
            return;
        };
        let apparent = self.size / p.depth * grid.height as f64;
        if apparent >= 3.0 {
            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                grid.plot(p.x + dx, p.y + dy, '#');
            }
            grid.plot(p.x, p.y, '@');
        } else if apparent >= 1.0 {
            grid.plot(p.x, p.y, 'O');
        } else if apparent >= 0.3 {
            grid.plot(p.x, p.y, 'o');
        } else {
            grid.plot(p.x, p.y, '.');
        }
    }
}

// --- Enemies ---
pub struct Enemy {
    pub position: Vector3,
    pub rotation: Vector3,
}

impl Enemy {
    /// Spawns ahead of the player, scattered around its line of flight.
    pub fn near(player: Vector3, rng: &mut impl Rng) -> Self {
        let position = Vector3::new(
            player.x + centered(rng, ENEMY_SPAWN_SPREAD),
            player.y + centered(rng, ENEMY_SPAWN_SPREAD),
            player.z - ENEMY_SPAWN_MIN_DEPTH - rng.gen_range(0.0..1.0) * ENEMY_SPAWN_DEPTH_SPREAD,
        );
        Enemy { position, rotation: Vector3::ZERO }
    }

    pub fn at(position: Vector3) -> Self {
        Enemy { position, rotation: Vector3::ZERO }
    }

    /// Moves a fixed step toward `target` and spins.
    pub fn update(&mut self, target: Vector3, step: f64) {
        let direction = target.sub(self.position).normalize();
        self.position = self.position.add(direction.scale(step));
        self.rotation.x += 0.01;
        self.rotation.y += 0.02;
    }

    pub fn draw(&self, grid: &mut GameGrid, camera: &Camera) {
        if let Some(p) = camera.project(self.position, grid.width, grid.height) {
            grid.plot(p.x, p.y, if p.depth < 20.0 { 'X' } else { 'x' });
        }
    }
}

// --- Lasers ---
pub struct Laser {
    pub position: Vector3,
    pub velocity: Vector3,
    pub life: u32, // Frames left
}

impl Laser {
    pub fn new(position: Vector3, velocity: Vector3, life: u32) -> Self {
        Laser { position, velocity, life }
    }

    pub fn update(&mut self) {
        self.position = self.position.add(self.velocity);
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_spent(&self) -> bool {
        self.life == 0
    }

    pub fn draw(&self, grid: &mut GameGrid, camera: &Camera) {
        if let Some(p) = camera.project(self.position, grid.width, grid.height) {
            grid.plot(p.x, p.y, '|');
        }
    }
}

// --- Star field ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarColor {
    White,
    Blue,
    Red,
}

impl StarColor {
    pub fn glyph(self) -> char {
        match self {
            StarColor::White => '.',
            StarColor::Blue => '+',
            StarColor::Red => '*',
        }
    }
}

pub struct Star {
    pub position: Vector3,
    pub color: StarColor,
}

impl Star {
    pub fn new(rng: &mut impl Rng) -> Self {
        let radius = STAR_MIN_RADIUS + rng.gen_range(0.0..1.0) * STAR_RADIUS_SPREAD;
        let theta = rng.gen_range(0.0..2.0 * PI);
        let phi = rng.gen_range(0.0..PI);
        let position = Vector3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        );
        let color = match rng.gen_range(0.0..1.0) {
            c if c < 0.7 => StarColor::White,
            c if c < 0.85 => StarColor::Blue,
            _ => StarColor::Red,
        };
        Star { position, color }
    }
}

/// Point cloud that turns slowly as one body.
pub struct StarField {
    pub stars: Vec<Star>,
    pub rotation: Vector3,
}

impl StarField {
    pub fn new(count: usize, rng: &mut impl Rng) -> Self {
        StarField { stars: (0..count).map(|_| Star::new(rng)).collect(), rotation: Vector3::ZERO }
    }

    pub fn update(&mut self) {
        self.rotation.y += STAR_FIELD_SPIN_Y;
        self.rotation.x += STAR_FIELD_SPIN_X;
    }

    pub fn draw(&self, grid: &mut GameGrid, camera: &Camera) {
        for star in &self.stars {
            let direction = star.position.rotate_xy(self.rotation.x, self.rotation.y);
            if let Some(p) = camera.project_direction(direction, grid.width, grid.height) {
                grid.plot(p.x, p.y, star.color.glyph());
            }
        }
    }
}

// --- Explosions ---
pub struct Explosion {
    pub position: Vector3,
    pub scale: f64,
    pub opacity: f64,
}

impl Explosion {
    pub fn new(position: Vector3) -> Self {
        Explosion { position, scale: 1.0, opacity: EXPLOSION_START_OPACITY }
    }

    pub fn update(&mut self) {
        self.scale += EXPLOSION_GROWTH;
        self.opacity -= EXPLOSION_FADE;
    }

    pub fn is_faded(&self) -> bool {
        self.opacity <= 0.0
    }

    pub fn draw(&self, grid: &mut GameGrid, camera: &Camera) {
        let Some(p) = camera.project(self.position, grid.width, grid.height) else {
            return;
        };
        let glyph = if self.opacity > 0.5 {
            '*'
        } else if self.opacity > 0.25 {
            '+'
        } else {
            '.'
        };
        let reach = self.scale.round() as i32;
        for (dx, dy) in [(0, 0), (-reach * 2, 0), (reach * 2, 0), (0, -reach), (0, reach)] {
            grid.plot(p.x + dx, p.y + dy, glyph);
        }
    }
}
