// --- Ship ---
pub const PLAYER_SPEED: f64 = 0.1; // Units per frame while thrusting
pub const PLAYER_BRAKE_FACTOR: f64 = 0.5;
pub const PLAYER_ROTATION_SPEED: f64 = 0.05; // Radians per frame

// --- Lasers ---
pub const LASER_SPEED: f64 = 2.0;
pub const LASER_LIFE: u32 = 100; // Frames
pub const MAX_LASER_LIFE: u32 = 10_000;
pub const LASER_MUZZLE_OFFSET: f64 = 2.0;

// --- Spawning ---
pub const ENEMY_SPAWN_RATE: f64 = 0.02; // Chance per frame
pub const ASTEROID_SPAWN_RATE: f64 = 0.01; // Chance per frame
pub const INITIAL_ASTEROIDS: usize = 50;
pub const SPAWN_CUBE_SIZE: f64 = 200.0;
pub const ASTEROID_RESET_DISTANCE: f64 = 1000.0;
pub const ASTEROID_RESET_Z_SHIFT: f64 = -200.0;
pub const ASTEROID_MIN_SIZE: f64 = 0.5;
pub const ASTEROID_SIZE_SPREAD: f64 = 2.0;
pub const ASTEROID_DRIFT: f64 = 0.02;

// --- Enemies ---
pub const ENEMY_STEP: f64 = 0.05;
pub const ENEMY_SPAWN_SPREAD: f64 = 50.0;
pub const ENEMY_SPAWN_MIN_DEPTH: f64 = 30.0;
pub const ENEMY_SPAWN_DEPTH_SPREAD: f64 = 20.0;
pub const ENEMY_DESPAWN_DISTANCE: f64 = 200.0;

// --- Collision radii ---
pub const ENEMY_HIT_RADIUS: f64 = 2.0;
pub const LASER_HIT_RADIUS: f64 = 2.0;

// --- Star field ---
pub const STAR_COUNT: usize = 1000;
pub const STAR_MIN_RADIUS: f64 = 1000.0;
pub const STAR_RADIUS_SPREAD: f64 = 4000.0;
pub const STAR_FIELD_SPIN_X: f64 = 0.0001;
pub const STAR_FIELD_SPIN_Y: f64 = 0.0002;

// --- Explosions ---
pub const EXPLOSION_START_OPACITY: f64 = 0.8;
pub const EXPLOSION_GROWTH: f64 = 0.1;
pub const EXPLOSION_FADE: f64 = 0.05;

// --- Rewards and progression ---
pub const ASTEROID_EXPERIENCE_REWARD: i64 = 10;
pub const ASTEROID_CREDIT_REWARD: i64 = 50;
pub const EXPERIENCE_PER_LEVEL: i64 = 100;
pub const STARTING_CREDITS: i64 = 1000;
pub const MAX_ENERGY: i64 = 100;
pub const MAX_HEALTH: i64 = 100;

// --- Camera ---
pub const CAMERA_FOV_DEGREES: f64 = 75.0;
pub const CAMERA_NEAR: f64 = 0.1;
pub const CAMERA_FAR: f64 = 10000.0;
pub const CAMERA_FOLLOW_LERP: f64 = 0.1;
pub const CAMERA_OFFSET: (f64, f64, f64) = (0.0, 2.0, 5.0);
pub const TERMINAL_ASPECT_RATIO_COMPENSATION: f64 = 2.0; // Terminal cells are about twice as tall as wide

// --- UI ---
pub const INVENTORY_SLOTS: usize = 30;
pub const NOTIFICATION_DURATION_MS: u64 = 3000;
pub const ERROR_NOTIFICATION_DURATION_MS: u64 = 60_000;
pub const MAX_NOTIFICATION_DURATION_MS: u64 = 600_000;
pub const FLASH_DURATION_MS: u64 = 100;
pub const MINIMAP_WIDTH: u16 = 22;
pub const MINIMAP_HEIGHT: u16 = 11;
pub const MINIMAP_SCALE: f64 = 2.0;
pub const MINIMAP_VIEW_SIZE: f64 = 200.0;
pub const MIN_TERMINAL_WIDTH: u16 = 40;
pub const MIN_TERMINAL_HEIGHT: u16 = 12;

// --- Loop ---
pub const TARGET_FPS: u64 = 30;
pub const LOADING_TICK_MAX_PERCENT: f64 = 15.0;
