use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::constants::*;
use crate::controls::Controls;
use crate::engine::{EngineEvent, GameEngine};
use crate::error::{GameResult, StorageError};
use crate::host::{ButtonAction, HostButton, HostEvent};
use crate::miniapp::{MiniApp, ShareOutcome};
use crate::player::PlayerStats;
use crate::rendering::{GameGrid, OutputTarget};
use crate::shop::{self, CATALOG, Purchase};
use crate::terminal_io::SimulatedInput;
use crate::ui::{Modal, NotificationKind, Screen, UiManager};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Loading,
    Menu,
    Playing,
    Paused,
}

/// Top-level controller: boots the game, routes input by state and drives
/// the frame loop.
pub struct SpaceRift {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    simulated_input: Option<SimulatedInput>,
    debug_mode_active: bool,
    max_frames: Option<u64>,

    config: GameConfig,
    state: GameState,
    miniapp: MiniApp,
    engine: GameEngine,
    ui: UiManager,
    stats: PlayerStats,
    controls: Controls,
    grid: GameGrid,
    rng: StdRng,

    running: bool,
    frame_count: u64,
    input_frames: u64,
    loading_step: usize,
}

impl SpaceRift {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: GameConfig,
        miniapp: MiniApp,
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        max_frames: Option<u64>,
        seed: Option<u64>,
    ) -> Self {
        let debug_mode_active = simulated_input.is_some();
        let engine = GameEngine::new(&config, make_rng(seed, 1));
        let ui = UiManager::new(&config);
        SpaceRift {
            terminal_width,
            terminal_height,
            stdout_target,
            simulated_input,
            debug_mode_active,
            max_frames,
            config,
            state: GameState::Loading,
            miniapp,
            engine,
            ui,
            stats: PlayerStats::default(),
            controls: Controls::default(),
            grid: GameGrid::new(terminal_width, terminal_height),
            rng: make_rng(seed, 0),
            running: true,
            frame_count: 0,
            input_frames: 0,
            loading_step: 0,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn ui(&self) -> &UiManager {
        &self.ui
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn run(&mut self) -> GameResult<()> {
        self.begin_boot();
        let frame_budget = Duration::from_millis(1000 / self.config.target_fps.max(1));

        while self.running && self.max_frames.is_none_or(|max| self.frame_count < max) {
            let started = Instant::now();
            self.step()?;
            if !self.debug_mode_active {
                if let Some(rest) = frame_budget.checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
            }
        }

        if self.debug_mode_active {
            if let Some(sb) = self.stdout_target.screen_buffer() {
                sb.print_to_log();
            }
        }
        self.shutdown();
        Ok(())
    }

    /// One frame: input, host events, simulation, UI timers, draw.
    pub fn step(&mut self) -> GameResult<()> {
        self.handle_input()?;
        self.handle_host_events();

        match self.state {
            GameState::Loading => self.advance_boot(),
            GameState::Playing => self.play_frame(),
            GameState::Menu | GameState::Paused => {}
        }

        self.ui.tick();
        self.render()?;
        self.frame_count += 1;
        if self.state != GameState::Loading {
            self.input_frames += 1;
        }
        Ok(())
    }

    // --- Boot ---

    /// Host setup and the loading screen; the rest of the boot runs one
    /// loading step per frame.
    pub fn begin_boot(&mut self) {
        info!("Initialising SpaceRift...");
        self.miniapp.init();
        self.ui.apply_theme(self.miniapp.theme());
        self.ui.pilot_name = self.miniapp.user_name();
        self.ui.show_screen(Screen::Loading);
        self.state = GameState::Loading;
    }

    fn advance_boot(&mut self) {
        let steps = UiManager::loading_steps();
        if let Some(step) = steps.get(self.loading_step) {
            info!("Loading {}...", step);
            self.ui.set_loading_status(&format!("Loading {}...", step));
            self.loading_step += 1;
        }
        let bar_full = self.ui.advance_loading(&mut self.rng);
        if !bar_full || self.loading_step < steps.len() {
            return;
        }

        if let Err(e) = self.finish_boot() {
            error!("Failed to initialise game: {}", e);
            self.ui.show_error(&format!("Failed to initialise game: {e}"));
        }
        self.ui.hide_loading_screen();
        self.enter_menu();
    }

    fn finish_boot(&mut self) -> GameResult<()> {
        self.engine.init(self.grid.width, self.grid.height)?;
        self.ui.update_hud(&self.stats);
        info!("UI initialised");
        self.load_progress()?;
        info!("SpaceRift initialised");
        Ok(())
    }

    fn load_progress(&mut self) -> GameResult<()> {
        let progress = match self.miniapp.load_progress() {
            Ok(progress) => progress,
            Err(e @ StorageError::Malformed { .. }) => {
                warn!("Discarding saved progress: {}", e);
                None
            }
            Err(e) => return Err(e.into()),
        };
        let Some(progress) = progress else {
            info!("No saved progress, starting fresh");
            return Ok(());
        };

        self.stats.restore(&progress);
        for id in &progress.inventory {
            match shop::find_item(id) {
                Some(item) => {
                    self.ui.add_to_inventory(item.to_inventory_item());
                }
                None => warn!("Saved inventory references unknown item '{}'", id),
            }
        }
        self.ui.update_hud(&self.stats);
        info!("Progress restored: level {}, {} credits", self.stats.level, self.stats.credits);
        Ok(())
    }

    fn save_progress(&mut self) {
        let progress = self.stats.progress(self.ui.inventory.item_ids());
        if let Err(e) = self.miniapp.save_progress(&progress) {
            error!("Failed to save progress: {}", e);
            self.ui.show_notification("Save failed", &e.to_string(), NotificationKind::Error);
        }
    }

    // --- State transitions ---

    fn enter_menu(&mut self) {
        self.state = GameState::Menu;
        self.controls.release_all();
        self.ui.show_screen(Screen::MainMenu);
        self.miniapp.host_mut().button(HostButton::Back, ButtonAction::Hide);
    }

    pub fn start_game(&mut self) {
        if !self.engine.is_initialized() {
            self.ui.show_error("Game engine is not ready");
            return;
        }
        info!("Starting game");
        self.state = GameState::Playing;
        self.controls.release_all();
        self.ui.show_screen(Screen::Game);
        self.ui.update_hud(&self.stats);
        self.miniapp.host_mut().button(HostButton::Back, ButtonAction::Show);
        self.miniapp.on_game_start();
    }

    pub fn pause(&mut self) {
        if self.state != GameState::Playing {
            return;
        }
        self.state = GameState::Paused;
        self.controls.release_all();
        self.ui.show_screen(Screen::Paused);
        self.ui.show_notification("Paused", "Press Esc to resume", NotificationKind::Info);
    }

    pub fn resume(&mut self) {
        if self.state != GameState::Paused {
            return;
        }
        self.state = GameState::Playing;
        self.ui.show_screen(Screen::Game);
    }

    fn end_game(&mut self) {
        info!("Game ended with score {}", self.stats.score);
        self.miniapp.on_game_end(self.stats.score);
        self.save_progress();
    }

    pub fn return_to_menu(&mut self) {
        if matches!(self.state, GameState::Playing | GameState::Paused) {
            self.end_game();
        }
        self.enter_menu();
    }

    pub fn quit(&mut self) {
        info!("Quitting");
        if matches!(self.state, GameState::Playing | GameState::Paused) {
            self.end_game();
        } else if self.state == GameState::Menu {
            self.save_progress();
        }
        self.running = false;
    }

    // --- Per-frame simulation ---

    fn play_frame(&mut self) {
        self.engine.update_player(&mut self.controls, &mut self.stats);
        self.ui.update_hud(&self.stats);
        self.engine.handle_collisions(&mut self.stats);
        self.engine.update();
        self.controls.end_frame();

        self.ui.update_minimap(
            self.engine.ship.position,
            self.engine.enemies.iter().map(|e| e.position),
            self.engine.asteroids.iter().map(|a| a.position),
        );

        for event in self.engine.drain_events() {
            self.handle_engine_event(event);
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PlayerHit => {
                self.ui.flash_screen(FLASH_DURATION_MS);
                self.ui.add_screen_shake(1, FLASH_DURATION_MS * 2);
            }
            EngineEvent::LevelUp { level } => {
                self.ui.show_notification(
                    "Level up!",
                    &format!("You reached level {level}"),
                    NotificationKind::Success,
                );
                self.ui.update_hud(&self.stats);
                self.miniapp.on_level_up(level);
            }
            EngineEvent::AsteroidDestroyed { position } => {
                debug!("Asteroid destroyed at ({:.1}, {:.1}, {:.1})", position.x, position.y, position.z);
            }
            EngineEvent::LaserFired | EngineEvent::EnemySpawned => {}
        }
    }

    // --- Input ---

    fn handle_input(&mut self) -> GameResult<()> {
        let mut pending = Vec::new();
        if self.debug_mode_active {
            if self.state != GameState::Loading {
                if let Some(sim_input) = &mut self.simulated_input {
                    while sim_input.poll(self.input_frames)? {
                        pending.push(sim_input.read()?);
                    }
                }
            }
        } else {
            while event::poll(Duration::ZERO).map_err(|e| {
                error!("Failed to poll event: {}", e);
                e
            })? {
                pending.push(event::read().map_err(|e| {
                    error!("Failed to read event: {}", e);
                    e
                })?);
            }
        }

        for event in pending {
            self.handle_event(event);
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        info!("Terminal resized to {}x{}", width, height);
        self.terminal_width = width;
        self.terminal_height = height;
        self.grid.resize(width, height);
        if let OutputTarget::ScreenBuffer(sb) = &mut self.stdout_target {
            *sb = crate::rendering::ScreenBuffer::new(width, height);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            self.controls.apply_key(key);
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if self.ui.top_modal().is_some() {
            self.handle_modal_key(key.code);
            return;
        }

        match self.state {
            GameState::Loading => {}
            GameState::Menu => self.handle_menu_key(key.code),
            GameState::Playing => match key.code {
                KeyCode::Esc => self.pause(),
                KeyCode::Char('q') => self.return_to_menu(),
                _ => {
                    self.controls.apply_key(key);
                }
            },
            GameState::Paused => match key.code {
                KeyCode::Esc => self.resume(),
                KeyCode::Char('q') => self.return_to_menu(),
                _ => {}
            },
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.start_game(),
            KeyCode::Char('i') => {
                self.ui.inventory_cursor = 0;
                self.ui.show_modal(Modal::Inventory);
            }
            KeyCode::Char('s') => {
                self.ui.update_hud(&self.stats);
                self.ui.show_modal(Modal::Shop);
            }
            KeyCode::Char('t') => {
                self.miniapp.get_leaderboard();
                self.ui.update_hud(&self.stats);
                self.ui.show_modal(Modal::Stats);
            }
            KeyCode::Char('c') => self.share_score(),
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc => {
                self.ui.dismiss_notification();
            }
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        let Some(modal) = self.ui.top_modal() else {
            return;
        };
        if code == KeyCode::Esc {
            self.ui.close_top_modal();
            return;
        }
        match modal {
            Modal::Shop => {
                if let KeyCode::Char(c) = code {
                    let index = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1));
                    if let Some(item) = index.and_then(|i| CATALOG.get(i)) {
                        self.buy_item(item.id);
                    }
                }
            }
            Modal::Inventory => match code {
                KeyCode::Left => self.ui.move_inventory_cursor(-1),
                KeyCode::Right => self.ui.move_inventory_cursor(1),
                KeyCode::Up => self.ui.move_inventory_cursor(-10),
                KeyCode::Down => self.ui.move_inventory_cursor(10),
                KeyCode::Enter => {
                    let slot = self.ui.inventory_cursor;
                    self.ui.select_inventory_slot(slot);
                }
                KeyCode::Char('x') | KeyCode::Delete => {
                    let slot = self.ui.inventory_cursor;
                    if let Some(item) = self.ui.remove_from_inventory(slot) {
                        self.ui.show_notification("Item dropped", &item.name, NotificationKind::Info);
                        self.save_progress();
                    }
                }
                _ => {}
            },
            Modal::Stats | Modal::ItemInfo { .. } => {}
        }
    }

    pub fn buy_item(&mut self, item_id: &str) {
        match shop::buy_item(item_id, &mut self.stats, &mut self.ui.inventory) {
            Purchase::Bought { item } => {
                self.ui.show_notification(
                    "Purchase successful",
                    &format!("{} added to inventory", item.name),
                    NotificationKind::Success,
                );
                self.ui.update_hud(&self.stats);
                self.miniapp.on_purchase(item.id);
                self.save_progress();
            }
            Purchase::InsufficientCredits { item, available } => {
                self.ui.show_notification(
                    "Not enough credits",
                    &format!("Need {} credits, you have {}", item.price, available),
                    NotificationKind::Error,
                );
            }
            Purchase::InventoryFull { .. } => {
                self.ui.show_notification("Inventory full", "No free slots", NotificationKind::Warning);
            }
            Purchase::UnknownItem => {}
        }
    }

    pub fn share_score(&mut self) {
        match self.miniapp.share_score(self.stats.score) {
            ShareOutcome::InlineQuery => {
                self.ui.show_notification("Share", "Pick a chat to share your score", NotificationKind::Info);
            }
            ShareOutcome::Clipboard => {
                self.ui.show_notification("Score copied", "Share text copied to clipboard", NotificationKind::Success);
            }
        }
    }

    // --- Host ---

    fn handle_host_events(&mut self) {
        for event in self.miniapp.poll_events() {
            match event {
                HostEvent::ThemeChanged { .. } => {
                    info!("Host theme changed");
                    self.ui.apply_theme(self.miniapp.theme());
                }
                HostEvent::ButtonClicked { button: HostButton::Back } => self.miniapp.host_mut().close(),
                HostEvent::ButtonClicked { button: HostButton::Main } => {
                    if self.state == GameState::Menu {
                        self.start_game();
                    }
                }
                HostEvent::AlertRequested { message } => {
                    self.ui.show_notification("SpaceRift", &message, NotificationKind::Info);
                }
                HostEvent::CloseRequested => self.quit(),
                other => debug!("Host event {:?}", other),
            }
        }
    }

    // --- Output ---

    fn render(&mut self) -> GameResult<()> {
        self.grid.clear();
        self.engine.render(&mut self.grid);
        self.ui.render(&mut self.grid);

        if let Some((foreground, background)) = self.ui.theme_colors() {
            self.stdout_target.set_colors(foreground, background)?;
        }
        self.grid.render(&mut self.stdout_target)?;
        self.stdout_target.flush()?;

        if self.debug_mode_active && self.frame_count % self.config.target_fps.max(1) == 0 {
            if let Some(sb) = self.stdout_target.screen_buffer() {
                sb.print_to_log();
            }
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.running {
            self.quit();
        }
        info!("SpaceRift stopped after {} frames", self.frame_count);
    }
}

fn make_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ForwardingHost, InitData, StandaloneHost};
    use crate::player::Progress;
    use crate::rendering::ScreenBuffer;
    use crate::storage::{LocalStorage, PROGRESS_KEY};
    use crate::test_support::{SharedInbox, SharedSink};
    use tempfile::TempDir;

    fn quiet_config() -> GameConfig {
        GameConfig {
            enemy_spawn_rate: 0.0,
            asteroid_spawn_rate: 0.0,
            initial_asteroids: 0,
            star_count: 10,
            ..GameConfig::default()
        }
    }

    fn app_with_size(dir: &TempDir, width: u16, height: u16) -> SpaceRift {
        let miniapp = MiniApp::new(Box::new(StandaloneHost::new()), LocalStorage::new(dir.path()));
        SpaceRift::new(
            quiet_config(),
            miniapp,
            width,
            height,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height)),
            Some(SimulatedInput::new(Vec::<(u64, Event)>::new())),
            None,
            Some(42),
        )
    }

    fn booted(dir: &TempDir) -> SpaceRift {
        let mut app = app_with_size(dir, 80, 24);
        boot(&mut app);
        app
    }

    fn boot(app: &mut SpaceRift) {
        app.begin_boot();
        for _ in 0..1000 {
            if app.state() != GameState::Loading {
                return;
            }
            app.step().unwrap();
        }
        panic!("boot did not finish");
    }

    fn press(app: &mut SpaceRift, code: KeyCode) {
        app.handle_event(Event::Key(code.into()));
    }

    fn saved_progress(dir: &TempDir) -> Option<Progress> {
        LocalStorage::new(dir.path()).get(PROGRESS_KEY).unwrap()
    }

    #[test]
    fn boot_ends_in_menu_with_guest_pilot() {
        let dir = TempDir::new().unwrap();
        let mut app = booted(&dir);
        assert_eq!(app.state(), GameState::Menu);
        assert!(app.engine().is_initialized());
        app.step().unwrap();
        let sb = app.stdout_target.screen_buffer().unwrap();
        assert!(sb.contains("Pilot: Guest"));
        assert!(sb.contains("[Enter] Start game"));
    }

    #[test]
    fn boot_failure_becomes_one_error_notification() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_size(&dir, 30, 10);
        boot(&mut app);
        assert_eq!(app.state(), GameState::Menu);
        let errors: Vec<_> =
            app.ui().notifications().iter().filter(|n| n.kind == NotificationKind::Error).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("too small"));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), GameState::Menu);
    }

    #[test]
    fn play_pause_resume_and_back_to_menu() {
        let dir = TempDir::new().unwrap();
        let mut app = booted(&dir);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), GameState::Playing);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state(), GameState::Paused);
        assert!(app.ui().notifications().iter().any(|n| n.title == "Paused"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state(), GameState::Playing);

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.state(), GameState::Menu);
        assert_eq!(saved_progress(&dir).unwrap().credits, STARTING_CREDITS);
    }

    #[test]
    fn thrust_key_moves_the_ship_forward() {
        let dir = TempDir::new().unwrap();
        let mut app = booted(&dir);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Up);
        app.step().unwrap();
        assert!(app.engine().ship.position.z < 0.0);
        assert!(app.stats().position.z < 0.0);
    }

    #[test]
    fn menu_shop_purchase_charges_and_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = booted(&dir);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.ui().top_modal(), Some(Modal::Shop));

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.stats().credits, STARTING_CREDITS - 500);
        assert_eq!(app.ui().inventory.len(), 1);
        let saved = saved_progress(&dir).unwrap();
        assert_eq!(saved.inventory, vec!["ship_hull_1".to_string()]);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.stats().credits, 500);
        assert!(app.ui().notifications().iter().any(|n| n.title == "Not enough credits"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ui().top_modal(), None);
    }

    #[test]
    fn saved_progress_is_restored_at_boot() {
        let dir = TempDir::new().unwrap();
        let progress = Progress {
            level: 3,
            experience: 40,
            experience_to_next: 300,
            credits: 1234,
            score: 500,
            inventory: vec!["engine_boost_1".to_string(), "no_such_item".to_string()],
        };
        LocalStorage::new(dir.path()).set(PROGRESS_KEY, &progress).unwrap();

        let app = booted(&dir);
        assert_eq!(app.stats().level, 3);
        assert_eq!(app.stats().credits, 1234);
        assert_eq!(app.ui().inventory.item_ids(), vec!["engine_boost_1".to_string()]);
    }

    #[test]
    fn corrupt_save_is_treated_as_fresh_start() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(format!("{PROGRESS_KEY}.json")), "{not json").unwrap();
        let app = booted(&dir);
        assert_eq!(app.state(), GameState::Menu);
        assert_eq!(app.stats().credits, STARTING_CREDITS);
        assert!(app.ui().notifications().is_empty());
    }

    #[test]
    fn share_falls_back_to_clipboard_without_a_host() {
        let dir = TempDir::new().unwrap();
        let mut app = booted(&dir);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.ui().notifications().iter().any(|n| n.title == "Score copied"));
    }

    #[test]
    fn quit_from_menu_stops_the_loop() {
        let dir = TempDir::new().unwrap();
        let mut app = booted(&dir);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn host_back_button_and_close_arrive_through_the_inbox() {
        let dir = TempDir::new().unwrap();
        let outbox = SharedSink::default();
        let inbox = SharedInbox::default();
        let host = ForwardingHost::new(InitData::default(), Box::new(outbox.clone())).with_inbox(inbox.reader());
        let miniapp = MiniApp::new(Box::new(host), LocalStorage::new(dir.path()));
        let mut app = SpaceRift::new(
            quiet_config(),
            miniapp,
            80,
            24,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)),
            Some(SimulatedInput::new(Vec::<(u64, Event)>::new())),
            None,
            Some(42),
        );
        boot(&mut app);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state(), GameState::Playing);
        assert!(!outbox.methods().contains(&"close".to_string()));

        inbox.push("{\"event\":\"button_clicked\",\"button\":\"back\"}\n");
        app.step().unwrap();
        assert!(outbox.methods().contains(&"close".to_string()));
        assert!(app.is_running());

        inbox.push("{\"event\":\"close_requested\"}\n");
        app.step().unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn scripted_demo_runs_to_completion() {
        let dir = TempDir::new().unwrap();
        let miniapp = MiniApp::new(Box::new(StandaloneHost::new()), LocalStorage::new(dir.path()));
        let mut app = SpaceRift::new(
            quiet_config(),
            miniapp,
            80,
            24,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)),
            Some(SimulatedInput::demo()),
            Some(2000),
            Some(7),
        );
        app.run().unwrap();
        assert!(!app.is_running());
        assert!(app.frame_count() < 2000);
        let saved = saved_progress(&dir).unwrap();
        assert_eq!(saved.inventory, vec!["engine_boost_1".to_string()]);
        assert_eq!(saved.credits, STARTING_CREDITS - 400);
    }
}
