//! View state and overlay rendering.
//!
//! `UiManager` never drives the game; the controller calls into it and it
//! remembers what should be on screen. Every frame the controller lets the
//! engine draw the scene into the grid, then [`UiManager::render`] paints
//! HUD, menus, modals and notifications on top. Regions that do not fit the
//! terminal are skipped.

use crossterm::style::Color;
use log::{debug, info};
use rand::Rng;

use crate::config::{GameConfig, ms_to_frames};
use crate::constants::*;
use crate::host::Theme;
use crate::inventory::{Inventory, InventoryItem};
use crate::player::PlayerStats;
use crate::rendering::{GameGrid, Minimap, parse_hex_color};
use crate::shop::CATALOG;
use crate::types::Vector3;

const TITLE_ART: [&str; 6] = [
    r"  ____                       ____  _  __ _   ",
    r" / ___| _ __   __ _  ___ ___|  _ \(_)/ _| |_ ",
    r" \___ \| '_ \ / _` |/ __/ _ \ |_) | | |_| __|",
    r"  ___) | |_) | (_| | (_|  __/  _ <| |  _| |_ ",
    r" |____/| .__/ \__,_|\___\___|_| \_\_|_|  \__|",
    r"       |_|                                   ",
];

const CONTROLS_HELP: [&str; 4] = [
    "W/Up: Thrust  S/Down: Brake",
    "A/D, Left/Right: Turn",
    "Space: Fire Laser",
    "Esc: Pause  q: Menu",
];

const LOADING_STEPS: [&str; 5] = [
    "Ship models",
    "Space textures",
    "Sound effects",
    "Interface sprites",
    "Game settings",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    MainMenu,
    Game,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    Shop,
    Inventory,
    Stats,
    ItemInfo { slot: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Info => "[i]",
            NotificationKind::Success => "[+]",
            NotificationKind::Warning => "[!]",
            NotificationKind::Error => "[x]",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
struct HudSnapshot {
    level: u32,
    experience: i64,
    experience_to_next: i64,
    credits: i64,
    energy: i64,
    max_energy: i64,
    health: i64,
    max_health: i64,
    score: i64,
}

pub struct LoadingScreen {
    pub progress: f64,
    pub status: String,
    pub visible: bool,
}

pub struct UiManager {
    frame: u64,
    target_fps: u64,
    notification_frames: u64,
    screen: Screen,
    modals: Vec<Modal>,
    notifications: Vec<Notification>,
    next_notification_id: u64,
    hud: Option<HudSnapshot>,
    minimap: Minimap,
    flash_until: Option<u64>,
    shake: Option<(u16, u64)>,
    theme_colors: Option<(Color, Color)>,
    pub loading: LoadingScreen,
    pub inventory: Inventory,
    pub inventory_cursor: usize,
    pub pilot_name: String,
}

impl UiManager {
    pub fn new(config: &GameConfig) -> Self {
        let ui = UiManager {
            frame: 0,
            target_fps: config.target_fps.max(1),
            notification_frames: config.frames_for_ms(config.notification_duration_ms),
            screen: Screen::Loading,
            modals: Vec::new(),
            notifications: Vec::new(),
            next_notification_id: 0,
            hud: None,
            minimap: Minimap::new(MINIMAP_WIDTH, MINIMAP_HEIGHT),
            flash_until: None,
            shake: None,
            theme_colors: None,
            loading: LoadingScreen { progress: 0.0, status: String::new(), visible: true },
            inventory: Inventory::default(),
            inventory_cursor: 0,
            pilot_name: "Guest".to_string(),
        };
        info!("UI manager ready");
        ui
    }

    fn frames_for(&self, ms: u64) -> u64 {
        ms_to_frames(ms, self.target_fps)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances the UI clock and expires timed elements.
    pub fn tick(&mut self) {
        self.frame += 1;
        let now = self.frame;
        self.notifications.retain(|n| n.expires_at > now);
        if self.flash_until.is_some_and(|until| until <= now) {
            self.flash_until = None;
        }
        if self.shake.is_some_and(|(_, until)| until <= now) {
            self.shake = None;
        }
    }

    // --- Screens ---

    pub fn show_screen(&mut self, screen: Screen) {
        debug!("Showing screen {:?}", screen);
        if screen == Screen::MainMenu || screen == Screen::Game {
            self.close_all_modals();
        }
        self.screen = screen;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn loading_steps() -> &'static [&'static str] {
        &LOADING_STEPS
    }

    /// Adds a random slice of progress; returns true once the bar is full.
    pub fn advance_loading(&mut self, rng: &mut impl Rng) -> bool {
        self.loading.progress = (self.loading.progress + rng.gen_range(0.0..LOADING_TICK_MAX_PERCENT)).min(100.0);
        self.loading.progress >= 100.0
    }

    pub fn set_loading_status(&mut self, status: &str) {
        self.loading.status = status.to_string();
    }

    pub fn hide_loading_screen(&mut self) {
        self.loading.progress = 100.0;
        self.loading.visible = false;
    }

    // --- Modals ---

    pub fn show_modal(&mut self, modal: Modal) {
        if !self.modals.contains(&modal) {
            self.modals.push(modal);
        }
    }

    pub fn close_modal(&mut self, modal: Modal) {
        self.modals.retain(|m| *m != modal);
    }

    pub fn close_all_modals(&mut self) {
        self.modals.clear();
    }

    /// Closes the top modal; returns false if none was open.
    pub fn close_top_modal(&mut self) -> bool {
        self.modals.pop().is_some()
    }

    pub fn top_modal(&self) -> Option<Modal> {
        self.modals.last().copied()
    }

    pub fn is_modal_open(&self, modal: Modal) -> bool {
        self.modals.contains(&modal)
    }

    // --- Notifications ---

    pub fn show_notification(&mut self, title: &str, message: &str, kind: NotificationKind) -> u64 {
        let frames = self.notification_frames;
        self.show_notification_for(title, message, kind, frames)
    }

    pub fn show_notification_ms(&mut self, title: &str, message: &str, kind: NotificationKind, duration_ms: u64) -> u64 {
        let frames = self.frames_for(duration_ms);
        self.show_notification_for(title, message, kind, frames)
    }

    fn show_notification_for(&mut self, title: &str, message: &str, kind: NotificationKind, frames: u64) -> u64 {
        self.next_notification_id += 1;
        let id = self.next_notification_id;
        info!("Notification {} {}: {}", kind.icon(), title, message);
        self.notifications.push(Notification {
            id,
            title: title.to_string(),
            message: message.to_string(),
            kind,
            expires_at: self.frame + frames,
        });
        id
    }

    pub fn hide_notification(&mut self, id: u64) {
        self.notifications.retain(|n| n.id != id);
    }

    /// Dismisses the oldest notification, if any.
    pub fn dismiss_notification(&mut self) -> bool {
        if self.notifications.is_empty() {
            return false;
        }
        self.notifications.remove(0);
        true
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn show_error(&mut self, message: &str) {
        self.show_notification_ms("Error", message, NotificationKind::Error, ERROR_NOTIFICATION_DURATION_MS);
    }

    // --- Inventory ---

    pub fn add_to_inventory(&mut self, item: InventoryItem) -> bool {
        match self.inventory.add(item) {
            Ok(_) => true,
            Err(_) => {
                self.show_notification("Inventory full", "No free slots", NotificationKind::Warning);
                false
            }
        }
    }

    pub fn remove_from_inventory(&mut self, slot: usize) -> Option<InventoryItem> {
        let item = self.inventory.remove(slot);
        if self.inventory_cursor > 0 && self.inventory_cursor >= self.inventory.len() {
            self.inventory_cursor = self.inventory.len().saturating_sub(1);
        }
        item
    }

    pub fn move_inventory_cursor(&mut self, delta: i32) {
        let slots = self.inventory.capacity() as i32;
        if slots == 0 {
            return;
        }
        self.inventory_cursor = (self.inventory_cursor as i32 + delta).rem_euclid(slots) as usize;
    }

    /// Opens item details for a filled slot or reports an empty one.
    pub fn select_inventory_slot(&mut self, slot: usize) {
        if self.inventory.get(slot).is_some() {
            self.show_modal(Modal::ItemInfo { slot });
        } else {
            self.show_notification("Empty slot", "This slot is empty", NotificationKind::Info);
        }
    }

    // --- HUD, minimap, effects ---

    pub fn update_hud(&mut self, stats: &PlayerStats) {
        self.hud = Some(HudSnapshot {
            level: stats.level,
            experience: stats.experience,
            experience_to_next: stats.experience_to_next,
            credits: stats.credits,
            energy: stats.energy,
            max_energy: stats.max_energy,
            health: stats.health,
            max_health: stats.max_health,
            score: stats.score,
        });
    }

    /// Rebuilds the top-down map around the player (X across, Z down).
    pub fn update_minimap(
        &mut self,
        player: Vector3,
        enemies: impl IntoIterator<Item = Vector3>,
        asteroids: impl IntoIterator<Item = Vector3>,
    ) {
        self.minimap.clear();
        let (w, h) = (self.minimap.width, self.minimap.height);
        let cx = w as f64 / 2.0;
        let cy = h as f64 / 2.0;
        let sx = MINIMAP_SCALE * w as f64 / MINIMAP_VIEW_SIZE;
        let sy = MINIMAP_SCALE * h as f64 / MINIMAP_VIEW_SIZE;

        let plot = |minimap: &mut Minimap, p: Vector3, c: char| {
            let x = (cx + (p.x - player.x) * sx).floor();
            let y = (cy + (p.z - player.z) * sy).floor();
            if x >= 0.0 && y >= 0.0 && x < w as f64 && y < h as f64 {
                minimap.set_char(x as u16, y as u16, c);
            }
        };
        for asteroid in asteroids {
            plot(&mut self.minimap, asteroid, '.');
        }
        for enemy in enemies {
            plot(&mut self.minimap, enemy, 'x');
        }
        plot(&mut self.minimap, player, 'A');
    }

    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    pub fn flash_screen(&mut self, duration_ms: u64) {
        self.flash_until = Some(self.frame + self.frames_for(duration_ms));
    }

    pub fn is_flashing(&self) -> bool {
        self.flash_until.is_some()
    }

    pub fn add_screen_shake(&mut self, intensity: u16, duration_ms: u64) {
        self.shake = Some((intensity, self.frame + self.frames_for(duration_ms)));
    }

    pub fn apply_theme(&mut self, theme: &Theme) {
        // The stock light theme would wash out the star field; only custom
        // colours are honoured.
        let bg = (theme.bg_color != "#ffffff").then(|| parse_hex_color(&theme.bg_color)).flatten();
        let fg = (theme.text_color != "#000000").then(|| parse_hex_color(&theme.text_color)).flatten();
        self.theme_colors = match (fg, bg) {
            (None, None) => None,
            (fg, bg) => Some((fg.unwrap_or(Color::White), bg.unwrap_or(Color::Black))),
        };
    }

    pub fn theme_colors(&self) -> Option<(Color, Color)> {
        self.theme_colors
    }

    // --- Rendering ---

    pub fn render(&self, grid: &mut GameGrid) {
        match self.screen {
            Screen::Loading => self.render_loading(grid),
            Screen::MainMenu => self.render_menu(grid),
            Screen::Game => self.render_game_overlay(grid),
            Screen::Paused => {
                self.render_game_overlay(grid);
                grid.write_centered(grid.height / 2, " PAUSED - press Esc to resume ");
            }
        }
        if let Some(modal) = self.top_modal() {
            self.render_modal(grid, modal);
        }
        self.render_notifications(grid);
        self.apply_effects(grid);
    }

    fn render_loading(&self, grid: &mut GameGrid) {
        if !self.loading.visible {
            return;
        }
        let mid = grid.height / 2;
        grid.write_centered(mid.saturating_sub(2), "S P A C E R I F T");
        let bar_width = (grid.width / 2) as usize;
        let bar = progress_bar(self.loading.progress.round() as i64, 100, bar_width);
        grid.write_centered(mid, &bar);
        grid.write_centered(mid + 1, &format!("{:.0}%", self.loading.progress));
        grid.write_centered(mid + 2, &self.loading.status);
    }

    fn render_menu(&self, grid: &mut GameGrid) {
        let art_width = TITLE_ART[0].len() as u16;
        let top = if grid.width >= art_width && grid.height >= 20 {
            for (i, line) in TITLE_ART.iter().enumerate() {
                grid.write_centered(1 + i as u16, line);
            }
            TITLE_ART.len() as u16 + 2
        } else {
            grid.write_centered(1, "SPACERIFT");
            3
        };

        grid.write_centered(top, &format!("Pilot: {}", self.pilot_name));
        if let Some(hud) = &self.hud {
            grid.write_centered(
                top + 1,
                &format!("Level {}  Credits {}", hud.level, format_number(hud.credits)),
            );
        }
        let options = [
            "[Enter] Start game",
            "[i] Inventory",
            "[s] Shop",
            "[t] Stats",
            "[c] Share score",
            "[q] Quit",
        ];
        for (i, option) in options.iter().enumerate() {
            grid.write_centered(top + 3 + i as u16, option);
        }
    }

    fn render_game_overlay(&self, grid: &mut GameGrid) {
        if let Some(hud) = &self.hud {
            let line = format!(
                "LVL {}  XP {}/{} {}  CR {}  EN {}/{} {}  HP {}/{}",
                hud.level,
                hud.experience,
                hud.experience_to_next,
                progress_bar(hud.experience, hud.experience_to_next, 10),
                format_number(hud.credits),
                hud.energy,
                hud.max_energy,
                progress_bar(hud.energy, hud.max_energy, 10),
                hud.health,
                hud.max_health,
            );
            grid.write_str(0, 0, &line);
        }

        let map_w = self.minimap.width + 2;
        let map_h = self.minimap.height + 2;
        if grid.width >= map_w + 30 && grid.height >= map_h + 6 {
            self.minimap.blit(grid, grid.width - map_w, 1);
        }

        let help_top = grid.height.saturating_sub(CONTROLS_HELP.len() as u16);
        if grid.height > CONTROLS_HELP.len() as u16 + 4 {
            for (i, line) in CONTROLS_HELP.iter().enumerate() {
                grid.write_str(0, help_top + i as u16, line);
            }
        }
    }

    fn modal_lines(&self, modal: Modal) -> (String, Vec<String>) {
        match modal {
            Modal::Shop => {
                let credits = self.hud.as_ref().map(|h| h.credits).unwrap_or(0);
                let mut lines: Vec<String> = CATALOG
                    .iter()
                    .enumerate()
                    .map(|(i, item)| format!("[{}] {:<24} {:>5} CR", i + 1, item.name, item.price))
                    .collect();
                lines.push(String::new());
                lines.push(format!("Credits: {}", format_number(credits)));
                lines.push("[1-3] Buy   [Esc] Close".to_string());
                ("SHOP".to_string(), lines)
            }
            Modal::Inventory => {
                let mut lines = Vec::new();
                let capacity = self.inventory.capacity();
                for row_start in (0..capacity).step_by(10) {
                    let row: String = (row_start..(row_start + 10).min(capacity))
                        .map(|slot| {
                            let icon = self.inventory.get(slot).map(|item| item.icon).unwrap_or(' ');
                            if slot == self.inventory_cursor { format!(">{icon}<") } else { format!("[{icon}]") }
                        })
                        .collect();
                    lines.push(row);
                }
                lines.push(String::new());
                lines.push(match self.inventory.get(self.inventory_cursor) {
                    Some(item) => format!("{} ({})", item.name, item.kind.label()),
                    None => "Empty slot".to_string(),
                });
                lines.push("[Arrows] Move  [Enter] Info  [x] Drop  [Esc] Close".to_string());
                (format!("INVENTORY {}/{}", self.inventory.len(), capacity), lines)
            }
            Modal::Stats => {
                let lines = match &self.hud {
                    Some(h) => vec![
                        format!("Pilot:      {}", self.pilot_name),
                        format!("Level:      {}", h.level),
                        format!("Experience: {}/{}", h.experience, h.experience_to_next),
                        format!("Credits:    {}", h.credits),
                        format!("Energy:     {}/{}", h.energy, h.max_energy),
                        format!("Health:     {}/{}", h.health, h.max_health),
                        format!("Score:      {}", h.score),
                        format!("Items:      {}", self.inventory.len()),
                    ],
                    None => vec!["No statistics yet".to_string()],
                };
                ("STATS".to_string(), lines)
            }
            Modal::ItemInfo { slot } => match self.inventory.get(slot) {
                Some(item) => {
                    let mut lines = vec![
                        format!("Type: {}", item.kind.label()),
                        format!("Description: {}", item.description),
                    ];
                    if !item.stats.is_empty() {
                        lines.push("Stats:".to_string());
                        lines.extend(item.stats.iter().map(|(stat, value)| format!("  {stat}: {value}")));
                    }
                    lines.push("[Esc] Close".to_string());
                    (format!("[{}] {}", item.icon, item.name), lines)
                }
                None => ("ITEM".to_string(), vec!["Empty slot".to_string()]),
            },
        }
    }

    fn render_modal(&self, grid: &mut GameGrid, modal: Modal) {
        let (title, lines) = self.modal_lines(modal);
        let content_width = lines
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(title.chars().count()))
            .max()
            .unwrap_or(0) as u16;
        let w = (content_width + 4).min(grid.width);
        let h = (lines.len() as u16 + 4).min(grid.height);
        if w < 6 || h < 4 {
            return;
        }
        let x = (grid.width - w) / 2;
        let y = (grid.height - h) / 2;
        grid.draw_box(x, y, w, h);
        grid.write_str(x + 2, y, &format!(" {title} "));
        for (i, line) in lines.iter().enumerate() {
            let row = y + 2 + i as u16;
            if row >= y + h - 1 {
                break;
            }
            let clipped: String = line.chars().take((w - 4) as usize).collect();
            grid.write_str(x + 2, row, &clipped);
        }
    }

    fn render_notifications(&self, grid: &mut GameGrid) {
        let mut y = 2;
        for notification in self.notifications.iter().rev() {
            let title = format!("{} {}", notification.kind.icon(), notification.title);
            let width = title.chars().count().max(notification.message.chars().count()) as u16 + 4;
            let width = width.min(grid.width);
            if y + 4 > grid.height || width < 6 {
                break;
            }
            let x = (grid.width - width) / 2;
            grid.draw_box(x, y, width, 4);
            let limit = (width - 4) as usize;
            grid.write_str(x + 2, y + 1, &title.chars().take(limit).collect::<String>());
            grid.write_str(x + 2, y + 2, &notification.message.chars().take(limit).collect::<String>());
            y += 4;
        }
    }

    fn apply_effects(&self, grid: &mut GameGrid) {
        if self.flash_until.is_some() && grid.width > 0 && grid.height > 0 {
            let (w, h) = (grid.width, grid.height);
            for x in 0..w {
                grid.set_char(x, 0, '!');
                grid.set_char(x, h - 1, '!');
            }
            for y in 0..h {
                grid.set_char(0, y, '!');
                grid.set_char(w - 1, y, '!');
            }
        }
        if let Some((intensity, _)) = self.shake {
            let offset = if self.frame % 2 == 0 { intensity as usize } else { 0 };
            if offset > 0 {
                for row in &mut grid.grid {
                    let len = row.len();
                    row.rotate_right(offset % len.max(1));
                }
            }
        }
    }
}

/// `[#####-----]` style bar; values outside `0..=max` are clamped.
pub fn progress_bar(value: i64, max: i64, width: usize) -> String {
    let filled = if max <= 0 {
        0
    } else {
        ((value.clamp(0, max) as f64 / max as f64) * width as f64).round() as usize
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Compact number: 1.5K, 2.0M.
pub fn format_number(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop::find_item;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ui() -> UiManager {
        UiManager::new(&GameConfig::default())
    }

    fn row(grid: &GameGrid, y: u16) -> String {
        grid.grid[y as usize].iter().collect()
    }

    fn screen_text(grid: &GameGrid) -> String {
        (0..grid.height).map(|y| row(grid, y)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn notifications_expire_after_their_duration() {
        let mut ui = ui();
        ui.show_notification("Hello", "World", NotificationKind::Info);
        for _ in 0..89 {
            ui.tick();
        }
        assert_eq!(ui.notifications().len(), 1);
        ui.tick();
        assert!(ui.notifications().is_empty());
    }

    #[test]
    fn errors_stay_up_much_longer_than_notices() {
        let mut ui = ui();
        ui.show_error("disk full");
        let frames = ERROR_NOTIFICATION_DURATION_MS * TARGET_FPS / 1000;
        for _ in 1..frames {
            ui.tick();
        }
        assert_eq!(ui.notifications().len(), 1);
        assert_eq!(ui.notifications()[0].kind, NotificationKind::Error);
        ui.tick();
        assert!(ui.notifications().is_empty());
    }

    #[test]
    fn notifications_can_be_hidden_early() {
        let mut ui = ui();
        let first = ui.show_notification("a", "1", NotificationKind::Info);
        ui.show_notification("b", "2", NotificationKind::Success);
        ui.hide_notification(first);
        assert_eq!(ui.notifications().len(), 1);
        assert_eq!(ui.notifications()[0].title, "b");
        assert!(ui.dismiss_notification());
        assert!(!ui.dismiss_notification());
    }

    #[test]
    fn modals_behave_like_a_set_with_a_top() {
        let mut ui = ui();
        ui.show_modal(Modal::Shop);
        ui.show_modal(Modal::Stats);
        ui.show_modal(Modal::Shop);
        assert_eq!(ui.top_modal(), Some(Modal::Stats));
        ui.close_modal(Modal::Stats);
        assert_eq!(ui.top_modal(), Some(Modal::Shop));
        ui.close_all_modals();
        assert!(!ui.close_top_modal());
    }

    #[test]
    fn full_inventory_warns() {
        let mut ui = ui();
        let item = find_item("engine_boost_1").unwrap().to_inventory_item();
        for _ in 0..INVENTORY_SLOTS {
            assert!(ui.add_to_inventory(item.clone()));
        }
        assert!(!ui.add_to_inventory(item));
        assert_eq!(ui.notifications()[0].kind, NotificationKind::Warning);
    }

    #[test]
    fn selecting_slots_opens_info_or_reports_empty() {
        let mut ui = ui();
        ui.add_to_inventory(find_item("ship_hull_1").unwrap().to_inventory_item());
        ui.select_inventory_slot(0);
        assert_eq!(ui.top_modal(), Some(Modal::ItemInfo { slot: 0 }));
        ui.select_inventory_slot(5);
        assert_eq!(ui.notifications()[0].title, "Empty slot");
    }

    #[test]
    fn cursor_wraps_around_slots() {
        let mut ui = ui();
        ui.move_inventory_cursor(-1);
        assert_eq!(ui.inventory_cursor, INVENTORY_SLOTS - 1);
        ui.move_inventory_cursor(1);
        assert_eq!(ui.inventory_cursor, 0);
    }

    #[test]
    fn minimap_places_player_in_centre_and_skips_far_objects() {
        let mut ui = ui();
        let player = Vector3::new(10.0, 0.0, -10.0);
        ui.update_minimap(
            player,
            vec![Vector3::new(10.0, 0.0, -30.0), Vector3::new(500.0, 0.0, 0.0)],
            vec![Vector3::new(30.0, 5.0, -10.0)],
        );
        let map = ui.minimap();
        assert_eq!(map.get_char(MINIMAP_WIDTH / 2, MINIMAP_HEIGHT / 2), Some('A'));
        assert_eq!(map.get_char(MINIMAP_WIDTH / 2, 3), Some('x'));
        assert_eq!(map.get_char(MINIMAP_WIDTH / 2 + 4, MINIMAP_HEIGHT / 2), Some('.'));
    }

    #[test]
    fn hud_renders_stats_line() {
        let mut ui = ui();
        ui.show_screen(Screen::Game);
        ui.update_hud(&PlayerStats::default());
        let mut grid = GameGrid::new(100, 30);
        ui.render(&mut grid);
        let top = row(&grid, 0);
        assert!(top.starts_with("LVL 1  XP 0/100 [----------]  CR 1.0K"));
        assert!(top.contains("EN 100/100 [##########]"));
    }

    #[test]
    fn shop_modal_lists_catalog() {
        let mut ui = ui();
        ui.show_screen(Screen::MainMenu);
        ui.update_hud(&PlayerStats::default());
        ui.show_modal(Modal::Shop);
        let mut grid = GameGrid::new(80, 24);
        ui.render(&mut grid);
        let text = screen_text(&grid);
        assert!(text.contains("Laser Cannon Mk I"));
        assert!(text.contains("750 CR"));
    }

    #[test]
    fn flash_marks_border_until_it_expires() {
        let mut ui = ui();
        ui.show_screen(Screen::Game);
        ui.flash_screen(100);
        let mut grid = GameGrid::new(60, 20);
        ui.render(&mut grid);
        assert_eq!(grid.get_char(0, 10), Some('!'));
        for _ in 0..3 {
            ui.tick();
        }
        assert!(!ui.is_flashing());
    }

    #[test]
    fn loading_reaches_full_bar() {
        let mut ui = ui();
        let mut rng = StdRng::seed_from_u64(9);
        let mut ticks = 0;
        while !ui.advance_loading(&mut rng) {
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert_eq!(ui.loading.progress, 100.0);
    }

    #[test]
    fn default_theme_keeps_terminal_colours() {
        let mut ui = ui();
        ui.apply_theme(&crate::host::ThemeParams::default().resolve());
        assert!(ui.theme_colors().is_none());
        let dark = crate::host::ThemeParams {
            bg_color: Some("#101010".to_string()),
            text_color: Some("#eeeeee".to_string()),
            ..Default::default()
        };
        ui.apply_theme(&dark.resolve());
        assert_eq!(
            ui.theme_colors(),
            Some((Color::Rgb { r: 0xee, g: 0xee, b: 0xee }, Color::Rgb { r: 0x10, g: 0x10, b: 0x10 }))
        );
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1500), "1.5K");
        assert_eq!(format_number(2_000_000), "2.0M");
        assert_eq!(progress_bar(-5, 100, 4), "[----]");
        assert_eq!(progress_bar(150, 100, 4), "[####]");
    }
}
