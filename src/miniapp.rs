use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use serde_json::{Value, json};

use crate::error::StorageError;
use crate::host::{ButtonAction, HostBridge, HostButton, HostEvent, HostUser, Theme};
use crate::player::Progress;
use crate::storage::{LocalStorage, PROGRESS_KEY, USER_KEY};

pub const SHARE_BOT: &str = "@minigamerus_bot";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    InlineQuery,
    Clipboard,
}

/// Game-facing side of the host: identity, progress and lifecycle reports.
pub struct MiniApp {
    host: Box<dyn HostBridge>,
    storage: LocalStorage,
    user: Option<HostUser>,
    theme: Theme,
}

impl MiniApp {
    pub fn new(host: Box<dyn HostBridge>, storage: LocalStorage) -> Self {
        let theme = host.theme_params().resolve();
        MiniApp { host, storage, user: None, theme }
    }

    /// Configures the host surface and picks up the user identity.
    pub fn init(&mut self) {
        info!("Initialising Mini App integration ({})", self.host.platform());
        self.host.set_header_color("#000000");
        self.host.set_background_color("#000000");
        self.host.button(HostButton::Main, ButtonAction::Hide);
        self.host.button(HostButton::Back, ButtonAction::Hide);
        self.host.expand();
        self.theme = self.host.theme_params().resolve();

        if self.host.is_embedded() {
            self.user = self.host.init_data().user.clone();
            if let Some(user) = &self.user {
                info!("Host user: {} ({})", user.first_name, user.id);
                if let Err(e) = self.storage.set(USER_KEY, user) {
                    warn!("Could not cache host user: {}", e);
                }
            }
        }
        self.host.ready();
    }

    pub fn host_mut(&mut self) -> &mut dyn HostBridge {
        self.host.as_mut()
    }

    pub fn is_embedded(&self) -> bool {
        self.host.is_embedded()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn user(&self) -> Option<HostUser> {
        if let Some(user) = &self.user {
            return Some(user.clone());
        }
        match self.storage.get::<HostUser>(USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                warn!("Ignoring cached user: {}", e);
                None
            }
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|u| u.id)
    }

    pub fn user_name(&self) -> String {
        match self.user() {
            None => "Guest".to_string(),
            Some(user) if !user.first_name.is_empty() => user.first_name,
            Some(user) => user.username.unwrap_or_else(|| "Player".to_string()),
        }
    }

    pub fn is_premium(&self) -> bool {
        self.user().is_some_and(|u| u.is_premium)
    }

    /// Embedded: the host stores progress. Standalone: the local store does.
    pub fn save_progress(&mut self, progress: &Progress) -> Result<(), StorageError> {
        if self.host.is_embedded() {
            let data = json!({ "type": "save_progress", "user_id": self.user_id(), "progress": progress });
            self.host.send_data(&data);
            Ok(())
        } else {
            self.storage.set(PROGRESS_KEY, progress)
        }
    }

    /// Embedded hosts answer asynchronously, so this returns `None` there.
    pub fn load_progress(&mut self) -> Result<Option<Progress>, StorageError> {
        if self.host.is_embedded() {
            self.send_event("load_progress", json!({}));
            Ok(None)
        } else {
            self.storage.get(PROGRESS_KEY)
        }
    }

    pub fn get_leaderboard(&mut self) {
        if self.host.is_embedded() {
            self.send_event("get_leaderboard", json!({}));
        }
    }

    pub fn share_text(score: i64) -> String {
        format!("My SpaceRift score: {score}!\n\nPlay the space RPG: {SHARE_BOT}")
    }

    pub fn share_score(&mut self, score: i64) -> ShareOutcome {
        let text = Self::share_text(score);
        if self.host.switch_inline_query(&text, &["users", "groups", "channels"]) {
            ShareOutcome::InlineQuery
        } else {
            self.host.write_text_to_clipboard(&text);
            ShareOutcome::Clipboard
        }
    }

    pub fn on_game_start(&mut self) {
        self.send_event("game_start", json!({ "timestamp": now_millis() }));
    }

    pub fn on_game_end(&mut self, score: i64) {
        self.send_event("game_end", json!({ "score": score, "timestamp": now_millis() }));
    }

    pub fn on_level_up(&mut self, level: u32) {
        self.send_event("level_up", json!({ "level": level, "timestamp": now_millis() }));
        self.host.show_alert(&format!("Congratulations! You reached level {level}!"));
    }

    pub fn on_purchase(&mut self, item_id: &str) {
        self.send_event("purchase", json!({ "item": item_id, "timestamp": now_millis() }));
    }

    /// Drains host events, applying theme changes before handing them on.
    pub fn poll_events(&mut self) -> Vec<HostEvent> {
        let events = self.host.poll_events();
        for event in &events {
            if let HostEvent::ThemeChanged { theme_params } = event {
                self.theme = theme_params.resolve();
            }
        }
        events
    }

    fn send_event(&mut self, kind: &str, mut payload: Value) {
        if let Value::Object(map) = &mut payload {
            map.insert("type".to_string(), json!(kind));
            map.insert("user_id".to_string(), json!(self.user_id()));
        }
        self.host.send_data(&payload);
    }
}

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ForwardingHost, InitData, StandaloneHost};
    use crate::test_support::SharedSink;
    use std::io;

    fn standalone(dir: &std::path::Path) -> MiniApp {
        let mut app = MiniApp::new(Box::new(StandaloneHost::new()), LocalStorage::new(dir));
        app.init();
        app
    }

    fn progress() -> Progress {
        Progress {
            level: 2,
            experience: 10,
            experience_to_next: 200,
            credits: 900,
            score: 110,
            inventory: Vec::new(),
        }
    }

    #[test]
    fn standalone_user_is_guest_until_cached() {
        let dir = tempfile::tempdir().unwrap();
        let app = standalone(dir.path());
        assert_eq!(app.user_name(), "Guest");
        assert_eq!(app.user_id(), None);

        let storage = LocalStorage::new(dir.path());
        let cached = HostUser {
            id: 99,
            first_name: String::new(),
            last_name: None,
            username: Some("pilot".to_string()),
            language_code: None,
            is_premium: true,
        };
        storage.set(USER_KEY, &cached).unwrap();
        assert_eq!(app.user_name(), "pilot");
        assert!(app.is_premium());
    }

    #[test]
    fn standalone_progress_goes_to_local_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = standalone(dir.path());
        assert_eq!(app.load_progress().unwrap(), None);
        app.save_progress(&progress()).unwrap();
        assert_eq!(app.load_progress().unwrap(), Some(progress()));
    }

    fn embedded(dir: &std::path::Path, outbox: &SharedSink) -> MiniApp {
        let init = InitData {
            user: Some(HostUser {
                id: 7,
                first_name: "Ada".to_string(),
                last_name: None,
                username: None,
                language_code: None,
                is_premium: false,
            }),
            ..InitData::default()
        };
        let host = ForwardingHost::new(init, Box::new(outbox.clone()));
        let mut app = MiniApp::new(Box::new(host), LocalStorage::new(dir));
        app.init();
        app
    }

    #[test]
    fn embedded_progress_is_sent_to_host() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = SharedSink::default();
        let mut app = embedded(dir.path(), &outbox);
        assert_eq!(app.user_name(), "Ada");

        app.save_progress(&progress()).unwrap();
        let saved = outbox.sent_data_of("save_progress");
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0]["user_id"], 7);
        assert_eq!(saved[0]["progress"], serde_json::to_value(progress()).unwrap());

        assert_eq!(app.load_progress().unwrap(), None);
        let requests = outbox.sent_data_of("load_progress");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["user_id"], 7);

        assert!(!dir.path().join("spaceRift_progress.json").exists());
        assert!(dir.path().join("spaceRift_user.json").exists());
    }

    #[test]
    fn embedded_lifecycle_reports_reach_host() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = SharedSink::default();
        let mut app = embedded(dir.path(), &outbox);

        app.on_game_start();
        app.on_level_up(4);

        let starts = outbox.sent_data_of("game_start");
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0]["user_id"], 7);
        assert!(starts[0]["timestamp"].as_u64().is_some_and(|t| t > 0));

        let levels = outbox.sent_data_of("level_up");
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0]["level"], 4);
        assert_eq!(levels[0]["user_id"], 7);

        let alert = outbox.lines().into_iter().find(|line| line["method"] == "showAlert").unwrap();
        assert_eq!(alert["params"]["message"], "Congratulations! You reached level 4!");
    }

    #[test]
    fn standalone_share_falls_back_to_clipboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = standalone(dir.path());
        assert_eq!(app.share_score(420), ShareOutcome::Clipboard);
    }

    #[test]
    fn level_up_raises_an_alert() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = standalone(dir.path());
        app.on_level_up(3);
        let events = app.poll_events();
        assert!(events.iter().any(|e| matches!(e, HostEvent::AlertRequested { message } if message.contains("level 3"))));
    }

    #[test]
    fn theme_change_event_updates_theme() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = ForwardingHost::new(InitData::default(), Box::new(io::sink()));
        host.deliver(HostEvent::ThemeChanged {
            theme_params: crate::host::ThemeParams { bg_color: Some("#202020".to_string()), ..Default::default() },
        });
        let mut app = MiniApp::new(Box::new(host), LocalStorage::new(dir.path()));
        assert_eq!(app.theme().bg_color, "#ffffff");
        app.poll_events();
        assert_eq!(app.theme().bg_color, "#202020");
    }
}
