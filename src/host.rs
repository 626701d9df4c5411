//! Mini App host integration.
//!
//! The game talks to its embedding host only through [`HostBridge`]. When the
//! process was launched by a host, [`ForwardingHost`] relays every call as a
//! JSON line to the host's outbox and reads host events back, one JSON object
//! per line, from its inbox. Otherwise [`StandaloneHost`] stands in for
//! it: calls are logged, popups are answered with default responses, and
//! alerts come back as [`HostEvent::AlertRequested`] so the game can show
//! them itself.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::GameError;

pub const INIT_DATA_ENV: &str = "SPACERIFT_HOST_INIT_DATA";
pub const OUTBOX_ENV: &str = "SPACERIFT_HOST_OUTBOX";
pub const INBOX_ENV: &str = "SPACERIFT_HOST_INBOX";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeParams {
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub hint_color: Option<String>,
    pub link_color: Option<String>,
    pub button_color: Option<String>,
    pub button_text_color: Option<String>,
}

/// Theme with every colour filled in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub bg_color: String,
    pub text_color: String,
    pub hint_color: String,
    pub link_color: String,
    pub button_color: String,
    pub button_text_color: String,
}

impl ThemeParams {
    pub fn resolve(&self) -> Theme {
        let pick = |value: &Option<String>, fallback: &str| value.clone().unwrap_or_else(|| fallback.to_string());
        Theme {
            bg_color: pick(&self.bg_color, "#ffffff"),
            text_color: pick(&self.text_color, "#000000"),
            hint_color: pick(&self.hint_color, "#999999"),
            link_color: pick(&self.link_color, "#3390ec"),
            button_color: self
                .button_color
                .clone()
                .or_else(|| self.bg_color.clone())
                .unwrap_or_else(|| "#3390ec".to_string()),
            button_text_color: pick(&self.button_text_color, "#ffffff"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitData {
    #[serde(default)]
    pub user: Option<HostUser>,
    #[serde(default)]
    pub chat_type: Option<String>,
    #[serde(default)]
    pub start_param: Option<String>,
    #[serde(default)]
    pub theme_params: ThemeParams,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupButton {
    pub id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupParams {
    pub title: Option<String>,
    pub message: String,
    pub buttons: Vec<PopupButton>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "text", rename_all = "snake_case")]
pub enum ButtonAction {
    Show,
    Hide,
    Enable,
    Disable,
    SetText(String),
    ShowProgress,
    HideProgress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostButton {
    Main,
    Back,
}

/// Things the host tells the game, drained once per frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    ThemeChanged { theme_params: ThemeParams },
    ViewportChanged { width: u16, height: u16, is_expanded: bool },
    ButtonClicked { button: HostButton },
    PopupClosed { button_id: Option<String> },
    ConfirmClosed { confirmed: bool },
    ClipboardTextReceived { data: Option<String> },
    AlertRequested { message: String },
    CloseRequested,
}

pub trait HostBridge {
    fn platform(&self) -> &str;

    /// Whether a real host launched us.
    fn is_embedded(&self) -> bool;

    fn init_data(&self) -> &InitData;

    fn theme_params(&self) -> ThemeParams {
        self.init_data().theme_params.clone()
    }

    fn ready(&mut self);
    fn expand(&mut self);
    fn close(&mut self);
    fn set_header_color(&mut self, color: &str);
    fn set_background_color(&mut self, color: &str);
    fn button(&mut self, button: HostButton, action: ButtonAction);
    fn show_alert(&mut self, message: &str);
    fn show_confirm(&mut self, message: &str);
    fn show_popup(&mut self, params: &PopupParams);
    fn read_text_from_clipboard(&mut self);
    fn write_text_to_clipboard(&mut self, text: &str);

    /// Returns false when the host cannot switch to a chat picker.
    fn switch_inline_query(&mut self, query: &str, chat_types: &[&str]) -> bool;

    fn send_data(&mut self, data: &Value);
    fn open_link(&mut self, url: &str);
    fn poll_events(&mut self) -> Vec<HostEvent>;
}

/// Picks a host: a forwarding host when init data is present and parses,
/// the stand-in otherwise. The inbox must not block on read.
pub fn detect(
    init_data: Option<String>,
    outbox: Box<dyn Write>,
    inbox: Option<Box<dyn BufRead>>,
) -> Box<dyn HostBridge> {
    let Some(raw) = init_data else {
        warn!("No Mini App host found, running standalone");
        return Box::new(StandaloneHost::new());
    };
    match serde_json::from_str::<InitData>(&raw) {
        Ok(data) => {
            info!("Mini App host detected (platform {})", data.platform.as_deref().unwrap_or("unknown"));
            let host = ForwardingHost::new(data, outbox);
            match inbox {
                Some(inbox) => Box::new(host.with_inbox(inbox)),
                None => Box::new(host),
            }
        }
        Err(e) => {
            warn!("Ignoring malformed host init data: {}", e);
            Box::new(StandaloneHost::new())
        }
    }
}

// --- Stand-in host ---

pub struct StandaloneHost {
    init_data: InitData,
    clipboard: Option<String>,
    header_color: String,
    background_color: String,
    events: VecDeque<HostEvent>,
    pub sent: Vec<Value>,
}

impl Default for StandaloneHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StandaloneHost {
    pub fn new() -> Self {
        StandaloneHost {
            init_data: InitData {
                user: Some(HostUser {
                    id: 12345,
                    first_name: "Test".to_string(),
                    last_name: Some("User".to_string()),
                    username: Some("test_user".to_string()),
                    language_code: Some("en".to_string()),
                    is_premium: false,
                }),
                chat_type: None,
                start_param: None,
                theme_params: ThemeParams {
                    bg_color: Some("#ffffff".to_string()),
                    text_color: Some("#000000".to_string()),
                    hint_color: Some("#999999".to_string()),
                    link_color: Some("#3390ec".to_string()),
                    button_color: Some("#3390ec".to_string()),
                    button_text_color: Some("#ffffff".to_string()),
                },
                platform: Some("terminal".to_string()),
            },
            clipboard: None,
            header_color: "#000000".to_string(),
            background_color: "#000000".to_string(),
            events: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn header_color(&self) -> &str {
        &self.header_color
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }
}

impl HostBridge for StandaloneHost {
    fn platform(&self) -> &str {
        "terminal"
    }

    fn is_embedded(&self) -> bool {
        false
    }

    fn init_data(&self) -> &InitData {
        &self.init_data
    }

    fn ready(&mut self) {
        debug!("WebApp ready (stub)");
    }

    fn expand(&mut self) {
        debug!("WebApp expand (stub)");
    }

    fn close(&mut self) {
        debug!("WebApp close (stub)");
        self.events.push_back(HostEvent::CloseRequested);
    }

    fn set_header_color(&mut self, color: &str) {
        debug!("Header color set: {} (stub)", color);
        self.header_color = color.to_string();
    }

    fn set_background_color(&mut self, color: &str) {
        debug!("Background color set: {} (stub)", color);
        self.background_color = color.to_string();
    }

    fn button(&mut self, button: HostButton, action: ButtonAction) {
        debug!("{:?} button {:?} (stub)", button, action);
    }

    fn show_alert(&mut self, message: &str) {
        self.events.push_back(HostEvent::AlertRequested { message: message.to_string() });
    }

    fn show_confirm(&mut self, message: &str) {
        debug!("Confirm '{}' auto-accepted (stub)", message);
        self.events.push_back(HostEvent::ConfirmClosed { confirmed: true });
    }

    fn show_popup(&mut self, params: &PopupParams) {
        debug!("Show popup '{}' (stub)", params.message);
        let button_id = params.buttons.first().map(|b| b.id.clone()).or_else(|| Some("1".to_string()));
        self.events.push_back(HostEvent::PopupClosed { button_id });
    }

    fn read_text_from_clipboard(&mut self) {
        let data = self.clipboard.clone().or_else(|| Some("stub_clipboard_text".to_string()));
        self.events.push_back(HostEvent::ClipboardTextReceived { data });
    }

    fn write_text_to_clipboard(&mut self, text: &str) {
        info!("Copied to clipboard: {}", text);
        self.clipboard = Some(text.to_string());
    }

    fn switch_inline_query(&mut self, query: &str, _chat_types: &[&str]) -> bool {
        debug!("Switch inline query unavailable (stub): {}", query);
        false
    }

    fn send_data(&mut self, data: &Value) {
        debug!("Data sent (stub): {}", data);
        self.sent.push(data.clone());
    }

    fn open_link(&mut self, url: &str) {
        info!("Open link: {} (stub)", url);
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        self.events.drain(..).collect()
    }
}

// --- Forwarding host ---

/// Relays every call to the embedding host as one JSON object per line.
pub struct ForwardingHost {
    init_data: InitData,
    outbox: Box<dyn Write>,
    inbox: Option<Box<dyn BufRead>>,
    partial_line: String,
    pending: VecDeque<HostEvent>,
}

impl ForwardingHost {
    pub fn new(init_data: InitData, outbox: Box<dyn Write>) -> Self {
        ForwardingHost {
            init_data,
            outbox,
            inbox: None,
            partial_line: String::new(),
            pending: VecDeque::new(),
        }
    }

    /// Host events are read from `inbox` on every poll. A trailing line
    /// without its newline is kept until the rest arrives.
    pub fn with_inbox(mut self, inbox: Box<dyn BufRead>) -> Self {
        self.inbox = Some(inbox);
        self
    }

    /// Queues an event received from the host side.
    pub fn deliver(&mut self, event: HostEvent) {
        self.pending.push_back(event);
    }

    pub fn deliver_json(&mut self, line: &str) -> Result<(), GameError> {
        let event = serde_json::from_str(line).map_err(|e| GameError::Host(format!("bad host event: {e}")))?;
        self.deliver(event);
        Ok(())
    }

    fn read_inbox(&mut self) {
        let Some(inbox) = self.inbox.as_mut() else {
            return;
        };
        let mut lines = Vec::new();
        loop {
            match inbox.read_line(&mut self.partial_line) {
                Ok(0) => break,
                Ok(_) if !self.partial_line.ends_with('\n') => break,
                Ok(_) => lines.push(std::mem::take(&mut self.partial_line)),
                Err(e) => {
                    error!("Failed to read host inbox: {}", e);
                    break;
                }
            }
        }
        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            if let Err(e) = self.deliver_json(line) {
                warn!("Skipping host inbox line: {}", e);
            }
        }
    }

    fn forward(&mut self, method: &str, params: Value) {
        let message = json!({ "method": method, "params": params });
        if let Err(e) = writeln!(self.outbox, "{}", message).and_then(|_| self.outbox.flush()) {
            error!("Failed to forward {} to host: {}", method, e);
        }
    }
}

impl HostBridge for ForwardingHost {
    fn platform(&self) -> &str {
        self.init_data.platform.as_deref().unwrap_or("unknown")
    }

    fn is_embedded(&self) -> bool {
        true
    }

    fn init_data(&self) -> &InitData {
        &self.init_data
    }

    fn ready(&mut self) {
        self.forward("ready", Value::Null);
    }

    fn expand(&mut self) {
        self.forward("expand", Value::Null);
    }

    fn close(&mut self) {
        self.forward("close", Value::Null);
    }

    fn set_header_color(&mut self, color: &str) {
        self.forward("setHeaderColor", json!({ "color": color }));
    }

    fn set_background_color(&mut self, color: &str) {
        self.forward("setBackgroundColor", json!({ "color": color }));
    }

    fn button(&mut self, button: HostButton, action: ButtonAction) {
        self.forward("button", json!({ "button": button, "action": action }));
    }

    fn show_alert(&mut self, message: &str) {
        self.forward("showAlert", json!({ "message": message }));
    }

    fn show_confirm(&mut self, message: &str) {
        self.forward("showConfirm", json!({ "message": message }));
    }

    fn show_popup(&mut self, params: &PopupParams) {
        self.forward("showPopup", json!(params));
    }

    fn read_text_from_clipboard(&mut self) {
        self.forward("readTextFromClipboard", Value::Null);
    }

    fn write_text_to_clipboard(&mut self, text: &str) {
        self.forward("writeTextToClipboard", json!({ "text": text }));
    }

    fn switch_inline_query(&mut self, query: &str, chat_types: &[&str]) -> bool {
        self.forward("switchInlineQuery", json!({ "query": query, "choose_chat_types": chat_types }));
        true
    }

    fn send_data(&mut self, data: &Value) {
        self.forward("sendData", json!({ "data": data.to_string() }));
    }

    fn open_link(&mut self, url: &str) {
        self.forward("openLink", json!({ "url": url }));
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        self.read_inbox();
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SharedInbox, SharedSink};
    use std::io;

    #[test]
    fn theme_defaults_fill_missing_colours() {
        let theme = ThemeParams::default().resolve();
        assert_eq!(theme.bg_color, "#ffffff");
        assert_eq!(theme.button_color, "#3390ec");

        let dark = ThemeParams { bg_color: Some("#101010".to_string()), ..ThemeParams::default() }.resolve();
        assert_eq!(dark.button_color, "#101010");
    }

    #[test]
    fn detect_without_init_data_is_standalone() {
        let host = detect(None, Box::new(io::sink()), None);
        assert!(!host.is_embedded());
        assert_eq!(host.platform(), "terminal");
    }

    #[test]
    fn detect_with_malformed_init_data_falls_back() {
        let host = detect(Some("{oops".to_string()), Box::new(io::sink()), None);
        assert!(!host.is_embedded());
    }

    #[test]
    fn detect_with_init_data_forwards() {
        let raw = r#"{"user":{"id":7,"first_name":"Ada"},"platform":"ios"}"#;
        let host = detect(Some(raw.to_string()), Box::new(io::sink()), None);
        assert!(host.is_embedded());
        assert_eq!(host.platform(), "ios");
        assert_eq!(host.init_data().user.as_ref().map(|u| u.id), Some(7));
    }

    #[test]
    fn standalone_turns_alerts_into_events() {
        let mut host = StandaloneHost::new();
        host.show_alert("hello");
        host.show_popup(&PopupParams { title: None, message: "pick".to_string(), buttons: Vec::new() });
        let events = host.poll_events();
        assert_eq!(events[0], HostEvent::AlertRequested { message: "hello".to_string() });
        assert_eq!(events[1], HostEvent::PopupClosed { button_id: Some("1".to_string()) });
        assert!(host.poll_events().is_empty());
    }

    #[test]
    fn standalone_clipboard_round_trips() {
        let mut host = StandaloneHost::new();
        host.write_text_to_clipboard("score 42");
        host.read_text_from_clipboard();
        assert_eq!(
            host.poll_events(),
            vec![HostEvent::ClipboardTextReceived { data: Some("score 42".to_string()) }]
        );
    }

    #[test]
    fn forwarding_host_writes_json_lines() {
        let sink = SharedSink::default();
        let mut host = ForwardingHost::new(InitData::default(), Box::new(sink.clone()));
        host.set_header_color("#000000");
        host.button(HostButton::Back, ButtonAction::Hide);
        host.send_data(&json!({ "type": "game_start" }));

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["method"], "setHeaderColor");
        assert_eq!(lines[0]["params"]["color"], "#000000");
        assert_eq!(lines[1]["params"]["button"], "back");
        assert_eq!(lines[2]["params"]["data"], r#"{"type":"game_start"}"#);
    }

    #[test]
    fn forwarding_host_parses_inbound_events() {
        let mut host = ForwardingHost::new(InitData::default(), Box::new(io::sink()));
        host.deliver_json(r#"{"event":"button_clicked","button":"back"}"#).unwrap();
        host.deliver_json(r#"{"event":"viewport_changed","width":80,"height":24,"is_expanded":true}"#)
            .unwrap();
        assert!(host.deliver_json("not json").is_err());
        let events = host.poll_events();
        assert_eq!(events[0], HostEvent::ButtonClicked { button: HostButton::Back });
        assert!(matches!(events[1], HostEvent::ViewportChanged { width: 80, .. }));
    }

    #[test]
    fn inbox_lines_become_events_as_they_arrive() {
        let inbox = SharedInbox::default();
        let raw = r#"{"platform":"android"}"#;
        let mut host = detect(Some(raw.to_string()), Box::new(io::sink()), Some(inbox.reader()));
        assert!(host.poll_events().is_empty());

        inbox.push("{\"event\":\"button_clicked\",\"button\":\"back\"}\n\nnot json\n{\"event\":\"close_");
        assert_eq!(host.poll_events(), vec![HostEvent::ButtonClicked { button: HostButton::Back }]);

        inbox.push("requested\"}\n");
        assert_eq!(host.poll_events(), vec![HostEvent::CloseRequested]);
        assert!(host.poll_events().is_empty());
    }
}
