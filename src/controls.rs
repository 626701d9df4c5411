use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Flight intents. Input handlers set them; the engine reads them once per
/// frame and clears `shoot` after firing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub thrust: bool,
    pub brake: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    // Most terminals never send key releases. Once one shows up we trust
    // releases instead of dropping held intents every frame.
    releases_reported: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Thrust,
    Brake,
    Left,
    Right,
    Shoot,
}

impl Intent {
    pub fn from_key(code: KeyCode) -> Option<Intent> {
        match code {
            KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Intent::Thrust),
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Intent::Brake),
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Intent::Left),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Intent::Right),
            KeyCode::Char(' ') => Some(Intent::Shoot),
            _ => None,
        }
    }
}

impl Controls {
    pub fn set(&mut self, intent: Intent, pressed: bool) {
        match intent {
            Intent::Thrust => self.thrust = pressed,
            Intent::Brake => self.brake = pressed,
            Intent::Left => self.left = pressed,
            Intent::Right => self.right = pressed,
            Intent::Shoot => self.shoot = pressed,
        }
    }

    /// Applies a key event. Returns false when the key is not a flight key.
    pub fn apply_key(&mut self, key: KeyEvent) -> bool {
        let Some(intent) = Intent::from_key(key.code) else {
            return false;
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.set(intent, true),
            KeyEventKind::Release => {
                self.releases_reported = true;
                self.set(intent, false);
            }
        }
        true
    }

    /// End-of-frame hook: without release events, held intents last one frame
    /// and are renewed by key repeat.
    pub fn end_frame(&mut self) {
        if !self.releases_reported {
            self.thrust = false;
            self.brake = false;
            self.left = false;
            self.right = false;
        }
    }

    pub fn release_all(&mut self) {
        let releases_reported = self.releases_reported;
        *self = Controls { releases_reported, ..Controls::default() };
    }
}
