use std::collections::{HashMap, VecDeque};
use std::io;

use crossterm::event::{Event, KeyCode};

// --- SimulatedInput for headless runs ---
/// Key script keyed by input frame. Several events may share a frame; they
/// are handed out in insertion order.
pub struct SimulatedInput {
    events: HashMap<u64, VecDeque<Event>>,
    current_frame: u64,
}

impl SimulatedInput {
    pub fn new(script: impl IntoIterator<Item = (u64, Event)>) -> Self {
        let mut events: HashMap<u64, VecDeque<Event>> = HashMap::new();
        for (frame, event) in script {
            events.entry(frame).or_default().push_back(event);
        }
        SimulatedInput { events, current_frame: 0 }
    }

    /// A short session: shop visit, a flight with a few shots, pause, back
    /// to the menu and quit.
    pub fn demo() -> Self {
        let key = |code: KeyCode| Event::Key(code.into());
        let mut script = vec![
            (1, key(KeyCode::Char('s'))),
            (2, key(KeyCode::Char('3'))),
            (3, key(KeyCode::Esc)),
            (4, key(KeyCode::Enter)),
        ];
        for frame in 5..25 {
            script.push((frame, key(KeyCode::Up)));
        }
        script.extend([
            (8, key(KeyCode::Char(' '))),
            (12, key(KeyCode::Left)),
            (14, key(KeyCode::Char(' '))),
            (30, key(KeyCode::Esc)),
            (33, key(KeyCode::Esc)),
            (40, key(KeyCode::Char('q'))),
            (42, key(KeyCode::Char('q'))),
        ]);
        SimulatedInput::new(script)
    }

    pub fn poll(&mut self, frame_count: u64) -> io::Result<bool> {
        self.current_frame = frame_count;
        Ok(self.events.get(&frame_count).is_some_and(|queue| !queue.is_empty()))
    }

    pub fn read(&mut self) -> io::Result<Event> {
        let event = self.events.get_mut(&self.current_frame).and_then(|queue| queue.pop_front());
        Ok(event.unwrap_or(Event::Key(KeyCode::Null.into())))
    }

    pub fn is_exhausted(&self) -> bool {
        self.events.values().all(|queue| queue.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_delivered_on_their_frame_in_order() {
        let mut input = SimulatedInput::new([
            (2, Event::Key(KeyCode::Up.into())),
            (2, Event::Key(KeyCode::Char(' ').into())),
        ]);
        assert!(!input.poll(1).unwrap());
        assert!(input.poll(2).unwrap());
        assert_eq!(input.read().unwrap(), Event::Key(KeyCode::Up.into()));
        assert!(input.poll(2).unwrap());
        assert_eq!(input.read().unwrap(), Event::Key(KeyCode::Char(' ').into()));
        assert!(!input.poll(2).unwrap());
        assert!(input.is_exhausted());
    }

    #[test]
    fn reading_an_empty_frame_yields_null_key() {
        let mut input = SimulatedInput::new(Vec::<(u64, Event)>::new());
        input.poll(5).unwrap();
        assert_eq!(input.read().unwrap(), Event::Key(KeyCode::Null.into()));
    }
}
