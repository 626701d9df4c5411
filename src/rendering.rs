use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, SetBackgroundColor, SetForegroundColor},
};
use log::info;

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer.get(y as usize).map(|r| r.iter().collect()).unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row(y).contains(needle))
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for y in 0..self.height {
            info!("{}", self.row(y));
        }
        info!("---------------------");
    }
}

// --- OutputTarget: real terminal or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            }
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // No styling in headless mode
        }
    }

    pub fn set_colors(&mut self, foreground: Color, background: Color) -> io::Result<()> {
        self.execute_other_command(SetForegroundColor(foreground))?;
        self.execute_other_command(SetBackgroundColor(background))
    }

    pub fn screen_buffer(&self) -> Option<&ScreenBuffer> {
        match self {
            OutputTarget::ScreenBuffer(sb) => Some(sb),
            OutputTarget::Stdout(_) => None,
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                sb.write_str(&String::from_utf8_lossy(buf));
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}

/// Parses `#rrggbb` into a terminal colour.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
}

// --- GameGrid: the frame is composed here, then flushed in one pass ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    /// Like `set_char` but accepts off-screen coordinates from projection.
    pub fn plot(&mut self, x: i32, y: i32, c: char) {
        if x >= 0 && y >= 0 && x <= u16::MAX as i32 && y <= u16::MAX as i32 {
            self.set_char(x as u16, y as u16, c);
        }
    }

    pub fn get_char(&self, x: u16, y: u16) -> Option<char> {
        self.grid.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    /// Writes text from (x, y); characters past the right edge are dropped.
    pub fn write_str(&mut self, x: u16, y: u16, text: &str) {
        for (i, c) in text.chars().enumerate() {
            let Ok(offset) = u16::try_from(i) else { break };
            self.set_char(x.saturating_add(offset), y, c);
        }
    }

    pub fn write_centered(&mut self, y: u16, text: &str) {
        let len = text.chars().count() as u16;
        self.write_str((self.width / 2).saturating_sub(len / 2), y, text);
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, c: char) {
        for row in y..y.saturating_add(h) {
            for col in x..x.saturating_add(w) {
                self.set_char(col, row, c);
            }
        }
    }

    /// Blank box with a border.
    pub fn draw_box(&mut self, x: u16, y: u16, w: u16, h: u16) {
        if w < 2 || h < 2 {
            return;
        }
        self.fill_rect(x, y, w, h, ' ');
        let right = x + w - 1;
        let bottom = y + h - 1;
        for col in x + 1..right {
            self.set_char(col, y, '-');
            self.set_char(col, bottom, '-');
        }
        for row in y + 1..bottom {
            self.set_char(x, row, '|');
            self.set_char(right, row, '|');
        }
        for (cx, cy) in [(x, y), (right, y), (x, bottom), (right, bottom)] {
            self.set_char(cx, cy, '+');
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.grid {
            row.fill(' ');
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        *self = GameGrid::new(width, height);
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }

    pub fn clear_screen_manual(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", " ".repeat(self.width as usize))?;
        }
        stdout.execute_move_to(MoveTo(0, 0))?;
        Ok(())
    }
}

// --- Minimap: top-down view centred on the player ---
pub struct Minimap {
    buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl Minimap {
    pub fn new(width: u16, height: u16) -> Self {
        Minimap {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.buffer[y as usize][x as usize] = c;
        }
    }

    pub fn get_char(&self, x: u16, y: u16) -> Option<char> {
        self.buffer.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            row.fill(' ');
        }
    }

    /// Copies the map onto the grid with a border, top-left corner at (x, y).
    pub fn blit(&self, grid: &mut GameGrid, x: u16, y: u16) {
        grid.draw_box(x, y, self.width + 2, self.height + 2);
        for (row, line) in self.buffer.iter().enumerate() {
            for (col, &c) in line.iter().enumerate() {
                grid.set_char(x + 1 + col as u16, y + 1 + row as u16, c);
            }
        }
    }
}
