use std::cmp::min;
use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};

use crate::config::{Config, ConfigError};
use crate::game::{InputSource, Intent, RenderSink};
use crate::snake::{Direction::{self, *}, TickResult::*};
use crate::world::Frame;
use crate::Cell;

type TermPos = (u16, u16);

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const EMPTY_CHAR: char = ' ';

/// Owns the terminal while a game is running: raw mode, the alternate screen
/// and a copy of everything printed so pop-up messages can be taken down.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    board: BoardLayout,
    active: bool,
}

struct Message {
    top_left: TermPos,
    width: u16,
    height: u16,
}

/// Where the board sits on the terminal and how wide a cell is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct BoardLayout {
    top_left: TermPos,
    size: TermPos,
    cell_size: u16,
}

impl BoardLayout {
    fn centered(term_size: TermPos, config: &Config) -> Self {
        let size = config.board_size();
        let top_left = ((term_size.0 - size.0) / 2, (term_size.1 - size.1) / 2);
        BoardLayout { top_left, size, cell_size: config.cell_size }
    }

    /// Leftmost terminal position of a cell.
    fn to_term(&self, cell: Cell) -> TermPos {
        let x = self.top_left.0 + 1 + cell.0 as u16 * self.cell_size;
        let y = self.top_left.1 + 1 + cell.1 as u16;
        (x, y)
    }
}

impl TermManager {
    pub fn new(config: &Config) -> Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let (needed_width, needed_height) = config.board_size();

        if width < needed_width || height < needed_height {
            return Err(ConfigError::TerminalTooSmall {
                term_width: width,
                term_height: height,
                needed_width,
                needed_height,
            }.into());
        }

        let board = BoardLayout::centered((width, height), config);
        let screen = vec![EMPTY_CHAR; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None, board, active: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("entering alternate screen")?;
        self.active = true;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("hiding cursor")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode().context("disabling raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking).context("showing cursor")?;
        execute!(self.stdout, LeaveAlternateScreen).context("leaving alternate screen")?;
        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        // A blank row above and below the text, a blank column either side
        let text_width = lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2;
        let rows = std::iter::once("").chain(lines.iter().copied()).chain(std::iter::once(""));

        // Clipped to the screen so hide_message() only touches real cells
        let msg_width = min(text_width, self.width as usize) as u16;
        let msg_height = min(lines.len() + 2, self.height as usize) as u16;
        let top_left = ((self.width - msg_width) / 2, (self.height - msg_height) / 2);

        for (y_diff, line) in rows.take(msg_height as usize).enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = text_width);
            let y = top_left.1 + y_diff as u16;
            for (x_diff, ch) in padded_line.chars().take(msg_width as usize).enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { width: msg_width, height: msg_height, top_left });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the message was covering
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                let ch = self.screen[self.width as usize * y as usize + x as usize];
                self.print_at_no_save((x, y), ch)?;
            }
        }

        self.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> Result<()> {
        let (left, top) = self.board.top_left;
        let (width, height) = self.board.size;
        let (right, bottom) = (left + width - 1, top + height - 1);

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        Ok(())
    }

    fn draw_board(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.hide_message()?;
        self.clear()?;
        self.draw_borders()?;

        let body_char = if frame.game_over {DEAD_SNAKE_CHAR} else {SNAKE_BODY_CHAR};
        for pos in frame.snake.segments().skip(1) {
            self.print_cell(*pos, body_char)?;
        }

        let head_char = if frame.game_over {DEAD_SNAKE_CHAR} else {head_char(frame.snake.direction())};
        self.print_cell(frame.snake.head(), head_char)
    }

    fn draw_step(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.print_cell(frame.snake.head(), head_char(frame.snake.direction()))?;

        if let Some(neck) = frame.snake.segments().nth(1) {
            self.print_cell(*neck, SNAKE_BODY_CHAR)?;
        }

        Ok(())
    }

    fn print_cell(&mut self, cell: Cell, ch: char) -> Result<()> {
        let (x, y) = self.board.to_term(cell);
        for i in 0..self.board.cell_size {
            self.print_at((x + i, y), ch)?;
        }
        Ok(())
    }

    fn print_at(&mut self, pos: TermPos, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: TermPos, ch: char) -> Result<()> {
        // Messages are not recorded in the buffer so hide_message() can
        // restore what was underneath.
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("clearing terminal")?;
        self.screen = vec![EMPTY_CHAR; self.width as usize * self.height as usize];
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("flushing terminal")
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            log::error!("failed to restore terminal: {:#}", err);
        }
    }
}

impl InputSource for TermManager {
    fn poll_intents(&mut self) -> Result<Vec<Intent>> {
        let mut intents = vec![];

        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                intents.push(intent_for(&ev));
            }
        }

        Ok(intents)
    }

    fn wait_intent(&mut self) -> Result<Intent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(intent_for(&ev));
            }
        }
    }
}

impl RenderSink for TermManager {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        match frame.outcome {
            None | Some(Collided { .. }) => self.draw_board(frame)?,
            Some(Moved { old_tail, .. }) => {
                self.print_cell(old_tail, EMPTY_CHAR)?;
                self.draw_step(frame)?;
            }
            Some(Grew { .. }) => self.draw_step(frame)?,
        }

        // Food may sit under the body, in which case the body wins
        if !frame.snake.occupies(frame.food) {
            self.print_cell(frame.food, FOOD_CHAR)?;
        }

        self.flush()
    }

    fn show_game_over(&mut self, length: usize) -> Result<()> {
        self.show_message(&[
            "Game over!",
            &*format!("Length: {}", length),
            "",
            "Press any key to play again,",
            "or Esc to quit."
        ])
    }
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn intent_for(ev: &KeyEvent) -> Intent {
    if is_ctrl_c(ev) {
        return Intent::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Intent::Turn(Up),
        KeyCode::Char('a') | KeyCode::Left => Intent::Turn(Left),
        KeyCode::Char('s') | KeyCode::Down => Intent::Turn(Down),
        KeyCode::Char('d') | KeyCode::Right => Intent::Turn(Right),
        KeyCode::Esc | KeyCode::Char('q') => Intent::Quit,
        _ => Intent::Other,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(intent_for(&key(KeyCode::Up)), Intent::Turn(Up));
        assert_eq!(intent_for(&key(KeyCode::Char('a'))), Intent::Turn(Left));
        assert_eq!(intent_for(&key(KeyCode::Char('s'))), Intent::Turn(Down));
        assert_eq!(intent_for(&key(KeyCode::Right)), Intent::Turn(Right));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(intent_for(&key(KeyCode::Esc)), Intent::Quit);
        assert_eq!(intent_for(&key(KeyCode::Char('q'))), Intent::Quit);
        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(intent_for(&ctrl_c), Intent::Quit);
        assert_eq!(intent_for(&key(KeyCode::Char('c'))), Intent::Other);
    }

    fn detached(width: u16, height: u16, config: &Config) -> TermManager {
        TermManager {
            width,
            height,
            stdout: stdout(),
            screen: vec![EMPTY_CHAR; width as usize * height as usize],
            current_msg: None,
            board: BoardLayout::centered((width, height), config),
            active: false,
        }
    }

    fn small_board() -> Config {
        Config { grid: Grid::new(4, 2).unwrap(), cell_size: 1, ..Config::default() }
    }

    #[test]
    fn game_over_message_fits_a_short_terminal() {
        let mut term = detached(40, 5, &small_board());
        term.show_game_over(3).unwrap();

        let msg = term.current_msg.as_ref().unwrap();
        assert_eq!((msg.width, msg.height), (30, 5));
        assert_eq!(msg.top_left, (5, 0));

        term.hide_message().unwrap();
        assert!(!term.has_message());
    }

    #[test]
    fn game_over_message_fits_a_narrow_terminal() {
        let mut term = detached(12, 20, &small_board());
        term.print_at((3, 9), 'O').unwrap();
        term.show_game_over(3).unwrap();

        let msg = term.current_msg.as_ref().unwrap();
        assert_eq!((msg.width, msg.height), (12, 7));
        assert!(msg.top_left.0 + msg.width <= 12);
        assert!(msg.top_left.1 + msg.height <= 20);

        term.hide_message().unwrap();
        assert_eq!(term.screen[12 * 9 + 3], 'O');
        assert!(term.screen.iter().filter(|&&ch| ch != EMPTY_CHAR).eq(['O'].iter()));
    }

    #[test]
    fn board_is_centered_and_cells_are_widened() {
        let config = Config { grid: Grid::new(4, 3).unwrap(), cell_size: 2, ..Config::default() };
        let layout = BoardLayout::centered((20, 9), &config);

        assert_eq!(layout.size, (10, 5));
        assert_eq!(layout.top_left, (5, 2));
        assert_eq!(layout.to_term((0, 0)), (6, 3));
        assert_eq!(layout.to_term((3, 2)), (12, 5));
    }
}
