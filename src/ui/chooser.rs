use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserAction {
    Continue,
    Chosen(usize),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ChooserState {
    pub options: Vec<String>,
    pub selected: usize,
}

impl ChooserState {
    pub fn new(options: Vec<String>, selected: usize) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        Self { options, selected }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ChooserAction {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                ChooserAction::Cancelled
            }
            KeyCode::Esc | KeyCode::Char('q') => ChooserAction::Cancelled,
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                ChooserAction::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected < self.options.len().saturating_sub(1) {
                    self.selected += 1;
                }
                ChooserAction::Continue
            }
            KeyCode::Enter if !self.options.is_empty() => ChooserAction::Chosen(self.selected),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = (c as usize).wrapping_sub('1' as usize);
                if index < self.options.len() {
                    self.selected = index;
                    ChooserAction::Chosen(index)
                } else {
                    ChooserAction::Continue
                }
            }
            _ => ChooserAction::Continue,
        }
    }
}

pub fn draw_chooser(f: &mut Frame, title: &str, state: &ChooserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = state
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            if i == state.selected {
                ListItem::new(format!("> {}. {}", i + 1, option)).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(format!("  {}. {}", i + 1, option))
            }
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    f.render_widget(list, chunks[1]);

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_text = vec![Line::from(vec![
        Span::styled("↑/↓", key_style),
        Span::from(" Navigate  "),
        Span::styled("Enter", key_style),
        Span::from(" Select  "),
        Span::styled("Esc", key_style),
        Span::from(" Cancel"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Full-screen chooser. Returns the chosen index, or `None` if cancelled.
pub fn run_chooser(title: &str, options: Vec<String>, selected: usize) -> io::Result<Option<usize>> {
    with_terminal_restored(
        || {
            enable_raw_mode()?;
            execute!(io::stdout(), EnterAlternateScreen)
        },
        || {
            let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
            let mut state = ChooserState::new(options, selected);
            let result = event_loop(&mut terminal, title, &mut state);
            let _ = terminal.show_cursor();
            result
        },
        restore_terminal,
    )
}

/// Runs `body` after a successful `enter`. `leave` always runs, even when
/// `enter` or `body` fails; the first error wins.
fn with_terminal_restored<T>(
    enter: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> io::Result<T>,
    leave: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    let result = enter().and_then(|()| body());
    let restored = leave();
    let value = result?;
    restored?;
    Ok(value)
}

fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen);
    raw.and(screen)
}

fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    title: &str,
    state: &mut ChooserState,
) -> io::Result<Option<usize>> {
    loop {
        terminal.draw(|f| draw_chooser(f, title, state))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match state.handle_key(key) {
                ChooserAction::Continue => {}
                ChooserAction::Chosen(index) => return Ok(Some(index)),
                ChooserAction::Cancelled => return Ok(None),
            }
        }
    }
}
