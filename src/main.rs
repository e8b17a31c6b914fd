use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use roster_terminal::feed;
use roster_terminal::state::{
    apply_delta, sort_key_title, sort_label, sport_label, AppState, Delta, LoadPhase,
    ProviderCommand, Screen, SORT_KEYS,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.state.help_overlay = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if self.state.sort_picker.is_some() {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => self.state.sort_picker_next(),
                KeyCode::Char('k') | KeyCode::Up => self.state.sort_picker_prev(),
                KeyCode::Enter => self.state.apply_sort_picker(),
                KeyCode::Esc | KeyCode::Char('s') => self.state.close_sort_picker(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if matches!(self.state.screen, Screen::Roster) {
                    self.state.select_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if matches!(self.state.screen, Screen::Roster) {
                    self.state.select_prev();
                }
            }
            KeyCode::Enter | KeyCode::Char('d') => self.state.open_detail(),
            KeyCode::Char('b') | KeyCode::Esc => self.state.close_detail(),
            KeyCode::Char('s') => self.state.open_sort_picker(),
            KeyCode::Char('r') => self.retry_fetch(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn retry_fetch(&mut self) {
        if !matches!(self.state.phase, LoadPhase::Error(_)) {
            return;
        }
        if self.cmd_tx.send(ProviderCommand::FetchPlayers).is_err() {
            self.state.push_log("[WARN] Fetch worker unavailable");
            return;
        }
        self.state.phase = LoadPhase::Loading;
        self.state.push_log("[INFO] Retrying player fetch");
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.state.clamp_selection();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_roster(frame, chunks[1], &app.state);

    let status =
        Paragraph::new(status_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if matches!(app.state.screen, Screen::Detail { .. }) {
        render_detail_modal(frame, frame.size(), &app.state);
    }
    if app.state.sort_picker.is_some() {
        render_sort_picker(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let phase = match &state.phase {
        LoadPhase::Loading => "LOADING".to_string(),
        LoadPhase::Error(_) => "ERROR".to_string(),
        LoadPhase::Loaded => format!("{} PLAYERS", state.players.len()),
    };
    let line1 = format!(
        "  __   ROSTER TERMINAL | {} | Sort: {}",
        phase,
        sort_label(state.sort)
    );
    let line2 = " |__|".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.sort_picker.is_some() {
        return "j/k/↑/↓ Move | Enter Apply | Esc Cancel | q Quit".to_string();
    }
    match (&state.screen, &state.phase) {
        (Screen::Detail { .. }, _) => "b/Esc Back | ? Help | q Quit".to_string(),
        (_, LoadPhase::Error(_)) => "r Retry | ? Help | q Quit".to_string(),
        _ => "j/k/↑/↓ Move | Enter/d Detail | s Sort | ? Help | q Quit".to_string(),
    }
}

fn status_text(state: &AppState) -> String {
    let last_log = state.logs.back().cloned().unwrap_or_default();
    match state.loaded_at {
        Some(at) => {
            let local: DateTime<Local> = at.into();
            if last_log.is_empty() {
                format!("Loaded {}", local.format("%H:%M:%S"))
            } else {
                format!("{last_log} | Loaded {}", local.format("%H:%M:%S"))
            }
        }
        None => last_log,
    }
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.phase {
        LoadPhase::Loading => {
            let loading =
                Paragraph::new("Loading players...").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, area);
        }
        LoadPhase::Error(message) => {
            let error = Paragraph::new(format!("Error: {message}\nPress r to retry"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
        }
        LoadPhase::Loaded => render_player_list(frame, area, state),
    }
}

fn render_player_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = roster_columns();
    render_roster_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let players = state.sorted_players();
    if players.is_empty() {
        let empty =
            Paragraph::new("No players found").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, players.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let p = players[idx];
        let jersey = p
            .jersey_number
            .map(|n| format!("#{n}"))
            .unwrap_or_else(|| "#--".to_string());
        let name = if p.full_name.is_empty() {
            "-"
        } else {
            p.full_name.as_str()
        };
        let position = if p.position.is_empty() {
            "-"
        } else {
            p.position.as_str()
        };
        let team = p.team.as_deref().unwrap_or("-");

        let sep_style = Style::default().fg(Color::DarkGray);
        render_cell_text(frame, cols[0], &jersey, row_style);
        render_vseparator(frame, cols[1], sep_style);
        render_cell_text(frame, cols[2], name, row_style);
        render_vseparator(frame, cols[3], sep_style);
        render_cell_text(frame, cols[4], position, row_style);
        render_vseparator(frame, cols[5], sep_style);
        render_cell_text(frame, cols[6], sport_label(p.sport), row_style);
        render_vseparator(frame, cols[7], sep_style);
        render_cell_text(frame, cols[8], team, row_style);
    }
}

fn roster_columns() -> [Constraint; 9] {
    [
        Constraint::Length(6),
        Constraint::Length(1),
        Constraint::Min(20),
        Constraint::Length(1),
        Constraint::Length(12),
        Constraint::Length(1),
        Constraint::Length(12),
        Constraint::Length(1),
        Constraint::Min(14),
    ]
}

fn render_roster_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);
    let sep_style = Style::default().fg(Color::DarkGray);

    render_cell_text(frame, cols[0], "No", style);
    render_vseparator(frame, cols[1], sep_style);
    render_cell_text(frame, cols[2], "Name", style);
    render_vseparator(frame, cols[3], sep_style);
    render_cell_text(frame, cols[4], "Position", style);
    render_vseparator(frame, cols[5], sep_style);
    render_cell_text(frame, cols[6], "Sport", style);
    render_vseparator(frame, cols[7], sep_style);
    render_cell_text(frame, cols[8], "Team", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_vseparator(frame: &mut Frame, area: Rect, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let mut text = String::new();
    for i in 0..area.height {
        if i > 0 {
            text.push('\n');
        }
        text.push('│');
    }
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_detail_modal(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let detail = Paragraph::new(detail_text(state))
        .block(Block::default().title("Player").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(detail, popup_area);
}

fn detail_text(state: &AppState) -> String {
    let Some(player) = state.selected_player() else {
        return "No player selected".to_string();
    };

    let jersey = player
        .jersey_number
        .map(|n| format!("#{n}"))
        .unwrap_or_else(|| "#--".to_string());
    let name = if player.full_name.is_empty() {
        "-"
    } else {
        player.full_name.as_str()
    };
    let position = if player.position.is_empty() {
        "-"
    } else {
        player.position.as_str()
    };

    let mut lines = vec![
        format!("{jersey} {name}"),
        String::new(),
        format!("Position: {position}"),
        format!("Sport: {}", sport_label(player.sport)),
        format!("Team: {}", player.team.as_deref().unwrap_or("-")),
        format!("Photo: {}", player.url.as_deref().unwrap_or("none")),
    ];
    if let Some(bio) = player.bio.as_deref()
        && !bio.trim().is_empty()
    {
        lines.push(String::new());
        lines.push(bio.trim().to_string());
    }
    lines.push(String::new());
    lines.push("b/Esc Close".to_string());
    lines.join("\n")
}

fn render_sort_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(highlighted) = state.sort_picker else {
        return;
    };
    let popup_area = centered_rect(34, 30, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = Vec::new();
    for (idx, key) in SORT_KEYS.iter().enumerate() {
        let marker = if idx == highlighted { "> " } else { "  " };
        let current = if *key == state.sort { " *" } else { "" };
        lines.push(format!("{marker}{}{current}", sort_key_title(*key)));
    }
    lines.push(String::new());
    lines.push("Enter Apply | Esc Cancel".to_string());

    let picker = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Sort by").borders(Borders::ALL));
    frame.render_widget(picker, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Roster Terminal - Help",
        "",
        "Roster:",
        "  j/k or ↑/↓   Move",
        "  Enter / d    Player detail",
        "  s            Sort picker",
        "  r            Retry fetch (after an error)",
        "",
        "Global:",
        "  b / Esc      Back / close",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
