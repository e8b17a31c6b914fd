use std::collections::VecDeque;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Basketball,
}

/// Canonical in-memory player record. `url` is derived once at parse time
/// from whichever image column the backend happened to use and is never
/// recomputed afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub full_name: String,
    pub position: String,
    pub jersey_number: Option<u32>,
    pub sport: Option<Sport>,
    pub team: Option<String>,
    pub bio: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Jersey,
    Name,
    Position,
}

/// Picker order. Jersey first because it is the backend's default ordering.
pub const SORT_KEYS: [SortKey; 3] = [SortKey::Jersey, SortKey::Name, SortKey::Position];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Error(String),
    Loaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Detail { player_id: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub phase: LoadPhase,
    pub sort: SortKey,
    /// Backend order (jersey ascending). Sorted views are derived copies;
    /// this list is never reordered in place.
    pub players: Vec<Player>,
    /// Index into the current sorted view.
    pub selected: usize,
    /// Highlighted row while the sort picker modal is open.
    pub sort_picker: Option<usize>,
    pub help_overlay: bool,
    pub loaded_at: Option<SystemTime>,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Roster,
            phase: LoadPhase::Loading,
            sort: SortKey::Jersey,
            players: Vec::new(),
            selected: 0,
            sort_picker: None,
            help_overlay: false,
            loaded_at: None,
            logs: VecDeque::with_capacity(200),
        }
    }

    pub fn sorted_players(&self) -> Vec<&Player> {
        sort_players(&self.players, self.sort)
    }

    pub fn selected_player(&self) -> Option<&Player> {
        match &self.screen {
            // Detail stays pinned to the id it was opened with.
            Screen::Detail { player_id } => self.players.iter().find(|p| &p.id == player_id),
            Screen::Roster => self.sorted_players().get(self.selected).copied(),
        }
    }

    pub fn select_next(&mut self) {
        let total = self.sorted_players().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.sorted_players().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.sorted_players().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn open_detail(&mut self) {
        if !matches!(self.phase, LoadPhase::Loaded) {
            return;
        }
        if !matches!(self.screen, Screen::Roster) {
            return;
        }
        let Some(id) = self.sorted_players().get(self.selected).map(|p| p.id.clone()) else {
            return;
        };
        self.screen = Screen::Detail { player_id: id };
    }

    pub fn close_detail(&mut self) {
        if matches!(self.screen, Screen::Detail { .. }) {
            self.screen = Screen::Roster;
        }
    }

    pub fn open_sort_picker(&mut self) {
        if !matches!(self.phase, LoadPhase::Loaded) {
            return;
        }
        if !matches!(self.screen, Screen::Roster) {
            return;
        }
        let current = SORT_KEYS.iter().position(|k| *k == self.sort).unwrap_or(0);
        self.sort_picker = Some(current);
    }

    pub fn sort_picker_next(&mut self) {
        if let Some(idx) = self.sort_picker {
            self.sort_picker = Some((idx + 1) % SORT_KEYS.len());
        }
    }

    pub fn sort_picker_prev(&mut self) {
        if let Some(idx) = self.sort_picker {
            self.sort_picker = Some(if idx == 0 { SORT_KEYS.len() - 1 } else { idx - 1 });
        }
    }

    pub fn apply_sort_picker(&mut self) {
        if let Some(idx) = self.sort_picker.take() {
            self.set_sort(SORT_KEYS[idx]);
        }
    }

    pub fn close_sort_picker(&mut self) {
        self.sort_picker = None;
    }

    pub fn set_sort(&mut self, key: SortKey) {
        let selected_id = self
            .sorted_players()
            .get(self.selected)
            .map(|p| p.id.clone());
        self.sort = key;
        self.restore_selection(selected_id);
    }

    fn restore_selection(&mut self, selected_id: Option<String>) {
        if let Some(id) = selected_id
            && let Some(pos) = self.sorted_players().iter().position(|p| p.id == id)
        {
            self.selected = pos;
            return;
        }
        self.selected = 0;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Derive a freshly ordered view of the roster. Stable, so rows comparing
/// equal under `key` keep their backend order.
pub fn sort_players(players: &[Player], key: SortKey) -> Vec<&Player> {
    let mut view: Vec<&Player> = players.iter().collect();
    match key {
        SortKey::Jersey => view.sort_by_key(|p| p.jersey_number.unwrap_or(0)),
        SortKey::Name => view.sort_by(|a, b| a.full_name.cmp(&b.full_name)),
        SortKey::Position => view.sort_by(|a, b| a.position.cmp(&b.position)),
    }
    view
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetPlayers(Vec<Player>),
    FetchFailed(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchPlayers,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetPlayers(players) => {
            let selected_id = state
                .sorted_players()
                .get(state.selected)
                .map(|p| p.id.clone());
            state.players = players;
            state.phase = LoadPhase::Loaded;
            state.loaded_at = Some(SystemTime::now());
            state.restore_selection(selected_id);
        }
        Delta::FetchFailed(message) => {
            state.push_log(format!("[WARN] Player fetch error: {message}"));
            state.phase = LoadPhase::Error(message);
        }
        Delta::Log(line) => state.push_log(line),
    }
}

pub fn sort_label(key: SortKey) -> &'static str {
    match key {
        SortKey::Jersey => "JERSEY",
        SortKey::Name => "NAME",
        SortKey::Position => "POSITION",
    }
}

pub fn sort_key_title(key: SortKey) -> &'static str {
    match key {
        SortKey::Jersey => "Jersey number",
        SortKey::Name => "Full name",
        SortKey::Position => "Position",
    }
}

pub fn sport_label(sport: Option<Sport>) -> &'static str {
    match sport {
        Some(Sport::Football) => "football",
        Some(Sport::Basketball) => "basketball",
        None => "-",
    }
}
