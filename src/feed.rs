use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::players_fetch::{self, SupabaseConfig};
use crate::state::{Delta, ProviderCommand};

/// Background provider: one fetch on startup, then re-fetch only when the UI
/// asks (the retry path). Dropping the command sender ends the loop, so no
/// request is issued after the UI has gone away.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        fetch_and_send(&tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchPlayers => fetch_and_send(&tx),
            }
        }
    });
}

fn fetch_and_send(tx: &Sender<Delta>) {
    let result =
        SupabaseConfig::from_env().and_then(|config| players_fetch::fetch_players(&config));
    match result {
        Ok(players) => {
            let _ = tx.send(Delta::Log(format!("[INFO] Loaded {} players", players.len())));
            let _ = tx.send(Delta::SetPlayers(players));
        }
        Err(err) => {
            let _ = tx.send(Delta::FetchFailed(format!("{err:#}")));
        }
    }
}
