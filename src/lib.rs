pub mod feed;
pub mod http_client;
pub mod players_fetch;
pub mod state;
