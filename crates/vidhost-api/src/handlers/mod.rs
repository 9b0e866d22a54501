pub mod health;
pub mod playlists;
pub mod videos;
