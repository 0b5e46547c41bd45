//! Playlist indexing
//!
//! Turns fetched playlist text into structured entries. Pure and synchronous,
//! safe to call from any task.

pub mod m3u_parser;

pub use m3u_parser::{M3uParser, parse_playlist};

use crate::models::{PlaylistDocument, PlaylistEntry};

/// Index a fetched document with the shared parser
pub fn index_document(document: &PlaylistDocument) -> Vec<PlaylistEntry> {
    parse_playlist(&document.body)
}
