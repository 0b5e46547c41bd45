//! Playlist sources
//!
//! Retrieval of remote playlists. The fetcher knows nothing about the
//! playlist format; indexing lives in [`crate::ingestor`].

pub mod fetcher;

pub use fetcher::PlaylistFetcher;
