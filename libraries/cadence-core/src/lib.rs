//! Cadence Core
//!
//! Track identity and catalog contract shared by the Cadence player crates.
//!
//! This crate provides:
//! - **Domain Types**: `Track`, `TrackId`, `PlaylistId`, `Playlist`
//! - **Catalog**: the `Catalog` trait the playback layer consumes, plus an
//!   in-memory implementation
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Catalog, MemoryCatalog, Track};
//! use std::path::PathBuf;
//!
//! let mut catalog = MemoryCatalog::new();
//! catalog.add_track(Track::new("a", "Intro", PathBuf::from("/music/intro.mp3")));
//!
//! let playlist = catalog.create_playlist("Favourites").unwrap();
//! catalog.add_track_to_playlist(&playlist, &"a".into()).unwrap();
//!
//! assert_eq!(catalog.list_tracks().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::{Catalog, MemoryCatalog};
pub use error::{CoreError, Result};
pub use types::{Playlist, PlaylistId, Track, TrackId};
