//! Integration tests for the in-memory catalog
//!
//! Exercises the mutations that make a playing candidate list stale.

use cadence_core::{Catalog, CoreError, MemoryCatalog, Track, TrackId};
use std::path::PathBuf;

fn library(ids: &[&str]) -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    for id in ids {
        catalog.add_track(Track::new(
            *id,
            format!("Track {}", id),
            PathBuf::from(format!("/music/{}.mp3", id)),
        ));
    }
    catalog
}

fn ids(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn list_tracks_keeps_library_order() {
    let catalog = library(&["c", "a", "b"]);
    assert_eq!(ids(&catalog.list_tracks()), vec!["c", "a", "b"]);
}

#[test]
fn playlist_keeps_its_own_order_and_duplicates() {
    let mut catalog = library(&["a", "b", "c"]);
    let playlist = catalog.create_playlist("Road trip").unwrap();

    catalog.add_track_to_playlist(&playlist, &"c".into()).unwrap();
    catalog.add_track_to_playlist(&playlist, &"a".into()).unwrap();
    catalog.add_track_to_playlist(&playlist, &"c".into()).unwrap();

    let tracks = catalog.playlist_tracks(&playlist).unwrap();
    assert_eq!(ids(&tracks), vec!["c", "a", "c"]);
}

#[test]
fn adding_unknown_track_to_playlist_fails() {
    let mut catalog = library(&["a"]);
    let playlist = catalog.create_playlist("Mix").unwrap();

    let missing = TrackId::new("zzz");
    assert_eq!(
        catalog.add_track_to_playlist(&playlist, &missing),
        Err(CoreError::TrackNotFound(missing))
    );
}

#[test]
fn removing_from_library_cascades_into_playlists() {
    let mut catalog = library(&["a", "b", "c"]);
    let playlist = catalog.create_playlist("Mix").unwrap();
    for id in ["a", "b", "c"] {
        catalog.add_track_to_playlist(&playlist, &id.into()).unwrap();
    }

    catalog.remove_track_from_library(&"b".into()).unwrap();

    assert_eq!(ids(&catalog.list_tracks()), vec!["a", "c"]);
    assert_eq!(
        ids(&catalog.playlist_tracks(&playlist).unwrap()),
        vec!["a", "c"]
    );
}

#[test]
fn remove_track_from_playlist_leaves_library_untouched() {
    let mut catalog = library(&["a", "b"]);
    let playlist = catalog.create_playlist("Mix").unwrap();
    catalog.add_track_to_playlist(&playlist, &"a".into()).unwrap();
    catalog.add_track_to_playlist(&playlist, &"b".into()).unwrap();

    catalog
        .remove_track_from_playlist(&playlist, &"a".into())
        .unwrap();

    assert_eq!(ids(&catalog.playlist_tracks(&playlist).unwrap()), vec!["b"]);
    assert_eq!(catalog.list_tracks().len(), 2);
    assert!(catalog
        .remove_track_from_playlist(&playlist, &"a".into())
        .is_err());
}

#[test]
fn rename_and_delete_playlist() {
    let mut catalog = library(&[]);
    let playlist = catalog.create_playlist("Old").unwrap();

    catalog.rename_playlist(&playlist, "New").unwrap();
    assert_eq!(catalog.playlists()[0].name, "New");

    catalog.delete_playlist(&playlist).unwrap();
    assert!(catalog.playlists().is_empty());
}
