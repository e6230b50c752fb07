/*
    spotify-export-rs | Rust CLI tool to export your Spotify library to text indexes.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

//! In-memory `LibrarySource` used by the unit tests.

use crate::exporter::ExportError;
use crate::models::{AlbumEntry, PlaylistRef, Track};
use crate::source::{LibrarySource, Page};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeLibrary {
    user_id: String,
    saved_tracks: Vec<Option<Track>>,
    albums: Vec<AlbumEntry>,
    album_tracks: HashMap<String, Vec<Option<Track>>>,
    playlists: Vec<Option<PlaylistRef>>,
    playlist_tracks: HashMap<String, Vec<Option<Track>>>,
    search_results: Vec<Option<PlaylistRef>>,
    failing: Option<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl FakeLibrary {
    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = user_id.to_string();
        self
    }

    pub fn with_saved_tracks(mut self, tracks: Vec<Option<Track>>) -> Self {
        self.saved_tracks = tracks;
        self
    }

    pub fn with_albums(mut self, albums: Vec<AlbumEntry>) -> Self {
        self.albums = albums;
        self
    }

    pub fn with_album_tracks(mut self, album_id: &str, tracks: Vec<Option<Track>>) -> Self {
        self.album_tracks.insert(album_id.to_string(), tracks);
        self
    }

    pub fn with_playlists(mut self, playlists: Vec<PlaylistRef>) -> Self {
        self.playlists = playlists.into_iter().map(Some).collect();
        self
    }

    /// Playlist listing that may contain removed (`None`) entries.
    pub fn with_playlist_entries(mut self, playlists: Vec<Option<PlaylistRef>>) -> Self {
        self.playlists = playlists;
        self
    }

    pub fn with_playlist_tracks(mut self, playlist_id: &str, tracks: Vec<Option<Track>>) -> Self {
        self.playlist_tracks.insert(playlist_id.to_string(), tracks);
        self
    }

    pub fn with_search_results(mut self, playlists: Vec<PlaylistRef>) -> Self {
        self.search_results = playlists.into_iter().map(Some).collect();
        self
    }

    /// Makes every call to the named endpoint fail.
    pub fn failing_on(mut self, endpoint: &'static str) -> Self {
        self.failing = Some(endpoint);
        self
    }

    /// Calls received so far, as `endpoint[:key]:offset:limit`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String, endpoint: &str) -> Result<(), ExportError> {
        self.calls.lock().unwrap().push(call);
        if self.failing == Some(endpoint) {
            return Err(ExportError::InvalidId(endpoint.to_string()));
        }
        Ok(())
    }
}

fn slice<T: Clone>(items: &[T], offset: u32, limit: u32) -> Page<T> {
    let start = (offset as usize).min(items.len());
    let end = (start + limit as usize).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        total: items.len() as u32,
    }
}

#[async_trait]
impl LibrarySource for FakeLibrary {
    async fn saved_tracks(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError> {
        self.record(format!("saved_tracks:{}:{}", offset, limit), "saved_tracks")?;
        Ok(slice(&self.saved_tracks, offset, limit))
    }

    async fn saved_albums(&self, offset: u32, limit: u32) -> Result<Page<AlbumEntry>, ExportError> {
        self.record(format!("saved_albums:{}:{}", offset, limit), "saved_albums")?;
        Ok(slice(&self.albums, offset, limit))
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError> {
        self.record(
            format!("album_tracks:{}:{}:{}", album_id, offset, limit),
            "album_tracks",
        )?;
        let tracks = self.album_tracks.get(album_id).cloned().unwrap_or_default();
        Ok(slice(&tracks, offset, limit))
    }

    async fn user_playlists(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<PlaylistRef>>, ExportError> {
        self.record(format!("user_playlists:{}:{}", offset, limit), "user_playlists")?;
        Ok(slice(&self.playlists, offset, limit))
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError> {
        self.record(
            format!("playlist_tracks:{}:{}:{}", playlist_id, offset, limit),
            "playlist_tracks",
        )?;
        let tracks = self
            .playlist_tracks
            .get(playlist_id)
            .cloned()
            .unwrap_or_default();
        Ok(slice(&tracks, offset, limit))
    }

    async fn search_playlists(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<PlaylistRef>>, ExportError> {
        self.record(
            format!("search:{}:{}:{}", query, offset, limit),
            "search_playlists",
        )?;
        Ok(slice(&self.search_results, offset, limit))
    }

    async fn current_user_id(&self) -> Result<String, ExportError> {
        self.record("current_user_id".to_string(), "current_user_id")?;
        Ok(self.user_id.clone())
    }
}
