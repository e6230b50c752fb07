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

use crate::locator::{locate_playlist, LocateStrategy};
use crate::models::{AlbumEntry, Collection, ExportReport, PlaylistRef, Track};
use crate::paginate::Paginator;
use crate::source::LibrarySource;
use crate::writer::write_collection;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the collection holding the user's saved tracks.
pub const LIKED_SONGS: &str = "Liked Songs";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Spotify API error: {0}")]
    Spotify(#[from] rspotify::ClientError),
    #[error("Unexpected Spotify response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid Spotify ID: {0}")]
    InvalidId(String),
    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Gave up on {label} after {max_pages} pages; the API never signalled the end")]
    PageLimit { label: String, max_pages: u32 },
}

/// Pulls collections out of a library source and writes their index files.
pub struct Exporter<S> {
    source: S,
    paginator: Paginator,
}

impl<S: LibrarySource> Exporter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            paginator: Paginator::default(),
        }
    }

    pub fn with_paginator(mut self, paginator: Paginator) -> Self {
        self.paginator = paginator;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Every saved ("liked") track, as the `Liked_Songs` collection.
    pub async fn liked_songs(&self) -> Result<Collection, ExportError> {
        let source = &self.source;
        let tracks = self
            .paginator
            .collect(
                "liked songs",
                |offset, limit| source.saved_tracks(offset, limit),
                render,
            )
            .await?;

        info!("Fetched {} liked songs", tracks.len());
        Ok(Collection::new(LIKED_SONGS, tracks))
    }

    /// One collection per saved album, in library order.
    pub async fn saved_albums(&self) -> Result<Vec<Collection>, ExportError> {
        let source = &self.source;
        let albums = self
            .paginator
            .collect(
                "saved albums",
                |offset, limit| source.saved_albums(offset, limit),
                Some,
            )
            .await?;

        let mut collections = Vec::with_capacity(albums.len());
        for album in albums {
            collections.push(self.album(album).await?);
        }

        info!("Fetched {} saved albums", collections.len());
        Ok(collections)
    }

    async fn album(&self, album: AlbumEntry) -> Result<Collection, ExportError> {
        if album.tracks.len() as u32 >= album.total_tracks {
            let tracks = album.tracks.iter().map(Track::to_string).collect();
            return Ok(Collection::new(&album.name, tracks));
        }

        // The embedded track page is truncated; fetch the full listing.
        debug!(
            "Album '{}' has {} tracks, {} embedded",
            album.name,
            album.total_tracks,
            album.tracks.len()
        );
        let source = &self.source;
        let album_id = album.id.as_str();
        let artist = album.primary_artist.as_str();
        let tracks = self
            .paginator
            .collect(
                &album.name,
                |offset, limit| source.album_tracks(album_id, offset, limit),
                |track: Option<Track>| track.map(|t| Track::new(t.title, artist).to_string()),
            )
            .await?;

        Ok(Collection::new(&album.name, tracks))
    }

    /// One collection per playlist in the user's listing.
    ///
    /// With `owned_only`, playlists the user merely follows are skipped.
    pub async fn playlists(&self, owned_only: bool) -> Result<Vec<Collection>, ExportError> {
        let source = &self.source;
        let mut playlists = self
            .paginator
            .collect(
                "playlists",
                |offset, limit| source.user_playlists(offset, limit),
                |entry: Option<PlaylistRef>| entry,
            )
            .await?;

        if owned_only {
            let user_id = source.current_user_id().await?;
            playlists.retain(|p| p.owner_id == user_id);
        }

        let mut collections = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            let collection = self.playlist(&playlist.id, &playlist.name).await?;
            info!(
                "Fetched {} tracks from playlist: {}",
                collection.len(),
                collection.name
            );
            collections.push(collection);
        }

        Ok(collections)
    }

    /// A single playlist by id, stored under `name`.
    pub async fn playlist(&self, playlist_id: &str, name: &str) -> Result<Collection, ExportError> {
        let source = &self.source;
        let tracks = self
            .paginator
            .collect(
                name,
                |offset, limit| source.playlist_tracks(playlist_id, offset, limit),
                render,
            )
            .await?;

        Ok(Collection::new(name, tracks))
    }

    /// A recommendation playlist located by name, or `None` when nothing matches.
    pub async fn find_recommendation(
        &self,
        name: &str,
        strategy: &LocateStrategy,
    ) -> Result<Option<Collection>, ExportError> {
        match locate_playlist(&self.source, &self.paginator, name, strategy).await? {
            Some(found) => Ok(Some(self.playlist(&found.id, &found.name).await?)),
            None => Ok(None),
        }
    }

    /// Like `find_recommendation`, but a missing playlist comes back as an empty collection.
    pub async fn recommendation(
        &self,
        name: &str,
        strategy: &LocateStrategy,
    ) -> Result<Collection, ExportError> {
        let found = self.find_recommendation(name, strategy).await?;
        Ok(found.unwrap_or_else(|| {
            warn!("Playlist '{}' not found, exporting it as empty", name);
            Collection::empty(name)
        }))
    }
}

fn render(track: Option<Track>) -> Option<String> {
    track.map(|t| t.to_string())
}

/// Writes every collection under `base_dir`, in order.
pub fn write_all(base_dir: &Path, collections: &[Collection]) -> Result<ExportReport, ExportError> {
    let mut report = ExportReport::new(base_dir);
    for collection in collections {
        report.add(write_collection(base_dir, collection)?);
    }
    Ok(report)
}
