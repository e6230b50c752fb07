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

use crate::exporter::ExportError;
use crate::models::{AlbumEntry, PlaylistRef, Track};
use async_trait::async_trait;
use rspotify::{
    http::Query,
    model::{
        AlbumId, FullAlbum, FullTrack, Market, PlayableItem, PlaylistId, PlaylistItem,
        SimplifiedPlaylist, SimplifiedTrack,
    },
    prelude::*,
    AuthCodeSpotify,
};
use serde::Deserialize;

/// Playlist listings can hold `null` entries, which rspotify's typed endpoints reject.
type RawPlaylistPage = rspotify::model::Page<Option<SimplifiedPlaylist>>;

#[derive(Deserialize)]
struct RawPlaylistSearch {
    playlists: RawPlaylistPage,
}

/// One page of a paginated resource together with the total the server reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u32,
}

impl<T> Page<T> {
    fn map_from<S>(page: rspotify::model::Page<S>, f: impl FnMut(S) -> T) -> Self {
        Self {
            total: page.total,
            items: page.items.into_iter().map(f).collect(),
        }
    }
}

/// The library endpoints the exporter reads from.
///
/// Pages yield `None` for entries that no longer reference a track or playlist.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    async fn saved_tracks(&self, offset: u32, limit: u32)
        -> Result<Page<Option<Track>>, ExportError>;

    async fn saved_albums(&self, offset: u32, limit: u32) -> Result<Page<AlbumEntry>, ExportError>;

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError>;

    async fn user_playlists(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<PlaylistRef>>, ExportError>;

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError>;

    async fn search_playlists(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<PlaylistRef>>, ExportError>;

    async fn current_user_id(&self) -> Result<String, ExportError>;
}

/// `LibrarySource` backed by an authenticated rspotify client.
pub struct SpotifyLibrary {
    spotify: AuthCodeSpotify,
}

impl SpotifyLibrary {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        Self { spotify }
    }
}

#[async_trait]
impl LibrarySource for SpotifyLibrary {
    async fn saved_tracks(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError> {
        let page = self
            .spotify
            .current_user_saved_tracks_manual(None, Some(limit), Some(offset))
            .await?;
        Ok(Page::map_from(page, |saved| Some(full_track(&saved.track))))
    }

    async fn saved_albums(&self, offset: u32, limit: u32) -> Result<Page<AlbumEntry>, ExportError> {
        let page = self
            .spotify
            .current_user_saved_albums_manual(None, Some(limit), Some(offset))
            .await?;
        Ok(Page::map_from(page, |saved| album_entry(saved.album)))
    }

    async fn album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError> {
        let id = AlbumId::from_id(album_id)
            .map_err(|_| ExportError::InvalidId(album_id.to_string()))?;
        let page = self
            .spotify
            .album_track_manual(id, None, Some(limit), Some(offset))
            .await?;
        Ok(Page::map_from(page, |track| Some(simplified_track(&track))))
    }

    async fn user_playlists(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<PlaylistRef>>, ExportError> {
        let (limit, offset) = (limit.to_string(), offset.to_string());
        let params = Query::from([("limit", limit.as_str()), ("offset", offset.as_str())]);
        let raw = self.spotify.api_get("me/playlists", &params).await?;
        parse_playlist_page(&raw)
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<Track>>, ExportError> {
        let id = PlaylistId::from_id(playlist_id)
            .map_err(|_| ExportError::InvalidId(playlist_id.to_string()))?;
        let page = self
            .spotify
            .playlist_items_manual(
                id,
                None,
                Some(Market::FromToken),
                Some(limit),
                Some(offset),
            )
            .await?;
        Ok(Page::map_from(page, playlist_item))
    }

    async fn search_playlists(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Option<PlaylistRef>>, ExportError> {
        let (limit, offset) = (limit.to_string(), offset.to_string());
        let params = Query::from([
            ("q", query),
            ("type", "playlist"),
            ("limit", limit.as_str()),
            ("offset", offset.as_str()),
        ]);
        let raw = self.spotify.api_get("search", &params).await?;
        parse_playlist_search(&raw)
    }

    async fn current_user_id(&self) -> Result<String, ExportError> {
        let user = self.spotify.current_user().await?;
        Ok(user.id.id().to_string())
    }
}

/// Deleted tracks (`null`) and podcast episodes map to `None`.
fn playlist_item(item: PlaylistItem) -> Option<Track> {
    match item.track {
        Some(PlayableItem::Track(track)) => Some(full_track(&track)),
        _ => None,
    }
}

fn full_track(track: &FullTrack) -> Track {
    Track::from_artists(
        track.name.as_str(),
        track.artists.iter().map(|a| a.name.as_str()),
    )
}

fn simplified_track(track: &SimplifiedTrack) -> Track {
    Track::from_artists(
        track.name.as_str(),
        track.artists.iter().map(|a| a.name.as_str()),
    )
}

// Album tracks are credited to the album's primary artist, not the track's.
fn album_entry(album: FullAlbum) -> AlbumEntry {
    let primary_artist = album
        .artists
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_default();
    let tracks = album
        .tracks
        .items
        .iter()
        .map(|track| Track::new(track.name.as_str(), primary_artist.as_str()))
        .collect();

    AlbumEntry {
        id: album.id.id().to_string(),
        name: album.name,
        primary_artist,
        tracks,
        total_tracks: album.tracks.total,
    }
}

// Null entries stay in the page as `None` so a full page still reads as full.
fn playlists_from_raw(page: RawPlaylistPage) -> Page<Option<PlaylistRef>> {
    Page::map_from(page, |playlist| playlist.map(playlist_ref))
}

fn parse_playlist_page(raw: &str) -> Result<Page<Option<PlaylistRef>>, ExportError> {
    let page: RawPlaylistPage = serde_json::from_str(raw)?;
    Ok(playlists_from_raw(page))
}

fn parse_playlist_search(raw: &str) -> Result<Page<Option<PlaylistRef>>, ExportError> {
    let search: RawPlaylistSearch = serde_json::from_str(raw)?;
    Ok(playlists_from_raw(search.playlists))
}

fn playlist_ref(playlist: SimplifiedPlaylist) -> PlaylistRef {
    PlaylistRef {
        id: playlist.id.id().to_string(),
        name: playlist.name,
        owner_id: playlist.owner.id.id().to_string(),
    }
}
