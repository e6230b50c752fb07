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
use crate::models::PlaylistRef;
use crate::paginate::Paginator;
use crate::source::LibrarySource;
use log::debug;

/// Owner id of the editorial playlists Spotify generates for each user.
pub const DEFAULT_OWNER: &str = "spotify";
/// Pages of search results inspected before giving up.
pub const SEARCH_PAGES: u32 = 1;

const PLAYLIST_URL_PREFIX: &str = "https://open.spotify.com/playlist/";

/// How a recommendation playlist is found by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocateStrategy {
    /// Exact name match among the user's own playlist listing.
    #[default]
    OwnPlaylists,
    /// Keyword search, keeping the exact name match owned by `owner`.
    Search { owner: String },
}

pub async fn locate_playlist<S: LibrarySource + ?Sized>(
    source: &S,
    paginator: &Paginator,
    name: &str,
    strategy: &LocateStrategy,
) -> Result<Option<PlaylistRef>, ExportError> {
    match strategy {
        LocateStrategy::OwnPlaylists => {
            debug!("Looking for '{}' among the user's playlists", name);
            let found = paginator
                .find_first(
                    name,
                    |offset, limit| source.user_playlists(offset, limit),
                    |entry: &Option<PlaylistRef>| {
                        entry.as_ref().is_some_and(|p| p.name == name)
                    },
                )
                .await?;
            Ok(found.flatten())
        }
        LocateStrategy::Search { owner } => {
            debug!("Searching for '{}' owned by '{}'", name, owner);
            let found = paginator
                .with_max_pages(SEARCH_PAGES)
                .find_first(
                    name,
                    |offset, limit| source.search_playlists(name, offset, limit),
                    |entry: &Option<PlaylistRef>| {
                        entry
                            .as_ref()
                            .is_some_and(|p| p.name == name && p.owner_id == *owner)
                    },
                )
                .await?;
            Ok(found.flatten())
        }
    }
}

/// Extracts the playlist id from an `open.spotify.com` playlist link.
pub fn parse_playlist_url(url: &str) -> Option<String> {
    let rest = url.trim().strip_prefix(PLAYLIST_URL_PREFIX)?;
    let id = rest
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default();

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
