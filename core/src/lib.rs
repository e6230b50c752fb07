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

pub mod auth;
pub mod exporter;
pub mod locator;
pub mod models;
pub mod paginate;
pub mod source;
pub mod writer;

#[cfg(test)]
mod testing;

// Re-export key items for convenience
pub use auth::{get_spotify_client, AccessLevel};
pub use exporter::{write_all, ExportError, Exporter};
pub use locator::{parse_playlist_url, LocateStrategy};
pub use models::{Collection, ExportReport};
pub use source::{LibrarySource, SpotifyLibrary};
