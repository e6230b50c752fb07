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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single exported entry: the track title and its primary (first listed) artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub primary_artist: String,
}

impl Track {
    pub fn new(title: impl Into<String>, primary_artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            primary_artist: primary_artist.into(),
        }
    }

    /// Builds a track from its artist list, keeping only the first artist.
    pub fn from_artists<'a, I>(title: impl Into<String>, artists: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let primary_artist = artists.into_iter().next().unwrap_or_default();
        Self::new(title, primary_artist)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.primary_artist)
    }
}

/// Turns a playlist or album title into the directory name used on disk.
///
/// Only spaces are replaced. Path separators and reserved characters are kept as-is.
pub fn collection_name(raw: &str) -> String {
    raw.replace(' ', "_")
}

/// A named, ordered list of rendered track lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub tracks: Vec<String>,
}

impl Collection {
    pub fn new(raw_name: &str, tracks: Vec<String>) -> Self {
        Self {
            name: collection_name(raw_name),
            tracks,
        }
    }

    pub fn empty(raw_name: &str) -> Self {
        Self::new(raw_name, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Minimal view of a playlist, enough to locate and fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

/// A saved album with the first page of its tracks already embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    pub id: String,
    pub name: String,
    pub primary_artist: String,
    pub tracks: Vec<Track>,
    pub total_tracks: u32,
}

/// One written index file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub name: String,
    pub tracks: usize,
    pub path: PathBuf,
}

/// Summary of an export run, optionally saved as JSON.
///
/// `base_dir` is `None` once collections from different roots are merged;
/// each `CollectionReport::path` stays exact either way.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExportReport {
    pub base_dir: Option<PathBuf>,
    pub collections: Vec<CollectionReport>,
}

impl ExportReport {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            collections: Vec::new(),
        }
    }

    pub fn add(&mut self, report: CollectionReport) {
        self.collections.push(report);
    }

    pub fn merge(&mut self, other: ExportReport) {
        if self.base_dir != other.base_dir {
            self.base_dir = None;
        }
        self.collections.extend(other.collections);
    }

    pub fn total_tracks(&self) -> usize {
        self.collections.iter().map(|c| c.tracks).sum()
    }
}
