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
use crate::models::{Collection, CollectionReport};
use log::debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of every collection index.
pub const INDEX_FILE: &str = "index.txt";

/// Writes `lines` to `base_dir/relative`, one per line, replacing any previous file.
///
/// Missing directories along the way are created. The write is not atomic.
pub fn write_index<P: AsRef<Path>>(
    base_dir: &Path,
    relative: P,
    lines: &[String],
) -> Result<PathBuf, ExportError> {
    let path = base_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let io_err = |source| ExportError::Io {
        path: path.clone(),
        source,
    };
    let file = File::create(&path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;

    debug!("Wrote {} lines to {}", lines.len(), path.display());
    Ok(path)
}

/// Writes a collection to `base_dir/<name>/index.txt`.
pub fn write_collection(
    base_dir: &Path,
    collection: &Collection,
) -> Result<CollectionReport, ExportError> {
    let relative = Path::new(&collection.name).join(INDEX_FILE);
    let path = write_index(base_dir, relative, &collection.tracks)?;

    Ok(CollectionReport {
        name: collection.name.clone(),
        tracks: collection.len(),
        path,
    })
}
