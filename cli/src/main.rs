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

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use export_core::{
    get_spotify_client, locator::DEFAULT_OWNER, parse_playlist_url, write_all, AccessLevel,
    Collection, ExportReport, Exporter, LocateStrategy, SpotifyLibrary,
};
use log::warn;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

const PLAYLISTS_DIR: &str = "./playlists";
const ALBUMS_DIR: &str = "./albums";
const RADAR_DIR: &str = "./radar";

#[derive(Parser)]
#[command(name = "spotify-export")]
#[command(about = "Exports your Spotify library into plain-text index files", long_about = None)]
struct Cli {
    /// Base directory for the index files (defaults depend on the command)
    #[arg(long, global = true, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Also write a JSON summary of the export (e.g., --json=report.json)
    #[arg(long, global = true)]
    json: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exports playlists and Liked Songs into ./playlists and saved albums into ./albums
    Init {
        /// Skip playlists you follow but do not own
        #[arg(long)]
        owned_only: bool,
    },
    /// Exports every playlist and Liked Songs into ./playlists
    Playlists {
        /// Skip playlists you follow but do not own
        #[arg(long)]
        owned_only: bool,
    },
    /// Exports Liked Songs into ./playlists/Liked_Songs
    Liked,
    /// Exports saved albums into ./albums
    Albums,
    /// Exports recommendation playlists (e.g. Release Radar) into ./radar
    Radar {
        /// Playlist links to export, comma separated when read from SPOTIFY_RADAR
        #[arg(
            long = "url",
            value_name = "URL",
            env = "SPOTIFY_RADAR",
            value_delimiter = ','
        )]
        urls: Vec<String>,

        /// Locate a playlist by its exact name instead of by link
        #[arg(long)]
        name: Option<String>,

        /// Find the named playlist through search rather than your own playlists
        #[arg(long)]
        search: bool,

        /// Owner id a searched playlist must have
        #[arg(long, default_value = DEFAULT_OWNER)]
        owner: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if dotenv().is_err() {
        // Silently ignore
    }

    let cli = Cli::parse();
    let out = cli.out.as_deref();

    let result = match cli.command {
        Commands::Init { owned_only } => handle_init(out, owned_only).await,
        Commands::Playlists { owned_only } => handle_playlists(out, owned_only).await,
        Commands::Liked => handle_liked(out).await,
        Commands::Albums => handle_albums(out).await,
        Commands::Radar {
            urls,
            name,
            search,
            owner,
        } => {
            let strategy = if search {
                LocateStrategy::Search { owner }
            } else {
                LocateStrategy::OwnPlaylists
            };
            handle_radar(out, &urls, name.as_deref(), strategy).await
        }
    };

    match result {
        Ok(report) => {
            print_summary(&report);
            if let Some(path) = cli.json.as_deref() {
                if let Err(e) = save_report(&report, path) {
                    eprintln!("[ERROR] {:#}", e);
                    process::exit(1);
                }
                println!();
                println!("[SAVED] Report saved to: {}", path);
            }
        }
        Err(e) => {
            eprintln!();
            eprintln!("[ERROR] Export failed: {:#}", e);
            process::exit(1);
        }
    }
}

async fn get_exporter(access: AccessLevel) -> Exporter<SpotifyLibrary> {
    let spotify = match get_spotify_client(access).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error initializing Spotify client: {}", e);
            process::exit(1);
        }
    };
    Exporter::new(SpotifyLibrary::new(spotify))
}

fn base_dir<'a>(out: Option<&'a Path>, default: &'a str) -> &'a Path {
    out.unwrap_or_else(|| Path::new(default))
}

async fn handle_init(out: Option<&Path>, owned_only: bool) -> anyhow::Result<ExportReport> {
    let exporter = get_exporter(AccessLevel::Library).await;

    let playlists = fetch_playlists(&exporter, owned_only).await?;
    let liked = fetch_liked(&exporter).await?;
    let albums = fetch_albums(&exporter).await?;

    // With --out, both trees share the same base directory. Without it the
    // merged report has no single base_dir.
    println!("Saving index of all playlists");
    let mut report = write_all(
        base_dir(out, PLAYLISTS_DIR),
        &[playlists, vec![liked]].concat(),
    )?;
    println!("Saving index of all albums");
    report.merge(write_all(base_dir(out, ALBUMS_DIR), &albums)?);

    Ok(report)
}

async fn handle_playlists(out: Option<&Path>, owned_only: bool) -> anyhow::Result<ExportReport> {
    let exporter = get_exporter(AccessLevel::Library).await;

    let mut collections = fetch_playlists(&exporter, owned_only).await?;
    collections.push(fetch_liked(&exporter).await?);

    println!("Saving index of all playlists");
    Ok(write_all(base_dir(out, PLAYLISTS_DIR), &collections)?)
}

async fn handle_liked(out: Option<&Path>) -> anyhow::Result<ExportReport> {
    let exporter = get_exporter(AccessLevel::Library).await;
    let liked = fetch_liked(&exporter).await?;

    Ok(write_all(base_dir(out, PLAYLISTS_DIR), &[liked])?)
}

async fn handle_albums(out: Option<&Path>) -> anyhow::Result<ExportReport> {
    let exporter = get_exporter(AccessLevel::Library).await;
    let albums = fetch_albums(&exporter).await?;

    println!("Saving index of all albums");
    Ok(write_all(base_dir(out, ALBUMS_DIR), &albums)?)
}

async fn handle_radar(
    out: Option<&Path>,
    urls: &[String],
    name: Option<&str>,
    strategy: LocateStrategy,
) -> anyhow::Result<ExportReport> {
    if urls.is_empty() && name.is_none() {
        anyhow::bail!("no radar playlists given: pass --url, set SPOTIFY_RADAR, or use --name");
    }
    if name.is_none() && matches!(strategy, LocateStrategy::Search { .. }) {
        anyhow::bail!("--search needs --name");
    }

    let exporter = get_exporter(AccessLevel::LibraryAndProfile).await;
    let base = base_dir(out, RADAR_DIR);
    let mut report = ExportReport::new(base);

    for url in urls {
        let Some(playlist_id) = parse_playlist_url(url) else {
            warn!("Skipping '{}': not a playlist link", url.trim());
            continue;
        };
        println!("Fetching tracks from playlist: {}", url.trim());
        let collection = exporter.playlist(&playlist_id, &playlist_id).await?;
        report.merge(write_all(base, std::slice::from_ref(&collection))?);
        println!(
            "Saved {} tracks from playlist {}",
            collection.len(),
            playlist_id
        );
    }

    if let Some(name) = name {
        println!("Looking for playlist: {}", name);
        let found = exporter
            .find_recommendation(name, &strategy)
            .await
            .with_context(|| format!("failed to export '{}'", name))?;
        let collection = found.unwrap_or_else(|| {
            println!("[NOT FOUND] No playlist named '{}'", name);
            Collection::empty(name)
        });
        report.merge(write_all(base, std::slice::from_ref(&collection))?);
        println!("Saved {} tracks from playlist {}", collection.len(), name);
    }

    println!("All specified playlists have been processed and saved.");
    Ok(report)
}

async fn fetch_playlists(
    exporter: &Exporter<SpotifyLibrary>,
    owned_only: bool,
) -> anyhow::Result<Vec<Collection>> {
    println!(
        "Fetching all {} playlists",
        if owned_only { "owned" } else { "usermade" }
    );
    let playlists = exporter.playlists(owned_only).await?;
    for playlist in &playlists {
        println!(
            "    Fetched {} tracks from playlist: {}",
            playlist.len(),
            playlist.name
        );
    }
    Ok(playlists)
}

async fn fetch_liked(exporter: &Exporter<SpotifyLibrary>) -> anyhow::Result<Collection> {
    println!("Fetching all liked songs");
    let liked = exporter.liked_songs().await?;
    println!("Total liked songs fetched: {}", liked.len());
    Ok(liked)
}

async fn fetch_albums(exporter: &Exporter<SpotifyLibrary>) -> anyhow::Result<Vec<Collection>> {
    println!("Fetching all liked albums");
    let albums = exporter.saved_albums().await?;
    println!("Total albums fetched: {}", albums.len());
    Ok(albums)
}

fn print_summary(report: &ExportReport) {
    println!();
    println!("---------------------------------------------------");
    println!("EXPORT COMPLETE");
    println!("---------------------------------------------------");
    if let Some(base) = &report.base_dir {
        println!("Output Directory:     {}", base.display());
    }
    println!("Collections Written:  {}", report.collections.len());
    println!("Total Tracks:         {}", report.total_tracks());
    println!("---------------------------------------------------");
}

fn save_report(report: &ExportReport, path: &str) -> anyhow::Result<()> {
    let json_content = serde_json::to_string_pretty(report)?;
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file '{}'", path))?;
    file.write_all(json_content.as_bytes())
        .with_context(|| format!("Failed to write report to '{}'", path))?;
    Ok(())
}
