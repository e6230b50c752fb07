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

use rspotify::{prelude::*, scopes, AuthCodeSpotify, Config, Credentials, OAuth};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable overriding where the OAuth token is cached.
pub const TOKEN_CACHE_ENV: &str = "SPOTIFY_TOKEN_CACHE";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to initialize Spotify client: {0}")]
    ClientConfig(String),
    #[error("Spotify authentication failed: {0}")]
    Spotify(#[from] rspotify::ClientError),
}

/// Which permissions the session asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Saved library and private playlists.
    Library,
    /// `Library` plus basic profile read access.
    LibraryAndProfile,
}

impl AccessLevel {
    pub fn scopes(self) -> HashSet<String> {
        // - user-library-read: Liked Songs and saved albums.
        // - playlist-read-private: the user's private playlists.
        // - user-read-private: profile lookup used when matching playlist owners.
        match self {
            AccessLevel::Library => scopes!("user-library-read", "playlist-read-private"),
            AccessLevel::LibraryAndProfile => scopes!(
                "user-library-read",
                "playlist-read-private",
                "user-read-private"
            ),
        }
    }
}

/// Client id and secret, from rspotify's variables or the legacy `SPOTIFY_*` ones.
fn credentials_from_env() -> Result<Credentials, AuthError> {
    if let Some(creds) = Credentials::from_env() {
        return Ok(creds);
    }

    let id = env::var("SPOTIFY_CLIENT").map_err(|_| {
        AuthError::ClientConfig(
            "Missing RSPOTIFY_CLIENT_ID (or SPOTIFY_CLIENT) in the environment".to_string(),
        )
    })?;
    let secret = env::var("SPOTIFY_TOKEN").map_err(|_| {
        AuthError::ClientConfig(
            "Missing RSPOTIFY_CLIENT_SECRET (or SPOTIFY_TOKEN) in the environment".to_string(),
        )
    })?;
    Ok(Credentials::new(&id, &secret))
}

fn oauth_from_env(scopes: HashSet<String>) -> Result<OAuth, AuthError> {
    if let Some(oauth) = OAuth::from_env(scopes.clone()) {
        return Ok(oauth);
    }

    let redirect_uri = env::var("SPOTIFY_REDIRECT").map_err(|_| {
        AuthError::ClientConfig(
            "Missing RSPOTIFY_REDIRECT_URI (or SPOTIFY_REDIRECT) in the environment".to_string(),
        )
    })?;
    Ok(OAuth {
        redirect_uri,
        scopes,
        ..Default::default()
    })
}

/// Initializes and authenticates a Spotify client using the Authorization Code Flow.
///
/// Credentials and the redirect URI come from the environment. A cached token is
/// reused (and refreshed) when present. Otherwise the user is asked, via stdout,
/// to open the authorization URL and paste back the redirect.
pub async fn get_spotify_client(access: AccessLevel) -> Result<AuthCodeSpotify, AuthError> {
    let creds = credentials_from_env()?;
    let oauth = oauth_from_env(access.scopes())?;

    let mut config = Config {
        token_cached: true,
        token_refreshing: true,
        ..Default::default()
    };
    if let Ok(path) = env::var(TOKEN_CACHE_ENV) {
        config.cache_path = PathBuf::from(path);
    }

    let spotify = AuthCodeSpotify::with_config(creds, oauth, config);

    let url = spotify.get_authorize_url(false)?;

    // Reads the token cache first; only prompts when it is missing or unusable.
    spotify.prompt_for_token(&url).await?;

    Ok(spotify)
}
