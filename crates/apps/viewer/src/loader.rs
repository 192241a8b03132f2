//! Dataset loading.
//!
//! Geography and every roster source are fetched concurrently; setup waits
//! for all of them. Any failure aborts initialisation.

use std::fmt;
use std::path::PathBuf;

use formats::geojson::{GeoJsonError, RegionFeatures};
use formats::roster::{Roster, RosterError};
use futures_util::future::try_join_all;
use reqwest::Client;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` are URLs; anything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {origin}: {error}")]
    Io {
        origin: String,
        #[source]
        error: std::io::Error,
    },
    #[error("request to {origin} failed: {error}")]
    Http {
        origin: String,
        #[source]
        error: reqwest::Error,
    },
    #[error("{origin} returned HTTP {status}")]
    Status { origin: String, status: u16 },
    #[error("invalid geography in {origin}: {error}")]
    Geography {
        origin: String,
        #[source]
        error: GeoJsonError,
    },
    #[error("invalid roster in {origin}: {error}")]
    Roster {
        origin: String,
        #[source]
        error: RosterError,
    },
}

/// Everything scene construction needs, fully loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub features: RegionFeatures,
    /// All roster sources merged in command-line order.
    pub roster: Roster,
}

#[derive(Debug, Clone, Default)]
pub struct Loader {
    http: Client,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    pub async fn fetch_text(&self, source: &Source) -> Result<String, LoadError> {
        match source {
            Source::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|error| LoadError::Io {
                        origin: source.to_string(),
                        error,
                    })
            }
            Source::Url(url) => {
                let http_err = |error: reqwest::Error| LoadError::Http {
                    origin: url.clone(),
                    error,
                };
                let resp = self.http.get(url).send().await.map_err(http_err)?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        origin: url.clone(),
                        status: status.as_u16(),
                    });
                }
                resp.text().await.map_err(http_err)
            }
        }
    }

    pub async fn load_geography(&self, source: &Source) -> Result<RegionFeatures, LoadError> {
        let payload = self.fetch_text(source).await?;
        let features =
            RegionFeatures::from_geojson_str(&payload).map_err(|error| LoadError::Geography {
                origin: source.to_string(),
                error,
            })?;
        info!(
            source = %source,
            features = features.features.len(),
            skipped = features.skipped,
            "geography loaded"
        );
        Ok(features)
    }

    pub async fn load_roster(&self, source: &Source) -> Result<Roster, LoadError> {
        let payload = self.fetch_text(source).await?;
        let roster = Roster::from_json_str(&payload).map_err(|error| LoadError::Roster {
            origin: source.to_string(),
            error,
        })?;
        info!(source = %source, regions = roster.len(), "roster loaded");
        Ok(roster)
    }

    /// Loads geography and all rosters concurrently, then merges the rosters.
    pub async fn load_all(&self, geo: &Source, rosters: &[Source]) -> Result<Datasets, LoadError> {
        info!(geo = %geo, rosters = rosters.len(), "loading datasets");
        let (features, loaded) = tokio::try_join!(
            self.load_geography(geo),
            try_join_all(rosters.iter().map(|source| self.load_roster(source))),
        )?;
        let roster = Roster::merged(&loaded);
        info!(regions = roster.len(), "datasets ready");
        Ok(Datasets { features, roster })
    }
}
