//! Catalog records (artists, albums, tracks) and the screen state built from them.
//!
//! Remote field names are mapped onto struct fields with `serde` attributes, one
//! line per field, so adding a field to a record is a one-line change.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
        #[serde(transparent)]
        pub struct $name(NonZeroU64);

        impl $name {
            pub fn new(raw: u64) -> Option<Self> {
                NonZeroU64::new(raw).map(Self)
            }

            pub fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<NonZeroU64>()
                    .map(Self)
                    .map_err(|_| format!("'{}' is not a positive integer id", s))
            }
        }
    };
}

catalog_id!(
    /// Positive artist identifier
    ArtistId
);
catalog_id!(
    /// Positive album identifier
    AlbumId
);
catalog_id!(
    /// Positive track identifier
    TrackId
);

/// Size variant of an artist picture or album cover
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Medium,
    Big,
    Xl,
}

/// An artist from search results
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    #[serde(rename = "picture")]
    pub picture_url: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub picture_small: Option<String>,
    #[serde(default)]
    pub picture_medium: Option<String>,
    #[serde(default)]
    pub picture_big: Option<String>,
    #[serde(default)]
    pub picture_xl: Option<String>,
}

impl Artist {
    /// Picture URL for the requested size, falling back to the canonical picture
    pub fn picture(&self, size: ImageSize) -> &str {
        let variant = match size {
            ImageSize::Small => &self.picture_small,
            ImageSize::Medium => &self.picture_medium,
            ImageSize::Big => &self.picture_big,
            ImageSize::Xl => &self.picture_xl,
        };
        variant.as_deref().unwrap_or(&self.picture_url)
    }
}

/// An album from an artist's discography
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    #[serde(rename = "cover")]
    pub cover_url: String,
    #[serde(default)]
    pub cover_small: Option<String>,
    #[serde(default)]
    pub cover_medium: Option<String>,
    #[serde(default)]
    pub cover_big: Option<String>,
    #[serde(default)]
    pub cover_xl: Option<String>,
    // Descriptive fields below are empty or false when the listing omits them
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub record_type: String,
    #[serde(rename = "explicit_lyrics", default)]
    pub is_explicit: bool,
    #[serde(default)]
    pub link: String,
    #[serde(rename = "tracklist", default)]
    pub tracklist_url: String,
}

impl Album {
    /// Cover URL for the requested size, falling back to the canonical cover
    pub fn cover(&self, size: ImageSize) -> &str {
        let variant = match size {
            ImageSize::Small => &self.cover_small,
            ImageSize::Medium => &self.cover_medium,
            ImageSize::Big => &self.cover_big,
            ImageSize::Xl => &self.cover_xl,
        };
        variant.as_deref().unwrap_or(&self.cover_url)
    }

    /// Year of `release_date`; `None` for placeholder dates such as `0000-00-00`
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }
}

/// A track from an album's tracklist
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
    #[serde(rename = "track_position")]
    pub position: u32,
    #[serde(default)]
    pub disk_number: Option<u32>,
    #[serde(rename = "explicit_lyrics")]
    pub is_explicit: bool,
    /// Taken from the nested `artist` record; may differ from the album's artist
    #[serde(rename = "artist", deserialize_with = "crate::model::decode::nested_name")]
    pub artist_name: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Which screen the main content area is showing
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Screen {
    #[default]
    Search,
    Albums {
        artist: Artist,
        albums: Arc<[Album]>,
    },
    Tracklist {
        artist: Artist,
        album: Album,
        tracks: Arc<[Track]>,
    },
}

impl Screen {
    pub fn title(&self) -> String {
        match self {
            Screen::Search => " Artists ".to_string(),
            Screen::Albums { artist, .. } => format!(" {} ", artist.name),
            Screen::Tracklist { album, .. } => format!(" {} ", album.title),
        }
    }
}

/// Inline state shown in place of pushing an empty or failed screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineNotice {
    NoAlbums { artist: String },
    NoTracks { album: String },
    Failed(String),
}

impl fmt::Display for InlineNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InlineNotice::NoAlbums { artist } => write!(f, "No albums found for {}", artist),
            InlineNotice::NoTracks { album } => write!(f, "No tracks found on {}", album),
            InlineNotice::Failed(message) => write!(f, "Could not load: {}", message),
        }
    }
}

/// State for the main content area
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub view: Screen,
    pub navigation_stack: Vec<Screen>,
    pub is_loading: bool,
    pub notice: Option<InlineNotice>,
}
