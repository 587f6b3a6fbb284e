//! Model module - catalog access and application state
//!
//! - `fetcher`: single-attempt HTTP GET
//! - `decode`: response bodies to catalog records
//! - `catalog`: typed catalog operations and search cancellation
//! - `images`: artwork loading
//! - `content`: catalog records, ids and screen state
//! - `session`: search session state machine
//! - `types`, `app_model`: terminal UI state

mod types;
mod content;
mod decode;
mod fetcher;
mod catalog;
mod images;
mod session;
mod app_model;

pub use types::{ActiveSection, Artwork, UiState};

pub use content::{
    Album, AlbumId, Artist, ArtistId, ContentState, ImageSize, InlineNotice, Screen, Track, TrackId,
};

pub use decode::DecodeFailure;

pub use fetcher::{Fetcher, HttpFetcher, NetworkFailure};

pub use catalog::{Catalog, CatalogClient, ClientError, DEFAULT_BASE_URL};

pub use images::{ImageLoader, LoadedImage};

pub use session::{Completion, ResultsState, SearchSession, SearchStatus, SearchToken};

pub use app_model::AppModel;

#[cfg(test)]
pub(crate) use catalog::tests::{artists_body, client as gated_client, GatedFetcher};
