//! Typed catalog operations: URL construction, one fetch, one decode.
//!
//! Artist search fires on every keystroke, so the client keeps an abort handle
//! for every outstanding search. A newer search started with `cancel_previous`
//! aborts all of them, and `cancel_search` aborts whatever is still running.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::future::{AbortHandle, Abortable, Aborted};
use reqwest::Url;
use thiserror::Error;

use super::content::{Album, AlbumId, Artist, ArtistId, Track, TrackId};
use super::decode::{self, DecodeFailure};
use super::fetcher::{Fetcher, HttpFetcher, NetworkFailure};

pub const DEFAULT_BASE_URL: &str = "https://api.deezer.com";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Network(#[from] NetworkFailure),

    #[error(transparent)]
    Decode(#[from] DecodeFailure),

    /// Superseded by a newer request; never shown to the user
    #[error("request was cancelled")]
    Cancelled,
}

/// Operations the search controller and navigation flow depend on
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Search artists by name. With `cancel_previous` every search still
    /// outstanding resolves with [`ClientError::Cancelled`].
    async fn search_artists(&self, query: &str, cancel_previous: bool) -> Result<Vec<Artist>, ClientError>;

    /// Cancel every outstanding search without starting a new one
    async fn cancel_search(&self);

    async fn list_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>, ClientError>;

    async fn list_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>, ClientError>;
}

struct InflightSearch {
    id: u64,
    handle: AbortHandle,
}

/// Searches that have started and not yet finished, oldest first
#[derive(Default)]
struct SearchRegistry {
    next_id: u64,
    inflight: Vec<InflightSearch>,
}

impl SearchRegistry {
    /// Ids are handed out under the lock, so a larger id is always the later
    /// registration and `cancel_previous` only ever reaches older searches.
    fn register(&mut self, handle: AbortHandle, cancel_previous: bool) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        if cancel_previous {
            for previous in self.inflight.drain(..) {
                tracing::debug!(superseded = previous.id, by = id, "Cancelling previous search");
                previous.handle.abort();
            }
        }
        self.inflight.push(InflightSearch { id, handle });
        id
    }

    fn cancel_all(&mut self) {
        for previous in self.inflight.drain(..) {
            tracing::debug!(search = previous.id, "Cancelling outstanding search");
            previous.handle.abort();
        }
    }
}

/// Drops the search from the registry when it finishes or its future is dropped
struct Registration<'a> {
    registry: &'a Mutex<SearchRegistry>,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.inflight.retain(|inflight| inflight.id != self.id);
    }
}

pub struct CatalogClient<F = HttpFetcher> {
    base_url: Url,
    fetcher: F,
    searches: Mutex<SearchRegistry>,
}

impl<F: Fetcher> CatalogClient<F> {
    /// `base_url` must be an absolute http(s) URL; see `config::parse_base_url`
    pub fn new(base_url: Url, fetcher: F) -> Self {
        assert!(
            !base_url.cannot_be_a_base(),
            "catalog base URL must be hierarchical: {}",
            base_url
        );
        Self {
            base_url,
            fetcher,
            searches: Mutex::new(SearchRegistry::default()),
        }
    }

    // The registry is left consistent at every unlock, so a poisoned lock is still usable
    fn registry(&self) -> MutexGuard<'_, SearchRegistry> {
        self.searches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .expect("base URL validated in CatalogClient::new")
            .pop_if_empty()
            .extend(segments);
        url
    }

    pub(crate) fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint(&["search", "artist"]);
        url.query_pairs_mut().append_pair("q", query);
        url
    }

    pub(crate) fn albums_url(&self, artist_id: ArtistId) -> Url {
        self.endpoint(&["artist", &artist_id.to_string(), "albums"])
    }

    pub(crate) fn tracks_url(&self, album_id: AlbumId) -> Url {
        self.endpoint(&["album", &album_id.to_string(), "tracks"])
    }

    /// One fetch, then the record kind's own decoder
    async fn fetch_decoded<T>(
        &self,
        url: Url,
        decode: fn(&[u8]) -> Result<T, DecodeFailure>,
    ) -> Result<T, ClientError> {
        let bytes = self.fetcher.fetch(&url).await?;
        Ok(decode(&bytes)?)
    }

    pub async fn artist(&self, artist_id: ArtistId) -> Result<Artist, ClientError> {
        crate::log_api_request!("artist", artist_id = %artist_id);
        let url = self.endpoint(&["artist", &artist_id.to_string()]);
        let result = self.fetch_decoded(url, decode::decode_artist).await;
        crate::log_api_result!("artist", result);
        result
    }

    pub async fn album(&self, album_id: AlbumId) -> Result<Album, ClientError> {
        crate::log_api_request!("album", album_id = %album_id);
        let url = self.endpoint(&["album", &album_id.to_string()]);
        let result = self.fetch_decoded(url, decode::decode_album).await;
        crate::log_api_result!("album", result);
        result
    }

    pub async fn track(&self, track_id: TrackId) -> Result<Track, ClientError> {
        crate::log_api_request!("track", track_id = %track_id);
        let url = self.endpoint(&["track", &track_id.to_string()]);
        let result = self.fetch_decoded(url, decode::decode_track).await;
        crate::log_api_result!("track", result);
        result
    }
}

#[async_trait]
impl<F: Fetcher> Catalog for CatalogClient<F> {
    async fn search_artists(&self, query: &str, cancel_previous: bool) -> Result<Vec<Artist>, ClientError> {
        crate::log_api_request!("search_artists", query = %query, cancel_previous);
        let url = self.search_url(query);
        let (handle, abort_registration) = AbortHandle::new_pair();
        let id = self.registry().register(handle, cancel_previous);
        let _registration = Registration {
            registry: &self.searches,
            id,
        };

        let search = self.fetch_decoded(url, decode::decode_artists);
        match Abortable::new(search, abort_registration).await {
            Ok(result) => {
                crate::log_api_result!("search_artists", result);
                result
            }
            Err(Aborted) => {
                tracing::debug!(query = %query, search = id, "Search cancelled before completion");
                Err(ClientError::Cancelled)
            }
        }
    }

    async fn cancel_search(&self) {
        self.registry().cancel_all();
    }

    async fn list_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>, ClientError> {
        crate::log_api_request!("list_albums", artist_id = %artist_id);
        let result = self.fetch_decoded(self.albums_url(artist_id), decode::decode_albums).await;
        crate::log_api_result!("list_albums", result);
        result
    }

    async fn list_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>, ClientError> {
        crate::log_api_request!("list_tracks", album_id = %album_id);
        let result = self.fetch_decoded(self.tracks_url(album_id), decode::decode_tracklist).await;
        crate::log_api_result!("list_tracks", result);
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::oneshot;

    /// Fetcher whose responses are released by the test, keyed by URL
    #[derive(Clone, Default)]
    pub(crate) struct GatedFetcher {
        gates: Arc<StdMutex<HashMap<String, oneshot::Receiver<Result<Vec<u8>, NetworkFailure>>>>>,
        requested: Arc<StdMutex<Vec<String>>>,
    }

    impl GatedFetcher {
        pub(crate) fn gate(&self, url: &Url) -> oneshot::Sender<Result<Vec<u8>, NetworkFailure>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(url.to_string(), rx);
            tx
        }

        pub(crate) fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for GatedFetcher {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>, NetworkFailure> {
            self.requested.lock().unwrap().push(url.to_string());
            let gate = self.gates.lock().unwrap().remove(url.as_str());
            match gate {
                Some(rx) => rx.await.unwrap_or(Err(NetworkFailure::NoData)),
                None => Err(NetworkFailure::Transport("no route".to_string())),
            }
        }
    }

    pub(crate) fn client(fetcher: GatedFetcher) -> Arc<CatalogClient<GatedFetcher>> {
        Arc::new(CatalogClient::new(Url::parse(DEFAULT_BASE_URL).unwrap(), fetcher))
    }

    pub(crate) fn artists_body(names: &[&str]) -> Vec<u8> {
        let data: Vec<serde_json::Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| serde_json::json!({ "id": i + 1, "name": name, "picture": "p" }))
            .collect();
        serde_json::json!({ "data": data }).to_string().into_bytes()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client(GatedFetcher::default());
        assert_eq!(
            client.search_url("daft punk").as_str(),
            "https://api.deezer.com/search/artist?q=daft+punk"
        );
        assert_eq!(
            client.albums_url(ArtistId::new(27).unwrap()).as_str(),
            "https://api.deezer.com/artist/27/albums"
        );
        assert_eq!(
            client.tracks_url(AlbumId::new(302127).unwrap()).as_str(),
            "https://api.deezer.com/album/302127/tracks"
        );
    }

    #[test]
    fn test_endpoint_urls_keep_base_path() {
        let client = CatalogClient::new(
            Url::parse("http://localhost:8080/proxy/deezer/").unwrap(),
            GatedFetcher::default(),
        );
        assert_eq!(
            client.albums_url(ArtistId::new(5).unwrap()).as_str(),
            "http://localhost:8080/proxy/deezer/artist/5/albums"
        );
    }

    #[tokio::test]
    async fn test_search_decodes_artists() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        let gate = fetcher.gate(&client.search_url("daft"));
        gate.send(Ok(artists_body(&["Daft Punk", "Daft Punk Tribute"]))).unwrap();

        let artists = client.search_artists("daft", true).await.unwrap();
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[1].name, "Daft Punk Tribute");
    }

    #[tokio::test]
    async fn test_newer_search_cancels_outstanding_one() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        let first_gate = fetcher.gate(&client.search_url("d"));
        let second_gate = fetcher.gate(&client.search_url("da"));

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.search_artists("d", true).await }
        });
        while fetcher.requested().is_empty() {
            tokio::task::yield_now().await;
        }

        let second = tokio::spawn({
            let client = client.clone();
            async move { client.search_artists("da", true).await }
        });

        assert_eq!(first.await.unwrap(), Err(ClientError::Cancelled));

        let _ = first_gate.send(Ok(artists_body(&["Stale"])));
        second_gate.send(Ok(artists_body(&["Daft Punk"]))).unwrap();
        let artists = second.await.unwrap().unwrap();
        assert_eq!(artists[0].name, "Daft Punk");
    }

    #[tokio::test]
    async fn test_search_without_cancel_previous_lets_both_complete() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        let first_gate = fetcher.gate(&client.search_url("d"));
        let second_gate = fetcher.gate(&client.search_url("da"));

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.search_artists("d", false).await }
        });
        while fetcher.requested().is_empty() {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let client = client.clone();
            async move { client.search_artists("da", false).await }
        });

        first_gate.send(Ok(artists_body(&["First"]))).unwrap();
        second_gate.send(Ok(artists_body(&["Second"]))).unwrap();
        assert_eq!(first.await.unwrap().unwrap()[0].name, "First");
        assert_eq!(second.await.unwrap().unwrap()[0].name, "Second");
    }

    #[tokio::test]
    async fn test_cancel_search_resolves_outstanding_search_as_cancelled() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        let _gate = fetcher.gate(&client.search_url("d"));

        let search = tokio::spawn({
            let client = client.clone();
            async move { client.search_artists("d", true).await }
        });
        while fetcher.requested().is_empty() {
            tokio::task::yield_now().await;
        }

        client.cancel_search().await;
        assert_eq!(search.await.unwrap(), Err(ClientError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_search_reaches_searches_started_without_cancel_previous() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        let _first_gate = fetcher.gate(&client.search_url("d"));
        let _second_gate = fetcher.gate(&client.search_url("da"));

        let searches: Vec<_> = ["d", "da"]
            .into_iter()
            .map(|query| {
                let client = client.clone();
                tokio::spawn(async move { client.search_artists(query, false).await })
            })
            .collect();
        while fetcher.requested().len() < 2 {
            tokio::task::yield_now().await;
        }
        assert_eq!(client.registry().inflight.len(), 2);

        client.cancel_search().await;
        for search in searches {
            assert_eq!(search.await.unwrap(), Err(ClientError::Cancelled));
        }
        assert!(client.registry().inflight.is_empty());
    }

    #[tokio::test]
    async fn test_finished_and_dropped_searches_leave_the_registry() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        fetcher
            .gate(&client.search_url("daft"))
            .send(Ok(artists_body(&["Daft Punk"])))
            .unwrap();
        client.search_artists("daft", true).await.unwrap();
        assert!(client.registry().inflight.is_empty());

        let gate = fetcher.gate(&client.search_url("justice"));
        let search = tokio::spawn({
            let client = client.clone();
            async move { client.search_artists("justice", false).await }
        });
        while fetcher.requested().len() < 2 {
            tokio::task::yield_now().await;
        }
        search.abort();
        assert!(search.await.unwrap_err().is_cancelled());

        assert!(client.registry().inflight.is_empty());
        assert!(gate.send(Ok(artists_body(&["Justice"]))).is_err());
    }

    #[tokio::test]
    async fn test_list_operations_map_failures() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        let artist_id = ArtistId::new(27).unwrap();
        let album_id = AlbumId::new(302127).unwrap();

        fetcher
            .gate(&client.albums_url(artist_id))
            .send(Err(NetworkFailure::NoData))
            .unwrap();
        assert_eq!(
            client.list_albums(artist_id).await,
            Err(ClientError::Network(NetworkFailure::NoData))
        );

        fetcher
            .gate(&client.tracks_url(album_id))
            .send(Ok(br#"{"data":[{"id":1,"title":"No position"}]}"#.to_vec()))
            .unwrap();
        assert!(matches!(
            client.list_tracks(album_id).await,
            Err(ClientError::Decode(DecodeFailure::Malformed(_)))
        ));
    }

    #[tokio::test]
    async fn test_single_record_lookup() {
        let fetcher = GatedFetcher::default();
        let client = client(fetcher.clone());
        let url = Url::parse("https://api.deezer.com/artist/27").unwrap();
        fetcher
            .gate(&url)
            .send(Ok(br#"{"id":27,"name":"Daft Punk","picture":"p"}"#.to_vec()))
            .unwrap();

        let artist = client.artist(ArtistId::new(27).unwrap()).await.unwrap();
        assert_eq!(artist.name, "Daft Punk");
        assert_eq!(fetcher.requested(), vec![url.to_string()]);
    }
}
