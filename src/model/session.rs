//! Search session state: the current query, the token of the request that may
//! still apply, and the last applied result set.
//!
//! A token is minted for every non-empty query. A completion is applied only
//! while its token is still the session's current one, so replies that arrive
//! out of order can never overwrite a newer query's results.

use super::catalog::ClientError;
use super::content::Artist;

/// Identifies one dispatched search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Applied,
    Failed,
}

/// What presentation sees whenever the session changes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultsState {
    pub status: SearchStatus,
    pub query: String,
    pub artists: Vec<Artist>,
    pub error: Option<ClientError>,
}

/// How a completion was handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// Token no longer current, or the request was cancelled
    Superseded,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    current_query: String,
    in_flight: Option<SearchToken>,
    latest_results: Vec<Artist>,
    status: SearchStatus,
    error: Option<ClientError>,
    next_token: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> Option<SearchToken> {
        self.in_flight
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Record a query change. Returns the token to dispatch with, or `None`
    /// when the query is empty and the session went back to idle.
    ///
    /// Results are cleared either way.
    pub fn query_changed(&mut self, query: &str) -> Option<SearchToken> {
        self.current_query = query.to_string();
        self.latest_results.clear();
        self.error = None;

        if query.is_empty() {
            self.in_flight = None;
            self.status = SearchStatus::Idle;
            return None;
        }

        self.next_token += 1;
        let token = SearchToken(self.next_token);
        self.in_flight = Some(token);
        self.status = SearchStatus::Loading;
        Some(token)
    }

    pub fn complete(&mut self, token: SearchToken, result: Result<Vec<Artist>, ClientError>) -> Completion {
        if self.in_flight != Some(token) {
            return Completion::Superseded;
        }

        match result {
            Ok(artists) => {
                self.in_flight = None;
                self.latest_results = artists;
                self.status = SearchStatus::Applied;
                Completion::Applied
            }
            Err(ClientError::Cancelled) => Completion::Superseded,
            Err(error) => {
                self.in_flight = None;
                self.latest_results.clear();
                self.error = Some(error);
                self.status = SearchStatus::Failed;
                Completion::Failed
            }
        }
    }

    pub fn snapshot(&self) -> ResultsState {
        ResultsState {
            status: self.status,
            query: self.current_query.clone(),
            artists: self.latest_results.clone(),
            error: self.error.clone(),
        }
    }
}
