//! Decoders turning raw response bodies into catalog records
//!
//! List endpoints wrap their records in `{ "data": [...] }`; single-record
//! endpoints return the record itself. Either shape may instead carry the
//! remote `{ "error": { ... } }` envelope, which is reported as malformed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use super::content::{Album, Artist, Track};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeFailure {
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct RemoteError {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

/// Pulls `name` out of a nested record such as a track's `artist`
pub(crate) fn nested_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Named::deserialize(deserializer).map(|named| named.name)
}

fn parse_payload(bytes: &[u8]) -> Result<Value, DecodeFailure> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeFailure::Malformed(e.to_string()))?;

    if let Some(error) = value.get("error") {
        let remote = RemoteError::deserialize(error).map_err(|e| DecodeFailure::Malformed(e.to_string()))?;
        return Err(DecodeFailure::Malformed(format!(
            "remote error {} ({}): {}",
            remote.code.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()),
            remote.kind.as_deref().unwrap_or("unknown"),
            remote.message.as_deref().unwrap_or("no message"),
        )));
    }

    Ok(value)
}

/// Decode a single record
fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeFailure> {
    let value = parse_payload(bytes)?;
    serde_json::from_value(value).map_err(|e| DecodeFailure::Malformed(e.to_string()))
}

/// Decode a `{ "data": [...] }` envelope, preserving the remote order
fn decode_list<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, DecodeFailure> {
    let value = parse_payload(bytes)?;
    serde_json::from_value::<Envelope<T>>(value)
        .map(|envelope| envelope.data)
        .map_err(|e| DecodeFailure::Malformed(e.to_string()))
}

pub fn decode_artists(bytes: &[u8]) -> Result<Vec<Artist>, DecodeFailure> {
    decode_list(bytes)
}

pub fn decode_albums(bytes: &[u8]) -> Result<Vec<Album>, DecodeFailure> {
    decode_list(bytes)
}

pub fn decode_tracklist(bytes: &[u8]) -> Result<Vec<Track>, DecodeFailure> {
    decode_list(bytes)
}

pub fn decode_artist(bytes: &[u8]) -> Result<Artist, DecodeFailure> {
    decode_record(bytes)
}

pub fn decode_album(bytes: &[u8]) -> Result<Album, DecodeFailure> {
    decode_record(bytes)
}

pub fn decode_track(bytes: &[u8]) -> Result<Track, DecodeFailure> {
    decode_record(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn album_json() -> Value {
        json!({
            "id": 302127,
            "title": "Discovery",
            "link": "https://www.deezer.com/album/302127",
            "cover": "https://api.deezer.com/album/302127/image",
            "cover_small": "https://e-cdns-images.dzcdn.net/images/cover/56x56.jpg",
            "cover_medium": "https://e-cdns-images.dzcdn.net/images/cover/250x250.jpg",
            "release_date": "2001-03-07",
            "record_type": "album",
            "tracklist": "https://api.deezer.com/album/302127/tracks",
            "explicit_lyrics": false
        })
    }

    fn track_json() -> Value {
        json!({
            "id": 3135553,
            "title": "One More Time",
            "duration": 320,
            "track_position": 1,
            "disk_number": 1,
            "explicit_lyrics": false,
            "artist": { "id": 27, "name": "Daft Punk", "tracklist": "https://api.deezer.com/artist/27/top" }
        })
    }

    #[test]
    fn test_decode_search_envelope() {
        let body = br#"{ "data": [{"id":1,"name":"X","picture":"u"}] }"#;
        let artists = decode_artists(body).unwrap();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].id.get(), 1);
        assert_eq!(artists[0].name, "X");
        assert_eq!(artists[0].picture_url, "u");
        assert_eq!(artists[0].picture_small, None);
    }

    #[test]
    fn test_decode_artist_maps_picture_variants() {
        let body = json!({
            "id": 27,
            "name": "Daft Punk",
            "link": "https://www.deezer.com/artist/27",
            "picture": "https://api.deezer.com/artist/27/image",
            "picture_small": "small.jpg",
            "picture_medium": "medium.jpg",
            "picture_big": "big.jpg",
            "picture_xl": "xl.jpg",
            "nb_album": 36,
            "type": "artist"
        });
        let artist = decode_artist(body.to_string().as_bytes()).unwrap();
        assert_eq!(artist.picture_big.as_deref(), Some("big.jpg"));
        assert_eq!(artist.picture_xl.as_deref(), Some("xl.jpg"));
        assert_eq!(artist.link.as_deref(), Some("https://www.deezer.com/artist/27"));
    }

    #[test]
    fn test_decode_album_translates_field_names() {
        let body = json!({ "data": [album_json()] });
        let albums = decode_albums(body.to_string().as_bytes()).unwrap();
        let album = &albums[0];
        assert_eq!(album.id.get(), 302127);
        assert_eq!(album.record_type, "album");
        assert_eq!(album.release_date, "2001-03-07");
        assert!(!album.is_explicit);
        assert_eq!(album.tracklist_url, "https://api.deezer.com/album/302127/tracks");
    }

    #[test]
    fn test_decode_album_without_small_cover_succeeds() {
        let mut album = album_json();
        album.as_object_mut().unwrap().remove("cover_small");
        let decoded = decode_album(album.to_string().as_bytes()).unwrap();
        assert_eq!(decoded.cover_small, None);
        assert!(decoded.cover_medium.is_some());
    }

    #[test]
    fn test_decode_album_with_only_identity_and_cover() {
        let body = br#"{ "data": [{"id":302127,"title":"Discovery","cover":"c","cover_medium":"m"}] }"#;
        let albums = decode_albums(body).unwrap();
        let album = &albums[0];
        assert_eq!(album.title, "Discovery");
        assert_eq!(album.cover_medium.as_deref(), Some("m"));
        assert_eq!(album.record_type, "");
        assert_eq!(album.release_year(), None);
        assert!(!album.is_explicit);
    }

    #[test]
    fn test_decode_album_without_title_fails() {
        let mut album = album_json();
        album.as_object_mut().unwrap().remove("title");
        let result = decode_album(album.to_string().as_bytes());
        assert!(matches!(result, Err(DecodeFailure::Malformed(_))));
    }

    #[test]
    fn test_decode_track_reads_nested_artist_name() {
        let track = decode_track(track_json().to_string().as_bytes()).unwrap();
        assert_eq!(track.artist_name, "Daft Punk");
        assert_eq!(track.position, 1);
        assert_eq!(track.duration_seconds, 320);
        assert_eq!(track.disk_number, Some(1));
    }

    #[test]
    fn test_decode_track_without_position_fails() {
        let mut track = track_json();
        track.as_object_mut().unwrap().remove("track_position");
        let body = json!({ "data": [track] });
        let result = decode_tracklist(body.to_string().as_bytes());
        assert!(matches!(result, Err(DecodeFailure::Malformed(_))));
    }

    #[test]
    fn test_decode_rejects_zero_and_missing_ids() {
        let zero = br#"{ "data": [{"id":0,"name":"X","picture":"u"}] }"#;
        assert!(decode_artists(zero).is_err());

        let missing = br#"{ "data": [{"name":"X","picture":"u"}] }"#;
        assert!(decode_artists(missing).is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_json_types() {
        let body = br#"{ "data": [{"id":"1","name":"X","picture":"u"}] }"#;
        assert!(decode_artists(body).is_err());

        assert!(decode_artists(b"not json").is_err());
        assert!(decode_artists(br#"{ "total": 0 }"#).is_err());
    }

    #[test]
    fn test_decode_preserves_order() {
        let tracks: Vec<Value> = (1..=5)
            .map(|position| {
                let mut track = track_json();
                track["id"] = json!(100 + position);
                track["track_position"] = json!(position);
                track
            })
            .collect();
        let body = json!({ "data": tracks });
        let decoded = decode_tracklist(body.to_string().as_bytes()).unwrap();
        let positions: Vec<u32> = decoded.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_decode_remote_error_envelope() {
        let body = br#"{"error":{"type":"DataException","message":"no data","code":800}}"#;
        let result = decode_albums(body);
        assert_eq!(
            result,
            Err(DecodeFailure::Malformed(
                "remote error 800 (DataException): no data".to_string()
            ))
        );
    }

    #[test]
    fn test_decode_empty_envelope() {
        assert!(decode_albums(br#"{"data":[]}"#).unwrap().is_empty());
    }
}
