//! Web playback API backend.
//!
//! Talks to a Spotify-compatible player endpoint:
//!
//! * `PUT {base}/me/player/play?device_id=…` with `{"uris":[track],"position_ms":n}`
//! * `PUT {base}/me/player/seek?position_ms=n&device_id=…`
//!
//! A 401 maps to [`PlaybackError::AuthExpired`]; any other non-2xx status
//! to [`PlaybackError::Status`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::auth::TokenStore;
use crate::service::{PlaybackError, PlaybackService};

pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WebPlaybackService {
    client:    Client,
    base_url:  String,
    device_id: Option<String>,
    tokens:    Arc<TokenStore>,
}

impl WebPlaybackService {
    pub fn new(base_url: &str, tokens: Arc<TokenStore>) -> Result<Self, PlaybackError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(WebPlaybackService {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            device_id: None,
            tokens,
        })
    }

    /// Target a specific output device; `None` lets the service pick the
    /// active one.
    pub fn with_device(mut self, device_id: Option<String>) -> Self {
        self.device_id = device_id.filter(|d| !d.is_empty());
        self
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn play_url(&self) -> String {
        let mut url = format!("{}/me/player/play", self.base_url);
        if let Some(d) = &self.device_id {
            url.push_str(&format!("?device_id={}", urlencoding::encode(d)));
        }
        url
    }

    pub fn seek_url(&self, offset_ms: u64) -> String {
        let mut url = format!("{}/me/player/seek?position_ms={}", self.base_url, offset_ms);
        if let Some(d) = &self.device_id {
            url.push_str(&format!("&device_id={}", urlencoding::encode(d)));
        }
        url
    }

    fn send(&self, req: RequestBuilder) -> Result<(), PlaybackError> {
        let token = self.tokens.token().ok_or(PlaybackError::AuthExpired)?;
        let resp = req.bearer_auth(token).send()?;
        check_status(resp.status(), || resp.text().unwrap_or_default())
    }
}

/// Map a response status to the playback error taxonomy.
fn check_status<F>(status: StatusCode, body: F) -> Result<(), PlaybackError>
where
    F: FnOnce() -> String,
{
    if status == StatusCode::UNAUTHORIZED {
        return Err(PlaybackError::AuthExpired);
    }
    if !status.is_success() {
        return Err(PlaybackError::Status { code: status.as_u16(), body: body() });
    }
    Ok(())
}

impl PlaybackService for WebPlaybackService {
    fn play(&mut self, track: &str, offset_ms: u64) -> Result<(), PlaybackError> {
        let url = self.play_url();
        debug!(%url, track, offset_ms, "web play");
        let body = json!({ "uris": [track], "position_ms": offset_ms });
        self.send(self.client.put(url).json(&body))
    }

    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        let url = self.seek_url(offset_ms);
        debug!(%url, "web seek");
        self.send(self.client.put(url).header(reqwest::header::CONTENT_LENGTH, 0))
    }

    fn name(&self) -> &'static str { "web" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(device: Option<&str>) -> WebPlaybackService {
        WebPlaybackService::new("https://api.example.test/v1/", Arc::new(TokenStore::new(None)))
            .unwrap()
            .with_device(device.map(str::to_string))
    }

    #[test]
    fn urls_without_device() {
        let s = service(None);
        assert_eq!(s.play_url(), "https://api.example.test/v1/me/player/play");
        assert_eq!(s.seek_url(1500), "https://api.example.test/v1/me/player/seek?position_ms=1500");
    }

    #[test]
    fn urls_with_device() {
        let s = service(Some("dev 42"));
        assert_eq!(s.play_url(), "https://api.example.test/v1/me/player/play?device_id=dev%2042");
        assert_eq!(
            s.seek_url(0),
            "https://api.example.test/v1/me/player/seek?position_ms=0&device_id=dev%2042"
        );
    }

    #[test]
    fn empty_device_is_ignored() {
        assert_eq!(service(Some("")).device_id(), None);
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(StatusCode::NO_CONTENT, String::new).is_ok());
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED, String::new),
            Err(PlaybackError::AuthExpired)
        ));
        let err = check_status(StatusCode::NOT_FOUND, || "no active device".into()).unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn missing_token_fails_before_sending() {
        let mut s = service(None);
        assert!(matches!(s.play("spotify:track:x", 0), Err(PlaybackError::AuthExpired)));
    }
}
