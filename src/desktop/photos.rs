use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;

use instant::Instant;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::PhotosConfig;
use crate::error::PhotoError;

/// Size suffix the photo service understands.
const SIZE_SUFFIX: &str = "=w1920-h1080";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoItem {
    pub id: String,
    pub base_url: String,
    #[serde(default)]
    pub product_url: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub filename: String,
}

impl PhotoItem {
    pub fn sized_url(&self) -> String {
        format!("{}{SIZE_SUFFIX}", self.base_url)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaPage {
    #[serde(default)]
    media_items: Vec<PhotoItem>,
    next_page_token: Option<String>,
}

fn parse_page(body: &str) -> Result<MediaPage, PhotoError> {
    Ok(serde_json::from_str(body)?)
}

/// Thin client for the photo-hosting API with an in-memory cache.
pub struct PhotoClient {
    http: Client,
    config: PhotosConfig,
    cache: Vec<PhotoItem>,
    fetched_at: Option<Instant>,
}

impl PhotoClient {
    pub fn new(config: PhotosConfig) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("photo client builder failed, using defaults: {e}");
                Client::new()
            });
        Self {
            http,
            config,
            cache: Vec::new(),
            fetched_at: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.config.access_token.is_empty()
    }

    fn cache_fresh(&self) -> bool {
        let max_age = Duration::from_secs(self.config.cache_secs);
        !self.cache.is_empty()
            && self
                .fetched_at
                .is_some_and(|t| t.elapsed() < max_age)
    }

    fn list_url(&self) -> String {
        let base = self.config.endpoint.trim_end_matches('/');
        match self.config.album_id.as_deref().filter(|id| !id.is_empty()) {
            Some(album) => format!("{base}/albums/{album}/mediaItems"),
            None => format!("{base}/mediaItems"),
        }
    }

    /// All photos, from cache when fresh. Errors are logged and read as empty.
    pub fn fetch_photos(&mut self) -> Vec<PhotoItem> {
        if !self.is_initialized() {
            log::warn!("photo service not configured, using default backgrounds");
            return Vec::new();
        }
        if self.cache_fresh() {
            return self.cache.clone();
        }

        match self.fetch_all() {
            Ok(items) => {
                log::info!("fetched {} photo(s)", items.len());
                self.cache = items;
                self.fetched_at = Some(Instant::now());
                self.cache.clone()
            }
            Err(e) => {
                log::error!("photo fetch failed: {e}");
                self.clear_cache();
                Vec::new()
            }
        }
    }

    fn fetch_all(&self) -> Result<Vec<PhotoItem>, PhotoError> {
        let url = self.list_url();
        let mut items = Vec::new();
        let mut token: Option<String> = None;

        for _ in 0..self.config.max_pages.max(1) {
            let mut req = self
                .http
                .get(&url)
                .bearer_auth(&self.config.access_token)
                .build()?;
            {
                let mut query = req.url_mut().query_pairs_mut();
                query.append_pair("pageSize", &self.config.page_size.to_string());
                if let Some(t) = &token {
                    query.append_pair("pageToken", t);
                }
            }

            let res = self.http.execute(req)?;
            let status = res.status();
            let body = res.text()?;
            if !status.is_success() {
                return Err(PhotoError::Upstream { status, body });
            }

            let page = parse_page(&body)?;
            items.extend(page.media_items);
            match page.next_page_token {
                Some(t) if !t.is_empty() => token = Some(t),
                _ => break,
            }
        }
        Ok(items)
    }

    pub fn random_photo(&mut self, rng: &mut fastrand::Rng) -> Option<String> {
        let photos = self.fetch_photos();
        if photos.is_empty() {
            return None;
        }
        Some(photos[rng.usize(..photos.len())].sized_url())
    }

    /// Up to `count` distinct photos in random order.
    pub fn random_photos(&mut self, count: usize, rng: &mut fastrand::Rng) -> Vec<String> {
        let mut photos = self.fetch_photos();
        rng.shuffle(&mut photos);
        photos.truncate(count);
        photos.iter().map(PhotoItem::sized_url).collect()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.fetched_at = None;
    }
}

/// Fetch photo URLs on a worker thread and send them back once.
pub fn spawn_fetch(
    config: PhotosConfig,
    tx: Sender<Vec<String>>,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("photo-fetch".into())
        .spawn(move || {
            let count = config.count;
            let mut client = PhotoClient::new(config);
            let mut rng = fastrand::Rng::new();
            let urls = if count == 1 {
                client.random_photo(&mut rng).into_iter().collect()
            } else {
                client.random_photos(count, &mut rng)
            };
            if !urls.is_empty() && tx.send(urls).is_err() {
                log::debug!("photo results dropped, app closed");
            }
        })
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    use super::*;

    fn item(id: &str) -> PhotoItem {
        PhotoItem {
            id: id.into(),
            base_url: format!("https://lh3.example/{id}"),
            product_url: String::new(),
            mime_type: "image/jpeg".into(),
            filename: format!("{id}.jpg"),
        }
    }

    fn configured() -> PhotosConfig {
        PhotosConfig {
            enabled: true,
            access_token: "token".into(),
            // Unroutable, so an accidental request fails fast.
            endpoint: "http://127.0.0.1:9".into(),
            ..PhotosConfig::default()
        }
    }

    #[test]
    fn unconfigured_client_returns_nothing() {
        let mut client = PhotoClient::new(PhotosConfig::default());
        assert!(!client.is_initialized());
        assert!(client.fetch_photos().is_empty());
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(client.random_photo(&mut rng), None);
        assert!(client.random_photos(3, &mut rng).is_empty());
    }

    #[test]
    fn urls_are_sized() {
        assert_eq!(item("a").sized_url(), "https://lh3.example/a=w1920-h1080");
    }

    #[test]
    fn page_parsing() {
        let body = r#"{
            "mediaItems": [
                {"id": "1", "baseUrl": "https://x/1", "mimeType": "image/png", "filename": "1.png"},
                {"id": "2", "baseUrl": "https://x/2"}
            ],
            "nextPageToken": "abc"
        }"#;
        let page = parse_page(body).unwrap();
        assert_eq!(page.media_items.len(), 2);
        assert_eq!(page.media_items[1].base_url, "https://x/2");
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));

        let empty = parse_page("{}").unwrap();
        assert!(empty.media_items.is_empty());
        assert!(parse_page("nope").is_err());
    }

    #[test]
    fn list_url_with_and_without_album() {
        let mut config = configured();
        config.endpoint = "https://photos.example/v1/".into();
        let client = PhotoClient::new(config.clone());
        assert_eq!(client.list_url(), "https://photos.example/v1/mediaItems");

        config.album_id = Some("alb".into());
        let client = PhotoClient::new(config);
        assert_eq!(
            client.list_url(),
            "https://photos.example/v1/albums/alb/mediaItems"
        );
    }

    #[test]
    fn fresh_cache_is_served_and_random_picks_are_distinct() {
        let mut client = PhotoClient::new(configured());
        client.cache = vec![item("a"), item("b"), item("c")];
        client.fetched_at = Some(Instant::now());

        assert_eq!(client.fetch_photos().len(), 3);
        let mut rng = fastrand::Rng::with_seed(9);
        let mut picks = client.random_photos(5, &mut rng);
        assert_eq!(picks.len(), 3);
        picks.sort();
        picks.dedup();
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|u| u.ends_with(SIZE_SUFFIX)));
    }

    #[test]
    fn failed_fetch_reads_as_empty() {
        let mut client = PhotoClient::new(configured());
        client.clear_cache();
        assert!(client.fetch_photos().is_empty());
    }

    /// Serve `bodies` one connection each, returning the request lines seen.
    fn serve(bodies: Vec<&'static str>) -> (String, std::thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let mut lines = Vec::new();
            for body in bodies {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                lines.push(line.trim_end().to_string());
                loop {
                    let mut header = String::new();
                    reader.read_line(&mut header).unwrap();
                    if header == "\r\n" || header.is_empty() {
                        break;
                    }
                }
                write!(
                    stream,
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
            }
            lines
        });
        (addr, handle)
    }

    #[test]
    fn page_token_is_percent_encoded() {
        let (endpoint, server) = serve(vec![
            r#"{"mediaItems": [{"id": "1", "baseUrl": "https://x/1"}], "nextPageToken": "ab+c/d=&x=1"}"#,
            r#"{"mediaItems": [{"id": "2", "baseUrl": "https://x/2"}]}"#,
        ]);
        let mut client = PhotoClient::new(PhotosConfig {
            endpoint,
            ..configured()
        });

        let photos = client.fetch_photos();
        assert_eq!(photos.len(), 2);

        let lines = server.join().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("GET /mediaItems?pageSize="), "{}", lines[0]);
        assert!(!lines[0].contains("pageToken"));
        assert!(
            lines[1].contains("&pageToken=ab%2Bc%2Fd%3D%26x%3D1 "),
            "{}",
            lines[1]
        );
    }
}
