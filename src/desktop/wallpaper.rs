use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use image::imageops::FilterType;

use crate::desktop::background::ImageSource;
use crate::error::WallpaperError;

/// Larger images are scaled down to fit before upload.
const MAX_SIDE: u32 = 4096;
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Decoded RGBA8 pixels ready for a texture.
#[derive(Debug, Clone)]
pub struct Wallpaper {
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub type WallpaperResult = Result<Wallpaper, (String, WallpaperError)>;

fn read_bytes(source: &ImageSource, http: &reqwest::blocking::Client) -> Result<Vec<u8>, WallpaperError> {
    match source {
        ImageSource::File(path) => std::fs::read(path).map_err(|source| WallpaperError::Read {
            path: PathBuf::from(path),
            source,
        }),
        ImageSource::Url(url) => {
            let download = |source| WallpaperError::Download {
                url: url.clone(),
                source,
            };
            let res = http
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(download)?;
            Ok(res.bytes().map_err(download)?.to_vec())
        }
    }
}

/// Decode encoded bytes into RGBA, shrinking to `MAX_SIDE`.
pub fn decode(source: &str, bytes: &[u8]) -> Result<Wallpaper, WallpaperError> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > MAX_SIDE || img.height() > MAX_SIDE {
        img = img.resize(MAX_SIDE, MAX_SIDE, FilterType::Triangle);
    }
    let rgba = img.to_rgba8();
    Ok(Wallpaper {
        source: source.to_string(),
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

fn load(source: &ImageSource, http: &reqwest::blocking::Client) -> Result<Wallpaper, WallpaperError> {
    let bytes = read_bytes(source, http)?;
    decode(source.as_str(), &bytes)
}

/// Background thread that loads wallpapers on request.
pub struct WallpaperLoader {
    requests: Sender<ImageSource>,
    results: Receiver<WallpaperResult>,
    _worker: JoinHandle<()>,
}

impl WallpaperLoader {
    pub fn spawn() -> std::io::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<ImageSource>();
        let (res_tx, res_rx) = mpsc::channel::<WallpaperResult>();

        let worker = std::thread::Builder::new()
            .name("wallpaper".into())
            .spawn(move || {
                let http = reqwest::blocking::Client::builder()
                    .timeout(DOWNLOAD_TIMEOUT)
                    .build()
                    .unwrap_or_else(|e| {
                        log::warn!("wallpaper http client fallback: {e}");
                        reqwest::blocking::Client::new()
                    });
                // Ends when the loader (and its sender) is dropped.
                for source in req_rx {
                    let result = load(&source, &http)
                        .map_err(|e| (source.as_str().to_string(), e));
                    if res_tx.send(result).is_err() {
                        break;
                    }
                }
                log::debug!("wallpaper worker exiting");
            })?;

        Ok(Self {
            requests: req_tx,
            results: res_rx,
            _worker: worker,
        })
    }

    pub fn request(&self, source: ImageSource) {
        log::debug!("wallpaper request: {}", source.as_str());
        if self.requests.send(source).is_err() {
            log::warn!("wallpaper worker is gone");
        }
    }

    /// Latest finished load, if any. Failures are logged and skipped.
    pub fn poll(&self) -> Option<Wallpaper> {
        let mut latest = None;
        loop {
            match self.results.try_recv() {
                Ok(Ok(wp)) => {
                    log::info!("wallpaper loaded: {} ({}x{})", wp.source, wp.width, wp.height);
                    latest = Some(wp);
                }
                Ok(Err((source, e))) => log::warn!("wallpaper {source} failed: {e}"),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 100, 250, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let wp = decode("x.png", &png(3, 2)).unwrap();
        assert_eq!((wp.width, wp.height), (3, 2));
        assert_eq!(wp.rgba.len(), 3 * 2 * 4);
        assert_eq!(&wp.rgba[..4], &[200, 100, 250, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode("x", b"definitely not an image"),
            Err(WallpaperError::Decode(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let http = reqwest::blocking::Client::new();
        let err = load(&ImageSource::File("/no/such/bg.jpg".into()), &http).unwrap_err();
        assert!(matches!(err, WallpaperError::Read { .. }));
    }

    #[test]
    fn worker_loads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        std::fs::write(&path, png(4, 4)).unwrap();

        let loader = WallpaperLoader::spawn().unwrap();
        loader.request(ImageSource::File("/no/such.png".into()));
        loader.request(ImageSource::File(path.to_string_lossy().into_owned()));

        let mut got = None;
        for _ in 0..200 {
            if let Some(wp) = loader.poll() {
                got = Some(wp);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let wp = got.expect("wallpaper loaded");
        assert_eq!((wp.width, wp.height), (4, 4));
    }
}
