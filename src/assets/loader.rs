//! Queued asset loading with progress reporting
//!
//! Each completed resource reports the URL and the overall percentage
//! through `log`, so the browser console shows
//!
//! ```text
//! loading: images/spritesheet.json
//! progress: 50%
//! ```

use super::{AssetError, SpriteSheet};

/// Progress after one resource finished
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProgress {
    pub url: String,
    /// 0..=100
    pub percent: f32,
}

#[derive(Debug, Clone)]
struct QueuedAsset {
    url: String,
    loaded: bool,
}

/// Tracks which queued URLs have completed
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    queue: Vec<QueuedAsset>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a URL. Queuing the same URL twice has no effect.
    pub fn add(&mut self, url: &str) -> &mut Self {
        if !self.queue.iter().any(|a| a.url == url) {
            self.queue.push(QueuedAsset {
                url: url.to_string(),
                loaded: false,
            });
        }
        self
    }

    /// URLs not yet loaded, in queue order
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().filter(|a| !a.loaded).map(|a| a.url.as_str())
    }

    /// Percentage of queued resources that have completed
    pub fn progress(&self) -> f32 {
        if self.queue.is_empty() {
            return 100.0;
        }
        let done = self.queue.iter().filter(|a| a.loaded).count();
        done as f32 / self.queue.len() as f32 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.queue.iter().all(|a| a.loaded)
    }

    /// Record a finished resource. Returns `None` for unknown or repeated URLs.
    pub fn mark_loaded(&mut self, url: &str) -> Option<LoadProgress> {
        let asset = self.queue.iter_mut().find(|a| a.url == url && !a.loaded)?;
        asset.loaded = true;

        let progress = LoadProgress {
            url: url.to_string(),
            percent: self.progress(),
        };
        log::info!("loading: {}", progress.url);
        log::info!("progress: {}%", progress.percent.round());
        Some(progress)
    }
}

/// Descriptor plus decoded atlas pixels
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub sheet: SpriteSheet,
    pub image: image::RgbaImage,
}

/// Decode a PNG atlas into RGBA8 pixels
pub fn decode_image(bytes: &[u8]) -> Result<image::RgbaImage, AssetError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
    Ok(image.to_rgba8())
}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use super::super::AssetError;

    fn fetch_error(url: &str, reason: impl std::fmt::Debug) -> AssetError {
        AssetError::Fetch {
            url: url.to_string(),
            reason: format!("{:?}", reason),
        }
    }

    /// GET `url` and return the body bytes
    pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
        let window = web_sys::window().ok_or_else(|| fetch_error(url, "no window"))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| fetch_error(url, e))?;
        let response: web_sys::Response = response.dyn_into().map_err(|e| fetch_error(url, e))?;
        if !response.ok() {
            return Err(AssetError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        let body = response.array_buffer().map_err(|e| fetch_error(url, e))?;
        let body = JsFuture::from(body).await.map_err(|e| fetch_error(url, e))?;
        Ok(js_sys::Uint8Array::new(&body).to_vec())
    }
}

/// Fetch a sprite-sheet descriptor and its atlas image.
///
/// The image is queued once the descriptor names it, so progress reads
/// 50% after the JSON and 100% after the image.
#[cfg(target_arch = "wasm32")]
pub async fn load_spritesheet(
    loader: &mut AssetLoader,
    url: &str,
) -> Result<LoadedSheet, AssetError> {
    loader.add(url);

    let json = web::fetch_bytes(url).await?;
    let json = String::from_utf8_lossy(&json);
    let sheet = SpriteSheet::from_json(&json)?;

    let image_url = sheet.image_url(url);
    loader.add(&image_url);
    loader.mark_loaded(url);

    let bytes = web::fetch_bytes(&image_url).await?;
    let image = decode_image(&bytes)?;
    loader.mark_loaded(&image_url);

    log::info!(
        "Sprite sheet ready: {} frames, {}x{} atlas",
        sheet.frames.len(),
        image.width(),
        image.height()
    );
    Ok(LoadedSheet { sheet, image })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let mut loader = AssetLoader::new();
        assert_eq!(loader.progress(), 100.0);

        loader.add("a.json").add("b.png");
        assert_eq!(loader.progress(), 0.0);
        assert!(!loader.is_complete());

        let p = loader.mark_loaded("a.json").unwrap();
        assert_eq!(p.url, "a.json");
        assert_eq!(p.percent, 50.0);
        assert_eq!(loader.pending().collect::<Vec<_>>(), vec!["b.png"]);

        assert_eq!(loader.mark_loaded("b.png").unwrap().percent, 100.0);
        assert!(loader.is_complete());
    }

    #[test]
    fn test_unknown_and_repeated_urls() {
        let mut loader = AssetLoader::new();
        loader.add("a.json").add("a.json");
        assert!(loader.mark_loaded("nope.png").is_none());
        assert!(loader.mark_loaded("a.json").is_some());
        assert!(loader.mark_loaded("a.json").is_none());
        assert_eq!(loader.progress(), 100.0);
    }

    #[test]
    fn test_decode_image() {
        let mut atlas = image::RgbaImage::new(4, 2);
        atlas.put_pixel(3, 1, image::Rgba([255, 0, 0, 255]));
        let mut png = Vec::new();
        atlas
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(3, 1), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_bundled_sheet() {
        let sheet = SpriteSheet::from_json(include_str!("../../images/spritesheet.json")).unwrap();
        let image = decode_image(include_bytes!("../../images/spritesheet.png")).unwrap();
        assert_eq!(image.dimensions(), (sheet.meta.size.w, sheet.meta.size.h));
        assert_eq!(sheet.sequence("player_", 3).unwrap().len(), 3);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode_image(b"nope"), Err(AssetError::Image(_))));
    }
}
