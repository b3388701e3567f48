//! Thumbnail-localizing interceptor.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

use sharekit_protocol::{MediaLocator, ShareObject};

use super::{InterceptContext, ShareInterceptor};

/// Downloads remote thumbnails to local files before dispatch.
///
/// Platform hand-offs generally cannot use an `http(s)` thumbnail
/// directly, so this stage rewrites remote locators to local temp
/// files. A fetch failure substitutes the configured fallback image
/// when one is set, and otherwise passes the object through unchanged;
/// the share itself is not failed over a missing preview.
pub struct ThumbnailInterceptor {
    client: reqwest::Client,
    storage: TempDir,
    fallback: Option<PathBuf>,
}

impl ThumbnailInterceptor {
    /// Create an interceptor storing downloads in a fresh temp dir.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            storage: TempDir::new()?,
            fallback: None,
        })
    }

    /// Use `path` as the thumbnail when a download fails.
    pub fn with_fallback(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback = Some(path.into());
        self
    }

    async fn fetch(&self, url: &str) -> anyhow::Result<PathBuf> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        let path = self.storage.path().join(file_name_for(url));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }
}

/// Derive a unique local file name, keeping the URL's extension.
fn file_name_for(url: &str) -> String {
    let extension = Path::new(url.split(['?', '#']).next().unwrap_or(url))
        .extension()
        .and_then(|ext| ext.to_str());
    match extension {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

#[async_trait]
impl ShareInterceptor for ThumbnailInterceptor {
    fn name(&self) -> &str {
        "thumbnail"
    }

    async fn intercept(
        &self,
        cx: &InterceptContext,
        object: &ShareObject,
    ) -> anyhow::Result<Option<ShareObject>> {
        let Some(thumbnail) = object.payload.thumbnail() else {
            return Ok(None);
        };
        if !thumbnail.is_remote() {
            return Ok(None);
        }

        let url = thumbnail.as_str().to_string();
        match self.fetch(&url).await {
            Ok(path) => {
                debug!(session = %cx.session(), %url, local = %path.display(), "thumbnail localized");
                let mut updated = object.clone();
                updated
                    .payload
                    .set_thumbnail(MediaLocator::new(path.to_string_lossy().into_owned()));
                Ok(Some(updated))
            }
            Err(error) => match &self.fallback {
                Some(fallback) => {
                    warn!(session = %cx.session(), %url, %error, "thumbnail fetch failed; using fallback");
                    let mut updated = object.clone();
                    updated
                        .payload
                        .set_thumbnail(MediaLocator::new(fallback.to_string_lossy().into_owned()));
                    Ok(Some(updated))
                }
                None => {
                    warn!(session = %cx.session(), %url, %error, "thumbnail fetch failed; keeping remote locator");
                    Ok(None)
                }
            },
        }
    }
}
