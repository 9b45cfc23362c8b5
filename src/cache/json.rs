use crate::cache::{CacheError, CacheResult};
use crate::ScrapeError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Returns the cached payload at `path`, or computes and stores a fresh one
///
/// With `refresh == false` and an existing file, the file is deserialized and
/// returned and `compute` is never called. Otherwise `compute` runs; if it
/// succeeds its result is written to `path` and returned. A failed `compute`
/// leaves any existing cache file untouched.
///
/// A cached file is read back through `T`'s `Deserialize`, so it comes back
/// in the shape `T` allows. For apartment records that means a repeated key
/// keeps only its last value and non-string values are an error.
///
/// # Example
///
/// ```no_run
/// use bolig_scrape::cache::get_or_compute;
/// use std::path::Path;
///
/// # async fn example() -> bolig_scrape::Result<()> {
/// let links: Vec<String> = get_or_compute(Path::new("data/links.json"), false, || async {
///     Ok(vec!["https://www.boligportal.dk/lejligheder/1".to_string()])
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn get_or_compute<T, F, Fut>(
    path: &Path,
    refresh: bool,
    compute: F,
) -> Result<T, ScrapeError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    if !refresh && tokio::fs::try_exists(path).await.unwrap_or(false) {
        tracing::info!("Loading {} from cache", path.display());
        return Ok(read_cache(path).await?);
    }

    tracing::info!("Scraping fresh data for {}", path.display());
    let payload = compute().await?;

    write_cache(path, &payload).await?;
    tracing::info!("Saved {}", path.display());

    Ok(payload)
}

/// Reads and deserializes a cache file
pub async fn read_cache<T: DeserializeOwned>(path: &Path) -> CacheResult<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `payload` as pretty JSON and replaces the file at `path`
///
/// The content goes to a sibling temp file first and is renamed into place,
/// so readers never observe a half-written cache.
pub async fn write_cache<T: Serialize>(path: &Path, payload: &T) -> CacheResult<()> {
    let io_err = |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    let content = serde_json::to_string_pretty(payload).map_err(|source| CacheError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, content).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
