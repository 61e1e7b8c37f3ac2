use crate::{
    core::geo::TileCoord, data::feed::HTTP_CLIENT, layers::tile::TileLayer, QuakeMapError,
    Result,
};
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};

/// Tile fetch settings
#[derive(Debug, Clone)]
pub struct TileLoaderConfig {
    /// Maximum concurrent tile downloads
    pub max_concurrent: usize,
    /// Per-tile request timeout
    pub timeout: Duration,
}

impl Default for TileLoaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            timeout: Duration::from_secs(10),
        }
    }
}

/// RGBA pixels of one decoded tile
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTile {
    /// `[width, height]`
    pub size: [usize; 2],
    pub pixels: Vec<u8>,
}

/// Result of a tile loading operation
#[derive(Debug)]
pub struct TileResult {
    pub coord: TileCoord,
    pub data: Result<DecodedTile>,
}

#[derive(Debug)]
struct TileTask {
    coord: TileCoord,
    url: String,
}

/// Downloads and decodes base map tiles off the UI thread.
///
/// Requests go to a worker thread running a current-thread tokio runtime;
/// finished tiles come back already decoded and are collected with
/// [`try_recv_results`](Self::try_recv_results). A tile is requested at most
/// once while it is in flight. Dropping the loader stops the worker.
pub struct TileLoader {
    task_tx: mpsc::UnboundedSender<TileTask>,
    result_rx: Receiver<TileResult>,
    pending: HashSet<TileCoord>,
}

impl TileLoader {
    pub fn new(config: TileLoaderConfig) -> Result<Self> {
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| QuakeMapError::Runtime(format!("tile runtime unavailable: {e}")))?;

        thread::Builder::new()
            .name("quakemap-tiles".to_string())
            .spawn(move || runtime.block_on(run_worker(task_rx, result_tx, config)))
            .map_err(|e| QuakeMapError::Runtime(format!("tile worker not started: {e}")))?;

        Ok(Self {
            task_tx,
            result_rx,
            pending: HashSet::new(),
        })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(TileLoaderConfig::default())
    }

    /// Queues `coord` from `layer`. Returns `false` when the tile is already
    /// in flight or the worker has stopped.
    pub fn queue_tile(&mut self, layer: &TileLayer, coord: TileCoord) -> bool {
        if self.pending.contains(&coord) {
            return false;
        }

        let task = TileTask {
            coord,
            url: layer.tile_url(coord),
        };
        if self.task_tx.send(task).is_err() {
            log::error!("tile worker stopped; dropping request for {:?}", coord);
            return false;
        }

        self.pending.insert(coord);
        true
    }

    /// Completed tiles since the last call (non-blocking)
    pub fn try_recv_results(&mut self) -> Vec<TileResult> {
        let results: Vec<TileResult> = self.result_rx.try_iter().collect();
        for result in &results {
            self.pending.remove(&result.coord);
        }
        results
    }

    pub fn is_pending(&self, coord: &TileCoord) -> bool {
        self.pending.contains(coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

async fn run_worker(
    mut task_rx: mpsc::UnboundedReceiver<TileTask>,
    result_tx: Sender<TileResult>,
    config: TileLoaderConfig,
) {
    let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));

    while let Some(task) = task_rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let result_tx = result_tx.clone();
        let timeout = config.timeout;

        tokio::spawn(async move {
            let data = fetch_tile(&task.url, timeout).await;
            drop(permit);

            if let Err(e) = &data {
                log::warn!("tile {:?} unavailable: {}", task.coord, e);
            }
            if result_tx
                .send(TileResult {
                    coord: task.coord,
                    data,
                })
                .is_err()
            {
                log::debug!("tile {:?} finished after the loader was dropped", task.coord);
            }
        });
    }

    log::debug!("tile worker exiting");
}

async fn fetch_tile(url: &str, timeout: Duration) -> Result<DecodedTile> {
    let response = HTTP_CLIENT
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| QuakeMapError::fetch(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(QuakeMapError::fetch(url, format!("HTTP {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| QuakeMapError::fetch(url, e))?;

    let url = url.to_string();
    tokio::task::spawn_blocking(move || decode_tile(&url, &bytes))
        .await
        .map_err(|e| QuakeMapError::Runtime(format!("tile decode task failed: {e}")))?
}

/// Decodes PNG/JPEG tile bytes into RGBA pixels
pub fn decode_tile(url: &str, bytes: &[u8]) -> Result<DecodedTile> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| QuakeMapError::fetch(url, format!("undecodable tile: {e}")))?
        .to_rgba8();
    let (width, height) = image.dimensions();

    Ok(DecodedTile {
        size: [width as usize, height as usize],
        pixels: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 165, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageOutputFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_tile() {
        let tile = decode_tile("mem://tile.png", &png(2, 3)).unwrap();
        assert_eq!(tile.size, [2, 3]);
        assert_eq!(tile.pixels.len(), 2 * 3 * 4);
        assert_eq!(&tile.pixels[..4], &[255, 165, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_is_fetch_failure() {
        let err = decode_tile("mem://tile.png", b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, QuakeMapError::FetchFailure { .. }));
    }

    #[test]
    fn test_queue_dedups_and_reports_failures() {
        let layer = TileLayer::new("unreachable", "http://127.0.0.1:9/{z}/{x}/{y}.png");
        let mut loader = TileLoader::new(TileLoaderConfig {
            max_concurrent: 2,
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        let coord = TileCoord::new(1, 1, 2);

        assert!(loader.queue_tile(&layer, coord));
        assert!(!loader.queue_tile(&layer, coord));
        assert!(loader.is_pending(&coord));

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut results = Vec::new();
        while results.is_empty() && Instant::now() < deadline {
            results = loader.try_recv_results();
            thread::sleep(Duration::from_millis(20));
        }

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].coord, coord);
        assert!(results[0].data.is_err());
        assert_eq!(loader.pending_count(), 0);
    }
}
