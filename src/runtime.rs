//! Background loading
//!
//! The UI thread never waits on the network: [`spawn_load`] runs the feed
//! pipeline on its own thread with a current-thread tokio runtime and hands the
//! finished [`QuakeMap`] back over a channel the UI polls once per frame.

use crate::{
    core::{config::QuakeMapConfig, map::QuakeMap},
    data::feed::FeedSource,
    QuakeMapError, Result,
};
use crossbeam_channel::{Receiver, TryRecvError};
use std::thread;

/// Pending result of a background load
pub struct LoadHandle {
    rx: Receiver<Result<QuakeMap>>,
}

impl LoadHandle {
    /// Takes the result if the load has finished
    pub fn try_take(&self) -> Option<Result<QuakeMap>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(QuakeMapError::Runtime(
                "loader thread exited without a result".to_string(),
            ))),
        }
    }

    /// Blocks until the load finishes
    pub fn wait(self) -> Result<QuakeMap> {
        self.rx.recv().unwrap_or_else(|_| {
            Err(QuakeMapError::Runtime(
                "loader thread exited without a result".to_string(),
            ))
        })
    }
}

/// Runs `QuakeMap::load` on a dedicated thread
pub fn spawn_load<F>(source: F, config: QuakeMapConfig) -> LoadHandle
where
    F: FeedSource + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);

    thread::spawn(move || {
        let result = block_on_load(&source, config);
        if tx.send(result).is_err() {
            log::debug!("load finished after its handle was dropped");
        }
    });

    LoadHandle { rx }
}

/// Runs `QuakeMap::load` to completion on the current thread
pub fn block_on_load<F>(source: &F, config: QuakeMapConfig) -> Result<QuakeMap>
where
    F: FeedSource + ?Sized,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| QuakeMapError::Runtime(format!("async runtime unavailable: {e}")))?;
    runtime.block_on(QuakeMap::load(source, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::StaticFeedSource;

    #[test]
    fn test_spawn_load_delivers_map() {
        let config = QuakeMapConfig::default().with_plates_url(None);
        let source = StaticFeedSource::new().with_feed(
            config.earthquake_feed_url(),
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"mag": 3.1, "place": "Ridgecrest"},
                 "geometry": {"type": "Point", "coordinates": [-117.6, 35.7, 8.0]}}
            ]}"#,
        );

        let map = spawn_load(source, config).wait().unwrap();
        assert_eq!(map.registry().len(), 1);
        assert!(map.scale().is_degenerate());
    }

    #[test]
    fn test_spawn_load_reports_fetch_failure() {
        let handle = spawn_load(StaticFeedSource::new(), QuakeMapConfig::default());
        let err = handle.wait().err().unwrap();
        assert!(matches!(err, QuakeMapError::FetchFailure { .. }));
    }
}
