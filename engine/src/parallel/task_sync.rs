//! Task Synchronization

use super::barrier::*;
use super::tile::*;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Hands out the tiles of one sampling pass to worker threads and provides
/// the two per-pass barriers along with the shared abort flag.
pub struct TaskSynchronizer {
    /// Tile edge length in pixels.
    tile_size: usize,

    /// The tiles of the current image.
    tiles: ArcSwap<Vec<RenderTile>>,

    /// Index of the next unclaimed tile.
    next_tile: AtomicUsize,

    /// Cooperative cancellation flag.
    abort: AtomicBool,

    /// Barrier workers meet at before rendering a pass.
    pre_render: AbortableBarrier,

    /// Barrier workers meet at after rendering a pass.
    post_render: AbortableBarrier,
}

impl TaskSynchronizer {
    /// Create a new `TaskSynchronizer` with no tiles.
    ///
    /// * `tile_size` - Tile edge length in pixels.
    pub fn new(tile_size: usize) -> Self {
        Self {
            tile_size,
            tiles: ArcSwap::from_pointee(vec![]),
            next_tile: AtomicUsize::new(0),
            abort: AtomicBool::new(false),
            pre_render: AbortableBarrier::new(1),
            post_render: AbortableBarrier::new(1),
        }
    }

    /// Partition the image into tiles, make them all available and reset the
    /// barriers for `thread_count` workers. Workers must not be running.
    ///
    /// * `width`        - Image width in pixels.
    /// * `height`       - Image height in pixels.
    /// * `thread_count` - Number of workers meeting at the barriers.
    pub fn init(&self, width: usize, height: usize, thread_count: usize) {
        let tiles = partition_tiles(width, height, self.tile_size);
        debug!(
            "Partitioned {}x{} image into {} tiles of {}x{}",
            width,
            height,
            tiles.len(),
            self.tile_size,
            self.tile_size
        );

        self.tiles.store(Arc::new(tiles));
        self.next_tile.store(0, Ordering::Release);
        self.pre_render.reset(thread_count);
        self.post_render.reset(thread_count);
    }

    /// Claim the next unrendered tile. Returns `None` once every tile of the
    /// pass was claimed or abort is set.
    pub fn get_next_task(&self) -> Option<RenderTile> {
        if self.aborted() {
            return None;
        }
        let index = self.next_tile.fetch_add(1, Ordering::AcqRel);
        self.tiles.load().get(index).copied()
    }

    /// Make every tile available again for the next pass. Called by the
    /// leader after the post-render barrier.
    pub fn reset_tasks(&self) {
        self.next_tile.store(0, Ordering::Release);
    }

    /// Set or clear the abort flag. Setting it wakes threads waiting at
    /// either barrier.
    ///
    /// * `abort` - The new flag value.
    pub fn set_abort(&self, abort: bool) {
        self.abort.store(abort, Ordering::Release);
        if abort {
            self.pre_render.wake_all();
            self.post_render.wake_all();
        }
    }

    /// Returns true if rendering was aborted.
    pub fn aborted(&self) -> bool {
        self.abort.load(Ordering::Acquire)
    }

    /// Wait until every worker is ready to render the pass. Returns `false`
    /// if the wait was abandoned because of abort.
    ///
    /// * `thread_id` - The calling worker.
    pub fn sync_threads_pre_render(&self, thread_id: usize) -> bool {
        let passed = self.pre_render.wait(&self.abort);
        if !passed {
            debug!("Worker {} left pre-render barrier on abort", thread_id);
        }
        passed
    }

    /// Wait until every worker finished rendering the pass. Returns `false`
    /// if the wait was abandoned because of abort.
    ///
    /// * `thread_id` - The calling worker.
    pub fn sync_threads_post_render(&self, thread_id: usize) -> bool {
        let passed = self.post_render.wait(&self.abort);
        if !passed {
            debug!("Worker {} left post-render barrier on abort", thread_id);
        }
        passed
    }

    /// Returns the tile edge length in pixels.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Returns the number of tiles per pass.
    pub fn tile_count(&self) -> usize {
        self.tiles.load().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn concurrent_claims_hand_out_each_tile_once() {
        let sync = Arc::new(TaskSynchronizer::new(8));
        sync.init(100, 60, 4);
        let expected = sync.tile_count();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sync = Arc::clone(&sync);
                thread::spawn(move || {
                    let mut claimed = vec![];
                    while let Some(tile) = sync.get_next_task() {
                        claimed.push(tile);
                    }
                    claimed
                })
            })
            .collect();

        let mut all = vec![];
        for h in handles {
            all.extend(h.join().unwrap());
        }
        assert_eq!(all.len(), expected);
        let unique: HashSet<_> = all.iter().map(|t| (t.min_x, t.min_y)).collect();
        assert_eq!(unique.len(), expected);
    }

    #[test]
    fn reset_tasks_restores_all_tiles() {
        let sync = TaskSynchronizer::new(16);
        sync.init(32, 32, 1);
        while sync.get_next_task().is_some() {}
        sync.reset_tasks();
        assert_eq!(std::iter::from_fn(|| sync.get_next_task()).count(), 4);
    }

    #[test]
    fn abort_stops_handing_out_tiles() {
        let sync = TaskSynchronizer::new(16);
        sync.init(64, 64, 2);
        assert!(sync.get_next_task().is_some());
        sync.set_abort(true);
        assert!(sync.get_next_task().is_none());
        assert!(!sync.sync_threads_pre_render(0));
        sync.set_abort(false);
        assert!(sync.get_next_task().is_some());
    }
}
