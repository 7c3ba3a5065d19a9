//! Raster tile plumbing: URL templates, a bounded cache and a small pool of
//! download workers.
//!
//! Workers only move bytes. Decoding into FLTK images happens on the UI
//! thread when the `TileLoaded` message is dispatched, since FLTK images are
//! not `Send`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::app::domain::layer::TileSource;
use crate::app::domain::messages::Message;
use crate::app::infrastructure::http::TileClient;
use super::projection::TileKey;

/// Fill `{s}`, `{z}`, `{x}` and `{y}` of a tile URL template. The subdomain
/// is picked from the tile position so a tile always maps to the same host.
pub fn expand_template(source: &TileSource, z: u8, x: u32, y: u32) -> String {
    let subdomain = if source.subdomains.is_empty() {
        ""
    } else {
        source.subdomains[(x as usize + y as usize) % source.subdomains.len()]
    };
    source
        .url_template
        .replace("{s}", subdomain)
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

/// Bounded least-recently-used cache of decoded tiles, plus the keys whose
/// download failed so they are not requested on every redraw. Both hold at
/// most `capacity` keys; the oldest failure is forgotten first and may be
/// retried.
pub struct TileCache<T> {
    capacity: usize,
    entries: HashMap<TileKey, T>,
    order: VecDeque<TileKey>,
    failed: HashSet<TileKey>,
    failed_order: VecDeque<TileKey>,
}

impl<T> TileCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            failed: HashSet::new(),
            failed_order: VecDeque::new(),
        }
    }

    pub fn get(&mut self, key: &TileKey) -> Option<&T> {
        if self.entries.contains_key(key) {
            self.touch(key);
        }
        self.entries.get(key)
    }

    /// Like `get`, for tiles that need `&mut` to draw.
    pub fn get_mut(&mut self, key: &TileKey) -> Option<&mut T> {
        if self.entries.contains_key(key) {
            self.touch(key);
        }
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: TileKey, tile: T) {
        if self.failed.remove(&key) {
            self.failed_order.retain(|k| *k != key);
        }
        if self.entries.insert(key, tile).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn mark_failed(&mut self, key: TileKey) {
        if !self.failed.insert(key) {
            return;
        }
        self.failed_order.push_back(key);
        while self.failed.len() > self.capacity {
            match self.failed_order.pop_front() {
                Some(oldest) => {
                    self.failed.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn is_failed(&self, key: &TileKey) -> bool {
        self.failed.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &TileKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(*key);
    }
}

/// Where workers deliver finished downloads.
pub type TileSink = Arc<dyn Fn(Message) + Send + Sync>;

struct TileRequest {
    key: TileKey,
    url: String,
}

/// Keys the map still wants. Workers skip queued requests outside it.
type WantedTiles = Arc<Mutex<HashSet<TileKey>>>;

/// Fixed pool of download threads fed through a channel.
pub struct TileFetcher {
    requests: Option<mpsc::Sender<TileRequest>>,
    workers: Vec<JoinHandle<()>>,
    in_flight: HashSet<TileKey>,
    wanted: WantedTiles,
}

impl TileFetcher {
    pub fn new(client: Arc<dyn TileClient>, worker_count: usize, sink: TileSink) -> Self {
        let (tx, rx) = mpsc::channel::<TileRequest>();
        let rx = Arc::new(Mutex::new(rx));
        let wanted: WantedTiles = Arc::new(Mutex::new(HashSet::new()));

        let workers = (0..worker_count.max(1))
            .filter_map(|i| {
                let rx = Arc::clone(&rx);
                let client = Arc::clone(&client);
                let sink = Arc::clone(&sink);
                let wanted = Arc::clone(&wanted);
                thread::Builder::new()
                    .name(format!("tile-worker-{i}"))
                    .spawn(move || worker_loop(rx, client, sink, wanted))
                    .map_err(|e| warn!("Failed to spawn tile worker: {}", e))
                    .ok()
            })
            .collect();

        Self {
            requests: Some(tx),
            workers,
            in_flight: HashSet::new(),
            wanted,
        }
    }

    /// Queue a download unless one is already pending for `key`.
    /// Returns true when a new request was queued.
    pub fn request(&mut self, key: TileKey, url: String) -> bool {
        if self.in_flight.contains(&key) {
            return false;
        }
        let Some(tx) = self.requests.as_ref() else {
            return false;
        };
        if let Ok(mut wanted) = self.wanted.lock() {
            wanted.insert(key);
        }
        if tx.send(TileRequest { key, url }).is_err() {
            warn!("Tile workers are gone, dropping request for {:?}", key);
            return false;
        }
        self.in_flight.insert(key);
        true
    }

    /// Forget a pending key once its result has been dispatched.
    pub fn complete(&mut self, key: &TileKey) {
        self.in_flight.remove(key);
        if let Ok(mut wanted) = self.wanted.lock() {
            wanted.remove(key);
        }
    }

    /// Cancel queued requests for tiles outside `visible`. A download that a
    /// worker already started still completes. Returns how many pending
    /// requests were dropped.
    pub fn retain_visible(&mut self, visible: &HashSet<TileKey>) -> usize {
        let before = self.in_flight.len();
        self.in_flight.retain(|k| visible.contains(k));
        if let Ok(mut wanted) = self.wanted.lock() {
            wanted.retain(|k| visible.contains(k));
        }
        let dropped = before - self.in_flight.len();
        if dropped > 0 {
            debug!(dropped, "stale tile requests cancelled");
        }
        dropped
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }
}

impl Drop for TileFetcher {
    fn drop(&mut self) {
        // Closing the channel ends every worker loop.
        self.requests.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    rx: Arc<Mutex<mpsc::Receiver<TileRequest>>>,
    client: Arc<dyn TileClient>,
    sink: TileSink,
    wanted: WantedTiles,
) {
    loop {
        let next = match rx.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => return,
        };
        let Ok(TileRequest { key, url }) = next else {
            return;
        };
        if !wanted.lock().map(|w| w.contains(&key)).unwrap_or(true) {
            debug!(?key, "skipping tile that left the view");
            continue;
        }
        match client.get(&url) {
            Ok(bytes) => {
                debug!(?key, "tile ready");
                sink(Message::TileLoaded(key, bytes));
            }
            Err(e) => {
                warn!(url = %url, "Tile download failed: {}", e);
                sink(Message::TileFailed(key));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::layer::{STREET_TILES, TOPO_TILES};
    use crate::app::infrastructure::error::{AppError, Result};
    use std::time::Duration;

    fn key(x: u32) -> TileKey {
        TileKey {
            source: "osm",
            z: 3,
            x,
            y: 2,
        }
    }

    #[test]
    fn test_expand_template() {
        assert_eq!(
            expand_template(&STREET_TILES, 3, 5, 2),
            "https://b.tile.openstreetmap.org/3/5/2.png"
        );
        assert_eq!(
            expand_template(&TOPO_TILES, 4, 0, 0),
            "https://a.tile.opentopomap.org/4/0/0.png"
        );
    }

    #[test]
    fn test_expand_template_without_subdomains() {
        let source = TileSource {
            subdomains: &[],
            url_template: "https://tiles.example/{z}/{x}/{y}.png",
            ..STREET_TILES
        };
        assert_eq!(expand_template(&source, 1, 1, 0), "https://tiles.example/1/1/0.png");
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let mut cache = TileCache::new(2);
        cache.insert(key(1), "one");
        cache.insert(key(2), "two");
        assert_eq!(cache.get(&key(1)), Some(&"one"));
        cache.insert(key(3), "three");
        assert!(cache.contains(&key(1)));
        assert!(!cache.contains(&key(2)));
        assert!(cache.contains(&key(3)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_failed_keys_are_bounded() {
        let mut cache: TileCache<u8> = TileCache::new(2);
        cache.mark_failed(key(1));
        cache.mark_failed(key(2));
        cache.mark_failed(key(2));
        cache.mark_failed(key(3));
        assert!(!cache.is_failed(&key(1)));
        assert!(cache.is_failed(&key(2)));
        assert!(cache.is_failed(&key(3)));

        cache.insert(key(2), 2);
        cache.mark_failed(key(4));
        assert!(cache.is_failed(&key(3)));
        assert!(cache.is_failed(&key(4)));
    }

    #[test]
    fn test_cache_failed_keys_cleared_on_insert() {
        let mut cache: TileCache<u8> = TileCache::new(4);
        cache.mark_failed(key(7));
        assert!(cache.is_failed(&key(7)));
        cache.insert(key(7), 1);
        assert!(!cache.is_failed(&key(7)));
        assert!(!cache.is_empty());
    }

    struct CannedClient;

    impl TileClient for CannedClient {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            if url.contains("/9/") {
                Err(AppError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                })
            } else {
                Ok(url.as_bytes().to_vec())
            }
        }
    }

    fn fetcher() -> (TileFetcher, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let sink: TileSink = Arc::new(move |msg| {
            let _ = tx.lock().unwrap().send(msg);
        });
        (TileFetcher::new(Arc::new(CannedClient), 2, sink), rx)
    }

    #[test]
    fn test_fetcher_delivers_bytes() {
        let (mut fetcher, rx) = fetcher();
        assert!(fetcher.request(key(1), "https://a.test/3/1/2.png".to_string()));
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Message::TileLoaded(k, bytes) => {
                assert_eq!(k, key(1));
                assert_eq!(bytes, b"https://a.test/3/1/2.png".to_vec());
                fetcher.complete(&k);
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert_eq!(fetcher.pending(), 0);
    }

    #[test]
    fn test_fetcher_reports_failures() {
        let (_fetcher_guard, rx) = {
            let (mut f, rx) = fetcher();
            f.request(key(9), "https://a.test/9/9/9.png".to_string());
            (f, rx)
        };
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Message::TileFailed(k) if k == key(9)
        ));
    }

    #[test]
    fn test_fetcher_deduplicates_pending_requests() {
        let (mut fetcher, _rx) = fetcher();
        assert!(fetcher.request(key(4), "https://a.test/3/4/2.png".to_string()));
        assert!(!fetcher.request(key(4), "https://a.test/3/4/2.png".to_string()));
        assert_eq!(fetcher.pending(), 1);
    }

    /// Holds every download until the test lets it through.
    struct GatedClient {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl TileClient for GatedClient {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.gate.lock().unwrap().recv().unwrap();
            Ok(url.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_fetcher_skips_tiles_that_left_the_view() {
        let (gate_tx, gate_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let sink: TileSink = Arc::new(move |msg| {
            let _ = tx.lock().unwrap().send(msg);
        });
        let client = Arc::new(GatedClient {
            gate: Mutex::new(gate_rx),
        });
        let mut fetcher = TileFetcher::new(client, 1, sink);

        for x in 1..=3 {
            assert!(fetcher.request(key(x), format!("https://a.test/3/{x}/2.png")));
        }
        let visible: HashSet<TileKey> = [key(1), key(3)].into_iter().collect();
        assert_eq!(fetcher.retain_visible(&visible), 1);
        assert_eq!(fetcher.pending(), 2);

        for _ in 0..3 {
            gate_tx.send(()).unwrap();
        }
        let mut loaded = Vec::new();
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Message::TileLoaded(k, _) => loaded.push(k),
                other => panic!("unexpected message {:?}", other),
            }
        }
        assert_eq!(loaded, vec![key(1), key(3)]);
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
