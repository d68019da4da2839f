//! Background incremental loading of chart data from an archival store.
//!
//! One loader runs per topic. Its thread lists the record locations inside
//! the current time window, then visits them in coarse-to-fine [`Refinement`]
//! order, extracting one scalar per field path from each record and
//! publishing it through the [`SeriesSink`] seam. Window and path changes
//! arrive over a control channel; a change discards the in-flight traversal
//! and re-fetches the index.

mod refine;

pub use refine::Refinement;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, unbounded};
use log::{debug, warn};
use parking_lot::Mutex;

use crate::extract::FieldPath;
use crate::store::RecordStore;
use crate::view::Range;

/// Poll interval while idle (traversal exhausted, or no field paths yet).
const IDLE_POLL: Duration = Duration::from_millis(200);

/// Preset window lengths in seconds with their menu labels. `All` is the
/// negative sentinel selecting the full log extent.
pub const PERIODS: [(f64, &str); 18] = [
    (-1.0, "All"),
    (0.1, "100ms"),
    (0.2, "200ms"),
    (0.5, "500ms"),
    (1.0, "1s"),
    (2.0, "2s"),
    (5.0, "5s"),
    (10.0, "10s"),
    (15.0, "15s"),
    (30.0, "30s"),
    (60.0, "60s"),
    (90.0, "90s"),
    (120.0, "2min"),
    (300.0, "5min"),
    (600.0, "10min"),
    (1200.0, "20min"),
    (1800.0, "30min"),
    (3600.0, "1hr"),
];

/// Callback fired after each record's fields have been published.
pub type LoadListener = Box<dyn Fn() + Send>;

/// Destination for loaded points, keyed by series name.
///
/// Implemented by [`SharedChart`](crate::chart::SharedChart), which takes the
/// chart lock for the duration of a single insertion only.
pub trait SeriesSink {
    /// Insert one point into the named series.
    fn append(&self, series: &str, x: f64, y: f64);

    /// Drop the named series' points ahead of a reload.
    fn clear(&self, series: &str);
}

impl<K: SeriesSink + ?Sized> SeriesSink for Arc<K> {
    fn append(&self, series: &str, x: f64, y: f64) {
        (**self).append(series, x, y);
    }

    fn clear(&self, series: &str) {
        (**self).clear(series);
    }
}

/// The loader's target time window, in absolute seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadWindow {
    /// Window start timestamp.
    pub start: f64,
    /// Window end timestamp.
    pub end: f64,
}

impl LoadWindow {
    /// Window over `[start, end]`.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window of `period` seconds centered on the playhead, given as elapsed
    /// seconds past `reference`. A negative period selects `full`.
    pub fn around_playhead(reference: f64, playhead: f64, period: f64, full: LoadWindow) -> Self {
        if period < 0.0 {
            return full;
        }
        let start = reference + playhead - period / 2.0;
        Self::new(start, start + period)
    }

    /// The matching zoom range in chart coordinates (elapsed seconds past
    /// `reference`).
    pub fn zoom_range(&self, reference: f64) -> Range {
        Range::new(self.start - reference, self.end - reference)
    }
}

enum Command<M> {
    SetWindow(LoadWindow),
    SetPaths(Vec<FieldPath<M>>),
    AddListener(LoadListener),
    Stop,
}

/// Handle to the background loader for one topic.
///
/// The loader starts sampling as soon as it has a window and at least one
/// field path. Dropping the handle stops the thread and joins it.
pub struct IncrementalLoader<M> {
    commands: Sender<Command<M>>,
    handle: Option<JoinHandle<()>>,
}

impl<M: 'static> IncrementalLoader<M> {
    /// Spawn a loader over `topic`.
    ///
    /// `reference` is the fixed timestamp published x values are measured
    /// from (normally the log's start), keeping the time axis stable while
    /// the window tracks the playhead. The store is shared across loaders;
    /// its lock is held for one call at a time.
    pub fn spawn<S, K>(
        store: Arc<Mutex<S>>,
        topic: impl Into<String>,
        reference: f64,
        window: LoadWindow,
        sink: K,
    ) -> Self
    where
        S: RecordStore<Message = M> + Send + 'static,
        K: SeriesSink + Send + 'static,
    {
        let (commands, receiver) = unbounded();
        let worker = Worker {
            commands: receiver,
            store,
            topic: topic.into(),
            reference,
            sink,
            window,
            paths: Vec::new(),
            listeners: Vec::new(),
            locations: Vec::new(),
            traversal: Refinement::new(0),
            loaded: HashSet::new(),
            dirty: true,
        };
        let handle = std::thread::spawn(move || worker.run());
        Self {
            commands,
            handle: Some(handle),
        }
    }

    /// Retarget the time window. A changed window discards the in-flight
    /// traversal and reloads; an identical one is a no-op.
    pub fn set_window(&self, window: LoadWindow) {
        self.commands.send(Command::SetWindow(window)).ok();
    }

    /// Replace the extracted field paths. A path set with different names
    /// forces a reload; an identical set is a no-op.
    pub fn set_paths(&self, paths: Vec<FieldPath<M>>) {
        self.commands.send(Command::SetPaths(paths)).ok();
    }

    /// Register a callback fired after each loaded record, typically a
    /// repaint request.
    pub fn add_listener(&self, listener: impl Fn() + Send + 'static) {
        self.commands
            .send(Command::AddListener(Box::new(listener)))
            .ok();
    }

    /// Stop the loader and block until its thread has exited. No listener
    /// fires afterwards.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.commands.send(Command::Stop).ok();
            handle.join().ok();
        }
    }
}

impl<M> Drop for IncrementalLoader<M> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.commands.send(Command::Stop).ok();
            handle.join().ok();
        }
    }
}

struct Worker<S: RecordStore, K> {
    commands: Receiver<Command<S::Message>>,
    store: Arc<Mutex<S>>,
    topic: String,
    reference: f64,
    sink: K,

    window: LoadWindow,
    paths: Vec<FieldPath<S::Message>>,
    listeners: Vec<LoadListener>,

    locations: Vec<S::Location>,
    traversal: Refinement,
    loaded: HashSet<usize>,
    dirty: bool,
}

impl<S: RecordStore, K: SeriesSink> Worker<S, K> {
    fn run(mut self) {
        loop {
            loop {
                match self.commands.try_recv() {
                    Ok(command) => {
                        if self.apply(command) {
                            return;
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            if self.dirty {
                self.rebuild_index();
            }

            let next = if self.paths.is_empty() {
                None
            } else {
                self.next_index()
            };
            match next {
                Some(index) => self.load_record(index),
                // nothing to sample: block on the channel with a bounded poll
                None => match self.commands.recv_timeout(IDLE_POLL) {
                    Ok(command) => {
                        if self.apply(command) {
                            return;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => return,
                },
            }
        }
    }

    /// Apply one command; true means stop.
    fn apply(&mut self, command: Command<S::Message>) -> bool {
        match command {
            Command::SetWindow(window) => {
                if window != self.window {
                    self.window = window;
                    self.dirty = true;
                }
            }
            Command::SetPaths(paths) => {
                let new: HashSet<&str> = paths.iter().map(FieldPath::name).collect();
                let old: HashSet<&str> = self.paths.iter().map(FieldPath::name).collect();
                if new != old {
                    self.paths = paths;
                    self.dirty = true;
                }
            }
            Command::AddListener(listener) => self.listeners.push(listener),
            Command::Stop => return true,
        }
        false
    }

    /// Re-fetch the window's record index and restart the traversal. A store
    /// failure degrades to an empty window.
    fn rebuild_index(&mut self) {
        self.dirty = false;
        let listing = self.store.lock().list_records_in_window(
            &self.topic,
            self.window.start,
            self.window.end,
        );
        self.locations = match listing {
            Ok(locations) => locations,
            Err(err) => {
                warn!("{}: window listing failed, treating as empty: {err}", self.topic);
                Vec::new()
            }
        };
        self.traversal = Refinement::new(self.locations.len());
        self.loaded.clear();
        for path in &self.paths {
            self.sink.clear(path.name());
        }
    }

    /// Next unloaded index in refinement order; already-loaded indices are
    /// skipped without consuming a work slot.
    fn next_index(&mut self) -> Option<usize> {
        let loaded = &self.loaded;
        self.traversal.by_ref().find(|index| !loaded.contains(index))
    }

    fn load_record(&mut self, index: usize) {
        let record = self.store.lock().read_record(&self.locations[index]);
        self.loaded.insert(index);
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                debug!("{}: skipping record {index}: {err}", self.topic);
                return;
            }
        };

        let x = record.stamp - self.reference;
        for path in &self.paths {
            // a failing path skips this record; the other paths still publish
            if let Ok(y) = path.extract(&record.message) {
                self.sink.append(path.name(), x, y);
            }
        }

        for listener in &self.listeners {
            listener();
        }
    }
}
