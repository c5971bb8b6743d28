//! Parallel sweep of search runs over a range of motif widths.

use std::any::Any;
use std::iter::StepBy;
use std::ops::RangeInclusive;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use log::debug;
use log::info;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::abc::Alphabet;
use super::err::ConfigError;
use super::err::SweepError;
use super::search::search;
use super::search::Projection;
use super::search::SearchParams;
use super::search::SearchResult;
use super::seq::SequenceSet;

// --- SweepConfig -------------------------------------------------------------

/// The configuration of a parameter sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// The number of worker threads.
    pub jobs: usize,
    /// The smallest motif width, inclusive.
    pub min_width: usize,
    /// The largest motif width, inclusive.
    pub max_width: usize,
    /// The spacing between two consecutive widths.
    pub step: usize,
    /// The parameters of every search run.
    pub search: SearchParams,
    /// The seed of the base random number generator, or `None` to seed
    /// from the thread-local generator.
    pub seed: Option<u64>,
}

impl SweepConfig {
    /// Create a new configuration for widths `min_width..=max_width`.
    pub fn new(jobs: usize, min_width: usize, max_width: usize) -> Self {
        Self {
            jobs,
            min_width,
            max_width,
            step: 1,
            search: SearchParams::default(),
            seed: None,
        }
    }

    /// The widths of the sweep, in ascending order.
    pub fn widths(&self) -> StepBy<RangeInclusive<usize>> {
        (self.min_width..=self.max_width).step_by(self.step.max(1))
    }

    /// The number of widths of the sweep.
    pub fn width_count(&self) -> usize {
        match self.max_width.checked_sub(self.min_width) {
            Some(span) => span / self.step.max(1) + 1,
            None => 0,
        }
    }

    /// The largest width actually reached by the sweep.
    ///
    /// This can be smaller than `max_width` when the step does not divide
    /// the width range.
    pub fn last_width(&self) -> Option<usize> {
        let span = self.max_width.checked_sub(self.min_width)?;
        let step = self.step.max(1);
        Some(self.min_width + span / step * step)
    }

    /// Check the configuration against the sequences to search.
    pub fn validate<A: Alphabet>(&self, sequences: &SequenceSet<A>) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.min_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.min_width > self.max_width {
            return Err(ConfigError::InvalidRange {
                min: self.min_width,
                max: self.max_width,
            });
        }
        match self.last_width() {
            Some(width) => sequences.check_width(width),
            None => Ok(()),
        }
    }
}

// --- SweepTable --------------------------------------------------------------

/// The timing record appended to a sweep table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingRecord {
    /// The wall-clock duration of the sweep.
    pub elapsed: Duration,
    /// The smallest motif width of the sweep.
    pub min_width: usize,
    /// The largest motif width of the sweep.
    pub max_width: usize,
}

/// The results of a sweep, one per width in ascending order.
#[derive(Debug, Clone)]
pub struct SweepTable<A: Alphabet> {
    /// The projection used by every search run.
    pub projection: Projection,
    /// The number of sequences that were searched.
    pub sequences: usize,
    /// The seed of the base random number generator.
    pub seed: u64,
    /// The search results, in ascending width order.
    pub rows: Vec<SearchResult<A>>,
    /// The timing of the sweep.
    pub timing: TimingRecord,
}

impl<A: Alphabet> SweepTable<A> {
    /// The number of rows of the table, bookkeeping row included.
    pub fn len(&self) -> usize {
        self.rows.len() + 1
    }

    /// Check whether the table has no result row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// --- WorkerThread ------------------------------------------------------------

struct Job {
    index: usize,
    width: usize,
    rng: Xoshiro256PlusPlus,
}

type JobResult<A> = (usize, usize, Result<SearchResult<A>, String>);

/// The function running the search for a single width.
type Runner<A> = fn(
    &SequenceSet<A>,
    usize,
    SearchParams,
    Xoshiro256PlusPlus,
) -> Result<SearchResult<A>, ConfigError>;

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("worker panicked")
    }
}

struct WorkerThread<A: Alphabet> {
    r_job: Receiver<Job>,
    s_result: Sender<JobResult<A>>,
    sequences: Arc<SequenceSet<A>>,
    params: SearchParams,
    runner: Runner<A>,
    handle: Option<JoinHandle<()>>,
}

impl<A: Alphabet> WorkerThread<A> {
    fn new(
        r_job: Receiver<Job>,
        s_result: Sender<JobResult<A>>,
        sequences: Arc<SequenceSet<A>>,
        params: SearchParams,
        runner: Runner<A>,
    ) -> Self {
        Self {
            r_job,
            s_result,
            sequences,
            params,
            runner,
            handle: None,
        }
    }

    fn start(&mut self) {
        let r_job = self.r_job.clone();
        let s_result = self.s_result.clone();
        let sequences = self.sequences.clone();
        let params = self.params;
        let runner = self.runner;

        self.handle = Some(std::thread::spawn(move || {
            while let Ok(job) = r_job.recv() {
                let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    runner(&sequences, job.width, params, job.rng).map_err(|e| e.to_string())
                }))
                .unwrap_or_else(|payload| Err(panic_message(payload)));
                // the collector only hangs up after a failure
                if s_result.send((job.index, job.width, outcome)).is_err() {
                    break;
                }
            }
        }));
    }

    fn join(&mut self) -> std::thread::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

// --- Sweep -------------------------------------------------------------------

/// A sweep of independent search runs over a range of motif widths.
///
/// Runs are dispatched to a fixed-size pool of worker threads. Every run
/// owns its random number generator, which is a copy of a base
/// `Xoshiro256PlusPlus` generator advanced by one `jump` per run, so that
/// no two runs ever draw from overlapping streams.
#[derive(Debug, Clone)]
pub struct Sweep<A: Alphabet> {
    config: SweepConfig,
    sequences: Arc<SequenceSet<A>>,
}

impl<A: Alphabet> Sweep<A> {
    /// Create a new sweep, checking the configuration against the sequences.
    pub fn new(config: SweepConfig, sequences: Arc<SequenceSet<A>>) -> Result<Self, ConfigError> {
        config.validate(&sequences)?;
        Ok(Self { config, sequences })
    }

    /// The configuration of the sweep.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Run the sweep.
    pub fn run(&self) -> Result<SweepTable<A>, SweepError> {
        self.run_with(|_| ())
    }

    /// Run the sweep, calling `on_complete` each time a search run ends.
    ///
    /// Runs may complete in any order, but the rows of the returned table
    /// are always sorted by ascending width. A failing run aborts the
    /// whole sweep: pending runs are discarded and the error is returned
    /// once the running ones have finished.
    pub fn run_with<F>(&self, on_complete: F) -> Result<SweepTable<A>, SweepError>
    where
        F: FnMut(&SearchResult<A>),
    {
        self.dispatch(search::<Xoshiro256PlusPlus, A>, on_complete)
    }

    fn dispatch<F>(&self, runner: Runner<A>, mut on_complete: F) -> Result<SweepTable<A>, SweepError>
    where
        F: FnMut(&SearchResult<A>),
    {
        let start = Instant::now();
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        let widths = self.config.widths().collect::<Vec<_>>();
        let jobs = self.config.jobs.min(widths.len());
        info!(
            "Starting {} workers for {} widths ({}..={}, step {}, seed {})",
            jobs,
            widths.len(),
            self.config.min_width,
            self.config.max_width,
            self.config.step,
            seed
        );

        // create synchronization objects
        let (s_job, r_job) = crossbeam_channel::unbounded();
        let (s_result, r_result) = crossbeam_channel::unbounded();

        // submit every job before starting the pool
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        for (index, &width) in widths.iter().enumerate() {
            let job = Job {
                index,
                width,
                rng: rng.clone(),
            };
            rng.jump();
            if s_job.send(job).is_err() {
                unreachable!("job receiver is held by the sweep");
            }
        }
        drop(s_job);

        // start job pool
        let mut pool = (0..jobs)
            .map(|_| {
                let mut w = WorkerThread::new(
                    r_job.clone(),
                    s_result.clone(),
                    self.sequences.clone(),
                    self.config.search,
                    runner,
                );
                w.start();
                w
            })
            .collect::<Vec<_>>();
        drop(s_result);

        // collect results in submission order
        let mut rows: Vec<Option<SearchResult<A>>> = widths.iter().map(|_| None).collect();
        let mut failure = None;
        for _ in 0..widths.len() {
            match r_result.recv() {
                Ok((index, _, Ok(result))) => {
                    debug!("width {} completed", result.width);
                    on_complete(&result);
                    rows[index] = Some(result);
                }
                Ok((_, width, Err(message))) => {
                    failure = Some(SweepError::WorkerFailure { width, message });
                    break;
                }
                Err(_) => break,
            }
        }

        // discard pending jobs and wait for the pool
        if failure.is_some() {
            r_job.try_iter().for_each(drop);
        }
        drop(r_result);
        for worker in pool.iter_mut() {
            if let Err(payload) = worker.join() {
                if failure.is_none() {
                    failure = Some(SweepError::WorkerLost {
                        message: panic_message(payload),
                    });
                }
            }
        }
        if let Some(error) = failure {
            return Err(error);
        }

        let mut results = Vec::with_capacity(rows.len());
        for (row, &width) in rows.into_iter().zip(widths.iter()) {
            match row {
                Some(result) => results.push(result),
                None => {
                    return Err(SweepError::WorkerFailure {
                        width,
                        message: String::from("no result received"),
                    })
                }
            }
        }

        let elapsed = start.elapsed();
        info!("Sweep finished in {:.3}s", elapsed.as_secs_f64());
        Ok(SweepTable {
            projection: self.config.search.projection,
            sequences: self.sequences.len(),
            seed,
            rows: results,
            timing: TimingRecord {
                elapsed,
                min_width: self.config.min_width,
                max_width: self.config.max_width,
            },
        })
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::abc::Dna;

    fn sequences() -> Arc<SequenceSet<Dna>> {
        let set = SequenceSet::encode([
            "ATGCATGCATGG",
            "TTGACAGGCATC",
            "GGGCCCATATTA",
            "ACGTTGCAACGG",
        ])
        .unwrap()
        .unwrap();
        Arc::new(set)
    }

    #[test]
    fn test_widths() {
        let mut config = SweepConfig::new(2, 5, 11);
        assert_eq!(config.widths().collect::<Vec<_>>(), vec![5, 6, 7, 8, 9, 10, 11]);
        config.step = 3;
        assert_eq!(config.widths().collect::<Vec<_>>(), vec![5, 8, 11]);
        config.step = 4;
        assert_eq!(config.widths().collect::<Vec<_>>(), vec![5, 9]);
    }

    #[test]
    fn test_validate() {
        let seqs = sequences();
        assert!(SweepConfig::new(1, 2, 12).validate(&seqs).is_ok());
        assert_eq!(
            SweepConfig::new(0, 2, 4).validate(&seqs),
            Err(ConfigError::ZeroJobs)
        );
        assert_eq!(
            SweepConfig::new(1, 0, 4).validate(&seqs),
            Err(ConfigError::ZeroWidth)
        );
        assert_eq!(
            SweepConfig::new(1, 5, 4).validate(&seqs),
            Err(ConfigError::InvalidRange { min: 5, max: 4 })
        );
        assert!(matches!(
            SweepConfig::new(1, 5, 13).validate(&seqs),
            Err(ConfigError::WidthTooLarge { width: 13, .. })
        ));
        let mut config = SweepConfig::new(1, 2, 4);
        config.step = 0;
        assert_eq!(config.validate(&seqs), Err(ConfigError::ZeroStep));
        // 13 is never reached with a step of 10
        config.step = 10;
        config.max_width = 13;
        assert!(config.validate(&seqs).is_ok());
    }

    #[test]
    fn test_width_count() {
        assert_eq!(SweepConfig::new(1, 5, 7).width_count(), 3);
        let mut config = SweepConfig::new(1, 5, 11);
        config.step = 4;
        assert_eq!(config.width_count(), 2);
        assert_eq!(config.last_width(), Some(9));
        assert_eq!(SweepConfig::new(1, 5, 4).width_count(), 0);
        assert_eq!(SweepConfig::new(1, 5, 4).last_width(), None);
    }

    #[test]
    fn test_validate_huge_max_width() {
        let seqs = sequences();
        let start = Instant::now();
        let result = SweepConfig::new(1, 2, usize::MAX).validate(&seqs);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(matches!(
            result,
            Err(ConfigError::WidthTooLarge {
                width: usize::MAX,
                ..
            })
        ));
        let mut config = SweepConfig::new(1, 2, 2_000_000_001);
        config.step = 2;
        assert_eq!(config.last_width(), Some(2_000_000_000));
        assert!(matches!(
            config.validate(&seqs),
            Err(ConfigError::WidthTooLarge {
                width: 2_000_000_000,
                ..
            })
        ));
    }

    #[test]
    fn test_new_rejects_before_dispatch() {
        let config = SweepConfig::new(2, 3, 20);
        assert!(Sweep::new(config, sequences()).is_err());
    }

    #[test]
    fn test_run_seeded() {
        let mut config = SweepConfig::new(2, 3, 5);
        config.search = SearchParams::new(50, 50, Projection::Positions);
        config.seed = Some(42);
        let sweep = Sweep::new(config, sequences()).unwrap();
        let mut completed = Vec::new();
        let table = sweep.run_with(|r| completed.push(r.width)).unwrap();
        completed.sort();
        assert_eq!(completed, vec![3, 4, 5]);
        assert_eq!(table.seed, 42);
        assert_eq!(table.len(), 4);
        assert_eq!(table.sequences, 4);
        assert_eq!(
            table.rows.iter().map(|r| r.width).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );
        assert_eq!(table.timing.min_width, 3);
        assert_eq!(table.timing.max_width, 5);
    }

    static FAILING_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn failing_search(
        sequences: &SequenceSet<Dna>,
        width: usize,
        params: SearchParams,
        rng: Xoshiro256PlusPlus,
    ) -> Result<SearchResult<Dna>, ConfigError> {
        FAILING_CALLS.fetch_add(1, Ordering::SeqCst);
        match width {
            4 => panic!("injected failure"),
            w if w > 4 => std::thread::sleep(Duration::from_millis(50)),
            _ => (),
        }
        search(sequences, width, params, rng)
    }

    #[test]
    fn test_run_failure_aborts_sweep() {
        let mut config = SweepConfig::new(1, 3, 9);
        config.search = SearchParams::new(20, 20, Projection::Positions);
        config.seed = Some(1);
        let sweep = Sweep::new(config, sequences()).unwrap();
        let mut completed = Vec::new();
        let err = sweep
            .dispatch(failing_search, |r| completed.push(r.width))
            .unwrap_err();
        assert_eq!(completed, vec![3]);
        // width 5 may have started, the queued widths never do
        assert!(FAILING_CALLS.load(Ordering::SeqCst) <= 3);
        match err {
            SweepError::WorkerFailure { width, message } => {
                assert_eq!(width, 4);
                assert!(message.contains("injected failure"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    fn slow_small_search(
        sequences: &SequenceSet<Dna>,
        width: usize,
        params: SearchParams,
        rng: Xoshiro256PlusPlus,
    ) -> Result<SearchResult<Dna>, ConfigError> {
        let delay = 150 * (6 - width as u64);
        std::thread::sleep(Duration::from_millis(delay));
        search(sequences, width, params, rng)
    }

    #[test]
    fn test_rows_ordered_despite_completion_order() {
        let mut config = SweepConfig::new(3, 3, 5);
        config.search = SearchParams::new(20, 20, Projection::Consensus);
        config.seed = Some(2);
        let sweep = Sweep::new(config, sequences()).unwrap();
        let mut completed = Vec::new();
        let table = sweep
            .dispatch(slow_small_search, |r| completed.push(r.width))
            .unwrap();
        assert_eq!(completed, vec![5, 4, 3]);
        assert_eq!(
            table.rows.iter().map(|r| r.width).collect::<Vec<_>>(),
            vec![3, 4, 5]
        );
        // same seed, same rows, whatever the completion order
        assert_eq!(table.rows, sweep.run().unwrap().rows);
    }
}
