//! Gibbs search run for a single motif width.
//!
//! A run goes through a burn-in phase, during which the sampler is only
//! left to converge, and a recording phase, during which every successful
//! update is tallied. The most frequently recorded configuration is the
//! result of the run.

use log::debug;
use log::warn;
use rand::Rng;

use super::abc::Alphabet;
use super::err::ConfigError;
use super::pwm::CountMatrix;
use super::sampler::PositionVector;
use super::sampler::Sampler;
use super::seq::EncodedSequence;
use super::seq::SequenceSet;
use super::tally::TallyTable;

// --- Parameters --------------------------------------------------------------

/// The final projection of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Report the window start in every sequence.
    Positions,
    /// Report the consensus motif of the aligned windows.
    #[default]
    Consensus,
}

/// Parameters of a single search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// The number of burn-in iterations.
    pub burn_in: usize,
    /// The number of recording iterations.
    pub recording: usize,
    /// The projection of the winning configuration.
    pub projection: Projection,
}

impl SearchParams {
    /// Create new search parameters.
    pub fn new(burn_in: usize, recording: usize, projection: Projection) -> Self {
        Self {
            burn_in,
            recording,
            projection,
        }
    }

    /// The long run profile, with 200,000 burn-in and 100,000 recording iterations.
    pub fn standard() -> Self {
        Self::new(200_000, 100_000, Projection::Consensus)
    }

    /// The short run profile, with 50,000 burn-in and 50,000 recording iterations.
    pub fn fast() -> Self {
        Self::new(50_000, 50_000, Projection::Consensus)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::standard()
    }
}

// --- SearchResult ------------------------------------------------------------

/// The outcome of a search run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome<A: Alphabet> {
    /// The most frequent window starts.
    Positions(PositionVector),
    /// The consensus motif of the most frequent window starts.
    Consensus(EncodedSequence<A>),
    /// No update succeeded during the recording phase.
    Degenerate,
}

impl<A: Alphabet> RunOutcome<A> {
    /// Check whether the run ended without any recorded configuration.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, RunOutcome::Degenerate)
    }
}

/// The result of a search run, with some statistics about the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<A: Alphabet> {
    /// The motif width of the run.
    pub width: usize,
    /// The projected outcome of the run.
    pub outcome: RunOutcome<A>,
    /// The number of distinct configurations recorded.
    pub distinct: usize,
    /// The number of times the winning configuration was recorded.
    pub best_count: usize,
    /// The number of successful updates during the recording phase.
    pub updates: usize,
}

// --- GibbsSearch -------------------------------------------------------------

/// The phase a search run is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    BurnIn,
    Recording,
    Finalizing,
}

/// The state of a search run.
///
/// The state is owned by the run and moved through each phase, so a
/// burn-in can only happen before recording, and recording only before
/// the result is extracted.
#[derive(Debug)]
pub struct GibbsSearch<'a, R: Rng, A: Alphabet> {
    sequences: &'a SequenceSet<A>,
    sampler: Sampler<'a, R, A>,
    tally: TallyTable,
    params: SearchParams,
    phase: Phase,
    updates: usize,
}

impl<'a, R: Rng, A: Alphabet> GibbsSearch<'a, R, A> {
    /// Initialize a new search run with random window starts.
    pub fn new(
        sequences: &'a SequenceSet<A>,
        width: usize,
        params: SearchParams,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let sampler = Sampler::new(sequences, width, rng)?;
        Ok(Self {
            sequences,
            sampler,
            params,
            tally: TallyTable::new(),
            phase: Phase::BurnIn,
            updates: 0,
        })
    }

    /// The current phase of the run.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current window starts of the run.
    #[inline]
    pub fn positions(&self) -> &PositionVector {
        self.sampler.positions()
    }

    /// The configurations recorded so far.
    #[inline]
    pub fn tally(&self) -> &TallyTable {
        &self.tally
    }

    /// Run the burn-in phase.
    pub fn burn_in(mut self) -> Self {
        debug_assert_eq!(self.phase, Phase::BurnIn);
        let n = self.sampler.by_ref().take(self.params.burn_in).count();
        debug!(
            "width {}: burn-in finished after {} iterations",
            self.sampler.width(),
            n
        );
        self.phase = Phase::Recording;
        self
    }

    /// Run the recording phase.
    pub fn record(mut self) -> Self {
        debug_assert_eq!(self.phase, Phase::Recording);
        for _ in 0..self.params.recording {
            if self.sampler.step().start.is_some() {
                self.tally.record(self.sampler.positions());
                self.updates += 1;
            }
        }
        debug!(
            "width {}: recorded {} updates over {} distinct configurations",
            self.sampler.width(),
            self.updates,
            self.tally.len()
        );
        self.phase = Phase::Finalizing;
        self
    }

    /// Extract the result of the run.
    pub fn finish(self) -> SearchResult<A> {
        let width = self.sampler.width();
        let (outcome, best_count) = match self.tally.best() {
            None => {
                warn!("width {}: no configuration recorded", width);
                (RunOutcome::Degenerate, 0)
            }
            Some((best, count)) => {
                let outcome = match self.params.projection {
                    Projection::Positions => RunOutcome::Positions(best.clone()),
                    Projection::Consensus => RunOutcome::Consensus(
                        CountMatrix::from_positions(self.sequences, best, width, None).consensus(),
                    ),
                };
                (outcome, count)
            }
        };
        SearchResult {
            width,
            outcome,
            best_count,
            distinct: self.tally.len(),
            updates: self.updates,
        }
    }

    /// Run all the phases and extract the result.
    pub fn run(self) -> SearchResult<A> {
        self.burn_in().record().finish()
    }
}

/// Run a complete search for motifs of the given width.
pub fn search<R: Rng, A: Alphabet>(
    sequences: &SequenceSet<A>,
    width: usize,
    params: SearchParams,
    rng: R,
) -> Result<SearchResult<A>, ConfigError> {
    GibbsSearch::new(sequences, width, params, rng).map(GibbsSearch::run)
}
