//! Gibbs sampler moving one motif window at a time.

use std::ops::Deref;

use rand::distributions::Distribution;
use rand::distributions::Uniform;
use rand::Rng;
use rand_distr::WeightedError;
use rand_distr::WeightedIndex;

use super::abc::Alphabet;
use super::err::ConfigError;
use super::pwm::CountMatrix;
use super::pwm::FrequencyMatrix;
use super::seq::SequenceSet;

// --- PositionVector ----------------------------------------------------------

/// The start offset of the motif window in every sequence of a set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PositionVector(Vec<usize>);

impl Deref for PositionVector {
    type Target = [usize];
    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl AsRef<[usize]> for PositionVector {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for PositionVector {
    fn from(offsets: Vec<usize>) -> Self {
        Self(offsets)
    }
}

// --- sample_position ---------------------------------------------------------

/// Draw a window start with probability proportional to its propensity.
///
/// A uniform value is drawn in `[0, total)` and the first start whose
/// cumulative propensity exceeds it is returned, which is the same as
/// normalizing to a cumulative distribution and drawing in `[0, 1)`.
/// Returns `None` when all propensities are zero, i.e. when no candidate
/// window is compatible with the profile.
///
/// # Panics
///
/// Panics if a propensity is negative or not finite.
pub fn sample_position<R: Rng>(propensities: &[f64], rng: &mut R) -> Option<usize> {
    match WeightedIndex::<f64>::new(propensities) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(WeightedError::NoItem) | Err(WeightedError::AllWeightsZero) => None,
        Err(e) => panic!("invalid propensities {:?}: {}", propensities, e),
    }
}

// --- Sampler -----------------------------------------------------------------

/// A single Gibbs sampling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GibbsIteration {
    /// The index of the hold-out sequence.
    pub z: usize,
    /// The new window start of the hold-out sequence, if one was drawn.
    pub start: Option<usize>,
}

/// A Gibbs sampler over the window starts of a sequence set.
///
/// Each step builds a column profile from every sequence but a hold-out
/// one, scores every window of the hold-out sequence against it, and draws
/// a new start for the hold-out sequence. The next hold-out sequence is
/// then selected uniformly at random.
#[derive(Debug)]
pub struct Sampler<'a, R: Rng, A: Alphabet> {
    /// A reference to the sequences being aligned.
    sequences: &'a SequenceSet<A>,
    /// The random number generator.
    rng: R,
    /// The width of the motif being built.
    width: usize,
    /// The start positions of the motif in each sequence.
    positions: PositionVector,
    /// The hold-out sequence of the next step.
    holdout: usize,
    /// A buffer for the propensities of the hold-out sequence.
    propensities: Vec<f64>,
}

impl<'a, R: Rng, A: Alphabet> Sampler<'a, R, A> {
    /// Create a new sampler with random initial positions.
    pub fn new(sequences: &'a SequenceSet<A>, width: usize, mut rng: R) -> Result<Self, ConfigError> {
        sequences.check_width(width)?;
        let holdout = rng.sample(Uniform::new(0, sequences.len()));
        let positions = sequences
            .iter()
            .map(|seq| rng.sample(Uniform::new(0, seq.len() - width + 1)))
            .collect::<Vec<usize>>();
        Ok(Self {
            sequences,
            rng,
            width,
            holdout,
            positions: PositionVector(positions),
            propensities: Vec::new(),
        })
    }

    /// The width of the motif being built.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The current window starts.
    #[inline]
    pub fn positions(&self) -> &PositionVector {
        &self.positions
    }

    /// Build the column profile of every sequence but `z`.
    pub fn profile(&self, z: usize) -> FrequencyMatrix<A> {
        let counts = CountMatrix::from_positions(self.sequences, &self.positions, self.width, Some(z));
        match counts.to_freq() {
            Ok(profile) => profile,
            Err(_) => unreachable!("sequence sets always contain at least two sequences"),
        }
    }

    fn select_holdout(&mut self) -> usize {
        self.rng.sample(Uniform::new(0, self.positions.len()))
    }

    /// Run a single sampling step.
    pub fn step(&mut self) -> GibbsIteration {
        let z = self.holdout;
        let profile = self.profile(z);
        profile.propensities_into(&self.sequences[z], &mut self.propensities);
        let start = sample_position(&self.propensities, &mut self.rng);
        if let Some(i) = start {
            self.positions.0[z] = i;
        }
        self.holdout = self.select_holdout();
        GibbsIteration { z, start }
    }
}

impl<'a, R: Rng, A: Alphabet> Iterator for Sampler<'a, R, A> {
    type Item = GibbsIteration;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.step())
    }
}
