//! Count and frequency matrices built from aligned motif windows.

use super::abc::Alphabet;
use super::abc::Symbol;
use super::dense::DenseMatrix;
use super::err::InvalidData;
use super::seq::EncodedSequence;
use super::seq::SequenceSet;

// --- CountMatrix -------------------------------------------------------------

/// A matrix storing symbol occurences at each motif column.
#[derive(Clone, Debug)]
pub struct CountMatrix<A: Alphabet> {
    /// The alphabet of the count matrix.
    alphabet: std::marker::PhantomData<A>,
    /// The actual counts for each column of the motif.
    data: DenseMatrix<u32, A::K>,
    /// The number of windows from which this count matrix was obtained.
    n: u32,
}

impl<A: Alphabet> CountMatrix<A> {
    /// Create a new count matrix without checking the contents.
    fn new_unchecked(data: DenseMatrix<u32, A::K>, n: u32) -> Self {
        Self {
            alphabet: std::marker::PhantomData,
            n,
            data,
        }
    }

    /// Create a new count matrix from windows of `width` symbols.
    ///
    /// # Panics
    ///
    /// Panics if a window does not contain exactly `width` symbols.
    pub fn from_windows<'w, I>(windows: I, width: usize) -> Self
    where
        I: IntoIterator<Item = &'w [A::Symbol]>,
    {
        let mut data = DenseMatrix::<u32, A::K>::new(width);
        let mut n = 0;
        for window in windows {
            assert_eq!(window.len(), width);
            for (i, s) in window.iter().enumerate() {
                data[i][s.as_index()] += 1;
            }
            n += 1;
        }
        Self::new_unchecked(data, n)
    }

    /// Count the windows starting at `positions` in every sequence of `sequences`.
    ///
    /// The sequence at index `holdout`, if any, is left out of the counts.
    ///
    /// # Panics
    ///
    /// Panics if `positions` does not have one entry per sequence, or if a
    /// window runs past the end of its sequence.
    pub fn from_positions(
        sequences: &SequenceSet<A>,
        positions: &[usize],
        width: usize,
        holdout: Option<usize>,
    ) -> Self {
        assert_eq!(sequences.len(), positions.len());
        let windows = sequences
            .iter()
            .zip(positions)
            .enumerate()
            .filter(|&(i, _)| Some(i) != holdout)
            .map(|(_, (seq, &start))| seq.window(start, width));
        Self::from_windows(windows, width)
    }

    /// Build a probability matrix from this count matrix.
    ///
    /// Each column is normalized by the number of counted windows, so that
    /// frequencies in a column sum to one. Fails if no window was counted.
    pub fn to_freq(&self) -> Result<FrequencyMatrix<A>, InvalidData> {
        if self.n == 0 {
            return Err(InvalidData);
        }
        let total = self.n as f64;
        let mut probas = DenseMatrix::<f64, A::K>::new(self.data.rows());
        for (src, dst) in self.data.iter().zip(probas.iter_mut()) {
            for (x, y) in src.iter().zip(dst.iter_mut()) {
                *y = *x as f64 / total;
            }
        }
        Ok(FrequencyMatrix {
            alphabet: std::marker::PhantomData,
            data: probas,
        })
    }

    /// Get the consensus sequence by majority vote in each column.
    ///
    /// Ties are resolved in favour of the symbol coming first in the
    /// alphabet enumeration order.
    pub fn consensus(&self) -> EncodedSequence<A> {
        let symbols = A::symbols();
        self.data
            .iter()
            .map(|row| {
                let mut best = 0;
                for (j, &count) in row.iter().enumerate() {
                    if count > row[best] {
                        best = j;
                    }
                }
                symbols[best]
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// The motif width of the count matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Check whether the count matrix has no column.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The number of windows that were counted.
    #[inline]
    pub fn sequence_count(&self) -> u32 {
        self.n
    }

    /// The raw counts from the count matrix.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<u32, A::K> {
        &self.data
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<u32, A::K>> for CountMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<u32, A::K> {
        &self.data
    }
}

// --- FrequencyMatrix ---------------------------------------------------------

/// A matrix storing symbol frequencies at each motif column.
///
/// This is the column profile used to score candidate windows.
#[derive(Clone, Debug)]
pub struct FrequencyMatrix<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: DenseMatrix<f64, A::K>,
}

impl<A: Alphabet> FrequencyMatrix<A> {
    /// The motif width of the frequency matrix.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.rows()
    }

    /// Check whether the frequency matrix has no column.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.rows() == 0
    }

    /// The raw frequencies of the matrix.
    #[inline]
    pub fn matrix(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }

    /// Compute the propensity of the window starting at `start` in `seq`.
    ///
    /// The propensity is the product of the column frequencies of the
    /// symbols observed in the window.
    #[inline]
    pub fn propensity(&self, seq: &EncodedSequence<A>, start: usize) -> f64 {
        seq.window(start, self.len())
            .iter()
            .zip(self.data.iter())
            .map(|(s, row)| row[s.as_index()])
            .product()
    }

    /// Compute the propensities of every valid window start of `seq`.
    pub fn propensities(&self, seq: &EncodedSequence<A>) -> Vec<f64> {
        let mut out = Vec::new();
        self.propensities_into(seq, &mut out);
        out
    }

    /// Compute the propensities of every valid window start into a buffer.
    ///
    /// The buffer is cleared first, and ends up with one entry per start
    /// in `seq.starts(self.len())`.
    pub fn propensities_into(&self, seq: &EncodedSequence<A>, out: &mut Vec<f64>) {
        out.clear();
        out.extend(seq.starts(self.len()).map(|i| self.propensity(seq, i)));
    }
}

impl<A: Alphabet> AsRef<DenseMatrix<f64, A::K>> for FrequencyMatrix<A> {
    fn as_ref(&self) -> &DenseMatrix<f64, A::K> {
        &self.data
    }
}
