//! Storage for alphabet-encoded sequences and sequence collections.

use std::cmp::PartialEq;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::ops::Index;
use std::ops::Range;
use std::str::FromStr;

use super::abc::Alphabet;
use super::abc::Symbol;
use super::err::ConfigError;
use super::err::InvalidSymbol;

// --- EncodedSequence ---------------------------------------------------------

/// A biological sequence encoded with an alphabet.
#[derive(Clone, Debug)]
pub struct EncodedSequence<A: Alphabet> {
    alphabet: std::marker::PhantomData<A>,
    data: Vec<A::Symbol>,
}

impl<A: Alphabet> EncodedSequence<A> {
    /// Create a new encoded sequence.
    pub fn new(data: Vec<A::Symbol>) -> Self {
        Self {
            data,
            alphabet: std::marker::PhantomData,
        }
    }

    /// Create a new encoded sequence from a textual representation.
    ///
    /// Lowercase letters are folded to uppercase.
    pub fn encode(sequence: &str) -> Result<Self, InvalidSymbol> {
        sequence
            .chars()
            .map(A::Symbol::from_char)
            .collect::<Result<_, _>>()
            .map(Self::new)
    }

    /// Return the number of symbols in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate over the symbols in the sequence.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, A::Symbol> {
        self.data.iter()
    }

    /// The range of valid window starts for a motif of width `width`.
    ///
    /// The range is empty when the sequence is shorter than the motif.
    #[inline]
    pub fn starts(&self, width: usize) -> Range<usize> {
        0..(self.data.len() + 1).saturating_sub(width)
    }

    /// Get the window of `width` symbols starting at `start`.
    #[inline]
    pub fn window(&self, start: usize, width: usize) -> &[A::Symbol] {
        &self.data[start..start + width]
    }
}

impl<A: Alphabet> AsRef<EncodedSequence<A>> for EncodedSequence<A> {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl<A: Alphabet> AsRef<[<A as Alphabet>::Symbol]> for EncodedSequence<A> {
    fn as_ref(&self) -> &[<A as Alphabet>::Symbol] {
        self.data.as_slice()
    }
}

impl<A: Alphabet> Default for EncodedSequence<A> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<A: Alphabet> Display for EncodedSequence<A> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        for c in self.data.iter() {
            write!(f, "{}", c.as_char())?;
        }
        Ok(())
    }
}

impl<A: Alphabet> FromStr for EncodedSequence<A> {
    type Err = InvalidSymbol;
    fn from_str(seq: &str) -> Result<Self, Self::Err> {
        Self::encode(seq)
    }
}

impl<A: Alphabet> From<Vec<A::Symbol>> for EncodedSequence<A> {
    fn from(data: Vec<A::Symbol>) -> Self {
        Self::new(data)
    }
}

impl<A: Alphabet> Index<usize> for EncodedSequence<A> {
    type Output = A::Symbol;
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a, A: Alphabet> IntoIterator for &'a EncodedSequence<A> {
    type Item = &'a A::Symbol;
    type IntoIter = std::slice::Iter<'a, A::Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<A, S> PartialEq<S> for EncodedSequence<A>
where
    A: Alphabet,
    S: AsRef<[<A as Alphabet>::Symbol]>,
{
    fn eq(&self, other: &S) -> bool {
        self.data.as_slice() == other.as_ref()
    }
}

// --- SequenceSet -------------------------------------------------------------

/// An ordered, immutable collection of encoded sequences.
///
/// A sequence set is built once and then only ever read, so it can be
/// shared between concurrent search runs behind an `Arc`.
#[derive(Clone, Debug)]
pub struct SequenceSet<A: Alphabet> {
    sequences: Vec<EncodedSequence<A>>,
}

impl<A: Alphabet> SequenceSet<A> {
    /// Create a new sequence set from the given sequences.
    ///
    /// At least two sequences are required, since profiles are always built
    /// from every sequence but a held-out one.
    pub fn new(sequences: Vec<EncodedSequence<A>>) -> Result<Self, ConfigError> {
        match sequences.len() {
            0 => Err(ConfigError::EmptySequenceSet),
            1 => Err(ConfigError::SingleSequence),
            _ => Ok(Self { sequences }),
        }
    }

    /// Encode the given textual sequences into a new sequence set.
    pub fn encode<I>(sequences: I) -> Result<Result<Self, ConfigError>, InvalidSymbol>
    where
        I: IntoIterator,
        <I as IntoIterator>::Item: AsRef<str>,
    {
        sequences
            .into_iter()
            .map(|s| EncodedSequence::encode(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// The number of sequences in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Check whether the set is empty (never true for a valid set).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Iterate over the sequences of the set.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, EncodedSequence<A>> {
        self.sequences.iter()
    }

    /// The length of the shortest sequence of the set.
    pub fn min_len(&self) -> usize {
        self.sequences.iter().map(|s| s.len()).min().unwrap_or(0)
    }

    /// Check that a motif of the given width fits in every sequence.
    pub fn check_width(&self, width: usize) -> Result<(), ConfigError> {
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        match self.sequences.iter().position(|s| s.len() < width) {
            Some(i) => Err(ConfigError::WidthTooLarge {
                width,
                sequence: i,
                length: self.sequences[i].len(),
            }),
            None => Ok(()),
        }
    }
}

impl<A: Alphabet> AsRef<[EncodedSequence<A>]> for SequenceSet<A> {
    fn as_ref(&self) -> &[EncodedSequence<A>] {
        &self.sequences
    }
}

impl<A: Alphabet> Index<usize> for SequenceSet<A> {
    type Output = EncodedSequence<A>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.sequences[index]
    }
}

impl<'a, A: Alphabet> IntoIterator for &'a SequenceSet<A> {
    type Item = &'a EncodedSequence<A>;
    type IntoIter = std::slice::Iter<'a, EncodedSequence<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}
