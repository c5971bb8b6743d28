//! Digital encoding for biological sequences using an alphabet.

use std::fmt::Debug;

use generic_array::ArrayLength;
use typenum::consts::U4;
use typenum::marker_traits::NonZero;

use super::err::InvalidSymbol;

// --- Symbol ------------------------------------------------------------------

/// A symbol from a biological alphabet.
pub trait Symbol: Default + Sized + Copy + Eq + Debug {
    /// View this symbol as a zero-based index.
    fn as_index(&self) -> usize;
    /// View this symbol as a string character.
    fn as_char(&self) -> char {
        self.as_ascii() as char
    }
    /// Parse a string character into a symbol.
    fn from_char(c: char) -> Result<Self, InvalidSymbol> {
        if c.is_ascii() {
            Self::from_ascii(c as u8)
        } else {
            Err(InvalidSymbol(c))
        }
    }
    /// View this symbol as an ASCII charater.
    fn as_ascii(&self) -> u8;
    /// Parse an ASCII character into a symbol.
    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol>;
}

// --- Alphabet ----------------------------------------------------------------

/// A biological alphabet with associated metadata.
pub trait Alphabet: Debug + Copy + Default + Send + Sync + 'static {
    type Symbol: Symbol + Send + Sync + 'static;
    type K: ArrayLength + NonZero + Debug;

    /// Get all the symbols of this alphabet, in enumeration order.
    ///
    /// The position of a symbol in this slice is its index, and ties
    /// in majority votes are broken in favour of the earliest symbol.
    fn symbols() -> &'static [Self::Symbol];

    /// Get a string with all symbols from this alphabet.
    fn as_str() -> &'static str;
}

// --- DNA ---------------------------------------------------------------------

/// The DNA alphabet composed of the 4 deoxyribonucleotides.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dna;

impl Alphabet for Dna {
    type Symbol = Nucleotide;
    type K = U4;

    fn symbols() -> &'static [Nucleotide] {
        &[Nucleotide::A, Nucleotide::T, Nucleotide::G, Nucleotide::C]
    }

    fn as_str() -> &'static str {
        "ATGC"
    }
}

/// A deoxyribonucleotide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Nucleotide {
    /// Adenine.
    #[default]
    A = 0,
    /// Thymine.
    T = 1,
    /// Guanine.
    G = 2,
    /// Cytosine.
    C = 3,
}

impl From<Nucleotide> for char {
    fn from(n: Nucleotide) -> char {
        n.as_char()
    }
}

impl Symbol for Nucleotide {
    fn as_index(&self) -> usize {
        *self as usize
    }

    fn as_ascii(&self) -> u8 {
        match self {
            Nucleotide::A => b'A',
            Nucleotide::T => b'T',
            Nucleotide::G => b'G',
            Nucleotide::C => b'C',
        }
    }

    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol> {
        match c.to_ascii_uppercase() {
            b'A' => Ok(Nucleotide::A),
            b'T' => Ok(Nucleotide::T),
            b'G' => Ok(Nucleotide::G),
            b'C' => Ok(Nucleotide::C),
            _ => Err(InvalidSymbol(c as char)),
        }
    }
}
