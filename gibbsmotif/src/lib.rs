#![doc = include_str!("../README.md")]

extern crate generic_array;
extern crate typenum;

pub mod abc;
pub mod dense;
pub mod err;
pub mod pwm;
pub mod sampler;
pub mod search;
pub mod seq;
pub mod sweep;
pub mod tally;

pub use abc::Alphabet;
pub use abc::Dna;
pub use abc::Nucleotide;
pub use abc::Symbol;
pub use dense::DenseMatrix;
pub use err::ConfigError;
pub use err::InvalidData;
pub use err::InvalidSymbol;
pub use err::SweepError;
pub use pwm::CountMatrix;
pub use pwm::FrequencyMatrix;
pub use sampler::PositionVector;
pub use sampler::Sampler;
pub use search::GibbsSearch;
pub use search::Projection;
pub use search::RunOutcome;
pub use search::SearchParams;
pub use search::SearchResult;
pub use seq::EncodedSequence;
pub use seq::SequenceSet;
pub use sweep::Sweep;
pub use sweep::SweepConfig;
pub use sweep::SweepTable;
pub use sweep::TimingRecord;
pub use tally::TallyTable;
