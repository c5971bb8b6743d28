//! Reader implementation for plain text sequence files.
//!
//! Sequence files contain one sequence per line. Only the first
//! whitespace-delimited token of a line is read, anything after it is
//! ignored:
//! ```text
//! TTGACATATAATGC   promoter-1
//! GCTTGACATATAAT   promoter-2
//! ```
//! Symbols are case-insensitive, and blank lines are skipped.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use gibbsmotif::abc::Alphabet;
use gibbsmotif::seq::EncodedSequence;
use gibbsmotif::seq::SequenceSet;
use log::debug;

use crate::error::Error;

mod parse;

// ---

/// An iterator over the sequences of a sequence file.
pub struct Reader<B: BufRead, A: Alphabet> {
    buffer: String,
    bufread: B,
    line: usize,
    _alphabet: std::marker::PhantomData<A>,
}

impl<B: BufRead, A: Alphabet> Reader<B, A> {
    pub fn new(reader: B) -> Self {
        Self {
            bufread: reader,
            buffer: String::new(),
            line: 0,
            _alphabet: std::marker::PhantomData,
        }
    }

    /// The number of lines read so far.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<B: BufRead, A: Alphabet> Iterator for Reader<B, A> {
    type Item = Result<EncodedSequence<A>, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        // advance to first line with content
        loop {
            self.buffer.clear();
            match self.bufread.read_line(&mut self.buffer) {
                Err(e) => return Some(Err(Error::from(e))),
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    if !self.buffer.trim().is_empty() {
                        break;
                    }
                }
            }
        }

        let token = match self::parse::token(&self.buffer) {
            Err(e) => return Some(Err(Error::from(e))),
            Ok((_, x)) => x,
        };
        match EncodedSequence::encode(token) {
            Ok(seq) => Some(Ok(seq)),
            Err(e) => Some(Err(Error::InvalidSymbol {
                line: self.line,
                symbol: e.0,
            })),
        }
    }
}

pub fn read<B: BufRead, A: Alphabet>(reader: B) -> self::Reader<B, A> {
    self::Reader::new(reader)
}

/// Read every sequence of a file into a sequence set.
pub fn read_set<B: BufRead, A: Alphabet>(reader: B) -> Result<SequenceSet<A>, Error> {
    let sequences = read::<B, A>(reader).collect::<Result<Vec<_>, _>>()?;
    debug!("read {} sequences", sequences.len());
    SequenceSet::new(sequences).map_err(Error::from)
}

/// Open a sequence file, decompressing it if needed.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, Error> {
    let mut file = File::open(path).map(BufReader::new)?;
    match file.fill_buf()? {
        &[0x1f, 0x8b, ..] => {
            debug!("decompressing gzip input");
            let decoder = flate2::read::MultiGzDecoder::new(file);
            Ok(Box::new(BufReader::new(decoder)))
        }
        _ => Ok(Box::new(file)),
    }
}
