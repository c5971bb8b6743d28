//! Dense matrix storage with a constant number of columns.

use std::fmt::Debug;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;
use std::ops::Index;
use std::ops::IndexMut;

use generic_array::ArrayLength;
use generic_array::GenericArray;

// --- DenseMatrix -------------------------------------------------------------

/// A dense matrix with a constant number of columns.
///
/// Rows are stored contiguously as fixed-size arrays, so a row of a
/// `DenseMatrix<T, U4>` is always exactly four elements long.
pub struct DenseMatrix<T: Default + Copy, C: ArrayLength> {
    data: Vec<GenericArray<T, C>>,
}

impl<T: Default + Copy, C: ArrayLength> Clone for DenseMatrix<T, C> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
        }
    }
}

impl<T: Default + Copy + PartialEq, C: ArrayLength> PartialEq for DenseMatrix<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Default + Copy, C: ArrayLength> DenseMatrix<T, C> {
    /// Create a new matrix with the given number of rows.
    pub fn new(rows: usize) -> Self {
        let mut matrix = Self { data: Vec::new() };
        matrix.resize(rows);
        matrix
    }

    /// The number of rows of the matrix.
    #[inline]
    pub fn rows(&self) -> usize {
        self.data.len()
    }

    /// Change the number of rows of the matrix.
    ///
    /// New rows are filled with the default value of `T`.
    pub fn resize(&mut self, rows: usize) {
        self.data.resize_with(rows, GenericArray::default);
    }

    /// Iterate over the rows of the matrix.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &[T]> + ExactSizeIterator {
        self.data.iter().map(|row| row.as_slice())
    }

    /// Returns an iterator that allows modifying each row.
    #[inline]
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut [T]> + ExactSizeIterator {
        self.data.iter_mut().map(|row| row.as_mut_slice())
    }
}

impl<T: Default + Copy + Debug, C: ArrayLength> Debug for DenseMatrix<T, C> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Default + Copy, C: ArrayLength> Index<usize> for DenseMatrix<T, C> {
    type Output = [T];
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.data[index].as_slice()
    }
}

impl<T: Default + Copy, C: ArrayLength> IndexMut<usize> for DenseMatrix<T, C> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.data[index].as_mut_slice()
    }
}
