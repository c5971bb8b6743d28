//! Occurence counts of the configurations visited by a sampler.

use std::cmp::Reverse;

use fnv::FnvHashMap;

use super::sampler::PositionVector;

/// A table counting how often each distinct position vector was recorded.
///
/// Every entry remembers when it was first inserted, which decides ties
/// when looking for the most frequent configuration.
#[derive(Clone, Debug, Default)]
pub struct TallyTable {
    /// Insertion rank and count of every configuration.
    entries: FnvHashMap<PositionVector, (usize, usize)>,
}

impl TallyTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurence of `positions`.
    ///
    /// The vector is only copied the first time it is seen.
    pub fn record(&mut self, positions: &PositionVector) {
        match self.entries.get_mut(positions) {
            Some((_, count)) => *count += 1,
            None => {
                let rank = self.entries.len();
                self.entries.insert(positions.clone(), (rank, 1));
            }
        }
    }

    /// The number of distinct configurations in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The total number of recorded occurences.
    pub fn total(&self) -> usize {
        self.entries.values().map(|&(_, n)| n).sum()
    }

    /// Get the count of a configuration.
    pub fn count(&self, positions: &PositionVector) -> usize {
        self.entries.get(positions).map(|&(_, n)| n).unwrap_or(0)
    }

    /// Get the most frequent configuration and its count.
    ///
    /// The configuration recorded first wins when several share the
    /// maximum count.
    pub fn best(&self) -> Option<(&PositionVector, usize)> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| (Reverse(entry.1), entry.0))
            .map(|(positions, &(_, count))| (positions, count))
    }

    /// Iterate over configurations and counts in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PositionVector, usize)> {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_unstable_by_key(|(_, entry)| entry.0);
        entries.into_iter().map(|(p, &(_, n))| (p, n))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_record() {
        let mut table = TallyTable::new();
        assert!(table.is_empty());
        assert!(table.best().is_none());

        let a = PositionVector::from(vec![0, 1, 2]);
        let b = PositionVector::from(vec![0, 1, 3]);
        table.record(&a);
        table.record(&b);
        table.record(&a);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
        assert_eq!(table.count(&a), 2);
        assert_eq!(table.count(&b), 1);
        assert_eq!(table.count(&PositionVector::from(vec![9, 9, 9])), 0);
        assert_eq!(table.best(), Some((&a, 2)));
    }

    #[test]
    fn test_best_first_seen_wins_ties() {
        let mut table = TallyTable::new();
        let a = PositionVector::from(vec![4, 4]);
        let b = PositionVector::from(vec![1, 1]);
        table.record(&a);
        table.record(&b);
        table.record(&b);
        table.record(&a);
        assert_eq!(table.best(), Some((&a, 2)));
        let order = table.iter().map(|(p, _)| p.clone()).collect::<Vec<_>>();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_best_later_overtakes() {
        let mut table = TallyTable::new();
        let a = PositionVector::from(vec![0]);
        let b = PositionVector::from(vec![1]);
        let c = PositionVector::from(vec![2]);
        for p in [&a, &b, &c, &c, &b, &c] {
            table.record(p);
        }
        assert_eq!(table.best(), Some((&c, 3)));
        assert_eq!(table.total(), 6);
        let counts = table.iter().map(|(_, n)| n).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 2, 3]);
    }
}
