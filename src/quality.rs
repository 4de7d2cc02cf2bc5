//! Distribution diagnostics for judging a key strategy on real data.

use crate::size_class::grow_threshold;
use crate::table::ChainTable;
use core::fmt;

/// Snapshot of how evenly a table's entries spread over its buckets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quality {
    /// Entries per bucket.
    pub load: f64,
    /// Sample variance of the chain lengths around `load`.
    pub variance: f64,
    /// Fraction of buckets with no entry.
    pub prop_empty: f64,
    /// Fraction of buckets holding more than one entry.
    pub prop_overloaded: f64,
    pub biggest_bucket: usize,
    /// Dispersion score: about 1.0 for uniformly random hashing, lower is better.
    pub score: f64,
}

impl Quality {
    const EMPTY: Quality = Quality {
        load: 0.0,
        variance: 0.0,
        prop_empty: 1.0,
        prop_overloaded: 0.0,
        biggest_bucket: 0,
        score: 0.0,
    };
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "load {:.3}, variance {:.3}, empty {:.1}%, overloaded {:.1}%, biggest {}, score {:.3}",
            self.load,
            self.variance,
            self.prop_empty * 100.0,
            self.prop_overloaded * 100.0,
            self.biggest_bucket,
            self.score
        )
    }
}

impl<K, P, S> ChainTable<K, P, S> {
    /// Walks every chain and summarizes the bucket occupancy.
    pub fn quality(&self) -> Quality {
        if self.is_empty() {
            return Quality::EMPTY;
        }
        let nbuckets = self.bucket_count();
        let entries = self.len() as f64;
        let buckets = nbuckets as f64;
        let mean = entries / buckets;
        let overloaded_above = grow_threshold(1).max(1);

        let mut variance_sum = 0.0;
        let mut score_sum: u64 = 0;
        let mut overloaded = 0usize;
        let mut empty = 0usize;
        let mut biggest = 0usize;
        for count in self.chain_lengths() {
            let dev = count as f64 - mean;
            variance_sum += dev * dev;
            score_sum += (count as u64) * (count as u64 + 1);
            biggest = biggest.max(count);
            if count == 0 {
                empty += 1;
            }
            if count > overloaded_above {
                overloaded += 1;
            }
        }

        Quality {
            load: mean,
            variance: variance_sum / (buckets - 1.0),
            prop_empty: empty as f64 / buckets,
            prop_overloaded: overloaded as f64 / buckets,
            biggest_bucket: biggest,
            score: score_sum as f64 * buckets / (entries * (entries + 2.0 * buckets - 1.0)),
        }
    }
}
