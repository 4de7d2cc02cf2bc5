//! Bucket-count size classes and the grow/shrink thresholds derived from them.

/// Ascending bucket counts a table may occupy.
///
/// The values are primes or close to primes so that `hash % buckets` spreads
/// well. Consecutive classes are not related by a bit mask, so every resize
/// has to recompute each entry's bucket from its cached hash.
pub const SIZE_CLASSES: [usize; 27] = [
    5, 11, 17, 37, 67, 131, 257, 521, 1031, 2053, 4099, 8209, 16411, 32771, 65537, 131101, 262147,
    524309, 1048583, 2097169, 4194319, 8388617, 16777259, 33554467, 67108879, 134217757,
    268435459,
];

/// Entry count above which a table with `buckets` buckets grows.
#[inline]
pub const fn grow_threshold(buckets: usize) -> usize {
    buckets * 3 / 4
}

/// Entry count below which a table with `buckets` buckets may shrink.
#[inline]
pub const fn shrink_threshold(buckets: usize) -> usize {
    buckets * 3 / 16
}

/// Returns true if `buckets` is one of the counts in [`SIZE_CLASSES`].
pub fn is_size_class(buckets: usize) -> bool {
    SIZE_CLASSES.binary_search(&buckets).is_ok()
}

/// Cursor into [`SIZE_CLASSES`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SizeClass(usize);

impl SizeClass {
    pub(crate) const MIN: SizeClass = SizeClass(0);
    pub(crate) const MAX: SizeClass = SizeClass(SIZE_CLASSES.len() - 1);

    #[inline]
    pub(crate) fn buckets(self) -> usize {
        SIZE_CLASSES[self.0]
    }

    #[inline]
    pub(crate) fn grow_threshold(self) -> usize {
        grow_threshold(self.buckets())
    }

    #[inline]
    pub(crate) fn shrink_threshold(self) -> usize {
        shrink_threshold(self.buckets())
    }

    pub(crate) fn next(self) -> Option<SizeClass> {
        (self < Self::MAX).then(|| SizeClass(self.0 + 1))
    }

    pub(crate) fn prev(self) -> Option<SizeClass> {
        self.0.checked_sub(1).map(SizeClass)
    }

    /// Smallest class whose grow threshold admits `entries`.
    pub(crate) fn for_entries(entries: usize) -> SizeClass {
        let mut class = Self::MIN;
        while entries > class.grow_threshold() {
            match class.next() {
                Some(next) => class = next,
                None => break,
            }
        }
        class
    }
}
