use std::cmp;

/* Splitter */

#[derive(Clone, Copy, Debug)]
pub struct Splitter {
    splits: usize,
}

impl Splitter {
    #[inline]
    pub fn new(splits: usize) -> Self {
        Self { splits }
    }

    #[inline]
    pub fn try_split(&mut self) -> bool {
        if self.splits > 1 {
            self.splits /= 2;

            true
        } else {
            false
        }
    }
}

/* IndexedSplitter */

/// Splits a slice in halves until the split budget is used up or the
/// halves would get shorter than `min`.
#[derive(Clone, Copy, Debug)]
pub struct IndexedSplitter {
    inner: Splitter,
    min: usize,
}

impl IndexedSplitter {
    #[inline]
    pub fn new(splits: usize, min: Option<usize>) -> Self {
        let min = min.unwrap_or_default();

        Self {
            inner: Splitter::new(splits),
            min: cmp::max(min, 1),
        }
    }

    #[inline]
    pub fn try_split(&mut self, len: usize) -> bool {
        len / 2 >= self.min && self.inner.try_split()
    }
}
