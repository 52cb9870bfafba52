/// Same as `Iterator::enumerate` but yields a typed index instead of a `usize`.
pub struct IndexedIter<I, Idx> {
    inner: std::iter::Enumerate<I>,
    _marker: std::marker::PhantomData<Idx>,
}

pub trait EnumerateIdx<Idx>: Iterator + Sized {
    fn enumerate_idx(self) -> IndexedIter<Self, Idx> {
        IndexedIter {
            inner: self.enumerate(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<I: Iterator, Idx> EnumerateIdx<Idx> for I {}

impl<I: Iterator, Idx: From<usize>> Iterator for IndexedIter<I, Idx> {
    type Item = (Idx, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(i, item)| (Idx::from(i), item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::job::JobIdx;

    use super::*;

    #[test]
    fn test_enumerate_idx_yields_typed_indices() {
        let values = ["a", "b", "c"];
        let indexed: Vec<(JobIdx, &&str)> = values.iter().enumerate_idx().collect();

        assert_eq!(indexed[0].0, JobIdx::new(0));
        assert_eq!(indexed[2].0, JobIdx::new(2));
        assert_eq!(*indexed[1].1, "b");
    }
}
