//! Exact distinct counter, the baseline sketch estimates are compared against.
//! Memory grows with the number of distinct elements.

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct ExactCounter {
    elements: HashSet<Box<[u8]>>,
}

impl ExactCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert element, returns whether it was not seen before
    pub fn add<E: AsRef<[u8]> + ?Sized>(&mut self, element: &E) -> bool {
        let bytes = element.as_ref();
        if self.elements.contains(bytes) {
            return false;
        }
        self.elements.insert(bytes.into())
    }

    /// Number of distinct elements
    pub fn count(&self) -> usize {
        self.elements.len()
    }
}

impl<E: AsRef<[u8]>> Extend<E> for ExactCounter {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.add(&element);
        }
    }
}

/// Count distinct elements of `elements` exactly
pub fn exact_count<E, I>(elements: I) -> usize
where
    E: AsRef<[u8]>,
    I: IntoIterator<Item = E>,
{
    let mut counter = ExactCounter::new();
    counter.extend(elements);
    counter.count()
}
