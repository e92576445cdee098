//! Sparse time-indexed streams.

use alloc::collections::BTreeMap;

/// A stream: a total function from time to `A`, stored sparsely.
///
/// Times without an explicit entry take the stream's default value.
/// Streams produced by the engine use the group zero as default;
/// operators such as `lift` derive a different default where the
/// semantics require it.
#[derive(Clone, Debug)]
pub struct Stream<A> {
    entries: BTreeMap<u64, A>,
    default: A,
}

impl<A> Stream<A> {
    /// Creates an empty stream with the given default value.
    pub fn new(default: A) -> Self {
        Self {
            entries: BTreeMap::new(),
            default,
        }
    }

    /// Creates a stream from `(time, value)` entries.
    pub fn from_entries(default: A, entries: impl IntoIterator<Item = (u64, A)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            default,
        }
    }

    /// Returns the value at time `t`, falling back to the default for
    /// unset times.
    pub fn at(&self, t: u64) -> &A {
        self.entries.get(&t).unwrap_or(&self.default)
    }

    /// Sets the value at time `t`.
    pub fn set(&mut self, t: u64, value: A) {
        self.entries.insert(t, value);
    }

    /// Returns the stream's default value.
    #[inline]
    pub fn default_value(&self) -> &A {
        &self.default
    }

    /// Returns the watermark: one past the largest set time, or 0 for
    /// a stream with no entries.
    pub fn current_time(&self) -> u64 {
        self.last_time().map(|t| t + 1).unwrap_or(0)
    }

    /// Returns the largest set time, if any.
    pub fn last_time(&self) -> Option<u64> {
        self.entries.last_key_value().map(|(t, _)| *t)
    }

    /// Iterates over the set entries in ascending time order.
    pub fn entries(&self) -> impl Iterator<Item = (u64, &A)> {
        self.entries.iter().map(|(t, value)| (*t, value))
    }

    /// Returns the number of set entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no time has been set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: PartialEq> PartialEq for Stream<A> {
    /// Semantic equality: equal defaults and equal values at every
    /// time either stream has set. An entry that merely repeats the
    /// default compares equal to an unset time.
    fn eq(&self, other: &Self) -> bool {
        if self.default != other.default {
            return false;
        }
        self.entries
            .keys()
            .chain(other.entries.keys())
            .all(|t| self.at(*t) == other.at(*t))
    }
}

impl<A: Eq> Eq for Stream<A> {}
