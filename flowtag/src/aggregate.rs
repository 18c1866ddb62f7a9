use std::{borrow::Borrow, collections::HashMap, hash::Hash};

use log::warn;

use crate::error::MalformedRecord;
use crate::flow_log::Classification;
use crate::tables::ClassificationKey;

/// Occurrence counter that remembers first-insertion order.
#[derive(Debug, Clone)]
pub struct Counter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K> Default for Counter<K> {
    fn default() -> Self {
        Counter {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K> Counter<K>
where
    K: Hash + Eq + Clone,
{
    /// Returns the slot for `key`, inserting it with a zero count first if absent.
    pub fn get_or_insert_zero<Q>(&mut self, key: &Q) -> &mut u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push((key.to_owned(), 0));
                self.index.insert(key.to_owned(), slot);
                slot
            }
        };
        &mut self.entries[slot].1
    }

    pub fn increment<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        *self.get_or_insert_zero(key) += 1;
    }

    #[cfg(test)]
    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

pub type TagCounts = Counter<String>;
pub type PortProtocolCounts = Counter<ClassificationKey>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub lines_read: u64,
    pub classified: u64,
    pub malformed: u64,
}

/// Accumulates classifications into tag and port/protocol counts.
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    tag_counts: TagCounts,
    port_protocol_counts: PortProtocolCounts,
    stats: ScanStats,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, classification: &Classification<'_>) {
        self.stats.lines_read += 1;
        self.stats.classified += 1;
        self.tag_counts.increment(classification.tag);
        self.port_protocol_counts.increment(&classification.key);
    }

    /// Logs a skipped line. Counters are left untouched.
    pub fn skip(&mut self, malformed: &MalformedRecord) {
        warn!("{}", malformed);
        self.stats.lines_read += 1;
        self.stats.malformed += 1;
    }

    /// Hands the finished counters over for reporting.
    pub fn finish(self) -> (TagCounts, PortProtocolCounts, ScanStats) {
        (self.tag_counts, self.port_protocol_counts, self.stats)
    }
}
