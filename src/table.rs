use std::ops::Index;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: Option<usize>,
}

/// Append-only node storage with a hash index for deduplication.
///
/// Values added with [`Table::add`] get an index but are not hashed; values
/// inserted with [`Table::put`] are deduplicated, so equal values always get
/// the same index. Buckets are chained through the entries and the bucket
/// array doubles whenever the load factor exceeds two.
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<Option<usize>>,
    bitmask: u64,
    hashed: usize,
}

impl<T> Table<T> {
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bucket bits should be in the range 0..=31");
        let size = 1usize << bits;
        Self {
            data: Vec::new(),
            buckets: vec![None; size],
            bitmask: (size - 1) as u64,
            hashed: 0,
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn value(&self, index: usize) -> &T {
        &self.data[index].value
    }

    /// Stores a value without indexing it and returns its index.
    pub fn add(&mut self, value: T) -> usize {
        self.data.push(Entry { value, next: None });
        self.data.len() - 1
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Index of a value equal to `value`, if one was `put` before.
    pub fn find(&self, value: &T) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket_index(value)];
        while let Some(index) = cursor {
            let entry = &self.data[index];
            if &entry.value == value {
                return Some(index);
            }
            cursor = entry.next;
        }
        None
    }

    /// Returns the index of `value`, storing it first if it is new.
    pub fn put(&mut self, value: T) -> usize {
        if let Some(index) = self.find(&value) {
            return index;
        }

        if self.hashed >= 2 * self.buckets.len() {
            self.grow();
        }

        let bucket = self.bucket_index(&value);
        let index = self.add(value);
        self.data[index].next = self.buckets[bucket];
        self.buckets[bucket] = Some(index);
        self.hashed += 1;
        index
    }

    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        let mut chained = Vec::with_capacity(self.hashed);
        for head in self.buckets.iter() {
            let mut cursor = *head;
            while let Some(index) = cursor {
                chained.push(index);
                cursor = self.data[index].next;
            }
        }

        self.buckets = vec![None; size];
        self.bitmask = (size - 1) as u64;
        for index in chained {
            let bucket = self.bucket_index(&self.data[index].value);
            self.data[index].next = self.buckets[bucket];
            self.buckets[bucket] = Some(index);
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_add_is_not_deduplicated() {
        let mut table = Table::new(2);
        let i = table.add(Item(1));
        let j = table.add(Item(1));
        assert_ne!(i, j);
        assert_eq!(table.find(&Item(1)), None);
    }

    #[test]
    fn test_put_deduplicates() {
        let mut table = Table::new(2);
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(-5)); // same bucket
        assert_ne!(index1, index2);
        assert_eq!(table[index1], Item(5));
        assert_eq!(table[index2], Item(-5));
        assert_eq!(table.put(Item(5)), index1);
        assert_eq!(table.put(Item(-5)), index2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_grow_keeps_entries() {
        let mut table = Table::new(1);
        let indices: Vec<usize> = (0..100).map(|i| table.put(Item(i))).collect();
        assert!(table.num_buckets() > 2);
        for (i, &index) in indices.iter().enumerate() {
            assert_eq!(table.find(&Item(i as i32)), Some(index));
            assert_eq!(table.put(Item(i as i32)), index);
        }
        assert_eq!(table.len(), 100);
    }
}
