use std::{
    collections::VecDeque,
    sync::{PoisonError, RwLock},
};

use super::{AttemptRecord, HistoryRepository};

/// Bounded in-memory history, lost on restart. Once `max_records` is reached every append evicts
/// the oldest record.
pub struct MemoryHistory {
    max_records: usize,
    records: RwLock<VecDeque<AttemptRecord>>,
}

impl MemoryHistory {
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records,
            records: RwLock::new(VecDeque::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl HistoryRepository for MemoryHistory {
    fn append(&self, record: AttemptRecord) {
        // Push and truncate can't panic halfway, so a poisoned lock still guards a valid log.
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.push_front(record);
        records.truncate(self.max_records);
    }

    fn list_recent(&self, limit: usize) -> Vec<AttemptRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    fn record(n: usize) -> AttemptRecord {
        AttemptRecord::success(format!("0x{:040x}", n), "latest".to_string(), n.to_string())
    }

    fn balances(records: &[AttemptRecord]) -> Vec<String> {
        records
            .iter()
            .map(|record| record.balance.clone().unwrap())
            .collect()
    }

    #[test]
    fn test_lists_newest_first() {
        let history = MemoryHistory::new(10);
        for n in 0..3 {
            history.append(record(n));
        }

        assert_eq!(balances(&history.list_recent(10)), vec!["2", "1", "0"]);
    }

    #[test]
    fn test_evicts_oldest_at_capacity() {
        let history = MemoryHistory::new(3);
        for n in 0..5 {
            history.append(record(n));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(balances(&history.list_recent(10)), vec!["4", "3", "2"]);
    }

    #[test]
    fn test_limit_caps_listing() {
        let history = MemoryHistory::new(10);
        for n in 0..5 {
            history.append(record(n));
        }

        assert_eq!(balances(&history.list_recent(2)), vec!["4", "3"]);
        assert!(history.list_recent(0).is_empty());
        assert!(MemoryHistory::new(10).list_recent(5).is_empty());
    }

    #[test]
    fn test_large_capacity_grows_on_demand() {
        let history = MemoryHistory::new(usize::MAX);
        history.append(record(0));

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_listing_is_a_snapshot() {
        let history = MemoryHistory::new(2);
        history.append(record(0));
        let listed = history.list_recent(10);

        history.append(record(1));
        history.append(record(2));

        assert_eq!(balances(&listed), vec!["0"]);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let history = Arc::new(MemoryHistory::new(1000));
        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let history = history.clone();
                thread::spawn(move || {
                    for n in 0..100 {
                        history.append(record(writer * 100 + n));
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }

        let mut listed: Vec<usize> = history
            .list_recent(2000)
            .iter()
            .map(|record| record.balance.as_ref().unwrap().parse().unwrap())
            .collect();
        listed.sort();

        assert_eq!(listed, (0..800).collect::<Vec<_>>());
    }

    #[test]
    fn test_concurrent_appends_respect_capacity() {
        let history = Arc::new(MemoryHistory::new(50));
        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let history = history.clone();
                thread::spawn(move || {
                    for n in 0..100 {
                        history.append(record(writer * 100 + n));
                        assert!(history.len() <= 50);
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }

        assert_eq!(history.len(), 50);
        assert_eq!(history.list_recent(100).len(), 50);
    }
}
