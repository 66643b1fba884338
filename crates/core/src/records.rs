//! 帶穩定識別碼的正式紀錄清單。 / Canonical record lists with stable per-slot identity.

use std::fmt;

/// 正式清單中每筆紀錄的穩定識別碼。 / Stable identity of a slot in a canonical list.
///
/// Ids are handed out by the owning [`RecordList`], grow monotonically and are
/// never reused, even after [`RecordList::replace_all`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    id: RecordId,
    record: T,
}

/// 有序的正式紀錄清單。 / Ordered canonical list.
///
/// [`append`](Self::append) refuses a record equal to one already present;
/// lists installed wholesale keep repeated records as they are.
#[derive(Debug, Clone)]
pub struct RecordList<T> {
    slots: Vec<Slot<T>>,
    next_id: u64,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: PartialEq> RecordList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增一筆紀錄；若已有相等的紀錄則不變。 / Appends a record unless an equal one is already present.
    pub fn append(&mut self, record: T) -> Option<RecordId> {
        if self.contains(&record) {
            return None;
        }
        let id = self.allocate_id();
        self.slots.push(Slot { id, record });
        Some(id)
    }

    /// 依識別碼取代紀錄，不比較內容。 / Replaces the record stored under `id` without consulting value equality.
    pub fn update(&mut self, id: RecordId, record: T) -> bool {
        match self.slots.iter_mut().find(|slot| slot.id == id) {
            Some(slot) => {
                slot.record = record;
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.slots.len() {
            Some(self.slots.remove(index).record)
        } else {
            None
        }
    }

    /// Replaces the whole list. Every record gets a fresh id, equal ones included.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = T>) {
        self.slots.clear();
        for record in records {
            let id = self.allocate_id();
            self.slots.push(Slot { id, record });
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn contains(&self, record: &T) -> bool {
        self.slots.iter().any(|slot| &slot.record == record)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).map(|slot| &slot.record)
    }

    pub fn id_at(&self, index: usize) -> Option<RecordId> {
        self.slots.get(index).map(|slot| slot.id)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    pub fn by_id(&self, id: RecordId) -> Option<&T> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| &slot.record)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().map(|slot| &slot.record)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn allocate_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl<T: PartialEq + Clone> RecordList<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_skips_equal_records() {
        let mut list = RecordList::new();
        assert!(list.append("a").is_some());
        assert!(list.append("b").is_some());
        assert_eq!(list.append("a"), None);
        assert_eq!(list.to_vec(), vec!["a", "b"]);
    }

    #[test]
    fn update_keeps_position_and_identity() {
        let mut list = RecordList::new();
        list.append("a");
        let id = list.append("b").unwrap();
        list.append("c");

        assert!(list.update(id, "a"));
        assert_eq!(list.to_vec(), vec!["a", "a", "c"]);
        assert_eq!(list.position(id), Some(1));
    }

    #[test]
    fn ids_are_not_reused_after_replace_all() {
        let mut list = RecordList::new();
        let first = list.append(1).unwrap();
        list.replace_all([1, 2, 3]);

        assert_eq!(list.to_vec(), vec![1, 2, 3]);
        assert_eq!(list.by_id(first), None);
        assert!(!list.update(first, 9));
        assert!(list.id_at(0).unwrap() > first);
    }

    #[test]
    fn replace_all_keeps_repeated_records() {
        let mut list = RecordList::new();
        list.replace_all(["5L", "2G", "5L", "2G"]);

        assert_eq!(list.to_vec(), vec!["5L", "2G", "5L", "2G"]);
        assert_ne!(list.id_at(0), list.id_at(2));
        assert_eq!(list.append("5L"), None);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn remove_at_out_of_bounds_is_none() {
        let mut list = RecordList::new();
        list.append('x');
        assert_eq!(list.remove_at(3), None);
        assert_eq!(list.remove_at(0), Some('x'));
        assert!(list.is_empty());
    }
}
