use crate::system::interface::ProcessId;

/// Background processes that were spawned and have not been reaped yet.
///
/// Order is not preserved: removal moves the last entry into the freed slot.
#[derive(Debug, Default)]
pub struct ChildRegistry {
    pids: Vec<ProcessId>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `pid` and return its slot. A pid that is already tracked keeps its slot.
    pub fn insert(&mut self, pid: ProcessId) -> usize {
        if let Some(slot) = self.position(pid) {
            return slot;
        }
        self.pids.push(pid);
        self.pids.len() - 1
    }

    /// Stop tracking `pid`. Returns `false` if it was not tracked.
    pub fn remove(&mut self, pid: ProcessId) -> bool {
        match self.position(pid) {
            Some(slot) => {
                self.pids.swap_remove(slot);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.pids.iter().copied()
    }

    fn position(&self, pid: ProcessId) -> Option<usize> {
        self.pids.iter().position(|&tracked| tracked == pid)
    }
}

#[cfg(test)]
mod tests {
    use super::ChildRegistry;
    use crate::system::interface::ProcessId;
    use pretty_assertions::assert_eq;

    fn pid(id: i32) -> ProcessId {
        ProcessId::new(id)
    }

    #[test]
    fn insert_reports_slot() {
        let mut registry = ChildRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.insert(pid(10)), 0);
        assert_eq!(registry.insert(pid(11)), 1);
        assert_eq!(registry.insert(pid(12)), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicates_are_not_tracked_twice() {
        let mut registry = ChildRegistry::new();
        registry.insert(pid(10));
        registry.insert(pid(11));
        assert_eq!(registry.insert(pid(10)), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn remove_moves_last_into_hole() {
        let mut registry = ChildRegistry::new();
        for id in 10..14 {
            registry.insert(pid(id));
        }

        assert!(registry.remove(pid(11)));
        assert_eq!(
            registry.iter().collect::<Vec<_>>(),
            vec![pid(10), pid(13), pid(12)]
        );

        assert!(!registry.remove(pid(11)));
        assert!(!registry.iter().any(|tracked| tracked == pid(11)));

        assert!(registry.remove(pid(12)));
        assert!(registry.remove(pid(10)));
        assert!(registry.remove(pid(13)));
        assert!(registry.is_empty());
        assert!(!registry.remove(pid(13)));
    }

    #[test]
    fn grows_past_a_fixed_table() {
        let mut registry = ChildRegistry::new();
        for id in 1..=1024 {
            registry.insert(pid(id));
        }
        assert_eq!(registry.len(), 1024);
        for id in 1..=1024 {
            assert!(registry.remove(pid(id)));
        }
        assert!(registry.is_empty());
    }
}
