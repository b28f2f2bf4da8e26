use crate::types::ReleaseItem;
use std::collections::VecDeque;

/// FIFO of entries waiting for the next release.
pub trait ReleaseQueue: Send {
    fn pop_front(&mut self) -> Option<ReleaseItem>;
    fn len(&self) -> usize;
    /// Copies of the waiting entries, front first, without removing them.
    fn pending(&self) -> Vec<ReleaseItem>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryQueue {
    items: VecDeque<ReleaseItem>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two entries the service starts with when no real queue is wired in.
    pub fn demo() -> Self {
        Self::from_items(vec![
            ReleaseItem {
                id: 101,
                content: "Sunday Ritual #1".to_string(),
                user: "alice".to_string(),
            },
            ReleaseItem {
                id: 102,
                content: "Quiet moments...".to_string(),
                user: "bob".to_string(),
            },
        ])
    }

    pub fn from_items(items: impl IntoIterator<Item = ReleaseItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    pub fn push_back(&mut self, item: ReleaseItem) {
        self.items.push_back(item);
    }
}

impl ReleaseQueue for InMemoryQueue {
    fn pop_front(&mut self) -> Option<ReleaseItem> {
        self.items.pop_front()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn pending(&self) -> Vec<ReleaseItem> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_queue_pops_in_order() {
        let mut queue = InMemoryQueue::demo();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pending()[0].content, "Sunday Ritual #1");
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_front().map(|i| i.id), Some(101));
        assert_eq!(queue.pop_front().map(|i| i.user), Some("bob".to_string()));
        assert!(queue.is_empty());
        assert_eq!(queue.pop_front(), None);
    }
}
