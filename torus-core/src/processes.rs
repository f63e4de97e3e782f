use std::collections::VecDeque;

use redcode::Point;

/// Stores program counters for each warrior, up to a shared capacity.
///
/// Queues are strictly FIFO: a process re-enqueues at the tail after its
/// step, and SPL children join at the tail behind the parent.  A warrior
/// with an empty queue is dead and stays dead.
pub(crate) struct ProcessQueues {
    /// Individual process queues indexed by warrior id
    queues: Vec<VecDeque<Point>>,
    /// Number of processes beyond which pushes are silently dropped
    max_processes: usize,
}

impl ProcessQueues {
    /// Empty queues for `warriors` warriors with the given capacity
    pub fn new(warriors: usize, max_processes: usize) -> Self {
        Self {
            queues: vec![VecDeque::new(); warriors],
            max_processes,
        }
    }

    /// If one exists, the next program counter for a warrior
    pub fn pop(&mut self, warrior: usize) -> Option<Point> {
        self.queues.get_mut(warrior).and_then(VecDeque::pop_front)
    }

    /// Add a program counter at the tail of a warrior's queue.
    ///
    /// Returns whether the value was accepted; a queue at capacity drops
    /// the push without any other effect.
    pub fn push(&mut self, warrior: usize, pc: Point) -> bool {
        let Some(queue) = self.queues.get_mut(warrior) else {
            return false;
        };
        if queue.len() < self.max_processes {
            queue.push_back(pc);
            true
        } else {
            false
        }
    }

    /// Replace the next program counter a warrior will run.
    ///
    /// Seeds the queue when it is empty, which revives a dead warrior.
    pub fn set_head(&mut self, warrior: usize, pc: Point) {
        if let Some(queue) = self.queues.get_mut(warrior) {
            queue.pop_front();
            queue.push_front(pc);
        }
    }

    /// Number of live processes for a warrior
    pub fn len(&self, warrior: usize) -> usize {
        self.queues.get(warrior).map_or(0, VecDeque::len)
    }

    /// Whether a warrior still has at least one process
    pub fn is_alive(&self, warrior: usize) -> bool {
        self.len(warrior) > 0
    }

    /// Number of warriors with at least one process
    pub fn alive_count(&self) -> usize {
        self.queues.iter().filter(|queue| !queue.is_empty()).count()
    }

    /// Copy of one warrior's queue, next process first
    pub fn queue(&self, warrior: usize) -> Vec<Point> {
        self.queues
            .get(warrior)
            .map(|queue| queue.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queues_are_fifo() {
        let mut queues = ProcessQueues::new(1, 8);
        queues.push(0, Point::new(1, 0));
        queues.push(0, Point::new(2, 0));
        assert_eq!(queues.pop(0), Some(Point::new(1, 0)));
        assert_eq!(queues.pop(0), Some(Point::new(2, 0)));
        assert_eq!(queues.pop(0), None);
    }

    #[test]
    fn pushes_at_capacity_are_dropped() {
        let mut queues = ProcessQueues::new(1, 2);
        assert!(queues.push(0, Point::new(1, 0)));
        assert!(queues.push(0, Point::new(2, 0)));
        assert!(!queues.push(0, Point::new(3, 0)));
        assert_eq!(queues.len(0), 2);
        assert_eq!(
            queues.queue(0),
            vec![Point::new(1, 0), Point::new(2, 0)]
        );
    }

    #[test]
    fn death_is_observable() {
        let mut queues = ProcessQueues::new(2, 8);
        queues.push(0, Point::new(0, 0));
        assert_eq!(queues.alive_count(), 1);
        assert!(queues.is_alive(0));
        assert!(!queues.is_alive(1));
        queues.pop(0);
        assert_eq!(queues.alive_count(), 0);
    }

    #[test]
    fn set_head_replaces_only_the_next_process() {
        let mut queues = ProcessQueues::new(1, 8);
        queues.push(0, Point::new(1, 0));
        queues.push(0, Point::new(2, 0));
        queues.set_head(0, Point::new(9, 0));
        assert_eq!(
            queues.queue(0),
            vec![Point::new(9, 0), Point::new(2, 0)]
        );

        let mut empty = ProcessQueues::new(1, 8);
        empty.set_head(0, Point::new(4, 0));
        assert_eq!(empty.queue(0), vec![Point::new(4, 0)]);
    }
}
