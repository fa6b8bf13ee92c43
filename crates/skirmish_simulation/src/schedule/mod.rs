//! Scheduled-task queue keyed by fire time
//!
//! Замена "подождать N секунд и продолжить": задача кладётся в очередь с
//! `fire_at = now + delay`, система каждый FixedUpdate забирает созревшие
//! задачи через `drain_due(now)`. Без потоков и блокировок,
//! остальные акторы продолжают тикать пока задача ждёт.
//!
//! Порядок выдачи: по fire time, при равенстве по порядку постановки (FIFO).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Handle задачи в очереди (монотонный номер постановки)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

struct Scheduled<T> {
    fire_at: f64,
    id: TaskId,
    task: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    // BinaryHeap: max-heap, поэтому раньше fire_at = "больше"
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Очередь отложенных задач
pub struct DelayQueue<T> {
    heap: BinaryHeap<Scheduled<T>>,
    next_id: u64,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_id: 0,
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запланировать задачу через `delay` секунд от `now`
    ///
    /// Отрицательный delay трактуется как 0 (задача созреет на текущем тике).
    pub fn schedule(&mut self, now: f64, delay: f32, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.heap.push(Scheduled {
            fire_at: now + f64::from(delay.max(0.0)),
            id,
            task,
        });
        id
    }

    /// Забрать все задачи с `fire_at <= now` (в порядке fire time)
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|next| next.fire_at <= now) {
            if let Some(entry) = self.heap.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    /// Ближайший fire time (None если очередь пуста)
    pub fn next_fire_at(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.fire_at)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_time_order() {
        let mut queue = DelayQueue::new();
        queue.schedule(0.0, 2.0, "late");
        queue.schedule(0.0, 0.5, "early");
        queue.schedule(0.0, 1.0, "middle");

        assert!(queue.drain_due(0.4).is_empty());
        assert_eq!(queue.drain_due(1.0), vec!["early", "middle"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_fire_at(), Some(2.0));
        assert_eq!(queue.drain_due(10.0), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_same_fire_time_is_fifo() {
        let mut queue = DelayQueue::new();
        queue.schedule(1.0, 1.0, 1);
        queue.schedule(1.0, 1.0, 2);
        queue.schedule(1.0, 1.0, 3);

        assert_eq!(queue.drain_due(2.0), vec![1, 2, 3]);
    }

    #[test]
    fn test_negative_delay_fires_now() {
        let mut queue = DelayQueue::new();
        queue.schedule(3.0, -1.0, ());

        assert_eq!(queue.next_fire_at(), Some(3.0));
        assert_eq!(queue.drain_due(3.0).len(), 1);
    }

    #[test]
    fn test_task_drained_only_once() {
        let mut queue = DelayQueue::new();
        queue.schedule(0.0, 1.0, "revert");

        assert_eq!(queue.drain_due(1.0).len(), 1);
        assert!(queue.drain_due(5.0).is_empty());
    }
}
