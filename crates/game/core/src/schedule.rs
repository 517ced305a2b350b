//! Delayed work on the world timeline.
//!
//! Projectile flight and overlay linger are modelled as events due at a
//! future instant. They are drained in due order by the same caller that
//! owns the rest of the state, so nothing runs on a side thread.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::spell::ResolvedCast;
use crate::state::ActorId;

/// Work that becomes due at a later instant.
#[derive(Clone, Debug, PartialEq)]
pub enum TimelineEvent {
    /// A projectile spell lands and its effect is applied.
    ProjectileImpact { cast: ResolvedCast },
    /// A lingering preview is taken down if it was not replaced meanwhile.
    ClearOverlay { owner: ActorId, generation: u64 },
}

#[derive(Clone, Debug)]
struct Scheduled {
    due: Duration,
    seq: u64,
    event: TimelineEvent,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Min-heap of pending events keyed by due time, then insertion order.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    queue: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// When the earliest pending event is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(s)| s.due)
    }

    pub fn schedule(&mut self, due: Duration, event: TimelineEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled { due, seq, event }));
    }

    /// Removes and returns every event due at or before `now`, in order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<TimelineEvent> {
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|Reverse(s)| s.due <= now) {
            if let Some(Reverse(scheduled)) = self.queue.pop() {
                due.push(scheduled.event);
            }
        }
        due
    }

    /// Drops pending events that mention `actor`.
    pub fn forget_actor(&mut self, actor: ActorId) {
        let kept: Vec<_> = std::mem::take(&mut self.queue)
            .into_iter()
            .filter(|Reverse(s)| match &s.event {
                TimelineEvent::ProjectileImpact { cast } => cast.caster != actor,
                TimelineEvent::ClearOverlay { owner, .. } => *owner != actor,
            })
            .collect();
        self.queue = kept.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear(owner: u32) -> TimelineEvent {
        TimelineEvent::ClearOverlay {
            owner: ActorId(owner),
            generation: 0,
        }
    }

    #[test]
    fn drains_in_due_then_insertion_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(300), clear(3));
        timeline.schedule(Duration::from_millis(100), clear(1));
        timeline.schedule(Duration::from_millis(100), clear(2));

        assert!(timeline.drain_due(Duration::from_millis(50)).is_empty());
        assert_eq!(
            timeline.drain_due(Duration::from_millis(100)),
            vec![clear(1), clear(2)]
        );
        assert_eq!(timeline.next_due(), Some(Duration::from_millis(300)));
        assert_eq!(timeline.drain_due(Duration::from_secs(1)), vec![clear(3)]);
        assert!(timeline.is_empty());
    }

    #[test]
    fn forget_actor_drops_its_events() {
        let mut timeline = Timeline::new();
        timeline.schedule(Duration::from_millis(10), clear(1));
        timeline.schedule(Duration::from_millis(10), clear(2));
        timeline.forget_actor(ActorId(1));

        assert_eq!(timeline.drain_due(Duration::from_secs(1)), vec![clear(2)]);
    }
}
