//! Matchmaking queue: FIFO waiting list pairing distinct connections
//!
//! The queue is a plain data structure owned by the server's main loop; the
//! loop arms one cancellable eviction deadline per entry and validates the
//! entry's timer sequence when a deadline fires, so a disarm racing an
//! expiry can never evict a fresh entry.

use log::info;
use std::collections::VecDeque;
use std::time::Instant;

/// One waiting connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub connection_id: u64,
    pub enqueued_at: Instant,
    /// Ties the entry to its armed eviction deadline; a deadline carrying a
    /// stale sequence is ignored.
    pub timer_seq: u64,
}

/// Result of a join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First entry for this connection; arm a deadline with this sequence.
    Joined { timer_seq: u64 },
    /// The connection was already waiting: its entry was replaced, the
    /// superseded deadline must be disarmed and a fresh one armed.
    Rejoined {
        timer_seq: u64,
        superseded_seq: u64,
    },
}

/// FIFO waiting list of connections seeking an opponent.
///
/// Invariant: at most one entry per connection id. Joins deduplicate, and an
/// entry is removed the instant its connection is matched, cancelled or
/// evicted, so pairing can never select the same connection twice.
pub struct MatchQueue {
    entries: VecDeque<QueueEntry>,
    next_timer_seq: u64,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_timer_seq: 1,
        }
    }

    /// Adds a connection to the queue, replacing any existing entry for the
    /// same connection (fresh timestamp, fresh deadline sequence).
    pub fn join(&mut self, connection_id: u64, now: Instant) -> JoinOutcome {
        let superseded = self.take_entry(connection_id);

        let timer_seq = self.next_timer_seq;
        self.next_timer_seq += 1;
        self.entries.push_back(QueueEntry {
            connection_id,
            enqueued_at: now,
            timer_seq,
        });

        match superseded {
            Some(old) => {
                info!(
                    "Connection {} re-joined the queue (entry replaced)",
                    connection_id
                );
                JoinOutcome::Rejoined {
                    timer_seq,
                    superseded_seq: old.timer_seq,
                }
            }
            None => {
                info!("Connection {} joined the queue", connection_id);
                JoinOutcome::Joined { timer_seq }
            }
        }
    }

    /// Removes a connection's entry, returning the deadline sequence to
    /// disarm. `None` if the connection was not waiting.
    pub fn cancel(&mut self, connection_id: u64) -> Option<u64> {
        self.take_entry(connection_id).map(|entry| entry.timer_seq)
    }

    /// Removes and returns the two longest-waiting distinct connections.
    ///
    /// FIFO by enqueue order; returns `None` while fewer than two distinct
    /// connections are waiting.
    pub fn try_pair(&mut self) -> Option<(u64, u64)> {
        let first = self.entries.front()?.connection_id;
        let second_idx = self
            .entries
            .iter()
            .position(|entry| entry.connection_id != first)?;

        let second = self.entries.remove(second_idx).unwrap().connection_id;
        self.entries.pop_front();
        Some((first, second))
    }

    /// Evicts an entry whose waiting deadline fired. Returns false when the
    /// deadline is stale: the entry was already matched, cancelled or
    /// replaced by a re-join.
    pub fn expire(&mut self, connection_id: u64, timer_seq: u64) -> bool {
        let matches_seq = self
            .entries
            .iter()
            .any(|entry| entry.connection_id == connection_id && entry.timer_seq == timer_seq);
        if matches_seq {
            self.take_entry(connection_id);
            info!("Connection {} evicted from queue after timeout", connection_id);
        }
        matches_seq
    }

    pub fn contains(&self, connection_id: u64) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.connection_id == connection_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn take_entry(&mut self, connection_id: u64) -> Option<QueueEntry> {
        let idx = self
            .entries
            .iter()
            .position(|entry| entry.connection_id == connection_id)?;
        self.entries.remove(idx)
    }
}

impl Default for MatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_is_fifo() {
        let mut queue = MatchQueue::new();
        let now = Instant::now();
        queue.join(1, now);
        queue.join(2, now);
        queue.join(3, now);

        assert_eq!(queue.try_pair(), Some((1, 2)));
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(3));
    }

    #[test]
    fn test_single_entry_never_pairs() {
        let mut queue = MatchQueue::new();
        queue.join(1, Instant::now());

        assert_eq!(queue.try_pair(), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_rejoin_replaces_entry() {
        let mut queue = MatchQueue::new();
        let now = Instant::now();

        let first = queue.join(1, now);
        let seq1 = match first {
            JoinOutcome::Joined { timer_seq } => timer_seq,
            _ => panic!("first join should not be a rejoin"),
        };

        let second = queue.join(1, now);
        match second {
            JoinOutcome::Rejoined {
                timer_seq,
                superseded_seq,
            } => {
                assert_eq!(superseded_seq, seq1);
                assert_ne!(timer_seq, seq1);
            }
            _ => panic!("second join should replace the entry"),
        }

        // Queue size attributable to one connection never exceeds 1, so a
        // lone re-joiner still cannot be paired with itself.
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_pair(), None);
    }

    #[test]
    fn test_rejoin_moves_to_back() {
        let mut queue = MatchQueue::new();
        let now = Instant::now();
        queue.join(1, now);
        queue.join(2, now);
        queue.join(3, now);
        queue.join(1, now);

        assert_eq!(queue.try_pair(), Some((2, 3)));
        assert!(queue.contains(1));
    }

    #[test]
    fn test_cancel_removes_entry() {
        let mut queue = MatchQueue::new();
        let now = Instant::now();
        let seq = match queue.join(1, now) {
            JoinOutcome::Joined { timer_seq } => timer_seq,
            _ => panic!("unexpected rejoin"),
        };

        assert_eq!(queue.cancel(1), Some(seq));
        assert!(queue.is_empty());
        assert_eq!(queue.cancel(1), None);
    }

    #[test]
    fn test_expire_evicts_matching_entry() {
        let mut queue = MatchQueue::new();
        let seq = match queue.join(1, Instant::now()) {
            JoinOutcome::Joined { timer_seq } => timer_seq,
            _ => panic!("unexpected rejoin"),
        };

        assert!(queue.expire(1, seq));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stale_expire_is_ignored() {
        let mut queue = MatchQueue::new();
        let now = Instant::now();
        let old_seq = match queue.join(1, now) {
            JoinOutcome::Joined { timer_seq } => timer_seq,
            _ => panic!("unexpected rejoin"),
        };
        // Re-join supersedes the first deadline.
        queue.join(1, now);

        assert!(!queue.expire(1, old_seq));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_expire_after_match_is_ignored() {
        let mut queue = MatchQueue::new();
        let now = Instant::now();
        let seq = match queue.join(1, now) {
            JoinOutcome::Joined { timer_seq } => timer_seq,
            _ => panic!("unexpected rejoin"),
        };
        queue.join(2, now);

        assert_eq!(queue.try_pair(), Some((1, 2)));
        assert!(!queue.expire(1, seq));
    }

    #[test]
    fn test_pairing_drains_queue_in_order() {
        let mut queue = MatchQueue::new();
        let now = Instant::now();
        for id in 1..=6 {
            queue.join(id, now);
        }

        assert_eq!(queue.try_pair(), Some((1, 2)));
        assert_eq!(queue.try_pair(), Some((3, 4)));
        assert_eq!(queue.try_pair(), Some((5, 6)));
        assert_eq!(queue.try_pair(), None);
    }
}
