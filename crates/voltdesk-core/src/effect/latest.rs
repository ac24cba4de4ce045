// ── Latest-wins sequencing ──
//
// Each issued request bumps a per-key counter and captures the new value.
// On completion, the result is applied only if no newer request of the
// same key has been issued since. In-flight calls are not cancelled;
// their results are simply dropped.

use std::fmt::Debug;
use std::hash::Hash;

use dashmap::DashMap;

/// Proof of issue for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    seq: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub struct LatestWins<K: Eq + Hash> {
    counters: DashMap<K, u64>,
}

impl<K: Eq + Hash + Clone + Debug> LatestWins<K> {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
        }
    }

    /// Issue a ticket that supersedes every earlier ticket for `key`.
    pub fn issue(&self, key: K) -> Ticket<K> {
        let mut counter = self.counters.entry(key.clone()).or_insert(0);
        *counter += 1;
        Ticket { key, seq: *counter }
    }

    /// `true` while no newer ticket for the same key exists.
    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        self.counters
            .get(&ticket.key)
            .is_some_and(|seq| *seq == ticket.seq)
    }
}

impl<K: Eq + Hash + Clone + Debug> Default for LatestWins<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let tickets = LatestWins::new();
        let a = tickets.issue("fetch");
        assert!(tickets.is_current(&a));

        let b = tickets.issue("fetch");
        assert!(!tickets.is_current(&a));
        assert!(tickets.is_current(&b));
        assert!(b.seq() > a.seq());
    }

    #[test]
    fn keys_are_independent() {
        let tickets = LatestWins::new();
        let fetch = tickets.issue("fetch");
        let _delete = tickets.issue("delete");
        assert!(tickets.is_current(&fetch));
    }

    #[test]
    fn composite_keys() {
        let tickets = LatestWins::new();
        let role_1 = tickets.issue(("load", 1));
        let role_2 = tickets.issue(("load", 2));
        assert!(tickets.is_current(&role_1));
        assert!(tickets.is_current(&role_2));
        assert_eq!(role_2.key(), &("load", 2));
    }
}
