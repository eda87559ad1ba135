use std::collections::HashMap;

use crate::tracker::HandId;

/// Last emitted violation time per hand.
///
/// Only suppresses re-emission; it never blocks state transitions.
#[derive(Debug, Clone)]
pub struct CooldownTable {
    cooldown: f64,
    last_violation: HashMap<HandId, f64>,
}

impl CooldownTable {
    pub fn new(cooldown: f64) -> Self {
        Self {
            cooldown,
            last_violation: HashMap::new(),
        }
    }

    pub fn in_cooldown(&self, id: HandId, now: f64) -> bool {
        self.last_violation
            .get(&id)
            .is_some_and(|&last| now - last < self.cooldown)
    }

    pub fn record(&mut self, id: HandId, now: f64) {
        self.last_violation.insert(id, now);
    }

    pub fn last_violation(&self, id: HandId) -> Option<f64> {
        self.last_violation.get(&id).copied()
    }

    /// Drop entries whose cooldown has elapsed.
    pub fn prune(&mut self, now: f64) {
        let cooldown = self.cooldown;
        self.last_violation.retain(|_, last| now - *last < cooldown);
    }

    pub fn remove(&mut self, id: HandId) {
        self.last_violation.remove(&id);
    }

    pub fn clear(&mut self) {
        self.last_violation.clear();
    }

    pub fn len(&self) -> usize {
        self.last_violation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_violation.is_empty()
    }
}
