use std::collections::HashSet;

use super::inbound::EventKind;

/// Which callback kinds a session currently accepts.
///
/// Registration only ever adds kinds; the sole removal is the bulk reset
/// performed when the player is (re)initialized.
#[derive(Debug, Default, Clone)]
pub struct EventRegistry {
    enabled: HashSet<EventKind>,
}

impl EventRegistry {
    pub fn register(&mut self, kinds: &[EventKind]) {
        self.enabled.extend(kinds.iter().copied());
    }

    pub fn is_registered(&self, kind: EventKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// Drop every registration.
    pub fn reset(&mut self) {
        self.enabled.clear();
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_additive() {
        let mut registry = EventRegistry::default();
        registry.register(&EventKind::RECORDER);
        registry.register(&EventKind::RECORDER);
        registry.register(&EventKind::PLAYER);

        assert_eq!(registry.len(), 7);
        assert!(registry.is_registered(EventKind::DbPeakProgress));
        assert!(registry.is_registered(EventKind::SkipBackward));
    }

    #[test]
    fn reset_clears_everything() {
        let mut registry = EventRegistry::default();
        registry.register(&EventKind::PLAYER);
        registry.reset();
        assert!(registry.is_empty());
        assert!(!registry.is_registered(EventKind::PlayerProgress));
    }
}
