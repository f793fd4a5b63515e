use std::collections::BTreeSet;

/// Direction the point light moves in for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMove {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Light bindings in priority order. When several bound keys are held only
/// the first one listed here acts.
pub const LIGHT_BINDINGS: [(char, LightMove); 6] = [
    ('w', LightMove::Forward),
    ('s', LightMove::Backward),
    ('a', LightMove::Left),
    ('d', LightMove::Right),
    ('q', LightMove::Up),
    ('e', LightMove::Down),
];

impl LightMove {
    /// The single light move for a set of held keys, if any.
    pub fn from_held(keys: &BTreeSet<char>) -> Option<Self> {
        LIGHT_BINDINGS
            .iter()
            .find(|(key, _)| keys.contains(key))
            .map(|(_, action)| *action)
    }
}

/// One fixed camera step along the view direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraDolly {
    Forward,
    Backward,
}

impl CameraDolly {
    /// Only the sign of the wheel delta matters.
    pub fn from_wheel(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Forward)
        } else if delta < 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &str) -> BTreeSet<char> {
        keys.chars().collect()
    }

    #[test]
    fn each_binding_maps_alone() {
        for (key, action) in LIGHT_BINDINGS {
            assert_eq!(LightMove::from_held(&held(&key.to_string())), Some(action));
        }
    }

    #[test]
    fn priority_picks_exactly_one() {
        assert_eq!(LightMove::from_held(&held("wsadqe")), Some(LightMove::Forward));
        assert_eq!(LightMove::from_held(&held("ds")), Some(LightMove::Backward));
        assert_eq!(LightMove::from_held(&held("eqd")), Some(LightMove::Right));
        assert_eq!(LightMove::from_held(&held("eq")), Some(LightMove::Up));
    }

    #[test]
    fn unbound_keys_do_nothing() {
        assert_eq!(LightMove::from_held(&held("xyz")), None);
        assert_eq!(LightMove::from_held(&BTreeSet::new()), None);
    }

    #[test]
    fn wheel_sign_only() {
        assert_eq!(CameraDolly::from_wheel(0.1), Some(CameraDolly::Forward));
        assert_eq!(CameraDolly::from_wheel(12.0), Some(CameraDolly::Forward));
        assert_eq!(CameraDolly::from_wheel(-3.0), Some(CameraDolly::Backward));
        assert_eq!(CameraDolly::from_wheel(0.0), None);
    }
}
