use crate::entry::Entry;

/// Keys the outliner reacts to while it has keyboard focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    /// Clears the filter box.
    Escape,
}

impl NavKey {
    pub fn is_arrow(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

/// What the host should do with the key event after the outliner saw it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl KeyResponse {
    pub const CONSUMED: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
    pub const IGNORED: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    pub fn is_consumed(self) -> bool {
        self.prevent_default && self.stop_propagation
    }
}

/// Key-down handling. Arrows are always swallowed, even when the key-up
/// turns out to be a no-op, so the page never scrolls under the outliner.
pub fn key_down_response(key: NavKey) -> KeyResponse {
    if key.is_arrow() {
        KeyResponse::CONSUMED
    } else {
        KeyResponse::IGNORED
    }
}

/// Index of the closest entry before `from` that passes `shown`.
pub(crate) fn previous_shown<N>(
    entries: &[Entry<N>],
    from: usize,
    shown: impl Fn(&Entry<N>) -> bool,
) -> Option<usize> {
    entries[..from.min(entries.len())]
        .iter()
        .rposition(|entry| shown(entry))
}

/// Index of the first entry at or after `start` that passes `shown`.
pub(crate) fn next_shown<N>(
    entries: &[Entry<N>],
    start: usize,
    shown: impl Fn(&Entry<N>) -> bool,
) -> Option<usize> {
    entries
        .get(start..)?
        .iter()
        .position(|entry| shown(entry))
        .map(|offset| start + offset)
}
