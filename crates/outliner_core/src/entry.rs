use std::fmt;

const SEQUENCE_PREFIX: &str = "sgnode";

/// Positional key of a row within one rebuild (`sgnode0`, `sgnode1`, ...).
///
/// Used to find the rendered row again, e.g. to scroll it into view. It is not
/// a node identity: the same node gets a different key when rows are inserted
/// above it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SequenceId(String);

impl SequenceId {
    pub fn at(position: usize) -> Self {
        Self(format!("{SEQUENCE_PREFIX}{position}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One node of the flattened hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<N> {
    pub node: N,
    pub depth: usize,
    pub sequence_id: SequenceId,
}
