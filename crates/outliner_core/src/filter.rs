use tracing::debug;

use crate::entry::Entry;
use crate::host::SceneHost;
use crate::selector::Selector;

/// Compiled filter text.
///
/// A node matches when its identifier contains the text (ignoring case), its
/// tag name contains the upper-cased text, one of its classes equals the text,
/// or it matches the text read as a selector. Text that does not parse as a
/// selector only disables the selector test.
#[derive(Clone, Debug)]
pub struct NodeFilter {
    text: String,
    upper: String,
    selector: Option<Selector>,
}

impl NodeFilter {
    pub fn new(text: &str) -> Self {
        let selector = if text.is_empty() {
            None
        } else {
            match Selector::parse(text) {
                Ok(selector) => Some(selector),
                Err(err) => {
                    debug!(%err, text, "filter text is not a selector");
                    None
                }
            }
        };
        Self {
            text: text.to_string(),
            upper: text.to_uppercase(),
            selector,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn matches<H: SceneHost + ?Sized>(&self, host: &H, node: H::Node) -> bool {
        if self.is_empty() {
            return true;
        }

        host.identifier(node)
            .is_some_and(|id| id.to_uppercase().contains(&self.upper))
            || host.tag_name(node).contains(&self.upper)
            || host.class_list(node).iter().any(|class| *class == self.text)
            || self
                .selector
                .as_ref()
                .is_some_and(|selector| host.matches_selector(node, selector))
    }
}

/// Keep the entries whose node matches `text`. Empty text keeps everything.
pub fn filter_entries<H: SceneHost + ?Sized>(
    host: &H,
    entries: &[Entry<H::Node>],
    text: &str,
) -> Vec<Entry<H::Node>> {
    if text.is_empty() {
        return entries.to_vec();
    }
    let filter = NodeFilter::new(text);
    entries
        .iter()
        .filter(|entry| filter.matches(host, entry.node))
        .cloned()
        .collect()
}
