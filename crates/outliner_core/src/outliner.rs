use std::hash::Hash;
use std::time::Duration;

use tracing::debug;

use crate::debounce::Debounce;
use crate::entry::{Entry, SequenceId};
use crate::expand::ExpandState;
use crate::filter::filter_entries;
use crate::flatten::flatten;
use crate::host::SceneHost;
use crate::navigation::{self, KeyResponse, NavKey};
use crate::visibility::is_visible;

/// Delays for the deferred work the outliner schedules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period before a structural change triggers a rebuild.
    pub rebuild: Duration,
    /// Quiet period after the last keystroke in the filter box.
    pub filter: Duration,
    /// Wait between selecting a row and checking whether it needs scrolling,
    /// so the row has been laid out.
    pub scroll: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            rebuild: Duration::ZERO,
            filter: Duration::from_millis(100),
            scroll: Duration::from_millis(100),
        }
    }
}

/// Notifications for the integration layer, drained with
/// [`Outliner::drain_signals`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal<N> {
    /// The outliner selected a node; other panels should follow.
    EntitySelected(N),
    /// The row with this key should be brought into view if it is clipped.
    ScrollIntoView(SequenceId),
    /// Rows, expansion or selection changed and the view needs redrawing.
    ViewChanged,
}

/// A row the rendering layer should draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row<N> {
    pub node: N,
    pub depth: usize,
    pub sequence_id: SequenceId,
    /// Position in the filtered list.
    pub index: usize,
    pub label: String,
    /// Upper-case tag, used to pick the row icon.
    pub tag: String,
    pub expanded: bool,
    pub selected: bool,
    pub has_children: bool,
    pub hidden: bool,
    pub filtering: bool,
}

/// Keeps a filtered, navigable row list in sync with a live hierarchy.
///
/// Structural changes and filter edits only schedule work; [`Outliner::tick`]
/// runs whatever is due. The filter recompute reads the entry list at the
/// moment it runs, so it always sees the latest rebuild.
#[derive(Debug)]
pub struct Outliner<N> {
    entries: Vec<Entry<N>>,
    filtered: Vec<Entry<N>>,
    expand: ExpandState<N>,
    /// What the user typed.
    filter_text: String,
    /// What `filtered` was computed with.
    applied_filter: String,
    selected: Option<N>,
    selected_index: Option<usize>,
    rebuild: Debounce,
    filter: Debounce,
    scroll: Debounce,
    /// Node to scroll to once the delay passes; its key is looked up then.
    pending_scroll: Option<N>,
    signals: Vec<Signal<N>>,
    rebuild_count: u64,
    view_revision: u64,
}

impl<N: Copy + Eq + Hash + std::fmt::Debug> Outliner<N> {
    pub fn new(root: N, timings: Timings) -> Self {
        Self {
            entries: Vec::new(),
            filtered: Vec::new(),
            expand: ExpandState::new(root),
            filter_text: String::new(),
            applied_filter: String::new(),
            selected: None,
            selected_index: None,
            rebuild: Debounce::new(timings.rebuild),
            filter: Debounce::new(timings.filter),
            scroll: Debounce::new(timings.scroll),
            pending_scroll: None,
            signals: Vec::new(),
            rebuild_count: 0,
            view_revision: 0,
        }
    }

    pub fn set_timings(&mut self, timings: Timings) {
        self.rebuild.set_delay(timings.rebuild);
        self.filter.set_delay(timings.filter);
        self.scroll.set_delay(timings.scroll);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn entries(&self) -> &[Entry<N>] {
        &self.entries
    }

    pub fn filtered(&self) -> &[Entry<N>] {
        &self.filtered
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn is_filtering(&self) -> bool {
        !self.applied_filter.is_empty()
    }

    pub fn selected(&self) -> Option<N> {
        self.selected
    }

    /// Position of the selection in the filtered list, `None` when the
    /// selected node is filtered out, gone, or nothing is selected.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_entry(&self) -> Option<&Entry<N>> {
        self.selected_index.and_then(|i| self.filtered.get(i))
    }

    pub fn is_expanded(&self, node: N) -> bool {
        self.expand.is_expanded(node)
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Bumped whenever anything the rows depend on changes.
    pub fn view_revision(&self) -> u64 {
        self.view_revision
    }

    pub fn has_pending_work(&self) -> bool {
        self.rebuild.is_pending() || self.filter.is_pending() || self.scroll.is_pending()
    }

    pub fn drain_signals(&mut self) -> Vec<Signal<N>> {
        std::mem::take(&mut self.signals)
    }

    // -----------------------------------------------------------------------
    // Host notifications
    // -----------------------------------------------------------------------

    pub fn request_rebuild(&mut self, now: Duration) {
        self.rebuild.schedule(now);
    }

    pub fn notify_child_attached<H>(&mut self, host: &H, child: N, now: Duration)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        if !host.is_editor_internal(child) {
            self.request_rebuild(now);
        }
    }

    pub fn notify_child_detached<H>(&mut self, host: &H, child: N, now: Duration)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        // Despawned children can no longer be classified.
        if !host.is_alive(child) || !host.is_editor_internal(child) {
            self.request_rebuild(now);
        }
    }

    pub fn notify_id_changed(&mut self, now: Duration) {
        self.request_rebuild(now);
    }

    /// Only `mixin` and `visible` affect how rows are drawn.
    pub fn notify_component_changed(&mut self, component: &str, now: Duration) {
        if matches!(component, "mixin" | "visible") {
            self.request_rebuild(now);
        }
    }

    // -----------------------------------------------------------------------
    // Filter
    // -----------------------------------------------------------------------

    pub fn on_filter_text_change(&mut self, text: &str, now: Duration) {
        self.filter_text = text.to_string();
        self.filter.schedule(now);
    }

    /// Clearing applies on the next tick without the typing delay.
    pub fn clear_filter(&mut self, now: Duration) {
        self.filter_text.clear();
        self.filter.schedule_now(now);
    }

    // -----------------------------------------------------------------------
    // Expand / collapse
    // -----------------------------------------------------------------------

    pub fn toggle_expanded_collapsed(&mut self, node: N) {
        self.expand.toggle(node);
        self.mark_view_changed();
    }

    pub fn expand_ancestors_of<H>(&mut self, host: &H, node: N)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        self.expand.expand_ancestors_of(host, node);
        self.mark_view_changed();
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Select `node` (or clear with `None`).
    ///
    /// When the node is in the filtered list its ancestors are expanded, an
    /// [`Signal::EntitySelected`] goes out and a scroll check is scheduled.
    /// Otherwise only the index is reset; the caller already knows what it
    /// selected.
    pub fn select_entity<H>(&mut self, host: &H, node: Option<N>, now: Duration)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        self.selected = node;
        let found = node.and_then(|n| self.filtered.iter().position(|e| e.node == n));

        match (node, found) {
            (Some(node), Some(index)) => {
                self.selected_index = Some(index);
                self.expand.expand_ancestors_of(host, node);
                self.signals.push(Signal::EntitySelected(node));
                self.pending_scroll = Some(node);
                self.scroll.schedule(now);
            }
            _ => {
                self.selected_index = None;
            }
        }
        self.mark_view_changed();
    }

    /// Row click: select, then expand or collapse if the row has children.
    pub fn click_row<H>(&mut self, host: &H, node: N, now: Duration)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        self.select_entity(host, Some(node), now);
        if has_listed_children(host, node) {
            self.toggle_expanded_collapsed(node);
        }
    }

    // -----------------------------------------------------------------------
    // Keyboard
    // -----------------------------------------------------------------------

    pub fn on_key_down(&self, key: NavKey) -> KeyResponse {
        navigation::key_down_response(key)
    }

    pub fn on_key_up<H>(&mut self, host: &H, key: NavKey, now: Duration)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        if key == NavKey::Escape {
            if !self.filter_text.is_empty() {
                self.clear_filter(now);
            }
            return;
        }

        let Some(selected) = self.selected else {
            return;
        };

        match key {
            NavKey::Left => {
                if self.expand.is_expanded(selected) {
                    self.toggle_expanded_collapsed(selected);
                }
            }
            NavKey::Right => {
                if !self.expand.is_expanded(selected) {
                    self.toggle_expanded_collapsed(selected);
                }
            }
            NavKey::Up => {
                let target = self.selected_index.and_then(|from| {
                    navigation::previous_shown(&self.filtered, from, |e| self.navigable(host, e))
                });
                if let Some(index) = target {
                    self.select_index(host, index, now);
                }
            }
            NavKey::Down => {
                let start = self.selected_index.map_or(0, |i| i + 1);
                let target =
                    navigation::next_shown(&self.filtered, start, |e| self.navigable(host, e));
                if let Some(index) = target {
                    self.select_index(host, index, now);
                }
            }
            NavKey::Escape => {}
        }
    }

    fn select_index<H>(&mut self, host: &H, index: usize, now: Duration)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        if let Some(entry) = self.filtered.get(index) {
            let node = entry.node;
            self.select_entity(host, Some(node), now);
        }
    }

    // -----------------------------------------------------------------------
    // Deferred work
    // -----------------------------------------------------------------------

    /// Run every timer that is due: rebuild, then filter, then scroll.
    pub fn tick<H>(&mut self, host: &H, now: Duration)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        if self.rebuild.fire(now) {
            self.rebuild_now(host);
        }
        if self.filter.fire(now) {
            self.apply_filter(host);
        }
        if self.scroll.fire(now) {
            self.flush_scroll();
        }
    }

    /// Re-flatten the live tree and reapply the current filter.
    pub fn rebuild_now<H>(&mut self, host: &H)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        self.rebuild.cancel();
        self.entries = flatten(host);
        self.expand.prune(host);
        if self.selected.is_some_and(|node| !host.is_alive(node)) {
            self.selected = None;
        }
        self.rebuild_count += 1;
        debug!(
            entries = self.entries.len(),
            rebuilds = self.rebuild_count,
            "rebuilt outliner entries"
        );
        self.apply_filter(host);
    }

    fn apply_filter<H>(&mut self, host: &H)
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        self.applied_filter.clone_from(&self.filter_text);
        self.filtered = filter_entries(host, &self.entries, &self.applied_filter);
        self.resolve_selection();
        debug!(
            filter = %self.applied_filter,
            matched = self.filtered.len(),
            "applied outliner filter"
        );
        self.mark_view_changed();
    }

    fn resolve_selection(&mut self) {
        self.selected_index = self
            .selected
            .and_then(|node| self.filtered.iter().position(|e| e.node == node));
    }

    fn flush_scroll(&mut self) {
        let Some(node) = self.pending_scroll.take() else {
            return;
        };
        match self.filtered.iter().find(|e| e.node == node) {
            Some(entry) => self
                .signals
                .push(Signal::ScrollIntoView(entry.sequence_id.clone())),
            None => debug!(?node, "row to scroll to is gone"),
        }
    }

    fn mark_view_changed(&mut self) {
        self.view_revision += 1;
        if !self.signals.contains(&Signal::ViewChanged) {
            self.signals.push(Signal::ViewChanged);
        }
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Whether Up/Down may land on the entry: every match while filtering,
    /// otherwise rows whose ancestors are all expanded. The root has no
    /// parent and is never a target.
    pub fn navigable<H>(&self, host: &H, entry: &Entry<N>) -> bool
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        self.is_filtering() || is_visible(host, &self.expand, entry.node)
    }

    /// Whether the entry's row is drawn: the navigable rows plus the root.
    pub fn row_shown<H>(&self, host: &H, entry: &Entry<N>) -> bool
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        entry.depth == 0 || self.navigable(host, entry)
    }

    pub fn rows<H>(&self, host: &H) -> Vec<Row<N>>
    where
        H: SceneHost<Node = N> + ?Sized,
    {
        let filtering = self.is_filtering();
        self.filtered
            .iter()
            .enumerate()
            .filter(|(_, entry)| host.is_alive(entry.node) && self.row_shown(host, entry))
            .map(|(index, entry)| Row {
                node: entry.node,
                depth: entry.depth,
                sequence_id: entry.sequence_id.clone(),
                index,
                label: node_label(host, entry.node),
                tag: host.tag_name(entry.node).to_uppercase(),
                expanded: self.expand.is_expanded(entry.node),
                selected: self.selected == Some(entry.node),
                has_children: has_listed_children(host, entry.node),
                hidden: host.is_hidden(entry.node),
                filtering,
            })
            .collect()
    }
}

/// Identifier if there is one, otherwise the lower-cased tag name.
pub fn node_label<H: SceneHost + ?Sized>(host: &H, node: H::Node) -> String {
    host.identifier(node)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| host.tag_name(node).to_lowercase())
}

fn has_listed_children<H: SceneHost + ?Sized>(host: &H, node: H::Node) -> bool {
    host.children(node)
        .into_iter()
        .any(|child| !host.is_editor_internal(child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::TreeHost;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn mounted(host: &TreeHost) -> Outliner<usize> {
        let mut outliner = Outliner::new(host.root(), Timings::default());
        outliner.request_rebuild(ms(0));
        outliner.tick(host, ms(0));
        outliner.drain_signals();
        outliner
    }

    fn selections(signals: &[Signal<usize>]) -> Vec<usize> {
        signals
            .iter()
            .filter_map(|s| match s {
                Signal::EntitySelected(node) => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// scene -> [a, b -> [c]]
    fn small_scene() -> (TreeHost, usize, usize, usize) {
        let mut host = TreeHost::new("scene");
        let a = host.add(0, "a");
        let b = host.add(0, "b");
        let c = host.add(b, "c");
        (host, a, b, c)
    }

    #[test]
    fn mount_builds_entries() {
        let (host, a, b, c) = small_scene();
        let outliner = mounted(&host);
        let shape: Vec<_> = outliner.entries().iter().map(|e| (e.node, e.depth)).collect();
        assert_eq!(shape, vec![(0, 0), (a, 1), (b, 1), (c, 2)]);
        assert_eq!(outliner.filtered(), outliner.entries());
        assert_eq!(outliner.rebuild_count(), 1);
    }

    #[test]
    fn structural_bursts_rebuild_once() {
        let (mut host, a, _, _) = small_scene();
        let mut outliner = mounted(&host);

        let d = host.add(a, "d");
        outliner.notify_child_attached(&host, d, ms(10));
        let e = host.add(a, "e");
        outliner.notify_child_attached(&host, e, ms(10));
        host.remove(d);
        outliner.notify_child_detached(&host, d, ms(10));
        outliner.tick(&host, ms(10));
        outliner.tick(&host, ms(11));

        assert_eq!(outliner.rebuild_count(), 2);
        assert!(outliner.entries().iter().any(|entry| entry.node == e));
        assert!(!outliner.entries().iter().any(|entry| entry.node == d));
    }

    #[test]
    fn internal_children_do_not_trigger_rebuilds() {
        let (mut host, _, _, _) = small_scene();
        let mut outliner = mounted(&host);
        let gizmo = host.add_internal(0, "gizmo");
        outliner.notify_child_attached(&host, gizmo, ms(5));
        assert!(!outliner.has_pending_work());
    }

    #[test]
    fn only_display_components_trigger_rebuilds() {
        let (host, _, _, _) = small_scene();
        let mut outliner = mounted(&host);
        outliner.notify_component_changed("position", ms(5));
        assert!(!outliner.has_pending_work());
        outliner.notify_component_changed("visible", ms(5));
        outliner.notify_component_changed("mixin", ms(5));
        outliner.tick(&host, ms(5));
        assert_eq!(outliner.rebuild_count(), 2);
        outliner.notify_id_changed(ms(6));
        outliner.tick(&host, ms(6));
        assert_eq!(outliner.rebuild_count(), 3);
    }

    #[test]
    fn filter_waits_for_typing_to_settle() {
        let mut host = TreeHost::new("scene");
        host.add(0, "Foo");
        host.add(0, "bar");
        let mut outliner = mounted(&host);

        outliner.on_filter_text_change("f", ms(0));
        outliner.on_filter_text_change("fo", ms(50));
        outliner.tick(&host, ms(120));
        assert_eq!(outliner.filtered().len(), 3, "still inside the quiet period");

        outliner.tick(&host, ms(150));
        let ids: Vec<_> = outliner
            .filtered()
            .iter()
            .map(|e| host.identifier(e.node).unwrap())
            .collect();
        assert_eq!(ids, ["Foo"]);
        assert!(outliner.is_filtering());
    }

    #[test]
    fn clearing_the_filter_is_immediate() {
        let (host, _, _, _) = small_scene();
        let mut outliner = mounted(&host);
        outliner.on_filter_text_change("#c", ms(0));
        outliner.tick(&host, ms(100));
        assert_eq!(outliner.filtered().len(), 1);

        outliner.on_filter_text_change("cx", ms(200));
        outliner.clear_filter(ms(220));
        outliner.tick(&host, ms(220));
        assert_eq!(outliner.filtered().len(), 4);
        assert!(!outliner.is_filtering());
        assert!(!outliner.has_pending_work());
    }

    #[test]
    fn filter_reads_the_latest_rebuild() {
        let (mut host, a, _, _) = small_scene();
        let mut outliner = mounted(&host);

        outliner.on_filter_text_change("late", ms(0));
        let late = host.add(a, "late");
        outliner.notify_child_attached(&host, late, ms(40));
        outliner.tick(&host, ms(40));
        outliner.tick(&host, ms(100));

        let nodes: Vec<_> = outliner.filtered().iter().map(|e| e.node).collect();
        assert_eq!(nodes, vec![late]);
    }

    #[test]
    fn selecting_a_missing_node_resets_the_index() {
        let (mut host, a, _, _) = small_scene();
        let mut outliner = mounted(&host);
        outliner.select_entity(&host, Some(a), ms(0));
        assert_eq!(outliner.selected_index(), Some(1));
        outliner.drain_signals();

        let stray = host.add_internal(0, "stray");
        outliner.select_entity(&host, Some(stray), ms(10));
        assert_eq!(outliner.selected_index(), None);
        assert!(selections(&outliner.drain_signals()).is_empty());

        outliner.select_entity(&host, None, ms(20));
        assert_eq!(outliner.selected_index(), None);
        assert!(selections(&outliner.drain_signals()).is_empty());
    }

    #[test]
    fn selection_expands_ancestors() {
        let mut host = TreeHost::new("scene");
        let a = host.add(0, "a");
        let b = host.add(a, "b");
        let c = host.add(b, "c");
        let d = host.add(c, "d");
        let mut outliner = mounted(&host);
        outliner.toggle_expanded_collapsed(0);
        assert!(!outliner.is_expanded(0));

        outliner.select_entity(&host, Some(d), ms(0));
        for node in [0, a, b, c] {
            assert!(outliner.is_expanded(node));
        }
        assert_eq!(selections(&outliner.drain_signals()), vec![d]);
    }

    #[test]
    fn selection_schedules_a_scroll_check() {
        let (host, _, _, c) = small_scene();
        let mut outliner = mounted(&host);
        outliner.select_entity(&host, Some(c), ms(0));
        outliner.drain_signals();

        outliner.tick(&host, ms(50));
        assert!(outliner.drain_signals().is_empty());
        outliner.tick(&host, ms(100));
        assert_eq!(
            outliner.drain_signals(),
            vec![Signal::ScrollIntoView(SequenceId::at(3))]
        );
    }

    #[test]
    fn scroll_check_follows_the_node_across_rebuilds() {
        let (mut host, a, b, _) = small_scene();
        let mut outliner = mounted(&host);
        outliner.select_entity(&host, Some(b), ms(0));
        assert_eq!(
            outliner.selected_entry().map(|e| e.sequence_id.clone()),
            Some(SequenceId::at(2))
        );
        outliner.drain_signals();

        let x = host.add(a, "x");
        outliner.notify_child_attached(&host, x, ms(10));
        outliner.tick(&host, ms(10));
        outliner.drain_signals();

        outliner.tick(&host, ms(100));
        let scrolls: Vec<_> = outliner
            .drain_signals()
            .into_iter()
            .filter(|s| matches!(s, Signal::ScrollIntoView(_)))
            .collect();
        assert_eq!(scrolls, vec![Signal::ScrollIntoView(SequenceId::at(3))]);
    }

    #[test]
    fn scroll_check_is_dropped_when_the_row_disappears() {
        let (host, _, _, c) = small_scene();
        let mut outliner = mounted(&host);
        outliner.select_entity(&host, Some(c), ms(0));
        outliner.on_filter_text_change("#a", ms(0));
        outliner.drain_signals();

        outliner.tick(&host, ms(100));
        let signals = outliner.drain_signals();
        assert!(!signals.iter().any(|s| matches!(s, Signal::ScrollIntoView(_))));
        assert_eq!(outliner.selected_index(), None);
    }

    #[test]
    fn selection_survives_rebuilds() {
        let (mut host, a, b, c) = small_scene();
        let mut outliner = mounted(&host);
        outliner.select_entity(&host, Some(c), ms(0));
        assert_eq!(outliner.selected_index(), Some(3));

        let inserted = host.add_anonymous(a);
        outliner.notify_child_attached(&host, inserted, ms(1));
        outliner.tick(&host, ms(1));
        assert_eq!(outliner.selected_index(), Some(4));
        assert_eq!(outliner.selected_entry().map(|e| e.node), Some(c));

        host.remove(b);
        outliner.notify_child_detached(&host, b, ms(2));
        outliner.tick(&host, ms(2));
        assert_eq!(outliner.selected(), None);
        assert_eq!(outliner.selected_index(), None);
        assert!(outliner.entries().iter().any(|e| e.node == a));
    }

    #[test]
    fn arrow_keys_skip_collapsed_rows() {
        // scene -> [A -> [A1 -> [A1a]], B]
        let mut host = TreeHost::new("scene");
        let a = host.add(0, "A");
        let a1 = host.add(a, "A1");
        host.add(a1, "A1a");
        let b = host.add(0, "B");
        let mut outliner = mounted(&host);
        outliner.toggle_expanded_collapsed(a);
        outliner.toggle_expanded_collapsed(b);

        outliner.select_entity(&host, Some(a), ms(0));
        outliner.on_key_up(&host, NavKey::Down, ms(0));
        assert_eq!(outliner.selected(), Some(a1));
        outliner.on_key_up(&host, NavKey::Down, ms(0));
        assert_eq!(outliner.selected(), Some(b));
        outliner.on_key_up(&host, NavKey::Down, ms(0));
        assert_eq!(outliner.selected(), Some(b), "no row below B");

        outliner.on_key_up(&host, NavKey::Up, ms(0));
        assert_eq!(outliner.selected(), Some(a1));
        outliner.on_key_up(&host, NavKey::Up, ms(0));
        assert_eq!(outliner.selected(), Some(a));
        outliner.on_key_up(&host, NavKey::Up, ms(0));
        assert_eq!(outliner.selected(), Some(a), "the root is not a target");
    }

    #[test]
    fn arrow_keys_never_select_the_root() {
        let (host, a, _, _) = small_scene();
        let mut outliner = mounted(&host);
        assert!(outliner.rows(&host).iter().any(|r| r.node == 0));

        outliner.select_entity(&host, Some(0), ms(0));
        outliner.on_key_up(&host, NavKey::Up, ms(0));
        assert_eq!(outliner.selected(), Some(0));
        outliner.on_key_up(&host, NavKey::Down, ms(0));
        assert_eq!(outliner.selected(), Some(a));
    }

    #[test]
    fn left_and_right_collapse_and_expand() {
        let (host, _, b, _) = small_scene();
        let mut outliner = mounted(&host);
        outliner.on_key_up(&host, NavKey::Right, ms(0));
        assert!(!outliner.is_expanded(b), "nothing selected yet");

        outliner.select_entity(&host, Some(b), ms(0));
        outliner.on_key_up(&host, NavKey::Right, ms(0));
        assert!(outliner.is_expanded(b));
        outliner.on_key_up(&host, NavKey::Right, ms(0));
        assert!(outliner.is_expanded(b));
        outliner.on_key_up(&host, NavKey::Left, ms(0));
        assert!(!outliner.is_expanded(b));
        outliner.on_key_up(&host, NavKey::Left, ms(0));
        assert!(!outliner.is_expanded(b));
    }

    #[test]
    fn key_down_swallows_arrows_even_without_selection() {
        let (host, _, _, _) = small_scene();
        let outliner = mounted(&host);
        assert!(outliner.on_key_down(NavKey::Up).is_consumed());
        assert!(!outliner.on_key_down(NavKey::Escape).is_consumed());
    }

    #[test]
    fn escape_clears_the_filter() {
        let (host, _, _, _) = small_scene();
        let mut outliner = mounted(&host);
        outliner.on_filter_text_change("b", ms(0));
        outliner.tick(&host, ms(100));
        assert!(outliner.is_filtering());

        outliner.on_key_up(&host, NavKey::Escape, ms(200));
        outliner.tick(&host, ms(200));
        assert!(!outliner.is_filtering());
        assert_eq!(outliner.filter_text(), "");
    }

    #[test]
    fn navigation_while_filtering_ignores_collapse_state() {
        let mut host = TreeHost::new("scene");
        let box1 = host.add(0, "box1");
        let nested = host.add(box1, "group");
        let box2 = host.add(nested, "box2");
        let mut outliner = mounted(&host);
        outliner.on_filter_text_change("box", ms(0));
        outliner.tick(&host, ms(100));

        outliner.select_entity(&host, Some(box1), ms(100));
        assert!(!outliner.is_expanded(box1));
        assert!(!outliner.is_expanded(nested));
        outliner.on_key_up(&host, NavKey::Down, ms(100));
        assert_eq!(outliner.selected(), Some(box2));
        assert_eq!(outliner.selected_index(), Some(1));
    }

    #[test]
    fn rows_follow_expansion_and_filter() {
        let (mut host, a, b, c) = small_scene();
        host.set_hidden(a, true);
        let mut outliner = mounted(&host);

        let nodes = |rows: Vec<Row<usize>>| rows.into_iter().map(|r| r.node).collect::<Vec<_>>();
        assert_eq!(nodes(outliner.rows(&host)), vec![0, a, b]);

        outliner.toggle_expanded_collapsed(b);
        let rows = outliner.rows(&host);
        assert_eq!(nodes(rows.clone()), vec![0, a, b, c]);
        assert!(rows[1].hidden);
        assert!(rows[2].has_children && rows[2].expanded);
        assert!(!rows[3].has_children);
        assert_eq!(rows[3].label, "c");

        outliner.toggle_expanded_collapsed(b);
        outliner.on_filter_text_change("c", ms(0));
        outliner.tick(&host, ms(100));
        let rows = outliner.rows(&host);
        assert_eq!(nodes(rows.clone()), vec![0, c]);
        assert!(rows.iter().all(|r| r.filtering));
        assert_eq!(rows[1].index, 1);
    }

    #[test]
    fn anonymous_rows_use_the_tag_as_label() {
        let mut host = TreeHost::new("scene");
        let anon = host.add_anonymous(0);
        host.set_tag(anon, "A-BOX");
        let outliner = mounted(&host);
        assert_eq!(outliner.rows(&host)[1].label, "a-box");
        assert_eq!(outliner.rows(&host)[1].tag, "A-BOX");
    }

    #[test]
    fn click_selects_and_toggles_parents() {
        let (host, a, b, _) = small_scene();
        let mut outliner = mounted(&host);
        outliner.click_row(&host, b, ms(0));
        assert_eq!(outliner.selected(), Some(b));
        assert!(outliner.is_expanded(b));
        outliner.click_row(&host, b, ms(0));
        assert!(!outliner.is_expanded(b));

        outliner.click_row(&host, a, ms(0));
        assert!(!outliner.is_expanded(a), "leaf rows do not toggle");
    }

    #[test]
    fn id_rename_changes_rows_after_rebuild() {
        let (mut host, a, _, _) = small_scene();
        let mut outliner = mounted(&host);
        host.set_id(a, "renamed");
        outliner.notify_id_changed(ms(3));
        outliner.tick(&host, ms(3));
        assert_eq!(outliner.rows(&host)[1].label, "renamed");
    }

    #[test]
    fn end_to_end() {
        let (host, a, b, c) = small_scene();
        let mut outliner = Outliner::new(host.root(), Timings::default());
        outliner.request_rebuild(ms(0));
        outliner.tick(&host, ms(0));
        outliner.toggle_expanded_collapsed(b);

        let shape: Vec<_> = outliner.entries().iter().map(|e| (e.node, e.depth)).collect();
        assert_eq!(shape, vec![(0, 0), (a, 1), (b, 1), (c, 2)]);

        outliner.select_entity(&host, Some(c), ms(10));
        assert!(outliner.is_expanded(b));
        assert_eq!(outliner.selected_index(), Some(3));

        outliner.on_filter_text_change("a", ms(20));
        outliner.tick(&host, ms(60));
        assert_eq!(outliner.filtered().len(), 4);
        outliner.tick(&host, ms(120));
        let filtered: Vec<_> = outliner.filtered().iter().map(|e| (e.node, e.depth)).collect();
        assert_eq!(filtered, vec![(a, 1)]);
        assert_eq!(outliner.selected_index(), None);
        assert_eq!(outliner.selected(), Some(c));
    }
}
