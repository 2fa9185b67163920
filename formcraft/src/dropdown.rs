//! Click-outside listeners with scoped lifetimes.
//!
//! A dropdown that is open listens for clicks anywhere on screen so it can close when
//! the click lands outside of it. The listener is held by a [`ListenerGuard`]; dropping
//! the guard (on close, or when the owning view goes away) detaches it.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

/// A screen position, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A screen rectangle, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if `point` lies inside this region.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && u32::from(point.x) < u32::from(self.x) + u32::from(self.width)
            && u32::from(point.y) < u32::from(self.y) + u32::from(self.height)
    }
}

/// What a listener wants after handling a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    Keep,
    Detach,
}

type Callback = Box<dyn FnMut(Point) -> ListenerControl>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback>,
}

/// Global click listeners for one view tree.
///
/// Single-threaded by construction: the registry is shared with `Rc` and only touched
/// from the event loop.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Listeners>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("attached", &self.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener. It stays attached until the returned guard is dropped or the
    /// listener asks to be detached.
    #[must_use = "dropping the guard detaches the listener immediately"]
    pub fn attach(
        &self,
        callback: impl FnMut(Point) -> ListenerControl + 'static,
    ) -> ListenerGuard {
        let mut listeners = self.inner.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.callbacks.insert(id, Box::new(callback));
        tracing::trace!(listener = id, attached = listeners.callbacks.len(), "listener attached");
        ListenerGuard {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver a click to every attached listener.
    pub fn dispatch(&self, at: Point) {
        // Callbacks run without the registry borrowed, so they may attach new listeners.
        let mut callbacks = std::mem::take(&mut self.inner.borrow_mut().callbacks);
        callbacks.retain(|_, callback| callback(at) == ListenerControl::Keep);

        let mut listeners = self.inner.borrow_mut();
        callbacks.extend(std::mem::take(&mut listeners.callbacks));
        listeners.callbacks = callbacks;
    }

    /// Number of attached listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps one listener attached for as long as it lives.
#[derive(Debug)]
pub struct ListenerGuard {
    registry: Weak<RefCell<Listeners>>,
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade()
            && let Ok(mut listeners) = registry.try_borrow_mut()
            && listeners.callbacks.remove(&self.id).is_some()
        {
            tracing::trace!(listener = self.id, "listener detached");
        }
    }
}

/// Open/closed state of a dropdown plus its click-outside listener.
///
/// While open, exactly one listener is attached on its behalf. A click outside
/// [`Dropdown::set_region`] closes it and detaches that listener.
#[derive(Debug, Default)]
pub struct Dropdown {
    open: Rc<Cell<bool>>,
    region: Rc<Cell<Region>>,
    guard: Option<ListenerGuard>,
    highlight: usize,
}

impl Dropdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dropdown. Opening an open dropdown changes nothing.
    pub fn open(&mut self, registry: &ListenerRegistry) {
        if self.is_open() {
            return;
        }
        self.open.set(true);
        let open = Rc::clone(&self.open);
        let region = Rc::clone(&self.region);
        // Replacing the guard drops any stale one first.
        self.guard = Some(registry.attach(move |at| {
            if region.get().contains(at) {
                ListenerControl::Keep
            } else {
                open.set(false);
                ListenerControl::Detach
            }
        }));
    }

    /// Close the dropdown and detach its listener.
    pub fn close(&mut self) {
        self.open.set(false);
        self.guard = None;
    }

    /// Open if closed, close if open.
    pub fn toggle(&mut self, registry: &ListenerRegistry) {
        if self.is_open() {
            self.close();
        } else {
            self.open(registry);
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Where the dropdown is drawn. Clicks inside keep it open.
    pub fn set_region(&self, region: Region) {
        self.region.set(region);
    }

    pub fn region(&self) -> Region {
        self.region.get()
    }

    /// Index of the highlighted entry.
    pub fn highlight(&self) -> usize {
        self.highlight
    }

    /// Move the highlight, wrapping around `len` entries.
    pub fn move_highlight(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let len = len as isize;
        self.highlight = (self.highlight as isize + delta).rem_euclid(len) as usize;
    }

    pub fn set_highlight(&mut self, index: usize) {
        self.highlight = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropdown_at(registry: &ListenerRegistry) -> Dropdown {
        let mut dropdown = Dropdown::new();
        dropdown.set_region(Region::new(10, 10, 5, 5));
        dropdown.open(registry);
        dropdown
    }

    #[test]
    fn region_contains() {
        let region = Region::new(2, 3, 4, 1);
        assert!(region.contains(Point::new(2, 3)));
        assert!(region.contains(Point::new(5, 3)));
        assert!(!region.contains(Point::new(6, 3)));
        assert!(!region.contains(Point::new(2, 4)));
        assert!(!Region::default().contains(Point::new(0, 0)));
    }

    #[test]
    fn click_inside_keeps_open() {
        let registry = ListenerRegistry::new();
        let dropdown = dropdown_at(&registry);

        registry.dispatch(Point::new(12, 12));
        assert!(dropdown.is_open());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn click_outside_closes_and_detaches() {
        let registry = ListenerRegistry::new();
        let dropdown = dropdown_at(&registry);

        registry.dispatch(Point::new(0, 0));
        assert!(!dropdown.is_open());
        assert!(registry.is_empty());
    }

    #[test]
    fn reopening_does_not_stack_listeners() {
        let registry = ListenerRegistry::new();
        let mut dropdown = dropdown_at(&registry);
        dropdown.open(&registry);
        assert_eq!(registry.len(), 1);

        for _ in 0..10 {
            dropdown.close();
            dropdown.open(&registry);
        }
        assert_eq!(registry.len(), 1);

        registry.dispatch(Point::new(0, 0));
        dropdown.open(&registry);
        assert_eq!(registry.len(), 1);

        dropdown.close();
        assert!(registry.is_empty());
    }

    #[test]
    fn dropping_open_dropdown_detaches() {
        let registry = ListenerRegistry::new();
        let dropdown = dropdown_at(&registry);
        drop(dropdown);
        assert!(registry.is_empty());
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let registry = ListenerRegistry::new();
        let guard = registry.attach(|_| ListenerControl::Keep);
        drop(registry);
        drop(guard);
    }

    #[test]
    fn highlight_wraps() {
        let mut dropdown = Dropdown::new();
        dropdown.move_highlight(-1, 5);
        assert_eq!(dropdown.highlight(), 4);
        dropdown.move_highlight(1, 5);
        assert_eq!(dropdown.highlight(), 0);
        dropdown.move_highlight(1, 0);
        assert_eq!(dropdown.highlight(), 0);
    }
}
