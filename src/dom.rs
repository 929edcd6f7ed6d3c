//! Document capability consumed by the engine.
//!
//! The engine never talks to a real document directly; the host injects an
//! implementation of [`Dom`] (a browser bridge, a test double, the bundled
//! [`crate::headless::HeadlessDom`]). Capability presence is checked once at
//! `init()`: a quick setter obtained there is used for the rest of the
//! instance's lifetime, otherwise writes go through [`Dom::set_attr`].

/// Pre-bound fast attribute writer for a single element.
pub trait AttrSetter {
    fn set(&mut self, value: &str);
}

pub trait Dom {
    /// Opaque element handle. Handles stay valid until the engine is
    /// destroyed or re-initialized.
    type Element: Clone;
    type Setter: AttrSetter;

    /// Resolves a selector to the root container, if present.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// Resolves a selector relative to `root` to the animated path elements.
    fn query_all(&self, root: &Self::Element, selector: &str) -> Vec<Self::Element>;

    fn set_attr(&mut self, el: &Self::Element, name: &str, value: &str);

    /// Optional fast-write capability; `None` means plain writes only.
    fn quick_setter(&mut self, el: &Self::Element, name: &str) -> Option<Self::Setter>;

    /// CSS media query check, used only at construction to pick defaults.
    fn media_matches(&self, query: &str) -> bool;

    /// Touch-constrained platform check (iOS-class devices), used only at
    /// construction to pick snapping and LUT defaults.
    fn coarse_pointer(&self) -> bool;
}
