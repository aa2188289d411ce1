//! Element factory: maps kind names to behaviors.

use std::collections::HashMap;
use std::fmt;

use crate::element::ElementBehavior;
use crate::widgets::{Button, CheckBox, ComboBox, ContentArea, Div, Img, ScrollBar};

/// Creates element behaviors by kind name.
///
/// [`View::append`](crate::View::append) and
/// [`View::insert`](crate::View::insert) go through the view's factory; the
/// element tree never constructs concrete kinds itself.
pub trait ElementFactory: fmt::Debug {
    /// Create a behavior for `kind`, or `None` if the kind is unknown.
    fn create(&self, kind: &str) -> Option<Box<dyn ElementBehavior>>;
}

/// Constructor registered for one kind.
pub type BehaviorConstructor = fn() -> Box<dyn ElementBehavior>;

/// Table-driven factory.
#[derive(Clone)]
pub struct DefaultElementFactory {
    constructors: HashMap<String, BehaviorConstructor>,
}

impl DefaultElementFactory {
    /// A factory knowing every built-in kind.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register("div", || Box::new(Div::new()));
        factory.register("img", || Box::new(Img::new()));
        factory.register("button", || Box::new(Button::new()));
        factory.register("checkbox", || Box::new(CheckBox::new()));
        factory.register("scrollbar", || Box::new(ScrollBar::new()));
        factory.register("combobox", || Box::new(ComboBox::new()));
        factory.register("contentarea", || Box::new(ContentArea::new()));
        factory
    }

    /// A factory knowing no kinds at all.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register or replace the constructor for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, constructor: BehaviorConstructor) {
        self.constructors.insert(kind.into(), constructor);
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl Default for DefaultElementFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultElementFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultElementFactory")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ElementFactory for DefaultElementFactory {
    fn create(&self, kind: &str) -> Option<Box<dyn ElementBehavior>> {
        self.constructors.get(kind).map(|constructor| constructor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        let factory = DefaultElementFactory::new();
        assert_eq!(
            factory.kinds(),
            ["button", "checkbox", "combobox", "contentarea", "div", "img", "scrollbar"]
        );
        for kind in factory.kinds() {
            assert_eq!(factory.create(kind).unwrap().kind(), kind);
        }
        assert!(factory.create("marquee").is_none());
    }

    #[test]
    fn test_register_alias() {
        let mut factory = DefaultElementFactory::empty();
        assert!(factory.create("div").is_none());
        factory.register("panel", || Box::new(Div::new()));
        assert_eq!(factory.create("panel").unwrap().kind(), "div");
    }
}
