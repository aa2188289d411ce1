//! Text dumps of an element tree.
//!
//! ```
//! use gadget::{ContainerId, ElementTreeDebug, View};
//!
//! let mut view = View::new(100.0, 100.0);
//! let panel = view.append(ContainerId::View, "div", Some("panel")).unwrap();
//! view.append(panel.into(), "img", Some("icon")).unwrap();
//!
//! let dump = ElementTreeDebug::new().format_view(&view);
//! assert!(dump.contains("panel (div)"));
//! assert!(dump.contains("`-- icon (img)"));
//! ```

use std::fmt::{self, Write};

use crate::container::Elements;
use crate::element::ElementId;
use crate::view::View;

/// Connector characters used for the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `|`, `+--` and `` `-- ``.
    #[default]
    Ascii,
    /// Box-drawing characters.
    Unicode,
}

/// What to include per element.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    pub show_ids: bool,
    /// Position, size, pin and rotation.
    pub show_geometry: bool,
    /// Visibility, enabled state and pending dirty flags.
    pub show_flags: bool,
    /// Maximum depth to descend, `None` for unlimited.
    pub max_depth: Option<usize>,
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_geometry: false,
            show_flags: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything switched on.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_geometry: true,
            show_flags: true,
            ..Default::default()
        }
    }
}

/// Formats element trees for debugging.
#[derive(Debug, Clone, Default)]
pub struct ElementTreeDebug {
    options: TreeFormatOptions,
}

impl ElementTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every element of the view.
    pub fn format_view(&self, view: &View) -> String {
        let mut output = String::new();
        let _ = self.write_view(view, &mut output);
        output
    }

    /// Format the subtree rooted at `root`. Unknown elements give an empty
    /// string.
    pub fn format_subtree(&self, view: &View, root: ElementId) -> String {
        let mut output = String::new();
        if view.element(root).is_some() {
            let _ = self.write_node(view, root, 0, &mut Vec::new(), &mut output);
        }
        output
    }

    fn write_view(&self, view: &View, output: &mut String) -> fmt::Result {
        writeln!(
            output,
            "View {}x{} ({} elements):",
            view.width(),
            view.height(),
            view.element_count()
        )?;
        if view.root.is_empty() {
            return writeln!(output, "  (empty)");
        }
        self.write_children(view, &view.root, 1, &mut Vec::new(), output)
    }

    fn write_children(
        &self,
        view: &View,
        elements: &Elements,
        depth: usize,
        open: &mut Vec<bool>,
        output: &mut String,
    ) -> fmt::Result {
        let count = elements.count();
        for (i, &child) in elements.children().iter().enumerate() {
            open.push(i + 1 < count);
            self.write_node(view, child, depth, open, output)?;
            open.pop();
        }
        Ok(())
    }

    /// `open[d]` tells whether the ancestor at depth `d + 1` has siblings
    /// after it, which decides between a branch line and blank space.
    fn write_node(
        &self,
        view: &View,
        id: ElementId,
        depth: usize,
        open: &mut Vec<bool>,
        output: &mut String,
    ) -> fmt::Result {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }
        let Some(node) = view.element(id) else {
            return Ok(());
        };

        output.push_str(&self.build_prefix(open));
        output.push_str(node.name().unwrap_or("(unnamed)"));
        write!(output, " ({})", node.kind())?;
        if self.options.show_ids {
            write!(output, " [{id:?}]")?;
        }
        if self.options.show_geometry {
            write!(
                output,
                " @({}, {}) {}x{}",
                node.x(),
                node.y(),
                node.width(),
                node.height()
            )?;
            if node.pin_x() != 0.0 || node.pin_y() != 0.0 {
                write!(output, " pin({}, {})", node.pin_x(), node.pin_y())?;
            }
            if node.rotation() != 0.0 {
                write!(output, " rot {}", node.rotation())?;
            }
        }
        if self.options.show_flags {
            if !node.is_visible() {
                output.push_str(" hidden");
            }
            if !node.is_enabled() {
                output.push_str(" disabled");
            }
            let dirty = node.dirty();
            if dirty.any() {
                write!(
                    output,
                    " dirty[{}{}{}]",
                    if dirty.visibility { "v" } else { "" },
                    if dirty.position { "p" } else { "" },
                    if dirty.content { "c" } else { "" }
                )?;
            }
        }
        output.push('\n');

        if let Some(children) = node.children() {
            self.write_children(view, children, depth + 1, open, output)?;
        }
        Ok(())
    }

    fn build_prefix(&self, open: &[bool]) -> String {
        let Some((&has_next, ancestors)) = open.split_last() else {
            return String::new();
        };
        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        };

        let mut prefix = String::new();
        for &ancestor_open in ancestors {
            prefix.push_str(if ancestor_open { branch } else { " " });
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if has_next { tee } else { corner });
        prefix.push(' ');
        prefix
    }
}
