//! Debug printer.

use core::fmt::{self, Write as _};

use crate::forest::traverse::DftEvent;
use crate::forest::Node;

/// State for an indent level.
#[derive(Clone, Copy)]
struct IndentLevel {
    /// Whether this is the last item.
    is_last_item: bool,
    /// Whether the line is the first line.
    is_first_line: bool,
}

impl IndentLevel {
    /// Returns the indent string for the indent type.
    fn as_str(self) -> &'static str {
        match (self.is_last_item, self.is_first_line) {
            (false, true) => "|-- ",
            (false, false) => "|   ",
            (true, true) => "`-- ",
            (true, false) => "    ",
        }
    }

    /// Returns the leading part of the indent string.
    fn as_str_leading(self) -> &'static str {
        match (self.is_last_item, self.is_first_line) {
            (false, true) => "|--",
            (false, false) => "|",
            (true, true) => "`--",
            (true, false) => "",
        }
    }

    /// Returns the trailing whitespaces part of the indent string.
    fn as_str_trailing_spaces(self) -> &'static str {
        match (self.is_last_item, self.is_first_line) {
            (_, true) => " ",
            (false, false) => "   ",
            (true, false) => "    ",
        }
    }

    /// Returns whether the indent string consists of only whitespaces.
    #[inline]
    #[must_use]
    fn is_all_whitespace(&self) -> bool {
        self.is_last_item && !self.is_first_line
    }
}

/// State of the line writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Before any character of the indent is written to the current line.
    BeforeIndent,
    /// Indents are partially written.
    ///
    /// More precisely, trailing whitespaces are not yet written.
    PartialIndent,
    /// Writing content.
    Content,
}

/// Indent writer for the debug printer.
struct IndentWriter<'a, 'b> {
    /// Backend formatter.
    fmt: &'b mut fmt::Formatter<'a>,
    /// State of the line writing.
    line_state: LineState,
    /// Indents.
    indents: Vec<IndentLevel>,
}

impl<'a, 'b> IndentWriter<'a, 'b> {
    /// Creates a new `IndentWriter`.
    fn new(fmt: &'b mut fmt::Formatter<'a>) -> Self {
        Self {
            fmt,
            line_state: LineState::BeforeIndent,
            indents: Vec::new(),
        }
    }

    /// Opens the next item.
    ///
    /// Writes a newline if necessary and prepares to write the next item.
    ///
    /// This should **not** be called for the root item.
    fn open_item(&mut self, is_last_item: bool) -> fmt::Result {
        if self.line_state != LineState::BeforeIndent {
            self.fmt.write_char('\n')?;
            self.line_state = LineState::BeforeIndent;
        }
        if let Some(indent) = self.indents.last_mut() {
            indent.is_first_line = false;
        }
        self.indents.push(IndentLevel {
            is_last_item,
            is_first_line: true,
        });

        Ok(())
    }

    /// Closes the current item.
    ///
    /// Returns false if there are no items that can be closed, i.e. the
    /// current item is the root.
    fn close_item(&mut self) -> bool {
        self.indents.pop().is_some()
    }

    /// Writes the indent except for the trailing whitespaces.
    fn write_indent_partial(&mut self) -> fmt::Result {
        let mut indents = &self.indents[..];
        while indents.last().map_or(false, |i| i.is_all_whitespace()) {
            indents = &indents[..(indents.len() - 1)];
        }
        if let Some((last, init)) = indents.split_last() {
            for indent in init {
                self.fmt.write_str(indent.as_str())?;
            }
            self.fmt.write_str(last.as_str_leading())?;
        }

        Ok(())
    }

    /// Writes the rest of the indents which are partially written.
    fn complete_partial_indent(&mut self) -> fmt::Result {
        debug_assert_eq!(self.line_state, LineState::PartialIndent);
        if let Some(indent) = self.indents.last() {
            self.fmt.write_str(indent.as_str_trailing_spaces())?;
        }

        Ok(())
    }
}

impl fmt::Write for IndentWriter<'_, '_> {
    fn write_str(&mut self, mut s: &str) -> fmt::Result {
        while !s.is_empty() {
            if self.line_state == LineState::BeforeIndent {
                self.write_indent_partial()?;
                self.line_state = LineState::PartialIndent;
            }

            let (line_end, ends_with_newline) = match s.find('\n') {
                Some(pos) => (pos + 1, true),
                None => (s.len(), false),
            };
            if self.line_state == LineState::PartialIndent {
                self.complete_partial_indent()?;
            }
            self.fmt.write_str(&s[..line_end])?;
            if ends_with_newline {
                // Continuation lines of the item are indented without a branch.
                if let Some(level) = self.indents.last_mut() {
                    level.is_first_line = false;
                }
                self.line_state = LineState::BeforeIndent;
            } else {
                self.line_state = LineState::Content;
            }
            s = &s[line_end..];
        }

        Ok(())
    }
}

/// Tree printer for debugging.
///
/// With the alternate flag (`{:#}` or `{:#?}`), every line is followed by
/// the length of the node.
///
/// This is provided mainly for debugging purpose. Note that the output
/// format is not guaranteed to be stable, and any format changes won't be
/// considered as breaking changes.
///
/// # Examples
///
/// ```
/// use synforest::Forest;
///
/// let mut forest = Forest::<String>::new();
/// let root = forest.parse("(S (NP (DT the) (NN dog)) (VP barked))")?;
/// let printed = forest
///     .debug_print(root)
///     .expect("should never fail: node exists")
///     .to_string();
/// assert_eq!(
///     printed,
///     "S\n\
///      |-- NP\n\
///      |   |-- DT\n\
///      |   |   `-- the\n\
///      |   `-- NN\n\
///      |       `-- dog\n\
///      `-- VP\n    \
///          `-- barked"
/// );
/// # Ok::<_, synforest::ParseError>(())
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "debug-print")))]
pub struct DebugPrint<'a, T> {
    /// Root node of the (sub)tree to print.
    node: Node<'a, T>,
}

impl<'a, T> DebugPrint<'a, T> {
    /// Creates a new `DebugPrint` object for the node.
    #[inline]
    #[must_use]
    pub(crate) fn new(node: Node<'a, T>) -> Self {
        Self { node }
    }

    /// Writes the tree, using `write_label` to print each label.
    fn write_tree<F>(&self, f: &mut fmt::Formatter<'_>, mut write_label: F) -> fmt::Result
    where
        F: FnMut(&mut IndentWriter<'_, '_>, &T) -> fmt::Result,
    {
        let show_length = f.alternate();
        let mut writer = IndentWriter::new(f);
        let mut write_node =
            |writer: &mut IndentWriter<'_, '_>, node: Node<'a, T>| -> fmt::Result {
                write_label(writer, node.label())?;
                if show_length {
                    write!(writer, " (length {})", node.length())?;
                }
                Ok(())
            };

        let mut events = self.node.depth_first_traverse();

        // Print the first (root) node.
        events.next();
        write_node(&mut writer, self.node)?;

        // Print descendants.
        for ev in &mut events {
            let node = match ev {
                DftEvent::Open(node) => node,
                DftEvent::Close(_) => {
                    if writer.close_item() {
                        continue;
                    }
                    break;
                }
            };
            writer.open_item(node.next_sibling().is_none())?;
            write_node(&mut writer, node)?;
        }
        debug_assert!(events.next().is_none());

        Ok(())
    }
}

impl<T: fmt::Display> fmt::Display for DebugPrint<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, |writer, label| write!(writer, "{}", label))
    }
}

impl<T: fmt::Debug> fmt::Debug for DebugPrint<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, |writer, label| write!(writer, "{:?}", label))
    }
}

impl<'a, T> Node<'a, T> {
    /// Returns a printable tree of the subtree for debugging.
    #[inline]
    #[must_use]
    pub fn debug_print(&self) -> DebugPrint<'a, T> {
        DebugPrint::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::forest::Forest;

    #[test]
    fn multiline_labels_are_indented() {
        let mut forest = Forest::new();
        let a = forest.create_root("a\nb");
        let c = forest.create_root("c");
        let root = forest.create_node("root", [a, c]).expect("should succeed");
        let root = forest.node(root).expect("root must be alive");

        assert_eq!(
            root.debug_print().to_string(),
            "root\n\
             |-- a\n\
             |   b\n\
             `-- c"
        );
    }

    #[test]
    fn alternate_shows_lengths() {
        let mut forest = Forest::<String>::new();
        let root = forest.parse("(NP (NN dog) cat)").expect("should succeed");
        let root = forest.node(root).expect("root must be alive");

        assert_eq!(
            format!("{:#}", root.debug_print()),
            "NP (length 2)\n\
             |-- NN (length 1)\n\
             |   `-- dog (length 1)\n\
             `-- cat (length 1)"
        );
        assert_eq!(
            format!("{:?}", root.debug_print()),
            "\"NP\"\n\
             |-- \"NN\"\n\
             |   `-- \"dog\"\n\
             `-- \"cat\""
        );
    }

    #[test]
    fn single_node() {
        let mut forest = Forest::new();
        let leaf = forest.create_root(42);
        assert_eq!(
            forest.debug_print(leaf).map(|p| p.to_string()).as_deref(),
            Some("42")
        );
    }
}
