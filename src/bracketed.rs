//! Bracketed text format.
//!
//! A tree is either a bare token, which is a leaf, or `(label child ...)`,
//! which is an internal node. The label of an internal node may be omitted,
//! as in `( (S ...))`, but a node cannot lack both the label and children, so
//! `()` is an error. Whitespace between tokens is insignificant.
//!
//! Leaf labels cannot contain parentheses as is; they are written as
//! `-LRB-` and `-RRB-` instead, and decoded back when parsed.

use core::fmt::{self, Write as _};
use core::iter::Peekable;

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::forest::{Forest, Node};
use crate::forest::traverse::DftEvent;
use crate::id::NodeId;

/// Escaped form of `(` in a leaf.
const LRB: &str = "-LRB-";
/// Escaped form of `)` in a leaf.
const RRB: &str = "-RRB-";

/// Replaces parentheses in a leaf label with `-LRB-` and `-RRB-`.
///
/// # Examples
///
/// ```
/// use synforest::bracketed::escape;
///
/// assert_eq!(escape("(a)b"), "-LRB-a-RRB-b");
/// assert_eq!(escape("dog"), "dog");
/// ```
#[must_use]
pub fn escape(label: &str) -> Cow<'_, str> {
    if !label.contains(['(', ')']) {
        return Cow::Borrowed(label);
    }
    let mut escaped = String::with_capacity(label.len() + 8);
    EscapeWriter(&mut escaped)
        .write_str(label)
        .expect("[consistency] writing to a string never fails");
    Cow::Owned(escaped)
}

/// Replaces `-LRB-` and `-RRB-` in a leaf token with parentheses.
///
/// # Examples
///
/// ```
/// use synforest::bracketed::unescape;
///
/// assert_eq!(unescape("-LRB-a-RRB-b"), "(a)b");
/// assert_eq!(unescape("dog"), "dog");
/// ```
#[must_use]
pub fn unescape(token: &str) -> Cow<'_, str> {
    if !token.contains(LRB) && !token.contains(RRB) {
        return Cow::Borrowed(token);
    }
    Cow::Owned(token.replace(LRB, "(").replace(RRB, ")"))
}

/// Writer escaping parentheses on the fly.
struct EscapeWriter<W>(W);

impl<W: fmt::Write> fmt::Write for EscapeWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s;
        while let Some(pos) = rest.find(['(', ')']) {
            self.0.write_str(&rest[..pos])?;
            self.0
                .write_str(if rest.as_bytes()[pos] == b'(' { LRB } else { RRB })?;
            rest = &rest[(pos + 1)..];
        }
        self.0.write_str(rest)
    }
}

/// Token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind<'s> {
    /// `(`.
    Open,
    /// `)`.
    Close,
    /// Maximal run of characters other than parentheses and whitespaces.
    Word(&'s str),
}

/// Token with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'s> {
    /// Kind.
    kind: TokenKind<'s>,
    /// Byte offset in the text.
    offset: usize,
}

/// Tokenizer.
#[derive(Debug, Clone)]
struct Tokens<'s> {
    /// Whole text.
    text: &'s str,
    /// Byte offset of the rest of the text.
    pos: usize,
}

impl<'s> Tokens<'s> {
    /// Creates a new tokenizer.
    fn new(text: &'s str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'s> Iterator for Tokens<'s> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let trimmed = rest.trim_start();
        let offset = self.pos + (rest.len() - trimmed.len());
        let first = trimmed.chars().next()?;

        let (kind, len) = match first {
            '(' => (TokenKind::Open, 1),
            ')' => (TokenKind::Close, 1),
            _ => {
                let len = trimmed
                    .find(|c: char| c == '(' || c == ')' || c.is_whitespace())
                    .unwrap_or(trimmed.len());
                (TokenKind::Word(&trimmed[..len]), len)
            }
        };
        self.pos = offset + len;

        Some(Token { kind, offset })
    }
}

/// Result of scanning a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scanned {
    /// A complete tree.
    Tree(NodeId),
    /// A `)` at the given offset, not consumed.
    Close(usize),
    /// The end of the input.
    End,
}

/// Node whose `)` is not yet scanned.
struct OpenNode {
    /// Offset of the `(`.
    offset: usize,
    /// Label, which may be empty.
    label: String,
    /// Children scanned so far.
    children: Vec<NodeId>,
}

/// Parser creating nodes in a forest.
///
/// Open nodes are kept in an explicit stack, so the nesting depth of the
/// input is not limited by the call stack.
struct Parser<'f, 's, T> {
    /// Target forest.
    forest: &'f mut Forest<T>,
    /// Tokens.
    tokens: Peekable<Tokens<'s>>,
}

impl<'f, 's, T: From<String>> Parser<'f, 's, T> {
    /// Creates a new parser.
    fn new(forest: &'f mut Forest<T>, text: &'s str) -> Self {
        Self {
            forest,
            tokens: Tokens::new(text).peekable(),
        }
    }

    /// Returns true if there are no more tokens.
    fn is_at_end(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    /// Consumes the label token after `(`, if any.
    ///
    /// `(` not followed by a word has an empty label.
    fn scan_label(&mut self) -> String {
        match self.tokens.peek() {
            Some(Token {
                kind: TokenKind::Word(word),
                ..
            }) => {
                let label = String::from(*word);
                self.tokens.next();
                label
            }
            _ => String::new(),
        }
    }

    /// Creates the node whose `)` has just been scanned.
    fn close_node(&mut self, open: OpenNode) -> Result<NodeId, ParseError> {
        if open.children.is_empty() {
            if open.label.is_empty() {
                return Err(ParseError::EmptyNode {
                    offset: open.offset,
                });
            }
            // `(S)` is read as the leaf `S`.
            let label = unescape(&open.label).into_owned();
            return Ok(self.forest.create_root(label.into()));
        }
        Ok(self
            .forest
            .create_node(open.label.into(), open.children)
            .expect("[consistency] scanned children are independent roots"))
    }

    /// Scans a tree.
    ///
    /// On error, nodes created during the scan are removed.
    fn scan_tree(&mut self) -> Result<Scanned, ParseError> {
        let mut stack: Vec<OpenNode> = Vec::new();
        let failure = loop {
            let token = match (self.tokens.peek(), stack.last()) {
                (Some(&token), _) => token,
                (None, None) => return Ok(Scanned::End),
                (None, Some(open)) => {
                    break ParseError::Unterminated {
                        offset: open.offset,
                    }
                }
            };

            let tree = match token.kind {
                TokenKind::Open => {
                    self.tokens.next();
                    let label = self.scan_label();
                    stack.push(OpenNode {
                        offset: token.offset,
                        label,
                        children: Vec::new(),
                    });
                    continue;
                }
                TokenKind::Word(word) => {
                    self.tokens.next();
                    self.forest.create_root(unescape(word).into_owned().into())
                }
                TokenKind::Close => {
                    let open = match stack.pop() {
                        Some(v) => v,
                        None => return Ok(Scanned::Close(token.offset)),
                    };
                    self.tokens.next();
                    match self.close_node(open) {
                        Ok(node) => node,
                        Err(e) => break e,
                    }
                }
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(tree),
                None => return Ok(Scanned::Tree(tree)),
            }
        };

        for open in stack {
            for child in open.children {
                self.forest.remove_subtree(child);
            }
        }
        Err(failure)
    }
}

impl<T: From<String>> Forest<T> {
    /// Parses the bracketed text and creates a tree in the forest.
    ///
    /// Returns the root of the created tree. Tokens after the first complete
    /// tree are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the text is empty or is not well-formed.
    /// No nodes are left in the forest in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::{Forest, ParseError};
    ///
    /// let mut forest = Forest::<String>::new();
    ///
    /// let root = forest.parse("(S (NP (NN -LRB-a-RRB-b)))")?;
    /// let root = forest.node(root).expect("should never fail: node exists");
    /// assert_eq!(root.yield_labels(), ["(a)b"]);
    /// assert_eq!(root.to_string(), "(S (NP (NN -LRB-a-RRB-b)))");
    ///
    /// assert_eq!(
    ///     forest.parse("(S (NP the)"),
    ///     Err(ParseError::Unterminated { offset: 0 })
    /// );
    /// # Ok::<_, ParseError>(())
    /// ```
    pub fn parse(&mut self, text: &str) -> Result<NodeId, ParseError> {
        let mut parser = Parser::new(self, text);
        let result = match parser.scan_tree() {
            Ok(Scanned::Tree(root)) => {
                if !parser.is_at_end() {
                    debug!("ignoring tokens after the first tree");
                }
                Ok(root)
            }
            Ok(Scanned::Close(offset)) => Err(ParseError::UnexpectedClose { offset }),
            Ok(Scanned::End) => Err(ParseError::Empty),
            Err(e) => Err(e),
        };

        match &result {
            Ok(root) => trace!(root = ?root, "parsed a tree"),
            Err(e) => debug!(error = %e, "failed to parse a tree"),
        }
        result
    }

    /// Parses all trees in the bracketed text, e.g. one tree per line.
    ///
    /// Returns the roots of the created trees, in order. Empty text yields
    /// no trees.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if any of the trees is not well-formed.
    /// No nodes are left in the forest in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::<String>::new();
    /// let roots = forest.parse_all("(NP (NN dog))\n(VP (VBD barked))\n")?;
    /// assert_eq!(roots.len(), 2);
    /// # Ok::<_, synforest::ParseError>(())
    /// ```
    pub fn parse_all(&mut self, text: &str) -> Result<Vec<NodeId>, ParseError> {
        let mut parser = Parser::new(self, text);
        let mut roots = Vec::new();
        let failure = loop {
            match parser.scan_tree() {
                Ok(Scanned::Tree(root)) => roots.push(root),
                Ok(Scanned::End) => {
                    trace!(count = roots.len(), "parsed trees");
                    return Ok(roots);
                }
                Ok(Scanned::Close(offset)) => break ParseError::UnexpectedClose { offset },
                Err(e) => break e,
            }
        };

        debug!(error = %failure, parsed = roots.len(), "failed to parse trees");
        for root in roots {
            self.remove_subtree(root);
        }
        Err(failure)
    }
}

/// Writes the subtree in the bracketed format.
///
/// # Examples
///
/// ```
/// use synforest::Forest;
///
/// let mut forest = Forest::new();
/// let word = forest.create_root(":-)");
/// let root = forest.create_node("UH", [word])?;
///
/// let root = forest.node(root).expect("should never fail: node exists");
/// assert_eq!(root.to_string(), "(UH :--RRB-)");
/// # Ok::<_, synforest::StructureError>(())
/// ```
impl<T: fmt::Display> fmt::Display for Node<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut is_first = true;
        for ev in self.depth_first_traverse() {
            match ev {
                DftEvent::Open(node) => {
                    if !is_first {
                        f.write_char(' ')?;
                    }
                    is_first = false;
                    if node.is_leaf() {
                        write!(EscapeWriter(&mut *f), "{}", node.label())?;
                    } else {
                        write!(f, "({}", node.label())?;
                    }
                }
                DftEvent::Close(node) => {
                    if !node.is_leaf() {
                        f.write_char(')')?;
                    }
                }
            }
        }

        Ok(())
    }
}
