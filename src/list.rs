//! Typed RDF lists.
//!
//! A list is a chain of anonymous cells, each with exactly one `rdf:first`
//! (the element) and one `rdf:rest` (the next cell or `rdf:nil`). A
//! [`TypedList`] additionally requires every element to be viewable as its
//! element type. Length is never stored; it is the length of the chain.
//!
//! A list usually hangs off an *anchor* triple `(s p head)`. When a mutation
//! changes the head (pushing onto an empty list, popping the last element) the
//! anchor is rewritten, and annotations on it move along.

use std::collections::HashSet;

use crate::annotation::Annotations;
use crate::error::{ListError, OntResult};
use crate::graph::Triple;
use crate::node::{Iri, Node};
use crate::statement::Statement;
use crate::view::{View, ViewContext, ViewType};
use crate::vocab;

fn nil() -> Node {
    Node::iri(vocab::RDF_NIL)
}

/// Read one cell: its element and its successor.
fn read_cell(cell: &Node, seen: &mut HashSet<Node>, ctx: ViewContext<'_>) -> OntResult<(Node, Node)> {
    let broken = |message: String| -> crate::error::OntError {
        tracing::warn!(node = %cell, %message, "broken list");
        ListError::Broken {
            node: cell.to_string(),
            message,
        }
        .into()
    };
    if !cell.is_resource() {
        return Err(broken("list cell is a literal".into()));
    }
    if !seen.insert(cell.clone()) {
        return Err(broken("cell revisited, the chain has a cycle".into()));
    }
    let firsts = ctx.graph.objects(cell, vocab::RDF_FIRST);
    let rests = ctx.graph.objects(cell, vocab::RDF_REST);
    match (firsts.as_slice(), rests.as_slice()) {
        ([first], [rest]) => Ok((first.clone(), rest.clone())),
        _ => Err(broken(format!(
            "expected one rdf:first and one rdf:rest, found {} and {}",
            firsts.len(),
            rests.len()
        ))),
    }
}

/// A list whose elements are all viewable as one [`ViewType`].
#[derive(Debug, Clone)]
pub struct TypedList<'a> {
    head: Node,
    element: ViewType,
    anchor: Option<(Node, Iri)>,
    ctx: ViewContext<'a>,
}

impl<'a> TypedList<'a> {
    /// View the chain starting at `head`. Shape problems surface when the
    /// list is read.
    pub fn new(ctx: ViewContext<'a>, head: Node, element: ViewType) -> Self {
        Self {
            head,
            element,
            anchor: None,
            ctx,
        }
    }

    /// View the list that `anchor` points at.
    pub fn anchored(ctx: ViewContext<'a>, anchor: Triple, element: ViewType) -> Self {
        Self {
            head: anchor.object,
            element,
            anchor: Some((anchor.subject, anchor.predicate)),
            ctx,
        }
    }

    /// Every list hanging off `(subject predicate ?)`.
    pub fn find_anchored(ctx: ViewContext<'a>, subject: &Node, predicate: &str, element: ViewType) -> Vec<Self> {
        ctx.graph
            .find(Some(subject), Some(&Iri::new(predicate)), None)
            .into_iter()
            .map(|t| Self::anchored(ctx, t, element))
            .collect()
    }

    /// Build a new, unanchored list of `members`.
    ///
    /// Every member is checked before any triple is written.
    pub fn create(ctx: ViewContext<'a>, element: ViewType, members: &[Node]) -> OntResult<Self> {
        for member in members {
            if !ctx.can_view(member, element) {
                return Err(ListError::ElementMismatch {
                    node: member.to_string(),
                    view: element.to_string(),
                }
                .into());
            }
        }
        let cells = members
            .iter()
            .map(|_| ctx.graph.create_blank())
            .collect::<OntResult<Vec<Node>>>()?;
        let mut head = nil();
        for (member, cell) in members.iter().zip(cells).rev() {
            ctx.graph.add(Triple::new(cell.clone(), vocab::RDF_FIRST, member.clone()));
            ctx.graph.add(Triple::new(cell.clone(), vocab::RDF_REST, head));
            head = cell;
        }
        tracing::trace!(element = %element, len = members.len(), "created list");
        Ok(Self::new(ctx, head, element))
    }

    /// Build a list of `members` and attach it with `(subject predicate head)`.
    pub fn create_anchored(
        ctx: ViewContext<'a>,
        subject: &Node,
        predicate: &str,
        element: ViewType,
        members: &[Node],
    ) -> OntResult<Self> {
        let list = Self::create(ctx, element, members)?;
        let anchor = Triple::new(subject.clone(), predicate, list.head.clone());
        ctx.graph.add(anchor.clone());
        Ok(Self::anchored(ctx, anchor, element))
    }

    pub fn head(&self) -> &Node {
        &self.head
    }

    pub fn element(&self) -> ViewType {
        self.element
    }

    /// The triple this list hangs off, if any.
    pub fn anchor(&self) -> Option<Statement> {
        self.anchor.as_ref().map(|(s, p)| {
            Statement::classify(Triple::new(s.clone(), p.clone(), self.head.clone()), self.ctx)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.head.is(vocab::RDF_NIL)
    }

    /// The cells, in order. Fails on a malformed or cyclic chain.
    pub fn cells(&self) -> OntResult<Vec<Node>> {
        Ok(self.walk()?.into_iter().map(|(cell, _)| cell).collect())
    }

    /// Element nodes, in order, without checking their type.
    pub fn nodes(&self) -> OntResult<Vec<Node>> {
        Ok(self.walk()?.into_iter().map(|(_, first)| first).collect())
    }

    /// Number of elements. Walks the whole chain.
    pub fn size(&self) -> OntResult<usize> {
        Ok(self.walk()?.len())
    }

    fn walk(&self) -> OntResult<Vec<(Node, Node)>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.head.clone();
        while !cursor.is(vocab::RDF_NIL) {
            let (first, rest) = read_cell(&cursor, &mut seen, self.ctx)?;
            out.push((cursor, first));
            cursor = rest;
        }
        Ok(out)
    }

    /// The elements as views, lazily and in order.
    ///
    /// An element that is not viewable as the element type yields an error
    /// and ends the iteration; nothing is skipped.
    pub fn members(&self) -> Members<'a> {
        Members {
            next: Some(self.head.clone()),
            seen: HashSet::new(),
            element: self.element,
            ctx: self.ctx,
        }
    }

    /// The element at `index`.
    pub fn get(&self, index: usize) -> OntResult<View<'a>> {
        let nodes = self.nodes()?;
        let node = nodes.get(index).ok_or(ListError::IndexOutOfRange {
            index,
            len: nodes.len(),
        })?;
        self.element_view(node)
    }

    pub fn contains(&self, node: &Node) -> OntResult<bool> {
        Ok(self.nodes()?.contains(node))
    }

    fn element_view(&self, node: &Node) -> OntResult<View<'a>> {
        self.ctx.view(node, self.element).map_err(|_| {
            ListError::ElementMismatch {
                node: node.to_string(),
                view: self.element.to_string(),
            }
            .into()
        })
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Append `member` at the end.
    pub fn push(&mut self, member: &Node) -> OntResult<()> {
        if !self.ctx.can_view(member, self.element) {
            return Err(ListError::ElementMismatch {
                node: member.to_string(),
                view: self.element.to_string(),
            }
            .into());
        }
        let cells = self.cells()?;
        let graph = self.ctx.graph;
        let cell = graph.create_blank()?;
        graph.add(Triple::new(cell.clone(), vocab::RDF_FIRST, member.clone()));
        graph.add(Triple::new(cell.clone(), vocab::RDF_REST, nil()));
        match cells.last() {
            Some(last) => {
                graph.remove(&Triple::new(last.clone(), vocab::RDF_REST, nil()));
                graph.add(Triple::new(last.clone(), vocab::RDF_REST, cell));
            }
            None => self.set_head(cell),
        }
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> OntResult<Option<Node>> {
        let walked = self.walk()?;
        let Some((last, element)) = walked.last().cloned() else {
            return Ok(None);
        };
        let graph = self.ctx.graph;
        match walked.len().checked_sub(2).map(|i| &walked[i].0) {
            Some(previous) => {
                graph.remove(&Triple::new(previous.clone(), vocab::RDF_REST, last.clone()));
                graph.add(Triple::new(previous.clone(), vocab::RDF_REST, nil()));
            }
            None => self.set_head(nil()),
        }
        self.remove_cell(&last);
        Ok(Some(element))
    }

    /// Remove every element, leaving an empty list (still anchored).
    pub fn clear(&mut self) -> OntResult<()> {
        let cells = self.cells()?;
        self.set_head(nil());
        for cell in &cells {
            self.remove_cell(cell);
        }
        Ok(())
    }

    /// Remove the list entirely: its cells, its anchor triple and any
    /// annotations on the anchor.
    pub fn delete(self) -> OntResult<()> {
        let cells = self.cells()?;
        if let Some(anchor) = self.anchor() {
            Annotations::new(self.ctx).clear(anchor.triple());
            self.ctx.graph.remove(anchor.triple());
        }
        for cell in &cells {
            self.remove_cell(cell);
        }
        tracing::trace!(head = %self.head, cells = cells.len(), "deleted list");
        Ok(())
    }

    fn remove_cell(&self, cell: &Node) {
        for t in self.ctx.graph.find_local(Some(cell), None, None) {
            self.ctx.graph.remove(&t);
        }
    }

    /// Move the head, rewriting the anchor triple if there is one.
    fn set_head(&mut self, head: Node) {
        if let Some((subject, predicate)) = &self.anchor {
            let old = Triple::new(subject.clone(), predicate.clone(), self.head.clone());
            let new = Triple::new(subject.clone(), predicate.clone(), head.clone());
            self.ctx.graph.remove(&old);
            self.ctx.graph.add(new.clone());
            Annotations::new(self.ctx).rebase(&old, &new);
        }
        self.head = head;
    }
}

/// Lazy, single-pass iterator over a list's element views.
pub struct Members<'a> {
    next: Option<Node>,
    seen: HashSet<Node>,
    element: ViewType,
    ctx: ViewContext<'a>,
}

impl<'a> Iterator for Members<'a> {
    type Item = OntResult<View<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.next.take()?;
        if cell.is(vocab::RDF_NIL) {
            return None;
        }
        let (first, rest) = match read_cell(&cell, &mut self.seen, self.ctx) {
            Ok(parts) => parts,
            Err(e) => return Some(Err(e)),
        };
        match self.ctx.view(&first, self.element) {
            Ok(view) => {
                self.next = Some(rest);
                Some(Ok(view))
            }
            Err(_) => Some(Err(ListError::ElementMismatch {
                node: first.to_string(),
                view: self.element.to_string(),
            }
            .into())),
        }
    }
}
