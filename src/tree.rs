//! Decision trees guiding the matching of rewrite rules.

use crate::cons::TreeCons;
use crate::rule::Rhs;
use crate::term::Miller;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use core::fmt::{self, Display};

/// Mapping from capture buffer indices to the right-hand side slots they fill.
pub type EnvBuilder = BTreeMap<usize, Miller>;

/// Decision tree for the rewrite rules of one head symbol.
///
/// The tree is interpreted against a stack of argument terms
/// and a buffer of captured terms, initially empty:
/// a [`Node`] inspects the stack element at index `swap`,
/// saves it onto the buffer if `store` is set, and descends into
/// the child matching the element's constructor
/// (replacing the element by its arguments)
/// or into the default child (dropping the element);
/// a [`Fetch`] unconditionally consumes the front stack element;
/// a [`Leaf`] assembles the environment of the winning rule
/// from the buffer and fires;
/// [`Fail`] means that no rule applies.
///
/// Trees are built once, when rules are added, and never change afterwards.
///
/// [`Node`]: Self::Node
/// [`Fetch`]: Self::Fetch
/// [`Leaf`]: Self::Leaf
/// [`Fail`]: Self::Fail
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Tree<'s> {
    Leaf(EnvBuilder, Rc<Rhs<'s>>),
    Fail,
    Node {
        /// index of the stack element to inspect
        swap: usize,
        /// save the inspected element for a later environment
        store: bool,
        children: BTreeMap<TreeCons<'s>, Tree<'s>>,
        default: Option<Box<Tree<'s>>>,
    },
    Fetch(bool, Box<Tree<'s>>),
}

impl<'s> Tree<'s> {
    /// Fold over the tree with one handler per node shape.
    pub fn iter<A, FL, FN, FF, FD>(&self, leaf: &FL, node: &FN, fetch: &FF, fail: &FD) -> A
    where
        FL: Fn(&EnvBuilder, &Rc<Rhs<'s>>) -> A,
        FN: Fn(usize, bool, alloc::vec::Vec<A>, Option<A>) -> A,
        FF: Fn(bool, A) -> A,
        FD: Fn() -> A,
    {
        match self {
            Self::Leaf(eb, rhs) => leaf(eb, rhs),
            Self::Fail => fail(),
            Self::Fetch(store, next) => fetch(*store, next.iter(leaf, node, fetch, fail)),
            Self::Node {
                swap,
                store,
                children,
                default,
            } => {
                let ch = children.values();
                let ch = ch.map(|c| c.iter(leaf, node, fetch, fail)).collect();
                let df = default.as_ref().map(|d| d.iter(leaf, node, fetch, fail));
                node(*swap, *store, ch, df)
            }
        }
    }

    /// Largest number of captured terms that any interpretation
    /// of the tree can hold at the same time.
    ///
    /// This allows the capture buffer to be allocated up front.
    pub fn capacity(&self) -> usize {
        self.iter(
            &|_, _| 0,
            &|_, store, ch, df| {
                let deepest = ch.into_iter().chain(df).max().unwrap_or(0);
                deepest + store as usize
            },
            &|store, next| next + store as usize,
            &|| 0,
        )
    }

    /// Graphviz rendering of the tree.
    ///
    /// The caller decides where the graph description ends up:
    ///
    /// ~~~
    /// # use decidarbo::Tree;
    /// let tree: Tree = Tree::Fail;
    /// println!("{}", tree.dot());
    /// ~~~
    pub fn dot(&self) -> Dot<'_, 's> {
        Dot(self)
    }
}

/// Graphviz rendering of a [`Tree`], see [`Tree::dot`].
pub struct Dot<'t, 's>(&'t Tree<'s>);

impl<'t, 's> Display for Dot<'t, 's> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "digraph tree {{")?;
        writeln!(f, "  node [shape=box];")?;
        let mut id = 0;
        vertex(f, self.0, &mut id)?;
        write!(f, "}}")
    }
}

/// Write the vertex for a tree and the edges to its children,
/// returning the identifier of the vertex.
fn vertex(f: &mut fmt::Formatter, tree: &Tree, id: &mut usize) -> Result<usize, fmt::Error> {
    let me = *id;
    *id += 1;
    match tree {
        Tree::Fail => writeln!(f, "  {} [label=\"⊥\"];", me)?,
        Tree::Leaf(eb, rhs) => {
            write!(f, "  {} [label=\"", me)?;
            for (k, slot) in eb {
                write!(f, "{}↦{} ", k, slot)?;
            }
            writeln!(f, "⊢ {}\"];", rhs)?;
        }
        Tree::Fetch(store, next) => {
            let label = if *store { "fetch!" } else { "fetch" };
            writeln!(f, "  {} [label=\"{}\"];", me, label)?;
            let next = vertex(f, next, id)?;
            writeln!(f, "  {} -> {};", me, next)?;
        }
        Tree::Node {
            swap,
            store,
            children,
            default,
        } => {
            let bang = if *store { "!" } else { "" };
            writeln!(f, "  {} [label=\"@{}{}\"];", me, swap, bang)?;
            for (cons, child) in children {
                let child = vertex(f, child, id)?;
                writeln!(f, "  {} -> {} [label=\"{}\"];", me, child, cons)?;
            }
            if let Some(d) = default {
                let child = vertex(f, d, id)?;
                writeln!(f, "  {} -> {} [label=\"*\"];", me, child)?;
            }
        }
    }
    Ok(me)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn leaf<'s>(slots: &[(usize, Miller)]) -> Tree<'s> {
        let eb: EnvBuilder = slots.iter().copied().collect();
        let ctx = (0..eb.len()).map(|i| (alloc::format!("x{}", i), 0)).collect();
        let body = crate::Term::BVar(0);
        Tree::Leaf(eb, Rc::new(Rhs { ctx, body }))
    }

    #[test]
    fn capacity_of_chain() {
        let tree = Tree::Fetch(false, Box::new(Tree::Fetch(true, Box::new(leaf(&[(0, 0)])))));
        assert_eq!(tree.capacity(), 1);
    }

    #[test]
    fn capacity_of_node() {
        let shallow = leaf(&[]);
        let deep = Tree::Fetch(true, Box::new(Tree::Fetch(true, Box::new(leaf(&[(0, 0)])))));
        let tree = Tree::Node {
            swap: 0,
            store: true,
            children: BTreeMap::new(),
            default: Some(Box::new(deep)),
        };
        assert_eq!(tree.capacity(), 3);
        assert_eq!(shallow.capacity(), 0);
    }

    #[test]
    fn dot_of_fail() {
        let out = Tree::Fail.dot().to_string();
        assert!(out.starts_with("digraph tree {"));
        assert!(out.contains("⊥"));
        let chain = Tree::Fetch(true, Box::new(Tree::Fail));
        assert!(chain.dot().to_string().contains("fetch!"));
        let node: Tree = Tree::Node {
            swap: 2,
            store: false,
            children: BTreeMap::new(),
            default: None,
        };
        assert!(node.dot().to_string().contains("@2"));
    }

    #[test]
    fn iter_counts_leaves() {
        let mut children = BTreeMap::new();
        children.insert(cons("a"), leaf(&[]));
        children.insert(cons("b"), leaf(&[]));
        let two: Tree = Tree::Node {
            swap: 0,
            store: false,
            children,
            default: Some(Box::new(Tree::Fail)),
        };
        let count = two.iter(&|_, _| 1, &|_, _, ch, df| {
            ch.into_iter().chain(df).sum::<usize>()
        }, &|_, next| next, &|| 0);
        assert_eq!(count, 2);
    }

    fn cons(name: &'static str) -> TreeCons<'static> {
        TreeCons::Symb {
            path: &[],
            name,
            arity: 0,
        }
    }
}
