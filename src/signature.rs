//! Maps from symbols to their rewrite rules and decision trees.

use crate::compile::compile;
use crate::error::SignatureError as Error;
use crate::rule::Rule;
use crate::tree::Tree;
use crate::Symbol;
use alloc::rc::Rc;
use alloc::vec::Vec;

/// Immutable hash map for fast cloning of signatures.
type FnvHashMap<K, V> = im::hashmap::HashMap<K, V, fnv::FnvBuildHasher>;

/// Map from symbols to their rewrite rules and compiled decision trees.
///
/// The tree of a symbol is rebuilt whenever a rule is added to it
/// and never changes in between; matching only consults the tree.
#[derive(Clone, Default)]
pub struct Signature<'s> {
    rules: FnvHashMap<Symbol<'s>, Rc<Vec<Rc<Rule<'s>>>>>,
    trees: FnvHashMap<Symbol<'s>, Rc<Tree<'s>>>,
}

impl<'s> Signature<'s> {
    /// Construct an empty signature.
    pub fn new() -> Self {
        Default::default()
    }

    /// Declare a rewritable symbol.
    pub fn insert(&mut self, sym: Symbol<'s>) -> Result<(), Error> {
        if self.rules.insert(sym, Rc::new(Vec::new())).is_some() {
            return Err(Error::Reintroduction);
        }
        self.trees.insert(sym, Rc::new(Tree::Fail));
        Ok(())
    }

    /// Return the rewrite rules whose left-hand side head is the given symbol.
    pub fn rules(&self, sym: &Symbol<'s>) -> Option<&[Rc<Rule<'s>>]> {
        self.rules.get(sym).map(|rules| rules.as_slice())
    }

    /// Return the decision tree matching the rules of the given symbol.
    pub fn tree(&self, sym: &Symbol<'s>) -> Option<&Tree<'s>> {
        self.trees.get(sym).map(|tree| &**tree)
    }

    /// Add a rewrite rule to a previously declared symbol and
    /// rebuild the symbol's decision tree.
    pub fn add_rule(&mut self, rule: Rule<'s>) -> Result<(), Error> {
        let sym = rule.lhs.symbol;
        let rules = {
            let rules = self.rules.get_mut(&sym).ok_or(Error::NonRewritable)?;
            // all rules of a symbol share their clause width
            if rules.iter().any(|r| r.arity() != rule.arity()) {
                return Err(Error::ArityMismatch);
            }
            Rc::make_mut(rules).push(Rc::new(rule));
            rules.clone()
        };
        self.trees.insert(sym, Rc::new(compile(&rules)));
        Ok(())
    }
}
