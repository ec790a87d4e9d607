//! Tree constructors: the discriminants a decision tree switches on.

use crate::term::{DeBruijn, Term, TermC};
use alloc::string::String;
use core::fmt::{self, Display};

/// Constructor key of a term, as stored at the edges of a decision tree.
///
/// The key records the head of a term together with the number of
/// arguments applied to it: two occurrences of the same head
/// at different arities must select different subtrees, because
/// the tree matches on "head applied to exactly `arity` arguments".
/// Heads are symbols or, below binders, bound variables.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum TreeCons<'s> {
    /// symbol applied to exactly `arity` arguments
    Symb {
        path: &'s [String],
        name: &'s str,
        arity: usize,
    },
    /// bound variable applied to exactly `arity` arguments
    Vari(DeBruijn, usize),
}

impl<'s> TreeCons<'s> {
    /// Extract the constructor key of a term.
    ///
    /// The head of the term must be a symbol or a bound variable;
    /// the compiler never switches on anything else.
    pub fn of_term(t: &Term<'s>) -> Self {
        let (head, args) = t.get_args();
        match head {
            Term::Symb(s) => Self::Symb {
                path: s.path(),
                name: s.name(),
                arity: args.len(),
            },
            Term::BVar(x) => Self::Vari(*x, args.len()),
            _ => unreachable!("constructor key of non-constructor"),
        }
    }
}

impl<'s> Display for TreeCons<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symb { path, name, arity } => {
                for p in *path {
                    write!(f, "{}.", p)?;
                }
                write!(f, "{}/{}", name, arity)
            }
            Self::Vari(x, arity) => write!(f, "β{}/{}", x, arity),
        }
    }
}

impl<'s> Term<'s> {
    /// Return whether a decision tree can switch on this term.
    ///
    /// This is the case precisely if the head of the term is
    /// a symbol or a bound variable.
    /// Pattern variables, abstractions, and metavariables
    /// match no specific constructor,
    /// and any other term is malformed inside a rule left-hand side.
    pub fn is_tree_cons(&self) -> bool {
        match self.get_args().0 {
            Term::Symb(_) | Term::BVar(_) => true,
            Term::Comb(c) => match &**c {
                TermC::Abst(_, _) | TermC::Patt(_, _, _) | TermC::Meta(_, _) => false,
                TermC::Prod(_, _) => unreachable!("product in pattern"),
                // flattened by `apply`
                TermC::Appl(_, _) => unreachable!("application headed by application"),
            },
            Term::Kind | Term::Type | Term::Wild => unreachable!("sort or hole in pattern"),
        }
    }
}
