#![no_std]
#![forbid(unsafe_code)]

//! Decision trees for higher-order rewrite rules.
//!
//! This library compiles the rewrite rules attached to a head symbol
//! into a *decision tree* that,
//! given the arguments applied to the symbol,
//! selects at most one applicable rule and
//! assembles the environment with which to instantiate
//! the rule's right-hand side.
//! Rules may be non-linear, bind variables under abstractions, and
//! apply a symbol at several arities;
//! earlier rules win over later ones whenever several rules match.
//!
//! # Usage
//!
//! A [`Signature`] records for every symbol its rules and its tree.
//! Symbols are cheap references into user-allocated [`symbol::Owned`] data,
//! distributed by a [`Symbols`] table.
//! Adding a rule recompiles the tree of its head symbol;
//! matching a term only consults the tree.
//!
//! The following example registers the rule `add zero n ⟶ n` and
//! uses it to normalise a term.
//! (This example, just as all other code examples in this library,
//! can be executed by running `cargo test`.)
//!
//! ~~~
//! use colosseum::unsync::Arena;
//! use decidarbo::{symbol, App, Rule, Signature, Symbols, Term};
//!
//! let arena = Arena::new();
//! let owned = |name: &str| symbol::Owned::new(Vec::new(), name.to_string());
//! let mut syms = Symbols::new();
//! let add = syms.insert(arena.alloc(owned("add")))?;
//! let zero = syms.insert(arena.alloc(owned("zero")))?;
//! let succ = syms.insert(arena.alloc(owned("succ")))?;
//!
//! // add zero n ⟶ n
//! let n = Term::patt(Some(0), "n".to_string(), Vec::new());
//! let lhs = App::new(add, vec![Term::from(zero), n]);
//! let rule = Rule::new(vec![("n".to_string(), 0)], lhs, Term::BVar(0))?;
//!
//! let mut sig = Signature::new();
//! sig.insert(add)?;
//! sig.add_rule(rule)?;
//!
//! // add zero (succ zero) ⟶ succ zero
//! let one = Term::from(succ).apply(vec![Term::from(zero)]);
//! let sum = Term::from(add).apply(vec![Term::from(zero), one.clone()]);
//! assert_eq!(sig.whnf(sum), one);
//! # Ok::<_, decidarbo::Error>(())
//! ~~~
//!
//! # Organisation
//!
//! The compiler proper lives in three modules:
//! [`subterm`] addresses the subterms of a left-hand side,
//! `matrix` encodes the rules of a symbol as a clause matrix, and
//! `compile` reduces matrices to [`Tree`]s.
//! The remaining modules supply the term language, rules, symbols, and
//! the signature that ties trees to symbols.
//!
//! The compilation scheme is the clause-matrix construction of
//! Maranget, adapted to rewriting by Hondet and Blanqui
//! (see the references in the `compile` module).
//! Compilation is a pure function of the rule list:
//! trees for distinct symbols may be built in parallel by the caller.

extern crate alloc;
#[macro_use]
extern crate log;

pub mod app;
mod compile;
mod cons;
pub mod error;
mod matrix;
mod reduce;
mod rule;
mod signature;
mod subst;
pub mod subterm;
pub mod symbol;
mod symbols;
pub mod term;
mod tree;

pub use app::App;
pub use compile::compile;
pub use cons::TreeCons;
pub use error::Error;
pub use rule::{Rhs, Rule};
pub use signature::Signature;
pub use subterm::Subterm;
pub use symbol::Symbol;
pub use symbols::Symbols;
pub use term::Term;
pub use tree::{Dot, EnvBuilder, Tree};
