//! Rewrite rules.

use crate::app::App;
use crate::error::RuleError as Error;
use crate::term::{Term, TermC};
use crate::Symbol;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Right-hand side of a rewrite rule.
///
/// This is a binder over the pattern variables used by the rule:
/// `BVar(i)` in the body refers to the `i`-th context entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rhs<'s> {
    /// name and arity of every bound pattern variable
    pub ctx: Vec<(String, usize)>,
    pub body: Term<'s>,
}

impl<'s> Rhs<'s> {
    /// Number of pattern variables bound by the rule.
    pub fn arity(&self) -> usize {
        self.ctx.len()
    }

    /// Instantiate the binder, substituting one term per slot.
    pub fn subst(&self, env: &[Term<'s>]) -> Term<'s> {
        debug_assert_eq!(env.len(), self.arity());
        if env.is_empty() {
            return self.body.clone();
        }
        let arity = self.arity();
        let subst = move |n: usize, k: usize| match env.get(n - k) {
            Some(tm) => tm.clone() << k,
            None => Term::BVar(n - arity),
        };
        self.body.clone().apply_subst(&subst, 0)
    }
}

impl<'s> Display for Rhs<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.body.fmt(f)
    }
}

/// Rewrite rule.
///
/// The left-hand side must be an application of patterns to a symbol.
/// This is to exclude rules matching any term, such as `[X] X ⟶ f`.
#[derive(Clone, Debug)]
pub struct Rule<'s> {
    /// left-hand side (pattern to match with)
    pub lhs: App<Symbol<'s>, Term<'s>>,
    /// right-hand side (binder to instantiate after a match)
    pub rhs: Rc<Rhs<'s>>,
}

impl<'s> Rule<'s> {
    /// Create a rule, verifying that its left-hand side is a valid pattern.
    pub fn new(
        ctx: Vec<(String, usize)>,
        lhs: App<Symbol<'s>, Term<'s>>,
        rhs: Term<'s>,
    ) -> Result<Self, Error> {
        lhs.args
            .iter()
            .try_for_each(|tm| check_pattern(tm, ctx.len(), 0))?;
        let rhs = Rc::new(Rhs { ctx, body: rhs });
        Ok(Self { lhs, rhs })
    }

    /// Number of arguments that the left-hand side matches.
    pub fn arity(&self) -> usize {
        self.lhs.arity()
    }
}

/// Verify that a term may occur in a rule left-hand side,
/// below `depth` abstractions of the pattern.
fn check_pattern(tm: &Term, arity: usize, depth: usize) -> Result<(), Error> {
    match tm {
        Term::Symb(_) => Ok(()),
        Term::BVar(x) if *x < depth => Ok(()),
        Term::BVar(_) => Err(Error::FreeVariable),
        Term::Comb(c) => match &**c {
            TermC::Appl(head, args) => {
                check_pattern(head, arity, depth)?;
                args.iter().try_for_each(|a| check_pattern(a, arity, depth))
            }
            TermC::Abst(_, body) => check_pattern(body, arity, depth + 1),
            TermC::Patt(m, _, env) => {
                if m.map_or(false, |m| m >= arity) {
                    return Err(Error::SlotRange);
                }
                // the environment names the bound variables usable by the variable
                env.iter().try_for_each(|e| match e {
                    Term::BVar(x) if *x < depth => Ok(()),
                    Term::BVar(_) => Err(Error::FreeVariable),
                    _ => Err(Error::LhsTerm),
                })
            }
            TermC::Prod(_, _) | TermC::Meta(_, _) => Err(Error::LhsTerm),
        },
        Term::Kind | Term::Type | Term::Wild => Err(Error::LhsTerm),
    }
}

impl<'s> Display for Rule<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ⟶ {}", self.lhs, self.rhs)
    }
}
