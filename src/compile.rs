//! Compilation of rewrite rules into decision trees.
//!
//! The compilation scheme follows the classic clause-matrix construction:
//! pick a column, split the matrix by the constructors occurring in it,
//! and recur until a row can no longer fail.
//!
//! References:
//! Luc Maranget:
//! Compiling Pattern Matching to Good Decision Trees.
//! ML Workshop 2008.
//! doi: [10.1145/1411304.1411311](https://doi.org/10.1145/1411304.1411311)
//!
//! Gabriel Hondet, Frédéric Blanqui:
//! The New Rewriting Engine of Dedukti.
//! FSCD 2020.
//! doi: [10.4230/LIPIcs.FSCD.2020.35](https://doi.org/10.4230/LIPIcs.FSCD.2020.35)

use crate::cons::TreeCons;
use crate::matrix::Matrix;
use crate::rule::{Rhs, Rule};
use crate::subterm::Subterm;
use crate::term::{Term, TermC};
use crate::tree::{EnvBuilder, Tree};
use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;

/// Compile the rewrite rules of one head symbol into a decision tree.
///
/// The rules must all match the same number of arguments.
/// Earlier rules take priority over later ones
/// whenever several of them match the same terms.
pub fn compile<'s>(rules: &[Rc<Rule<'s>>]) -> Tree<'s> {
    trace!("compile {} rules", rules.len());
    compile_matrix(Matrix::new(rules))
}

fn compile_matrix<'s>(mx: Matrix<'s>) -> Tree<'s> {
    if mx.is_empty() {
        // no rule matches on this path
        return Tree::Fail;
    }
    if mx.is_exhausted() {
        return leaf_of(&mx);
    }

    let candidates = mx.switchable();
    // a non-exhausted matrix has a switchable column
    assert!(!candidates.is_empty());
    let ci = candidates[mx.pick_best(&candidates)];
    trace!("switch on column {}", ci);

    let store = mx.captures(ci);
    let mut saved = mx.var_positions(ci);
    saved.extend(mx.saved.iter().cloned());

    let children = mx
        .constructors(ci)
        .iter()
        .map(|c| {
            let clauses = mx.specialize(c, ci);
            let saved = saved.clone();
            (TreeCons::of_term(c), compile_matrix(Matrix { clauses, saved }))
        })
        .collect();
    let clauses = mx.default(ci);
    let default = if clauses.is_empty() {
        None
    } else {
        Some(Box::new(compile_matrix(Matrix { clauses, saved })))
    };
    Tree::Node {
        swap: ci,
        store,
        children,
        default,
    }
}

/// Conclude compilation with the first row of an exhausted matrix.
///
/// Captured positions that the winning row does not use were
/// saved for the sake of other rules and are dropped here.
fn leaf_of<'s>(mx: &Matrix<'s>) -> Tree<'s> {
    let clause = &mx.clauses[0];
    let mut env_builder = EnvBuilder::new();
    // the most recently captured position sits at the end of the buffer
    for (i, pos) in mx.saved.iter().rev().enumerate() {
        if let Some(slot) = clause.variables.get(pos) {
            env_builder.insert(i, *slot);
        }
    }
    assert!(env_builder.len() <= clause.variables.len());
    let line = clause.lhs.iter().cloned().collect();
    fetch(line, mx.saved.len(), env_builder, clause.rhs.clone())
}

/// Build the chain retrieving the pattern variables
/// that were never inspected during switching.
///
/// The chain consumes the remaining stack terms one by one,
/// capturing those standing for used pattern variables.
fn fetch<'s>(
    mut line: VecDeque<(Term<'s>, Subterm)>,
    depth: usize,
    mut env_builder: EnvBuilder,
    rhs: Rc<Rhs<'s>>,
) -> Tree<'s> {
    let missing = rhs.arity().saturating_sub(env_builder.len());
    let mut added = 0;
    let mut stores = Vec::new();
    while added < missing {
        // the line cannot run dry while slots are unfilled
        let (tm, pos) = line.pop_front().expect("pattern spent with slots unfilled");
        let (head, args) = tm.get_args();
        match head {
            Term::Comb(c) => match &**c {
                TermC::Patt(Some(m), _, _) => {
                    env_builder.insert(depth + added, *m);
                    added += 1;
                    stores.push(true);
                    prepend(&mut line, args, &pos);
                }
                TermC::Abst(_, body) => {
                    stores.push(false);
                    line.push_front((body.clone(), pos.sub()));
                }
                TermC::Patt(None, _, _) => {
                    stores.push(false);
                    prepend(&mut line, args, &pos);
                }
                _ => unreachable!("constructor on an exhausted row"),
            },
            _ => unreachable!("constructor on an exhausted row"),
        }
    }
    let mut tree = Tree::Leaf(env_builder, rhs);
    for store in stores.into_iter().rev() {
        tree = Tree::Fetch(store, Box::new(tree));
    }
    tree
}

/// Queue the arguments of a consumed term for further consumption.
fn prepend<'s>(line: &mut VecDeque<(Term<'s>, Subterm)>, args: &[Term<'s>], pos: &Subterm) {
    let tagged = pos.sub().tag(args.iter().cloned());
    tagged.into_iter().rev().for_each(|c| line.push_front(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::symbol::{Owned, Symbol};
    use alloc::string::ToString;
    use alloc::vec;

    fn owned(name: &str) -> Owned {
        Owned::new(Vec::new(), name.to_string())
    }

    fn patt<'s>(m: usize, name: &str) -> Term<'s> {
        Term::patt(Some(m), name.to_string(), Vec::new())
    }

    #[test]
    fn lambda_body_is_fetched() {
        let h = owned("h");
        // h (λ μ0[β0]) ⟶ μ0
        let body = Term::patt(Some(0), "b".to_string(), vec![Term::BVar(0)]);
        let lhs = App::new(Symbol::new(&h), vec![Term::abst(None, body)]);
        let ctx = vec![("b".to_string(), 1)];
        let rule = Rc::new(Rule::new(ctx, lhs, Term::BVar(0)).unwrap());
        let tree = compile(&[rule]);
        match &tree {
            Tree::Fetch(false, next) => match &**next {
                Tree::Fetch(true, next) => match &**next {
                    Tree::Leaf(eb, _) => assert_eq!(eb.get(&0), Some(&0)),
                    t => panic!("expected leaf, got {:?}", t),
                },
                t => panic!("expected capturing fetch, got {:?}", t),
            },
            t => panic!("expected fetch, got {:?}", t),
        }
        assert_eq!(tree.capacity(), 1);
    }

    #[test]
    fn bound_variable_heads_are_switched() {
        let (w, z) = (owned("w"), owned("z"));
        // a column may expose a bound-variable head below a binder;
        // build the rule directly, as validation never sees this shape
        let lhs = App::new(Symbol::new(&w), vec![Term::BVar(0)]);
        let rhs = Rc::new(Rhs {
            ctx: Vec::new(),
            body: Term::from(Symbol::new(&z)),
        });
        let tree = compile(&[Rc::new(Rule { lhs, rhs })]);
        match &tree {
            Tree::Node { children, .. } => {
                let keys: Vec<_> = children.keys().collect();
                assert_eq!(keys, vec![&TreeCons::Vari(0, 0)]);
            }
            t => panic!("expected node, got {:?}", t),
        }
    }

    #[test]
    fn deterministic() {
        let (f, z) = (owned("f"), owned("z"));
        let zero = || Term::from(Symbol::new(&z));
        fn mk<'s>(f: &'s Owned, l: Term<'s>, r: Term<'s>, vars: usize, zero: Term<'s>) -> Rc<Rule<'s>> {
            let ctx = (0..vars).map(|i| (alloc::format!("x{}", i), 0)).collect();
            let lhs = App::new(Symbol::new(f), vec![l, r]);
            Rc::new(Rule::new(ctx, lhs, zero).unwrap())
        }
        let rules = [
            mk(&f, zero(), patt(0, "n"), 1, zero()),
            mk(&f, patt(0, "n"), zero(), 1, zero()),
        ];
        assert_eq!(compile(&rules), compile(&rules));
    }

    #[test]
    fn unused_capture_is_dropped() {
        let (f, z) = (owned("f"), owned("z"));
        let zero = || Term::from(Symbol::new(&z));
        // f μ0 z ⟶ μ0 and f z z ⟶ z: inspecting the first column
        // saves a term that the second rule ignores
        let r1 = {
            let lhs = App::new(Symbol::new(&f), vec![patt(0, "n"), zero()]);
            Rc::new(Rule::new(vec![("n".to_string(), 0)], lhs, Term::BVar(0)).unwrap())
        };
        let r2 = {
            let lhs = App::new(Symbol::new(&f), vec![zero(), zero()]);
            Rc::new(Rule::new(Vec::new(), lhs, zero()).unwrap())
        };
        let tree = compile(&[r2, r1]);
        let max_env = tree.iter(
            &|eb, rhs| {
                assert!(eb.len() <= rhs.arity());
                eb.len()
            },
            &|_, _, ch, df| ch.into_iter().chain(df).max().unwrap_or(0),
            &|_, next| next,
            &|| 0,
        );
        assert!(max_env <= 1);
    }
}
