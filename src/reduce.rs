//! Rewriting with compiled decision trees.

use crate::cons::TreeCons;
use crate::term::{Term, TermC};
use crate::tree::Tree;
use crate::Signature;
use alloc::vec::Vec;

impl<'s> Signature<'s> {
    /// Rewrite the term at its head, if a rule applies.
    ///
    /// The head of the term must be applied to at least as many arguments
    /// as the rules of its symbol match; surplus arguments are
    /// put back onto the result.
    pub fn rewrite(&self, tm: &Term<'s>) -> Option<Term<'s>> {
        let (head, args) = tm.get_args();
        let sym = match head {
            Term::Symb(sym) => sym,
            _ => return None,
        };
        let arity = self.rules(sym)?.first()?.arity();
        if args.len() < arity {
            return None;
        }
        let (now, surplus) = args.split_at(arity);
        let out = walk(self.tree(sym)?, now.to_vec())?;
        trace!("rewrite: {} ⟶ {}", tm, out);
        Some(out.apply(surplus.to_vec()))
    }

    /// Reduce the head of the term until no β-redex remains and
    /// no rewrite rule applies.
    pub fn whnf(&self, mut tm: Term<'s>) -> Term<'s> {
        loop {
            let beta = {
                let (head, args) = tm.get_args();
                match head {
                    Term::Comb(c) => match &**c {
                        TermC::Abst(_, body) if !args.is_empty() => {
                            let body = body.clone().subst(&args[0]);
                            Some(body.apply(args[1..].to_vec()))
                        }
                        _ => None,
                    },
                    _ => None,
                }
            };
            if let Some(next) = beta {
                tm = next;
                continue;
            }
            match self.rewrite(&tm) {
                Some(next) => tm = next,
                None => break tm,
            }
        }
    }
}

/// Interpret a tree against an argument stack,
/// returning the instantiated right-hand side of the winning rule.
fn walk<'s>(tree: &Tree<'s>, mut stack: Vec<Term<'s>>) -> Option<Term<'s>> {
    let mut tree = tree;
    let mut saved: Vec<Term<'s>> = Vec::new();
    loop {
        match tree {
            Tree::Fail => return None,
            Tree::Leaf(env_builder, rhs) => {
                let mut env: Vec<Option<Term>> = alloc::vec![None; rhs.arity()];
                for (k, slot) in env_builder {
                    let tm = saved[*k].clone();
                    if let Some(prev) = &env[*slot] {
                        // a non-linear rule matches only if
                        // all occurrences of a variable agree
                        if *prev != tm {
                            return None;
                        }
                    } else {
                        env[*slot] = Some(tm);
                    }
                }
                let env: Vec<Term> = env
                    .into_iter()
                    .map(|tm| tm.expect("slot unfilled at leaf"))
                    .collect();
                return Some(rhs.subst(&env));
            }
            Tree::Node {
                swap,
                store,
                children,
                default,
            } => {
                let tm = stack.get(*swap)?.clone();
                if *store {
                    saved.push(tm.clone());
                }
                let (head, args) = tm.get_args();
                let child = match head {
                    Term::Symb(_) | Term::BVar(_) => children.get(&TreeCons::of_term(&tm)),
                    _ => None,
                };
                match child {
                    Some(child) => {
                        let args = args.to_vec();
                        stack.splice(*swap..=*swap, args);
                        tree = child;
                    }
                    None => match default {
                        Some(default) => {
                            stack.remove(*swap);
                            tree = &**default;
                        }
                        None => return None,
                    },
                }
            }
            Tree::Fetch(store, next) => {
                if stack.is_empty() {
                    return None;
                }
                let tm = stack.remove(0);
                if *store {
                    saved.push(tm.clone());
                }
                // the chain of an abstraction pattern continues into its body
                if let Term::Comb(c) = &tm {
                    if let TermC::Abst(_, body) = &**c {
                        stack.insert(0, body.clone());
                    }
                }
                tree = &**next;
            }
        }
    }
}
