//! Substitution and shifting for terms.

use crate::term::{RTerm, Term, TermC};
use alloc::vec::Vec;

impl<'s> RTerm<'s> {
    pub fn apply_subst<S>(self, subst: &S, k: usize) -> Self
    where
        S: Fn(usize, usize) -> Term<'s>,
    {
        let sub = |tm: Term<'s>| tm.apply_subst(subst, k);
        match &*self {
            TermC::Appl(f, args) => {
                let f2 = sub(f.clone());
                let args2: Vec<Term> = args.iter().cloned().map(sub).collect();
                if !f.ptr_eq(&f2) || !args.iter().zip(args2.iter()).all(|(a, a2)| a.ptr_eq(a2)) {
                    return TermC::Appl(f2, args2).into();
                }
            }
            TermC::Abst(ty, f) => {
                let ty2 = ty.clone().map(sub);
                let f2 = f.clone().apply_subst(subst, k + 1);
                let ty_eq = match (ty, &ty2) {
                    (None, None) => true,
                    (Some(t1), Some(t2)) => t1.ptr_eq(t2),
                    _ => false,
                };
                if !ty_eq || !f.ptr_eq(&f2) {
                    return TermC::Abst(ty2, f2).into();
                }
            }
            TermC::Prod(ty, f) => {
                let ty2 = sub(ty.clone());
                let f2 = f.clone().apply_subst(subst, k + 1);
                if !ty.ptr_eq(&ty2) || !f.ptr_eq(&f2) {
                    return TermC::Prod(ty2, f2).into();
                }
            }
            TermC::Patt(m, name, env) => {
                let env2: Vec<Term> = env.iter().cloned().map(sub).collect();
                if !env.iter().zip(env2.iter()).all(|(e, e2)| e.ptr_eq(e2)) {
                    return TermC::Patt(*m, name.clone(), env2).into();
                }
            }
            TermC::Meta(m, args) => {
                let args2: Vec<Term> = args.iter().cloned().map(sub).collect();
                if !args.iter().zip(args2.iter()).all(|(a, a2)| a.ptr_eq(a2)) {
                    return TermC::Meta(*m, args2).into();
                }
            }
        };
        self
    }
}

impl<'s> Term<'s> {
    pub fn apply_subst<S>(self, subst: &S, k: usize) -> Self
    where
        S: Fn(usize, usize) -> Term<'s>,
    {
        match self {
            Self::BVar(n) if n >= k => subst(n, k),
            Self::Comb(c) => Self::Comb(c.apply_subst(subst, k)),
            _ => self,
        }
    }

    /// Substitute the topmost bound variable of the term.
    pub fn subst(self, u: &Term<'s>) -> Self {
        self.apply_subst(&u.psubst_single(), 0)
    }

    fn psubst_single<'t>(&'t self) -> impl Fn(usize, usize) -> Term<'s> + 't {
        move |n: usize, k: usize| {
            if n == k {
                self.clone() << k
            } else {
                Term::BVar(n - 1)
            }
        }
    }
}

/// Definition of `<<` for terms.
#[allow(clippy::suspicious_arithmetic_impl)]
impl<'s> core::ops::Shl<usize> for Term<'s> {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        if rhs == 0 {
            self
        } else {
            self.apply_subst(&|n, _k| Term::BVar(n + rhs), 0)
        }
    }
}
