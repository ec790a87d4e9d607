//! Terms for the lambda-Pi calculus with rewriting.

use crate::app::format as fmt_appl;
use crate::Symbol;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

/// De Bruijn variable.
pub type DeBruijn = usize;

/// Miller variable.
///
/// This refers to the variables appearing in a rewrite pattern
/// bound by the rewrite rule's context.
/// The name honours Miller's work on higher-order patterns,
/// where such variables may be applied to locally bound variables.
///
/// Reference:
/// Dale Miller:
/// A Logic Programming Language with Lambda-Abstraction,
/// Function Variables, and Simple Unification.
/// J. Log. Comput. 1(4): 497-536 (1991).
/// doi: [10.1093/logcom/1.4.497](https://doi.org/10.1093/logcom/1.4.497)
pub type Miller = usize;

/// Term for the lambda-Pi calculus with rewriting.
///
/// Cheap to clone; anything larger than a machine word
/// sits behind a shared [`RTerm`] pointer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Term<'s> {
    Kind,
    Type,
    Symb(Symbol<'s>),
    BVar(DeBruijn),
    /// hole in a term; may not occur in rule left-hand sides
    Wild,
    Comb(RTerm<'s>),
}

/// Term combinator: a term node with subterms.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TermC<'s> {
    /// application of several arguments to a head,
    /// where the head is never an application itself
    Appl(Term<'s>, Vec<Term<'s>>),
    /// abstraction with optional type annotation
    Abst(Option<Term<'s>>, Term<'s>),
    Prod(Term<'s>, Term<'s>),
    /// pattern variable, to be substituted into
    /// the rewrite rule context slot it refers to
    /// (`None` if the right-hand side never uses it),
    /// applied to an environment of bound variables
    Patt(Option<Miller>, String, Vec<Term<'s>>),
    Meta(usize, Vec<Term<'s>>),
}

/// Pointer to a shared term.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RTerm<'s>(Rc<TermC<'s>>);

impl<'s> RTerm<'s> {
    /// Create a term pointer from a term.
    pub fn new(tm: TermC<'s>) -> Self {
        Self(Rc::new(tm))
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<'s> From<TermC<'s>> for RTerm<'s> {
    fn from(tm: TermC<'s>) -> Self {
        Self::new(tm)
    }
}

impl<'s> Term<'s> {
    /// Apply some terms to the term.
    pub fn apply(self, mut args: Vec<Self>) -> Self {
        if args.is_empty() {
            return self;
        }
        if let Term::Comb(comb) = &self {
            if let TermC::Appl(tm, args1) = &**comb {
                let mut args1 = args1.clone();
                args1.append(&mut args);
                return Term::Comb(RTerm::new(TermC::Appl(tm.clone(), args1)));
            }
        };
        Term::Comb(RTerm::new(TermC::Appl(self, args)))
    }

    /// Split the term into its head and the arguments applied to it.
    ///
    /// The head of anything but an application is the term itself.
    pub fn get_args(&self) -> (&Self, &[Self]) {
        if let Term::Comb(comb) = self {
            if let TermC::Appl(head, args) = &**comb {
                return (head, args);
            }
        }
        (self, &[])
    }

    /// Construct a pattern variable.
    pub fn patt(m: Option<Miller>, name: String, env: Vec<Self>) -> Self {
        Term::Comb(RTerm::new(TermC::Patt(m, name, env)))
    }

    /// Construct an abstraction.
    pub fn abst(ty: Option<Self>, body: Self) -> Self {
        Term::Comb(RTerm::new(TermC::Abst(ty, body)))
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Kind, Term::Kind) | (Term::Type, Term::Type) | (Term::Wild, Term::Wild) => true,
            (Term::Symb(s1), Term::Symb(s2)) => s1 == s2,
            (Term::BVar(v1), Term::BVar(v2)) => v1 == v2,
            (Term::Comb(l), Term::Comb(r)) => RTerm::ptr_eq(l, r),
            _ => false,
        }
    }

    /// Return true if all variables bound outside the term
    /// occur in the given environment.
    ///
    /// The environment is a sequence of bound variables, as
    /// carried by pattern variables in rule left-hand sides.
    pub fn is_closed_under(&self, env: &[Self]) -> bool {
        self.closed_under(env, 0)
    }

    fn closed_under(&self, env: &[Self], k: usize) -> bool {
        match self {
            Self::BVar(n) if *n >= k => env.iter().any(|e| *e == Self::BVar(n - k)),
            Self::Comb(c) => match &**c {
                TermC::Appl(head, args) => {
                    head.closed_under(env, k) && args.iter().all(|a| a.closed_under(env, k))
                }
                TermC::Abst(ty, tm) => {
                    ty.iter().all(|ty| ty.closed_under(env, k)) && tm.closed_under(env, k + 1)
                }
                TermC::Prod(ty, tm) => ty.closed_under(env, k) && tm.closed_under(env, k + 1),
                TermC::Patt(_, _, args) | TermC::Meta(_, args) => {
                    args.iter().all(|a| a.closed_under(env, k))
                }
            },
            _ => true,
        }
    }
}

impl<'s> core::ops::Deref for RTerm<'s> {
    type Target = TermC<'s>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'s> From<TermC<'s>> for Term<'s> {
    fn from(tm: TermC<'s>) -> Self {
        Self::Comb(RTerm::new(tm))
    }
}

impl<'s> From<Symbol<'s>> for Term<'s> {
    fn from(s: Symbol<'s>) -> Self {
        Self::Symb(s)
    }
}

impl<'s> Display for Term<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Kind => write!(f, "Kind"),
            Self::Type => write!(f, "Type"),
            Self::Symb(s) => s.fmt(f),
            Self::BVar(x) => write!(f, "β{}", x),
            Self::Wild => write!(f, "_"),
            Self::Comb(c) => c.fmt(f),
        }
    }
}

impl<'s> Display for TermC<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Appl(head, tail) => fmt_appl(head, tail, f),
            Self::Abst(None, tm) => write!(f, "(λ {})", tm),
            Self::Abst(Some(ty), tm) => write!(f, "(λ : {}. {})", ty, tm),
            Self::Prod(ty, tm) => write!(f, "(Π : {}. {})", ty, tm),
            Self::Patt(m, _, env) => {
                match m {
                    Some(m) => write!(f, "μ{}", m)?,
                    None => write!(f, "_")?,
                }
                if !env.is_empty() {
                    write!(f, "[")?;
                    let mut env = env.iter();
                    env.next().iter().try_for_each(|e| e.fmt(f))?;
                    env.try_for_each(|e| write!(f, ", {}", e))?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            Self::Meta(m, args) => {
                write!(f, "?{}", m)?;
                args.iter().try_for_each(|a| write!(f, " {}", a))
            }
        }
    }
}
