//! Application of arguments to a head symbol.

use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Application of a list of arguments to a symbol.
///
/// The left-hand side of a rewrite rule takes this shape:
/// its head must be a symbol, to exclude rules matching any term.
#[derive(Clone, Debug)]
pub struct App<S, A> {
    pub symbol: S,
    pub args: Vec<A>,
}

impl<S, A> App<S, A> {
    pub fn new(symbol: S, args: Vec<A>) -> Self {
        Self { symbol, args }
    }

    /// Number of arguments applied to the symbol.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn map<F, B>(self, f: F) -> App<S, B>
    where
        F: Fn(A) -> B,
    {
        App {
            symbol: self.symbol,
            args: self.args.into_iter().map(f).collect(),
        }
    }
}

impl<S, A> From<S> for App<S, A> {
    fn from(symbol: S) -> Self {
        let args = Vec::new();
        Self { symbol, args }
    }
}

impl<S: Display, A: Display> Display for App<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        format(&self.symbol, &self.args, f)
    }
}

pub fn format<H: Display, T: Display>(head: &H, tail: &[T], f: &mut fmt::Formatter) -> fmt::Result {
    let parens = !tail.is_empty();
    if parens {
        write!(f, "(")?;
    };
    write!(f, "{}", head)?;
    for t in tail {
        write!(f, " {}", t)?;
    }
    if parens {
        write!(f, ")")?;
    };
    Ok(())
}
