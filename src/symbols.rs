//! Maps from strings to (shared) symbols.

use crate::error::SymbolsError as Error;
use crate::symbol::{self, Symbol};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::borrow::Borrow;
use fnv::FnvHashMap;
use nested_modules::Context;

/// Map from strings to (shared) symbols.
#[derive(Default)]
pub struct Symbols<'s> {
    ctx: Context<String, FnvHashMap<String, &'s symbol::Owned>>,
    /// number of previously introduced symbols
    idx: usize,
}

impl<'s> Symbols<'s> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get<S: Borrow<str> + Ord>(&self, path: &[S], name: &S) -> Option<Symbol<'s>> {
        let path: Vec<String> = path.iter().map(|p| p.borrow().to_string()).collect();
        let found = self
            .ctx
            .find(&path)
            .filter_map(|module| module.data.get(name.borrow()))
            .next()
            .copied()
            .map(Symbol::new);
        found
    }

    pub fn get_idx(&self) -> usize {
        self.idx
    }

    /// Register a symbol in the currently open module.
    pub fn insert(&mut self, o: &'s symbol::Owned) -> Result<Symbol<'s>, Error> {
        let name = Symbol::new(o).name().to_string();
        // `insert` returns `Some` if the name was already taken
        if self.ctx.get_mut().data.insert(name, o).is_some() {
            return Err(Error::Reinsertion);
        }
        self.idx += 1;
        Ok(Symbol::new(o))
    }

    pub fn set_path(&mut self, path: Vec<String>) {
        while self.ctx.close() {}
        path.into_iter().for_each(|p| self.ctx.open_or_default(p))
    }
}
