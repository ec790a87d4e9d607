//! Clause matrices, the intermediate shape of rules under compilation.

use crate::rule::{Rhs, Rule};
use crate::subterm::Subterm;
use crate::term::{Miller, Term, TermC};
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

/// Row of a clause matrix: one rewrite rule in mid-compilation.
#[derive(Clone, Debug)]
pub(crate) struct Clause<'s> {
    /// cells of the row, each a pattern together with
    /// the position of the subterm it matches
    pub lhs: Vec<(Term<'s>, Subterm)>,
    /// right-hand side to fire if the row wins
    pub rhs: Rc<Rhs<'s>>,
    /// positions of used pattern variables, with the slot each fills
    pub variables: BTreeMap<Subterm, Miller>,
}

impl<'s> Clause<'s> {
    fn new(rule: &Rule<'s>) -> Self {
        // the head symbol occupies the root position
        let args = rule.lhs.args.iter().cloned();
        let lhs = Subterm::init().succ().tag(args);
        let variables = bind_vars(&lhs, rule.rhs.arity());
        let rhs = rule.rhs.clone();
        Self { lhs, rhs, variables }
    }
}

/// Collect the positions of used pattern variables in a row,
/// stopping once every slot of the right-hand side has been seen.
///
/// A slot may be bound at several positions if the rule is non-linear.
fn bind_vars<'s>(lhs: &[(Term<'s>, Subterm)], arity: usize) -> BTreeMap<Subterm, Miller> {
    let mut vars = BTreeMap::new();
    let mut seen = alloc::vec![false; arity];
    let mut bound = 0;
    for (tm, pos) in lhs {
        scan(tm, pos, &mut vars, &mut seen, &mut bound);
    }
    vars
}

fn scan<'s>(
    tm: &Term<'s>,
    pos: &Subterm,
    vars: &mut BTreeMap<Subterm, Miller>,
    seen: &mut [bool],
    bound: &mut usize,
) {
    if *bound == seen.len() {
        return;
    }
    match tm {
        Term::Symb(_) | Term::BVar(_) => (),
        Term::Comb(c) => match &**c {
            TermC::Appl(_, args) => {
                for (a, q) in pos.sub().tag(args.iter()) {
                    scan(a, &q, vars, seen, bound)
                }
            }
            TermC::Abst(_, body) => scan(body, &pos.sub(), vars, seen, bound),
            TermC::Patt(Some(m), _, _) => {
                if !seen[*m] {
                    seen[*m] = true;
                    *bound += 1;
                }
                vars.insert(pos.clone(), *m);
            }
            TermC::Patt(None, _, _) => (),
            TermC::Prod(_, _) | TermC::Meta(_, _) => unreachable!("malformed pattern"),
        },
        Term::Kind | Term::Type | Term::Wild => unreachable!("malformed pattern"),
    }
}

/// Clause matrix: rows of rules over columns of argument positions.
///
/// Rows are ordered by rule priority;
/// all rows have the same number of cells, and
/// the cells of one column all sit at the same position.
#[derive(Clone, Debug)]
pub(crate) struct Matrix<'s> {
    pub clauses: Vec<Clause<'s>>,
    /// positions inspected and captured on the path to this matrix,
    /// most recent first
    pub saved: Vec<Subterm>,
}

impl<'s> Matrix<'s> {
    /// Create the initial matrix from the rules of one symbol.
    pub fn new(rules: &[Rc<Rule<'s>>]) -> Self {
        let clauses = rules.iter().map(|r| Clause::new(r)).collect();
        let saved = Vec::new();
        Self { clauses, saved }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Return whether the first row can no longer fail:
    /// none of its cells constrains the input.
    pub fn is_exhausted(&self) -> bool {
        self.clauses[0].lhs.iter().all(|(tm, _)| !tm.is_tree_cons())
    }

    /// Cells of the given column, one per row.
    pub fn col(&self, ci: usize) -> impl Iterator<Item = &(Term<'s>, Subterm)> {
        self.clauses.iter().map(move |c| &c.lhs[ci])
    }

    /// Number of cells in the column that are no tree constructors.
    fn score(&self, ci: usize) -> usize {
        self.col(ci).filter(|(tm, _)| !tm.is_tree_cons()).count()
    }

    fn is_switchable(&self, ci: usize) -> bool {
        self.col(ci).any(|(tm, _)| tm.is_tree_cons())
    }

    /// Indices of all columns the tree could switch on.
    ///
    /// At least one column is switchable if the matrix is not exhausted.
    pub fn switchable(&self) -> Vec<usize> {
        let width = self.clauses[0].lhs.len();
        (0..width).filter(|ci| self.is_switchable(*ci)).collect()
    }

    /// Return the index (into `candidates`) of the column with the highest
    /// score, so that the remaining columns keep as many constructors
    /// as possible for later switches.
    ///
    /// Among equally scored columns, the rightmost wins.
    pub fn pick_best(&self, candidates: &[usize]) -> usize {
        let mut best = 0;
        let mut best_score = self.score(candidates[0]);
        for (i, ci) in candidates.iter().enumerate().skip(1) {
            let score = self.score(*ci);
            if best_score <= score {
                best = i;
                best_score = score;
            }
        }
        best
    }

    /// One representative term per distinct constructor in the column,
    /// in order of first occurrence.
    pub fn constructors(&self, ci: usize) -> Vec<Term<'s>> {
        let mut out: Vec<Term> = Vec::new();
        for (tm, _) in self.col(ci) {
            if tm.is_tree_cons() && !out.iter().any(|o| same_cons(o, tm)) {
                out.push(tm.clone())
            }
        }
        out
    }

    /// Return whether the inspected term of the column must be saved,
    /// because some row's right-hand side uses it.
    pub fn captures(&self, ci: usize) -> bool {
        self.col(ci).any(|(tm, _)| is_used_patt(tm))
    }

    /// Positions of used pattern variables in the column,
    /// deduplicated, in order of first occurrence.
    pub fn var_positions(&self, ci: usize) -> Vec<Subterm> {
        let mut out = Vec::new();
        for (tm, pos) in self.col(ci) {
            if is_used_patt(tm) && !out.contains(pos) {
                out.push(pos.clone())
            }
        }
        out
    }

    /// Restrict the matrix to the rows whose cell in column `ci`
    /// matches the constructor of `pat`,
    /// replacing the cell by the cells of its arguments.
    pub fn specialize(&self, pat: &Term<'s>, ci: usize) -> Vec<Clause<'s>> {
        let rows = self.clauses.iter();
        let rows = rows.filter(|r| spec_filter(pat, &r.lhs[ci].0));
        rows.map(|r| {
            let mut lhs = r.lhs.clone();
            let cell = lhs.remove(ci);
            lhs.splice(ci..ci, spec_transform(pat, &cell));
            let rhs = r.rhs.clone();
            let variables = r.variables.clone();
            Clause { lhs, rhs, variables }
        })
        .collect()
    }

    /// Restrict the matrix to the rows whose cell in column `ci`
    /// is a pattern variable, removing the column.
    pub fn default(&self, ci: usize) -> Vec<Clause<'s>> {
        let rows = self.clauses.iter();
        let rows = rows.filter(|r| is_patt(&r.lhs[ci].0));
        rows.map(|r| {
            let mut lhs = r.lhs.clone();
            lhs.remove(ci);
            let rhs = r.rhs.clone();
            let variables = r.variables.clone();
            Clause { lhs, rhs, variables }
        })
        .collect()
    }
}

fn is_patt(tm: &Term) -> bool {
    match tm {
        Term::Comb(c) => matches!(&**c, TermC::Patt(_, _, _)),
        _ => false,
    }
}

fn is_used_patt(tm: &Term) -> bool {
    match tm {
        Term::Comb(c) => matches!(&**c, TermC::Patt(Some(_), _, _)),
        _ => false,
    }
}

/// Return whether two terms exhibit the same constructor:
/// equal heads applied to equally many arguments.
fn same_cons(tm: &Term, other: &Term) -> bool {
    let (th, ta) = tm.get_args();
    let (uh, ua) = other.get_args();
    ta.len() == ua.len()
        && match (th, uh) {
            (Term::Symb(s1), Term::Symb(s2)) => s1 == s2,
            (Term::BVar(x), Term::BVar(y)) => x == y,
            _ => false,
        }
}

/// Return whether a row with head `hd` in the inspected column
/// survives specialisation on the constructor of `pat`.
fn spec_filter(pat: &Term, hd: &Term) -> bool {
    match (pat, hd) {
        (Term::Symb(s1), Term::Symb(s2)) => s1 == s2,
        (Term::BVar(x), Term::BVar(y)) => x == y,
        (Term::Comb(pc), Term::Comb(hc)) => match (&**pc, &**hc) {
            (TermC::Appl(ph, pa), TermC::Appl(hh, ha)) => {
                pa.len() == ha.len() && spec_filter(ph, hh)
            }
            // a pattern variable matches any application
            (TermC::Appl(_, _), TermC::Patt(_, _, _)) => true,
            (_, TermC::Patt(_, _, env)) => pat.is_closed_under(env),
            _ => false,
        },
        (_, Term::Comb(hc)) => match &**hc {
            TermC::Patt(_, _, env) => pat.is_closed_under(env),
            // e.g. a symbol against an abstraction
            _ => false,
        },
        _ => false,
    }
}

/// Cells replacing a cell that survived specialisation on `pat`.
fn spec_transform<'s>(pat: &Term<'s>, (hd, pos): &(Term<'s>, Subterm)) -> Vec<(Term<'s>, Subterm)> {
    match hd {
        Term::Symb(_) | Term::BVar(_) => Vec::new(),
        Term::Comb(hc) => match &**hc {
            TermC::Appl(_, args) => pos.sub().tag(args.iter().cloned()),
            TermC::Patt(_, _, env) => {
                // expand the variable into one anonymous variable per argument,
                // keeping its environment
                let arity = pat.get_args().1.len();
                let filler = Term::patt(None, String::new(), env.clone());
                pos.sub().tag(core::iter::repeat(filler).take(arity))
            }
            _ => unreachable!("specialised cell without constructor"),
        },
        _ => unreachable!("specialised cell without constructor"),
    }
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

    fn patt<'s>(m: Miller, name: &str) -> Term<'s> {
        Term::patt(Some(m), name.to_string(), Vec::new())
    }

    struct Nat {
        zero: Owned,
        succ: Owned,
        add: Owned,
    }

    impl Nat {
        fn new() -> Self {
            let (zero, succ, add) = (owned("zero"), owned("succ"), owned("add"));
            Self { zero, succ, add }
        }

        fn z(&self) -> Term {
            Term::from(Symbol::new(&self.zero))
        }

        fn s<'s>(&'s self, tm: Term<'s>) -> Term<'s> {
            Term::from(Symbol::new(&self.succ)).apply(vec![tm])
        }

        /// add l r ⟶ rhs, binding `vars` pattern variables
        fn rule<'s>(&'s self, vars: usize, l: Term<'s>, r: Term<'s>, rhs: Term<'s>) -> Rc<Rule<'s>> {
            let ctx = (0..vars).map(|i| (alloc::format!("x{}", i), 0)).collect();
            let lhs = App::new(Symbol::new(&self.add), vec![l, r]);
            Rc::new(Rule::new(ctx, lhs, rhs).unwrap())
        }
    }

    #[test]
    fn positions_and_variables() {
        let nat = Nat::new();
        // add zero (succ μ0) ⟶ μ0
        let rule = nat.rule(1, nat.z(), nat.s(patt(0, "m")), Term::BVar(0));
        let mx = Matrix::new(&[rule]);
        let clause = &mx.clauses[0];
        let pos: Vec<_> = clause.lhs.iter().map(|(_, p)| p.clone()).collect();
        let fst = Subterm::init().succ();
        assert_eq!(pos, vec![fst.clone(), fst.succ()]);
        // μ0 sits below the second argument
        let below_snd = fst.succ().sub();
        assert_eq!(clause.variables.get(&below_snd), Some(&0));
        assert_eq!(clause.variables.len(), 1);
    }

    #[test]
    fn nonlinear_variables_stop_early() {
        let nat = Nat::new();
        // add μ0 μ0 ⟶ μ0: the scan stops after the first occurrence
        let rule = nat.rule(1, patt(0, "n"), patt(0, "n"), Term::BVar(0));
        let mx = Matrix::new(&[rule]);
        assert_eq!(mx.clauses[0].variables.len(), 1);
    }

    #[test]
    fn rightmost_of_equally_scored_columns() {
        let nat = Nat::new();
        let rules = [
            nat.rule(1, nat.z(), patt(0, "n"), Term::BVar(0)),
            nat.rule(1, patt(0, "n"), nat.z(), Term::BVar(0)),
        ];
        let mx = Matrix::new(&rules);
        let candidates = mx.switchable();
        assert_eq!(candidates, vec![0, 1]);
        // both columns hold one constructor and one variable
        assert_eq!(mx.pick_best(&candidates), 1);
    }

    #[test]
    fn constructors_deduplicate() {
        let nat = Nat::new();
        let rules = [
            nat.rule(0, nat.z(), nat.z(), nat.z()),
            nat.rule(1, nat.z(), patt(0, "n"), Term::BVar(0)),
            nat.rule(1, nat.s(patt(0, "m")), nat.z(), Term::BVar(0)),
        ];
        let mx = Matrix::new(&rules);
        let cons = mx.constructors(0);
        assert_eq!(cons.len(), 2);
        assert!(Term::ptr_eq(&cons[0], &nat.z()));
    }

    #[test]
    fn specialize_and_default_partition() {
        let nat = Nat::new();
        let rules = [
            nat.rule(1, nat.z(), patt(0, "n"), Term::BVar(0)),
            nat.rule(1, patt(0, "n"), nat.z(), Term::BVar(0)),
            nat.rule(2, nat.s(patt(0, "m")), patt(1, "n"), Term::BVar(1)),
        ];
        let mx = Matrix::new(&rules);
        // on `zero`, the variable row survives with its cell dropped
        let zero = mx.specialize(&nat.z(), 0);
        assert_eq!(zero.len(), 2);
        assert_eq!(zero[0].lhs.len(), 1);
        // on `succ _`, the variable row's cell expands to one argument cell
        let succ = mx.specialize(&nat.s(patt(0, "m")), 0);
        assert_eq!(succ.len(), 2);
        assert_eq!(succ[0].lhs.len(), 2);
        assert!(is_patt(&succ[0].lhs[0].0) && !is_used_patt(&succ[0].lhs[0].0));
        // the default matrix holds exactly the variable row
        let dflt = mx.default(0);
        assert_eq!(dflt.len(), 1);
        assert_eq!(dflt[0].lhs.len(), 1);
    }

    #[test]
    fn bound_variable_constructors() {
        let nat = Nat::new();
        // cells of this shape sit below binders, out of sight of
        // rule validation; build the rules directly
        let var_rule = |v| {
            let lhs = App::new(Symbol::new(&nat.add), vec![Term::BVar(v), nat.z()]);
            let rhs = Rc::new(Rhs {
                ctx: Vec::new(),
                body: nat.z(),
            });
            Rc::new(Rule { lhs, rhs })
        };
        let mx = Matrix::new(&[var_rule(0), var_rule(1), var_rule(0)]);
        let cons = mx.constructors(0);
        assert_eq!(cons, vec![Term::BVar(0), Term::BVar(1)]);
        // only rows with the same variable survive specialisation
        assert_eq!(mx.specialize(&Term::BVar(0), 0).len(), 2);
        assert_eq!(mx.specialize(&Term::BVar(1), 0).len(), 1);
        assert!(mx.default(0).is_empty());
    }

    #[test]
    fn capture_requires_used_variable() {
        let nat = Nat::new();
        let anon = Term::patt(None, "".to_string(), Vec::new());
        let rules = [
            nat.rule(0, nat.z(), anon, nat.z()),
            nat.rule(1, patt(0, "n"), nat.z(), Term::BVar(0)),
        ];
        let mx = Matrix::new(&rules);
        assert!(mx.captures(0));
        assert!(!mx.captures(1));
        assert_eq!(mx.var_positions(0), vec![Subterm::init().succ()]);
        assert!(mx.var_positions(1).is_empty());
    }
}
