//! Backtracking search over CNF.
//!
//! The solver decides the variables in the order they first occur in the
//! clauses, trying `true` first. Every decision is propagated by deriving,
//! for each clause that contains the falsified literal, the clause without
//! it. Deriving the empty clause is a conflict and triggers backtracking to
//! the most recent decision that has not been flipped yet.
//!
//! There is no clause learning: derived clauses are discarded on backtrack.
//!
//! ```
//! use robdd_sat::cdcl::{SolveResult, Solver};
//! use robdd_sat::clause::{Clause, Cnf, Lit};
//! use robdd_sat::types::Var;
//!
//! let a = Lit::Pos(Var::named("a"));
//! let b = Lit::Pos(Var::named("b"));
//! let cnf = Cnf::from_iter([Clause::new([-&a, -&b]), Clause::new([a, b])]);
//!
//! let mut solver = Solver::new(cnf);
//! assert_eq!(solver.solve(), SolveResult::Sat);
//! let model = solver.assignment().unwrap();
//! assert_ne!(model.get(&Var::named("a")), model.get(&Var::named("b")));
//! ```
use log::{debug, info, trace};

use crate::bdd::Bdd;
use crate::clause::{Clause, Cnf, Lit};
use crate::interrupt::Interrupt;
use crate::model::Model;
use crate::reference::Ref;
use crate::types::Var;

/// Clauses of the current branch, with the positions of the decisions.
///
/// A decision is a unit clause holding the assumed literal. Everything
/// pushed after a decision belongs to it and is dropped when the search
/// backtracks past it.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    clauses: Vec<Clause>,
    decisions: Vec<usize>,
}

impl Stack {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self {
            clauses,
            decisions: Vec::new(),
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of open decisions.
    pub fn depth(&self) -> usize {
        self.decisions.len()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Opens a decision point assuming `lit`.
    pub fn decide(&mut self, lit: Lit) {
        self.decisions.push(self.clauses.len());
        self.clauses.push(Clause::unit(lit));
    }

    /// Makes `lit` true: every clause containing its negation gets a copy
    /// without it.
    ///
    /// Clauses are scanned from the top of the stack down, and only those
    /// present when the call starts. Returns `false` on the first clause
    /// that becomes empty, leaving the rest unscanned.
    pub fn unit_propagate(&mut self, lit: &Lit) -> bool {
        let neg = lit.negate();
        for i in (0..self.clauses.len()).rev() {
            if !self.clauses[i].contains(&neg) {
                continue;
            }
            match self.clauses[i].exclude(&neg) {
                Some(derived) => self.clauses.push(derived),
                None => {
                    trace!("conflict: {} falsified by {}", self.clauses[i], lit);
                    return false;
                }
            }
        }
        true
    }

    /// Drops the most recent decision and everything above it, returning the
    /// literal that was assumed. `None` if there is no decision left.
    pub fn backtrack(&mut self) -> Option<Lit> {
        let index = self.decisions.pop()?;
        let lit = self.clauses[index].lits().first().cloned();
        self.clauses.truncate(index);
        lit
    }

    /// Drops every decision, restoring the initial clauses.
    pub fn clear_decisions(&mut self) {
        if let Some(&first) = self.decisions.first() {
            self.clauses.truncate(first);
        }
        self.decisions.clear();
    }

    /// Whether `lit` is asserted by a unit clause on the stack.
    pub fn is_true(&self, lit: &Lit) -> bool {
        self.clauses.iter().any(|c| c.is_unit() && c.contains(lit))
    }

    /// Value of `var` read from the unit clauses; `None` if neither or both
    /// polarities are asserted.
    pub fn value(&self, var: &Var) -> Option<bool> {
        let pos = self.is_true(&Lit::Pos(var.clone()));
        let neg = self.is_true(&Lit::Neg(var.clone()));
        match (pos, neg) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }

    /// The assignment on the stack as a single-path decision graph over
    /// `vars`.
    ///
    /// A variable whose value cannot be read back turns its part of the path
    /// into the false leaf. Nodes are created with [`Bdd::mk_choice`], so
    /// the result may contain redundant tests.
    pub fn model_node(&self, bdd: &Bdd, vars: &[Var]) -> Ref {
        let mut vars = vars.to_vec();
        vars.sort();

        let mut node = bdd.one();
        for var in vars.iter().rev() {
            node = match self.value(var) {
                Some(true) => bdd.mk_choice(var, bdd.zero(), node),
                Some(false) => bdd.mk_choice(var, node, bdd.zero()),
                None => bdd.zero(),
            };
        }
        node
    }
}

/// Outcome of [`Solver::solve`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveResult {
    Sat,
    Unsat,
    Interrupted,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Branch {
    /// The decision assumed the variable true; the false branch is untried.
    Positive,
    /// Both branches are taken.
    Negative,
}

#[derive(Debug)]
enum State {
    Deciding,
    Propagating(Lit),
    Backtracking,
}

/// Drops clauses satisfied by a constant and removes false constants.
///
/// Returns `None` if some clause is empty.
fn simplify(cnf: Cnf) -> Option<Vec<Clause>> {
    let mut clauses = Vec::with_capacity(cnf.len());
    for clause in cnf {
        if clause.contains(&Lit::Const(true)) {
            continue;
        }
        if clause.is_empty() {
            return None;
        }
        clauses.push(clause.exclude(&Lit::Const(false))?);
    }
    Some(clauses)
}

#[derive(Debug)]
pub struct Solver {
    vars: Vec<Var>,
    stack: Stack,
    trivially_unsat: bool,
    result: Option<SolveResult>,
    interrupt: Option<Interrupt>,
    steps: u64,
}

impl Solver {
    pub fn new(cnf: Cnf) -> Self {
        let (clauses, trivially_unsat) = match simplify(cnf) {
            Some(clauses) => (clauses, false),
            None => (Vec::new(), true),
        };
        let vars = clauses.iter().cloned().collect::<Cnf>().variables();
        debug!(
            "solver: {} clauses over {} variables{}",
            clauses.len(),
            vars.len(),
            if trivially_unsat { ", empty clause in input" } else { "" }
        );
        Self {
            vars,
            stack: Stack::new(clauses),
            trivially_unsat,
            result: None,
            interrupt: None,
            steps: 0,
        }
    }

    /// Stops [`solve`][Solver::solve] with [`SolveResult::Interrupted`]
    /// once `interrupt` is raised.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// The decision order.
    pub fn variables(&self) -> &[Var] {
        &self.vars
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn result(&self) -> Option<SolveResult> {
        self.result
    }

    /// Number of search steps taken by the last call to `solve`.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt.as_ref().is_some_and(Interrupt::is_raised)
    }

    /// Runs the search.
    ///
    /// A decided result is cached. An interrupted search starts over on the
    /// next call.
    pub fn solve(&mut self) -> SolveResult {
        if let Some(result @ (SolveResult::Sat | SolveResult::Unsat)) = self.result {
            return result;
        }

        let result = if self.trivially_unsat {
            SolveResult::Unsat
        } else {
            self.stack.clear_decisions();
            self.search()
        };

        info!(
            "cdcl: {:?} after {} steps, {} clauses on the stack",
            result,
            self.steps,
            self.stack.clauses().len()
        );
        self.result = Some(result);
        result
    }

    fn search(&mut self) -> SolveResult {
        let mut branches: Vec<Branch> = Vec::new();
        let mut depth = 0;
        let mut state = State::Deciding;
        self.steps = 0;

        loop {
            if self.is_interrupted() {
                self.stack.clear_decisions();
                return SolveResult::Interrupted;
            }
            self.steps += 1;

            state = match state {
                State::Deciding => {
                    let Some(var) = self.vars.get(depth) else {
                        return SolveResult::Sat;
                    };
                    let lit = Lit::Pos(var.clone());
                    trace!("decide {} at depth {}", lit, depth);
                    self.stack.decide(lit.clone());
                    branches.push(Branch::Positive);
                    depth += 1;
                    State::Propagating(lit)
                }
                State::Propagating(lit) => {
                    if self.stack.unit_propagate(&lit) {
                        State::Deciding
                    } else {
                        State::Backtracking
                    }
                }
                State::Backtracking => match branches.pop() {
                    None => return SolveResult::Unsat,
                    Some(Branch::Positive) => {
                        let Some(lit) = self.stack.backtrack() else {
                            return SolveResult::Unsat;
                        };
                        let lit = lit.negate();
                        trace!("flip to {} at depth {}", lit, depth - 1);
                        self.stack.decide(lit.clone());
                        branches.push(Branch::Negative);
                        State::Propagating(lit)
                    }
                    Some(Branch::Negative) => {
                        self.stack.backtrack();
                        depth -= 1;
                        State::Backtracking
                    }
                },
            };
        }
    }

    /// The satisfying assignment found by the last search.
    pub fn assignment(&self) -> Option<Model> {
        if self.result != Some(SolveResult::Sat) {
            return None;
        }
        Some(
            self.vars
                .iter()
                .filter_map(|v| self.stack.value(v).map(|b| (v.clone(), b)))
                .collect(),
        )
    }

    /// The satisfying assignment as a single-path graph in `bdd`, or the
    /// false leaf if there is none.
    pub fn model_node(&self, bdd: &Bdd) -> Ref {
        if self.result != Some(SolveResult::Sat) {
            return bdd.zero();
        }
        bdd.reduce(self.stack.model_node(bdd, &self.vars))
    }
}

/// Decides `cnf`, returning whether it is satisfiable together with the
/// model as a graph in `bdd`.
pub fn cdcl(cnf: Cnf, bdd: &Bdd) -> (bool, Ref) {
    let mut solver = Solver::new(cnf);
    let sat = solver.solve() == SolveResult::Sat;
    (sat, solver.model_node(bdd))
}
