//! The BDD manager.
//!
//! All nodes live in one [`Bdd`] manager and are addressed by [`Ref`]
//! handles. Every decision node goes through the unique table, so a node
//! with a given `(variable, low, high)` exists at most once and two handles
//! are structurally equivalent iff they are equal.
//!
//! Variables are tested in the order of [`Var`]: the smallest variable of a
//! function sits at the root.
//!
//! ```
//! use robdd_sat::ast::{BinOp, Expr};
//! use robdd_sat::bdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let p = Expr::var("p");
//! let q = Expr::var("q");
//!
//! let f = bdd.from_expr(&Expr::and(p.clone(), q.clone()))?;
//! let g = bdd.from_expr(&!Expr::or(!p, !q))?;
//! assert_eq!(f, g);
//! assert_eq!(bdd.size(f), 4);
//! # Ok::<(), robdd_sat::error::Error>(())
//! ```
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::ast::{BinOp, Expr};
use crate::cache::Cache;
use crate::error::Result;
use crate::interrupt::Interrupt;
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::Var;

/// Key of the computed table: the operator and both operands.
pub type OpKey = (BinOp, Ref, Ref);

/// Variables known to the manager, numbered in order of first use.
#[derive(Debug, Default)]
struct Registry {
    vars: Vec<Var>,
    index: HashMap<Var, u32>,
}

impl Registry {
    fn intern(&mut self, var: &Var) -> u32 {
        if let Some(&i) = self.index.get(var) {
            return i;
        }
        let i = self.vars.len() as u32;
        assert_ne!(i, Node::TERMINAL, "Too many variables");
        self.vars.push(var.clone());
        self.index.insert(var.clone(), i);
        i
    }

    fn get(&self, index: u32) -> &Var {
        &self.vars[index as usize]
    }
}

pub struct Bdd {
    storage: RefCell<Table<Node>>,
    registry: RefCell<Registry>,
    cache: RefCell<Cache<OpKey, Ref>>,
    size_cache: RefCell<Cache<Ref, u64>>,
    interrupt: Option<Interrupt>,
}

impl Bdd {
    /// Creates a manager whose unique table starts with `2^bits` buckets and
    /// whose computed table is pre-sized for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");

        let mut storage = Table::new(bits);
        let zero = storage.add(Node::terminal());
        let one = storage.add(Node::terminal());
        assert_eq!(zero, Ref::ZERO.index());
        assert_eq!(one, Ref::ONE.index());

        Self {
            storage: RefCell::new(storage),
            registry: RefCell::new(Registry::default()),
            cache: RefCell::new(Cache::new(bits)),
            size_cache: RefCell::new(Cache::new(bits.min(10))),
            interrupt: None,
        }
    }

    /// Makes [`apply`][Bdd::apply] and [`from_expr`][Bdd::from_expr] poll
    /// `interrupt` at every step.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    fn check_interrupt(&self) -> Result<()> {
        match &self.interrupt {
            Some(interrupt) => interrupt.check(),
            None => Ok(()),
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.borrow();
        f.debug_struct("Bdd")
            .field("nodes", &self.storage.borrow().len())
            .field("variables", &self.registry.borrow().vars.len())
            .field("cache_hits", &cache.hits())
            .field("cache_misses", &cache.misses())
            .finish()
    }
}

impl Bdd {
    pub fn zero(&self) -> Ref {
        Ref::ZERO
    }
    pub fn one(&self) -> Ref {
        Ref::ONE
    }
    pub fn constant(&self, value: bool) -> Ref {
        Ref::constant(value)
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == Ref::ZERO
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Ref::ONE
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.is_terminal()
    }

    pub fn cache(&self) -> std::cell::Ref<'_, Cache<OpKey, Ref>> {
        self.cache.borrow()
    }

    /// Number of nodes ever created, leaves included.
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().len()
    }

    pub fn num_vars(&self) -> usize {
        self.registry.borrow().vars.len()
    }

    pub fn node(&self, node: Ref) -> Node {
        *self.storage.borrow().value(node.index())
    }

    /// The decision variable of a node, `None` for leaves.
    pub fn variable(&self, node: Ref) -> Option<Var> {
        let n = self.node(node);
        if n.is_terminal() {
            None
        } else {
            Some(self.registry.borrow().get(n.variable).clone())
        }
    }

    /// The branch taken when the decision variable is false.
    pub fn low(&self, node: Ref) -> Ref {
        self.node(node).low
    }

    /// The branch taken when the decision variable is true.
    pub fn high(&self, node: Ref) -> Ref {
        self.node(node).high
    }

    /// Registry index of the node's variable, `Node::TERMINAL` for leaves.
    fn var_index(&self, node: Ref) -> u32 {
        self.node(node).variable
    }

    /// Orders two registry indices by the variable order.
    fn var_le(&self, i: u32, j: u32) -> bool {
        if i == Node::TERMINAL {
            return j == Node::TERMINAL;
        }
        if j == Node::TERMINAL {
            return true;
        }
        let registry = self.registry.borrow();
        registry.get(i) <= registry.get(j)
    }

    fn check_order(&self, v: u32, child: Ref) {
        let w = self.var_index(child);
        debug_assert!(
            w == Node::TERMINAL || (v != w && self.var_le(v, w)),
            "Variable order violated: {} above {}",
            self.registry.borrow().get(v),
            self.registry.borrow().get(w),
        );
    }

    fn mk_node_index(&self, v: u32, low: Ref, high: Ref) -> Ref {
        // No redundant tests
        if low == high {
            debug!("mk: redundant test, {} == {}", low, high);
            return low;
        }
        self.mk_choice_index(v, low, high)
    }

    fn mk_choice_index(&self, v: u32, low: Ref, high: Ref) -> Ref {
        self.check_order(v, low);
        self.check_order(v, high);
        let i = self.storage.borrow_mut().put(Node {
            variable: v,
            low,
            high,
        });
        Ref::new(i as u32)
    }

    /// Reduced node for "if `var` then `high` else `low`".
    ///
    /// Returns `low` directly when both branches coincide.
    pub fn mk_node(&self, var: &Var, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", var, low, high);
        let v = self.registry.borrow_mut().intern(var);
        self.mk_node_index(v, low, high)
    }

    /// Node for "if `var` then `high` else `low`" without eliding a
    /// redundant test. The node is still shared with equal nodes.
    ///
    /// Use [`reduce`][Bdd::reduce] before querying graphs built this way.
    pub fn mk_choice(&self, var: &Var, low: Ref, high: Ref) -> Ref {
        debug!("mk_choice(v = {}, low = {}, high = {})", var, low, high);
        let v = self.registry.borrow_mut().intern(var);
        self.mk_choice_index(v, low, high)
    }

    /// The function `var`: a single decision node over both leaves.
    pub fn mk_var(&self, var: &Var) -> Ref {
        self.mk_node(var, Ref::ZERO, Ref::ONE)
    }

    /// Cofactors `(low, high)` of `node` with respect to the variable `v`.
    ///
    /// A node that does not test `v` at its root is its own cofactor.
    fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        let n = self.node(node);
        if n.is_terminal() || n.variable != v {
            (node, node)
        } else {
            (n.low, n.high)
        }
    }

    /// Terminal rules that decide `op(f, g)` without expanding both sides.
    fn apply_base_case(&self, op: BinOp, f: Ref, g: Ref) -> Option<Ref> {
        if let (Some(a), Some(b)) = (f.as_constant(), g.as_constant()) {
            return Some(Ref::constant(op.eval(a, b)));
        }
        match op {
            BinOp::And => {
                if self.is_zero(f) || self.is_zero(g) {
                    return Some(Ref::ZERO);
                }
                if self.is_one(f) || f == g {
                    return Some(g);
                }
                if self.is_one(g) {
                    return Some(f);
                }
            }
            BinOp::Or => {
                if self.is_one(f) || self.is_one(g) {
                    return Some(Ref::ONE);
                }
                if self.is_zero(f) || f == g {
                    return Some(g);
                }
                if self.is_zero(g) {
                    return Some(f);
                }
            }
            BinOp::Imply => {
                if self.is_zero(f) || self.is_one(g) || f == g {
                    return Some(Ref::ONE);
                }
                if self.is_one(f) {
                    return Some(g);
                }
            }
            BinOp::Iff => {
                if f == g {
                    return Some(Ref::ONE);
                }
                if self.is_one(f) {
                    return Some(g);
                }
                if self.is_one(g) {
                    return Some(f);
                }
            }
            BinOp::Xor => {
                if f == g {
                    return Some(Ref::ZERO);
                }
                if self.is_zero(f) {
                    return Some(g);
                }
                if self.is_zero(g) {
                    return Some(f);
                }
            }
        }
        None
    }

    /// Combines two functions with a binary connective (Shannon expansion).
    ///
    /// ```text
    /// apply(op, c1, c2)                 = op(c1, c2)              for leaves
    /// apply(op, v(F1, F0), v(G1, G0))   = v(apply(F1, G1), apply(F0, G0))
    /// apply(op, v(F1, F0), G)           = v(apply(F1, G), apply(F0, G))   if v < top(G)
    /// ```
    ///
    /// Results are memoized in the computed table.
    pub fn apply(&self, op: BinOp, f: Ref, g: Ref) -> Result<Ref> {
        debug!("apply(op = {:?}, f = {}, g = {})", op, f, g);
        self.check_interrupt()?;

        if let Some(res) = self.apply_base_case(op, f, g) {
            debug!("base case: apply(op = {:?}, f = {}, g = {}) -> {}", op, f, g, res);
            return Ok(res);
        }

        // Commutative operators share cache entries.
        let (f, g) = match op {
            BinOp::And | BinOp::Or | BinOp::Iff | BinOp::Xor if g < f => (g, f),
            _ => (f, g),
        };

        let key = (op, f, g);
        let cached = self.cache.borrow_mut().get(&key);
        if let Some(res) = cached {
            debug!("cache: apply(op = {:?}, f = {}, g = {}) -> {}", op, f, g, res);
            return Ok(res);
        }

        // Determine the top variable:
        let i = self.var_index(f);
        let j = self.var_index(g);
        let m = if self.var_le(i, j) { i } else { j };
        assert_ne!(m, Node::TERMINAL, "At least one operand must be a decision node");

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);

        let low = self.apply(op, f0, g0)?;
        let high = self.apply(op, f1, g1)?;

        let res = self.mk_node_index(m, low, high);
        debug!("computed: apply(op = {:?}, f = {}, g = {}) -> {}", op, f, g, res);
        self.cache.borrow_mut().insert(key, res);
        Ok(res)
    }

    pub fn apply_not(&self, f: Ref) -> Result<Ref> {
        self.apply(BinOp::Imply, f, Ref::ZERO)
    }

    /// Builds the reduced ordered BDD of a formula.
    ///
    /// ```text
    /// bdd(c)        = c
    /// bdd(p)        = p(1, 0)
    /// bdd(¬φ)       = bdd(φ → false)
    /// bdd(φ # ψ)    = apply(#, bdd(φ), bdd(ψ))
    /// ```
    pub fn from_expr(&self, e: &Expr) -> Result<Ref> {
        self.check_interrupt()?;
        match e {
            Expr::Const(b) => Ok(Ref::constant(*b)),
            Expr::Var(v) => Ok(self.mk_var(v)),
            Expr::Not(a) => {
                let a = self.from_expr(a)?;
                self.apply(BinOp::Imply, a, Ref::ZERO)
            }
            Expr::Op(op, a, b) => {
                let a = self.from_expr(a)?;
                let b = self.from_expr(b)?;
                self.apply(*op, a, b)
            }
        }
    }

    /// Removes redundant tests bottom-up.
    ///
    /// Graphs built by `apply`, `from_expr` and `mk_node` are already
    /// reduced; this matters for graphs assembled with `mk_choice`.
    pub fn reduce(&self, f: Ref) -> Ref {
        let mut cache = HashMap::new();
        self.reduce_(f, &mut cache)
    }

    fn reduce_(&self, f: Ref, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if f.is_terminal() {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }
        let node = self.node(f);
        let low = self.reduce_(node.low, cache);
        let high = self.reduce_(node.high, cache);
        let res = self.mk_node_index(node.variable, low, high);
        cache.insert(f, res);
        res
    }

    /// All nodes reachable from `nodes`, leaves included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<Ref> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) && !node.is_terminal() {
                let n = self.node(node);
                queue.push_back(n.low);
                queue.push_back(n.high);
            }
        }

        visited
    }

    /// Number of distinct nodes reachable from `f`, leaves included.
    pub fn size(&self, f: Ref) -> u64 {
        let cached = self.size_cache.borrow_mut().get(&f);
        if let Some(size) = cached {
            debug!("cache: size({}) -> {}", f, size);
            return size;
        }
        let size = self.descendants([f]).len() as u64;
        debug!("computed: size({}) -> {}", f, size);
        self.size_cache.borrow_mut().insert(f, size);
        size
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        match node.as_constant() {
            Some(false) => "(0)".to_string(),
            Some(true) => "(1)".to_string(),
            None => {
                let n = self.node(node);
                format!(
                    "{}:({}, {}, {})",
                    node,
                    self.registry.borrow().get(n.variable),
                    self.to_bracket_string(n.high),
                    self.to_bracket_string(n.low)
                )
            }
        }
    }
}
