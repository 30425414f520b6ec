use std::collections::{HashMap, HashSet};

use log::debug;
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::model::Model;
use crate::reference::Ref;

impl Bdd {
    /// Structural equivalence.
    ///
    /// Nodes are hash-consed, so two graphs have the same shape iff their
    /// roots have the same id. For reduced graphs this coincides with
    /// semantic equivalence.
    pub fn equivalent(&self, f: Ref, g: Ref) -> bool {
        f == g
    }

    /// `true` unless `f` is the false leaf.
    ///
    /// Only meaningful on reduced graphs: an unreduced graph built with
    /// `mk_choice` may denote false without being the false leaf.
    pub fn is_sat(&self, f: Ref) -> bool {
        !self.is_unsat(f)
    }

    pub fn is_unsat(&self, f: Ref) -> bool {
        self.equivalent(f, self.zero())
    }

    pub fn is_tautology(&self, f: Ref) -> bool {
        self.equivalent(f, self.one())
    }

    /// A path from `f` to the true leaf, as an assignment of the variables
    /// tested along it.
    ///
    /// Works on unreduced graphs too.
    pub fn find_model(&self, f: Ref) -> Option<Model> {
        self.find_path(f, true)
    }

    /// A path from `f` to the false leaf.
    pub fn find_counterexample(&self, f: Ref) -> Option<Model> {
        self.find_path(f, false)
    }

    fn find_path(&self, f: Ref, target: bool) -> Option<Model> {
        let mut model = Model::new();
        let mut dead = HashSet::new();
        if self.find_path_(f, target, &mut model, &mut dead) {
            debug!("find_path(f = {}, target = {}) -> {}", f, target, model);
            Some(model)
        } else {
            debug!("find_path(f = {}, target = {}) -> none", f, target);
            None
        }
    }

    // Depth-first, high branch first. `dead` holds nodes known not to reach
    // the target leaf.
    fn find_path_(&self, node: Ref, target: bool, model: &mut Model, dead: &mut HashSet<Ref>) -> bool {
        if let Some(value) = node.as_constant() {
            return value == target;
        }
        if dead.contains(&node) {
            return false;
        }

        let n = self.node(node);
        let Some(var) = self.variable(node) else {
            unreachable!("decision node {} without a variable", node);
        };

        model.insert(var.clone(), true);
        if self.find_path_(n.high, target, model, dead) {
            return true;
        }
        model.insert(var.clone(), false);
        if self.find_path_(n.low, target, model, dead) {
            return true;
        }
        model.remove(&var);
        dead.insert(node);
        false
    }

    /// One satisfying assignment of a reduced BDD.
    ///
    /// Every node of a reduced graph other than the false leaf reaches the
    /// true leaf, so the walk never backtracks.
    pub fn one_sat(&self, f: Ref) -> Option<Model> {
        if self.is_zero(f) {
            return None;
        }

        let mut model = Model::new();
        let mut current = f;

        while !self.is_one(current) {
            let n = self.node(current);
            let var = self.variable(current)?;
            if !self.is_zero(n.high) {
                model.insert(var, true);
                current = n.high;
            } else {
                model.insert(var, false);
                current = n.low;
            }
        }

        Some(model)
    }

    /// Number of assignments to `num_vars` variables that satisfy `f`.
    ///
    /// `num_vars` must cover every variable `f` depends on.
    pub fn sat_count(&self, f: Ref, num_vars: usize) -> BigUint {
        let max = BigUint::from(1u32) << num_vars;
        let mut cache = HashMap::new();
        self.sat_count_(f, &max, &mut cache)
    }

    // Counts are kept relative to `max`: a node covers half of each branch.
    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let n = self.node(node);
        let count_low = self.sat_count_(n.low, max, cache);
        let count_high = self.sat_count_(n.high, max, cache);
        let count: BigUint = (count_low + count_high) >> 1;

        cache.insert(node, count.clone());
        count
    }
}
