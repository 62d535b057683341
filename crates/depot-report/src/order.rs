//! Topological execution ordering over a changeset (§4.9).

use std::collections::HashMap;
use std::fmt;

use depot_cache::Cache;
use depot_core::PackageId;
use depot_resolver::{ChangeOp, Changeset};
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

/// The operation a single execution step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Install this identity.
    Install,
    /// Remove this identity.
    Remove,
    /// Remove then install this identity unchanged.
    Reinstall,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Install => "install",
            Self::Remove => "remove",
            Self::Reinstall => "reinstall",
        };
        write!(f, "{s}")
    }
}

/// A single backend-executable step: the operation, and the package it acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// The operation to perform.
    pub op: Op,
    /// The package the operation acts on.
    pub package: PackageId,
}

/// Builds the ordered execution plan for `changeset`: a sequence of stages,
/// each a group of [`Step`]s that may be (and normally are) a single step.
/// A stage with more than one step is a cycle that must be executed
/// atomically as a group.
#[must_use]
pub fn order(cache: &Cache, changeset: &Changeset) -> Vec<Vec<Step>> {
    let mut graph = DiGraph::<PackageId, ()>::new();
    let mut nodes: HashMap<PackageId, NodeIndex> = HashMap::new();
    let mut ops: HashMap<PackageId, Op> = HashMap::new();

    for (id, change) in changeset.iter() {
        let op = match change {
            ChangeOp::Install => Op::Install,
            ChangeOp::Remove => Op::Remove,
            ChangeOp::Reinstall => Op::Reinstall,
            ChangeOp::Keep => continue,
        };
        ops.insert(id, op);
        nodes.insert(id, graph.add_node(id));
    }

    let installing: Vec<PackageId> = ops
        .iter()
        .filter(|(_, op)| matches!(op, Op::Install | Op::Reinstall))
        .map(|(id, _)| *id)
        .collect();
    let removing: Vec<PackageId> = ops.iter().filter(|(_, op)| **op == Op::Remove).map(|(id, _)| *id).collect();

    // All installs of a package's requires precede its install.
    for &p in &installing {
        let Some(pkg) = cache.package(p) else { continue };
        for &q in &installing {
            if p == q {
                continue;
            }
            let Some(qpkg) = cache.package(q) else { continue };
            let pulled_in = pkg.requires().iter().any(|dep| qpkg.provides().iter().any(|prov| dep.matches(prov)));
            if pulled_in {
                graph.add_edge(nodes[&q], nodes[&p], ());
            }
        }
    }

    // All removes of a package's obsoleters/conflicters precede its install.
    for &p in &installing {
        let Some(pkg) = cache.package(p) else { continue };
        for &r in &removing {
            let Some(rpkg) = cache.package(r) else { continue };
            let blocks = pkg.conflicts().iter().any(|dep| rpkg.provides().iter().any(|prov| dep.matches(prov)))
                || rpkg.conflicts().iter().any(|dep| pkg.provides().iter().any(|prov| dep.matches(prov)))
                || pkg.obsoletes().iter().any(|dep| rpkg.provides().iter().any(|prov| dep.matches(prov)))
                || pkg.name() == rpkg.name();
            if blocks {
                graph.add_edge(nodes[&r], nodes[&p], ());
            }
        }
    }

    // Removes are ordered after every package that required them is also removed.
    for &r in &removing {
        let Some(rpkg) = cache.package(r) else { continue };
        for &x in &removing {
            if r == x {
                continue;
            }
            let Some(xpkg) = cache.package(x) else { continue };
            let x_required_r = xpkg.requires().iter().any(|dep| rpkg.provides().iter().any(|prov| dep.matches(prov)));
            if x_required_r {
                graph.add_edge(nodes[&x], nodes[&r], ());
            }
        }
    }

    let stages: Vec<Vec<PackageId>> = match toposort(&graph, None) {
        Ok(order) => order.into_iter().map(|n| vec![graph[n]]).collect(),
        Err(_) => {
            // A cycle exists: fall back to grouping each strongly connected
            // component into one atomic stage. `tarjan_scc` yields components
            // in reverse topological order, so components earlier in its
            // output depend on components later in it; reverse to execute
            // sources first.
            let mut sccs: Vec<Vec<PackageId>> =
                tarjan_scc(&graph).into_iter().map(|nodes| nodes.into_iter().map(|n| graph[n]).collect()).collect();
            for scc in &mut sccs {
                scc.sort();
            }
            sccs.reverse();
            sccs
        }
    };

    stages
        .into_iter()
        .map(|stage| stage.into_iter().map(|id| Step { op: ops[&id], package: id }).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_test_utils::scenario_cache;

    #[test]
    fn requirement_install_precedes_dependent_install() {
        let (cache, ids) = scenario_cache();
        let mut cs = Changeset::new();
        cs.set(ids.bar_2_0, ChangeOp::Install);
        cs.set(ids.libx_1_2, ChangeOp::Install);

        let stages = order(&cache, &cs);
        let flat: Vec<PackageId> = stages.iter().flatten().map(|s| s.package).collect();
        let libx_pos = flat.iter().position(|&id| id == ids.libx_1_2).unwrap();
        let bar_pos = flat.iter().position(|&id| id == ids.bar_2_0).unwrap();
        assert!(libx_pos < bar_pos, "libx must be installed before bar depends on it");
    }

    #[test]
    fn same_name_remove_precedes_install() {
        let (cache, ids) = scenario_cache();
        let mut cs = Changeset::new();
        cs.set(ids.baz_2_0, ChangeOp::Install);
        cs.set(ids.baz_1_0, ChangeOp::Remove);

        let stages = order(&cache, &cs);
        let flat: Vec<PackageId> = stages.iter().flatten().map(|s| s.package).collect();
        let remove_pos = flat.iter().position(|&id| id == ids.baz_1_0).unwrap();
        let install_pos = flat.iter().position(|&id| id == ids.baz_2_0).unwrap();
        assert!(remove_pos < install_pos, "the old identity must be removed before the new one is installed");
    }
}
