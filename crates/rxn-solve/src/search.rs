//! Staged backtracking propagation over one problem set.
//!
//! Nodes are visited in a static order that always picks the node with the fewest
//! unresolved adjacent edges, so information flows inwards from the known external
//! states. At each node the open edges are assigned one at a time and the cheap rules
//! re-run on every partial assignment; rules that need node quantum numbers run once all
//! adjacent edges are set. Graph rules run on completed candidates.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use rxn_core::{EdgeId, ErrorInfo, NodeId, RxnError};
use rxn_qn::{EdgeState, NodeProperties, NodeQuantumNumbers};
use rxn_rules::{NodeView, Restriction, Rule, RuleCost, Side, Verdict, Violation};

use crate::budget::SearchBudget;
use crate::diagnostics::{Diagnostic, DiagnosticSource};
use crate::graph::{SolutionKey, StateTransitionGraph};
use crate::problem::{default_spin_projections, ProblemSet};
use crate::settings::InteractionSettings;

/// Result of searching one problem set.
#[derive(Debug, Clone)]
pub struct ProblemOutcome {
    /// Index of the problem set.
    pub problem_index: usize,
    /// Topology of the problem set.
    pub topology_index: usize,
    /// Solutions in enumeration order.
    pub solutions: Vec<StateTransitionGraph>,
    /// Why candidates were eliminated; only filled when no solution survived or the
    /// search stopped early.
    pub diagnostics: Vec<Diagnostic>,
    /// `false` when the budget stopped the search before it was exhausted.
    pub complete: bool,
}

#[derive(Debug, Default)]
struct Tally {
    rejections: BTreeMap<(NodeId, &'static str), (u64, String)>,
    incomplete: bool,
}

impl Tally {
    fn reject(&mut self, node: NodeId, rule: &Rule, violation: Violation) {
        self.rejections
            .entry((node, rule.name()))
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, violation.reason));
    }

    fn merge(&mut self, other: Tally) {
        for (key, (count, reason)) in other.rejections {
            self.rejections
                .entry(key)
                .and_modify(|(known, _)| *known += count)
                .or_insert((count, reason));
        }
        self.incomplete |= other.incomplete;
    }

    fn into_diagnostics(self, topology_index: usize) -> Vec<Diagnostic> {
        self.rejections
            .into_iter()
            .map(|((node, rule), (count, reason))| Diagnostic {
                topology_index,
                node: Some(node),
                source: DiagnosticSource::Rule(rule.to_string()),
                reason,
                count,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Branch {
    edges: Vec<Option<EdgeState>>,
    nodes: Vec<Option<NodeProperties>>,
    path: Vec<u32>,
}

#[derive(Debug)]
struct Step {
    node: NodeId,
    open: Vec<EdgeId>,
}

type Slots<'b> = (Vec<Option<&'b EdgeState>>, Vec<Option<&'b EdgeState>>);

struct Plan<'p> {
    problem: &'p ProblemSet,
    problem_index: usize,
    settings: Vec<&'p InteractionSettings>,
    seeded: Vec<Option<EdgeState>>,
    steps: Vec<Step>,
    domains: Vec<Vec<EdgeState>>,
    node_assignments: Vec<Vec<NodeQuantumNumbers>>,
}

fn open_edges(problem: &ProblemSet, node: NodeId, known: &[bool]) -> Vec<EdgeId> {
    let topology = &problem.topology;
    let mut open: Vec<EdgeId> = topology
        .incoming_edges(node)
        .iter()
        .chain(topology.outgoing_edges(node))
        .copied()
        .filter(|edge| !known[edge.index()])
        .collect();
    open.sort();
    open.dedup();
    open
}

impl<'p> Plan<'p> {
    fn new(problem: &'p ProblemSet, problem_index: usize) -> Result<Self, RxnError> {
        let topology = &problem.topology;
        let settings = topology
            .node_ids()
            .map(|node| problem.settings(node))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seeded = vec![None; topology.edge_count()];
        for edge in topology.edge_ids() {
            match problem.facts.get(edge) {
                Some(state) => seeded[edge.index()] = Some(state.clone()),
                None if topology.is_external(edge) => {
                    return Err(RxnError::Config(
                        ErrorInfo::new("missing-initial-fact", "external edge has no particle state")
                            .with_context("topology", problem.topology_index.to_string())
                            .with_context("edge", edge.to_string()),
                    ))
                }
                None => {}
            }
        }

        let mut domains = vec![Vec::new(); topology.edge_count()];
        for edge in topology.edge_ids().filter(|edge| seeded[edge.index()].is_none()) {
            let endpoints = topology.edge(edge)?;
            let adjacent: Vec<&InteractionSettings> = [endpoints.originating_node, endpoints.ending_node]
                .into_iter()
                .flatten()
                .map(|node| settings[node.index()])
                .collect();
            let mut states = Vec::new();
            for particle in problem.candidates.iter() {
                for projection in default_spin_projections(particle) {
                    let state = EdgeState::from_particle(Arc::clone(particle), projection)?;
                    let admitted = adjacent.iter().all(|node_settings| {
                        node_settings.edge_domains.admits(&state.qns)
                            && node_settings.edge_rules().all(|rule| rule.check(&state).is_ok())
                    });
                    if admitted {
                        states.push(state);
                    }
                }
            }
            domains[edge.index()] = states;
        }

        let mut known: Vec<bool> = seeded.iter().map(Option::is_some).collect();
        let mut remaining: Vec<NodeId> = topology.node_ids().collect();
        let mut steps = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let Some((position, node)) = remaining
                .iter()
                .copied()
                .enumerate()
                .min_by_key(|(_, node)| open_edges(problem, *node, &known).len())
            else {
                break;
            };
            remaining.remove(position);
            let open = open_edges(problem, node, &known);
            for edge in &open {
                known[edge.index()] = true;
            }
            steps.push(Step { node, open });
        }

        let node_assignments = settings
            .iter()
            .map(|node_settings| node_settings.node_domains.enumerate())
            .collect();

        Ok(Self {
            problem,
            problem_index,
            settings,
            seeded,
            steps,
            domains,
            node_assignments,
        })
    }

    /// First intermediate edge without candidates, with the node producing it.
    fn empty_domain(&self) -> Option<(EdgeId, Option<NodeId>)> {
        self.problem
            .topology
            .edge_ids()
            .filter(|edge| self.seeded[edge.index()].is_none())
            .find(|edge| self.domains[edge.index()].is_empty())
            .map(|edge| {
                let node = self
                    .problem
                    .topology
                    .edge(edge)
                    .ok()
                    .and_then(|endpoints| endpoints.originating_node);
                (edge, node)
            })
    }

    fn root(&self) -> Branch {
        Branch {
            edges: self.seeded.clone(),
            nodes: vec![None; self.problem.topology.node_count()],
            path: Vec::new(),
        }
    }

    fn slots<'b>(&self, node: NodeId, edges: &'b [Option<EdgeState>]) -> Slots<'b> {
        let pick = |ids: &[EdgeId]| -> Vec<Option<&'b EdgeState>> {
            ids.iter()
                .map(|edge| edges.get(edge.index()).and_then(Option::as_ref))
                .collect()
        };
        let topology = &self.problem.topology;
        (pick(topology.incoming_edges(node)), pick(topology.outgoing_edges(node)))
    }

    fn restricted_edge(&self, node: NodeId, restriction: &Restriction) -> Option<EdgeId> {
        let topology = &self.problem.topology;
        let side = match restriction.side {
            Side::Incoming => topology.incoming_edges(node),
            Side::Outgoing => topology.outgoing_edges(node),
        };
        side.get(restriction.position).copied()
    }

    /// Assigns the open edges of a step one by one, pruning with the rules that do not
    /// need node quantum numbers.
    #[allow(clippy::too_many_arguments)]
    fn assign(
        &self,
        step: &Step,
        settings: &InteractionSettings,
        depth: usize,
        edges: &mut Vec<Option<EdgeState>>,
        tally: &mut Tally,
        budget: &SearchBudget,
        accepted: &mut Vec<(Vec<EdgeState>, NodeProperties)>,
    ) {
        if budget.is_exhausted() {
            tally.incomplete = true;
            return;
        }
        let base = NodeProperties {
            interaction_type: Some(settings.interaction_type),
            qns: NodeQuantumNumbers::default(),
        };
        let mut restrictions: Vec<(&Rule, Restriction)> = Vec::new();
        {
            let (incoming, outgoing) = self.slots(step.node, edges);
            let view = NodeView {
                incoming: &incoming,
                outgoing: &outgoing,
                node: Some(&base),
            };
            for rule in settings.rules() {
                if rule.cost() == RuleCost::Graph || rule.uses_node_qns() {
                    continue;
                }
                match rule.evaluate(&view) {
                    Verdict::Fail(violation) => {
                        tally.reject(step.node, rule, violation);
                        return;
                    }
                    Verdict::Restrict(restriction) => restrictions.push((rule, restriction)),
                    Verdict::Pass | Verdict::Deferred => {}
                }
            }
        }

        let Some(&edge) = step.open.get(depth) else {
            self.choose_node_qns(step, settings, edges, tally, accepted);
            return;
        };
        'candidates: for candidate in &self.domains[edge.index()] {
            for (rule, restriction) in &restrictions {
                if self.restricted_edge(step.node, restriction) == Some(edge)
                    && !restriction.admits(&candidate.qns)
                {
                    let allowed: Vec<String> = restriction.allowed.iter().map(ToString::to_string).collect();
                    tally.reject(
                        step.node,
                        rule,
                        Violation::violated(format!(
                            "{} of {} must be one of [{}]",
                            restriction.qn,
                            candidate.particle_name().unwrap_or("?"),
                            allowed.join(", ")
                        )),
                    );
                    continue 'candidates;
                }
            }
            edges[edge.index()] = Some(candidate.clone());
            self.assign(step, settings, depth + 1, edges, tally, budget, accepted);
            if tally.incomplete {
                break;
            }
        }
        edges[edge.index()] = None;
    }

    fn choose_node_qns(
        &self,
        step: &Step,
        settings: &InteractionSettings,
        edges: &[Option<EdgeState>],
        tally: &mut Tally,
        accepted: &mut Vec<(Vec<EdgeState>, NodeProperties)>,
    ) {
        let (incoming, outgoing) = self.slots(step.node, edges);
        let assigned: Vec<EdgeState> = step
            .open
            .iter()
            .filter_map(|edge| edges.get(edge.index()).cloned().flatten())
            .collect();
        let qn_rules: Vec<&Rule> = settings
            .rules()
            .iter()
            .filter(|rule| rule.uses_node_qns() && rule.cost() != RuleCost::Graph)
            .collect();
        'assignments: for qns in &self.node_assignments[step.node.index()] {
            let props = NodeProperties {
                interaction_type: Some(settings.interaction_type),
                qns: *qns,
            };
            let view = NodeView {
                incoming: &incoming,
                outgoing: &outgoing,
                node: Some(&props),
            };
            for rule in &qn_rules {
                if let Verdict::Fail(violation) = rule.evaluate(&view) {
                    tally.reject(step.node, rule, violation);
                    continue 'assignments;
                }
            }
            accepted.push((assigned.clone(), props));
        }
    }

    fn expand(&self, step_index: usize, branch: &Branch, tally: &mut Tally, budget: &SearchBudget) -> Vec<Branch> {
        let step = &self.steps[step_index];
        let settings = self.settings[step.node.index()];
        let mut edges = branch.edges.clone();
        let mut accepted = Vec::new();
        self.assign(step, settings, 0, &mut edges, tally, budget, &mut accepted);
        accepted
            .into_iter()
            .enumerate()
            .map(|(ordinal, (states, props))| {
                let mut child = branch.clone();
                for (edge, state) in step.open.iter().zip(states) {
                    child.edges[edge.index()] = Some(state);
                }
                child.nodes[step.node.index()] = Some(props);
                child.path.push(ordinal as u32);
                child
            })
            .collect()
    }

    fn descend(
        &self,
        step_index: usize,
        branch: Branch,
        tally: &mut Tally,
        budget: &SearchBudget,
        solutions: &mut Vec<StateTransitionGraph>,
    ) {
        if budget.is_exhausted() {
            tally.incomplete = true;
            return;
        }
        if step_index == self.steps.len() {
            if let Some(graph) = self.finish(branch, tally) {
                solutions.push(graph);
            }
            return;
        }
        for child in self.expand(step_index, &branch, tally, budget) {
            self.descend(step_index + 1, child, tally, budget, solutions);
        }
    }

    fn finish(&self, branch: Branch, tally: &mut Tally) -> Option<StateTransitionGraph> {
        for node in self.problem.topology.node_ids() {
            let (incoming, outgoing) = self.slots(node, &branch.edges);
            let view = NodeView {
                incoming: &incoming,
                outgoing: &outgoing,
                node: branch.nodes[node.index()].as_ref(),
            };
            for rule in self.settings[node.index()].graph_rules() {
                if let Verdict::Fail(violation) = rule.evaluate(&view) {
                    tally.reject(node, rule, violation);
                    return None;
                }
            }
        }
        let edges = branch.edges.into_iter().collect::<Option<Vec<_>>>()?;
        let nodes = branch.nodes.into_iter().collect::<Option<Vec<_>>>()?;
        Some(StateTransitionGraph::new(
            self.problem.topology_index,
            Arc::clone(&self.problem.topology),
            edges,
            nodes,
            SolutionKey {
                problem_index: self.problem_index,
                path: branch.path,
            },
        ))
    }
}

/// Searches one problem set for every consistent assignment.
///
/// Branches below the first visited node are explored in parallel on the current rayon
/// pool and merged in enumeration order, so the output does not depend on the number of
/// workers. Zero solutions is a normal outcome and comes with rejection diagnostics.
pub fn solve(problem: &ProblemSet, problem_index: usize, budget: &SearchBudget) -> Result<ProblemOutcome, RxnError> {
    budget.start();
    let topology_index = problem.topology_index;
    let plan = Plan::new(problem, problem_index)?;
    let mut outcome = ProblemOutcome {
        problem_index,
        topology_index,
        solutions: Vec::new(),
        diagnostics: Vec::new(),
        complete: true,
    };

    if let Some((edge, node)) = plan.empty_domain() {
        tracing::warn!(
            topology = topology_index,
            problem = problem_index,
            edge = %edge,
            "no candidate particle left for intermediate edge"
        );
        outcome.diagnostics.push(Diagnostic {
            topology_index,
            node,
            source: DiagnosticSource::CandidateFilter,
            reason: format!("no candidate particle matches the filter and domains of intermediate edge {edge}"),
            count: 1,
        });
        return Ok(outcome);
    }

    let mut tally = Tally::default();
    let root = plan.root();
    if plan.steps.is_empty() {
        plan.descend(0, root, &mut tally, budget, &mut outcome.solutions);
    } else {
        let first = plan.expand(0, &root, &mut tally, budget);
        let branches: Vec<(Vec<StateTransitionGraph>, Tally)> = first
            .into_par_iter()
            .map(|child| {
                let mut local = Tally::default();
                let mut found = Vec::new();
                plan.descend(1, child, &mut local, budget, &mut found);
                (found, local)
            })
            .collect();
        for (found, local) in branches {
            outcome.solutions.extend(found);
            tally.merge(local);
        }
    }

    outcome.complete = !tally.incomplete;
    if !outcome.complete {
        tracing::warn!(topology = topology_index, problem = problem_index, "search stopped early");
        outcome.diagnostics.push(Diagnostic {
            topology_index,
            node: None,
            source: DiagnosticSource::Timeout,
            reason: "search cancelled or timed out before all branches were explored".to_string(),
            count: 1,
        });
    }
    if outcome.solutions.is_empty() {
        outcome.diagnostics.extend(tally.into_diagnostics(topology_index));
    }
    tracing::debug!(
        topology = topology_index,
        problem = problem_index,
        solutions = outcome.solutions.len(),
        complete = outcome.complete,
        "solved problem set"
    );
    Ok(outcome)
}
