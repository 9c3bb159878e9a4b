//! The façade tying topology building, node settings, solving and filtering together.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use itertools::Itertools;
use rayon::prelude::*;
use rxn_core::{ErrorInfo, InteractionType, NodeId, ParticleLookup, ParticleRecord, RxnError};
use rxn_equiv::{remove_duplicates, InteractionStrength};
use rxn_qn::EdgeState;
use rxn_solve::{
    default_interaction_settings, determine_interaction_types, merge_diagnostics, solve, CancelToken, Diagnostic,
    DiagnosticSource, InteractionSettings, ProblemOutcome, ProblemSet, SearchBudget,
};
use rxn_topology::{build_topologies, Topology, TopologyOpts};

use crate::config::{ManagerConfig, ReactionRequest, SolvingMode};
use crate::facts::{initial_facts, resolve_states, ExternalState};
use crate::result::ReactionResult;
use crate::violations::check_reaction_violations;

/// Problem sets ready for solving, plus the reasons some placements produced none.
///
/// Callers may edit the problem sets before passing them to
/// [`StateTransitionManager::find_solutions`].
#[derive(Debug, Clone, Default)]
pub struct ProblemSets {
    /// Problem sets ordered by topology, then placement, then interaction types.
    pub problems: Vec<ProblemSet>,
    /// Nodes no allowed interaction type fits.
    pub diagnostics: Vec<Diagnostic>,
}

impl ProblemSets {
    /// Number of problem sets.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Returns `true` when there is nothing to solve.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Applies `edit` to the settings of every node of every problem set.
    pub fn edit_settings<F>(&mut self, mut edit: F)
    where
        F: FnMut(NodeId, &mut InteractionSettings),
    {
        for problem in &mut self.problems {
            for (node, settings) in problem.node_settings.iter_mut() {
                edit(*node, settings);
            }
        }
    }
}

/// Validated reaction plus everything derived from it before solving.
pub struct StateTransitionManager {
    lookup: Arc<dyn ParticleLookup>,
    request: ReactionRequest,
    config: ManagerConfig,
    initial: Vec<ExternalState>,
    final_state: Vec<ExternalState>,
    interaction_types: BTreeSet<InteractionType>,
    candidates: Arc<Vec<Arc<ParticleRecord>>>,
    topologies: Vec<Arc<Topology>>,
}

impl std::fmt::Debug for StateTransitionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateTransitionManager")
            .field("request", &self.request)
            .field("config", &self.config)
            .field("candidates", &self.candidates.len())
            .field("topologies", &self.topologies.len())
            .finish()
    }
}

fn candidate_particles(lookup: &dyn ParticleLookup, patterns: Option<&[String]>) -> Vec<Arc<ParticleRecord>> {
    let patterns: Option<Vec<String>> =
        patterns.map(|patterns| patterns.iter().map(|pattern| pattern.to_lowercase()).collect());
    let mut candidates: Vec<Arc<ParticleRecord>> = lookup
        .particles()
        .filter(|record| match &patterns {
            None => true,
            Some(patterns) => {
                let name = record.name.to_lowercase();
                patterns.iter().any(|pattern| name.contains(pattern.as_str()))
            }
        })
        .collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    candidates
}

impl StateTransitionManager {
    /// Validates the request and builds the topologies.
    ///
    /// Unknown particles fail with `unknown-particle` naming the offending token.
    pub fn configure(
        lookup: Arc<dyn ParticleLookup>,
        request: ReactionRequest,
        config: ManagerConfig,
    ) -> Result<Self, RxnError> {
        config.validate()?;
        if request.initial_state.is_empty() {
            return Err(RxnError::Config(ErrorInfo::new(
                "empty-initial-state",
                "at least one initial-state particle is required",
            )));
        }
        if request.final_state.is_empty() {
            return Err(RxnError::Config(ErrorInfo::new(
                "empty-final-state",
                "at least one final-state particle is required",
            )));
        }
        let initial = resolve_states(lookup.as_ref(), &request.initial_state)?;
        let final_state = resolve_states(lookup.as_ref(), &request.final_state)?;
        let interaction_types = request.interaction_selection()?;
        let candidates = candidate_particles(lookup.as_ref(), request.allowed_intermediate_particles.as_deref());
        if candidates.is_empty() {
            tracing::warn!("no intermediate particle matches the allowed patterns");
        }
        let opts = TopologyOpts {
            isobar: true,
            nbody: config.include_nbody_topology,
        };
        let topologies = build_topologies(initial.len(), final_state.len(), &opts)?
            .into_iter()
            .map(Arc::new)
            .collect::<Vec<_>>();
        tracing::info!(
            topologies = topologies.len(),
            candidates = candidates.len(),
            formalism = %config.formalism,
            "configured reaction"
        );
        Ok(Self {
            lookup,
            request,
            config,
            initial,
            final_state,
            interaction_types,
            candidates: Arc::new(candidates),
            topologies,
        })
    }

    /// The request this manager was configured with.
    pub fn request(&self) -> &ReactionRequest {
        &self.request
    }

    /// The configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Topologies in build order; problem sets refer to them by index.
    pub fn topologies(&self) -> &[Arc<Topology>] {
        &self.topologies
    }

    /// Intermediate particle candidates, sorted by name.
    pub fn candidates(&self) -> &[Arc<ParticleRecord>] {
        &self.candidates
    }

    /// Interaction types the user allowed.
    pub fn allowed_interaction_types(&self) -> &BTreeSet<InteractionType> {
        &self.interaction_types
    }

    /// Seeds every topology with the external states and picks the node settings.
    ///
    /// Each combination of node interaction types compatible with the known external
    /// particles becomes its own problem set.
    pub fn create_problem_sets(&self) -> Result<ProblemSets, RxnError> {
        let mut problems = Vec::new();
        let mut diagnostics = Vec::new();
        let mut cache: BTreeMap<(InteractionType, bool), InteractionSettings> = BTreeMap::new();
        for (topology_index, topology) in self.topologies.iter().enumerate() {
            let facts_list = initial_facts(
                topology,
                &self.initial,
                &self.final_state,
                &self.request.final_state_groupings,
            )?;
            for facts in facts_list {
                let mut node_types: Vec<(NodeId, BTreeSet<InteractionType>)> = Vec::new();
                for node in topology.node_ids() {
                    let known: Vec<&EdgeState> = topology
                        .incoming_edges(node)
                        .iter()
                        .chain(topology.outgoing_edges(node))
                        .filter_map(|edge| facts.get(*edge))
                        .collect();
                    let types = determine_interaction_types(&known, &self.interaction_types);
                    if types.is_empty() {
                        let names: Vec<&str> = known.iter().filter_map(|state| state.particle_name()).collect();
                        diagnostics.push(Diagnostic {
                            topology_index,
                            node: Some(node),
                            source: DiagnosticSource::InteractionTypes,
                            reason: format!(
                                "no allowed interaction type couples to [{}]",
                                names.join(", ")
                            ),
                            count: 1,
                        });
                    }
                    node_types.push((node, types));
                }
                if node_types.iter().any(|(_, types)| types.is_empty()) {
                    continue;
                }
                let combinations = node_types
                    .iter()
                    .map(|(_, types)| types.iter().copied())
                    .multi_cartesian_product();
                for interactions in combinations {
                    let node_settings = node_types
                        .iter()
                        .zip(interactions)
                        .map(|((node, _), interaction)| {
                            let two_body = topology.is_two_body_node(*node);
                            let settings = cache
                                .entry((interaction, two_body))
                                .or_insert_with(|| {
                                    default_interaction_settings(
                                        self.config.formalism,
                                        interaction,
                                        two_body,
                                        self.config.mass_width_factor,
                                    )
                                })
                                .clone();
                            (*node, settings)
                        })
                        .collect();
                    problems.push(ProblemSet {
                        topology_index,
                        topology: Arc::clone(topology),
                        facts: facts.clone(),
                        node_settings,
                        candidates: Arc::clone(&self.candidates),
                        formalism: self.config.formalism,
                    });
                }
            }
        }
        tracing::info!(
            problem_sets = problems.len(),
            rejected_nodes = diagnostics.len(),
            "created problem sets"
        );
        Ok(ProblemSets {
            problems,
            diagnostics: merge_diagnostics(diagnostics),
        })
    }

    /// Solves the problem sets without a cancellation handle.
    pub fn find_solutions(&self, sets: &ProblemSets) -> Result<ReactionResult, RxnError> {
        self.find_solutions_with_cancel(sets, &CancelToken::new())
    }

    /// Solves the problem sets strongest strength group first.
    ///
    /// Problem sets within a group run in parallel on a dedicated pool; outcomes are
    /// merged in problem order. Cancelling `cancel` stops every remaining search and
    /// marks the affected topologies incomplete.
    pub fn find_solutions_with_cancel(
        &self,
        sets: &ProblemSets,
        cancel: &CancelToken,
    ) -> Result<ReactionResult, RxnError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or(0))
            .build()
            .map_err(|err| RxnError::Runtime(ErrorInfo::new("thread-pool", err.to_string())))?;
        let base = SearchBudget::new(cancel.clone(), self.config.timeout());
        let budgets: BTreeMap<usize, SearchBudget> = sets
            .problems
            .iter()
            .map(|problem| problem.topology_index)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|topology_index| (topology_index, base.for_topology()))
            .collect();

        let mut groups: BTreeMap<Reverse<InteractionStrength>, Vec<usize>> = BTreeMap::new();
        for (index, problem) in sets.problems.iter().enumerate() {
            groups
                .entry(Reverse(InteractionStrength(problem.strength())))
                .or_default()
                .push(index);
        }
        tracing::info!(problem_sets = sets.len(), groups = groups.len(), "solving strength groups");

        let mut outcomes: Vec<ProblemOutcome> = Vec::new();
        let mut skipped = 0;
        let mut stopped = false;
        for (Reverse(strength), indices) in groups {
            if stopped {
                skipped += indices.len();
                continue;
            }
            let solved: Result<Vec<(usize, ProblemOutcome)>, RxnError> = pool.install(|| {
                indices
                    .par_iter()
                    .map(|index| -> Result<(usize, ProblemOutcome), RxnError> {
                        let problem = &sets.problems[*index];
                        let budget = budgets
                            .get(&problem.topology_index)
                            .cloned()
                            .unwrap_or_else(|| base.for_topology());
                        Ok((*index, solve(problem, *index, &budget)?))
                    })
                    .collect()
            });
            let mut ordered = solved?;
            ordered.sort_by_key(|(index, _)| *index);
            let found: usize = ordered.iter().map(|(_, outcome)| outcome.solutions.len()).sum();
            tracing::info!(
                strength = %strength,
                problem_sets = indices.len(),
                solutions = found,
                "solved strength group"
            );
            outcomes.extend(ordered.into_iter().map(|(_, outcome)| outcome));
            stopped = self.config.solving_mode == SolvingMode::Fast && found > 0;
        }
        if skipped > 0 {
            tracing::warn!(skipped, "fast mode left weaker strength groups unsolved");
        }
        self.assemble(sets, outcomes, skipped)
    }

    fn assemble(
        &self,
        sets: &ProblemSets,
        outcomes: Vec<ProblemOutcome>,
        skipped_problem_sets: usize,
    ) -> Result<ReactionResult, RxnError> {
        let solved_topologies: BTreeSet<usize> = outcomes
            .iter()
            .filter(|outcome| !outcome.solutions.is_empty())
            .map(|outcome| outcome.topology_index)
            .collect();
        let incomplete_topologies: BTreeSet<usize> = outcomes
            .iter()
            .filter(|outcome| !outcome.complete)
            .map(|outcome| outcome.topology_index)
            .collect();
        let diagnostics = merge_diagnostics(
            sets.diagnostics
                .iter()
                .cloned()
                .chain(outcomes.iter().flat_map(|outcome| outcome.diagnostics.iter().cloned()))
                .filter(|entry| {
                    entry.source == DiagnosticSource::Timeout || !solved_topologies.contains(&entry.topology_index)
                }),
        );
        let raw: Vec<_> = outcomes.into_iter().flat_map(|outcome| outcome.solutions).collect();
        let solutions = remove_duplicates(raw, self.config.formalism);
        let violated_rules = if solutions.is_empty() {
            check_reaction_violations(self.lookup.as_ref(), &self.request, &self.config)?
        } else {
            BTreeSet::new()
        };
        tracing::info!(
            solutions = solutions.len(),
            diagnostics = diagnostics.len(),
            incomplete = incomplete_topologies.len(),
            "finished reaction"
        );
        Ok(ReactionResult {
            solutions,
            diagnostics,
            incomplete_topologies,
            skipped_problem_sets,
            violated_rules,
            formalism: self.config.formalism,
        })
    }
}
