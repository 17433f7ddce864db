//! BuildCoordinator — the pipeline orchestrator.

use geo::Rect;

use tn_condition::{splitter_for, DuplicateResolver, TrailGapBridger, TrailSplitter};
use tn_core::units::{km_to_meters, meters_to_degrees};
use tn_core::{EdgeId, NetworkConfig, TrailId};
use tn_geom::{kernel, EnvelopeIndex};
use tn_store::TrailStore;
use tn_topology::{
    Degree2ChainMerger, EdgeDeduplicator, NetworkGraph, NetworkValidator, TopologyBuilder,
    VertexWelder,
};

use crate::cancel::CancelToken;
use crate::error::{BuildError, BuildStage};
use crate::summary::{BuildSummary, BuildWarning};

// ── BuildOutcome ──────────────────────────────────────────────────────────────

/// A committed build: the routable graph, the conditioned trail set it was
/// built from, and the per-stage accounting.
#[derive(Debug)]
pub struct BuildOutcome {
    pub network: NetworkGraph,
    pub conditioned: TrailStore,
    pub summary: BuildSummary,
}

// ── BuildCoordinator ──────────────────────────────────────────────────────────

/// Runs the full conditioning + topology pipeline over a trail store.
///
/// The coordinator never mutates the caller's store: it clones into a
/// private working set and hands conditioned state back only inside a
/// successful [`BuildOutcome`].  That clone is the build's transaction —
/// an error or cancellation at any stage simply drops it.
pub struct BuildCoordinator {
    config: NetworkConfig,
    cancel: CancelToken,
}

impl BuildCoordinator {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config, cancel: CancelToken::new() }
    }

    /// Attach a cancellation token observed between stages.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Run the pipeline to completion.
    pub fn run(&self, store: &TrailStore) -> Result<BuildOutcome, BuildError> {
        self.config.validate()?;

        let mut summary = BuildSummary { trails_in: store.len(), ..Default::default() };
        let mut working = store.clone();

        // ── Layer 1: conditioning ─────────────────────────────────────────
        self.checkpoint(BuildStage::Filter)?;
        if let Some(bbox) = &self.config.bbox {
            summary.trails_filtered = working.retain_within(bbox);
            log::info!(
                "bbox filter kept {} of {} trail(s)",
                working.len(),
                summary.trails_in
            );
        }

        self.checkpoint(BuildStage::Dedupe)?;
        let removals = DuplicateResolver::new(&self.config)
            .apply(&mut working)
            .map_err(BuildError::at(BuildStage::Dedupe))?;
        summary.duplicates_removed = removals.len();

        self.checkpoint(BuildStage::Bridge)?;
        let bridge = TrailGapBridger::new(&self.config)
            .apply(&mut working)
            .map_err(BuildError::at(BuildStage::Bridge))?;
        summary.gaps_bridged = bridge.bridges.len();

        self.checkpoint(BuildStage::Split)?;
        let splitter = splitter_for(self.config.strategy);
        let split = splitter
            .split(&working, &bridge.connector_km, &self.config)
            .map_err(BuildError::at(BuildStage::Split))?;
        summary.split_segments = split.segments.len();
        summary.segments_dropped_short = split.dropped_short;
        if !split.unmatched.is_empty() {
            summary
                .warnings
                .push(BuildWarning::UnmatchedSegments { count: split.unmatched.len() });
        }
        if split.residual_crossings > 0 {
            summary
                .warnings
                .push(BuildWarning::ResidualCrossings { count: split.residual_crossings });
        }
        log::info!(
            "{} strategy split {} trail(s) into {} segment(s)",
            splitter.name(),
            working.len(),
            split.segments.len()
        );

        // ── Layer 2: topology ─────────────────────────────────────────────
        self.checkpoint(BuildStage::Topology)?;
        let built = TopologyBuilder::new(&self.config)
            .build(&split)
            .map_err(BuildError::at(BuildStage::Topology))?;
        let mut graph = built.graph;
        if built.rejected_unsnapped > 0 {
            summary
                .warnings
                .push(BuildWarning::UnsnappedEndpoints { count: built.rejected_unsnapped });
        }
        log::info!(
            "topology: {} vertex(es), {} edge(s), {} true loop(s)",
            graph.vertex_count(),
            graph.edge_count(),
            built.true_loops
        );

        self.checkpoint(BuildStage::Weld)?;
        let weld = VertexWelder::new(&self.config).run(&mut graph);
        summary.welded_vertices = weld.welded;

        self.checkpoint(BuildStage::EdgeDedup)?;
        summary.parallel_edges_removed = EdgeDeduplicator::run(&mut graph);

        self.checkpoint(BuildStage::ChainMerge)?;
        let merge = Degree2ChainMerger::new(&self.config).run(&mut graph);
        summary.merge_passes = merge.passes;
        summary.chains_merged = merge.merged_chains;
        summary.connectors_removed = merge.removed_connectors;
        if merge.skipped_chains > 0 {
            summary
                .warnings
                .push(BuildWarning::ChainsSkipped { count: merge.skipped_chains });
        }
        if merge.budget_exceeded {
            summary
                .warnings
                .push(BuildWarning::MergeBudgetExceeded { passes: merge.passes });
        }

        // ── Validation & coverage ─────────────────────────────────────────
        self.checkpoint(BuildStage::Validate)?;
        let report = NetworkValidator::run(&graph);
        summary.component_sizes = report.component_sizes.clone();
        if !report.is_clean() {
            if self.config.strict_validation {
                return Err(BuildError::ValidationFailed {
                    count: report.violations.len(),
                    first: report.violations[0].to_string(),
                });
            }
            log::warn!(
                "continuing past {} validation violation(s) (strict_validation = false)",
                report.violations.len()
            );
        }
        let advisory = report.warnings.len()
            + if self.config.strict_validation { 0 } else { report.violations.len() };
        if advisory > 0 {
            summary
                .warnings
                .push(BuildWarning::ValidationFindings { count: advisory });
        }

        self.checkpoint(BuildStage::Coverage)?;
        for (trail, gap_m) in coverage_gaps(&working, &graph, &self.config) {
            log::warn!("coverage shortfall: trail {trail} misses ~{gap_m:.1} m");
            summary.warnings.push(BuildWarning::CoverageShortfall { trail, gap_m });
        }

        summary.vertices = graph.vertex_count();
        summary.edges = graph.edge_count();
        summary.composition_entries = graph.composition.entry_count();
        log::info!(
            "build committed: {} edge(s), {} vertex(es), {} component(s), {} warning(s)",
            summary.edges,
            summary.vertices,
            summary.component_sizes.len(),
            summary.warnings.len()
        );

        Ok(BuildOutcome { network: graph, conditioned: working, summary })
    }

    fn checkpoint(&self, stage: BuildStage) -> Result<(), BuildError> {
        if self.cancel.is_cancelled() {
            log::warn!("build cancelled before stage {stage}");
            Err(BuildError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}

// ── Coverage check ────────────────────────────────────────────────────────────

/// Sample every conditioned trail and report the approximate length not
/// within tolerance of any final edge.
///
/// The tolerance is twice the larger of the snap and weld tolerances:
/// welding legitimately drags edge endpoints that far off the source
/// geometry.
fn coverage_gaps(
    store: &TrailStore,
    graph: &NetworkGraph,
    config: &NetworkConfig,
) -> Vec<(TrailId, f64)> {
    let tol = meters_to_degrees(2.0 * config.edge_snap_tol_m.max(config.vertex_weld_tol_m));

    let edge_ids: Vec<EdgeId> = graph.edge_ids();
    let index = EnvelopeIndex::build(
        edge_ids
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let e = graph.edge(*id).expect("ids from live table");
                kernel::envelope(&e.geom).ok().map(|env| (i as u32, env))
            })
            .collect(),
    );

    let mut gaps = Vec::new();
    for trail in store.iter() {
        let line = &trail.geom.line;
        let mut samples: Vec<geo::Point<f64>> = line.0.iter().map(|&c| c.into()).collect();
        for seg in line.lines() {
            samples.push(geo::Point::new(
                (seg.start.x + seg.end.x) / 2.0,
                (seg.start.y + seg.end.y) / 2.0,
            ));
        }

        let uncovered = samples
            .iter()
            .filter(|p| {
                let probe = Rect::new(p.0, p.0);
                !index.dwithin(probe, tol).into_iter().any(|i| {
                    let e = graph.edge(edge_ids[i as usize]).expect("ids from live table");
                    kernel::point_line_distance(**p, &e.geom) <= tol
                })
            })
            .count();

        if uncovered > 0 {
            let gap_m =
                km_to_meters(trail.length_km) * uncovered as f64 / samples.len() as f64;
            gaps.push((trail.id.clone(), gap_m));
        }
    }
    gaps
}
