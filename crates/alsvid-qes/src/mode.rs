//! Interaction-mode abstraction.
//!
//! The emitter addresses stabilizers through one of two layouts, selected
//! once at construction: per-check, where every check is an independent
//! extraction unit and all checks run in a single simultaneous pass per
//! round, or per-plaquette, where a color-code plaquette bundles its X and
//! Z member checks and each round runs one full extraction pass per basis.

use alsvid_code::{Basis, CheckId, TannerModel};

/// Which layout the emitter uses to address stabilizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// Every check is its own extraction and measurement unit.
    PerCheck,
    /// Plaquettes are the unit; member checks extract in per-basis passes.
    PerPlaquette,
}

/// One simultaneous extraction pass: the checks whose interactions are
/// layered together and measured back-to-back.
#[derive(Debug, Clone)]
pub struct ExtractionPass {
    /// The single basis extracted in this pass, if uniform.
    pub basis: Option<Basis>,
    /// Checks extracted in this pass, in emission order.
    pub checks: Vec<CheckId>,
}

/// Layout capabilities the emitter needs: which checks extract together,
/// and which stabilizer outcomes feed cross-round comparisons.
pub trait InteractionLayout {
    /// The extraction passes of one round, in emission order.
    fn passes(&self, model: &TannerModel) -> Vec<ExtractionPass>;

    /// Stabilizers whose outcomes are compared round-to-round for the
    /// given memory basis, in event-enumeration order.
    fn memory_units(&self, model: &TannerModel, memory: Basis) -> Vec<CheckId>;
}

/// Per-check layout: one pass with every check.
#[derive(Debug, Clone, Copy)]
pub struct CheckLayout;

impl InteractionLayout for CheckLayout {
    fn passes(&self, model: &TannerModel) -> Vec<ExtractionPass> {
        vec![ExtractionPass {
            basis: None,
            checks: model.checks().iter().map(|c| c.id).collect(),
        }]
    }

    fn memory_units(&self, model: &TannerModel, memory: Basis) -> Vec<CheckId> {
        model.checks_of(memory).map(|c| c.id).collect()
    }
}

/// Per-plaquette layout: an X pass then a Z pass over the plaquettes'
/// member checks.
#[derive(Debug, Clone, Copy)]
pub struct PlaquetteLayout;

impl InteractionLayout for PlaquetteLayout {
    fn passes(&self, model: &TannerModel) -> Vec<ExtractionPass> {
        [Basis::X, Basis::Z]
            .into_iter()
            .map(|basis| ExtractionPass {
                basis: Some(basis),
                checks: model
                    .plaquettes()
                    .iter()
                    .filter_map(|p| model.plaquette_member(p.id, basis))
                    .collect(),
            })
            .collect()
    }

    fn memory_units(&self, model: &TannerModel, memory: Basis) -> Vec<CheckId> {
        model
            .plaquettes()
            .iter()
            .filter_map(|p| model.plaquette_member(p.id, memory))
            .collect()
    }
}

/// The layout implementation for a mode.
pub fn layout_for(mode: InteractionMode) -> Box<dyn InteractionLayout> {
    match mode {
        InteractionMode::PerCheck => Box::new(CheckLayout),
        InteractionMode::PerPlaquette => Box::new(PlaquetteLayout),
    }
}
