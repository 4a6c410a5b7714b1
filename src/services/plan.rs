use crate::domain::error::SwapError;
use crate::domain::models::SwapPlan;

/// Plan lifecycle:
/// `NoPlan -> Computing -> Ready -> Applying -> Applied`, with any input
/// change from `Ready`/`Applied` forcing a return to `NoPlan`.
#[derive(Debug, Default)]
pub enum PlanState {
    #[default]
    NoPlan,
    Computing {
        generation: u64,
    },
    Ready(SwapPlan),
    Applying(SwapPlan),
    Applied(SwapPlan),
}

/// The selections in effect when a pass is requested or applied. A plan is
/// executable only while these still match what it recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    pub file_name: String,
    pub fingerprint: String,
    pub target_map_id: String,
    pub include_missing: bool,
    pub guild_id: Option<String>,
}

/// Sole owner of the current plan. The plan is replaced atomically on every
/// transition, never mutated field by field. Each reconciliation pass
/// carries a generation token; results arriving for a superseded generation
/// are discarded.
#[derive(Debug, Default)]
pub struct PlanTracker {
    state: PlanState,
    generation: u64,
}

impl PlanTracker {
    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn plan(&self) -> Option<&SwapPlan> {
        match &self.state {
            PlanState::Ready(p) | PlanState::Applying(p) | PlanState::Applied(p) => Some(p),
            PlanState::NoPlan | PlanState::Computing { .. } => None,
        }
    }

    /// Starts a reconciliation pass, superseding any prior plan or in-flight
    /// pass. Returns the pass's generation token.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = PlanState::Computing {
            generation: self.generation,
        };
        self.generation
    }

    /// Installs the result of a pass. Returns false (and changes nothing)
    /// when the pass was superseded while it was running.
    pub fn complete(&mut self, generation: u64, plan: SwapPlan) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.state {
            PlanState::Computing { generation: g } if g == generation => {
                self.state = PlanState::Ready(plan);
                true
            }
            _ => false,
        }
    }

    /// Records a fatal input error for the given pass.
    pub fn fail(&mut self, generation: u64) {
        if let PlanState::Computing { generation: g } = self.state {
            if g == generation {
                self.state = PlanState::NoPlan;
            }
        }
    }

    /// Any change to the source file, target map, selector, or
    /// include-missing flag lands here.
    pub fn invalidate(&mut self) {
        self.state = PlanState::NoPlan;
    }

    /// Loads a previously persisted plan as the current Ready plan.
    pub fn restore(&mut self, plan: SwapPlan) {
        self.state = PlanState::Ready(plan);
    }

    /// Validates the recorded selections against the current ones and, on a
    /// match, moves to Applying and hands back the plan for the mutator.
    /// A mismatch aborts the transition: the caller must re-run pre-check.
    pub fn begin_apply(&mut self, current: &Selections) -> Result<SwapPlan, SwapError> {
        let plan = match &self.state {
            PlanState::Ready(p) | PlanState::Applied(p) => p,
            PlanState::NoPlan | PlanState::Computing { .. } | PlanState::Applying(_) => {
                return Err(SwapError::NoPlan)
            }
        };
        if let Some(reason) = selection_mismatch(plan, current) {
            return Err(SwapError::StalePlan(reason));
        }
        let plan = plan.clone();
        self.state = PlanState::Applying(plan.clone());
        Ok(plan)
    }

    pub fn finish_apply(&mut self) {
        if let PlanState::Applying(_) = &self.state {
            let state = std::mem::take(&mut self.state);
            if let PlanState::Applying(plan) = state {
                self.state = PlanState::Applied(plan);
            }
        }
    }
}

fn selection_mismatch(plan: &SwapPlan, current: &Selections) -> Option<String> {
    if plan.file_name != current.file_name {
        return Some(format!(
            "plan was computed for {}, not {}",
            plan.file_name, current.file_name
        ));
    }
    if plan.fingerprint != current.fingerprint {
        return Some("the document changed since pre-check".to_string());
    }
    if plan.target_map_id != current.target_map_id {
        return Some("the target map changed since pre-check".to_string());
    }
    if plan.include_missing != current.include_missing {
        return Some("the include-missing option changed since pre-check".to_string());
    }
    if plan.guild_id != current.guild_id {
        return Some("the guild selection changed since pre-check".to_string());
    }
    None
}
