use crate::aggregate::EditSet;
use crate::collect::collect_diagnostics;
use crate::filter::filter_by_code;
use crate::fixes::{filter_by_fix_name, resolve_fixes};
use crate::ports::Project;
use anyhow::Context;
use codefix_types::fix::FormatOptions;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    /// Accepted diagnostic codes; empty accepts all.
    pub error_codes: Vec<u32>,
    /// Accepted fix names; empty accepts all.
    pub fix_names: Vec<String>,
    pub format: FormatOptions,
}

/// Everything one pass decided before any edit is resolved or applied.
#[derive(Debug, Clone, Default)]
pub struct PassPlan {
    pub diagnostics_total: usize,
    pub diagnostics_selected: usize,
    pub messages: Vec<String>,
    pub fix_actions: usize,
    pub edits: EditSet,
}

/// Collect -> filter -> resolve fixes -> filter fix names -> aggregate.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan(&self, project: &dyn Project) -> anyhow::Result<PassPlan> {
        let collected = collect_diagnostics(project).context("collect diagnostics")?;
        let diagnostics_total = collected.iter().map(|f| f.diagnostics.len()).sum();

        let selection = filter_by_code(collected, &self.config.error_codes);
        for message in &selection.messages {
            info!("{}", message);
        }

        if selection.is_empty() {
            info!("no more diagnostics");
            return Ok(PassPlan {
                diagnostics_total,
                messages: selection.messages,
                ..PassPlan::default()
            });
        }

        let actions = resolve_fixes(project, &selection, &self.config.format)
            .context("resolve fix actions")?;
        let offered = actions.len();
        let actions = filter_by_fix_name(actions, &self.config.fix_names);
        debug!(offered, kept = actions.len(), "filtered fix actions by name");

        let edits = EditSet::from_fix_actions(&actions);
        debug!(
            files = edits.len(),
            changes = edits.total_changes(),
            "aggregated candidate edits"
        );

        Ok(PassPlan {
            diagnostics_total,
            diagnostics_selected: selection.total(),
            messages: selection.messages,
            fix_actions: actions.len(),
            edits,
        })
    }
}
