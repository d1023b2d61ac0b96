//! Plan catalog views.

use opsdeck_core::{CoreResult, Resource, ResourceParams, UriTemplate};
use opsdeck_testplan::{PlanInfo, TestPlanRunner};
use std::fmt::Write;
use std::sync::Arc;

fn render_plan(out: &mut String, plan: &PlanInfo) {
    let _ = writeln!(out, "## {} (`{}`)", plan.title, plan.name);
    let _ = writeln!(out, "{}", plan.description);
    let _ = writeln!(
        out,
        "- Default target: {} (override with `{}`)",
        plan.default_target, plan.target_environment_variable
    );
    let _ = writeln!(out, "- Steps: {}", plan.steps.join(" → "));
}

pub struct PlanCatalogResource {
    runner: Arc<TestPlanRunner>,
    template: UriTemplate,
}

impl PlanCatalogResource {
    pub fn new(runner: Arc<TestPlanRunner>) -> CoreResult<Self> {
        Ok(Self {
            runner,
            template: UriTemplate::parse("tests/catalog")?,
        })
    }
}

impl Resource for PlanCatalogResource {
    fn name(&self) -> &str {
        "tests.catalog"
    }

    fn title(&self) -> &str {
        "Test Plan Catalog"
    }

    fn description(&self) -> &str {
        "Diagnostic plans available through `tests.run`."
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn read(&self, _params: &ResourceParams) -> String {
        let mut out = String::from("# Test Plan Catalog\n\n");
        for plan in self.runner.list_plans() {
            render_plan(&mut out, &plan);
            out.push('\n');
        }
        out.push_str("Run a plan with the `tests.run` action and its `plan` argument.\n");
        out
    }
}

pub struct PlanDetailResource {
    runner: Arc<TestPlanRunner>,
    template: UriTemplate,
}

impl PlanDetailResource {
    pub fn new(runner: Arc<TestPlanRunner>) -> CoreResult<Self> {
        Ok(Self {
            runner,
            template: UriTemplate::parse("tests/plan/{name}")?,
        })
    }
}

impl Resource for PlanDetailResource {
    fn name(&self) -> &str {
        "tests.plan"
    }

    fn title(&self) -> &str {
        "Test Plan"
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn read(&self, params: &ResourceParams) -> String {
        let name = params.get_or_empty("name");
        match self.runner.plan(name) {
            Some(plan) => {
                let mut out = String::new();
                render_plan(&mut out, &plan);
                out
            }
            None => format!("Plan '{}' not found. See `tests/catalog`.", name),
        }
    }
}
