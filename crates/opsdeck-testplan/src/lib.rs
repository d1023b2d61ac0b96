//! # Opsdeck Testplan
//!
//! Runs named diagnostic plans: ordered sequences of timed steps that probe
//! an HTTP target and short-circuit on the first failure. A run never
//! returns an error; every outcome, including "no such plan" and
//! cancellation, is a complete [`PlanResult`].
//!
//! ```rust,no_run
//! use opsdeck_core::CancellationSignal;
//! use opsdeck_testplan::{RunnerConfig, TestPlanRunner};
//!
//! # async fn demo() -> Result<(), opsdeck_testplan::RunnerError> {
//! let runner = TestPlanRunner::new(RunnerConfig::default())?;
//! let result = runner.run("google-news", &CancellationSignal::never()).await;
//! println!("{}: {}", result.status, result.summary);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod plan;
pub mod runner;
pub mod step;

pub use config::RunnerConfig;
pub use plan::{PlanInfo, PlanResult, PlanStatus, StepResult, StepStatus};
pub use runner::{GOOGLE_NEWS_PLAN, RunnerError, TestPlanRunner};
pub use step::{Completed, StepError, StepRecorder};
