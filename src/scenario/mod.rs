pub mod plan;
#[allow(clippy::module_inception)]
pub mod scenario;
pub mod view;

pub use plan::{IncrementSpec, TaskPlan, compute_plan};
pub use scenario::{TaskScenario, Tasks};
pub use view::TaskView;
