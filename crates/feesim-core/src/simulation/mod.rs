pub mod engine;
pub mod waterfall;

pub use engine::{simulate_scheme, SimulationInput, SimulationOutput};
pub use waterfall::{calculate_waterfall, WaterfallBreakdown, WaterfallSlice};
