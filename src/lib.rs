pub mod analyze;
pub mod bulk;
pub mod error;
pub mod generator;
pub mod output;
pub mod query;
pub mod render;
pub mod sample;
pub mod scenario;

pub use error::GenError;
pub use generator::{DevopsGenerator, QueryWorker};
pub use query::{QueryCarrier, QueryPool};
pub use render::Dialect;
pub use scenario::ScenarioRegistry;
