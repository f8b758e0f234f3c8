pub mod config;
pub mod convergence;
pub mod error;
pub mod io;
pub mod model;
pub mod plot;
pub mod series;

pub use convergence::*;
pub use error::*;
pub use model::*;
pub use series::*;
