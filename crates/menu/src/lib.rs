mod artifact;
mod nutrition;
mod planner;
mod preferences;
mod recipe;
mod selection;

pub use artifact::*;
pub use nutrition::*;
pub use planner::*;
pub use preferences::*;
pub use recipe::*;
pub use selection::*;
