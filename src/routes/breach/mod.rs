mod handler;
mod model;

pub use handler::list_breaches;
pub use model::{Breach, BreachColumns};
