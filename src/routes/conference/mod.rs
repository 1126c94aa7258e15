mod handler;
mod model;

pub use handler::list_conferences;
pub use model::{Conference, ConferenceColumns};
