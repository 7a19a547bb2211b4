// HTTP routes
pub mod feedback;
pub mod health;
pub mod sources;

pub use feedback::*;
pub use health::*;
pub use sources::*;
