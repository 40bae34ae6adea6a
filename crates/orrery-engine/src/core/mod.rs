pub mod orbit;
pub mod clock;
pub mod registry;
pub mod hierarchy;
