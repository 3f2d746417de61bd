mod counter;
mod home;
mod tasks;

pub use counter::*;
pub use home::*;
pub use tasks::*;
