mod driver;
mod executor;
mod folder;
mod operation;
mod setup;

pub use driver::Driver;
pub use executor::Executor;
pub use folder::{fold_slice, Folder, ReduceFolder};
pub use operation::{Fallible, Infallible, Operation};
pub use setup::{Setup, WithSetup, MIN_LEN_ENV, WORKERS_ENV};
