#[cfg(feature = "rayon-executor")]
mod misc;
mod parallel;
mod partials;
mod partition;
#[cfg(feature = "rayon-executor")]
mod rayon;
mod sequential;

pub use parallel::Parallel;
pub use partition::{combine_partner, combine_strides, PartitionPlan};
#[cfg(feature = "rayon-executor")]
pub use self::rayon::Rayon;
pub use sequential::Sequential;

pub type DefaultExecutor = Parallel;
