//! Git patch extraction and multi-patch composition.
//!
//! Every git invocation names the repository explicitly (`git -C <repo>`);
//! the process working directory is never changed, so independent
//! repositories can be driven from separate workers. A single repository is
//! still an exclusively-owned resource per call: callers must serialize
//! access per checkout.

pub mod errors;
pub mod patch;

pub use errors::RepoError;
pub use patch::{apply_patches, get_patch, TEMP_PATCH};
