//! Type definitions for vouch storage.

mod ids;
mod invitations;
mod references;

pub use ids::*;
pub use invitations::*;
pub use references::*;
