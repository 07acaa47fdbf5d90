//! Common imports for simulation models.
//!
//! ```
//! use smpl::prelude::*;
//! ```

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::facility::{FacilityId, RequestResult};
pub use crate::random::Rand;
pub use crate::sim::Sim;
pub use crate::Token;
