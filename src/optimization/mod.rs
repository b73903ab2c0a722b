//! optimization — MaxEnt solver stack and its error surface.
//!
//! Purpose
//! -------
//! Host the Skilling–Bryan maximum-entropy inversion (`maxent`) together
//! with the single error/result surface (`errors::MaxEntError`,
//! `MaxEntResult<T>`) every solver component reports through.
//!
//! Key behaviors
//! -------------
//! - `maxent` runs the outer iteration on an argmin `Executor` and exposes
//!   `solve` / `solve_monitored` as entry points.
//! - `errors` classifies failures ([`errors::ErrorKind`]) so callers can
//!   tell invalid input from numerical breakdown, and converts argmin errors
//!   back into `MaxEntError`.
//!
//! Conventions
//! -----------
//! - Public entry points that can fail return `MaxEntResult<T>`; callers
//!   never see raw argmin errors.
//! - Progress is reported through the `log` facade only when a run's
//!   `report` option is set.
//!
//! Downstream usage
//! ----------------
//! - Front-ends typically import `optimization::prelude::*`; the
//!   size-distribution workflow calls `maxent::solve` once per replica.

pub mod errors;
pub mod maxent;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use sas_maxent::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{ErrorKind, MaxEntError, MaxEntResult};
    pub use super::maxent::prelude::*;
}
