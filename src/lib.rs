//!
//! A discrete event simulation kernel.
//!
//! The kernel advances a logical clock by dispatching the earliest pending
//! event, models contended resources as multi-server *facilities* with
//! priority queueing and preemption, and keeps the standard operational
//! measures (utilization, mean busy period, mean queue length, preemption
//! and queue-exit counts) as time-weighted sums updated on every state
//! transition. Sampling routines for the usual service and inter-arrival
//! distributions run on fifteen reproducible random streams.
//!
//! A model is an ordinary event loop: create a [`Sim`], create facilities,
//! schedule a first event, then repeatedly [`cause`](Sim::cause) the next
//! event and react to it.
//!
//! # Examples
//!
//! A single-server queue with exponential service:
//!
//! ```
//! use smpl::{RequestResult, Sim};
//!
//! const ARRIVAL: i32 = 1;
//! const DEPARTURE: i32 = 2;
//!
//! let mut sim = Sim::new("m/m/1");
//! let server = sim.facility("server", 1)?;
//! sim.schedule(ARRIVAL, 0.0, 1_u32)?;
//!
//! let mut next_customer = 2;
//! while sim.time() < 500.0 {
//!     let Some((event, customer)) = sim.cause() else { break };
//!     match event {
//!         ARRIVAL => {
//!             // blocked requests are re-issued by the kernel on release
//!             if sim.request(server, customer, 0)? == RequestResult::Reserved {
//!                 let service = sim.rand().expntl(0.75);
//!                 sim.schedule(DEPARTURE, service, customer)?;
//!             }
//!             if customer == next_customer - 1 {
//!                 let gap = sim.rand().expntl(1.0);
//!                 sim.schedule(ARRIVAL, gap, next_customer)?;
//!                 next_customer += 1;
//!             }
//!         }
//!         DEPARTURE => sim.release(server, &customer)?,
//!         _ => unreachable!(),
//!     }
//! }
//!
//! assert!(sim.utilization(server)? <= 1.0);
//! # Ok::<(), smpl::Error>(())
//! ```

use std::fmt::Display;

mod error;
mod evlist;
mod facility;
mod pool;
mod random;
mod sim;
mod trace;

pub mod prelude;

pub use error::{Error, ErrorKind, Result};
pub use facility::{FacilityId, RequestResult};
pub use random::Rand;
pub use sim::Sim;

/// Identity contract for user-supplied tokens.
///
/// Tokens address events and reservations; the kernel never interprets
/// them beyond equality, cloning them into its records and displaying them
/// in trace output. The blanket implementation covers integers, strings
/// and any custom id type with the same surface.
pub trait Token: Clone + PartialEq + Display {}

impl<T> Token for T where T: Clone + PartialEq + Display {}
