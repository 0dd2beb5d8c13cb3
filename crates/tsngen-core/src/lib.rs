#![warn(unreachable_pub, missing_debug_implementations)]

//! The core TSN test-case generator library. This crate defines [the routine](run) that turns
//! a [`Spec`] into a [`TestCase`]: a connected switch/end-system topology with stable device
//! identifiers and collision-free port numbers, plus a set of unicast streams drawn from the
//! configured traffic types.

#[macro_use]
mod ident;

mod network;
mod run;
mod spec;
mod stream;

pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use network::graph::GraphKind;
pub use network::types::{
    Device, DeviceId, EndSystemId, Link, LinkId, Stream, StreamId, SwitchId,
};
pub use run::{run, Error, TestCase};
pub use spec::{Spec, SpecError, TrafficType};
