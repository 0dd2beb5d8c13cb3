//! Stream synthesis: a batch of streams per (traffic type, end system) pair, with sampled
//! priority, size, period, and deadline.

use rand::prelude::*;

use crate::network::types::{Device, EndSystemId, Stream, StreamId};
use crate::spec::TrafficType;
use crate::units::{Bytes, Microsecs};

pub(crate) const DEFAULT_SIZE: (Bytes, Bytes) = (Bytes::new(100), Bytes::new(100));
pub(crate) const DEFAULT_PERIOD: Microsecs = Microsecs::new(1000);

/// Synthesizes streams for every (traffic type, end system) pair, walking traffic types in
/// configuration order and end systems in device-list order. Stream names are a single global
/// sequence over that iteration order.
///
/// PRECONDITIONS: `traffic` has passed [`Spec::validate`](crate::Spec): parameter ranges are
/// well-formed, period sets are non-empty, and `devices` holds at least two end systems
/// whenever a type requests streams.
pub(crate) fn synthesize(
    devices: &[Device],
    traffic: &[TrafficType],
    rng: &mut impl Rng,
) -> Vec<Stream> {
    let end_systems = devices
        .iter()
        .filter_map(Device::end_system_id)
        .collect::<Vec<_>>();
    let mut streams = Vec::new();
    for tt in traffic {
        for src in 0..end_systems.len() {
            for _ in 0..tt.streams_per_es {
                let id = StreamId::new(streams.len() + 1);
                streams.push(sample_stream(id, tt, &end_systems, src, rng));
            }
        }
    }
    streams
}

fn sample_stream(
    id: StreamId,
    tt: &TrafficType,
    end_systems: &[EndSystemId],
    src: usize,
    rng: &mut impl Rng,
) -> Stream {
    // Uniform over the other end systems: draw from a range one element short and skip past
    // the source.
    let dst = {
        let pick = rng.gen_range(0..end_systems.len() - 1);
        end_systems[if pick >= src { pick + 1 } else { pick }]
    };
    let pcp = rng.gen_range(0..=7);
    let (size_min, size_max) = tt.size.unwrap_or(DEFAULT_SIZE);
    let size = Bytes::new(rng.gen_range(size_min.into_u64()..=size_max.into_u64()));
    let period = match &tt.periods {
        // Period sets are non-empty by validation.
        Some(periods) => *periods.choose(rng).unwrap(),
        None => DEFAULT_PERIOD,
    };
    // The default deadline range is derived from the sampled period, but the deadline itself
    // is always drawn independently of it.
    let (deadline_min, deadline_max) = tt
        .deadline
        .unwrap_or((period, Microsecs::new(2 * period.into_u64())));
    let deadline = Microsecs::new(rng.gen_range(deadline_min.into_u64()..=deadline_max.into_u64()));
    Stream {
        id,
        pcp,
        traffic_type: tt.name.clone(),
        src: end_systems[src],
        dst,
        size,
        period,
        deadline,
    }
}
