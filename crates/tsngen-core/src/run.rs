use rand::prelude::*;

use crate::network::graph;
use crate::network::topology::Topology;
use crate::network::types::{Device, Link, Stream};
use crate::spec::{Spec, SpecError};
use crate::stream;

/// The core generator routine. This turns a specification into a [`TestCase`]: the expanded
/// device/link topology plus the synthesized streams.
///
/// The topology is built first; the stream synthesizer sees nothing but the resulting device
/// list. Both draw from a single `StdRng` seeded from the specification, so a fixed seed and
/// configuration produce a byte-identical test case.
pub fn run(spec: Spec) -> Result<TestCase, Error> {
    let spec = spec.validate()?;
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let graph = graph::build(spec.graph, spec.nr_switches, &mut rng);
    let topology = Topology::from_graph(&graph, spec.es_per_switch);
    let streams = stream::synthesize(&topology.devices, &spec.traffic, &mut rng);
    Ok(TestCase {
        devices: topology.devices,
        links: topology.links,
        streams,
    })
}

/// A generated test case. Produced once per run and immutable thereafter; serialization
/// frontends consume it read-only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TestCase {
    /// Topology devices, switches first.
    pub devices: Vec<Device>,
    /// Topology links, access links first.
    pub links: Vec<Link>,
    /// Streams, named in generation order.
    pub streams: Vec<Stream>,
}

/// Generation error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The specification is invalid.
    #[error(transparent)]
    InvalidSpec(#[from] SpecError),
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::network::types::DeviceId;
    use crate::spec::TrafficType;
    use crate::testing;
    use crate::units::{Bytes, Microsecs};
    use crate::GraphKind;

    /// Every switch must reach every other switch over trunk links alone.
    fn switch_fabric_is_connected(test_case: &TestCase) -> bool {
        let switches = test_case
            .devices
            .iter()
            .filter(|d| matches!(d.id, DeviceId::Switch(_)))
            .map(|d| d.id)
            .collect::<Vec<_>>();
        let mut adjacent: HashMap<DeviceId, Vec<DeviceId>> = HashMap::new();
        for link in test_case.links.iter().filter(|l| l.is_trunk()) {
            adjacent.entry(link.a).or_default().push(link.b);
            adjacent.entry(link.b).or_default().push(link.a);
        }
        let mut seen = HashSet::from([switches[0]]);
        let mut frontier = vec![switches[0]];
        while let Some(id) = frontier.pop() {
            for &next in adjacent.get(&id).into_iter().flatten() {
                if seen.insert(next) {
                    frontier.push(next);
                }
            }
        }
        switches.iter().all(|id| seen.contains(id))
    }

    #[test]
    fn example_ring_scenario() -> anyhow::Result<()> {
        let spec = Spec::builder()
            .graph(GraphKind::Cycle)
            .nr_switches(4)
            .es_per_switch(1)
            .traffic(vec![TrafficType::builder()
                .name("a")
                .streams_per_es(1)
                .size((Bytes::new(100), Bytes::new(100)))
                .periods(vec![Microsecs::new(1000)])
                .deadline((Microsecs::new(1000), Microsecs::new(1000)))
                .build()])
            .build();
        let test_case = run(spec)?;

        let (switches, end_systems): (Vec<_>, Vec<_>) = test_case
            .devices
            .iter()
            .partition(|d| matches!(d.id, DeviceId::Switch(_)));
        assert_eq!(switches.len(), 4);
        assert_eq!(end_systems.len(), 4);
        // Each switch has one access port and two trunk ports.
        assert!(switches.iter().all(|d| d.nr_ports == 3));
        assert_eq!(test_case.links.len(), 8);
        assert_eq!(test_case.links.iter().filter(|l| l.is_trunk()).count(), 4);

        assert_eq!(test_case.streams.len(), 4);
        for stream in &test_case.streams {
            assert_ne!(stream.src, stream.dst);
            assert_eq!(stream.size, Bytes::new(100));
            assert_eq!(stream.period, Microsecs::new(1000));
            assert_eq!(stream.deadline, Microsecs::new(1000));
        }
        Ok(())
    }

    #[test]
    fn identical_seeds_produce_identical_test_cases() -> anyhow::Result<()> {
        let spec = testing::mesh_spec();
        let a = run(spec.clone())?;
        let b = run(spec)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn every_strategy_yields_a_connected_switch_fabric() -> anyhow::Result<()> {
        for kind in [
            GraphKind::Cycle,
            GraphKind::Path,
            GraphKind::Mesh,
            GraphKind::RandomGeometric,
            GraphKind::Binomial,
            GraphKind::ExpectedDegree,
        ] {
            let spec = Spec::builder()
                .graph(kind)
                .nr_switches(9)
                .es_per_switch(2)
                .seed(11)
                .build();
            let test_case = run(spec)?;
            assert!(
                switch_fabric_is_connected(&test_case),
                "{} fabric is disconnected",
                kind.as_str()
            );
        }
        Ok(())
    }

    #[test]
    fn stream_totals_follow_the_traffic_table() -> anyhow::Result<()> {
        let test_case = run(testing::mesh_spec())?;
        // 7 switches x 2 end systems, 1 + 2 streams per end system.
        assert_eq!(test_case.streams.len(), 14 * 3);
        Ok(())
    }

    #[test]
    fn invalid_specs_produce_no_output() {
        let spec = Spec::builder().nr_switches(0).es_per_switch(1).build();
        assert!(matches!(run(spec), Err(Error::InvalidSpec(_))));
    }
}
