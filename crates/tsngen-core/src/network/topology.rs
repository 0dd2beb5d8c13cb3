//! Expansion of a switch-level graph into the device/link model handed to the serialization
//! frontends.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::network::graph::SwitchGraph;
use crate::network::types::{Device, EndSystemId, Link, LinkId, SwitchId};

/// The expanded device/link model. Devices are ordered switches first, then end systems grouped
/// by their switch; links are ordered access links first, then trunks in graph-edge order.
#[derive(Debug, Clone)]
pub(crate) struct Topology {
    pub(crate) devices: Vec<Device>,
    pub(crate) links: Vec<Link>,
}

impl Topology {
    /// Expands `graph` deterministically: walking its nodes and edges in a fixed order yields
    /// stable device identifiers and collision-free port numbers.
    pub(crate) fn from_graph(graph: &SwitchGraph, es_per_switch: usize) -> Self {
        let switch_id = |idx: NodeIndex| SwitchId::new(idx.index() + 1);

        // A switch needs one port per attached end system plus one per incident trunk link.
        let mut devices = graph
            .node_indices()
            .map(|idx| Device::new_switch(switch_id(idx), es_per_switch + graph.edges(idx).count()))
            .collect::<Vec<_>>();
        let mut links = Vec::new();

        // End systems take access ports 1..=es_per_switch on their switch and their only port
        // on the other side. Their identifiers are global, not per switch.
        let mut nr_end_systems = 0;
        for idx in graph.node_indices() {
            for port in 1..=es_per_switch {
                nr_end_systems += 1;
                let es = EndSystemId::new(nr_end_systems);
                devices.push(Device::new_end_system(es));
                links.push(Link::new(LinkId::new(links.len() + 1), es, 1, switch_id(idx), port));
            }
        }

        // Trunk ports continue where the access ports stop; each switch allocates them in the
        // order its edges are visited.
        let mut nr_trunks = vec![0; graph.node_count()];
        for edge in graph.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            let port_a = es_per_switch + nr_trunks[a.index()] + 1;
            let port_b = es_per_switch + nr_trunks[b.index()] + 1;
            nr_trunks[a.index()] += 1;
            nr_trunks[b.index()] += 1;
            links.push(Link::new(
                LinkId::new(links.len() + 1),
                switch_id(a),
                port_a,
                switch_id(b),
                port_b,
            ));
        }

        Self { devices, links }
    }
}
