//! The `omnetpp.ini` emitter. The layout follows the INET asynchronous-shaper showcase
//! configurations: a fixed general/visualizer preamble, per-end-system UDP apps derived from
//! the generated streams, the stream identification table, and the shaper boilerplate.

use std::fmt::Write;

use rustc_hash::FxHashMap;
use tsngen_core::{Device, EndSystemId, Stream};

const GENERAL: &str = r#"[General]
network = tsn.TSN_Network
sim-time-limit = 1.0s

# enable multiple canvas visualizers
*.visualizer.typename = "IntegratedMultiCanvasVisualizer"

# network route activity visualization
*.visualizer.numNetworkRouteVisualizers = 1
*.visualizer.networkRouteVisualizer[*].displayRoutes = true
*.visualizer.networkRouteVisualizer[0].packetFilter = "\"ats*\""
*.visualizer.networkRouteVisualizer[0].lineColor = "red1"

*.*.eth[*].bitrate = 1Gbps

# packet processing delay
*.*.bridging.directionReverser.delayer.typename = "PacketDelayer"
*.*.bridging.directionReverser.delayer.delay = 8us
"#;

/// Everything below the stream identification table is independent of the generated streams.
const SHAPING: &str = r#"
*.ES*.bridging.streamFilter.ingress.classifier.mapping = { "ats-p0": 0, "ats-p1": 1, "ats-p2": 2, "ats-p3": 3, "ats-p4": 4, "ats-p5": 5, "ats-p6": 6, "ats-p7": 7 }
*.ES*.eth[*].macLayer.queue.numTrafficClasses = 8
*.ES*.eth[*].macLayer.queue.numQueues = 8
*.ES*.eth[*].macLayer.queue.*[0].display-name = "ats-p0"
*.ES*.eth[*].macLayer.queue.*[1].display-name = "ats-p1"
*.ES*.eth[*].macLayer.queue.*[2].display-name = "ats-p2"
*.ES*.eth[*].macLayer.queue.*[3].display-name = "ats-p3"
*.ES*.eth[*].macLayer.queue.*[4].display-name = "ats-p4"
*.ES*.eth[*].macLayer.queue.*[5].display-name = "ats-p5"
*.ES*.eth[*].macLayer.queue.*[6].display-name = "ats-p6"
*.ES*.eth[*].macLayer.queue.*[7].display-name = "ats-p7"

# client stream encoding
*.ES*.bridging.streamCoder.encoder.mapping = [{stream: "ats-p0", pcp: 0}, {stream: "ats-p1", pcp: 1}, {stream: "ats-p2", pcp: 2}, {stream: "ats-p3", pcp: 3}, {stream: "ats-p4", pcp: 4}, {stream: "ats-p5", pcp: 5}, {stream: "ats-p6", pcp: 6}, {stream: "ats-p7", pcp: 7}]

# enable streams
*.Switch*.hasIncomingStreams = true
*.Switch*.hasOutgoingStreams = true
*.ES*.hasIncomingStreams = true
*.ES*.hasOutgoingStreams = true

# stream coder mappings for switches
*.Switch*.bridging.streamCoder.encoder.mapping = [{stream: "ats-p0", pcp: 0}, {stream: "ats-p1", pcp: 1}, {stream: "ats-p2", pcp: 2}, {stream: "ats-p3", pcp: 3}, {stream: "ats-p4", pcp: 4}, {stream: "ats-p5", pcp: 5}, {stream: "ats-p6", pcp: 6}, {stream: "ats-p7", pcp: 7}]
*.Switch*.bridging.streamCoder.decoder.mapping = [{stream: "ats-p0", pcp: 0}, {stream: "ats-p1", pcp: 1}, {stream: "ats-p2", pcp: 2}, {stream: "ats-p3", pcp: 3}, {stream: "ats-p4", pcp: 4}, {stream: "ats-p5", pcp: 5}, {stream: "ats-p6", pcp: 6}, {stream: "ats-p7", pcp: 7}]
*.Switch*.eth[*].macLayer.queue.classifier.mapping = [[0,0,0,0,0,0,0,0], [1,1,1,1,1,1,1,1], [2,2,2,2,2,2,2,2], [3,3,3,3,3,3,3,3], [4,4,4,4,4,4,4,4], [5,5,5,5,5,5,5,5], [6,6,6,6,6,6,6,6], [7,7,7,7,7,7,7,7]]

# enable ingress per-stream filtering
*.Switch*.hasIngressTrafficFiltering = true

# enable egress traffic shaping
*.*.hasEgressTrafficShaping = true

# asynchronous shaper traffic metering
*.Switch*.bridging.streamFilter.ingress.numStreams = 8
*.Switch*.bridging.streamFilter.ingress.classifier.mapping = { "ats-p0": 0, "ats-p1": 1, "ats-p2": 2, "ats-p3": 3, "ats-p4": 4, "ats-p5": 5, "ats-p6": 6, "ats-p7": 7 }
*.Switch*.bridging.streamFilter.ingress.*[0].display-name = "ats-p0"
*.Switch*.bridging.streamFilter.ingress.*[1].display-name = "ats-p1"
*.Switch*.bridging.streamFilter.ingress.*[2].display-name = "ats-p2"
*.Switch*.bridging.streamFilter.ingress.*[3].display-name = "ats-p3"
*.Switch*.bridging.streamFilter.ingress.*[4].display-name = "ats-p4"
*.Switch*.bridging.streamFilter.ingress.*[5].display-name = "ats-p5"
*.Switch*.bridging.streamFilter.ingress.*[6].display-name = "ats-p6"
*.Switch*.bridging.streamFilter.ingress.*[7].display-name = "ats-p7"
*.Switch*.bridging.streamFilter.ingress.meter[*].typename = "EligibilityTimeMeter"
*.Switch*.bridging.streamFilter.ingress.filter[*].typename = "EligibilityTimeFilter"

*.Switch*.bridging.streamFilter.ingress.meter[0].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[0].committedBurstSize = 500B
*.Switch*.bridging.streamFilter.ingress.meter[1].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[1].committedBurstSize = 500B
*.Switch*.bridging.streamFilter.ingress.meter[2].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[2].committedBurstSize = 500B
*.Switch*.bridging.streamFilter.ingress.meter[3].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[3].committedBurstSize = 500B
*.Switch*.bridging.streamFilter.ingress.meter[4].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[4].committedBurstSize = 500B
*.Switch*.bridging.streamFilter.ingress.meter[5].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[5].committedBurstSize = 500B
*.Switch*.bridging.streamFilter.ingress.meter[6].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[6].committedBurstSize = 500B
*.Switch*.bridging.streamFilter.ingress.meter[7].committedInformationRate = 100Mbps
*.Switch*.bridging.streamFilter.ingress.meter[7].committedBurstSize = 500B

# asynchronous traffic shaping
*.Switch*.eth[*].macLayer.queue.numTrafficClasses = 8
*.Switch*.eth[*].macLayer.queue.numQueues = 8
*.Switch*.eth[*].macLayer.queue.*[0].display-name = "ats-p0"
*.Switch*.eth[*].macLayer.queue.*[1].display-name = "ats-p1"
*.Switch*.eth[*].macLayer.queue.*[2].display-name = "ats-p2"
*.Switch*.eth[*].macLayer.queue.*[3].display-name = "ats-p3"
*.Switch*.eth[*].macLayer.queue.*[4].display-name = "ats-p4"
*.Switch*.eth[*].macLayer.queue.*[5].display-name = "ats-p5"
*.Switch*.eth[*].macLayer.queue.*[6].display-name = "ats-p6"
*.Switch*.eth[*].macLayer.queue.*[7].display-name = "ats-p7"
*.Switch*.eth[*].macLayer.queue.queue[*].typename = "EligibilityTimeQueue"
*.Switch*.eth[*].macLayer.queue.transmissionSelectionAlgorithm[*].typename = "Ieee8021qAsynchronousShaper"
"#;

pub(crate) fn translate_ini(devices: &[Device], streams: &[Stream]) -> String {
    let end_systems = devices
        .iter()
        .filter_map(Device::end_system_id)
        .collect::<Vec<_>>();

    // UDP destination ports are allotted to streams in generation order, starting at 1.
    let port_of = streams
        .iter()
        .enumerate()
        .map(|(i, stream)| (stream.id, i + 1))
        .collect::<FxHashMap<_, _>>();

    let mut sourced: FxHashMap<EndSystemId, Vec<&Stream>> = FxHashMap::default();
    let mut received: FxHashMap<EndSystemId, Vec<&Stream>> = FxHashMap::default();
    for stream in streams {
        sourced.entry(stream.src).or_default().push(stream);
        received.entry(stream.dst).or_default().push(stream);
    }
    let apps_of = |map: &FxHashMap<EndSystemId, Vec<&Stream>>, es: EndSystemId| {
        map.get(&es).map(Vec::len).unwrap_or(0)
    };

    let mut s = String::new();
    s.push_str(GENERAL);
    writeln!(s).unwrap();

    for &es in &end_systems {
        let nr_apps = apps_of(&sourced, es) + apps_of(&received, es);
        writeln!(s, "*.{es}.numApps = {nr_apps}").unwrap();
    }

    // Sources come first on every end system, then sinks.
    let mut ports_by_pcp: [Vec<usize>; 8] = Default::default();
    for &es in &end_systems {
        let mut app = 0;
        if let Some(streams) = sourced.get(&es) {
            let indices = app_indices(app, streams.len());
            writeln!(s, "*.{es}.app{indices}.typename = \"UdpSourceApp\"").unwrap();
            for stream in streams {
                let port = port_of[&stream.id];
                ports_by_pcp[stream.pcp as usize].push(port);
                writeln!(s, "*.{es}.app[{app}].display-name = \"ats-p{}\"", stream.pcp).unwrap();
                writeln!(s, "*.{es}.app[{app}].io.destAddress = \"{}\"", stream.dst).unwrap();
                writeln!(s, "*.{es}.app[{app}].io.destPort = {port}").unwrap();
                writeln!(s, "*.{es}.app[{app}].source.productionInterval = {}", stream.period)
                    .unwrap();
                writeln!(
                    s,
                    "*.{es}.app[{app}].source.initialProductionOffset = {}",
                    stream.period
                )
                .unwrap();
                writeln!(s, "*.{es}.app[{app}].source.packetLength = {}", stream.size).unwrap();
                app += 1;
            }
        }
        if let Some(streams) = received.get(&es) {
            let indices = app_indices(app, streams.len());
            writeln!(s, "*.{es}.app{indices}.typename = \"UdpSinkApp\"").unwrap();
            for stream in streams {
                writeln!(s, "*.{es}.app[{app}].io.localPort = {}", port_of[&stream.id]).unwrap();
                app += 1;
            }
        }
    }

    writeln!(s).unwrap();
    writeln!(s, r#"*.ES*.hasUdp = firstAvailableOrEmpty("Udp") != """#).unwrap();
    writeln!(s).unwrap();
    writeln!(s, "# steering stream identification and coding").unwrap();
    writeln!(
        s,
        "*.ES*.bridging.streamIdentifier.identifier.mapping = {}",
        identifier_mapping(&ports_by_pcp)
    )
    .unwrap();
    s.push_str(SHAPING);
    s
}

fn app_indices(first: usize, nr_apps: usize) -> String {
    if nr_apps > 1 {
        format!("[{}..{}]", first, first + nr_apps - 1)
    } else {
        format!("[{first}]")
    }
}

/// Streams are identified on their source by UDP destination port and steered into the
/// `ats-p<pcp>` stream of their priority.
fn identifier_mapping(ports_by_pcp: &[Vec<usize>; 8]) -> String {
    let entries = ports_by_pcp
        .iter()
        .enumerate()
        .filter(|(_, ports)| !ports.is_empty())
        .map(|(pcp, ports)| {
            let filter = ports
                .iter()
                .map(|port| format!("udp.destPort == {port}"))
                .collect::<Vec<_>>()
                .join(" || ");
            format!("{{stream: \"ats-p{pcp}\", packetFilter: expr({filter})}}")
        })
        .collect::<Vec<_>>();
    format!("[{}]", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn translate_ini_correct() {
        let case = testing::single_switch_case();
        let s = translate_ini(&case.devices, &case.streams);
        // The tail of the file carries no generated content; snapshot everything above it.
        let generated = s.strip_suffix(SHAPING).unwrap();
        insta::assert_snapshot!(generated, @r###"
        [General]
        network = tsn.TSN_Network
        sim-time-limit = 1.0s

        # enable multiple canvas visualizers
        *.visualizer.typename = "IntegratedMultiCanvasVisualizer"

        # network route activity visualization
        *.visualizer.numNetworkRouteVisualizers = 1
        *.visualizer.networkRouteVisualizer[*].displayRoutes = true
        *.visualizer.networkRouteVisualizer[0].packetFilter = "\"ats*\""
        *.visualizer.networkRouteVisualizer[0].lineColor = "red1"

        *.*.eth[*].bitrate = 1Gbps

        # packet processing delay
        *.*.bridging.directionReverser.delayer.typename = "PacketDelayer"
        *.*.bridging.directionReverser.delayer.delay = 8us

        *.ES_1.numApps = 2
        *.ES_2.numApps = 2
        *.ES_1.app[0].typename = "UdpSourceApp"
        *.ES_1.app[0].display-name = "ats-p5"
        *.ES_1.app[0].io.destAddress = "ES_2"
        *.ES_1.app[0].io.destPort = 1
        *.ES_1.app[0].source.productionInterval = 1000us
        *.ES_1.app[0].source.initialProductionOffset = 1000us
        *.ES_1.app[0].source.packetLength = 100B
        *.ES_1.app[1].typename = "UdpSinkApp"
        *.ES_1.app[1].io.localPort = 2
        *.ES_2.app[0].typename = "UdpSourceApp"
        *.ES_2.app[0].display-name = "ats-p0"
        *.ES_2.app[0].io.destAddress = "ES_1"
        *.ES_2.app[0].io.destPort = 2
        *.ES_2.app[0].source.productionInterval = 500us
        *.ES_2.app[0].source.initialProductionOffset = 500us
        *.ES_2.app[0].source.packetLength = 200B
        *.ES_2.app[1].typename = "UdpSinkApp"
        *.ES_2.app[1].io.localPort = 1

        *.ES*.hasUdp = firstAvailableOrEmpty("Udp") != ""

        # steering stream identification and coding
        *.ES*.bridging.streamIdentifier.identifier.mapping = [{stream: "ats-p0", packetFilter: expr(udp.destPort == 2)}, {stream: "ats-p5", packetFilter: expr(udp.destPort == 1)}]
        "###);
    }

    #[test]
    fn app_index_ranges_collapse_singletons() {
        assert_eq!(app_indices(0, 1), "[0]");
        assert_eq!(app_indices(1, 3), "[1..3]");
        assert_eq!(app_indices(2, 2), "[2..3]");
    }
}
