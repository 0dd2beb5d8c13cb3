//! Emitters for the file formats a TSN simulation campaign consumes: the `topology.csv` /
//! `streams.csv` pair, the OMNeT++ `Network.ned` and `omnetpp.ini` files, and a Graphviz
//! rendering of the device graph.
//!
//! This crate is tightly coupled to the formats expected by the INET TSN models.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

use petgraph::dot::{Config, Dot};
use petgraph::graph::UnGraph;
use rustc_hash::FxHashMap;
use tsngen_core::{Device, DeviceId, Link, Stream, TestCase};

mod ini;

/// Writes a generated test case to disk in the form a simulation campaign consumes.
#[derive(Debug, typed_builder::TypedBuilder)]
pub struct TsnExport {
    /// The directory in which to write the generated files.
    #[builder(setter(into))]
    pub data_dir: PathBuf,
    /// The test case to export.
    pub test_case: TestCase,
    /// Whether to emit the OMNeT++ `Network.ned` and `omnetpp.ini` files.
    #[builder(default = true)]
    pub omnet_files: bool,
}

impl TsnExport {
    /// Writes `topology.csv`, `streams.csv`, `topology.dot`, and (when enabled) `Network.ned`
    /// and `omnetpp.ini` into the data directory, creating it if necessary.
    pub fn write(&self) -> Result<(), Error> {
        let mk_path = |file: &str| self.data_dir.join(file);
        fs::create_dir_all(&self.data_dir)?;
        let TestCase {
            devices,
            links,
            streams,
        } = &self.test_case;
        fs::write(mk_path("topology.csv"), translate_topology(devices, links)?)?;
        fs::write(mk_path("streams.csv"), translate_streams(streams)?)?;
        fs::write(mk_path("topology.dot"), translate_dot(devices, links))?;
        if self.omnet_files {
            fs::write(mk_path("Network.ned"), translate_ned(devices, links))?;
            fs::write(mk_path("omnetpp.ini"), ini::translate_ini(devices, streams))?;
        }
        Ok(())
    }
}

/// The error type for [`TsnExport::write`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error assembling CSV rows.
    #[error("failed to write CSV")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn translate_topology(devices: &[Device], links: &[Link]) -> Result<String, Error> {
    // Device rows carry three fields, link rows six.
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);
    for device in devices {
        let kind = match device.id {
            DeviceId::Switch(_) => "SW",
            DeviceId::EndSystem(_) => "ES",
        };
        wtr.write_record([
            kind.to_owned(),
            device.id.to_string(),
            device.nr_ports.to_string(),
        ])?;
    }
    for link in links {
        wtr.write_record([
            "LINK".to_owned(),
            link.id.to_string(),
            link.a.to_string(),
            link.port_a.to_string(),
            link.b.to_string(),
            link.port_b.to_string(),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner().unwrap()).unwrap())
}

fn translate_streams(streams: &[Stream]) -> Result<String, Error> {
    // pcp, name, type, source, destination, size (B), period (us), deadline (us)
    let mut wtr = csv::Writer::from_writer(vec![]);
    for stream in streams {
        wtr.write_record([
            stream.pcp.to_string(),
            stream.id.to_string(),
            stream.traffic_type.clone(),
            stream.src.to_string(),
            stream.dst.to_string(),
            stream.size.into_u64().to_string(),
            stream.period.into_u64().to_string(),
            stream.deadline.into_u64().to_string(),
        ])?;
    }
    Ok(String::from_utf8(wtr.into_inner().unwrap()).unwrap())
}

fn translate_ned(devices: &[Device], links: &[Link]) -> String {
    let mut s = String::new();
    writeln!(s, "package tsn;").unwrap();
    writeln!(s).unwrap();
    writeln!(s, "import inet.networks.base.TsnNetworkBase;").unwrap();
    writeln!(s, "import inet.node.ethernet.Eth1G;").unwrap();
    writeln!(s, "import inet.node.tsn.TsnDevice;").unwrap();
    writeln!(s, "import inet.node.tsn.TsnSwitch;").unwrap();
    writeln!(s).unwrap();
    writeln!(s, "network TSN_Network extends TsnNetworkBase {{").unwrap();
    writeln!(s, "    @display(\"bgb=1000,1000\");").unwrap();
    writeln!(s, "    submodules:").unwrap();
    for device in devices {
        let module = match device.id {
            DeviceId::Switch(_) => "TsnSwitch",
            DeviceId::EndSystem(_) => "TsnDevice",
        };
        writeln!(s, "        {}: {module} {{}}", device.id).unwrap();
    }
    writeln!(s, "    connections:").unwrap();
    for link in links {
        writeln!(s, "        {}.ethg++ <--> Eth1G <--> {}.ethg++;", link.a, link.b).unwrap();
    }
    writeln!(s, "}}").unwrap();
    s
}

fn translate_dot(devices: &[Device], links: &[Link]) -> String {
    let mut g = UnGraph::<String, String>::new_undirected();
    let indices = devices
        .iter()
        .map(|d| (d.id, g.add_node(d.id.to_string())))
        .collect::<FxHashMap<_, _>>();
    for link in links {
        g.add_edge(indices[&link.a], indices[&link.b], String::new());
    }
    format!("{}", Dot::with_config(&g, &[Config::EdgeNoLabel]))
}
