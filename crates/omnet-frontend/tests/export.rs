use omnet_frontend::TsnExport;
use tsngen_core::{GraphKind, Spec, TrafficType};

fn test_case() -> tsngen_core::TestCase {
    let spec = Spec::builder()
        .graph(GraphKind::Cycle)
        .nr_switches(4)
        .es_per_switch(1)
        .traffic(vec![TrafficType::builder()
            .name("cdt")
            .streams_per_es(2)
            .build()])
        .seed(17)
        .build();
    tsngen_core::run(spec).expect("valid spec")
}

#[test]
fn export_writes_the_full_file_set() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    TsnExport::builder()
        .data_dir(dir.path())
        .test_case(test_case())
        .build()
        .write()?;
    for file in [
        "topology.csv",
        "streams.csv",
        "topology.dot",
        "Network.ned",
        "omnetpp.ini",
    ] {
        let contents = std::fs::read_to_string(dir.path().join(file))?;
        assert!(!contents.is_empty(), "{file} is empty");
    }
    Ok(())
}

#[test]
fn omnet_files_can_be_disabled() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    TsnExport::builder()
        .data_dir(dir.path())
        .test_case(test_case())
        .omnet_files(false)
        .build()
        .write()?;
    assert!(dir.path().join("topology.csv").exists());
    assert!(!dir.path().join("Network.ned").exists());
    assert!(!dir.path().join("omnetpp.ini").exists());
    Ok(())
}

#[test]
fn topology_csv_has_a_row_per_device_and_link() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let test_case = test_case();
    let nr_rows = test_case.devices.len() + test_case.links.len();
    TsnExport::builder()
        .data_dir(dir.path())
        .test_case(test_case)
        .build()
        .write()?;
    let contents = std::fs::read_to_string(dir.path().join("topology.csv"))?;
    assert_eq!(contents.lines().count(), nr_rows);
    Ok(())
}
