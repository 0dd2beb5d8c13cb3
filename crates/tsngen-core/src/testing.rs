use crate::network::graph::GraphKind;
use crate::spec::{Spec, TrafficType};
use crate::units::{Bytes, Microsecs};

pub(crate) fn isochronous() -> TrafficType {
    TrafficType::builder()
        .name("isochronous")
        .streams_per_es(1)
        .size((Bytes::new(100), Bytes::new(100)))
        .periods(vec![Microsecs::new(500), Microsecs::new(1000)])
        .deadline((Microsecs::new(500), Microsecs::new(2000)))
        .build()
}

pub(crate) fn best_effort() -> TrafficType {
    TrafficType::builder()
        .name("best_effort")
        .streams_per_es(2)
        .size((Bytes::new(100), Bytes::new(1500)))
        .build()
}

/// A truncated 3x3 mesh with uneven switch degrees and two traffic types.
pub(crate) fn mesh_spec() -> Spec {
    Spec::builder()
        .graph(GraphKind::Mesh)
        .nr_switches(7)
        .es_per_switch(2)
        .traffic(vec![isochronous(), best_effort()])
        .seed(3)
        .build()
}
