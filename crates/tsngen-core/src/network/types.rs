use crate::units::{Bytes, Microsecs};

identifier!(SwitchId, "Switch");
identifier!(EndSystemId, "ES");
identifier!(LinkId, "Link");
identifier!(StreamId, "Stream");

/// A device in the expanded topology, together with the number of Ethernet ports it exposes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub nr_ports: usize,
}

impl Device {
    pub fn new_switch(id: SwitchId, nr_ports: usize) -> Self {
        Self {
            id: DeviceId::Switch(id),
            nr_ports,
        }
    }

    /// End systems have exactly one uplink port.
    pub fn new_end_system(id: EndSystemId) -> Self {
        Self {
            id: DeviceId::EndSystem(id),
            nr_ports: 1,
        }
    }

    pub fn end_system_id(&self) -> Option<EndSystemId> {
        match self.id {
            DeviceId::EndSystem(id) => Some(id),
            DeviceId::Switch(_) => None,
        }
    }
}

/// Identifies a device. Switches and end systems are numbered independently; the two id spaces
/// never collide because the rendered names carry the device kind.
#[derive(
    Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum DeviceId {
    Switch(SwitchId),
    EndSystem(EndSystemId),
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceId::Switch(id) => id.fmt(f),
            DeviceId::EndSystem(id) => id.fmt(f),
        }
    }
}

impl From<SwitchId> for DeviceId {
    fn from(id: SwitchId) -> Self {
        Self::Switch(id)
    }
}

impl From<EndSystemId> for DeviceId {
    fn from(id: EndSystemId) -> Self {
        Self::EndSystem(id)
    }
}

/// A bidirectional channel between two device ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub a: DeviceId,
    pub port_a: usize,
    pub b: DeviceId,
    pub port_b: usize,
}

impl Link {
    pub fn new(
        id: LinkId,
        a: impl Into<DeviceId>,
        port_a: usize,
        b: impl Into<DeviceId>,
        port_b: usize,
    ) -> Self {
        Self {
            id,
            a: a.into(),
            port_a,
            b: b.into(),
            port_b,
        }
    }

    pub fn connects(&self, x: DeviceId, y: DeviceId) -> bool {
        self.a == x && self.b == y || self.a == y && self.b == x
    }

    /// Returns the port `id` occupies on this link, if the link touches it.
    pub fn port_of(&self, id: DeviceId) -> Option<usize> {
        if self.a == id {
            Some(self.port_a)
        } else if self.b == id {
            Some(self.port_b)
        } else {
            None
        }
    }

    /// A trunk link connects two switches; every other link is an access link.
    pub fn is_trunk(&self) -> bool {
        matches!(
            (self.a, self.b),
            (DeviceId::Switch(_), DeviceId::Switch(_))
        )
    }
}

/// A periodic unicast flow between two end systems.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stream {
    pub id: StreamId,
    /// IEEE 802.1Q priority code point, `0..=7`.
    pub pcp: u8,
    pub traffic_type: String,
    pub src: EndSystemId,
    pub dst: EndSystemId,
    pub size: Bytes,
    pub period: Microsecs,
    pub deadline: Microsecs,
}
