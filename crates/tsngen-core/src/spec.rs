//! Generator specifications ([`Spec`]): the network shape plus the traffic-type table. A `Spec`
//! is validated as a whole before any synthesis output exists — generation never produces a
//! partial result from a bad configuration.

use crate::network::graph::GraphKind;
use crate::units::{Bytes, Microsecs};

/// A generator specification.
#[derive(Debug, Clone, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize)]
pub struct Spec {
    /// The switch-graph construction strategy.
    #[builder(default)]
    #[serde(default)]
    pub graph: GraphKind,
    /// Number of switches.
    pub nr_switches: usize,
    /// Number of end systems attached to every switch.
    pub es_per_switch: usize,
    /// Traffic types, in configuration order.
    #[builder(default)]
    #[serde(default)]
    pub traffic: Vec<TrafficType>,
    /// Seed for the injected RNG. A fixed seed and configuration yield a byte-identical test
    /// case.
    #[builder(default)]
    #[serde(default)]
    pub seed: u64,
}

impl Spec {
    /// Validate a specification, producing a `ValidSpec`.
    ///
    /// Correctness properties:
    ///
    /// - There is at least one switch.
    /// - Every explicit parameter range has `min <= max`, and period sets are non-empty.
    /// - There are at least two end systems whenever a traffic type requests streams.
    pub(crate) fn validate(self) -> Result<ValidSpec, SpecError> {
        if self.nr_switches == 0 {
            return Err(SpecError::NoSwitches);
        }
        for tt in &self.traffic {
            tt.validate()?;
        }
        // CORRECTNESS: destination sampling draws from the end systems minus the source.
        let nr_end_systems = self.nr_switches * self.es_per_switch;
        if nr_end_systems < 2 && self.traffic.iter().any(|tt| tt.streams_per_es > 0) {
            return Err(SpecError::TooFewEndSystems { nr_end_systems });
        }
        Ok(ValidSpec {
            graph: self.graph,
            nr_switches: self.nr_switches,
            es_per_switch: self.es_per_switch,
            traffic: self.traffic,
            seed: self.seed,
        })
    }
}

/// A named traffic class: how many streams every end system sources, and the ranges their
/// parameters are drawn from. Omitted ranges fall back to the type defaults — size
/// `[100, 100]`, period set `{1000}`, deadline `[period, 2 * period]` of the sampled period.
#[derive(
    Debug, Clone, PartialEq, Eq, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize,
)]
pub struct TrafficType {
    #[builder(setter(into))]
    pub name: String,
    /// Streams sourced by every end system.
    pub streams_per_es: usize,
    /// Inclusive frame-size bounds, in bytes.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub size: Option<(Bytes, Bytes)>,
    /// The discrete set of allowed periods.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub periods: Option<Vec<Microsecs>>,
    /// Inclusive deadline bounds.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub deadline: Option<(Microsecs, Microsecs)>,
}

impl TrafficType {
    fn validate(&self) -> Result<(), SpecError> {
        if let Some((min, max)) = self.size {
            if min > max {
                return Err(SpecError::MalformedSizeRange {
                    traffic_type: self.name.clone(),
                    min,
                    max,
                });
            }
        }
        if matches!(&self.periods, Some(periods) if periods.is_empty()) {
            return Err(SpecError::EmptyPeriodSet {
                traffic_type: self.name.clone(),
            });
        }
        if let Some((min, max)) = self.deadline {
            if min > max {
                return Err(SpecError::MalformedDeadlineRange {
                    traffic_type: self.name.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// A `ValidSpec` is a `Spec` that has been validated. Synthesis relies on the properties
/// listed in `Spec::validate()` and never re-checks them.
#[derive(Debug)]
pub(crate) struct ValidSpec {
    pub(crate) graph: GraphKind,
    pub(crate) nr_switches: usize,
    pub(crate) es_per_switch: usize,
    pub(crate) traffic: Vec<TrafficType>,
    pub(crate) seed: u64,
}

/// Specification error.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The strategy name is not recognized.
    #[error("unknown graph kind: {0}")]
    UnknownGraphKind(String),

    /// The topology must contain at least one switch.
    #[error("the topology needs at least one switch")]
    NoSwitches,

    /// A size range with `min > max`.
    #[error("traffic type {traffic_type} has a malformed size range [{min}, {max}]")]
    MalformedSizeRange {
        /// The offending traffic type.
        traffic_type: String,
        /// The lower bound.
        min: Bytes,
        /// The upper bound.
        max: Bytes,
    },

    /// A deadline range with `min > max`.
    #[error("traffic type {traffic_type} has a malformed deadline range [{min}, {max}]")]
    MalformedDeadlineRange {
        /// The offending traffic type.
        traffic_type: String,
        /// The lower bound.
        min: Microsecs,
        /// The upper bound.
        max: Microsecs,
    },

    /// An explicitly empty period set.
    #[error("traffic type {traffic_type} has an empty period set")]
    EmptyPeriodSet {
        /// The offending traffic type.
        traffic_type: String,
    },

    /// Streams are requested but there are not enough end systems to pick distinct sources
    /// and destinations.
    #[error("streams need at least two end systems (topology has {nr_end_systems})")]
    TooFewEndSystems {
        /// End systems the topology would contain.
        nr_end_systems: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn valid_spec_succeeds() {
        assert!(testing::mesh_spec().validate().is_ok());
    }

    #[test]
    fn no_switches_fails() {
        let spec = Spec::builder().nr_switches(0).es_per_switch(3).build();
        assert!(matches!(spec.validate(), Err(SpecError::NoSwitches)));
    }

    #[test]
    fn malformed_size_range_fails() {
        let mut spec = testing::mesh_spec();
        spec.traffic[0].size = Some((Bytes::new(200), Bytes::new(100)));
        assert!(matches!(
            spec.validate(),
            Err(SpecError::MalformedSizeRange { .. })
        ));
    }

    #[test]
    fn malformed_deadline_range_fails() {
        let mut spec = testing::mesh_spec();
        spec.traffic[0].deadline = Some((Microsecs::new(2000), Microsecs::new(1000)));
        assert!(matches!(
            spec.validate(),
            Err(SpecError::MalformedDeadlineRange { .. })
        ));
    }

    #[test]
    fn empty_period_set_fails() {
        let mut spec = testing::mesh_spec();
        spec.traffic[0].periods = Some(Vec::new());
        assert!(matches!(
            spec.validate(),
            Err(SpecError::EmptyPeriodSet { .. })
        ));
    }

    #[test]
    fn streams_without_end_systems_fail() {
        let spec = Spec::builder()
            .nr_switches(4)
            .es_per_switch(0)
            .traffic(vec![testing::isochronous()])
            .build();
        assert!(matches!(
            spec.validate(),
            Err(SpecError::TooFewEndSystems { nr_end_systems: 0 })
        ));
    }

    #[test]
    fn a_single_end_system_cannot_source_streams() {
        let spec = Spec::builder()
            .nr_switches(1)
            .es_per_switch(1)
            .traffic(vec![testing::isochronous()])
            .build();
        assert!(matches!(
            spec.validate(),
            Err(SpecError::TooFewEndSystems { nr_end_systems: 1 })
        ));
    }

    #[test]
    fn streamless_specs_allow_tiny_topologies() {
        let mut tt = testing::isochronous();
        tt.streams_per_es = 0;
        let spec = Spec::builder()
            .nr_switches(1)
            .es_per_switch(0)
            .traffic(vec![tt])
            .build();
        assert!(spec.validate().is_ok());
    }
}
