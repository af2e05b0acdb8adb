use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::error::PredictError;
use super::types::SatelliteState;
use crate::elements::ElementSet;

/// Wraps the SGP4 model for one element set. The element lines are parsed
/// once here; every evaluation reuses the derived constants.
pub struct Propagator {
    elements: Elements,
    constants: Constants,
}

impl Propagator {
    pub fn from_element_set(set: &ElementSet) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(
            Some(set.name.clone()),
            set.line1.as_bytes(),
            set.line2.as_bytes(),
        )?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            elements,
            constants,
        })
    }

    /// Element reference time.
    pub fn epoch(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.elements.datetime, Utc)
    }

    /// Inertial state at `timestamp`, past or future. Any nonzero model
    /// status surfaces as an error, never as a default vector; accuracy
    /// degradation far from the epoch is the caller's concern.
    pub fn state_at(&self, timestamp: DateTime<Utc>) -> Result<SatelliteState, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        if !finite(&prediction.position) || !finite(&prediction.velocity) {
            return Err(PredictError::Propagation(
                "model returned a non-finite state".to_string(),
            ));
        }

        Ok(SatelliteState {
            timestamp,
            position_km: prediction.position,
            velocity_km_s: prediction.velocity,
        })
    }
}

fn finite(v: &[f64; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iss_set() -> ElementSet {
        crate::elements::ElementSet::from_source_text(
            "ISS (ZARYA)\n\
             1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927\n\
             2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537\n",
        )
        .unwrap()
    }

    #[test]
    fn state_at_epoch_is_a_leo_radius() {
        let propagator = Propagator::from_element_set(&iss_set()).unwrap();
        let state = propagator.state_at(propagator.epoch()).unwrap();
        let r = state.position_km;
        let magnitude = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
        assert!(
            (6_600.0..7_000.0).contains(&magnitude),
            "|r| = {} km",
            magnitude
        );
    }

    #[test]
    fn velocity_is_orbital() {
        let propagator = Propagator::from_element_set(&iss_set()).unwrap();
        let state = propagator.state_at(propagator.epoch()).unwrap();
        let v = state.velocity_km_s;
        let speed = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((7.0..8.5).contains(&speed), "|v| = {} km/s", speed);
    }

    #[test]
    fn parsing_cost_is_paid_once() {
        let propagator = Propagator::from_element_set(&iss_set()).unwrap();
        let epoch = propagator.epoch();
        // Repeated evaluations against the same adapter instance.
        for minutes in 0..5 {
            let t = epoch + chrono::Duration::minutes(minutes);
            propagator.state_at(t).unwrap();
        }
    }
}
