use chrono::{DateTime, Duration, Utc};

use super::error::PredictError;
use super::frame::to_geodetic;
use super::propagator::Propagator;
use super::types::{GeodeticPoint, SatelliteState};

pub const DEFAULT_HORIZON_SECONDS: i64 = 5400;
pub const DEFAULT_STEP_SECONDS: i64 = 60;

type Sampler<'a> = Box<dyn Fn(DateTime<Utc>) -> Result<SatelliteState, PredictError> + 'a>;

/// Lazy, horizon-inclusive sequence of predicted ground-track points at
/// `start, start+step, ..., start+horizon`. Samples whose propagation
/// fails are skipped, so the sequence may run shorter than
/// `horizon / step + 1`. Building a new iterator from the same inputs
/// replays the sequence.
pub struct GroundTrack<'a> {
    sample: Sampler<'a>,
    cursor: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    step: Duration,
}

impl<'a> GroundTrack<'a> {
    /// Parameter validation happens here, before any propagation.
    pub fn new(
        propagator: &'a Propagator,
        start: DateTime<Utc>,
        horizon_seconds: i64,
        step_seconds: i64,
    ) -> Result<Self, PredictError> {
        Self::with_sampler(
            Box::new(move |t| propagator.state_at(t)),
            start,
            horizon_seconds,
            step_seconds,
        )
    }

    fn with_sampler(
        sample: Sampler<'a>,
        start: DateTime<Utc>,
        horizon_seconds: i64,
        step_seconds: i64,
    ) -> Result<Self, PredictError> {
        if step_seconds <= 0 {
            return Err(PredictError::InvalidParameter("step_seconds must be positive"));
        }
        if horizon_seconds < 0 {
            return Err(PredictError::InvalidParameter(
                "horizon_seconds must be non-negative",
            ));
        }

        // Caller-supplied values; checked arithmetic keeps extreme inputs
        // an error instead of a panic.
        let step = Duration::try_seconds(step_seconds)
            .ok_or(PredictError::InvalidParameter("step_seconds out of range"))?;
        let end = Duration::try_seconds(horizon_seconds)
            .and_then(|horizon| start.checked_add_signed(horizon))
            .ok_or(PredictError::InvalidParameter("horizon_seconds out of range"))?;

        Ok(Self {
            sample,
            cursor: Some(start),
            end,
            step,
        })
    }
}

impl Iterator for GroundTrack<'_> {
    type Item = GeodeticPoint;

    fn next(&mut self) -> Option<GeodeticPoint> {
        while let Some(timestamp) = self.cursor {
            if timestamp > self.end {
                self.cursor = None;
                break;
            }
            // A step past the representable time range ends the sequence.
            self.cursor = timestamp.checked_add_signed(self.step);
            match (self.sample)(timestamp) {
                Ok(state) => return Some(to_geodetic(state.position_km, state.timestamp)),
                Err(e) => {
                    log::debug!("dropping ground-track sample at {}: {}", timestamp, e);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::elements::ElementSet;

    fn iss_propagator() -> Propagator {
        let set = ElementSet::from_source_text(
            "ISS (ZARYA)\n\
             1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927\n\
             2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537\n",
        )
        .unwrap();
        Propagator::from_element_set(&set).unwrap()
    }

    fn synthetic_state(t: DateTime<Utc>) -> SatelliteState {
        SatelliteState {
            timestamp: t,
            position_km: [6778.0, 0.0, 0.0],
            velocity_km_s: [0.0, 7.67, 0.0],
        }
    }

    #[test]
    fn zero_horizon_yields_exactly_one_sample() {
        let propagator = iss_propagator();
        let start = propagator.epoch();
        let points: Vec<_> = GroundTrack::new(&propagator, start, 0, 60).unwrap().collect();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].timestamp, start);
    }

    #[test]
    fn horizon_boundary_is_inclusive() {
        let propagator = iss_propagator();
        let start = propagator.epoch();
        let points: Vec<_> = GroundTrack::new(&propagator, start, 120, 60)
            .unwrap()
            .collect();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2].timestamp, start + Duration::seconds(120));
    }

    #[test]
    fn samples_are_time_ordered() {
        let propagator = iss_propagator();
        let start = propagator.epoch();
        let points: Vec<_> = GroundTrack::new(&propagator, start, 600, 60)
            .unwrap()
            .collect();
        assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn failed_samples_are_dropped_and_the_sequence_continues() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let failing = start + Duration::seconds(120);

        let track = GroundTrack::with_sampler(
            Box::new(move |t| {
                if t == failing {
                    Err(PredictError::Propagation("orbit decayed".to_string()))
                } else {
                    Ok(synthetic_state(t))
                }
            }),
            start,
            240,
            60,
        )
        .unwrap();

        let points: Vec<_> = track.collect();
        // Five slots, one dropped; the sequence runs on past the failure.
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.timestamp != failing));
        assert_eq!(
            points.last().unwrap().timestamp,
            start + Duration::seconds(240)
        );
    }

    #[test]
    fn all_samples_failing_yields_an_empty_sequence() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let track = GroundTrack::with_sampler(
            Box::new(|_| Err(PredictError::Propagation("orbit decayed".to_string()))),
            start,
            240,
            60,
        )
        .unwrap();
        assert_eq!(track.count(), 0);
    }

    #[test]
    fn non_positive_step_is_rejected_up_front() {
        let propagator = iss_propagator();
        let start = propagator.epoch();
        assert!(matches!(
            GroundTrack::new(&propagator, start, 5400, 0),
            Err(PredictError::InvalidParameter(_))
        ));
        assert!(matches!(
            GroundTrack::new(&propagator, start, 5400, -60),
            Err(PredictError::InvalidParameter(_))
        ));
    }

    #[test]
    fn negative_horizon_is_rejected() {
        let propagator = iss_propagator();
        let start = propagator.epoch();
        assert!(matches!(
            GroundTrack::new(&propagator, start, -1, 60),
            Err(PredictError::InvalidParameter(_))
        ));
    }

    #[test]
    fn extreme_horizon_or_step_is_an_error_not_a_panic() {
        let propagator = iss_propagator();
        let start = propagator.epoch();
        assert!(matches!(
            GroundTrack::new(&propagator, start, i64::MAX, 60),
            Err(PredictError::InvalidParameter(_))
        ));
        assert!(matches!(
            GroundTrack::new(&propagator, start, 5400, i64::MAX),
            Err(PredictError::InvalidParameter(_))
        ));
        // Within Duration range but past the representable calendar.
        assert!(matches!(
            GroundTrack::new(&propagator, start, 9_000_000_000_000_000, 60),
            Err(PredictError::InvalidParameter(_))
        ));
    }

    #[test]
    fn validation_runs_before_any_sampling() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let result = GroundTrack::with_sampler(
            Box::new(|_| unreachable!("sampler must not run for rejected parameters")),
            start,
            5400,
            0,
        );
        assert!(matches!(result, Err(PredictError::InvalidParameter(_))));
    }

    #[test]
    fn ground_track_stays_within_orbit_bounds() {
        let propagator = iss_propagator();
        let start = propagator.epoch();
        for point in GroundTrack::new(&propagator, start, 5400, 60).unwrap() {
            // Inclination 51.6 degrees bounds the ground track latitude.
            assert!(point.latitude_deg.abs() <= 52.0);
            assert!((-180.0..=180.0).contains(&point.longitude_deg));
            assert!((250.0..500.0).contains(&point.altitude_km));
        }
    }
}
