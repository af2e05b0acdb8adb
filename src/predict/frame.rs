use chrono::{DateTime, Utc};

use super::types::GeodeticPoint;

// WGS84 ellipsoid.
const WGS84_A_KM: f64 = 6378.137;
const WGS84_B_KM: f64 = 6356.752_314_2;
const WGS84_E2: f64 = 1.0 - (WGS84_B_KM * WGS84_B_KM) / (WGS84_A_KM * WGS84_A_KM);

const JULIAN_DATE_UNIX_EPOCH: f64 = 2_440_587.5;
const JULIAN_DATE_J2000: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

// Horizontal radius below which the ground track is treated as polar.
const POLAR_EPSILON_KM: f64 = 1e-10;
// Fixed iteration count; converges to sub-meter at LEO altitudes.
const LATITUDE_ITERATIONS: usize = 5;

/// Greenwich Mean Sidereal Time in radians at `t`, from the standard
/// polynomial in days since J2000.
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    let unix_seconds = t.timestamp_millis() as f64 / 1000.0;
    let d = unix_seconds / SECONDS_PER_DAY + JULIAN_DATE_UNIX_EPOCH - JULIAN_DATE_J2000;
    let centuries = d / 36_525.0;

    let gmst_deg = 280.460_618_37
        + 360.985_647_366_29 * d
        + 0.000_387_933 * centuries * centuries
        - centuries * centuries * centuries / 38_710_000.0;

    gmst_deg.rem_euclid(360.0).to_radians()
}

/// Rotate an inertial (TEME) position into the Earth-fixed frame: a
/// rotation about the polar axis by `-gmst`.
pub fn teme_to_ecef(r: [f64; 3], gmst: f64) -> [f64; 3] {
    let (sin_g, cos_g) = gmst.sin_cos();
    [
        r[0] * cos_g + r[1] * sin_g,
        -r[0] * sin_g + r[1] * cos_g,
        r[2],
    ]
}

/// Earth-fixed Cartesian (km) to geodetic `(lat_deg, lon_deg, alt_km)` on
/// the WGS84 ellipsoid. Latitude is solved by a fixed-point iteration with
/// a bounded step count rather than the closed form; total, no failure
/// mode. Longitude at the poles is defined as 0.
pub fn ecef_to_geodetic(r: [f64; 3]) -> (f64, f64, f64) {
    let horizontal = r[0].hypot(r[1]);
    let longitude = if horizontal < POLAR_EPSILON_KM {
        0.0
    } else {
        r[1].atan2(r[0])
    };

    // Keeps the iteration finite on the polar axis itself.
    let horizontal = horizontal.max(POLAR_EPSILON_KM);

    let mut latitude = r[2].atan2(horizontal);
    let mut n = WGS84_A_KM;
    let mut altitude = 0.0;
    for _ in 0..LATITUDE_ITERATIONS {
        let sin_lat = latitude.sin();
        n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        altitude = horizontal / latitude.cos() - n;
        latitude = r[2].atan2(horizontal * (1.0 - WGS84_E2 * n / (n + altitude)));
    }

    let sin_lat = latitude.sin();
    n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    altitude = horizontal / latitude.cos() - n;

    (latitude.to_degrees(), longitude.to_degrees(), altitude)
}

/// Full transform: inertial position at `t` to a geodetic ground-track
/// point. Deterministic and recomputable from its inputs.
pub fn to_geodetic(position_teme_km: [f64; 3], t: DateTime<Utc>) -> GeodeticPoint {
    let ecef = teme_to_ecef(position_teme_km, gmst_rad(t));
    let (latitude_deg, longitude_deg, altitude_km) = ecef_to_geodetic(ecef);
    GeodeticPoint {
        timestamp: t,
        latitude_deg,
        longitude_deg,
        altitude_km,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    /// Forward geodetic-to-ECEF construction used to build round-trip
    /// fixtures.
    fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_km: f64) -> [f64; 3] {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * lat.sin() * lat.sin()).sqrt();
        [
            (n + alt_km) * lat.cos() * lon.cos(),
            (n + alt_km) * lat.cos() * lon.sin(),
            (n * (1.0 - WGS84_E2) + alt_km) * lat.sin(),
        ]
    }

    fn ecef_to_teme(r: [f64; 3], gmst: f64) -> [f64; 3] {
        let (sin_g, cos_g) = gmst.sin_cos();
        [
            r[0] * cos_g - r[1] * sin_g,
            r[0] * sin_g + r[1] * cos_g,
            r[2],
        ]
    }

    #[test]
    fn gmst_at_j2000_matches_polynomial_constant() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let expected = 280.460_618_37_f64.to_radians();
        assert!((gmst_rad(t) - expected).abs() < 1e-9);
    }

    #[test]
    fn gmst_stays_in_range() {
        let t = Utc.with_ymd_and_hms(2026, 8, 26, 3, 14, 15).unwrap();
        let g = gmst_rad(t);
        assert!((0.0..std::f64::consts::TAU).contains(&g));
    }

    #[test]
    fn round_trip_recovers_geodetic_coordinates() {
        let cases = [
            (45.0, 30.0, 420.0),
            (-33.5, -71.2, 408.3),
            (0.0, 179.9, 415.0),
            (87.9, -1.0, 402.0),
        ];
        let gmst = 1.7;

        for (lat, lon, alt) in cases {
            let ecef = geodetic_to_ecef(lat, lon, alt);
            let teme = ecef_to_teme(ecef, gmst);
            let (lat2, lon2, alt2) = ecef_to_geodetic(teme_to_ecef(teme, gmst));
            assert!((lat2 - lat).abs() < 1e-6, "lat {} -> {}", lat, lat2);
            assert!((lon2 - lon).abs() < 1e-6, "lon {} -> {}", lon, lon2);
            assert!((alt2 - alt).abs() < 1e-3, "alt {} -> {}", alt, alt2);
        }
    }

    #[test]
    fn north_pole_has_zero_longitude() {
        let (lat, lon, _) = ecef_to_geodetic([0.0, 0.0, 6380.0]);
        assert_eq!(lon, 0.0);
        assert!((lat - 90.0).abs() < 1e-6);
    }

    #[test]
    fn equatorial_point_on_surface() {
        let (lat, lon, alt) = ecef_to_geodetic([WGS84_A_KM, 0.0, 0.0]);
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
        assert!(alt.abs() < 1e-6);
    }
}
