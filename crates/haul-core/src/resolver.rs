//! Approximate, jittered address-to-coordinate resolution.
//!
//! This is a placeholder for real geocoding: a free-text address is matched
//! against a fixed table of New York neighbourhood names and placed near that
//! neighbourhood's centre with random jitter, so map pins for the same area
//! don't stack. Repeated calls with the same address return different
//! points.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

impl Coordinates {
  pub const fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }
}

/// Neighbourhood keys and their centres. Scanned in order; the first key
/// found anywhere in the lower-cased address wins.
pub const NEIGHBORHOODS: [(&str, Coordinates); 16] = [
  ("washington square", Coordinates::new(40.7308, -73.9973)),
  ("nyu", Coordinates::new(40.7295, -73.9965)),
  ("greenwich village", Coordinates::new(40.7336, -74.0027)),
  ("east village", Coordinates::new(40.7265, -73.9815)),
  ("soho", Coordinates::new(40.7233, -73.9961)),
  ("tribeca", Coordinates::new(40.7163, -74.0086)),
  ("lower east side", Coordinates::new(40.7150, -73.9843)),
  ("chelsea", Coordinates::new(40.7465, -74.0014)),
  ("midtown", Coordinates::new(40.7549, -73.9840)),
  ("upper east side", Coordinates::new(40.7736, -73.9566)),
  ("upper west side", Coordinates::new(40.7870, -73.9754)),
  ("harlem", Coordinates::new(40.8116, -73.9465)),
  ("brooklyn", Coordinates::new(40.6782, -73.9442)),
  ("williamsburg", Coordinates::new(40.7081, -73.9571)),
  ("manhattan", Coordinates::new(40.7831, -73.9712)),
  ("new york", Coordinates::new(40.7128, -74.0060)),
];

/// Used when no neighbourhood key matches.
pub const DEFAULT_CENTER: Coordinates = Coordinates::new(40.7295, -73.9965);

/// Per-axis jitter half-width for a neighbourhood match, in degrees.
pub const MATCH_JITTER: f64 = 0.0025;

/// Per-axis jitter half-width for the default point, in degrees.
pub const DEFAULT_JITTER: f64 = 0.005;

/// The neighbourhood centre for `address` and the jitter radius that goes
/// with it.
pub fn anchor_for(address: &str) -> (Coordinates, f64) {
  let lower = address.to_lowercase();
  NEIGHBORHOODS
    .iter()
    .find(|(key, _)| lower.contains(key))
    .map(|(_, center)| (*center, MATCH_JITTER))
    .unwrap_or((DEFAULT_CENTER, DEFAULT_JITTER))
}

/// Resolve `address` to a jittered point using the thread-local RNG.
pub fn approximate_coordinates(address: &str) -> Coordinates {
  approximate_coordinates_with(&mut rand::thread_rng(), address)
}

/// Resolve `address` to a jittered point drawing jitter from `rng`.
pub fn approximate_coordinates_with<R: Rng + ?Sized>(
  rng: &mut R,
  address: &str,
) -> Coordinates {
  let (center, jitter) = anchor_for(address);
  Coordinates {
    lat: center.lat + rng.gen_range(-jitter..=jitter),
    lng: center.lng + rng.gen_range(-jitter..=jitter),
  }
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  fn within(point: Coordinates, center: Coordinates, radius: f64) -> bool {
    let r = radius + 1e-9;
    (point.lat - center.lat).abs() <= r && (point.lng - center.lng).abs() <= r
  }

  #[test]
  fn every_keyword_resolves_near_its_centre() {
    let mut rng = StdRng::seed_from_u64(7);
    for (key, center) in NEIGHBORHOODS {
      // Keys that contain an earlier key are shadowed by it; skip those.
      let (anchor, _) = anchor_for(key);
      if anchor != center {
        continue;
      }
      for _ in 0..50 {
        let p = approximate_coordinates_with(&mut rng, &format!("12 Main St, {key}"));
        assert!(within(p, center, MATCH_JITTER), "{key}: {p:?}");
      }
    }
  }

  #[test]
  fn match_is_case_insensitive_and_positional() {
    let (anchor, jitter) = anchor_for("123 Greene St, GREENWICH Village, NY");
    assert_eq!(anchor, Coordinates::new(40.7336, -74.0027));
    assert_eq!(jitter, MATCH_JITTER);

    let (anchor, _) = anchor_for("tribeca loft");
    assert_eq!(anchor, Coordinates::new(40.7163, -74.0086));
  }

  #[test]
  fn first_key_in_table_order_wins() {
    // "east village" is listed before "new york".
    let (anchor, _) = anchor_for("east village, new york");
    assert_eq!(anchor, Coordinates::new(40.7265, -73.9815));
  }

  #[test]
  fn unknown_address_uses_default_with_wider_jitter() {
    let mut rng = StdRng::seed_from_u64(11);
    assert_eq!(anchor_for("42 Elm Rd, Springfield"), (DEFAULT_CENTER, DEFAULT_JITTER));
    for _ in 0..50 {
      let p = approximate_coordinates_with(&mut rng, "42 Elm Rd, Springfield");
      assert!(within(p, DEFAULT_CENTER, DEFAULT_JITTER), "{p:?}");
    }
  }

  #[test]
  fn repeated_calls_are_jittered() {
    let a = approximate_coordinates("Soho");
    let b = approximate_coordinates("Soho");
    let c = approximate_coordinates("Soho");
    assert!(a != b || b != c);
  }
}
