//! Reference excavation sites and distance ranking.

use core::fmt;

use serde::{Serialize, Serializer};

use crate::geo::{Coordinate, haversine_km};

/// A known excavation site used as a regional reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSite {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub significance: String,
    pub key_artifacts: String,
    pub link: String,
}

impl ReferenceSite {
    /// Returns the site's location.
    ///
    /// Builtin site coordinates are known-valid, so this cannot fail.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Distance from the observer to a site.
///
/// `NotAvailable` is deliberately distinct from a zero distance: it means
/// no observer location was supplied, not "0 km away".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// Great-circle distance in kilometers.
    Km(f64),
    /// No observer coordinate was supplied.
    NotAvailable,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Km(km) => write!(f, "{km:.1} km"),
            Self::NotAvailable => write!(f, "not available"),
        }
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Km(km) => serializer.serialize_f64(*km),
            Self::NotAvailable => serializer.serialize_str("not available"),
        }
    }
}

/// A reference site annotated with its distance from the observer.
///
/// Derived per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSite {
    #[serde(flatten)]
    pub site: ReferenceSite,

    /// Distance from the observer's coordinate.
    pub distance_km: Distance,
}

/// Annotates sites with their distance from `observer` and sorts them
/// ascending by distance.
///
/// When no observer is supplied, the sites are returned in their original
/// order with [`Distance::NotAvailable`].
#[must_use]
pub fn rank_sites(sites: &[ReferenceSite], observer: Option<Coordinate>) -> Vec<RankedSite> {
    match observer {
        Some(from) => {
            let mut ranked: Vec<RankedSite> = sites
                .iter()
                .map(|site| RankedSite {
                    distance_km: Distance::Km(haversine_km(from, site.coordinate())),
                    site: site.clone(),
                })
                .collect();

            ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
                (Distance::Km(x), Distance::Km(y)) => x.total_cmp(&y),
                _ => core::cmp::Ordering::Equal,
            });

            ranked
        }
        None => sites
            .iter()
            .map(|site| RankedSite {
                site: site.clone(),
                distance_km: Distance::NotAvailable,
            })
            .collect(),
    }
}

fn site(
    name: &str,
    latitude: f64,
    longitude: f64,
    significance: &str,
    key_artifacts: &str,
    link: &str,
) -> ReferenceSite {
    ReferenceSite {
        name: name.to_string(),
        latitude,
        longitude,
        significance: significance.to_string(),
        key_artifacts: key_artifacts.to_string(),
        link: link.to_string(),
    }
}

/// Builds the builtin reference site table.
pub(crate) fn builtin_sites() -> Vec<ReferenceSite> {
    vec![
        site(
            "Keeladi",
            9.855,
            78.195,
            "Sangam-era urban settlement on the Vaigai river with extensive evidence of literacy and industry.",
            "Terracotta figurines, spindle whorls, graffiti-inscribed potsherds",
            "https://en.wikipedia.org/wiki/Keezhadi_excavation_site",
        ),
        site(
            "Adichanallur",
            8.626,
            77.874,
            "Iron Age urn-burial site among the oldest known in South India.",
            "Burial urns, bronze ornaments, iron implements",
            "https://en.wikipedia.org/wiki/Adichanallur",
        ),
        site(
            "Arikamedu",
            11.888,
            79.826,
            "Indo-Roman trading port on the Coromandel coast, active from the 2nd century BCE.",
            "Roman amphorae, rouletted ware, glass beads",
            "https://en.wikipedia.org/wiki/Arikamedu",
        ),
        site(
            "Kodumanal",
            11.108,
            77.555,
            "Industrial and trade centre known for gemstone working and early iron production.",
            "Gemstone beads, iron furnaces, shell bangles",
            "https://en.wikipedia.org/wiki/Kodumanal",
        ),
        site(
            "Korkai",
            8.633,
            78.066,
            "Early Pandyan port celebrated for its pearl fishery.",
            "Pearls, shell bangles, black-and-red ware",
            "https://en.wikipedia.org/wiki/Korkai",
        ),
        site(
            "Pattanam",
            10.155,
            76.211,
            "Port site on the Malabar coast linked with ancient Muziris and Indian Ocean trade.",
            "Roman amphora sherds, beads, brick wharf structures",
            "https://en.wikipedia.org/wiki/Pattanam",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_observer_order_preserved() {
        let sites = builtin_sites();
        let ranked = rank_sites(&sites, None);

        assert_eq!(ranked.len(), sites.len());
        for (original, ranked) in sites.iter().zip(&ranked) {
            assert_eq!(original.name, ranked.site.name);
            assert_eq!(ranked.distance_km, Distance::NotAvailable);
        }
    }

    #[test]
    fn test_with_observer_sorted_ascending() {
        let sites = builtin_sites();
        let observer = Coordinate::new(13.0827, 80.2707).unwrap(); // Chennai
        let ranked = rank_sites(&sites, Some(observer));

        for pair in ranked.windows(2) {
            let (Distance::Km(a), Distance::Km(b)) = (pair[0].distance_km, pair[1].distance_km)
            else {
                panic!("expected concrete distances");
            };
            assert!(a <= b);
        }
    }

    #[test]
    fn test_observer_at_site_ranks_it_first() {
        let sites = builtin_sites();
        let keeladi = sites
            .iter()
            .find(|s| s.name == "Keeladi")
            .unwrap()
            .coordinate();
        let ranked = rank_sites(&sites, Some(keeladi));

        assert_eq!(ranked[0].site.name, "Keeladi");
        let Distance::Km(km) = ranked[0].distance_km else {
            panic!("expected a concrete distance");
        };
        assert!(km < 1e-9);
    }

    #[test]
    fn test_distance_display() {
        assert_eq!(Distance::Km(12.34).to_string(), "12.3 km");
        assert_eq!(Distance::NotAvailable.to_string(), "not available");
    }

    #[test]
    fn test_distance_serialization() {
        let json = serde_json::to_string(&Distance::Km(10.5)).unwrap();
        assert_eq!(json, "10.5");
        let json = serde_json::to_string(&Distance::NotAvailable).unwrap();
        assert_eq!(json, "\"not available\"");
    }

    #[test]
    fn test_builtin_site_coordinates_valid() {
        for site in builtin_sites() {
            assert!(Coordinate::new(site.latitude, site.longitude).is_ok());
        }
    }
}
