use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Category tag of a post. Rows with an unknown or missing tag are read as essays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Essay,
    Travel,
    Video,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Essay => "essay",
            PostKind::Travel => "travel",
            PostKind::Video => "video",
        }
    }
}

impl FromStr for PostKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "essay" => Ok(PostKind::Essay),
            "travel" => Ok(PostKind::Travel),
            "video" => Ok(PostKind::Video),
            other => Err(format!("unknown post type: {other}")),
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair. Only ever built from two present halves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Self { lat, lng }),
            _ => None,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub kind: PostKind,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub location: Option<GeoPoint>,
    pub body: String,
    pub author: String,
    pub postlets: Vec<Postlet>,
    pub citations: Vec<Citation>,
}

/// Dated, optionally geo-tagged entry of a travel post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postlet {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub location: Option<GeoPoint>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: i64,
    pub citation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_coordinate_is_no_coordinate() {
        assert_eq!(GeoPoint::from_parts(Some(45.5), None), None);
        assert_eq!(GeoPoint::from_parts(None, Some(-73.6)), None);
        assert_eq!(GeoPoint::from_parts(None, None), None);
        assert_eq!(
            GeoPoint::from_parts(Some(45.5), Some(-73.6)),
            Some(GeoPoint {
                lat: 45.5,
                lng: -73.6
            })
        );
    }

    #[test]
    fn geo_point_displays_as_pair() {
        let point = GeoPoint { lat: 1.5, lng: -2.0 };
        assert_eq!(point.to_string(), "1.5, -2");
    }

    #[test]
    fn post_kind_parses_case_insensitively() {
        assert_eq!("Travel".parse::<PostKind>(), Ok(PostKind::Travel));
        assert_eq!(" video ".parse::<PostKind>(), Ok(PostKind::Video));
        assert!("podcast".parse::<PostKind>().is_err());
        assert_eq!(PostKind::default(), PostKind::Essay);
    }

    #[test]
    fn post_kind_serializes_lowercase() {
        let json = serde_json::to_string(&PostKind::Travel).unwrap();
        assert_eq!(json, "\"travel\"");
    }
}
