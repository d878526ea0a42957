use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Essay,
    Travel,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Deserialize)]
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

#[derive(Debug, Clone, Deserialize)]
pub struct Postlet {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub location: Option<GeoPoint>,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Citation {
    pub id: i64,
    pub citation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.title)?;
        if !self.subtitle.is_empty() {
            writeln!(f, "{}", self.subtitle)?;
        }
        write!(f, "by {} on {}", self.author, self.created_at)?;
        if let Some(location) = &self.location {
            write!(f, " at {}", location)?;
        }
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "{}", self.body)?;

        for postlet in &self.postlets {
            write!(f, "\n  - {}", postlet.created_at)?;
            if let Some(location) = &postlet.location {
                write!(f, " ({})", location)?;
            }
            writeln!(f, ": {}", postlet.body)?;
        }

        if !self.citations.is_empty() {
            writeln!(f, "\nCitations:")?;
            for citation in &self.citations {
                writeln!(f, "  [{}] {}", citation.id, citation.citation)?;
            }
        }

        Ok(())
    }
}
