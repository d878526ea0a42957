//! Rebuilds nested posts from the flat rows of the post/postlet/citation join.
//!
//! The query is responsible for ordering: posts arrive in display order and,
//! within a post, postlets newest first and citations by text. Nothing here
//! reorders or deduplicates; rows are folded in arrival order.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::error;

use crate::data::post_row::PostRow;
use crate::domain::error::DomainError;
use crate::domain::post::{Citation, GeoPoint, Post, PostKind, Postlet};

/// Post shell from the post-level columns of `row`, with no children.
///
/// `now` stands in for missing timestamps so the result depends on the
/// arguments only.
pub fn build_sparse_post(row: &PostRow, now: NaiveDateTime) -> Post {
    Post {
        id: row.post_id.unwrap_or(0),
        title: row.title.clone().unwrap_or_default(),
        subtitle: row.subtitle.clone().unwrap_or_default(),
        kind: row
            .kind
            .as_deref()
            .and_then(|kind| kind.parse::<PostKind>().ok())
            .unwrap_or_default(),
        created_at: parse_timestamp(row.date_added.as_deref()).unwrap_or(now),
        updated_at: parse_timestamp(row.date_updated.as_deref()).unwrap_or(now),
        location: GeoPoint::from_parts(row.lat, row.lng),
        body: row.body.clone().unwrap_or_default(),
        author: row.author.clone().unwrap_or_default(),
        postlets: Vec::new(),
        citations: Vec::new(),
    }
}

/// Appends the postlet and/or citation carried by `row` to `post`, in place.
///
/// Post-level columns of `row` are ignored. A row with neither child id is a
/// no-op.
pub fn merge_child_row(post: &mut Post, row: &PostRow, now: NaiveDateTime) {
    if let Some(id) = row.postlet_id {
        post.postlets.push(Postlet {
            id,
            created_at: parse_timestamp(row.postlet_date_added.as_deref()).unwrap_or(now),
            location: GeoPoint::from_parts(row.postlet_lat, row.postlet_lng),
            body: row.postlet_body.clone().unwrap_or_default(),
        });
    }

    if let Some(id) = row.cite_id {
        post.citations.push(Citation {
            id,
            citation: row.citation.clone().unwrap_or_default(),
        });
    }
}

pub fn denormalize(rows: &[PostRow]) -> Result<Vec<Post>, DomainError> {
    denormalize_at(rows, Local::now().naive_local())
}

/// Groups `rows` by post id, keeping the order in which ids first appear.
pub fn denormalize_at(rows: &[PostRow], now: NaiveDateTime) -> Result<Vec<Post>, DomainError> {
    let mut posts: Vec<Post> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let post_id = row_post_id(row, index)?;
        let position = *positions.entry(post_id).or_insert_with(|| {
            posts.push(build_sparse_post(row, now));
            posts.len() - 1
        });
        merge_child_row(&mut posts[position], row, now);
    }

    Ok(posts)
}

pub fn denormalize_one(rows: &[PostRow], id: i64) -> Result<Post, DomainError> {
    denormalize_one_at(rows, id, Local::now().naive_local())
}

/// Single-post form of [`denormalize_at`]. No rows means the post does not exist.
pub fn denormalize_one_at(
    rows: &[PostRow],
    id: i64,
    now: NaiveDateTime,
) -> Result<Post, DomainError> {
    let Some(first) = rows.first() else {
        return Err(DomainError::PostNotFound(id));
    };

    let mut post = build_sparse_post(first, now);
    for (index, row) in rows.iter().enumerate() {
        let row_id = row_post_id(row, index)?;
        if row_id != id {
            error!(expected = id, found = row_id, row = index, "row for foreign post");
            return Err(DomainError::MalformedRows(format!(
                "row {index} belongs to post {row_id}, expected post {id}"
            )));
        }
        merge_child_row(&mut post, row, now);
    }

    Ok(post)
}

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Reads a stored timestamp. Blank or unreadable text counts as missing; a
/// bare date is taken as midnight.
pub fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn row_post_id(row: &PostRow, index: usize) -> Result<i64, DomainError> {
    match row.post_id {
        Some(id) if id != 0 => Ok(id),
        _ => {
            error!(row = index, "join row without a post id");
            Err(DomainError::MalformedRows(format!(
                "row {index} has no post id"
            )))
        }
    }
}
