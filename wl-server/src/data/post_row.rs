use sqlx::FromRow;

/// One row of the post/postlet/citation outer join.
///
/// Post columns are always populated by a well-formed query. The postlet and
/// citation columns are null on the side of the join that has no child.
///
/// Timestamps arrive as raw text and are parsed while folding, so a bad value
/// costs that field its default instead of failing the whole query.
#[derive(Debug, Clone, Default, FromRow)]
pub struct PostRow {
    pub post_id: Option<i64>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub kind: Option<String>,
    pub date_added: Option<String>,
    pub date_updated: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub body: Option<String>,
    pub author: Option<String>,

    pub postlet_id: Option<i64>,
    pub postlet_date_added: Option<String>,
    pub postlet_lat: Option<f64>,
    pub postlet_lng: Option<f64>,
    pub postlet_body: Option<String>,

    pub cite_id: Option<i64>,
    pub citation: Option<String>,
}
