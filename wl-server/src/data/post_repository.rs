use crate::data::denormalize::{denormalize, denormalize_one};
use crate::data::post_row::PostRow;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, error};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn get_posts(&self, limit: u32, offset: u32) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Text columns are cast to TEXT and coordinates kept only when numeric, so a
// stray value in one row decodes as a default instead of failing the query.
const POST_COLUMNS: &str = r#"
            p.post_id AS post_id, CAST(p.title AS TEXT) AS title,
            CAST(p.subtitle AS TEXT) AS subtitle, CAST(p.type AS TEXT) AS kind,
            CAST(p.date_added AS TEXT) AS date_added,
            CAST(p.date_updated AS TEXT) AS date_updated,
            CASE WHEN typeof(p.lat) IN ('integer', 'real') THEN CAST(p.lat AS REAL) END AS lat,
            CASE WHEN typeof(p.lng) IN ('integer', 'real') THEN CAST(p.lng AS REAL) END AS lng,
            CAST(p.post AS TEXT) AS body, CAST(p.author AS TEXT) AS author"#;

// Postlet rows and citation rows come from separate branches of the union so
// a post with N postlets and M citations yields N + M rows, not N x M. The
// left join keeps one postlet-branch row for every selected post, which also
// makes it the first row of each post.
fn joined_posts_query(selection: &str) -> String {
    format!(
        r#"
        WITH page AS ({selection})
        SELECT {POST_COLUMNS},
            pl.postlet_id AS postlet_id,
            CAST(pl.date_added AS TEXT) AS postlet_date_added,
            CASE WHEN typeof(pl.lat) IN ('integer', 'real') THEN CAST(pl.lat AS REAL) END
                AS postlet_lat,
            CASE WHEN typeof(pl.lng) IN ('integer', 'real') THEN CAST(pl.lng AS REAL) END
                AS postlet_lng,
            CAST(pl.post AS TEXT) AS postlet_body,
            NULL AS cite_id, NULL AS citation,
            0 AS child_kind
        FROM page p
        LEFT JOIN postlet pl ON pl.post_id = p.post_id
        UNION ALL
        SELECT {POST_COLUMNS},
            NULL, NULL, NULL, NULL, NULL,
            c.cite_id, CAST(c.citation AS TEXT),
            1
        FROM page p
        JOIN citation c ON c.post_id = p.post_id
        ORDER BY date_added DESC, post_id DESC, child_kind ASC,
                 postlet_date_added DESC, citation ASC
        "#
    )
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let query = joined_posts_query("SELECT * FROM post WHERE post_id = ?");
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::from(e)
            })?;

        debug!(post_id = id, rows = rows.len(), "post rows fetched");

        match denormalize_one(&rows, id) {
            Ok(post) => Ok(Some(post)),
            Err(DomainError::PostNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_posts(&self, limit: u32, offset: u32) -> Result<Vec<Post>, DomainError> {
        let query = joined_posts_query(
            "SELECT * FROM post ORDER BY date_added DESC, post_id DESC LIMIT ? OFFSET ?",
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts: {}", e);
                DomainError::from(e)
            })?;

        debug!(limit, offset, rows = rows.len(), "post page rows fetched");

        denormalize(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::{GeoPoint, PostKind};
    use crate::test_support::seeded_pool;
    use chrono::{Local, NaiveDate};
    use sqlx::Executor;

    #[actix_web::test]
    async fn lists_posts_newest_first() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        let posts = repo.get_posts(10, 0).await.unwrap();

        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[actix_web::test]
    async fn pages_with_limit_and_offset() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        let first = repo.get_posts(2, 0).await.unwrap();
        let second = repo.get_posts(2, 2).await.unwrap();
        let past_end = repo.get_posts(2, 4).await.unwrap();

        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(second.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
        assert!(past_end.is_empty());
    }

    #[actix_web::test]
    async fn children_are_not_fanned_out() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        let post = repo.find_by_id(2).await.unwrap().unwrap();

        assert_eq!(post.postlets.len(), 2);
        assert_eq!(post.citations.len(), 2);
    }

    #[actix_web::test]
    async fn children_arrive_in_query_order() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        let post = repo.find_by_id(2).await.unwrap().unwrap();

        assert_eq!(
            post.postlets.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![21, 20]
        );
        assert_eq!(
            post.citations
                .iter()
                .map(|c| c.citation.as_str())
                .collect::<Vec<_>>(),
            vec!["Atlas of Roads", "Zine, vol. 2"]
        );
    }

    #[actix_web::test]
    async fn reads_post_scalars() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        let post = repo.find_by_id(2).await.unwrap().unwrap();

        assert_eq!(post.title, "On the road");
        assert_eq!(post.kind, PostKind::Travel);
        assert_eq!(post.author, "Lucian");
        assert_eq!(
            post.location,
            Some(GeoPoint {
                lat: 45.5,
                lng: -73.6
            })
        );
        assert_eq!(
            post.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-02-01 09:00:00"
        );
        assert_eq!(post.postlets[0].body, "Day two");
        assert_eq!(post.postlets[1].location, None);
    }

    #[actix_web::test]
    async fn childless_post_has_empty_children() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        let post = repo.find_by_id(1).await.unwrap().unwrap();

        assert!(post.postlets.is_empty());
        assert!(post.citations.is_empty());
    }

    #[actix_web::test]
    async fn citation_only_post_keeps_citations() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        let post = repo.find_by_id(3).await.unwrap().unwrap();

        assert!(post.postlets.is_empty());
        assert_eq!(post.citations.len(), 1);
        assert_eq!(post.kind, PostKind::Essay);
        assert_eq!(post.subtitle, "");
        // lat without lng
        assert_eq!(post.location, None);
    }

    #[actix_web::test]
    async fn unreadable_values_take_defaults() {
        let pool = seeded_pool().await;
        pool.execute(
            r#"
            INSERT INTO post (post_id, title, date_added, date_updated, lat, lng)
            VALUES (9, 'Undated', '', '2024-04-01', '', 3.5);
            INSERT INTO postlet (postlet_id, post_id, date_added, lat, lng, post)
            VALUES (90, 9, 'someday', 'north', 1.0, 'Somewhere');
            "#,
        )
        .await
        .unwrap();
        let repo = SqlitePostRepository::new(pool);

        let before = Local::now().naive_local();
        let post = repo.find_by_id(9).await.unwrap().unwrap();
        let after = Local::now().naive_local();

        assert!(post.created_at >= before && post.created_at <= after);
        assert_eq!(
            post.updated_at,
            NaiveDate::from_ymd_opt(2024, 4, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(post.location, None);
        assert!(post.postlets[0].created_at >= before && post.postlets[0].created_at <= after);
        assert_eq!(post.postlets[0].location, None);
        assert_eq!(post.postlets[0].body, "Somewhere");

        let posts = repo.get_posts(10, 0).await.unwrap();
        assert_eq!(posts.len(), 4);
        assert!(posts.iter().any(|p| p.id == 9 && p.title == "Undated"));
    }

    #[actix_web::test]
    async fn unknown_post_is_none() {
        let repo = SqlitePostRepository::new(seeded_pool().await);

        assert!(repo.find_by_id(404).await.unwrap().is_none());
    }
}
