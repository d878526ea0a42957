use sqlx::{Executor, SqlitePool};
use sqlx::sqlite::SqlitePoolOptions;

const FIXTURES: &str = r#"
INSERT INTO post (post_id, title, subtitle, type, date_added, date_updated, lat, lng, post, author)
VALUES
    (1, 'First light', 'An opening', 'essay', '2024-01-01 08:00:00', '2024-01-02 08:00:00', NULL, NULL, 'Hello.', 'Lucian'),
    (2, 'On the road', 'Notes', 'travel', '2024-02-01 09:00:00', '2024-02-03 09:00:00', 45.5, -73.6, 'Leaving.', 'Lucian'),
    (3, 'Reading list', NULL, NULL, '2024-03-01 10:00:00', NULL, 12.0, NULL, 'Books.', 'Lucian');

INSERT INTO postlet (postlet_id, post_id, date_added, lat, lng, post)
VALUES
    (20, 2, '2024-02-01 12:00:00', NULL, NULL, 'Day one'),
    (21, 2, '2024-02-02 12:00:00', 46.8, -71.2, 'Day two');

INSERT INTO citation (cite_id, post_id, citation)
VALUES
    (30, 2, 'Zine, vol. 2'),
    (31, 2, 'Atlas of Roads'),
    (32, 3, 'Collected Essays');
"#;

/// Single-connection in-memory database with the schema and a small fixture set.
pub async fn seeded_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    pool.execute(FIXTURES).await.expect("fixtures");
    pool
}
