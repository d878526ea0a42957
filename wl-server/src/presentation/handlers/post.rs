use crate::application::post_service::PostService;
use crate::data::post_repository::SqlitePostRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::ListPostsQuery;
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::info;

#[get("/posts")]
async fn get_posts(
    req: HttpRequest,
    posts: web::Data<PostService<SqlitePostRepository>>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let page = posts.get_page(query.page).await?;

    info!(
        request_id = %request_id(&req),
        page = page.page,
        count = page.posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(page))
}

#[get("/posts/{id}")]
async fn get_post(
    req: HttpRequest,
    posts: web::Data<PostService<SqlitePostRepository>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.get_post(path.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = post.id,
        "post retrieved"
    );

    Ok(HttpResponse::Ok().json(post))
}
