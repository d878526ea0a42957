use async_trait::async_trait;

mod error;
mod http_client;
mod model;

pub use error::WlClientError;
pub use http_client::WlClientHttp;
pub use model::{Citation, GeoPoint, Post, PostKind, PostPage, Postlet};

#[async_trait(?Send)]
pub trait WlClientTrait {
    async fn list_posts(&self, page: Option<u32>) -> Result<PostPage, WlClientError>;
    async fn get_post(&self, id: i64) -> Result<Post, WlClientError>;
}
