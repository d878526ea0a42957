use std::sync::Arc;

use crate::data::post_repository::PostRepository;
use crate::domain::{error::DomainError, post::Post};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

#[derive(Clone)]
pub struct PostService<R: PostRepository + 'static> {
    repo: Arc<R>,
    per_page: u32,
}

impl<R> PostService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>, per_page: u32) -> Self {
        Self { repo, per_page }
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        // ids start at 1; zero and below never name a post
        if id <= 0 {
            return Err(DomainError::PostNotFound(id));
        }

        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    /// Posts of the 1-based `page`, newest first.
    #[instrument(skip(self))]
    pub async fn get_page(&self, page: u32) -> Result<PostPage, DomainError> {
        if page == 0 {
            return Err(DomainError::InvalidRequest(
                "page numbers start at 1".to_string(),
            ));
        }
        let offset = (page - 1)
            .checked_mul(self.per_page)
            .ok_or_else(|| DomainError::InvalidRequest(format!("page {} is out of range", page)))?;

        let posts = self.repo.get_posts(self.per_page, offset).await?;
        let has_more = posts.len() as u32 == self.per_page;

        Ok(PostPage {
            posts,
            page,
            per_page: self.per_page,
            has_more,
        })
    }
}
