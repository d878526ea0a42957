use crate::WlClientTrait;
use crate::error::WlClientError;
use crate::model::{Post, PostPage};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct WlClientHttp {
    client: Client,
    base_url: String,
}

impl WlClientHttp {
    pub fn connect(endpoint: &str) -> Result<Self, WlClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn posts_url(&self, page: Option<u32>) -> String {
        match page {
            Some(page) => format!("{}/api/posts?page={}", self.base_url, page),
            None => format!("{}/api/posts", self.base_url),
        }
    }

    fn post_url(&self, id: i64) -> String {
        format!("{}/api/posts/{}", self.base_url, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, WlClientError> {
        let resp = self.client.get(url).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            Err(WlClientError::from_http_response(resp).await)
        }
    }
}

#[async_trait(?Send)]
impl WlClientTrait for WlClientHttp {
    async fn list_posts(&self, page: Option<u32>) -> Result<PostPage, WlClientError> {
        self.get_json(self.posts_url(page)).await
    }

    async fn get_post(&self, id: i64) -> Result<Post, WlClientError> {
        self.get_json(self.post_url(id)).await
    }
}
