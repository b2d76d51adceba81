use anyhow::{anyhow, bail, Context};
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    data::{Dish, Leader},
    service::DishService,
};

/// Talks to the api server, e.g. `http://127.0.0.1:8080/api/v1`.
#[derive(Clone)]
pub struct HttpDishService {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrJsonResp {
    message: String,
}

impl HttpDishService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Append `segments` to the base url, percent-encoding each of them, so
    /// ids holding `/`, `?`, `#` or `%` stay a single path segment.
    fn url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid api base url {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("api base url {} can not take a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> anyhow::Result<T> {
        let url = self.url(segments)?;
        tracing::debug!("GET {url}");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("fail to request {url}"))?;
        read_json(resp).await
    }
}

impl HttpDishService {
    /// The people behind the restaurant, for the about page.
    pub async fn get_leaders(&self) -> anyhow::Result<Vec<Leader>> {
        self.get(&["leaders"]).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let message = match resp.json::<ErrJsonResp>().await {
            Ok(err) => err.message,
            Err(_) => status.to_string(),
        };
        bail!("server answered {status}: {message}");
    }
    resp.json().await.context("fail to decode response body")
}

impl DishService for HttpDishService {
    async fn get_dishes(&self) -> anyhow::Result<Vec<Dish>> {
        self.get(&["dishes"]).await
    }

    async fn get_dish_ids(&self) -> anyhow::Result<Vec<String>> {
        self.get(&["dishes", "ids"]).await
    }

    async fn get_dish(&self, id: &str) -> anyhow::Result<Dish> {
        self.get(&["dishes", id]).await
    }

    async fn put_dish(&self, dish: &Dish) -> anyhow::Result<Dish> {
        let url = self.url(&["dishes", dish.id.as_str()])?;
        tracing::debug!("PUT {url}");
        let resp = self
            .client
            .put(url.clone())
            .json(dish)
            .send()
            .await
            .with_context(|| format!("fail to request {url}"))?;
        read_json(resp).await
    }
}
