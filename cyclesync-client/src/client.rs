use cyclesync_common::{
    envelope::{Envelope, Rejection},
    model::{
        Id,
        post::{Post, PostContent, PostMarker},
        user::{CreateUser, Credentials, UpdateUser, User, UserMarker},
    },
};
use reqwest::{Client, ClientBuilder, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// The two remote failure classes of this layer: a decoded envelope with
/// `success == false`, or the request itself failing (connect, timeout,
/// or a body that is not a valid envelope). HTTP status codes are ignored
/// on purpose; the envelope flag is the only success criterion.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The API URL is invalid: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("The request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("The response envelope was missing its data")]
    MissingData,
}

/// HTTP access to the cyclesync backend.
///
/// Holds a cookie store so the `session` cookie set by `login`/`signup` is
/// replayed on every later request. Ids are used verbatim: this layer
/// performs no ownership checks of its own.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_owned()))?;
        let http = ClientBuilder::new().cookie_store(true).build()?;

        Ok(Self { http, base_url })
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let request = self.http.post(self.endpoint("/api/login")?).json(credentials);
        self.expect_data(request).await
    }

    pub async fn signup(&self, account: &CreateUser) -> Result<User> {
        let request = self.http.post(self.endpoint("/api/signup")?).json(account);
        self.expect_data(request).await
    }

    pub async fn logout(&self) -> Result<()> {
        let request = self.http.post(self.endpoint("/api/logout")?);
        self.send::<()>(request).await?;
        Ok(())
    }

    pub async fn fetch_user(&self, id: Id<UserMarker>) -> Result<User> {
        let request = self.http.get(self.endpoint(&format!("/api/user/{id}"))?);
        self.expect_data(request).await
    }

    pub async fn update_user(&self, id: Id<UserMarker>, update: &UpdateUser) -> Result<User> {
        let request = self
            .http
            .put(self.endpoint(&format!("/api/user/{id}"))?)
            .json(update);
        self.expect_data(request).await
    }

    pub async fn delete_user(&self, id: Id<UserMarker>) -> Result<()> {
        let request = self.http.delete(self.endpoint(&format!("/api/user/{id}"))?);
        self.send::<()>(request).await?;
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let request = self.http.get(self.endpoint("/api/users")?);
        // A backend with no rows omits `data` entirely.
        Ok(self.send(request).await?.unwrap_or_default())
    }

    pub async fn list_posts(&self, user_id: Id<UserMarker>) -> Result<Vec<Post>> {
        let request = self
            .http
            .get(self.endpoint("/api/posts")?)
            .query(&[("user_id", user_id)]);
        Ok(self.send(request).await?.unwrap_or_default())
    }

    pub async fn create_post(&self, draft: &PostContent) -> Result<Post> {
        let request = self.http.post(self.endpoint("/api/posts")?).json(draft);
        self.expect_data(request).await
    }

    pub async fn fetch_post(&self, id: Id<PostMarker>) -> Result<Post> {
        let request = self.http.get(self.endpoint(&format!("/api/post/{id}"))?);
        self.expect_data(request).await
    }

    pub async fn update_post(&self, id: Id<PostMarker>, update: &PostContent) -> Result<Post> {
        let request = self
            .http
            .put(self.endpoint(&format!("/api/post/{id}"))?)
            .json(update);
        self.expect_data(request).await
    }

    pub async fn delete_post(&self, id: Id<PostMarker>) -> Result<()> {
        let request = self.http.delete(self.endpoint(&format!("/api/post/{id}"))?);
        self.send::<()>(request).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::InvalidUrl(path.to_owned()))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await?;
        debug!(status = %response.status(), url = %response.url(), "API response");

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.into_result()?)
    }

    async fn expect_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.send(request).await?.ok_or(ApiError::MissingData)
    }
}
