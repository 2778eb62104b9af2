use crate::domain::model::{Course, FormKind, SubmissionReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Backend operations the view-models depend on.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /courses`, returning the `data` array.
    async fn fetch_courses(&self) -> Result<Vec<Course>>;

    /// `POST` the form payload to the endpoint of `kind`.
    ///
    /// A non-2xx reply is `PortalError::Rejected` carrying the parsed body.
    async fn submit(&self, kind: FormKind, payload: serde_json::Value) -> Result<SubmissionReceipt>;
}

#[async_trait]
impl<T: BackendApi + ?Sized> BackendApi for std::sync::Arc<T> {
    async fn fetch_courses(&self) -> Result<Vec<Course>> {
        (**self).fetch_courses().await
    }

    async fn submit(&self, kind: FormKind, payload: serde_json::Value) -> Result<SubmissionReceipt> {
        (**self).submit(kind, payload).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    /// `None` leaves the transport default in place.
    fn request_timeout(&self) -> Option<Duration>;
    fn default_course_interest(&self) -> Option<&str>;
}
