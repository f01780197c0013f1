use reqwest::Method;

use super::{Gateway, GatewayError};
use crate::models::auth::ApiMessage;
use crate::models::notification::Notification;

impl Gateway {
    /// GET /notifications/
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, GatewayError> {
        self.execute(self.request(Method::GET, "/notifications/"))
            .await
    }

    /// PUT /notifications/{id}/read
    pub async fn mark_notification_read(&self, id: i64) -> Result<ApiMessage, GatewayError> {
        self.execute(self.request(Method::PUT, &format!("/notifications/{id}/read")))
            .await
    }
}
