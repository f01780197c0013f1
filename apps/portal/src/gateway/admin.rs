use async_trait::async_trait;
use reqwest::Method;

use super::{Gateway, GatewayError};
use crate::models::auth::ApiMessage;
use crate::models::skill::{Category, CategoryId, NamePayload, Skill, SkillId};

/// Which admin catalog an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Skill,
    Category,
}

impl CatalogKind {
    fn path(&self) -> &'static str {
        match self {
            CatalogKind::Skill => "/admin/skills",
            CatalogKind::Category => "/admin/categories",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Skill => "skill",
            CatalogKind::Category => "category",
        }
    }
}

/// Admin-scoped skill/category management. Every call needs a bearer token.
#[async_trait]
pub trait AdminCatalog: Send + Sync {
    async fn add_entry(&self, token: &str, kind: CatalogKind, name: &str) -> Result<ApiMessage, GatewayError>;
    async fn edit_entry(
        &self,
        token: &str,
        kind: CatalogKind,
        id: i64,
        name: &str,
    ) -> Result<ApiMessage, GatewayError>;
}

impl Gateway {
    /// GET /admin/skills
    pub async fn list_skills(&self, token: &str) -> Result<Vec<Skill>, GatewayError> {
        self.execute(self.authorized(Method::GET, CatalogKind::Skill.path(), token))
            .await
    }

    /// POST /admin/skills
    pub async fn add_skill(&self, token: &str, name: &str) -> Result<ApiMessage, GatewayError> {
        self.add_entry(token, CatalogKind::Skill, name).await
    }

    /// PUT /admin/skills/{id}
    pub async fn edit_skill(&self, token: &str, id: SkillId, name: &str) -> Result<ApiMessage, GatewayError> {
        self.edit_entry(token, CatalogKind::Skill, id, name).await
    }

    /// DELETE /admin/skills/{id}
    pub async fn delete_skill(&self, token: &str, id: SkillId) -> Result<ApiMessage, GatewayError> {
        self.delete_entry(token, CatalogKind::Skill, id).await
    }

    /// GET /admin/categories
    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>, GatewayError> {
        self.execute(self.authorized(Method::GET, CatalogKind::Category.path(), token))
            .await
    }

    /// POST /admin/categories
    pub async fn add_category(&self, token: &str, name: &str) -> Result<ApiMessage, GatewayError> {
        self.add_entry(token, CatalogKind::Category, name).await
    }

    /// PUT /admin/categories/{id}
    pub async fn edit_category(
        &self,
        token: &str,
        id: CategoryId,
        name: &str,
    ) -> Result<ApiMessage, GatewayError> {
        self.edit_entry(token, CatalogKind::Category, id, name).await
    }

    /// DELETE /admin/categories/{id}
    pub async fn delete_category(&self, token: &str, id: CategoryId) -> Result<ApiMessage, GatewayError> {
        self.delete_entry(token, CatalogKind::Category, id).await
    }

    async fn add_entry(&self, token: &str, kind: CatalogKind, name: &str) -> Result<ApiMessage, GatewayError> {
        let req = self
            .authorized(Method::POST, kind.path(), token)
            .json(&NamePayload { name });
        self.execute(req).await
    }

    async fn edit_entry(
        &self,
        token: &str,
        kind: CatalogKind,
        id: i64,
        name: &str,
    ) -> Result<ApiMessage, GatewayError> {
        let req = self
            .authorized(Method::PUT, &format!("{}/{id}", kind.path()), token)
            .json(&NamePayload { name });
        self.execute(req).await
    }

    async fn delete_entry(&self, token: &str, kind: CatalogKind, id: i64) -> Result<ApiMessage, GatewayError> {
        self.execute(self.authorized(Method::DELETE, &format!("{}/{id}", kind.path()), token))
            .await
    }
}

#[async_trait]
impl AdminCatalog for Gateway {
    async fn add_entry(&self, token: &str, kind: CatalogKind, name: &str) -> Result<ApiMessage, GatewayError> {
        Gateway::add_entry(self, token, kind, name).await
    }

    async fn edit_entry(
        &self,
        token: &str,
        kind: CatalogKind,
        id: i64,
        name: &str,
    ) -> Result<ApiMessage, GatewayError> {
        Gateway::edit_entry(self, token, kind, id, name).await
    }
}
