use async_trait::async_trait;

use console_auth::Credential;
use console_core::ServiceResult;

use crate::route::RouteDescriptor;

/// Backend route-listing collaborator: the raw, unfiltered route tree.
#[async_trait]
pub trait RouteService: Send + Sync {
    async fn list_routes(&self, credential: &Credential) -> ServiceResult<Vec<RouteDescriptor>>;
}
