mod read;
mod types;
mod write;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::application::repos::{
    CreatePostParams, PostListScope, PostsRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{PostRecord, PostView};

use super::PostgresRepositories;

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn count_posts(&self, scope: PostListScope) -> Result<u64, RepoError> {
        self.count_scoped(scope).await
    }

    async fn list_posts(
        &self,
        scope: PostListScope,
        window: PageWindow,
    ) -> Result<Vec<PostView>, RepoError> {
        self.list_scoped(scope, window).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        self.find_view(id).await
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        self.insert_post(params).await
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        self.update_post_fields(params).await
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        self.remove_post(id).await
    }
}
