use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::application::repos::{PostListScope, RepoError};
use crate::domain::entities::PostView;
use crate::infra::db::map_sqlx_error;

use super::PostgresRepositories;
use super::types::{POST_VIEW_COLUMNS, POST_VIEW_FROM, PostViewRow};

impl PostgresRepositories {
    pub(super) async fn count_scoped(&self, scope: PostListScope) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p WHERE 1=1 ");
        Self::apply_scope_conditions(&mut qb, scope);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    pub(super) async fn list_scoped(
        &self,
        scope: PostListScope,
        window: PageWindow,
    ) -> Result<Vec<PostView>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_VIEW_COLUMNS);
        qb.push(POST_VIEW_FROM);
        qb.push(" WHERE 1=1 ");
        Self::apply_scope_conditions(&mut qb, scope);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC ");
        Self::push_window(&mut qb, window)?;

        let rows = qb
            .build_query_as::<PostViewRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostView::from).collect())
    }

    pub(super) async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_VIEW_COLUMNS);
        qb.push(POST_VIEW_FROM);
        qb.push(" WHERE p.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<PostViewRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostView::from))
    }
}
