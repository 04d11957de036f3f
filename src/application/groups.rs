use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{CreateGroupParams, GroupsRepo, RepoError};
use crate::domain::entities::GroupRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async, validate_slug};

#[derive(Debug, Error)]
pub enum GroupError {
    #[error(transparent)]
    Slug(#[from] SlugError),
    #[error("group slug `{0}` is already taken")]
    SlugTaken(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<SlugAsyncError<RepoError>> for GroupError {
    fn from(err: SlugAsyncError<RepoError>) -> Self {
        match err {
            SlugAsyncError::Slug(err) => Self::Slug(err),
            SlugAsyncError::Predicate(err) => Self::Repo(err),
        }
    }
}

/// Operator-side group management; groups are not edited once created.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupsRepo>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupsRepo>) -> Self {
        Self { groups }
    }

    /// Create a group, deriving a unique slug from the title unless one is given.
    pub async fn create_group(
        &self,
        title: &str,
        slug: Option<&str>,
        description: &str,
    ) -> Result<GroupRecord, GroupError> {
        let slug = match slug {
            Some(explicit) => {
                validate_slug(explicit)?;
                if self.groups.find_by_slug(explicit).await?.is_some() {
                    return Err(GroupError::SlugTaken(explicit.to_string()));
                }
                explicit.to_string()
            }
            None => {
                let groups = Arc::clone(&self.groups);
                generate_unique_slug_async(title, move |candidate| {
                    let groups = Arc::clone(&groups);
                    let candidate = candidate.to_string();
                    async move {
                        let existing = groups.find_by_slug(&candidate).await?;
                        Ok::<bool, RepoError>(existing.is_none())
                    }
                })
                .await?
            }
        };

        let group = self
            .groups
            .create_group(CreateGroupParams {
                title: title.trim().to_string(),
                slug,
                description: description.trim().to_string(),
            })
            .await?;

        info!(
            target = "yatube::application::groups",
            group_id = %group.id,
            slug = %group.slug,
            "group created"
        );
        Ok(group)
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupRecord>, GroupError> {
        Ok(self.groups.list_groups().await?)
    }
}
