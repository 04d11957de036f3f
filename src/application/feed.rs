use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::pagination::{Page, Paginator};
use crate::application::repos::{
    FollowsRepo, GroupsRepo, PostListScope, PostsRepo, RepoError, UsersRepo,
};
use crate::domain::entities::{GroupRecord, PostView, UserRecord};

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: usize = 10;

pub type FeedPage = Page<PostView>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupTimeline {
    pub group: GroupRecord,
    pub page: FeedPage,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorProfile {
    pub author: UserRecord,
    pub posts_count: usize,
    pub followers_count: u64,
    /// Whether the viewer follows this author; always false for anonymous viewers.
    pub following: bool,
    pub page: FeedPage,
}

/// Read-only listings over the post store.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    groups: Arc<dyn GroupsRepo>,
    users: Arc<dyn UsersRepo>,
    follows: Arc<dyn FollowsRepo>,
    paginator: Paginator,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        groups: Arc<dyn GroupsRepo>,
        users: Arc<dyn UsersRepo>,
        follows: Arc<dyn FollowsRepo>,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            follows,
            paginator: Paginator::new(POSTS_PER_PAGE),
        }
    }

    /// Every post, newest first.
    pub async fn global_timeline(&self, page: Option<&str>) -> Result<FeedPage, FeedError> {
        self.list(PostListScope::All, page).await
    }

    pub async fn group_timeline(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<GroupTimeline, FeedError> {
        let group = self
            .groups
            .find_by_slug(slug)
            .await?
            .ok_or(FeedError::NotFound { entity: "group" })?;

        let page = self.list(PostListScope::Group(group.id), page).await?;
        Ok(GroupTimeline { group, page })
    }

    pub async fn author_profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: Option<&str>,
    ) -> Result<AuthorProfile, FeedError> {
        let author = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(FeedError::NotFound { entity: "author" })?;

        let following = match viewer {
            Some(viewer_id) => self.follows.exists(viewer_id, author.id).await?,
            None => false,
        };
        let followers_count = self.follows.count_followers(author.id).await?;
        let page = self.list(PostListScope::Author(author.id), page).await?;

        Ok(AuthorProfile {
            posts_count: page.total_count,
            followers_count,
            following,
            author,
            page,
        })
    }

    /// Posts by every author `viewer` follows, merged into one stream.
    pub async fn follower_feed(
        &self,
        viewer: Uuid,
        page: Option<&str>,
    ) -> Result<FeedPage, FeedError> {
        self.list(PostListScope::FollowedBy(viewer), page).await
    }

    async fn list(&self, scope: PostListScope, page: Option<&str>) -> Result<FeedPage, FeedError> {
        let total = self.posts.count_posts(scope).await?;
        let window = self
            .paginator
            .window(usize::try_from(total).unwrap_or(usize::MAX), page);

        let items = if window.limit == 0 {
            Vec::new()
        } else {
            self.posts.list_posts(scope, window).await?
        };

        debug!(
            target = "yatube::application::feed",
            scope = ?scope,
            page = window.number,
            num_pages = window.num_pages,
            returned = items.len(),
            "listed posts"
        );

        Ok(window.into_page(items))
    }
}
