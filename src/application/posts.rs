//! Authoring: creating and editing posts, commenting, post detail.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::pagination::{Page, Paginator};
use crate::application::repos::{
    CommentsRepo, CreateCommentParams, CreatePostParams, GroupsRepo, PostListScope, PostsRepo,
    RepoError, UpdatePostParams,
};
use crate::domain::entities::{CommentRecord, CommentView, PostRecord, PostView};
use crate::domain::error::DomainError;
use crate::domain::posts::{normalize_image, normalize_text};
use crate::util::clock::Clock;

/// Comments shown per page under a post.
pub const COMMENTS_PER_PAGE: usize = 10;

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Fields an author controls on a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    pub text: String,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: PostView,
    pub author_posts_count: u64,
    pub comments: Page<CommentView>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepo>,
    groups: Arc<dyn GroupsRepo>,
    comments: Arc<dyn CommentsRepo>,
    clock: Arc<dyn Clock>,
    comment_paginator: Paginator,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        groups: Arc<dyn GroupsRepo>,
        comments: Arc<dyn CommentsRepo>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            groups,
            comments,
            clock,
            comment_paginator: Paginator::new(COMMENTS_PER_PAGE),
        }
    }

    pub async fn create_post(&self, author: Uuid, draft: PostDraft) -> Result<PostRecord, PostError> {
        let text = normalize_text("text", &draft.text)?;
        self.ensure_group_exists(draft.group_id).await?;

        let post = self
            .posts
            .create_post(CreatePostParams {
                author_id: author,
                text,
                group_id: draft.group_id,
                image: normalize_image(draft.image.as_deref()),
                created_at: self.clock.now_utc(),
            })
            .await?;

        info!(
            target = "yatube::application::posts",
            post_id = %post.id,
            author = %author,
            group = ?post.group_id,
            "post created"
        );
        Ok(post)
    }

    /// Only the post's author may edit it.
    pub async fn edit_post(
        &self,
        editor: Uuid,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<PostRecord, PostError> {
        let existing = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post"))?;

        if existing.post.author_id != editor {
            return Err(DomainError::forbidden("only the author may edit this post").into());
        }

        let text = normalize_text("text", &draft.text)?;
        self.ensure_group_exists(draft.group_id).await?;

        let updated = self
            .posts
            .update_post(UpdatePostParams {
                id: post_id,
                text,
                group_id: draft.group_id,
                image: normalize_image(draft.image.as_deref()),
            })
            .await?;

        info!(
            target = "yatube::application::posts",
            post_id = %post_id,
            "post updated"
        );
        Ok(updated)
    }

    pub async fn add_comment(
        &self,
        author: Uuid,
        post_id: Uuid,
        text: &str,
    ) -> Result<CommentRecord, PostError> {
        let text = normalize_text("comment", text)?;
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post").into());
        }

        let comment = self
            .comments
            .create_comment(CreateCommentParams {
                post_id,
                author_id: author,
                text,
                created_at: self.clock.now_utc(),
            })
            .await?;
        Ok(comment)
    }

    pub async fn post_detail(
        &self,
        post_id: Uuid,
        comments_page: Option<&str>,
    ) -> Result<PostDetail, PostError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post"))?;

        let author_posts_count = self
            .posts
            .count_posts(PostListScope::Author(post.post.author_id))
            .await?;

        let total = self.comments.count_for_post(post_id).await?;
        let window = self
            .comment_paginator
            .window(usize::try_from(total).unwrap_or(usize::MAX), comments_page);
        let items = if window.limit == 0 {
            Vec::new()
        } else {
            self.comments.list_for_post(post_id, window).await?
        };

        Ok(PostDetail {
            post,
            author_posts_count,
            comments: window.into_page(items),
        })
    }

    async fn ensure_group_exists(&self, group_id: Option<Uuid>) -> Result<(), PostError> {
        let Some(id) = group_id else {
            return Ok(());
        };
        match self.groups.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::validation(format!("group `{id}` does not exist")).into()),
        }
    }
}
