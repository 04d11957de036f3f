//! Directed follow edges between users and authors.
//!
//! Following is lenient: repeating a follow or following yourself is a
//! no-op. Unfollowing is strict: removing an edge that does not exist is
//! reported as not found.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{FollowsRepo, RepoError, UsersRepo};
use crate::domain::entities::UserRecord;
use crate::util::clock::Clock;

#[derive(Debug, Error)]
pub enum FollowError {
    #[error("author not found")]
    UnknownAuthor,
    #[error("follow relationship not found")]
    NotFollowing,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowOutcome {
    /// Whether this call added or removed an edge.
    pub changed: bool,
    /// Following state after the call.
    pub following: bool,
}

#[derive(Clone)]
pub struct FollowService {
    users: Arc<dyn UsersRepo>,
    follows: Arc<dyn FollowsRepo>,
    clock: Arc<dyn Clock>,
}

impl FollowService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        follows: Arc<dyn FollowsRepo>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            follows,
            clock,
        }
    }

    pub async fn follow(&self, follower: Uuid, target: Uuid) -> Result<FollowOutcome, FollowError> {
        if follower == target {
            return Ok(FollowOutcome {
                changed: false,
                following: false,
            });
        }

        let created = self
            .follows
            .create_if_absent(follower, target, self.clock.now_utc())
            .await?;
        if created {
            info!(
                target = "yatube::application::follow",
                follower = %follower,
                author = %target,
                "follow created"
            );
        }

        Ok(FollowOutcome {
            changed: created,
            following: true,
        })
    }

    pub async fn unfollow(
        &self,
        follower: Uuid,
        target: Uuid,
    ) -> Result<FollowOutcome, FollowError> {
        if !self.follows.delete(follower, target).await? {
            return Err(FollowError::NotFollowing);
        }

        info!(
            target = "yatube::application::follow",
            follower = %follower,
            author = %target,
            "follow removed"
        );

        Ok(FollowOutcome {
            changed: true,
            following: false,
        })
    }

    pub async fn is_following(&self, follower: Uuid, target: Uuid) -> Result<bool, FollowError> {
        Ok(self.follows.exists(follower, target).await?)
    }

    pub async fn follow_username(
        &self,
        follower: Uuid,
        username: &str,
    ) -> Result<FollowOutcome, FollowError> {
        let author = self.resolve_author(username).await?;
        self.follow(follower, author.id).await
    }

    pub async fn unfollow_username(
        &self,
        follower: Uuid,
        username: &str,
    ) -> Result<FollowOutcome, FollowError> {
        let author = self.resolve_author(username).await?;
        self.unfollow(follower, author.id).await
    }

    pub async fn counts(&self, user: Uuid) -> Result<FollowCounts, FollowError> {
        Ok(FollowCounts {
            followers: self.follows.count_followers(user).await?,
            following: self.follows.count_following(user).await?,
        })
    }

    async fn resolve_author(&self, username: &str) -> Result<UserRecord, FollowError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or(FollowError::UnknownAuthor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowCounts {
    pub followers: u64,
    pub following: u64,
}
