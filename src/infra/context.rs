//! Service wiring shared by the binary and the integration tests.

use std::sync::Arc;

use crate::application::feed::FeedService;
use crate::application::follow::FollowService;
use crate::application::groups::GroupService;
use crate::application::posts::PostService;
use crate::application::repos::{CommentsRepo, FollowsRepo, GroupsRepo, PostsRepo, UsersRepo};
use crate::application::timeline::TimelineService;
use crate::cache::{CacheConfig, TimelineCache};
use crate::infra::db::PostgresRepositories;
use crate::infra::http::HttpState;
use crate::util::clock::Clock;

/// A store able to back every service.
pub trait Store: UsersRepo + GroupsRepo + PostsRepo + CommentsRepo + FollowsRepo + 'static {}

impl<T> Store for T where T: UsersRepo + GroupsRepo + PostsRepo + CommentsRepo + FollowsRepo + 'static
{}

#[derive(Clone)]
pub struct ApplicationContext {
    pub users: Arc<dyn UsersRepo>,
    pub feed: Arc<FeedService>,
    pub timeline: Arc<TimelineService>,
    pub follows: Arc<FollowService>,
    pub posts: Arc<PostService>,
    pub groups: Arc<GroupService>,
    pub db: Option<Arc<PostgresRepositories>>,
}

impl ApplicationContext {
    pub fn build<S: Store>(store: Arc<S>, clock: Arc<dyn Clock>, cache: CacheConfig) -> Self {
        let users: Arc<dyn UsersRepo> = store.clone();
        let groups: Arc<dyn GroupsRepo> = store.clone();
        let posts: Arc<dyn PostsRepo> = store.clone();
        let comments: Arc<dyn CommentsRepo> = store.clone();
        let follows: Arc<dyn FollowsRepo> = store;

        let feed = FeedService::new(
            posts.clone(),
            groups.clone(),
            users.clone(),
            follows.clone(),
        );
        let cache = Arc::new(TimelineCache::new(cache, clock.clone()));

        Self {
            timeline: Arc::new(TimelineService::new(feed.clone(), cache)),
            feed: Arc::new(feed),
            follows: Arc::new(FollowService::new(users.clone(), follows, clock.clone())),
            posts: Arc::new(PostService::new(posts, groups.clone(), comments, clock)),
            groups: Arc::new(GroupService::new(groups)),
            users,
            db: None,
        }
    }

    /// Attach the Postgres handle probed by the health route.
    pub fn with_database(mut self, db: Arc<PostgresRepositories>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn http_state(&self) -> HttpState {
        HttpState {
            feed: self.feed.clone(),
            timeline: self.timeline.clone(),
            follows: self.follows.clone(),
            posts: self.posts.clone(),
            users: self.users.clone(),
            db: self.db.clone(),
        }
    }
}
