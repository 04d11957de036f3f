#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use time::macros::datetime;
use yatube::application::posts::PostDraft;
use yatube::application::repos::{CreateUserParams, UsersRepo};
use yatube::cache::CacheConfig;
use yatube::domain::entities::{GroupRecord, PostRecord, UserRecord};
use yatube::infra::context::ApplicationContext;
use yatube::infra::memory::InMemoryStore;
use yatube::util::clock::{Clock, ManualClock};

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
    pub app: ApplicationContext,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_cache(CacheConfig::default())
    }

    pub fn with_cache(cache: CacheConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(ManualClock::starting_at(datetime!(2024-03-05 09:00 UTC)));
        let app = ApplicationContext::build(store.clone(), clock.clone(), cache);
        Self { store, clock, app }
    }

    pub async fn user(&self, username: &str) -> UserRecord {
        self.store
            .create_user(CreateUserParams {
                username: username.to_string(),
                display_name: None,
                created_at: self.clock.now_utc(),
            })
            .await
            .expect("create user")
    }

    pub async fn group(&self, title: &str, slug: &str) -> GroupRecord {
        self.app
            .groups
            .create_group(title, Some(slug), "")
            .await
            .expect("create group")
    }

    /// Publish a post one second after the previous one so ordering is stable.
    pub async fn post(
        &self,
        author: &UserRecord,
        text: &str,
        group: Option<&GroupRecord>,
    ) -> PostRecord {
        self.clock.advance(Duration::from_secs(1));
        self.app
            .posts
            .create_post(
                author.id,
                PostDraft {
                    text: text.to_string(),
                    group_id: group.map(|group| group.id),
                    image: None,
                },
            )
            .await
            .expect("create post")
    }
}
