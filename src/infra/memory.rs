//! Process-local store implementing every repository trait.
//!
//! Used when no database URL is configured and by the integration tests.
//! Each operation takes the state lock once, so create-if-absent checks and
//! inserts happen under a single write guard.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::application::repos::{
    CommentsRepo, CreateCommentParams, CreateGroupParams, CreatePostParams, CreateUserParams,
    FollowsRepo, GroupsRepo, PostListScope, PostsRepo, RepoError, UpdatePostParams, UsersRepo,
};
use crate::domain::entities::{
    CommentRecord, CommentView, FollowRecord, GroupRecord, PostRecord, PostView, UserRecord,
};
use crate::domain::posts::{newest_first, oldest_first};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, UserRecord>,
    groups: HashMap<Uuid, GroupRecord>,
    posts: HashMap<Uuid, PostRecord>,
    comments: HashMap<Uuid, CommentRecord>,
    follows: HashMap<(Uuid, Uuid), FollowRecord>,
}

impl MemoryState {
    fn in_scope(&self, post: &PostRecord, scope: PostListScope) -> bool {
        match scope {
            PostListScope::All => true,
            PostListScope::Group(group_id) => post.group_id == Some(group_id),
            PostListScope::Author(author_id) => post.author_id == author_id,
            PostListScope::FollowedBy(user_id) => {
                self.follows.contains_key(&(user_id, post.author_id))
            }
        }
    }

    fn view_of(&self, post: &PostRecord) -> Result<PostView, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .ok_or_else(|| RepoError::Integrity {
                message: format!("post `{}` references a missing author", post.id),
            })?;
        let group = post.group_id.and_then(|id| self.groups.get(&id));

        Ok(PostView {
            post: post.clone(),
            author_username: author.username.clone(),
            group_slug: group.map(|group| group.slug.clone()),
            group_title: group.map(|group| group.title.clone()),
        })
    }

    fn require_user(&self, id: Uuid, role: &str) -> Result<(), RepoError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(RepoError::InvalidInput {
                message: format!("{role} `{id}` does not exist"),
            })
        }
    }

    fn require_group(&self, group_id: Option<Uuid>) -> Result<(), RepoError> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(RepoError::InvalidInput {
                message: format!("group `{id}` does not exist"),
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[async_trait]
impl UsersRepo for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|user| user.username == params.username)
        {
            return Err(RepoError::Duplicate {
                constraint: "users_username_key".to_string(),
            });
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            username: params.username,
            display_name: params.display_name,
            created_at: params.created_at,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl GroupsRepo for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupRecord>, RepoError> {
        Ok(self.state.read().await.groups.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<GroupRecord>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .groups
            .values()
            .find(|group| group.slug == slug)
            .cloned())
    }

    async fn list_groups(&self) -> Result<Vec<GroupRecord>, RepoError> {
        let state = self.state.read().await;
        let mut groups: Vec<GroupRecord> = state.groups.values().cloned().collect();
        groups.sort_by(|left, right| {
            left.title
                .cmp(&right.title)
                .then_with(|| left.slug.cmp(&right.slug))
        });
        Ok(groups)
    }

    async fn create_group(&self, params: CreateGroupParams) -> Result<GroupRecord, RepoError> {
        let mut state = self.state.write().await;
        if state.groups.values().any(|group| group.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "groups_slug_key".to_string(),
            });
        }

        let group = GroupRecord {
            id: Uuid::new_v4(),
            title: params.title,
            slug: params.slug,
            description: params.description,
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }
}

#[async_trait]
impl PostsRepo for InMemoryStore {
    async fn count_posts(&self, scope: PostListScope) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        let total = state
            .posts
            .values()
            .filter(|post| state.in_scope(post, scope))
            .count();
        Ok(count(total))
    }

    async fn list_posts(
        &self,
        scope: PostListScope,
        window: PageWindow,
    ) -> Result<Vec<PostView>, RepoError> {
        let state = self.state.read().await;
        let mut posts: Vec<&PostRecord> = state
            .posts
            .values()
            .filter(|post| state.in_scope(post, scope))
            .collect();
        posts.sort_by(|left, right| newest_first(left, right));

        posts
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .map(|post| state.view_of(post))
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let state = self.state.read().await;
        state.posts.get(&id).map(|post| state.view_of(post)).transpose()
    }

    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state.write().await;
        state.require_user(params.author_id, "author")?;
        state.require_group(params.group_id)?;

        let post = PostRecord {
            id: Uuid::new_v4(),
            text: params.text,
            author_id: params.author_id,
            group_id: params.group_id,
            image: params.image,
            created_at: params.created_at,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state.write().await;
        state.require_group(params.group_id)?;

        let post = state.posts.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        post.text = params.text;
        post.group_id = params.group_id;
        post.image = params.image;
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if state.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        state.comments.retain(|_, comment| comment.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentsRepo for InMemoryStore {
    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        let total = state
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .count();
        Ok(count(total))
    }

    async fn list_for_post(
        &self,
        post_id: Uuid,
        window: PageWindow,
    ) -> Result<Vec<CommentView>, RepoError> {
        let state = self.state.read().await;
        let mut comments: Vec<&CommentRecord> = state
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        comments.sort_by(|left, right| oldest_first(left, right));

        comments
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .map(|comment| {
                let author = state
                    .users
                    .get(&comment.author_id)
                    .ok_or_else(|| RepoError::Integrity {
                        message: format!("comment `{}` references a missing author", comment.id),
                    })?;
                Ok(CommentView {
                    comment: comment.clone(),
                    author_username: author.username.clone(),
                })
            })
            .collect()
    }

    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let mut state = self.state.write().await;
        state.require_user(params.author_id, "author")?;
        if !state.posts.contains_key(&params.post_id) {
            return Err(RepoError::InvalidInput {
                message: format!("post `{}` does not exist", params.post_id),
            });
        }

        let comment = CommentRecord {
            id: Uuid::new_v4(),
            post_id: params.post_id,
            author_id: params.author_id,
            text: params.text,
            created_at: params.created_at,
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl FollowsRepo for InMemoryStore {
    async fn create_if_absent(
        &self,
        user_id: Uuid,
        author_id: Uuid,
        created_at: OffsetDateTime,
    ) -> Result<bool, RepoError> {
        if user_id == author_id {
            return Err(RepoError::InvalidInput {
                message: "a user cannot follow themselves".to_string(),
            });
        }

        let mut state = self.state.write().await;
        state.require_user(user_id, "follower")?;
        state.require_user(author_id, "author")?;

        if state.follows.contains_key(&(user_id, author_id)) {
            return Ok(false);
        }
        state.follows.insert(
            (user_id, author_id),
            FollowRecord {
                id: Uuid::new_v4(),
                user_id,
                author_id,
                created_at,
            },
        );
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        Ok(state.follows.remove(&(user_id, author_id)).is_some())
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .state
            .read()
            .await
            .follows
            .contains_key(&(user_id, author_id)))
    }

    async fn count_followers(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        Ok(count(
            state
                .follows
                .keys()
                .filter(|(_, author)| *author == author_id)
                .count(),
        ))
    }

    async fn count_following(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        Ok(count(
            state
                .follows
                .keys()
                .filter(|(user, _)| *user == user_id)
                .count(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;

    async fn user(store: &InMemoryStore, username: &str) -> UserRecord {
        store
            .create_user(CreateUserParams {
                username: username.to_string(),
                display_name: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .await
            .expect("create user")
    }

    fn window(offset: usize, limit: usize) -> PageWindow {
        PageWindow {
            number: 1,
            num_pages: 1,
            total_count: limit,
            per_page: limit,
            offset,
            limit,
        }
    }

    #[tokio::test]
    async fn concurrent_follows_write_one_edge() {
        let store = InMemoryStore::new();
        let reader = user(&store, "reader").await;
        let author = user(&store, "author").await;

        let (reader_id, author_id) = (reader.id, author.id);
        let attempts: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_if_absent(reader_id, author_id, OffsetDateTime::UNIX_EPOCH)
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            if attempt.await.expect("join").expect("follow") {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count_followers(author.id).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn deleting_a_post_drops_its_comments() {
        let store = InMemoryStore::new();
        let author = user(&store, "author").await;
        let post = store
            .create_post(CreatePostParams {
                author_id: author.id,
                text: "hello".to_string(),
                group_id: None,
                image: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .await
            .expect("post");
        store
            .create_comment(CreateCommentParams {
                post_id: post.id,
                author_id: author.id,
                text: "first".to_string(),
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .await
            .expect("comment");

        store.delete_post(post.id).await.expect("delete");

        assert_eq!(store.count_for_post(post.id).await.expect("count"), 0);
        assert!(matches!(
            store.delete_post(post.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn listing_is_newest_first_with_offset() {
        let store = InMemoryStore::new();
        let author = user(&store, "author").await;
        for minute in 0..5 {
            store
                .create_post(CreatePostParams {
                    author_id: author.id,
                    text: format!("post {minute}"),
                    group_id: None,
                    image: None,
                    created_at: OffsetDateTime::UNIX_EPOCH + Duration::minutes(minute),
                })
                .await
                .expect("post");
        }

        let listed = store
            .list_posts(PostListScope::All, window(1, 2))
            .await
            .expect("list");
        let texts: Vec<&str> = listed.iter().map(|view| view.post.text.as_str()).collect();
        assert_eq!(texts, vec!["post 3", "post 2"]);
        assert_eq!(listed[0].author_username, "author");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = InMemoryStore::new();
        user(&store, "leo").await;
        let err = store
            .create_user(CreateUserParams {
                username: "leo".to_string(),
                display_name: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            })
            .await
            .expect_err("duplicate");
        assert!(matches!(err, RepoError::Duplicate { .. }));
    }
}
