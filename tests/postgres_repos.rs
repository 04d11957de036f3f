use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use time::macros::datetime;
use yatube::application::pagination::Paginator;
use yatube::application::posts::PostDraft;
use yatube::application::repos::{
    CommentsRepo, CreateUserParams, FollowsRepo, PostListScope, PostsRepo, RepoError, UsersRepo,
};
use yatube::cache::CacheConfig;
use yatube::domain::entities::UserRecord;
use yatube::infra::context::ApplicationContext;
use yatube::infra::db::PostgresRepositories;
use yatube::util::clock::{Clock, ManualClock};

struct Harness {
    repos: Arc<PostgresRepositories>,
    clock: Arc<ManualClock>,
    app: ApplicationContext,
}

fn harness(pool: PgPool) -> Harness {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let clock = Arc::new(ManualClock::starting_at(datetime!(2024-03-05 09:00 UTC)));
    let app = ApplicationContext::build(repos.clone(), clock.clone(), CacheConfig::default())
        .with_database(repos.clone());
    Harness { repos, clock, app }
}

async fn user(h: &Harness, username: &str) -> UserRecord {
    h.repos
        .create_user(CreateUserParams {
            username: username.to_string(),
            display_name: None,
            created_at: h.clock.now_utc(),
        })
        .await
        .expect("create user")
}

async fn publish(
    h: &Harness,
    author: &UserRecord,
    text: &str,
    group: Option<uuid::Uuid>,
) -> uuid::Uuid {
    h.clock.advance(Duration::from_secs(1));
    h.app
        .posts
        .create_post(
            author.id,
            PostDraft {
                text: text.to_string(),
                group_id: group,
                image: None,
            },
        )
        .await
        .expect("create post")
        .id
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_username_is_reported(pool: PgPool) {
    let h = harness(pool);
    user(&h, "leo").await;

    let err = h
        .repos
        .create_user(CreateUserParams {
            username: "leo".to_string(),
            display_name: None,
            created_at: h.clock.now_utc(),
        })
        .await
        .expect_err("duplicate username");
    assert!(matches!(err, RepoError::Duplicate { .. }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn follow_edges_are_unique(pool: PgPool) {
    let h = harness(pool);
    let reader = user(&h, "reader").await;
    let author = user(&h, "author").await;

    let now = h.clock.now_utc();
    assert!(h.repos.create_if_absent(reader.id, author.id, now).await.expect("first"));
    assert!(!h.repos.create_if_absent(reader.id, author.id, now).await.expect("second"));
    assert!(h.repos.exists(reader.id, author.id).await.expect("exists"));
    assert_eq!(h.repos.count_followers(author.id).await.expect("count"), 1);
    assert_eq!(h.repos.count_following(reader.id).await.expect("count"), 1);

    assert!(h.repos.delete(reader.id, author.id).await.expect("delete"));
    assert!(!h.repos.delete(reader.id, author.id).await.expect("delete again"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn scoped_listings_paginate_newest_first(pool: PgPool) {
    let h = harness(pool);
    let author = user(&h, "author").await;
    let other = user(&h, "other").await;
    let group = h
        .app
        .groups
        .create_group("Test group", Some("test-slug"), "")
        .await
        .expect("group");
    for n in 0..11 {
        publish(&h, &author, &format!("post {n}"), Some(group.id)).await;
    }
    publish(&h, &other, "ungrouped", None).await;

    assert_eq!(h.repos.count_posts(PostListScope::All).await.expect("count"), 12);
    assert_eq!(
        h.repos
            .count_posts(PostListScope::Group(group.id))
            .await
            .expect("count"),
        11
    );

    let window = Paginator::new(10).window(11, Some("2"));
    let second = h
        .repos
        .list_posts(PostListScope::Group(group.id), window)
        .await
        .expect("list");
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].post.text, "post 0");
    assert_eq!(second[0].group_slug.as_deref(), Some("test-slug"));

    let first = h.app.feed.global_timeline(None).await.expect("index");
    assert_eq!(first.items[0].post.text, "ungrouped");
    assert_eq!(first.num_pages, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn follower_feed_reads_followed_authors(pool: PgPool) {
    let h = harness(pool);
    let a = user(&h, "a").await;
    let b = user(&h, "b").await;
    let c = user(&h, "c").await;
    publish(&h, &b, "from b", None).await;
    publish(&h, &c, "from c", None).await;
    h.app.follows.follow(a.id, b.id).await.expect("follow");

    let feed = h.app.feed.follower_feed(a.id, None).await.expect("feed");
    let texts: Vec<&str> = feed.items.iter().map(|view| view.post.text.as_str()).collect();
    assert_eq!(texts, ["from b"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleting_a_post_removes_its_comments(pool: PgPool) {
    let h = harness(pool);
    let author = user(&h, "author").await;
    let post_id = publish(&h, &author, "short lived", None).await;
    h.app
        .posts
        .add_comment(author.id, post_id, "note")
        .await
        .expect("comment");
    assert_eq!(h.repos.count_for_post(post_id).await.expect("count"), 1);

    h.repos.delete_post(post_id).await.expect("delete");
    assert_eq!(h.repos.count_for_post(post_id).await.expect("count"), 0);
    assert!(PostsRepo::find_by_id(h.repos.as_ref(), post_id).await.expect("find").is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn health_check_pings_the_pool(pool: PgPool) {
    let h = harness(pool);
    h.repos.health_check().await.expect("health");
}
