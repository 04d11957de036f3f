mod support;

use yatube::application::feed::FeedError;
use yatube::application::follow::FollowError;
use yatube::application::groups::GroupError;
use yatube::application::posts::{PostDraft, PostError};
use yatube::domain::error::DomainError;
use yatube::domain::slug::SlugError;

use support::Fixture;

#[tokio::test]
async fn group_timeline_splits_eleven_posts_into_ten_and_one() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    let group = fx.group("Test group", "test-slug").await;
    for n in 0..11 {
        fx.post(&author, &format!("post {n}"), Some(&group)).await;
    }

    let first = fx
        .app
        .feed
        .group_timeline("test-slug", None)
        .await
        .expect("first page");
    assert_eq!(first.page.len(), 10);
    assert_eq!(first.page.num_pages, 2);
    assert_eq!(first.page.items[0].post.text, "post 10");

    let second = fx
        .app
        .feed
        .group_timeline("test-slug", Some("2"))
        .await
        .expect("second page");
    assert_eq!(second.page.len(), 1);
    assert_eq!(second.page.items[0].post.text, "post 0");

    let beyond = fx
        .app
        .feed
        .group_timeline("test-slug", Some("3"))
        .await
        .expect("clamped page");
    assert_eq!(beyond.page.number, 2);
    assert_eq!(beyond.page.len(), 1);

    let garbage = fx
        .app
        .feed
        .group_timeline("test-slug", Some("abc"))
        .await
        .expect("garbage token");
    assert_eq!(garbage.page.number, 1);
}

#[tokio::test]
async fn global_timeline_is_newest_first_and_includes_ungrouped_posts() {
    let fx = Fixture::new();
    let author = fx.user("leo").await;
    let group = fx.group("Cats", "cats").await;
    fx.post(&author, "grouped", Some(&group)).await;
    fx.post(&author, "loose", None).await;

    let page = fx.app.feed.global_timeline(None).await.expect("index");
    let texts: Vec<&str> = page.items.iter().map(|view| view.post.text.as_str()).collect();
    assert_eq!(texts, ["loose", "grouped"]);
    assert_eq!(page.items[1].group_slug.as_deref(), Some("cats"));
    assert_eq!(page.items[0].group_slug, None);
}

#[tokio::test]
async fn empty_store_renders_a_single_empty_page() {
    let fx = Fixture::new();
    let page = fx.app.feed.global_timeline(Some("7")).await.expect("index");
    assert!(page.is_empty());
    assert_eq!(page.number, 1);
    assert_eq!(page.num_pages, 1);
    assert!(!page.has_next());
}

#[tokio::test]
async fn group_and_author_listings_filter_posts() {
    let fx = Fixture::new();
    let leo = fx.user("leo").await;
    let mia = fx.user("mia").await;
    let cats = fx.group("Cats", "cats").await;
    let dogs = fx.group("Dogs", "dogs").await;
    fx.post(&leo, "leo on cats", Some(&cats)).await;
    fx.post(&mia, "mia on dogs", Some(&dogs)).await;
    fx.post(&mia, "mia ungrouped", None).await;

    let cats_page = fx.app.feed.group_timeline("cats", None).await.expect("cats");
    assert_eq!(cats_page.group.title, "Cats");
    assert_eq!(cats_page.page.total_count, 1);
    assert_eq!(cats_page.page.items[0].post.text, "leo on cats");

    let dogs_page = fx.app.feed.group_timeline("dogs", None).await.expect("dogs");
    assert!(
        dogs_page
            .page
            .items
            .iter()
            .all(|view| view.post.group_id == Some(dogs.id))
    );
    assert_eq!(dogs_page.page.total_count, 1);

    let profile = fx
        .app
        .feed
        .author_profile("mia", None, None)
        .await
        .expect("profile");
    assert_eq!(profile.posts_count, 2);
    assert!(profile.page.items.iter().all(|view| view.post.author_id == mia.id));
}

#[tokio::test]
async fn unknown_group_and_author_are_not_found() {
    let fx = Fixture::new();

    let group = fx.app.feed.group_timeline("missing", None).await;
    assert!(matches!(group, Err(FeedError::NotFound { entity: "group" })));

    let author = fx.app.feed.author_profile("nobody", None, None).await;
    assert!(matches!(author, Err(FeedError::NotFound { entity: "author" })));
}

#[tokio::test]
async fn profile_reports_following_for_the_viewer_only() {
    let fx = Fixture::new();
    let author = fx.user("author").await;
    let reader = fx.user("reader").await;
    fx.post(&author, "hello", None).await;
    fx.app
        .follows
        .follow(reader.id, author.id)
        .await
        .expect("follow");

    let anonymous = fx
        .app
        .feed
        .author_profile("author", None, None)
        .await
        .expect("anonymous profile");
    assert!(!anonymous.following);
    assert_eq!(anonymous.followers_count, 1);

    let signed_in = fx
        .app
        .feed
        .author_profile("author", Some(reader.id), None)
        .await
        .expect("reader profile");
    assert!(signed_in.following);

    let own = fx
        .app
        .feed
        .author_profile("author", Some(author.id), None)
        .await
        .expect("own profile");
    assert!(!own.following);
}

#[tokio::test]
async fn follower_feed_shows_only_followed_authors() {
    let fx = Fixture::new();
    let a = fx.user("a").await;
    let b = fx.user("b").await;
    let c = fx.user("c").await;
    let d = fx.user("d").await;
    fx.post(&b, "from b", None).await;
    fx.post(&c, "from c", None).await;
    fx.app.follows.follow(a.id, b.id).await.expect("follow");

    let feed_a = fx.app.feed.follower_feed(a.id, None).await.expect("feed a");
    let texts: Vec<&str> = feed_a.items.iter().map(|view| view.post.text.as_str()).collect();
    assert_eq!(texts, ["from b"]);

    let feed_d = fx.app.feed.follower_feed(d.id, None).await.expect("feed d");
    assert!(feed_d.is_empty());
    assert_eq!(feed_d.num_pages, 1);

    fx.post(&b, "b again", None).await;
    let refreshed = fx.app.feed.follower_feed(a.id, None).await.expect("feed a");
    assert_eq!(refreshed.items[0].post.text, "b again");
    assert_eq!(refreshed.total_count, 2);
    assert!(!refreshed.items.iter().any(|view| view.post.author_id == c.id));
}

#[tokio::test]
async fn follow_is_idempotent_and_ignores_self() {
    let fx = Fixture::new();
    let reader = fx.user("reader").await;
    let author = fx.user("author").await;

    let first = fx
        .app
        .follows
        .follow(reader.id, author.id)
        .await
        .expect("first follow");
    assert!(first.changed);
    assert!(first.following);

    let second = fx
        .app
        .follows
        .follow(reader.id, author.id)
        .await
        .expect("second follow");
    assert!(!second.changed);
    assert!(second.following);

    let counts = fx.app.follows.counts(author.id).await.expect("counts");
    assert_eq!(counts.followers, 1);

    let own = fx
        .app
        .follows
        .follow(reader.id, reader.id)
        .await
        .expect("self follow");
    assert!(!own.changed);
    assert!(!own.following);
    let reader_counts = fx.app.follows.counts(reader.id).await.expect("counts");
    assert_eq!(reader_counts.followers, 0);
    assert_eq!(reader_counts.following, 1);
}

#[tokio::test]
async fn unfollow_requires_an_existing_edge() {
    let fx = Fixture::new();
    let reader = fx.user("reader").await;
    let author = fx.user("author").await;

    let missing = fx.app.follows.unfollow(reader.id, author.id).await;
    assert!(matches!(missing, Err(FollowError::NotFollowing)));

    fx.app
        .follows
        .follow_username(reader.id, "author")
        .await
        .expect("follow");
    let removed = fx
        .app
        .follows
        .unfollow_username(reader.id, "author")
        .await
        .expect("unfollow");
    assert!(removed.changed);
    assert!(!removed.following);
    assert!(
        !fx.app
            .follows
            .is_following(reader.id, author.id)
            .await
            .expect("exists")
    );

    let unknown = fx.app.follows.follow_username(reader.id, "ghost").await;
    assert!(matches!(unknown, Err(FollowError::UnknownAuthor)));
}

#[tokio::test]
async fn only_the_author_may_edit_a_post() {
    let fx = Fixture::new();
    let author = fx.user("author").await;
    let other = fx.user("other").await;
    let group = fx.group("Cats", "cats").await;
    let post = fx.post(&author, "draft", None).await;

    let denied = fx
        .app
        .posts
        .edit_post(
            other.id,
            post.id,
            PostDraft {
                text: "hijacked".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        denied,
        Err(PostError::Domain(DomainError::Forbidden { .. }))
    ));

    let edited = fx
        .app
        .posts
        .edit_post(
            author.id,
            post.id,
            PostDraft {
                text: "final".to_string(),
                group_id: Some(group.id),
                image: None,
            },
        )
        .await
        .expect("edit");
    assert_eq!(edited.text, "final");
    assert_eq!(edited.created_at, post.created_at);

    let cats = fx.app.feed.group_timeline("cats", None).await.expect("cats");
    assert_eq!(cats.page.items[0].post.text, "final");
}

#[tokio::test]
async fn post_validation_rejects_blank_text_and_unknown_groups() {
    let fx = Fixture::new();
    let author = fx.user("author").await;

    let blank = fx
        .app
        .posts
        .create_post(
            author.id,
            PostDraft {
                text: "   ".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        blank,
        Err(PostError::Domain(DomainError::Validation { .. }))
    ));

    let unknown_group = fx
        .app
        .posts
        .create_post(
            author.id,
            PostDraft {
                text: "hello".to_string(),
                group_id: Some(uuid::Uuid::new_v4()),
                image: None,
            },
        )
        .await;
    assert!(matches!(
        unknown_group,
        Err(PostError::Domain(DomainError::Validation { .. }))
    ));
}

#[tokio::test]
async fn post_detail_lists_comments_oldest_first() {
    let fx = Fixture::new();
    let author = fx.user("author").await;
    let reader = fx.user("reader").await;
    let post = fx.post(&author, "discuss", None).await;
    fx.post(&author, "another", None).await;

    for text in ["first", "second", "third"] {
        fx.clock.advance(std::time::Duration::from_secs(1));
        fx.app
            .posts
            .add_comment(reader.id, post.id, text)
            .await
            .expect("comment");
    }

    let detail = fx.app.posts.post_detail(post.id, None).await.expect("detail");
    assert_eq!(detail.post.post.text, "discuss");
    assert_eq!(detail.author_posts_count, 2);
    let comments: Vec<&str> = detail
        .comments
        .items
        .iter()
        .map(|view| view.comment.text.as_str())
        .collect();
    assert_eq!(comments, ["first", "second", "third"]);
    assert!(detail.comments.items.iter().all(|view| view.author_username == "reader"));

    let missing = fx
        .app
        .posts
        .add_comment(reader.id, uuid::Uuid::new_v4(), "lost")
        .await;
    assert!(matches!(
        missing,
        Err(PostError::Domain(DomainError::NotFound { entity: "post" }))
    ));
}

#[tokio::test]
async fn group_slugs_are_derived_and_unique() {
    let fx = Fixture::new();

    let first = fx
        .app
        .groups
        .create_group("Rust Weekly", None, "news")
        .await
        .expect("first");
    assert_eq!(first.slug, "rust-weekly");

    let second = fx
        .app
        .groups
        .create_group("Rust Weekly", None, "")
        .await
        .expect("second");
    assert_eq!(second.slug, "rust-weekly-2");

    let taken = fx
        .app
        .groups
        .create_group("Other", Some("rust-weekly"), "")
        .await;
    assert!(matches!(taken, Err(GroupError::SlugTaken(slug)) if slug == "rust-weekly"));

    let invalid = fx.app.groups.create_group("Bad", Some("Bad Slug"), "").await;
    assert!(matches!(
        invalid,
        Err(GroupError::Slug(SlugError::Invalid { .. }))
    ));

    let titles: Vec<String> = fx
        .app
        .groups
        .list_groups()
        .await
        .expect("list")
        .into_iter()
        .map(|group| group.slug)
        .collect();
    assert_eq!(titles, ["rust-weekly", "rust-weekly-2"]);
}
