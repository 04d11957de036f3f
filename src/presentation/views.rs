use axum::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::application::error::HttpError;
use crate::application::feed::{AuthorProfile, FeedPage, GroupTimeline};
use crate::application::follow::FollowOutcome;
use crate::application::pagination::Page;
use crate::application::posts::PostDetail;
use crate::domain::entities::{CommentView, GroupRecord, PostView};
use crate::domain::posts::format_human_date;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct RenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: serde_json::Error,
}

impl RenderError {
    pub fn new(
        source: &'static str,
        public_message: &'static str,
        error: serde_json::Error,
    ) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<RenderError> for HttpError {
    fn from(err: RenderError) -> Self {
        let RenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

/// Serialize a view into the bytes sent to the client.
pub fn render_json<T: Serialize>(view: &T) -> Result<Bytes, RenderError> {
    serde_json::to_vec(view).map(Bytes::from).map_err(|err| {
        RenderError::new(
            "presentation::views::render_json",
            "View rendering failed",
            err,
        )
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct PageNav {
    pub number: usize,
    pub num_pages: usize,
    pub total_count: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub start_index: usize,
    pub end_index: usize,
}

impl PageNav {
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            num_pages: page.num_pages,
            total_count: page.total_count,
            previous: page.previous_page_number(),
            next: page.next_page_number(),
            start_index: page.start_index(),
            end_index: page.end_index(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupLink {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub group: Option<GroupLink>,
    pub image: Option<String>,
    pub published: String,
    pub published_iso: String,
}

impl From<&PostView> for PostCard {
    fn from(view: &PostView) -> Self {
        let group = match (&view.group_slug, &view.group_title) {
            (Some(slug), Some(title)) => Some(GroupLink {
                slug: slug.clone(),
                title: title.clone(),
            }),
            _ => None,
        };

        Self {
            id: view.post.id,
            text: view.post.text.clone(),
            author: view.author_username.clone(),
            group,
            image: view.post.image.clone(),
            published: format_human_date(view.post.created_at.date()),
            published_iso: iso_timestamp(view.post.created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentCard {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub created_iso: String,
}

impl From<&CommentView> for CommentCard {
    fn from(view: &CommentView) -> Self {
        Self {
            id: view.comment.id,
            author: view.author_username.clone(),
            text: view.comment.text.clone(),
            created_iso: iso_timestamp(view.comment.created_at),
        }
    }
}

fn post_cards(page: &FeedPage) -> Vec<PostCard> {
    page.items.iter().map(PostCard::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexView {
    pub posts: Vec<PostCard>,
    pub page: PageNav,
}

impl From<&FeedPage> for IndexView {
    fn from(page: &FeedPage) -> Self {
        Self {
            posts: post_cards(page),
            page: PageNav::of(page),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub group: GroupHeader,
    pub posts: Vec<PostCard>,
    pub page: PageNav,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupHeader {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<&GroupRecord> for GroupHeader {
    fn from(group: &GroupRecord) -> Self {
        Self {
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        }
    }
}

impl From<&GroupTimeline> for GroupView {
    fn from(timeline: &GroupTimeline) -> Self {
        Self {
            group: GroupHeader::from(&timeline.group),
            posts: post_cards(&timeline.page),
            page: PageNav::of(&timeline.page),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub name: String,
    pub posts_count: usize,
    pub followers_count: u64,
    pub following: bool,
    pub posts: Vec<PostCard>,
    pub page: PageNav,
}

impl From<&AuthorProfile> for ProfileView {
    fn from(profile: &AuthorProfile) -> Self {
        Self {
            username: profile.author.username.clone(),
            name: profile.author.label().to_string(),
            posts_count: profile.posts_count,
            followers_count: profile.followers_count,
            following: profile.following,
            posts: post_cards(&profile.page),
            page: PageNav::of(&profile.page),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowFeedView {
    pub posts: Vec<PostCard>,
    pub page: PageNav,
}

impl From<&FeedPage> for FollowFeedView {
    fn from(page: &FeedPage) -> Self {
        Self {
            posts: post_cards(page),
            page: PageNav::of(page),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    pub post: PostCard,
    pub author_posts_count: u64,
    pub comments: Vec<CommentCard>,
    pub comments_page: PageNav,
}

impl From<&PostDetail> for PostDetailView {
    fn from(detail: &PostDetail) -> Self {
        Self {
            post: PostCard::from(&detail.post),
            author_posts_count: detail.author_posts_count,
            comments: detail.comments.items.iter().map(CommentCard::from).collect(),
            comments_page: PageNav::of(&detail.comments),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowView {
    pub author: String,
    pub changed: bool,
    pub following: bool,
}

impl FollowView {
    pub fn new(author: &str, outcome: FollowOutcome) -> Self {
        Self {
            author: author.to_string(),
            changed: outcome.changed,
            following: outcome.following,
        }
    }
}

fn iso_timestamp(value: time::OffsetDateTime) -> String {
    value
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}
