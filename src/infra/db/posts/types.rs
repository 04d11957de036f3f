use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{PostRecord, PostView};

pub(crate) const POST_VIEW_COLUMNS: &str = "p.id, p.text, p.author_id, p.group_id, p.image, \
     p.created_at, u.username AS author_username, g.slug AS group_slug, g.title AS group_title";

pub(crate) const POST_VIEW_FROM: &str =
    " FROM posts p JOIN users u ON u.id = p.author_id LEFT JOIN groups g ON g.id = p.group_id ";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) text: String,
    pub(crate) author_id: Uuid,
    pub(crate) group_id: Option<Uuid>,
    pub(crate) image: Option<String>,
    pub(crate) created_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            text: row.text,
            author_id: row.author_id,
            group_id: row.group_id,
            image: row.image,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostViewRow {
    #[sqlx(flatten)]
    pub(crate) post: PostRow,
    pub(crate) author_username: String,
    pub(crate) group_slug: Option<String>,
    pub(crate) group_title: Option<String>,
}

impl From<PostViewRow> for PostView {
    fn from(row: PostViewRow) -> Self {
        Self {
            post: row.post.into(),
            author_username: row.author_username,
            group_slug: row.group_slug,
            group_title: row.group_title,
        }
    }
}
