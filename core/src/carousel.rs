//! Home page carousel slides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One carousel slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carousel {
    /// Slide id.
    pub id: i64,
    /// Image URL.
    pub image_url: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: Option<String>,
    /// Target link.
    pub link: Option<String>,
    /// Call-to-action label.
    pub button_text: Option<String>,
    /// Position, ascending.
    pub sort_order: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}
