//! Content models: FAQs and CMS pages.

use serde::{Deserialize, Serialize};

use super::common::Pagination;

/// `GET /faqs` response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct FaqsPayload {
    #[serde(default)]
    pub faqs: Vec<ApiFaq>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFaq {
    pub id: i64,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub question_ar: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub answer_ar: Option<String>,
    #[serde(default)]
    pub sequence: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Row projection for the FAQ table; drag-reorder works on `sequence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub question_ar: String,
    pub sequence: u32,
    pub status: String,
}

impl ApiFaq {
    pub fn to_faq(&self) -> Faq {
        Faq {
            id: self.id,
            question: self.question.clone().unwrap_or_default(),
            question_ar: self.question_ar.clone().unwrap_or_default(),
            sequence: self.sequence.unwrap_or_default(),
            status: self.status.clone().unwrap_or_default(),
        }
    }
}

/// Create/update payload for an FAQ.
#[derive(Debug, Clone, Serialize)]
pub struct FaqInput {
    pub question: String,
    pub question_ar: String,
    pub answer: String,
    pub answer_ar: String,
}

/// `GET /cms` response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CmsPayload {
    #[serde(default)]
    pub cms: Vec<ApiCmsPage>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCmsPage {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_ar: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_ar: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Row projection for the CMS pages table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsPage {
    pub id: i64,
    pub title: String,
    pub title_ar: String,
    pub created_at: String,
    pub status: String,
}

impl ApiCmsPage {
    pub fn to_page(&self) -> CmsPage {
        CmsPage {
            id: self.id,
            title: self.title.clone().unwrap_or_default(),
            title_ar: self.title_ar.clone().unwrap_or_default(),
            created_at: self.created_at.clone().unwrap_or_default(),
            status: self.status.clone().unwrap_or_default(),
        }
    }
}

/// Create/update payload for a CMS page.
#[derive(Debug, Clone, Serialize)]
pub struct CmsInput {
    pub title: String,
    pub title_ar: String,
    pub content: String,
    pub content_ar: String,
}
