//! The generated-content schema and its validation rules.

use serde::{Deserialize, Serialize};

use crate::error::GenAiError;

/// One platform's post: a caption plus its hashtags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPost {
    pub caption: String,
    pub hashtags: Vec<String>,
}

/// A concrete promotion suggestion with the statistic that motivates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionIdea {
    pub text: String,
    pub reason: String,
}

/// The full content package the model must return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub instagram: PlatformPost,
    pub tiktok: PlatformPost,
    pub promotion_ideas: Vec<PromotionIdea>,
}

impl GeneratedContent {
    /// Check the schema rules serde cannot express. Error messages name the
    /// offending field.
    pub fn validate(&self) -> Result<(), GenAiError> {
        validate_post(&self.instagram, "instagram")?;
        validate_post(&self.tiktok, "tiktok")?;

        if self.promotion_ideas.is_empty() {
            return Err(GenAiError::SchemaValidation(
                "promotion_ideas must not be empty".to_string(),
            ));
        }
        for (idx, idea) in self.promotion_ideas.iter().enumerate() {
            if idea.text.trim().is_empty() {
                return Err(GenAiError::SchemaValidation(format!(
                    "promotion_ideas[{idx}].text must be non-empty"
                )));
            }
            if idea.reason.trim().is_empty() {
                return Err(GenAiError::SchemaValidation(format!(
                    "promotion_ideas[{idx}].reason must be non-empty"
                )));
            }
        }
        Ok(())
    }
}

fn validate_post(post: &PlatformPost, platform: &str) -> Result<(), GenAiError> {
    if post.caption.trim().is_empty() {
        return Err(GenAiError::SchemaValidation(format!(
            "{platform}.caption must be non-empty"
        )));
    }
    if post.hashtags.is_empty() {
        return Err(GenAiError::SchemaValidation(format!(
            "{platform}.hashtags must not be empty"
        )));
    }
    for (idx, tag) in post.hashtags.iter().enumerate() {
        if !tag.starts_with('#') || tag.len() < 2 {
            return Err(GenAiError::SchemaValidation(format!(
                "{platform}.hashtags[{idx}] must start with '#'"
            )));
        }
    }
    Ok(())
}
