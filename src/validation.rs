//! Field rules for proposed post data. Pure and synchronous.

use crate::models::{CreatePostRequest, NewPost, PostPatch, UpdatePostRequest};
use thiserror::Error;

pub const IMAGE_MAX_CHARS: usize = 2048;
pub const CAPTION_MAX_CHARS: usize = 255;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    MissingField(&'static str),

    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}

impl ValidationError {
    /// Name of the offending field, when the error concerns a single one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::FieldTooLong { field, .. } => Some(*field),
            ValidationError::MissingField(_) => None,
        }
    }
}

// Empty strings count as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Validates both fields of a would-be post.
pub fn validate_fields(image: Option<&str>, caption: Option<&str>) -> Result<NewPost, ValidationError> {
    let (Some(image), Some(caption)) = (present(image), present(caption)) else {
        return Err(ValidationError::MissingField(
            "Image and caption are required fields",
        ));
    };
    check_len("image", image, IMAGE_MAX_CHARS)?;
    check_len("caption", caption, CAPTION_MAX_CHARS)?;
    Ok(NewPost {
        image: image.to_string(),
        caption: caption.to_string(),
    })
}

pub fn validate_create(input: &CreatePostRequest) -> Result<NewPost, ValidationError> {
    validate_fields(input.image.as_deref(), input.caption.as_deref())
}

pub fn validate_update(input: &UpdatePostRequest) -> Result<PostPatch, ValidationError> {
    let image = present(input.image.as_deref());
    let caption = present(input.caption.as_deref());
    if image.is_none() && caption.is_none() {
        return Err(ValidationError::MissingField(
            "At least one field (image or caption) must be provided",
        ));
    }
    if let Some(image) = image {
        check_len("image", image, IMAGE_MAX_CHARS)?;
    }
    if let Some(caption) = caption {
        check_len("caption", caption, CAPTION_MAX_CHARS)?;
    }
    Ok(PostPatch {
        image: image.map(str::to_string),
        caption: caption.map(str::to_string),
    })
}

/// A search query must be a non-empty string.
pub fn validate_query(query: Option<&str>) -> Result<&str, ValidationError> {
    present(query).ok_or(ValidationError::MissingField(
        "Search query parameter \"q\" is required",
    ))
}
