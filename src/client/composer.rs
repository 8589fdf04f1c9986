use super::api::{ClientError, PostsApi};
use super::store::PostStore;
use crate::models::Post;
use crate::validation::validate_fields;

/// Form state for sharing a new post.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    pub image: String,
    pub caption: String,
    error: Option<String>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline error shown above the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates locally, then creates the post through the store (which reloads).
    /// Fields are cleared only on success.
    pub async fn submit<A: PostsApi>(&mut self, store: &mut PostStore<A>) -> Result<Post, ClientError> {
        self.error = None;
        let new_post = match validate_fields(Some(self.image.as_str()), Some(self.caption.as_str())) {
            Ok(post) => post,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };
        match store.create(&new_post).await {
            Ok(post) => {
                self.image.clear();
                self.caption.clear();
                Ok(post)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ServiceApi;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn invalid_form_never_calls_api() {
        let mut store = PostStore::new(ServiceApi::new());
        let mut composer = Composer::new();
        composer.image = "https://x/1.png".into();

        let err = composer.submit(&mut store).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(composer.error().is_some());
        assert_eq!(composer.image, "https://x/1.png");
        assert_eq!(store.api().list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_submit_clears_form_and_reloads() {
        let mut store = PostStore::new(ServiceApi::new());
        let mut composer = Composer::new();
        composer.image = "https://x/1.png".into();
        composer.caption = "hello".into();

        let post = composer.submit(&mut store).await.unwrap();
        assert_eq!(post.caption, "hello");
        assert!(composer.image.is_empty() && composer.caption.is_empty());
        assert_eq!(composer.error(), None);
        assert_eq!(store.posts(), &[post]);
    }

    #[tokio::test]
    async fn server_error_is_shown_inline() {
        let mut store = PostStore::new(ServiceApi::new());
        store.api().fail_mutations.store(true, Ordering::SeqCst);
        let mut composer = Composer::new();
        composer.image = "https://x/1.png".into();
        composer.caption = "hello".into();

        assert!(composer.submit(&mut store).await.is_err());
        assert_eq!(composer.error(), Some("store offline"));
        assert_eq!(composer.caption, "hello");
    }
}
