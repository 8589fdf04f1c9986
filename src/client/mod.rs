//! Client-side half of the posts protocol: HTTP API wrapper, the cached post
//! collection, the new-post composer and the view/edit/delete state machine.

pub mod api;
pub mod composer;
pub mod controller;
pub mod store;

pub use api::{ClientError, HttpPostsApi, PostsApi};
pub use composer::Composer;
pub use controller::{Action, Controller, EditDraft, Effect, InteractionState, Transition};
pub use store::PostStore;

#[cfg(test)]
pub(crate) mod testing {
    use super::api::{ClientError, PostsApi};
    use crate::errors::{AppError, ServiceError};
    use crate::memory::InMemoryPostRepository;
    use crate::models::{
        CreatePostRequest, HealthResponse, NewPost, Post, PostPatch, UpdatePostRequest,
    };
    use crate::services::PostsService;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Serves the client API straight from a [`PostsService`] over the memory store.
    pub struct ServiceApi {
        pub service: PostsService,
        pub list_calls: AtomicUsize,
        pub fail_mutations: AtomicBool,
        pub fail_lists: AtomicBool,
    }

    impl ServiceApi {
        pub fn new() -> Self {
            Self {
                service: PostsService::new(Arc::new(InMemoryPostRepository::new())),
                list_calls: AtomicUsize::new(0),
                fail_mutations: AtomicBool::new(false),
                fail_lists: AtomicBool::new(false),
            }
        }

        fn guard(&self) -> Result<(), ClientError> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    status: 400,
                    message: "store offline".into(),
                });
            }
            Ok(())
        }
    }

    fn to_client(err: ServiceError) -> ClientError {
        let app = AppError::from(err);
        ClientError::Api {
            status: app.status().as_u16(),
            message: app.to_string(),
        }
    }

    #[async_trait]
    impl PostsApi for ServiceApi {
        async fn list(&self) -> Result<Vec<Post>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Internal server error".into(),
                });
            }
            self.service.list().await.map_err(to_client)
        }

        async fn get(&self, id: Uuid) -> Result<Post, ClientError> {
            self.service.get(id).await.map_err(to_client)
        }

        async fn create(&self, post: &NewPost) -> Result<Post, ClientError> {
            self.guard()?;
            let input = CreatePostRequest {
                image: Some(post.image.clone()),
                caption: Some(post.caption.clone()),
            };
            self.service.create(&input).await.map_err(to_client)
        }

        async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<Post, ClientError> {
            self.guard()?;
            let input = UpdatePostRequest {
                image: patch.image.clone(),
                caption: patch.caption.clone(),
            };
            self.service.update(id, &input).await.map_err(to_client)
        }

        async fn delete(&self, id: Uuid) -> Result<Post, ClientError> {
            self.guard()?;
            self.service.delete(id).await.map_err(to_client)
        }

        async fn search(&self, query: &str) -> Result<Vec<Post>, ClientError> {
            self.service.search(Some(query)).await.map_err(to_client)
        }

        async fn health(&self) -> Result<HealthResponse, ClientError> {
            Ok(HealthResponse {
                status: "OK".into(),
                message: "in-process".into(),
                timestamp: String::new(),
            })
        }
    }
}
