//! View, edit and delete flow over a single selected post.
//!
//! `InteractionState::reduce` is a pure transition function. It never talks to
//! the server; instead it hands back an [`Effect`] which [`Controller`] runs
//! against a [`PostStore`] before feeding the outcome back in as an action.

use super::api::PostsApi;
use super::store::PostStore;
use crate::models::{Post, PostPatch};
use crate::validation::validate_fields;
use uuid::Uuid;

/// Local copy of the fields being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub image: String,
    pub caption: String,
}

impl EditDraft {
    fn from_post(post: &Post) -> Self {
        Self {
            image: post.image.clone(),
            caption: post.caption.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Browsing,
    Viewing {
        post: Post,
    },
    Editing {
        post: Post,
        draft: EditDraft,
        error: Option<String>,
        submitting: bool,
    },
    ConfirmingDelete {
        post: Post,
        error: Option<String>,
        submitting: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Select(Post),
    /// Dismisses the top-most view: edit and delete dialogs fall back to
    /// viewing, the detail view falls back to browsing.
    Close,
    BeginEdit,
    SetImage(String),
    SetCaption(String),
    SubmitEdit,
    EditSucceeded,
    EditFailed(String),
    RequestDelete,
    ConfirmDelete,
    DeleteSucceeded,
    DeleteFailed(String),
}

/// Server work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Update { id: Uuid, patch: PostPatch },
    Delete { id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: InteractionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: InteractionState) -> Self {
        Self { state, effect: None }
    }
}

impl InteractionState {
    pub fn reduce(self, action: Action) -> Transition {
        use InteractionState::*;

        match (self, action) {
            (Browsing, Action::Select(post)) => Transition::to(Viewing { post }),

            (Viewing { .. }, Action::Close) => Transition::to(Browsing),
            (Viewing { post }, Action::BeginEdit) => Transition::to(Editing {
                draft: EditDraft::from_post(&post),
                post,
                error: None,
                submitting: false,
            }),
            (Viewing { post }, Action::RequestDelete) => Transition::to(ConfirmingDelete {
                post,
                error: None,
                submitting: false,
            }),

            (Editing { post, submitting: false, .. }, Action::Close) => Transition::to(Viewing { post }),
            (Editing { post, mut draft, error, submitting: false }, Action::SetImage(image)) => {
                draft.image = image;
                Transition::to(Editing { post, draft, error, submitting: false })
            }
            (Editing { post, mut draft, error, submitting: false }, Action::SetCaption(caption)) => {
                draft.caption = caption;
                Transition::to(Editing { post, draft, error, submitting: false })
            }
            (Editing { post, draft, submitting: false, .. }, Action::SubmitEdit) => {
                match validate_fields(Some(draft.image.as_str()), Some(draft.caption.as_str())) {
                    Ok(valid) => Transition {
                        effect: Some(Effect::Update {
                            id: post.id,
                            patch: PostPatch {
                                image: Some(valid.image),
                                caption: Some(valid.caption),
                            },
                        }),
                        state: Editing { post, draft, error: None, submitting: true },
                    },
                    Err(e) => Transition::to(Editing {
                        post,
                        draft,
                        error: Some(e.to_string()),
                        submitting: false,
                    }),
                }
            }
            (Editing { submitting: true, .. }, Action::EditSucceeded) => Transition::to(Browsing),
            (Editing { post, draft, submitting: true, .. }, Action::EditFailed(message)) => {
                Transition::to(Editing {
                    post,
                    draft,
                    error: Some(message),
                    submitting: false,
                })
            }

            (ConfirmingDelete { post, submitting: false, .. }, Action::Close) => {
                Transition::to(Viewing { post })
            }
            (ConfirmingDelete { post, submitting: false, .. }, Action::ConfirmDelete) => Transition {
                effect: Some(Effect::Delete { id: post.id }),
                state: ConfirmingDelete { post, error: None, submitting: true },
            },
            (ConfirmingDelete { submitting: true, .. }, Action::DeleteSucceeded) => Transition::to(Browsing),
            (ConfirmingDelete { post, submitting: true, .. }, Action::DeleteFailed(message)) => {
                Transition::to(ConfirmingDelete {
                    post,
                    error: Some(message),
                    submitting: false,
                })
            }

            (state, action) => {
                tracing::debug!(?action, "Ignoring action not valid in current state");
                Transition::to(state)
            }
        }
    }

    /// The post currently selected, if any.
    pub fn selected(&self) -> Option<&Post> {
        match self {
            InteractionState::Browsing => None,
            InteractionState::Viewing { post }
            | InteractionState::Editing { post, .. }
            | InteractionState::ConfirmingDelete { post, .. } => Some(post),
        }
    }

    pub fn inline_error(&self) -> Option<&str> {
        match self {
            InteractionState::Editing { error, .. } | InteractionState::ConfirmingDelete { error, .. } => {
                error.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(
            self,
            InteractionState::Editing { submitting: true, .. }
                | InteractionState::ConfirmingDelete { submitting: true, .. }
        )
    }
}

/// Owns the interaction state and runs effects against a post store.
#[derive(Debug, Default)]
pub struct Controller {
    state: InteractionState,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let transition = std::mem::take(&mut self.state).reduce(action);
        self.state = transition.state;
        transition.effect
    }

    /// Executes an effect and reports its outcome back into the state machine.
    pub async fn run<A: PostsApi>(&mut self, effect: Effect, store: &mut PostStore<A>) {
        let outcome = match effect {
            Effect::Update { id, patch } => match store.update(id, &patch).await {
                Ok(_) => Action::EditSucceeded,
                Err(e) => Action::EditFailed(e.to_string()),
            },
            Effect::Delete { id } => match store.delete(id).await {
                Ok(_) => Action::DeleteSucceeded,
                Err(e) => Action::DeleteFailed(e.to_string()),
            },
        };
        self.dispatch(outcome);
    }

    pub async fn submit_edit<A: PostsApi>(&mut self, store: &mut PostStore<A>) {
        if let Some(effect) = self.dispatch(Action::SubmitEdit) {
            self.run(effect, store).await;
        }
    }

    pub async fn confirm_delete<A: PostsApi>(&mut self, store: &mut PostStore<A>) {
        if let Some(effect) = self.dispatch(Action::ConfirmDelete) {
            self.run(effect, store).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ServiceApi;
    use crate::models::NewPost;
    use chrono::Utc;
    use std::sync::atomic::Ordering;

    fn sample_post() -> Post {
        Post {
            id: Uuid::new_v4(),
            image: "https://x/1.png".into(),
            caption: "hello".into(),
            created_at: Utc::now(),
        }
    }

    fn editing(post: &Post) -> InteractionState {
        InteractionState::Viewing { post: post.clone() }
            .reduce(Action::BeginEdit)
            .state
    }

    #[test]
    fn select_then_close_returns_to_browsing() {
        let post = sample_post();
        let state = InteractionState::Browsing.reduce(Action::Select(post.clone())).state;
        assert_eq!(state.selected(), Some(&post));
        assert_eq!(state.reduce(Action::Close).state, InteractionState::Browsing);
    }

    #[test]
    fn edit_seeds_draft_from_selected_post() {
        let post = sample_post();
        match editing(&post) {
            InteractionState::Editing { draft, error, submitting, .. } => {
                assert_eq!(draft, EditDraft { image: post.image.clone(), caption: post.caption.clone() });
                assert_eq!(error, None);
                assert!(!submitting);
            }
            other => panic!("expected editing, got {:?}", other),
        }
    }

    #[test]
    fn invalid_draft_sets_inline_error_without_effect() {
        let post = sample_post();
        let state = editing(&post).reduce(Action::SetCaption(String::new())).state;
        let transition = state.reduce(Action::SubmitEdit);
        assert_eq!(transition.effect, None);
        assert!(transition.state.inline_error().is_some());
        assert!(!transition.state.is_submitting());
    }

    #[test]
    fn submit_emits_update_and_blocks_resubmit() {
        let post = sample_post();
        let state = editing(&post).reduce(Action::SetCaption("changed".into())).state;
        let transition = state.reduce(Action::SubmitEdit);
        assert_eq!(
            transition.effect,
            Some(Effect::Update {
                id: post.id,
                patch: PostPatch {
                    image: Some(post.image.clone()),
                    caption: Some("changed".into()),
                },
            })
        );
        assert!(transition.state.is_submitting());

        let again = transition.state.clone().reduce(Action::SubmitEdit);
        assert_eq!(again.effect, None);
        assert_eq!(again.state, transition.state);

        // Cannot back out mid-flight either.
        assert_eq!(transition.state.clone().reduce(Action::Close).state, transition.state);
    }

    #[test]
    fn failed_edit_keeps_editing_with_error() {
        let post = sample_post();
        let submitting = editing(&post).reduce(Action::SubmitEdit).state;
        let state = submitting.reduce(Action::EditFailed("Post not found".into())).state;
        assert!(matches!(state, InteractionState::Editing { submitting: false, .. }));
        assert_eq!(state.inline_error(), Some("Post not found"));
    }

    #[test]
    fn cancel_edit_and_cancel_delete_return_to_viewing() {
        let post = sample_post();
        let viewing = InteractionState::Viewing { post: post.clone() };
        assert_eq!(editing(&post).reduce(Action::Close).state, viewing);

        let confirming = viewing.clone().reduce(Action::RequestDelete).state;
        assert!(matches!(confirming, InteractionState::ConfirmingDelete { .. }));
        assert_eq!(confirming.reduce(Action::Close).state, viewing);
    }

    #[test]
    fn delete_flow_transitions() {
        let post = sample_post();
        let confirming = InteractionState::Viewing { post: post.clone() }
            .reduce(Action::RequestDelete)
            .state;
        let transition = confirming.reduce(Action::ConfirmDelete);
        assert_eq!(transition.effect, Some(Effect::Delete { id: post.id }));

        let failed = transition.state.clone().reduce(Action::DeleteFailed("boom".into())).state;
        assert_eq!(failed.inline_error(), Some("boom"));

        let done = transition.state.reduce(Action::DeleteSucceeded).state;
        assert_eq!(done, InteractionState::Browsing);
    }

    #[test]
    fn invalid_actions_are_ignored() {
        let post = sample_post();
        assert_eq!(InteractionState::Browsing.reduce(Action::BeginEdit).state, InteractionState::Browsing);
        let viewing = InteractionState::Viewing { post: post.clone() };
        assert_eq!(viewing.clone().reduce(Action::Select(sample_post())).state, viewing);
        assert_eq!(viewing.clone().reduce(Action::EditSucceeded).state, viewing);
    }

    #[tokio::test]
    async fn controller_edit_reloads_and_returns_to_browsing() {
        let mut store = PostStore::new(ServiceApi::new());
        let post = store
            .create(&NewPost {
                image: "https://x/1.png".into(),
                caption: "before".into(),
            })
            .await
            .unwrap();

        let mut controller = Controller::new();
        controller.dispatch(Action::Select(post.clone()));
        controller.dispatch(Action::BeginEdit);
        controller.dispatch(Action::SetCaption("after".into()));
        controller.submit_edit(&mut store).await;

        assert_eq!(controller.state(), &InteractionState::Browsing);
        assert_eq!(store.posts()[0].caption, "after");
        assert_eq!(store.posts()[0].image, post.image);
    }

    #[tokio::test]
    async fn controller_failed_delete_stays_open() {
        let mut store = PostStore::new(ServiceApi::new());
        let post = store
            .create(&NewPost {
                image: "https://x/1.png".into(),
                caption: "keep".into(),
            })
            .await
            .unwrap();
        store.api().fail_mutations.store(true, Ordering::SeqCst);

        let mut controller = Controller::new();
        controller.dispatch(Action::Select(post.clone()));
        controller.dispatch(Action::RequestDelete);
        controller.confirm_delete(&mut store).await;

        assert!(matches!(controller.state(), InteractionState::ConfirmingDelete { submitting: false, .. }));
        assert_eq!(controller.state().inline_error(), Some("store offline"));
        assert_eq!(store.posts(), &[post]);
    }

    #[tokio::test]
    async fn controller_delete_reloads() {
        let mut store = PostStore::new(ServiceApi::new());
        let post = store
            .create(&NewPost {
                image: "https://x/1.png".into(),
                caption: "bye".into(),
            })
            .await
            .unwrap();

        let mut controller = Controller::new();
        controller.dispatch(Action::Select(post));
        controller.dispatch(Action::RequestDelete);
        controller.confirm_delete(&mut store).await;

        assert_eq!(controller.state(), &InteractionState::Browsing);
        assert!(store.posts().is_empty());
    }
}
