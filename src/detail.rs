//! State behind one dish detail page: the dish, its neighbours on the menu,
//! and the comment form with its submit lifecycle.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    data::Dish,
    form::CommentForm,
    nav::{Adjacent, Navigator},
    service::DishService,
    Error,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Editing,
    Submitting,
    Persisted,
    Failed(String),
}

pub struct DishDetail<S> {
    service: S,
    /// what the page shows
    dish: Option<Dish>,
    /// what submissions are appended to
    dish_copy: Option<Dish>,
    navigator: Navigator,
    form: CommentForm,
    state: SubmitState,
    err_msg: Option<String>,
}

impl<S: DishService> DishDetail<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            dish: None,
            dish_copy: None,
            navigator: Navigator::new(),
            form: CommentForm::new(),
            state: SubmitState::Editing,
            err_msg: None,
        }
    }

    /// Start a page visit on dish `id`: the id list and the dish are fetched
    /// together, and the id list is kept for the rest of the visit.
    pub async fn open(&mut self, id: &str) -> Result<(), Error> {
        self.navigator = Navigator::new();
        let (ids, dish) = tokio::join!(self.service.get_dish_ids(), self.service.get_dish(id));

        match ids {
            Ok(ids) => {
                debug!("menu has {} dishes", ids.len());
                if let Some(Err(e)) = self.navigator.set_ids(ids) {
                    warn!("fail to locate dish {id} on the menu: {e}");
                }
            }
            Err(e) => {
                self.fail(format!("{e:#}"));
                return Err(Error::Fetch(e));
            }
        }

        self.load(id, dish)
    }

    /// Move to another dish within the same visit. Only the dish is fetched again.
    pub async fn show(&mut self, id: &str) -> Result<(), Error> {
        let dish = self.service.get_dish(id).await;
        self.load(id, dish)
    }

    pub async fn show_prev(&mut self) -> Result<(), Error> {
        let prev = self.adjacent().ok_or(Error::NoDish)?.prev.clone();
        self.show(&prev).await
    }

    pub async fn show_next(&mut self) -> Result<(), Error> {
        let next = self.adjacent().ok_or(Error::NoDish)?.next.clone();
        self.show(&next).await
    }

    fn load(&mut self, id: &str, dish: anyhow::Result<Dish>) -> Result<(), Error> {
        let dish = match dish {
            Ok(dish) => dish,
            Err(e) => {
                self.fail(format!("{e:#}"));
                return Err(Error::Fetch(e));
            }
        };

        info!("showing dish {id}");
        let located = self.navigator.set_current(dish.id.clone());
        let located = located.map(|adjacent| adjacent.map(|_| ()));
        self.dish_copy = Some(dish.clone());
        self.dish = Some(dish);
        self.err_msg = None;
        self.state = SubmitState::Editing;

        match located {
            Some(Err(e)) => Err(e),
            _ => Ok(()),
        }
    }

    fn fail(&mut self, message: String) {
        warn!("dish page error: {message}");
        self.dish = None;
        self.dish_copy = None;
        self.err_msg = Some(message);
    }

    /// Append the form's comment to the dish and store it.
    ///
    /// On success the page shows the dish the service answered with. On
    /// failure the page drops its dish, since its stored state is unknown.
    /// The form is reset either way.
    pub async fn submit(&mut self) -> Result<&Dish, Error> {
        if !self.form.is_valid() {
            self.form.mark_all_dirty();
            return Err(Error::InvalidForm);
        }
        let Some(mut copy) = self.dish_copy.take() else {
            return Err(Error::NoDish);
        };

        self.state = SubmitState::Submitting;
        let comment = self.form.to_comment(Utc::now());
        debug!("submitting comment by {} on dish {}", comment.author, copy.id);
        copy.comments.push(comment);

        let result = self.service.put_dish(&copy).await;
        self.form.reset();

        match result {
            Ok(stored) => {
                info!("dish {} now has {} comments", stored.id, stored.comments.len());
                self.dish_copy = Some(stored.clone());
                self.state = SubmitState::Persisted;
                Ok(&*self.dish.insert(stored))
            }
            Err(e) => {
                let message = format!("{e:#}");
                self.fail(message.clone());
                self.state = SubmitState::Failed(message);
                Err(Error::Persist(e))
            }
        }
    }

    pub fn dish(&self) -> Option<&Dish> {
        self.dish.as_ref()
    }

    pub fn adjacent(&self) -> Option<&Adjacent> {
        self.navigator.adjacent()
    }

    pub fn form(&self) -> &CommentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CommentForm {
        &mut self.form
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn err_msg(&self) -> Option<&str> {
        self.err_msg.as_deref()
    }
}
