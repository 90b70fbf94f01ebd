use std::cell::Cell;
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};
use ratatui::widgets::TableState;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::api::DeadlineApi;
use crate::error::Result;
use crate::models::{parse_due, Deadline, DeadlineDraft, DeadlineId};
use crate::session::{request_create, request_delete, request_load, request_update, Confirmed};
use crate::store::DeadlineStore;
use crate::timescale::TimeScale;

/// How often buckets are recomputed even when nothing changed, so deadlines
/// move between categories as time passes.
const REBUCKET_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Editing,
}

/// Step of the add/edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Title,
    Description,
    Due,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayItem {
    ScaleHeader(TimeScale, usize),
    Deadline(Deadline),
    /// Placeholder row under a category with no deadlines.
    Empty,
}

/// What an in-flight request is about. One request per target at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    List,
    New,
    Deadline(DeadlineId),
}

/// Values collected by the add/edit form.
#[derive(Debug, Default, Clone)]
pub struct FormState {
    pub title: String,
    pub description: String,
    pub due: String,
    /// The deadline being edited, `None` when adding.
    pub target: Option<DeadlineId>,
    /// Prefilled due text and the exact due moment it stands for. Submitting
    /// that text unchanged keeps the moment, time of day included.
    pub current_due: Option<(String, DateTime<Utc>)>,
}

struct Completion {
    target: Target,
    result: Result<Confirmed>,
}

pub struct App<A> {
    pub store: DeadlineStore,
    pub display_items: Vec<DisplayItem>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub form: FormState,
    /// Last validation message, shown until the next key press.
    pub notification: Option<String>,
    pending: HashSet<Target>,
    api: A,
    runtime: Handle,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    dirty: Rc<Cell<bool>>,
    last_rebucket: Option<Instant>,
}

impl<A> App<A>
where
    A: DeadlineApi + Clone + 'static,
{
    /// Creates the app and kicks off the initial fetch.
    pub fn new(api: A, runtime: Handle) -> App<A> {
        let mut store = DeadlineStore::new();
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        store.subscribe(move |_| flag.set(true));

        let (tx, rx) = unbounded_channel();
        let mut app = App {
            store,
            display_items: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::Title,
            input_buffer: String::new(),
            form: FormState::default(),
            notification: None,
            pending: HashSet::new(),
            api,
            runtime,
            tx,
            rx,
            dirty,
            last_rebucket: None,
        };
        app.reload();
        app
    }

    /// Whether any request is still waiting for the server.
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Requests the full list again.
    pub fn reload(&mut self) {
        let api = self.api.clone();
        self.dispatch(Target::List, async move { request_load(&api).await });
    }

    /// Applies every finished request. Failed requests leave the store as is.
    pub fn drain_completions(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            self.pending.remove(&completion.target);
            match completion.result {
                Ok(confirmed) => confirmed.apply(&mut self.store),
                Err(e) => debug!(target_item = ?completion.target, error = %e, "request dropped"),
            }
        }
    }

    /// Rebuilds the grouped view if the store changed or buckets are stale.
    pub fn refresh_view(&mut self, now: DateTime<Utc>) {
        let stale = self
            .last_rebucket
            .map_or(true, |at| at.elapsed() >= REBUCKET_INTERVAL);
        if self.dirty.replace(false) || stale {
            self.rebuild_display(now);
            self.last_rebucket = Some(Instant::now());
        }
    }

    fn rebuild_display(&mut self, now: DateTime<Utc>) {
        let mapping = self.store.time_scale_mapping(now);
        self.display_items.clear();
        for (scale, deadlines) in mapping.iter() {
            self.display_items.push(DisplayItem::ScaleHeader(scale, deadlines.len()));
            if deadlines.is_empty() {
                self.display_items.push(DisplayItem::Empty);
            }
            for d in deadlines {
                self.display_items.push(DisplayItem::Deadline((*d).clone()));
            }
        }

        if self.display_items.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.display_items.len() {
                self.state.select(Some(self.display_items.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// The deadline under the cursor, if the cursor is on one.
    pub fn selected_deadline(&self) -> Option<&Deadline> {
        match self.state.selected().and_then(|i| self.display_items.get(i)) {
            Some(DisplayItem::Deadline(d)) => Some(d),
            _ => None,
        }
    }

    /// Selects the next row, wrapping around.
    pub fn next(&mut self) {
        if self.display_items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.display_items.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row, wrapping around.
    pub fn previous(&mut self) {
        if self.display_items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.display_items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Deletes the selected deadline once the server agrees.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_deadline().map(|d| d.id) else {
            return;
        };
        let api = self.api.clone();
        self.dispatch(Target::Deadline(id), async move { request_delete(&api, id).await });
    }

    /// Opens an empty form for a new deadline.
    pub fn start_add(&mut self) {
        self.form = FormState::default();
        self.open_form(InputMode::Adding);
    }

    /// Opens the form prefilled with the selected deadline.
    pub fn start_edit(&mut self) {
        let Some(d) = self.selected_deadline() else {
            return;
        };
        let due = d.end_date.with_timezone(&Local).format("%Y-%m-%d").to_string();
        self.form = FormState {
            title: d.title.clone(),
            description: d.description.clone(),
            due: due.clone(),
            target: Some(d.id),
            current_due: Some((due, d.end_date)),
        };
        self.open_form(InputMode::Editing);
    }

    fn open_form(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input_field = InputField::Title;
        self.input_buffer = self.form.title.clone();
        self.notification = None;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Stores the current field and moves on; submits after the last one.
    pub fn handle_input(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        match self.input_field {
            InputField::Title => {
                self.form.title = value;
                self.input_field = InputField::Description;
                self.input_buffer = self.form.description.clone();
            }
            InputField::Description => {
                self.form.description = value;
                self.input_field = InputField::Due;
                self.input_buffer = self.form.due.clone();
            }
            InputField::Due => {
                self.form.due = value;
                self.input_mode = InputMode::Normal;
                self.submit_form(Utc::now());
            }
        }
    }

    /// Validates the form locally and sends it. Validation failures become a
    /// notification and nothing is sent.
    pub fn submit_form(&mut self, now: DateTime<Utc>) {
        let form = std::mem::take(&mut self.form);
        let end_date = match form.current_due {
            Some((shown, end_date)) if shown == form.due => Some(end_date),
            _ => parse_due(&form.due, now),
        };
        let draft = DeadlineDraft::new(form.title, form.description, end_date);
        if let Err(e) = draft.clone().validate() {
            self.notification = Some(e.to_string());
            return;
        }

        let api = self.api.clone();
        match form.target {
            Some(id) => {
                self.dispatch(Target::Deadline(id), async move { request_update(&api, id, draft).await })
            }
            None => self.dispatch(Target::New, async move { request_create(&api, draft).await }),
        }
    }

    fn dispatch<F>(&mut self, target: Target, request: F)
    where
        F: Future<Output = Result<Confirmed>> + Send + 'static,
    {
        if !self.pending.insert(target) {
            debug!(target_item = ?target, "request already in flight, ignoring");
            return;
        }
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = request.await;
            let _ = tx.send(Completion { target, result });
        });
    }
}
