use chrono::{DateTime, Utc};

use crate::models::{Deadline, DeadlineId};
use crate::timescale::{generate_time_scale_mapping, TimeScaleMapping};

/// Handle returned by [`DeadlineStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[Deadline])>;

/// The session's canonical collection of deadlines.
///
/// The mutation methods are the only way to change the contents. Every
/// mutation that changes something is visible to readers immediately and
/// is announced to subscribers before the method returns.
#[derive(Default)]
pub struct DeadlineStore {
    deadlines: Vec<Deadline>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl DeadlineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents in storage order.
    pub fn deadlines(&self) -> &[Deadline] {
        &self.deadlines
    }

    /// Looks up a deadline by id.
    pub fn get(&self, id: DeadlineId) -> Option<&Deadline> {
        self.deadlines.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Buckets the current contents by urgency.
    pub fn time_scale_mapping(&self, now: DateTime<Utc>) -> TimeScaleMapping<'_> {
        generate_time_scale_mapping(&self.deadlines, now)
    }

    /// Replaces the whole collection, e.g. after the initial fetch.
    pub fn set_deadlines(&mut self, deadlines: Vec<Deadline>) {
        self.deadlines = deadlines;
        self.notify();
    }

    /// Appends a deadline the server has just created.
    ///
    /// The id must not be in the store already; it always comes from a
    /// creation response, so a duplicate is a caller bug.
    pub fn create_deadline(
        &mut self,
        id: DeadlineId,
        title: String,
        description: String,
        end_date: DateTime<Utc>,
    ) {
        debug_assert!(self.get(id).is_none(), "duplicate deadline id {id}");
        self.deadlines.push(Deadline {
            id,
            title,
            description,
            end_date,
        });
        self.notify();
    }

    /// Replaces the mutable fields of the deadline with `id`.
    ///
    /// Unknown ids are ignored. Returns whether a deadline was updated.
    pub fn update_deadline(
        &mut self,
        id: DeadlineId,
        title: String,
        description: String,
        end_date: DateTime<Utc>,
    ) -> bool {
        let Some(deadline) = self.deadlines.iter_mut().find(|d| d.id == id) else {
            return false;
        };
        deadline.title = title;
        deadline.description = description;
        deadline.end_date = end_date;
        self.notify();
        true
    }

    /// Removes the deadline with `id`. Unknown ids are ignored.
    pub fn delete_deadline(&mut self, id: DeadlineId) -> bool {
        let Some(index) = self.deadlines.iter().position(|d| d.id == id) else {
            return false;
        };
        self.deadlines.remove(index);
        self.notify();
        true
    }

    /// Registers a callback run with the new contents after each change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Deadline]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drops a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.deadlines);
        }
    }
}

impl std::fmt::Debug for DeadlineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeadlineStore")
            .field("deadlines", &self.deadlines)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
