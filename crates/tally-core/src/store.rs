//! Expense store: the session's single source of truth for expenses
//!
//! The store owns the in-memory sequence (insertion order) and mirrors every
//! successful mutation to the key-value medium as one whole-snapshot write
//! under [`EXPENSES_KEY`]. Mutations take `&mut self`, so there is exactly
//! one writer at a time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Category, Expense, ExpenseUpdate, NewExpense, PaymentMethod};
use crate::storage::{KeyValueStore, EXPENSES_KEY};

/// What `update`/`delete` do when no record has the requested id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
    /// Leave the collection unchanged and report it through the return value
    #[default]
    Lenient,
    /// Return [`Error::NotFound`]
    Strict,
}

/// The four records a brand new store starts with, dated relative to `now`
pub fn demo_expenses(now: DateTime<Utc>) -> Vec<Expense> {
    let seed = [
        (
            "1",
            2,
            Category::FoodAndDining,
            "Lunch at restaurant",
            25.50,
            PaymentMethod::CreditCard,
        ),
        (
            "2",
            5,
            Category::Transportation,
            "Gas for car",
            45.00,
            PaymentMethod::DebitCard,
        ),
        (
            "3",
            7,
            Category::Shopping,
            "Groceries",
            120.75,
            PaymentMethod::CreditCard,
        ),
        (
            "4",
            10,
            Category::Entertainment,
            "Movie tickets",
            30.00,
            PaymentMethod::Cash,
        ),
    ];

    seed.into_iter()
        .map(|(id, days_ago, category, description, amount, method)| {
            let at = now - Duration::days(days_ago);
            Expense {
                id: id.to_string(),
                date: at.date_naive(),
                category: category.to_string(),
                description: description.to_string(),
                amount,
                payment_method: method.to_string(),
                created_at: at,
            }
        })
        .collect()
}

pub struct ExpenseStore<S> {
    storage: S,
    expenses: Vec<Expense>,
    policy: NotFoundPolicy,
}

impl<S: KeyValueStore> ExpenseStore<S> {
    /// Load persisted expenses, seeding the demonstration set on first use
    ///
    /// Never fails: unreadable or corrupt data falls back to the
    /// demonstration set in memory (without overwriting what is stored).
    pub fn load(storage: S) -> Self {
        Self::load_at(storage, Utc::now())
    }

    /// [`load`](Self::load) with an explicit clock, for seeding
    pub fn load_at(storage: S, now: DateTime<Utc>) -> Self {
        let expenses = match storage.get(EXPENSES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Expense>>(&raw) {
                Ok(expenses) => {
                    debug!(count = expenses.len(), "Loaded expenses");
                    expenses
                }
                Err(e) => {
                    warn!("Stored expenses are unreadable, using demonstration data: {}", e);
                    demo_expenses(now)
                }
            },
            Ok(None) => {
                let demo = demo_expenses(now);
                match serde_json::to_string(&demo)
                    .map_err(Error::from)
                    .and_then(|json| storage.set(EXPENSES_KEY, &json))
                {
                    Ok(()) => info!(count = demo.len(), "Seeded demonstration expenses"),
                    Err(e) => warn!("Could not persist demonstration expenses: {}", e),
                }
                demo
            }
            Err(e) => {
                warn!("Could not read stored expenses, using demonstration data: {}", e);
                demo_expenses(now)
            }
        };

        Self {
            storage,
            expenses,
            policy: NotFoundPolicy::default(),
        }
    }

    /// Set the not-found policy for `update` and `delete`
    pub fn with_policy(mut self, policy: NotFoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// All expenses in insertion order
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Validate, assign an id and creation time, append and persist
    pub fn add(&mut self, new: NewExpense) -> Result<Expense> {
        self.add_at(new, Utc::now())
    }

    /// [`add`](Self::add) with an explicit creation time
    pub fn add_at(&mut self, new: NewExpense, now: DateTime<Utc>) -> Result<Expense> {
        new.validate()?;

        let expense = Expense {
            id: self.fresh_id(),
            date: new.date,
            category: new.category,
            description: new.description,
            amount: new.amount,
            payment_method: new.payment_method,
            created_at: now,
        };

        self.expenses.push(expense.clone());
        if let Err(e) = self.persist() {
            self.expenses.pop();
            return Err(e);
        }

        info!(id = %expense.id, amount = expense.amount, "Added expense");
        Ok(expense)
    }

    /// Merge `update` over the record with `id` and persist
    ///
    /// Returns the updated record, or `None` when no record has that id
    /// (under the lenient policy).
    pub fn update(&mut self, id: &str, update: &ExpenseUpdate) -> Result<Option<Expense>> {
        let Some(index) = self.position(id) else {
            return self.not_found(id).map(|()| None);
        };

        update.validate()?;
        if update.is_empty() {
            return Ok(Some(self.expenses[index].clone()));
        }

        let previous = self.expenses[index].clone();
        update.apply_to(&mut self.expenses[index]);
        if let Err(e) = self.persist() {
            self.expenses[index] = previous;
            return Err(e);
        }

        info!(id, "Updated expense");
        Ok(Some(self.expenses[index].clone()))
    }

    /// Remove the record with `id` and persist
    ///
    /// Returns whether a record was removed. Deleting an id twice is a no-op
    /// the second time (under the lenient policy).
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return self.not_found(id).map(|()| false);
        };

        let removed = self.expenses.remove(index);
        if let Err(e) = self.persist() {
            self.expenses.insert(index, removed);
            return Err(e);
        }

        info!(id, "Deleted expense");
        Ok(true)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.expenses.iter().position(|e| e.id == id)
    }

    fn not_found(&self, id: &str) -> Result<()> {
        match self.policy {
            NotFoundPolicy::Lenient => {
                debug!(id, "No expense with this id, nothing to do");
                Ok(())
            }
            NotFoundPolicy::Strict => Err(Error::NotFound(format!("expense {}", id))),
        }
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Rewrite the whole snapshot
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.expenses)?;
        self.storage.set(EXPENSES_KEY, &json)?;
        debug!(count = self.expenses.len(), "Persisted expenses");
        Ok(())
    }
}
