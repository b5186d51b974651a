//! In-process [`UserStore`] used by the handler tests.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::users::{
    repo::{StoreError, UserStore},
    repo_types::{NewUser, UserProfile},
};

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<(Uuid, NewUser)>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    failing: AtomicBool,
    failing_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail as an unreachable store would.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Makes only the select calls fail; inserts still go through.
    pub fn fail_reads(&self) {
        self.failing_reads.store(true, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<NewUser> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|(_, u)| u.clone())
            .collect()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), StoreError> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        self.check()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|(_, u)| u.email == email).count() == 1)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<UserProfile>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        let rows = self.rows.lock().unwrap();
        let mut found = rows.iter().filter(|(_, u)| u.name == name);
        let first = found.next();
        if found.next().is_some() {
            return Err(StoreError::NotSingle { column: "name" });
        }
        Ok(first.map(|(id, u)| UserProfile {
            id: *id,
            name: u.name.clone(),
            email: u.email.clone(),
            age: u.age,
            location: u.location.clone(),
        }))
    }

    async fn insert(&self, user: &NewUser) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        // mirrors the users_email_key constraint
        if rows.iter().any(|(_, u)| u.email == user.email) {
            return Err(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint \"users_email_key\"".into(),
            )
            .into());
        }
        rows.push((Uuid::new_v4(), user.clone()));
        Ok(())
    }
}
