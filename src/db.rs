//! Data Access Layer
//!
//! Developer and group operations on top of the store. Every public method
//! is exactly one transaction: reads see a consistent snapshot and each
//! mutation is applied fully or not at all.
//!
//! ## Buckets
//! - `developers`: developer id → JSON `{id, name}`
//! - `groups`: group id → JSON `{id, name, members}`
//!
//! ## Known limitation
//! `update_group` has no version check, so concurrent updates of the same
//! group are last-writer-wins.

use rand::Rng;

use crate::assign;
use crate::bucket::Bucket;
use crate::config::Config;
use crate::error::{PearsError, Result};
use crate::record::{Developer, Group, Record};
use crate::store::{Store, WriteTxn};

/// Handle to the Pairing Pears database
pub struct Database {
    store: Store,
}

impl Database {
    /// Open the store and make sure both buckets exist
    pub fn open(config: Config) -> Result<Self> {
        Self::from_store(Store::open(config)?)
    }

    /// Open `pairing-pears.db` next to the running executable
    pub fn open_default() -> Result<Self> {
        Self::open(Config::from_executable_dir()?)
    }

    /// Wrap an already open store, creating missing buckets
    pub fn from_store(store: Store) -> Result<Self> {
        let created = store.update(|tx| {
            let developers = tx.create_bucket_if_missing(Developer::BUCKET)?;
            let groups = tx.create_bucket_if_missing(Group::BUCKET)?;
            Ok(developers || groups)
        })?;

        if created {
            tracing::debug!("Created buckets in {}", store.path().display());
        }

        Ok(Self { store })
    }

    /// Close the database, releasing the file lock
    pub fn close(self) -> Result<()> {
        self.store.close()
    }

    /// The underlying store
    pub fn store(&self) -> &Store {
        &self.store
    }

    // =========================================================================
    // Developers
    // =========================================================================

    /// All developers, ordered by id
    pub fn get_all_developers(&self) -> Result<Vec<Developer>> {
        self.load_all()
    }

    /// Create a developer with a fresh id and return it
    pub fn add_developer(&self, name: &str) -> Result<Developer> {
        let developer = Developer::new(name);
        self.insert(&developer)?;

        tracing::debug!("Added developer {} ({})", developer.id, developer.name);
        Ok(developer)
    }

    /// Delete a developer. Deleting an unknown id succeeds.
    pub fn delete_developer(&self, id: &str) -> Result<()> {
        self.remove::<Developer>(id)
    }

    /// Delete every developer in one transaction
    pub fn clear_all_developers(&self) -> Result<()> {
        self.clear::<Developer>()
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// All groups, ordered by id
    pub fn get_all_groups(&self) -> Result<Vec<Group>> {
        self.load_all()
    }

    /// A single group by id
    pub fn get_group(&self, id: &str) -> Result<Option<Group>> {
        self.store.view(|tx| {
            tx.get(Group::BUCKET, id.as_bytes())?
                .map(Group::decode)
                .transpose()
        })
    }

    /// Create an empty group with a fresh id and return it
    pub fn add_group(&self, name: &str) -> Result<Group> {
        let group = Group::new(name);
        self.insert(&group)?;

        tracing::debug!("Added group {} ({})", group.id, group.name);
        Ok(group)
    }

    /// Replace a group's name and full member list
    ///
    /// Fails with `NotFound` if the group does not exist. Members are
    /// overwritten, not merged.
    pub fn update_group<I, S>(&self, id: &str, name: &str, members: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();

        self.store.update(|tx| {
            let stored = tx
                .get(Group::BUCKET, id.as_bytes())?
                .ok_or_else(|| PearsError::NotFound {
                    kind: Group::KIND,
                    id: id.to_string(),
                })?;

            let mut group = Group::decode(stored)?;
            group.name = name.to_string();
            group.members = members;

            put_record(tx, &group)
        })
    }

    /// Delete a group. Deleting an unknown id succeeds.
    pub fn delete_group(&self, id: &str) -> Result<()> {
        self.remove::<Group>(id)
    }

    /// Delete every group in one transaction
    pub fn clear_all_groups(&self) -> Result<()> {
        self.clear::<Group>()
    }

    // =========================================================================
    // Assignment
    // =========================================================================

    /// Spread unassigned developers over the groups at random
    ///
    /// Returns every group after assignment.
    pub fn auto_assign_developers(&self) -> Result<Vec<Group>> {
        self.auto_assign_developers_with(&mut rand::thread_rng())
    }

    /// Same as [`Database::auto_assign_developers`] with a caller-supplied RNG
    pub fn auto_assign_developers_with<R>(&self, rng: &mut R) -> Result<Vec<Group>>
    where
        R: Rng + ?Sized,
    {
        self.store.update(|tx| {
            let developers: Vec<Developer> = decode_bucket(tx.bucket(Developer::BUCKET)?)?;
            let mut groups: Vec<Group> = decode_bucket(tx.bucket(Group::BUCKET)?)?;
            let sizes: Vec<usize> = groups.iter().map(|g| g.members.len()).collect();

            let placed = assign::auto_assign(&mut groups, &developers, rng);

            for (group, before) in groups.iter().zip(sizes) {
                if group.members.len() != before {
                    put_record(tx, group)?;
                }
            }

            tracing::debug!("Auto-assigned {} developers to {} groups", placed, groups.len());
            Ok(groups)
        })
    }

    /// Empty the member list of every group, keeping the groups
    pub fn clear_group_members(&self) -> Result<Vec<Group>> {
        self.store.update(|tx| {
            let mut groups: Vec<Group> = decode_bucket(tx.bucket(Group::BUCKET)?)?;
            let before: Vec<bool> = groups.iter().map(|g| g.members.is_empty()).collect();

            assign::clear_members(&mut groups);

            for (group, was_empty) in groups.iter().zip(before) {
                if !was_empty {
                    put_record(tx, group)?;
                }
            }
            Ok(groups)
        })
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn load_all<R: Record>(&self) -> Result<Vec<R>> {
        self.store.view(|tx| decode_bucket(tx.bucket(R::BUCKET)?))
    }

    fn insert<R: Record>(&self, record: &R) -> Result<()> {
        self.store.update(|tx| put_record(tx, record))
    }

    fn remove<R: Record>(&self, id: &str) -> Result<()> {
        self.store.update(|tx| {
            if !tx.delete(R::BUCKET, id.as_bytes())? {
                tracing::trace!("Delete of missing {} {}", R::KIND, id);
            }
            Ok(())
        })
    }

    /// Drop and recreate the bucket: O(1) operations regardless of size
    fn clear<R: Record>(&self) -> Result<()> {
        self.store.update(|tx| {
            tx.delete_bucket(R::BUCKET)?;
            tx.create_bucket(R::BUCKET)
        })?;

        tracing::debug!("Cleared bucket {}", R::BUCKET);
        Ok(())
    }
}

/// Decode every value in a bucket, in key order
fn decode_bucket<R: Record>(bucket: &Bucket) -> Result<Vec<R>> {
    bucket.iter().map(|(_, value)| R::decode(value)).collect()
}

/// Encode a record and write it under its id
fn put_record<R: Record>(tx: &mut WriteTxn<'_>, record: &R) -> Result<()> {
    let value = record.encode()?;
    tx.put(R::BUCKET, record.id().as_bytes(), value)
}
