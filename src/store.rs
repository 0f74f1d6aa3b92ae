//! The record store: the single owner of the signed in user's record list.
//!
//! The list is only ever changed through [RecordStore::create],
//! [RecordStore::update] and [RecordStore::delete], and only after the backing
//! service has confirmed the change. Everything else in the crate derives its
//! views from [RecordStore::records].

use crate::{
    Error,
    record::{FinancialRecord, NewRecord, RecordId, UserId},
    service::RecordService,
};

/// Holds the canonical record list for the current session.
#[derive(Debug)]
pub struct RecordStore<S> {
    service: S,
    session: Option<UserId>,
    records: Vec<FinancialRecord>,
    version: u64,
}

impl<S> RecordStore<S>
where
    S: RecordService,
{
    /// Create a signed out store that talks to `service`.
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: None,
            records: Vec::new(),
            version: 0,
        }
    }

    /// The signed in user, if any.
    pub fn user(&self) -> Option<&UserId> {
        self.session.as_ref()
    }

    /// Whether a user is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// The current record list, in the order the service returned it followed
    /// by records created since.
    ///
    /// Empty while signed out.
    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    /// Get the record with the ID `id`.
    pub fn get(&self, id: RecordId) -> Option<&FinancialRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// A counter that changes whenever the record list changes.
    ///
    /// Derived views can compare versions to tell whether they are stale.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Start a session for `user` and load their records.
    ///
    /// Any previous session is replaced. Records returned by the service that
    /// belong to someone else are discarded.
    ///
    /// # Errors
    /// Returns the service's error if the records could not be fetched, in
    /// which case the store is left signed out.
    pub async fn sign_in(&mut self, user: UserId) -> Result<(), Error> {
        self.sign_out();

        let records = self.fetch(&user).await?;

        tracing::info!("Signed in as {user} with {} records", records.len());
        self.session = Some(user);
        self.replace_records(records);

        Ok(())
    }

    /// End the session and clear the record list.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.session.take() {
            tracing::info!("Signed out {user}");
        }

        if !self.records.is_empty() {
            self.replace_records(Vec::new());
        }
    }

    /// Fetch the signed in user's records again, replacing the current list.
    ///
    /// # Errors
    /// Returns [Error::NotAuthenticated] if no user is signed in, or the
    /// service's error, in which case the current list is kept.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        let user = self.session_user()?.clone();
        let records = self.fetch(&user).await?;

        tracing::debug!("Refreshed {} records for {user}", records.len());
        self.replace_records(records);

        Ok(())
    }

    /// Create a record owned by the signed in user and append it to the list.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::NotAuthenticated] if no user is signed in,
    /// - [Error::InvalidAmount] if the amount is not finite,
    /// - the service's error if the record could not be created.
    ///
    /// The list is unchanged on error.
    pub async fn create(&mut self, record: NewRecord) -> Result<FinancialRecord, Error> {
        let user = self.session_user()?.clone();

        if !record.amount.is_finite() {
            tracing::warn!("Rejected new record with amount {}", record.amount);
            return Err(Error::InvalidAmount(record.amount.to_string()));
        }

        let created = match self.service.create(&user, record).await {
            Ok(created) => created,
            Err(error) => {
                tracing::error!("Could not create record: {error}");
                return Err(error);
            }
        };

        tracing::info!("Created record {}", created.id);
        self.records.push(created.clone());
        self.version += 1;

        Ok(created)
    }

    /// Replace the record `id` with `record`.
    ///
    /// The updated record keeps its position in the list.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::NotAuthenticated] if no user is signed in,
    /// - [Error::RecordIdMismatch] if `record` does not have the ID `id`,
    /// - [Error::ForeignRecord] if `record` belongs to another user,
    /// - [Error::InvalidAmount] if the amount is not finite,
    /// - [Error::UpdateMissingRecord] if the record is not in the list or the
    ///   service no longer has it,
    /// - the service's error if the update failed for another reason.
    ///
    /// The list is unchanged on error, except that a record the service
    /// reports as missing is dropped from the list.
    pub async fn update(
        &mut self,
        id: RecordId,
        record: FinancialRecord,
    ) -> Result<FinancialRecord, Error> {
        let user = self.session_user()?.clone();

        if record.id != id {
            return Err(Error::RecordIdMismatch {
                path: id,
                record: record.id,
            });
        }

        if record.user_id != user {
            tracing::warn!("Rejected update of record {id} owned by {}", record.user_id);
            return Err(Error::ForeignRecord(id));
        }

        if !record.amount.is_finite() {
            return Err(Error::InvalidAmount(record.amount.to_string()));
        }

        let Some(position) = self.position(id) else {
            return Err(Error::UpdateMissingRecord(id));
        };

        match self.service.update(&user, id, &record).await {
            Ok(updated) => {
                tracing::info!("Updated record {id}");
                self.records[position] = updated.clone();
                self.version += 1;

                Ok(updated)
            }
            Err(Error::UpdateMissingRecord(id)) => {
                tracing::warn!("Record {id} no longer exists, dropping it from the list");
                self.records.remove(position);
                self.version += 1;

                Err(Error::UpdateMissingRecord(id))
            }
            Err(error) => {
                tracing::error!("Could not update record {id}: {error}");
                Err(error)
            }
        }
    }

    /// Delete the record `id` from the service and the list.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::NotAuthenticated] if no user is signed in,
    /// - [Error::DeleteMissingRecord] if the service has no such record, in
    ///   which case any stale copy in the list is dropped as well,
    /// - the service's error if the deletion failed, in which case the list is
    ///   unchanged.
    pub async fn delete(&mut self, id: RecordId) -> Result<(), Error> {
        let user = self.session_user()?.clone();

        match self.service.delete(&user, id).await {
            Ok(()) => {
                tracing::info!("Deleted record {id}");
                self.remove(id);

                Ok(())
            }
            Err(Error::DeleteMissingRecord(id)) => {
                tracing::warn!("Tried to delete missing record {id}");
                self.remove(id);

                Err(Error::DeleteMissingRecord(id))
            }
            Err(error) => {
                tracing::error!("Could not delete record {id}: {error}");
                Err(error)
            }
        }
    }

    fn session_user(&self) -> Result<&UserId, Error> {
        self.session.as_ref().ok_or(Error::NotAuthenticated)
    }

    async fn fetch(&self, user: &UserId) -> Result<Vec<FinancialRecord>, Error> {
        let mut records = match self.service.list(user).await {
            Ok(records) => records,
            Err(error) => {
                tracing::error!("Could not fetch records for {user}: {error}");
                return Err(error);
            }
        };

        let fetched = records.len();
        records.retain(|record| &record.user_id == user);

        if records.len() != fetched {
            tracing::warn!(
                "Discarded {} records that do not belong to {user}",
                fetched - records.len()
            );
        }

        Ok(records)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn remove(&mut self, id: RecordId) {
        if let Some(position) = self.position(id) {
            self.records.remove(position);
            self.version += 1;
        }
    }

    fn replace_records(&mut self, records: Vec<FinancialRecord>) {
        self.records = records;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        record::{FinancialRecord, NewRecord, RecordId, UserId},
        service::{MemoryRecordService, RecordService},
        store::RecordStore,
    };

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    fn bob() -> UserId {
        UserId::new("bob").unwrap()
    }

    fn groceries() -> NewRecord {
        FinancialRecord::build("Groceries", -42.5, date!(2024 - 01 - 15))
            .category("Food")
            .payment_method("Cash")
    }

    async fn get_signed_in_store() -> RecordStore<MemoryRecordService> {
        let mut store = RecordStore::new(MemoryRecordService::new());
        store.sign_in(alice()).await.unwrap();
        store
    }

    /// A service whose every call fails, as if the backend were unreachable.
    struct FailingService;

    impl RecordService for FailingService {
        async fn list(&self, _user: &UserId) -> Result<Vec<FinancialRecord>, Error> {
            Err(Error::Service("offline".to_owned()))
        }

        async fn create(
            &self,
            _user: &UserId,
            _record: NewRecord,
        ) -> Result<FinancialRecord, Error> {
            Err(Error::Service("offline".to_owned()))
        }

        async fn update(
            &self,
            _user: &UserId,
            _id: RecordId,
            _record: &FinancialRecord,
        ) -> Result<FinancialRecord, Error> {
            Err(Error::Service("offline".to_owned()))
        }

        async fn delete(&self, _user: &UserId, _id: RecordId) -> Result<(), Error> {
            Err(Error::Service("offline".to_owned()))
        }
    }

    #[tokio::test]
    async fn new_store_is_signed_out_and_empty() {
        let store = RecordStore::new(MemoryRecordService::new());

        assert!(!store.is_signed_in());
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn mutations_require_a_session() {
        let mut store = RecordStore::new(MemoryRecordService::new());

        assert_eq!(
            store.create(groceries()).await,
            Err(Error::NotAuthenticated)
        );
        assert_eq!(store.delete(1).await, Err(Error::NotAuthenticated));
        assert_eq!(store.refresh().await, Err(Error::NotAuthenticated));
    }

    #[tokio::test]
    async fn sign_in_loads_only_the_users_records() {
        let service = MemoryRecordService::with_records(vec![
            groceries().finalize(1, alice()),
            groceries().finalize(2, bob()),
            groceries().finalize(3, alice()),
        ]);
        let mut store = RecordStore::new(service);

        store.sign_in(alice()).await.unwrap();

        let ids: Vec<RecordId> = store.records().iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.user(), Some(&alice()));
    }

    #[tokio::test]
    async fn sign_out_clears_the_list() {
        let mut store = get_signed_in_store().await;
        store.create(groceries()).await.unwrap();

        store.sign_out();

        assert!(!store.is_signed_in());
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_store_signed_out() {
        let mut store = RecordStore::new(FailingService);

        let result = store.sign_in(alice()).await;

        assert_eq!(result, Err(Error::Service("offline".to_owned())));
        assert!(!store.is_signed_in());
    }

    #[tokio::test]
    async fn create_appends_record_owned_by_session_user() {
        let mut store = get_signed_in_store().await;

        let created = store.create(groceries()).await.unwrap();

        assert_eq!(created.user_id, alice());
        assert_eq!(store.records(), &[created.clone()]);
        assert_eq!(store.get(created.id), Some(&created));
    }

    #[tokio::test]
    async fn create_rejects_non_finite_amount() {
        let mut store = get_signed_in_store().await;
        let record = FinancialRecord::build("Bad", f64::NAN, date!(2024 - 01 - 15));

        let result = store.create(record).await;

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
        assert!(store.records().is_empty());
        assert!(store.service.list(&alice()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_record_in_place() {
        let mut store = get_signed_in_store().await;
        let first = store.create(groceries()).await.unwrap();
        let second = store.create(groceries()).await.unwrap();
        let edited = FinancialRecord {
            title: "Food".to_owned(),
            ..first.clone()
        };

        let updated = store.update(first.id, edited.clone()).await.unwrap();

        assert_eq!(updated, edited);
        assert_eq!(store.records(), &[edited.clone(), second]);
        assert_eq!(
            store.service.list(&alice()).await.unwrap()[0],
            edited,
            "the service should hold the edited record"
        );
    }

    #[tokio::test]
    async fn update_rejects_id_mismatch() {
        let mut store = get_signed_in_store().await;
        let record = store.create(groceries()).await.unwrap();

        let result = store.update(record.id + 1, record.clone()).await;

        assert_eq!(
            result,
            Err(Error::RecordIdMismatch {
                path: record.id + 1,
                record: record.id,
            })
        );
    }

    #[tokio::test]
    async fn update_rejects_foreign_record() {
        let mut store = get_signed_in_store().await;
        let record = store.create(groceries()).await.unwrap();
        let stolen = FinancialRecord {
            user_id: bob(),
            ..record.clone()
        };

        let result = store.update(record.id, stolen).await;

        assert_eq!(result, Err(Error::ForeignRecord(record.id)));
        assert_eq!(store.records(), &[record]);
    }

    #[tokio::test]
    async fn update_of_unknown_record_fails() {
        let mut store = get_signed_in_store().await;
        let record = groceries().finalize(99, alice());

        let result = store.update(99, record).await;

        assert_eq!(result, Err(Error::UpdateMissingRecord(99)));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() {
        let mut store = get_signed_in_store().await;
        let first = store.create(groceries()).await.unwrap();
        let second = store.create(groceries()).await.unwrap();

        store.delete(first.id).await.unwrap();

        assert_eq!(store.records(), &[second.clone()]);
        assert_eq!(store.service.list(&alice()).await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn deleting_twice_reports_missing_record() {
        let mut store = get_signed_in_store().await;
        let record = store.create(groceries()).await.unwrap();
        store.delete(record.id).await.unwrap();
        let version = store.version();

        let result = store.delete(record.id).await;

        assert_eq!(result, Err(Error::DeleteMissingRecord(record.id)));
        assert!(store.records().is_empty());
        assert_eq!(store.version(), version);
    }

    #[tokio::test]
    async fn refresh_picks_up_changes_made_elsewhere() {
        let mut store = get_signed_in_store().await;
        store.service.create(&alice(), groceries()).await.unwrap();
        assert!(store.records().is_empty());

        store.refresh().await.unwrap();

        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn version_changes_after_each_confirmed_mutation() {
        let mut store = get_signed_in_store().await;
        let start = store.version();

        let record = store.create(groceries()).await.unwrap();
        let after_create = store.version();
        store.update(record.id, record.clone()).await.unwrap();
        let after_update = store.version();
        store.delete(record.id).await.unwrap();

        assert!(after_create > start);
        assert!(after_update > after_create);
        assert!(store.version() > after_update);
    }

    #[tokio::test]
    async fn service_failure_leaves_list_unchanged() {
        let existing = groceries().finalize(1, alice());
        let mut store = RecordStore {
            service: FailingService,
            session: Some(alice()),
            records: vec![existing.clone()],
            version: 0,
        };

        let changed = FinancialRecord {
            title: "Changed".to_owned(),
            ..existing.clone()
        };

        let create = store.create(groceries()).await;
        let update = store.update(1, changed).await;
        let delete = store.delete(1).await;

        let offline = Error::Service("offline".to_owned());
        assert_eq!(create.unwrap_err(), offline);
        assert_eq!(update.unwrap_err(), offline);
        assert_eq!(delete.unwrap_err(), offline);
        assert_eq!(store.records(), &[existing]);
        assert_eq!(store.version(), 0);
    }
}
