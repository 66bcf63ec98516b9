//! Account domain service.
//!
//! Creates instructor accounts with their demo course id and join link, and
//! deletes accounts with a cascade to the owned profile.

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::app_url::{AppUrl, EntityType, JOIN_PAGE};
use crate::domain::demo_course;
use crate::domain::error::Error;
use crate::domain::ports::{
    AccountRepository, AccountsCommand, CreatedAccount, NewAccountRequest, ProfilesCommand,
    StorageError,
};
use crate::domain::profile::GoogleId;
use crate::domain::{sanitize, validation};

/// Account service implementing [`AccountsCommand`].
#[derive(Clone)]
pub struct AccountsService<A> {
    accounts: Arc<A>,
    profiles: Arc<dyn ProfilesCommand>,
    front_end_base: Option<Url>,
}

impl<A> AccountsService<A> {
    /// Create a new service over the account repository and the profile
    /// command port used for the deletion cascade.
    ///
    /// `front_end_base` makes join links absolute; without it they stay
    /// relative to the serving origin.
    pub fn new(
        accounts: Arc<A>,
        profiles: Arc<dyn ProfilesCommand>,
        front_end_base: Option<Url>,
    ) -> Self {
        Self {
            accounts,
            profiles,
            front_end_base,
        }
    }
}

fn map_storage_error(error: StorageError) -> Error {
    Error::internal(error.to_string())
}

fn invalidity_info(request: &NewAccountRequest) -> Vec<String> {
    let mut reasons = Vec::new();
    reasons.extend(validation::person_name(&request.instructor_name));
    reasons.extend(validation::email(&request.instructor_email));
    reasons.extend(validation::institute(&request.institute));
    reasons
}

impl<A> AccountsService<A> {
    fn join_link(&self, registration_key: &str) -> String {
        let url = AppUrl::new(JOIN_PAGE)
            .with_registration_key(registration_key)
            .with_entity_type(EntityType::Instructor);
        match &self.front_end_base {
            Some(base) => url.to_absolute(base),
            None => url.to_relative(),
        }
    }
}

#[async_trait]
impl<A> AccountsCommand for AccountsService<A>
where
    A: AccountRepository,
{
    async fn create_account(&self, request: NewAccountRequest) -> Result<CreatedAccount, Error> {
        let request = NewAccountRequest {
            instructor_name: sanitize::plain_text(&request.instructor_name),
            instructor_email: sanitize::plain_text(&request.instructor_email),
            institute: sanitize::plain_text(&request.institute),
        };

        let reasons = invalidity_info(&request);
        if !reasons.is_empty() {
            return Err(Error::invalid_parameter(reasons.join("; ")));
        }

        let google_id = GoogleId::new(&request.instructor_email)
            .map_err(|err| Error::invalid_parameter(err.to_string()))?;

        if self
            .accounts
            .find_by_google_id(&google_id)
            .await
            .map_err(map_storage_error)?
            .is_some()
        {
            return Err(Error::invalid_parameter(format!(
                "an account with the identifier '{google_id}' already exists"
            )));
        }

        // Demo course contents are imported by the datastore collaborator;
        // only the identifier is derived here.
        let demo_course_id =
            demo_course::generate_demo_course_id(&request.instructor_email, |_| false);

        let registration_key = Uuid::new_v4().to_string();
        let join_link = self.join_link(&registration_key);

        let account = Account::new(
            google_id,
            request.instructor_name,
            request.instructor_email,
            request.institute,
            true,
        );
        self.accounts
            .save(&account)
            .await
            .map_err(map_storage_error)?;

        Ok(CreatedAccount {
            account,
            demo_course_id,
            join_link,
        })
    }

    async fn delete_account(&self, google_id: &GoogleId) -> Result<(), Error> {
        // The profile goes first so a failure part-way leaves no orphan.
        self.profiles.delete_profile(google_id).await?;
        self.accounts
            .delete(google_id)
            .await
            .map_err(map_storage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockAccountRepository, MockProfilesCommand};
    use crate::domain::ErrorCode;

    fn fixture_request() -> NewAccountRequest {
        NewAccountRequest {
            instructor_name: "Ada Lovelace".to_owned(),
            instructor_email: "ada@lovelace.org".to_owned(),
            institute: "Analytical Engine Institute".to_owned(),
        }
    }

    fn make_service(
        accounts: MockAccountRepository,
        profiles: MockProfilesCommand,
        front_end_base: Option<Url>,
    ) -> AccountsService<MockAccountRepository> {
        AccountsService::new(Arc::new(accounts), Arc::new(profiles), front_end_base)
    }

    #[tokio::test]
    async fn create_persists_the_account_and_derives_the_demo_course() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_google_id()
            .times(1)
            .return_once(|_| Ok(None));
        accounts
            .expect_save()
            .withf(|account: &Account| {
                account.google_id.as_ref() == "ada@lovelace.org" && account.is_instructor
            })
            .times(1)
            .return_once(|_| Ok(()));
        let service = make_service(accounts, MockProfilesCommand::new(), None);

        let created = service
            .create_account(fixture_request())
            .await
            .expect("creation succeeds");
        assert_eq!(created.demo_course_id, "ada.lov-demo");
        assert!(created.join_link.starts_with("/web/join?key="));
        assert!(created.join_link.ends_with("&entitytype=instructor"));
    }

    #[tokio::test]
    async fn create_builds_absolute_join_links_with_a_base() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_google_id()
            .times(1)
            .return_once(|_| Ok(None));
        accounts.expect_save().times(1).return_once(|_| Ok(()));
        let base = Url::parse("https://app.example.org").expect("valid base");
        let service = make_service(accounts, MockProfilesCommand::new(), Some(base));

        let created = service
            .create_account(fixture_request())
            .await
            .expect("creation succeeds");
        assert!(created
            .join_link
            .starts_with("https://app.example.org/web/join?key="));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_with_every_reason() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_find_by_google_id().times(0);
        accounts.expect_save().times(0);
        let service = make_service(accounts, MockProfilesCommand::new(), None);

        let request = NewAccountRequest {
            instructor_name: String::new(),
            instructor_email: "not-an-email".to_owned(),
            institute: "AEI".to_owned(),
        };
        let error = service
            .create_account(request)
            .await
            .expect_err("invalid input must fail");
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
        assert!(error.message().contains("person name"));
        assert!(error.message().contains("not-an-email"));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_identifiers() {
        let mut accounts = MockAccountRepository::new();
        let existing = Account::new(
            GoogleId::new("ada@lovelace.org").expect("fixture id"),
            "Ada Lovelace",
            "ada@lovelace.org",
            "AEI",
            true,
        );
        accounts
            .expect_find_by_google_id()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        accounts.expect_save().times(0);
        let service = make_service(accounts, MockProfilesCommand::new(), None);

        let error = service
            .create_account(fixture_request())
            .await
            .expect_err("duplicate must fail");
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
        assert!(error.message().contains("already exists"));
    }

    #[tokio::test]
    async fn deletion_cascade_removes_the_stored_profile() {
        use crate::domain::ports::{AccountRepository, ProfileRepository};
        use crate::domain::{Profile, ProfilesService};
        use crate::outbound::persistence::{
            MemoryAccountRepository, MemoryPictureStore, MemoryProfileRepository,
        };

        let profile_repo = Arc::new(MemoryProfileRepository::new());
        let profiles = Arc::new(ProfilesService::new(
            profile_repo.clone(),
            Arc::new(MemoryPictureStore::new()),
        ));
        let account_repo = Arc::new(MemoryAccountRepository::new());
        let service = AccountsService::new(account_repo.clone(), profiles, None);

        let id = GoogleId::new("ada.lovelace").expect("fixture id");
        let mut profile = Profile::with_defaults(id.clone());
        profile.short_name = "Ada".to_owned();
        profile_repo.save(&profile).await.expect("profile stored");
        account_repo
            .save(&Account::new(
                id.clone(),
                "Ada Lovelace",
                "ada@lovelace.org",
                "AEI",
                true,
            ))
            .await
            .expect("account stored");

        service.delete_account(&id).await.expect("deletion succeeds");

        assert!(profile_repo
            .find_by_google_id(&id)
            .await
            .expect("lookup succeeds")
            .is_none());
        assert!(account_repo
            .find_by_google_id(&id)
            .await
            .expect("lookup succeeds")
            .is_none());
    }

    #[tokio::test]
    async fn delete_cascades_to_the_profile() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_delete().times(1).return_once(|_| Ok(()));
        let mut profiles = MockProfilesCommand::new();
        profiles
            .expect_delete_profile()
            .times(1)
            .return_once(|_| Ok(()));
        let service = make_service(accounts, profiles, None);

        let id = GoogleId::new("ada.lovelace").expect("fixture id");
        service
            .delete_account(&id)
            .await
            .expect("deletion succeeds");
    }
}
