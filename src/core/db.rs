use crate::error::Error;
use crate::models::{
    application::{Application, ApplicationInsert, ApplicationQuery, ApplicationUpdate},
    checklist::{ChecklistInsert, ChecklistItem, ChecklistPatch},
    history::{StatusChange, StatusChangeInsert},
    member::{Member, MemberInsert, MemberPatch, MemberQuery, MemberStatus},
    settings::{SettingsUpdate, SystemSettings},
    state_change::{DecisionRecord, RequestQuery, StateChange, StateChangeInsert},
    withdrawal::{WithdrawalInsert, WithdrawalRequest},
};

pub trait MemberCommon {
    async fn insert(&mut self, data: MemberInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Member>, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<Member>, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<Member>, Error>;
    async fn query(&mut self, param: &MemberQuery, page: i64, size: i64) -> Result<Vec<Member>, Error>;
    async fn count(&mut self, param: &MemberQuery) -> Result<i64, Error>;
    async fn count_by_status(&mut self, status: MemberStatus) -> Result<i64, Error>;
    async fn set_status(&mut self, id: i32, status: MemberStatus) -> Result<(), Error>;
    async fn update_profile(&mut self, id: i32, patch: MemberPatch) -> Result<(), Error>;
    async fn update_credentials(&mut self, id: i32, password: String, salt: String) -> Result<(), Error>;
    async fn set_onboarding(&mut self, id: i32, kakao: bool, onboarding: bool) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait ApplicationCommon {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<i32, Error>;
    async fn get_by_member(&mut self, member_id: i32) -> Result<Option<Application>, Error>;
    async fn get_by_member_for_update(&mut self, member_id: i32) -> Result<Option<Application>, Error>;
    async fn query(&mut self, param: &ApplicationQuery, page: i64, size: i64) -> Result<Vec<Application>, Error>;
    async fn count(&mut self, param: &ApplicationQuery) -> Result<i64, Error>;
    async fn update(&mut self, id: i32, data: ApplicationUpdate) -> Result<(), Error>;
    async fn delete(&mut self, id: i32) -> Result<(), Error>;
}

pub trait StateChangeCommon {
    async fn insert(&mut self, data: StateChangeInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<StateChange>, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<StateChange>, Error>;
    async fn query(&mut self, param: &RequestQuery, page: i64, size: i64) -> Result<Vec<StateChange>, Error>;
    async fn count(&mut self, param: &RequestQuery) -> Result<i64, Error>;
    async fn has_pending(&mut self, member_id: i32) -> Result<bool, Error>;
    async fn set_decision(&mut self, id: i32, decision: DecisionRecord) -> Result<(), Error>;
}

pub trait WithdrawalCommon {
    async fn insert(&mut self, data: WithdrawalInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<WithdrawalRequest>, Error>;
    async fn get_for_update(&mut self, id: i32) -> Result<Option<WithdrawalRequest>, Error>;
    async fn query(&mut self, param: &RequestQuery, page: i64, size: i64) -> Result<Vec<WithdrawalRequest>, Error>;
    async fn count(&mut self, param: &RequestQuery) -> Result<i64, Error>;
    async fn has_pending(&mut self, member_id: i32) -> Result<bool, Error>;
    async fn set_decision(&mut self, id: i32, decision: DecisionRecord) -> Result<(), Error>;
}

pub trait SettingsCommon {
    async fn get(&mut self) -> Result<SystemSettings, Error>;
    /// Locks the settings row for the rest of the transaction. Every
    /// capacity-gated approval goes through this, which serializes them.
    async fn get_for_update(&mut self) -> Result<SystemSettings, Error>;
    async fn update(&mut self, data: SettingsUpdate) -> Result<(), Error>;
}

pub trait ChecklistCommon {
    async fn insert(&mut self, data: ChecklistInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<ChecklistItem>, Error>;
    async fn list(&mut self, active_only: bool) -> Result<Vec<ChecklistItem>, Error>;
    async fn update(&mut self, id: i32, patch: ChecklistPatch) -> Result<(), Error>;
}

pub trait HistoryCommon {
    async fn insert(&mut self, data: StatusChangeInsert) -> Result<i32, Error>;
    async fn list_for_member(&mut self, member_id: i32) -> Result<Vec<StatusChange>, Error>;
}

pub trait Common:
    MemberCommon + ApplicationCommon + StateChangeCommon + WithdrawalCommon + SettingsCommon + ChecklistCommon + HistoryCommon
{
}

pub trait Storer: Common {}

pub trait TxStorer: Storer {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}
