//! In-memory implementation of the storage traits for unit tests. State is
//! shared behind an Rc so a test can keep a handle while core functions
//! consume their own.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;

use crate::core::db::{
    ApplicationCommon, ChecklistCommon, Common, HistoryCommon, MemberCommon, SettingsCommon, StateChangeCommon, Storer, TxStorer, WithdrawalCommon,
};
use crate::error::Error;
use crate::models::{
    application::{Application, ApplicationInsert, ApplicationQuery, ApplicationStage, ApplicationUpdate},
    checklist::{ChecklistInsert, ChecklistItem, ChecklistPatch},
    history::{StatusChange, StatusChangeInsert},
    member::{Member, MemberInsert, MemberPatch, MemberQuery, MemberRole, MemberStatus},
    settings::{SettingsUpdate, SystemSettings},
    state_change::{DecisionRecord, RequestQuery, RequestStatus, StateChange, StateChangeInsert},
    withdrawal::{WithdrawalInsert, WithdrawalRequest},
};

#[derive(Debug)]
struct State {
    next_id: i32,
    members: Vec<Member>,
    applications: Vec<Application>,
    state_changes: Vec<StateChange>,
    withdrawals: Vec<WithdrawalRequest>,
    checklist: Vec<ChecklistItem>,
    history: Vec<StatusChange>,
    settings: SystemSettings,
}

#[derive(Debug, Clone)]
pub struct MemStore {
    state: Rc<RefCell<State>>,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore {
            state: Rc::new(RefCell::new(State {
                next_id: 1,
                members: Vec::new(),
                applications: Vec::new(),
                state_changes: Vec::new(),
                withdrawals: Vec::new(),
                checklist: Vec::new(),
                history: Vec::new(),
                settings: SystemSettings {
                    id: 1,
                    max_capacity: 20,
                    weekly_capacity: 3,
                    include_inactive_in_capacity: false,
                    dormancy_period_weeks: 4,
                    kakao_invite_link: String::new(),
                    updated_at: Utc::now(),
                },
            })),
        }
    }

    /// A fresh handle to hand into a core function that takes ownership.
    pub fn storer(&self) -> MemStore {
        self.clone()
    }

    fn next_id(state: &mut State) -> i32 {
        let id = state.next_id;
        state.next_id += 1;
        id
    }

    pub fn seed_member(&self, name: &str, email: &str, status: MemberStatus, role: MemberRole) -> i32 {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let now = Utc::now();
        state.members.push(Member {
            id,
            email: email.into(),
            password: crate::core::auth::hash_password("password", "seed"),
            salt: "seed".into(),
            name: name.into(),
            nickname: None,
            phone: "010-0000-0000".into(),
            birth_date: None,
            calendar_type: None,
            gender: None,
            position: None,
            status,
            role,
            has_joined_kakao: false,
            has_completed_onboarding: false,
            version: 1,
            joined_at: now,
            updated_at: now,
        });
        id
    }

    pub fn seed_checklist(&self, label: &str, active: bool) -> i32 {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let ord = state.checklist.len() as i32 + 1;
        state.checklist.push(ChecklistItem {
            id,
            label: label.into(),
            description: String::new(),
            active,
            ord,
        });
        id
    }

    pub fn set_capacity(&self, max: i32, include_inactive: bool) {
        let mut state = self.state.borrow_mut();
        state.settings.max_capacity = max;
        state.settings.include_inactive_in_capacity = include_inactive;
    }

    pub fn settings(&self) -> SystemSettings {
        self.state.borrow().settings.clone()
    }

    pub fn member(&self, id: i32) -> Member {
        self.state.borrow().members.iter().find(|m| m.id == id).cloned().expect("member")
    }

    pub fn member_by_email(&self, email: &str) -> Member {
        self.state.borrow().members.iter().find(|m| m.email == email).cloned().expect("member")
    }

    pub fn application_of(&self, member_id: i32) -> Option<Application> {
        self.state.borrow().applications.iter().find(|a| a.member_id == member_id).cloned()
    }

    pub fn state_change(&self, id: i32) -> StateChange {
        self.state.borrow().state_changes.iter().find(|r| r.id == id).cloned().expect("state change")
    }

    pub fn withdrawal(&self, id: i32) -> WithdrawalRequest {
        self.state.borrow().withdrawals.iter().find(|r| r.id == id).cloned().expect("withdrawal")
    }

    pub fn history_for(&self, member_id: i32) -> Vec<StatusChange> {
        self.state.borrow().history.iter().filter(|h| h.member_id == member_id).cloned().collect()
    }
}

fn paginate<T: Clone>(rows: Vec<T>, page: i64, size: i64) -> Vec<T> {
    let start = ((page - 1).max(0) * size) as usize;
    rows.into_iter().skip(start).take(size as usize).collect()
}

impl MemberCommon for MemStore {
    async fn insert(&mut self, data: MemberInsert) -> Result<i32, Error> {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let now = Utc::now();
        state.members.push(Member {
            id,
            email: data.email,
            password: data.password,
            salt: data.salt,
            name: data.name,
            nickname: data.nickname,
            phone: data.phone,
            birth_date: data.birth_date,
            calendar_type: data.calendar_type,
            gender: data.gender,
            position: data.position,
            status: data.status,
            role: data.role,
            has_joined_kakao: false,
            has_completed_onboarding: false,
            version: 1,
            joined_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Member>, Error> {
        Ok(self.state.borrow().members.iter().find(|m| m.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Member>, Error> {
        MemberCommon::get(self, id).await
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<Member>, Error> {
        Ok(self.state.borrow().members.iter().find(|m| m.email == email).cloned())
    }

    async fn query(&mut self, param: &MemberQuery, page: i64, size: i64) -> Result<Vec<Member>, Error> {
        let state = self.state.borrow();
        let mut rows: Vec<Member> = state
            .members
            .iter()
            .filter(|m| param.status.map_or(true, |s| m.status == s) && param.role.map_or(true, |r| m.role == r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(paginate(rows, page, size))
    }

    async fn count(&mut self, param: &MemberQuery) -> Result<i64, Error> {
        let state = self.state.borrow();
        Ok(state
            .members
            .iter()
            .filter(|m| param.status.map_or(true, |s| m.status == s) && param.role.map_or(true, |r| m.role == r))
            .count() as i64)
    }

    async fn count_by_status(&mut self, status: MemberStatus) -> Result<i64, Error> {
        Ok(self.state.borrow().members.iter().filter(|m| m.status == status).count() as i64)
    }

    async fn set_status(&mut self, id: i32, status: MemberStatus) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(m) = state.members.iter_mut().find(|m| m.id == id) {
            m.status = status;
            m.version += 1;
            m.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_profile(&mut self, id: i32, patch: MemberPatch) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(m) = state.members.iter_mut().find(|m| m.id == id) {
            if let Some(name) = patch.name {
                m.name = name;
            }
            if patch.nickname.is_some() {
                m.nickname = patch.nickname;
            }
            if let Some(phone) = patch.phone {
                m.phone = phone;
            }
            if patch.birth_date.is_some() {
                m.birth_date = patch.birth_date;
            }
            if patch.calendar_type.is_some() {
                m.calendar_type = patch.calendar_type;
            }
            if patch.gender.is_some() {
                m.gender = patch.gender;
            }
            if patch.position.is_some() {
                m.position = patch.position;
            }
            m.version += 1;
            m.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_credentials(&mut self, id: i32, password: String, salt: String) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(m) = state.members.iter_mut().find(|m| m.id == id) {
            m.password = password;
            m.salt = salt;
            m.version += 1;
            m.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_onboarding(&mut self, id: i32, kakao: bool, onboarding: bool) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(m) = state.members.iter_mut().find(|m| m.id == id) {
            m.has_joined_kakao = kakao;
            m.has_completed_onboarding = onboarding;
            m.version += 1;
            m.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.members.retain(|m| m.id != id);
        // same cascade the database schema enforces
        state.applications.retain(|a| a.member_id != id);
        state.state_changes.retain(|r| r.member_id != id);
        state.withdrawals.retain(|r| r.member_id != id);
        state.history.retain(|h| h.member_id != id);
        Ok(())
    }
}

impl ApplicationCommon for MemStore {
    async fn insert(&mut self, data: ApplicationInsert) -> Result<i32, Error> {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        let now = Utc::now();
        state.applications.push(Application {
            id,
            member_id: data.member_id,
            referrer_name: data.referrer_name,
            motivation: data.motivation,
            strokes: data.strokes,
            stage: ApplicationStage::ReferrerPending,
            agreed_suitability: None,
            agreed_mentoring: None,
            agreed_cap_provision: None,
            referrer_reject_reason: None,
            referrer_processed_by: None,
            referrer_processed_at: None,
            admin_reject_reason: None,
            admin_processed_by: None,
            admin_processed_at: None,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get_by_member(&mut self, member_id: i32) -> Result<Option<Application>, Error> {
        Ok(self.state.borrow().applications.iter().find(|a| a.member_id == member_id).cloned())
    }

    async fn get_by_member_for_update(&mut self, member_id: i32) -> Result<Option<Application>, Error> {
        ApplicationCommon::get_by_member(self, member_id).await
    }

    async fn query(&mut self, param: &ApplicationQuery, page: i64, size: i64) -> Result<Vec<Application>, Error> {
        let state = self.state.borrow();
        let mut rows: Vec<Application> = state
            .applications
            .iter()
            .filter(|a| {
                param.stage.map_or(true, |s| a.stage == s) && param.referrer_name.as_ref().map_or(true, |r| &a.referrer_name == r)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, page, size))
    }

    async fn count(&mut self, param: &ApplicationQuery) -> Result<i64, Error> {
        let state = self.state.borrow();
        Ok(state
            .applications
            .iter()
            .filter(|a| {
                param.stage.map_or(true, |s| a.stage == s) && param.referrer_name.as_ref().map_or(true, |r| &a.referrer_name == r)
            })
            .count() as i64)
    }

    async fn update(&mut self, id: i32, data: ApplicationUpdate) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(a) = state.applications.iter_mut().find(|a| a.id == id) {
            a.referrer_name = data.referrer_name;
            a.motivation = data.motivation;
            a.strokes = data.strokes;
            a.stage = data.stage;
            a.agreed_suitability = data.agreed_suitability;
            a.agreed_mentoring = data.agreed_mentoring;
            a.agreed_cap_provision = data.agreed_cap_provision;
            a.referrer_reject_reason = data.referrer_reject_reason;
            a.referrer_processed_by = data.referrer_processed_by;
            a.referrer_processed_at = data.referrer_processed_at;
            a.admin_reject_reason = data.admin_reject_reason;
            a.admin_processed_by = data.admin_processed_by;
            a.admin_processed_at = data.admin_processed_at;
            a.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        self.state.borrow_mut().applications.retain(|a| a.id != id);
        Ok(())
    }
}

impl StateChangeCommon for MemStore {
    async fn insert(&mut self, data: StateChangeInsert) -> Result<i32, Error> {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        state.state_changes.push(StateChange {
            id,
            member_id: data.member_id,
            member_name: data.member_name,
            current_status: data.current_status,
            requested_status: data.requested_status,
            reason: data.reason,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            processed_at: None,
            processed_by: None,
            reject_reason: None,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<StateChange>, Error> {
        Ok(self.state.borrow().state_changes.iter().find(|r| r.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<StateChange>, Error> {
        StateChangeCommon::get(self, id).await
    }

    async fn query(&mut self, param: &RequestQuery, page: i64, size: i64) -> Result<Vec<StateChange>, Error> {
        let state = self.state.borrow();
        let mut rows: Vec<StateChange> = state
            .state_changes
            .iter()
            .filter(|r| param.status.map_or(true, |s| r.status == s) && param.member_id.map_or(true, |m| r.member_id == m))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, page, size))
    }

    async fn count(&mut self, param: &RequestQuery) -> Result<i64, Error> {
        let state = self.state.borrow();
        Ok(state
            .state_changes
            .iter()
            .filter(|r| param.status.map_or(true, |s| r.status == s) && param.member_id.map_or(true, |m| r.member_id == m))
            .count() as i64)
    }

    async fn has_pending(&mut self, member_id: i32) -> Result<bool, Error> {
        Ok(self
            .state
            .borrow()
            .state_changes
            .iter()
            .any(|r| r.member_id == member_id && r.status == RequestStatus::Pending))
    }

    async fn set_decision(&mut self, id: i32, decision: DecisionRecord) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(r) = state.state_changes.iter_mut().find(|r| r.id == id) {
            r.status = decision.status;
            r.processed_by = Some(decision.processed_by);
            r.processed_at = Some(decision.processed_at);
            r.reject_reason = decision.reject_reason;
        }
        Ok(())
    }
}

impl WithdrawalCommon for MemStore {
    async fn insert(&mut self, data: WithdrawalInsert) -> Result<i32, Error> {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        state.withdrawals.push(WithdrawalRequest {
            id,
            member_id: data.member_id,
            member_name: data.member_name,
            reason: data.reason,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            processed_at: None,
            processed_by: None,
            reject_reason: None,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<WithdrawalRequest>, Error> {
        Ok(self.state.borrow().withdrawals.iter().find(|r| r.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<WithdrawalRequest>, Error> {
        WithdrawalCommon::get(self, id).await
    }

    async fn query(&mut self, param: &RequestQuery, page: i64, size: i64) -> Result<Vec<WithdrawalRequest>, Error> {
        let state = self.state.borrow();
        let mut rows: Vec<WithdrawalRequest> = state
            .withdrawals
            .iter()
            .filter(|r| param.status.map_or(true, |s| r.status == s) && param.member_id.map_or(true, |m| r.member_id == m))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(rows, page, size))
    }

    async fn count(&mut self, param: &RequestQuery) -> Result<i64, Error> {
        let state = self.state.borrow();
        Ok(state
            .withdrawals
            .iter()
            .filter(|r| param.status.map_or(true, |s| r.status == s) && param.member_id.map_or(true, |m| r.member_id == m))
            .count() as i64)
    }

    async fn has_pending(&mut self, member_id: i32) -> Result<bool, Error> {
        Ok(self
            .state
            .borrow()
            .withdrawals
            .iter()
            .any(|r| r.member_id == member_id && r.status == RequestStatus::Pending))
    }

    async fn set_decision(&mut self, id: i32, decision: DecisionRecord) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(r) = state.withdrawals.iter_mut().find(|r| r.id == id) {
            r.status = decision.status;
            r.processed_by = Some(decision.processed_by);
            r.processed_at = Some(decision.processed_at);
            r.reject_reason = decision.reject_reason;
        }
        Ok(())
    }
}

impl SettingsCommon for MemStore {
    async fn get(&mut self) -> Result<SystemSettings, Error> {
        Ok(self.state.borrow().settings.clone())
    }

    async fn get_for_update(&mut self) -> Result<SystemSettings, Error> {
        SettingsCommon::get(self).await
    }

    async fn update(&mut self, data: SettingsUpdate) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.settings.max_capacity = data.max_capacity;
        state.settings.weekly_capacity = data.weekly_capacity;
        state.settings.include_inactive_in_capacity = data.include_inactive_in_capacity;
        state.settings.dormancy_period_weeks = data.dormancy_period_weeks;
        state.settings.kakao_invite_link = data.kakao_invite_link;
        state.settings.updated_at = Utc::now();
        Ok(())
    }
}

impl ChecklistCommon for MemStore {
    async fn insert(&mut self, data: ChecklistInsert) -> Result<i32, Error> {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        state.checklist.push(ChecklistItem {
            id,
            label: data.label,
            description: data.description,
            active: true,
            ord: data.ord,
        });
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<ChecklistItem>, Error> {
        Ok(self.state.borrow().checklist.iter().find(|i| i.id == id).cloned())
    }

    async fn list(&mut self, active_only: bool) -> Result<Vec<ChecklistItem>, Error> {
        let state = self.state.borrow();
        let mut rows: Vec<ChecklistItem> = state.checklist.iter().filter(|i| !active_only || i.active).cloned().collect();
        rows.sort_by(|a, b| a.ord.cmp(&b.ord).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn update(&mut self, id: i32, patch: ChecklistPatch) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        if let Some(i) = state.checklist.iter_mut().find(|i| i.id == id) {
            if let Some(label) = patch.label {
                i.label = label;
            }
            if let Some(description) = patch.description {
                i.description = description;
            }
            if let Some(active) = patch.active {
                i.active = active;
            }
            if let Some(ord) = patch.ord {
                i.ord = ord;
            }
        }
        Ok(())
    }
}

impl HistoryCommon for MemStore {
    async fn insert(&mut self, data: StatusChangeInsert) -> Result<i32, Error> {
        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        state.history.push(StatusChange {
            id,
            member_id: data.member_id,
            from_status: data.from_status,
            to_status: data.to_status,
            changed_by: data.changed_by,
            note: data.note,
            changed_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_member(&mut self, member_id: i32) -> Result<Vec<StatusChange>, Error> {
        let state = self.state.borrow();
        let mut rows: Vec<StatusChange> = state.history.iter().filter(|h| h.member_id == member_id).cloned().collect();
        rows.sort_by(|a, b| b.changed_at.cmp(&a.changed_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}

impl Common for MemStore {}
impl Storer for MemStore {}

impl TxStorer for MemStore {
    async fn commit(self) -> Result<(), Error> {
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}
