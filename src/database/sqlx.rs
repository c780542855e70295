use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, PgPool, Postgres, QueryBuilder, Transaction};

use crate::core::db::{
    ApplicationCommon, ChecklistCommon, Common, HistoryCommon, MemberCommon, SettingsCommon, StateChangeCommon, Storer, TxStorer, WithdrawalCommon,
};
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

pub struct PgStore<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgStore<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> MemberCommon for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: MemberInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO members (email, password, salt, name, nickname, phone, birth_date, calendar_type, gender, \"position\", status, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id",
        )
        .bind(data.email)
        .bind(data.password)
        .bind(data.salt)
        .bind(data.name)
        .bind(data.nickname)
        .bind(data.phone)
        .bind(data.birth_date)
        .bind(data.calendar_type)
        .bind(data.gender)
        .bind(data.position)
        .bind(data.status)
        .bind(data.role)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<Member>, Error> {
        let member = query_as("SELECT * FROM members WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(member)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<Member>, Error> {
        let member = query_as("SELECT * FROM members WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(member)
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<Member>, Error> {
        let member = query_as("SELECT * FROM members WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(member)
    }

    async fn query(&mut self, param: &MemberQuery, page: i64, size: i64) -> Result<Vec<Member>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM members WHERE 1 = 1");
        if let Some(status) = param.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        if let Some(role) = param.role {
            stmt.push(" AND role = ").push_bind(role);
        }
        stmt.push(" ORDER BY joined_at DESC, id DESC");
        stmt.push(" LIMIT ").push_bind(size);
        stmt.push(" OFFSET ").push_bind((page - 1) * size);
        let members = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(members)
    }

    async fn count(&mut self, param: &MemberQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM members WHERE 1 = 1");
        if let Some(status) = param.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        if let Some(role) = param.role {
            stmt.push(" AND role = ").push_bind(role);
        }
        let (total,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(total)
    }

    async fn count_by_status(&mut self, status: MemberStatus) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM members WHERE status = $1")
            .bind(status)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(total)
    }

    async fn set_status(&mut self, id: i32, status: MemberStatus) -> Result<(), Error> {
        query("UPDATE members SET status = $1, version = version + 1, updated_at = now() WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn update_profile(&mut self, id: i32, patch: MemberPatch) -> Result<(), Error> {
        query(
            "UPDATE members SET
                name = COALESCE($1, name),
                nickname = COALESCE($2, nickname),
                phone = COALESCE($3, phone),
                birth_date = COALESCE($4, birth_date),
                calendar_type = COALESCE($5, calendar_type),
                gender = COALESCE($6, gender),
                \"position\" = COALESCE($7, \"position\"),
                version = version + 1,
                updated_at = now()
            WHERE id = $8",
        )
        .bind(patch.name)
        .bind(patch.nickname)
        .bind(patch.phone)
        .bind(patch.birth_date)
        .bind(patch.calendar_type)
        .bind(patch.gender)
        .bind(patch.position)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn update_credentials(&mut self, id: i32, password: String, salt: String) -> Result<(), Error> {
        query("UPDATE members SET password = $1, salt = $2, version = version + 1, updated_at = now() WHERE id = $3")
            .bind(password)
            .bind(salt)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn set_onboarding(&mut self, id: i32, kakao: bool, onboarding: bool) -> Result<(), Error> {
        query("UPDATE members SET has_joined_kakao = $1, has_completed_onboarding = $2, version = version + 1, updated_at = now() WHERE id = $3")
            .bind(kakao)
            .bind(onboarding)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM members WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }
}

impl<E> ApplicationCommon for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: ApplicationInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO applications (member_id, referrer_name, motivation, strokes, stage)
            VALUES ($1, $2, $3, $4, 'referrer_pending')
            RETURNING id",
        )
        .bind(data.member_id)
        .bind(data.referrer_name)
        .bind(data.motivation)
        .bind(data.strokes)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get_by_member(&mut self, member_id: i32) -> Result<Option<Application>, Error> {
        let app = query_as("SELECT * FROM applications WHERE member_id = $1")
            .bind(member_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(app)
    }

    async fn get_by_member_for_update(&mut self, member_id: i32) -> Result<Option<Application>, Error> {
        let app = query_as("SELECT * FROM applications WHERE member_id = $1 FOR UPDATE")
            .bind(member_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(app)
    }

    async fn query(&mut self, param: &ApplicationQuery, page: i64, size: i64) -> Result<Vec<Application>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM applications WHERE 1 = 1");
        if let Some(stage) = param.stage {
            stmt.push(" AND stage = ").push_bind(stage);
        }
        if let Some(referrer_name) = &param.referrer_name {
            stmt.push(" AND referrer_name = ").push_bind(referrer_name.clone());
        }
        stmt.push(" ORDER BY created_at DESC, id DESC");
        stmt.push(" LIMIT ").push_bind(size);
        stmt.push(" OFFSET ").push_bind((page - 1) * size);
        let apps = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(apps)
    }

    async fn count(&mut self, param: &ApplicationQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM applications WHERE 1 = 1");
        if let Some(stage) = param.stage {
            stmt.push(" AND stage = ").push_bind(stage);
        }
        if let Some(referrer_name) = &param.referrer_name {
            stmt.push(" AND referrer_name = ").push_bind(referrer_name.clone());
        }
        let (total,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(total)
    }

    async fn update(&mut self, id: i32, data: ApplicationUpdate) -> Result<(), Error> {
        query(
            "UPDATE applications SET
                referrer_name = $1,
                motivation = $2,
                strokes = $3,
                stage = $4,
                agreed_suitability = $5,
                agreed_mentoring = $6,
                agreed_cap_provision = $7,
                referrer_reject_reason = $8,
                referrer_processed_by = $9,
                referrer_processed_at = $10,
                admin_reject_reason = $11,
                admin_processed_by = $12,
                admin_processed_at = $13,
                updated_at = now()
            WHERE id = $14",
        )
        .bind(data.referrer_name)
        .bind(data.motivation)
        .bind(data.strokes)
        .bind(data.stage)
        .bind(data.agreed_suitability)
        .bind(data.agreed_mentoring)
        .bind(data.agreed_cap_provision)
        .bind(data.referrer_reject_reason)
        .bind(data.referrer_processed_by)
        .bind(data.referrer_processed_at)
        .bind(data.admin_reject_reason)
        .bind(data.admin_processed_by)
        .bind(data.admin_processed_at)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }

    async fn delete(&mut self, id: i32) -> Result<(), Error> {
        query("DELETE FROM applications WHERE id = $1").bind(id).execute(&mut self.executor).await?;
        Ok(())
    }
}

impl<E> StateChangeCommon for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: StateChangeInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO state_changes (member_id, member_name, current_status, requested_status, reason, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING id",
        )
        .bind(data.member_id)
        .bind(data.member_name)
        .bind(data.current_status)
        .bind(data.requested_status)
        .bind(data.reason)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<StateChange>, Error> {
        let row = query_as("SELECT * FROM state_changes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(row)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<StateChange>, Error> {
        let row = query_as("SELECT * FROM state_changes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(row)
    }

    async fn query(&mut self, param: &RequestQuery, page: i64, size: i64) -> Result<Vec<StateChange>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM state_changes WHERE 1 = 1");
        if let Some(status) = param.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        if let Some(member_id) = param.member_id {
            stmt.push(" AND member_id = ").push_bind(member_id);
        }
        stmt.push(" ORDER BY created_at DESC, id DESC");
        stmt.push(" LIMIT ").push_bind(size);
        stmt.push(" OFFSET ").push_bind((page - 1) * size);
        let rows = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(rows)
    }

    async fn count(&mut self, param: &RequestQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM state_changes WHERE 1 = 1");
        if let Some(status) = param.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        if let Some(member_id) = param.member_id {
            stmt.push(" AND member_id = ").push_bind(member_id);
        }
        let (total,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(total)
    }

    async fn has_pending(&mut self, member_id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT id FROM state_changes WHERE member_id = $1 AND status = 'pending')")
            .bind(member_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn set_decision(&mut self, id: i32, decision: DecisionRecord) -> Result<(), Error> {
        query("UPDATE state_changes SET status = $1, processed_by = $2, processed_at = $3, reject_reason = $4 WHERE id = $5")
            .bind(decision.status)
            .bind(decision.processed_by)
            .bind(decision.processed_at)
            .bind(decision.reject_reason)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }
}

impl<E> WithdrawalCommon for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: WithdrawalInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO withdrawal_requests (member_id, member_name, reason, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id",
        )
        .bind(data.member_id)
        .bind(data.member_name)
        .bind(data.reason)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<WithdrawalRequest>, Error> {
        let row = query_as("SELECT * FROM withdrawal_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(row)
    }

    async fn get_for_update(&mut self, id: i32) -> Result<Option<WithdrawalRequest>, Error> {
        let row = query_as("SELECT * FROM withdrawal_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(row)
    }

    async fn query(&mut self, param: &RequestQuery, page: i64, size: i64) -> Result<Vec<WithdrawalRequest>, Error> {
        let mut stmt = QueryBuilder::new("SELECT * FROM withdrawal_requests WHERE 1 = 1");
        if let Some(status) = param.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        if let Some(member_id) = param.member_id {
            stmt.push(" AND member_id = ").push_bind(member_id);
        }
        stmt.push(" ORDER BY created_at DESC, id DESC");
        stmt.push(" LIMIT ").push_bind(size);
        stmt.push(" OFFSET ").push_bind((page - 1) * size);
        let rows = stmt.build_query_as().fetch_all(&mut self.executor).await?;
        Ok(rows)
    }

    async fn count(&mut self, param: &RequestQuery) -> Result<i64, Error> {
        let mut stmt = QueryBuilder::new("SELECT COUNT(*) FROM withdrawal_requests WHERE 1 = 1");
        if let Some(status) = param.status {
            stmt.push(" AND status = ").push_bind(status);
        }
        if let Some(member_id) = param.member_id {
            stmt.push(" AND member_id = ").push_bind(member_id);
        }
        let (total,): (i64,) = stmt.build_query_as().fetch_one(&mut self.executor).await?;
        Ok(total)
    }

    async fn has_pending(&mut self, member_id: i32) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT id FROM withdrawal_requests WHERE member_id = $1 AND status = 'pending')")
            .bind(member_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn set_decision(&mut self, id: i32, decision: DecisionRecord) -> Result<(), Error> {
        query("UPDATE withdrawal_requests SET status = $1, processed_by = $2, processed_at = $3, reject_reason = $4 WHERE id = $5")
            .bind(decision.status)
            .bind(decision.processed_by)
            .bind(decision.processed_at)
            .bind(decision.reject_reason)
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }
}

impl<E> SettingsCommon for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self) -> Result<SystemSettings, Error> {
        let settings = query_as("SELECT * FROM system_settings WHERE id = 1").fetch_one(&mut self.executor).await?;
        Ok(settings)
    }

    async fn get_for_update(&mut self) -> Result<SystemSettings, Error> {
        let settings = query_as("SELECT * FROM system_settings WHERE id = 1 FOR UPDATE")
            .fetch_one(&mut self.executor)
            .await?;
        Ok(settings)
    }

    async fn update(&mut self, data: SettingsUpdate) -> Result<(), Error> {
        query(
            "UPDATE system_settings SET
                max_capacity = $1,
                weekly_capacity = $2,
                include_inactive_in_capacity = $3,
                dormancy_period_weeks = $4,
                kakao_invite_link = $5,
                updated_at = now()
            WHERE id = 1",
        )
        .bind(data.max_capacity)
        .bind(data.weekly_capacity)
        .bind(data.include_inactive_in_capacity)
        .bind(data.dormancy_period_weeks)
        .bind(data.kakao_invite_link)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }
}

impl<E> ChecklistCommon for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: ChecklistInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO checklist_items (label, description, active, ord) VALUES ($1, $2, true, $3) RETURNING id")
            .bind(data.label)
            .bind(data.description)
            .bind(data.ord)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<ChecklistItem>, Error> {
        let item = query_as("SELECT * FROM checklist_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(item)
    }

    async fn list(&mut self, active_only: bool) -> Result<Vec<ChecklistItem>, Error> {
        let items = query_as("SELECT * FROM checklist_items WHERE NOT $1 OR active ORDER BY ord, id")
            .bind(active_only)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(items)
    }

    async fn update(&mut self, id: i32, patch: ChecklistPatch) -> Result<(), Error> {
        query(
            "UPDATE checklist_items SET
                label = COALESCE($1, label),
                description = COALESCE($2, description),
                active = COALESCE($3, active),
                ord = COALESCE($4, ord)
            WHERE id = $5",
        )
        .bind(patch.label)
        .bind(patch.description)
        .bind(patch.active)
        .bind(patch.ord)
        .bind(id)
        .execute(&mut self.executor)
        .await?;
        Ok(())
    }
}

impl<E> HistoryCommon for PgStore<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, data: StatusChangeInsert) -> Result<i32, Error> {
        let id = query_scalar(
            "INSERT INTO status_change_history (member_id, from_status, to_status, changed_by, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id",
        )
        .bind(data.member_id)
        .bind(data.from_status)
        .bind(data.to_status)
        .bind(data.changed_by)
        .bind(data.note)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(id)
    }

    async fn list_for_member(&mut self, member_id: i32) -> Result<Vec<StatusChange>, Error> {
        let rows = query_as("SELECT * FROM status_change_history WHERE member_id = $1 ORDER BY changed_at DESC, id DESC")
            .bind(member_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(rows)
    }
}

impl Common for PgStore<PoolConnection<Postgres>> {}
impl<'a> Common for PgStore<Transaction<'a, Postgres>> {}
impl Storer for PgStore<PoolConnection<Postgres>> {}
impl<'a> Storer for PgStore<Transaction<'a, Postgres>> {}

impl<'a> TxStorer for PgStore<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

pub struct PgStoreManager {
    pool: PgPool,
}

impl PgStoreManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> Result<PgStore<Transaction<'static, Postgres>>, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgStore { executor: tx })
    }

    pub async fn acquire(&self) -> Result<PgStore<PoolConnection<Postgres>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgStore { executor: conn })
    }
}
