use serde::Serialize;

use crate::core::db::{MemberCommon, Storer};
use crate::error::Error;
use crate::models::member::MemberStatus;
use crate::models::settings::SystemSettings;

/// How many slots the given counts consume. Withdrawn and pending members
/// never count; inactive members count only under the inclusion policy.
pub fn occupancy_of(active: i64, inactive: i64, settings: &SystemSettings) -> i64 {
    if settings.include_inactive_in_capacity {
        active + inactive
    } else {
        active
    }
}

pub async fn occupancy<S>(db: &mut S, settings: &SystemSettings) -> Result<i64, Error>
where
    S: Storer,
{
    let active = MemberCommon::count_by_status(db, MemberStatus::Active).await?;
    let inactive = if settings.include_inactive_in_capacity {
        MemberCommon::count_by_status(db, MemberStatus::Inactive).await?
    } else {
        0
    };
    Ok(occupancy_of(active, inactive, settings))
}

/// May be negative when capacity was lowered below current occupancy;
/// callers treat anything <= 0 as full.
pub async fn remaining_slots<S>(db: &mut S, settings: &SystemSettings) -> Result<i64, Error>
where
    S: Storer,
{
    let occupied = occupancy(db, settings).await?;
    Ok(settings.max_capacity as i64 - occupied)
}

#[derive(Debug, Serialize)]
pub struct Occupancy {
    pub count: i64,
    pub max: i32,
    pub remaining: i64,
}

pub async fn current<S>(db: &mut S) -> Result<Occupancy, Error>
where
    S: Storer,
{
    let settings = crate::core::db::SettingsCommon::get(db).await?;
    let count = occupancy(db, &settings).await?;
    Ok(Occupancy {
        count,
        max: settings.max_capacity,
        remaining: settings.max_capacity as i64 - count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemStore;
    use crate::models::member::{MemberRole, MemberStatus};

    fn settings(max: i32, include_inactive: bool) -> SystemSettings {
        SystemSettings {
            id: 1,
            max_capacity: max,
            weekly_capacity: 3,
            include_inactive_in_capacity: include_inactive,
            dormancy_period_weeks: 4,
            kakao_invite_link: String::new(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn inactive_members_count_only_under_policy() {
        let s = settings(10, false);
        assert_eq!(occupancy_of(4, 7, &s), 4);
        let s = settings(10, true);
        assert_eq!(occupancy_of(4, 7, &s), 11);
    }

    #[tokio::test]
    async fn withdrawn_and_pending_never_count() {
        let store = MemStore::new();
        store.seed_member("a", "a@club.kr", MemberStatus::Active, MemberRole::Member);
        store.seed_member("b", "b@club.kr", MemberStatus::Pending, MemberRole::Member);
        store.seed_member("c", "c@club.kr", MemberStatus::Withdrawn, MemberRole::Member);
        store.seed_member("d", "d@club.kr", MemberStatus::Inactive, MemberRole::Member);
        let mut db = store.storer();
        assert_eq!(occupancy(&mut db, &settings(10, false)).await.unwrap(), 1);
        assert_eq!(occupancy(&mut db, &settings(10, true)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn remaining_may_go_negative() {
        let store = MemStore::new();
        store.seed_member("a", "a@club.kr", MemberStatus::Active, MemberRole::Member);
        store.seed_member("b", "b@club.kr", MemberStatus::Active, MemberRole::Member);
        let mut db = store.storer();
        assert_eq!(remaining_slots(&mut db, &settings(1, false)).await.unwrap(), -1);
    }
}
