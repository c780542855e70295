use crate::core::db::{SettingsCommon, Storer, TxStorer};
use crate::core::member::require_admin;
use crate::error::Error;
use crate::models::settings::{SettingsPatch, SettingsUpdate, SystemSettings};

pub async fn get<S>(db: &mut S) -> Result<SystemSettings, Error>
where
    S: Storer,
{
    SettingsCommon::get(db).await
}

/// Admin-only. Lowering max_capacity below current occupancy is legal; the
/// accountant reports negative remaining slots and admissions stall until
/// attrition catches up.
pub async fn update<T>(mut db: T, actor_id: i32, patch: SettingsPatch) -> Result<SystemSettings, Error>
where
    T: TxStorer,
{
    require_admin(&mut db, actor_id).await?;
    let current = SettingsCommon::get_for_update(&mut db).await?;
    let update = SettingsUpdate {
        max_capacity: patch.max_capacity.unwrap_or(current.max_capacity),
        weekly_capacity: patch.weekly_capacity.unwrap_or(current.weekly_capacity),
        include_inactive_in_capacity: patch.include_inactive_in_capacity.unwrap_or(current.include_inactive_in_capacity),
        dormancy_period_weeks: patch.dormancy_period_weeks.unwrap_or(current.dormancy_period_weeks),
        kakao_invite_link: patch.kakao_invite_link.unwrap_or(current.kakao_invite_link),
    };
    if update.max_capacity < 1 {
        return Err(Error::ValidationFailed("max_capacity must be at least 1".into()));
    }
    if update.weekly_capacity < 0 || update.dormancy_period_weeks < 0 {
        return Err(Error::ValidationFailed("capacities must not be negative".into()));
    }
    SettingsCommon::update(&mut db, update).await?;
    let updated = SettingsCommon::get(&mut db).await?;
    db.commit().await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::MemStore;
    use crate::models::member::{MemberRole, MemberStatus};

    #[tokio::test]
    async fn update_is_admin_only_and_validated() {
        let store = MemStore::new();
        let admin = store.seed_member("Admin", "admin@club.kr", MemberStatus::Active, MemberRole::Admin);
        let kim = store.seed_member("Kim", "kim@club.kr", MemberStatus::Active, MemberRole::Member);

        let patch = SettingsPatch {
            max_capacity: Some(10),
            ..Default::default()
        };
        let err = update(store.storer(), kim, patch.clone()).await.unwrap_err();
        assert!(matches!(err, Error::NotAuthorized));

        let err = update(
            store.storer(),
            admin,
            SettingsPatch {
                max_capacity: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));

        let updated = update(store.storer(), admin, patch).await.unwrap();
        assert_eq!(updated.max_capacity, 10);
    }

    #[tokio::test]
    async fn partial_patch_keeps_other_fields() {
        let store = MemStore::new();
        let admin = store.seed_member("Admin", "admin@club.kr", MemberStatus::Active, MemberRole::Admin);
        let before = store.settings();
        let updated = update(
            store.storer(),
            admin,
            SettingsPatch {
                kakao_invite_link: Some("https://open.kakao.com/o/club".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.max_capacity, before.max_capacity);
        assert_eq!(updated.kakao_invite_link, "https://open.kakao.com/o/club");
    }

    #[tokio::test]
    async fn capacity_may_be_lowered_below_occupancy() {
        let store = MemStore::new();
        let admin = store.seed_member("Admin", "admin@club.kr", MemberStatus::Active, MemberRole::Admin);
        store.seed_member("Kim", "kim@club.kr", MemberStatus::Active, MemberRole::Member);
        let updated = update(
            store.storer(),
            admin,
            SettingsPatch {
                max_capacity: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let mut db = store.storer();
        let remaining = crate::core::capacity::remaining_slots(&mut db, &updated).await.unwrap();
        assert_eq!(remaining, -1);
    }
}
