use crate::core::db::{ChecklistCommon, Storer, TxStorer};
use crate::core::member::require_admin;
use crate::error::Error;
use crate::models::checklist::{ChecklistInsert, ChecklistItem, ChecklistPatch};

pub async fn list<S>(db: &mut S, active_only: bool) -> Result<Vec<ChecklistItem>, Error>
where
    S: Storer,
{
    ChecklistCommon::list(db, active_only).await
}

pub async fn create<T>(mut db: T, actor_id: i32, data: ChecklistInsert) -> Result<i32, Error>
where
    T: TxStorer,
{
    require_admin(&mut db, actor_id).await?;
    if data.label.trim().is_empty() {
        return Err(Error::ValidationFailed("a label is required".into()));
    }
    let id = ChecklistCommon::insert(&mut db, data).await?;
    db.commit().await?;
    Ok(id)
}

pub async fn update<T>(mut db: T, actor_id: i32, id: i32, patch: ChecklistPatch) -> Result<(), Error>
where
    T: TxStorer,
{
    require_admin(&mut db, actor_id).await?;
    if let Some(label) = &patch.label {
        if label.trim().is_empty() {
            return Err(Error::ValidationFailed("a label is required".into()));
        }
    }
    ChecklistCommon::get(&mut db, id).await?.ok_or(Error::NotFound)?;
    ChecklistCommon::update(&mut db, id, patch).await?;
    db.commit().await?;
    Ok(())
}
