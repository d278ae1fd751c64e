use chrono::NaiveDate;
use contracts::domain::a003_field::aggregate::FieldId;
use contracts::domain::a004_task::aggregate::{CreateTaskDto, Task, TaskId, UpdateTaskDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::validation::ValidationErrors;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::a003_field;
use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    FieldId(FieldId),
    /// Not completed, dated after the given day
    Upcoming(NaiveDate),
}

/// Создание задачи; поле должно существовать
pub async fn create(db: &DatabaseConnection, dto: CreateTaskDto) -> ServiceResult<Task> {
    let data = dto.validate()?;

    let txn = db.begin().await?;
    if !a003_field::repository::exists_by_id(&txn, data.field_id).await? {
        return Err(ValidationErrors::single(
            "fieldId",
            format!("Field {} does not exist", data.field_id),
        )
        .into());
    }
    let saved = repository::save(&txn, Task::new(data)).await?;
    txn.commit().await?;

    tracing::info!("Task {} created for field {}", saved.id, saved.field_id);
    Ok(saved)
}

pub async fn get_by_id(db: &DatabaseConnection, id: TaskId) -> ServiceResult<Option<Task>> {
    Ok(repository::find_by_id(db, id).await?)
}

pub async fn list(db: &DatabaseConnection, filter: TaskFilter) -> ServiceResult<Vec<Task>> {
    let tasks = match filter {
        TaskFilter::All => repository::find_all(db).await?,
        TaskFilter::FieldId(field_id) => repository::find_by_field_id(db, field_id).await?,
        TaskFilter::Upcoming(today) => repository::find_upcoming(db, today).await?,
    };
    Ok(tasks)
}

/// Tasks still to do, relative to the server's local date
pub async fn upcoming(db: &DatabaseConnection) -> ServiceResult<Vec<Task>> {
    list(db, TaskFilter::Upcoming(chrono::Local::now().date_naive())).await
}

/// Replaces date, name and description; `completed` and `field_id` are kept
pub async fn update(db: &DatabaseConnection, id: TaskId, dto: UpdateTaskDto) -> ServiceResult<Option<Task>> {
    let cmd = dto.validate()?;

    let txn = db.begin().await?;
    let Some(mut task) = repository::find_by_id(&txn, id).await? else {
        return Ok(None);
    };
    ServiceError::check_version(cmd.expected_version, task.metadata.version)?;

    task.update(cmd.data);
    task.before_write();
    let saved = repository::save(&txn, task).await?;
    txn.commit().await?;

    Ok(Some(saved))
}

/// Idempotent: completing a completed task still counts as an update
pub async fn mark_completed(db: &DatabaseConnection, id: TaskId) -> ServiceResult<Option<Task>> {
    let txn = db.begin().await?;
    let Some(mut task) = repository::find_by_id(&txn, id).await? else {
        return Ok(None);
    };
    task.mark_completed();
    task.before_write();
    let saved = repository::save(&txn, task).await?;
    txn.commit().await?;

    Ok(Some(saved))
}

pub async fn delete(db: &DatabaseConnection, id: TaskId) -> ServiceResult<bool> {
    let txn = db.begin().await?;
    if !repository::exists_by_id(&txn, id).await? {
        return Ok(false);
    }
    repository::delete_by_id(&txn, id).await?;
    txn.commit().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a004_task::aggregate::TaskResource;
    use crate::domain::a003_field::service::tests::field_dto;
    use crate::shared::data::db::connect_in_memory;

    fn task_dto(field_id: FieldId, date: NaiveDate, name: &str) -> CreateTaskDto {
        CreateTaskDto {
            field_id: Some(field_id.0),
            date: Some(date),
            name: Some(name.into()),
            description: Some("Sector norte".into()),
        }
    }

    fn day(offset: i64) -> NaiveDate {
        chrono::Local::now().date_naive() + chrono::Duration::days(offset)
    }

    #[tokio::test]
    async fn task_requires_existing_field() {
        let db = connect_in_memory().await.unwrap();
        let err = create(&db, task_dto(FieldId(7), day(1), "Riego")).await.unwrap_err();
        match err {
            ServiceError::Validation(e) => assert!(e.has_field("fieldId")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn upcoming_excludes_completed_and_past() {
        let db = connect_in_memory().await.unwrap();
        let field = a003_field::service::create(&db, field_dto("A", "Healthy", 1))
            .await
            .unwrap();

        let future = create(&db, task_dto(field.id, day(3), "Future")).await.unwrap();
        create(&db, task_dto(field.id, day(-3), "Past")).await.unwrap();
        create(&db, task_dto(field.id, day(0), "Today")).await.unwrap();
        let done = create(&db, task_dto(field.id, day(5), "Done")).await.unwrap();
        mark_completed(&db, done.id).await.unwrap().unwrap();

        let upcoming = upcoming(&db).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, future.id);
    }

    #[tokio::test]
    async fn completion_is_one_way_and_idempotent() {
        let db = connect_in_memory().await.unwrap();
        let field = a003_field::service::create(&db, field_dto("A", "Healthy", 1))
            .await
            .unwrap();
        let task = create(&db, task_dto(field.id, day(1), "Fertilizar")).await.unwrap();
        assert!(!task.completed);

        let first = mark_completed(&db, task.id).await.unwrap().unwrap();
        let second = mark_completed(&db, task.id).await.unwrap().unwrap();
        assert!(first.completed && second.completed);

        let updated = update(
            &db,
            task.id,
            UpdateTaskDto {
                date: Some(day(2)),
                name: Some("Fertilizar otra vez".into()),
                description: Some("Sector sur".into()),
                version: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.field_id, field.id);
        assert!(mark_completed(&db, TaskId(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_field_deletes_its_tasks() {
        let db = connect_in_memory().await.unwrap();
        let keep = a003_field::service::create(&db, field_dto("Keep", "Healthy", 1))
            .await
            .unwrap();
        let gone = a003_field::service::create(&db, field_dto("Gone", "Healthy", 1))
            .await
            .unwrap();
        create(&db, task_dto(gone.id, day(1), "a")).await.unwrap();
        create(&db, task_dto(gone.id, day(2), "b")).await.unwrap();
        let kept = create(&db, task_dto(keep.id, day(1), "c")).await.unwrap();

        assert!(a003_field::service::delete(&db, gone.id).await.unwrap());

        assert!(list(&db, TaskFilter::FieldId(gone.id)).await.unwrap().is_empty());
        let all = list(&db, TaskFilter::All).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, kept.id);
    }

    #[tokio::test]
    async fn create_then_read_round_trip() {
        let db = connect_in_memory().await.unwrap();
        let field = a003_field::service::create(&db, field_dto("A", "Healthy", 1))
            .await
            .unwrap();
        let created = create(&db, task_dto(field.id, day(2), "Riego")).await.unwrap();

        let found = get_by_id(&db, created.id).await.unwrap().unwrap();
        let resource = TaskResource::from(&found);
        assert!(resource.id > 0);
        assert_eq!(resource.field_id, field.id.0);
        assert_eq!(resource.date, day(2));
        assert_eq!(resource.name, "Riego");
        assert_eq!(resource.description, "Sector norte");
        assert!(!resource.completed);
        assert_eq!(resource.version, 0);
        assert_eq!(resource.created_at, resource.updated_at);
        assert_eq!(resource, TaskResource::from(&created));
    }
}
