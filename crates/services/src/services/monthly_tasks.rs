//! Monthly maintenance computation: which care tasks apply to a garden's
//! plantings, optionally narrowed to one month.

use db::models::{
    garden::Garden,
    maintenance::{GardenTask, PlantMaintenance},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use ts_rs::TS;
use utils::pagination::{Page, Paginator};
use uuid::Uuid;

pub const TASKS_PER_PAGE: i64 = 10;

#[derive(Debug, Error)]
pub enum MonthlyTasksError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("garden not found")]
    GardenNotFound,
    #[error("month must be between 1 and 12")]
    InvalidMonth,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct MonthlyTasks {
    pub garden: Garden,
    pub selected_month: Option<i32>,
    pub tasks: Page<GardenTask>,
}

pub struct MonthlyTasksService;

impl MonthlyTasksService {
    pub async fn garden_tasks(
        pool: &SqlitePool,
        garden_id: Uuid,
        month: Option<i32>,
        page: Option<&str>,
    ) -> Result<MonthlyTasks, MonthlyTasksError> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(MonthlyTasksError::InvalidMonth);
            }
        }
        let garden = Garden::find_by_id(pool, garden_id)
            .await?
            .ok_or(MonthlyTasksError::GardenNotFound)?;

        let total = PlantMaintenance::count_for_garden(pool, garden_id, month).await?;
        let paginator = Paginator::new(TASKS_PER_PAGE, total);
        let page = paginator.resolve(page);
        let tasks = PlantMaintenance::find_for_garden(
            pool,
            garden_id,
            month,
            paginator.per_page,
            paginator.offset(page),
        )
        .await?;

        Ok(MonthlyTasks {
            garden,
            selected_month: month,
            tasks: paginator.page_of(tasks, page),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use db::{
        DBService,
        models::{
            garden::CreateGarden,
            maintenance::{CreatePlantMaintenance, TaskKind, WeekOfMonth},
            plant::{
                CreatePlant, Fertilization, FloweringSeason, MaxHeight, PestDiseaseResistance,
                Plant, PruningFrequency, Spread, SunlightExposure, WateringNeeds,
            },
            planting::{CreatePlanting, Planting},
            user::{CreateUser, User},
        },
    };

    fn a_plant(name: &str) -> CreatePlant {
        CreatePlant {
            name: name.into(),
            description: format!("{name} description"),
            max_height: MaxHeight::Medium,
            spread: Spread::Compact,
            flowering_season: FloweringSeason::Spring,
            sunlight_exposure: SunlightExposure::FullSun,
            pruning_frequency: PruningFrequency::Occasional,
            watering_needs: WateringNeeds::Moderate,
            fertilization: Fertilization::Occasional,
            pest_disease_resistance: PestDiseaseResistance::Susceptible,
        }
    }

    async fn seed(db: &DBService, task_months: &[i32]) -> Garden {
        let owner = User::create(
            &db.pool,
            &CreateUser {
                username: "gardener".into(),
                password_hash: "hash".into(),
                is_superuser: false,
            },
        )
        .await
        .unwrap();
        let garden = Garden::create(&db.pool, &CreateGarden { name: "Back yard".into() }, owner.id)
            .await
            .unwrap();
        let plant = Plant::create(&db.pool, &a_plant("Azalea")).await.unwrap();
        Planting::create(
            &db.pool,
            garden.id,
            &CreatePlanting {
                plant_id: plant.id,
                start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                location: "north bed".into(),
            },
        )
        .await
        .unwrap();
        for &month in task_months {
            PlantMaintenance::create(
                &db.pool,
                &CreatePlantMaintenance {
                    plant_id: plant.id,
                    task: TaskKind::Pruning,
                    task_description: "trim".into(),
                    week_of_month: WeekOfMonth::First,
                    month,
                },
            )
            .await
            .unwrap();
        }
        garden
    }

    #[tokio::test]
    async fn test_month_filter() {
        let db = DBService::new_in_memory().await.unwrap();
        let garden = seed(&db, &[3, 3, 7]).await;

        let all = MonthlyTasksService::garden_tasks(&db.pool, garden.id, None, None)
            .await
            .unwrap();
        assert_eq!(all.tasks.total_items, 3);
        assert!(all.selected_month.is_none());

        let march = MonthlyTasksService::garden_tasks(&db.pool, garden.id, Some(3), None)
            .await
            .unwrap();
        assert_eq!(march.tasks.total_items, 2);
        assert!(march.tasks.items.iter().all(|t| t.task.month == 3));
    }

    #[tokio::test]
    async fn test_pagination_clamps_out_of_range_page() {
        let db = DBService::new_in_memory().await.unwrap();
        let months: Vec<i32> = (0..25).map(|i| (i % 12) + 1).collect();
        let garden = seed(&db, &months).await;

        let last = MonthlyTasksService::garden_tasks(&db.pool, garden.id, None, Some("99"))
            .await
            .unwrap();
        assert_eq!(last.tasks.total_pages, 3);
        assert_eq!(last.tasks.page, 3);
        assert_eq!(last.tasks.items.len(), 5);

        let first = MonthlyTasksService::garden_tasks(&db.pool, garden.id, None, Some("nope"))
            .await
            .unwrap();
        assert_eq!(first.tasks.page, 1);
        assert_eq!(first.tasks.items.len(), 10);
    }

    #[tokio::test]
    async fn test_unknown_garden() {
        let db = DBService::new_in_memory().await.unwrap();
        let err = MonthlyTasksService::garden_tasks(&db.pool, Uuid::new_v4(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, MonthlyTasksError::GardenNotFound));
    }

    #[tokio::test]
    async fn test_invalid_month() {
        let db = DBService::new_in_memory().await.unwrap();
        let garden = seed(&db, &[]).await;
        let err = MonthlyTasksService::garden_tasks(&db.pool, garden.id, Some(13), None)
            .await
            .unwrap_err();
        assert!(matches!(err, MonthlyTasksError::InvalidMonth));
    }
}
