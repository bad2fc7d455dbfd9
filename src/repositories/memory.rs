//! In-memory `JobStore` for service and handler tests.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};

use crate::error::{AppError, AppResult};
use crate::models::{Job, JobChangeset, JobFilter, NewJob};
use crate::repositories::JobStore;

#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<BTreeMap<i32, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    fn matches(job: &Job, filter: &JobFilter) -> bool {
        if let Some(min_salary) = filter.min_salary
            && job.salary.is_none_or(|salary| salary < min_salary)
        {
            return false;
        }

        if filter.has_equity == Some(true)
            && job
                .equity
                .as_ref()
                .is_none_or(|equity| *equity <= BigDecimal::zero())
        {
            return false;
        }

        if let Some(title) = &filter.title
            && !job.title.to_lowercase().contains(&title.to_lowercase())
        {
            return false;
        }

        true
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn exists(&self, id: i32) -> AppResult<bool> {
        Ok(self.jobs.read().unwrap().contains_key(&id))
    }

    async fn insert(&self, new_job: NewJob) -> AppResult<Job> {
        let mut jobs = self.jobs.write().unwrap();
        if jobs.contains_key(&new_job.id) {
            return Err(AppError::Duplicate {
                entity: "job".to_string(),
                field: "id".to_string(),
                value: new_job.id.to_string(),
            });
        }
        let job = Job::from(new_job);
        jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_all(&self, filter: &JobFilter) -> AppResult<Vec<Job>> {
        let mut found: Vec<Job> = self
            .jobs
            .read()
            .unwrap()
            .values()
            .filter(|job| Self::matches(job, filter))
            .cloned()
            .collect();
        // Case-folded like a linguistic collation; byte order would put
        // lowercase titles after every uppercase one.
        found.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then(a.title.cmp(&b.title))
                .then(a.id.cmp(&b.id))
        });
        Ok(found)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Job>> {
        Ok(self.jobs.read().unwrap().get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Job>> {
        Ok(self
            .jobs
            .read()
            .unwrap()
            .values()
            .find(|job| job.title == title)
            .cloned())
    }

    async fn update(&self, id: i32, changes: JobChangeset) -> AppResult<Option<Job>> {
        let mut jobs = self.jobs.write().unwrap();
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            job.title = title;
        }
        if let Some(salary) = changes.salary {
            job.salary = salary;
        }
        if let Some(equity) = changes.equity {
            job.equity = equity;
        }
        Ok(Some(job.clone()))
    }

    async fn delete(&self, id: i32) -> AppResult<usize> {
        Ok(usize::from(self.jobs.write().unwrap().remove(&id).is_some()))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: i32, title: &str) -> NewJob {
        NewJob {
            id,
            title: title.to_string(),
            salary: Some(10),
            equity: Some(BigDecimal::from(1)),
            company_handle: "acme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_all_orders_titles_ignoring_case() {
        let store = InMemoryJobStore::new();
        for new_job in [job(1, "beta"), job(2, "Gamma"), job(3, "Alpha")] {
            store.insert(new_job).await.unwrap();
        }

        let titles: Vec<String> = store
            .find_all(&JobFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|job| job.title)
            .collect();

        assert_eq!(titles, ["Alpha", "beta", "Gamma"]);
    }

    #[tokio::test]
    async fn test_update_clears_nullable_columns() {
        let store = InMemoryJobStore::new();
        store.insert(job(1, "Engineer")).await.unwrap();

        let updated = store
            .update(
                1,
                JobChangeset {
                    salary: Some(None),
                    ..JobChangeset::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.salary, None);
        assert_eq!(updated.equity, Some(BigDecimal::from(1)));
    }

    #[tokio::test]
    async fn test_duplicate_insert_reports_job_entity() {
        let store = InMemoryJobStore::new();
        store.insert(job(1, "Engineer")).await.unwrap();

        match store.insert(job(1, "Other")).await {
            Err(AppError::Duplicate { entity, .. }) => assert_eq!(entity, "job"),
            other => panic!("Expected Duplicate, got {:?}", other),
        }
    }
}
