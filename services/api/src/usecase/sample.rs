use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::SampleRepository;
use crate::domain::types::Sample;
use crate::error::ApiError;

fn sample_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("sampleId {id} not found."))
}

// ── GetSample ────────────────────────────────────────────────────────────────

pub struct GetSampleUseCase<R: SampleRepository> {
    pub repo: R,
}

impl<R: SampleRepository> GetSampleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Sample, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| sample_not_found(id))
    }
}

// ── GetAllSamples ────────────────────────────────────────────────────────────

pub struct GetAllSamplesUseCase<R: SampleRepository> {
    pub repo: R,
}

impl<R: SampleRepository> GetAllSamplesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Sample>, ApiError> {
        self.repo.find_all().await
    }
}

// ── CreateSample ─────────────────────────────────────────────────────────────

pub struct CreateSampleInput {
    pub name: String,
    pub description: String,
}

pub struct CreateSampleUseCase<R: SampleRepository> {
    pub repo: R,
}

impl<R: SampleRepository> CreateSampleUseCase<R> {
    pub async fn execute(&self, input: CreateSampleInput) -> Result<Sample, ApiError> {
        let now = Utc::now();
        let sample = Sample {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&sample).await?;
        Ok(sample)
    }
}

// ── UpdateSample ─────────────────────────────────────────────────────────────

pub struct UpdateSampleUseCase<R: SampleRepository> {
    pub repo: R,
}

impl<R: SampleRepository> UpdateSampleUseCase<R> {
    pub async fn execute(&self, id: Uuid, input: CreateSampleInput) -> Result<Sample, ApiError> {
        let mut sample = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| sample_not_found(id))?;
        sample.name = input.name;
        sample.description = input.description;
        sample.updated_at = Utc::now();
        if !self.repo.update(&sample).await? {
            return Err(sample_not_found(id));
        }
        Ok(sample)
    }
}

// ── DeleteSample ─────────────────────────────────────────────────────────────

pub struct DeleteSampleUseCase<R: SampleRepository> {
    pub repo: R,
}

impl<R: SampleRepository> DeleteSampleUseCase<R> {
    /// Returns the deleted record, matching the mutation's return shape.
    pub async fn execute(&self, id: Uuid) -> Result<Sample, ApiError> {
        let sample = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| sample_not_found(id))?;
        if !self.repo.delete(id).await? {
            return Err(sample_not_found(id));
        }
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct MockSampleRepo {
        samples: Arc<Mutex<Vec<Sample>>>,
    }

    impl SampleRepository for MockSampleRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Sample>, ApiError> {
            Ok(self
                .samples
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned())
        }
        async fn find_all(&self) -> Result<Vec<Sample>, ApiError> {
            Ok(self.samples.lock().unwrap().clone())
        }
        async fn create(&self, sample: &Sample) -> Result<(), ApiError> {
            self.samples.lock().unwrap().push(sample.clone());
            Ok(())
        }
        async fn update(&self, sample: &Sample) -> Result<bool, ApiError> {
            let mut samples = self.samples.lock().unwrap();
            match samples.iter_mut().find(|s| s.id == sample.id) {
                Some(existing) => {
                    *existing = sample.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
        async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
            let mut samples = self.samples.lock().unwrap();
            let before = samples.len();
            samples.retain(|s| s.id != id);
            Ok(samples.len() < before)
        }
    }

    #[tokio::test]
    async fn should_reference_requested_key_when_sample_missing() {
        let id = Uuid::new_v4();
        let usecase = GetSampleUseCase {
            repo: MockSampleRepo::default(),
        };
        let err = usecase.execute(id).await.unwrap_err();
        match err {
            ApiError::NotFound(message) => assert!(message.contains(&id.to_string())),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_create_and_read_back_sample() {
        let repo = MockSampleRepo::default();
        let created = CreateSampleUseCase { repo: repo.clone() }
            .execute(CreateSampleInput {
                name: "soil test".into(),
                description: "pH and nutrients".into(),
            })
            .await
            .unwrap();
        let fetched = GetSampleUseCase { repo: repo.clone() }
            .execute(created.id)
            .await
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_update_fields_and_bump_updated_at() {
        let repo = MockSampleRepo::default();
        let created = CreateSampleUseCase { repo: repo.clone() }
            .execute(CreateSampleInput {
                name: "before".into(),
                description: "old".into(),
            })
            .await
            .unwrap();
        let updated = UpdateSampleUseCase { repo: repo.clone() }
            .execute(
                created.id,
                CreateSampleInput {
                    name: "after".into(),
                    description: "new".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "after");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn should_return_deleted_sample_and_remove_row() {
        let repo = MockSampleRepo::default();
        let created = CreateSampleUseCase { repo: repo.clone() }
            .execute(CreateSampleInput {
                name: "one shot".into(),
                description: "gone soon".into(),
            })
            .await
            .unwrap();
        let deleted = DeleteSampleUseCase { repo: repo.clone() }
            .execute(created.id)
            .await
            .unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(repo.samples.lock().unwrap().is_empty());
    }
}
