// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::net::IpAddr;
use std::sync::Arc;

use crate::app::errors::{AppError, AppErrorKind, AppResult, codes};
use crate::app::intent::{Intent, Submission, classify};
use crate::app::ports::{ClockPort, SchedulerPort, StagingPort};
use crate::app::services::{identity, records};
use crate::app::types::{ConsolePage, JobRowView};

#[derive(Clone)]
pub struct UseCases {
    pub(crate) scheduler: Arc<dyn SchedulerPort>,
    pub(crate) staging: Arc<dyn StagingPort>,
    pub(crate) clock: Arc<dyn ClockPort>,
}

impl UseCases {
    pub fn new(
        scheduler: Arc<dyn SchedulerPort>,
        staging: Arc<dyn StagingPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            scheduler,
            staging,
            clock,
        }
    }

    /// Run one submission end to end: classify, apply the intent's effect,
    /// then refresh the job listing for the resolved owner. A submission
    /// that matches no intent performs no effect and no listing.
    pub async fn handle_submission(
        &self,
        submission: Submission,
        peer: Option<IpAddr>,
        nonce: u64,
    ) -> AppResult<ConsolePage> {
        let intent = classify(submission).map_err(|err| {
            AppError::with_message(
                AppErrorKind::InvalidArgument,
                codes::INVALID_ARGUMENT,
                err.to_string(),
            )
        })?;

        let (owner, notice) = match intent {
            Intent::FreshLoad => {
                let ctx = identity::IdentityContext {
                    now_unix: self.clock.now_utc().unix_timestamp(),
                    peer,
                    nonce,
                };
                let owner = identity::guest_identity(&ctx);
                tracing::debug!(owner = %owner, "assigned guest identity");
                (owner, None)
            }
            Intent::SearchOnly { owner } => (owner, None),
            Intent::SubmitJob {
                owner,
                job,
                upload,
                params,
            } => {
                let artifact = self.staging.stage(&owner, &job, &upload, &params).await?;
                self.scheduler.add_job(&owner, &job).await?;
                tracing::info!(
                    owner = %owner,
                    job = %job,
                    path = %artifact.stored_path.display(),
                    bytes = artifact.byte_size,
                    "job submitted"
                );
                let notice = format!("job '{job}' submitted ({} bytes staged)", artifact.byte_size);
                (owner, Some(notice))
            }
            Intent::CancelJob { owner, job } => {
                self.scheduler.cancel_job(&owner, &job).await?;
                tracing::info!(owner = %owner, job = %job, "job cancellation requested");
                (owner, Some(format!("cancellation requested for '{job}'")))
            }
        };

        let rows = self
            .scheduler
            .list_jobs(&owner)
            .await?
            .into_iter()
            .map(|record| {
                let action = records::row_action(&record);
                JobRowView { record, action }
            })
            .collect();

        Ok(ConsolePage {
            owner,
            rows,
            notice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::types::{
        AnalysisParams, JobRecord, JobStatus, StagedArtifact, UploadRequest,
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Add { owner: String, job: String },
        List { owner: String },
        Cancel { owner: String, job: String },
    }

    #[derive(Default)]
    struct RecordingScheduler {
        ops: Mutex<Vec<Op>>,
        listing: Vec<JobRecord>,
    }

    impl RecordingScheduler {
        fn with_listing(listing: Vec<JobRecord>) -> Self {
            Self {
                ops: Mutex::new(Vec::new()),
                listing,
            }
        }

        fn ops(&self) -> Vec<Op> {
            self.ops.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SchedulerPort for RecordingScheduler {
        async fn add_job(&self, owner: &str, job: &str) -> AppResult<()> {
            self.ops.lock().unwrap().push(Op::Add {
                owner: owner.to_string(),
                job: job.to_string(),
            });
            Ok(())
        }

        async fn list_jobs(&self, owner: &str) -> AppResult<Vec<JobRecord>> {
            self.ops.lock().unwrap().push(Op::List {
                owner: owner.to_string(),
            });
            Ok(self.listing.clone())
        }

        async fn cancel_job(&self, owner: &str, job: &str) -> AppResult<()> {
            self.ops.lock().unwrap().push(Op::Cancel {
                owner: owner.to_string(),
                job: job.to_string(),
            });
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingStaging {
        staged: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingStaging {
        fn staged(&self) -> Vec<(String, String, String)> {
            self.staged.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StagingPort for RecordingStaging {
        async fn stage(
            &self,
            owner: &str,
            job: &str,
            upload: &UploadRequest,
            _params: &AnalysisParams,
        ) -> AppResult<StagedArtifact> {
            self.staged.lock().unwrap().push((
                owner.to_string(),
                job.to_string(),
                upload.file_name.clone(),
            ));
            Ok(StagedArtifact {
                file_name: upload.file_name.clone(),
                stored_path: PathBuf::from("/tmp").join(&upload.file_name),
                byte_size: upload.bytes.len() as u64,
            })
        }
    }

    struct FixedClock;

    impl ClockPort for FixedClock {
        fn now_utc(&self) -> OffsetDateTime {
            OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
        }
    }

    fn usecases(
        listing: Vec<JobRecord>,
    ) -> (UseCases, Arc<RecordingScheduler>, Arc<RecordingStaging>) {
        let scheduler = Arc::new(RecordingScheduler::with_listing(listing));
        let staging = Arc::new(RecordingStaging::default());
        let uc = UseCases::new(scheduler.clone(), staging.clone(), Arc::new(FixedClock));
        (uc, scheduler, staging)
    }

    fn submit_submission() -> Submission {
        Submission {
            usr_name: Some("alice".to_string()),
            job_name: Some("run1".to_string()),
            search_only: Some("0".to_string()),
            file: Some(UploadRequest {
                file_name: "edges.tsv".to_string(),
                bytes: Bytes::from(vec![b'x'; 200]),
            }),
            ..Submission::default()
        }
    }

    #[tokio::test]
    async fn search_only_lists_without_side_effects() {
        let (uc, scheduler, staging) = usecases(Vec::new());
        let page = uc
            .handle_submission(
                Submission {
                    usr_name: Some("alice".to_string()),
                    search_only: Some("1".to_string()),
                    ..Submission::default()
                },
                None,
                7,
            )
            .await
            .unwrap();
        assert_eq!(page.owner, "alice");
        assert_eq!(
            scheduler.ops(),
            vec![Op::List {
                owner: "alice".to_string()
            }]
        );
        assert!(staging.staged().is_empty());
    }

    #[tokio::test]
    async fn submit_stages_then_adds_then_lists() {
        let (uc, scheduler, staging) = usecases(Vec::new());
        let page = uc.handle_submission(submit_submission(), None, 7).await.unwrap();
        assert_eq!(
            staging.staged(),
            vec![(
                "alice".to_string(),
                "run1".to_string(),
                "edges.tsv".to_string()
            )]
        );
        assert_eq!(
            scheduler.ops(),
            vec![
                Op::Add {
                    owner: "alice".to_string(),
                    job: "run1".to_string()
                },
                Op::List {
                    owner: "alice".to_string()
                },
            ]
        );
        assert!(page.notice.unwrap().contains("run1"));
    }

    #[tokio::test]
    async fn cancel_issues_cancel_then_lists() {
        let (uc, scheduler, staging) = usecases(Vec::new());
        uc.handle_submission(
            Submission {
                usr_name: Some("alice".to_string()),
                job_name: Some("run1".to_string()),
                cancel_job: Some("1".to_string()),
                ..Submission::default()
            },
            None,
            7,
        )
        .await
        .unwrap();
        assert_eq!(
            scheduler.ops(),
            vec![
                Op::Cancel {
                    owner: "alice".to_string(),
                    job: "run1".to_string()
                },
                Op::List {
                    owner: "alice".to_string()
                },
            ]
        );
        assert!(staging.staged().is_empty());
    }

    #[tokio::test]
    async fn fresh_load_generates_distinct_identities_per_nonce() {
        let (uc, _, _) = usecases(Vec::new());
        let first = uc
            .handle_submission(Submission::default(), None, 1)
            .await
            .unwrap();
        let second = uc
            .handle_submission(Submission::default(), None, 2)
            .await
            .unwrap();
        assert!(first.owner.starts_with("user@"));
        assert_ne!(first.owner, second.owner);
    }

    #[tokio::test]
    async fn invalid_submission_touches_nothing() {
        let (uc, scheduler, staging) = usecases(Vec::new());
        let err = uc
            .handle_submission(
                Submission {
                    usr_name: Some("alice".to_string()),
                    ..Submission::default()
                },
                None,
                7,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AppErrorKind::InvalidArgument);
        assert!(scheduler.ops().is_empty());
        assert!(staging.staged().is_empty());
    }

    #[tokio::test]
    async fn listing_rows_carry_actions() {
        let listing = vec![JobRecord {
            submitted_at: "2024-01-01".to_string(),
            owner: "alice".to_string(),
            name: "run1".to_string(),
            status: JobStatus::Finished,
        }];
        let (uc, _, _) = usecases(listing);
        let page = uc
            .handle_submission(
                Submission {
                    usr_name: Some("alice".to_string()),
                    search_only: Some("1".to_string()),
                    ..Submission::default()
                },
                None,
                7,
            )
            .await
            .unwrap();
        assert_eq!(page.rows.len(), 1);
        match &page.rows[0].action {
            crate::app::types::RowAction::Download { href } => {
                assert!(href.starts_with("upload/output_"));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
