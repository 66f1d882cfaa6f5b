use crate::capture::{Capture, CaptureStyle};
use crate::error::Error;
use crate::logger;
use crate::models::{Grade, IMAGE_FLASHCARD_MODEL, ItemData, ItemId, QueueState};
use crate::present::Presenter;
use crate::prompt::Prompt;
use crate::scheduler::Scheduler;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStage {
    CapturingQuestion,
    CapturingAnswer,
    Submitting,
}

#[derive(Debug)]
pub enum AddOutcome {
    /// The item was handed to the scheduler; `id` is what it assigned.
    Submitted {
        data: ItemData,
        id: Result<ItemId, Error>,
    },
    Aborted { stage: AddStage },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    Querying,
    SelectingItem,
    PresentingQuestion,
    PresentingAnswerWithQuestion,
    Grading,
    Submitting,
}

#[derive(Debug)]
pub enum ReviewOutcome {
    NothingDue,
    Graded {
        id: ItemId,
        grade: Grade,
        response: String,
    },
    /// The user dismissed the grade prompt; the item stays queued.
    Abandoned { id: ItemId },
    /// A positive count was followed by an empty fetch.
    Vanished { state: QueueState },
    Failed { stage: ReviewStage, error: Error },
}

pub const GRADE_HEADER: &str = "How well did you recall it?";

/// Due and new counts for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueCounts {
    pub due: u64,
    pub new: u64,
}

impl QueueCounts {
    pub fn is_empty(&self) -> bool {
        self.due == 0 && self.new == 0
    }

    /// Due items always go first.
    pub fn next_state(&self) -> Option<QueueState> {
        if self.due > 0 {
            Some(QueueState::Due)
        } else if self.new > 0 {
            Some(QueueState::New)
        } else {
            None
        }
    }

    fn for_state(&self, state: QueueState) -> u64 {
        match state {
            QueueState::Due => self.due,
            QueueState::New => self.new,
        }
    }
}

/// Drives the add and review flows against the scheduler and the three
/// user-facing providers. Each flow runs start to finish in one call.
pub struct Session<'a> {
    scheduler: &'a dyn Scheduler,
    capture: &'a dyn Capture,
    presenter: &'a dyn Presenter,
    prompt: &'a dyn Prompt,
    model: String,
}

impl<'a> Session<'a> {
    pub fn new(
        scheduler: &'a dyn Scheduler,
        capture: &'a dyn Capture,
        presenter: &'a dyn Presenter,
        prompt: &'a dyn Prompt,
    ) -> Self {
        Self {
            scheduler,
            capture,
            presenter,
            prompt,
            model: IMAGE_FLASHCARD_MODEL.to_string(),
        }
    }

    pub async fn add(&self) -> AddOutcome {
        let mut questions = Vec::new();
        let mut answers = Vec::new();

        self.prompt
            .info("Question(s): (press escape to cancel)")
            .await;
        match self.capture.capture(CaptureStyle::Question).await {
            Ok(path) => {
                self.prompt
                    .info(&format!("screenshot: {}", path.display()))
                    .await;
                questions.push(path);
            }
            Err(e) => {
                self.report_capture_error(&e).await;
                return AddOutcome::Aborted {
                    stage: AddStage::CapturingQuestion,
                };
            }
        }

        self.prompt.info("Answer(s): (press escape to cancel)").await;
        match self.capture.capture(CaptureStyle::Answer).await {
            Ok(path) => {
                self.prompt
                    .info(&format!("screenshot: {}", path.display()))
                    .await;
                answers.push(path);
            }
            Err(e) => {
                self.report_capture_error(&e).await;
                self.discard(&questions).await;
                return AddOutcome::Aborted {
                    stage: AddStage::CapturingAnswer,
                };
            }
        }

        let data = ItemData::new(questions, answers);
        if !data.is_complete() {
            self.prompt
                .warn("a flashcard needs both a question and an answer")
                .await;
            self.discard(&data.questions_then_answers()).await;
            return AddOutcome::Aborted {
                stage: AddStage::Submitting,
            };
        }

        // Assets stay on disk even if the scheduler rejects them.
        let id = self.scheduler.add_item(&self.model, &data).await;
        match &id {
            Ok(id) => self.prompt.info(&format!("added item: {}", id)).await,
            Err(e) => {
                self.prompt
                    .error(&format!("could not add item: {}", e))
                    .await
            }
        }
        AddOutcome::Submitted { data, id }
    }

    pub async fn review(&self) -> ReviewOutcome {
        let counts = match self.counts().await {
            Ok(counts) => counts,
            Err(error) => {
                self.prompt
                    .warn(&format!("could not query the scheduler: {}", error))
                    .await;
                return ReviewOutcome::Failed {
                    stage: ReviewStage::Querying,
                    error,
                };
            }
        };

        let Some(state) = counts.next_state() else {
            return ReviewOutcome::NothingDue;
        };

        let item = match self.scheduler.next_item(state, &self.model).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                self.prompt
                    .warn(&format!(
                        "no {} item returned although {} were counted",
                        state,
                        counts.for_state(state)
                    ))
                    .await;
                return ReviewOutcome::Vanished { state };
            }
            Err(error) => {
                self.prompt
                    .warn(&format!("could not fetch the next {} item: {}", state, error))
                    .await;
                return ReviewOutcome::Failed {
                    stage: ReviewStage::SelectingItem,
                    error,
                };
            }
        };

        self.prompt.info(&format!("item id: {}", item.id)).await;

        self.prompt.info("showing questions").await;
        self.present(ReviewStage::PresentingQuestion, &item.data.questions)
            .await;

        self.prompt.info("showing question and answer").await;
        self.present(
            ReviewStage::PresentingAnswerWithQuestion,
            &item.data.questions_then_answers(),
        )
        .await;

        let choice = match self
            .prompt
            .choose(GRADE_HEADER, &Grade::labels(), Some(Grade::Good.label()))
            .await
        {
            Ok(Some(choice)) => choice,
            Ok(None) => {
                self.prompt
                    .info(&format!("review of item {} abandoned", item.id))
                    .await;
                return ReviewOutcome::Abandoned { id: item.id };
            }
            Err(error) => {
                self.prompt
                    .error(&format!("could not ask for a grade: {}", error))
                    .await;
                return ReviewOutcome::Failed {
                    stage: ReviewStage::Grading,
                    error,
                };
            }
        };

        let grade = match Grade::from_label(&choice) {
            Ok(grade) => grade,
            Err(error) => {
                self.prompt.error(&error.to_string()).await;
                return ReviewOutcome::Failed {
                    stage: ReviewStage::Grading,
                    error,
                };
            }
        };

        match self.scheduler.submit_grade(&item.id, grade).await {
            Ok(response) => {
                logger::debug(&format!("scored {} as {}: {}", item.id, grade, response));
                ReviewOutcome::Graded {
                    id: item.id,
                    grade,
                    response,
                }
            }
            Err(error) => {
                self.prompt
                    .error(&format!("could not score item {}: {}", item.id, error))
                    .await;
                ReviewOutcome::Failed {
                    stage: ReviewStage::Submitting,
                    error,
                }
            }
        }
    }

    /// Query both queues and tell the user what is waiting.
    pub async fn counts(&self) -> Result<QueueCounts, Error> {
        let due = self.scheduler.count(QueueState::Due, &self.model).await?;
        let new = self.scheduler.count(QueueState::New, &self.model).await?;
        self.prompt
            .info(&format!(
                "You have {} image flashcards that are due and {} that are new",
                due, new
            ))
            .await;
        Ok(QueueCounts { due, new })
    }

    /// Returns how many assets failed to display.
    async fn present(&self, stage: ReviewStage, assets: &[PathBuf]) -> usize {
        logger::debug(&format!("{:?}: {} assets", stage, assets.len()));
        let results = self.presenter.show(assets).await;
        let mut failures = 0;
        for result in results.iter().filter(|r| !r.is_shown()) {
            failures += 1;
            self.prompt
                .error(&format!(
                    "error when opening image {}, {}",
                    result.asset.display(),
                    result.status
                ))
                .await;
        }
        failures
    }

    async fn report_capture_error(&self, error: &Error) {
        match error {
            Error::CaptureCancelled => self.prompt.info("capture cancelled").await,
            other => self.prompt.error(&other.to_string()).await,
        }
    }

    async fn discard(&self, assets: &[PathBuf]) {
        for asset in assets {
            if !asset.exists() {
                continue;
            }
            match std::fs::remove_file(asset) {
                Ok(()) => logger::debug(&format!("removed {}", asset.display())),
                Err(e) => {
                    self.prompt
                        .warn(&format!("could not remove {}: {}", asset.display(), e))
                        .await
                }
            }
        }
    }
}
