//! The question analysis engine.
//!
//! Compiles a validated [`EngineConfig`] once and runs the single-pass
//! pipeline (preprocess, per-question classification, aggregation,
//! suggestions, report assembly) for each request. Several requests can be
//! analysed concurrently with bounded parallelism.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::ambiguity::AmbiguityDetector;
use crate::classifier::Classifier;
use crate::config::EngineConfig;
use crate::difficulty::DifficultyEstimator;
use crate::error::AnalysisError;
use crate::model::{AnalysisRequest, Paper, Question};
use crate::parser::check_limits;
use crate::preprocess::{preprocess, PreparedQuestion};
use crate::quality::QualityAssessor;
use crate::report::{PaperRecord, Report};
use crate::scoring::{aggregate, ScoreBreakdown};
use crate::suggestions::{generate, SuggestionInput};

/// Source recorded for requests that did not come from a file.
pub const INLINE_SOURCE: &str = "inline";

/// Output of one analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub paper: Paper,
    pub report: Report,
    pub breakdown: ScoreBreakdown,
}

impl Analysis {
    /// The paper and breakdown, in the form persisted next to the report.
    pub fn record(&self) -> PaperRecord {
        PaperRecord {
            paper: self.paper.clone(),
            breakdown: self.breakdown.clone(),
        }
    }
}

/// Progress reporting trait for batch analysis.
pub trait ProgressReporter: Send + Sync {
    fn on_paper_start(&self, index: usize, source: &str);
    fn on_paper_complete(&self, index: usize, analysis: &Analysis);
    fn on_paper_error(&self, index: usize, source: &str, error: &AnalysisError);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_paper_start(&self, _: usize, _: &str) {}
    fn on_paper_complete(&self, _: usize, _: &Analysis) {}
    fn on_paper_error(&self, _: usize, _: &str, _: &AnalysisError) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

#[derive(Debug)]
struct Rules {
    config: EngineConfig,
    classifier: Classifier,
    estimator: DifficultyEstimator,
    detector: AmbiguityDetector,
    assessor: QualityAssessor,
}

/// The analysis engine. Cheap to clone; clones share the compiled rules.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    rules: Arc<Rules>,
}

impl AnalysisEngine {
    /// Validate `config` and compile its lexicon and catalogues.
    pub fn new(config: EngineConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let classifier = Classifier::new(&config.lexicon)?;
        let estimator = DifficultyEstimator::new(&config.difficulty, &config.lexicon)?;
        let detector = AmbiguityDetector::new(&config.ambiguity, &config.lexicon)?;
        let assessor = QualityAssessor::new(&config.quality);
        Ok(Self {
            rules: Arc::new(Rules {
                config,
                classifier,
                estimator,
                detector,
                assessor,
            }),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.rules.config
    }

    /// Analyse one paper. All-or-nothing: any failure yields no report.
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis, AnalysisError> {
        let rules = &*self.rules;
        let source = request.source.as_deref().unwrap_or(INLINE_SOURCE);

        check_limits(request, &rules.config.limits)?;
        let prepared = preprocess(&request.questions)?;
        let questions: Vec<Question> = prepared.iter().map(|p| self.analyze_question(p)).collect();

        let agg = aggregate(&questions, &rules.config.scoring)?;
        let suggestions = generate(
            SuggestionInput {
                blooms: &agg.blooms,
                difficulty: &agg.difficulty,
                questions: &questions,
            },
            &rules.config.suggestions,
            &rules.config.scoring.targets,
        );

        let paper = Paper {
            id: Uuid::new_v4(),
            source: source.to_string(),
            professor_name: request.professor_name.trim().to_string(),
            subject: request.subject.trim().to_string(),
            upload_date: Utc::now(),
            questions,
        };
        let report = Report::assemble(&paper, &agg, suggestions);

        tracing::info!(
            paper_id = %paper.id,
            source,
            questions = paper.total_questions(),
            score = report.overall_score.score,
            grade = %report.overall_score.grade,
            ambiguous = report.ambiguous_questions.len(),
            "analysed paper"
        );

        Ok(Analysis {
            paper,
            report,
            breakdown: agg.breakdown,
        })
    }

    /// Classify, estimate and check one prepared question.
    pub fn analyze_question(&self, prepared: &PreparedQuestion) -> Question {
        let rules = &*self.rules;
        let tokens = prepared.tokens();

        let classification = rules.classifier.classify(&tokens);
        let estimate = rules.estimator.estimate(&prepared.folded, &tokens);
        let indicators = rules.detector.detect(&prepared.folded, &tokens);
        let quality = rules
            .assessor
            .assess(&prepared.folded, tokens.len(), &indicators);

        tracing::debug!(
            number = prepared.number,
            level = %classification.level,
            difficulty = %estimate.tier,
            signal = estimate.signal,
            indicators = indicators.len(),
            quality = quality.score,
            "analysed question"
        );

        Question {
            number: prepared.number,
            text: prepared.text.clone(),
            normalized_text: prepared.normalized_text.clone(),
            level: classification.level,
            difficulty: estimate.tier,
            ambiguous: !indicators.is_empty(),
            indicators,
            word_count: tokens.len(),
            difficulty_signal: estimate.signal,
            cues: classification.cue_phrases(),
            quality_score: quality.score,
            quality_issues: quality.issues,
        }
    }

    /// Analyse several papers with at most `parallelism` running at once.
    ///
    /// Results come back in request order; one failure does not affect the
    /// other papers.
    pub async fn analyze_batch(
        &self,
        requests: Vec<AnalysisRequest>,
        parallelism: usize,
        progress: &dyn ProgressReporter,
    ) -> Vec<Result<Analysis, AnalysisError>> {
        let start = Instant::now();
        let total = requests.len();
        let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));

        let mut futures = FuturesUnordered::new();
        for (index, request) in requests.into_iter().enumerate() {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);
            futures.push(async move {
                let source = request
                    .source
                    .clone()
                    .unwrap_or_else(|| INLINE_SOURCE.to_string());
                let result = run_one(engine, request, semaphore, index, &source, progress).await;
                (index, source, result)
            });
        }

        let mut slots: Vec<Option<Result<Analysis, AnalysisError>>> =
            (0..total).map(|_| None).collect();
        let mut completed = 0usize;
        let mut failed = 0usize;

        while let Some((index, source, result)) = futures.next().await {
            match &result {
                Ok(analysis) => {
                    progress.on_paper_complete(index, analysis);
                    completed += 1;
                }
                Err(e) => {
                    tracing::error!("analysis failed for {source}: {e}");
                    progress.on_paper_error(index, &source, e);
                    failed += 1;
                }
            }
            slots[index] = Some(result);
        }

        progress.on_batch_complete(total, completed, failed, start.elapsed());

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(AnalysisError::Internal("analysis produced no result".into()))
                })
            })
            .collect()
    }
}

async fn run_one(
    engine: AnalysisEngine,
    request: AnalysisRequest,
    semaphore: Arc<Semaphore>,
    index: usize,
    source: &str,
    progress: &dyn ProgressReporter,
) -> Result<Analysis, AnalysisError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| AnalysisError::Internal("semaphore closed".into()))?;
    progress.on_paper_start(index, source);

    tokio::task::spawn_blocking(move || engine.analyze(&request))
        .await
        .map_err(|e| AnalysisError::Internal(format!("analysis task failed: {e}")))?
}
