use std::collections::HashSet;

use evaluator::{
    EvaluationRequest, EvaluationResult, SubmissionContent, SubmissionEvaluator,
    WeightedParameter,
};
use sqlx::PgPool;
use storage::{
    dto::evaluation::{EvaluateRequest, EvaluationParameterInput, EvaluationResultView},
    models::{CriterionScore, Parameter, Submission},
    repository::{hackathon::HackathonRepository, submission::SubmissionRepository},
    services::weights::{MIN_WEIGHT, TOTAL_WEIGHT, WEIGHT_TOLERANCE, is_weight_valid},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::parameters::{debounce::WeightWriteQueue, services::load_parameters};

const INVALID_WEIGHTS: &str = "Parameter weights must sum to 100%";
const NOTHING_SELECTED: &str = "No evaluation parameters selected";

/// A successful result ready to be stored on its submission.
#[derive(Debug, Clone, PartialEq)]
struct ScoredSubmission {
    submission_id: Uuid,
    scores: Vec<CriterionScore>,
    total_score: f64,
}

/// Picks the parameters to score against: the request's override, or the
/// hackathon's selected parameters. Either way the weights must total 100.
async fn resolve_parameters(
    pool: &PgPool,
    queue: &WeightWriteQueue,
    hackathon_id: Uuid,
    overrides: Option<&[EvaluationParameterInput]>,
) -> WebResult<Vec<WeightedParameter>> {
    if let Some(inputs) = overrides {
        return weighted_from_inputs(inputs);
    }

    let params = load_parameters(pool, queue, hackathon_id).await?;
    weighted_from_parameters(params)
}

/// Selected stored parameters as scoring criteria, refused unless
/// [`is_weight_valid`] holds for the whole set.
fn weighted_from_parameters(params: Vec<Parameter>) -> WebResult<Vec<WeightedParameter>> {
    if !params.iter().any(|p| p.selected) {
        return Err(WebError::BadRequest(NOTHING_SELECTED.to_string()));
    }
    if !is_weight_valid(&params) {
        return Err(WebError::BadRequest(INVALID_WEIGHTS.to_string()));
    }

    Ok(params
        .into_iter()
        .filter(|p| p.selected)
        .map(|p| WeightedParameter::new(p.name, p.description, p.weight))
        .collect())
}

fn weighted_from_inputs(inputs: &[EvaluationParameterInput]) -> WebResult<Vec<WeightedParameter>> {
    if inputs.is_empty() {
        return Err(WebError::BadRequest(NOTHING_SELECTED.to_string()));
    }

    let out_of_range = inputs
        .iter()
        .any(|p| !(MIN_WEIGHT..=TOTAL_WEIGHT).contains(&p.weight));
    let total: f64 = inputs.iter().map(|p| p.weight).sum();
    if out_of_range || (total - TOTAL_WEIGHT).abs() >= WEIGHT_TOLERANCE {
        return Err(WebError::BadRequest(INVALID_WEIGHTS.to_string()));
    }

    Ok(inputs
        .iter()
        .map(|p| WeightedParameter::new(p.name.clone(), p.description.clone(), p.weight))
        .collect())
}

/// Ids of the requested submissions, failing on the first one that is
/// unknown or belongs to another hackathon.
fn ensure_requested(
    hackathon_id: Uuid,
    requested: &[Uuid],
    submissions: &[Submission],
) -> WebResult<HashSet<Uuid>> {
    let known: HashSet<Uuid> = submissions
        .iter()
        .filter(|s| s.hackathon_id == hackathon_id)
        .map(|s| s.submission_id)
        .collect();

    match requested.iter().find(|id| !known.contains(id)) {
        Some(missing) => Err(WebError::BadRequest(format!(
            "Submission {} does not belong to this hackathon",
            missing
        ))),
        None => Ok(known),
    }
}

fn content_of(submission: &Submission) -> SubmissionContent {
    SubmissionContent {
        submission_id: submission.submission_id,
        description: submission.description.clone(),
        tags: submission.tags.clone(),
        files: submission
            .files
            .iter()
            .map(|f| (f.format.as_str().to_string(), f.file_url.clone()))
            .collect(),
    }
}

/// Runs the evaluator and splits its results into the response views and the
/// successful scores to store. Failed results are reported but never stored.
async fn run_evaluation(
    evaluator: &dyn SubmissionEvaluator,
    request: &EvaluationRequest,
    known: &HashSet<Uuid>,
) -> WebResult<(Vec<EvaluationResultView>, Vec<ScoredSubmission>)> {
    let results = evaluator.evaluate(request).await?;

    let mut views = Vec::with_capacity(results.len());
    let mut scored = Vec::with_capacity(results.len());
    for result in results {
        if !known.contains(&result.submission_id) {
            tracing::warn!(
                submission_id = %result.submission_id,
                "Ignoring evaluation result for a submission that was not requested"
            );
            continue;
        }

        let EvaluationResult {
            submission_id,
            scores,
            total_score,
            error,
        } = result;

        if let Some(error) = error {
            views.push(EvaluationResultView {
                submission_id,
                total_score: None,
                error: Some(error),
            });
            continue;
        }

        views.push(EvaluationResultView {
            submission_id,
            total_score: Some(total_score),
            error: None,
        });
        scored.push(ScoredSubmission {
            submission_id,
            scores: scores
                .into_iter()
                .map(|s| CriterionScore {
                    parameter: s.parameter,
                    score: s.score,
                    weight: s.weight,
                })
                .collect(),
            total_score,
        });
    }

    Ok((views, scored))
}

/// Scores the requested submissions and stores every successful result.
pub async fn evaluate(
    pool: &PgPool,
    queue: &WeightWriteQueue,
    evaluator: &dyn SubmissionEvaluator,
    hackathon_id: Uuid,
    request: &EvaluateRequest,
) -> WebResult<Vec<EvaluationResultView>> {
    let hackathon = HackathonRepository::new(pool).find_by_id(hackathon_id).await?;
    let parameters =
        resolve_parameters(pool, queue, hackathon_id, request.parameters.as_deref()).await?;

    let repo = SubmissionRepository::new(pool);
    let submissions = repo.find_many(hackathon_id, &request.submission_ids).await?;
    let known = ensure_requested(hackathon_id, &request.submission_ids, &submissions)?;

    let eval_request =
        EvaluationRequest::new(hackathon_id, request.submission_ids.clone(), parameters)
            .with_title(hackathon.title)
            .with_submissions(submissions.iter().map(content_of).collect());

    let (views, scored) = run_evaluation(evaluator, &eval_request, &known).await?;
    for entry in &scored {
        repo.record_evaluation(entry.submission_id, &entry.scores, entry.total_score)
            .await?;
    }

    tracing::info!(
        %hackathon_id,
        requested = request.submission_ids.len(),
        returned = views.len(),
        stored = scored.len(),
        "Evaluation finished"
    );

    Ok(views)
}
