use crate::infra::{
    InMemoryApplicantRepository, InMemoryJobDirectory, InMemoryScheduleRepository,
    KeywordCvExtractor,
};
use clap::Args;
use hireflow::error::AppError;
use hireflow::workflows::recruitment::{
    AnswerSet, AnswerValue, ApplicationSubmission, CvDocument, HeuristicScorer, JobId,
    RecruitmentService, SchedulingReport, SubmissionOutcome, VerdictPolicy,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Job posting to run the demo against.
    #[arg(long, default_value = "ds-jakarta")]
    pub(crate) job: String,
    /// Derive verdicts with the weighted-point policy instead of the
    /// bucket-based default.
    #[arg(long)]
    pub(crate) weighted: bool,
}

struct DemoApplicant {
    name: &'static str,
    location: &'static str,
    cv: Option<&'static str>,
}

const DEMO_APPLICANTS: &[DemoApplicant] = &[
    DemoApplicant {
        name: "Sari Wijaya",
        location: "Jakarta",
        cv: Some(
            "Data scientist with 10 years of experience in Python, SQL, Spark, Airflow, \
             Docker and Kubernetes. PhD in statistics. Shipped a churn project, a pricing \
             project, a fraud project, a ranking project, and a forecasting project.",
        ),
    },
    DemoApplicant {
        name: "Budi Santoso",
        location: "Bandung",
        cv: Some("Junior analyst, 1 year of experience with Excel and one reporting project."),
    },
    DemoApplicant {
        name: "Dewi Lestari",
        location: "Surabaya",
        cv: None,
    },
];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = if args.weighted {
        VerdictPolicy::WeightedPoints
    } else {
        VerdictPolicy::BucketBased
    };

    let service = RecruitmentService::new(
        Arc::new(InMemoryJobDirectory::seeded()),
        Arc::new(InMemoryApplicantRepository::default()),
        Arc::new(InMemoryScheduleRepository::default()),
        Arc::new(HeuristicScorer),
        Arc::new(KeywordCvExtractor),
        policy,
    );

    let job_id = JobId(args.job.clone());
    println!("Recruitment screening demo — job '{}'", args.job);

    for applicant in DEMO_APPLICANTS {
        let outcome = service.submit(build_submission(&job_id, applicant))?;
        render_outcome(applicant.name, &outcome);
    }

    let report = service.schedule_job(&job_id)?;
    render_schedule(&report);

    Ok(())
}

fn build_submission(job_id: &JobId, applicant: &DemoApplicant) -> ApplicationSubmission {
    let mut answers = AnswerSet::new();
    answers.insert(
        "location".to_string(),
        AnswerValue::Text(applicant.location.to_string()),
    );

    ApplicationSubmission {
        job_id: job_id.clone(),
        name: applicant.name.to_string(),
        email: format!(
            "{}@example.com",
            applicant.name.to_lowercase().replace(' ', ".")
        ),
        answers,
        cv: applicant.cv.map(|text| CvDocument {
            file_name: "cv.pdf".to_string(),
            bytes: text.as_bytes().to_vec(),
        }),
    }
}

fn render_outcome(name: &str, outcome: &SubmissionOutcome) {
    println!("\n{name} -> {}", outcome.record.status.label());
    if let Some(score) = outcome.record.ai_score {
        println!("  ai score: {score}");
    }
    if let Some(score) = outcome.record.final_score {
        println!("  final score: {score}");
    }

    if let Some(verdict) = &outcome.record.screening {
        for entry in &verdict.log.passed {
            println!("  [passed] {}", entry.reason);
        }
        for entry in &verdict.log.failed {
            println!("  [failed] {}", entry.reason);
        }
        for entry in &verdict.log.review {
            println!("  [review] {}", entry.reason);
        }
    }

    if let Some(error) = &outcome.scheduling_error {
        println!("  scheduling skipped: {error}");
    }
}

fn render_schedule(report: &SchedulingReport) {
    println!("\nInterview schedule for '{}'", report.job_id.0);
    if report.scheduled.is_empty() {
        println!("  nothing left to book");
    }
    for slot in &report.scheduled {
        println!("  {} at {}", slot.applicant_id.0, slot.start_time);
    }
    for applicant in &report.unplaced {
        println!("  {} could not be placed inside the window", applicant.0);
    }
}
