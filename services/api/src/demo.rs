use crate::infra::{seeded_stores, InMemoryApplicationRepository, InMemoryDirectory};
use clap::Args;
use placement_core::error::AppError;
use placement_core::placement::{
    ApplicantFilter, CandidateId, DriveEligibility, DriveId, EligibilityCheck, EligibilityResult,
    PlacementService,
};
use std::sync::Arc;

type DemoService = PlacementService<InMemoryApplicationRepository, InMemoryDirectory>;

#[derive(Args, Debug)]
pub(crate) struct EligibilityArgs {
    /// Candidate id from the seeded profiles (s1, s2, s3)
    #[arg(long)]
    pub(crate) candidate: String,
    /// Restrict the report to one drive (defaults to every published drive)
    #[arg(long)]
    pub(crate) drive: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Drive to run the recruitment walkthrough against
    #[arg(long, default_value = "d1")]
    pub(crate) drive: String,
    /// Skip the interview-round portion after shortlisting
    #[arg(long)]
    pub(crate) skip_rounds: bool,
}

fn demo_service() -> Result<DemoService, AppError> {
    let (repository, directory) = seeded_stores()?;
    Ok(PlacementService::new(
        Arc::new(repository),
        Arc::new(directory),
    ))
}

pub(crate) fn run_eligibility_report(args: EligibilityArgs) -> Result<(), AppError> {
    let EligibilityArgs { candidate, drive } = args;
    let service = demo_service()?;
    let candidate = CandidateId(candidate);

    let entries = match drive {
        Some(drive) => {
            let drive_id = DriveId(drive);
            let result = service.evaluate(&candidate, &drive_id)?;
            vec![(drive_id.to_string(), result)]
        }
        None => service
            .eligibility_overview(&candidate)?
            .into_iter()
            .map(|entry: DriveEligibility| {
                let heading = format!("{} {} ({})", entry.drive_id, entry.company_name, entry.role);
                (heading, entry.result)
            })
            .collect(),
    };

    println!("Eligibility report for candidate {candidate}");
    for (heading, result) in &entries {
        render_eligibility(heading, result);
    }
    Ok(())
}

fn render_eligibility(heading: &str, result: &EligibilityResult) {
    let verdict = if result.is_eligible {
        "ELIGIBLE"
    } else {
        "NOT ELIGIBLE"
    };
    println!(
        "\n{heading}: {verdict} (score {}%, {}/{} checks)",
        result.score,
        result.passed_checks(),
        result.details.len()
    );
    for detail in &result.details {
        let mark = if detail.passed { "pass" } else { "fail" };
        println!("  - [{mark}] {}: {}", detail.label, detail.message);
    }
    if let Some(skills) = result.detail(EligibilityCheck::Skills) {
        if !skills.matched_skills.is_empty() {
            println!("  matched skills: {}", skills.matched_skills.join(", "));
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { drive, skip_rounds } = args;
    let service = demo_service()?;
    let drive_id = DriveId(drive);

    println!("Campus placement demo for drive {drive_id}");
    for candidate in ["s1", "s2", "s3"] {
        match service.apply(&CandidateId(candidate.to_string()), &drive_id) {
            Ok(application) => {
                println!("- {candidate} applied -> {}", application.id);
            }
            Err(err) => println!("- {candidate} could not apply: {err}"),
        }
    }

    println!("\nApplicants for {drive_id}");
    for row in service.drive_applicants(&drive_id, ApplicantFilter::All)? {
        let name = row.candidate_name.as_deref().unwrap_or("unknown");
        println!(
            "  - {} {name} [{}]: {}",
            row.application.application_id, row.application.status_label, row.reason
        );
    }

    let report = service.auto_shortlist(&drive_id)?;
    if report.is_noop() {
        println!("\nNo new eligible candidates to shortlist.");
    } else {
        println!("\nAuto-shortlisted {} candidate(s):", report.shortlisted.len());
        for id in &report.shortlisted {
            println!("  - {id}");
        }
    }
    for id in &report.ineligible {
        println!("  - {id} left in Applied (ineligible)");
    }

    if !skip_rounds {
        if let Some(first) = report.shortlisted.first() {
            println!("\nInterview rounds for {first}");
            loop {
                match service.advance(first) {
                    Ok(application) => println!("  -> {}", application.status.label()),
                    Err(err) => {
                        println!("  stopped: {err}");
                        break;
                    }
                }
            }
        }
        if let Some(second) = report.shortlisted.get(1) {
            let rejected = service.reject(second)?;
            println!("\n{second} -> {}", rejected.status.label());
        }
    }

    let summary = service.drive_summary(&drive_id)?;
    println!(
        "\nPipeline summary: {} total | {} in progress | {} selected | {} rejected",
        summary.total, summary.in_progress, summary.selected, summary.rejected
    );
    for stage in summary.stages.iter().filter(|stage| stage.count > 0) {
        println!("  - {}: {}", stage.label, stage.count);
    }

    Ok(())
}
