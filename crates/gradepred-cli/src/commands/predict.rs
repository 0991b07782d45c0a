//! The `gradepred predict` command.

use anyhow::{Context, Result};

use gradepred_core::validation::validate_prediction_input;
use gradepred_core::{CourseScore, Numeric, PredictionInput, PredictionOutcome, PredictionService};
use gradepred_remote::prediction_service;

use super::{ensure_valid, GlobalOpts, Workspace};

pub struct PredictArgs {
    pub current_gpa: String,
    pub previous_gpa: Option<String>,
    pub study_hours: Option<String>,
    pub attendance: Option<String>,
    /// `name:percentage:credits` triples.
    pub courses: Vec<String>,
    pub offline: bool,
    pub import_courses: bool,
}

/// Keep numbers as numbers; anything else is passed through as text and
/// parsed leniently downstream.
fn numeric(raw: &str) -> Numeric {
    match raw.trim().parse::<f64>() {
        Ok(n) => Numeric::Number(n),
        Err(_) => Numeric::Text(raw.to_string()),
    }
}

/// Parse `name:percentage:credits`. The name may itself contain colons.
fn parse_course(raw: &str) -> Result<CourseScore> {
    let mut parts = raw.rsplitn(3, ':');
    let (Some(credits), Some(grade), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        anyhow::bail!("invalid course {raw:?}: expected name:percentage:credits");
    };
    anyhow::ensure!(!name.trim().is_empty(), "invalid course {raw:?}: name is empty");

    Ok(CourseScore {
        name: Some(name.trim().to_string()),
        grade: Some(numeric(grade)),
        credits: Some(numeric(credits)),
    })
}

fn build_input(args: &PredictArgs) -> Result<PredictionInput> {
    let courses = args
        .courses
        .iter()
        .map(|c| parse_course(c))
        .collect::<Result<Vec<_>>>()?;

    Ok(PredictionInput {
        current_gpa: Some(numeric(&args.current_gpa)),
        previous_gpa: args.previous_gpa.as_deref().map(numeric),
        study_hours: args.study_hours.as_deref().map(numeric),
        attendance: args.attendance.as_deref().map(numeric),
        courses: (!courses.is_empty()).then_some(courses),
    })
}

pub async fn execute(opts: &GlobalOpts, args: PredictArgs) -> Result<()> {
    let input = build_input(&args)?;
    ensure_valid(&validate_prediction_input(&input))?;

    let workspace = Workspace::open(opts)?;
    let mut aggregator = workspace.load()?;

    let service = if args.offline {
        PredictionService::offline()
    } else {
        prediction_service(&workspace.config).context("failed to set up prediction service")?
    };

    if args.import_courses {
        if let Some(courses) = &input.courses {
            let before = aggregator.student().grades.len();
            let after = aggregator.import_course_scores(courses).grades.len();
            println!("Imported {} course(s) as grades", after - before);
        }
    }

    let outcome = aggregator.request_prediction(&service, input).await;
    print_outcome(&outcome);

    workspace.save(&aggregator)
}

fn print_outcome(outcome: &PredictionOutcome) {
    let record = outcome.record();
    println!("Predicted GPA: {:.2}", record.predicted_gpa);
    println!("Confidence: {}%", record.confidence);
    match outcome.fallback_reason() {
        Some(reason) => println!("Source: {} ({reason})", outcome.source()),
        None => println!("Source: {}", outcome.source()),
    }
    if !record.insights.is_empty() {
        println!("Insights:");
        for insight in &record.insights {
            println!("  - {insight}");
        }
    }
    println!("Prediction id: {}", record.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(current_gpa: &str, courses: &[&str]) -> PredictArgs {
        PredictArgs {
            current_gpa: current_gpa.into(),
            previous_gpa: None,
            study_hours: Some("25".into()),
            attendance: None,
            courses: courses.iter().map(|c| c.to_string()).collect(),
            offline: true,
            import_courses: false,
        }
    }

    #[test]
    fn parses_course_triples() {
        let course = parse_course("Data Structures: Trees:84.5:3").unwrap();
        assert_eq!(course.name.as_deref(), Some("Data Structures: Trees"));
        assert_eq!(course.grade, Some(Numeric::Number(84.5)));
        assert_eq!(course.credits, Some(Numeric::Number(3.0)));
    }

    #[test]
    fn rejects_incomplete_course() {
        assert!(parse_course("Calculus:90").is_err());
        assert!(parse_course(":90:3").is_err());
    }

    #[test]
    fn non_numeric_values_stay_text() {
        let input = build_input(&args("abc", &[])).unwrap();
        assert_eq!(input.current_gpa, Some(Numeric::Text("abc".into())));
        assert_eq!(input.study_hours, Some(Numeric::Number(25.0)));
        assert!(input.courses.is_none());
    }

    #[test]
    fn courses_are_collected() {
        let input = build_input(&args("3.1", &["Algebra:91:4", "Poetry:55:2"])).unwrap();
        assert_eq!(input.courses.unwrap().len(), 2);
    }
}
