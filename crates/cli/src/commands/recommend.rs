use presente_core::config::LoadOptions;
use presente_core::domain::questions::QuestionId;
use presente_core::domain::quiz::{QuizAnswer, QuizAnswers, RecommendationRequest};
use presente_server::bootstrap;
use serde_json::json;

use crate::commands::{block_on, CommandResult, EXIT_CONFIG, EXIT_INPUT, EXIT_RUNTIME};

/// Reads `question=value` pairs. A numeric value picks the option by number,
/// anything else by its label.
pub fn parse_answers(raw: &[String]) -> Result<QuizAnswers, String> {
    let mut answers = QuizAnswers::new();
    for pair in raw {
        let Some((question, value)) = pair.split_once('=') else {
            return Err(format!("`{pair}` is not QUESTION=VALUE"));
        };
        let question_id: QuestionId = question.parse()?;
        let value = value.trim();
        let answer = match value.parse::<u8>() {
            Ok(number) => QuizAnswer::from_choice(question_id, number),
            Err(_) => QuizAnswer::from_label(question_id, value),
        }
        .map_err(|error| error.to_string())?;
        answers.record(answer);
    }
    Ok(answers)
}

pub fn run(raw_answers: &[String]) -> CommandResult {
    run_with(LoadOptions::default(), raw_answers)
}

pub fn run_with(options: LoadOptions, raw_answers: &[String]) -> CommandResult {
    let answers = match parse_answers(raw_answers) {
        Ok(answers) => answers,
        Err(message) => return CommandResult::failure("recommend", "invalid_answer", message, EXIT_INPUT),
    };
    let request = RecommendationRequest::from_answers(&answers);

    let outcome = block_on(async {
        let app = bootstrap(options).await?;
        Ok::<_, presente_server::BootstrapError>(app.state.selector.recommend(&request).await)
    });

    match outcome {
        Ok(Ok(selection)) => {
            let names: Vec<&str> = selection.recommendations.iter().map(|item| item.name.as_str()).collect();
            CommandResult::success_with(
                "recommend",
                format!("{} gifts from {}: {}", names.len(), selection.source, names.join(", ")),
                Some(json!({
                    "profile": request.profile,
                    "source": selection.source,
                    "recommendations": selection.recommendations,
                    "attempts": selection.attempts,
                })),
            )
        }
        Ok(Err(error)) => CommandResult::failure("recommend", "bootstrap", error.to_string(), EXIT_CONFIG),
        Err(error) => CommandResult::failure(
            "recommend",
            "runtime",
            format!("failed to initialize async runtime: {error}"),
            EXIT_RUNTIME,
        ),
    }
}
