use std::collections::HashMap;

use crate::db::models::Question;
use crate::db::types::QuestionType;
use crate::schemas::attempt::AnswerSubmission;

use super::error::EngineError;

/// A submitted answer after shape validation, carrying exactly the payload
/// its question type admits.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AnswerValue {
    Choice(i32),
    Text(String),
}

/// Checks a submission against the activity's question set: every question
/// answered exactly once, no stray ids, and each payload matching its
/// question's shape. Results come back in question order.
pub(crate) fn validate_answer_set<'q>(
    questions: &'q [Question],
    submitted: &[AnswerSubmission],
) -> Result<Vec<(&'q Question, AnswerValue)>, EngineError> {
    let by_id: HashMap<&str, &Question> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();

    let mut values: HashMap<&str, AnswerValue> = HashMap::with_capacity(submitted.len());
    for answer in submitted {
        let question = by_id.get(answer.question_id.as_str()).copied().ok_or_else(|| {
            EngineError::UnknownQuestion {
                question_id: answer.question_id.clone(),
            }
        })?;
        if values.contains_key(question.id.as_str()) {
            return Err(EngineError::InvalidAnswer {
                question_id: question.id.clone(),
                message: "question answered more than once".to_string(),
            });
        }
        let value = validate_shape(question, answer)?;
        values.insert(question.id.as_str(), value);
    }

    let missing: Vec<String> = questions
        .iter()
        .filter(|q| !values.contains_key(q.id.as_str()))
        .map(|q| q.id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::MissingAnswers(missing));
    }

    let mut ordered = Vec::with_capacity(questions.len());
    for question in questions {
        if let Some(value) = values.remove(question.id.as_str()) {
            ordered.push((question, value));
        }
    }
    Ok(ordered)
}

fn validate_shape(
    question: &Question,
    answer: &AnswerSubmission,
) -> Result<AnswerValue, EngineError> {
    let invalid = |message: &str| EngineError::InvalidAnswer {
        question_id: question.id.clone(),
        message: message.to_string(),
    };

    match question.question_type {
        QuestionType::SingleChoice => {
            if answer.text_answer.is_some() {
                return Err(invalid("single choice question takes an option, not text"));
            }
            let selected = answer
                .selected_option
                .ok_or_else(|| invalid("selected_option is required"))?;
            let option_count = question.option_count() as i32;
            if selected < 1 || selected > option_count {
                return Err(invalid("selected_option is out of range"));
            }
            Ok(AnswerValue::Choice(selected))
        }
        QuestionType::Text | QuestionType::Open => {
            if answer.selected_option.is_some() {
                return Err(invalid("this question takes text, not an option"));
            }
            let text = answer
                .text_answer
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| invalid("text_answer is required"))?;
            Ok(AnswerValue::Text(text.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;

    use super::*;
    use crate::core::time::primitive_now_utc;

    fn question(id: &str, question_type: QuestionType) -> Question {
        let options = match question_type {
            QuestionType::SingleChoice => vec!["a".to_string(), "b".to_string(), "c".to_string()],
            _ => Vec::new(),
        };
        Question {
            id: id.to_string(),
            activity_id: "act-1".to_string(),
            order_index: 0,
            question_type,
            points: 1,
            options: Json(options),
            correct_option: None,
            correct_text: None,
            created_at: primitive_now_utc(),
        }
    }

    fn choice(question_id: &str, selected: i32) -> AnswerSubmission {
        AnswerSubmission {
            question_id: question_id.to_string(),
            selected_option: Some(selected),
            text_answer: None,
        }
    }

    fn text(question_id: &str, answer: &str) -> AnswerSubmission {
        AnswerSubmission {
            question_id: question_id.to_string(),
            selected_option: None,
            text_answer: Some(answer.to_string()),
        }
    }

    #[test]
    fn accepts_complete_submission_in_question_order() {
        let questions = vec![
            question("q-1", QuestionType::SingleChoice),
            question("q-2", QuestionType::Text),
        ];
        let submitted = vec![text("q-2", "  an answer "), choice("q-1", 3)];

        let validated = validate_answer_set(&questions, &submitted).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].0.id, "q-1");
        assert_eq!(validated[0].1, AnswerValue::Choice(3));
        assert_eq!(validated[1].1, AnswerValue::Text("an answer".to_string()));
    }

    #[test]
    fn rejects_missing_answers_with_the_missing_ids() {
        let questions = vec![
            question("q-1", QuestionType::SingleChoice),
            question("q-2", QuestionType::Open),
        ];
        let err = validate_answer_set(&questions, &[choice("q-1", 1)]).unwrap_err();
        match err {
            EngineError::MissingAnswers(ids) => assert_eq!(ids, vec!["q-2".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_question() {
        let questions = vec![question("q-1", QuestionType::Open)];
        let err = validate_answer_set(&questions, &[text("q-9", "hi")]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownQuestion { question_id } if question_id == "q-9"));
    }

    #[test]
    fn rejects_duplicate_answer_for_one_question() {
        let questions = vec![question("q-1", QuestionType::SingleChoice)];
        let err =
            validate_answer_set(&questions, &[choice("q-1", 1), choice("q-1", 2)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAnswer { question_id, .. } if question_id == "q-1"));
    }

    #[test]
    fn rejects_option_out_of_range() {
        let questions = vec![question("q-1", QuestionType::SingleChoice)];
        for selected in [0, 4] {
            let err = validate_answer_set(&questions, &[choice("q-1", selected)]).unwrap_err();
            assert!(matches!(err, EngineError::InvalidAnswer { .. }));
        }
    }

    #[test]
    fn rejects_mismatched_payload_shape() {
        let questions = vec![question("q-1", QuestionType::SingleChoice)];
        let err = validate_answer_set(&questions, &[text("q-1", "b")]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAnswer { .. }));

        let questions = vec![question("q-2", QuestionType::Open)];
        let err = validate_answer_set(&questions, &[choice("q-2", 1)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAnswer { .. }));
    }

    #[test]
    fn rejects_blank_text_answer() {
        let questions = vec![question("q-1", QuestionType::Text)];
        let err = validate_answer_set(&questions, &[text("q-1", "   ")]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAnswer { .. }));
    }
}
