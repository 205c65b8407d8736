use std::sync::Arc;

use quiz_core::model::{AnswerRecord, QuestionBank, QuizId};
use quiz_core::selector::Selection;
use quiz_core::time::fixed_now;
use quiz_services::{Clock, QuizLoopService, QuizRun, SessionError, SessionPhase};
use quiz_storage::repository::{InMemoryRepository, ResultRepository};

const BANK: &str = r#"{
    "Cats": [{ "prompt": "Q1", "correctAnswer": "A1" }],
    "Dogs": [{ "prompt": "Q2", "correctAnswer": "A2" }],
    "Mixed": [
        { "question": "Q3", "answer": "B", "options": ["A", "B", "C"] },
        { "question": "Q4", "answer": "A4" },
        { "question": "Q5", "answer": "A5" }
    ]
}"#;

fn setup() -> (InMemoryRepository, QuizLoopService, QuizRun) {
    let repo = InMemoryRepository::new();
    let service = QuizLoopService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()));
    let bank = QuestionBank::from_json(BANK).unwrap();
    let run = QuizRun::new(QuizId::new(42), Arc::new(bank));
    (repo, service, run)
}

#[tokio::test]
async fn all_selection_walks_bank_order() {
    let (_repo, service, mut run) = setup();
    let view = service
        .start_session(&mut run, &"all".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(view.total, 5);

    let mut prompts = Vec::new();
    while run.phase() != SessionPhase::Finished {
        let view = run.view();
        prompts.push(view.prompt.clone().unwrap());
        if view.options.is_empty() {
            service.reveal(&mut run).await.unwrap();
            service.assess(&mut run, true).await.unwrap();
        } else {
            service.select_option(&mut run, &view.options[0]).await.unwrap();
            service.confirm(&mut run).await.unwrap();
            service.advance(&mut run).await.unwrap();
        }
    }
    assert_eq!(prompts, ["Q1", "Q2", "Q3", "Q4", "Q5"]);
}

#[tokio::test]
async fn single_category_failure_is_stored() {
    let (repo, service, mut run) = setup();
    service
        .start_session(&mut run, &Selection::from_names(["Dogs"]))
        .await
        .unwrap();
    service.reveal(&mut run).await.unwrap();
    let step = service.assess(&mut run, false).await.unwrap();

    assert!(step.finished);
    assert!(step.result_persisted);
    let stored = repo.get_result(run.quiz_id()).await.unwrap().unwrap();
    let result = &stored.result;
    assert_eq!(
        (result.total(), result.correct(), result.wrong(), result.score_percent()),
        (1, 0, 1, 0)
    );
}

#[tokio::test]
async fn retry_from_stored_result_consumes_it() {
    let (repo, service, mut run) = setup();
    service
        .start_session(&mut run, &Selection::from_names(["Mixed"]))
        .await
        .unwrap();

    service.select_option(&mut run, "A").await.unwrap();
    service.confirm(&mut run).await.unwrap();
    service.advance(&mut run).await.unwrap();
    service.reveal(&mut run).await.unwrap();
    service.assess(&mut run, true).await.unwrap();
    service.reveal(&mut run).await.unwrap();
    let step = service.assess(&mut run, false).await.unwrap();
    assert_eq!(step.view.result.as_ref().unwrap().score_percent(), 33);

    let view = service.start_retry_from_stored(&mut run).await.unwrap();
    assert_eq!(view.prompt.as_deref(), Some("Q3"));
    assert_eq!((view.position, view.total, view.attempt), (1, 2, 2));
    assert!(repo.get_result(run.quiz_id()).await.unwrap().is_none());

    let session = run.session().unwrap();
    assert!(session.answer_log().is_empty());
    assert_eq!(session.questions()[1].prompt(), "Q5");

    service.select_option(&mut run, "B").await.unwrap();
    service.confirm(&mut run).await.unwrap();
    assert_eq!(
        run.session().unwrap().answer_log().get(0),
        Some(&AnswerRecord::OptionChosen {
            selected_option: "B".into(),
            is_correct: true
        })
    );
}

#[tokio::test]
async fn perfect_run_leaves_nothing_to_retry() {
    let (repo, service, mut run) = setup();
    service
        .start_session(&mut run, &Selection::from_names(["Cats"]))
        .await
        .unwrap();
    service.reveal(&mut run).await.unwrap();
    service.assess(&mut run, true).await.unwrap();

    assert!(matches!(
        service.start_retry_from_stored(&mut run).await,
        Err(SessionError::NothingToRetry)
    ));
    assert!(repo.get_result(run.quiz_id()).await.unwrap().is_some());
    assert_eq!(run.phase(), SessionPhase::Finished);
}

#[tokio::test]
async fn empty_or_unknown_selection_is_rejected() {
    let (_repo, service, mut run) = setup();
    for selection in [Selection::from_names(Vec::<String>::new()), Selection::from_names(["Fish"])] {
        assert!(matches!(
            service.start_session(&mut run, &selection).await,
            Err(SessionError::EmptySelection)
        ));
    }
    assert_eq!(run.phase(), SessionPhase::SelectingCategory);
}
