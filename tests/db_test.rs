mod common;

use common::{create_test_db, question, survey_def};
use surveyor::db::{Db, Question, SetValueError};
use surveyor::models::{PageDef, QuestionKind, SurveyDef};

fn two_page_def(slug: &str) -> SurveyDef {
    SurveyDef {
        name: "Two pages".to_string(),
        slug: slug.to_string(),
        logo: None,
        intro: "intro".to_string(),
        outro: "outro".to_string(),
        pages: vec![
            PageDef {
                intro: "first".to_string(),
                questions: vec![
                    question(QuestionKind::Boolean, "Did you enjoy your stay?"),
                    question(QuestionKind::Text, "Any comments?"),
                ],
            },
            PageDef {
                intro: "second".to_string(),
                questions: vec![question(QuestionKind::Star, "Rate us")],
            },
        ],
    }
}

async fn only_question(db: &Db, survey_id: i64) -> Question {
    let questions = db.questions_for_survey(survey_id).await.unwrap();
    assert_eq!(questions.len(), 1);
    questions.into_iter().next().unwrap()
}

#[tokio::test]
async fn test_load_survey_assigns_dense_ranks() {
    let db = create_test_db().await;
    let survey_id = db.load_survey(two_page_def("ranks")).await.unwrap();

    let survey = db.survey_by_slug("ranks").await.unwrap().unwrap();
    assert_eq!(survey.id, survey_id);
    assert_eq!(survey.token.len(), 18);

    let page1 = db.page_by_rank(survey_id, 1).await.unwrap().unwrap();
    let page2 = db.page_by_rank(survey_id, 2).await.unwrap().unwrap();
    assert_eq!(page1.intro, "first");
    assert_eq!(page2.intro, "second");
    assert!(db.page_by_rank(survey_id, 3).await.unwrap().is_none());

    let last = db.last_page(survey_id).await.unwrap().unwrap();
    assert_eq!(last.id, page2.id);

    // Presentation order: page rank first, then question rank.
    let questions = db.questions_for_survey(survey_id).await.unwrap();
    let types: Vec<&str> = questions.iter().map(|q| q.question_type.as_str()).collect();
    assert_eq!(types, vec!["B", "T", "S"]);
}

#[tokio::test]
async fn test_survey_token_gates_result_lookup() {
    let db = create_test_db().await;
    let survey_id = db.load_survey(two_page_def("gate")).await.unwrap();
    let survey = db.survey_by_id(survey_id).await.unwrap().unwrap();

    let found = db
        .survey_by_id_and_token(survey_id, &survey.token)
        .await
        .unwrap();
    assert!(found.is_some());

    let miss = db.survey_by_id_and_token(survey_id, "wrong").await.unwrap();
    assert!(miss.is_none());
}

// --- Value codec against real storage ---

#[tokio::test]
async fn test_rejected_value_leaves_previous_answer_intact() {
    let db = create_test_db().await;
    let mut num = question(QuestionKind::Num, "How many nights?");
    num.num_min = Some(1);
    num.num_max = Some(10);
    let survey_id = db.load_survey(survey_def("nights", vec![num])).await.unwrap();
    let q = only_question(&db, survey_id).await;
    let group = db.create_answer_group(survey_id).await.unwrap();

    db.set_answer_value(group.id, &q, "8").await.unwrap();

    let result = db.set_answer_value(group.id, &q, "11").await;
    assert!(matches!(result, Err(SetValueError::Value(_))));

    let answer = db.answer(group.id, q.id).await.unwrap().unwrap();
    assert_eq!(answer.num_answer, Some(8));
    assert_eq!(db.answers_count(q.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_set_answer_value_upserts_one_row() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("upsert", vec![question(QuestionKind::Num, "Count?")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;
    let group = db.create_answer_group(survey_id).await.unwrap();

    assert!(db.answer(group.id, q.id).await.unwrap().is_none());

    db.set_answer_value(group.id, &q, "3").await.unwrap();
    db.set_answer_value(group.id, &q, "4").await.unwrap();

    let answer = db.answer(group.id, q.id).await.unwrap().unwrap();
    assert_eq!(answer.num_answer, Some(4));
    assert!(answer.has_value(QuestionKind::Num));
    assert_eq!(db.answers_count(q.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_star_range_is_enforced_by_storage() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("stars", vec![question(QuestionKind::Star, "Rate us")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;
    let group = db.create_answer_group(survey_id).await.unwrap();

    db.set_answer_value(group.id, &q, "5").await.unwrap();

    // The codec passes 9 through; the CHECK constraint rejects it.
    let result = db.set_answer_value(group.id, &q, "9").await;
    assert!(matches!(result, Err(SetValueError::Db(_))));

    let answer = db.answer(group.id, q.id).await.unwrap().unwrap();
    assert_eq!(answer.star_answer, Some(5));
}

#[tokio::test]
async fn test_latest_answer_update_tracks_writes() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("latest", vec![question(QuestionKind::Text, "Comments?")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;

    assert_eq!(db.latest_answer_update(q.id).await.unwrap(), None);

    let group = db.create_answer_group(survey_id).await.unwrap();
    db.set_answer_value(group.id, &q, "hello").await.unwrap();

    let latest = db.latest_answer_update(q.id).await.unwrap().unwrap();
    assert!(latest > 0);
}

// --- Session lifecycle ---

#[tokio::test]
async fn test_session_starts_at_first_page() {
    let db = create_test_db().await;
    let survey_id = db.load_survey(two_page_def("start")).await.unwrap();
    let page1 = db.page_by_rank(survey_id, 1).await.unwrap().unwrap();

    let group = db.create_answer_group(survey_id).await.unwrap();
    assert_eq!(group.page_id, Some(page1.id));
    assert!(!group.is_complete());
    assert_eq!(group.token.len(), 18);

    let found = db.answer_group(survey_id, &group.token).await.unwrap();
    assert!(found.is_some());
    assert!(db.answer_group(survey_id, "stale-token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_pointer_advances_and_completes() {
    let db = create_test_db().await;
    let survey_id = db.load_survey(two_page_def("advance")).await.unwrap();
    let page2 = db.page_by_rank(survey_id, 2).await.unwrap().unwrap();

    let group = db.create_answer_group(survey_id).await.unwrap();

    db.set_current_page(group.id, Some(page2.id)).await.unwrap();
    let group = db.answer_group(survey_id, &group.token).await.unwrap().unwrap();
    assert_eq!(group.page_id, Some(page2.id));

    db.set_current_page(group.id, None).await.unwrap();
    let group = db.answer_group(survey_id, &group.token).await.unwrap().unwrap();
    assert!(group.is_complete());
}

#[tokio::test]
async fn test_answer_groups_count_includes_silent_sessions() {
    let db = create_test_db().await;
    let survey_id = db.load_survey(two_page_def("count")).await.unwrap();

    assert_eq!(db.answer_groups_count(survey_id).await.unwrap(), 0);
    db.create_answer_group(survey_id).await.unwrap();
    db.create_answer_group(survey_id).await.unwrap();
    assert_eq!(db.answer_groups_count(survey_id).await.unwrap(), 2);
}

// --- Aggregation ---

#[tokio::test]
async fn test_aggregate_without_answers_is_none() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("empty", vec![question(QuestionKind::Boolean, "Happy?")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;
    db.create_answer_group(survey_id).await.unwrap();

    assert!(db.aggregate(survey_id, &q).await.unwrap().is_none());
}

#[tokio::test]
async fn test_aggregate_text_is_never_charted() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("text", vec![question(QuestionKind::Text, "Comments?")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;
    let group = db.create_answer_group(survey_id).await.unwrap();
    db.set_answer_value(group.id, &q, "lovely").await.unwrap();

    assert!(db.aggregate(survey_id, &q).await.unwrap().is_none());
}

#[tokio::test]
async fn test_aggregate_boolean_buckets_sum_to_group_count() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("bools", vec![question(QuestionKind::Boolean, "Happy?")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;

    let g1 = db.create_answer_group(survey_id).await.unwrap();
    let g2 = db.create_answer_group(survey_id).await.unwrap();
    db.create_answer_group(survey_id).await.unwrap(); // never answers
    db.set_answer_value(g1.id, &q, "1").await.unwrap();
    db.set_answer_value(g2.id, &q, "true").await.unwrap();

    let dataset = db.aggregate(survey_id, &q).await.unwrap().unwrap();
    assert_eq!(
        dataset.buckets,
        vec![
            ("True".to_string(), 2),
            ("False".to_string(), 0),
            ("None".to_string(), 1),
        ]
    );
    assert_eq!(dataset.total(), db.answer_groups_count(survey_id).await.unwrap());
}

#[tokio::test]
async fn test_aggregate_choice_uses_declared_order_and_labels() {
    let db = create_test_db().await;
    let mut choice = question(QuestionKind::Choice, "Favorite color?");
    choice.choices = vec![
        ("R".to_string(), "Red".to_string()),
        ("B".to_string(), "Blue".to_string()),
    ];
    let survey_id = db.load_survey(survey_def("colors", vec![choice])).await.unwrap();
    let q = only_question(&db, survey_id).await;

    let g1 = db.create_answer_group(survey_id).await.unwrap();
    let g2 = db.create_answer_group(survey_id).await.unwrap();
    db.create_answer_group(survey_id).await.unwrap();
    db.set_answer_value(g1.id, &q, "R").await.unwrap();
    db.set_answer_value(g2.id, &q, "R").await.unwrap();

    let dataset = db.aggregate(survey_id, &q).await.unwrap().unwrap();
    assert_eq!(
        dataset.buckets,
        vec![
            ("Red".to_string(), 2),
            ("Blue".to_string(), 0),
            ("None".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_aggregate_star_buckets_run_five_down_to_one() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("star-agg", vec![question(QuestionKind::Star, "Rate us")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;

    let g1 = db.create_answer_group(survey_id).await.unwrap();
    let g2 = db.create_answer_group(survey_id).await.unwrap();
    db.set_answer_value(g1.id, &q, "5").await.unwrap();
    db.set_answer_value(g2.id, &q, "3").await.unwrap();

    let dataset = db.aggregate(survey_id, &q).await.unwrap().unwrap();
    assert_eq!(dataset.labels(), vec!["5", "4", "3", "2", "1", "None"]);
    assert_eq!(dataset.counts(), vec![1, 0, 1, 0, 0, 0]);
}

#[tokio::test]
async fn test_aggregate_num_uses_declared_bounds() {
    let db = create_test_db().await;
    let mut num = question(QuestionKind::Num, "Nights?");
    num.num_min = Some(1);
    num.num_max = Some(4);
    let survey_id = db.load_survey(survey_def("num-agg", vec![num])).await.unwrap();
    let q = only_question(&db, survey_id).await;

    let g1 = db.create_answer_group(survey_id).await.unwrap();
    let g2 = db.create_answer_group(survey_id).await.unwrap();
    db.create_answer_group(survey_id).await.unwrap();
    db.set_answer_value(g1.id, &q, "2").await.unwrap();
    db.set_answer_value(g2.id, &q, "2").await.unwrap();

    let dataset = db.aggregate(survey_id, &q).await.unwrap().unwrap();
    assert_eq!(
        dataset.buckets,
        vec![
            ("1".to_string(), 0),
            ("2".to_string(), 2),
            ("3".to_string(), 0),
            ("4".to_string(), 0),
            ("None".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_aggregate_num_falls_back_to_observed_extremes() {
    let db = create_test_db().await;
    let survey_id = db
        .load_survey(survey_def("num-open", vec![question(QuestionKind::Num, "Nights?")]))
        .await
        .unwrap();
    let q = only_question(&db, survey_id).await;

    let g1 = db.create_answer_group(survey_id).await.unwrap();
    let g2 = db.create_answer_group(survey_id).await.unwrap();
    db.set_answer_value(g1.id, &q, "3").await.unwrap();
    db.set_answer_value(g2.id, &q, "5").await.unwrap();

    let dataset = db.aggregate(survey_id, &q).await.unwrap().unwrap();
    assert_eq!(dataset.labels(), vec!["3", "4", "5", "None"]);
    assert_eq!(dataset.counts(), vec![1, 0, 1, 0]);
}
