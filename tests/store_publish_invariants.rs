mod common;

use std::cell::RefCell;
use std::rc::Rc;

use claved::model::{GradeInput, Period, PeriodInput, Selection};
use claved::{EntityStore, StoreError, ValidationError};
use common::MockGateway;

fn period_input(quartal: i64, stufe: i64) -> PeriodInput {
    PeriodInput { quartal, stufe }
}

#[tokio::test]
async fn rejected_input_never_reaches_gateway_or_bus() {
    let (gateway, state) = MockGateway::new();
    let mut store = EntityStore::new(gateway);

    let published = Rc::new(RefCell::new(0_usize));
    let seen = Rc::clone(&published);
    store.bus_mut().periods.subscribe(move |_| {
        *seen.borrow_mut() += 1;
        Ok(())
    });

    let err = store
        .add_period(&period_input(7, 10))
        .await
        .expect_err("quartal out of range");
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::QuartalOutOfRange(7))
    ));

    assert!(state.lock().unwrap().calls.is_empty());
    assert_eq!(*published.borrow(), 0);
    assert!(store.periods().is_empty());
}

#[tokio::test]
async fn successful_add_publishes_backend_confirmed_snapshot_once() {
    let (gateway, state) = MockGateway::new();
    let mut store = EntityStore::new(gateway);

    let published: Rc<RefCell<Vec<Vec<Period>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);
    store.bus_mut().periods.subscribe(move |periods: &Vec<Period>| {
        sink.borrow_mut().push(periods.clone());
        Ok(())
    });

    store
        .add_period(&period_input(1, 10))
        .await
        .expect("add period");

    // Exactly one publication, carrying the backend-assigned id rather
    // than an optimistic local guess.
    let published = published.borrow();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].len(), 1);
    assert_eq!(published[0][0].id, "period-1");
    assert_eq!(published[0][0].quartal, 1);

    assert_eq!(
        state.lock().unwrap().calls,
        vec!["add_period", "list_periods"]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let (gateway, state) = MockGateway::new();
    state.lock().unwrap().seed_period("p1", 1, 10);

    let mut store = EntityStore::new(gateway);
    store.load_periods().await.expect("initial load");
    assert_eq!(store.periods().len(), 1);

    let published = Rc::new(RefCell::new(0_usize));
    let seen = Rc::clone(&published);
    store.bus_mut().periods.subscribe(move |_| {
        *seen.borrow_mut() += 1;
        Ok(())
    });

    state.lock().unwrap().fail_all = true;
    let err = store.load_periods().await.expect_err("backend down");
    assert!(matches!(err, StoreError::Gateway(_)));

    assert_eq!(store.periods().len(), 1);
    assert_eq!(store.periods()[0].id, "p1");
    assert_eq!(*published.borrow(), 0);
}

#[tokio::test]
async fn edit_of_unknown_id_fails_before_the_gateway() {
    let (gateway, state) = MockGateway::new();
    let mut store = EntityStore::new(gateway);

    let err = store
        .edit_period("nope", &period_input(2, 11))
        .await
        .expect_err("unknown id");
    assert!(matches!(err, StoreError::NotFound { entity: "period", .. }));
    assert_eq!(err.code(), "not_found");

    assert!(state.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn grade_add_requires_known_period_and_subject() {
    let (gateway, state) = MockGateway::new();
    state.lock().unwrap().seed_period("p1", 1, 10);

    let mut store = EntityStore::new(gateway);
    store.load_periods().await.expect("load periods");
    store.load_subjects().await.expect("load subjects");
    state.lock().unwrap().calls.clear();

    let input = GradeInput {
        subject_id: "ghost".to_string(),
        oral: Some(10.0),
        written: Some(12.0),
        weighting: 0.5,
    };
    let err = store
        .add_grade("p1", &input)
        .await
        .expect_err("unknown subject");
    assert!(matches!(err, StoreError::NotFound { entity: "subject", .. }));
    assert!(state.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn select_publishes_only_on_the_selection_channel() {
    let (gateway, _state) = MockGateway::new();
    let mut store = EntityStore::new(gateway);

    let counts: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&counts);
    store.bus_mut().periods.subscribe(move |_| {
        sink.borrow_mut().push("periods");
        Ok(())
    });
    let sink = Rc::clone(&counts);
    store.bus_mut().subjects.subscribe(move |_| {
        sink.borrow_mut().push("subjects");
        Ok(())
    });
    let sink = Rc::clone(&counts);
    store.bus_mut().grades.subscribe(move |_| {
        sink.borrow_mut().push("grades");
        Ok(())
    });
    let sink = Rc::clone(&counts);
    store.bus_mut().selection.subscribe(move |_| {
        sink.borrow_mut().push("selection");
        Ok(())
    });

    store.select(Selection::Period("p1".to_string()));

    assert_eq!(*counts.borrow(), vec!["selection"]);
    assert_eq!(store.selection(), &Selection::Period("p1".to_string()));
}

#[tokio::test]
async fn removing_the_loaded_period_clears_grades_and_selection() {
    let (gateway, state) = MockGateway::new();
    {
        let mut s = state.lock().unwrap();
        s.seed_period("p1", 1, 10);
        s.seed_subject("s1", "Mathe", Some("Huber"));
        s.seed_grade("p1", "g1", "s1", Some(12.0));
    }

    let mut store = EntityStore::new(gateway);
    store.load_periods().await.expect("load periods");
    store.load_subjects().await.expect("load subjects");
    store.load_grades("p1").await.expect("load grades");
    store.select(Selection::Period("p1".to_string()));

    let grades_published: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&grades_published);
    store
        .bus_mut()
        .grades
        .subscribe(move |grades: &Vec<claved::Grade>| {
            sink.borrow_mut().push(grades.len());
            Ok(())
        });

    store.remove_period("p1").await.expect("remove period");

    assert!(store.periods().is_empty());
    assert_eq!(store.grades_period(), None);
    assert_eq!(*grades_published.borrow(), vec![0]);
    assert_eq!(store.selection(), &Selection::None);
    assert!(state
        .lock()
        .unwrap()
        .calls
        .contains(&"delete_period"));
}
