mod common;

use std::cell::RefCell;
use std::rc::Rc;

use claved::model::Grade;
use claved::EntityStore;
use common::MockGateway;

/// Grade snapshots published after a subject deletion, as a list of
/// subject ids per publication.
type PublishedSubjects = Rc<RefCell<Vec<Vec<String>>>>;

fn watch_grades<G: claved::Gateway>(store: &mut EntityStore<G>) -> PublishedSubjects {
    let published: PublishedSubjects = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&published);
    store.bus_mut().grades.subscribe(move |grades: &Vec<Grade>| {
        sink.borrow_mut()
            .push(grades.iter().map(|g| g.subject_id.clone()).collect());
        Ok(())
    });
    published
}

#[tokio::test]
async fn deleting_a_subject_drops_its_grades_from_publications() {
    let (gateway, state) = MockGateway::new();
    {
        let mut s = state.lock().unwrap();
        s.seed_period("p1", 1, 10);
        s.seed_subject("s1", "Mathe", Some("Huber"));
        s.seed_subject("s2", "Deutsch", None);
        s.seed_grade("p1", "g1", "s1", Some(12.0));
        s.seed_grade("p1", "g2", "s2", Some(9.0));
    }

    let mut store = EntityStore::new(gateway);
    store.load_periods().await.expect("load periods");
    store.load_subjects().await.expect("load subjects");
    store.load_grades("p1").await.expect("load grades");
    assert_eq!(store.visible_grades().len(), 2);

    let published = watch_grades(&mut store);
    store.remove_subject("s1").await.expect("remove subject");

    // One refreshed grades publication, already free of s1's grades.
    assert_eq!(*published.borrow(), vec![vec!["s2".to_string()]]);
    assert_eq!(store.visible_grades().len(), 1);
    assert_eq!(store.visible_grades()[0].id, "g2");
}

#[tokio::test]
async fn orphans_stay_hidden_even_when_the_backend_does_not_cascade() {
    let (gateway, state) = MockGateway::new();
    {
        let mut s = state.lock().unwrap();
        s.cascade_subject_delete = false;
        s.seed_period("p1", 1, 10);
        s.seed_subject("s1", "Mathe", None);
        s.seed_subject("s2", "Deutsch", None);
        s.seed_grade("p1", "g1", "s1", Some(12.0));
        s.seed_grade("p1", "g2", "s2", Some(9.0));
    }

    let mut store = EntityStore::new(gateway);
    store.load_periods().await.expect("load periods");
    store.load_subjects().await.expect("load subjects");
    store.load_grades("p1").await.expect("load grades");

    let published = watch_grades(&mut store);
    store.remove_subject("s1").await.expect("remove subject");

    // The backend still reports g1, but its subject is gone from the
    // snapshot, so neither the publication nor the accessor shows it.
    assert_eq!(state.lock().unwrap().grades.len(), 2);
    assert_eq!(*published.borrow(), vec![vec!["s2".to_string()]]);
    assert!(store
        .visible_grades()
        .iter()
        .all(|g| g.subject_id != "s1"));
}

#[tokio::test]
async fn grades_pointing_at_unknown_subjects_are_never_loaded_as_visible() {
    let (gateway, state) = MockGateway::new();
    {
        let mut s = state.lock().unwrap();
        s.seed_period("p1", 1, 10);
        s.seed_subject("s1", "Mathe", None);
        // Stale row left behind by an older client.
        s.seed_grade("p1", "g-stale", "s-gone", Some(7.0));
        s.seed_grade("p1", "g1", "s1", Some(11.0));
    }

    let mut store = EntityStore::new(gateway);
    store.load_periods().await.expect("load periods");
    store.load_subjects().await.expect("load subjects");

    let published = watch_grades(&mut store);
    store.load_grades("p1").await.expect("load grades");

    assert_eq!(*published.borrow(), vec![vec!["s1".to_string()]]);
    let visible = store.visible_grades();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "g1");
}
