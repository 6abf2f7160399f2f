use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Error;
use crate::ml::classic::{KNNClassifier, Label};

#[test]
fn test_single_point_predicts_itself() {
    let mut knn = KNNClassifier::new(3, 1);
    knn.insert([0.3, -1.2, 7.0], 42).unwrap();
    assert_eq!(knn.predict([0.3, -1.2, 7.0]).unwrap(), Label::Id(42));
}

#[test]
fn test_majority_vote_scenario() {
    let mut knn = KNNClassifier::new(1, 3);
    knn.insert(0.0, 0).unwrap();
    knn.insert(0.1, 0).unwrap();
    knn.insert(5.0, 1).unwrap();

    assert_eq!(knn.predict(0.05).unwrap(), Label::Id(0));
}

#[test]
fn test_predict_is_deterministic() {
    let mut knn = KNNClassifier::new(2, 2);
    knn.insert([0.0, 0.0], 1).unwrap();
    knn.insert([1.0, 1.0], 2).unwrap();
    knn.insert([2.0, 2.0], 3).unwrap();

    let first = knn.predict([1.4, 1.6]).unwrap();
    let second = knn.predict([1.4, 1.6]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_tag_round_trip() {
    let mut knn = KNNClassifier::new(2, 1);
    knn.set_tags(["a", "b", "c"]).unwrap();
    knn.insert([4.0, 2.0], "b").unwrap();

    assert_eq!(knn.labels(), &[1]);
    assert_eq!(knn.predict([4.0, 2.0]).unwrap(), Label::from("b"));
}

#[test]
fn test_integer_labels_predict_as_tags_when_configured() {
    let mut knn = KNNClassifier::with_tags(1, 1, ["low", "high"]).unwrap();
    knn.insert(1.0, 0).unwrap();
    knn.insert(9.0, "high").unwrap();

    assert_eq!(knn.predict(2.0).unwrap(), Label::from("low"));
    assert_eq!(knn.predict(8.0).unwrap(), Label::from("high"));
}

#[test]
fn test_empty_classifier() {
    let knn = KNNClassifier::new(2, 3);
    assert_eq!(knn.predict([1.0, 2.0]), Err(Error::EmptyClassifier));
    assert_eq!(knn.nearest([1.0, 2.0]), Err(Error::EmptyClassifier));
}

#[test]
fn test_wrong_length_insert_leaves_state_unchanged() {
    let mut knn = KNNClassifier::new(3, 1);
    knn.insert([1.0, 2.0, 3.0], 0).unwrap();

    let result = knn.insert([1.0, 2.0], 1);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(knn.len(), 1);
    assert_eq!(knn.points().nrows(), 1);
    assert_eq!(knn.labels().len(), 1);

    assert!(matches!(
        knn.predict([1.0, 2.0, 3.0, 4.0]),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_k_larger_than_population_is_clamped() {
    let mut knn = KNNClassifier::new(2, 5);
    knn.insert([0.0, 0.0], 7).unwrap();
    knn.insert([1.0, 0.0], 7).unwrap();

    assert_eq!(knn.nearest([0.2, 0.0]).unwrap().len(), 2);
    assert_eq!(knn.predict([0.2, 0.0]).unwrap(), Label::Id(7));
}

#[test]
fn test_equal_distances_keep_insertion_order() {
    let mut knn = KNNClassifier::new(1, 1);
    knn.insert(-1.0, 3).unwrap();
    knn.insert(1.0, 8).unwrap();

    // Both are at distance 1; the first inserted wins
    assert_eq!(knn.predict(0.0).unwrap(), Label::Id(3));

    let neighbors = knn.nearest(0.0).unwrap();
    assert_eq!(neighbors[0].index, 0);
}

#[test]
fn test_vote_tie_goes_to_nearest_neighbor() {
    let mut knn = KNNClassifier::new(1, 4);
    knn.insert(10.0, 1).unwrap();
    knn.insert(1.0, 2).unwrap();
    knn.insert(2.0, 2).unwrap();
    knn.insert(3.0, 1).unwrap();

    // Two votes each; label 2 owns the closest point (1.0)
    assert_eq!(knn.predict(0.0).unwrap(), Label::Id(2));
}

#[test]
fn test_label_errors_do_not_mutate() {
    let mut knn = KNNClassifier::new(2, 1);

    assert!(matches!(
        knn.insert([0.0, 0.0], "cat"),
        Err(Error::InvalidLabel(_))
    ));
    assert!(matches!(
        knn.insert([0.0, 0.0], -3),
        Err(Error::InvalidLabel(_))
    ));

    knn.set_tags(["cat", "dog"]).unwrap();
    assert_eq!(
        knn.insert([0.0, 0.0], "bird"),
        Err(Error::LabelNotFound("bird".to_string()))
    );
    assert!(matches!(
        knn.insert([0.0, 0.0], 2),
        Err(Error::InvalidLabel(_))
    ));

    assert!(knn.is_empty());
    assert_eq!(knn.points().nrows(), 0);
}

#[test]
fn test_non_numeric_data_rejected() {
    let mut knn = KNNClassifier::new(2, 1);
    assert!(matches!(
        knn.insert([f64::NAN, 1.0], 0),
        Err(Error::InvalidInput(_))
    ));
    assert!(knn.is_empty());
}

#[test]
fn test_failed_set_tags_keeps_previous_tags() {
    let mut knn = KNNClassifier::with_tags(1, 1, ["x", "y"]).unwrap();

    assert!(matches!(
        knn.set_tags(Vec::<String>::new()),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        knn.set_tags(["p", "p"]),
        Err(Error::InvalidInput(_))
    ));

    let tags = knn.tags().unwrap();
    assert_eq!(tags.id_of("y"), Some(1));
    assert_eq!(tags.len(), 2);
}

#[test]
fn test_set_tags_does_not_remap_stored_labels() {
    let mut knn = KNNClassifier::with_tags(1, 1, ["a", "b"]).unwrap();
    knn.insert(0.0, "b").unwrap();

    knn.set_tags(["b", "a"]).unwrap();
    assert_eq!(knn.labels(), &[1]);
    assert_eq!(knn.predict(0.0).unwrap(), Label::from("a"));
}

#[test]
fn test_predicted_id_without_tag() {
    let mut knn = KNNClassifier::with_tags(1, 1, ["a", "b", "c"]).unwrap();
    knn.insert(0.0, "c").unwrap();

    knn.set_tags(["a"]).unwrap();
    assert!(matches!(knn.predict(0.0), Err(Error::LabelNotFound(_))));
}

#[test]
fn test_lengths_stay_aligned() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut knn = KNNClassifier::new(4, 3);

    for i in 0..200 {
        let len = if i % 10 == 0 { 3 } else { 4 };
        let point: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let _ = knn.insert(point, rng.gen_range(0..5_usize));
        assert_eq!(knn.points().nrows(), knn.labels().len());
    }
    assert_eq!(knn.len(), 180);
}

#[test]
fn test_agrees_with_brute_force_nearest() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut knn = KNNClassifier::new(3, 1);
    let mut stored = Vec::new();

    for label in 0..100_usize {
        let point: Vec<f64> = (0..3).map(|_| rng.gen_range(-10.0..10.0)).collect();
        knn.insert(&point, label).unwrap();
        stored.push(point);
    }

    for _ in 0..50 {
        let query: Vec<f64> = (0..3).map(|_| rng.gen_range(-10.0..10.0)).collect();
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, p) in stored.iter().enumerate() {
            let d: f64 = p.iter().zip(&query).map(|(a, b)| (a - b) * (a - b)).sum();
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        assert_eq!(knn.predict(&query).unwrap(), Label::Id(best));
    }
}
