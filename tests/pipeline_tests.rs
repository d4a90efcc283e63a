//! End-to-end tests of vectorization, clustering and projection
//!
//! Covers the documented properties: output shapes, determinism, unit rows,
//! monotone objective, orthonormal axes and the small reference scenarios.

use docmap::cluster::{ClusterEngine, InitStrategy, KMeansParams};
use docmap::pipeline::{Pipeline, PipelineConfig};
use docmap::reduce::ReducerOptions;
use docmap::vectorize::{StopWords, VectorizerOptions};
use docmap::{cluster, reduce, run, vectorize, PipelineError};

fn abstracts() -> Vec<&'static str> {
    vec![
        "Deep learning methods for computer vision",
        "Quantum computing for chemical simulations",
        "Machine learning techniques in healthcare",
        "Applications of blockchain technology in finance",
        "Gene editing using CRISPR technology",
        "Convolutional networks for image recognition and computer vision",
        "Blockchain ledgers for decentralized finance",
        "Quantum algorithms for molecular chemical modelling",
    ]
}

#[test]
fn test_output_shapes_for_many_k() {
    let docs = abstracts();
    for k in 1..=docs.len() {
        let output = run(&docs, k, 2, 42).unwrap();
        assert_eq!(output.assignment.len(), docs.len());
        assert!(output.assignment.labels().iter().all(|&c| c < k));
        assert_eq!(output.points.len(), docs.len());
        assert!(output.points.iter().all(|p| p.coords.len() == 2));
        assert_eq!(output.model.centroids.nrows(), k);
    }
}

#[test]
fn test_cluster_is_deterministic() {
    let (matrix, _) = vectorize(&abstracts(), &VectorizerOptions::default()).unwrap();
    for seed in [0, 1, 42, 9999] {
        let a = cluster(&matrix, 3, seed).unwrap();
        let b = cluster(&matrix, 3, seed).unwrap();
        assert_eq!(a.assignment, b.assignment);
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.iterations, b.iterations);
    }
}

#[test]
fn test_rows_have_unit_norm() {
    let mut docs = abstracts();
    docs.push("the and of it");
    let (matrix, _) = vectorize(&docs, &VectorizerOptions::default()).unwrap();
    let norms = matrix.row_norms();
    for norm in &norms[..norms.len() - 1] {
        assert!((norm - 1.0).abs() < 1e-9);
    }
    assert_eq!(norms[norms.len() - 1], 0.0);
}

#[test]
fn test_objective_never_increases() {
    let (matrix, _) = vectorize(&abstracts(), &VectorizerOptions::default()).unwrap();
    for init in [InitStrategy::Random, InitStrategy::PlusPlus] {
        for seed in 0..10 {
            let params = KMeansParams {
                init,
                ..KMeansParams::new(3, seed)
            };
            let model = ClusterEngine::new(params).fit(&matrix).unwrap();
            for pair in model.objective_history.windows(2) {
                assert!(pair[1] <= pair[0] + 1e-9, "objective went up: {:?}", pair);
            }
        }
    }
}

#[test]
fn test_projection_axes_orthonormal() {
    let (matrix, _) = vectorize(&abstracts(), &VectorizerOptions::default()).unwrap();
    let projection = reduce(&matrix, 3).unwrap();
    let axes = &projection.components;
    assert_eq!(axes.nrows(), 3);
    assert_eq!(axes.ncols(), matrix.n_terms());

    for i in 0..axes.nrows() {
        let a = axes.row(i);
        assert!((a.dot(&a) - 1.0).abs() < 1e-9);

        // Largest-magnitude entry is positive
        let pivot = a
            .iter()
            .copied()
            .fold(0.0f64, |best, v| if v.abs() > best.abs() { v } else { best });
        assert!(pivot > 0.0);

        for j in (i + 1)..axes.nrows() {
            assert!(a.dot(&axes.row(j)).abs() < 1e-9);
        }
    }

    for w in projection.explained_variance.windows(2) {
        assert!(w[0] >= w[1]);
    }
}

#[test]
fn test_similar_documents_share_a_cluster() {
    let docs = ["cat dog", "dog cat", "car engine"];
    let (matrix, _) = vectorize(&docs, &VectorizerOptions::default()).unwrap();
    let model = cluster(&matrix, 2, 0).unwrap();
    let labels = model.assignment.labels();
    assert_eq!(labels[0], labels[1]);
    assert_ne!(labels[0], labels[2]);

    // Identical first rows leave a single principal axis
    assert_eq!(
        run(&docs, 2, 2, 0).unwrap_err(),
        PipelineError::InsufficientRank { requested: 2, rank: 1 }
    );
    let output = run(&docs, 2, 1, 0).unwrap();
    assert_eq!(output.assignment, model.assignment);
}

#[test]
fn test_duplicate_documents_with_k_equal_to_n_converge() {
    let docs = ["cat dog", "dog cat", "car engine"];
    let (matrix, _) = vectorize(&docs, &VectorizerOptions::default()).unwrap();

    for seed in 0..5 {
        let model = cluster(&matrix, 3, seed).unwrap();
        assert!(model.converged);
        assert!(model.iterations < 300);

        let labels = model.assignment.labels();
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);

        let mut sizes = model.cluster_sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![0, 1, 2]);
    }
}

#[test]
fn test_k_equal_to_documents_gives_singletons() {
    let docs = abstracts();
    let (matrix, _) = vectorize(&docs, &VectorizerOptions::default()).unwrap();
    let model = cluster(&matrix, docs.len(), 5).unwrap();

    assert!(model.cluster_sizes().iter().all(|&s| s == 1));
    assert!(model.inertia.abs() < 1e-12);
    assert!(model.converged);
}

#[test]
fn test_single_document() {
    let docs = ["Gene editing using CRISPR technology"];
    let (matrix, vocabulary) = vectorize(&docs, &VectorizerOptions::default()).unwrap();
    assert_eq!(matrix.n_documents(), 1);
    assert!(!vocabulary.is_empty());

    let model = cluster(&matrix, 1, 0).unwrap();
    assert_eq!(model.assignment.labels(), &[0]);

    assert_eq!(
        reduce(&matrix, 2).unwrap_err(),
        PipelineError::InsufficientRank { requested: 2, rank: 0 }
    );
    assert!(matches!(
        run(&docs, 1, 2, 0),
        Err(PipelineError::InsufficientRank { .. })
    ));
}

#[test]
fn test_error_kinds() {
    let docs = abstracts();
    assert_eq!(
        run(&docs, 0, 2, 0).unwrap_err(),
        PipelineError::InvalidClusterCount { k: 0, documents: docs.len() }
    );
    assert_eq!(
        run(&docs, docs.len() + 1, 2, 0).unwrap_err(),
        PipelineError::InvalidClusterCount { k: docs.len() + 1, documents: docs.len() }
    );

    let empty: Vec<&str> = Vec::new();
    assert_eq!(
        run(&empty, 1, 2, 0).unwrap_err(),
        PipelineError::InvalidClusterCount { k: 1, documents: 0 }
    );

    let stop_only = ["the of", "and it is"];
    assert_eq!(run(&stop_only, 1, 2, 0).unwrap_err(), PipelineError::EmptyVocabulary);
}

#[test]
fn test_configured_pipeline() {
    let config = PipelineConfig {
        vectorizer: VectorizerOptions {
            stop_words: StopWords::Custom(vec!["for".to_string(), "in".to_string()]),
            min_token_len: 1,
            ..Default::default()
        },
        clustering: KMeansParams {
            init: InitStrategy::PlusPlus,
            ..KMeansParams::new(4, 7)
        },
        projection: ReducerOptions { components: 3 },
    };

    let pipeline = Pipeline::new(config);
    let first = pipeline.run(&abstracts()).unwrap();
    let second = pipeline.run(&abstracts()).unwrap();

    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.points, second.points);
    assert!(first.points.iter().all(|p| p.dimensions() == 3));
    assert!(first.vocabulary.index_of("of").is_some());
    assert!(first.vocabulary.index_of("for").is_none());
}
