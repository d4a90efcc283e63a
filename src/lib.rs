//! docmap - structural view of an unlabeled document set
//!
//! docmap groups short texts (abstracts, tickets, notes) by content and lays
//! them out on a plane for inspection, without any manual labeling.
//!
//! # Architecture
//!
//! - **Vectorizer**: TF-IDF term weighting with L2-normalized rows
//! - **ClusterEngine**: seeded k-means with deterministic tie-breaks
//! - **Reducer**: PCA projection with a fixed sign convention
//! - **Pipeline**: runs the three and combines labels with coordinates
//!
//! A zero-shot classifier can optionally name each cluster after the fact;
//! it sits behind the [`classify::ZeroShotClassifier`] trait.
//!
//! # Main Modules
//!
//! - [`vectorize`] - tokenization, vocabulary, TF-IDF
//! - [`cluster`] - k-means
//! - [`reduce`] - PCA
//! - [`pipeline`] - end-to-end run and cluster labelling
//! - [`classify`] - zero-shot classifiers
//! - [`config`] - JSON configuration with environment overrides
//!
//! # Example
//!
//! ```rust
//! use docmap::pipeline::run;
//!
//! let abstracts = [
//!     "Deep learning methods for computer vision",
//!     "Quantum computing for chemical simulations",
//!     "Machine learning techniques in healthcare",
//!     "Applications of blockchain technology in finance",
//!     "Gene editing using CRISPR technology",
//! ];
//!
//! let output = run(&abstracts, 3, 2, 42)?;
//! for row in output.rows() {
//!     println!("{} -> cluster {} at {:?}", row.document, row.cluster, row.coords);
//! }
//! # Ok::<(), docmap::PipelineError>(())
//! ```

pub mod classify;
pub mod cluster;
pub mod config;
pub mod error;
pub mod logging;
pub mod matrix;
pub mod pipeline;
pub mod reduce;
pub mod vectorize;

pub use classify::{Classification, ClassifierError, LabelScore, ZeroShotClassifier};
pub use cluster::{cluster, ClusterAssignment, ClusterEngine, KMeansModel, KMeansParams};
pub use config::AppConfig;
pub use error::PipelineError;
pub use matrix::TermWeightMatrix;
pub use pipeline::{run, Pipeline, PipelineConfig, PipelineOutput};
pub use reduce::{reduce, ProjectedPoint, Projection};
pub use vectorize::{vectorize, Vocabulary};
