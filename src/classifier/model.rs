//! The fitted model artifact and the inference path.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The persisted parameters of a fitted TF-IDF vectorizer and linear
/// classifier.
///
/// The artifact is produced offline by the `train_model` binary and read
/// once at server startup. All vectors are indexed consistently: `idf` has
/// one entry per vocabulary term, `weights` has one row per class with one
/// column per vocabulary term, and `intercepts` has one entry per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// The category labels, in the order the weight rows are stored.
    pub classes: Vec<String>,
    /// Maps a vocabulary term to its column index.
    pub vocabulary: HashMap<String, usize>,
    /// The inverse document frequency of each vocabulary term.
    pub idf: Vec<f64>,
    /// One weight row per class.
    pub weights: Vec<Vec<f64>>,
    /// One intercept per class.
    pub intercepts: Vec<f64>,
}

/// Maps a free-text expense description to a category label.
///
/// A `Classifier` is immutable once constructed: it is loaded at process
/// start and shared by all requests behind an `Arc` without further
/// synchronisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    artifact: ModelArtifact,
}

impl Classifier {
    /// Create a classifier from a fitted artifact, validating that the
    /// artifact's dimensions agree with each other.
    ///
    /// # Errors
    /// Returns [Error::ModelArtifact] if any dimension check fails.
    pub fn new(artifact: ModelArtifact) -> Result<Self, Error> {
        let class_count = artifact.classes.len();
        let term_count = artifact.vocabulary.len();

        if class_count == 0 {
            return Err(Error::ModelArtifact(
                "the artifact contains no classes".to_owned(),
            ));
        }

        if artifact.idf.len() != term_count {
            return Err(Error::ModelArtifact(format!(
                "the artifact has {} idf entries for {} vocabulary terms",
                artifact.idf.len(),
                term_count
            )));
        }

        if artifact.weights.len() != class_count || artifact.intercepts.len() != class_count {
            return Err(Error::ModelArtifact(format!(
                "the artifact has {} weight rows and {} intercepts for {} classes",
                artifact.weights.len(),
                artifact.intercepts.len(),
                class_count
            )));
        }

        if let Some(row) = artifact
            .weights
            .iter()
            .find(|row| row.len() != term_count)
        {
            return Err(Error::ModelArtifact(format!(
                "the artifact has a weight row of length {} for {} vocabulary terms",
                row.len(),
                term_count
            )));
        }

        if let Some((term, &index)) = artifact
            .vocabulary
            .iter()
            .find(|&(_, &index)| index >= term_count)
        {
            return Err(Error::ModelArtifact(format!(
                "the vocabulary term \"{term}\" has the out of range index {index}"
            )));
        }

        Ok(Self { artifact })
    }

    /// Load a classifier from the JSON artifact at `path`.
    ///
    /// # Errors
    /// Returns [Error::ModelArtifact] if the file cannot be read, is not
    /// valid JSON, or fails the dimension checks in [Classifier::new].
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|error| {
            Error::ModelArtifact(format!("could not read {}: {error}", path.display()))
        })?;

        let artifact: ModelArtifact = serde_json::from_str(&text).map_err(|error| {
            Error::ModelArtifact(format!("could not parse {}: {error}", path.display()))
        })?;

        Self::new(artifact)
    }

    /// Assign a category label to `description`.
    ///
    /// Deterministic for a given artifact and input. Out-of-vocabulary text,
    /// including the empty string, scores every class by its intercept alone
    /// and returns the highest scoring class. Ties break towards the class
    /// stored first.
    pub fn classify(&self, description: &str) -> &str {
        let features = self.vectorize(description);

        let mut best_class = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (class_index, (row, intercept)) in self
            .artifact
            .weights
            .iter()
            .zip(&self.artifact.intercepts)
            .enumerate()
        {
            let score = intercept
                + row
                    .iter()
                    .zip(&features)
                    .map(|(weight, feature)| weight * feature)
                    .sum::<f64>();

            if score > best_score {
                best_class = class_index;
                best_score = score;
            }
        }

        &self.artifact.classes[best_class]
    }

    /// The category labels this classifier can assign.
    pub fn classes(&self) -> &[String] {
        &self.artifact.classes
    }

    /// Turn `text` into an L2-normalised TF-IDF feature vector.
    fn vectorize(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0; self.artifact.idf.len()];

        for token in tokenize(text) {
            if let Some(&index) = self.artifact.vocabulary.get(&token) {
                features[index] += 1.0;
            }
        }

        let mut squared_norm = 0.0;

        for (feature, idf) in features.iter_mut().zip(&self.artifact.idf) {
            *feature *= idf;
            squared_norm += *feature * *feature;
        }

        if squared_norm > 0.0 {
            let norm = squared_norm.sqrt();

            for feature in &mut features {
                *feature /= norm;
            }
        }

        features
    }
}

/// Split `text` into lowercase alphanumeric tokens of at least two
/// characters.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|character: char| !character.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
pub(crate) fn test_artifact() -> ModelArtifact {
    // A hand-fitted two term, two class model: "uber" and "ride" vote for
    // Transport, everything else falls through to the Food intercept.
    ModelArtifact {
        classes: vec!["Food".to_owned(), "Transport".to_owned()],
        vocabulary: [("uber".to_owned(), 0), ("ride".to_owned(), 1)]
            .into_iter()
            .collect(),
        idf: vec![1.0, 1.0],
        weights: vec![vec![-1.0, -1.0], vec![1.0, 1.0]],
        intercepts: vec![0.5, -0.5],
    }
}

#[cfg(test)]
mod tokenize_tests {
    use super::tokenize;

    #[test]
    fn lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("Uber ride, downtown!");

        assert_eq!(tokens, vec!["uber", "ride", "downtown"]);
    }

    #[test]
    fn drops_single_character_tokens() {
        let tokens = tokenize("a 5 kg of rice");

        assert_eq!(tokens, vec!["kg", "of", "rice"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
    }
}
