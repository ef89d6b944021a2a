//! Offline fitting of the classifier artifact.
//!
//! Training is a one-shot batch job run by the `train_model` binary, well
//! away from the serving path. The fit is fully deterministic: the
//! vocabulary and class lists are sorted, the weights start at zero, and
//! plain batch gradient descent does the rest.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    path::Path,
};

use serde::Deserialize;

use crate::Error;

use super::{ModelArtifact, tokenize};

/// One row of the training dataset: a description and the category it
/// should be filed under.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabeledExample {
    /// The free-text expense description.
    pub description: String,
    /// The category label the description belongs to.
    pub category: String,
}

/// Knobs for the gradient descent fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// The gradient descent step size.
    pub learning_rate: f64,
    /// The number of full passes over the dataset.
    pub epochs: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1.0,
            epochs: 200,
        }
    }
}

/// Read a labeled dataset from the CSV file at `path`.
///
/// The file must have a header row with `description` and `category`
/// columns.
///
/// # Errors
/// Returns [Error::Dataset] if the file cannot be opened or a record cannot
/// be parsed.
pub fn read_dataset(path: &Path) -> Result<Vec<LabeledExample>, Error> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|error| Error::Dataset(format!("could not open {}: {error}", path.display())))?;

    reader
        .deserialize()
        .map(|record| {
            record.map_err(|error| {
                Error::Dataset(format!("could not parse {}: {error}", path.display()))
            })
        })
        .collect()
}

/// Fit a TF-IDF vectorizer and a multinomial logistic regression classifier
/// to `examples`.
///
/// # Errors
/// Returns [Error::Dataset] if `examples` is empty.
pub fn fit_model(examples: &[LabeledExample], config: &TrainingConfig) -> Result<ModelArtifact, Error> {
    if examples.is_empty() {
        return Err(Error::Dataset("the dataset contains no examples".to_owned()));
    }

    let tokenized: Vec<Vec<String>> = examples
        .iter()
        .map(|example| tokenize(&example.description))
        .collect();

    let (vocabulary, idf) = fit_vocabulary(&tokenized);

    let classes: Vec<String> = examples
        .iter()
        .map(|example| example.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let labels: Vec<usize> = examples
        .iter()
        .map(|example| {
            classes
                .binary_search(&example.category)
                .expect("every label was collected into the class list")
        })
        .collect();

    let rows: Vec<Vec<f64>> = tokenized
        .iter()
        .map(|tokens| vectorize_row(tokens, &vocabulary, &idf))
        .collect();

    let (weights, intercepts) = fit_softmax_regression(&rows, &labels, classes.len(), config);

    Ok(ModelArtifact {
        classes,
        vocabulary,
        idf,
        weights,
        intercepts,
    })
}

/// Build the term index and smoothed inverse document frequencies.
///
/// Terms are indexed in sorted order so that two fits over the same dataset
/// produce identical artifacts.
fn fit_vocabulary(tokenized: &[Vec<String>]) -> (HashMap<String, usize>, Vec<f64>) {
    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();

    for tokens in tokenized {
        let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();

        for term in unique {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }

    let document_count = tokenized.len() as f64;

    let mut vocabulary = HashMap::with_capacity(document_frequency.len());
    let mut idf = Vec::with_capacity(document_frequency.len());

    for (index, (term, frequency)) in document_frequency.into_iter().enumerate() {
        vocabulary.insert(term.to_owned(), index);
        idf.push(((1.0 + document_count) / (1.0 + frequency as f64)).ln() + 1.0);
    }

    (vocabulary, idf)
}

/// Turn one tokenized document into an L2-normalised TF-IDF row.
fn vectorize_row(
    tokens: &[String],
    vocabulary: &HashMap<String, usize>,
    idf: &[f64],
) -> Vec<f64> {
    let mut row = vec![0.0; idf.len()];

    for token in tokens {
        if let Some(&index) = vocabulary.get(token) {
            row[index] += 1.0;
        }
    }

    let mut squared_norm = 0.0;

    for (feature, term_idf) in row.iter_mut().zip(idf) {
        *feature *= term_idf;
        squared_norm += *feature * *feature;
    }

    if squared_norm > 0.0 {
        let norm = squared_norm.sqrt();

        for feature in &mut row {
            *feature /= norm;
        }
    }

    row
}

/// Fit one weight row and intercept per class by batch gradient descent on
/// the softmax cross-entropy loss, starting from zero weights.
fn fit_softmax_regression(
    rows: &[Vec<f64>],
    labels: &[usize],
    class_count: usize,
    config: &TrainingConfig,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let term_count = rows.first().map_or(0, Vec::len);
    let row_count = rows.len() as f64;

    let mut weights = vec![vec![0.0; term_count]; class_count];
    let mut intercepts = vec![0.0; class_count];

    for _ in 0..config.epochs {
        let mut weight_gradients = vec![vec![0.0; term_count]; class_count];
        let mut intercept_gradients = vec![0.0; class_count];

        for (row, &label) in rows.iter().zip(labels) {
            let probabilities = softmax(&class_scores(row, &weights, &intercepts));

            for (class_index, probability) in probabilities.iter().enumerate() {
                let target = if class_index == label { 1.0 } else { 0.0 };
                let residual = probability - target;

                for (gradient, feature) in weight_gradients[class_index].iter_mut().zip(row) {
                    *gradient += residual * feature;
                }

                intercept_gradients[class_index] += residual;
            }
        }

        let step = config.learning_rate / row_count;

        for (row_of_weights, gradients) in weights.iter_mut().zip(&weight_gradients) {
            for (weight, gradient) in row_of_weights.iter_mut().zip(gradients) {
                *weight -= step * gradient;
            }
        }

        for (intercept, gradient) in intercepts.iter_mut().zip(&intercept_gradients) {
            *intercept -= step * gradient;
        }
    }

    (weights, intercepts)
}

fn class_scores(row: &[f64], weights: &[Vec<f64>], intercepts: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .zip(intercepts)
        .map(|(class_weights, intercept)| {
            intercept
                + class_weights
                    .iter()
                    .zip(row)
                    .map(|(weight, feature)| weight * feature)
                    .sum::<f64>()
        })
        .collect()
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let exponentials: Vec<f64> = scores
        .iter()
        .map(|score| (score - max_score).exp())
        .collect();
    let total: f64 = exponentials.iter().sum();

    exponentials
        .into_iter()
        .map(|exponential| exponential / total)
        .collect()
}


#[cfg(test)]
mod read_dataset_tests {
    use std::io::Write;

    use crate::Error;

    use super::read_dataset;

    #[test]
    fn reads_csv_with_headers() {
        let mut file = tempfile::NamedTempFile::new().expect("could not create temporary file");
        writeln!(file, "description,category").unwrap();
        writeln!(file, "uber ride,Transport").unwrap();
        writeln!(file, "pizza dinner,Food").unwrap();

        let dataset = read_dataset(file.path()).expect("could not read dataset");

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[0].description, "uber ride");
        assert_eq!(dataset[1].category, "Food");
    }

    #[test]
    fn fails_on_missing_file() {
        let result = read_dataset(std::path::Path::new("no/such/dataset.csv"));

        assert!(matches!(result, Err(Error::Dataset(_))));
    }
}
