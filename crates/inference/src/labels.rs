use {
    crate::*,
    base::Tensor,
    std::{fs, path::Path},
};

/// Class names, one per model output, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    names: Vec<String>,
}

// "n01440764 tench, Tinca tinca" -> "tench, Tinca tinca"
fn strip_synset(line: &str) -> &str {
    let Some((id, rest)) = line.split_once(' ') else {
        return line;
    };
    let is_synset = id.len() == 9
        && id.starts_with('n')
        && id[1..].bytes().all(|byte| byte.is_ascii_digit());
    if is_synset { rest.trim_start() } else { line }
}

impl Labels {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// One label per non-empty line. A leading WordNet id (`n01440764 `) is dropped.
    pub fn parse(text: &str) -> Self {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| strip_synset(line).to_string())
            .collect();
        Self { names }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InferError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|error| InferError::Io(format!("{}: {}", path.display(), error)))?;
        let labels = Self::parse(&text);
        if labels.is_empty() {
            return Err(InferError::ModelLoad(format!(
                "{}: no labels",
                path.display()
            )));
        }
        Ok(labels)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Best class in `scores` (raw logits), with its softmax probability.
    ///
    /// Some models emit an extra background class in front; one surplus
    /// score at index 0 is skipped. An infinite best score is an error, as
    /// no confidence can be given for it.
    pub fn top(&self, scores: &Tensor<f32>) -> Result<Prediction, InferError> {
        let offset = match scores.len() {
            n if n == self.names.len() => 0,
            n if n == self.names.len() + 1 => 1,
            n => {
                return Err(InferError::Shape(format!(
                    "{} scores for {} labels",
                    n,
                    self.names.len()
                )));
            }
        };
        let scores = &scores.data[offset..];
        let best = Tensor::new(vec![scores.len()], scores.to_vec())?
            .argmax()
            .ok_or_else(|| InferError::Runtime("no finite scores".to_string()))?;

        let max = scores[best];
        if !max.is_finite() {
            return Err(InferError::Runtime(format!("best score is {}", max)));
        }
        let sum: f32 = scores
            .iter()
            .filter(|score| !score.is_nan())
            .map(|score| (score - max).exp())
            .sum();
        Ok(Prediction::new(self.names[best].clone(), 1.0 / sum))
    }
}
