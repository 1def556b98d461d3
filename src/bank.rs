/**
 * The question bank: an immutable, ordered list of multiple-choice questions assembled
 * from one or more JSON batch files.
 */
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::common::{DrillError, Result};


/// Represents a multiple-choice question.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable identifier, e.g. `W01-Q03`. Used as the key into the solved set.
    pub id: String,
    /// Where the question was taken from. Only displayed.
    #[serde(default)]
    pub source: String,
    pub question: String,
    /// Supplementary lines printed beneath the question text.
    #[serde(default)]
    pub statements: Option<Vec<String>>,
    pub options: Vec<String>,
    /// Index of the correct option, encoded as a string ("0" to "3").
    pub answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
    /// When set, an image is expected at `images/{id}.png`.
    #[serde(default)]
    pub has_image: bool,
}


impl Question {
    /// The numeric value of `answer`, or `None` if it is not a valid index.
    pub fn answer_index(&self) -> Option<usize> {
        self.answer.trim().parse::<usize>().ok()
    }

    /// Return `true` if choosing option `index` answers the question correctly.
    pub fn is_correct(&self, index: usize) -> bool {
        self.answer_index() == Some(index)
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.answer_index()
            .and_then(|i| self.options.get(i))
            .map(|s| s.as_str())
    }

    /// Path of the question's image relative to `asset_root`, if it has one.
    pub fn image_path(&self, asset_root: &Path) -> Option<PathBuf> {
        if self.has_image {
            let mut path = asset_root.to_path_buf();
            path.push("images");
            path.push(format!("{}.png", self.id));
            Some(path)
        } else {
            None
        }
    }
}


/// The full collection of questions, in canonical order.
#[derive(Debug, Default)]
pub struct Bank {
    questions: Vec<Question>,
}


impl Bank {
    /// Concatenate `batches` in the order given.
    pub fn from_batches(batches: Vec<Vec<Question>>) -> Self {
        let questions: Vec<Question> = batches.into_iter().flatten().collect();

        let mut seen = HashSet::new();
        for q in questions.iter() {
            if !seen.insert(q.id.as_str()) {
                log::warn!("duplicate question id '{}' in bank", q.id);
            }
        }

        Bank { questions }
    }

    /// Read each file as a JSON array of questions and concatenate them in order.
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut batches = Vec::with_capacity(paths.len());
        for path in paths.iter() {
            if !path.exists() {
                return Err(DrillError::BankNotFound(path.clone()));
            }
            let data = fs::read_to_string(path).map_err(DrillError::Io)?;
            let batch: Vec<Question> = serde_json::from_str(&data).map_err(DrillError::Json)?;
            log::info!("loaded {} question(s) from {}", batch.len(), path.display());
            batches.push(batch);
        }
        Ok(Bank::from_batches(batches))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Position of the first question with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}


/// Find the batch files in `dir`: every `week<N>.json`, ordered by `N`.
pub fn discover_batches(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if let Ok(iter) = dir.read_dir() {
        for entry in iter.flatten() {
            let path = entry.path();
            let number = path.file_name()
                .and_then(|name| name.to_str())
                .and_then(batch_number);
            if let Some(number) = number {
                found.push((number, path));
            }
        }
    }
    found.sort();
    found.into_iter().map(|(_, path)| path).collect()
}


fn batch_number(name: &str) -> Option<u32> {
    name.strip_prefix("week")?
        .strip_suffix(".json")?
        .parse::<u32>()
        .ok()
}


#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn mkquestion(id: &str, answer: &str) -> Question {
        Question {
            id: String::from(id),
            source: String::new(),
            question: format!("Question {}?", id),
            statements: None,
            options: vec![
                String::from("first"),
                String::from("second"),
                String::from("third"),
                String::from("fourth"),
            ],
            answer: String::from(answer),
            explanation: None,
            has_image: false,
        }
    }

    #[test]
    fn batches_are_concatenated_in_order() {
        let a = vec![mkquestion("A1", "0"), mkquestion("A2", "1")];
        let b = vec![mkquestion("B1", "2"), mkquestion("B2", "3"), mkquestion("B3", "0")];
        let bank = Bank::from_batches(vec![a.clone(), b.clone()]);

        assert_eq!(bank.len(), a.len() + b.len());
        for (i, q) in a.iter().enumerate() {
            assert_eq!(bank.get(i), Some(q));
        }
        for (j, q) in b.iter().enumerate() {
            assert_eq!(bank.get(a.len() + j), Some(q));
        }
        assert_eq!(bank.position("B1"), Some(2));
        assert_eq!(bank.position("nope"), None);
    }

    #[test]
    fn can_parse_question_json() {
        let input = r#"
        [
          {
            "id": "W01-Q01",
            "source": "R05春 問12",
            "question": "Which one?",
            "statements": ["a. one", "b. two"],
            "options": ["w", "x", "y", "z"],
            "answer": "2",
            "explanation": "Because.",
            "hasImage": true
          },
          {
            "id": "W01-Q02",
            "source": "",
            "question": "And this?",
            "options": ["w", "x", "y", "z"],
            "answer": "0"
          }
        ]
        "#;
        let questions: Vec<Question> = serde_json::from_str(input).unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions[0].has_image);
        assert_eq!(questions[0].statements.as_ref().map(|s| s.len()), Some(2));
        assert_eq!(questions[0].answer_index(), Some(2));
        assert_eq!(questions[0].correct_option(), Some("y"));
        assert!(!questions[1].has_image);
        assert_eq!(questions[1].explanation, None);
    }

    #[test]
    fn checking_answers_works() {
        let q = mkquestion("Q1", "1");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
        assert!(!q.is_correct(3));

        let broken = mkquestion("Q2", "first");
        assert_eq!(broken.answer_index(), None);
        assert!(!broken.is_correct(0));
        assert_eq!(broken.correct_option(), None);
    }

    #[test]
    fn image_path_follows_id() {
        let mut q = mkquestion("W02-Q07", "0");
        assert_eq!(q.image_path(Path::new("/srv/quiz")), None);
        q.has_image = true;
        assert_eq!(
            q.image_path(Path::new("/srv/quiz")),
            Some(PathBuf::from("/srv/quiz/images/W02-Q07.png"))
        );
    }

    #[test]
    fn discovers_batches_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in &["week10.json", "week2.json", "week1.json", "notes.json", "weekly.json"] {
            fs::write(dir.path().join(name), "[]").unwrap();
        }
        let found = discover_batches(dir.path());
        let names: Vec<String> = found.iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["week1.json", "week2.json", "week10.json"]);
    }

    #[test]
    fn missing_bank_file_is_an_error() {
        match Bank::load(&[PathBuf::from("/definitely/not/here.json")]) {
            Err(DrillError::BankNotFound(_)) => {},
            other => panic!("unexpected result: {:?}", other.map(|b| b.len())),
        }
    }
}
