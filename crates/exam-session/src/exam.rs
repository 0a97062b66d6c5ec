//! Exam content

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    /// Answer key, when the exam carries one
    pub correct_answer: Option<String>,
}

/// An exam definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub duration_minutes: u32,
    pub questions: Vec<Question>,
}

impl Exam {
    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes * 60
    }

    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Grade recorded answers as `(correct, graded)` over questions that
    /// carry an answer key. `None` when nothing is gradable.
    pub fn score(&self, answers: &HashMap<u32, String>) -> Option<(usize, usize)> {
        let mut graded = 0;
        let mut correct = 0;
        for question in &self.questions {
            let Some(key) = &question.correct_answer else {
                continue;
            };
            graded += 1;
            if answers.get(&question.id) == Some(key) {
                correct += 1;
            }
        }
        (graded > 0).then_some((correct, graded))
    }

    /// The five-question computer science sample used by the demo
    pub fn sample() -> Self {
        fn q(id: u32, prompt: &str, options: &[&str], correct: &str) -> Question {
            Question {
                id,
                prompt: prompt.to_string(),
                options: options.iter().map(|s| s.to_string()).collect(),
                correct_answer: Some(correct.to_string()),
            }
        }

        Self {
            id: "1".into(),
            title: "Data Structures Final".into(),
            subject: "Computer Science".into(),
            duration_minutes: 120,
            questions: vec![
                q(
                    1,
                    "What is the time complexity of binary search?",
                    &["O(1)", "O(log n)", "O(n)", "O(n log n)"],
                    "O(log n)",
                ),
                q(
                    2,
                    "Which data structure uses LIFO (Last In First Out)?",
                    &["Queue", "Stack", "Linked List", "Tree"],
                    "Stack",
                ),
                q(
                    3,
                    "What is the primary key in a database?",
                    &[
                        "A key that is used for encryption",
                        "A unique identifier for a record",
                        "A foreign key",
                        "A composite key",
                    ],
                    "A unique identifier for a record",
                ),
                q(
                    4,
                    "Which sorting algorithm has the best average-case time complexity?",
                    &["Bubble Sort", "Selection Sort", "Merge Sort", "Quick Sort"],
                    "Quick Sort",
                ),
                q(
                    5,
                    "What does HTML stand for?",
                    &[
                        "Hyper Text Markup Language",
                        "High Tech Machine Learning",
                        "Hyper Transfer Markup Language",
                        "Home Tool Markup Language",
                    ],
                    "Hyper Text Markup Language",
                ),
            ],
        }
    }
}
