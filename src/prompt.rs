//! Interactive questions asked during init

use crate::Result;
use dialoguer::Input;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Asks the user for a line of text
pub trait Prompter {
    fn input(&self, message: &str) -> Result<String>;
}

/// Prompts on the terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, message: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_string())
    }
}

/// Answers questions from a fixed list and remembers what was asked
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, message: &str) -> Result<String> {
        self.asked.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No scripted answer for prompt: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let prompter = ScriptedPrompter::new(["first", "second"]);
        assert_eq!(prompter.input("a?").unwrap(), "first");
        assert_eq!(prompter.input("b?").unwrap(), "second");
        assert!(prompter.input("c?").is_err());
        assert_eq!(prompter.asked(), vec!["a?", "b?", "c?"]);
    }
}
