use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::api::{ApiClient, ApiError, Lookup, Transport};
use crate::flight::InFlight;
use crate::points::PointsDisplay;
use crate::token::{KeyValueStorage, TokenStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub is_correct: bool,
    pub correct: BTreeSet<String>,
}

/// One quiz session, from the first fetch to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Loading,
    AwaitingAnswer {
        question: Question,
    },
    AnswerSelected {
        question: Question,
        selected: String,
    },
    Revealed {
        question: Question,
        selected: String,
        reveal: Reveal,
    },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    QuestionLoaded(Question),
    QuizFinished,
    Select(String),
    Continue,
    Answered(Reveal),
}

/// Request the engine has to make after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchQuestion,
    SubmitAnswer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    Neutral,
    Selected,
    Correct,
    Wrong,
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::Loading => "Loading",
            QuizState::AwaitingAnswer { .. } => "AwaitingAnswer",
            QuizState::AnswerSelected { .. } => "AnswerSelected",
            QuizState::Revealed { .. } => "Revealed",
            QuizState::Completed => "Completed",
        }
    }

    pub fn question(&self) -> Option<&Question> {
        match self {
            QuizState::AwaitingAnswer { question }
            | QuizState::AnswerSelected { question, .. }
            | QuizState::Revealed { question, .. } => Some(question),
            QuizState::Loading | QuizState::Completed => None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            QuizState::AnswerSelected { selected, .. } | QuizState::Revealed { selected, .. } => {
                Some(selected)
            }
            _ => None,
        }
    }

    /// `None` until the answer has been revealed.
    pub fn correct_answers(&self) -> Option<&BTreeSet<String>> {
        match self {
            QuizState::Revealed { reveal, .. } => Some(&reveal.correct),
            _ => None,
        }
    }

    pub fn is_correct(&self) -> Option<bool> {
        match self {
            QuizState::Revealed { reveal, .. } => Some(reveal.is_correct),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, QuizState::Completed)
    }

    pub fn can_continue(&self) -> bool {
        matches!(self, QuizState::AnswerSelected { .. } | QuizState::Revealed { .. })
    }

    pub fn choices_selectable(&self) -> bool {
        matches!(self, QuizState::AwaitingAnswer { .. } | QuizState::AnswerSelected { .. })
    }

    pub fn mark(&self, choice: &str) -> ChoiceMark {
        match self {
            QuizState::AnswerSelected { selected, .. } if selected == choice => {
                ChoiceMark::Selected
            }
            QuizState::Revealed { selected, reveal, .. } => {
                if reveal.correct.contains(choice) {
                    ChoiceMark::Correct
                } else if selected == choice {
                    ChoiceMark::Wrong
                } else {
                    ChoiceMark::Neutral
                }
            }
            _ => ChoiceMark::Neutral,
        }
    }
}

impl QuizEvent {
    pub fn name(&self) -> &'static str {
        match self {
            QuizEvent::QuestionLoaded(_) => "QuestionLoaded",
            QuizEvent::QuizFinished => "QuizFinished",
            QuizEvent::Select(_) => "Select",
            QuizEvent::Continue => "Continue",
            QuizEvent::Answered(_) => "Answered",
        }
    }
}

#[derive(Debug)]
pub enum QuizError {
    Busy,
    UnknownChoice(String),
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
    Api(ApiError),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "A request is already in progress"),
            Self::UnknownChoice(choice) => write!(f, "Unknown choice: {}", choice),
            Self::InvalidTransition { state, event } => {
                write!(f, "{} is not allowed while {}", event, state)
            }
            Self::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for QuizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for QuizError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

/// Pure quiz transition. Never touches the network; the returned command
/// tells the caller which request to issue next.
pub fn transition(
    state: &QuizState,
    event: QuizEvent,
) -> Result<(QuizState, Option<Command>), QuizError> {
    use QuizEvent::*;
    use QuizState::*;

    let next = match (state, event) {
        (Loading, QuestionLoaded(question)) => (AwaitingAnswer { question }, None),
        (Loading, QuizFinished) | (AnswerSelected { .. }, QuizFinished) => (Completed, None),

        (AwaitingAnswer { question }, Select(choice))
        | (AnswerSelected { question, .. }, Select(choice)) => {
            if !question.choices.contains(&choice) {
                return Err(QuizError::UnknownChoice(choice));
            }
            (
                AnswerSelected {
                    question: question.clone(),
                    selected: choice,
                },
                None,
            )
        }

        (AnswerSelected { selected, .. }, Continue) => {
            (state.clone(), Some(Command::SubmitAnswer(selected.clone())))
        }
        (AnswerSelected { question, selected }, Answered(reveal)) => (
            Revealed {
                question: question.clone(),
                selected: selected.clone(),
                reveal,
            },
            None,
        ),

        (Revealed { .. }, Continue) => (Loading, Some(Command::FetchQuestion)),

        (state, event) => {
            return Err(QuizError::InvalidTransition {
                state: state.name(),
                event: event.name(),
            })
        }
    };

    Ok(next)
}

pub struct QuizEngine<T, S> {
    quiz_name: String,
    api: Rc<ApiClient<T>>,
    tokens: Rc<TokenStore<S>>,
    points: Rc<PointsDisplay<T, S>>,
    state: RefCell<QuizState>,
    in_flight: Cell<bool>,
}

impl<T: Transport, S: KeyValueStorage> QuizEngine<T, S> {
    pub fn new(
        quiz_name: impl Into<String>,
        api: Rc<ApiClient<T>>,
        tokens: Rc<TokenStore<S>>,
        points: Rc<PointsDisplay<T, S>>,
    ) -> Self {
        Self {
            quiz_name: quiz_name.into(),
            api,
            tokens,
            points,
            state: RefCell::new(QuizState::Loading),
            in_flight: Cell::new(false),
        }
    }

    pub fn quiz_name(&self) -> &str {
        &self.quiz_name
    }

    pub fn state(&self) -> QuizState {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    pub fn can_continue(&self) -> bool {
        !self.is_busy() && self.state.borrow().can_continue()
    }

    /// Fetches the current question. Only valid while `Loading`; also serves
    /// as the retry after a failed fetch.
    pub async fn open(&self) -> Result<(), QuizError> {
        let Some(_guard) = InFlight::enter(&self.in_flight) else {
            return Err(QuizError::Busy);
        };

        if !matches!(*self.state.borrow(), QuizState::Loading) {
            let state = self.state.borrow().name();
            return Err(QuizError::InvalidTransition { state, event: "Open" });
        }
        self.execute(Command::FetchQuestion).await
    }

    /// Changes the highlighted choice. Never issues a request.
    pub fn select(&self, choice: &str) -> Result<(), QuizError> {
        if self.is_busy() {
            return Err(QuizError::Busy);
        }
        let command = self.apply(QuizEvent::Select(choice.to_string()))?;
        debug_assert!(command.is_none());
        Ok(())
    }

    /// Submits the selected answer, or moves on to the next question once the
    /// answer has been revealed.
    pub async fn press_continue(&self) -> Result<(), QuizError> {
        let Some(_guard) = InFlight::enter(&self.in_flight) else {
            log::debug!("ignoring continue on {} while a request is in flight", self.quiz_name);
            return Err(QuizError::Busy);
        };

        match self.apply(QuizEvent::Continue)? {
            Some(command) => self.execute(command).await,
            None => Ok(()),
        }
    }

    fn apply(&self, event: QuizEvent) -> Result<Option<Command>, QuizError> {
        let (next, command) = transition(&self.state.borrow(), event)?;
        log::trace!("quiz {} -> {}", self.quiz_name, next.name());
        self.state.replace(next);
        Ok(command)
    }

    async fn execute(&self, command: Command) -> Result<(), QuizError> {
        let authorization = self.tokens.get();

        match command {
            Command::FetchQuestion => {
                let reply = self
                    .api
                    .quiz_question(&self.quiz_name, authorization.as_deref())
                    .await?;
                self.tokens.set(reply.token.as_deref());

                let event = match reply.value {
                    Lookup::Found(question) => QuizEvent::QuestionLoaded(question),
                    Lookup::NotFound => {
                        log::info!("quiz {} has no questions left", self.quiz_name);
                        QuizEvent::QuizFinished
                    }
                };
                self.apply(event)?;
            }
            Command::SubmitAnswer(answer) => {
                let reply = self
                    .api
                    .submit_answer(&self.quiz_name, &answer, authorization.as_deref())
                    .await?;
                self.tokens.set(reply.token.as_deref());

                match reply.value {
                    Lookup::Found(reveal) => {
                        self.apply(QuizEvent::Answered(reveal))?;
                        if let Err(err) = self.points.refresh().await {
                            log::warn!("failed to refresh points after answer: {}", err);
                        }
                    }
                    Lookup::NotFound => {
                        log::info!("quiz {} finished before the answer arrived", self.quiz_name);
                        self.apply(QuizEvent::QuizFinished)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{block_on, join, FakeTransport};
    use crate::token::MemoryStorage;

    const QUESTION: &str =
        r#"{"question": "Sky colour?", "choices": ["Blue", "Green", "Red"], "token": "t1"}"#;
    const WRONG: &str = r#"{"is_correct": false, "correct": ["Blue"], "token": "t2"}"#;
    const STATS: &str = r#"{"total_points": 0}"#;
    const NOT_FOUND: &str = r#"{"error": "NotFound"}"#;

    fn question() -> Question {
        Question {
            text: "Sky colour?".to_string(),
            choices: vec!["Blue".to_string(), "Green".to_string(), "Red".to_string()],
        }
    }

    fn engine(replies: &[&str]) -> QuizEngine<FakeTransport, MemoryStorage> {
        let api = Rc::new(ApiClient::new("http://scores.test", FakeTransport::new(replies)));
        let tokens = Rc::new(TokenStore::new(MemoryStorage::new()));
        let points = Rc::new(PointsDisplay::new(api.clone(), tokens.clone()));
        QuizEngine::new("colors", api, tokens, points)
    }

    fn methods(engine: &QuizEngine<FakeTransport, MemoryStorage>) -> Vec<(Method, String)> {
        engine
            .api
            .transport()
            .requests()
            .into_iter()
            .map(|request| (request.method, request.url))
            .collect()
    }

    #[test]
    fn test_transition_happy_path() {
        let (state, command) =
            transition(&QuizState::Loading, QuizEvent::QuestionLoaded(question())).unwrap();
        assert_eq!(state.name(), "AwaitingAnswer");
        assert_eq!(command, None);

        let (state, _) = transition(&state, QuizEvent::Select("Red".into())).unwrap();
        let (state, _) = transition(&state, QuizEvent::Select("Blue".into())).unwrap();
        assert_eq!(state.selected(), Some("Blue"));

        let (state, command) = transition(&state, QuizEvent::Continue).unwrap();
        assert_eq!(command, Some(Command::SubmitAnswer("Blue".into())));
        assert_eq!(state.name(), "AnswerSelected");

        let reveal = Reveal {
            is_correct: true,
            correct: ["Blue".to_string()].into_iter().collect(),
        };
        let (state, _) = transition(&state, QuizEvent::Answered(reveal)).unwrap();
        assert_eq!(state.is_correct(), Some(true));
        assert!(!state.choices_selectable());

        let (state, command) = transition(&state, QuizEvent::Continue).unwrap();
        assert_eq!(state, QuizState::Loading);
        assert_eq!(command, Some(Command::FetchQuestion));
    }

    #[test]
    fn test_transition_rejects_out_of_order_events() {
        let awaiting = QuizState::AwaitingAnswer { question: question() };
        assert!(matches!(
            transition(&awaiting, QuizEvent::Continue),
            Err(QuizError::InvalidTransition { state: "AwaitingAnswer", event: "Continue" })
        ));
        assert!(matches!(
            transition(&awaiting, QuizEvent::Select("Purple".into())),
            Err(QuizError::UnknownChoice(_))
        ));
        assert!(transition(&QuizState::Completed, QuizEvent::Continue).is_err());
        assert!(transition(&QuizState::Completed, QuizEvent::Select("Blue".into())).is_err());
    }

    #[test]
    fn test_revealed_marks() {
        let state = QuizState::Revealed {
            question: question(),
            selected: "Red".into(),
            reveal: Reveal {
                is_correct: false,
                correct: ["Blue".to_string()].into_iter().collect(),
            },
        };
        assert_eq!(state.mark("Blue"), ChoiceMark::Correct);
        assert_eq!(state.mark("Red"), ChoiceMark::Wrong);
        assert_eq!(state.mark("Green"), ChoiceMark::Neutral);
        assert!(transition(&state, QuizEvent::Select("Blue".into())).is_err());
    }

    #[test]
    fn test_not_found_completes_and_stays_quiet() {
        let engine = engine(&[NOT_FOUND]);
        block_on(engine.open()).unwrap();
        assert!(engine.state().is_completed());
        assert_eq!(engine.api.transport().requests().len(), 1);

        assert!(block_on(engine.press_continue()).is_err());
        assert!(block_on(engine.open()).is_err());
        assert!(engine.select("Blue").is_err());
        assert_eq!(engine.api.transport().requests().len(), 1);
    }

    #[test]
    fn test_selection_issues_no_requests() {
        let engine = engine(&[QUESTION]);
        block_on(engine.open()).unwrap();
        assert!(!engine.can_continue());

        engine.select("Green").unwrap();
        engine.select("Red").unwrap();
        assert_eq!(engine.state().selected(), Some("Red"));
        assert_eq!(engine.state().mark("Red"), ChoiceMark::Selected);
        assert!(engine.can_continue());
        assert_eq!(engine.api.transport().requests().len(), 1);
    }

    #[test]
    fn test_one_post_per_reveal_then_get() {
        let engine = engine(&[QUESTION, WRONG, STATS, NOT_FOUND]);
        block_on(engine.open()).unwrap();
        engine.select("Red").unwrap();

        block_on(engine.press_continue()).unwrap();
        let state = engine.state();
        assert_eq!(state.is_correct(), Some(false));
        assert_eq!(state.mark("Red"), ChoiceMark::Wrong);
        assert_eq!(state.mark("Blue"), ChoiceMark::Correct);

        block_on(engine.press_continue()).unwrap();
        assert!(engine.state().is_completed());

        assert_eq!(
            methods(&engine),
            vec![
                (Method::Get, "http://scores.test/quiz/colors".to_string()),
                (Method::Post, "http://scores.test/quiz/colors".to_string()),
                (Method::Get, "http://scores.test/stats".to_string()),
                (Method::Get, "http://scores.test/quiz/colors".to_string()),
            ]
        );
    }

    #[test]
    fn test_rotated_tokens_are_adopted() {
        let engine = engine(&[QUESTION, WRONG, STATS]);
        block_on(engine.open()).unwrap();
        assert_eq!(engine.tokens.raw().as_deref(), Some("t1"));

        engine.select("Blue").unwrap();
        block_on(engine.press_continue()).unwrap();
        assert_eq!(engine.tokens.raw().as_deref(), Some("t2"));

        let requests = engine.api.transport().requests();
        assert_eq!(requests[0].header("Authorization"), None);
        assert_eq!(requests[1].header("Authorization"), Some("UserState t1"));
        assert_eq!(requests[1].body.as_deref(), Some(r#"{"answer":"Blue"}"#));
        assert_eq!(requests[2].header("Authorization"), Some("UserState t2"));
    }

    #[test]
    fn test_continue_rejected_while_busy() {
        let engine = engine(&[QUESTION]);
        block_on(engine.open()).unwrap();
        engine.select("Blue").unwrap();

        engine.in_flight.set(true);
        assert!(matches!(block_on(engine.press_continue()), Err(QuizError::Busy)));
        assert!(matches!(engine.select("Green"), Err(QuizError::Busy)));
        assert!(!engine.can_continue());
        assert_eq!(engine.api.transport().requests().len(), 1);
    }

    #[test]
    fn test_overlapping_continue_is_rejected() {
        let engine = engine(&[QUESTION, WRONG, STATS]);
        block_on(engine.open()).unwrap();
        engine.select("Blue").unwrap();
        engine.api.transport().stall_next();

        let (first, second) = block_on(join(engine.press_continue(), engine.press_continue()));
        assert!(first.is_ok());
        assert!(matches!(second, Err(QuizError::Busy)));
        assert_eq!(engine.state().name(), "Revealed");
        assert_eq!(engine.tokens.raw().as_deref(), Some("t2"));
        assert_eq!(engine.api.transport().requests().len(), 3);
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_failed_fetch_can_be_retried() {
        let engine = engine(&[]);
        assert!(matches!(block_on(engine.open()), Err(QuizError::Api(_))));
        assert_eq!(engine.state(), QuizState::Loading);
        assert!(!engine.is_busy());

        engine.api.transport().push_reply(QUESTION);
        block_on(engine.open()).unwrap();
        assert_eq!(engine.state().question(), Some(&question()));
    }

    #[test]
    fn test_answer_not_found_completes() {
        let engine = engine(&[QUESTION, NOT_FOUND]);
        block_on(engine.open()).unwrap();
        engine.select("Blue").unwrap();
        block_on(engine.press_continue()).unwrap();
        assert!(engine.state().is_completed());
        assert_eq!(engine.api.transport().requests().len(), 2);
    }
}
