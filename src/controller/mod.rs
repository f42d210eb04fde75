//! Game view controller: reconciles the page with server-confirmed game state.
//!
//! The controller never touches the DOM directly. It drives a [`GameView`] and
//! hands timed effects back to the caller as [`Scheduled`] follow-ups, which the
//! browser shell runs through `setTimeout` and feeds back via
//! [`GameController::run_followup`]. Nothing is updated optimistically: every
//! visual change below is a reaction to a server reply.

pub mod render;

use log::{debug, error, warn};

use crate::config::Config;
use crate::error::{ControllerError, Result};
use crate::input;
use crate::protocol::{GameState, ServerResponse, Status, SubmitAnswer, WordInfo};
use render::{LivesView, NETWORK_ERROR_FEEDBACK, SKIPPED_FEEDBACK};

pub const WORD_ADVANCE_DELAY_MS: u32 = 600;
pub const INCORRECT_FLASH_MS: u32 = 500;
pub const FEEDBACK_HIDE_MS: u32 = 1500;

/// One of the two character boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Persistent visual state of a character box (the incorrect flash is layered on top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxState {
    Plain,
    Highlight,
    Correct,
}

impl BoxState {
    pub fn class_name(self) -> &'static str {
        match self {
            BoxState::Plain => "char-box",
            BoxState::Highlight => "char-box highlight",
            BoxState::Correct => "char-box correct",
        }
    }
}

/// Which character of the current word is awaiting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordProgress {
    AwaitingFirst,
    AwaitingSecond,
    /// Both characters answered; the next word is pending its display delay.
    Completed,
}

impl WordProgress {
    pub fn highlighted(self) -> Option<Slot> {
        match self {
            WordProgress::AwaitingFirst => Some(Slot::First),
            WordProgress::AwaitingSecond => Some(Slot::Second),
            WordProgress::Completed => None,
        }
    }
}

/// Everything the controller needs from the page.
pub trait GameView {
    fn set_char_text(&mut self, slot: Slot, text: &str);
    fn set_char_state(&mut self, slot: Slot, state: BoxState);
    fn set_incorrect_flash(&mut self, slot: Slot, on: bool);
    fn render_lives(&mut self, lives: &LivesView);
    fn render_score(&mut self, text: &str);
    fn show_feedback(&mut self, text: &str);
    fn hide_feedback(&mut self);
    /// Clear the pinyin field and give it focus.
    fn reset_input(&mut self);
    /// Reflect whether a request is in flight.
    fn set_busy(&mut self, busy: bool);
    fn navigate(&mut self, url: &str);
}

/// A request the shell must send on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Submit { pinyin: String },
    Skip,
}

impl Request {
    pub fn url<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Request::Submit { .. } => &config.submit_url,
            Request::Skip => &config.skip_url,
        }
    }

    /// JSON body, `None` for the empty-bodied skip.
    pub fn body(&self) -> Result<Option<String>> {
        match self {
            Request::Submit { pinyin } => SubmitAnswer { pinyin }.to_json().map(Some),
            Request::Skip => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Followup {
    /// Show the next word once the completed one has been on screen long enough.
    AdvanceWord { generation: u64, word: WordInfo },
    ClearIncorrect { slot: Slot },
    HideFeedback { generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub delay_ms: u32,
    pub followup: Followup,
}

pub struct GameController<V: GameView> {
    view: V,
    config: Config,
    lives: i32,
    score: u32,
    progress: WordProgress,
    // Bumped whenever a new word is accepted so stale advances are dropped.
    word_generation: u64,
    // Next word waiting out its display delay.
    pending_word: Option<WordInfo>,
    feedback_generation: u64,
    in_flight: bool,
    finished: bool,
}

impl<V: GameView> GameController<V> {
    /// Build the controller and render the initial snapshot.
    pub fn new(view: V, config: Config, initial: GameState) -> Self {
        let mut controller = Self {
            view,
            lives: initial.lives.unwrap_or(config.total_lives as i32),
            score: initial.score.unwrap_or(0),
            config,
            progress: WordProgress::AwaitingFirst,
            word_generation: 0,
            pending_word: None,
            feedback_generation: 0,
            in_flight: false,
            finished: false,
        };
        controller.render_lives();
        controller.render_score();
        if let Some(word) = initial.word_info {
            controller.render_word(&word);
        }
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn progress(&self) -> WordProgress {
        self.progress
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Enter pressed with `raw` in the field.
    pub fn on_enter(&mut self, raw: &str) -> Option<Request> {
        let pinyin = input::submission_text(raw)?;
        self.begin(Request::Submit { pinyin })
    }

    pub fn on_skip(&mut self) -> Option<Request> {
        if !self.config.skip_enabled {
            debug!("skip ignored: disabled for this session");
            return None;
        }
        self.begin(Request::Skip)
    }

    fn begin(&mut self, request: Request) -> Option<Request> {
        if self.finished {
            return None;
        }
        if self.in_flight {
            debug!("ignoring {request:?}: a request is already in flight");
            return None;
        }
        self.in_flight = true;
        self.view.set_busy(true);
        Some(request)
    }

    fn end_request(&mut self) {
        self.in_flight = false;
        self.view.set_busy(false);
    }

    /// Reconcile the page with a server reply.
    pub fn handle_response(&mut self, response: ServerResponse) -> Vec<Scheduled> {
        self.end_request();
        let mut scheduled = Vec::new();
        if self.finished {
            debug!("dropping {} reply after game end", response.status.as_str());
            return scheduled;
        }
        self.view.reset_input();

        if response.status.is_terminal() {
            self.finished = true;
            let url = self.config.result_url.clone();
            self.view.navigate(&url);
            return scheduled;
        }
        // A reply for the next word can arrive inside the advance delay.
        self.flush_pending_word();

        match &response.status {
            Status::Win | Status::Lose => {} // handled above
            Status::CorrectChar => self.on_correct_char(),
            Status::WordCompleted => self.on_word_completed(&response, &mut scheduled),
            Status::Incorrect => self.on_incorrect(&response, &mut scheduled),
            Status::Skipped => self.on_skipped(&response, &mut scheduled),
            Status::Unknown(other) => warn!("ignoring unknown status {other:?}"),
        }
        scheduled
    }

    /// The request failed before a usable reply arrived.
    pub fn handle_failure(&mut self, err: &ControllerError) -> Vec<Scheduled> {
        self.end_request();
        let mut scheduled = Vec::new();
        if self.finished {
            return scheduled;
        }
        if err.is_transport() {
            error!("request failed: {err}");
            // The typed answer stays in the field so Enter retries it.
            self.show_feedback(NETWORK_ERROR_FEEDBACK, &mut scheduled);
        } else {
            // The server may already have applied the answer; never invite a resubmit.
            self.view.reset_input();
            self.report_malformed(&err.to_string(), &mut scheduled);
        }
        scheduled
    }

    pub fn run_followup(&mut self, followup: Followup) {
        if self.finished {
            return;
        }
        match followup {
            Followup::AdvanceWord { generation, word } => {
                if generation == self.word_generation {
                    self.pending_word = None;
                    self.render_word(&word);
                } else {
                    debug!("stale word advance {generation} skipped");
                }
            }
            Followup::ClearIncorrect { slot } => self.view.set_incorrect_flash(slot, false),
            Followup::HideFeedback { generation } => {
                if generation == self.feedback_generation {
                    self.view.hide_feedback();
                }
            }
        }
    }

    fn on_correct_char(&mut self) {
        if self.progress != WordProgress::AwaitingFirst {
            warn!("correct_char while {:?}", self.progress);
        }
        self.view.set_char_state(Slot::First, BoxState::Correct);
        self.view.set_char_state(Slot::Second, BoxState::Highlight);
        self.progress = WordProgress::AwaitingSecond;
    }

    fn on_word_completed(&mut self, response: &ServerResponse, scheduled: &mut Vec<Scheduled>) {
        self.view.set_char_state(Slot::Second, BoxState::Correct);
        self.progress = WordProgress::Completed;
        if let Some(score) = response.score() {
            self.set_score(score);
        }
        match response.word_info() {
            Some(word) => {
                self.word_generation += 1;
                self.pending_word = Some(word.clone());
                scheduled.push(Scheduled {
                    delay_ms: WORD_ADVANCE_DELAY_MS,
                    followup: Followup::AdvanceWord {
                        generation: self.word_generation,
                        word: word.clone(),
                    },
                });
            }
            None => self.report_malformed("word_completed without word_info", scheduled),
        }
    }

    fn on_incorrect(&mut self, response: &ServerResponse, scheduled: &mut Vec<Scheduled>) {
        let deducted = response.deducted_points();
        if deducted > 0 {
            self.show_feedback(&render::deduction_feedback(deducted), scheduled);
        }
        match response.lives() {
            Some(lives) => self.set_lives(lives),
            None => self.report_malformed("incorrect without lives", scheduled),
        }
        if let Some(slot) = self.progress.highlighted() {
            self.view.set_incorrect_flash(slot, true);
            scheduled.push(Scheduled {
                delay_ms: INCORRECT_FLASH_MS,
                followup: Followup::ClearIncorrect { slot },
            });
        }
    }

    fn on_skipped(&mut self, response: &ServerResponse, scheduled: &mut Vec<Scheduled>) {
        self.show_feedback(SKIPPED_FEEDBACK, scheduled);
        match response.word_info() {
            Some(word) => self.render_word(word),
            None => self.report_malformed("skipped without word_info", scheduled),
        }
        if let Some(lives) = response.lives() {
            self.set_lives(lives);
        }
        if let Some(score) = response.score() {
            self.set_score(score);
        }
    }

    fn flush_pending_word(&mut self) {
        if let Some(word) = self.pending_word.take() {
            self.word_generation += 1;
            self.render_word(&word);
        }
    }

    fn report_malformed(&mut self, detail: &str, scheduled: &mut Vec<Scheduled>) {
        error!("malformed server response: {detail}");
        if cfg!(debug_assertions) {
            self.show_feedback(detail, scheduled);
        }
    }

    fn set_lives(&mut self, lives: i32) {
        let total = self.config.total_lives as i32;
        if !(0..=total).contains(&lives) {
            warn!("lives {lives} outside [0, {total}]");
        }
        self.lives = lives.clamp(0, total);
        self.render_lives();
    }

    fn set_score(&mut self, score: u32) {
        if score < self.score {
            warn!("score went down from {} to {score}", self.score);
        }
        self.score = score;
        self.render_score();
    }

    fn render_lives(&mut self) {
        let view = render::lives_view(self.lives, self.config.total_lives);
        self.view.render_lives(&view);
    }

    fn render_score(&mut self) {
        let text = render::score_text(self.score, self.config.target_score);
        self.view.render_score(&text);
    }

    fn render_word(&mut self, word: &WordInfo) {
        for slot in Slot::ALL {
            self.view.set_char_text(slot, &word.word[slot.index()]);
            self.view.set_incorrect_flash(slot, false);
        }
        self.view.set_char_state(Slot::First, BoxState::Highlight);
        self.view.set_char_state(Slot::Second, BoxState::Plain);
        self.progress = WordProgress::AwaitingFirst;
    }

    fn show_feedback(&mut self, text: &str, scheduled: &mut Vec<Scheduled>) {
        self.feedback_generation += 1;
        self.view.show_feedback(text);
        scheduled.push(Scheduled {
            delay_ms: FEEDBACK_HIDE_MS,
            followup: Followup::HideFeedback {
                generation: self.feedback_generation,
            },
        });
    }
}
