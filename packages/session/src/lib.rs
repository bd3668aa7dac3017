//! # lexi-session - flashcard session engine
//!
//! Pure, synchronous logic for vocabulary flashcard sessions:
//!
//! - **Session Builder** - selects and orders the words one pass will present
//! - **Quiz Option Generator** - multiple-choice options with 3 distractors
//! - **Session Controller** - cursor, phase transitions, mastery updates
//!
//! The crate performs no I/O. Persistence of mastery updates is the
//! caller's job: controller actions return [`MasteryUpdate`] values that
//! the host hands to its word store. All randomness flows through a
//! caller-supplied [`rand::Rng`], so tests can seed a deterministic
//! generator.
//!
//! ## Modules
//!
//! - [`types`] - `WordRecord`, `MasteryLevel`, `QuizOption`, constants
//! - [`builder`] - learning and review queue construction
//! - [`options`] - multiple-choice option generation
//! - [`controller`] - the session state machine

pub mod builder;
pub mod controller;
pub mod options;
pub mod types;

pub use builder::{build_learning_queue, build_review_queue, QueueFilter, ReviewOrder};
pub use controller::{SessionController, SessionPhase, SessionView};
pub use options::generate_options;
pub use types::{
    MasteryLevel, MasteryUpdate, QuizOption, WordRecord, DEFAULT_MAX_WORDS, MAX_MASTERY,
    OPTION_COUNT,
};
