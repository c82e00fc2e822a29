//! Constraint-based weekly timetable generation.
//!
//! Assigns a batch's teaching sessions (theory, lab, tutorial, special)
//! to a five-day period grid under hard feasibility rules — immutable
//! breaks, pinned administrative slots, exact weekly frequencies, lab
//! contiguity — and soft preferences (day bias, back-to-back avoidance,
//! load balance), optimized by a seeded genetic search.
//!
//! # Modules
//!
//! - **`model`**: Time grid and domain catalog — `TimeGrid`, `Subject`,
//!   `SessionRequirement`, `Faculty`, `Room`, `Batch`, `FixedAssignment`,
//!   plus the serializable `Timetable` output view
//! - **`chromosome`**: candidate encoding, seeding and repair
//! - **`fitness`**: hard/soft violation counting and the `[0, 1000]` score
//! - **`engine`**: selection, crossover, mutation, and the search driver
//! - **`problem`**: the read-only indexed context shared by all of the above
//! - **`error`**: fatal pre-search configuration errors
//!
//! # Example
//!
//! ```no_run
//! use u_timetable::engine::{EngineConfig, TimetableEngine};
//! use u_timetable::model::{
//!     Batch, Catalog, Faculty, Room, RoomType, SessionRequirement, SessionType, Subject,
//!     TimeGrid,
//! };
//!
//! let grid = TimeGrid::standard();
//! let catalog = Catalog::new(Batch::new("b1", "ECE 3rd Sem A"))
//!     .with_subject(Subject::new("s-emf", "U24EC311", "Electromagnetic Fields"))
//!     .with_requirement(
//!         SessionRequirement::new("r-emf", "s-emf", SessionType::Theory).with_frequency(4),
//!     )
//!     .with_faculty(Faculty::new("f-asra", "Ms.H.Asra Jabeen").qualified_for("r-emf"))
//!     .with_room(Room::new("rm-201", RoomType::Theory));
//!
//! let config = EngineConfig::default().with_seed(42);
//! let result = TimetableEngine::run(&catalog, &grid, &config)?;
//! println!(
//!     "fitness {:.1}% with {} hard violations",
//!     result.fitness_percent(),
//!     result.violations.hard_total(),
//! );
//! # Ok::<(), u_timetable::error::ConfigurationError>(())
//! ```

pub mod chromosome;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod model;
pub mod problem;

pub use chromosome::{Chromosome, Gene, SessionGene};
pub use engine::{EngineConfig, Termination, TimetableEngine, TimetableResult};
pub use error::{ConfigurationError, ConfigurationErrorKind};
pub use fitness::{ConstraintWeights, Evaluator, SoftRules, ViolationCounts};
pub use model::{Catalog, TimeGrid, Timetable};
pub use problem::TimetableProblem;
